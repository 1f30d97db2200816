//! Read-side view of the cached policy, for hot-path consumers.

use crate::codes::{PasswordQuality, PermissionPolicy};
use crate::user::{UserHandle, UserId};

/// The queries permission checkers and UI checks need.
///
/// Implemented by [`PolicyCache`](crate::PolicyCache), and by
/// [`EmptyPolicyReader`] for consumers that start before any policy has been
/// pushed.
pub trait PolicyReader: Send + Sync {
    /// `false` if `user` or the "all users" sentinel is in the disallowed set.
    fn is_screen_capture_allowed(&self, user: UserHandle) -> bool;

    /// Raw password quality code; [`PasswordQuality::DEFAULT`] when unknown.
    fn password_quality(&self, user: UserId) -> i32;

    /// Raw permission policy code; [`PermissionPolicy::DEFAULT`] when unknown.
    fn permission_policy(&self, user: UserId) -> i32;

    fn can_admin_grant_sensors_permissions_for_user(&self, user: UserId) -> bool;
}

/// Answers every query with the default, as if nothing had been cached.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmptyPolicyReader;

impl PolicyReader for EmptyPolicyReader {
    fn is_screen_capture_allowed(&self, _user: UserHandle) -> bool {
        true
    }

    fn password_quality(&self, _user: UserId) -> i32 {
        PasswordQuality::DEFAULT.code()
    }

    fn permission_policy(&self, _user: UserId) -> i32 {
        PermissionPolicy::DEFAULT.code()
    }

    fn can_admin_grant_sensors_permissions_for_user(&self, _user: UserId) -> bool {
        false
    }
}
