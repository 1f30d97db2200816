//! Collaborator seams: change notifications out, user-lifecycle events in.
//!
//! # Example
//! ```
//! use policy_cache::PolicyCacheBuilder;
//! use policy_cache::listener::PolicyChange;
//! use policy_cache::UserId;
//! use std::sync::{Arc, Mutex};
//!
//! let log: Arc<Mutex<Vec<PolicyChange>>> = Arc::new(Mutex::new(Vec::new()));
//! let log2 = Arc::clone(&log);
//!
//! let cache = PolicyCacheBuilder::new()
//!     .change_listener(move |change: &PolicyChange| {
//!         log2.lock().unwrap().push(*change);
//!     })
//!     .build();
//!
//! cache.set_permission_policy(UserId(3), 1);
//! cache.on_user_removed(UserId(3));
//! assert_eq!(log.lock().unwrap().len(), 2);
//! ```

use crate::user::{UserHandle, UserId};

// ---------------------------------------------------------------------------
// PolicyChange
// ---------------------------------------------------------------------------

/// A mutation that was just applied to the cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PolicyChange {
    /// The single-value screen-capture marker was overwritten.
    ScreenCaptureDisallowedUser(UserHandle),
    /// A handle was added to (`disallowed = true`) or removed from the
    /// screen-capture disallowed set.  Reported even when membership was
    /// already in the requested state.
    ScreenCaptureDisallowed { user: UserHandle, disallowed: bool },
    PasswordQuality { user: UserId, quality: i32 },
    PermissionPolicy { user: UserId, policy: i32 },
    AdminCanGrantSensorsPermissions { user: UserId, can_grant: bool },
    /// Per-user entries for `user` were dropped.
    UserRemoved(UserId),
}

// ---------------------------------------------------------------------------
// ChangeListener trait
// ---------------------------------------------------------------------------

/// A callback invoked after each mutation.
///
/// Runs on the calling thread **after** the state lock has been released, so
/// it may read from the cache.  Writing to the cache from inside the listener
/// is allowed but recurses into the listener again.
pub trait ChangeListener: Send + Sync + 'static {
    fn on_change(&self, change: &PolicyChange);
}

/// A [`ChangeListener`] backed by a closure.
///
/// Created via [`PolicyCacheBuilder::change_listener`](crate::PolicyCacheBuilder::change_listener).
pub struct FnListener<F>(pub F);

impl<F> ChangeListener for FnListener<F>
where
    F: Fn(&PolicyChange) + Send + Sync + 'static,
{
    fn on_change(&self, change: &PolicyChange) {
        (self.0)(change)
    }
}

// ---------------------------------------------------------------------------
// UserLifecycle trait
// ---------------------------------------------------------------------------

/// Receiver of user-deletion events.
///
/// Delivery may repeat; implementations must be idempotent.
pub trait UserLifecycle: Send + Sync {
    fn on_user_removed(&self, user: UserId);
}
