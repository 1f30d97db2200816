use ahash::{AHashMap, AHashSet};

use crate::codes::{PasswordQuality, PermissionPolicy};
use crate::dump::PolicySnapshot;
use crate::user::{UserHandle, UserId};

// ---------------------------------------------------------------------------
// PolicyState
// ---------------------------------------------------------------------------

/// Every cached policy fact.
///
/// Not synchronised on its own: the cache keeps exactly one instance behind a
/// single `Mutex`, and every method here runs with that lock held.
#[derive(Debug, Default)]
pub(crate) struct PolicyState {
    /// Single-value marker.  Independent of `screen_capture_disallowed`.
    screen_capture_disallowed_user: UserHandle,
    /// May contain [`UserHandle::All`], which disallows capture for everyone.
    screen_capture_disallowed: AHashSet<UserHandle>,
    password_quality: AHashMap<UserId, i32>,
    permission_policy: AHashMap<UserId, i32>,
    /// For users affiliated with the device this mirrors the device owner's
    /// setting, otherwise the setting of the admin of that user.
    can_grant_sensors_permissions: AHashMap<UserId, bool>,
}

impl PolicyState {
    pub(crate) fn with_user_capacity(capacity: usize) -> Self {
        PolicyState {
            screen_capture_disallowed_user: UserHandle::Null,
            screen_capture_disallowed: AHashSet::new(),
            password_quality: AHashMap::with_capacity(capacity),
            permission_policy: AHashMap::with_capacity(capacity),
            can_grant_sensors_permissions: AHashMap::with_capacity(capacity),
        }
    }

    // -----------------------------------------------------------------------
    // User lifecycle
    // -----------------------------------------------------------------------

    /// Drops the per-user entries for `user`.  The screen-capture fields are
    /// left alone.
    ///
    /// Returns `true` if at least one entry was present.
    pub(crate) fn remove_user(&mut self, user: UserId) -> bool {
        let a = self.password_quality.remove(&user).is_some();
        let b = self.permission_policy.remove(&user).is_some();
        let c = self.can_grant_sensors_permissions.remove(&user).is_some();
        a || b || c
    }

    // -----------------------------------------------------------------------
    // Screen capture
    // -----------------------------------------------------------------------

    /// Handles are stored and looked up in canonical form, so a `User`
    /// carrying a sentinel id behaves exactly like the sentinel.
    pub(crate) fn is_screen_capture_allowed(&self, user: UserHandle) -> bool {
        !self.screen_capture_disallowed.contains(&user.canonical())
            && !self.screen_capture_disallowed.contains(&UserHandle::All)
    }

    pub(crate) fn screen_capture_disallowed_user(&self) -> UserHandle {
        self.screen_capture_disallowed_user
    }

    pub(crate) fn set_screen_capture_disallowed_user(&mut self, user: UserHandle) {
        self.screen_capture_disallowed_user = user.canonical();
    }

    /// Returns `true` if membership changed.
    pub(crate) fn set_screen_capture_disallowed(
        &mut self,
        user: UserHandle,
        disallowed: bool,
    ) -> bool {
        let user = user.canonical();
        if disallowed {
            self.screen_capture_disallowed.insert(user)
        } else {
            self.screen_capture_disallowed.remove(&user)
        }
    }

    // -----------------------------------------------------------------------
    // Per-user codes
    // -----------------------------------------------------------------------

    pub(crate) fn password_quality(&self, user: UserId) -> i32 {
        self.password_quality
            .get(&user)
            .copied()
            .unwrap_or(PasswordQuality::DEFAULT.code())
    }

    pub(crate) fn set_password_quality(&mut self, user: UserId, quality: i32) {
        self.password_quality.insert(user, quality);
    }

    pub(crate) fn permission_policy(&self, user: UserId) -> i32 {
        self.permission_policy
            .get(&user)
            .copied()
            .unwrap_or(PermissionPolicy::DEFAULT.code())
    }

    pub(crate) fn set_permission_policy(&mut self, user: UserId, policy: i32) {
        self.permission_policy.insert(user, policy);
    }

    pub(crate) fn can_grant_sensors_permissions(&self, user: UserId) -> bool {
        self.can_grant_sensors_permissions
            .get(&user)
            .copied()
            .unwrap_or(false)
    }

    pub(crate) fn set_can_grant_sensors_permissions(&mut self, user: UserId, can_grant: bool) {
        self.can_grant_sensors_permissions.insert(user, can_grant);
    }

    // -----------------------------------------------------------------------
    // Snapshot
    // -----------------------------------------------------------------------

    /// Owned, sorted copy of every field.  Nothing in the result borrows from
    /// `self`.
    pub(crate) fn snapshot(&self) -> PolicySnapshot {
        PolicySnapshot {
            screen_capture_disallowed_user: self.screen_capture_disallowed_user,
            screen_capture_disallowed: self.screen_capture_disallowed.iter().copied().collect(),
            password_quality: self
                .password_quality
                .iter()
                .map(|(k, v)| (*k, *v))
                .collect(),
            permission_policy: self
                .permission_policy
                .iter()
                .map(|(k, v)| (*k, *v))
                .collect(),
            can_grant_sensors_permissions: self
                .can_grant_sensors_permissions
                .iter()
                .map(|(k, v)| (*k, *v))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::{USER_ALL, USER_NULL};

    #[test]
    fn absent_users_read_defaults() {
        let state = PolicyState::default();
        assert_eq!(state.password_quality(UserId(3)), 0);
        assert_eq!(state.permission_policy(UserId(3)), 0);
        assert!(!state.can_grant_sensors_permissions(UserId(3)));
        assert_eq!(state.screen_capture_disallowed_user(), UserHandle::Null);
    }

    #[test]
    fn remove_user_reports_whether_anything_was_dropped() {
        let mut state = PolicyState::with_user_capacity(4);
        state.set_permission_policy(UserId(1), 2);
        assert!(state.remove_user(UserId(1)));
        assert!(!state.remove_user(UserId(1)));
        assert_eq!(state.permission_policy(UserId(1)), 0);
    }

    #[test]
    fn remove_user_keeps_screen_capture_fields() {
        let mut state = PolicyState::default();
        let user = UserHandle::User(UserId(5));
        state.set_screen_capture_disallowed_user(user);
        state.set_screen_capture_disallowed(user, true);
        state.set_password_quality(UserId(5), 0x2_0000);

        state.remove_user(UserId(5));

        assert_eq!(state.screen_capture_disallowed_user(), user);
        assert!(!state.is_screen_capture_allowed(user));
    }

    #[test]
    fn membership_change_is_reported() {
        let mut state = PolicyState::default();
        let user = UserHandle::User(UserId(2));
        assert!(state.set_screen_capture_disallowed(user, true));
        assert!(!state.set_screen_capture_disallowed(user, true));
        assert!(state.set_screen_capture_disallowed(user, false));
        assert!(!state.set_screen_capture_disallowed(user, false));
    }

    #[test]
    fn all_sentinel_blocks_every_user() {
        let mut state = PolicyState::default();
        state.set_screen_capture_disallowed(UserHandle::All, true);
        assert!(!state.is_screen_capture_allowed(UserHandle::User(UserId(0))));
        assert!(!state.is_screen_capture_allowed(UserHandle::User(UserId(42))));
    }

    #[test]
    fn user_wrapping_all_sentinel_blocks_everyone() {
        let mut state = PolicyState::default();
        state.set_screen_capture_disallowed(UserHandle::User(UserId(USER_ALL)), true);
        assert!(!state.is_screen_capture_allowed(UserHandle::User(UserId(0))));
        assert!(state.snapshot().screen_capture_disallowed.contains(&UserHandle::All));

        assert!(state.set_screen_capture_disallowed(UserHandle::All, false));
        assert!(state.is_screen_capture_allowed(UserHandle::User(UserId(0))));
    }

    #[test]
    fn marker_is_stored_canonically() {
        let mut state = PolicyState::default();
        state.set_screen_capture_disallowed_user(UserHandle::User(UserId(USER_NULL)));
        assert_eq!(state.screen_capture_disallowed_user(), UserHandle::Null);
    }

    #[test]
    fn snapshot_is_sorted() {
        let mut state = PolicyState::default();
        for id in [9, 1, 5] {
            state.set_password_quality(UserId(id), id);
        }
        let snap = state.snapshot();
        let keys: Vec<i32> = snap.password_quality.keys().map(|u| u.0).collect();
        assert_eq!(keys, vec![1, 5, 9]);
    }
}
