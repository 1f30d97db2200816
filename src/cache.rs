use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::builder::PolicyCacheBuilder;
use crate::dump::{IndentWriter, PolicySnapshot};
use crate::listener::{ChangeListener, PolicyChange, UserLifecycle};
use crate::metrics::stats::{Metrics, StatsCounter};
use crate::reader::PolicyReader;
use crate::store::PolicyState;
use crate::user::{UserHandle, UserId};

// ---------------------------------------------------------------------------
// Cache interior
// ---------------------------------------------------------------------------

/// Shared interior of a [`PolicyCache`].
pub(crate) struct Inner {
    /// The only lock.  Every field of the cached policy lives behind it, so
    /// no reader can observe one field updated and another not, and there is
    /// no lock ordering to get wrong.
    pub(crate) state: Mutex<PolicyState>,
    /// Optional change listener.  `None` if the user didn't register one.
    pub(crate) listener: Option<Box<dyn ChangeListener>>,
    pub(crate) metrics: StatsCounter,
}

// ---------------------------------------------------------------------------
// Cache handle
// ---------------------------------------------------------------------------

/// A thread-safe, in-memory cache of per-user device policy facts.
///
/// The policy manager pushes values in through the setters; permission and UI
/// checks read them back without touching the authoritative store.  Every
/// operation is total: unknown users read as defaults and any `i32` is a
/// valid key or code.
///
/// Cloning is cheap and every clone shares the same state.  Construct one at
/// service start and hand clones (or an `Arc<dyn PolicyReader>`) to callers.
///
/// # Example
/// ```
/// use policy_cache::{PolicyCache, PermissionPolicy, UserHandle, UserId};
///
/// let cache = PolicyCache::new();
/// assert_eq!(cache.permission_policy(UserId(0)), PermissionPolicy::Prompt.code());
///
/// cache.set_permission_policy(UserId(0), PermissionPolicy::AutoDeny.into());
/// assert_eq!(cache.permission_policy(UserId(0)), 2);
///
/// cache.set_screen_capture_disallowed(UserHandle::All, true);
/// assert!(!cache.is_screen_capture_allowed(UserId(0).into()));
/// ```
pub struct PolicyCache {
    inner: Arc<Inner>,
}

impl Clone for PolicyCache {
    fn clone(&self) -> Self {
        PolicyCache {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Default for PolicyCache {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PolicyCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolicyCache")
            .field("has_listener", &self.inner.listener.is_some())
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

impl PolicyCache {
    /// An empty cache with default configuration.
    pub fn new() -> Self {
        PolicyCacheBuilder::new().build()
    }

    pub(crate) fn from_parts(
        user_capacity: usize,
        listener: Option<Box<dyn ChangeListener>>,
    ) -> Self {
        PolicyCache {
            inner: Arc::new(Inner {
                state: Mutex::new(PolicyState::with_user_capacity(user_capacity)),
                listener,
                metrics: StatsCounter::new(),
            }),
        }
    }

    /// Returns a [`PolicyCacheBuilder`] for constructing a new cache.
    pub fn builder() -> PolicyCacheBuilder {
        PolicyCacheBuilder::new()
    }

    // -----------------------------------------------------------------------
    // Lock helpers
    // -----------------------------------------------------------------------

    #[inline]
    fn read<R>(&self, f: impl FnOnce(&PolicyState) -> R) -> R {
        self.inner.metrics.record_read();
        f(&*self.inner.state.lock())
    }

    #[inline]
    fn write<R>(&self, f: impl FnOnce(&mut PolicyState) -> R) -> R {
        self.inner.metrics.record_write();
        f(&mut *self.inner.state.lock())
    }

    /// Fires the listener, if any.  Must be called with the lock released.
    #[inline]
    fn notify(&self, change: PolicyChange) {
        if let Some(listener) = &self.inner.listener {
            listener.on_change(&change);
        }
    }

    // -----------------------------------------------------------------------
    // User lifecycle
    // -----------------------------------------------------------------------

    /// Forgets `user`'s password quality, permission policy and sensor grant
    /// setting.  Idempotent.
    ///
    /// The two screen-capture fields are keyed differently and are **not**
    /// touched here.
    pub fn on_user_removed(&self, user: UserId) {
        self.inner.metrics.record_user_removal();
        let had_entries = self.inner.state.lock().remove_user(user);
        debug!(user = user.raw(), had_entries, "dropped cached policy for removed user");
        self.notify(PolicyChange::UserRemoved(user));
    }

    // -----------------------------------------------------------------------
    // Screen capture
    // -----------------------------------------------------------------------

    /// `true` unless `user` or [`UserHandle::All`] is in the disallowed set.
    pub fn is_screen_capture_allowed(&self, user: UserHandle) -> bool {
        self.read(|s| s.is_screen_capture_allowed(user))
    }

    /// The single-value marker.  [`UserHandle::Null`] until first set.
    pub fn screen_capture_disallowed_user(&self) -> UserHandle {
        self.read(|s| s.screen_capture_disallowed_user())
    }

    /// Overwrites the single-value marker.  Does not touch the disallowed set.
    pub fn set_screen_capture_disallowed_user(&self, user: UserHandle) {
        let user = user.canonical();
        self.write(|s| s.set_screen_capture_disallowed_user(user));
        debug!(user = %user, "screen capture disallowed user updated");
        self.notify(PolicyChange::ScreenCaptureDisallowedUser(user));
    }

    /// Adds `user` to (or removes it from) the disallowed set.  Idempotent
    /// in both directions.  Does not touch the single-value marker.
    pub fn set_screen_capture_disallowed(&self, user: UserHandle, disallowed: bool) {
        let user = user.canonical();
        let changed = self.write(|s| s.set_screen_capture_disallowed(user, disallowed));
        debug!(user = %user, disallowed, changed, "screen capture disallowed set updated");
        self.notify(PolicyChange::ScreenCaptureDisallowed { user, disallowed });
    }

    // -----------------------------------------------------------------------
    // Password quality
    // -----------------------------------------------------------------------

    /// Raw quality code for `user`, or
    /// [`PasswordQuality::DEFAULT`](crate::PasswordQuality::DEFAULT) if none.
    pub fn password_quality(&self, user: UserId) -> i32 {
        self.read(|s| s.password_quality(user))
    }

    pub fn set_password_quality(&self, user: UserId, quality: i32) {
        self.write(|s| s.set_password_quality(user, quality));
        trace!(user = user.raw(), quality, "password quality updated");
        self.notify(PolicyChange::PasswordQuality { user, quality });
    }

    // -----------------------------------------------------------------------
    // Permission policy
    // -----------------------------------------------------------------------

    /// Raw policy code for `user`, or
    /// [`PermissionPolicy::DEFAULT`](crate::PermissionPolicy::DEFAULT) if none.
    pub fn permission_policy(&self, user: UserId) -> i32 {
        self.read(|s| s.permission_policy(user))
    }

    pub fn set_permission_policy(&self, user: UserId, policy: i32) {
        self.write(|s| s.set_permission_policy(user, policy));
        trace!(user = user.raw(), policy, "permission policy updated");
        self.notify(PolicyChange::PermissionPolicy { user, policy });
    }

    // -----------------------------------------------------------------------
    // Sensor permission grants
    // -----------------------------------------------------------------------

    pub fn can_admin_grant_sensors_permissions_for_user(&self, user: UserId) -> bool {
        self.read(|s| s.can_grant_sensors_permissions(user))
    }

    pub fn set_admin_can_grant_sensors_permissions(&self, user: UserId, can_grant: bool) {
        self.write(|s| s.set_can_grant_sensors_permissions(user, can_grant));
        trace!(user = user.raw(), can_grant, "sensor permission grant updated");
        self.notify(PolicyChange::AdminCanGrantSensorsPermissions { user, can_grant });
    }

    // -----------------------------------------------------------------------
    // Introspection
    // -----------------------------------------------------------------------

    /// Copies every field under a single lock acquisition.
    pub fn snapshot(&self) -> PolicySnapshot {
        self.read(|s| s.snapshot())
    }

    /// Writes a human-readable report of the cache into `out`.
    ///
    /// The contents are copied under the lock and formatted after it is
    /// released, so a slow sink never blocks writers.
    pub fn dump<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        let snapshot = self.snapshot();
        snapshot.write_to(&mut IndentWriter::new(out))
    }

    pub fn stats(&self) -> Metrics {
        self.inner.metrics.snapshot()
    }
}

impl PolicyReader for PolicyCache {
    fn is_screen_capture_allowed(&self, user: UserHandle) -> bool {
        PolicyCache::is_screen_capture_allowed(self, user)
    }

    fn password_quality(&self, user: UserId) -> i32 {
        PolicyCache::password_quality(self, user)
    }

    fn permission_policy(&self, user: UserId) -> i32 {
        PolicyCache::permission_policy(self, user)
    }

    fn can_admin_grant_sensors_permissions_for_user(&self, user: UserId) -> bool {
        PolicyCache::can_admin_grant_sensors_permissions_for_user(self, user)
    }
}

impl UserLifecycle for PolicyCache {
    fn on_user_removed(&self, user: UserId) {
        PolicyCache::on_user_removed(self, user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_call_counts_once() {
        let cache = PolicyCache::new();
        cache.set_password_quality(UserId(1), 0x2_0000);
        cache.password_quality(UserId(1));
        cache.is_screen_capture_allowed(UserHandle::All);
        cache.on_user_removed(UserId(1));
        cache.on_user_removed(UserId(1));

        let stats = cache.stats();
        assert_eq!(stats.writes, 1);
        assert_eq!(stats.reads, 2);
        assert_eq!(stats.user_removals, 2);
    }

    #[test]
    fn dump_nests_inside_caller_indent() {
        let cache = PolicyCache::new();
        cache.set_admin_can_grant_sensors_permissions(UserId(0), true);

        let mut w = IndentWriter::new(String::new()).with_level(1);
        cache.snapshot().write_to(&mut w).unwrap();
        let text = w.into_inner();

        assert!(text.starts_with("  Device policy cache:\n"), "{text}");
        assert!(
            text.contains("\n    Admin can grant sensors permission: {0=true}\n"),
            "{text}"
        );
    }
}
