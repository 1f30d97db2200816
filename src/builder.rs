use crate::cache::PolicyCache;
use crate::listener::{ChangeListener, FnListener, PolicyChange};

/// Builder for configuring and constructing a [`PolicyCache`].
///
/// # Example
/// ```
/// use policy_cache::PolicyCacheBuilder;
///
/// let cache = PolicyCacheBuilder::new()
///     .user_capacity(16)
///     .build();
/// assert_eq!(cache.stats().operation_count(), 0);
/// ```
#[derive(Default)]
pub struct PolicyCacheBuilder {
    user_capacity: usize,
    listener: Option<Box<dyn ChangeListener>>,
}

impl PolicyCacheBuilder {
    pub fn new() -> Self {
        PolicyCacheBuilder {
            user_capacity: 0,
            listener: None,
        }
    }

    /// Pre-size the per-user maps for `n` users (default: 0).
    ///
    /// Only a hint; the maps grow as needed.
    pub fn user_capacity(mut self, n: usize) -> Self {
        self.user_capacity = n;
        self
    }

    /// Register a change listener closure.
    ///
    /// The closure is called **synchronously on the writing thread**, after
    /// the state lock has been released, once per setter or removal call.
    ///
    /// # Example
    /// ```
    /// use policy_cache::PolicyCacheBuilder;
    /// use policy_cache::listener::PolicyChange;
    ///
    /// let cache = PolicyCacheBuilder::new()
    ///     .change_listener(|change: &PolicyChange| {
    ///         println!("policy changed: {change:?}");
    ///     })
    ///     .build();
    /// ```
    pub fn change_listener<F>(mut self, f: F) -> Self
    where
        F: Fn(&PolicyChange) + Send + Sync + 'static,
    {
        self.listener = Some(Box::new(FnListener(f)));
        self
    }

    /// Register a change listener via the [`ChangeListener`] trait.
    pub fn change_listener_impl<L: ChangeListener>(mut self, l: L) -> Self {
        self.listener = Some(Box::new(l));
        self
    }

    pub fn build(self) -> PolicyCache {
        PolicyCache::from_parts(self.user_capacity, self.listener)
    }
}
