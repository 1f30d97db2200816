//! A thread-safe, in-memory cache of per-user device policy facts.
//!
//! The policy manager pushes values in; permission checks and UI checks read
//! them on hot paths without querying the authoritative policy store.  See
//! [`PolicyCache`] for the full contract.

mod builder;
mod cache;
mod codes;
mod dump;
mod metrics;
mod reader;
mod store;
mod user;
pub mod listener;

pub use builder::PolicyCacheBuilder;
pub use cache::PolicyCache;
pub use codes::{CodeError, PasswordQuality, PermissionPolicy};
pub use dump::{IndentWriter, PolicySnapshot};
pub use listener::{ChangeListener, PolicyChange, UserLifecycle};
pub use metrics::stats::Metrics;
pub use reader::{EmptyPolicyReader, PolicyReader};
pub use user::{UserHandle, UserId, USER_ALL, USER_NULL};
