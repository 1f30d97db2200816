//! User identifiers and the reserved "no user" / "all users" sentinels.
//!
//! Collaborators exchange users as plain `i32` values, with two reserved
//! values carrying special meaning.  Inside the cache those sentinels are
//! lifted into [`UserHandle`] so they can never be confused with a real id.

use std::fmt;

/// Raw value of the "no user" sentinel.
pub const USER_NULL: i32 = -10_000;

/// Raw value of the "all users" sentinel.
pub const USER_ALL: i32 = -1;

/// An integer handle identifying a user account or profile.
///
/// No validation is performed: any `i32` is accepted and simply becomes a
/// cache key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub i32);

impl UserId {
    #[inline]
    pub fn raw(self) -> i32 {
        self.0
    }
}

impl From<i32> for UserId {
    fn from(raw: i32) -> Self {
        UserId(raw)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// UserHandle
// ---------------------------------------------------------------------------

/// A user, or one of the two sentinels used by the screen-capture fields.
///
/// Ordering places `Null` first, then `All`, then concrete users by id.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UserHandle {
    /// No user selected.
    #[default]
    Null,
    /// Applies to every user.
    All,
    /// A concrete user.
    User(UserId),
}

impl UserHandle {
    /// Decodes a raw handle.  The reserved values map to the sentinels;
    /// everything else is a concrete user.
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            USER_NULL => UserHandle::Null,
            USER_ALL => UserHandle::All,
            id => UserHandle::User(UserId(id)),
        }
    }

    pub fn as_raw(self) -> i32 {
        match self {
            UserHandle::Null => USER_NULL,
            UserHandle::All => USER_ALL,
            UserHandle::User(id) => id.0,
        }
    }

    /// Re-decodes through the raw value, so `User(UserId(USER_ALL))` becomes
    /// `All` and `User(UserId(USER_NULL))` becomes `Null`.
    #[inline]
    pub fn canonical(self) -> Self {
        UserHandle::from_raw(self.as_raw())
    }

    pub fn is_null(self) -> bool {
        matches!(self, UserHandle::Null)
    }
}

impl From<UserId> for UserHandle {
    /// Goes through [`UserHandle::from_raw`], so a raw sentinel wrapped in a
    /// `UserId` keeps its sentinel meaning.
    fn from(id: UserId) -> Self {
        UserHandle::from_raw(id.0)
    }
}

impl From<i32> for UserHandle {
    fn from(raw: i32) -> Self {
        UserHandle::from_raw(raw)
    }
}

impl From<UserHandle> for i32 {
    fn from(handle: UserHandle) -> Self {
        handle.as_raw()
    }
}

impl fmt::Display for UserHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserHandle::Null => f.write_str("NULL"),
            UserHandle::All => f.write_str("ALL"),
            UserHandle::User(id) => write!(f, "{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_decode_to_tagged_variants() {
        assert_eq!(UserHandle::from_raw(USER_NULL), UserHandle::Null);
        assert_eq!(UserHandle::from_raw(USER_ALL), UserHandle::All);
        assert_eq!(UserHandle::from_raw(0), UserHandle::User(UserId(0)));
        assert_eq!(UserHandle::from_raw(-2), UserHandle::User(UserId(-2)));
    }

    #[test]
    fn raw_value_survives_decode() {
        for raw in [USER_NULL, USER_ALL, 0, 10, -2, i32::MIN, i32::MAX] {
            assert_eq!(UserHandle::from_raw(raw).as_raw(), raw);
        }
    }

    #[test]
    fn user_id_carrying_sentinel_keeps_its_meaning() {
        assert_eq!(UserHandle::from(UserId(USER_ALL)), UserHandle::All);
        assert_eq!(UserHandle::from(UserId(7)), UserHandle::User(UserId(7)));
    }

    #[test]
    fn canonical_folds_sentinel_ids_into_variants() {
        assert_eq!(UserHandle::User(UserId(USER_ALL)).canonical(), UserHandle::All);
        assert_eq!(UserHandle::User(UserId(USER_NULL)).canonical(), UserHandle::Null);
        assert_eq!(UserHandle::User(UserId(3)).canonical(), UserHandle::User(UserId(3)));
        assert_eq!(UserHandle::All.canonical(), UserHandle::All);
    }

    #[test]
    fn default_handle_is_null() {
        assert!(UserHandle::default().is_null());
    }

    #[test]
    fn display_names_sentinels() {
        assert_eq!(UserHandle::Null.to_string(), "NULL");
        assert_eq!(UserHandle::All.to_string(), "ALL");
        assert_eq!(UserHandle::User(UserId(11)).to_string(), "11");
    }
}
