//! Diagnostic rendering of the cache contents.
//!
//! # Example
//! ```
//! use policy_cache::{PolicyCache, UserId, PasswordQuality};
//!
//! let cache = PolicyCache::new();
//! cache.set_password_quality(UserId(10), PasswordQuality::Numeric.into());
//!
//! let mut out = String::new();
//! cache.dump(&mut out).unwrap();
//! assert!(out.contains("Password quality: {10=NUMERIC(131072)}"));
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Write};

use crate::codes::{PasswordQuality, PermissionPolicy};
use crate::user::{UserHandle, UserId};

// ---------------------------------------------------------------------------
// PolicySnapshot
// ---------------------------------------------------------------------------

/// An owned, point-in-time copy of everything in a
/// [`PolicyCache`](crate::PolicyCache).
///
/// All five fields are copied under one lock acquisition, so a snapshot never
/// mixes values from before and after a concurrent write.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PolicySnapshot {
    pub screen_capture_disallowed_user: UserHandle,
    pub screen_capture_disallowed: BTreeSet<UserHandle>,
    pub password_quality: BTreeMap<UserId, i32>,
    pub permission_policy: BTreeMap<UserId, i32>,
    pub can_grant_sensors_permissions: BTreeMap<UserId, bool>,
}

impl PolicySnapshot {
    /// Writes the indented report into `w`, starting at its current indent.
    pub fn write_to<W: Write>(&self, w: &mut IndentWriter<W>) -> fmt::Result {
        writeln!(w, "Device policy cache:")?;
        w.increase_indent();
        writeln!(
            w,
            "Screen capture disallowed user: {}",
            self.screen_capture_disallowed_user
        )?;
        write!(w, "Screen capture disallowed users: [")?;
        for (i, user) in self.screen_capture_disallowed.iter().enumerate() {
            if i > 0 {
                w.write_str(", ")?;
            }
            write!(w, "{user}")?;
        }
        writeln!(w, "]")?;

        write!(w, "Password quality: ")?;
        write_map(w, &self.password_quality, |w, code| {
            match PasswordQuality::try_from(*code) {
                Ok(q) => write!(w, "{q}({code})"),
                Err(_) => write!(w, "{code}"),
            }
        })?;

        write!(w, "Permission policy: ")?;
        write_map(w, &self.permission_policy, |w, code| {
            match PermissionPolicy::try_from(*code) {
                Ok(p) => write!(w, "{p}({code})"),
                Err(_) => write!(w, "{code}"),
            }
        })?;

        write!(w, "Admin can grant sensors permission: ")?;
        write_map(w, &self.can_grant_sensors_permissions, |w, v| write!(w, "{v}"))?;
        w.decrease_indent();
        Ok(())
    }
}

fn write_map<W, V, F>(
    w: &mut IndentWriter<W>,
    map: &BTreeMap<UserId, V>,
    mut value: F,
) -> fmt::Result
where
    W: Write,
    F: FnMut(&mut IndentWriter<W>, &V) -> fmt::Result,
{
    w.write_char('{')?;
    for (i, (user, v)) in map.iter().enumerate() {
        if i > 0 {
            w.write_str(", ")?;
        }
        write!(w, "{user}=")?;
        value(w, v)?;
    }
    w.write_str("}\n")
}

impl fmt::Display for PolicySnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(&mut IndentWriter::new(f))
    }
}

// ---------------------------------------------------------------------------
// IndentWriter
// ---------------------------------------------------------------------------

/// A [`fmt::Write`] adapter that prefixes every line with the current indent.
///
/// The prefix is emitted lazily, just before the first character of a line,
/// so blank trailing lines carry no whitespace.
pub struct IndentWriter<W> {
    inner: W,
    unit: &'static str,
    level: usize,
    at_line_start: bool,
}

impl<W: Write> IndentWriter<W> {
    /// Two-space indent unit, starting at level 0.
    pub fn new(inner: W) -> Self {
        IndentWriter {
            inner,
            unit: "  ",
            level: 0,
            at_line_start: true,
        }
    }

    pub fn with_unit(mut self, unit: &'static str) -> Self {
        self.unit = unit;
        self
    }

    /// Starts at `level` instead of 0, for nesting inside a larger report.
    pub fn with_level(mut self, level: usize) -> Self {
        self.level = level;
        self
    }

    pub fn increase_indent(&mut self) {
        self.level += 1;
    }

    pub fn decrease_indent(&mut self) {
        self.level = self.level.saturating_sub(1);
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for IndentWriter<W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for line in s.split_inclusive('\n') {
            if self.at_line_start && line != "\n" {
                for _ in 0..self.level {
                    self.inner.write_str(self.unit)?;
                }
            }
            self.inner.write_str(line)?;
            self.at_line_start = line.ends_with('\n');
        }
        Ok(())
    }
}
