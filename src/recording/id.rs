// src/recording/id.rs
//! Object identifiers
//!
//! Every kernel entity (module, process, port, event, channel) is named by
//! an [`ObjectId`]. Ids come from an [`IdGenerator`] owned by the collector,
//! start at 1 and are never reused.

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Opaque handle naming a kernel-side entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(u64);

impl ObjectId {
    /// Wrap a raw id value
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw id value
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Thread-safe identifier generator.
///
/// After `k` calls to [`next`](Self::next) from any number of threads the
/// returned values are exactly `1..=k`.
#[derive(Debug)]
pub struct IdGenerator {
    next: AtomicU64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// Issue a fresh id
    pub fn next(&self) -> ObjectId {
        ObjectId(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// Number of ids issued so far
    pub fn issued(&self) -> u64 {
        self.next.load(Ordering::Relaxed) - 1
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Id slot embedded in a kernel object, assigned on first use.
///
/// Concurrent first uses agree on a single id; the losing callers' ids are
/// never issued.
#[derive(Debug, Default)]
pub struct LazyObjectId {
    cell: OnceCell<ObjectId>,
}

impl LazyObjectId {
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// Return the id, issuing one from `ids` if none was assigned yet
    pub fn get_or_assign(&self, ids: &IdGenerator) -> ObjectId {
        *self.cell.get_or_init(|| ids.next())
    }

    /// The id, if already assigned
    pub fn get(&self) -> Option<ObjectId> {
        self.cell.get().copied()
    }
}
