// src/recording/clock.rs
//! Timestamp domains
//!
//! - [`RealTime`]: host nanoseconds since the collector's first timestamp
//!   request, read from `CLOCK_MONOTONIC`
//! - [`SimTime`]: model time in picoseconds, supplied by the kernel through
//!   a [`SimClock`]

use nix::time::{clock_gettime, ClockId};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::error;

const NANOS_PER_SEC: u64 = 1_000_000_000;
const PICOS_PER_NANO: u64 = 1_000;

/// Real (host) time in nanoseconds since the collector's epoch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RealTime(u64);

impl RealTime {
    pub const fn from_nanos(nanos: u64) -> Self {
        Self(nanos)
    }

    pub const fn as_nanos(self) -> u64 {
        self.0
    }

    pub fn as_duration(self) -> Duration {
        Duration::from_nanos(self.0)
    }
}

impl fmt::Display for RealTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ns", self.0)
    }
}

/// Simulated time in picoseconds since the simulation epoch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimTime(u64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0);

    pub const fn from_picos(picos: u64) -> Self {
        Self(picos)
    }

    /// Saturates at `u64::MAX` picoseconds
    pub const fn from_nanos(nanos: u64) -> Self {
        Self(nanos.saturating_mul(PICOS_PER_NANO))
    }

    pub const fn as_picos(self) -> u64 {
        self.0
    }
}

impl Add for SimTime {
    type Output = SimTime;

    fn add(self, rhs: SimTime) -> SimTime {
        SimTime(self.0.saturating_add(rhs.0))
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ps", self.0)
    }
}

/// Source of simulated time, implemented by the kernel binding
pub trait SimClock: Send + Sync {
    /// Current simulated time
    fn now(&self) -> SimTime;
}

impl<F> SimClock for F
where
    F: Fn() -> SimTime + Send + Sync,
{
    fn now(&self) -> SimTime {
        self()
    }
}

/// Simulated clock driven by hand; for hosts without a kernel clock and for tests
#[derive(Debug, Default)]
pub struct ManualSimClock {
    picos: AtomicU64,
}

impl ManualSimClock {
    pub fn new(start: SimTime) -> Self {
        Self {
            picos: AtomicU64::new(start.as_picos()),
        }
    }

    pub fn set(&self, time: SimTime) {
        self.picos.store(time.as_picos(), Ordering::Release);
    }

    /// Move the clock forward and return the new time
    pub fn advance(&self, delta: SimTime) -> SimTime {
        let step = delta.as_picos();
        let previous = match self.picos.fetch_update(Ordering::AcqRel, Ordering::Acquire, |p| {
            Some(p.saturating_add(step))
        }) {
            Ok(previous) | Err(previous) => previous,
        };
        SimTime::from_picos(previous.saturating_add(step))
    }
}

impl SimClock for ManualSimClock {
    fn now(&self) -> SimTime {
        SimTime::from_picos(self.picos.load(Ordering::Acquire))
    }
}

/// Monotonic real-time clock with a lazily fixed epoch.
///
/// The epoch is the first reading taken through [`now`](Self::now), so the
/// first timestamp of a run is close to zero.
#[derive(Debug, Default)]
pub struct MonotonicClock {
    epoch_ns: OnceCell<u64>,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            epoch_ns: OnceCell::new(),
        }
    }

    /// Nanoseconds since this clock's epoch
    pub fn now(&self) -> RealTime {
        let raw = read_monotonic_ns();
        let epoch = *self.epoch_ns.get_or_init(|| raw);
        RealTime(raw.saturating_sub(epoch))
    }
}

/// Read `CLOCK_MONOTONIC`.
///
/// Without a monotonic clock no timestamp is meaningful, so failure
/// terminates the process.
fn read_monotonic_ns() -> u64 {
    match clock_gettime(ClockId::CLOCK_MONOTONIC) {
        Ok(ts) => (ts.tv_sec() as u64) * NANOS_PER_SEC + ts.tv_nsec() as u64,
        Err(errno) => {
            error!("clock_gettime(CLOCK_MONOTONIC) failed: {}", errno);
            eprintln!("simtrace: clock_gettime(CLOCK_MONOTONIC) failed: {}", errno);
            std::process::exit(1);
        }
    }
}
