// src/recording/meta.rs
//! Run metadata and environment introspection
//!
//! Every lookup is best effort. Failures degrade to [`UNKNOWN`] or
//! [`UNKNOWN_PID`] and are never reported as errors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel for an unavailable executable path or user name
pub const UNKNOWN: &str = "unknown";

/// Sentinel for an unavailable process id
pub const UNKNOWN_PID: i64 = -1;

/// Metadata describing the traced process, delivered once per session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaInfo {
    /// Path of the running executable
    pub path: String,

    /// Login name of the user running the simulation
    pub user: String,

    /// Version string of the traced component
    pub version: String,

    /// Wall-clock time the metadata was captured
    pub created_at: DateTime<Utc>,

    /// OS process id, or [`UNKNOWN_PID`]
    pub pid: i64,
}

impl MetaInfo {
    /// Capture metadata now
    pub fn capture(env: &dyn EnvironmentInfo, version: &str) -> Self {
        Self {
            path: env.executable_path(),
            user: env.user_name(),
            version: version.to_string(),
            created_at: Utc::now(),
            pid: env.process_id(),
        }
    }
}

/// Source of host identity information
pub trait EnvironmentInfo: Send + Sync {
    /// Absolute path of the running executable, or [`UNKNOWN`]
    fn executable_path(&self) -> String;

    /// Login name of the current user, or [`UNKNOWN`]
    fn user_name(&self) -> String;

    /// Current process id, or [`UNKNOWN_PID`]
    fn process_id(&self) -> i64;
}

/// Environment that knows nothing; every lookup yields its sentinel
#[derive(Debug, Clone, Copy, Default)]
pub struct UnknownEnvironment;

impl EnvironmentInfo for UnknownEnvironment {
    fn executable_path(&self) -> String {
        UNKNOWN.to_string()
    }

    fn user_name(&self) -> String {
        UNKNOWN.to_string()
    }

    fn process_id(&self) -> i64 {
        UNKNOWN_PID
    }
}

/// Linux implementation backed by procfs and libc
#[cfg(target_os = "linux")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LinuxEnvironment;

// Not exported by the libc crate
#[cfg(target_os = "linux")]
extern "C" {
    fn getlogin_r(buf: *mut libc::c_char, len: libc::size_t) -> libc::c_int;
}

#[cfg(target_os = "linux")]
impl LinuxEnvironment {
    fn login_name() -> Option<String> {
        let mut buf = [0 as libc::c_char; 256];
        // SAFETY: the buffer is valid for `buf.len()` bytes and we pass one
        // less so the result is always NUL terminated.
        let rc = unsafe { getlogin_r(buf.as_mut_ptr(), buf.len() - 1) };
        if rc != 0 {
            return None;
        }

        // SAFETY: getlogin_r succeeded, so `buf` holds a NUL-terminated string.
        let name = unsafe { std::ffi::CStr::from_ptr(buf.as_ptr()) };
        let name = name.to_string_lossy().into_owned();
        (!name.is_empty()).then_some(name)
    }
}

#[cfg(target_os = "linux")]
impl EnvironmentInfo for LinuxEnvironment {
    fn executable_path(&self) -> String {
        std::fs::read_link("/proc/self/exe")
            .map(|path| path.to_string_lossy().into_owned())
            .unwrap_or_else(|_| UNKNOWN.to_string())
    }

    fn user_name(&self) -> String {
        Self::login_name()
            .or_else(|| std::env::var("USER").ok().filter(|user| !user.is_empty()))
            .unwrap_or_else(|| UNKNOWN.to_string())
    }

    fn process_id(&self) -> i64 {
        i64::from(nix::unistd::getpid().as_raw())
    }
}

/// Environment implementation for the current target
#[cfg(target_os = "linux")]
pub type SystemEnvironment = LinuxEnvironment;

/// Environment implementation for the current target
#[cfg(not(target_os = "linux"))]
pub type SystemEnvironment = UnknownEnvironment;
