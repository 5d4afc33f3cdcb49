//! Host platform detection
//!
//! Probe commands only come in two flavours. Any OS name that is not Windows
//! is treated as unix-like; names we do not recognize still fall back to the
//! unix-like command set, but the caller is told so it can log the decision.

use crate::types::Platform;

/// OS names (as reported by `std::env::consts::OS`) known to ship the
/// unix-like command set.
const KNOWN_UNIX_LIKE: &[&str] = &[
    "linux", "macos", "ios", "freebsd", "netbsd", "openbsd", "dragonfly", "solaris", "illumos",
    "android",
];

/// Result of mapping an OS name onto a [`Platform`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformDetection {
    /// Platform the probes will be resolved for
    pub platform: Platform,
    /// OS name as reported by the host
    pub os_name: String,
    /// False when `platform` is the unix-like fallback for an unknown name
    pub recognized: bool,
}

impl PlatformDetection {
    /// Detect the platform of the running host
    pub fn current() -> Self {
        Self::from_os_name(std::env::consts::OS)
    }

    /// Map an OS name onto a platform
    pub fn from_os_name(os_name: &str) -> Self {
        let normalized = os_name.trim().to_lowercase();
        let (platform, recognized) = if normalized == "windows" {
            (Platform::Windows, true)
        } else {
            (Platform::UnixLike, KNOWN_UNIX_LIKE.contains(&normalized.as_str()))
        };

        Self {
            platform,
            os_name: os_name.to_string(),
            recognized,
        }
    }

    /// Human-readable note for logs when the fallback was applied
    pub fn fallback_note(&self) -> Option<String> {
        if self.recognized {
            None
        } else {
            Some(format!(
                "Unrecognized operating system '{}'; using the {} command set",
                self.os_name, self.platform
            ))
        }
    }
}
