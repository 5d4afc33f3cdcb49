//! Type definitions and aliases

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// Operating system family the probe commands are resolved for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    /// Windows command set (`ipconfig`, `tracert`, `netsh`)
    Windows,
    /// Everything else (`ifconfig`, `traceroute`); maintenance probes are skipped
    UnixLike,
}

impl Platform {
    pub fn name(&self) -> &'static str {
        match self {
            Platform::Windows => "windows",
            Platform::UnixLike => "unix-like",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How long the latency probe runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TestMode {
    /// Quick test: 10 echo requests
    #[default]
    Basic,
    /// Full test: 1000 echo requests
    Comprehensive,
}

impl TestMode {
    /// Interpret the prompt-mode answer: only an exact `yes` selects the full test
    pub fn from_prompt_answer(answer: &str) -> Self {
        if answer.trim_end_matches(['\r', '\n']) == "yes" {
            TestMode::Comprehensive
        } else {
            TestMode::Basic
        }
    }

    /// Number of echo requests sent by the latency probe
    pub fn ping_count(&self) -> u32 {
        match self {
            TestMode::Basic => crate::defaults::BASIC_PING_COUNT,
            TestMode::Comprehensive => crate::defaults::COMPREHENSIVE_PING_COUNT,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TestMode::Basic => "basic",
            TestMode::Comprehensive => "comprehensive",
        }
    }
}

impl fmt::Display for TestMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TestMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "basic" | "quick" => Ok(TestMode::Basic),
            "comprehensive" | "full" => Ok(TestMode::Comprehensive),
            _ => Err(AppError::parse(format!("Invalid test mode: {}", s))),
        }
    }
}

/// One diagnostic or maintenance command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProbeKind {
    /// Adapter configuration dump
    Configuration,
    /// Echo requests at maximum unfragmented payload size
    Latency,
    /// Route to the reference host, hop-limited
    PathTrace,
    DnsFlush,
    DnsRegister,
    DhcpRelease,
    DhcpRenew,
    SocketReset,
}

impl ProbeKind {
    /// The read-only probes of a diagnostic run, in execution order
    pub const DIAGNOSTIC_SEQUENCE: [ProbeKind; 3] =
        [ProbeKind::Configuration, ProbeKind::Latency, ProbeKind::PathTrace];

    /// Maintenance probes, in execution order
    pub const MAINTENANCE_SEQUENCE: [ProbeKind; 5] = [
        ProbeKind::DhcpRelease,
        ProbeKind::DhcpRenew,
        ProbeKind::SocketReset,
        ProbeKind::DnsFlush,
        ProbeKind::DnsRegister,
    ];

    /// Whether running this probe changes host network state
    pub fn mutates_host(&self) -> bool {
        !matches!(self, ProbeKind::Configuration | ProbeKind::Latency | ProbeKind::PathTrace)
    }

    /// Short label used in progress output and logs
    pub fn label(&self) -> &'static str {
        match self {
            ProbeKind::Configuration => "Adapter configuration",
            ProbeKind::Latency => "Latency test",
            ProbeKind::PathTrace => "Route trace",
            ProbeKind::DnsFlush => "DNS flush",
            ProbeKind::DnsRegister => "DNS registration",
            ProbeKind::DhcpRelease => "DHCP release",
            ProbeKind::DhcpRenew => "DHCP renew",
            ProbeKind::SocketReset => "Socket reset",
        }
    }
}

impl fmt::Display for ProbeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which ordered list of probes a run executes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunSequence {
    /// Configuration, latency and path trace
    Diagnostic(TestMode),
    /// DHCP release/renew, socket reset, DNS flush/register
    Maintenance,
}

impl RunSequence {
    pub fn probes(&self) -> &'static [ProbeKind] {
        match self {
            RunSequence::Diagnostic(_) => &ProbeKind::DIAGNOSTIC_SEQUENCE,
            RunSequence::Maintenance => &ProbeKind::MAINTENANCE_SEQUENCE,
        }
    }

    /// Latency mode; maintenance runs never resolve a latency probe
    pub fn mode(&self) -> TestMode {
        match self {
            RunSequence::Diagnostic(mode) => *mode,
            RunSequence::Maintenance => TestMode::Basic,
        }
    }

    /// Whether a settle delay separates `kind` from the probe before it
    pub fn settles_before(&self, kind: ProbeKind) -> bool {
        match self {
            RunSequence::Diagnostic(_) => false,
            // DNS flush starts a new sub-sequence; it only follows socket reset by order
            RunSequence::Maintenance => {
                kind.mutates_host() && !matches!(kind, ProbeKind::DhcpRelease | ProbeKind::DnsFlush)
            }
        }
    }
}

/// Whether a probe spawned a process or was substituted by a skip marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProbeOutcome {
    Executed,
    Skipped,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_answer_selects_mode() {
        assert_eq!(TestMode::from_prompt_answer("yes"), TestMode::Comprehensive);
        assert_eq!(TestMode::from_prompt_answer("yes\n"), TestMode::Comprehensive);
        assert_eq!(TestMode::from_prompt_answer("yes\r\n"), TestMode::Comprehensive);
        assert_eq!(TestMode::from_prompt_answer("no"), TestMode::Basic);
        assert_eq!(TestMode::from_prompt_answer("YES"), TestMode::Basic);
        assert_eq!(TestMode::from_prompt_answer(""), TestMode::Basic);
    }

    #[test]
    fn test_ping_count_by_mode() {
        assert_eq!(TestMode::Basic.ping_count(), 10);
        assert_eq!(TestMode::Comprehensive.ping_count(), 1000);
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("basic".parse::<TestMode>().unwrap(), TestMode::Basic);
        assert_eq!("Full".parse::<TestMode>().unwrap(), TestMode::Comprehensive);
        assert!("medium".parse::<TestMode>().is_err());
    }

    #[test]
    fn test_only_maintenance_probes_mutate_host() {
        for kind in ProbeKind::DIAGNOSTIC_SEQUENCE {
            assert!(!kind.mutates_host());
        }
        for kind in ProbeKind::MAINTENANCE_SEQUENCE {
            assert!(kind.mutates_host());
        }
    }

    #[test]
    fn test_settle_points() {
        let diagnostic = RunSequence::Diagnostic(TestMode::Basic);
        assert!(diagnostic.probes().iter().all(|kind| !diagnostic.settles_before(*kind)));

        let maintenance = RunSequence::Maintenance;
        let settles: Vec<bool> = maintenance
            .probes()
            .iter()
            .map(|kind| maintenance.settles_before(*kind))
            .collect();
        assert_eq!(settles, vec![false, true, true, false, true]);
    }
}
