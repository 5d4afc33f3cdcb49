//! Maps a probe onto the concrete command line for a platform
//!
//! Resolution is pure and total: every (kind, platform, mode) triple yields
//! either an argument vector or a skip marker, and the same triple always
//! yields the same answer.

use crate::defaults::{HOP_LIMIT, PING_PAYLOAD_BYTES, REFERENCE_HOST};
use crate::types::{Platform, ProbeKind, TestMode};

/// Placeholder reported instead of running a probe that needs elevated privileges
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipMarker {
    text: &'static str,
}

impl SkipMarker {
    pub fn text(&self) -> &'static str {
        self.text
    }
}

/// Outcome of resolving a probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Program followed by its arguments
    Command(Vec<String>),
    /// The probe is reported, not executed
    Skip(SkipMarker),
}

impl Resolution {
    pub fn argv(&self) -> Option<&[String]> {
        match self {
            Resolution::Command(argv) => Some(argv),
            Resolution::Skip(_) => None,
        }
    }
}

fn skip(text: &'static str) -> Resolution {
    Resolution::Skip(SkipMarker { text })
}

fn command(parts: &[&str]) -> Resolution {
    Resolution::Command(parts.iter().map(|part| part.to_string()).collect())
}

/// Resolve the command line for `kind` on `platform`.
///
/// `mode` only influences the latency probe's repetition count.
pub fn resolve(kind: ProbeKind, platform: Platform, mode: TestMode) -> Resolution {
    let count = mode.ping_count().to_string();
    let payload = PING_PAYLOAD_BYTES.to_string();
    let hops = HOP_LIMIT.to_string();

    match platform {
        Platform::Windows => match kind {
            ProbeKind::Configuration => command(&["ipconfig", "/all"]),
            ProbeKind::Latency => {
                command(&["ping", "-n", &count, "-l", &payload, REFERENCE_HOST])
            }
            ProbeKind::PathTrace => command(&["tracert", "-h", &hops, REFERENCE_HOST]),
            ProbeKind::DnsFlush => command(&["ipconfig", "/flushdns"]),
            ProbeKind::DnsRegister => command(&["ipconfig", "/registerdns"]),
            ProbeKind::DhcpRelease => command(&["ipconfig", "/release"]),
            ProbeKind::DhcpRenew => command(&["ipconfig", "/renew"]),
            ProbeKind::SocketReset => command(&["netsh", "winsock", "reset"]),
        },
        Platform::UnixLike => match kind {
            ProbeKind::Configuration => command(&["ifconfig", "-a"]),
            ProbeKind::Latency => {
                command(&["ping", "-c", &count, "-s", &payload, REFERENCE_HOST])
            }
            ProbeKind::PathTrace => command(&["traceroute", "-m", &hops, REFERENCE_HOST]),
            ProbeKind::DnsFlush => skip(
                "\nDNS flush command skipped: requires elevated privileges on this platform",
            ),
            ProbeKind::DnsRegister => skip(
                "\nDNS registration command skipped: requires elevated privileges on this platform",
            ),
            ProbeKind::DhcpRelease => {
                skip("\nRelease command skipped: requires elevated privileges on this platform")
            }
            ProbeKind::DhcpRenew => {
                skip("\nRenew command skipped: requires elevated privileges on this platform")
            }
            ProbeKind::SocketReset => skip(
                "\nSocket reset command skipped: requires elevated privileges on this platform",
            ),
        },
    }
}
