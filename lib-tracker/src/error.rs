use core::fmt;

/// Boot failures the tracker cannot recover from, the firmware answers every one of them with a
/// reset.
/// 
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerError {
    /// No DHCP lease. The DHCP flag has already been cleared in the store, so the next boot
    /// comes up on the static address.
    DhcpFailed,

    /// The interface could not be configured with the static address.
    LinkFailed,

    /// The service socket could not be bound to the given port.
    BindFailed(u16),
}

impl fmt::Display for TrackerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DhcpFailed => write!(f, "DHCP failed, falling back to static address"),
            Self::LinkFailed => write!(f, "failed to bring up network link"),
            Self::BindFailed(port) => write!(f, "failed to bind UDP port {}", port),
        }
    }
}

impl core::error::Error for TrackerError {}
