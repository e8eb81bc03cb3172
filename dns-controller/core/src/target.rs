use crate::RecordType;
use std::net::{Ipv4Addr, Ipv6Addr};

/// The address family of a raw record target.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AddressFamily {
    Ipv4,
    Ipv6,
    Hostname,
}

// === impl AddressFamily ===

impl AddressFamily {
    /// Families in the order their records are emitted.
    pub const ALL: [Self; 3] = [Self::Ipv4, Self::Ipv6, Self::Hostname];

    /// Classifies a target as a dotted-quad, a colon-form address, or
    /// anything else. DNS name syntax is not validated.
    pub fn classify(target: &str) -> Self {
        if target.parse::<Ipv4Addr>().is_ok() {
            Self::Ipv4
        } else if target.parse::<Ipv6Addr>().is_ok() {
            Self::Ipv6
        } else {
            Self::Hostname
        }
    }

    pub fn record_type(self) -> RecordType {
        match self {
            Self::Ipv4 => RecordType::A,
            Self::Ipv6 => RecordType::Aaaa,
            Self::Hostname => RecordType::Cname,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Self::Ipv4 => 0,
            Self::Ipv6 => 1,
            Self::Hostname => 2,
        }
    }
}

impl RecordType {
    /// The address family this record type's targets must belong to, if the
    /// record type holds addresses at all.
    pub fn address_family(self) -> Option<AddressFamily> {
        match self {
            Self::A => Some(AddressFamily::Ipv4),
            Self::Aaaa => Some(AddressFamily::Ipv6),
            Self::Cname => Some(AddressFamily::Hostname),
            _ => None,
        }
    }
}
