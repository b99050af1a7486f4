//! Platform definitions for multi-vendor support.
//!
//! A [`Platform`] selects which vendor driver and which
//! [`PlatformDefinition`] a connection uses.

mod definition;
pub mod vendors;

pub use definition::PlatformDefinition;

use std::fmt;
use std::str::FromStr;

use crate::error::PlatformError;

/// Supported device families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Cisco IOS and IOS-XE.
    CiscoIos,

    /// MikroTik RouterOS 7.
    MikrotikRouterOs,
}

impl Platform {
    /// Canonical platform name.
    pub fn name(&self) -> &'static str {
        match self {
            Platform::CiscoIos => "cisco_ios",
            Platform::MikrotikRouterOs => "mikrotik_routeros",
        }
    }

    /// The platform's definition.
    pub fn definition(&self) -> PlatformDefinition {
        match self {
            Platform::CiscoIos => vendors::cisco_ios::platform(),
            Platform::MikrotikRouterOs => vendors::mikrotik_routeros::platform(),
        }
    }
}

impl FromStr for Platform {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cisco_ios" | "ios" | "cisco_iosxe" | "iosxe" => Ok(Platform::CiscoIos),
            "mikrotik_routeros" | "routeros" | "routeros7" | "mikrotik" => {
                Ok(Platform::MikrotikRouterOs)
            }
            _ => Err(PlatformError::UnknownPlatform { name: s.to_string() }),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
