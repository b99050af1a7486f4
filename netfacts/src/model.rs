//! Point-in-time records returned by driver queries.
//!
//! Every query builds fresh records from freshly parsed output; nothing is
//! cached or mutated after construction.

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ParseError;
use crate::normalize::{format_mac, mac_octets};

/// A 48-bit MAC address, displayed as `XX:XX:XX:XX:XX:XX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    /// Create a MAC address from raw octets.
    pub const fn new(octets: [u8; 6]) -> Self {
        Self(octets)
    }

    /// The raw octets.
    pub fn octets(&self) -> [u8; 6] {
        self.0
    }
}

impl FromStr for MacAddress {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        mac_octets(s).map(Self)
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_mac(&self.0))
    }
}

impl Serialize for MacAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MacAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Administrative or line-protocol state of an interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkState {
    #[serde(rename = "up")]
    Up,
    #[serde(rename = "down")]
    Down,
    #[serde(rename = "administratively down")]
    AdministrativelyDown,
}

impl LinkState {
    /// The canonical word for this state.
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkState::Up => "up",
            LinkState::Down => "down",
            LinkState::AdministrativelyDown => "administratively down",
        }
    }
}

impl FromStr for LinkState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(LinkState::Up),
            "down" => Ok(LinkState::Down),
            "administratively down" => Ok(LinkState::AdministrativelyDown),
            other => Err(format!("unknown link state '{other}'")),
        }
    }
}

impl fmt::Display for LinkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a VLAN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VlanStatus {
    Active,
    Disabled,
}

impl fmt::Display for VlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            VlanStatus::Active => "active",
            VlanStatus::Disabled => "disabled",
        })
    }
}

impl FromStr for VlanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(VlanStatus::Active),
            "disabled" => Ok(VlanStatus::Disabled),
            other => Err(format!("unknown VLAN status '{other}'")),
        }
    }
}

/// State of a link aggregation group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LacpState {
    Running,
    Disabled,
}

impl fmt::Display for LacpState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LacpState::Running => "running",
            LacpState::Disabled => "disabled",
        })
    }
}

impl FromStr for LacpState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "running" => Ok(LacpState::Running),
            "disabled" => Ok(LacpState::Disabled),
            other => Err(format!("unknown LACP state '{other}'")),
        }
    }
}

/// A layer-3 interface and its state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpInterface {
    /// Interface name as the device reports it.
    pub name: String,

    /// Primary address, `None` when unassigned.
    pub ip_address: Option<IpAddr>,

    /// Administrative status.
    pub status: LinkState,

    /// Line protocol status.
    pub protocol: LinkState,
}

impl fmt::Display for IpInterface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ip_address {
            Some(ip) => write!(f, "{} {} {} {}", self.name, ip, self.status, self.protocol),
            None => write!(f, "{} unassigned {} {}", self.name, self.status, self.protocol),
        }
    }
}

/// An IP-to-MAC binding learned by the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArpEntry {
    pub ip_address: IpAddr,
    pub mac_address: MacAddress,
}

/// A forwarding table entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacAddressEntry {
    pub mac_address: MacAddress,

    /// Entry type as reported by the vendor (e.g. `DYNAMIC`, `Dynamic`, `Local`).
    #[serde(rename = "type")]
    pub entry_type: String,

    /// Port the address was learned on.
    pub port: String,
}

/// A VLAN configured on the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VlanEntry {
    pub id: u16,
    pub name: String,
    pub status: VlanStatus,
}

/// A directly connected device seen through CDP, LLDP or MNDP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeighborEntry {
    /// Our interface the neighbor was seen on.
    pub local_interface: String,

    /// The neighbor's interface facing us.
    pub neighbor_interface: String,

    /// Neighbor's system name, empty when it did not announce one.
    pub name: String,

    /// Neighbor's management address, if announced.
    pub ip_address: Option<IpAddr>,
}

/// A link aggregation group and its member ports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LacpGroup {
    pub name: String,

    /// Aggregation protocol or mode (e.g. `LACP`, `802.3ad`).
    pub mode: String,

    pub state: LacpState,

    /// Member interface names in device order.
    pub members: Vec<String>,
}
