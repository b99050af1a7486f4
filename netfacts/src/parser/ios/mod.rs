//! Cisco IOS output parsers.
//!
//! Inputs are the plain text of `show` commands as printed with
//! `terminal length 0`, without the command echo or trailing prompt.

mod etherchannel;
mod neighbors;
mod ping;
mod tables;

pub use etherchannel::parse_lacp_groups;
pub use neighbors::{
    cdp_enabled, lldp_enabled, parse_cdp_neighbors, parse_lldp_management_addresses,
    parse_lldp_neighbors,
};
pub use ping::parse_ping;
pub use tables::{parse_arp_table, parse_interfaces, parse_mac_address_table, parse_vlans};
