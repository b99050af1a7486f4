//! CDP and LLDP neighbor outputs.
//!
//! Addresses are always matched inside the block of the device they belong
//! to; a detail listing with several neighbors never lends one neighbor's
//! address to another.

use std::net::IpAddr;
use std::sync::LazyLock;

use indexmap::IndexMap;
use log::{debug, warn};
use regex::Regex;

use crate::error::ParseError;
use crate::model::NeighborEntry;
use crate::parser::Rows;

const CDP: &str = "cdp neighbors detail";
const LLDP: &str = "lldp neighbors";

static CDP_DEVICE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*Device ID:[ \t]*(.+?)[ \t]*$").expect("valid CDP regex"));

static CDP_PORTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)Interface:\s*([^,\s]+),\s*Port ID[^:]*:[ \t]*(.+?)[ \t]*$")
        .expect("valid CDP regex")
});

static CDP_ADDRESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"IP(?:v4)? address:\s*(\S+)").expect("valid CDP regex"));

static LLDP_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*Chassis id:").expect("valid LLDP regex"));

static LLDP_SYSTEM_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"System Name:\s*(\S+)").expect("valid LLDP regex"));

static LLDP_MANAGEMENT_IP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Management Addresses:\s*\n\s*IP(?:V6)?:\s*(\S+)").expect("valid LLDP regex")
});

/// `<device id> <local intf> <hold time> [<capabilities>] <port id>`
static LLDP_SUMMARY_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\S+)\s+(\S+)\s+\d+\s+(?:[\w,]+\s+)?(\S+)\s*$").expect("valid LLDP regex")
});

/// Whether `show cdp` reports CDP as running.
pub fn cdp_enabled(output: &str) -> bool {
    !output.contains("CDP is not enabled")
}

/// Whether `show lldp` reports LLDP as running.
pub fn lldp_enabled(output: &str) -> bool {
    !output.contains("LLDP is not enabled")
}

/// Split `output` into blocks, each starting at a match of `marker`.
fn blocks<'a>(output: &'a str, marker: &Regex) -> Vec<&'a str> {
    let starts: Vec<usize> = marker.find_iter(output).map(|m| m.start()).collect();

    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(output.len());
            &output[start..end]
        })
        .collect()
}

/// Parse `show cdp neighbors detail`.
///
/// ```text
/// -------------------------
/// Device ID: sw2.lab
/// Entry address(es):
///   IP address: 10.0.0.2
/// Platform: cisco WS-C2960-24TT-L,  Capabilities: Switch IGMP
/// Interface: GigabitEthernet0/1,  Port ID (outgoing port): GigabitEthernet0/2
/// ```
pub fn parse_cdp_neighbors(output: &str) -> Result<Vec<NeighborEntry>, ParseError> {
    let mut rows = Rows::new(CDP);

    for block in blocks(output, &CDP_DEVICE) {
        rows.push(parse_cdp_block(block));
    }

    rows.finish(output)
}

fn parse_cdp_block(block: &str) -> Result<NeighborEntry, ParseError> {
    let header = block.lines().next().unwrap_or_default();

    let name = CDP_DEVICE
        .captures(block)
        .map(|caps| caps[1].to_string())
        .unwrap_or_default();

    let ports = CDP_PORTS
        .captures(block)
        .ok_or_else(|| ParseError::row(CDP, header, "no 'Interface: ..., Port ID' line"))?;

    Ok(NeighborEntry {
        local_interface: ports[1].to_string(),
        neighbor_interface: ports[2].to_string(),
        name,
        ip_address: CDP_ADDRESS
            .captures(block)
            .and_then(|caps| address(&caps[1])),
    })
}

fn address(raw: &str) -> Option<IpAddr> {
    match raw.parse() {
        Ok(ip) => Some(ip),
        Err(_) => {
            debug!("ignoring unparseable neighbor address '{}'", raw);
            None
        }
    }
}

/// Parse the management addresses out of `show lldp neighbors detail`,
/// keyed by system name.
///
/// ```text
/// Chassis id: 0011.2233.4455
/// Port id: Gi0/2
/// System Name: sw2.lab
///
/// Management Addresses:
///     IP: 10.0.0.2
/// ```
pub fn parse_lldp_management_addresses(output: &str) -> IndexMap<String, IpAddr> {
    let mut found = blocks(output, &LLDP_BLOCK);
    if found.is_empty() && !output.trim().is_empty() {
        found.push(output);
    }

    let mut addresses = IndexMap::new();
    for block in found {
        let Some(name) = LLDP_SYSTEM_NAME.captures(block) else {
            continue;
        };
        let Some(ip) = LLDP_MANAGEMENT_IP
            .captures(block)
            .and_then(|caps| address(&caps[1]))
        else {
            continue;
        };
        addresses.entry(name[1].to_string()).or_insert(ip);
    }
    addresses
}

/// Width at which `show lldp neighbors` cuts off device ids.
const LLDP_DEVICE_ID_WIDTH: usize = 20;

/// Address of the only system whose name a truncated device id abbreviates.
fn truncated_match(device_id: &str, management: &IndexMap<String, IpAddr>) -> Option<IpAddr> {
    if device_id.chars().count() < LLDP_DEVICE_ID_WIDTH {
        return None;
    }
    let mut candidates = management
        .iter()
        .filter(|(name, _)| name.starts_with(device_id));
    match (candidates.next(), candidates.next()) {
        (Some((_, ip)), None) => Some(*ip),
        (Some(_), Some(_)) => {
            debug!("truncated LLDP device id '{}' is ambiguous", device_id);
            None
        }
        _ => None,
    }
}

/// Parse the `show lldp neighbors` summary, attaching management addresses
/// from [`parse_lldp_management_addresses`].
///
/// The summary truncates device ids to 20 characters.
/// A truncated id with no exact match is joined to the one system name it
/// is a prefix of; shorter ids only ever match exactly.
///
/// ```text
/// Device ID           Local Intf     Hold-time  Capability      Port ID
/// sw2.lab             Gi0/1          120        B,R             Gi0/2
///
/// Total entries displayed: 1
/// ```
pub fn parse_lldp_neighbors(
    output: &str,
    management: &IndexMap<String, IpAddr>,
) -> Result<Vec<NeighborEntry>, ParseError> {
    let mut rows = Rows::new(LLDP);

    for line in output.lines() {
        let Some(caps) = LLDP_SUMMARY_ROW.captures(line) else {
            continue;
        };
        let device_id = &caps[1];

        let ip_address = management
            .get(device_id)
            .copied()
            .or_else(|| truncated_match(device_id, management));
        if ip_address.is_none() {
            warn!("no LLDP management address for neighbor '{}'", device_id);
        }

        rows.push(Ok(NeighborEntry {
            local_interface: caps[2].to_string(),
            neighbor_interface: caps[3].to_string(),
            name: device_id.to_string(),
            ip_address,
        }));
    }

    rows.finish(output)
}
