//! `/ip neighbor print detail` parsing.

use std::net::IpAddr;
use std::sync::LazyLock;

use log::debug;
use regex::Regex;

use crate::error::{ParseError, UnsupportedFeature};
use crate::model::NeighborEntry;
use crate::parser::Parsed;
use crate::parser::routeros::{has_indexed_lines, property};

const NEIGHBORS: &str = "ip neighbor";

static NEIGHBOR_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)interface=").expect("valid neighbor regex"));

/// Parse `/ip neighbor print detail`.
///
/// ```text
///  0 interface=ether1 address=10.0.0.2 address4=10.0.0.2
///    mac-address=00:11:22:33:44:55 identity="sw1" platform="Cisco IOS"
///    interface-name="Gi1" uptime=3d2h
/// ```
///
/// Each neighbor is scoped to its own `interface=` block. The IPv4
/// `address4=` is preferred over `address=`. Empty output means no discovery
/// protocol produced neighbors and is reported as a notice.
pub fn parse_neighbors(output: &str) -> Result<Parsed<NeighborEntry>, ParseError> {
    if output.trim().is_empty() {
        return Ok(Parsed::unsupported(UnsupportedFeature::NeighborDiscoveryDisabled));
    }

    let starts: Vec<usize> = NEIGHBOR_START.find_iter(output).map(|m| m.start()).collect();
    if starts.is_empty() && has_indexed_lines(output) {
        return Err(ParseError::unrecognized(
            NEIGHBORS,
            output,
            "indexed entries without interface=",
        ));
    }

    let neighbors = starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(output.len());
            parse_block(&output[start..end])
        })
        .collect();

    Ok(Parsed::found(neighbors))
}

fn parse_block(block: &str) -> NeighborEntry {
    let ip_address = property(block, "address4")
        .filter(|raw| !raw.is_empty())
        .or_else(|| property(block, "address"))
        .and_then(address);

    NeighborEntry {
        local_interface: property(block, "interface").unwrap_or_default().to_string(),
        neighbor_interface: property(block, "interface-name")
            .unwrap_or_default()
            .to_string(),
        name: property(block, "identity").unwrap_or_default().to_string(),
        ip_address,
    }
}

fn address(raw: &str) -> Option<IpAddr> {
    if raw.is_empty() {
        return None;
    }
    match raw.parse() {
        Ok(ip) => Some(ip),
        Err(_) => {
            debug!("ignoring unparseable neighbor address '{}'", raw);
            None
        }
    }
}
