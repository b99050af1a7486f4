//! Column tables: addresses, interfaces, ARP, bridge hosts and VLANs.

use std::net::IpAddr;
use std::sync::LazyLock;

use indexmap::IndexMap;
use log::debug;
use regex::Regex;

use crate::error::{ParseError, UnsupportedFeature};
use crate::model::{ArpEntry, IpInterface, LinkState, MacAddressEntry, VlanEntry, VlanStatus};
use crate::parser::routeros::detail_entries;
use crate::parser::{Parsed, Rows, content_lines, fields, ip_field, mac_field};

const ADDRESSES: &str = "ip address";
const INTERFACES: &str = "interface detail";
const ARP: &str = "ip arp";
const BRIDGE_HOSTS: &str = "bridge host";
const VLANS: &str = "interface vlan";

/// Lines before the first ARP row: flags legend, columns legend, header.
const ARP_HEADER_LINES: usize = 3;

const DISABLED: char = 'X';
const RUNNING: char = 'R';

/// `<index> [flags] <address>/<prefix> <network> <interface>`
static ADDRESS_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\d+\s+(?:[A-Z]+\s+)?([0-9A-Fa-f.:]+)/\d+\s+\S+\s+(\S+)")
        .expect("valid address regex")
});

/// `<index> [flags] <mac> [vid] <port>`
static BRIDGE_HOST_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\d+\s+(?:([A-Z]{1,3})\s+)?([0-9A-Fa-f]{2}(?::[0-9A-Fa-f]{2}){5})\s+(?:\d+\s+)?(\S+)")
        .expect("valid bridge host regex")
});

/// `<index> [flags] <name> <mtu> <arp> <vlan-id> ...`
static VLAN_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\d+\s+(?:([A-Z]+)\s+)?(\S+)\s+\d+\s+\S+\s+(\d+)").expect("valid vlan regex")
});

static INDEXED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\d+\s").expect("valid index regex"));

/// Map interface names to their first address from `/ip address print`.
///
/// ```text
/// Flags: D - DYNAMIC
/// Columns: ADDRESS, NETWORK, INTERFACE
/// #   ADDRESS            NETWORK        INTERFACE
/// 0   192.168.88.1/24    192.168.88.0   bridge
/// 1 D 10.0.0.5/24        10.0.0.0       ether1
/// ```
pub fn parse_address_map(output: &str) -> IndexMap<String, IpAddr> {
    let mut addresses = IndexMap::new();

    for line in content_lines(output) {
        let Some(caps) = ADDRESS_ROW.captures(line) else {
            continue;
        };
        match ip_field(ADDRESSES, line, &caps[1]) {
            Ok(ip) => {
                addresses.entry(caps[2].to_string()).or_insert(ip);
            }
            Err(e) => debug!("{}", e),
        }
    }

    addresses
}

/// Parse `/interface print detail`, attaching addresses from
/// [`parse_address_map`].
///
/// A disabled (`X`) interface is down on both counts. Otherwise the
/// interface is administratively up, and its protocol follows the running
/// (`R`) flag.
pub fn parse_interfaces(
    detail_output: &str,
    addresses: &IndexMap<String, IpAddr>,
) -> Result<Vec<IpInterface>, ParseError> {
    let entries = detail_entries(detail_output);
    if entries.is_empty() && !detail_output.trim().is_empty() {
        return Err(ParseError::unrecognized(
            INTERFACES,
            detail_output,
            "no name=\"...\" entries",
        ));
    }

    Ok(entries
        .into_iter()
        .map(|entry| {
            let (status, protocol) = if entry.has_flag(DISABLED) {
                (LinkState::Down, LinkState::Down)
            } else if entry.has_flag(RUNNING) {
                (LinkState::Up, LinkState::Up)
            } else {
                (LinkState::Up, LinkState::Down)
            };

            IpInterface {
                name: entry.name.to_string(),
                ip_address: addresses.get(entry.name).copied(),
                status,
                protocol,
            }
        })
        .collect())
}

/// Parse `/ip arp print`, keeping only dynamic complete (`DC`) entries.
///
/// ```text
/// Flags: D - DYNAMIC; C - COMPLETE
/// Columns: ADDRESS, MAC-ADDRESS, INTERFACE, STATUS
/// #    ADDRESS        MAC-ADDRESS        INTERFACE  STATUS
/// 0 DC 192.168.88.10  00:11:22:33:44:55  bridge     reachable
/// ```
pub fn parse_arp_table(output: &str) -> Result<Vec<ArpEntry>, ParseError> {
    let mut rows = Rows::new(ARP);

    for line in content_lines(output).skip(ARP_HEADER_LINES) {
        let row = fields(line);
        if !row.get(1).is_some_and(|flags| flags.contains("DC")) {
            debug!("skipping ARP entry that is not dynamic and complete: {}", line.trim());
            continue;
        }
        rows.push(parse_arp_row(line, &row));
    }

    rows.finish(output)
}

fn parse_arp_row(line: &str, row: &[&str]) -> Result<ArpEntry, ParseError> {
    let [_index, _flags, ip, mac, _interface, _status] = row else {
        return Err(ParseError::row(
            ARP,
            line,
            format!("expected 6 columns, found {}", row.len()),
        ));
    };

    Ok(ArpEntry {
        ip_address: ip_field(ARP, line, ip)?,
        mac_address: mac_field(ARP, line, mac)?,
    })
}

/// Parse `/interface bridge host print`.
///
/// ```text
/// Flags: D - DYNAMIC; L - LOCAL; E - EXTERNAL
/// Columns: MAC-ADDRESS, VID, ON-INTERFACE, BRIDGE
/// #    MAC-ADDRESS        VID  ON-INTERFACE  BRIDGE
/// 0 DL 48:8F:5A:00:00:01       bridge        bridge
/// 1 D  00:11:22:33:44:55   10  ether2        bridge
/// ```
pub fn parse_mac_address_table(output: &str) -> Result<Vec<MacAddressEntry>, ParseError> {
    let mut rows = Rows::new(BRIDGE_HOSTS);

    for line in content_lines(output) {
        if !INDEXED.is_match(line) {
            continue;
        }
        let Some(caps) = BRIDGE_HOST_ROW.captures(line) else {
            rows.reject(line, "no MAC address and port");
            continue;
        };

        let flags = caps.get(1).map_or("", |m| m.as_str());
        rows.push(mac_field(BRIDGE_HOSTS, line, &caps[2]).map(|mac_address| {
            MacAddressEntry {
                mac_address,
                entry_type: host_type(flags).to_string(),
                port: caps[3].to_string(),
            }
        }));
    }

    rows.finish(output)
}

fn host_type(flags: &str) -> &'static str {
    if flags.contains('D') {
        "Dynamic"
    } else if flags.contains('L') {
        "Local"
    } else if flags.contains('E') {
        "External"
    } else {
        "Static"
    }
}

/// Parse `/interface vlan print`.
///
/// Empty output means no VLAN interfaces exist and is reported as a notice.
///
/// ```text
/// Flags: X - DISABLED; R - RUNNING
/// Columns: NAME, MTU, ARP, VLAN-ID, INTERFACE
/// #   NAME     MTU  ARP      VLAN-ID  INTERFACE
/// 0 R vlan10  1500  enabled       10  bridge
/// 1 X vlan20  1500  enabled       20  bridge
/// ```
pub fn parse_vlans(output: &str) -> Result<Parsed<VlanEntry>, ParseError> {
    if output.trim().is_empty() {
        return Ok(Parsed::unsupported(UnsupportedFeature::NoVlans));
    }

    let mut rows = Rows::new(VLANS);

    for line in content_lines(output) {
        if !INDEXED.is_match(line) {
            continue;
        }
        let Some(caps) = VLAN_ROW.captures(line) else {
            rows.reject(line, "no name and VLAN id");
            continue;
        };

        let disabled = caps.get(1).is_some_and(|m| m.as_str().contains(DISABLED));
        rows.push(
            caps[3]
                .parse::<u16>()
                .map_err(|_| ParseError::row(VLANS, line, format!("'{}' is not a VLAN id", &caps[3])))
                .map(|id| VlanEntry {
                    id,
                    name: caps[2].to_string(),
                    status: if disabled {
                        VlanStatus::Disabled
                    } else {
                        VlanStatus::Active
                    },
                }),
        );
    }

    rows.finish(output).map(Parsed::found)
}
