//! Tabular IOS outputs: interfaces, ARP, MAC address table and VLANs.

use std::sync::LazyLock;

use log::debug;
use regex::Regex;

use crate::error::ParseError;
use crate::model::{ArpEntry, IpInterface, LinkState, MacAddressEntry, VlanEntry, VlanStatus};
use crate::parser::{Rows, fields, ip_field, mac_field};

const INTERFACES: &str = "ip interface brief";
const ARP: &str = "arp";
const MAC_TABLE: &str = "mac address-table";
const VLANS: &str = "vlan brief";

/// Marker that shifts the status column of `show ip interface brief` by one.
const ADMINISTRATIVELY: &str = "administratively";

const UNASSIGNED: &str = "unassigned";

/// Banner lines above the first `show mac address-table` row.
const MAC_TABLE_BANNER_LINES: usize = 5;

/// `<vlan id> <name> <status> ...`, extra trailing columns ignored.
static VLAN_ROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+)\s+(\S+)\s+(\S+)").expect("valid VLAN regex"));

/// Parse `show ip interface brief`.
///
/// ```text
/// Interface              IP-Address      OK? Method Status                Protocol
/// GigabitEthernet0/0     10.0.0.1        YES NVRAM  up                    up
/// GigabitEthernet0/1     unassigned      YES NVRAM  administratively down down
/// ```
pub fn parse_interfaces(output: &str) -> Result<Vec<IpInterface>, ParseError> {
    let mut rows = Rows::new(INTERFACES);

    for line in output.lines().skip(1) {
        if line.trim().is_empty() {
            continue;
        }
        rows.push(parse_interface_row(line));
    }

    rows.finish(output)
}

fn parse_interface_row(line: &str) -> Result<IpInterface, ParseError> {
    let row = fields(line);

    let (name, address, status, protocol) = match row.as_slice() {
        [name, address, _ok, _method, ADMINISTRATIVELY, state, protocol] => {
            (*name, *address, format!("{ADMINISTRATIVELY} {state}"), *protocol)
        }
        [name, address, _ok, _method, status, protocol] => {
            (*name, *address, status.to_string(), *protocol)
        }
        _ => {
            return Err(ParseError::row(
                INTERFACES,
                line,
                format!("expected 6 or 7 columns, found {}", row.len()),
            ));
        }
    };

    let ip_address = match address {
        UNASSIGNED => None,
        other => Some(ip_field(INTERFACES, line, other)?),
    };

    Ok(IpInterface {
        name: name.to_string(),
        ip_address,
        status: link_state(line, &status)?,
        protocol: link_state(line, protocol)?,
    })
}

fn link_state(line: &str, raw: &str) -> Result<LinkState, ParseError> {
    raw.parse()
        .map_err(|reason: String| ParseError::row(INTERFACES, line, reason))
}

/// Parse `show arp`.
///
/// ```text
/// Protocol  Address          Age (min)  Hardware Addr   Type   Interface
/// Internet  10.0.0.1                -   aabb.ccdd.eeff  ARPA   GigabitEthernet0/0
/// ```
///
/// Unresolved (`Incomplete`) entries carry no MAC address and are left out.
pub fn parse_arp_table(output: &str) -> Result<Vec<ArpEntry>, ParseError> {
    let mut rows = Rows::new(ARP);

    for line in output.lines().skip(1) {
        let row = fields(line);
        if row.is_empty() {
            continue;
        }
        if row.contains(&"Incomplete") {
            debug!("skipping unresolved ARP entry: {}", line.trim());
            continue;
        }

        rows.push(parse_arp_row(line, &row));
    }

    rows.finish(output)
}

fn parse_arp_row(line: &str, row: &[&str]) -> Result<ArpEntry, ParseError> {
    match row {
        [_protocol, ip, _age, mac, _kind, _interface] => Ok(ArpEntry {
            ip_address: ip_field(ARP, line, ip)?,
            mac_address: mac_field(ARP, line, mac)?,
        }),
        _ => Err(ParseError::row(
            ARP,
            line,
            format!("expected 6 columns, found {}", row.len()),
        )),
    }
}

/// Parse `show mac address-table`.
///
/// The first five lines are the banner and column headers, the last line is
/// the `Total Mac Addresses` footer.
///
/// ```text
///           Mac Address Table
/// -------------------------------------------
///
/// Vlan    Mac Address       Type        Ports
/// ----    -----------       --------    -----
///    1    0011.2233.4455    DYNAMIC     Gi0/1
/// Total Mac Addresses for this criterion: 1
/// ```
pub fn parse_mac_address_table(output: &str) -> Result<Vec<MacAddressEntry>, ParseError> {
    let lines: Vec<&str> = output.trim_end().lines().collect();
    let body = lines
        .get(MAC_TABLE_BANNER_LINES..lines.len().saturating_sub(1))
        .unwrap_or(&[]);

    let mut rows = Rows::new(MAC_TABLE);

    for line in body {
        let row = fields(line);
        if row.is_empty() {
            continue;
        }

        rows.push(parse_mac_row(line, &row));
    }

    rows.finish(output)
}

fn parse_mac_row(line: &str, row: &[&str]) -> Result<MacAddressEntry, ParseError> {
    match row {
        [_vlan, mac, entry_type, port] => Ok(MacAddressEntry {
            mac_address: mac_field(MAC_TABLE, line, mac)?,
            entry_type: entry_type.to_string(),
            port: port.to_string(),
        }),
        _ => Err(ParseError::row(
            MAC_TABLE,
            line,
            format!("expected 4 columns, found {}", row.len()),
        )),
    }
}

/// Parse `show vlan brief`.
///
/// Port-list continuation lines and headers do not start with a VLAN id and
/// are ignored.
pub fn parse_vlans(output: &str) -> Result<Vec<VlanEntry>, ParseError> {
    let mut rows = Rows::new(VLANS);

    for line in output.lines() {
        let Some(caps) = VLAN_ROW.captures(line) else {
            continue;
        };

        rows.push(match caps[1].parse::<u16>() {
            Ok(id) => Ok(VlanEntry {
                id,
                name: caps[2].to_string(),
                status: vlan_status(&caps[3]),
            }),
            Err(_) => Err(ParseError::row(VLANS, line, "VLAN id out of range")),
        });
    }

    rows.finish(output)
}

/// `act/unsup` is an active VLAN on a platform that cannot carry it natively;
/// suspended and locally shut VLANs count as disabled.
fn vlan_status(raw: &str) -> VlanStatus {
    match raw {
        "active" | "act/unsup" => VlanStatus::Active,
        _ => VlanStatus::Disabled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHOW_IP_INTERFACE_BRIEF: &str = "\
Interface              IP-Address      OK? Method Status                Protocol
GigabitEthernet0/0     10.0.0.1        YES NVRAM  up                    up
GigabitEthernet0/1     unassigned      YES NVRAM  administratively down down
GigabitEthernet0/2     unassigned      YES unset  down                  down
Vlan1                  192.168.1.1     YES manual up                    down
";

    #[test]
    fn test_interfaces() {
        let interfaces = parse_interfaces(SHOW_IP_INTERFACE_BRIEF).unwrap();
        assert_eq!(interfaces.len(), 4);

        assert_eq!(interfaces[0].name, "GigabitEthernet0/0");
        assert_eq!(interfaces[0].ip_address, Some("10.0.0.1".parse().unwrap()));
        assert_eq!(interfaces[0].status, LinkState::Up);
        assert_eq!(interfaces[0].protocol, LinkState::Up);

        assert_eq!(interfaces[3].status, LinkState::Up);
        assert_eq!(interfaces[3].protocol, LinkState::Down);
    }

    #[test]
    fn test_administratively_down_shifts_columns() {
        let interfaces = parse_interfaces(SHOW_IP_INTERFACE_BRIEF).unwrap();
        let shut = &interfaces[1];
        assert_eq!(shut.ip_address, None);
        assert_eq!(shut.status, LinkState::AdministrativelyDown);
        assert_eq!(shut.status.to_string(), "administratively down");
        assert_eq!(shut.protocol, LinkState::Down);
    }

    #[test]
    fn test_interfaces_bad_row_is_skipped() {
        let output = "\
Interface              IP-Address      OK? Method Status                Protocol
GigabitEthernet0/0     10.0.0.1        YES NVRAM  up                    up
Tunnel0                10.9.9.9        YES
";
        let interfaces = parse_interfaces(output).unwrap();
        assert_eq!(interfaces.len(), 1);
    }

    #[test]
    fn test_interfaces_unrecognized_output() {
        let output = "header\nthis is not an interface table at all\n";
        let err = parse_interfaces(output).unwrap_err();
        assert!(matches!(err, ParseError::UnrecognizedOutput { table: INTERFACES, .. }));
    }

    #[test]
    fn test_arp_single_entry() {
        let output = "header\nInternet  10.0.0.1  -  AABB.CCDD.EEFF  ARPA  Gi0/1";
        let entries = parse_arp_table(output).unwrap();
        assert_eq!(
            entries,
            vec![ArpEntry {
                ip_address: "10.0.0.1".parse().unwrap(),
                mac_address: "AA:BB:CC:DD:EE:FF".parse().unwrap(),
            }]
        );
        assert_eq!(entries[0].mac_address.to_string(), "AA:BB:CC:DD:EE:FF");
    }

    #[test]
    fn test_arp_table() {
        let output = "\
Protocol  Address          Age (min)  Hardware Addr   Type   Interface
Internet  10.0.0.1                -   aabb.ccdd.eeff  ARPA   GigabitEthernet0/0
Internet  10.0.0.2               12   0011.2233.4455  ARPA   GigabitEthernet0/0
Internet  10.0.0.9                0   Incomplete      ARPA
";
        let entries = parse_arp_table(output).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].ip_address.to_string(), "10.0.0.2");
        assert_eq!(entries[1].mac_address.to_string(), "00:11:22:33:44:55");
    }

    #[test]
    fn test_arp_empty_table() {
        let output = "Protocol  Address          Age (min)  Hardware Addr   Type   Interface\n";
        assert!(parse_arp_table(output).unwrap().is_empty());
    }

    #[test]
    fn test_mac_address_table() {
        let output = "\
          Mac Address Table
-------------------------------------------

Vlan    Mac Address       Type        Ports
----    -----------       --------    -----
   1    0011.2233.4455    DYNAMIC     Gi0/1
  10    aabb.ccdd.eeff    STATIC      Gi0/2

 All    0100.0ccc.cccc    STATIC      CPU
Total Mac Addresses for this criterion: 3
";
        let entries = parse_mac_address_table(output).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].mac_address.to_string(), "00:11:22:33:44:55");
        assert_eq!(entries[0].entry_type, "DYNAMIC");
        assert_eq!(entries[0].port, "Gi0/1");
        assert_eq!(entries[2].port, "CPU");
    }

    #[test]
    fn test_mac_address_table_too_short() {
        assert!(parse_mac_address_table("").unwrap().is_empty());
        assert!(parse_mac_address_table("          Mac Address Table\n").unwrap().is_empty());
    }

    #[test]
    fn test_vlans() {
        let output = "\
VLAN Name                             Status    Ports
---- -------------------------------- --------- -------------------------------
1    default                          active    Gi0/1, Gi0/2, Gi0/3, Gi0/4
                                                Gi0/5, Gi0/6
10   users                            active
20   voice                            suspended
1002 fddi-default                     act/unsup
";
        let vlans = parse_vlans(output).unwrap();
        assert_eq!(vlans.len(), 4);
        assert_eq!(
            vlans[0],
            VlanEntry {
                id: 1,
                name: "default".to_string(),
                status: VlanStatus::Active,
            }
        );
        assert_eq!(vlans[2].status, VlanStatus::Disabled);
        assert_eq!(vlans[3].id, 1002);
        assert_eq!(vlans[3].status, VlanStatus::Active);
    }

    #[test]
    fn test_vlan_id_out_of_range_skipped() {
        let output = "1    default    active\n99999 bogus   active\n";
        let vlans = parse_vlans(output).unwrap();
        assert_eq!(vlans.len(), 1);
    }
}
