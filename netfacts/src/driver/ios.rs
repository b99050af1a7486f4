//! Cisco IOS driver.

use std::time::Duration;

use log::{debug, warn};

use super::session::Session;
use super::{NetworkDriver, PING_PROBE_TIMEOUT, check_ping_args, records};
use crate::error::{Result, UnsupportedFeature};
use crate::model::{ArpEntry, IpInterface, LacpGroup, MacAddressEntry, NeighborEntry, VlanEntry};
use crate::parser::ios;
use crate::platform::Platform;
use crate::transport::Transport;

const SHOW_RUNNING_CONFIG: &str = "show running-config";
const SHOW_IP_INTERFACE_BRIEF: &str = "show ip interface brief";
const SHOW_ARP: &str = "show arp";
const SHOW_MAC_ADDRESS_TABLE: &str = "show mac address-table";
const SHOW_VLAN_BRIEF: &str = "show vlan brief";
const SHOW_CDP: &str = "show cdp";
const SHOW_CDP_NEIGHBORS_DETAIL: &str = "show cdp neighbors detail";
const SHOW_LLDP: &str = "show lldp";
const SHOW_LLDP_NEIGHBORS_DETAIL: &str = "show lldp neighbors detail";
const SHOW_LLDP_NEIGHBORS: &str = "show lldp neighbors";
const SHOW_ETHERCHANNEL_SUMMARY: &str = "show etherchannel summary";

const CONFIGURE_TERMINAL: &str = "configure terminal";
const END: &str = "end";

/// Driver for Cisco IOS and IOS-XE devices.
#[derive(Debug)]
pub struct IosDriver<T> {
    session: Session<T>,
}

impl<T: Transport> IosDriver<T> {
    pub fn new(transport: T, timeout: Duration) -> Self {
        Self {
            session: Session::new(transport, Platform::CiscoIos.definition(), timeout),
        }
    }

    pub fn session(&self) -> &Session<T> {
        &self.session
    }
}

/// Whether the first word of `command` abbreviates `show`.
fn is_show_command(command: &str) -> bool {
    command
        .split_whitespace()
        .next()
        .is_some_and(|word| matches!(word.to_ascii_lowercase().as_str(), "sh" | "sho" | "show"))
}

impl<T: Transport> NetworkDriver for IosDriver<T> {
    async fn connect(&mut self) -> Result<()> {
        self.session.open().await
    }

    async fn running_config(&mut self) -> Result<String> {
        self.session.run(SHOW_RUNNING_CONFIG).await
    }

    async fn interfaces(&mut self) -> Result<Vec<IpInterface>> {
        let output = self.session.run(SHOW_IP_INTERFACE_BRIEF).await?;
        Ok(ios::parse_interfaces(&output)?)
    }

    async fn arp_table(&mut self) -> Result<Vec<ArpEntry>> {
        let output = self.session.run(SHOW_ARP).await?;
        Ok(ios::parse_arp_table(&output)?)
    }

    async fn mac_address_table(&mut self) -> Result<Vec<MacAddressEntry>> {
        let output = self.session.run(SHOW_MAC_ADDRESS_TABLE).await?;
        Ok(ios::parse_mac_address_table(&output)?)
    }

    async fn vlans(&mut self) -> Result<Vec<VlanEntry>> {
        let output = self.session.run(SHOW_VLAN_BRIEF).await?;
        Ok(ios::parse_vlans(&output)?)
    }

    async fn neighbors(&mut self) -> Result<Vec<NeighborEntry>> {
        let cdp = self.session.run(SHOW_CDP).await?;
        if ios::cdp_enabled(&cdp) {
            debug!("collecting neighbors over CDP");
            let detail = self.session.run(SHOW_CDP_NEIGHBORS_DETAIL).await?;
            return Ok(ios::parse_cdp_neighbors(&detail)?);
        }

        let lldp = self.session.run(SHOW_LLDP).await?;
        if ios::lldp_enabled(&lldp) {
            debug!("CDP disabled, collecting neighbors over LLDP");
            let detail = self.session.run(SHOW_LLDP_NEIGHBORS_DETAIL).await?;
            let management = ios::parse_lldp_management_addresses(&detail);
            let summary = self.session.run(SHOW_LLDP_NEIGHBORS).await?;
            return Ok(ios::parse_lldp_neighbors(&summary, &management)?);
        }

        warn!("{}", UnsupportedFeature::NeighborDiscoveryDisabled);
        Ok(Vec::new())
    }

    async fn lacp_groups(&mut self) -> Result<Vec<LacpGroup>> {
        let output = self.session.run(SHOW_ETHERCHANNEL_SUMMARY).await?;
        Ok(records(ios::parse_lacp_groups(&output)?))
    }

    async fn ping_remote(&mut self, target: &str, count: u32) -> Result<bool> {
        check_ping_args(target, count)?;
        let command = format!("ping {target} repeat {count}");
        let output = self
            .session
            .run_with_timeout(&command, PING_PROBE_TIMEOUT * count)
            .await?;
        Ok(ios::parse_ping(&output)?)
    }

    async fn exec_command(&mut self, command: &str) -> Result<String> {
        if is_show_command(command) {
            return self.session.run(command).await;
        }
        debug!("applying '{}' in configuration mode", command);
        self.session
            .run_batch(&[CONFIGURE_TERMINAL, command, END])
            .await
    }

    async fn close(&mut self) -> Result<()> {
        self.session.close().await
    }

    fn is_open(&self) -> bool {
        self.session.is_open()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DriverError, Error, ParseError};
    use crate::model::LinkState;
    use crate::transport::ReplayTransport;

    const ARP: &str = "\
Protocol  Address          Age (min)  Hardware Addr   Type   Interface
Internet  10.0.0.1                -   aabb.ccdd.eeff  ARPA   GigabitEthernet0/1
Internet  10.0.0.2               12   0011.2233.4455  ARPA   GigabitEthernet0/1
";

    const INTERFACES: &str = "\
Interface              IP-Address      OK? Method Status                Protocol
GigabitEthernet0/0     192.168.1.1     YES NVRAM  up                    up
GigabitEthernet0/1     unassigned      YES unset  administratively down down
";

    fn driver(transport: ReplayTransport) -> IosDriver<ReplayTransport> {
        let _ = env_logger::builder().is_test(true).try_init();
        IosDriver::new(transport, Duration::from_secs(5))
    }

    #[test]
    fn test_queries() {
        tokio_test::block_on(async {
            let mut driver = driver(
                ReplayTransport::new()
                    .with_response(SHOW_ARP, ARP)
                    .with_response(SHOW_IP_INTERFACE_BRIEF, INTERFACES),
            );
            driver.connect().await.unwrap();

            let arp = driver.arp_table().await.unwrap();
            assert_eq!(arp.len(), 2);
            assert_eq!(arp[0].mac_address.to_string(), "AA:BB:CC:DD:EE:FF");

            let interfaces = driver.interfaces().await.unwrap();
            assert_eq!(interfaces[1].status, LinkState::AdministrativelyDown);
            assert_eq!(interfaces[1].protocol, LinkState::Down);
        });
    }

    #[test]
    fn test_query_before_connect() {
        tokio_test::block_on(async {
            let mut driver = driver(ReplayTransport::new().with_response(SHOW_ARP, ARP));
            let err = driver.arp_table().await.unwrap_err();
            assert!(matches!(err, Error::Driver(DriverError::NotConnected)));
            assert!(driver.session().transport().history().is_empty());
        });
    }

    #[test]
    fn test_neighbors_fall_back_to_lldp() {
        tokio_test::block_on(async {
            let mut driver = driver(
                ReplayTransport::new()
                    .with_response(SHOW_CDP, "% CDP is not enabled")
                    .with_response(SHOW_LLDP, "Global LLDP Information:\n    Status: ACTIVE\n")
                    .with_response(
                        SHOW_LLDP_NEIGHBORS_DETAIL,
                        "\
Local Intf: Gi0/1
Chassis id: 0011.2233.4455
Port id: Gi0/2
System Name: sw2.lab

Management Addresses:
    IP: 10.0.0.2

Total entries displayed: 1
",
                    )
                    .with_response(
                        SHOW_LLDP_NEIGHBORS,
                        "\
Device ID           Local Intf     Hold-time  Capability      Port ID
sw2.lab             Gi0/1          120        B,R             Gi0/2

Total entries displayed: 1
",
                    ),
            );
            driver.connect().await.unwrap();

            let neighbors = driver.neighbors().await.unwrap();
            assert_eq!(
                neighbors,
                vec![NeighborEntry {
                    local_interface: "Gi0/1".to_string(),
                    neighbor_interface: "Gi0/2".to_string(),
                    name: "sw2.lab".to_string(),
                    ip_address: Some("10.0.0.2".parse().unwrap()),
                }]
            );
            assert!(
                !driver
                    .session()
                    .transport()
                    .history()
                    .contains(&SHOW_CDP_NEIGHBORS_DETAIL.to_string())
            );
        });
    }

    #[test]
    fn test_no_discovery_protocol() {
        tokio_test::block_on(async {
            let mut driver = driver(
                ReplayTransport::new()
                    .with_response(SHOW_CDP, "% CDP is not enabled")
                    .with_response(SHOW_LLDP, "% LLDP is not enabled"),
            );
            driver.connect().await.unwrap();
            assert!(driver.neighbors().await.unwrap().is_empty());
        });
    }

    #[test]
    fn test_ping() {
        tokio_test::block_on(async {
            let mut driver = driver(
                ReplayTransport::new()
                    .with_response(
                        "ping 10.0.0.2 repeat 4",
                        "!!!!\nSuccess rate is 100 percent (4/4), round-trip min/avg/max = 1/1/1 ms",
                    )
                    .with_response("ping 10.0.0.9 repeat 2", "..\nSuccess rate is 0 percent (0/2)"),
            );
            driver.connect().await.unwrap();

            assert!(driver.ping("10.0.0.2").await.unwrap());
            assert!(!driver.ping_remote("10.0.0.9", 2).await.unwrap());

            let err = driver.ping_remote("10.0.0.2", 0).await.unwrap_err();
            assert!(matches!(err, Error::Driver(DriverError::InvalidArgument { .. })));
        });
    }

    #[test]
    fn test_exec_command_routing() {
        tokio_test::block_on(async {
            let mut driver = driver(
                ReplayTransport::new()
                    .with_response("sh clock", "*12:00:00.000 UTC Mon Jan 1 2024")
                    .with_response(CONFIGURE_TERMINAL, "Enter configuration commands, one per line.")
                    .with_response("hostname r1", "")
                    .with_response(END, ""),
            );
            driver.connect().await.unwrap();

            let clock = driver.exec_command("sh clock").await.unwrap();
            assert!(clock.contains("UTC"));

            driver.exec_command("hostname r1").await.unwrap();
            assert_eq!(
                driver.session().transport().history(),
                ["sh clock", CONFIGURE_TERMINAL, "hostname r1", END]
            );
        });
    }

    #[test]
    fn test_unrecognized_output_propagates() {
        tokio_test::block_on(async {
            let mut driver = driver(
                ReplayTransport::new().with_response(SHOW_ETHERCHANNEL_SUMMARY, "garbage"),
            );
            driver.connect().await.unwrap();
            let err = driver.lacp_groups().await.unwrap_err();
            assert!(matches!(
                err,
                Error::Parse(ParseError::UnrecognizedOutput { .. })
            ));
        });
    }

    #[test]
    fn test_is_show_command() {
        assert!(is_show_command("show version"));
        assert!(is_show_command("sh ip route"));
        assert!(is_show_command("SHO run"));
        assert!(!is_show_command("shutdown"));
        assert!(!is_show_command("interface Gi0/1"));
        assert!(!is_show_command(""));
    }
}
