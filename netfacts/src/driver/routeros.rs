//! MikroTik RouterOS 7 driver.

use std::time::Duration;

use super::session::Session;
use super::{NetworkDriver, PING_PROBE_TIMEOUT, check_ping_args, records};
use crate::error::Result;
use crate::model::{ArpEntry, IpInterface, LacpGroup, MacAddressEntry, NeighborEntry, VlanEntry};
use crate::parser::routeros;
use crate::platform::Platform;
use crate::transport::Transport;

const EXPORT: &str = "/export";
const IP_ADDRESS_PRINT: &str = "/ip address print";
const INTERFACE_PRINT_DETAIL: &str = "/interface print detail";
const IP_ARP_PRINT: &str = "/ip arp print";
const BRIDGE_HOST_PRINT: &str = "/interface bridge host print";
const VLAN_PRINT: &str = "/interface vlan print";
const NEIGHBOR_PRINT_DETAIL: &str = "/ip neighbor print detail";
const BONDING_PRINT_DETAIL: &str = "/interface bonding print detail";

/// Driver for MikroTik RouterOS 7 devices.
#[derive(Debug)]
pub struct RouterOsDriver<T> {
    session: Session<T>,
}

impl<T: Transport> RouterOsDriver<T> {
    pub fn new(transport: T, timeout: Duration) -> Self {
        Self {
            session: Session::new(transport, Platform::MikrotikRouterOs.definition(), timeout),
        }
    }

    pub fn session(&self) -> &Session<T> {
        &self.session
    }
}

impl<T: Transport> NetworkDriver for RouterOsDriver<T> {
    async fn connect(&mut self) -> Result<()> {
        self.session.open().await
    }

    async fn running_config(&mut self) -> Result<String> {
        self.session.run(EXPORT).await
    }

    async fn interfaces(&mut self) -> Result<Vec<IpInterface>> {
        let addresses = self.session.run(IP_ADDRESS_PRINT).await?;
        let addresses = routeros::parse_address_map(&addresses);
        let detail = self.session.run(INTERFACE_PRINT_DETAIL).await?;
        Ok(routeros::parse_interfaces(&detail, &addresses)?)
    }

    async fn arp_table(&mut self) -> Result<Vec<ArpEntry>> {
        let output = self.session.run(IP_ARP_PRINT).await?;
        Ok(routeros::parse_arp_table(&output)?)
    }

    async fn mac_address_table(&mut self) -> Result<Vec<MacAddressEntry>> {
        let output = self.session.run(BRIDGE_HOST_PRINT).await?;
        Ok(routeros::parse_mac_address_table(&output)?)
    }

    async fn vlans(&mut self) -> Result<Vec<VlanEntry>> {
        let output = self.session.run(VLAN_PRINT).await?;
        Ok(records(routeros::parse_vlans(&output)?))
    }

    async fn neighbors(&mut self) -> Result<Vec<NeighborEntry>> {
        let output = self.session.run(NEIGHBOR_PRINT_DETAIL).await?;
        Ok(records(routeros::parse_neighbors(&output)?))
    }

    async fn lacp_groups(&mut self) -> Result<Vec<LacpGroup>> {
        let output = self.session.run(BONDING_PRINT_DETAIL).await?;
        Ok(records(routeros::parse_lacp_groups(&output)?))
    }

    async fn ping_remote(&mut self, target: &str, count: u32) -> Result<bool> {
        check_ping_args(target, count)?;
        let command = format!("ping count={count} {target}");
        let output = self
            .session
            .run_with_timeout(&command, PING_PROBE_TIMEOUT * count)
            .await?;
        Ok(routeros::parse_ping(&output)?)
    }

    async fn exec_command(&mut self, command: &str) -> Result<String> {
        self.session.run(command).await
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
    use crate::error::{DriverError, Error};
    use crate::model::{LinkState, VlanStatus};
    use crate::transport::ReplayTransport;

    fn driver(transport: ReplayTransport) -> RouterOsDriver<ReplayTransport> {
        let _ = env_logger::builder().is_test(true).try_init();
        RouterOsDriver::new(transport, Duration::from_secs(5))
    }

    #[test]
    fn test_interfaces_join_addresses() {
        tokio_test::block_on(async {
            let mut driver = driver(
                ReplayTransport::new()
                    .with_response(
                        IP_ADDRESS_PRINT,
                        "\
Columns: ADDRESS, NETWORK, INTERFACE
#   ADDRESS          NETWORK       INTERFACE
0   192.168.88.1/24  192.168.88.0  bridge
",
                    )
                    .with_response(
                        INTERFACE_PRINT_DETAIL,
                        r#"Flags: R - running
 0  R  name="bridge" type="bridge" mtu=auto
 1     name="ether5" type="ether" mtu=1500
"#,
                    ),
            );
            driver.connect().await.unwrap();

            let interfaces = driver.interfaces().await.unwrap();
            assert_eq!(
                interfaces,
                vec![
                    IpInterface {
                        name: "bridge".to_string(),
                        ip_address: Some("192.168.88.1".parse().unwrap()),
                        status: LinkState::Up,
                        protocol: LinkState::Up,
                    },
                    IpInterface {
                        name: "ether5".to_string(),
                        ip_address: None,
                        status: LinkState::Up,
                        protocol: LinkState::Down,
                    },
                ]
            );
            assert_eq!(
                driver.session().transport().history(),
                [IP_ADDRESS_PRINT, INTERFACE_PRINT_DETAIL]
            );
        });
    }

    #[test]
    fn test_empty_tables_are_not_errors() {
        tokio_test::block_on(async {
            let mut driver = driver(
                ReplayTransport::new()
                    .with_response(VLAN_PRINT, "")
                    .with_response(NEIGHBOR_PRINT_DETAIL, "")
                    .with_response(BONDING_PRINT_DETAIL, ""),
            );
            driver.connect().await.unwrap();

            assert!(driver.vlans().await.unwrap().is_empty());
            assert!(driver.neighbors().await.unwrap().is_empty());
            assert!(driver.lacp_groups().await.unwrap().is_empty());
        });
    }

    #[test]
    fn test_vlans() {
        tokio_test::block_on(async {
            let mut driver = driver(ReplayTransport::new().with_response(
                VLAN_PRINT,
                "\
Flags: X - DISABLED; R - RUNNING
Columns: NAME, MTU, ARP, VLAN-ID, INTERFACE
#   NAME     MTU  ARP      VLAN-ID  INTERFACE
0 R vlan10  1500  enabled       10  bridge
1 X vlan20  1500  enabled       20  bridge
",
            ));
            driver.connect().await.unwrap();

            let vlans = driver.vlans().await.unwrap();
            assert_eq!(vlans.len(), 2);
            assert_eq!(vlans[1].status, VlanStatus::Disabled);
        });
    }

    #[test]
    fn test_ping() {
        tokio_test::block_on(async {
            let mut driver = driver(ReplayTransport::new().with_response(
                "ping count=4 10.0.0.2",
                "\
  SEQ HOST                                     SIZE TTL TIME       STATUS
    0 10.0.0.2                                   56  64 412us
    sent=4 received=3 packet-loss=25% min-rtt=380us avg-rtt=396us max-rtt=412us",
            ));
            driver.connect().await.unwrap();

            assert!(driver.ping("10.0.0.2").await.unwrap());

            let err = driver.ping_remote("10.0.0.2; /system reboot", 4).await.unwrap_err();
            assert!(matches!(err, Error::Driver(DriverError::InvalidArgument { .. })));
        });
    }

    #[test]
    fn test_ping_target_cannot_chain_commands() {
        tokio_test::block_on(async {
            let mut driver = driver(ReplayTransport::new().with_response(
                "ping count=4 10.0.0.2;/system/reboot",
                "sent=4 received=4 packet-loss=0%",
            ));
            driver.connect().await.unwrap();

            let err = driver.ping("10.0.0.2;/system/reboot").await.unwrap_err();
            assert!(matches!(err, Error::Driver(DriverError::InvalidArgument { .. })));
            assert!(driver.session().transport().history().is_empty());
        });
    }

    #[test]
    fn test_running_config() {
        tokio_test::block_on(async {
            let mut driver = driver(ReplayTransport::new().with_response(
                EXPORT,
                "# 2024-01-10 10:00:00 by RouterOS 7.13\n/system identity\nset name=r1\n",
            ));
            driver.connect().await.unwrap();

            let config = driver.running_config().await.unwrap();
            assert!(config.contains("set name=r1"));
            assert_eq!(driver.session().transport().history(), [EXPORT]);
        });
    }

    #[test]
    fn test_command_failure() {
        tokio_test::block_on(async {
            let mut driver = driver(
                ReplayTransport::new()
                    .with_response("/ip route prnt", "bad command name prnt (line 1 column 11)"),
            );
            driver.connect().await.unwrap();

            let err = driver.exec_command("/ip route prnt").await.unwrap_err();
            assert!(matches!(err, Error::Driver(DriverError::CommandFailed { .. })));
        });
    }

    #[test]
    fn test_closed_driver_cannot_reconnect() {
        tokio_test::block_on(async {
            let mut driver = driver(ReplayTransport::new());
            driver.connect().await.unwrap();
            driver.close().await.unwrap();
            driver.close().await.unwrap();

            let err = driver.connect().await.unwrap_err();
            assert!(matches!(err, Error::Driver(DriverError::SessionClosed)));
        });
    }
}
