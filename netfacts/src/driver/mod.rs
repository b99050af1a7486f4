//! Vendor drivers and the common query interface.
//!
//! [`NetworkDriver`] is the capability every vendor implements. Callers that
//! pick the vendor at runtime use [`DeviceDriver`], which dispatches to the
//! concrete driver chosen at construction.

mod builder;
mod ios;
mod routeros;
mod session;

pub use builder::DriverBuilder;
pub use ios::IosDriver;
pub use routeros::RouterOsDriver;
pub use session::Session;

use std::future::Future;
use std::net::IpAddr;
use std::time::Duration;

use log::warn;

use crate::error::{DriverError, Result};
use crate::model::{ArpEntry, IpInterface, LacpGroup, MacAddressEntry, NeighborEntry, VlanEntry};
use crate::parser::Parsed;
use crate::platform::Platform;
use crate::transport::Transport;

/// Probes sent by [`NetworkDriver::ping`].
pub const DEFAULT_PING_COUNT: u32 = 4;

/// Time allowed per ping probe.
pub(crate) const PING_PROBE_TIMEOUT: Duration = Duration::from_secs(4);

/// Queries every supported device answers.
///
/// All methods except [`connect`](Self::connect) and [`close`](Self::close)
/// require an open connection and fail with
/// [`DriverError::NotConnected`] otherwise.
///
/// # Example
///
/// ```rust,no_run
/// use netfacts::{DriverBuilder, NetworkDriver, Platform};
///
/// # async fn example() -> Result<(), netfacts::Error> {
/// let mut driver = DriverBuilder::new("192.168.88.1")
///     .username("admin")
///     .password("secret")
///     .platform(Platform::MikrotikRouterOs)
///     .build()?;
///
/// driver.connect().await?;
/// for entry in driver.arp_table().await? {
///     println!("{} {}", entry.ip_address, entry.mac_address);
/// }
/// driver.close().await?;
/// # Ok(())
/// # }
/// ```
pub trait NetworkDriver: Send {
    /// Open the session to the device.
    fn connect(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// The full running configuration as text.
    fn running_config(&mut self) -> impl Future<Output = Result<String>> + Send;

    /// Interfaces with their primary address and state.
    fn interfaces(&mut self) -> impl Future<Output = Result<Vec<IpInterface>>> + Send;

    /// Resolved ARP entries.
    fn arp_table(&mut self) -> impl Future<Output = Result<Vec<ArpEntry>>> + Send;

    /// The bridge forwarding table.
    fn mac_address_table(&mut self) -> impl Future<Output = Result<Vec<MacAddressEntry>>> + Send;

    /// Configured VLANs. Empty, with a warning, when there are none.
    fn vlans(&mut self) -> impl Future<Output = Result<Vec<VlanEntry>>> + Send;

    /// Directly connected devices. Empty, with a warning, when no discovery
    /// protocol runs.
    fn neighbors(&mut self) -> impl Future<Output = Result<Vec<NeighborEntry>>> + Send;

    /// Link aggregation groups. Empty, with a warning, when there are none.
    fn lacp_groups(&mut self) -> impl Future<Output = Result<Vec<LacpGroup>>> + Send;

    /// One aggregation group by name.
    fn lacp_group(&mut self, name: &str) -> impl Future<Output = Result<Option<LacpGroup>>> + Send {
        async move {
            Ok(self
                .lacp_groups()
                .await?
                .into_iter()
                .find(|group| group.name == name))
        }
    }

    /// Ping `target` from the device with [`DEFAULT_PING_COUNT`] probes.
    fn ping(&mut self, target: &str) -> impl Future<Output = Result<bool>> + Send {
        self.ping_remote(target, DEFAULT_PING_COUNT)
    }

    /// Ping `target` from the device; `true` if any probe was answered.
    fn ping_remote(&mut self, target: &str, count: u32)
    -> impl Future<Output = Result<bool>> + Send;

    /// Run a raw command and return its output.
    fn exec_command(&mut self, command: &str) -> impl Future<Output = Result<String>> + Send;

    /// Release the session. The driver cannot be reconnected afterwards.
    fn close(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Whether the session is open.
    fn is_open(&self) -> bool;
}

/// Validate ping arguments before they reach a command line.
pub(crate) fn check_ping_args(target: &str, count: u32) -> Result<()> {
    if count == 0 {
        return Err(DriverError::InvalidArgument {
            message: "ping count must be at least 1".to_string(),
        }
        .into());
    }
    if !is_ping_target(target) {
        return Err(DriverError::InvalidArgument {
            message: format!("invalid ping target '{target}'"),
        }
        .into());
    }
    Ok(())
}

/// An IP address, or a hostname made of letters, digits, `.`, `-` and `:`.
///
/// Anything else could carry a second command onto the device CLI.
fn is_ping_target(target: &str) -> bool {
    if target.parse::<IpAddr>().is_ok() {
        return true;
    }
    !target.is_empty()
        && !target.starts_with('-')
        && target
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | ':'))
}

/// Take the records out of a parse result, logging any notice.
pub(crate) fn records<T>(parsed: Parsed<T>) -> Vec<T> {
    if let Some(notice) = parsed.notice {
        warn!("{}", notice);
    }
    parsed.records
}

/// A driver for any supported platform, chosen at construction.
#[derive(Debug)]
pub enum DeviceDriver<T> {
    Ios(IosDriver<T>),
    RouterOs(RouterOsDriver<T>),
}

impl<T: Transport> DeviceDriver<T> {
    /// Create the driver for `platform` over `transport`.
    pub fn new(platform: Platform, transport: T, timeout: Duration) -> Self {
        match platform {
            Platform::CiscoIos => DeviceDriver::Ios(IosDriver::new(transport, timeout)),
            Platform::MikrotikRouterOs => {
                DeviceDriver::RouterOs(RouterOsDriver::new(transport, timeout))
            }
        }
    }

    /// The platform this driver talks to.
    pub fn platform(&self) -> Platform {
        match self {
            DeviceDriver::Ios(_) => Platform::CiscoIos,
            DeviceDriver::RouterOs(_) => Platform::MikrotikRouterOs,
        }
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        match self {
            DeviceDriver::Ios(driver) => driver.session().transport(),
            DeviceDriver::RouterOs(driver) => driver.session().transport(),
        }
    }
}

macro_rules! dispatch {
    ($self:ident, $driver:ident => $call:expr) => {
        match $self {
            DeviceDriver::Ios($driver) => $call,
            DeviceDriver::RouterOs($driver) => $call,
        }
    };
}

impl<T: Transport> NetworkDriver for DeviceDriver<T> {
    async fn connect(&mut self) -> Result<()> {
        dispatch!(self, driver => driver.connect().await)
    }

    async fn running_config(&mut self) -> Result<String> {
        dispatch!(self, driver => driver.running_config().await)
    }

    async fn interfaces(&mut self) -> Result<Vec<IpInterface>> {
        dispatch!(self, driver => driver.interfaces().await)
    }

    async fn arp_table(&mut self) -> Result<Vec<ArpEntry>> {
        dispatch!(self, driver => driver.arp_table().await)
    }

    async fn mac_address_table(&mut self) -> Result<Vec<MacAddressEntry>> {
        dispatch!(self, driver => driver.mac_address_table().await)
    }

    async fn vlans(&mut self) -> Result<Vec<VlanEntry>> {
        dispatch!(self, driver => driver.vlans().await)
    }

    async fn neighbors(&mut self) -> Result<Vec<NeighborEntry>> {
        dispatch!(self, driver => driver.neighbors().await)
    }

    async fn lacp_groups(&mut self) -> Result<Vec<LacpGroup>> {
        dispatch!(self, driver => driver.lacp_groups().await)
    }

    async fn ping_remote(&mut self, target: &str, count: u32) -> Result<bool> {
        dispatch!(self, driver => driver.ping_remote(target, count).await)
    }

    async fn exec_command(&mut self, command: &str) -> Result<String> {
        dispatch!(self, driver => driver.exec_command(command).await)
    }

    async fn close(&mut self) -> Result<()> {
        dispatch!(self, driver => driver.close().await)
    }

    fn is_open(&self) -> bool {
        dispatch!(self, driver => driver.is_open())
    }
}
