//! # Netfacts
//!
//! Async retrieval of operational state from network devices.
//!
//! Netfacts runs vendor CLI commands over SSH and parses their free-text
//! output into one data model: interfaces, ARP and MAC tables, VLANs,
//! CDP/LLDP neighbors and link aggregation groups.
//!
//! ## Features
//!
//! - Async SSH sessions via russh, one exec channel per command
//! - Cisco IOS and MikroTik RouterOS 7 drivers behind one [`NetworkDriver`] trait
//! - Pure, fixture-testable parsers in [`parser`]
//! - Canonical MAC addresses (`AA:BB:CC:DD:EE:FF`) whatever the vendor notation
//! - Offline replay of captured output with [`ReplayTransport`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use netfacts::{DriverBuilder, NetworkDriver, Platform};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), netfacts::Error> {
//!     let mut driver = DriverBuilder::new("192.168.1.1")
//!         .username("admin")
//!         .password("secret")
//!         .platform(Platform::CiscoIos)
//!         .build()?;
//!
//!     driver.connect().await?;
//!
//!     for interface in driver.interfaces().await? {
//!         println!("{interface}");
//!     }
//!
//!     driver.close().await?;
//!     Ok(())
//! }
//! ```

pub mod driver;
pub mod error;
pub mod model;
pub mod normalize;
pub mod parser;
pub mod platform;
pub mod transport;

// Re-export main types for convenience
pub use driver::{DeviceDriver, DriverBuilder, IosDriver, NetworkDriver, RouterOsDriver};
pub use error::{Error, ParseError, Result, UnsupportedFeature};
pub use model::{
    ArpEntry, IpInterface, LacpGroup, LacpState, LinkState, MacAddress, MacAddressEntry,
    NeighborEntry, VlanEntry, VlanStatus,
};
pub use normalize::normalize_mac;
pub use platform::{Platform, PlatformDefinition};
pub use transport::{AuthMethod, HostKeyVerification, ReplayTransport, SshConfig, SshTransport, Transport};
