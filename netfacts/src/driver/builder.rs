//! Builder for creating device drivers.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use super::DeviceDriver;
use crate::error::{DriverError, Result};
use crate::platform::Platform;
use crate::transport::SshTransport;
use crate::transport::config::{AuthMethod, HostKeyVerification, SshConfig};

/// Builder for constructing SSH-backed device drivers.
///
/// # Example
///
/// ```rust,no_run
/// use netfacts::{DriverBuilder, NetworkDriver, Platform};
///
/// # async fn example() -> Result<(), netfacts::Error> {
/// let mut driver = DriverBuilder::new("192.168.1.1")
///     .username("admin")
///     .password("secret")
///     .platform(Platform::CiscoIos)
///     .build()?;
/// driver.connect().await?;
/// # Ok(())
/// # }
/// ```
pub struct DriverBuilder {
    host: String,
    port: u16,
    username: Option<String>,
    auth: AuthMethod,
    platform: Option<Platform>,
    timeout: Duration,
    host_key_verification: HostKeyVerification,
    known_hosts_path: Option<PathBuf>,
}

impl DriverBuilder {
    /// Create a new driver builder for the specified host.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: 22,
            username: None,
            auth: AuthMethod::None,
            platform: None,
            timeout: Duration::from_secs(30),
            host_key_verification: HostKeyVerification::default(),
            known_hosts_path: None,
        }
    }

    /// Set the SSH port (default: 22).
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the username for authentication.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set password authentication.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.auth = AuthMethod::Password(SecretString::from(password.into()));
        self
    }

    /// Set private key authentication.
    pub fn private_key(mut self, key_path: impl Into<PathBuf>) -> Self {
        self.auth = AuthMethod::PrivateKey {
            path: key_path.into(),
            passphrase: None,
        };
        self
    }

    /// Set private key authentication with passphrase.
    pub fn private_key_with_passphrase(
        mut self,
        key_path: impl Into<PathBuf>,
        passphrase: impl Into<String>,
    ) -> Self {
        self.auth = AuthMethod::PrivateKey {
            path: key_path.into(),
            passphrase: Some(SecretString::from(passphrase.into())),
        };
        self
    }

    /// Set the device platform.
    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Set the connection and per-command timeout (default: 30s).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the host key verification mode (default: accept new keys).
    pub fn host_key_verification(mut self, mode: HostKeyVerification) -> Self {
        self.host_key_verification = mode;
        self
    }

    /// Use a known_hosts file other than `~/.ssh/known_hosts`.
    pub fn known_hosts_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.known_hosts_path = Some(path.into());
        self
    }

    /// Build the driver.
    ///
    /// This creates the driver but does not connect. Call `connect()` on the
    /// returned driver to establish the connection.
    pub fn build(self) -> Result<DeviceDriver<SshTransport>> {
        let username = self.username.ok_or_else(|| DriverError::InvalidConfig {
            message: "Username is required".to_string(),
        })?;

        let platform = self.platform.ok_or_else(|| DriverError::InvalidConfig {
            message: "Platform must be specified".to_string(),
        })?;

        let ssh_config = SshConfig {
            host: self.host,
            port: self.port,
            username,
            auth: self.auth,
            timeout: self.timeout,
            host_key_verification: self.host_key_verification,
            known_hosts_path: self.known_hosts_path,
        };

        Ok(DeviceDriver::new(
            platform,
            SshTransport::new(ssh_config),
            self.timeout,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_build() {
        let driver = DriverBuilder::new("10.0.0.1")
            .port(2222)
            .username("admin")
            .password("secret")
            .platform(Platform::MikrotikRouterOs)
            .timeout(Duration::from_secs(10))
            .host_key_verification(HostKeyVerification::Disabled)
            .build()
            .unwrap();

        assert_eq!(driver.platform(), Platform::MikrotikRouterOs);
        let config = driver.transport().config();
        assert_eq!(config.socket_addr(), "10.0.0.1:2222");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(matches!(config.auth, AuthMethod::Password(_)));
    }

    #[test]
    fn test_missing_username() {
        let err = DriverBuilder::new("10.0.0.1")
            .platform(Platform::CiscoIos)
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, Error::Driver(DriverError::InvalidConfig { .. })));
    }

    #[test]
    fn test_missing_platform() {
        let err = DriverBuilder::new("10.0.0.1")
            .username("admin")
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, Error::Driver(DriverError::InvalidConfig { .. })));
    }
}
