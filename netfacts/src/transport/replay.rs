//! Transport serving recorded command output.

use std::time::Duration;

use indexmap::IndexMap;
use log::debug;

use super::Transport;
use crate::error::{DriverError, Result, TransportError};

/// A [`Transport`] that answers commands from recorded output.
///
/// Useful for parsing captures offline and for exercising drivers without a
/// device. Every executed command is kept in [`history`](Self::history).
///
/// ```
/// use netfacts::transport::{ReplayTransport, Transport};
///
/// # tokio_test::block_on(async {
/// let mut transport = ReplayTransport::new().with_response("/export", "# config");
/// transport.open().await.unwrap();
/// assert_eq!(transport.execute("/export", None).await.unwrap(), "# config");
/// assert_eq!(transport.history(), ["/export"]);
/// # });
/// ```
#[derive(Debug, Default)]
pub struct ReplayTransport {
    responses: IndexMap<String, String>,
    rejected_user: Option<String>,
    history: Vec<String>,
    open: bool,
}

impl ReplayTransport {
    /// Create a transport with no recorded output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the output of `command`.
    pub fn with_response(mut self, command: impl Into<String>, output: impl Into<String>) -> Self {
        self.responses.insert(command.into(), output.into());
        self
    }

    /// Make [`Transport::open`] fail as if `user` had been rejected.
    pub fn rejecting_credentials(mut self, user: impl Into<String>) -> Self {
        self.rejected_user = Some(user.into());
        self
    }

    /// Commands executed so far, in order.
    pub fn history(&self) -> &[String] {
        &self.history
    }
}

impl Transport for ReplayTransport {
    async fn open(&mut self) -> Result<()> {
        if self.open {
            return Err(DriverError::AlreadyConnected.into());
        }
        if let Some(user) = &self.rejected_user {
            return Err(TransportError::AuthenticationFailed { user: user.clone() }.into());
        }
        self.open = true;
        Ok(())
    }

    async fn execute(&mut self, command: &str, _timeout: Option<Duration>) -> Result<String> {
        if !self.open {
            return Err(DriverError::NotConnected.into());
        }

        debug!("replay '{}'", command);
        self.history.push(command.to_string());

        self.responses.get(command).cloned().ok_or_else(|| {
            DriverError::CommandFailed {
                command: command.to_string(),
                message: "no recorded output".to_string(),
            }
            .into()
        })
    }

    async fn close(&mut self) -> Result<()> {
        self.open = false;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execute_requires_open() {
        tokio_test::block_on(async {
            let mut transport = ReplayTransport::new().with_response("show arp", "");
            let err = transport.execute("show arp", None).await.unwrap_err();
            assert!(matches!(err, crate::Error::Driver(DriverError::NotConnected)));
        });
    }

    #[test]
    fn test_missing_response() {
        tokio_test::block_on(async {
            let mut transport = ReplayTransport::new();
            transport.open().await.unwrap();
            let err = transport.execute("show clock", None).await.unwrap_err();
            assert!(matches!(
                err,
                crate::Error::Driver(DriverError::CommandFailed { ref command, .. }) if command == "show clock"
            ));
            assert_eq!(transport.history(), ["show clock"]);
        });
    }

    #[test]
    fn test_rejected_credentials() {
        tokio_test::block_on(async {
            let mut transport = ReplayTransport::new().rejecting_credentials("admin");
            let err = transport.open().await.unwrap_err();
            assert!(err.is_authentication_failure());
            assert!(!transport.is_open());
        });
    }

    #[test]
    fn test_batch_concatenates() {
        tokio_test::block_on(async {
            let mut transport = ReplayTransport::new()
                .with_response("configure terminal", "")
                .with_response("hostname r1", "")
                .with_response("end", "r1#");
            transport.open().await.unwrap();
            let output = transport
                .execute_batch(&["configure terminal", "hostname r1", "end"], None)
                .await
                .unwrap();
            assert_eq!(output, "r1#");
            assert_eq!(transport.history().len(), 3);
        });
    }

    #[test]
    fn test_double_open() {
        tokio_test::block_on(async {
            let mut transport = ReplayTransport::new();
            transport.open().await.unwrap();
            assert!(transport.open().await.is_err());
            transport.close().await.unwrap();
            assert!(!transport.is_open());
        });
    }
}
