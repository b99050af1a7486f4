//! Session lifecycle shared by the vendor drivers.

use std::time::Duration;

use log::{debug, warn};

use crate::error::{DriverError, Result};
use crate::platform::PlatformDefinition;
use crate::transport::Transport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Idle,
    Open,
    Closed,
}

/// One transport session bound to a platform.
///
/// A session goes `Idle -> Open -> Closed` exactly once; a closed session
/// cannot be reopened.
#[derive(Debug)]
pub struct Session<T> {
    transport: T,
    platform: PlatformDefinition,
    timeout: Duration,
    state: SessionState,
}

impl<T: Transport> Session<T> {
    pub fn new(transport: T, platform: PlatformDefinition, timeout: Duration) -> Self {
        Self {
            transport,
            platform,
            timeout,
            state: SessionState::Idle,
        }
    }

    pub async fn open(&mut self) -> Result<()> {
        match self.state {
            SessionState::Open => Err(DriverError::AlreadyConnected.into()),
            SessionState::Closed => Err(DriverError::SessionClosed.into()),
            SessionState::Idle => {
                self.transport.open().await?;
                self.state = SessionState::Open;
                debug!("{} session open", self.platform.name);
                Ok(())
            }
        }
    }

    fn ensure_open(&self) -> Result<()> {
        match self.state {
            SessionState::Open => Ok(()),
            SessionState::Idle => Err(DriverError::NotConnected.into()),
            SessionState::Closed => Err(DriverError::SessionClosed.into()),
        }
    }

    /// Run a command with the session timeout.
    pub async fn run(&mut self, command: &str) -> Result<String> {
        let timeout = self.timeout;
        self.run_with_timeout(command, timeout).await
    }

    /// Run a command, failing if the output matches a platform failure pattern.
    pub async fn run_with_timeout(&mut self, command: &str, timeout: Duration) -> Result<String> {
        self.ensure_open()?;
        let output = self.transport.execute(command, Some(timeout)).await?;
        self.check(command, &output)?;
        Ok(output)
    }

    /// Run commands as one batch.
    pub async fn run_batch(&mut self, commands: &[&str]) -> Result<String> {
        self.ensure_open()?;
        let output = self
            .transport
            .execute_batch(commands, Some(self.timeout))
            .await?;
        self.check(&commands.join("; "), &output)?;
        Ok(output)
    }

    fn check(&self, command: &str, output: &str) -> Result<()> {
        match self.platform.detect_failure(output) {
            Some(line) => {
                warn!("'{}' failed on {}: {}", command, self.platform.name, line);
                Err(DriverError::CommandFailed {
                    command: command.to_string(),
                    message: line.to_string(),
                }
                .into())
            }
            None => Ok(()),
        }
    }

    /// Close the session. Closing twice is a no-op.
    pub async fn close(&mut self) -> Result<()> {
        let was_open = self.state == SessionState::Open;
        self.state = SessionState::Closed;
        if was_open {
            self.transport.close().await?;
            debug!("{} session closed", self.platform.name);
        }
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.state == SessionState::Open
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn platform(&self) -> &PlatformDefinition {
        &self.platform
    }
}
