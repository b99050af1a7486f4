//! Remote command execution.
//!
//! Drivers depend only on the narrow [`Transport`] contract: open a session,
//! run a command and get its text back, close. [`SshTransport`] talks to real
//! devices; [`ReplayTransport`] serves recorded output.

pub mod config;
mod replay;
mod ssh;

pub use config::{AuthMethod, HostKeyVerification, SshConfig};
pub use replay::ReplayTransport;
pub use ssh::SshTransport;

use std::future::Future;
use std::time::Duration;

use crate::error::Result;

/// A channel that runs CLI commands on one device.
pub trait Transport: Send {
    /// Connect and authenticate.
    fn open(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Run one command and return its output as plain text.
    ///
    /// `timeout` bounds the whole command; `None` uses the transport default.
    fn execute(
        &mut self,
        command: &str,
        timeout: Option<Duration>,
    ) -> impl Future<Output = Result<String>> + Send;

    /// Run commands in order as one unit and return the combined output.
    fn execute_batch(
        &mut self,
        commands: &[&str],
        timeout: Option<Duration>,
    ) -> impl Future<Output = Result<String>> + Send {
        async move {
            let mut output = String::new();
            for command in commands {
                output.push_str(&self.execute(command, timeout).await?);
            }
            Ok(output)
        }
    }

    /// Release the session.
    fn close(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Whether the session is open.
    fn is_open(&self) -> bool;
}
