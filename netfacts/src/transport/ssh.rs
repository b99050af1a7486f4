//! SSH transport implementation using russh.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::BytesMut;
use log::{debug, trace, warn};
use russh::client::{self, Handle, Msg};
use russh::keys::{PrivateKeyWithHashAlg, PublicKey, load_secret_key};
use russh::{Channel, ChannelMsg};
use secrecy::ExposeSecret;

use super::Transport;
use super::config::{AuthMethod, HostKeyVerification, SshConfig};
use crate::error::{DriverError, Result, TransportError};
use crate::normalize::clean_output;

/// SSH transport wrapping a russh client.
///
/// Every command runs on its own exec channel, so no prompt matching or
/// pager handling is needed. Batches are written to the stdin of a single
/// non-PTY shell channel.
pub struct SshTransport {
    /// Configuration used for this connection.
    config: SshConfig,

    /// The russh session handle, present while open.
    session: Option<Handle<SshHandler>>,
}

impl SshTransport {
    /// Create a transport; nothing is connected until [`Transport::open`].
    pub fn new(config: SshConfig) -> Self {
        Self {
            config,
            session: None,
        }
    }

    /// The connection configuration.
    pub fn config(&self) -> &SshConfig {
        &self.config
    }

    /// Connect to the SSH server and authenticate.
    async fn connect(config: &SshConfig) -> Result<Handle<SshHandler>> {
        let ssh_config = Arc::new(client::Config {
            inactivity_timeout: Some(config.timeout),
            ..Default::default()
        });

        let host_key_error: Arc<Mutex<Option<TransportError>>> = Arc::new(Mutex::new(None));

        let handler = SshHandler {
            host: config.host.clone(),
            port: config.port,
            host_key_verification: config.host_key_verification.clone(),
            known_hosts_path: config.known_hosts_path.clone(),
            host_key_error: host_key_error.clone(),
        };

        debug!("connecting to {}", config.socket_addr());

        let mut session = tokio::time::timeout(
            config.timeout,
            client::connect(ssh_config, (config.host.as_str(), config.port), handler),
        )
        .await
        .map_err(|_| TransportError::Timeout(config.timeout))?
        .map_err(|e| {
            // check_server_key leaves a detailed error behind when it rejects a key
            if let Some(hk_err) = host_key_error.lock().ok().and_then(|mut slot| slot.take()) {
                return hk_err;
            }
            match e {
                russh::Error::IO(source) => TransportError::ConnectionFailed {
                    host: config.host.clone(),
                    port: config.port,
                    source,
                },
                other => TransportError::Ssh(other),
            }
        })?;

        Self::authenticate(&mut session, config).await?;

        debug!("authenticated to {} as '{}'", config.socket_addr(), config.username);
        Ok(session)
    }

    /// Authenticate with the server.
    async fn authenticate(session: &mut Handle<SshHandler>, config: &SshConfig) -> Result<()> {
        let success = match &config.auth {
            AuthMethod::None => session
                .authenticate_none(&config.username)
                .await
                .map_err(TransportError::Ssh)?
                .success(),
            AuthMethod::Password(password) => session
                .authenticate_password(&config.username, password.expose_secret())
                .await
                .map_err(TransportError::Ssh)?
                .success(),
            AuthMethod::PrivateKey { path, passphrase } => {
                let key = load_secret_key(
                    path,
                    passphrase.as_ref().map(|secret| secret.expose_secret()),
                )
                .map_err(|e| TransportError::Key(e.to_string()))?;

                // Get the best RSA hash algorithm supported by the server
                let hash_alg = session
                    .best_supported_rsa_hash()
                    .await
                    .map_err(TransportError::Ssh)?
                    .flatten();

                session
                    .authenticate_publickey(
                        &config.username,
                        PrivateKeyWithHashAlg::new(Arc::new(key), hash_alg),
                    )
                    .await
                    .map_err(TransportError::Ssh)?
                    .success()
            }
        };

        if !success {
            return Err(TransportError::AuthenticationFailed {
                user: config.username.clone(),
            }
            .into());
        }

        Ok(())
    }

    fn session(&self) -> Result<&Handle<SshHandler>> {
        let session = self.session.as_ref().ok_or(DriverError::NotConnected)?;
        if session.is_closed() {
            return Err(TransportError::Disconnected.into());
        }
        Ok(session)
    }

    async fn run_exec(session: &Handle<SshHandler>, command: &str) -> Result<String> {
        let mut channel = session
            .channel_open_session()
            .await
            .map_err(TransportError::Ssh)?;

        channel
            .exec(true, command)
            .await
            .map_err(TransportError::Ssh)?;

        read_to_close(&mut channel).await
    }

    async fn run_shell(session: &Handle<SshHandler>, script: &str) -> Result<String> {
        let mut channel = session
            .channel_open_session()
            .await
            .map_err(TransportError::Ssh)?;

        channel
            .request_shell(true)
            .await
            .map_err(TransportError::Ssh)?;

        channel
            .data(script.as_bytes())
            .await
            .map_err(TransportError::Ssh)?;

        channel.eof().await.map_err(TransportError::Ssh)?;

        read_to_close(&mut channel).await
    }
}

/// Collect stdout and stderr until the server closes the channel.
async fn read_to_close(channel: &mut Channel<Msg>) -> Result<String> {
    let mut output = BytesMut::new();

    while let Some(msg) = channel.wait().await {
        match msg {
            ChannelMsg::Data { data } | ChannelMsg::ExtendedData { data, .. } => {
                output.extend_from_slice(&data);
            }
            ChannelMsg::ExitStatus { exit_status } => {
                trace!("remote command exited with status {}", exit_status);
            }
            ChannelMsg::Close => break,
            _ => {}
        }
    }

    let text = clean_output(&output);
    trace!("received {} bytes:\n{}", output.len(), text);
    Ok(text)
}

impl Transport for SshTransport {
    async fn open(&mut self) -> Result<()> {
        if self.session.is_some() {
            return Err(DriverError::AlreadyConnected.into());
        }
        self.session = Some(Self::connect(&self.config).await?);
        Ok(())
    }

    async fn execute(&mut self, command: &str, timeout: Option<Duration>) -> Result<String> {
        let timeout = timeout.unwrap_or(self.config.timeout);
        let session = self.session()?;

        debug!("exec '{}' (timeout {:?})", command, timeout);
        tokio::time::timeout(timeout, Self::run_exec(session, command))
            .await
            .map_err(|_| TransportError::Timeout(timeout))?
    }

    async fn execute_batch(
        &mut self,
        commands: &[&str],
        timeout: Option<Duration>,
    ) -> Result<String> {
        let timeout = timeout.unwrap_or(self.config.timeout);
        let session = self.session()?;

        let mut script = commands.join("\n");
        script.push('\n');

        debug!("shell batch of {} commands (timeout {:?})", commands.len(), timeout);
        tokio::time::timeout(timeout, Self::run_shell(session, &script))
            .await
            .map_err(|_| TransportError::Timeout(timeout))?
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(session) = self.session.take() {
            debug!("disconnecting from {}", self.config.socket_addr());
            session
                .disconnect(russh::Disconnect::ByApplication, "", "en")
                .await
                .map_err(TransportError::Ssh)?;
        }
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| !session.is_closed())
    }
}

/// SSH client handler for russh.
struct SshHandler {
    host: String,
    port: u16,
    host_key_verification: HostKeyVerification,
    known_hosts_path: Option<PathBuf>,
    /// Stores a detailed host-key error so connect() can surface it
    /// instead of the generic russh::Error::UnknownKey.
    host_key_error: Arc<Mutex<Option<TransportError>>>,
}

impl SshHandler {
    /// Check the host key against known_hosts.
    ///
    /// Returns `Ok(true)` if matched, `Ok(false)` if host not found,
    /// `Err(TransportError::HostKeyChanged)` if key changed.
    fn check_known_hosts(&self, pubkey: &PublicKey) -> std::result::Result<bool, TransportError> {
        let result = if let Some(ref path) = self.known_hosts_path {
            russh::keys::check_known_hosts_path(&self.host, self.port, pubkey, path)
        } else {
            russh::keys::check_known_hosts(&self.host, self.port, pubkey)
        };

        match result {
            Ok(matched) => Ok(matched),
            Err(russh::keys::Error::KeyChanged { line }) => Err(TransportError::HostKeyChanged {
                host: self.host.clone(),
                port: self.port,
                line,
            }),
            Err(e) => Err(TransportError::KnownHosts(e.to_string())),
        }
    }

    /// Save a new host key to known_hosts.
    fn learn_host_key(&self, pubkey: &PublicKey) -> std::result::Result<(), TransportError> {
        let result = if let Some(ref path) = self.known_hosts_path {
            russh::keys::known_hosts::learn_known_hosts_path(&self.host, self.port, pubkey, path)
        } else {
            russh::keys::known_hosts::learn_known_hosts(&self.host, self.port, pubkey)
        };

        result.map_err(|e| TransportError::KnownHosts(e.to_string()))
    }

    /// Record why a key was rejected and reject it.
    fn reject(&self, error: TransportError) -> bool {
        warn!("rejecting host key for {}:{}: {}", self.host, self.port, error);
        if let Ok(mut slot) = self.host_key_error.lock() {
            *slot = Some(error);
        }
        false
    }
}

impl client::Handler for SshHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &PublicKey,
    ) -> std::result::Result<bool, Self::Error> {
        match self.host_key_verification {
            HostKeyVerification::Disabled => Ok(true),

            HostKeyVerification::AcceptNew => match self.check_known_hosts(server_public_key) {
                Ok(true) => Ok(true),
                Ok(false) => {
                    if let Err(e) = self.learn_host_key(server_public_key) {
                        warn!("Failed to save host key: {}", e);
                    }
                    Ok(true)
                }
                Err(e) => Ok(self.reject(e)),
            },

            HostKeyVerification::Strict => match self.check_known_hosts(server_public_key) {
                Ok(true) => Ok(true),
                Ok(false) => Ok(self.reject(TransportError::HostKeyUnknown {
                    host: self.host.clone(),
                    port: self.port,
                })),
                Err(e) => Ok(self.reject(e)),
            },
        }
    }
}
