//! Error types for netfacts.

use std::io;
use thiserror::Error;

/// Main error type for netfacts operations.
#[derive(Error, Debug)]
pub enum Error {
    /// SSH transport-level errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Driver-level errors
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    /// Command output did not have the expected shape
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Platform/vendor errors
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),
}

impl Error {
    /// The device could not be reached (unreachable host, closed port, timeout).
    pub fn is_connection_failure(&self) -> bool {
        matches!(
            self,
            Error::Transport(
                TransportError::ConnectionFailed { .. }
                    | TransportError::Timeout(_)
                    | TransportError::Disconnected
            )
        )
    }

    /// The device rejected the supplied credentials.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            Error::Transport(TransportError::AuthenticationFailed { .. })
        )
    }

    /// The device answered, but its output could not be understood.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Error::Parse(_))
    }
}

/// Transport layer errors (SSH connection, authentication).
#[derive(Error, Debug)]
pub enum TransportError {
    /// Failed to connect to host
    #[error("Connection failed to {host}:{port}: {source}")]
    ConnectionFailed {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    /// SSH handshake or protocol error
    #[error("SSH error: {0}")]
    Ssh(#[from] russh::Error),

    /// Authentication failed
    #[error("Authentication failed for user '{user}'")]
    AuthenticationFailed { user: String },

    /// SSH key error
    #[error("SSH key error: {0}")]
    Key(String),

    /// Server presented a host key that differs from known_hosts
    #[error("Host key for {host}:{port} changed (known_hosts line {line})")]
    HostKeyChanged { host: String, port: u16, line: usize },

    /// Server is not in known_hosts and strict checking is enabled
    #[error("Host {host}:{port} is not in known_hosts")]
    HostKeyUnknown { host: String, port: u16 },

    /// known_hosts could not be read or written
    #[error("known_hosts error: {0}")]
    KnownHosts(String),

    /// Connection was closed unexpectedly
    #[error("Connection disconnected")]
    Disconnected,

    /// Operation timed out
    #[error("Operation timed out after {0:?}")]
    Timeout(std::time::Duration),
}

/// Driver layer errors (session lifecycle, command execution).
#[derive(Error, Debug)]
pub enum DriverError {
    /// Driver not connected
    #[error("Driver not connected - call connect() first")]
    NotConnected,

    /// Driver already connected
    #[error("Driver already connected")]
    AlreadyConnected,

    /// Driver was closed and cannot be reused
    #[error("Driver session was closed - create a new driver")]
    SessionClosed,

    /// Device reported a command failure
    #[error("Command '{command}' failed: {message}")]
    CommandFailed { command: String, message: String },

    /// Invalid argument passed to a query
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Invalid configuration in the driver builder
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

/// Command output parsing errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A MAC address did not contain exactly twelve hex digits
    #[error("Malformed MAC address '{raw}': expected 12 hex digits, found {digits}")]
    MalformedMac { raw: String, digits: usize },

    /// A single row did not match the expected shape
    #[error("Unparseable {table} row '{line}': {reason}")]
    Row {
        table: &'static str,
        line: String,
        reason: String,
    },

    /// The whole output did not match the expected shape
    #[error("Unrecognized {table} output: {reason}")]
    UnrecognizedOutput {
        table: &'static str,
        reason: String,
        /// The raw command output, kept for diagnosis.
        raw: String,
    },
}

impl ParseError {
    pub(crate) fn row(table: &'static str, line: &str, reason: impl Into<String>) -> Self {
        ParseError::Row {
            table,
            line: line.trim().to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unrecognized(table: &'static str, raw: &str, reason: impl Into<String>) -> Self {
        ParseError::UnrecognizedOutput {
            table,
            reason: reason.into(),
            raw: raw.to_string(),
        }
    }
}

/// Platform/vendor definition errors.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// Platform name not recognized
    #[error("Unknown platform '{name}'")]
    UnknownPlatform { name: String },
}

/// Non-fatal condition: the device does not run or has no instances of a feature.
///
/// Queries hitting one of these return an empty result and log a warning
/// instead of failing.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsupportedFeature {
    /// Neither CDP nor LLDP is enabled on the device
    #[error("no neighbor discovery protocol (CDP or LLDP) is enabled")]
    NeighborDiscoveryDisabled,

    /// The device has no VLANs configured
    #[error("no VLANs are configured")]
    NoVlans,

    /// The device has no link aggregation groups configured
    #[error("no LACP groups are configured")]
    NoLacpGroups,
}

/// Result type alias using netfacts's Error.
pub type Result<T> = std::result::Result<T, Error>;
