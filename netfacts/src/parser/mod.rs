//! Vendor command-output parsers.
//!
//! Each function here is pure: raw command output in, records out. Parsers
//! are split per output shape so every one can be exercised with literal
//! fixture text.
//!
//! Row handling is uniform across vendors:
//! - blank lines are skipped silently
//! - a row that does not fit is skipped and logged, keeping partial results
//! - if rows were present but none fit, the whole output is rejected with
//!   [`ParseError::UnrecognizedOutput`] carrying the raw text

pub mod ios;
pub mod routeros;

use std::net::IpAddr;

use log::warn;

use crate::error::{ParseError, UnsupportedFeature};
use crate::model::MacAddress;

/// Records parsed from one command, plus an optional non-fatal notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed<T> {
    /// The parsed records.
    pub records: Vec<T>,

    /// Set when the device reported the feature as absent.
    pub notice: Option<UnsupportedFeature>,
}

impl<T> Parsed<T> {
    /// Records found with no notice.
    pub fn found(records: Vec<T>) -> Self {
        Self {
            records,
            notice: None,
        }
    }

    /// Empty result explained by a notice.
    pub fn unsupported(notice: UnsupportedFeature) -> Self {
        Self {
            records: Vec::new(),
            notice: Some(notice),
        }
    }
}

/// Accumulates row-level results for one table.
pub(crate) struct Rows<T> {
    table: &'static str,
    records: Vec<T>,
    rejected: Vec<ParseError>,
}

impl<T> Rows<T> {
    pub(crate) fn new(table: &'static str) -> Self {
        Self {
            table,
            records: Vec::new(),
            rejected: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, row: Result<T, ParseError>) {
        match row {
            Ok(record) => self.records.push(record),
            Err(e) => self.rejected.push(e),
        }
    }

    /// Reject a row with a reason.
    pub(crate) fn reject(&mut self, line: &str, reason: impl Into<String>) {
        self.rejected.push(ParseError::row(self.table, line, reason));
    }

    /// Mutable access to the last accepted record, for continuation lines.
    pub(crate) fn last_mut(&mut self) -> Option<&mut T> {
        self.records.last_mut()
    }

    pub(crate) fn finish(self, raw: &str) -> Result<Vec<T>, ParseError> {
        if self.records.is_empty() && !self.rejected.is_empty() {
            return Err(ParseError::unrecognized(
                self.table,
                raw,
                format!("none of {} rows matched the expected layout", self.rejected.len()),
            ));
        }

        for rejected in &self.rejected {
            warn!("skipping row: {}", rejected);
        }

        Ok(self.records)
    }
}

/// Split a line on whitespace.
pub(crate) fn fields(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

/// Parse an IP address column, attributing failures to the row.
pub(crate) fn ip_field(table: &'static str, line: &str, raw: &str) -> Result<IpAddr, ParseError> {
    raw.parse()
        .map_err(|_| ParseError::row(table, line, format!("'{raw}' is not an IP address")))
}

/// Parse a MAC address column, attributing failures to the row.
pub(crate) fn mac_field(
    table: &'static str,
    line: &str,
    raw: &str,
) -> Result<MacAddress, ParseError> {
    raw.parse()
        .map_err(|e: ParseError| ParseError::row(table, line, e.to_string()))
}

/// Non-blank lines of `output` with their surrounding whitespace preserved.
pub(crate) fn content_lines(output: &str) -> impl Iterator<Item = &str> {
    output.lines().filter(|line| !line.trim().is_empty())
}
