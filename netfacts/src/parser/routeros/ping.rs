use std::sync::LazyLock;

use regex::Regex;

use crate::error::ParseError;

static RECEIVED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"received=(\d+)").expect("valid ping regex"));

/// Whether any probe of a RouterOS `ping` was answered.
///
/// RouterOS repeats the `sent= received=` summary as probes complete; the
/// last one is final.
pub fn parse_ping(output: &str) -> Result<bool, ParseError> {
    let received: u32 = RECEIVED
        .captures_iter(output)
        .last()
        .and_then(|caps| caps[1].parse().ok())
        .ok_or_else(|| ParseError::unrecognized("ping", output, "no received= count"))?;

    Ok(received > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reachable() {
        let output = "\
  SEQ HOST                                     SIZE TTL TIME       STATUS
    0 10.0.0.2                                   56  64 412us
    1 10.0.0.2                                   56  64 380us
    sent=2 received=2 packet-loss=0% min-rtt=380us avg-rtt=396us max-rtt=412us";
        assert!(parse_ping(output).unwrap());
    }

    #[test]
    fn test_unreachable() {
        let output = "\
  SEQ HOST                                     SIZE TTL TIME       STATUS
    0 10.9.9.9                                                     timeout
    sent=1 received=0 packet-loss=100%
    1 10.9.9.9                                                     timeout
    sent=2 received=0 packet-loss=100%";
        assert!(!parse_ping(output).unwrap());
    }

    #[test]
    fn test_missing_summary() {
        let err = parse_ping("invalid value for argument address").unwrap_err();
        assert!(matches!(err, ParseError::UnrecognizedOutput { table: "ping", .. }));
    }
}
