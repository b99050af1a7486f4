use std::sync::LazyLock;

use regex::Regex;

use crate::error::ParseError;

static SUCCESS_RATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Success rate is (\d+) percent").expect("valid ping regex"));

/// Whether any probe of an IOS `ping` was answered.
pub fn parse_ping(output: &str) -> Result<bool, ParseError> {
    let rate: u32 = SUCCESS_RATE
        .captures(output)
        .and_then(|caps| caps[1].parse().ok())
        .ok_or_else(|| ParseError::unrecognized("ping", output, "no success rate reported"))?;

    Ok(rate > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reachable() {
        let output = "\
Type escape sequence to abort.
Sending 4, 100-byte ICMP Echos to 10.0.0.2, timeout is 2 seconds:
.!!!
Success rate is 75 percent (3/4), round-trip min/avg/max = 1/1/2 ms";
        assert!(parse_ping(output).unwrap());
    }

    #[test]
    fn test_unreachable() {
        let output = "\
Sending 4, 100-byte ICMP Echos to 10.9.9.9, timeout is 2 seconds:
....
Success rate is 0 percent (0/4)";
        assert!(!parse_ping(output).unwrap());
    }

    #[test]
    fn test_unresolvable_host() {
        let err = parse_ping("% Unrecognized host or address, or protocol not running.").unwrap_err();
        assert!(matches!(err, ParseError::UnrecognizedOutput { table: "ping", .. }));
    }
}
