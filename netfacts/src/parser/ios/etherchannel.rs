//! `show etherchannel summary` parsing.

use std::sync::LazyLock;

use log::warn;
use regex::Regex;

use crate::error::{ParseError, UnsupportedFeature};
use crate::model::{LacpGroup, LacpState};
use crate::parser::{Parsed, Rows, fields};

const ETHERCHANNEL: &str = "etherchannel summary";

const GROUP_COUNT_LABEL: &str = "Number of channel-groups in use:";

/// Flag marking a port-channel as in use.
const IN_USE_FLAG: char = 'U';

static LEADING_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\w+)").expect("valid port-channel regex"));

/// Parse `show etherchannel summary`.
///
/// ```text
/// Number of channel-groups in use: 1
/// Number of aggregators:           1
///
/// Group  Port-channel  Protocol    Ports
/// ------+-------------+-----------+-----------------------------------------------
/// 1      Po1(SU)         LACP      Gi0/1(P)    Gi0/2(P)
/// ```
///
/// A group is `running` when the last flag of its port-channel is `U`.
/// Member ports lose their `(X)` flag suffix. Lines indented under a group
/// continue its member list.
pub fn parse_lacp_groups(output: &str) -> Result<Parsed<LacpGroup>, ParseError> {
    let expected = group_count(output)?;
    if expected == 0 {
        return Ok(Parsed::unsupported(UnsupportedFeature::NoLacpGroups));
    }

    let Some(separator) = output.lines().position(is_separator) else {
        return Err(ParseError::unrecognized(
            ETHERCHANNEL,
            output,
            "missing the group table separator",
        ));
    };

    let mut rows = Rows::<LacpGroup>::new(ETHERCHANNEL);

    for line in output.lines().skip(separator + 1) {
        if line.trim().is_empty() {
            continue;
        }

        if line.starts_with(char::is_whitespace) {
            match rows.last_mut() {
                Some(group) => group
                    .members
                    .extend(line.split_whitespace().map(member_name)),
                None => rows.reject(line, "member continuation without a group"),
            }
            continue;
        }

        rows.push(parse_group_row(line));
    }

    let groups = rows.finish(output)?;
    if groups.len() != expected {
        warn!(
            "device reports {} channel-groups but {} were parsed",
            expected,
            groups.len()
        );
    }

    Ok(Parsed::found(groups))
}

fn group_count(output: &str) -> Result<usize, ParseError> {
    let count = output
        .lines()
        .find_map(|line| line.split_once(GROUP_COUNT_LABEL))
        .map(|(_, count)| count.trim());

    match count {
        Some(count) => count.parse().map_err(|_| {
            ParseError::unrecognized(
                ETHERCHANNEL,
                output,
                format!("channel-group count '{count}' is not a number"),
            )
        }),
        None => Err(ParseError::unrecognized(
            ETHERCHANNEL,
            output,
            format!("missing '{GROUP_COUNT_LABEL}' line"),
        )),
    }
}

fn is_separator(line: &str) -> bool {
    line.trim_start().starts_with("---") && line.contains('+')
}

fn parse_group_row(line: &str) -> Result<LacpGroup, ParseError> {
    let row = fields(line);
    let [_group, channel, mode, members @ ..] = row.as_slice() else {
        return Err(ParseError::row(
            ETHERCHANNEL,
            line,
            format!("expected at least 3 columns, found {}", row.len()),
        ));
    };

    let name = LEADING_WORD
        .captures(channel)
        .map(|caps| caps[1].to_string())
        .ok_or_else(|| ParseError::row(ETHERCHANNEL, line, "port-channel has no name"))?;

    let state = match channel.strip_suffix(')').and_then(|flags| flags.chars().last()) {
        Some(IN_USE_FLAG) => LacpState::Running,
        _ => LacpState::Disabled,
    };

    Ok(LacpGroup {
        name,
        mode: mode.to_string(),
        state,
        members: members.iter().map(|m| member_name(m)).collect(),
    })
}

/// Strip the three-character `(X)` flag suffix from a member port.
fn member_name(token: &str) -> String {
    let bytes = token.as_bytes();
    if bytes.len() > 3 && bytes[bytes.len() - 3] == b'(' && token.ends_with(')') {
        token[..token.len() - 3].to_string()
    } else {
        token.to_string()
    }
}
