use crate::error::{ParseError, UnsupportedFeature};
use crate::model::{LacpGroup, LacpState};
use crate::parser::Parsed;
use crate::parser::routeros::{detail_entries, has_indexed_lines, property};

const BONDING: &str = "interface bonding";

/// Parse `/interface bonding print detail`.
///
/// ```text
/// Flags: X - disabled; R - running
///  0  R name="bond1" mtu=1500 mac-address=48:8F:5A:00:00:02 arp=enabled
///       slaves=ether2,ether3 mode=802.3ad primary=none link-monitoring=mii
/// ```
///
/// Newer releases name the member list `ports=` instead of `slaves=`.
pub fn parse_lacp_groups(output: &str) -> Result<Parsed<LacpGroup>, ParseError> {
    if output.trim().is_empty() {
        return Ok(Parsed::unsupported(UnsupportedFeature::NoLacpGroups));
    }

    let entries = detail_entries(output);
    if entries.is_empty() && has_indexed_lines(output) {
        return Err(ParseError::unrecognized(
            BONDING,
            output,
            "indexed entries without name=",
        ));
    }

    let groups = entries
        .into_iter()
        .map(|entry| {
            let members = property(entry.body, "slaves")
                .or_else(|| property(entry.body, "ports"))
                .unwrap_or_default();

            LacpGroup {
                name: entry.name.to_string(),
                mode: property(entry.body, "mode").unwrap_or_default().to_string(),
                state: if entry.has_flag('R') && !entry.has_flag('X') {
                    LacpState::Running
                } else {
                    LacpState::Disabled
                },
                members: members
                    .split(',')
                    .filter(|member| !member.is_empty())
                    .map(str::to_string)
                    .collect(),
            }
        })
        .collect();

    Ok(Parsed::found(groups))
}
