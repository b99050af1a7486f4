//! RouterOS 7 console output.
//!
//! RouterOS prints two shapes: column tables (`print`) and `key=value`
//! listings (`print detail`). Detail entries start with an index, optional
//! flag letters and, for named items, a quoted `name=`.

mod bonding;
mod neighbors;
mod ping;
mod tables;

pub use bonding::parse_lacp_groups;
pub use neighbors::parse_neighbors;
pub use ping::parse_ping;
pub use tables::{
    parse_address_map, parse_arp_table, parse_interfaces, parse_mac_address_table, parse_vlans,
};

use std::sync::LazyLock;

use regex::Regex;

/// `<index> [flags] [;;; comment] name="<name>"`
static DETAIL_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^[ \t]*(\d+)[ \t]+([A-Z ]*?)\s*(?:;;;[^\n]*\n\s*)?name="([^"]*)""#)
        .expect("valid detail entry regex")
});

static INDEXED_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*\d+[ \t]").expect("valid index regex"));

/// One named item of a `print detail` listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DetailEntry<'a> {
    pub(crate) flags: &'a str,
    pub(crate) name: &'a str,
    /// Text of the entry up to the next one.
    pub(crate) body: &'a str,
}

impl DetailEntry<'_> {
    pub(crate) fn has_flag(&self, flag: char) -> bool {
        self.flags.contains(flag)
    }
}

pub(crate) fn detail_entries(output: &str) -> Vec<DetailEntry<'_>> {
    let matches: Vec<_> = DETAIL_ENTRY.captures_iter(output).collect();

    matches
        .iter()
        .enumerate()
        .map(|(i, caps)| {
            let start = caps.get(0).map_or(0, |m| m.start());
            let end = matches
                .get(i + 1)
                .and_then(|next| next.get(0))
                .map_or(output.len(), |m| m.start());

            DetailEntry {
                flags: caps.get(2).map_or("", |m| m.as_str()),
                name: caps.get(3).map_or("", |m| m.as_str()),
                body: &output[start..end],
            }
        })
        .collect()
}

/// Whether any line of `output` starts with an item index.
pub(crate) fn has_indexed_lines(output: &str) -> bool {
    INDEXED_LINE.is_match(output)
}

/// Value of `key=` in a detail listing, unquoted.
///
/// The key must start a field, so `address` never matches inside
/// `mac-address=`.
pub(crate) fn property<'a>(text: &'a str, key: &str) -> Option<&'a str> {
    let needle = format!("{key}=");
    let mut from = 0;

    while let Some(pos) = text[from..].find(&needle) {
        let start = from + pos;
        let value_start = start + needle.len();

        let at_field_start = text[..start]
            .chars()
            .next_back()
            .is_none_or(char::is_whitespace);

        if at_field_start {
            let rest = &text[value_start..];
            let value = match rest.strip_prefix('"') {
                Some(quoted) => quoted.split('"').next().unwrap_or_default(),
                None => rest.split(char::is_whitespace).next().unwrap_or_default(),
            };
            return Some(value);
        }

        from = value_start;
    }

    None
}
