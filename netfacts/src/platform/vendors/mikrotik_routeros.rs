//! MikroTik RouterOS 7 platform definition.

use crate::platform::PlatformDefinition;

/// Create the MikroTik RouterOS platform definition.
pub fn platform() -> PlatformDefinition {
    PlatformDefinition::new("mikrotik_routeros")
        .with_failure_pattern("bad command name")
        .with_failure_pattern("syntax error")
        .with_failure_pattern("expected end of command")
        .with_failure_pattern("failure:")
}
