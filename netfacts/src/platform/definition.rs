//! Per-vendor command heuristics.

/// Vendor-specific settings shared by every query on a platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformDefinition {
    /// Platform name (e.g., "cisco_ios", "mikrotik_routeros").
    pub name: String,

    /// Output fragments that mean the device rejected a command.
    pub failed_when_contains: Vec<String>,
}

impl PlatformDefinition {
    /// Create a new platform definition with no failure patterns.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            failed_when_contains: vec![],
        }
    }

    /// Add a failure pattern.
    pub fn with_failure_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.failed_when_contains.push(pattern.into());
        self
    }

    /// The first output line containing a failure pattern, if any.
    pub fn detect_failure<'a>(&self, output: &'a str) -> Option<&'a str> {
        output
            .lines()
            .find(|line| {
                self.failed_when_contains
                    .iter()
                    .any(|pattern| line.contains(pattern.as_str()))
            })
            .map(str::trim)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_failure() {
        let platform = PlatformDefinition::new("test")
            .with_failure_pattern("% Invalid input")
            .with_failure_pattern("syntax error");

        let output = "show ip intrface brief\n   ^\n% Invalid input detected at '^' marker.\n";
        assert_eq!(
            platform.detect_failure(output),
            Some("% Invalid input detected at '^' marker.")
        );
        assert_eq!(platform.detect_failure("Interface  IP-Address"), None);
    }

    #[test]
    fn test_no_patterns_never_fails() {
        let platform = PlatformDefinition::new("bare");
        assert_eq!(platform.detect_failure("syntax error"), None);
    }
}
