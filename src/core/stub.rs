//! Stub detection
//!
//! Estimators take off short cut-off pieces ("stubs", "knee plates") under
//! their own name, e.g. `W 12x50 Stub`. The piece count stays with the stub
//! entry while its lengths roll up into the base material.

/// Default stub markers, in resolution order
pub const DEFAULT_STUB_MARKERS: &[&str] = &["Stub", "stub", "KP", "kp"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubResolver {
    markers: Vec<String>,
}

impl Default for StubResolver {
    fn default() -> Self {
        Self::new(DEFAULT_STUB_MARKERS.iter().map(|m| m.to_string()).collect())
    }
}

impl StubResolver {
    pub fn new(markers: Vec<String>) -> Self {
        Self { markers }
    }

    pub fn markers(&self) -> &[String] {
        &self.markers
    }

    /// True when the last word of a normalized name is a stub marker
    pub fn is_stub(&self, name: &str) -> bool {
        name.split_whitespace()
            .last()
            .is_some_and(|word| self.markers.iter().any(|m| m == word))
    }

    /// Remove the stub marker from a name or identity key.
    ///
    /// Only the first configured marker is ever removed, whichever marker the
    /// text actually ends with. `W 12x50 KP` therefore keeps its `KP` and
    /// aggregates as its own material.
    pub fn de_stub(&self, text: &str) -> String {
        match self.markers.first() {
            Some(marker) if !marker.is_empty() => text.replace(marker.as_str(), "").trim_end().to_string(),
            _ => text.trim_end().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_stub_checks_last_word() {
        let stubs = StubResolver::default();
        assert!(stubs.is_stub("W 12x50 Stub"));
        assert!(stubs.is_stub("W 12x50 kp"));
        assert!(!stubs.is_stub("W 12x50"));
        assert!(!stubs.is_stub("Stub W 12x50"));
        assert!(!stubs.is_stub("W 12x50 Stubs"));
        assert!(!stubs.is_stub(""));
    }

    #[test]
    fn test_de_stub_removes_first_marker() {
        let stubs = StubResolver::default();
        assert_eq!(stubs.de_stub("W 12x50 Stub"), "W 12x50");
        assert_eq!(stubs.de_stub("P1|Beam|W12x50Stub"), "P1|Beam|W12x50");
        assert_eq!(stubs.de_stub("W 12x50"), "W 12x50");
    }

    #[test]
    fn test_de_stub_ignores_later_markers() {
        let stubs = StubResolver::default();
        assert_eq!(stubs.de_stub("W 12x50 KP"), "W 12x50 KP");
        assert_eq!(stubs.de_stub("W 12x50 stub"), "W 12x50 stub");
    }

    #[test]
    fn test_custom_marker_order() {
        let stubs = StubResolver::new(vec!["KP".to_string(), "Stub".to_string()]);
        assert_eq!(stubs.de_stub("W 12x50 KP"), "W 12x50");
        assert_eq!(stubs.de_stub("W 12x50 Stub"), "W 12x50 Stub");
    }

    #[test]
    fn test_empty_marker_list() {
        let stubs = StubResolver::new(Vec::new());
        assert!(!stubs.is_stub("W 12x50 Stub"));
        assert_eq!(stubs.de_stub("W 12x50 Stub  "), "W 12x50 Stub");
    }
}
