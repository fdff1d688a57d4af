/// Indentation of `invalid_reason:` inside a single-address result.
pub const DEFAULT_REGEX_INDENT: usize = 8;

/// How a fixture gets patched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Parse, add the key where missing, dump the whole document again.
    Structured,
    /// Sibling line after every `invalid_reason:` line, at its indentation.
    LineScan,
    /// Sibling line after `invalid_reason:` lines at exactly `indent` spaces.
    Regex { indent: usize },
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::Structured
    }
}

impl Strategy {
    pub fn as_str(&self) -> &str {
        match self {
            Strategy::Structured => "structured",
            Strategy::LineScan => "line-scan",
            Strategy::Regex { .. } => "regex",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "structured" | "yaml" => Some(Strategy::Structured),
            "line-scan" | "linescan" | "lines" => Some(Strategy::LineScan),
            "regex" => Some(Strategy::Regex {
                indent: DEFAULT_REGEX_INDENT,
            }),
            _ => None,
        }
    }

    /// Same strategy with a different regex indentation; no-op for the others.
    pub fn with_indent(self, indent: usize) -> Self {
        match self {
            Strategy::Regex { .. } => Strategy::Regex { indent },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_accepts_aliases() {
        assert_eq!(Strategy::from_str(" YAML "), Some(Strategy::Structured));
        assert_eq!(Strategy::from_str("lines"), Some(Strategy::LineScan));
        assert_eq!(
            Strategy::from_str("regex"),
            Some(Strategy::Regex { indent: 8 })
        );
        assert_eq!(Strategy::from_str("sed"), None);
    }

    #[test]
    fn test_with_indent_only_touches_regex() {
        assert_eq!(
            Strategy::Regex { indent: 8 }.with_indent(16),
            Strategy::Regex { indent: 16 }
        );
        assert_eq!(Strategy::LineScan.with_indent(16), Strategy::LineScan);
        assert_eq!(Strategy::default().as_str(), "structured");
    }
}
