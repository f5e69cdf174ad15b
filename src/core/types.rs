use serde::{Deserialize, Serialize};

/// How a word came to start where it does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placing {
    /// Starts the string, follows a separator, or is a case/digit transition
    /// right after a separator
    Independent,
    /// A case/digit transition inside a compound token (`Finder` in `PathFinder`)
    Dependent,
}

impl std::fmt::Display for Placing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Independent => write!(f, "independent"),
            Self::Dependent => write!(f, "dependent"),
        }
    }
}

/// Kind of a separator character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeparatorKind {
    /// Delimits path elements: `/` and `\`
    Path,
    /// Delimits words inside a path element or title
    Text,
}

/// Characters treated as text separators, in addition to whitespace
const TEXT_SEPARATORS: &[char] = &[
    '_', '-', '.', ',', ':', ';', '(', ')', '[', ']', '{', '}', '<', '>', '|', '+', '=', '@', '#',
    '&', '!', '?', '\'', '"', '*', '~', '`', '$', '%', '^',
];

/// Classify a character as a separator, if it is one
#[must_use]
pub fn separator_kind(c: char) -> Option<SeparatorKind> {
    if c == '/' || c == '\\' {
        Some(SeparatorKind::Path)
    } else if c.is_whitespace() || TEXT_SEPARATORS.contains(&c) {
        Some(SeparatorKind::Text)
    } else {
        None
    }
}

#[must_use]
pub fn is_separator(c: char) -> bool {
    separator_kind(c).is_some()
}

/// Final classification of a weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Good,
    Bad,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Good => write!(f, "good"),
            Self::Bad => write!(f, "bad"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separator_kind() {
        assert_eq!(separator_kind('/'), Some(SeparatorKind::Path));
        assert_eq!(separator_kind('\\'), Some(SeparatorKind::Path));
        assert_eq!(separator_kind('_'), Some(SeparatorKind::Text));
        assert_eq!(separator_kind(' '), Some(SeparatorKind::Text));
        assert_eq!(separator_kind('.'), Some(SeparatorKind::Text));
        assert_eq!(separator_kind('a'), None);
        assert_eq!(separator_kind('7'), None);
        assert_eq!(separator_kind('é'), None);
    }
}
