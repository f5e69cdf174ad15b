use thiserror::Error;

use crate::core::types::is_separator;
use crate::core::word::segment;

/// Shortest pattern the engine accepts
pub const MIN_PATTERN_LEN: usize = 2;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoreError {
    #[error("Pattern too short: {len} character(s), at least {MIN_PATTERN_LEN} required")]
    PatternTooShort { len: usize },
}

/// A validated, lowercased query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    original: String,
    chars: Vec<char>,
    single_word: bool,
}

impl Pattern {
    /// Validate and prepare a pattern for matching
    ///
    /// # Errors
    ///
    /// Returns `ScoreError::PatternTooShort` if the pattern has fewer than
    /// [`MIN_PATTERN_LEN`] characters.
    pub fn new(text: &str) -> Result<Self, ScoreError> {
        let original: Vec<char> = text.chars().collect();
        if original.len() < MIN_PATTERN_LEN {
            return Err(ScoreError::PatternTooShort {
                len: original.len(),
            });
        }

        let single_word =
            !original.iter().any(|&c| is_separator(c)) && segment(&original).words.len() == 1;
        let chars = original.iter().map(char::to_ascii_lowercase).collect();

        Ok(Self {
            original: text.to_string(),
            chars,
            single_word,
        })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.original
    }

    /// Lowercased characters
    #[must_use]
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Always false: construction rejects short patterns
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    #[must_use]
    pub fn at(&self, i: usize) -> char {
        self.chars[i]
    }

    /// Number of occurrences of `c` in the pattern
    #[must_use]
    pub fn count(&self, c: char) -> usize {
        self.chars.iter().filter(|&&x| x == c).count()
    }

    /// One token with no separators and no case transitions, e.g. `report` or `pthfnd`
    #[must_use]
    pub fn is_single_word(&self) -> bool {
        self.single_word
    }
}
