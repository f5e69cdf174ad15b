use crate::core::types::{is_separator, Placing};
use crate::core::word::{segment, Segmentation, Word};

/// A candidate string prepared for matching.
///
/// Positions are character indices. The original case is kept for word
/// detection, matching runs against the lowercased copy.
#[derive(Debug, Clone)]
pub struct Variant {
    original: Vec<char>,
    chars: Vec<char>,
    segmentation: Segmentation,
    /// Word index per position, `None` on separators
    word_at: Vec<Option<usize>>,
    /// Path separators if any exist, text separators otherwise
    boundary_separators: Vec<usize>,
}

impl Variant {
    #[must_use]
    pub fn new(text: &str) -> Self {
        let original: Vec<char> = text.chars().collect();
        let chars: Vec<char> = original.iter().map(char::to_ascii_lowercase).collect();
        let segmentation = segment(&original);

        let mut word_at = vec![None; chars.len()];
        for word in &segmentation.words {
            for slot in &mut word_at[word.start..word.end] {
                *slot = Some(word.index);
            }
        }

        let boundary_separators = if segmentation.path_separators.is_empty() {
            segmentation.text_separators.clone()
        } else {
            segmentation.path_separators.clone()
        };

        Self {
            original,
            chars,
            segmentation,
            word_at,
            boundary_separators,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Lowercased characters
    #[must_use]
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    #[must_use]
    pub fn at(&self, pos: usize) -> char {
        self.chars[pos]
    }

    #[must_use]
    pub fn original(&self) -> String {
        self.original.iter().collect()
    }

    #[must_use]
    pub fn words(&self) -> &[Word] {
        &self.segmentation.words
    }

    #[must_use]
    pub fn path_separators(&self) -> &[usize] {
        &self.segmentation.path_separators
    }

    #[must_use]
    pub fn text_separators(&self) -> &[usize] {
        &self.segmentation.text_separators
    }

    /// Separators that delimit placement regions: path separators when the
    /// variant has any, text separators otherwise
    #[must_use]
    pub fn boundary_separators(&self) -> &[usize] {
        &self.boundary_separators
    }

    #[must_use]
    pub fn has_separators(&self) -> bool {
        !self.segmentation.path_separators.is_empty()
            || !self.segmentation.text_separators.is_empty()
    }

    #[must_use]
    pub fn is_separator(&self, pos: usize) -> bool {
        pos < self.len() && is_separator(self.original[pos])
    }

    #[must_use]
    pub fn word_of(&self, pos: usize) -> Option<&Word> {
        self.word_at
            .get(pos)
            .copied()
            .flatten()
            .map(|idx| &self.segmentation.words[idx])
    }

    /// Placing of the word starting exactly at `pos`
    #[must_use]
    pub fn word_start_placing(&self, pos: usize) -> Option<Placing> {
        self.word_of(pos)
            .filter(|w| w.start == pos)
            .map(|w| w.placing)
    }

    #[must_use]
    pub fn is_word_start(&self, pos: usize) -> bool {
        self.word_start_placing(pos).is_some()
    }

    /// `pos` is the last character of its word
    #[must_use]
    pub fn is_word_last(&self, pos: usize) -> bool {
        self.word_of(pos).is_some_and(|w| w.last() == pos)
    }

    /// A span ending (exclusive) at `end` stops at a separator or the string end
    #[must_use]
    pub fn ends_at_boundary(&self, end: usize) -> bool {
        end >= self.len() || self.is_separator(end)
    }

    /// A span starting at `start` follows a separator or the string start
    #[must_use]
    pub fn starts_at_boundary(&self, start: usize) -> bool {
        start == 0 || self.is_separator(start - 1)
    }

    /// Positions of `c` in the lowercased variant
    #[must_use]
    pub fn occurrences(&self, c: char) -> Vec<usize> {
        self.chars
            .iter()
            .enumerate()
            .filter(|&(_, &x)| x == c)
            .map(|(i, _)| i)
            .collect()
    }

    #[must_use]
    pub fn count(&self, c: char) -> usize {
        self.chars.iter().filter(|&&x| x == c).count()
    }

    /// Case-insensitive equality with the pattern's characters
    #[must_use]
    pub fn equals(&self, pattern: &[char]) -> bool {
        self.chars == pattern
    }

    /// Best start index of `needle` as a contiguous substring.
    ///
    /// Prefers an occurrence that is a whole word, then one starting a word,
    /// then the leftmost.
    #[must_use]
    pub fn find_substring(&self, needle: &[char]) -> Option<usize> {
        if needle.is_empty() || needle.len() > self.len() {
            return None;
        }
        let starts: Vec<usize> = self
            .chars
            .windows(needle.len())
            .enumerate()
            .filter(|(_, w)| *w == needle)
            .map(|(i, _)| i)
            .collect();

        starts
            .iter()
            .copied()
            .find(|&s| self.is_word_start(s) && self.ends_at_boundary(s + needle.len()))
            .or_else(|| starts.iter().copied().find(|&s| self.is_word_start(s)))
            .or_else(|| starts.first().copied())
    }
}
