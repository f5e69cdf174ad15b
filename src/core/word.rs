use serde::Serialize;

use crate::core::types::{separator_kind, Placing, SeparatorKind};

/// A contiguous half-open span `[start, end)` of the variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Word {
    /// Position of this word in the variant's word list
    pub index: usize,
    pub start: usize,
    pub end: usize,
    pub placing: Placing,
}

impl Word {
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }

    #[must_use]
    pub fn contains(&self, pos: usize) -> bool {
        (self.start..self.end).contains(&pos)
    }

    /// Last position inside the word
    #[must_use]
    pub fn last(&self) -> usize {
        self.end - 1
    }
}

/// Words and separator positions of one variant
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segmentation {
    pub words: Vec<Word>,
    /// Sorted indices of `/` and `\`
    pub path_separators: Vec<usize>,
    /// Sorted indices of whitespace and punctuation separators
    pub text_separators: Vec<usize>,
}

/// A case or digit transition opens a new word
fn is_transition(prev: char, cur: char) -> bool {
    (cur.is_ascii_uppercase() && !prev.is_ascii_uppercase())
        || (cur.is_ascii_digit() && !prev.is_ascii_digit())
}

/// Split a variant (original case) into words and separator index sets.
///
/// One left-to-right scan. Separators close the current word; a new word opens
/// at the first non-separator after a separator run (or string start), which is
/// [`Placing::Independent`], and at every upper-case or digit transition inside
/// a run, which is [`Placing::Dependent`].
#[must_use]
pub fn segment(chars: &[char]) -> Segmentation {
    let mut seg = Segmentation::default();
    let mut current: Option<(usize, Placing)> = None;

    for (i, &c) in chars.iter().enumerate() {
        if let Some(kind) = separator_kind(c) {
            match kind {
                SeparatorKind::Path => seg.path_separators.push(i),
                SeparatorKind::Text => seg.text_separators.push(i),
            }
            if let Some((start, placing)) = current.take() {
                push_word(&mut seg.words, start, i, placing);
            }
            continue;
        }

        match current {
            None => current = Some((i, Placing::Independent)),
            Some((start, placing)) => {
                // current is only open when chars[i - 1] was a word character
                if is_transition(chars[i - 1], c) {
                    push_word(&mut seg.words, start, i, placing);
                    current = Some((i, Placing::Dependent));
                }
            }
        }
    }

    if let Some((start, placing)) = current {
        push_word(&mut seg.words, start, chars.len(), placing);
    }

    seg
}

fn push_word(words: &mut Vec<Word>, start: usize, end: usize, placing: Placing) {
    let index = words.len();
    words.push(Word {
        index,
        start,
        end,
        placing,
    });
}
