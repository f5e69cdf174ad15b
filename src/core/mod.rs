//! Pattern and variant preparation.
//!
//! - [`Pattern`]: a validated, lowercased query of at least two characters
//! - [`Variant`]: one candidate string with its words and separators
//! - [`Word`], [`Placing`]: case- and separator-delimited spans
//!
//! ## Words
//!
//! A variant is split at separators and at case or digit transitions:
//!
//! | Variant            | Words                         |
//! |--------------------|-------------------------------|
//! | `PathFinder`       | `Path` `Finder`               |
//! | `src/main.rs`      | `src` `main` `rs`             |
//! | `http2Server`      | `http` `2` `Server`           |
//!
//! Only ASCII case is recognized.

pub mod pattern;
pub mod types;
pub mod variant;
pub mod word;

pub use pattern::{Pattern, ScoreError, MIN_PATTERN_LEN};
pub use types::{Placing, SeparatorKind, Verdict};
pub use variant::Variant;
pub use word::Word;
