//! Centralized validation of command-line batch input.

/// Maximum number of candidates accepted in one batch (DOS protection)
pub const MAX_VARIANTS: usize = 1_000_000;

/// Maximum length of a single candidate, in characters
pub const MAX_VARIANT_LEN: usize = 4096;

/// Batch input validation errors
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Too many candidates: exceeds maximum of {MAX_VARIANTS}")]
    TooManyVariants,
    #[error("Candidate on line {line} too long: {len} characters exceeds {MAX_VARIANT_LEN}")]
    VariantTooLong { line: usize, len: usize },
}

/// Check if adding another candidate would exceed the maximum allowed.
///
/// Call this with the current count BEFORE adding a new candidate.
///
/// # Errors
///
/// Returns `ValidationError::TooManyVariants` if adding would exceed
/// [`MAX_VARIANTS`].
///
/// # Example
/// ```
/// use fuzzweight::utils::validation::{check_variant_limit, ValidationError, MAX_VARIANTS};
///
/// assert!(check_variant_limit(0).is_ok());
/// assert_eq!(
///     check_variant_limit(MAX_VARIANTS),
///     Err(ValidationError::TooManyVariants)
/// );
/// ```
pub fn check_variant_limit(count: usize) -> Result<(), ValidationError> {
    if count >= MAX_VARIANTS {
        return Err(ValidationError::TooManyVariants);
    }
    Ok(())
}

/// Validate the length of one candidate (1-based `line` for messages)
///
/// # Errors
///
/// Returns `ValidationError::VariantTooLong` if the candidate exceeds
/// [`MAX_VARIANT_LEN`] characters.
pub fn validate_variant(line: usize, variant: &str) -> Result<(), ValidationError> {
    let len = variant.chars().count();
    if len > MAX_VARIANT_LEN {
        return Err(ValidationError::VariantTooLong { line, len });
    }
    Ok(())
}

/// Split newline-separated batch input into candidates.
///
/// Blank lines are skipped and trailing `\r` is dropped; other whitespace is
/// part of the candidate.
///
/// # Errors
///
/// Returns `ValidationError::TooManyVariants` or
/// `ValidationError::VariantTooLong` when the input exceeds the limits.
pub fn parse_variants(text: &str) -> Result<Vec<String>, ValidationError> {
    let mut variants = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.trim().is_empty() {
            continue;
        }
        check_variant_limit(variants.len())?;
        validate_variant(i + 1, line)?;
        variants.push(line.to_string());
    }
    Ok(variants)
}
