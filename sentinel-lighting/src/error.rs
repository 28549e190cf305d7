//! Errors raised while parsing lighting input.
//!
//! The engine itself never fails; these only surface where text or integers
//! are turned into lighting values.

use thiserror::Error;

/// Errors produced when converting external input into lighting values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LightingError {
    /// The text could not be read as an HSL color.
    #[error("invalid HSL color `{0}`, expected `hsl(h, s%, l%)` or `h s l`")]
    InvalidColor(String),
    /// The integer is not one of the canonical elevation levels.
    #[error("{0} is not a canonical elevation level (expected 0, 1, 2, 4, 8, 16 or 32)")]
    InvalidElevation(u32),
}
