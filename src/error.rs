//! Errors produced while recognizing an external color value. None of these are ever surfaced as a
//! panic: the public [`parse`](crate::parse) entry point turns every one of them into `None` and a
//! logged warning, while [`try_parse`](crate::try_parse) hands them back for callers that want to
//! know *why* an edit was rejected.

use thiserror::Error;

/// An error in recognizing a color value. Covers every shape the detectors accept.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ColorParseError {
    /// Non-numeric characters were found where a CSS number, percentage, or angle was expected.
    #[error("unexpected non-numeric characters in `{0}`")]
    InvalidNumericCharacters(String),
    /// The characters were numeric, but did not form a valid token (e.g., two periods, a stray
    /// sign, or an unknown angle unit).
    #[error("invalid numeric syntax in `{0}`")]
    InvalidNumericSyntax(String),
    /// General color syntax error: unknown function, mismatched parentheses, wrong argument count,
    /// or a component type that isn't allowed in that slot.
    #[error("invalid color syntax: {0}")]
    InvalidColorSyntax(String),
    /// A hex color with a digit count other than 3, 4, 6, or 8.
    #[error("invalid hex color `{0}`")]
    InvalidHex(String),
    /// A packed number that is NaN, infinite, fractional, or outside `0..=0xFFFFFFFF`.
    #[error("number {0} cannot be a packed color")]
    InvalidNumber(f64),
    /// An object whose keys don't fully match any alias table.
    #[error("object keys {0:?} do not match any color space")]
    UnrecognizedKeys(Vec<String>),
    /// An object value that is neither a number nor `null`.
    #[error("object value for `{0}` is not a number")]
    InvalidObjectValue(String),
    /// A tuple that doesn't have 3 or 4 elements.
    #[error("tuple has {0} elements, expected 3 or 4")]
    InvalidTupleLength(usize),
    /// A tuple element that isn't a finite number (or a `null` color channel).
    #[error("tuple element {0} is not a finite number")]
    InvalidTupleValue(usize),
    /// The value has the wrong shape for this detector entirely.
    #[error("value is not a {0}")]
    WrongShape(&'static str),
}
