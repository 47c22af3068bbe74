//! # Error Types for the Formula Engine
//!
//! This module defines the **parse-time** and **evaluation-time** error
//! types used throughout the engine.
//!
//! ## Design
//! - [`ParseErrorKind`] is a compact enumeration of the syntax-checker's and
//!   compiler's failure categories. [`ParseError`] pairs a kind with the
//!   0-based position in the *normalised* string where the fault was found.
//! - [`EvalError`] is a `repr(u8)` enumeration of the eight domain errors the
//!   interpreter can raise (§4.10 of the spec), plus two registry-lifecycle
//!   errors (`SlotIndexOutOfRange`, `RegistryNotInitialized`); for the eight
//!   domain variants, the discriminant *is* the caller-visible error code.
//!
//! ## Diagnostics
//! [`ParseError`] only knows the normalised-string position. Rendering the
//! full caret diagnostic (which points into the user's *original* string)
//! needs the [`crate::normalize::PositionMap`] built during normalisation,
//! so that step lives in [`format_diagnostic`] rather than in `Display`.

use std::fmt;

use crate::normalize::PositionMap;

/// Category of syntax/compile failure, independent of where it occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Two operators in a row where an operand was expected.
    MultipleOperators,
    /// Input ended where an operand was expected.
    MissingOperand,
    /// A numeric literal did not match the grammar in §4.6.
    InvalidNumberFormat,
    /// Neither a variable name nor a named constant matched at this position.
    InvalidElement,
    /// A `)` was seen with no matching open `(`.
    MismatchedParenthesis,
    /// A `(` was immediately followed by `)`.
    EmptyParentheses,
    /// End of string reached with unclosed `(`.
    MissingCloseParen,
    /// A function call had the wrong number of comma-separated arguments.
    ArityMismatch,
    /// A function name was recognised but not followed by `(`.
    MissingOpenParen,
    /// A `Registry`/`registry::global` call used a slot index outside
    /// `1..=len()`.
    SlotIndexOutOfRange,
    /// A `registry::global` call was made before `global::init`.
    RegistryNotInitialized,
}

impl ParseErrorKind {
    /// Human-readable message, independent of position.
    pub fn message(self) -> &'static str {
        match self {
            ParseErrorKind::MultipleOperators => "Multiple operators",
            ParseErrorKind::MissingOperand => "Missing operand",
            ParseErrorKind::InvalidNumberFormat => "Invalid number format",
            ParseErrorKind::InvalidElement => "Invalid element",
            ParseErrorKind::MismatchedParenthesis => "Mismatched parenthesis",
            ParseErrorKind::EmptyParentheses => "Empty parentheses",
            ParseErrorKind::MissingCloseParen => "Missing )",
            ParseErrorKind::ArityMismatch => "Wrong number of arguments",
            ParseErrorKind::MissingOpenParen => "Expected ( after function name",
            ParseErrorKind::SlotIndexOutOfRange => "Slot index out of range",
            ParseErrorKind::RegistryNotInitialized => "Registry not initialized",
        }
    }
}

/// A located parse/compile failure.
///
/// `norm_pos` is a 0-based index into the *normalised* string (post `**`
/// rewrite and whitespace elision); use [`format_diagnostic`] to map it back
/// to the user's original text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub norm_pos: usize,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, norm_pos: usize) -> Self {
        ParseError { kind, norm_pos }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind.message())
    }
}

impl std::error::Error for ParseError {}

/// Render the full diagnostic block described in §6 of the spec:
///
/// ```text
/// *** Error in syntax of function string: <msg>
///
///  <original string>
///      ^
/// ```
///
/// The caret is aligned under the original-string character that the fault
/// maps to via `map`. Positions beyond the end of the map fall back to the
/// last mapped column.
pub fn format_diagnostic(original: &str, err: &ParseError, map: &PositionMap) -> String {
    let orig_col = map.original_index(err.norm_pos);
    let mut out = String::new();
    out.push_str("*** Error in syntax of function string: ");
    out.push_str(err.kind.message());
    out.push_str("\n\n");
    out.push(' ');
    out.push_str(original);
    out.push('\n');
    // `orig_col` (1-based) spaces land the caret directly under
    // `original`'s `(orig_col - 1)`th character: the printed line is " " +
    // `original`, so that character sits at line-index `orig_col`.
    for _ in 0..orig_col {
        out.push(' ');
    }
    out.push('^');
    out
}

/// Convenience wrapper around [`format_diagnostic`] for callers (the CLI,
/// the REPL) that only have the original string and a [`ParseError`], not
/// the [`PositionMap`] that produced it — it re-normalises `original` to
/// rebuild the map. Prefer [`format_diagnostic`] directly if a map from the
/// same `parse`/`check` call is already at hand.
pub fn explain(original: &str, err: &ParseError) -> String {
    let (_, map) = crate::normalize::normalize(original);
    format_diagnostic(original, err, &map)
}

/// Errors `evaluate` can return (§4.10's eight domain errors, plus two
/// registry-lifecycle errors that have nothing to do with the bytecode
/// itself).
///
/// The discriminant of each of the eight domain variants is the
/// caller-visible error code from §4.10 (the one `eval_err_msg(code)` looks
/// up). `SlotIndexOutOfRange`/`RegistryNotInitialized` are raised by
/// `Registry::evaluate`/`registry::global::evaluate` before any bytecode
/// runs; they carry discriminants outside `1..=8` on purpose, so that
/// `eval_err_msg(code)` — which only resolves `1..=8` — keeps returning the
/// empty string for them, matching §6's "empty for 0 / out of range" rule
/// for that free function. Use `Display`/`message()` to read their text
/// instead.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EvalError {
    DivisionByZero = 1,
    NegativeSqrt = 2,
    NonPositiveLog = 3,
    AsinAcosOutOfRange = 4,
    NegativeBaseFractionalPower = 5,
    NonPositiveBesselY0 = 6,
    NonPositiveBesselY1 = 7,
    GammaAtNonPositiveInteger = 8,
    SlotIndexOutOfRange = 9,
    RegistryNotInitialized = 10,
}

impl EvalError {
    /// The caller-visible error code (1..=8), matching `eval_err_type`.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Look up an `EvalError` by its caller-visible code.
    pub fn from_code(code: u8) -> Option<Self> {
        use EvalError::*;
        Some(match code {
            1 => DivisionByZero,
            2 => NegativeSqrt,
            3 => NonPositiveLog,
            4 => AsinAcosOutOfRange,
            5 => NegativeBaseFractionalPower,
            6 => NonPositiveBesselY0,
            7 => NonPositiveBesselY1,
            8 => GammaAtNonPositiveInteger,
            _ => return None,
        })
    }

    /// Human-readable message, keyed by code (§4.10).
    pub fn message(self) -> &'static str {
        match self {
            EvalError::DivisionByZero => "division by zero",
            EvalError::NegativeSqrt => "square root of a negative number",
            EvalError::NonPositiveLog => "logarithm of a non-positive number",
            EvalError::AsinAcosOutOfRange => "asin/acos argument out of range [-1, 1]",
            EvalError::NegativeBaseFractionalPower => {
                "negative base raised to a non-integer power"
            }
            EvalError::NonPositiveBesselY0 => "besy0 argument must be positive",
            EvalError::NonPositiveBesselY1 => "besy1 argument must be positive",
            EvalError::GammaAtNonPositiveInteger => "gamma function at a non-positive integer",
            EvalError::SlotIndexOutOfRange => "slot index out of range",
            EvalError::RegistryNotInitialized => {
                "registry not initialized; call registry::global::init first"
            }
        }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for EvalError {}

/// Message lookup matching the `eval_err_msg(code?)` operation (§6): an
/// out-of-range or zero code yields the empty string rather than an error.
pub fn eval_err_msg(code: u8) -> &'static str {
    match EvalError::from_code(code) {
        Some(e) => e.message(),
        None => "",
    }
}
