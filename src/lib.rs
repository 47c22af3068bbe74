//! # formula_engine
//!
//! A runtime engine that parses, validates, compiles, and repeatedly
//! evaluates user-supplied mathematical expressions over a named set of
//! variables. See [`registry::Registry`] for the primary entry point.

mod bytecode;
mod compiler;
mod constants;
mod error;
mod functions;
mod numeric;
mod normalize;
mod registry;
mod syntax;
mod vm;

pub use bytecode::Opcode;
pub use constants::{mu0, set_mu0, PI};
pub use error::{eval_err_msg, explain, format_diagnostic, EvalError, ParseError, ParseErrorKind};
pub use normalize::{normalize, PositionMap};
pub use registry::{global, Registry};
