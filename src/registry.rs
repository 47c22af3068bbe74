//! # Function Slot Registry
//!
//! A fixed-length table of independently compiled [`Slot`]s, each produced
//! by the four-stage pipeline (normalise → check → compile → interpret),
//! addressed by a 1-based index (§3, §6).
//!
//! Two API altitudes share one implementation:
//! - [`Registry`] — an ordinary owned Rust value. `Registry::new(n)`
//!   allocates; `Drop` tears down. No explicit `teardown()` call is needed.
//! - [`global`] — a thin free-function facade (`init`/`teardown`/`parse`/
//!   `check`/`evaluate`/`eval_err_msg`) matching the literal external
//!   interface table in §6, for hosts (e.g. FFI callers) that want the
//!   C-library-style explicit lifecycle. It is backed by a process-wide
//!   `once_cell::sync::Lazy<Mutex<Option<Registry>>>`, mirroring the same
//!   lazy-static-mutex idiom this pack already uses for process-wide state.

use std::cell::RefCell;

use once_cell::sync::Lazy;
use std::sync::Mutex;

use crate::bytecode::Opcode;
use crate::compiler::compile_expr;
use crate::error::{eval_err_msg as err_msg_for_code, EvalError, ParseError, ParseErrorKind};
use crate::normalize::normalize;
use crate::syntax::check_syntax;
use crate::vm::eval_with_stack;

/// One compiled program: bytecode, its immediates, and a scratch stack
/// reused across repeated [`Slot::evaluate`] calls (§4.9, §5).
pub struct Slot {
    bytecode: Vec<Opcode>,
    immediates: Vec<f64>,
    var_count: usize,
    stack: RefCell<Vec<f64>>,
    last_eval_error: std::cell::Cell<Option<EvalError>>,
}

impl Slot {
    fn empty() -> Self {
        Slot {
            bytecode: Vec::new(),
            immediates: Vec::new(),
            var_count: 0,
            stack: RefCell::new(Vec::new()),
            last_eval_error: std::cell::Cell::new(None),
        }
    }

    fn fill(&mut self, text: &[char], vars: &[String]) {
        let (bytecode, immediates, stack_capacity) = compile_expr(text, vars);
        self.bytecode = bytecode;
        self.immediates = immediates;
        self.var_count = vars.len();
        self.stack = RefCell::new(Vec::with_capacity(stack_capacity));
        self.last_eval_error.set(None);
    }

    /// Evaluate this slot's bytecode against `values`.
    ///
    /// # Panics
    /// Panics if `values.len() != var_count` used at parse time (a
    /// programmer error, not a runtime domain error — see §3's invariant
    /// that variable indices are a caller contract, not checked at
    /// evaluation time), or if this slot is re-entered while already
    /// borrowed (see module docs on non-reentrancy, §5).
    pub fn evaluate(&self, values: &[f64]) -> Result<f64, EvalError> {
        assert_eq!(
            values.len(),
            self.var_count,
            "evaluate called with {} values but slot was parsed with {} variables",
            values.len(),
            self.var_count
        );
        let mut stack = self.stack.borrow_mut();
        let result = eval_with_stack(&self.bytecode, &self.immediates, values, &mut stack);
        self.last_eval_error.set(result.err());
        result
    }

    /// The domain-error code from the most recent `evaluate` call, if any.
    pub fn last_eval_error(&self) -> Option<EvalError> {
        self.last_eval_error.get()
    }
}

/// An owned, RAII registry of `n` slots (§3).
///
/// Dropping a `Registry` releases its slots; there is no separate
/// `teardown()` method on the owned type, unlike the [`global`] facade,
/// which needs one to match the literal external interface.
pub struct Registry {
    slots: Vec<Slot>,
}

impl Registry {
    /// Allocate `n` empty slots, indexed `1..=n`.
    ///
    /// # Panics
    /// Panics if `n == 0` — a registry must have at least one slot (§6:
    /// `init(n)` requires `n >= 1`).
    pub fn new(n: usize) -> Self {
        assert!(n >= 1, "Registry::new requires at least one slot");
        let mut slots = Vec::with_capacity(n);
        slots.resize_with(n, Slot::empty);
        Registry { slots }
    }

    /// Number of slots in this registry.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn slot(&self, index: usize) -> &Slot {
        &self.slots[index - 1]
    }

    fn slot_mut(&mut self, index: usize) -> &mut Slot {
        &mut self.slots[index - 1]
    }

    fn slot_index_valid(&self, index: usize) -> bool {
        (1..=self.len()).contains(&index)
    }

    /// Validate `text` against `vars` without mutating any slot.
    pub fn check(&self, text: &str, vars: &[String]) -> Result<(), ParseError> {
        check_text(text, vars)
    }

    /// Compile `text` into slot `index` (1-based). Returns the same
    /// diagnostic `check` would on a syntax error, leaving the slot
    /// untouched in that case.
    ///
    /// # Errors
    /// Returns `ParseErrorKind::SlotIndexOutOfRange` if `index` is out of
    /// `1..=len()` (§6: "index out of range"), alongside any syntax error.
    pub fn parse(&mut self, index: usize, text: &str, vars: &[String]) -> Result<(), ParseError> {
        if !self.slot_index_valid(index) {
            return Err(ParseError::new(ParseErrorKind::SlotIndexOutOfRange, 0));
        }
        check_text(text, vars)?;
        let (norm, _) = normalize(text);
        let chars: Vec<char> = norm.chars().collect();
        self.slot_mut(index).fill(&chars, vars);
        Ok(())
    }

    /// Evaluate slot `index` against `values`.
    ///
    /// # Errors
    /// Returns `EvalError::SlotIndexOutOfRange` if `index` is out of range.
    ///
    /// # Panics
    /// Panics (see [`Slot::evaluate`]) if `values.len()` doesn't match the
    /// variable count used at parse time — that mismatch is a programmer
    /// error in the caller's own bookkeeping, not a reportable domain error.
    pub fn evaluate(&self, index: usize, values: &[f64]) -> Result<f64, EvalError> {
        if !self.slot_index_valid(index) {
            return Err(EvalError::SlotIndexOutOfRange);
        }
        self.slot(index).evaluate(values)
    }

    /// Message for the most recent domain error on slot `index`, or the
    /// empty string if the last evaluation succeeded, none has run yet, or
    /// `index` is out of range.
    pub fn eval_err_msg(&self, index: usize) -> &'static str {
        if !self.slot_index_valid(index) {
            return "";
        }
        match self.slot(index).last_eval_error() {
            Some(e) => e.message(),
            None => "",
        }
    }
}

/// Run the syntax checker over `text` after normalising it.
fn check_text(text: &str, vars: &[String]) -> Result<(), ParseError> {
    let (norm, _) = normalize(text);
    let chars: Vec<char> = norm.chars().collect();
    check_syntax(&chars, vars)
}

/// Process-wide registry facade, matching the literal `init`/`teardown`/
/// `parse`/`check`/`evaluate`/`eval_err_msg` surface of §6.
pub mod global {
    use super::*;

    static REGISTRY: Lazy<Mutex<Option<Registry>>> = Lazy::new(|| Mutex::new(None));

    /// Allocate the process-wide registry with `n` slots.
    ///
    /// Re-initialising without a prior [`teardown`] is tolerated: the old
    /// registry (and its slots) is dropped and a warning logged, per §5.
    pub fn init(n: usize) {
        let mut guard = REGISTRY.lock().unwrap();
        if guard.is_some() {
            log::warn!("registry::global::init called again without teardown; releasing previous registry");
        }
        *guard = Some(Registry::new(n));
    }

    /// Release the process-wide registry. Idempotent.
    pub fn teardown() {
        let mut guard = REGISTRY.lock().unwrap();
        *guard = None;
    }

    /// Validate `text` without mutating any slot.
    ///
    /// # Errors
    /// Returns `ParseErrorKind::RegistryNotInitialized` if called before
    /// [`init`], instead of panicking.
    pub fn check(text: &str, vars: &[String]) -> Result<(), ParseError> {
        let guard = REGISTRY.lock().unwrap();
        match guard.as_ref() {
            Some(registry) => registry.check(text, vars),
            None => Err(ParseError::new(ParseErrorKind::RegistryNotInitialized, 0)),
        }
    }

    /// Compile `text` into slot `index` of the process-wide registry.
    ///
    /// # Errors
    /// Returns `ParseErrorKind::RegistryNotInitialized` if called before
    /// [`init`], instead of panicking.
    pub fn parse(index: usize, text: &str, vars: &[String]) -> Result<(), ParseError> {
        let mut guard = REGISTRY.lock().unwrap();
        match guard.as_mut() {
            Some(registry) => registry.parse(index, text, vars),
            None => Err(ParseError::new(ParseErrorKind::RegistryNotInitialized, 0)),
        }
    }

    /// Evaluate slot `index` of the process-wide registry against `values`.
    ///
    /// # Errors
    /// Returns `EvalError::RegistryNotInitialized` if called before [`init`],
    /// instead of panicking.
    pub fn evaluate(index: usize, values: &[f64]) -> Result<f64, EvalError> {
        let guard = REGISTRY.lock().unwrap();
        match guard.as_ref() {
            Some(registry) => registry.evaluate(index, values),
            None => Err(EvalError::RegistryNotInitialized),
        }
    }

    /// Message for an explicit error code, or (if `code` is `None`) for the
    /// most recent domain error on slot `index` of the process-wide
    /// registry. Returns the empty string (rather than panicking) if called
    /// before [`init`].
    pub fn eval_err_msg(index: usize, code: Option<u8>) -> &'static str {
        match code {
            Some(c) => err_msg_for_code(c),
            None => {
                let guard = REGISTRY.lock().unwrap();
                match guard.as_ref() {
                    Some(registry) => registry.eval_err_msg(index),
                    None => "",
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    // `registry::global` is process-wide state; tests that touch it must
    // not interleave (same pattern as `constants.rs`'s `mu0` guard).
    mod serial_test_helper {
        use std::sync::Mutex;
        pub static GUARD: Mutex<()> = Mutex::new(());

        pub fn serial<F: FnOnce()>(f: F) {
            let _lock = GUARD.lock().unwrap_or_else(|e| e.into_inner());
            f();
        }
    }
    use serial_test_helper::serial;

    #[test]
    fn parse_then_evaluate_roundtrip() {
        let mut reg = Registry::new(2);
        reg.parse(1, "2+3*4", &vars(&[])).unwrap();
        assert_eq!(reg.evaluate(1, &[]), Ok(14.0));
    }

    #[test]
    fn parse_rejects_bad_syntax_without_mutating_slot() {
        let mut reg = Registry::new(1);
        reg.parse(1, "2+3", &vars(&[])).unwrap();
        let err = reg.parse(1, "2+", &vars(&[])).unwrap_err();
        assert_eq!(err.kind, crate::error::ParseErrorKind::MissingOperand);
        // The slot still holds the previous good program.
        assert_eq!(reg.evaluate(1, &[]), Ok(5.0));
    }

    #[test]
    fn eval_err_msg_reflects_last_domain_error() {
        let mut reg = Registry::new(1);
        reg.parse(1, "1/x", &vars(&["x"])).unwrap();
        assert!(reg.evaluate(1, &[0.0]).is_err());
        assert_eq!(reg.eval_err_msg(1), "division by zero");
    }

    #[test]
    fn idempotent_reparse_yields_identical_bytecode() {
        let mut reg = Registry::new(1);
        reg.parse(1, "sqrt(x^2+1)", &vars(&["x"])).unwrap();
        let first = reg.evaluate(1, &[3.0]).unwrap();
        reg.parse(1, "sqrt(x^2+1)", &vars(&["x"])).unwrap();
        let second = reg.evaluate(1, &[3.0]).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn slot_index_out_of_range_is_a_returned_error_not_a_panic() {
        let mut reg = Registry::new(1);
        let parse_err = reg.parse(2, "1+1", &vars(&[])).unwrap_err();
        assert_eq!(parse_err.kind, crate::error::ParseErrorKind::SlotIndexOutOfRange);

        let eval_err = reg.evaluate(2, &[]).unwrap_err();
        assert_eq!(eval_err, EvalError::SlotIndexOutOfRange);

        assert_eq!(reg.eval_err_msg(2), "");
    }

    #[test]
    fn global_facade_check_returns_an_error_instead_of_panicking_before_init() {
        serial(|| {
            global::teardown();
            let err = global::check("1+1", &vars(&[])).unwrap_err();
            assert_eq!(err.kind, crate::error::ParseErrorKind::RegistryNotInitialized);
        });
    }

    #[test]
    fn global_facade_init_parse_evaluate_teardown() {
        serial(|| {
            global::init(1);
            global::parse(1, "pi*mu", &vars(&[])).unwrap();
            let r = global::evaluate(1, &[]).unwrap();
            assert!((r - crate::constants::PI).abs() < 1e-12);
            global::teardown();
        });
    }
}
