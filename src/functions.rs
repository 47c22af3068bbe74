//! # Function Table
//!
//! The fixed table of built-in function names the syntax checker and
//! compiler recognise (§6). Function names are matched **case-insensitively**
//! and by **longest match** — `atan2` must win over `atan` when both are
//! viable at a position, which is why lookup never relies on table order and
//! instead scans every entry for the longest match (see [`match_function`]).

use crate::bytecode::Opcode;

/// One entry in the function table: its name, arity (1 or 2), and the
/// opcode the compiler emits for it.
#[derive(Clone, Copy, Debug)]
pub struct FunctionDef {
    pub name: &'static str,
    pub arity: u8,
    pub opcode: Opcode,
}

/// All recognised function names. Order is irrelevant to matching (see
/// [`match_function`]) but is kept roughly alphabetical for readability.
pub static FUNCTIONS: &[FunctionDef] = &[
    FunctionDef { name: "abs", arity: 1, opcode: Opcode::Abs },
    FunctionDef { name: "acos", arity: 1, opcode: Opcode::Acos },
    FunctionDef { name: "asin", arity: 1, opcode: Opcode::Asin },
    // `atan2` must be tried before `atan` can win, but match_function()
    // always prefers the longer name regardless of declaration order.
    FunctionDef { name: "atan2", arity: 2, opcode: Opcode::Atan2 },
    FunctionDef { name: "atan", arity: 1, opcode: Opcode::Atan },
    FunctionDef { name: "besj0", arity: 1, opcode: Opcode::Besj0 },
    FunctionDef { name: "besj1", arity: 1, opcode: Opcode::Besj1 },
    FunctionDef { name: "besy0", arity: 1, opcode: Opcode::Besy0 },
    FunctionDef { name: "besy1", arity: 1, opcode: Opcode::Besy1 },
    FunctionDef { name: "cos", arity: 1, opcode: Opcode::Cos },
    FunctionDef { name: "cosh", arity: 1, opcode: Opcode::Cosh },
    // `erfcs` / `erfc` / `erf` share a root; longest-match again resolves it.
    FunctionDef { name: "erfcs", arity: 1, opcode: Opcode::Erfcs },
    FunctionDef { name: "erfc", arity: 1, opcode: Opcode::Erfc },
    FunctionDef { name: "erf", arity: 1, opcode: Opcode::Erf },
    FunctionDef { name: "exp", arity: 1, opcode: Opcode::Exp },
    FunctionDef { name: "gamf", arity: 1, opcode: Opcode::Gamma },
    // `log10` before `log` for the same reason.
    FunctionDef { name: "log10", arity: 1, opcode: Opcode::Log10 },
    FunctionDef { name: "log", arity: 1, opcode: Opcode::Ln },
    FunctionDef { name: "sin", arity: 1, opcode: Opcode::Sin },
    FunctionDef { name: "sinh", arity: 1, opcode: Opcode::Sinh },
    FunctionDef { name: "sqrt", arity: 1, opcode: Opcode::Sqrt },
    FunctionDef { name: "tan", arity: 1, opcode: Opcode::Tan },
    FunctionDef { name: "tanh", arity: 1, opcode: Opcode::Tanh },
];

/// Find the longest function name matching case-insensitively at `text[pos..]`.
///
/// Returns `None` if `text[pos]` is not an ASCII letter or no entry matches.
pub fn match_function(text: &[char], pos: usize) -> Option<&'static FunctionDef> {
    if pos >= text.len() || !text[pos].is_ascii_alphabetic() {
        return None;
    }
    let mut best: Option<&'static FunctionDef> = None;
    for def in FUNCTIONS {
        let len = def.name.chars().count();
        if pos + len > text.len() {
            continue;
        }
        let candidate: String = text[pos..pos + len].iter().collect();
        if candidate.eq_ignore_ascii_case(def.name) {
            if best.map(|b| b.name.len() < def.name.len()).unwrap_or(true) {
                best = Some(def);
            }
        }
    }
    best
}
