//! # Interpreter
//!
//! Executes compiled [`Opcode`] sequences against a caller-supplied variable
//! vector (§4.9). The dispatch loop tracks two cursors explicitly: `dp`
//! walks `immediates` in lockstep with `PUSH_IMMED` opcodes; the operand
//! stack itself plays the role of the spec's stack pointer `SP` (Rust's
//! `Vec::push`/`pop` already carry that bookkeeping, so there is no separate
//! `sp` variable to maintain by hand). There is no separate instruction
//! pointer variable either — the dispatch loop walks `bytecode` with a plain
//! `for` loop, since nothing here ever jumps or branches.
//!
//! Bessel, error-function, and gamma evaluation are delegated to [`libm`],
//! the crate's one provider of "opaque primitive" math the standard library
//! doesn't expose.

use crate::bytecode::Opcode;
use crate::error::EvalError;

/// Execute `bytecode` against `values`, using `stack` as scratch space.
///
/// `stack` is cleared on entry and left empty on both success and error —
/// callers reuse the same buffer across repeated calls rather than
/// allocating a fresh one each time (see [`crate::registry::Slot`]).
pub fn eval_with_stack(
    bytecode: &[Opcode],
    immediates: &[f64],
    values: &[f64],
    stack: &mut Vec<f64>,
) -> Result<f64, EvalError> {
    stack.clear();
    let mut dp = 0usize;

    for &op in bytecode {
        match op {
            Opcode::PushImmed => {
                stack.push(immediates[dp]);
                dp += 1;
            }
            Opcode::Var(idx) => stack.push(values[idx]),

            Opcode::Neg => {
                let a = pop(stack);
                stack.push(-a);
            }

            Opcode::Add => binop(stack, |a, b| a + b),
            Opcode::Sub => binop(stack, |a, b| a - b),
            Opcode::Mul => binop(stack, |a, b| a * b),
            Opcode::Div => {
                let b = pop(stack);
                let a = pop(stack);
                if b == 0.0 {
                    stack.clear();
                    return Err(EvalError::DivisionByZero);
                }
                stack.push(a / b);
            }
            Opcode::Pow => {
                let b = pop(stack);
                let a = pop(stack);
                if a == 0.0 && b < 0.0 {
                    stack.clear();
                    return Err(EvalError::DivisionByZero);
                }
                if a <= 0.0 && b.fract() != 0.0 {
                    stack.clear();
                    return Err(EvalError::NegativeBaseFractionalPower);
                }
                stack.push(a.powf(b));
            }

            Opcode::Abs => unop(stack, f64::abs),
            Opcode::Exp => unop(stack, f64::exp),
            Opcode::Log10 => {
                let a = pop(stack);
                if a <= 0.0 {
                    stack.clear();
                    return Err(EvalError::NonPositiveLog);
                }
                stack.push(a.log10());
            }
            Opcode::Ln => {
                let a = pop(stack);
                if a <= 0.0 {
                    stack.clear();
                    return Err(EvalError::NonPositiveLog);
                }
                stack.push(a.ln());
            }
            Opcode::Sqrt => {
                let a = pop(stack);
                if a < 0.0 {
                    stack.clear();
                    return Err(EvalError::NegativeSqrt);
                }
                stack.push(a.sqrt());
            }
            Opcode::Sinh => unop(stack, f64::sinh),
            Opcode::Cosh => unop(stack, f64::cosh),
            Opcode::Tanh => unop(stack, f64::tanh),
            Opcode::Sin => unop(stack, f64::sin),
            Opcode::Cos => unop(stack, f64::cos),
            Opcode::Tan => unop(stack, f64::tan),
            Opcode::Asin => {
                let a = pop(stack);
                if a.abs() > 1.0 {
                    stack.clear();
                    return Err(EvalError::AsinAcosOutOfRange);
                }
                stack.push(a.asin());
            }
            Opcode::Acos => {
                let a = pop(stack);
                if a.abs() > 1.0 {
                    stack.clear();
                    return Err(EvalError::AsinAcosOutOfRange);
                }
                stack.push(a.acos());
            }
            Opcode::Atan => unop(stack, f64::atan),
            Opcode::Besj0 => unop(stack, libm::j0),
            Opcode::Besj1 => unop(stack, libm::j1),
            Opcode::Besy0 => {
                let a = pop(stack);
                if a <= 0.0 {
                    stack.clear();
                    return Err(EvalError::NonPositiveBesselY0);
                }
                stack.push(libm::y0(a));
            }
            Opcode::Besy1 => {
                let a = pop(stack);
                if a <= 0.0 {
                    stack.clear();
                    return Err(EvalError::NonPositiveBesselY1);
                }
                stack.push(libm::y1(a));
            }
            Opcode::Erfcs => {
                let a = pop(stack);
                stack.push(libm::erfc(a) * libm::exp(a * a));
            }
            Opcode::Erfc => unop(stack, libm::erfc),
            Opcode::Erf => unop(stack, libm::erf),
            Opcode::Gamma => {
                let a = pop(stack);
                if a <= 0.0 && a.fract() == 0.0 {
                    stack.clear();
                    return Err(EvalError::GammaAtNonPositiveInteger);
                }
                stack.push(libm::tgamma(a));
            }
            Opcode::Atan2 => {
                let b = pop(stack);
                let a = pop(stack);
                stack.push(a.atan2(b));
            }
        }
    }

    let result = pop(stack);
    Ok(result)
}

fn pop(stack: &mut Vec<f64>) -> f64 {
    stack.pop().expect("operand stack underflow: miscompiled bytecode")
}

fn unop(stack: &mut Vec<f64>, f: impl Fn(f64) -> f64) {
    let a = pop(stack);
    stack.push(f(a));
}

fn binop(stack: &mut Vec<f64>, f: impl Fn(f64, f64) -> f64) {
    let b = pop(stack);
    let a = pop(stack);
    stack.push(f(a, b));
}
