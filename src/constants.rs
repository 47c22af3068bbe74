//! # Named Constants
//!
//! Two tokens are recognised as named constants wherever a leaf (number,
//! variable, or constant) is expected (§4.8): `pi`, a fixed literal, and
//! `mu`, a back-door into a process-wide scalar `mu0` that host programs can
//! adjust between parses (but not retroactively — `mu` is baked into a
//! slot's immediates at parse time).
//!
//! `mu0` is stored behind a `once_cell::sync::Lazy<Mutex<f64>>`, the same
//! lazy-static-mutex idiom this pack already uses for process-wide state
//! (see the runtime's file-handle table). Both constants are matched as a
//! fixed 2-character prefix, case-sensitively is *not* required by the
//! spec — only function names are case-insensitive — so `pi`/`mu` are
//! matched literally.

use once_cell::sync::Lazy;
use std::sync::Mutex;

/// `pi`, to the same precision SLATEC-derived function libraries typically
/// hard-code.
pub const PI: f64 = 3.14159265358979323846;

static MU0: Lazy<Mutex<f64>> = Lazy::new(|| Mutex::new(1.0));

/// Current value of the `mu0` scalar backing the `mu` constant. Defaults to 1.
pub fn mu0() -> f64 {
    *MU0.lock().unwrap()
}

/// Set the `mu0` scalar. Takes effect for parses that happen after the call;
/// slots already compiled keep whatever value of `mu` was baked in at their
/// own parse time.
pub fn set_mu0(value: f64) {
    *MU0.lock().unwrap() = value;
}

/// Recognised constant names, matched as an exact 2-character token
/// (§4.8's "2-character prefix" — both names happen to be exactly 2
/// characters long).
pub fn match_constant(text: &[char], pos: usize) -> Option<f64> {
    if pos + 2 > text.len() {
        return None;
    }
    let tok: String = text[pos..pos + 2].iter().collect();
    match tok.as_str() {
        "pi" => Some(PI),
        "mu" => Some(mu0()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test_helper::serial;

    mod serial_test_helper {
        // Tiny in-crate stand-in: `mu0` is process-wide, so tests that
        // mutate it must not interleave with other tests touching it.
        // A real dependency like `serial_test` would be overkill for one
        // global; a module-level `Mutex` guard does the same job.
        use std::sync::Mutex;
        pub static GUARD: Mutex<()> = Mutex::new(());

        pub fn serial<F: FnOnce()>(f: F) {
            let _lock = GUARD.lock().unwrap_or_else(|e| e.into_inner());
            f();
        }
    }

    #[test]
    fn pi_matches() {
        let t: Vec<char> = "pi*2".chars().collect();
        assert_eq!(match_constant(&t, 0), Some(PI));
    }

    #[test]
    fn mu_defaults_to_one() {
        serial(|| {
            set_mu0(1.0);
            let t: Vec<char> = "mu".chars().collect();
            assert_eq!(match_constant(&t, 0), Some(1.0));
        });
    }

    #[test]
    fn mu_reflects_set_mu0() {
        serial(|| {
            set_mu0(2.5);
            let t: Vec<char> = "mu".chars().collect();
            assert_eq!(match_constant(&t, 0), Some(2.5));
            set_mu0(1.0);
        });
    }

    #[test]
    fn unknown_token_misses() {
        let t: Vec<char> = "xy".chars().collect();
        assert_eq!(match_constant(&t, 0), None);
    }
}
