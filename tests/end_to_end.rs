//! End-to-end exercise of the `Registry` pipeline: normalise, check,
//! compile, evaluate. Covers the concrete scenario table and the
//! parse-error scenarios.

use formula_engine::{explain, Registry};

fn vars(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn eval(expr: &str, var_names: &[&str], values: &[f64]) -> f64 {
    let mut registry = Registry::new(1);
    registry.parse(1, expr, &vars(var_names)).expect("expected a valid expression");
    registry.evaluate(1, values).expect("expected evaluation to succeed")
}

#[test]
fn constant_folding_and_precedence() {
    assert_eq!(eval("2+3*4", &[], &[]), 14.0);
}

#[test]
fn unary_minus_binds_looser_than_power() {
    assert_eq!(eval("-2^2", &[], &[]), -4.0);
}

#[test]
fn pythagorean_distance() {
    let r = eval("sqrt(x^2+y^2)", &["x", "y"], &[3.0, 4.0]);
    assert!((r - 5.0).abs() < 1e-12);
}

#[test]
fn atan2_of_equal_components() {
    let r = eval("atan2(1,1)", &[], &[]);
    assert!((r - std::f64::consts::FRAC_PI_4).abs() < 1e-12);
}

#[test]
fn power_and_double_star_are_equivalent() {
    assert_eq!(eval("2 ** (1+2)", &[], &[]), 8.0);
}

#[test]
fn pi_times_default_mu() {
    let r = eval("pi*mu", &[], &[]);
    assert!((r - std::f64::consts::PI).abs() < 1e-9);
}

#[test]
fn division_by_zero_is_a_domain_error() {
    let mut registry = Registry::new(1);
    registry.parse(1, "1/(x-x)", &vars(&["x"])).unwrap();
    let err = registry.evaluate(1, &[5.0]).unwrap_err();
    assert_eq!(err.code(), 1);
}

#[test]
fn log_of_a_negative_number_is_a_domain_error() {
    let mut registry = Registry::new(1);
    registry.parse(1, "log(-1)", &vars(&[])).unwrap();
    let err = registry.evaluate(1, &[]).unwrap_err();
    assert_eq!(err.code(), 3);
}

#[test]
fn negative_base_fractional_power_is_a_domain_error() {
    let mut registry = Registry::new(1);
    registry.parse(1, "(-8)^(1/3)", &vars(&[])).unwrap();
    let err = registry.evaluate(1, &[]).unwrap_err();
    assert_eq!(err.code(), 5);
}

#[test]
fn gamma_at_a_nonpositive_integer_is_a_domain_error() {
    let mut registry = Registry::new(1);
    registry.parse(1, "gamf(-3)", &vars(&[])).unwrap();
    let err = registry.evaluate(1, &[]).unwrap_err();
    assert_eq!(err.code(), 8);
}

#[test]
fn parse_error_scenarios_are_all_rejected() {
    let cases = [
        "((x+1)",
        "x y",
        "foo(x)",
        "sin()",
        "atan2(1)",
        "3.e",
        "+*x",
    ];
    for expr in cases {
        let mut registry = Registry::new(1);
        let err = registry
            .parse(1, expr, &vars(&["x"]))
            .expect_err(&format!("expected {:?} to be rejected", expr));
        // The diagnostic must at least render without panicking and must
        // point somewhere inside (or just past) the original string.
        let diagnostic = explain(expr, &err);
        assert!(diagnostic.contains("*** Error in syntax of function string:"));
    }
}

#[test]
fn reparsing_the_same_text_is_idempotent() {
    let mut registry = Registry::new(1);
    registry.parse(1, "sqrt(x^2+1)", &vars(&["x"])).unwrap();
    let first = registry.evaluate(1, &[4.0]).unwrap();
    registry.parse(1, "sqrt(x^2+1)", &vars(&["x"])).unwrap();
    let second = registry.evaluate(1, &[4.0]).unwrap();
    assert_eq!(first, second);
}

#[test]
fn whitespace_does_not_change_the_result() {
    assert_eq!(eval("2+3*4", &[], &[]), eval(" 2 + 3 * 4 ", &[], &[]));
}
