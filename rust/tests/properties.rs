//! Derivatives of guest functions checked against their analytic values.

use crate::error::{Error, EvaluationError, ParseError};
use crate::{differentiate, evaluate};
use rstest::rstest;
use std::f64::consts::PI;

const TOL: f64 = 1e-12;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() <= TOL * expected.abs().max(1.0),
        "{} != {}",
        actual,
        expected
    );
}

#[rstest]
#[case(-2.5)]
#[case(0.0)]
#[case(1.0)]
#[case(7.25)]
fn identity(#[case] a: f64) {
    init();
    assert_eq!(differentiate("x => x", a).unwrap(), 1.0);
}

#[rstest]
#[case(-3.0)]
#[case(0.0)]
#[case(0.5)]
#[case(11.0)]
fn square(#[case] a: f64) {
    init();
    assert_close(differentiate("x => x * x", a).unwrap(), 2.0 * a);
}

#[rstest]
#[case(-4.0)]
#[case(0.25)]
#[case(3.0)]
fn reciprocal(#[case] a: f64) {
    init();
    assert_close(differentiate("x => 1 / x", a).unwrap(), -1.0 / (a * a));
}

#[rstest]
#[case(-1.2)]
#[case(0.0)]
#[case(2.0)]
fn sine(#[case] a: f64) {
    init();
    assert_close(differentiate("x => Math.sin(x)", a).unwrap(), a.cos());
}

#[rstest]
#[case(-1.5)]
#[case(0.3)]
#[case(2.0)]
fn chain_rule(#[case] a: f64) {
    init();
    let expected = 2.0 * a * (a * a).cos();
    assert_close(differentiate("x => Math.sin(x * x)", a).unwrap(), expected);
}

#[rstest]
#[case(-2.0)]
#[case(0.0)]
#[case(5.5)]
fn compound_assignment_matches_direct(#[case] a: f64) {
    init();
    let compound = differentiate("x => { let y = x; y *= x; return y; }", a).unwrap();
    let direct = differentiate("x => x * x", a).unwrap();
    assert_eq!(compound, direct);
}

#[rstest]
#[case(-1.0)]
#[case(0.0)]
#[case(3.0)]
fn constants_have_zero_gradient(#[case] a: f64) {
    init();
    assert_close(differentiate("x => Math.PI * x", a).unwrap(), PI);
    assert_close(differentiate("x => x + Math.E", a).unwrap(), 1.0);
}

#[rstest]
#[case(2.0, 1.0)]
#[case(0.5, 1.0)]
#[case(-0.5, -1.0)]
#[case(-3.0, -1.0)]
fn abs_away_from_zero(#[case] a: f64, #[case] expected: f64) {
    init();
    assert_eq!(differentiate("x => Math.abs(x)", a).unwrap(), expected);
}

#[test]
fn abs_at_zero_is_nan() {
    init();
    assert!(differentiate("x => Math.abs(x)", 0.0).unwrap().is_nan());
}

#[rstest]
#[case("x => Math.sqrt(x)", 4.0, 0.25)]
#[case("x => Math.exp(2 * x)", 0.0, 2.0)]
#[case("x => Math.log(x)", 2.0, 0.5)]
#[case("x => Math.cos(x)", 0.0, 0.0)]
#[case("x => Math.tan(x)", 0.0, 1.0)]
#[case("x => Math.asin(x)", 0.0, 1.0)]
#[case("x => Math.acos(x)", 0.0, -1.0)]
#[case("x => Math.atan(x)", 1.0, 0.5)]
#[case("x => Math.pow(x, 3)", -2.0, 12.0)]
#[case("x => Math.pow(2, x)", 1.0, 2.0 * std::f64::consts::LN_2)]
fn elementary_functions(#[case] source: &str, #[case] a: f64, #[case] expected: f64) {
    init();
    assert_close(differentiate(source, a).unwrap(), expected);
}

#[rstest]
#[case("x => -x", -1.0)]
#[case("x => x - 3", 1.0)]
#[case("x => { let y = x; y += x; return y }", 2.0)]
#[case("x => { let y = x; y -= 2 * x; return y }", -1.0)]
#[case("x => { let y = x; y /= 2; return y }", 0.5)]
#[case("x => { let y = x; y++; y--; ++y; return y }", 1.0)]
fn linear_forms(#[case] source: &str, #[case] expected: f64) {
    init();
    assert_eq!(differentiate(source, 1.5).unwrap(), expected);
}

#[test]
fn increment_shifts_the_value_only() {
    init();
    let d = evaluate("x => { let y = x; y++; return y }", 2.0).unwrap();
    assert_eq!(d.real(), 3.0);
    assert_eq!(d.gradient(), 1.0);
}

#[rstest]
#[case("x => { let y = x; let z = y++ * y; return z }")]
#[case("x => { let y = x; return ++y }")]
#[case("x => { let y = x; return y-- }")]
fn increments_have_no_value(#[case] source: &str) {
    init();
    assert!(matches!(evaluate(source, 2.0), Err(Error::Evaluation(_))));
}

#[test]
fn piecewise_functions_follow_the_taken_branch() {
    init();
    let source = "function (x) { if (x <= 1) { return x * x } return 2 * x - 1 }";
    assert_eq!(differentiate(source, 0.5).unwrap(), 1.0);
    assert_eq!(differentiate(source, 3.0).unwrap(), 2.0);
    let ternary = "x => x === 0 ? x : x * x * x";
    assert_eq!(differentiate(ternary, 0.0).unwrap(), 1.0);
    assert_eq!(differentiate(ternary, 2.0).unwrap(), 12.0);
}

#[test]
fn loops_accumulate_derivatives() {
    init();
    let source = "x => { let s = 0; let i = 1; while (i <= 4) { s += i * x; i++ } return s }";
    assert_eq!(evaluate(source, 2.0).unwrap().gradient(), 10.0);
}

#[test]
fn helper_functions_are_rewritten_too() {
    init();
    let source = "x => { const sq = t => t * t; const cube = function (t) { return t * sq(t) }; return cube(x) }";
    assert_eq!(differentiate(source, 2.0).unwrap(), 12.0);
}

#[test]
fn division_by_zero_is_not_an_error() {
    init();
    let d = evaluate("x => 1 / x", 0.0).unwrap();
    assert_eq!(d.real(), f64::INFINITY);
    assert!(d.gradient().is_infinite() || d.gradient().is_nan());
}

#[rstest]
#[case("x => x % 2", "%")]
#[case("x => x ** 2", "**")]
#[case("x => x != 1 ? x : x", "!=")]
#[case("x => { let y = x; y **= 2; return y }", "**=")]
fn unsupported_operators_fail_fast(#[case] source: &str, #[case] operator: &'static str) {
    init();
    assert_eq!(
        differentiate(source, 1.0),
        Err(Error::Evaluation(EvaluationError::UnsupportedOperator {
            operator,
            operand: "dual"
        }))
    );
}

#[test]
fn parse_errors_surface() {
    init();
    assert!(matches!(differentiate("x => (x", 1.0), Err(Error::Parse(_))));
    assert!(matches!(differentiate("x => x @ 2", 1.0), Err(Error::Parse(_))));
}

#[test]
fn deep_nesting_is_a_parse_error() {
    init();
    let n = 10_000;
    let parens = format!("x => {}x{}", "(".repeat(n), ")".repeat(n));
    assert!(matches!(differentiate(&parens, 1.0), Err(Error::Parse(ParseError::TooDeep { .. }))));
    let negations = format!("x => {}x", "- ".repeat(n));
    assert!(matches!(differentiate(&negations, 1.0), Err(Error::Parse(ParseError::TooDeep { .. }))));
}

#[test]
fn moderate_nesting_differentiates() {
    init();
    let parens = format!("x => {}x * x{}", "(".repeat(100), ")".repeat(100));
    assert_eq!(differentiate(&parens, 3.0).unwrap(), 6.0);
    let negations = format!("x => {}x", "- ".repeat(40));
    assert_eq!(differentiate(&negations, 3.0).unwrap(), 1.0);
}

#[test]
fn evaluation_errors_surface() {
    init();
    assert_eq!(
        differentiate("x => x * y", 1.0),
        Err(Error::Evaluation(EvaluationError::ReferenceError(
            "y".to_string()
        )))
    );
}
