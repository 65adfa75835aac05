//! Differentiation of single argument functions.
//!
//! [differentiate] takes the source text of a guest function, rewrites it onto dual numbers
//! and runs it on the independent variable `Dual(at, 1)`. [derivative] does the same for a
//! Rust closure written against [Dual] directly, where operator overloading makes the
//! rewrite unnecessary.

use crate::dual::Dual;
use crate::error::{EvaluationError, ParseError, Result};
use crate::eval::{Context, EvalConfig, Value};
use crate::rewrite::{transform, DUAL_CONSTRUCTOR, DUAL_NAMESPACE};
use crate::syntax::parse;
use log::{debug, trace};

/// Guest name of the independent variable.
const INPUT: &str = "at";
/// Guest name the result is written to.
const RESULT: &str = "result";

/// Parse a function, wrapped in parentheses so it forms a standalone expression, and
/// return the rewritten source.
///
/// # Examples
///
/// ```rust
/// # use dualrewrite::rewrite_source;
/// let source = rewrite_source("x => x * x + 1").unwrap();
/// assert_eq!(source, "(x => AD.add(AD.mul(x, x), Dual(1)));\n");
/// ```
pub fn rewrite_source(source: &str) -> std::result::Result<String, ParseError> {
    let program = parse(&format!("({})", source))?;
    let rewritten = transform(&program).render();
    trace!("rewritten source:\n{}", rewritten);
    Ok(rewritten)
}

/// Evaluate a function and its derivative at a point.
///
/// The result's real component is `f(at)` and its gradient is `f'(at)`.
pub fn evaluate(source: &str, at: f64) -> Result<Dual> {
    evaluate_with(source, at, EvalConfig::default())
}

/// [evaluate] with explicit evaluator limits.
pub fn evaluate_with(source: &str, at: f64, config: EvalConfig) -> Result<Dual> {
    debug!("differentiating `{}` at {}", source, at);
    let generated = rewrite_source(source)?;
    let mut context = Context::new([
        (DUAL_NAMESPACE, Value::DualNamespace),
        (DUAL_CONSTRUCTOR, Value::DualConstructor),
        (INPUT, Value::Dual(Dual::variable(at))),
    ])
    .with_config(config);
    let program = format!(
        "{} = ({})({})",
        RESULT,
        generated.trim_end().trim_end_matches(';'),
        INPUT
    );
    context.run(&program)?;
    match context.get(RESULT) {
        Some(Value::Dual(result)) => {
            debug!("result {}", result);
            Ok(result)
        }
        Some(other) => Err(EvaluationError::NotDual {
            found: other.to_string(),
        }
        .into()),
        None => Err(EvaluationError::ReferenceError(RESULT.to_string()).into()),
    }
}

/// Derivative of a guest function at a point.
///
/// # Examples
///
/// ```rust
/// # use dualrewrite::differentiate;
/// let d = differentiate("x => Math.sin(x * x)", 2.0).unwrap();
/// assert!((d - 4.0 * 4.0_f64.cos()).abs() < 1e-12);
/// ```
pub fn differentiate(source: &str, at: f64) -> Result<f64> {
    Ok(evaluate(source, at)?.gradient())
}

/// Derivative of a Rust function of a [Dual] at a point.
///
/// # Examples
///
/// ```rust
/// # use dualrewrite::{derivative, dual::{Dual, MathFuncs}};
/// let d = derivative(|x: Dual| &x * &x.sin(), 0.5);
/// assert!((d - (0.5_f64.sin() + 0.5 * 0.5_f64.cos())).abs() < 1e-12);
/// ```
pub fn derivative<F>(f: F, at: f64) -> f64
where
    F: Fn(Dual) -> Dual,
{
    f(Dual::variable(at)).gradient()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dual::MathFuncs;
    use crate::error::Error;

    #[test]
    fn polynomial() {
        let d = evaluate("x => 3 * x * x - 2 * x + 1", 2.0).unwrap();
        assert_eq!(d, Dual::with_gradient(9.0, 10.0));
    }

    #[test]
    fn function_expression_source() {
        let d = differentiate("function (x) { return x / (1 + x) }", 1.0).unwrap();
        assert!((d - 0.25).abs() < 1e-15);
    }

    #[test]
    fn loops_and_mutation() {
        let source = "x => { let y = 1; for (let i = 0; i < 3; i++) { y *= x } return y }";
        assert_eq!(evaluate(source, 2.0).unwrap(), Dual::with_gradient(8.0, 12.0));
    }

    #[test]
    fn branches_use_value_comparisons() {
        let source = "x => { if (x < 0) { return -x } else { return x * x } }";
        assert_eq!(differentiate(source, -3.0).unwrap(), -1.0);
        assert_eq!(differentiate(source, 3.0).unwrap(), 6.0);
    }

    #[test]
    fn pow_member() {
        let d = differentiate("x => Math.pow(x, 3)", 2.0).unwrap();
        assert!((d - 12.0).abs() < 1e-12);
    }

    #[test]
    fn non_dual_result() {
        assert_eq!(
            evaluate("x => x > 1", 2.0),
            Err(Error::Evaluation(EvaluationError::NotDual {
                found: "true".to_string()
            }))
        );
    }

    #[test]
    fn parse_errors_surface() {
        assert!(matches!(
            differentiate("x => x +", 1.0),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn configured_depth() {
        let source = "x => { let f = n => n > 0 ? f(n - 1) : x; return f(10) }";
        assert!(evaluate_with(source, 1.0, EvalConfig::default()).is_ok());
        assert_eq!(
            evaluate_with(source, 1.0, EvalConfig { max_call_depth: 4 }),
            Err(Error::Evaluation(EvaluationError::StackOverflow { depth: 4 }))
        );
    }

    #[test]
    fn native_derivative() {
        assert_eq!(derivative(|x| &x * &x, 3.0), 6.0);
        assert_eq!(derivative(|x| x.exp(), 0.0), 1.0);
    }
}
