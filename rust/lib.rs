//! Forward mode automatic differentiation of functions given as source text.
//!
//! A single argument function written in a small JavaScript subset is parsed, its
//! arithmetic is rewritten into calls on a namespace of [dual number](dual::Dual)
//! operations, and the rewritten program is evaluated on the independent variable. The
//! gradient of the result is the exact derivative of the function at that point.
//!
//! ```rust
//! # use dualrewrite::differentiate;
//! let d = differentiate("x => { let y = x; y *= x; return y }", 3.0).unwrap();
//! assert_eq!(d, 6.0);
//! ```

#[cfg(test)]
mod tests;

pub mod dual;
pub mod error;
pub mod eval;
pub mod json;
pub mod rewrite;
pub mod syntax;

mod diff;
pub use crate::diff::{derivative, differentiate, evaluate, evaluate_with, rewrite_source};
pub use crate::error::{Error, EvaluationError, ParseError, Result};

#[cfg(feature = "python")]
mod diff_py;

#[cfg(feature = "python")]
use pyo3::prelude::*;

#[cfg(feature = "python")]
#[pymodule]
fn dualrewrite(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // JSON
    m.add_function(wrap_pyfunction!(json::json_py::from_json_py, m)?)?;

    // Automatic Differentiation
    m.add_class::<dual::Dual>()?;
    m.add_class::<eval::EvalConfig>()?;
    m.add_function(wrap_pyfunction!(diff_py::diff_py, m)?)?;
    m.add_function(wrap_pyfunction!(diff_py::evaluate_py, m)?)?;
    m.add_function(wrap_pyfunction!(diff_py::rewrite_py, m)?)?;

    Ok(())
}
