//! Python bindings for differentiating guest source text.

use crate::diff::{evaluate_with, rewrite_source};
use crate::dual::Dual;
use crate::error::{Error, ParseError};
use crate::eval::EvalConfig;
use pyo3::exceptions::{PyRuntimeError, PySyntaxError};
use pyo3::prelude::*;

impl From<Error> for PyErr {
    fn from(err: Error) -> Self {
        match err {
            Error::Parse(e) => PyErr::from(e),
            Error::Evaluation(e) => PyRuntimeError::new_err(e.to_string()),
        }
    }
}

impl From<ParseError> for PyErr {
    fn from(err: ParseError) -> Self {
        PySyntaxError::new_err(err.to_string())
    }
}

/// Return the derivative of the function given as source text at a point.
#[pyfunction]
#[pyo3(name = "diff", signature = (source, at, config=None))]
pub(crate) fn diff_py(source: &str, at: f64, config: Option<EvalConfig>) -> PyResult<f64> {
    Ok(evaluate_with(source, at, config.unwrap_or_default())?.gradient())
}

/// Return the value and derivative of the function given as source text at a point.
#[pyfunction]
#[pyo3(name = "evaluate", signature = (source, at, config=None))]
pub(crate) fn evaluate_py(source: &str, at: f64, config: Option<EvalConfig>) -> PyResult<Dual> {
    Ok(evaluate_with(source, at, config.unwrap_or_default())?)
}

/// Return the source text of the function rewritten onto dual numbers.
#[pyfunction]
#[pyo3(name = "rewrite")]
pub(crate) fn rewrite_py(source: &str) -> PyResult<String> {
    Ok(rewrite_source(source)?)
}
