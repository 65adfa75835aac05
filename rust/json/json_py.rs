//! Wrapper to allow de/serializable objects in Rust to be passed to/from Python using pyo3
//! bindings.

use crate::dual::Dual;
use crate::eval::EvalConfig;
use crate::json::JSON;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use serde::{Deserialize, Serialize};

/// Container for the Python exposed Rust objects which are deserializable.
///
/// This allows a single `from_json` function to detect the type and convert it directly to
/// a usable type in Python.
#[derive(Serialize, Deserialize, IntoPyObject)]
pub(crate) enum DeserializedObj {
    Dual(Dual),
    EvalConfig(EvalConfig),
}

impl JSON for DeserializedObj {}

#[pyfunction]
#[pyo3(name = "from_json")]
pub(crate) fn from_json_py(_py: Python<'_>, json: &str) -> PyResult<DeserializedObj> {
    DeserializedObj::from_json(json).map_err(|e| {
        PyValueError::new_err(format!(
            "Could not create Class or Struct from given JSON.\n{}",
            e
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialized_object() {
        let x = Dual::variable(2.5);
        let json = DeserializedObj::Dual(x).to_json().unwrap();
        assert_eq!(json, "{\"Dual\":{\"real\":2.5,\"dual\":1.0}}");
        match DeserializedObj::from_json(&json).unwrap() {
            DeserializedObj::Dual(d) => assert_eq!(d, x),
            DeserializedObj::EvalConfig(_) => panic!("wrong variant"),
        }
    }
}
