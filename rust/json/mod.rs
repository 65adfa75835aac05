//! Serialization of dual numbers, syntax trees and evaluator settings to JSON, with the
//! ``serde`` crate.

#[cfg(feature = "python")]
pub(crate) mod json_py;

use crate::dual::Dual;
use crate::eval::EvalConfig;
use crate::syntax::Program;
use serde::{Deserialize, Serialize};

/// Handles the `to` and `from` JSON conversion.
pub trait JSON: Serialize + for<'de> Deserialize<'de> {
    /// Return a JSON string representing the object.
    fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Return an indented JSON string representing the object.
    fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Create an object from a JSON string representation.
    fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl JSON for Dual {}
impl JSON for Program {}
impl JSON for EvalConfig {}
