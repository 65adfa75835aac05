use serde::{Deserialize, Serialize};

/// Limits applied while evaluating a guest program.
///
/// There is no limit on loop iterations or running time: a guest program that never
/// terminates blocks the calling thread.
#[cfg_attr(
    feature = "python",
    pyo3::pyclass(module = "dualrewrite", get_all, set_all)
)]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// Maximum nesting of guest function calls before
    /// [StackOverflow](crate::error::EvaluationError::StackOverflow) is raised.
    pub max_call_depth: usize,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            max_call_depth: 256,
        }
    }
}
