//! Wrapper module to export the Rust dual data type to Python using pyo3 bindings.

use crate::dual::{Dual, MathFuncs};
use crate::json::json_py::DeserializedObj;
use crate::json::JSON;
use num_traits::Pow;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

/// A Python operand of a dual operation.
#[derive(FromPyObject)]
pub(crate) enum Operand {
    Dual(Dual),
    F64(f64),
}

impl From<Operand> for Dual {
    fn from(value: Operand) -> Self {
        match value {
            Operand::Dual(d) => d,
            Operand::F64(f) => Dual::new(f),
        }
    }
}

#[pymethods]
impl Dual {
    #[new]
    #[pyo3(signature = (real, dual=0.0))]
    fn new_py(real: f64, dual: f64) -> Self {
        Dual::with_gradient(real, dual)
    }

    /// Create the independent variable at a point, with gradient 1.
    #[staticmethod]
    #[pyo3(name = "variable")]
    fn variable_py(real: f64) -> Self {
        Dual::variable(real)
    }

    #[getter]
    #[pyo3(name = "real")]
    fn real_py(&self) -> f64 {
        self.real()
    }

    #[getter]
    #[pyo3(name = "dual")]
    fn dual_py(&self) -> f64 {
        self.gradient()
    }

    fn __repr__(&self) -> String {
        format!("<Dual: {:.6}, {:.6}>", self.real, self.dual)
    }

    fn __eq__(&self, other: Operand) -> bool {
        *self == Dual::from(other)
    }

    fn __lt__(&self, other: Operand) -> bool {
        *self < Dual::from(other)
    }

    fn __le__(&self, other: Operand) -> bool {
        *self <= Dual::from(other)
    }

    fn __gt__(&self, other: Operand) -> bool {
        *self > Dual::from(other)
    }

    fn __ge__(&self, other: Operand) -> bool {
        *self >= Dual::from(other)
    }

    fn __neg__(&self) -> Self {
        -self
    }

    fn __add__(&self, other: Operand) -> Self {
        self + Dual::from(other)
    }

    fn __radd__(&self, other: Operand) -> Self {
        Dual::from(other) + self
    }

    fn __sub__(&self, other: Operand) -> Self {
        self - Dual::from(other)
    }

    fn __rsub__(&self, other: Operand) -> Self {
        Dual::from(other) - self
    }

    fn __mul__(&self, other: Operand) -> Self {
        self * Dual::from(other)
    }

    fn __rmul__(&self, other: Operand) -> Self {
        Dual::from(other) * self
    }

    fn __truediv__(&self, other: Operand) -> Self {
        self / Dual::from(other)
    }

    fn __rtruediv__(&self, other: Operand) -> Self {
        Dual::from(other) / self
    }

    fn __pow__(&self, power: Operand, modulo: Option<i32>) -> PyResult<Self> {
        if modulo.is_some() {
            return Err(PyValueError::new_err("Power function for `Dual` cannot be modulo."));
        }
        Ok(self.pow(&Dual::from(power)))
    }

    fn __abs__(&self) -> Self {
        self.abs()
    }

    fn __float__(&self) -> f64 {
        self.real
    }

    fn __exp__(&self) -> Self {
        self.exp()
    }

    fn __log__(&self) -> Self {
        self.log()
    }

    fn __sqrt__(&self) -> Self {
        self.sqrt()
    }

    // JSON
    /// Return a JSON representation of the object.
    #[pyo3(name = "to_json")]
    fn to_json_py(&self) -> PyResult<String> {
        DeserializedObj::Dual(*self)
            .to_json()
            .map_err(|e| PyValueError::new_err(format!("Failed to serialize `Dual` to JSON.\n{}", e)))
    }
}
