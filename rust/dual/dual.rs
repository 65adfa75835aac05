pub use crate::dual::dual_ops::math_funcs::MathFuncs;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A dual number data type supporting first order derivatives with respect to a single
/// distinguished variable.
///
/// `real` holds the value of a quantity and `dual` holds its derivative. Every supported
/// operation propagates `dual` by the chain rule, so after any sequence of operations `dual`
/// is the exact derivative of the expression that produced `real`.
#[cfg_attr(feature = "python", pyo3::pyclass(module = "dualrewrite"))]
#[derive(Clone, Copy, Default, Debug, Deserialize, Serialize)]
pub struct Dual {
    pub(crate) real: f64,
    pub(crate) dual: f64,
}

impl Dual {
    /// Constructs a new constant `Dual`, with gradient set to 0.0_f64.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use dualrewrite::dual::Dual;
    /// let c = Dual::new(2.5);
    /// assert_eq!(c.gradient(), 0.0);
    /// ```
    pub fn new(real: f64) -> Self {
        Self { real, dual: 0.0 }
    }

    /// Constructs a new `Dual` with an explicit gradient.
    pub fn with_gradient(real: f64, dual: f64) -> Self {
        Self { real, dual }
    }

    /// Constructs the independent variable at a point, with gradient set to 1.0_f64.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use dualrewrite::dual::Dual;
    /// let x = Dual::variable(3.0);
    /// let y = &x * &x;
    /// assert_eq!(y.real(), 9.0);
    /// assert_eq!(y.gradient(), 6.0);
    /// ```
    pub fn variable(real: f64) -> Self {
        Self { real, dual: 1.0 }
    }

    /// Get the real component value of the struct.
    pub fn real(&self) -> f64 {
        self.real
    }

    /// Get the first order gradient with respect to the independent variable.
    pub fn gradient(&self) -> f64 {
        self.dual
    }

    /// Add one to the real component in place. The gradient is unaffected.
    pub fn incr(&mut self) {
        self.real += 1.0;
    }

    /// Subtract one from the real component in place. The gradient is unaffected.
    pub fn decr(&mut self) {
        self.real -= 1.0;
    }
}

impl fmt::Display for Dual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Dual: {}, {}>", self.real, self.dual)
    }
}
