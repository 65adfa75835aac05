use crate::dual::dual::Dual;

/// Functions for common mathematical operations.
///
/// Each function returns the elementary function of the `real` component with the gradient
/// scaled by that function's derivative, i.e. the chain rule `f(g)' = f'(g) g'`.
pub trait MathFuncs {
    /// Return the square root of a value.
    fn sqrt(&self) -> Self;
    /// Return the sine of a value.
    fn sin(&self) -> Self;
    /// Return the cosine of a value.
    fn cos(&self) -> Self;
    /// Return the tangent of a value.
    fn tan(&self) -> Self;
    /// Return the arcsine of a value.
    fn asin(&self) -> Self;
    /// Return the arccosine of a value.
    fn acos(&self) -> Self;
    /// Return the arctangent of a value.
    fn atan(&self) -> Self;
    /// Return the natural logarithm of a value.
    fn log(&self) -> Self;
    /// Return the exponential of a value.
    fn exp(&self) -> Self;
    /// Return the absolute value of a value.
    ///
    /// The derivative is undefined at zero, where the gradient is NaN.
    fn abs(&self) -> Self;
}

impl MathFuncs for Dual {
    fn sqrt(&self) -> Self {
        let c = self.real.sqrt();
        Dual {
            real: c,
            dual: self.dual * 0.5 / c,
        }
    }
    fn sin(&self) -> Self {
        Dual {
            real: self.real.sin(),
            dual: self.dual * self.real.cos(),
        }
    }
    fn cos(&self) -> Self {
        Dual {
            real: self.real.cos(),
            dual: -self.dual * self.real.sin(),
        }
    }
    fn tan(&self) -> Self {
        let c = self.real.cos();
        Dual {
            real: self.real.tan(),
            dual: self.dual / (c * c),
        }
    }
    fn asin(&self) -> Self {
        Dual {
            real: self.real.asin(),
            dual: self.dual / (1.0 - self.real * self.real).sqrt(),
        }
    }
    fn acos(&self) -> Self {
        Dual {
            real: self.real.acos(),
            dual: -self.dual / (1.0 - self.real * self.real).sqrt(),
        }
    }
    fn atan(&self) -> Self {
        Dual {
            real: self.real.atan(),
            dual: self.dual / (1.0 + self.real * self.real),
        }
    }
    fn log(&self) -> Self {
        Dual {
            real: self.real.ln(),
            dual: self.dual / self.real,
        }
    }
    fn exp(&self) -> Self {
        let c = self.real.exp();
        Dual {
            real: c,
            dual: self.dual * c,
        }
    }
    fn abs(&self) -> Self {
        let sign = if self.real > 0.0 {
            1.0
        } else if self.real < 0.0 {
            -1.0
        } else {
            f64::NAN
        };
        Dual {
            real: self.real.abs(),
            dual: self.dual * sign,
        }
    }
}
