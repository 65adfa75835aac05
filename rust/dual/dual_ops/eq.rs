use crate::dual::dual::Dual;

/// Measures value equivalence of `Dual`.
///
/// Returns `true` if both the `real` and the `dual` components are equal. This is structural
/// equality; the guest language's `==` compares `real` components only, see
/// [Dual::value_eq].
impl PartialEq<Dual> for Dual {
    fn eq(&self, other: &Dual) -> bool {
        self.real == other.real && self.dual == other.dual
    }
}

impl PartialEq<f64> for Dual {
    fn eq(&self, other: &f64) -> bool {
        Dual::new(*other) == *self
    }
}

impl PartialEq<Dual> for f64 {
    fn eq(&self, other: &Dual) -> bool {
        Dual::new(*self) == *other
    }
}

impl Dual {
    /// Compare `real` components only, ignoring gradients.
    pub fn value_eq(&self, other: &Dual) -> bool {
        self.real == other.real
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eq_ne() {
        // Dual with gradient - f64
        assert!(Dual::variable(0.0) != 0.0);
        // constant Dual - f64 (+reverse)
        assert!(Dual::new(2.0) == 2.0);
        assert!(2.0 == Dual::new(2.0));
        // Dual - Dual (real, gradient mismatch)
        let d = Dual::with_gradient(2.0, 2.3);
        assert!(d == Dual::with_gradient(2.0, 2.3));
        assert!(d != Dual::with_gradient(3.0, 2.3));
        assert!(d != Dual::with_gradient(2.0, 1.3));
    }

    #[test]
    fn value_eq_ignores_gradient() {
        let d = Dual::with_gradient(2.0, 2.3);
        assert!(d.value_eq(&Dual::new(2.0)));
        assert!(!d.value_eq(&Dual::with_gradient(2.5, 2.3)));
    }
}
