use crate::dual::dual::Dual;
use auto_ops::{impl_op_ex, impl_op_ex_commutative};

// Mul f64
impl_op_ex_commutative!(*|a: &Dual, b: &f64| -> Dual { Dual {real: a.real * b, dual: a.dual * b} });

// impl Mul for Dual, by the product rule
impl_op_ex!(*|a: &Dual, b: &Dual| -> Dual {
    Dual {
        real: a.real * b.real,
        dual: a.real * b.dual + b.real * a.dual,
    }
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mul_f64() {
        let d1 = Dual::with_gradient(1.0, 2.0);
        let result = 10.0 * d1 * 2.0;
        let expected = Dual::with_gradient(20.0, 40.0);
        assert_eq!(result, expected)
    }

    #[test]
    fn mul() {
        let d1 = Dual::with_gradient(1.0, 2.0);
        let d2 = Dual::with_gradient(2.0, -1.0);
        let expected = Dual::with_gradient(2.0, 3.0);
        let result = d1 * d2;
        assert_eq!(result, expected)
    }

    #[test]
    fn mul_constant_has_no_gradient() {
        let c = Dual::new(3.0);
        let result = &c * &c;
        assert_eq!(result, Dual::new(9.0))
    }
}
