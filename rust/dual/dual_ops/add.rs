use crate::dual::dual::Dual;
use auto_ops::{impl_op_ex, impl_op_ex_commutative};

// Add f64
impl_op_ex_commutative!(+ |a: &Dual, b: &f64| -> Dual { Dual {real: a.real + b, dual: a.dual} });

// Add for Dual
impl_op_ex!(+ |a: &Dual, b: &Dual| -> Dual { Dual {real: a.real + b.real, dual: a.dual + b.dual} });

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_f64() {
        let d1 = Dual::with_gradient(1.0, 2.0);
        let result = 10.0 + d1 + 15.0;
        let expected = Dual::with_gradient(26.0, 2.0);
        assert_eq!(result, expected)
    }

    #[test]
    fn add() {
        let d1 = Dual::with_gradient(1.0, 2.0);
        let d2 = Dual::with_gradient(2.0, -3.0);
        let expected = Dual::with_gradient(3.0, -1.0);
        let result = &d1 + &d2;
        assert_eq!(result, expected)
    }
}
