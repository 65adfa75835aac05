use crate::dual::dual::Dual;
use auto_ops::impl_op_ex;

impl_op_ex!(/ |a: &Dual, b: &f64| -> Dual { Dual {real: a.real / b, dual: a.dual / b} });
impl_op_ex!(/ |a: &f64, b: &Dual| -> Dual { Dual::new(*a) / b });

// impl Div for Dual, by the quotient rule. A zero denominator follows IEEE-754.
impl_op_ex!(/ |a: &Dual, b: &Dual| -> Dual {
    Dual {
        real: a.real / b.real,
        dual: (b.real * a.dual - a.real * b.dual) / (b.real * b.real),
    }
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn div_f64() {
        let d1 = Dual::with_gradient(1.0, 2.0);
        let result = d1 / 2.0;
        let expected = Dual::with_gradient(0.5, 1.0);
        assert_eq!(result, expected)
    }

    #[test]
    fn f64_div() {
        let d1 = Dual::with_gradient(2.0, 1.0);
        let result = 1.0 / d1;
        let expected = Dual::with_gradient(0.5, -0.25);
        assert_eq!(result, expected)
    }

    #[test]
    fn div() {
        let d1 = Dual::with_gradient(1.0, 2.0);
        let d2 = Dual::with_gradient(2.0, 3.0);
        let expected = Dual::with_gradient(0.5, 0.25);
        let result = d1 / d2;
        assert_eq!(result, expected)
    }

    #[test]
    fn div_by_zero() {
        let result = Dual::new(1.0) / Dual::variable(0.0);
        assert_eq!(result.real(), f64::INFINITY);
        assert_eq!(result.gradient(), f64::NEG_INFINITY);
        let result = Dual::new(0.0) / Dual::new(0.0);
        assert!(result.real().is_nan());
    }
}
