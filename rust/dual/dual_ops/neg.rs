use crate::dual::dual::Dual;
use auto_ops::impl_op;

impl_op!(-|a: Dual| -> Dual {
    Dual {
        real: -a.real,
        dual: -a.dual,
    }
});
impl_op!(-|a: &Dual| -> Dual {
    Dual {
        real: -a.real,
        dual: -a.dual,
    }
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negate() {
        let d = Dual::with_gradient(2.3, -1.4);
        let d2 = -d;
        assert!(d2.real == -2.3);
        assert!(d2.dual == 1.4);
    }

    #[test]
    fn neg_ref() {
        let d1 = Dual::with_gradient(2.5, 1.1);
        let d2 = -&d1;
        assert_eq!(d2, Dual::with_gradient(-2.5, -1.1));
    }
}
