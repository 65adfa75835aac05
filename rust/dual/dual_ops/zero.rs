use crate::dual::dual::Dual;
use num_traits::Zero;

impl Zero for Dual {
    fn zero() -> Dual {
        Dual::new(0.0)
    }

    fn is_zero(&self) -> bool {
        *self == Dual::new(0.0)
    }
}
