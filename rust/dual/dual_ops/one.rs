use crate::dual::dual::Dual;
use num_traits::One;

impl One for Dual {
    fn one() -> Dual {
        Dual::new(1.0)
    }
}
