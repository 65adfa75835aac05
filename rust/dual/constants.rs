//! Named mathematical constants, each carrying a zero gradient.

use crate::dual::dual::Dual;
use indexmap::IndexMap;
use std::f64::consts;
use std::sync::LazyLock;

/// Immutable lookup of the guest language's named constants, built once on first use.
pub static CONSTANTS: LazyLock<IndexMap<&'static str, Dual>> = LazyLock::new(|| {
    IndexMap::from([
        ("PI", Dual::new(consts::PI)),
        ("E", Dual::new(consts::E)),
        ("LN2", Dual::new(consts::LN_2)),
        ("LN10", Dual::new(consts::LN_10)),
        ("LOG2E", Dual::new(consts::LOG2_E)),
        ("LOG10E", Dual::new(consts::LOG10_E)),
        ("SQRT2", Dual::new(consts::SQRT_2)),
        ("SQRT1_2", Dual::new(consts::FRAC_1_SQRT_2)),
    ])
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_have_zero_gradient() {
        assert_eq!(CONSTANTS.len(), 8);
        for (_, c) in CONSTANTS.iter() {
            assert_eq!(c.gradient(), 0.0);
        }
    }

    #[test]
    fn lookup() {
        assert_eq!(CONSTANTS.get("PI"), Some(&Dual::new(consts::PI)));
        assert_eq!(CONSTANTS.get("SQRT1_2").map(|c| c.real()), Some(0.5_f64.sqrt()));
        assert_eq!(CONSTANTS.get("TAU"), None);
    }
}
