//! Derivatives of Rust functions written directly against `Dual`.

use crate::derivative;
use crate::dual::{Dual, MathFuncs};
use num_traits::{One, Pow, Zero};
use rstest::rstest;

#[rstest]
#[case(0.5)]
#[case(2.0)]
fn product_and_chain_rules(#[case] a: f64) {
    let d = derivative(|x| &x * &x.sin(), a);
    let expected = a.sin() + a * a.cos();
    assert!((d - expected).abs() < 1e-12);
}

#[test]
fn generic_code_over_dual() {
    fn horner<T>(coefficients: &[f64], x: T) -> T
    where
        T: Zero + Copy + std::ops::Mul<T, Output = T> + std::ops::Add<f64, Output = T>,
    {
        coefficients.iter().fold(T::zero(), |acc, c| acc * x + *c)
    }
    // 2x^2 + 3x + 1
    let d = derivative(|x| horner(&[2.0, 3.0, 1.0], x), 2.0);
    assert_eq!(d, 11.0);
}

#[test]
fn sum_of_terms() {
    let d = derivative(|x| (1..=3).map(|k| x.pow(k as f64)).sum(), 1.0);
    assert_eq!(d, 6.0);
}

#[test]
fn in_place_operators() {
    let d = derivative(
        |x| {
            let mut y = Dual::one();
            y *= x;
            y += 2.0;
            y /= x;
            y
        },
        2.0,
    );
    // (x + 2) / x
    assert_eq!(d, -0.5);
}
