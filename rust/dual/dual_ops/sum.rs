use crate::dual::dual::Dual;
use std::iter::Sum;

impl Sum for Dual {
    fn sum<I>(iter: I) -> Self
    where
        I: Iterator<Item = Dual>,
    {
        iter.fold(Dual::new(0.0), |acc, x| acc + x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sum() {
        let v = vec![
            Dual::new(2.5),
            Dual::variable(1.5),
            Dual::with_gradient(3.5, 2.0),
        ];
        let s: Dual = v.into_iter().sum();
        assert_eq!(s, Dual::with_gradient(7.5, 3.0));
    }
}
