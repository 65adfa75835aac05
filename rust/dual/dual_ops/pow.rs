use crate::dual::dual::Dual;
use num_traits::Pow;

impl Pow<f64> for Dual {
    type Output = Dual;
    fn pow(self, power: f64) -> Self::Output {
        (&self).pow(power)
    }
}

impl Pow<f64> for &Dual {
    type Output = Dual;
    fn pow(self, power: f64) -> Self::Output {
        Dual {
            real: self.real.powf(power),
            dual: self.dual * power * self.real.powf(power - 1.0),
        }
    }
}

impl Pow<&Dual> for f64 {
    type Output = Dual;
    fn pow(self, power: &Dual) -> Self::Output {
        let c = self.powf(power.real);
        Dual {
            real: c,
            dual: power.dual * c * self.ln(),
        }
    }
}

impl Pow<Dual> for f64 {
    type Output = Dual;
    fn pow(self, power: Dual) -> Self::Output {
        self.pow(&power)
    }
}

/// Raise a `Dual` to a `Dual` power.
///
/// d(x^y) = y x^(y-1) x' + x^y ln(x) y'. A term whose seed gradient is exactly zero is
/// omitted, so a negative base raised to a constant power has a finite gradient.
impl Pow<&Dual> for &Dual {
    type Output = Dual;
    fn pow(self, power: &Dual) -> Self::Output {
        let real = self.real.powf(power.real);
        let mut dual = 0.0_f64;
        if self.dual != 0.0 {
            dual += self.dual * power.real * self.real.powf(power.real - 1.0);
        }
        if power.dual != 0.0 {
            dual += power.dual * real * self.real.ln();
        }
        Dual { real, dual }
    }
}

impl Pow<Dual> for Dual {
    type Output = Dual;
    fn pow(self, power: Dual) -> Self::Output {
        (&self).pow(&power)
    }
}
