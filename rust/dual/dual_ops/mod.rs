mod add;
mod assign;
mod div;
mod eq;
mod from;
pub mod math_funcs;
mod mul;
mod neg;
mod one;
mod ord;
mod pow;
mod sub;
mod sum;
mod zero;
