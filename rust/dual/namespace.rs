//! The dual arithmetic namespace that rewritten programs call into.
//!
//! Each member is a plain function pointer over [Dual], grouped by calling convention. The
//! in-place members ([Member::Step] and [Member::Assign]) take the storage slot of their
//! first argument; the evaluator is responsible for resolving that slot from a binding.

use crate::dual::constants::CONSTANTS;
use crate::dual::dual::{Dual, MathFuncs};
use indexmap::IndexMap;
use num_traits::Pow;
use std::fmt;
use std::sync::LazyLock;

/// A member of the dual namespace.
#[derive(Clone, Copy)]
pub enum Member {
    /// `f(x) -> Dual`
    Unary(fn(&Dual) -> Dual),
    /// `f(x, y) -> Dual`
    Binary(fn(&Dual, &Dual) -> Dual),
    /// `f(x, y) -> bool`, comparing real components only.
    Compare(fn(&Dual, &Dual) -> bool),
    /// `f(&mut x)`, shifting the value of a binding in place.
    Step(fn(&mut Dual)),
    /// `f(&mut x, y)`, compound assignment to a binding in place.
    Assign(fn(&mut Dual, &Dual)),
    /// A named constant with zero gradient.
    Constant(Dual),
}

impl Member {
    /// Number of arguments the member is called with. Constants are not callable.
    pub fn arity(&self) -> Option<usize> {
        match self {
            Member::Unary(_) | Member::Step(_) => Some(1),
            Member::Binary(_) | Member::Compare(_) | Member::Assign(_) => Some(2),
            Member::Constant(_) => None,
        }
    }
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Member::Unary(_) => write!(f, "Unary"),
            Member::Binary(_) => write!(f, "Binary"),
            Member::Compare(_) => write!(f, "Compare"),
            Member::Step(_) => write!(f, "Step"),
            Member::Assign(_) => write!(f, "Assign"),
            Member::Constant(c) => write!(f, "Constant({})", c),
        }
    }
}

/// Immutable table of namespace members, keyed by the name a rewritten program uses.
pub static NAMESPACE: LazyLock<IndexMap<&'static str, Member>> = LazyLock::new(|| {
    let mut members: IndexMap<&'static str, Member> = IndexMap::from([
        ("neg", Member::Unary(|x| -x)),
        ("incr", Member::Step(Dual::incr)),
        ("decr", Member::Step(Dual::decr)),
        ("gt", Member::Compare(|x, y| x > y)),
        ("gte", Member::Compare(|x, y| x >= y)),
        ("lt", Member::Compare(|x, y| x < y)),
        ("lte", Member::Compare(|x, y| x <= y)),
        ("eq", Member::Compare(Dual::value_eq)),
        ("add", Member::Binary(|x, y| x + y)),
        ("sub", Member::Binary(|x, y| x - y)),
        ("mul", Member::Binary(|x, y| x * y)),
        ("div", Member::Binary(|x, y| x / y)),
        ("addAssign", Member::Assign(|x, y| *x += y)),
        ("subAssign", Member::Assign(|x, y| *x -= y)),
        ("mulAssign", Member::Assign(|x, y| *x *= y)),
        ("divAssign", Member::Assign(|x, y| *x /= y)),
        ("sqrt", Member::Unary(Dual::sqrt)),
        ("sin", Member::Unary(Dual::sin)),
        ("cos", Member::Unary(Dual::cos)),
        ("tan", Member::Unary(Dual::tan)),
        ("asin", Member::Unary(Dual::asin)),
        ("acos", Member::Unary(Dual::acos)),
        ("atan", Member::Unary(Dual::atan)),
        ("log", Member::Unary(Dual::log)),
        ("exp", Member::Unary(Dual::exp)),
        ("abs", Member::Unary(Dual::abs)),
        ("pow", Member::Binary(|x, y| x.pow(y))),
    ]);
    members.extend(
        CONSTANTS
            .iter()
            .map(|(name, value)| (*name, Member::Constant(*value))),
    );
    members
});

/// Look up a namespace member by name.
pub fn member(name: &str) -> Option<Member> {
    NAMESPACE.get(name).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn members() {
        assert_eq!(NAMESPACE.len(), 27 + 8);
        assert!(matches!(member("sin"), Some(Member::Unary(_))));
        assert!(matches!(member("mulAssign"), Some(Member::Assign(_))));
        assert!(matches!(member("PI"), Some(Member::Constant(_))));
        assert!(member("floor").is_none());
    }

    #[test]
    fn binary_member() {
        let Some(Member::Binary(mul)) = member("mul") else {
            panic!("mul is not binary")
        };
        let x = Dual::variable(3.0);
        assert_eq!(mul(&x, &x), Dual::with_gradient(9.0, 6.0));
    }

    #[test]
    fn compare_member_ignores_gradient() {
        let Some(Member::Compare(eq)) = member("eq") else {
            panic!("eq is not a comparison")
        };
        assert!(eq(&Dual::variable(1.0), &Dual::new(1.0)));
    }

    #[test]
    fn mutators() {
        let Some(Member::Assign(add_assign)) = member("addAssign") else {
            panic!("addAssign is not an assignment")
        };
        let mut x = Dual::variable(1.0);
        add_assign(&mut x, &Dual::variable(2.0));
        assert_eq!(x, Dual::with_gradient(3.0, 2.0));
        let Some(Member::Step(incr)) = member("incr") else {
            panic!("incr is not a step")
        };
        incr(&mut x);
        assert_eq!(x, Dual::with_gradient(4.0, 2.0));
        assert!(matches!(member("decr"), Some(Member::Step(_))));
        assert_eq!(member("decr").and_then(|m| m.arity()), Some(1));
        assert_eq!(member("E").and_then(|m| m.arity()), None);
    }
}
