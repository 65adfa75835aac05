use crate::syntax::{AssignOp, BinaryOp, UnaryOp};
use indexmap::IndexMap;
use std::sync::LazyLock;

/// Guest name of the dual arithmetic namespace.
pub const DUAL_NAMESPACE: &str = "AD";
/// Guest name of the elementary math namespace, rebound to [DUAL_NAMESPACE].
pub const MATH_NAMESPACE: &str = "Math";
/// Guest name of the constructor wrapped around numeric literals.
pub const DUAL_CONSTRUCTOR: &str = "Dual";

/// Operators that are rewritten into calls on the dual namespace, keyed to the name of the
/// namespace member that replaces them.
///
/// Operators absent from the table are left in place.
#[derive(Debug, Clone)]
pub struct RuleTable {
    unary: IndexMap<UnaryOp, &'static str>,
    binary: IndexMap<BinaryOp, &'static str>,
    assign: IndexMap<AssignOp, &'static str>,
}

impl RuleTable {
    fn new() -> Self {
        Self {
            unary: IndexMap::from([
                (UnaryOp::Neg, "neg"),
                (UnaryOp::Incr, "incr"),
                (UnaryOp::Decr, "decr"),
            ]),
            binary: IndexMap::from([
                (BinaryOp::Add, "add"),
                (BinaryOp::Sub, "sub"),
                (BinaryOp::Mul, "mul"),
                (BinaryOp::Div, "div"),
                (BinaryOp::Lt, "lt"),
                (BinaryOp::Le, "lte"),
                (BinaryOp::Gt, "gt"),
                (BinaryOp::Ge, "gte"),
                (BinaryOp::Eq, "eq"),
                (BinaryOp::StrictEq, "eq"),
            ]),
            assign: IndexMap::from([
                (AssignOp::Add, "addAssign"),
                (AssignOp::Sub, "subAssign"),
                (AssignOp::Mul, "mulAssign"),
                (AssignOp::Div, "divAssign"),
            ]),
        }
    }

    /// Member replacing a prefix or postfix unary operator.
    pub fn unary(&self, op: &UnaryOp) -> Option<&'static str> {
        self.unary.get(op).copied()
    }

    pub fn binary(&self, op: &BinaryOp) -> Option<&'static str> {
        self.binary.get(op).copied()
    }

    /// Member replacing a compound assignment. Plain `=` is never rewritten.
    pub fn assign(&self, op: &AssignOp) -> Option<&'static str> {
        self.assign.get(op).copied()
    }

    /// The name an identifier is rebound to, if any.
    pub fn rename(&self, name: &str) -> Option<&'static str> {
        (name == MATH_NAMESPACE).then_some(DUAL_NAMESPACE)
    }
}

/// The process-wide rule table.
pub static RULES: LazyLock<RuleTable> = LazyLock::new(RuleTable::new);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dual::member;

    #[test]
    fn every_rule_targets_a_namespace_member() {
        let members = RULES
            .unary
            .values()
            .chain(RULES.binary.values())
            .chain(RULES.assign.values());
        for name in members {
            assert!(member(name).is_some(), "{} is not a namespace member", name);
        }
    }

    #[test]
    fn equality_operators_share_a_rule() {
        assert_eq!(RULES.binary(&BinaryOp::Eq), Some("eq"));
        assert_eq!(RULES.binary(&BinaryOp::StrictEq), Some("eq"));
        assert_eq!(RULES.binary(&BinaryOp::Ne), None);
    }

    #[test]
    fn unlisted_operators() {
        assert_eq!(RULES.binary(&BinaryOp::Rem), None);
        assert_eq!(RULES.binary(&BinaryOp::Pow), None);
        assert_eq!(RULES.unary(&UnaryOp::Not), None);
        assert_eq!(RULES.assign(&AssignOp::Assign), None);
        assert_eq!(RULES.assign(&AssignOp::Rem), None);
    }

    #[test]
    fn rename() {
        assert_eq!(RULES.rename("Math"), Some("AD"));
        assert_eq!(RULES.rename("math"), None);
    }
}
