use crate::dual::{Dual, Member};
use crate::eval::scope::Env;
use crate::syntax::Function;
use std::fmt;
use std::rc::Rc;

/// A runtime value of the guest language.
#[derive(Clone, Debug)]
pub enum Value {
    Undefined,
    Bool(bool),
    Number(f64),
    Dual(Dual),
    Function(Rc<Closure>),
    /// The `Dual(value, gradient?)` constructor.
    DualConstructor,
    /// The dual arithmetic namespace object, `AD`.
    DualNamespace,
    /// A callable member of the dual namespace.
    Builtin(&'static str, Member),
}

/// A function value together with the scope it was defined in.
pub struct Closure {
    pub(crate) function: Function,
    pub(crate) scope: Env,
}

impl Closure {
    pub fn name(&self) -> Option<&str> {
        self.function.name.as_deref()
    }

    pub fn params(&self) -> &[String] {
        &self.function.params
    }
}

impl fmt::Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Closure")
            .field("name", &self.function.name)
            .field("params", &self.function.params)
            .finish_non_exhaustive()
    }
}

impl Value {
    /// Name of the value's type as used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Dual(_) => "dual",
            Value::Function(_) | Value::DualConstructor | Value::Builtin(..) => "function",
            Value::DualNamespace => "namespace",
        }
    }

    pub fn as_dual(&self) -> Option<Dual> {
        match self {
            Value::Dual(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_callable(&self) -> bool {
        matches!(
            self,
            Value::Function(_) | Value::DualConstructor | Value::Builtin(..)
        )
    }
}

impl PartialEq for Value {
    /// Strict equality. Functions compare by identity, duals by both components.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Dual(a), Value::Dual(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::DualConstructor, Value::DualConstructor) => true,
            (Value::DualNamespace, Value::DualNamespace) => true,
            (Value::Builtin(a, _), Value::Builtin(b, _)) => a == b,
            _ => false,
        }
    }
}

impl From<Dual> for Value {
    fn from(value: Dual) -> Self {
        Value::Dual(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

pub(crate) fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let text = if n > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else {
        format!("{}", n)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::Dual(d) => write!(f, "{}", d),
            Value::Function(c) => write!(f, "[function {}]", c.name().unwrap_or("anonymous")),
            Value::DualConstructor => write!(f, "[function Dual]"),
            Value::DualNamespace => write!(f, "[namespace AD]"),
            Value::Builtin(name, _) => write!(f, "[function AD.{}]", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dual::member;

    #[test]
    fn display() {
        assert_eq!(Value::Number(2.0).to_string(), "2");
        assert_eq!(Value::Number(f64::NEG_INFINITY).to_string(), "-Infinity");
        assert_eq!(Value::Number(f64::NAN).to_string(), "NaN");
        assert_eq!(Value::from(Dual::variable(1.5)).to_string(), "<Dual: 1.5, 1>");
        assert_eq!(Value::Undefined.to_string(), "undefined");
    }

    #[test]
    fn strict_equality() {
        assert_eq!(Value::Number(1.0), Value::from(1.0));
        assert_ne!(Value::Number(f64::NAN), Value::Number(f64::NAN));
        assert_ne!(Value::Number(1.0), Value::Bool(true));
        let sin = member("sin").unwrap();
        assert_eq!(Value::Builtin("sin", sin), Value::Builtin("sin", sin));
    }

    #[test]
    fn type_names() {
        assert_eq!(Value::from(Dual::new(1.0)).type_name(), "dual");
        assert_eq!(Value::DualConstructor.type_name(), "function");
        assert!(Value::DualConstructor.is_callable());
        assert!(!Value::DualNamespace.is_callable());
    }
}
