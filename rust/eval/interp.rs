//! Tree walking interpreter over [Program]s.
//!
//! Plain numbers follow IEEE-754 double semantics for every operator. Dual numbers support
//! only the operations of the dual namespace: any other operator applied to a dual, or a
//! dual used as a condition, raises [EvaluationError::UnsupportedOperator] instead of
//! silently dropping the gradient.

use crate::dual::{Dual, Member, NAMESPACE};
use crate::error::EvaluationError;
use crate::eval::config::EvalConfig;
use crate::eval::scope::{assign, declare, lookup, renew, resolve, Env, Scope};
use crate::eval::value::{Closure, Value};
use crate::rewrite::DUAL_NAMESPACE;
use crate::syntax::{
    AssignOp, BinaryOp, DeclKind, Expr, Function, FunctionBody, Program, Stmt, UnaryOp,
};
use log::trace;
use std::rc::Rc;

type Result<T> = std::result::Result<T, EvaluationError>;

/// How control leaves a statement.
enum Flow {
    Normal,
    Break,
    Continue,
    Return(Value),
}

fn unsupported(operator: &'static str) -> EvaluationError {
    EvaluationError::UnsupportedOperator {
        operator,
        operand: "dual",
    }
}

/// ECMAScript `ToInt32`.
fn to_int32(n: f64) -> i32 {
    if !n.is_finite() {
        return 0;
    }
    let modulus = 4_294_967_296.0_f64;
    let n = n.trunc() % modulus;
    let n = if n < 0.0 { n + modulus } else { n };
    n as u32 as i32
}

fn to_uint32(n: f64) -> u32 {
    to_int32(n) as u32
}

/// Exponentiation where `(±1) ** ±Infinity` and `x ** NaN` are NaN.
fn pow(a: f64, b: f64) -> f64 {
    if b.is_nan() || (a.abs() == 1.0 && b.is_infinite()) {
        f64::NAN
    } else {
        a.powf(b)
    }
}

fn numeric(op: BinaryOp, a: f64, b: f64) -> Value {
    match op {
        BinaryOp::Add => Value::Number(a + b),
        BinaryOp::Sub => Value::Number(a - b),
        BinaryOp::Mul => Value::Number(a * b),
        BinaryOp::Div => Value::Number(a / b),
        BinaryOp::Rem => Value::Number(a % b),
        BinaryOp::Pow => Value::Number(pow(a, b)),
        BinaryOp::Lt => Value::Bool(a < b),
        BinaryOp::Le => Value::Bool(a <= b),
        BinaryOp::Gt => Value::Bool(a > b),
        BinaryOp::Ge => Value::Bool(a >= b),
        BinaryOp::Eq | BinaryOp::StrictEq => Value::Bool(a == b),
        BinaryOp::Ne | BinaryOp::StrictNe => Value::Bool(a != b),
        BinaryOp::BitAnd => Value::Number((to_int32(a) & to_int32(b)) as f64),
        BinaryOp::BitOr => Value::Number((to_int32(a) | to_int32(b)) as f64),
        BinaryOp::BitXor => Value::Number((to_int32(a) ^ to_int32(b)) as f64),
        BinaryOp::Shl => Value::Number(to_int32(a).wrapping_shl(to_uint32(b) & 31) as f64),
        BinaryOp::Shr => Value::Number((to_int32(a) >> (to_uint32(b) & 31)) as f64),
        BinaryOp::UShr => Value::Number((to_uint32(a) >> (to_uint32(b) & 31)) as f64),
        // short circuiting operators never reach here
        BinaryOp::And => Value::Bool(a != 0.0 && b != 0.0),
        BinaryOp::Or => Value::Bool(a != 0.0 || b != 0.0),
    }
}

fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(_) | Value::Bool(_), Value::Number(_) | Value::Bool(_)) => {
            primitive_number(a) == primitive_number(b)
        }
        _ => a == b,
    }
}

fn primitive_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => *n,
        Value::Bool(true) => 1.0,
        Value::Bool(false) => 0.0,
        _ => f64::NAN,
    }
}

pub(crate) struct Interpreter<'a> {
    globals: Env,
    config: &'a EvalConfig,
    depth: usize,
}

impl<'a> Interpreter<'a> {
    pub(crate) fn new(globals: Env, config: &'a EvalConfig) -> Self {
        Self {
            globals,
            config,
            depth: 0,
        }
    }

    /// Execute a program in the global scope, returning the value of the last expression
    /// statement.
    pub(crate) fn program(&mut self, program: &Program) -> Result<Value> {
        let globals = Rc::clone(&self.globals);
        let mut last = Value::Undefined;
        for stmt in program.body.iter() {
            if let Stmt::Expr(e) = stmt {
                last = self.eval(e, &globals)?;
                continue;
            }
            match self.exec(stmt, &globals)? {
                Flow::Normal => {}
                Flow::Break => return Err(EvaluationError::IllegalControlFlow("break")),
                Flow::Continue => return Err(EvaluationError::IllegalControlFlow("continue")),
                Flow::Return(_) => return Err(EvaluationError::IllegalControlFlow("return")),
            }
        }
        Ok(last)
    }

    // STATEMENTS

    fn block(&mut self, body: &[Stmt], env: &Env) -> Result<Flow> {
        for stmt in body {
            match self.exec(stmt, env)? {
                Flow::Normal => {}
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Normal)
    }

    fn exec(&mut self, stmt: &Stmt, env: &Env) -> Result<Flow> {
        match stmt {
            Stmt::Expr(e) => {
                self.eval(e, env)?;
                Ok(Flow::Normal)
            }
            Stmt::Decl(kind, declarators) => {
                for d in declarators {
                    let value = match &d.init {
                        Some(init) => self.eval(init, env)?,
                        None => Value::Undefined,
                    };
                    declare(env, &d.name, value, *kind == DeclKind::Const);
                }
                Ok(Flow::Normal)
            }
            Stmt::Block(body) => self.block(body, &Scope::child(env)),
            Stmt::If(test, consequent, alternate) => {
                let test = self.eval(test, env)?;
                if self.truthy(&test, "if")? {
                    self.exec(consequent, env)
                } else if let Some(alternate) = alternate {
                    self.exec(alternate, env)
                } else {
                    Ok(Flow::Normal)
                }
            }
            Stmt::While(test, body) => {
                loop {
                    let value = self.eval(test, env)?;
                    if !self.truthy(&value, "while")? {
                        break;
                    }
                    match self.exec(body, env)? {
                        Flow::Break => break,
                        Flow::Normal | Flow::Continue => {}
                        flow @ Flow::Return(_) => return Ok(flow),
                    }
                }
                Ok(Flow::Normal)
            }
            Stmt::For {
                init,
                test,
                update,
                body,
            } => {
                let mut scope = Scope::child(env);
                if let Some(init) = init {
                    self.exec(init, &scope)?;
                }
                // `let` and `const` loop variables are rebound for every iteration, so closures
                // created in the body see the value of their own iteration.
                let per_iteration: Vec<&str> = match init.as_deref() {
                    Some(Stmt::Decl(DeclKind::Let | DeclKind::Const, declarators)) => {
                        declarators.iter().map(|d| d.name.as_str()).collect()
                    }
                    _ => Vec::new(),
                };
                loop {
                    if let Some(test) = test {
                        let value = self.eval(test, &scope)?;
                        if !self.truthy(&value, "for")? {
                            break;
                        }
                    }
                    match self.exec(body, &scope)? {
                        Flow::Break => break,
                        Flow::Normal | Flow::Continue => {}
                        flow @ Flow::Return(_) => return Ok(flow),
                    }
                    if !per_iteration.is_empty() {
                        scope = renew(&scope, &per_iteration);
                    }
                    if let Some(update) = update {
                        self.eval(update, &scope)?;
                    }
                }
                Ok(Flow::Normal)
            }
            Stmt::Return(value) => {
                let value = match value {
                    Some(e) => self.eval(e, env)?,
                    None => Value::Undefined,
                };
                Ok(Flow::Return(value))
            }
            Stmt::Break => Ok(Flow::Break),
            Stmt::Continue => Ok(Flow::Continue),
            Stmt::Empty => Ok(Flow::Normal),
        }
    }

    /// Truthiness of a condition. Duals have no truth value.
    fn truthy(&self, value: &Value, construct: &'static str) -> Result<bool> {
        match value {
            Value::Undefined => Ok(false),
            Value::Bool(b) => Ok(*b),
            Value::Number(n) => Ok(*n != 0.0 && !n.is_nan()),
            Value::Dual(_) => Err(unsupported(construct)),
            Value::Function(_)
            | Value::DualConstructor
            | Value::DualNamespace
            | Value::Builtin(..) => Ok(true),
        }
    }

    // EXPRESSIONS

    fn eval(&mut self, expr: &Expr, env: &Env) -> Result<Value> {
        match expr {
            Expr::Num(n) => Ok(Value::Number(*n)),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Name(name) => {
                lookup(env, name).ok_or_else(|| EvaluationError::ReferenceError(name.clone()))
            }
            Expr::UnaryPrefix(op, operand) => self.prefix(*op, operand, env),
            Expr::UnaryPostfix(op, operand) => self.step(*op, operand, env, false),
            Expr::Binary(op, left, right) => self.binary(*op, left, right, env),
            Expr::Assign(op, target, value) => self.assignment(*op, target, value, env),
            Expr::Call(callee, args) => self.call(callee, args, env),
            Expr::Dot(object, property) => {
                let object = self.eval(object, env)?;
                self.property(&object, property)
            }
            Expr::Conditional(test, consequent, alternate) => {
                let test = self.eval(test, env)?;
                if self.truthy(&test, "?:")? {
                    self.eval(consequent, env)
                } else {
                    self.eval(alternate, env)
                }
            }
            Expr::Function(f) => Ok(Value::Function(Rc::new(Closure {
                function: f.clone(),
                scope: Rc::clone(env),
            }))),
        }
    }

    /// Coerce an operand of a plain operator to a number.
    fn number(&self, value: &Value, operator: &'static str) -> Result<f64> {
        match value {
            Value::Number(n) => Ok(*n),
            Value::Bool(_) | Value::Undefined => Ok(primitive_number(value)),
            Value::Dual(_) => Err(unsupported(operator)),
            other => Err(EvaluationError::TypeError(format!(
                "cannot apply `{}` to a {}",
                operator,
                other.type_name()
            ))),
        }
    }

    fn prefix(&mut self, op: UnaryOp, operand: &Expr, env: &Env) -> Result<Value> {
        match op {
            UnaryOp::Incr | UnaryOp::Decr => self.step(op, operand, env, true),
            UnaryOp::Neg => {
                let value = self.eval(operand, env)?;
                Ok(Value::Number(-self.number(&value, op.symbol())?))
            }
            UnaryOp::Plus => {
                let value = self.eval(operand, env)?;
                Ok(Value::Number(self.number(&value, op.symbol())?))
            }
            UnaryOp::Not => {
                let value = self.eval(operand, env)?;
                Ok(Value::Bool(!self.truthy(&value, op.symbol())?))
            }
            UnaryOp::BitNot => {
                let value = self.eval(operand, env)?;
                Ok(Value::Number(!to_int32(self.number(&value, op.symbol())?) as f64))
            }
        }
    }

    /// Plain `++`/`--`, which only apply to numbers.
    fn step(&mut self, op: UnaryOp, target: &Expr, env: &Env, prefix: bool) -> Result<Value> {
        let old = self.eval(target, env)?;
        let old = self.number(&old, op.symbol())?;
        let new = match op {
            UnaryOp::Decr => old - 1.0,
            _ => old + 1.0,
        };
        self.store(target, Value::Number(new), env)?;
        Ok(Value::Number(if prefix { new } else { old }))
    }

    fn binary(&mut self, op: BinaryOp, left: &Expr, right: &Expr, env: &Env) -> Result<Value> {
        match op {
            BinaryOp::And => {
                let left = self.eval(left, env)?;
                if self.truthy(&left, "&&")? {
                    self.eval(right, env)
                } else {
                    Ok(left)
                }
            }
            BinaryOp::Or => {
                let left = self.eval(left, env)?;
                if self.truthy(&left, "||")? {
                    Ok(left)
                } else {
                    self.eval(right, env)
                }
            }
            _ => {
                let left = self.eval(left, env)?;
                let right = self.eval(right, env)?;
                self.apply(op, &left, &right)
            }
        }
    }

    fn apply(&self, op: BinaryOp, left: &Value, right: &Value) -> Result<Value> {
        if matches!(left, Value::Dual(_)) || matches!(right, Value::Dual(_)) {
            return Err(unsupported(op.symbol()));
        }
        match op {
            BinaryOp::StrictEq => Ok(Value::Bool(left == right)),
            BinaryOp::StrictNe => Ok(Value::Bool(left != right)),
            BinaryOp::Eq => Ok(Value::Bool(loose_eq(left, right))),
            BinaryOp::Ne => Ok(Value::Bool(!loose_eq(left, right))),
            _ => {
                let a = self.number(left, op.symbol())?;
                let b = self.number(right, op.symbol())?;
                Ok(numeric(op, a, b))
            }
        }
    }

    fn assignment(&mut self, op: AssignOp, target: &Expr, value: &Expr, env: &Env) -> Result<Value> {
        let value = match op.binary() {
            None => self.eval(value, env)?,
            Some(binary) => {
                let current = self.eval(target, env)?;
                let value = self.eval(value, env)?;
                if matches!(current, Value::Dual(_)) || matches!(value, Value::Dual(_)) {
                    return Err(unsupported(op.symbol()));
                }
                self.apply(binary, &current, &value)?
            }
        };
        self.store(target, value.clone(), env)?;
        Ok(value)
    }

    /// Write to an assignment target. Assigning an undeclared name creates a global.
    fn store(&mut self, target: &Expr, value: Value, env: &Env) -> Result<()> {
        match target {
            Expr::Name(name) => {
                if !assign(env, name, value.clone())? {
                    trace!("creating global `{}`", name);
                    declare(&self.globals, name, value, false);
                }
                Ok(())
            }
            Expr::Dot(_, property) => Err(EvaluationError::TypeError(format!(
                "cannot assign to property `{}`",
                property
            ))),
            _ => Err(EvaluationError::TypeError(
                "invalid assignment target".to_string(),
            )),
        }
    }

    fn property(&self, object: &Value, property: &str) -> Result<Value> {
        match object {
            Value::DualNamespace => match NAMESPACE.get_key_value(property) {
                Some((_, Member::Constant(c))) => Ok(Value::Dual(*c)),
                Some((name, member)) => Ok(Value::Builtin(*name, *member)),
                None => Err(EvaluationError::TypeError(format!(
                    "`{}` is not a member of `{}`",
                    property, DUAL_NAMESPACE
                ))),
            },
            Value::Dual(d) => match property {
                "real" | "v" => Ok(Value::Number(d.real())),
                "gradient" | "g" => Ok(Value::Number(d.gradient())),
                _ => Ok(Value::Undefined),
            },
            Value::Undefined => Err(EvaluationError::TypeError(format!(
                "cannot read property `{}` of undefined",
                property
            ))),
            _ => Ok(Value::Undefined),
        }
    }

    fn call(&mut self, callee: &Expr, args: &[Expr], env: &Env) -> Result<Value> {
        let function = self.eval(callee, env)?;
        match function {
            Value::Builtin(name, member) => self.call_member(name, member, args, env),
            Value::Function(closure) => {
                let args = self.args(args, env)?;
                self.call_closure(&closure, args)
            }
            Value::DualConstructor => {
                let args = self.args(args, env)?;
                construct(&args)
            }
            other => Err(EvaluationError::TypeError(format!(
                "{} is not a function",
                other.type_name()
            ))),
        }
    }

    fn args(&mut self, args: &[Expr], env: &Env) -> Result<Vec<Value>> {
        args.iter().map(|a| self.eval(a, env)).collect()
    }

    pub(crate) fn call_closure(&mut self, closure: &Rc<Closure>, args: Vec<Value>) -> Result<Value> {
        if self.depth >= self.config.max_call_depth {
            return Err(EvaluationError::StackOverflow {
                depth: self.config.max_call_depth,
            });
        }
        trace!(
            "calling {} with {} argument(s)",
            closure.name().unwrap_or("anonymous function"),
            args.len()
        );
        self.depth += 1;
        let result = self.invoke(closure, args);
        self.depth -= 1;
        result
    }

    fn invoke(&mut self, closure: &Rc<Closure>, args: Vec<Value>) -> Result<Value> {
        let scope = Scope::child(&closure.scope);
        let Function { name, params, body, .. } = &closure.function;
        if let Some(name) = name {
            declare(&scope, name, Value::Function(Rc::clone(closure)), false);
        }
        let mut args = args.into_iter();
        for param in params {
            declare(&scope, param, args.next().unwrap_or(Value::Undefined), false);
        }
        match body {
            FunctionBody::Expr(e) => self.eval(e, &scope),
            FunctionBody::Block(body) => match self.block(body, &scope)? {
                Flow::Normal => Ok(Value::Undefined),
                Flow::Return(value) => Ok(value),
                Flow::Break => Err(EvaluationError::IllegalControlFlow("break")),
                Flow::Continue => Err(EvaluationError::IllegalControlFlow("continue")),
            },
        }
    }

    /// Call a member of the dual namespace. Mutating members write the binding named by
    /// their first argument in place.
    ///
    /// `incr` and `decr` stand for both prefix and postfix `++`/`--`, which differ in the value
    /// they yield, so they yield none at all. Using one as an operand then fails on the
    /// undefined value.
    fn call_member(
        &mut self,
        name: &'static str,
        member: Member,
        args: &[Expr],
        env: &Env,
    ) -> Result<Value> {
        let callee = || format!("{}.{}", DUAL_NAMESPACE, name);
        let Some(arity) = member.arity() else {
            return Err(EvaluationError::TypeError(format!("{} is not a function", callee())));
        };
        if args.len() != arity {
            return Err(EvaluationError::Arity {
                callee: callee(),
                expected: arity,
                found: args.len(),
            });
        }
        match member {
            Member::Unary(f) => {
                let x = self.dual_arg(&args[0], env, name)?;
                Ok(Value::Dual(f(&x)))
            }
            Member::Binary(f) => {
                let x = self.dual_arg(&args[0], env, name)?;
                let y = self.dual_arg(&args[1], env, name)?;
                Ok(Value::Dual(f(&x, &y)))
            }
            Member::Compare(f) => {
                let x = self.dual_arg(&args[0], env, name)?;
                let y = self.dual_arg(&args[1], env, name)?;
                Ok(Value::Bool(f(&x, &y)))
            }
            Member::Step(f) => {
                let slot = slot_name(&args[0], callee)?;
                mutate(env, slot, f)?;
                Ok(Value::Undefined)
            }
            Member::Assign(f) => {
                let slot = slot_name(&args[0], callee)?;
                let y = self.dual_arg(&args[1], env, name)?;
                Ok(Value::Dual(mutate(env, slot, |x| f(x, &y))?))
            }
            Member::Constant(_) => Err(EvaluationError::TypeError(format!(
                "{} is not a function",
                callee()
            ))),
        }
    }

    /// Evaluate a namespace argument, promoting plain numbers to constant duals.
    fn dual_arg(&mut self, arg: &Expr, env: &Env, name: &'static str) -> Result<Dual> {
        match self.eval(arg, env)? {
            Value::Dual(d) => Ok(d),
            Value::Number(n) => Ok(Dual::new(n)),
            other => Err(EvaluationError::TypeError(format!(
                "{}.{} expects dual arguments but got a {}",
                DUAL_NAMESPACE,
                name,
                other.type_name()
            ))),
        }
    }
}

fn slot_name(arg: &Expr, callee: impl Fn() -> String) -> Result<&str> {
    match arg {
        Expr::Name(name) => Ok(name),
        _ => Err(EvaluationError::InvalidMutationTarget(callee())),
    }
}

/// Apply an in-place operation to the dual stored in a binding, returning the updated value.
fn mutate(env: &Env, name: &str, f: impl FnOnce(&mut Dual)) -> Result<Dual> {
    let scope =
        resolve(env, name).ok_or_else(|| EvaluationError::ReferenceError(name.to_string()))?;
    let mut scope = scope.borrow_mut();
    let Some(binding) = scope.binding_mut(name) else {
        return Err(EvaluationError::ReferenceError(name.to_string()));
    };
    let mut x = match &binding.value {
        Value::Dual(d) => *d,
        Value::Number(n) => Dual::new(*n),
        other => {
            return Err(EvaluationError::TypeError(format!(
                "cannot update a {} in place",
                other.type_name()
            )))
        }
    };
    f(&mut x);
    binding.value = Value::Dual(x);
    Ok(x)
}

/// `Dual(value, gradient = 0)`.
fn construct(args: &[Value]) -> Result<Value> {
    let number = |value: &Value| match value {
        Value::Number(n) => Ok(*n),
        other => Err(EvaluationError::TypeError(format!(
            "Dual expects number arguments but got a {}",
            other.type_name()
        ))),
    };
    match args {
        [Value::Dual(d)] => Ok(Value::Dual(*d)),
        [real] => Ok(Value::Dual(Dual::new(number(real)?))),
        [real, gradient] => Ok(Value::Dual(Dual::with_gradient(
            number(real)?,
            number(gradient)?,
        ))),
        _ => Err(EvaluationError::Arity {
            callee: "Dual".to_string(),
            expected: if args.is_empty() { 1 } else { 2 },
            found: args.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int32_conversion() {
        assert_eq!(to_int32(4_294_967_297.0), 1);
        assert_eq!(to_int32(-1.0), -1);
        assert_eq!(to_int32(2_147_483_648.0), -2_147_483_648);
        assert_eq!(to_int32(f64::NAN), 0);
        assert_eq!(to_uint32(-1.0), u32::MAX);
    }

    #[test]
    fn numeric_operators() {
        assert_eq!(numeric(BinaryOp::Rem, -7.0, 3.0), Value::Number(-1.0));
        assert_eq!(numeric(BinaryOp::Shl, 1.0, 33.0), Value::Number(2.0));
        assert_eq!(numeric(BinaryOp::UShr, -1.0, 28.0), Value::Number(15.0));
        assert_eq!(numeric(BinaryOp::Shr, -16.0, 2.0), Value::Number(-4.0));
        assert!(matches!(numeric(BinaryOp::Pow, 1.0, f64::INFINITY), Value::Number(n) if n.is_nan()));
        assert_eq!(numeric(BinaryOp::Pow, 2.0, 10.0), Value::Number(1024.0));
    }

    #[test]
    fn loose_equality() {
        assert!(loose_eq(&Value::Bool(true), &Value::Number(1.0)));
        assert!(loose_eq(&Value::Undefined, &Value::Undefined));
        assert!(!loose_eq(&Value::Undefined, &Value::Number(0.0)));
    }

    #[test]
    fn constructor() {
        assert_eq!(
            construct(&[Value::Number(2.0)]),
            Ok(Value::Dual(Dual::new(2.0)))
        );
        assert_eq!(
            construct(&[Value::Number(2.0), Value::Number(1.0)]),
            Ok(Value::Dual(Dual::variable(2.0)))
        );
        assert!(matches!(
            construct(&[]),
            Err(EvaluationError::Arity { expected: 1, found: 0, .. })
        ));
        assert!(matches!(
            construct(&[Value::Bool(true)]),
            Err(EvaluationError::TypeError(_))
        ));
    }
}
