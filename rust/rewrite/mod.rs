//! Rewriting of guest programs into dual number programs.
//!
//! The driver walks a [Program] and rebuilds it bottom up. Where [RULES] has an entry for a
//! node its already rewritten children are wrapped in a call to the dual namespace, every
//! other node is rebuilt as is. Numeric literals become constant duals, `Dual(n)`, and the
//! `Math` namespace is rebound to the dual namespace so that library calls reach the dual
//! implementations.
//!
//! Rewriting an already rewritten tree would wrap every literal twice. [transform] accepts
//! only a plain [Program] and returns a [Rewritten], so the driver runs once per source tree.

pub mod rules;

pub use crate::rewrite::rules::{
    RuleTable, DUAL_CONSTRUCTOR, DUAL_NAMESPACE, MATH_NAMESPACE, RULES,
};

use crate::syntax::{
    render, Declarator, Expr, Function, FunctionBody, Program, Stmt,
};
use log::{debug, trace};
use serde::Serialize;

/// A program whose arithmetic has been rewritten onto dual numbers.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Rewritten(Program);

impl Rewritten {
    pub fn program(&self) -> &Program {
        &self.0
    }

    pub fn into_program(self) -> Program {
        self.0
    }

    /// Render the rewritten program as source text.
    pub fn render(&self) -> String {
        render(&self.0)
    }
}

/// Rewrite every statement of a program with the process-wide rule table.
///
/// # Examples
///
/// ```rust
/// # use dualrewrite::syntax::parse;
/// # use dualrewrite::rewrite::transform;
/// let program = parse("(x => 2 * Math.sin(x))").unwrap();
/// let rewritten = transform(&program);
/// assert_eq!(rewritten.render(), "(x => AD.mul(Dual(2), AD.sin(x)));\n");
/// ```
pub fn transform(program: &Program) -> Rewritten {
    transform_with(program, &RULES)
}

/// Rewrite a program with the given rule table.
pub fn transform_with(program: &Program, rules: &RuleTable) -> Rewritten {
    debug!("rewriting program of {} statement(s)", program.body.len());
    let driver = Driver { rules };
    Rewritten(Program {
        body: driver.stmts(&program.body),
    })
}

fn namespace_call(member: &'static str, args: Vec<Expr>) -> Expr {
    trace!("rewriting to {}.{}", DUAL_NAMESPACE, member);
    Expr::call(Expr::dot(Expr::name(DUAL_NAMESPACE), member), args)
}

struct Driver<'a> {
    rules: &'a RuleTable,
}

impl Driver<'_> {
    fn boxed(&self, expr: &Expr) -> Box<Expr> {
        Box::new(self.expr(expr))
    }

    fn expr(&self, expr: &Expr) -> Expr {
        match expr {
            Expr::Num(n) => Expr::call(Expr::name(DUAL_CONSTRUCTOR), vec![Expr::Num(*n)]),
            Expr::Bool(b) => Expr::Bool(*b),
            Expr::Name(name) => match self.rules.rename(name) {
                Some(renamed) => {
                    trace!("rebinding `{}` to `{}`", name, renamed);
                    Expr::name(renamed)
                }
                None => Expr::Name(name.clone()),
            },
            Expr::UnaryPrefix(op, operand) => match self.rules.unary(op) {
                Some(member) => namespace_call(member, vec![self.expr(operand)]),
                None => Expr::UnaryPrefix(*op, self.boxed(operand)),
            },
            Expr::UnaryPostfix(op, operand) => match self.rules.unary(op) {
                Some(member) => namespace_call(member, vec![self.expr(operand)]),
                None => Expr::UnaryPostfix(*op, self.boxed(operand)),
            },
            Expr::Binary(op, left, right) => match self.rules.binary(op) {
                Some(member) => namespace_call(member, vec![self.expr(left), self.expr(right)]),
                None => Expr::Binary(*op, self.boxed(left), self.boxed(right)),
            },
            Expr::Assign(op, target, value) => match self.rules.assign(op) {
                Some(member) => namespace_call(member, vec![self.expr(target), self.expr(value)]),
                None => Expr::Assign(*op, self.boxed(target), self.boxed(value)),
            },
            Expr::Call(callee, args) => {
                Expr::Call(self.boxed(callee), args.iter().map(|a| self.expr(a)).collect())
            }
            Expr::Dot(object, property) => Expr::Dot(self.boxed(object), property.clone()),
            Expr::Conditional(test, consequent, alternate) => Expr::Conditional(
                self.boxed(test),
                self.boxed(consequent),
                self.boxed(alternate),
            ),
            Expr::Function(f) => Expr::Function(self.function(f)),
        }
    }

    fn function(&self, f: &Function) -> Function {
        let body = match &f.body {
            FunctionBody::Expr(e) => FunctionBody::Expr(self.boxed(e)),
            FunctionBody::Block(body) => FunctionBody::Block(self.stmts(body)),
        };
        Function {
            arrow: f.arrow,
            name: f.name.clone(),
            params: f.params.clone(),
            body,
        }
    }

    fn stmts(&self, stmts: &[Stmt]) -> Vec<Stmt> {
        stmts.iter().map(|s| self.stmt(s)).collect()
    }

    fn stmt(&self, stmt: &Stmt) -> Stmt {
        match stmt {
            Stmt::Expr(e) => Stmt::Expr(self.expr(e)),
            Stmt::Decl(kind, declarators) => Stmt::Decl(
                *kind,
                declarators
                    .iter()
                    .map(|d| Declarator {
                        name: d.name.clone(),
                        init: d.init.as_ref().map(|e| self.expr(e)),
                    })
                    .collect(),
            ),
            Stmt::Block(body) => Stmt::Block(self.stmts(body)),
            Stmt::If(test, consequent, alternate) => Stmt::If(
                self.expr(test),
                Box::new(self.stmt(consequent)),
                alternate.as_ref().map(|s| Box::new(self.stmt(s))),
            ),
            Stmt::While(test, body) => Stmt::While(self.expr(test), Box::new(self.stmt(body))),
            Stmt::For {
                init,
                test,
                update,
                body,
            } => Stmt::For {
                init: init.as_ref().map(|s| Box::new(self.stmt(s))),
                test: test.as_ref().map(|e| self.expr(e)),
                update: update.as_ref().map(|e| self.expr(e)),
                body: Box::new(self.stmt(body)),
            },
            Stmt::Return(value) => Stmt::Return(value.as_ref().map(|e| self.expr(e))),
            Stmt::Break => Stmt::Break,
            Stmt::Continue => Stmt::Continue,
            Stmt::Empty => Stmt::Empty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parse;

    fn rewrite(source: &str) -> String {
        transform(&parse(source).unwrap()).render()
    }

    #[test]
    fn literals_are_wrapped_once() {
        assert_eq!(rewrite("1.5"), "Dual(1.5);\n");
        assert_eq!(rewrite("f(2, 3)"), "f(Dual(2), Dual(3));\n");
    }

    #[test]
    fn arithmetic() {
        assert_eq!(rewrite("(x => x * x)"), "(x => AD.mul(x, x));\n");
        assert_eq!(
            rewrite("(x => 1 / x - x)"),
            "(x => AD.sub(AD.div(Dual(1), x), x));\n"
        );
        assert_eq!(rewrite("-x"), "AD.neg(x);\n");
    }

    #[test]
    fn comparisons() {
        assert_eq!(rewrite("a < b"), "AD.lt(a, b);\n");
        assert_eq!(rewrite("a >= b"), "AD.gte(a, b);\n");
        assert_eq!(rewrite("a == b"), "AD.eq(a, b);\n");
        assert_eq!(rewrite("a === b"), "AD.eq(a, b);\n");
    }

    #[test]
    fn compound_assignment_and_steps() {
        assert_eq!(rewrite("y *= x"), "AD.mulAssign(y, x);\n");
        assert_eq!(rewrite("y -= 1"), "AD.subAssign(y, Dual(1));\n");
        assert_eq!(rewrite("i++"), "AD.incr(i);\n");
        assert_eq!(rewrite("--i"), "AD.decr(i);\n");
        assert_eq!(rewrite("y = x"), "y = x;\n");
    }

    #[test]
    fn math_is_rebound() {
        assert_eq!(rewrite("Math.sin(x)"), "AD.sin(x);\n");
        assert_eq!(rewrite("Math.PI * x"), "AD.mul(AD.PI, x);\n");
        // only identifiers are rebound, not property or parameter names
        assert_eq!(rewrite("o.Math"), "o.Math;\n");
        assert_eq!(rewrite("(Math => 0)"), "(Math => Dual(0));\n");
    }

    #[test]
    fn unlisted_operators_pass_through() {
        assert_eq!(rewrite("x % 2"), "x % Dual(2);\n");
        assert_eq!(rewrite("x ** 2"), "x ** Dual(2);\n");
        assert_eq!(rewrite("a != b"), "a != b;\n");
        assert_eq!(rewrite("!a"), "!a;\n");
        assert_eq!(rewrite("y %= x"), "y %= x;\n");
    }

    #[test]
    fn statements_pass_through() {
        assert_eq!(
            rewrite("x => { let y = x; if (y > 0) { y += 1 } return y }"),
            "(x => {\n  let y = x;\n  if (AD.gt(y, Dual(0))) {\n    AD.addAssign(y, Dual(1));\n  }\n  return y;\n});\n"
        );
        assert_eq!(
            rewrite("for (let i = 0; i < n; i++) s"),
            "for (let i = Dual(0); AD.lt(i, n); AD.incr(i)) s;\n"
        );
    }

    #[test]
    fn untouched_structure_renders_identically() {
        for source in [
            "f(a, b.c);\n",
            "(function g(a) {\n  return a ? b : c;\n});\n",
            "while (a && b) {\n  break;\n}\n",
            "let a, b = c;\n",
        ] {
            assert_eq!(rewrite(source), source);
        }
    }

    #[test]
    fn original_tree_is_unchanged() {
        let program = parse("x * 2").unwrap();
        let before = program.clone();
        let rewritten = transform(&program);
        assert_eq!(program, before);
        assert_ne!(rewritten.program(), &program);
        assert_eq!(rewritten.into_program().body.len(), 1);
    }
}
