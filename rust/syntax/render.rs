//! Source code generation from syntax trees.
//!
//! Parentheses are emitted only where operator precedence requires them, so that
//! `parse(&render(&tree))` reproduces `tree` for any tree the parser produces.

use crate::syntax::ast::{
    Declarator, DeclKind, Expr, Function, FunctionBody, Program, Stmt, UnaryOp,
};
use itertools::Itertools;

const INDENT: &str = "  ";

// binding power of non binary expression kinds, extending `BinaryOp::precedence`
const ASSIGN: u8 = 2;
const CONDITIONAL: u8 = 3;
const PREFIX: u8 = 15;
const POSTFIX: u8 = 16;
const FUNCTION: u8 = 17;
const MEMBER: u8 = 18;
const ATOM: u8 = 20;

/// Render a [Program] as source text, one statement per line.
///
/// # Examples
///
/// ```rust
/// # use dualrewrite::syntax::{parse, render};
/// let program = parse("(x=>x*(x+1))").unwrap();
/// assert_eq!(render(&program), "(x => x * (x + 1));\n");
/// ```
pub fn render(program: &Program) -> String {
    let mut r = Renderer::default();
    for stmt in program.body.iter() {
        r.stmt(stmt);
    }
    r.out
}

/// Render a single expression.
pub fn render_expr(expr: &Expr) -> String {
    let mut r = Renderer::default();
    r.expr(expr, ASSIGN);
    r.out
}

fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::Num(_) | Expr::Bool(_) | Expr::Name(_) => ATOM,
        Expr::Function(f) if f.arrow => ASSIGN,
        Expr::Function(_) => FUNCTION,
        Expr::Call(..) | Expr::Dot(..) => MEMBER,
        Expr::UnaryPostfix(..) => POSTFIX,
        Expr::UnaryPrefix(..) => PREFIX,
        Expr::Binary(op, ..) => op.precedence(),
        Expr::Conditional(..) => CONDITIONAL,
        Expr::Assign(..) => ASSIGN,
    }
}

/// Sign-like prefix operators, which must not be written adjacent to one another.
fn is_sign(op: &UnaryOp) -> bool {
    matches!(
        op,
        UnaryOp::Neg | UnaryOp::Plus | UnaryOp::Incr | UnaryOp::Decr
    )
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        "(0 / 0)".to_string()
    } else if n.is_infinite() {
        let text = if n > 0.0 { "(1 / 0)" } else { "(-1 / 0)" };
        text.to_string()
    } else if n.is_sign_negative() {
        format!("(-{})", -n)
    } else {
        format!("{}", n)
    }
}

#[derive(Default)]
struct Renderer {
    out: String,
    depth: usize,
}

impl Renderer {
    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
    }

    fn stmt(&mut self, stmt: &Stmt) {
        self.indent();
        self.stmt_inline(stmt);
        self.out.push('\n');
    }

    /// Write a statement without leading indentation or trailing newline.
    fn stmt_inline(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expr(e) => {
                let start = self.out.len();
                self.expr(e, ASSIGN);
                // a statement may not begin with the `function` keyword
                let written = &self.out[start..];
                if matches!(e, Expr::Function(_))
                    || written.starts_with("function ")
                    || written.starts_with("function(")
                {
                    self.out.insert(start, '(');
                    self.out.push(')');
                }
                self.out.push(';');
            }
            Stmt::Decl(kind, declarators) => {
                self.decl(kind, declarators);
                self.out.push(';');
            }
            Stmt::Block(body) => self.block(body),
            Stmt::If(test, consequent, alternate) => {
                self.out.push_str("if (");
                self.expr(test, ASSIGN);
                self.out.push_str(") ");
                match (consequent.as_ref(), alternate) {
                    // keep a trailing `else` bound to this `if`
                    (Stmt::If(_, _, None), Some(_)) => {
                        self.block(std::slice::from_ref(consequent.as_ref()))
                    }
                    _ => self.stmt_inline(consequent),
                }
                if let Some(alternate) = alternate {
                    self.out.push_str(" else ");
                    self.stmt_inline(alternate);
                }
            }
            Stmt::While(test, body) => {
                self.out.push_str("while (");
                self.expr(test, ASSIGN);
                self.out.push_str(") ");
                self.stmt_inline(body);
            }
            Stmt::For {
                init,
                test,
                update,
                body,
            } => {
                self.out.push_str("for (");
                match init.as_deref() {
                    Some(Stmt::Decl(kind, declarators)) => self.decl(kind, declarators),
                    Some(Stmt::Expr(e)) => self.expr(e, ASSIGN),
                    Some(other) => self.stmt_inline(other),
                    None => {}
                }
                self.out.push(';');
                if let Some(test) = test {
                    self.out.push(' ');
                    self.expr(test, ASSIGN);
                }
                self.out.push(';');
                if let Some(update) = update {
                    self.out.push(' ');
                    self.expr(update, ASSIGN);
                }
                self.out.push_str(") ");
                self.stmt_inline(body);
            }
            Stmt::Return(value) => {
                self.out.push_str("return");
                if let Some(value) = value {
                    self.out.push(' ');
                    self.expr(value, ASSIGN);
                }
                self.out.push(';');
            }
            Stmt::Break => self.out.push_str("break;"),
            Stmt::Continue => self.out.push_str("continue;"),
            Stmt::Empty => self.out.push(';'),
        }
    }

    fn decl(&mut self, kind: &DeclKind, declarators: &[Declarator]) {
        self.out.push_str(kind.keyword());
        self.out.push(' ');
        for (i, d) in declarators.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.out.push_str(&d.name);
            if let Some(init) = &d.init {
                self.out.push_str(" = ");
                self.expr(init, ASSIGN);
            }
        }
    }

    fn block(&mut self, body: &[Stmt]) {
        if body.is_empty() {
            self.out.push_str("{}");
            return;
        }
        self.out.push_str("{\n");
        self.depth += 1;
        for stmt in body {
            self.stmt(stmt);
        }
        self.depth -= 1;
        self.indent();
        self.out.push('}');
    }

    fn expr(&mut self, expr: &Expr, min_precedence: u8) {
        let wrap = precedence(expr) < min_precedence;
        if wrap {
            self.out.push('(');
        }
        match expr {
            Expr::Num(n) => self.out.push_str(&format_number(*n)),
            Expr::Bool(b) => self.out.push_str(if *b { "true" } else { "false" }),
            Expr::Name(name) => self.out.push_str(name),
            Expr::UnaryPrefix(op, operand) => {
                self.out.push_str(op.symbol());
                if let Expr::UnaryPrefix(inner, _) = operand.as_ref() {
                    if is_sign(op) && is_sign(inner) {
                        self.out.push(' ');
                    }
                }
                self.expr(operand, PREFIX);
            }
            Expr::UnaryPostfix(op, operand) => {
                self.expr(operand, MEMBER);
                self.out.push_str(op.symbol());
            }
            Expr::Binary(op, left, right) => {
                let p = op.precedence();
                let (left_min, right_min) = if op.is_right_assoc() {
                    (p + 1, p)
                } else {
                    (p, p + 1)
                };
                self.expr(left, left_min);
                self.out.push(' ');
                self.out.push_str(op.symbol());
                self.out.push(' ');
                self.expr(right, right_min);
            }
            Expr::Assign(op, target, value) => {
                self.expr(target, MEMBER);
                self.out.push(' ');
                self.out.push_str(op.symbol());
                self.out.push(' ');
                self.expr(value, ASSIGN);
            }
            Expr::Call(callee, args) => {
                self.expr(callee, MEMBER);
                self.out.push('(');
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.expr(arg, ASSIGN);
                }
                self.out.push(')');
            }
            Expr::Dot(object, property) => {
                match object.as_ref() {
                    Expr::Num(_) => {
                        self.out.push('(');
                        self.expr(object, ASSIGN);
                        self.out.push(')');
                    }
                    _ => self.expr(object, MEMBER),
                }
                self.out.push('.');
                self.out.push_str(property);
            }
            Expr::Conditional(test, consequent, alternate) => {
                self.expr(test, CONDITIONAL + 1);
                self.out.push_str(" ? ");
                self.expr(consequent, ASSIGN);
                self.out.push_str(" : ");
                self.expr(alternate, ASSIGN);
            }
            Expr::Function(f) => self.function(f),
        }
        if wrap {
            self.out.push(')');
        }
    }

    fn function(&mut self, f: &Function) {
        if f.arrow {
            match f.params.as_slice() {
                [single] => self.out.push_str(single),
                params => {
                    self.out.push('(');
                    self.out.push_str(&params.iter().join(", "));
                    self.out.push(')');
                }
            }
            self.out.push_str(" => ");
        } else {
            self.out.push_str("function ");
            if let Some(name) = &f.name {
                self.out.push_str(name);
            }
            self.out.push('(');
            self.out.push_str(&f.params.iter().join(", "));
            self.out.push_str(") ");
        }
        match &f.body {
            FunctionBody::Expr(e) => self.expr(e, ASSIGN),
            FunctionBody::Block(body) => self.block(body),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::ast::BinaryOp;
    use crate::syntax::parse;

    fn roundtrip(source: &str) -> String {
        let program = parse(source).unwrap();
        let rendered = render(&program);
        assert_eq!(parse(&rendered).unwrap(), program, "{}", rendered);
        rendered
    }

    #[test]
    fn minimal_parentheses() {
        assert_eq!(roundtrip("(a + b) * c - (d - e)"), "(a + b) * c - (d - e);\n");
        assert_eq!(roundtrip("a - (b + c)"), "a - (b + c);\n");
        assert_eq!(roundtrip("(a ** b) ** c"), "(a ** b) ** c;\n");
        assert_eq!(roundtrip("a ** (b ** c)"), "a ** b ** c;\n");
    }

    #[test]
    fn functions() {
        assert_eq!(roundtrip("(x => x * x)"), "(x => x * x);\n");
        assert_eq!(
            roundtrip("(function (x) { return x })"),
            "(function (x) {\n  return x;\n});\n"
        );
        assert_eq!(roundtrip("((a, b) => a)(1, 2)"), "((a, b) => a)(1, 2);\n");
        assert_eq!(roundtrip("f(x => x, () => 0)"), "f(x => x, () => 0);\n");
    }

    #[test]
    fn statements() {
        let source = "let y = x; for (let i = 0; i < 3; i++) { y *= x } if (y) y; else { y = -y }";
        assert_eq!(
            roundtrip(source),
            "let y = x;\nfor (let i = 0; i < 3; i++) {\n  y *= x;\n}\nif (y) y; else {\n  y = -y;\n}\n"
        );
        roundtrip("while (true) { if (x) break; else continue; }");
        roundtrip("for (;;) {}");
        roundtrip("return;");
    }

    #[test]
    fn adjacent_signs_are_separated() {
        assert_eq!(roundtrip("- -x"), "- -x;\n");
        assert_eq!(roundtrip("-(-x)"), "- -x;\n");
        assert_eq!(roundtrip("+ ++x"), "+ ++x;\n");
        assert_eq!(roundtrip("!-x"), "!-x;\n");
    }

    #[test]
    fn conditional_and_assignment() {
        roundtrip("a = b ? c : d = e");
        roundtrip("(a ? b : c) ? d : e");
        roundtrip("x = y = z");
        roundtrip("(a, b) => a || b && c");
    }

    #[test]
    fn dangling_else_stays_attached() {
        let tree = Program {
            body: vec![Stmt::If(
                Expr::name("a"),
                Box::new(Stmt::If(
                    Expr::name("b"),
                    Box::new(Stmt::Expr(Expr::name("c"))),
                    None,
                )),
                Some(Box::new(Stmt::Expr(Expr::name("d")))),
            )],
        };
        let rendered = render(&tree);
        let reparsed = parse(&rendered).unwrap();
        assert!(matches!(&reparsed.body[0], Stmt::If(_, _, Some(_))));
    }

    #[test]
    fn special_numbers() {
        let e = Expr::binary(BinaryOp::Mul, Expr::Num(-2.0), Expr::Num(f64::INFINITY));
        assert_eq!(render_expr(&e), "(-2) * (1 / 0)");
        assert_eq!(render_expr(&Expr::Num(0.5)), "0.5");
    }

    #[test]
    fn render_is_idempotent() {
        let once = roundtrip("x => { let y = Math.sin(x*x); y /= 2; return y ? y : -y }");
        assert_eq!(render(&parse(&once).unwrap()), once);
    }
}
