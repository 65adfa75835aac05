//! Recursive descent parser for the guest language.
//!
//! Expressions are parsed by precedence climbing over [BinaryOp::precedence]. Semicolons are
//! optional statement terminators.
//!
//! The height of the tree is capped at [MAX_NESTING]. Deeper input is rejected with
//! [ParseError::TooDeep] instead of exhausting the stack here or in the passes that walk the
//! tree afterwards.

use crate::error::ParseError;
use crate::syntax::ast::{
    AssignOp, BinaryOp, DeclKind, Declarator, Expr, Function, FunctionBody, Program, Stmt,
    UnaryOp,
};
use crate::syntax::lexer::{lex, Token};
use logos::Span;

type Result<T> = std::result::Result<T, ParseError>;

/// Maximum nesting of parentheses, prefix operators, operator chains, statements and function
/// bodies.
pub const MAX_NESTING: usize = 128;

/// Parse source text into a [Program].
///
/// # Examples
///
/// ```rust
/// # use dualrewrite::syntax::{parse, Expr, Stmt};
/// let program = parse("(x => x * x)").unwrap();
/// assert!(matches!(program.body[0], Stmt::Expr(Expr::Function(_))));
/// ```
pub fn parse(source: &str) -> Result<Program> {
    let tokens = lex(source)?;
    Parser {
        tokens,
        pos: 0,
        depth: 0,
    }
    .program()
}

struct Parser {
    tokens: Vec<(Token, Span)>,
    pos: usize,
    depth: usize,
}

fn binary_op(token: &Token) -> Option<BinaryOp> {
    let op = match token {
        Token::Plus => BinaryOp::Add,
        Token::Minus => BinaryOp::Sub,
        Token::Star => BinaryOp::Mul,
        Token::Slash => BinaryOp::Div,
        Token::Percent => BinaryOp::Rem,
        Token::StarStar => BinaryOp::Pow,
        Token::Lt => BinaryOp::Lt,
        Token::Le => BinaryOp::Le,
        Token::Gt => BinaryOp::Gt,
        Token::Ge => BinaryOp::Ge,
        Token::EqEq => BinaryOp::Eq,
        Token::EqEqEq => BinaryOp::StrictEq,
        Token::NotEq => BinaryOp::Ne,
        Token::NotEqEq => BinaryOp::StrictNe,
        Token::AndAnd => BinaryOp::And,
        Token::OrOr => BinaryOp::Or,
        Token::Amp => BinaryOp::BitAnd,
        Token::Pipe => BinaryOp::BitOr,
        Token::Caret => BinaryOp::BitXor,
        Token::Shl => BinaryOp::Shl,
        Token::Shr => BinaryOp::Shr,
        Token::UShr => BinaryOp::UShr,
        _ => return None,
    };
    Some(op)
}

fn assign_op(token: &Token) -> Option<AssignOp> {
    let op = match token {
        Token::Assign => AssignOp::Assign,
        Token::PlusAssign => AssignOp::Add,
        Token::MinusAssign => AssignOp::Sub,
        Token::StarAssign => AssignOp::Mul,
        Token::SlashAssign => AssignOp::Div,
        Token::PercentAssign => AssignOp::Rem,
        Token::StarStarAssign => AssignOp::Pow,
        Token::AmpAssign => AssignOp::BitAnd,
        Token::PipeAssign => AssignOp::BitOr,
        Token::CaretAssign => AssignOp::BitXor,
        Token::ShlAssign => AssignOp::Shl,
        Token::ShrAssign => AssignOp::Shr,
        _ => return None,
    };
    Some(op)
}

fn prefix_op(token: &Token) -> Option<UnaryOp> {
    let op = match token {
        Token::Minus => UnaryOp::Neg,
        Token::Plus => UnaryOp::Plus,
        Token::Bang => UnaryOp::Not,
        Token::Tilde => UnaryOp::BitNot,
        Token::PlusPlus => UnaryOp::Incr,
        Token::MinusMinus => UnaryOp::Decr,
        _ => return None,
    };
    Some(op)
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.peek_at(0)
    }

    fn peek_at(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.pos + n).map(|(t, _)| t)
    }

    /// Byte offset of the current token, or of the end of input.
    fn offset(&self) -> usize {
        match self.tokens.get(self.pos) {
            Some((_, span)) => span.start,
            None => self.tokens.last().map_or(0, |(_, span)| span.end),
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &Token, expected: &str) -> Result<()> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        match self.tokens.get(self.pos) {
            Some((token, span)) => ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: token.to_string(),
                offset: span.start,
            },
            None => ParseError::UnexpectedEnd {
                expected: expected.to_string(),
            },
        }
    }

    /// Count one level of nesting, failing past [MAX_NESTING].
    fn descend(&mut self) -> Result<()> {
        if self.depth >= MAX_NESTING {
            return Err(ParseError::TooDeep {
                offset: self.offset(),
            });
        }
        self.depth += 1;
        Ok(())
    }

    /// Run `f` one level deeper.
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.descend()?;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn identifier(&mut self, expected: &str) -> Result<String> {
        match self.tokens.get(self.pos) {
            Some((Token::Ident(name), _)) => {
                let name = name.clone();
                self.pos += 1;
                Ok(name)
            }
            _ => Err(self.unexpected(expected)),
        }
    }

    fn program(mut self) -> Result<Program> {
        let mut body = Vec::new();
        while !self.at_end() {
            body.push(self.statement()?);
        }
        Ok(Program { body })
    }

    // STATEMENTS

    fn statement(&mut self) -> Result<Stmt> {
        self.nested(Self::statement_inner)
    }

    fn statement_inner(&mut self) -> Result<Stmt> {
        let stmt = match self.peek() {
            Some(Token::LBrace) => {
                self.pos += 1;
                return Ok(Stmt::Block(self.block_body()?));
            }
            Some(Token::Let) => self.declaration(DeclKind::Let)?,
            Some(Token::Const) => self.declaration(DeclKind::Const)?,
            Some(Token::Var) => self.declaration(DeclKind::Var)?,
            Some(Token::If) => return self.if_statement(),
            Some(Token::While) => {
                self.pos += 1;
                let test = self.parenthesized()?;
                let body = self.statement()?;
                return Ok(Stmt::While(test, Box::new(body)));
            }
            Some(Token::For) => return self.for_statement(),
            Some(Token::Return) => {
                self.pos += 1;
                match self.peek() {
                    None | Some(Token::Semi) | Some(Token::RBrace) => Stmt::Return(None),
                    Some(_) => Stmt::Return(Some(self.expression()?)),
                }
            }
            Some(Token::Break) => {
                self.pos += 1;
                Stmt::Break
            }
            Some(Token::Continue) => {
                self.pos += 1;
                Stmt::Continue
            }
            Some(Token::Semi) => Stmt::Empty,
            _ => Stmt::Expr(self.expression()?),
        };
        self.eat(&Token::Semi);
        Ok(stmt)
    }

    /// Statements up to and including the closing `}`; the opening `{` is already consumed.
    fn block_body(&mut self) -> Result<Vec<Stmt>> {
        let mut body = Vec::new();
        loop {
            match self.peek() {
                Some(Token::RBrace) => {
                    self.pos += 1;
                    return Ok(body);
                }
                None => return Err(self.unexpected("`}`")),
                Some(_) => body.push(self.statement()?),
            }
        }
    }

    fn declaration(&mut self, kind: DeclKind) -> Result<Stmt> {
        self.pos += 1;
        let mut declarators = Vec::new();
        loop {
            let name = self.identifier("a variable name")?;
            let init = if self.eat(&Token::Assign) {
                Some(self.assignment()?)
            } else {
                None
            };
            declarators.push(Declarator { name, init });
            if !self.eat(&Token::Comma) {
                return Ok(Stmt::Decl(kind, declarators));
            }
        }
    }

    fn parenthesized(&mut self) -> Result<Expr> {
        self.expect(&Token::LParen, "`(`")?;
        let expr = self.expression()?;
        self.expect(&Token::RParen, "`)`")?;
        Ok(expr)
    }

    fn if_statement(&mut self) -> Result<Stmt> {
        self.pos += 1;
        let test = self.parenthesized()?;
        let consequent = self.statement()?;
        let alternate = if self.eat(&Token::Else) {
            Some(Box::new(self.statement()?))
        } else {
            None
        };
        Ok(Stmt::If(test, Box::new(consequent), alternate))
    }

    fn for_statement(&mut self) -> Result<Stmt> {
        self.pos += 1;
        self.expect(&Token::LParen, "`(`")?;
        let init = match self.peek() {
            Some(Token::Semi) => None,
            Some(Token::Let) => Some(Box::new(self.declaration(DeclKind::Let)?)),
            Some(Token::Const) => Some(Box::new(self.declaration(DeclKind::Const)?)),
            Some(Token::Var) => Some(Box::new(self.declaration(DeclKind::Var)?)),
            _ => Some(Box::new(Stmt::Expr(self.expression()?))),
        };
        self.expect(&Token::Semi, "`;`")?;
        let test = match self.peek() {
            Some(Token::Semi) => None,
            _ => Some(self.expression()?),
        };
        self.expect(&Token::Semi, "`;`")?;
        let update = match self.peek() {
            Some(Token::RParen) => None,
            _ => Some(self.expression()?),
        };
        self.expect(&Token::RParen, "`)`")?;
        let body = Box::new(self.statement()?);
        Ok(Stmt::For {
            init,
            test,
            update,
            body,
        })
    }

    // EXPRESSIONS

    fn expression(&mut self) -> Result<Expr> {
        self.assignment()
    }

    fn assignment(&mut self) -> Result<Expr> {
        if self.at_arrow() {
            return self.arrow_function();
        }
        let start = self.offset();
        let left = self.conditional()?;
        let Some(op) = self.peek().and_then(assign_op) else {
            return Ok(left);
        };
        if !left.is_target() {
            return Err(ParseError::InvalidTarget { offset: start });
        }
        self.pos += 1;
        let right = self.nested(Self::assignment)?;
        Ok(Expr::Assign(op, Box::new(left), Box::new(right)))
    }

    /// Look ahead for `x =>` or `(a, b) =>`.
    fn at_arrow(&self) -> bool {
        match self.peek() {
            Some(Token::Ident(_)) => matches!(self.peek_at(1), Some(Token::Arrow)),
            Some(Token::LParen) => {
                let mut i = 1;
                if matches!(self.peek_at(i), Some(Token::RParen)) {
                    return matches!(self.peek_at(i + 1), Some(Token::Arrow));
                }
                loop {
                    if !matches!(self.peek_at(i), Some(Token::Ident(_))) {
                        return false;
                    }
                    i += 1;
                    match self.peek_at(i) {
                        Some(Token::Comma) => i += 1,
                        Some(Token::RParen) => {
                            return matches!(self.peek_at(i + 1), Some(Token::Arrow))
                        }
                        _ => return false,
                    }
                }
            }
            _ => false,
        }
    }

    fn arrow_function(&mut self) -> Result<Expr> {
        let params = if self.eat(&Token::LParen) {
            self.params()?
        } else {
            vec![self.identifier("a parameter name")?]
        };
        self.expect(&Token::Arrow, "`=>`")?;
        let body = self.nested(|p| {
            Ok(if p.eat(&Token::LBrace) {
                FunctionBody::Block(p.block_body()?)
            } else {
                FunctionBody::Expr(Box::new(p.assignment()?))
            })
        })?;
        Ok(Expr::Function(Function {
            arrow: true,
            name: None,
            params,
            body,
        }))
    }

    /// Parameter names up to and including the closing `)`.
    fn params(&mut self) -> Result<Vec<String>> {
        let mut params = Vec::new();
        if self.eat(&Token::RParen) {
            return Ok(params);
        }
        loop {
            params.push(self.identifier("a parameter name")?);
            if !self.eat(&Token::Comma) {
                self.expect(&Token::RParen, "`)`")?;
                return Ok(params);
            }
        }
    }

    /// `function name?(params) { body }`; the `function` keyword is already consumed.
    fn function_expression(&mut self) -> Result<Expr> {
        let name = match self.peek() {
            Some(Token::Ident(_)) => Some(self.identifier("a function name")?),
            _ => None,
        };
        self.expect(&Token::LParen, "`(`")?;
        let params = self.params()?;
        self.expect(&Token::LBrace, "`{`")?;
        let body = FunctionBody::Block(self.nested(Self::block_body)?);
        Ok(Expr::Function(Function {
            arrow: false,
            name,
            params,
            body,
        }))
    }

    fn conditional(&mut self) -> Result<Expr> {
        let test = self.binary(BinaryOp::Or.precedence())?;
        if !self.eat(&Token::Question) {
            return Ok(test);
        }
        let consequent = self.nested(Self::assignment)?;
        self.expect(&Token::Colon, "`:`")?;
        let alternate = self.nested(Self::assignment)?;
        Ok(Expr::Conditional(
            Box::new(test),
            Box::new(consequent),
            Box::new(alternate),
        ))
    }

    fn binary(&mut self, min_precedence: u8) -> Result<Expr> {
        let depth = self.depth;
        let result = self.operator_chain(min_precedence);
        self.depth = depth;
        result
    }

    /// Each operator folded into a chain adds a level to the tree above its operands.
    fn operator_chain(&mut self, min_precedence: u8) -> Result<Expr> {
        let mut left = self.unary()?;
        while let Some(op) = self.peek().and_then(binary_op) {
            if op.precedence() < min_precedence {
                break;
            }
            self.descend()?;
            self.pos += 1;
            let next = if op.is_right_assoc() {
                op.precedence()
            } else {
                op.precedence() + 1
            };
            let right = self.binary(next)?;
            left = Expr::binary(op, left, right);
        }
        Ok(left)
    }

    fn unary(&mut self) -> Result<Expr> {
        let Some(op) = self.peek().and_then(prefix_op) else {
            return self.postfix();
        };
        let start = self.offset();
        self.pos += 1;
        let operand = self.nested(Self::unary)?;
        if matches!(op, UnaryOp::Incr | UnaryOp::Decr) && !operand.is_target() {
            return Err(ParseError::InvalidTarget { offset: start });
        }
        Ok(Expr::UnaryPrefix(op, Box::new(operand)))
    }

    fn postfix(&mut self) -> Result<Expr> {
        let start = self.offset();
        let expr = self.call_member()?;
        let op = match self.peek() {
            Some(Token::PlusPlus) => UnaryOp::Incr,
            Some(Token::MinusMinus) => UnaryOp::Decr,
            _ => return Ok(expr),
        };
        if !expr.is_target() {
            return Err(ParseError::InvalidTarget { offset: start });
        }
        self.pos += 1;
        Ok(Expr::UnaryPostfix(op, Box::new(expr)))
    }

    fn call_member(&mut self) -> Result<Expr> {
        let depth = self.depth;
        let result = self.member_chain();
        self.depth = depth;
        result
    }

    /// Calls and member accesses fold left like an operator chain. A member access directly
    /// on a name, as in `AD.add(..)`, is not counted.
    fn member_chain(&mut self) -> Result<Expr> {
        let mut expr = self.primary()?;
        loop {
            match self.peek() {
                Some(Token::Dot) if matches!(expr, Expr::Name(_)) => {}
                Some(Token::Dot | Token::LParen) => self.descend()?,
                _ => {}
            }
            if self.eat(&Token::Dot) {
                let property = self.identifier("a property name")?;
                expr = Expr::Dot(Box::new(expr), property);
            } else if self.eat(&Token::LParen) {
                let args = self.arguments()?;
                expr = Expr::Call(Box::new(expr), args);
            } else {
                return Ok(expr);
            }
        }
    }

    /// Call arguments up to and including the closing `)`.
    fn arguments(&mut self) -> Result<Vec<Expr>> {
        let mut args = Vec::new();
        if self.eat(&Token::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.assignment()?);
            if !self.eat(&Token::Comma) {
                self.expect(&Token::RParen, "`)`")?;
                return Ok(args);
            }
        }
    }

    fn primary(&mut self) -> Result<Expr> {
        let Some((token, _)) = self.tokens.get(self.pos).cloned() else {
            return Err(self.unexpected("an expression"));
        };
        let expr = match token {
            Token::Number(n) => Expr::Num(n),
            Token::True => Expr::Bool(true),
            Token::False => Expr::Bool(false),
            Token::Ident(name) => Expr::Name(name),
            Token::LParen => {
                self.pos += 1;
                let expr = self.nested(Self::expression)?;
                self.expect(&Token::RParen, "`)`")?;
                return Ok(expr);
            }
            Token::Function => {
                self.pos += 1;
                return self.function_expression();
            }
            _ => return Err(self.unexpected("an expression")),
        };
        self.pos += 1;
        Ok(expr)
    }
}
