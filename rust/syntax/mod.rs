//! Syntax of the guest language: a small JavaScript subset covering numeric expressions,
//! functions, local bindings and structured control flow.
//!
//! Source text is tokenized by [lexer], parsed into the tree of [ast] by [parser] and
//! turned back into text by [render].

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod render;

pub use crate::syntax::ast::{
    AssignOp, BinaryOp, DeclKind, Declarator, Expr, Function, FunctionBody, Program, Stmt,
    UnaryOp,
};
pub use crate::syntax::parser::{parse, MAX_NESTING};
pub use crate::syntax::render::{render, render_expr};
