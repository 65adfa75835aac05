//! Isolated evaluation of guest programs.
//!
//! A [Context] owns a fresh global scope seeded only with the bindings it is given, so
//! nothing leaks between evaluations. Rewritten programs are run with the dual namespace
//! bound under `AD` and the literal constructor bound under `Dual`.
//!
//! The in-place namespace members (`incr`, `decr` and the `*Assign` family) operate on the
//! variable binding named by their first argument rather than on a copy of its value, so
//! other variables holding the same number are not affected.

mod config;
mod interp;
mod scope;
mod value;

pub use crate::eval::config::EvalConfig;
pub use crate::eval::value::{Closure, Value};

use crate::error::{EvaluationError, Result};
use crate::eval::interp::Interpreter;
use crate::eval::scope::{declare, lookup, Env, Scope};
use crate::syntax::{parse, Program};
use log::debug;

/// A global scope in which guest programs are executed.
pub struct Context {
    globals: Env,
    config: EvalConfig,
}

impl Context {
    /// Create a context whose globals are exactly `bindings`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use dualrewrite::eval::{Context, Value};
    /// let mut context = Context::new([("x", Value::Number(2.0))]);
    /// let value = context.run("let y = x * 3; y + 1").unwrap();
    /// assert_eq!(value, Value::Number(7.0));
    /// ```
    pub fn new<I, K>(bindings: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        let globals = Scope::global();
        for (name, value) in bindings {
            declare(&globals, name.as_ref(), value, false);
        }
        Self {
            globals,
            config: EvalConfig::default(),
        }
    }

    pub fn with_config(mut self, config: EvalConfig) -> Self {
        self.config = config;
        self
    }

    /// Parse and execute source text, returning the value of its last expression statement.
    pub fn run(&mut self, source: &str) -> Result<Value> {
        let program = parse(source)?;
        Ok(self.exec(&program)?)
    }

    /// Execute a parsed program, returning the value of its last expression statement.
    pub fn exec(&mut self, program: &Program) -> std::result::Result<Value, EvaluationError> {
        debug!("executing program of {} statement(s)", program.body.len());
        let mut interpreter = Interpreter::new(self.globals.clone(), &self.config);
        interpreter.program(program)
    }

    /// Read a global binding.
    pub fn get(&self, name: &str) -> Option<Value> {
        lookup(&self.globals, name)
    }
}

/// Execute source text in a fresh context seeded with `bindings`.
pub fn run<I, K>(source: &str, bindings: I) -> Result<Value>
where
    I: IntoIterator<Item = (K, Value)>,
    K: AsRef<str>,
{
    Context::new(bindings).run(source)
}
