//! Toolset for forward mode automatic differentiation (AD).
//!
//! # AD Architecture
//!
//! The library is built around one numeric type, [Dual], which pairs a real value with its
//! first derivative with respect to a single independent variable. Mathematical operations
//! are defined on [Dual] through Rust operator overloading and the [MathFuncs] trait, so
//! Rust code written directly against the type is differentiated without any rewrite step.
//!
//! Guest programs are differentiated through the [namespace] of dual operations. The
//! rewrite engine replaces arithmetic in a program's syntax tree with calls into this
//! namespace, and the evaluator resolves those calls to the functions defined here.
//!

pub mod constants;
mod dual;
mod dual_ops;
#[cfg(feature = "python")]
pub(crate) mod dual_py;
pub mod namespace;

pub use crate::dual::dual::{Dual, MathFuncs};
pub use crate::dual::namespace::{member, Member, NAMESPACE};
