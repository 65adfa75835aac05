//! Compound assignment on [Dual], writing both components of the left operand in place.
//!
//! These impls back the `addAssign`, `subAssign`, `mulAssign` and `divAssign` members of the
//! dual namespace. Each computes the full binary operation from the *current* value of the
//! left operand before writing, so `x *= x` squares `x` with the product rule intact.

use crate::dual::dual::Dual;
use auto_ops::impl_op_ex;

impl_op_ex!(+= |a: &mut Dual, b: &Dual| { *a = *a + b; });
impl_op_ex!(-= |a: &mut Dual, b: &Dual| { *a = *a - b; });
impl_op_ex!(*= |a: &mut Dual, b: &Dual| { *a = *a * b; });
impl_op_ex!(/= |a: &mut Dual, b: &Dual| { *a = *a / b; });

impl_op_ex!(+= |a: &mut Dual, b: &f64| { a.real += b; });
impl_op_ex!(-= |a: &mut Dual, b: &f64| { a.real -= b; });
impl_op_ex!(*= |a: &mut Dual, b: &f64| { *a = *a * b; });
impl_op_ex!(/= |a: &mut Dual, b: &f64| { *a = *a / b; });
