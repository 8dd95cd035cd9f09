//! nf_tables expression encoding.
//!
//! Expressions are the building blocks of nf_tables rules. This module
//! encodes and decodes them in the attribute format the kernel expects;
//! assembling them into rules and talking to the kernel is left to the
//! caller.

pub mod expr;
pub mod reg;

pub use expr::{Dup, DupBuilder, Expr, ExprConfig, RawExpr};
