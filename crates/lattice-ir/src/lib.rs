// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Structured tensor-kernel IR and SSA construction.
//!
//! This crate models a small structured intermediate representation —
//! scalar variables, tensors, element indexing, opaque n-ary operators,
//! `if/else` and counted `for` loops — and an SSA construction pass over
//! it. Expressions live in an arena ([`ExprArena`]) and are referenced by
//! [`ExprId`]; statements form an owned tree.
//!
//! # Example
//!
//! ```
//! use lattice_ir::builder::*;
//! use lattice_ir::ssa::{transform_func, validate_ssa};
//! use lattice_ir::{Block, ConstValue, DType, ExprArena, Linkage};
//!
//! let mut arena = ExprArena::new();
//! let a = make_var(&mut arena, "a", DType::I32);
//! let one = make_constant(&mut arena, ConstValue::Int(1), DType::I32);
//! let body = Block::new(vec![
//!     make_define(a, Linkage::Local, None),
//!     make_assign(a, one),
//!     make_return(Some(a)),
//! ]);
//! let func = make_function("f", vec![], body, DType::I32);
//!
//! let ssa = transform_func(&mut arena, &func).unwrap();
//! assert!(validate_ssa(&arena, &ssa).is_ok());
//! ```

pub mod builder;
pub mod error;
pub mod expr;
pub mod print;
pub mod ssa;
pub mod stmt;
pub mod types;

pub use error::SsaError;
pub use expr::{attr, AttrValue, ExprArena, ExprId, ExprKind, ExprNode, SsaInfo};
pub use stmt::{Assign, Block, Define, ForLoop, Function, IfElse, Return, Stmt};
pub use types::{ConstValue, DType, ForKind, Linkage};
