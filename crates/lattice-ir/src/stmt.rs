//! Statement tree and functions.
//!
//! Statements own their children as a tree; expressions are referenced by
//! [`ExprId`] into the shared arena. The control-flow repertoire is
//! structured only: straight-line sequences, `if/else`, and counted
//! `for`-loops. The scope tree of this shape is the dominance tree of the
//! reducible CFG it describes, which is what lets the SSA pass work without
//! a dominator analysis.

use crate::expr::ExprId;
use crate::types::{DType, ForKind, Linkage};

/// Introduce a variable or tensor, optionally with an initial value.
#[derive(Debug, Clone)]
pub struct Define {
    pub var: ExprId,
    pub linkage: Linkage,
    pub init: Option<ExprId>,
}

/// Store `rhs` into `lhs` (a variable or an indexed tensor element).
#[derive(Debug, Clone)]
pub struct Assign {
    pub lhs: ExprId,
    pub rhs: ExprId,
}

/// Two-way conditional; the else branch is optional.
#[derive(Debug, Clone)]
pub struct IfElse {
    pub cond: ExprId,
    pub then_body: Block,
    pub else_body: Option<Block>,
}

/// Counted loop over `begin..end` advancing by `step`.
#[derive(Debug, Clone)]
pub struct ForLoop {
    pub var: ExprId,
    pub begin: ExprId,
    pub end: ExprId,
    pub step: ExprId,
    pub body: Block,
    pub kind: ForKind,
    /// The induction variable strictly increases.
    pub incremental: bool,
}

/// Return from the enclosing function.
#[derive(Debug, Clone)]
pub struct Return {
    pub value: Option<ExprId>,
}

/// A statement sequence.
#[derive(Debug, Clone, Default)]
pub struct Block {
    pub stmts: Vec<Stmt>,
}

impl Block {
    pub fn new(stmts: Vec<Stmt>) -> Self {
        Self { stmts }
    }
}

/// Statement variants.
#[derive(Debug, Clone)]
pub enum Stmt {
    Define(Define),
    Assign(Assign),
    If(IfElse),
    For(ForLoop),
    Block(Block),
    Return(Return),
}

/// A function: named parameters, a body block, and a return type.
#[derive(Debug, Clone)]
pub struct Function {
    pub name: String,
    pub params: Vec<ExprId>,
    pub body: Block,
    pub ret_type: DType,
}
