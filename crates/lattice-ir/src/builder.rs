//! Node constructors.
//!
//! Thin helpers over [`ExprArena::alloc`] and the statement structs, so
//! callers (front ends, tests) build IR without spelling out node structs.

use crate::expr::{ExprArena, ExprId, ExprKind};
use crate::stmt::{Assign, Block, Define, ForLoop, Function, IfElse, Return, Stmt};
use crate::types::{ConstValue, DType, ForKind, Linkage};

pub fn make_var(arena: &mut ExprArena, name: &str, dtype: DType) -> ExprId {
    arena.alloc(
        ExprKind::Var {
            name: name.to_string(),
        },
        dtype,
    )
}

pub fn make_tensor(arena: &mut ExprArena, name: &str, elem: DType) -> ExprId {
    arena.alloc(
        ExprKind::Tensor {
            name: name.to_string(),
        },
        elem,
    )
}

pub fn make_constant(arena: &mut ExprArena, value: ConstValue, dtype: DType) -> ExprId {
    arena.alloc(ExprKind::Const { value }, dtype)
}

/// Element access; the node dtype is the base tensor's element dtype.
pub fn make_index(arena: &mut ExprArena, base: ExprId, indices: Vec<ExprId>) -> ExprId {
    let dtype = arena.node(base).dtype;
    arena.alloc(ExprKind::Index { base, indices }, dtype)
}

pub fn make_call(arena: &mut ExprArena, func: &str, args: Vec<ExprId>, dtype: DType) -> ExprId {
    arena.alloc(
        ExprKind::Call {
            func: func.to_string(),
            args,
        },
        dtype,
    )
}

/// A φ node over an ordered, non-empty operand list.
///
/// # Panics
///
/// Panics if `operands` is empty.
pub fn make_phi(arena: &mut ExprArena, operands: Vec<ExprId>) -> ExprId {
    assert!(!operands.is_empty(), "phi node needs at least one operand");
    let dtype = arena.node(operands[0]).dtype;
    arena.alloc(ExprKind::Phi { operands }, dtype)
}

pub fn make_define(var: ExprId, linkage: Linkage, init: Option<ExprId>) -> Stmt {
    Stmt::Define(Define { var, linkage, init })
}

pub fn make_assign(lhs: ExprId, rhs: ExprId) -> Stmt {
    Stmt::Assign(Assign { lhs, rhs })
}

pub fn make_if_else(cond: ExprId, then_body: Block, else_body: Option<Block>) -> Stmt {
    Stmt::If(IfElse {
        cond,
        then_body,
        else_body,
    })
}

#[allow(clippy::too_many_arguments)]
pub fn make_for_loop(
    var: ExprId,
    begin: ExprId,
    end: ExprId,
    step: ExprId,
    body: Block,
    incremental: bool,
    kind: ForKind,
) -> Stmt {
    Stmt::For(ForLoop {
        var,
        begin,
        end,
        step,
        body,
        kind,
        incremental,
    })
}

pub fn make_return(value: Option<ExprId>) -> Stmt {
    Stmt::Return(Return { value })
}

pub fn make_function(name: &str, params: Vec<ExprId>, body: Block, ret_type: DType) -> Function {
    Function {
        name: name.to_string(),
        params,
        body,
        ret_type,
    }
}
