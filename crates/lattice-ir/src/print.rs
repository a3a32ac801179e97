//! Deterministic text rendering of IR.
//!
//! The printed form is stable across runs: node names, φ operand order and
//! statement order come out exactly as stored. The determinism tests
//! compare these strings byte for byte.

use crate::expr::{ExprArena, ExprId, ExprKind};
use crate::stmt::{Block, Function, Stmt};

/// Render a function.
pub fn print_function(arena: &ExprArena, func: &Function) -> String {
    let mut out = String::new();
    let params: Vec<_> = func
        .params
        .iter()
        .map(|p| format!("{}: {}", expr_str(arena, *p), decl_type(arena, *p)))
        .collect();
    out.push_str(&format!(
        "fn {}({}) -> {} {{\n",
        func.name,
        params.join(", "),
        func.ret_type
    ));
    print_block(arena, &func.body, 1, &mut out);
    out.push_str("}\n");
    out
}

/// Render a single statement.
pub fn print_stmt(arena: &ExprArena, stmt: &Stmt) -> String {
    let mut out = String::new();
    print_stmt_at(arena, stmt, 0, &mut out);
    out
}

fn print_block(arena: &ExprArena, block: &Block, depth: usize, out: &mut String) {
    for stmt in &block.stmts {
        print_stmt_at(arena, stmt, depth, out);
    }
}

fn print_stmt_at(arena: &ExprArena, stmt: &Stmt, depth: usize, out: &mut String) {
    let pad = "  ".repeat(depth);
    match stmt {
        Stmt::Define(d) => {
            out.push_str(&pad);
            out.push_str(&format!(
                "let {}: {}",
                expr_str(arena, d.var),
                decl_type(arena, d.var)
            ));
            if let Some(init) = d.init {
                out.push_str(&format!(" = {}", expr_str(arena, init)));
            }
            out.push('\n');
        }
        Stmt::Assign(a) => {
            out.push_str(&pad);
            out.push_str(&format!(
                "{} = {}\n",
                expr_str(arena, a.lhs),
                expr_str(arena, a.rhs)
            ));
        }
        Stmt::If(s) => {
            out.push_str(&pad);
            out.push_str(&format!("if {} {{\n", expr_str(arena, s.cond)));
            print_block(arena, &s.then_body, depth + 1, out);
            if let Some(else_body) = &s.else_body {
                out.push_str(&pad);
                out.push_str("} else {\n");
                print_block(arena, else_body, depth + 1, out);
            }
            out.push_str(&pad);
            out.push_str("}\n");
        }
        Stmt::For(f) => {
            out.push_str(&pad);
            out.push_str(&format!(
                "for {} in ({}, {}, {}) {} {{\n",
                expr_str(arena, f.var),
                expr_str(arena, f.begin),
                expr_str(arena, f.end),
                expr_str(arena, f.step),
                f.kind
            ));
            print_block(arena, &f.body, depth + 1, out);
            out.push_str(&pad);
            out.push_str("}\n");
        }
        Stmt::Block(b) => {
            out.push_str(&pad);
            out.push_str("{\n");
            print_block(arena, b, depth + 1, out);
            out.push_str(&pad);
            out.push_str("}\n");
        }
        Stmt::Return(r) => {
            out.push_str(&pad);
            match r.value {
                Some(v) => out.push_str(&format!("return {}\n", expr_str(arena, v))),
                None => out.push_str("return\n"),
            }
        }
    }
}

fn decl_type(arena: &ExprArena, id: ExprId) -> String {
    match &arena.node(id).kind {
        ExprKind::Tensor { .. } => format!("tensor<{}>", arena.node(id).dtype),
        _ => arena.node(id).dtype.to_string(),
    }
}

/// Render an expression tree.
pub fn expr_str(arena: &ExprArena, id: ExprId) -> String {
    match &arena.node(id).kind {
        ExprKind::Var { name } | ExprKind::Tensor { name } => name.clone(),
        ExprKind::Const { value } => value.to_string(),
        ExprKind::Index { base, indices } => {
            let idx: Vec<_> = indices.iter().map(|i| expr_str(arena, *i)).collect();
            format!("{}[{}]", expr_str(arena, *base), idx.join(", "))
        }
        ExprKind::Call { func, args } => {
            let args: Vec<_> = args.iter().map(|a| expr_str(arena, *a)).collect();
            format!("{}({})", func, args.join(", "))
        }
        ExprKind::Phi { operands } => {
            let ops: Vec<_> = operands.iter().map(|o| expr_str(arena, *o)).collect();
            format!("phi({})", ops.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{make_call, make_constant, make_define, make_tensor, make_var};
    use crate::types::{ConstValue, DType, Linkage};

    #[test]
    fn test_expr_rendering() {
        let mut arena = ExprArena::new();
        let a = make_var(&mut arena, "a", DType::I32);
        let one = make_constant(&mut arena, ConstValue::Int(1), DType::I32);
        let add = make_call(&mut arena, "add", vec![a, one], DType::I32);
        assert_eq!(expr_str(&arena, add), "add(a, 1)");
    }

    #[test]
    fn test_define_rendering() {
        let mut arena = ExprArena::new();
        let buf = make_tensor(&mut arena, "buf", DType::F32);
        let stmt = make_define(buf, Linkage::Local, None);
        assert_eq!(print_stmt(&arena, &stmt), "let buf: tensor<f32>\n");
    }
}
