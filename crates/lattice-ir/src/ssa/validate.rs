//! SSA well-formedness checking.
//!
//! Validates the output of the construction pass:
//! - every local SSA variable has exactly one definition
//! - every non-φ use is dominated by its definition's scope
//! - φ operand counts match their join shape (one or two operands)
//! - module globals are never versioned
//!
//! φ operands are exempt from the dominance check: a loop-entry φ refers to
//! the body tip through the back edge, and an exit φ refers into the joined
//! branch blocks. For those, only existence of the definition is required.

use std::collections::{HashMap, HashSet};

use crate::expr::{ExprArena, ExprId, ExprKind};
use crate::stmt::{Block, Function, Stmt};

/// SSA validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SsaValidationError {
    /// A variable is defined more than once.
    MultipleDefinition { name: String },
    /// A use refers to a value that is not visible at that point.
    UndefinedUse { name: String },
    /// A φ node with an operand count no join shape produces.
    PhiArity { operands: usize },
    /// A module global received more than one definition.
    VersionedGlobal { name: String },
}

/// Validate a function in SSA form.
///
/// Returns `Ok(())` if the function is well-formed, or every violation
/// found.
pub fn validate_ssa(arena: &ExprArena, func: &Function) -> Result<(), Vec<SsaValidationError>> {
    let mut validator = Validator {
        arena,
        all_defs: HashSet::new(),
        scopes: Vec::new(),
        errors: Vec::new(),
    };

    validator.collect_defs(func);
    let param_seed: Vec<ExprId> = func.params.clone();
    validator.check_block(&func.body, param_seed);

    if validator.errors.is_empty() {
        Ok(())
    } else {
        Err(validator.errors)
    }
}

struct Validator<'a> {
    arena: &'a ExprArena,
    /// Every defined value in the function, order-insensitive.
    all_defs: HashSet<ExprId>,
    /// Values visible at the current point, one set per open block.
    scopes: Vec<HashSet<ExprId>>,
    errors: Vec<SsaValidationError>,
}

impl<'a> Validator<'a> {
    fn collect_defs(&mut self, func: &Function) {
        let mut global_defs: HashMap<String, usize> = HashMap::new();
        for &param in &func.params {
            self.record_def(param, &mut global_defs);
        }
        self.collect_block(&func.body, &mut global_defs);

        for (name, count) in global_defs {
            if count > 1 {
                self.errors
                    .push(SsaValidationError::VersionedGlobal { name });
            }
        }
    }

    fn collect_block(&mut self, block: &Block, global_defs: &mut HashMap<String, usize>) {
        for stmt in &block.stmts {
            match stmt {
                Stmt::Define(d) => self.record_def(d.var, global_defs),
                Stmt::For(f) => {
                    self.record_def(f.var, global_defs);
                    self.collect_block(&f.body, global_defs);
                }
                Stmt::If(s) => {
                    self.collect_block(&s.then_body, global_defs);
                    if let Some(else_body) = &s.else_body {
                        self.collect_block(else_body, global_defs);
                    }
                }
                Stmt::Block(b) => self.collect_block(b, global_defs),
                Stmt::Assign(_) | Stmt::Return(_) => {}
            }
        }
    }

    fn record_def(&mut self, var: ExprId, global_defs: &mut HashMap<String, usize>) {
        if !self.all_defs.insert(var) {
            self.errors.push(SsaValidationError::MultipleDefinition {
                name: self.name_of(var),
            });
        }
        if self.arena.is_ssa_global(var) {
            *global_defs.entry(self.name_of(var)).or_insert(0) += 1;
        }
    }

    fn check_block(&mut self, block: &Block, seed: Vec<ExprId>) {
        self.scopes.push(seed.into_iter().collect());
        for stmt in &block.stmts {
            match stmt {
                Stmt::Define(d) => {
                    if let Some(init) = d.init {
                        self.check_expr(init, false);
                    }
                    self.mark_visible(d.var);
                }
                Stmt::Assign(a) => {
                    self.check_expr(a.lhs, false);
                    self.check_expr(a.rhs, false);
                }
                Stmt::For(f) => {
                    self.check_expr(f.begin, false);
                    self.check_expr(f.end, false);
                    self.check_expr(f.step, false);
                    self.check_block(&f.body, vec![f.var]);
                }
                Stmt::If(s) => {
                    self.check_expr(s.cond, false);
                    self.check_block(&s.then_body, Vec::new());
                    if let Some(else_body) = &s.else_body {
                        self.check_block(else_body, Vec::new());
                    }
                }
                Stmt::Block(b) => self.check_block(b, Vec::new()),
                Stmt::Return(r) => {
                    if let Some(value) = r.value {
                        self.check_expr(value, false);
                    }
                }
            }
        }
        self.scopes.pop();
    }

    fn check_expr(&mut self, expr: ExprId, in_phi: bool) {
        match &self.arena.node(expr).kind {
            ExprKind::Var { .. } | ExprKind::Tensor { .. } => {
                let visible = self.visible(expr);
                let exists = visible || (in_phi && self.all_defs.contains(&expr));
                if !exists {
                    self.errors.push(SsaValidationError::UndefinedUse {
                        name: self.name_of(expr),
                    });
                }
            }
            ExprKind::Const { .. } => {}
            ExprKind::Index { base, indices } => {
                self.check_expr(*base, false);
                for idx in indices {
                    self.check_expr(*idx, false);
                }
            }
            ExprKind::Call { args, .. } => {
                for arg in args {
                    self.check_expr(*arg, false);
                }
            }
            ExprKind::Phi { operands } => {
                if operands.is_empty() || operands.len() > 2 {
                    self.errors.push(SsaValidationError::PhiArity {
                        operands: operands.len(),
                    });
                }
                for op in operands {
                    self.check_expr(*op, true);
                }
            }
        }
    }

    fn mark_visible(&mut self, var: ExprId) {
        self.scopes
            .last_mut()
            .expect("no open block")
            .insert(var);
    }

    fn visible(&self, var: ExprId) -> bool {
        self.scopes.iter().any(|s| s.contains(&var))
    }

    fn name_of(&self, var: ExprId) -> String {
        self.arena.name(var).unwrap_or("<unnamed>").to_string()
    }
}
