//! SSA construction over the structured statement tree.
//!
//! The rewriter walks a function in pre-order under a stack of scopes, one
//! per structured region (function body, for-loop body, if/else branch).
//! Each scope maps source variables to their current SSA value. Compound
//! expressions are flattened into fresh temporaries; control-flow joins
//! (end of an `if`, end of a `for` body) synthesize φ definitions merging
//! the branch tips.
//!
//! Two φ patterns exist around loops:
//! - **loop-entry φ**: inserted lazily on the first read inside a loop of a
//!   value defined outside it, with the outside value as its single
//!   operand. When the loop scope is popped, a back-edge operand (the body
//!   tip) is appended iff the variable was actually written in the body.
//! - **exit φ**: emitted after the loop, merging the pre-loop value and the
//!   body tip for the enclosing scope. A variable that was only read in
//!   the body keeps its loop-entry φ at one operand and gets no exit φ.
//!
//! Module-global variables are never versioned: reads emit an explicit
//! load definition of the global's canonical value and writes stay
//! explicit assignments.

use std::collections::BTreeMap;
use std::mem;

use crate::builder::{make_constant, make_phi, make_var};
use crate::error::SsaError;
use crate::expr::{attr, ExprArena, ExprId, ExprKind};
use crate::stmt::{Assign, Block, Define, ForLoop, Function, IfElse, Return, Stmt};
use crate::types::{ConstValue, Linkage};

/// Rewrite a function into SSA form.
///
/// Parameters become SSA roots (`is_param` metadata); the body is rewritten
/// under a fresh scope stack. On error the partially rewritten arena nodes
/// are simply unreferenced; the input function is untouched.
pub fn transform_func(arena: &mut ExprArena, func: &Function) -> Result<Function, SsaError> {
    tracing::trace!(function = %func.name, "building ssa form");
    let mut rw = SsaRewriter::new(arena);
    rw.push_scope(ScopeKind::Normal);
    let mut new_params = Vec::with_capacity(func.params.len());
    for &param in &func.params {
        let key = var_key(rw.arena, param)?;
        let new_param = rw.arena.remake(param);
        rw.arena.init_ssa(new_param).is_param = true;
        rw.insert_local_var(key, param, Some(new_param));
        new_params.push(new_param);
    }
    let body = rw.rewrite_block(&func.body)?;
    rw.pop_scope();
    Ok(Function {
        name: func.name.clone(),
        params: new_params,
        body,
        ret_type: func.ret_type,
    })
}

/// Rewrite a single statement into SSA form.
///
/// Flattening may emit extra definitions around the statement; when it
/// does, the result is wrapped in a block so the emitted definitions keep
/// their position relative to the consumer.
pub fn transform_stmt(arena: &mut ExprArena, stmt: &Stmt) -> Result<Stmt, SsaError> {
    let mut rw = SsaRewriter::new(arena);
    rw.push_scope(ScopeKind::Normal);
    let rewritten = rw.rewrite_stmt(stmt)?;
    let before = mem::take(&mut rw.pending_before);
    let after = mem::take(&mut rw.pending_after);
    rw.pop_scope();

    if before.is_empty() && after.is_empty() {
        if let Some(stmt) = rewritten {
            return Ok(stmt);
        }
    }
    let mut stmts = before;
    stmts.extend(rewritten);
    stmts.extend(after);
    Ok(Stmt::Block(Block::new(stmts)))
}

/// Ordering of scope map keys: variables sort before tensors, then by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum VarKind {
    Var,
    Tensor,
}

/// Identity of a source variable inside the scope maps.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct VarKey {
    kind: VarKind,
    name: String,
}

impl VarKey {
    fn var(name: String) -> Self {
        Self {
            kind: VarKind::Var,
            name,
        }
    }

    fn tensor(name: String) -> Self {
        Self {
            kind: VarKind::Tensor,
            name,
        }
    }
}

fn var_key(arena: &ExprArena, id: ExprId) -> Result<VarKey, SsaError> {
    match &arena.node(id).kind {
        ExprKind::Var { name } => Ok(VarKey::var(name.clone())),
        ExprKind::Tensor { name } => Ok(VarKey::tensor(name.clone())),
        other => Err(SsaError::TypeMismatch(format!("{:?}", other))),
    }
}

/// Per-scope state of one source variable.
#[derive(Debug)]
struct VarStatus {
    /// The source node this status was created for.
    src: ExprId,
    /// Current SSA value; empty until the first write is recorded.
    current_value: Option<ExprId>,
    /// Position in the scope stack where this status was inserted.
    defined_scope_idx: usize,
    /// Loop-entry φ result vars awaiting a back-edge operand.
    loop_entry_phis: Vec<ExprId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScopeKind {
    Normal,
    ForLoop,
    IfThen,
    IfElse,
}

#[derive(Debug)]
struct Scope {
    #[allow(dead_code)]
    kind: ScopeKind,
    /// Number of for-loop scopes on the stack up to and including this one.
    for_depth: u32,
    /// Ordered so iteration (and thus φ and temp numbering) is stable.
    vars: BTreeMap<VarKey, VarStatus>,
}

/// Classification of a definition's variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DefKind {
    LocalVar,
    GlobalVar,
    Tensor,
}

struct SsaRewriter<'a> {
    arena: &'a mut ExprArena,
    scopes: Vec<Scope>,
    /// Whether the next dispatched expression must reduce to a bare var or
    /// tensor (wrapping anything else in a temp definition). Reset to true
    /// on every dispatch; statement sites that consume a raw expression
    /// clear it right before dispatching.
    need_flatten: bool,
    /// Definitions to emit before the statement currently being rewritten.
    pending_before: Vec<Stmt>,
    /// Definitions to emit after it.
    pending_after: Vec<Stmt>,
    tmp_idx: u64,
    version_idx: u64,
}

impl<'a> SsaRewriter<'a> {
    fn new(arena: &'a mut ExprArena) -> Self {
        Self {
            arena,
            scopes: Vec::new(),
            need_flatten: true,
            pending_before: Vec::new(),
            pending_after: Vec::new(),
            tmp_idx: 0,
            version_idx: 0,
        }
    }

    // === Scope stack ===

    fn push_scope(&mut self, kind: ScopeKind) {
        let mut for_depth = self.scopes.last().map_or(0, |s| s.for_depth);
        if kind == ScopeKind::ForLoop {
            for_depth += 1;
        }
        self.scopes.push(Scope {
            kind,
            for_depth,
            vars: BTreeMap::new(),
        });
    }

    fn pop_scope(&mut self) -> Scope {
        self.scopes.pop().expect("scope stack underflow")
    }

    fn top_depth(&self) -> u32 {
        self.scopes.last().expect("no active scope").for_depth
    }

    /// Record a variable in the innermost scope. An existing entry is kept
    /// as is and returned.
    fn insert_local_var(
        &mut self,
        key: VarKey,
        src: ExprId,
        value: Option<ExprId>,
    ) -> &mut VarStatus {
        let idx = self.scopes.len() - 1;
        self.scopes[idx]
            .vars
            .entry(key)
            .or_insert_with(|| VarStatus {
                src,
                current_value: value,
                defined_scope_idx: idx,
                loop_entry_phis: Vec::new(),
            })
    }

    fn find(&self, key: &VarKey) -> Option<&VarStatus> {
        self.scopes.iter().rev().find_map(|s| s.vars.get(key))
    }

    /// Current value and defining-scope index for a variable, erroring on a
    /// missing or still-empty status.
    fn current_of(&self, key: &VarKey) -> Result<(ExprId, usize), SsaError> {
        let status = self
            .find(key)
            .ok_or_else(|| SsaError::UndefinedVariable(key.name.clone()))?;
        let value = status
            .current_value
            .ok_or_else(|| SsaError::UndefinedVariable(key.name.clone()))?;
        Ok((value, status.defined_scope_idx))
    }

    /// Scope index holding the status a write should go through.
    ///
    /// Module globals resolve to their existing status anywhere on the
    /// stack (they are never re-recorded in inner scopes). Anything else
    /// writes into the innermost scope, inserting an empty status when the
    /// variable has not been seen there.
    fn for_update_idx(&mut self, key: &VarKey, src: ExprId, is_global: bool) -> Result<usize, SsaError> {
        if is_global {
            for idx in (0..self.scopes.len()).rev() {
                if self.scopes[idx].vars.contains_key(key) {
                    return Ok(idx);
                }
            }
            return Err(SsaError::UndefinedVariable(key.name.clone()));
        }
        let top = self.scopes.len() - 1;
        self.scopes[top]
            .vars
            .entry(key.clone())
            .or_insert_with(|| VarStatus {
                src,
                current_value: None,
                defined_scope_idx: top,
                loop_entry_phis: Vec::new(),
            });
        Ok(top)
    }

    fn status_mut(&mut self, scope_idx: usize, key: &VarKey) -> &mut VarStatus {
        self.scopes[scope_idx]
            .vars
            .get_mut(key)
            .expect("status vanished from scope")
    }

    /// Whether a source node is a module-global variable.
    fn is_source_global(&self, id: ExprId) -> bool {
        matches!(self.arena.node(id).kind, ExprKind::Var { .. })
            && self.arena.has_attr(id, attr::MODULE_GLOBAL_OFFSET)
    }

    // === Naming ===

    /// Give a freshly produced local SSA var a versioned name derived from
    /// the source variable. Globals and parameters keep their names; the
    /// version counter only advances for locals.
    fn rename_with_version(&mut self, var: ExprId, base: &str) {
        let node = self.arena.node_mut(var);
        let is_local = node.ssa.as_ref().is_some_and(|s| s.is_local());
        if is_local {
            if let ExprKind::Var { name } = &mut node.kind {
                *name = format!("{}_{}", base, self.version_idx);
                self.version_idx += 1;
            }
        }
    }

    // === Definition emission ===

    fn make_tmp_var(&mut self, value: ExprId) -> ExprId {
        let dtype = self.arena.node(value).dtype;
        let name = format!("t_{}", self.tmp_idx);
        self.tmp_idx += 1;
        let var = make_var(self.arena, &name, dtype);
        self.arena.init_ssa(var).def = Some(value);
        var
    }

    /// Emit `tmp := value` before the current statement; returns the temp.
    fn add_def(&mut self, value: ExprId) -> ExprId {
        let var = self.make_tmp_var(value);
        self.pending_before.push(Stmt::Define(Define {
            var,
            linkage: Linkage::Local,
            init: Some(value),
        }));
        var
    }

    /// Emit `tmp := value` after the current statement; returns the temp.
    fn add_def_after(&mut self, value: ExprId) -> ExprId {
        let var = self.make_tmp_var(value);
        self.pending_after.push(Stmt::Define(Define {
            var,
            linkage: Linkage::Local,
            init: Some(value),
        }));
        var
    }

    // === Expressions ===

    /// Rewrite an expression, flattening the result into a temp definition
    /// unless flattening was suppressed for this dispatch or the result is
    /// already a bare var or tensor.
    fn dispatch_expr(&mut self, expr: ExprId) -> Result<ExprId, SsaError> {
        let flatten = mem::replace(&mut self.need_flatten, true);
        let ret = self.visit_expr(expr)?;
        if flatten && !self.arena.is_var_or_tensor(ret) {
            return Ok(self.add_def(ret));
        }
        Ok(ret)
    }

    fn visit_expr(&mut self, expr: ExprId) -> Result<ExprId, SsaError> {
        let kind = self.arena.node(expr).kind.clone();
        match kind {
            ExprKind::Var { name } => {
                let key = VarKey::var(name);
                let (value, def_scope_idx) = self.current_of(&key)?;
                if self.arena.is_ssa_global(value) {
                    // reads of a module global go through an explicit load
                    return Ok(self.add_def(value));
                }
                self.read_local(key, expr, value, def_scope_idx)
            }
            ExprKind::Tensor { name } => {
                let key = VarKey::tensor(name);
                let (value, _) = self.current_of(&key)?;
                Ok(value)
            }
            ExprKind::Const { .. } => {
                let copy = self.arena.remake(expr);
                self.arena.init_ssa(copy);
                Ok(copy)
            }
            ExprKind::Index { base, indices } => {
                let new_base = self.dispatch_expr(base)?;
                let mut new_indices = Vec::with_capacity(indices.len());
                for idx in indices {
                    new_indices.push(self.dispatch_expr(idx)?);
                }
                let dtype = self.arena.node(expr).dtype;
                let rebuilt = self.arena.alloc(
                    ExprKind::Index {
                        base: new_base,
                        indices: new_indices,
                    },
                    dtype,
                );
                self.arena.copy_attrs(expr, rebuilt);
                self.arena.init_ssa(rebuilt);
                Ok(rebuilt)
            }
            ExprKind::Call { func, args } => {
                let mut new_args = Vec::with_capacity(args.len());
                for arg in args {
                    new_args.push(self.dispatch_expr(arg)?);
                }
                let dtype = self.arena.node(expr).dtype;
                let rebuilt = self.arena.alloc(
                    ExprKind::Call {
                        func,
                        args: new_args,
                    },
                    dtype,
                );
                self.arena.copy_attrs(expr, rebuilt);
                self.arena.init_ssa(rebuilt);
                Ok(rebuilt)
            }
            ExprKind::Phi { operands } => {
                // Already-constructed φs (input that is in SSA form) pass
                // through with operands resolved where a binding exists.
                // Back-edge operands are forward references at the define
                // site and are kept untouched; no flattening, no new φs.
                let mut new_ops = Vec::with_capacity(operands.len());
                for op in operands {
                    new_ops.push(self.resolve_existing(op));
                }
                let rebuilt = make_phi(self.arena, new_ops);
                self.arena.init_ssa(rebuilt);
                Ok(rebuilt)
            }
        }
    }

    /// Resolve a φ operand through the scope stack, keeping it as is when
    /// nothing is bound (forward reference or constant).
    fn resolve_existing(&self, op: ExprId) -> ExprId {
        if let ExprKind::Var { name } = &self.arena.node(op).kind {
            let key = VarKey::var(name.clone());
            if let Some(status) = self.find(&key) {
                if let Some(value) = status.current_value {
                    return value;
                }
            }
        }
        op
    }

    /// Read the current value of a non-global variable from the innermost
    /// scope, inserting a loop-entry φ when the value was defined outside
    /// the current for-loop.
    fn read_local(
        &mut self,
        key: VarKey,
        src: ExprId,
        value: ExprId,
        def_scope_idx: usize,
    ) -> Result<ExprId, SsaError> {
        if self.top_depth() > self.scopes[def_scope_idx].for_depth {
            tracing::trace!(var = %key.name, "inserting loop-entry phi");
            let phi_node = make_phi(self.arena, vec![value]);
            self.arena.init_ssa(phi_node);
            let phi_var = self.add_def(phi_node);
            self.rename_with_version(phi_var, &key.name);
            let status = self.insert_local_var(key, src, Some(phi_var));
            status.loop_entry_phis.push(phi_var);
            return Ok(phi_var);
        }
        Ok(value)
    }

    // === Statements ===

    /// Rewrite a sequence, splicing each child's emitted definitions
    /// immediately before and after it.
    fn rewrite_block(&mut self, block: &Block) -> Result<Block, SsaError> {
        let mut out = Vec::with_capacity(block.stmts.len());
        for stmt in &block.stmts {
            let outer_before = mem::take(&mut self.pending_before);
            let outer_after = mem::take(&mut self.pending_after);
            let rewritten = self.rewrite_stmt(stmt)?;
            let mut before = mem::replace(&mut self.pending_before, outer_before);
            let mut after = mem::replace(&mut self.pending_after, outer_after);
            out.append(&mut before);
            out.extend(rewritten);
            out.append(&mut after);
        }
        Ok(Block::new(out))
    }

    /// Rewrite one statement. `None` means the statement is elided from the
    /// output (local definitions without initializers and local variable
    /// assignments leave only scope-table updates behind).
    fn rewrite_stmt(&mut self, stmt: &Stmt) -> Result<Option<Stmt>, SsaError> {
        match stmt {
            Stmt::Define(d) => self.rewrite_define(d),
            Stmt::Assign(a) => self.rewrite_assign(a),
            Stmt::For(f) => self.rewrite_for(f),
            Stmt::If(s) => self.rewrite_if(s),
            Stmt::Block(b) => Ok(Some(Stmt::Block(self.rewrite_block(b)?))),
            Stmt::Return(r) => {
                let value = match r.value {
                    Some(v) => Some(self.dispatch_expr(v)?),
                    None => None,
                };
                Ok(Some(Stmt::Return(Return { value })))
            }
        }
    }

    fn rewrite_define(&mut self, def: &Define) -> Result<Option<Stmt>, SsaError> {
        if def.linkage != Linkage::Local {
            let name = self.arena.name(def.var).unwrap_or("<unnamed>").to_string();
            return Err(SsaError::UnsupportedLinkage(def.linkage, name));
        }
        let key = var_key(self.arena, def.var)?;
        let def_kind = match &self.arena.node(def.var).kind {
            ExprKind::Var { .. } => {
                if self.is_source_global(def.var) {
                    DefKind::GlobalVar
                } else {
                    DefKind::LocalVar
                }
            }
            ExprKind::Tensor { .. } => DefKind::Tensor,
            other => return Err(SsaError::TypeMismatch(format!("{:?}", other))),
        };
        self.insert_local_var(key.clone(), def.var, None);

        if def_kind == DefKind::LocalVar && def.init.is_none() {
            // bare local definition: drop it and seed a typed zero so
            // later reads observe a defined value
            let dtype = self.arena.node(def.var).dtype;
            let zero = make_constant(self.arena, ConstValue::zero(dtype), dtype);
            self.arena.init_ssa(zero);
            let idx = self.scopes.len() - 1;
            self.status_mut(idx, &key).current_value = Some(zero);
            return Ok(None);
        }

        let new_var = self.arena.remake(def.var);
        let info = self.arena.init_ssa(new_var);
        if def_kind == DefKind::GlobalVar {
            info.is_global = true;
        }
        let idx = self.scopes.len() - 1;
        self.status_mut(idx, &key).current_value = Some(new_var);

        let new_init = match def.init {
            Some(init) => {
                // initializers already produce a definition; do not wrap
                self.need_flatten = false;
                Some(self.dispatch_expr(init)?)
            }
            None => None,
        };
        Ok(Some(Stmt::Define(Define {
            var: new_var,
            linkage: def.linkage,
            init: new_init,
        })))
    }

    fn rewrite_assign(&mut self, assign: &Assign) -> Result<Option<Stmt>, SsaError> {
        match self.arena.node(assign.lhs).kind.clone() {
            ExprKind::Var { name } => {
                let rhs = self.dispatch_expr(assign.rhs)?;
                let key = VarKey::var(name.clone());
                let is_global = self.is_source_global(assign.lhs);
                let idx = self.for_update_idx(&key, assign.lhs, is_global)?;
                let current = self.scopes[idx].vars[&key].current_value;
                let current_is_global = current.is_some_and(|c| self.arena.is_ssa_global(c));
                if current.is_none() || !current_is_global {
                    if !self.arena.is_var_or_const(rhs) {
                        return Err(SsaError::MalformedAssign(name));
                    }
                    self.status_mut(idx, &key).current_value = Some(rhs);
                    if matches!(self.arena.node(rhs).kind, ExprKind::Var { .. }) {
                        self.rename_with_version(rhs, &name);
                    }
                    Ok(None)
                } else {
                    // module global: the store stays explicit
                    let lhs = current.expect("global status without a value");
                    Ok(Some(Stmt::Assign(Assign { lhs, rhs })))
                }
            }
            ExprKind::Index { .. } => {
                // the element store is the definition; do not wrap the lhs
                self.need_flatten = false;
                let lhs = self.dispatch_expr(assign.lhs)?;
                let rhs = self.dispatch_expr(assign.rhs)?;
                Ok(Some(Stmt::Assign(Assign { lhs, rhs })))
            }
            other => Err(SsaError::TypeMismatch(format!("{:?}", other))),
        }
    }

    fn rewrite_for(&mut self, f: &ForLoop) -> Result<Option<Stmt>, SsaError> {
        let begin = self.dispatch_expr(f.begin)?;
        let end = self.dispatch_expr(f.end)?;
        let step = self.dispatch_expr(f.step)?;

        self.push_scope(ScopeKind::ForLoop);
        let ind_key = var_key(self.arena, f.var)?;
        let ind_var = self.arena.remake(f.var);
        self.arena.init_ssa(ind_var);
        self.insert_local_var(ind_key, f.var, Some(ind_var));
        let body = self.rewrite_block(&f.body)?;
        let loop_scope = self.pop_scope();

        for (key, status) in &loop_scope.vars {
            let Some(parent) = self.find(key) else {
                continue;
            };
            let parent_value = parent.current_value;
            let Some(tip) = status.current_value else {
                continue;
            };
            for &phi_var in &status.loop_entry_phis {
                if phi_var == tip {
                    // unchanged through this φ: no back edge to record
                    continue;
                }
                let phi_node = self
                    .arena
                    .node(phi_var)
                    .ssa
                    .as_ref()
                    .and_then(|s| s.def)
                    .expect("loop-entry phi lost its definition");
                self.arena.push_phi_operand(phi_node, tip);
            }
            if status.loop_entry_phis.contains(&tip) {
                // only read in the loop: the entry φ keeps its single
                // operand and the enclosing value is unchanged, so there
                // is nothing to merge after the loop
                continue;
            }
            let parent_value =
                parent_value.ok_or_else(|| SsaError::UndefinedVariable(key.name.clone()))?;
            let exit_phi = make_phi(self.arena, vec![parent_value, tip]);
            self.arena.init_ssa(exit_phi);
            let new_var = self.add_def_after(exit_phi);
            let is_global = self.is_source_global(status.src);
            let idx = self.for_update_idx(key, status.src, is_global)?;
            self.status_mut(idx, key).current_value = Some(new_var);
            self.rename_with_version(new_var, &key.name);
        }

        Ok(Some(Stmt::For(ForLoop {
            var: ind_var,
            begin,
            end,
            step,
            body,
            kind: f.kind,
            incremental: f.incremental,
        })))
    }

    fn rewrite_if(&mut self, stmt: &IfElse) -> Result<Option<Stmt>, SsaError> {
        let cond = self.dispatch_expr(stmt.cond)?;

        self.push_scope(ScopeKind::IfThen);
        let then_body = self.rewrite_block(&stmt.then_body)?;
        let then_scope = self.pop_scope();

        let else_body = if let Some(else_block) = &stmt.else_body {
            self.push_scope(ScopeKind::IfElse);
            let body = self.rewrite_block(else_block)?;
            let else_scope = self.pop_scope();

            // merge the diverged variables with φs, then-tip before else-tip
            let mut updated: BTreeMap<VarKey, (ExprId, Vec<ExprId>)> = BTreeMap::new();
            for scope in [&then_scope, &else_scope] {
                for (key, status) in &scope.vars {
                    let tip = status
                        .current_value
                        .ok_or_else(|| SsaError::UndefinedVariable(key.name.clone()))?;
                    updated
                        .entry(key.clone())
                        .or_insert_with(|| (status.src, Vec::new()))
                        .1
                        .push(tip);
                    // a surrounding loop still needs to see entry φs made
                    // inside the branches
                    let is_global = self.is_source_global(status.src);
                    let idx = self.for_update_idx(key, status.src, is_global)?;
                    self.status_mut(idx, key)
                        .loop_entry_phis
                        .extend_from_slice(&status.loop_entry_phis);
                }
            }
            for (key, (src, tips)) in &updated {
                let phi = make_phi(self.arena, tips.clone());
                self.arena.init_ssa(phi);
                let new_var = self.add_def_after(phi);
                let is_global = self.is_source_global(*src);
                let idx = self.for_update_idx(key, *src, is_global)?;
                self.status_mut(idx, key).current_value = Some(new_var);
                self.rename_with_version(new_var, &key.name);
            }
            Some(body)
        } else {
            for (key, status) in &then_scope.vars {
                let Some(parent) = self.find(key) else {
                    continue;
                };
                let parent_value = parent.current_value;
                let parent_scope_idx = parent.defined_scope_idx;
                let is_global = self.is_source_global(status.src);
                let idx = self.for_update_idx(key, status.src, is_global)?;
                self.status_mut(idx, key)
                    .loop_entry_phis
                    .extend_from_slice(&status.loop_entry_phis);

                let parent_value =
                    parent_value.ok_or_else(|| SsaError::UndefinedVariable(key.name.clone()))?;
                // the fall-through operand is a read at the join point: if
                // the value comes from outside a surrounding loop this
                // inserts the loop-entry φ for it
                let fallthrough = if self.arena.is_ssa_global(parent_value) {
                    parent_value
                } else {
                    self.read_local(key.clone(), status.src, parent_value, parent_scope_idx)?
                };
                let tip = status
                    .current_value
                    .ok_or_else(|| SsaError::UndefinedVariable(key.name.clone()))?;
                let phi = make_phi(self.arena, vec![fallthrough, tip]);
                self.arena.init_ssa(phi);
                let new_var = self.add_def_after(phi);
                self.status_mut(idx, key).current_value = Some(new_var);
                self.rename_with_version(new_var, &key.name);
            }
            None
        };

        Ok(Some(Stmt::If(IfElse {
            cond,
            then_body,
            else_body,
        })))
    }
}
