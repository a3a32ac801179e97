//! Arena-allocated expression nodes.
//!
//! Expressions live in an [`ExprArena`] and reference each other through
//! [`ExprId`] indices. Value identity is index identity: two reads of the
//! same SSA value hold the same `ExprId`. This also gives φ nodes a home
//! that outlives scope pops — a loop-entry φ created inside a loop body can
//! have its back-edge operand appended through the arena after the loop
//! scope is gone, without shared-pointer cycles.
//!
//! Each node carries:
//! - its [`ExprKind`] payload,
//! - an element [`DType`],
//! - an insertion-ordered attribute table (see [`attr`]),
//! - optional SSA metadata ([`SsaInfo`]), attached by the SSA pass.

use std::fmt;

use indexmap::IndexMap;

use crate::types::{ConstValue, DType};

/// Well-known attribute keys.
pub mod attr {
    /// Marks a variable as owned by the compilation unit rather than the
    /// function. Module-global variables are not SSA-versioned: reads go
    /// through explicit load definitions and writes stay explicit stores.
    pub const MODULE_GLOBAL_OFFSET: &str = "module_global_offset";
}

/// Attribute value payload.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Int(i64),
    Bool(bool),
    Str(String),
}

/// Index of an expression node in an [`ExprArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExprId(u32);

impl ExprId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.0)
    }
}

/// SSA metadata attached to rewritten expression nodes.
///
/// Absent on source IR; the SSA pass attaches one record to every node it
/// produces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SsaInfo {
    /// The node is an SSA-renamed function parameter.
    pub is_param: bool,
    /// The node is the canonical value of a module-global variable.
    pub is_global: bool,
    /// For an SSA variable: the value expression it was defined with.
    pub def: Option<ExprId>,
}

impl SsaInfo {
    /// A local SSA value: neither a module global nor a parameter.
    ///
    /// Only local values take part in version renaming.
    pub fn is_local(&self) -> bool {
        !self.is_global && !self.is_param
    }
}

/// Expression node variants.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Scalar variable reference.
    Var { name: String },
    /// Tensor reference. Tensors are handles: never versioned, element
    /// access goes through [`ExprKind::Index`].
    Tensor { name: String },
    /// Constant.
    Const { value: ConstValue },
    /// Element access into a tensor.
    Index { base: ExprId, indices: Vec<ExprId> },
    /// Opaque n-ary operator. The SSA pass recurses into the arguments and
    /// otherwise treats the operation as a black box.
    Call { func: String, args: Vec<ExprId> },
    /// φ pseudo-operation: its value is the operand corresponding to the
    /// predecessor edge actually taken.
    Phi { operands: Vec<ExprId> },
}

/// One expression node in the arena.
#[derive(Debug, Clone)]
pub struct ExprNode {
    pub kind: ExprKind,
    pub dtype: DType,
    pub attrs: IndexMap<String, AttrValue>,
    pub ssa: Option<SsaInfo>,
}

/// Owning store for expression nodes.
#[derive(Debug, Default)]
pub struct ExprArena {
    nodes: Vec<ExprNode>,
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a node with empty attributes and no SSA metadata.
    pub fn alloc(&mut self, kind: ExprKind, dtype: DType) -> ExprId {
        self.push(ExprNode {
            kind,
            dtype,
            attrs: IndexMap::new(),
            ssa: None,
        })
    }

    fn push(&mut self, node: ExprNode) -> ExprId {
        let id = ExprId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub fn node(&self, id: ExprId) -> &ExprNode {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: ExprId) -> &mut ExprNode {
        &mut self.nodes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Produce a fresh node with the same kind, dtype and attributes but no
    /// SSA metadata.
    pub fn remake(&mut self, id: ExprId) -> ExprId {
        let node = &self.nodes[id.index()];
        let copy = ExprNode {
            kind: node.kind.clone(),
            dtype: node.dtype,
            attrs: node.attrs.clone(),
            ssa: None,
        };
        self.push(copy)
    }

    /// Transfer source-node attributes onto a rewritten node.
    pub fn copy_attrs(&mut self, from: ExprId, to: ExprId) {
        let attrs = self.nodes[from.index()].attrs.clone();
        self.nodes[to.index()].attrs.extend(attrs);
    }

    /// Attach a default SSA metadata record.
    ///
    /// # Panics
    ///
    /// Panics if the node already carries SSA metadata (pass bug).
    pub fn init_ssa(&mut self, id: ExprId) -> &mut SsaInfo {
        let node = &mut self.nodes[id.index()];
        assert!(
            node.ssa.is_none(),
            "ssa metadata attached twice to the same node"
        );
        node.ssa = Some(SsaInfo::default());
        node.ssa.as_mut().unwrap()
    }

    pub fn has_attr(&self, id: ExprId, key: &str) -> bool {
        self.node(id).attrs.contains_key(key)
    }

    pub fn set_attr(&mut self, id: ExprId, key: &str, value: AttrValue) {
        self.node_mut(id).attrs.insert(key.to_string(), value);
    }

    /// The canonical name of a var or tensor node.
    pub fn name(&self, id: ExprId) -> Option<&str> {
        match &self.node(id).kind {
            ExprKind::Var { name } | ExprKind::Tensor { name } => Some(name),
            _ => None,
        }
    }

    /// Whether the node's SSA metadata marks a module-global value.
    pub fn is_ssa_global(&self, id: ExprId) -> bool {
        self.node(id).ssa.as_ref().is_some_and(|s| s.is_global)
    }

    pub fn is_var_or_tensor(&self, id: ExprId) -> bool {
        matches!(
            self.node(id).kind,
            ExprKind::Var { .. } | ExprKind::Tensor { .. }
        )
    }

    pub fn is_var_or_const(&self, id: ExprId) -> bool {
        matches!(
            self.node(id).kind,
            ExprKind::Var { .. } | ExprKind::Const { .. }
        )
    }

    /// Append a back-edge operand to a φ node.
    ///
    /// # Panics
    ///
    /// Panics if `phi` is not a φ node (pass bug).
    pub fn push_phi_operand(&mut self, phi: ExprId, value: ExprId) {
        match &mut self.nodes[phi.index()].kind {
            ExprKind::Phi { operands } => operands.push(value),
            other => panic!("expected a phi node, got {:?}", other),
        }
    }

    /// Pre-order walk over an expression tree.
    pub fn for_each(&self, root: ExprId, f: &mut impl FnMut(ExprId)) {
        f(root);
        match &self.node(root).kind {
            ExprKind::Index { base, indices } => {
                self.for_each(*base, f);
                for idx in indices {
                    self.for_each(*idx, f);
                }
            }
            ExprKind::Call { args, .. } => {
                for arg in args {
                    self.for_each(*arg, f);
                }
            }
            ExprKind::Phi { operands } => {
                for op in operands {
                    self.for_each(*op, f);
                }
            }
            ExprKind::Var { .. } | ExprKind::Tensor { .. } | ExprKind::Const { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remake_drops_ssa_and_keeps_attrs() {
        let mut arena = ExprArena::new();
        let v = arena.alloc(
            ExprKind::Var {
                name: "x".to_string(),
            },
            DType::I32,
        );
        arena.set_attr(v, attr::MODULE_GLOBAL_OFFSET, AttrValue::Int(16));
        arena.init_ssa(v).is_global = true;

        let copy = arena.remake(v);
        assert!(arena.node(copy).ssa.is_none());
        assert!(arena.has_attr(copy, attr::MODULE_GLOBAL_OFFSET));
        assert_eq!(arena.name(copy), Some("x"));
        assert_ne!(v, copy);
    }

    #[test]
    fn test_push_phi_operand() {
        let mut arena = ExprArena::new();
        let a = arena.alloc(
            ExprKind::Var {
                name: "a".to_string(),
            },
            DType::I32,
        );
        let phi = arena.alloc(ExprKind::Phi { operands: vec![a] }, DType::I32);
        let b = arena.alloc(
            ExprKind::Var {
                name: "b".to_string(),
            },
            DType::I32,
        );
        arena.push_phi_operand(phi, b);

        match &arena.node(phi).kind {
            ExprKind::Phi { operands } => assert_eq!(operands.as_slice(), &[a, b]),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_for_each_preorder() {
        let mut arena = ExprArena::new();
        let t = arena.alloc(
            ExprKind::Tensor {
                name: "buf".to_string(),
            },
            DType::F32,
        );
        let i = arena.alloc(
            ExprKind::Var {
                name: "i".to_string(),
            },
            DType::I64,
        );
        let idx = arena.alloc(
            ExprKind::Index {
                base: t,
                indices: vec![i],
            },
            DType::F32,
        );

        let mut seen = Vec::new();
        arena.for_each(idx, &mut |id| seen.push(id));
        assert_eq!(seen, vec![idx, t, i]);
    }

    #[test]
    #[should_panic(expected = "ssa metadata attached twice")]
    fn test_init_ssa_panics_on_double_attach() {
        let mut arena = ExprArena::new();
        let v = arena.alloc(
            ExprKind::Var {
                name: "x".to_string(),
            },
            DType::I32,
        );
        arena.init_ssa(v);
        arena.init_ssa(v);
    }
}
