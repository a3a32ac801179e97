//! Hard failures of the SSA construction pass.

use thiserror::Error;

use crate::types::Linkage;

/// Errors aborting SSA construction.
///
/// All variants indicate compiler bugs or malformed input; there is no
/// partial recovery. The pass is whole-function transactional: on error the
/// caller discards the partially rewritten function.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SsaError {
    /// A variable was read with no definition anywhere on the scope stack.
    #[error("undefined variable '{0}'")]
    UndefinedVariable(String),

    /// A definition with non-local linkage reached the pass. Module-level
    /// linkage must be resolved before SSA construction.
    #[error("unsupported linkage {0:?} in definition of '{1}'")]
    UnsupportedLinkage(Linkage, String),

    /// The right-hand side of a variable assignment did not reduce to a
    /// bare variable or constant, meaning the flattener did not run.
    #[error("assignment to '{0}' did not reduce to a variable or constant")]
    MalformedAssign(String),

    /// A node appeared where a scalar variable or tensor was required.
    #[error("expected a variable or tensor, got {0}")]
    TypeMismatch(String),
}
