//! Shared scalar vocabulary for the IR.
//!
//! Small enums used throughout the node model: element dtypes, constant
//! values, definition linkage, and for-loop kinds.

use std::fmt;

/// Element data type of an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DType {
    Bool,
    I32,
    I64,
    F32,
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DType::Bool => "bool",
            DType::I32 => "i32",
            DType::I64 => "i64",
            DType::F32 => "f32",
        };
        write!(f, "{}", name)
    }
}

/// A compile-time constant payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConstValue {
    Int(i64),
    Float(f64),
}

impl ConstValue {
    /// The zero constant for a dtype.
    ///
    /// Used to seed the current value of a scalar definition that has no
    /// initializer, so later reads observe a defined value.
    pub fn zero(dtype: DType) -> Self {
        match dtype {
            DType::F32 => ConstValue::Float(0.0),
            _ => ConstValue::Int(0),
        }
    }
}

impl fmt::Display for ConstValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstValue::Int(v) => write!(f, "{}", v),
            ConstValue::Float(v) => write!(f, "{:?}", v),
        }
    }
}

/// Linkage of a definition.
///
/// The SSA pass only accepts `Local`; module-level linkage is resolved by
/// earlier pipeline stages, which rewrite module globals into local
/// definitions tagged with [`crate::expr::attr::MODULE_GLOBAL_OFFSET`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Linkage {
    Local,
    Static,
    Public,
}

/// Execution kind of a for-loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForKind {
    Serial,
    Parallel,
}

impl fmt::Display for ForKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForKind::Serial => write!(f, "serial"),
            ForKind::Parallel => write!(f, "parallel"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_constant_matches_dtype() {
        assert_eq!(ConstValue::zero(DType::I32), ConstValue::Int(0));
        assert_eq!(ConstValue::zero(DType::I64), ConstValue::Int(0));
        assert_eq!(ConstValue::zero(DType::F32), ConstValue::Float(0.0));
    }

    #[test]
    fn test_display() {
        assert_eq!(DType::F32.to_string(), "f32");
        assert_eq!(ConstValue::Int(7).to_string(), "7");
        assert_eq!(ConstValue::Float(0.5).to_string(), "0.5");
        assert_eq!(ForKind::Parallel.to_string(), "parallel");
    }
}
