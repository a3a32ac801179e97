//! SSA construction for the structured IR.
//!
//! Rewrites a structured function (assignments, `if/else`, counted `for`
//! loops) into a form where every scalar variable is defined exactly once
//! and control-flow joins carry explicit φ definitions.
//!
//! # Overview
//!
//! The pass exploits the structured shape of the IR: the scope tree of a
//! reducible, structured CFG *is* its dominance tree, so a single pre-order
//! walk with a scope stack is enough — no dominance frontier computation.
//!
//! Input:
//!
//! ```text
//! fn accumulate(n: i64) -> i32 {
//!     let s: i32 = 0
//!     for i in (0, n, 1) serial {
//!         s = add(s, 1)
//!     }
//!     return s
//! }
//! ```
//!
//! Output:
//!
//! ```text
//! fn accumulate(n: i64) -> i32 {
//!     let s: i32 = 0
//!     let t_0: i64 = 0
//!     let t_1: i64 = 1
//!     for i in (t_0, n, t_1) serial {
//!         let s_0: i32 = phi(s, s_1)
//!         let t_3: i32 = 1
//!         let s_1: i32 = add(s_0, t_3)
//!     }
//!     let s_2: i32 = phi(s, s_1)
//!     return s_2
//! }
//! ```
//!
//! Module-global variables (marked with the
//! [`module_global_offset`](crate::expr::attr::MODULE_GLOBAL_OFFSET)
//! attribute) are not versioned: reads become explicit load definitions and
//! writes stay explicit stores.

mod transform;
mod validate;

pub use transform::{transform_func, transform_stmt};
pub use validate::{validate_ssa, SsaValidationError};
