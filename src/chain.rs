// Thin re-export module: implementation is in `chain/core.rs` to allow
// progressive decomposition of chain responsibilities (engine, head state,
// validation).

pub mod core;
pub use self::core::*;
