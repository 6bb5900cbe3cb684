// core.rs splits responsibilities into submodules for easier maintenance.
pub mod engine;
pub mod head;
pub mod validation;

pub use engine::*;
pub use head::*;
pub use validation::*;
