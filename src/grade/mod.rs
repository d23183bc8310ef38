//! Grading orchestration.
//!
//! Responsibilities:
//!
//! - assign one tier (or sentinel) per swim (`engine`)
//! - measure progress toward the next tier for "current" standards
//! - power points against the bracket's top tier (`points`)

pub mod engine;
pub mod points;

pub use engine::*;
pub use points::*;
