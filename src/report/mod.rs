//! Reporting: personal bests, next-standard targets, IMX, and terminal output.

pub mod bests;
pub mod format;

pub use bests::*;
pub use format::*;
