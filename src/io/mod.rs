//! Input/output helpers.
//!
//! - swim-record CSV ingest + validation (`ingest`)
//! - standards JSON loading (`standards`)
//! - graded CSV export (`export`)

pub mod export;
pub mod ingest;
pub mod standards;

pub use export::*;
pub use ingest::*;
pub use standards::*;
