//! Domain types used throughout the grading pipeline.
//!
//! This module defines:
//!
//! - pool/stroke/gender/tier enums (`Course`, `Stroke`, `Gender`, `Tier`)
//! - the event key and the ingested swim record (`EventKey`, `SwimRecord`)
//! - grading outputs (`GradeLabel`, `GradedSwim`, `ProgressInfo`)

pub mod types;

pub use types::*;
