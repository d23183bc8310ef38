//! `swim-standards` library crate.
//!
//! The binary (`swimgrade`) is a thin wrapper around this library so that:
//!
//! - grading logic is testable without spawning processes
//! - the engine can be reused by other front-ends (a dashboard, a notebook)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod grade;
pub mod io;
pub mod report;
pub mod standards;
pub mod time;
