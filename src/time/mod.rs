//! Swim time parsing and formatting.
//!
//! Times arrive either as plain seconds or as meet-export strings such as
//! `58.42`, `1:02.34Y` or `1:02:03.45`. Everything inside the engine works on
//! canonical seconds (`f64`).

pub mod parse;

pub use parse::*;
