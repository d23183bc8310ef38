//! Command-line parsing for the swim standards grader.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the grading code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::domain::{Course, EventKey};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "swimgrade", version, about = "Grade swim times against age-group time standards")]
pub struct Cli {
    /// Debug logging on stderr (overridden by `RUST_LOG`).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Grade every swim in a records CSV, print a summary, and optionally export.
    Grade(GradeArgs),
    /// Personal bests with next-standard targets and power points.
    Bests(BestsArgs),
    /// How one time grades today and how far it is from the next standard.
    Progress(ProgressArgs),
}

/// Input files shared by `grade` and `bests`.
#[derive(Debug, Args, Clone)]
pub struct InputArgs {
    /// Cleaned swim-record CSV.
    #[arg(long, env = "SWIM_RECORDS", value_name = "CSV")]
    pub records: PathBuf,

    /// Standards JSON (era → bracket → gender → course → event → tier).
    #[arg(long, env = "SWIM_STANDARDS", value_name = "JSON")]
    pub standards: PathBuf,

    /// Optional TOML config (swimmer profile, eras, brackets, scoring).
    #[arg(long, env = "SWIM_CONFIG", value_name = "TOML")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct GradeArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    /// Write the records plus a `Standard` column to this CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Also print one line per graded swim.
    #[arg(long)]
    pub table: bool,
}

#[derive(Debug, Args, Clone)]
pub struct BestsArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    /// Only show bests in this course.
    #[arg(long, value_enum)]
    pub course: Option<Course>,

    /// Also print the IMX score for each shown course.
    #[arg(long)]
    pub imx: bool,

    /// Print contested distances per stroke, including ones never swum.
    #[arg(long)]
    pub by_stroke: bool,

    /// Print JSON instead of tables.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args, Clone)]
pub struct ProgressArgs {
    /// Standards JSON.
    #[arg(long, env = "SWIM_STANDARDS", value_name = "JSON")]
    pub standards: PathBuf,

    /// Optional TOML config.
    #[arg(long, env = "SWIM_CONFIG", value_name = "TOML")]
    pub config: Option<PathBuf>,

    /// Event, e.g. "100 Free" or "200_im".
    #[arg(long, value_parser = parse_event)]
    pub event: EventKey,

    #[arg(long, value_enum)]
    pub course: Course,

    /// Time as swum, e.g. "58.42" or "1:02.34".
    #[arg(long)]
    pub time: String,

    /// Age to grade at (default: from the configured birthdate).
    #[arg(long)]
    pub age: Option<u32>,

    /// Date to grade at, YYYY-MM-DD (default: configured as-of date, else today).
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Print JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

fn parse_event(s: &str) -> Result<EventKey, String> {
    s.parse()
}
