//! Shared "load and grade" workflow used by the `grade` and `bests` commands.
//!
//! config -> standards -> records -> grade batch -> personal bests
//!
//! The command handlers can then focus on presentation.

use std::path::Path;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::cli::InputArgs;
use crate::config::GradingConfig;
use crate::domain::{GradedSwim, SwimmerContext};
use crate::error::AppError;
use crate::grade::GradingEngine;
use crate::io::{IngestedRecords, load_standards, load_swim_records};
use crate::report::{PersonalBest, personal_bests};
use crate::standards::StandardsTable;

/// Everything loaded from disk for one run.
#[derive(Debug, Clone)]
pub struct Inputs {
    pub config: GradingConfig,
    pub standards: StandardsTable,
    pub ingest: IngestedRecords,
}

/// Computed outputs of a grading run. Borrows the loaded inputs.
#[derive(Debug, Clone)]
pub struct GradeOutput<'a> {
    pub graded: Vec<GradedSwim<'a>>,
    pub bests: Vec<PersonalBest>,
    /// "Now" for next-standard targets; `None` when no age is known at all.
    pub context: Option<SwimmerContext>,
}

pub fn load_config(path: Option<&Path>) -> Result<GradingConfig, AppError> {
    let config = GradingConfig::load(path)?;
    debug!(
        gender = %config.swimmer.gender.display_name(),
        birthdate = ?config.swimmer.birthdate,
        eras = config.eras.len(),
        brackets = config.age_brackets.len(),
        "config resolved"
    );
    Ok(config)
}

pub fn load_inputs(args: &InputArgs) -> Result<Inputs, AppError> {
    let config = load_config(args.config.as_deref())?;
    let standards = load_standards(&args.standards)?;
    let ingest = load_swim_records(&args.records)?;

    for err in &ingest.row_errors {
        warn!(line = err.line, "{}", err.message);
    }

    Ok(Inputs {
        config,
        standards,
        ingest,
    })
}

/// Grade every record and derive personal bests.
///
/// Grading never fails: every problem with a swim is carried in its label.
pub fn run_grade<'a>(engine: &GradingEngine<'_>, inputs: &'a Inputs, today: NaiveDate) -> GradeOutput<'a> {
    let records = &inputs.ingest.records;
    let graded = engine.grade_batch(records);

    let tiered = graded.iter().filter(|g| g.label.tier().is_some()).count();
    info!(swims = graded.len(), tiered, "graded swims");

    let bests = personal_bests(&graded);
    let context = inputs.config.current_context(records, today);
    if context.is_none() {
        warn!("no birthdate configured and no ages in records; next-standard targets unavailable");
    }

    GradeOutput {
        graded,
        bests,
        context,
    }
}
