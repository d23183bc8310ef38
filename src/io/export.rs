//! Export graded swims to CSV.
//!
//! Same columns as the input file plus `Standard`, so the result opens in the
//! same spreadsheet the records came from.

use std::path::Path;

use serde::Serialize;

use crate::domain::GradedSwim;
use crate::error::AppError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct GradedRow<'a> {
    date: String,
    age: Option<u32>,
    distance: u32,
    stroke: &'a str,
    course: &'a str,
    round: Option<&'a str>,
    finals: &'a str,
    #[serde(rename = "Time_Seconds")]
    time_seconds: Option<f64>,
    meet: Option<&'a str>,
    standard: String,
}

impl<'a> From<&GradedSwim<'a>> for GradedRow<'a> {
    fn from(g: &GradedSwim<'a>) -> Self {
        let r = g.record;
        Self {
            date: r.date.format("%Y-%m-%d").to_string(),
            age: r.age,
            distance: r.distance,
            stroke: label_or(&r.stroke_label, r.stroke.display_name()),
            course: label_or(&r.course_label, r.course.display_name()),
            round: r.round.as_deref(),
            finals: &r.finals,
            time_seconds: r.time_seconds,
            meet: r.meet.as_deref(),
            standard: g.label.to_string(),
        }
    }
}

fn label_or<'a>(raw: &'a str, fallback: &'static str) -> &'a str {
    if raw.trim().is_empty() { fallback } else { raw }
}

/// Write graded swims to a CSV file.
pub fn write_graded_csv(path: &Path, graded: &[GradedSwim<'_>]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;

    for g in graded {
        writer
            .serialize(GradedRow::from(g))
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV '{}': {e}", path.display())))?;
    Ok(())
}
