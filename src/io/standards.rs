//! Standards JSON loading.
//!
//! The file nests `era → bracket → gender → course → event → tier → time`,
//! with times as strings (`"1:02.49"`) or plain seconds (`62.49`). It is
//! flattened into a [`StandardsTable`] here.
//!
//! Loading is forgiving about *content* (unknown labels and unparseable times
//! are skipped with a warning, so one odd cell does not hide the rest of the
//! table) but strict about *shape* and about ladder ordering.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::domain::{Course, EventKey, Gender, Tier};
use crate::error::AppError;
use crate::standards::{QualifyingTime, StandardKey, StandardsTable, TierLadder};
use crate::time::{format_time, parse_seconds, parse_time};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTime {
    Seconds(f64),
    Text(String),
}

type RawLadder = BTreeMap<String, RawTime>;
type RawEvents = BTreeMap<String, RawLadder>;
type RawCourses = BTreeMap<String, RawEvents>;
type RawGenders = BTreeMap<String, RawCourses>;
type RawBrackets = BTreeMap<String, RawGenders>;
type RawStandards = BTreeMap<String, RawBrackets>;

/// Load and flatten a standards file.
pub fn load_standards(path: &Path) -> Result<StandardsTable, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open standards '{}': {e}", path.display())))?;
    let raw: RawStandards = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AppError::new(2, format!("Invalid standards JSON '{}': {e}", path.display())))?;
    let table = flatten(raw)?;
    info!(
        path = %path.display(),
        ladders = table.len(),
        eras = ?table.eras().collect::<Vec<_>>(),
        "loaded standards"
    );
    Ok(table)
}

/// Parse standards from an in-memory JSON string.
pub fn parse_standards(json: &str) -> Result<StandardsTable, AppError> {
    let raw: RawStandards =
        serde_json::from_str(json).map_err(|e| AppError::new(2, format!("Invalid standards JSON: {e}")))?;
    flatten(raw)
}

fn flatten(raw: RawStandards) -> Result<StandardsTable, AppError> {
    let mut table = StandardsTable::new();

    for (era, brackets) in raw {
        table.add_era(era.clone());
        for (bracket, genders) in brackets {
            for (gender_label, courses) in genders {
                let Some(gender) = Gender::from_label(&gender_label) else {
                    warn!(%era, %bracket, gender = %gender_label, "skipping unknown gender");
                    continue;
                };
                for (course_label, events) in courses {
                    let Some(course) = Course::from_standards_label(&course_label) else {
                        warn!(%era, %bracket, course = %course_label, "skipping course without standards support");
                        continue;
                    };
                    for (event_label, tiers) in events {
                        let event: EventKey = match event_label.parse() {
                            Ok(event) => event,
                            Err(e) => {
                                warn!(%era, %bracket, event = %event_label, "skipping event: {e}");
                                continue;
                            }
                        };
                        let ladder = build_ladder(tiers).map_err(|e| {
                            AppError::new(
                                2,
                                format!("Standards error in {era} / {bracket} / {gender_label} / {course_label} / {event_label}: {e}"),
                            )
                        })?;
                        if ladder.is_empty() {
                            debug!(%era, %bracket, event = %event_label, "no usable tiers; event left uncataloged");
                            continue;
                        }
                        let key = StandardKey {
                            era: era.clone(),
                            bracket: bracket.clone(),
                            gender,
                            course,
                            event,
                        };
                        table.insert(key, ladder);
                    }
                }
            }
        }
    }

    Ok(table)
}

fn build_ladder(tiers: RawLadder) -> Result<TierLadder, String> {
    let mut ladder = TierLadder::new();
    for (tier_label, raw) in tiers {
        let Some(tier) = Tier::from_label(&tier_label) else {
            warn!(tier = %tier_label, "skipping unknown tier");
            continue;
        };
        let parsed = match &raw {
            RawTime::Seconds(s) => parse_seconds(*s).map(|s| (s, format_time(s))),
            RawTime::Text(t) => parse_time(t).map(|s| (s, t.trim().to_string())),
        };
        let (seconds, display) = match parsed {
            Ok(v) if v.0 > 0.0 => v,
            _ => {
                warn!(tier = %tier_label, value = ?raw, "skipping unparseable qualifying time");
                continue;
            }
        };
        ladder.insert_checked(tier, QualifyingTime { seconds, display })?;
    }
    Ok(ladder)
}
