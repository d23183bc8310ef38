//! The grading engine.
//!
//! `classify` runs the full lookup and reports *why* a swim has no tier;
//! `grade` folds that into the label shown to users. Neither ever fails a
//! batch: every problem becomes a value.

use chrono::NaiveDate;
use rayon::prelude::*;
use tracing::trace;

use crate::config::GradingConfig;
use crate::domain::{
    Course, EventKey, Gender, GradeLabel, GradedSwim, ProgressInfo, Stroke, SwimRecord, SwimmerContext, Tier,
};
use crate::error::{AppError, GradeError};
use crate::grade::points::power_points_scaled;
use crate::standards::{AgeGroupResolver, StandardKey, StandardsTable, TierLadder, resolve_event};
use crate::time::{parse_seconds, parse_time};

/// Grades swims against a loaded standards table.
#[derive(Debug, Clone)]
pub struct GradingEngine<'t> {
    table: &'t StandardsTable,
    resolver: AgeGroupResolver,
    gender: Gender,
    birthdate: Option<NaiveDate>,
    points_scale: f64,
}

impl<'t> GradingEngine<'t> {
    pub fn new(table: &'t StandardsTable, config: &GradingConfig) -> Result<Self, AppError> {
        config.validate()?;
        Ok(Self {
            table,
            resolver: config.resolver()?,
            gender: config.swimmer.gender,
            birthdate: config.swimmer.birthdate,
            points_scale: config.power_points.scale,
        })
    }

    /// The tier a swim earns, or the reason it earns none.
    pub fn classify(&self, record: &SwimRecord) -> Result<Tier, GradeError> {
        let seconds = swim_seconds(record)?;
        let (event, ladder) =
            self.ladder_for(record.date, record.age, record.distance, record.stroke, record.course)?;
        ladder
            .tier_for(seconds)
            .ok_or(GradeError::NoQualifyingTier { event, time: seconds })
    }

    /// The label for one swim: a tier, or the sentinel for its failure cause.
    pub fn grade(&self, record: &SwimRecord) -> GradeLabel {
        match self.classify(record) {
            Ok(tier) => GradeLabel::Tier(tier),
            Err(err) => {
                trace!(date = %record.date, event = %record.event(), %err, "swim not tiered");
                err.label()
            }
        }
    }

    /// Grade every record. Records are independent, so this fans out across
    /// threads; output order matches input order.
    pub fn grade_batch<'a>(&self, records: &'a [SwimRecord]) -> Vec<GradedSwim<'a>> {
        records
            .par_iter()
            .map(|record| GradedSwim {
                record,
                label: self.grade(record),
            })
            .collect()
    }

    /// Resolve era, bracket and event, then fetch the ladder.
    ///
    /// Returns the remapped event key alongside the ladder.
    pub fn ladder_for(
        &self,
        date: NaiveDate,
        age: Option<u32>,
        distance: u32,
        stroke: Stroke,
        course: Course,
    ) -> Result<(EventKey, &'t TierLadder), GradeError> {
        let (era, bracket) = self.resolver.resolve_with(date, age, self.birthdate)?;
        let event = resolve_event(distance, stroke, course);

        if !self.table.has_era(&era.label) {
            return Err(GradeError::EraNotInTable { era: era.label.clone() });
        }
        if course.standards_label().is_none() {
            return Err(GradeError::EventNotCataloged { event });
        }

        let key = StandardKey {
            era: era.label.clone(),
            bracket: bracket.label.clone(),
            gender: self.gender,
            course,
            event,
        };
        self.table
            .get(&key)
            .filter(|ladder| !ladder.is_empty())
            .map(|ladder| (event, ladder))
            .ok_or(GradeError::EventNotCataloged { event })
    }

    /// How a time would grade for the swimmer *now*, and how far it is from
    /// the next faster tier.
    pub fn progress(
        &self,
        time_seconds: f64,
        event: EventKey,
        course: Course,
        ctx: SwimmerContext,
    ) -> Result<ProgressInfo, GradeError> {
        let time = positive_time(parse_seconds(time_seconds)?)?;
        let (event, ladder) = self.ladder_for(ctx.date, Some(ctx.age), event.distance, event.stroke, course)?;

        let base = ProgressInfo {
            event,
            course,
            time_seconds: time,
            current_tier: None,
            current_tier_time: None,
            next_tier: None,
            next_tier_time: None,
            time_to_drop: 0.0,
            penetration_pct: 0.0,
        };

        let Some(current) = ladder.tier_for(time) else {
            // Nothing met yet: aim at the slowest tier on offer.
            let (target, target_time) = ladder
                .slowest()
                .ok_or(GradeError::EventNotCataloged { event })?;
            return Ok(ProgressInfo {
                next_tier: Some(target),
                next_tier_time: Some(target_time.seconds),
                time_to_drop: (time - target_time.seconds).max(0.0),
                ..base
            });
        };

        let current_time = ladder
            .get(current)
            .map(|q| q.seconds)
            .ok_or(GradeError::EventNotCataloged { event })?;

        match ladder.next_faster(current) {
            None => Ok(ProgressInfo {
                current_tier: Some(current),
                current_tier_time: Some(current_time),
                penetration_pct: 100.0,
                ..base
            }),
            Some((next, next_time)) => Ok(ProgressInfo {
                current_tier: Some(current),
                current_tier_time: Some(current_time),
                next_tier: Some(next),
                next_tier_time: Some(next_time.seconds),
                time_to_drop: (time - next_time.seconds).max(0.0),
                penetration_pct: penetration(current_time, next_time.seconds, time),
                ..base
            }),
        }
    }

    /// Fastest listed qualifying time for an event in the current bracket.
    pub fn top_tier_time(&self, event: EventKey, course: Course, ctx: SwimmerContext) -> Option<f64> {
        let (_, ladder) = self
            .ladder_for(ctx.date, Some(ctx.age), event.distance, event.stroke, course)
            .ok()?;
        ladder.fastest().map(|(_, q)| q.seconds)
    }

    /// Power points against the current bracket's top tier (0 when unavailable).
    pub fn power_points(&self, time_seconds: f64, event: EventKey, course: Course, ctx: SwimmerContext) -> u32 {
        self.top_tier_time(event, course, ctx)
            .map(|top| power_points_scaled(time_seconds, top, self.points_scale))
            .unwrap_or(0)
    }
}

/// Canonical seconds for a record.
///
/// A numeric `time_seconds` wins; otherwise the display string is parsed.
/// Zero counts as no time.
pub fn swim_seconds(record: &SwimRecord) -> Result<f64, GradeError> {
    let seconds = match record.time_seconds {
        Some(s) => parse_seconds(s)?,
        None => parse_time(&record.finals)?,
    };
    positive_time(seconds)
}

fn positive_time(seconds: f64) -> Result<f64, GradeError> {
    if seconds > 0.0 {
        Ok(seconds)
    } else {
        Err(GradeError::InvalidTime(seconds.to_string()))
    }
}

/// Percent of the gap between two tier times already covered, in `[0, 100]`.
fn penetration(current_tier_time: f64, next_tier_time: f64, time: f64) -> f64 {
    let span = current_tier_time - next_tier_time;
    if span <= 0.0 {
        return if time <= next_tier_time { 100.0 } else { 0.0 };
    }
    ((current_tier_time - time) / span * 100.0).clamp(0.0, 100.0)
}
