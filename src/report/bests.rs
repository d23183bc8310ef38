//! Personal bests and the reports derived from them.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::ImxConfig;
use crate::domain::{Course, EventKey, GradeLabel, GradedSwim, ProgressInfo, Stroke, SwimmerContext, Tier};
use crate::error::GradeError;
use crate::grade::{GradingEngine, swim_seconds};
use crate::standards::resolve_event;
use crate::time::format_time;

/// Fastest swim in one (event, course).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonalBest {
    /// Event after course remapping, so a long-course `500 Free` lands on
    /// `400 Free`.
    pub event: EventKey,
    pub course: Course,
    pub seconds: f64,
    /// Display time, as exported when available.
    pub time: String,
    /// Grade the swim earned on the day.
    pub label: GradeLabel,
    pub date: NaiveDate,
    pub age: Option<u32>,
    pub meet: Option<String>,
}

/// Fastest swim per (event, course), sorted by stroke, distance, course.
///
/// Events are keyed after course remapping. Swims graded "Unrated",
/// "Unrated (era)" or "No Time" are left out; ties go to the earliest date.
pub fn personal_bests(graded: &[GradedSwim<'_>]) -> Vec<PersonalBest> {
    let mut best: BTreeMap<(Stroke, u32, Course), PersonalBest> = BTreeMap::new();

    for g in graded.iter().filter(|g| g.label.counts_for_bests()) {
        let Ok(seconds) = swim_seconds(g.record) else {
            continue;
        };
        let r = g.record;
        let event = resolve_event(r.distance, r.stroke, r.course);
        let key = (event.stroke, event.distance, r.course);
        let better = best
            .get(&key)
            .is_none_or(|cur| seconds < cur.seconds || (seconds == cur.seconds && r.date < cur.date));
        if !better {
            continue;
        }
        let time = match r.finals.trim() {
            "" => format_time(seconds),
            t => t.to_string(),
        };
        best.insert(
            key,
            PersonalBest {
                event,
                course: r.course,
                seconds,
                time,
                label: g.label.clone(),
                date: r.date,
                age: r.age,
                meet: r.meet.clone(),
            },
        );
    }

    best.into_values().collect()
}

/// Distances the dashboard lists for a stroke in a course.
pub fn contested_distances(stroke: Stroke, course: Course) -> &'static [u32] {
    match (stroke, course) {
        (Stroke::Free, Course::Yards) => &[50, 100, 200, 500, 1000, 1650],
        (Stroke::Free, _) => &[50, 100, 200, 400, 800, 1500],
        (Stroke::Back | Stroke::Breast | Stroke::Fly, _) => &[50, 100, 200],
        (Stroke::Im, Course::Yards) => &[100, 200, 400],
        (Stroke::Im, _) => &[200, 400],
        (Stroke::Other, _) => &[],
    }
}

/// Best per contested distance for one stroke and course (`None` where never swum).
pub fn stroke_bests(bests: &[PersonalBest], stroke: Stroke, course: Course) -> Vec<(u32, Option<&PersonalBest>)> {
    contested_distances(stroke, course)
        .iter()
        .map(|&distance| {
            let best = bests
                .iter()
                .find(|b| b.course == course && b.event == EventKey::new(distance, stroke));
            (distance, best)
        })
        .collect()
}

/// Progress from a personal best toward the next tier, graded "as of now".
#[derive(Debug, Clone)]
pub struct NextStandard<'b> {
    pub best: &'b PersonalBest,
    pub progress: Result<ProgressInfo, GradeError>,
    pub points: u32,
}

pub fn next_standards<'b>(
    engine: &GradingEngine<'_>,
    bests: &'b [PersonalBest],
    ctx: SwimmerContext,
) -> Vec<NextStandard<'b>> {
    bests
        .iter()
        .map(|best| NextStandard {
            best,
            progress: engine.progress(best.seconds, best.event, best.course, ctx),
            points: engine.power_points(best.seconds, best.event, best.course, ctx),
        })
        .collect()
}

/// One event's contribution to an IMX score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImxEntry {
    /// Event after course remapping.
    pub event: EventKey,
    pub best_seconds: Option<f64>,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImxScore {
    pub course: Course,
    pub entries: Vec<ImxEntry>,
    pub total: u32,
}

impl ImxScore {
    pub fn missing(&self) -> impl Iterator<Item = EventKey> + '_ {
        self.entries.iter().filter(|e| e.best_seconds.is_none()).map(|e| e.event)
    }

    pub fn is_complete(&self) -> bool {
        self.missing().next().is_none()
    }
}

/// Sum of power points over the configured event set for the swimmer's age.
pub fn imx_score(
    engine: &GradingEngine<'_>,
    bests: &[PersonalBest],
    course: Course,
    ctx: SwimmerContext,
    imx: &ImxConfig,
) -> ImxScore {
    let entries: Vec<ImxEntry> = imx
        .events_for(ctx.age)
        .iter()
        .map(|ev| {
            let event = resolve_event(ev.distance, ev.stroke, course);
            let best_seconds = bests
                .iter()
                .find(|b| b.course == course && b.event == event)
                .map(|b| b.seconds);
            let points = best_seconds
                .map(|s| engine.power_points(s, event, course, ctx))
                .unwrap_or(0);
            ImxEntry {
                event,
                best_seconds,
                points,
            }
        })
        .collect();
    let total = entries.iter().map(|e| e.points).sum();
    ImxScore { course, entries, total }
}

/// Count of swims per label, tiers fastest-first then sentinels.
pub fn label_counts(graded: &[GradedSwim<'_>]) -> Vec<(GradeLabel, usize)> {
    let mut counts: HashMap<&GradeLabel, usize> = HashMap::new();
    for g in graded {
        *counts.entry(&g.label).or_default() += 1;
    }
    let mut out: Vec<(GradeLabel, usize)> = counts.into_iter().map(|(l, n)| (l.clone(), n)).collect();
    out.sort_by(|a, b| label_order(&a.0).cmp(&label_order(&b.0)));
    out
}

fn label_order(label: &GradeLabel) -> (usize, &str) {
    let sentinel = Tier::LADDER.len();
    match label {
        GradeLabel::Tier(t) => (Tier::LADDER.iter().position(|x| x == t).unwrap_or(0), ""),
        GradeLabel::BelowLowest => (sentinel, ""),
        GradeLabel::Old => (sentinel + 1, ""),
        GradeLabel::Unrated => (sentinel + 2, ""),
        GradeLabel::UnratedEra(era) => (sentinel + 3, era.as_str()),
        GradeLabel::NoTime => (sentinel + 4, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GradingConfig;
    use crate::domain::SwimRecord;
    use crate::standards::fixtures;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rec(day: u32, distance: u32, stroke: Stroke, course: Course, finals: &str) -> SwimRecord {
        SwimRecord {
            date: date(2025, 1, day),
            age: Some(14),
            distance,
            stroke,
            stroke_label: stroke.display_name().to_string(),
            course,
            course_label: course.display_name().to_string(),
            round: None,
            finals: finals.to_string(),
            time_seconds: None,
            meet: Some(format!("Meet {day}")),
        }
    }

    fn ctx() -> SwimmerContext {
        SwimmerContext {
            date: date(2025, 2, 1),
            age: 14,
        }
    }

    fn records() -> Vec<SwimRecord> {
        vec![
            rec(5, 100, Stroke::Free, Course::Yards, "59.10Y"),
            rec(6, 100, Stroke::Free, Course::Yards, "58.42Y"),
            rec(7, 100, Stroke::Free, Course::Yards, "58.42Y"),
            rec(8, 100, Stroke::Free, Course::Yards, "DQ"),
            rec(9, 100, Stroke::Free, Course::Scm, "55.00S"),
            rec(10, 400, Stroke::Free, Course::Lcm, "4:50.00L"),
            rec(11, 200, Stroke::Im, Course::Yards, "2:40.00Y"),
            rec(12, 100, Stroke::Back, Course::Yards, "1:05.00Y"),
        ]
    }

    #[test]
    fn bests_keep_fastest_and_earliest_tie() {
        let table = fixtures::table();
        let engine = GradingEngine::new(&table, &GradingConfig::default()).unwrap();
        let records = records();
        let graded = engine.grade_batch(&records);
        let bests = personal_bests(&graded);

        let events: Vec<String> = bests.iter().map(|b| format!("{} {}", b.event, b.course)).collect();
        // 100 Back is uncataloged (Unrated) and SCM never grades.
        assert_eq!(events, vec!["100 Free Yards", "400 Free LCM", "200 IM Yards"]);

        let free = &bests[0];
        assert!((free.seconds - 58.42).abs() < 1e-9);
        assert_eq!(free.date, date(2025, 1, 6));
        assert_eq!(free.label, GradeLabel::Tier(Tier::Aa));
        assert_eq!(free.time, "58.42Y");

        // Below the slowest tier still counts.
        assert_eq!(bests[2].label, GradeLabel::BelowLowest);
    }

    #[test]
    fn contested_distances_by_course() {
        assert_eq!(contested_distances(Stroke::Free, Course::Yards), &[50, 100, 200, 500, 1000, 1650]);
        assert_eq!(contested_distances(Stroke::Free, Course::Lcm), &[50, 100, 200, 400, 800, 1500]);
        assert_eq!(contested_distances(Stroke::Im, Course::Lcm), &[200, 400]);
        assert!(contested_distances(Stroke::Other, Course::Yards).is_empty());
    }

    #[test]
    fn stroke_bests_fill_gaps_with_none() {
        let table = fixtures::table();
        let engine = GradingEngine::new(&table, &GradingConfig::default()).unwrap();
        let records = records();
        let graded = engine.grade_batch(&records);
        let bests = personal_bests(&graded);

        let free = stroke_bests(&bests, Stroke::Free, Course::Yards);
        assert_eq!(free.len(), 6);
        assert!(free[0].1.is_none());
        assert_eq!(free[1].0, 100);
        assert!(free[1].1.is_some());
    }

    #[test]
    fn long_course_yards_distance_merges_into_meters_event() {
        let table = fixtures::table();
        let config = GradingConfig::default();
        let engine = GradingEngine::new(&table, &config).unwrap();
        let records = vec![
            rec(5, 500, Stroke::Free, Course::Lcm, "4:50.00L"),
            rec(6, 400, Stroke::Free, Course::Lcm, "4:55.00L"),
        ];
        let graded = engine.grade_batch(&records);
        assert_eq!(graded[0].label, GradeLabel::Tier(Tier::Aa));

        let bests = personal_bests(&graded);
        assert_eq!(bests.len(), 1);
        assert_eq!(bests[0].event, EventKey::new(400, Stroke::Free));
        assert!((bests[0].seconds - 290.0).abs() < 1e-9);

        let lcm_free = stroke_bests(&bests, Stroke::Free, Course::Lcm);
        assert_eq!(lcm_free[3].0, 400);
        assert_eq!(lcm_free[3].1.map(|b| b.date), Some(date(2025, 1, 5)));

        let imx = imx_score(&engine, &bests, Course::Lcm, ctx(), &config.imx);
        assert_eq!(imx.entries[0].event, EventKey::new(400, Stroke::Free));
        assert_eq!(imx.entries[0].best_seconds, Some(290.0));
        assert!(imx.entries[0].points > 0);
        assert_eq!(imx.total, imx.entries[0].points);
    }

    #[test]
    fn next_standards_report_progress_and_points() {
        let table = fixtures::table();
        let engine = GradingEngine::new(&table, &GradingConfig::default()).unwrap();
        let records = records();
        let graded = engine.grade_batch(&records);
        let bests = personal_bests(&graded);
        let next = next_standards(&engine, &bests, ctx());

        let free = &next[0];
        let p = free.progress.as_ref().unwrap();
        assert_eq!(p.current_tier, Some(Tier::Aa));
        assert_eq!(p.next_tier, Some(Tier::Aaa));
        assert!((p.time_to_drop - 2.43).abs() < 1e-9);
        assert!(free.points > 0);
    }

    #[test]
    fn imx_counts_missing_events_as_zero() {
        let table = fixtures::table();
        let config = GradingConfig::default();
        let engine = GradingEngine::new(&table, &config).unwrap();
        let records = vec![
            rec(5, 500, Stroke::Free, Course::Yards, "5:10.00Y"),
            rec(6, 200, Stroke::Im, Course::Yards, "2:10.00Y"),
            rec(7, 400, Stroke::Free, Course::Lcm, "4:40.00L"),
        ];
        let graded = engine.grade_batch(&records);
        let bests = personal_bests(&graded);

        let scy = imx_score(&engine, &bests, Course::Yards, ctx(), &config.imx);
        assert_eq!(scy.entries.len(), 6);
        assert_eq!(scy.missing().count(), 4);
        assert!(!scy.is_complete());
        let free = engine.power_points(310.0, EventKey::new(500, Stroke::Free), Course::Yards, ctx());
        let im = engine.power_points(130.0, EventKey::new(200, Stroke::Im), Course::Yards, ctx());
        assert_eq!(scy.total, free + im);

        // Long course 500 Free is scored from the 400.
        let lcm = imx_score(&engine, &bests, Course::Lcm, ctx(), &config.imx);
        assert_eq!(lcm.entries[0].event, EventKey::new(400, Stroke::Free));
        assert_eq!(lcm.entries[0].best_seconds, Some(280.0));
        assert!(lcm.total > 0);
    }

    #[test]
    fn label_counts_in_ladder_order() {
        let table = fixtures::table();
        let engine = GradingEngine::new(&table, &GradingConfig::default()).unwrap();
        let records = records();
        let graded = engine.grade_batch(&records);
        let counts: Vec<(String, usize)> = label_counts(&graded)
            .into_iter()
            .map(|(l, n)| (l.to_string(), n))
            .collect();
        assert_eq!(
            counts,
            vec![
                ("AA".to_string(), 3),
                ("A".to_string(), 1),
                ("<B".to_string(), 1),
                ("Unrated".to_string(), 2),
                ("No Time".to_string(), 1),
            ]
        );
    }
}
