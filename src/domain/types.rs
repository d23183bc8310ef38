//! Shared domain types.
//!
//! These types are small and cheap to copy where possible so the engine can
//! pass them around by value:
//!
//! - pool/stroke/tier enums with their canonical labels
//! - the swim record handed over by the ingest layer
//! - grading outputs (`GradeLabel`, `GradedSwim`, `ProgressInfo`)

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Pool length convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
pub enum Course {
    /// Short course yards.
    Yards,
    /// Long course meters.
    #[serde(rename = "LCM")]
    Lcm,
    /// Short course meters. No standards exist for it, so it never grades.
    #[serde(rename = "SCM")]
    Scm,
}

impl Course {
    /// Label used in swim records and terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            Course::Yards => "Yards",
            Course::Lcm => "LCM",
            Course::Scm => "SCM",
        }
    }

    /// Label used as the course key in the standards file.
    ///
    /// `None` for courses that have no standards at all.
    pub fn standards_label(self) -> Option<&'static str> {
        match self {
            Course::Yards => Some("SCY"),
            Course::Lcm => Some("LCM"),
            Course::Scm => None,
        }
    }

    /// Parse a course key from the standards file (`SCY` / `LCM`).
    pub fn from_standards_label(label: &str) -> Option<Course> {
        match label.trim().to_ascii_uppercase().as_str() {
            "SCY" => Some(Course::Yards),
            "LCM" => Some(Course::Lcm),
            _ => None,
        }
    }

    /// Parse the course column of a swim record.
    pub fn from_label(label: &str) -> Option<Course> {
        match label.trim().to_ascii_lowercase().as_str() {
            "yards" | "yard" | "scy" | "y" => Some(Course::Yards),
            "lcm" | "l" | "meters" | "long course" => Some(Course::Lcm),
            "scm" | "s" | "short course meters" => Some(Course::Scm),
            _ => None,
        }
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Swimming stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stroke {
    Free,
    Back,
    Breast,
    Fly,
    #[serde(rename = "IM")]
    Im,
    /// Anything the ingest layer could not recognise. Never cataloged.
    Other,
}

impl Stroke {
    pub const RATED: [Stroke; 5] = [Stroke::Free, Stroke::Back, Stroke::Breast, Stroke::Fly, Stroke::Im];

    /// Canonical capitalised name, as used in standards event keys.
    pub fn display_name(self) -> &'static str {
        match self {
            Stroke::Free => "Free",
            Stroke::Back => "Back",
            Stroke::Breast => "Breast",
            Stroke::Fly => "Fly",
            Stroke::Im => "IM",
            Stroke::Other => "Other",
        }
    }

    /// Lenient stroke recognition for meet exports.
    ///
    /// Exact canonical names win; otherwise the first keyword found decides
    /// (`free`, `back`, `breast`, `fly`/`butterfly`, `im`/`individual`).
    pub fn from_label(label: &str) -> Stroke {
        let s = label.trim().to_ascii_lowercase();
        for stroke in Stroke::RATED {
            if s == stroke.display_name().to_ascii_lowercase() {
                return stroke;
            }
        }
        if s.contains("free") {
            Stroke::Free
        } else if s.contains("back") {
            Stroke::Back
        } else if s.contains("breast") {
            Stroke::Breast
        } else if s.contains("fly") {
            Stroke::Fly
        } else if s.contains("im") || s.contains("individual") {
            Stroke::Im
        } else {
            Stroke::Other
        }
    }
}

impl fmt::Display for Stroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Gender bracket of the standards table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Gender {
    #[default]
    Male,
    Female,
}

impl Gender {
    pub fn display_name(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }

    pub fn from_label(label: &str) -> Option<Gender> {
        match label.trim().to_ascii_lowercase().as_str() {
            "male" | "m" | "boys" => Some(Gender::Male),
            "female" | "f" | "girls" => Some(Gender::Female),
            _ => None,
        }
    }
}

/// Performance tier.
///
/// Variants are declared slowest-first so the derived `Ord` puts `Aaaa` on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    #[serde(rename = "B")]
    B,
    #[serde(rename = "BB")]
    Bb,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "AA")]
    Aa,
    #[serde(rename = "AAA")]
    Aaa,
    #[serde(rename = "AAAA")]
    Aaaa,
}

impl Tier {
    /// Ladder order used for grading: fastest first.
    pub const LADDER: [Tier; 6] = [Tier::Aaaa, Tier::Aaa, Tier::Aa, Tier::A, Tier::Bb, Tier::B];

    pub fn label(self) -> &'static str {
        match self {
            Tier::Aaaa => "AAAA",
            Tier::Aaa => "AAA",
            Tier::Aa => "AA",
            Tier::A => "A",
            Tier::Bb => "BB",
            Tier::B => "B",
        }
    }

    pub fn from_label(label: &str) -> Option<Tier> {
        Tier::LADDER
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(label.trim()))
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A race: distance plus stroke, formatted `"{distance} {stroke}"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventKey {
    pub distance: u32,
    pub stroke: Stroke,
}

impl EventKey {
    pub fn new(distance: u32, stroke: Stroke) -> Self {
        Self { distance, stroke }
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.distance, self.stroke)
    }
}

impl FromStr for EventKey {
    type Err = String;

    /// Accepts `"100 Free"` as well as the underscore form `"100_free"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (distance, stroke) = s
            .split_once([' ', '_'])
            .ok_or_else(|| format!("Invalid event '{s}'. Expected e.g. \"100 Free\"."))?;
        let distance = distance
            .trim()
            .parse::<u32>()
            .map_err(|_| format!("Invalid event distance in '{s}'."))?;
        let stroke = Stroke::from_label(stroke);
        if distance == 0 || stroke == Stroke::Other {
            return Err(format!("Invalid event '{s}'."));
        }
        Ok(EventKey::new(distance, stroke))
    }
}

impl Serialize for EventKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EventKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One cleaned swim, as handed over by the ingest layer.
#[derive(Debug, Clone, PartialEq)]
pub struct SwimRecord {
    pub date: NaiveDate,
    /// Age on the swim date, if the export carried it.
    pub age: Option<u32>,
    pub distance: u32,
    pub stroke: Stroke,
    /// Stroke text as exported, kept verbatim for write-back.
    pub stroke_label: String,
    pub course: Course,
    /// Course text as exported (`SCY`, `Yards`, `L`, ...).
    pub course_label: String,
    /// Prelim/final marker. Informational only.
    pub round: Option<String>,
    /// Display time as exported (e.g. `"1:02.34Y"`).
    pub finals: String,
    pub time_seconds: Option<f64>,
    pub meet: Option<String>,
}

impl SwimRecord {
    /// The event as swum, before any course remapping.
    pub fn event(&self) -> EventKey {
        EventKey::new(self.distance, self.stroke)
    }
}

/// Grading outcome for one swim: a tier or a sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GradeLabel {
    Tier(Tier),
    /// The event is cataloged but the swim met no listed tier (`"<B"`).
    BelowLowest,
    Unrated,
    /// The era is missing from the standards (`"Unrated (2024-2028)"`).
    UnratedEra(String),
    NoTime,
    /// Older than the oldest bracket.
    Old,
}

impl GradeLabel {
    pub fn tier(&self) -> Option<Tier> {
        match self {
            GradeLabel::Tier(t) => Some(*t),
            _ => None,
        }
    }

    /// True for labels whose swim still counts toward personal bests.
    pub fn counts_for_bests(&self) -> bool {
        !matches!(self, GradeLabel::Unrated | GradeLabel::UnratedEra(_) | GradeLabel::NoTime)
    }
}

impl fmt::Display for GradeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GradeLabel::Tier(t) => f.write_str(t.label()),
            GradeLabel::BelowLowest => f.write_str("<B"),
            GradeLabel::Unrated => f.write_str("Unrated"),
            GradeLabel::UnratedEra(era) => write!(f, "Unrated ({era})"),
            GradeLabel::NoTime => f.write_str("No Time"),
            GradeLabel::Old => f.write_str("Old"),
        }
    }
}

impl Serialize for GradeLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A swim paired with its grade. Borrows the record; never owns it.
#[derive(Debug, Clone)]
pub struct GradedSwim<'a> {
    pub record: &'a SwimRecord,
    pub label: GradeLabel,
}

/// The date and age that "current" standards are resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwimmerContext {
    pub date: NaiveDate,
    pub age: u32,
}

/// How close a time is to the next faster tier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressInfo {
    /// Event after course remapping.
    pub event: EventKey,
    pub course: Course,
    pub time_seconds: f64,
    pub current_tier: Option<Tier>,
    pub current_tier_time: Option<f64>,
    pub next_tier: Option<Tier>,
    pub next_tier_time: Option<f64>,
    /// Seconds still to drop to reach `next_tier` (never negative).
    pub time_to_drop: f64,
    /// Progress from the current tier toward the next, in `[0, 100]`.
    pub penetration_pct: f64,
}

impl ProgressInfo {
    /// True when there is no faster tier left to chase.
    pub fn at_top(&self) -> bool {
        self.next_tier.is_none()
    }
}
