//! Grading configuration.
//!
//! Everything the grader used to hardcode (birthdate, era cutoffs, age
//! brackets, the power-points scale) lives here and is handed to the engine at
//! construction time.
//!
//! Sources, lowest precedence first:
//! - built-in defaults (the 2021-2024 / 2024-2028 eras, five brackets)
//! - an optional TOML file (`--config`)
//! - `.env` / environment: `SWIM_BIRTHDATE`, `SWIM_AS_OF`, `SWIM_GENDER`

use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{EventKey, Gender, Stroke, SwimRecord, SwimmerContext};
use crate::error::AppError;
use crate::grade::points::DEFAULT_SCALE;
use crate::standards::{AgeBracket, AgeGroupResolver, Era, age_on};

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GradingConfig {
    pub swimmer: SwimmerProfile,
    pub eras: Vec<Era>,
    pub age_brackets: Vec<AgeBracket>,
    pub power_points: PowerPointsConfig,
    pub imx: ImxConfig,
}

/// The one swimmer this tracker follows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SwimmerProfile {
    /// Used when a record carries no age, and for "current" standards.
    pub birthdate: Option<NaiveDate>,
    pub gender: Gender,
    /// Date that "current" standards are resolved against (default: today).
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PowerPointsConfig {
    /// Multiplier applied to the top-tier time before the cubic ratio.
    pub scale: f64,
}

impl Default for PowerPointsConfig {
    fn default() -> Self {
        Self { scale: DEFAULT_SCALE }
    }
}

/// Event sets summed into the IMX score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImxConfig {
    /// Ages up to and including this use `junior_events`.
    pub junior_max_age: u32,
    pub junior_events: Vec<EventKey>,
    pub senior_events: Vec<EventKey>,
}

impl ImxConfig {
    pub fn events_for(&self, age: u32) -> &[EventKey] {
        if age <= self.junior_max_age {
            &self.junior_events
        } else {
            &self.senior_events
        }
    }
}

impl Default for ImxConfig {
    fn default() -> Self {
        let ev = EventKey::new;
        Self {
            junior_max_age: 12,
            junior_events: vec![
                ev(200, Stroke::Free),
                ev(100, Stroke::Back),
                ev(100, Stroke::Breast),
                ev(100, Stroke::Fly),
                ev(200, Stroke::Im),
            ],
            senior_events: vec![
                ev(500, Stroke::Free),
                ev(200, Stroke::Back),
                ev(200, Stroke::Breast),
                ev(200, Stroke::Fly),
                ev(200, Stroke::Im),
                ev(400, Stroke::Im),
            ],
        }
    }
}

impl Default for GradingConfig {
    fn default() -> Self {
        let bracket = |label: &str, min_age: Option<u32>, max_age: u32| AgeBracket {
            label: label.to_string(),
            min_age,
            max_age,
        };
        Self {
            swimmer: SwimmerProfile::default(),
            eras: vec![
                Era {
                    label: "2021-2024".to_string(),
                    starts_on: None,
                    ends_before: None,
                },
                Era {
                    label: "2024-2028".to_string(),
                    starts_on: NaiveDate::from_ymd_opt(2024, 9, 1),
                    ends_before: None,
                },
            ],
            age_brackets: vec![
                bracket("10&U", None, 10),
                bracket("11-12", Some(11), 12),
                bracket("13-14", Some(13), 14),
                bracket("15-16", Some(15), 16),
                bracket("17-18", Some(17), 18),
            ],
            power_points: PowerPointsConfig::default(),
            imx: ImxConfig::default(),
        }
    }
}

impl GradingConfig {
    /// Load defaults, then the TOML file (if any), then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let mut config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|e| {
                    AppError::new(2, format!("Failed to read config '{}': {e}", path.display()))
                })?;
                debug!(path = %path.display(), "loaded config file");
                Self::from_toml_str(&text)?
            }
            None => Self::default(),
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, AppError> {
        toml::from_str(text).map_err(|e| AppError::new(2, format!("Invalid config TOML: {e}")))
    }

    /// Apply `SWIM_*` overrides from a key lookup (the process environment in
    /// production).
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), AppError> {
        if let Some(v) = lookup("SWIM_BIRTHDATE").filter(|v| !v.trim().is_empty()) {
            self.swimmer.birthdate = Some(parse_env_date("SWIM_BIRTHDATE", &v)?);
        }
        if let Some(v) = lookup("SWIM_AS_OF").filter(|v| !v.trim().is_empty()) {
            self.swimmer.as_of = Some(parse_env_date("SWIM_AS_OF", &v)?);
        }
        if let Some(v) = lookup("SWIM_GENDER").filter(|v| !v.trim().is_empty()) {
            self.swimmer.gender = Gender::from_label(&v)
                .ok_or_else(|| AppError::new(2, format!("Invalid SWIM_GENDER '{v}'. Expected Male or Female.")))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), AppError> {
        self.resolver()?;
        let scale = self.power_points.scale;
        if !(scale.is_finite() && scale > 0.0) {
            return Err(AppError::new(2, format!("Config error: power_points.scale must be > 0 (got {scale}).")));
        }
        Ok(())
    }

    /// Build the era/bracket resolver (validates both lists).
    pub fn resolver(&self) -> Result<AgeGroupResolver, AppError> {
        AgeGroupResolver::new(self.eras.clone(), self.age_brackets.clone())
    }

    /// The (date, age) that "how would this grade today" questions use.
    ///
    /// With a birthdate the age is exact for the as-of date. Without one, fall
    /// back to the newest record's date and the oldest recorded age.
    pub fn current_context(&self, records: &[SwimRecord], today: NaiveDate) -> Option<SwimmerContext> {
        if let Some(born) = self.swimmer.birthdate {
            let date = self.swimmer.as_of.unwrap_or(today);
            return age_on(born, date).map(|age| SwimmerContext { date, age });
        }

        let age = records.iter().filter_map(|r| r.age).max()?;
        let date = self
            .swimmer
            .as_of
            .or_else(|| records.iter().map(|r| r.date).max())?;
        Some(SwimmerContext { date, age })
    }
}

fn parse_env_date(key: &str, value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::new(2, format!("Invalid {key} '{value}'. Expected YYYY-MM-DD.")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Course;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(date: NaiveDate, age: Option<u32>) -> SwimRecord {
        SwimRecord {
            date,
            age,
            distance: 100,
            stroke: Stroke::Free,
            stroke_label: "Free".into(),
            course: Course::Yards,
            course_label: "Yards".into(),
            round: None,
            finals: "58.42".into(),
            time_seconds: Some(58.42),
            meet: None,
        }
    }

    #[test]
    fn defaults_validate() {
        let config = GradingConfig::default();
        config.validate().unwrap();
        assert_eq!(config.eras.len(), 2);
        assert_eq!(config.age_brackets.len(), 5);
        assert!((config.power_points.scale - 0.9283).abs() < 1e-12);
    }

    #[test]
    fn toml_overrides_selected_sections() {
        let config = GradingConfig::from_toml_str(
            r#"
            [swimmer]
            birthdate = "2010-11-17"
            gender = "Male"

            [[eras]]
            label = "2021-2024"

            [[eras]]
            label = "2024-2028"
            starts_on = "2024-09-01"

            [[eras]]
            label = "2028-2032"
            starts_on = "2028-09-01"

            [imx]
            junior_max_age = 10
            junior_events = ["200 Free", "100_back"]
            "#,
        )
        .unwrap();
        config.validate().unwrap();
        assert_eq!(config.swimmer.birthdate, Some(date(2010, 11, 17)));
        assert_eq!(config.eras.len(), 3);
        assert_eq!(config.age_brackets.len(), 5);
        assert_eq!(config.imx.junior_events[1].to_string(), "100 Back");
        assert_eq!(config.imx.senior_events.len(), 6);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(GradingConfig::from_toml_str("[swimmer]\nbirthday = \"2010-11-17\"\n").is_err());
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = GradingConfig::default();
        config
            .apply_env(|key| match key {
                "SWIM_BIRTHDATE" => Some("2010-11-17".into()),
                "SWIM_GENDER" => Some("female".into()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.swimmer.birthdate, Some(date(2010, 11, 17)));
        assert_eq!(config.swimmer.gender, Gender::Female);

        let err = config.apply_env(|key| (key == "SWIM_AS_OF").then(|| "11/17/2010".to_string()));
        assert!(err.is_err());
    }

    #[test]
    fn current_context_from_birthdate() {
        let mut config = GradingConfig::default();
        config.swimmer.birthdate = Some(date(2010, 11, 17));
        config.swimmer.as_of = Some(date(2025, 3, 1));
        let ctx = config.current_context(&[], date(2030, 1, 1)).unwrap();
        assert_eq!(ctx, SwimmerContext { date: date(2025, 3, 1), age: 14 });
    }

    #[test]
    fn current_context_falls_back_to_records() {
        let config = GradingConfig::default();
        let records = vec![record(date(2024, 3, 1), Some(13)), record(date(2025, 2, 1), Some(14))];
        let ctx = config.current_context(&records, date(2030, 1, 1)).unwrap();
        assert_eq!(ctx, SwimmerContext { date: date(2025, 2, 1), age: 14 });
        assert!(config.current_context(&[], date(2030, 1, 1)).is_none());
    }

    #[test]
    fn imx_event_set_by_age() {
        let imx = ImxConfig::default();
        assert_eq!(imx.events_for(12).len(), 5);
        assert_eq!(imx.events_for(13).len(), 6);
    }
}
