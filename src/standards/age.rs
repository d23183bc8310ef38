//! Era and age-bracket resolution.
//!
//! Eras and brackets are data, not code: both come from `GradingConfig` and
//! are validated once when the resolver is built.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, GradeError};

/// A period during which one set of standards applies.
///
/// `starts_on` is inclusive, `ends_before` exclusive. Only the first era may
/// leave `starts_on` open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Era {
    pub label: String,
    #[serde(default)]
    pub starts_on: Option<NaiveDate>,
    #[serde(default)]
    pub ends_before: Option<NaiveDate>,
}

impl Era {
    fn starts_by(&self, date: NaiveDate) -> bool {
        self.starts_on.is_none_or(|start| start <= date)
    }

    fn ended_by(&self, date: NaiveDate) -> bool {
        self.ends_before.is_some_and(|end| date >= end)
    }
}

/// An inclusive age range (`min_age` open means "and under").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeBracket {
    pub label: String,
    #[serde(default)]
    pub min_age: Option<u32>,
    pub max_age: u32,
}

impl AgeBracket {
    pub fn contains(&self, age: u32) -> bool {
        self.min_age.is_none_or(|min| age >= min) && age <= self.max_age
    }
}

/// Maps (swim date, age) to (era, age bracket).
#[derive(Debug, Clone)]
pub struct AgeGroupResolver {
    eras: Vec<Era>,
    brackets: Vec<AgeBracket>,
}

impl AgeGroupResolver {
    pub fn new(eras: Vec<Era>, brackets: Vec<AgeBracket>) -> Result<Self, AppError> {
        validate_eras(&eras)?;
        validate_brackets(&brackets)?;
        Ok(Self { eras, brackets })
    }

    /// The era in effect on `date`. On a boundary day the later era wins.
    pub fn era_for(&self, date: NaiveDate) -> Result<&Era, GradeError> {
        self.eras
            .iter()
            .rev()
            .find(|era| era.starts_by(date))
            .filter(|era| !era.ended_by(date))
            .ok_or(GradeError::EraNotFound { date })
    }

    pub fn bracket_for(&self, age: u32) -> Result<&AgeBracket, GradeError> {
        self.brackets
            .iter()
            .find(|b| b.contains(age))
            .ok_or(GradeError::AgeOutOfRange { age })
    }

    /// Resolve both keys. The age check runs first so an over-age swim is
    /// always "Old", whatever its date.
    pub fn resolve(&self, date: NaiveDate, age: u32) -> Result<(&Era, &AgeBracket), GradeError> {
        let bracket = self.bracket_for(age)?;
        let era = self.era_for(date)?;
        Ok((era, bracket))
    }

    /// Resolve using the explicit age if present, else the birthdate.
    pub fn resolve_with(
        &self,
        date: NaiveDate,
        age: Option<u32>,
        birthdate: Option<NaiveDate>,
    ) -> Result<(&Era, &AgeBracket), GradeError> {
        let age = match (age, birthdate) {
            (Some(age), _) => age,
            (None, Some(born)) => age_on(born, date).ok_or(GradeError::AgeUnknown)?,
            (None, None) => return Err(GradeError::AgeUnknown),
        };
        self.resolve(date, age)
    }
}

/// Whole years between `birthdate` and `date` (not-yet-had-birthday rule).
///
/// `None` when `date` is before the birthdate.
pub fn age_on(birthdate: NaiveDate, date: NaiveDate) -> Option<u32> {
    let mut years = date.year() - birthdate.year();
    if (date.month(), date.day()) < (birthdate.month(), birthdate.day()) {
        years -= 1;
    }
    u32::try_from(years).ok()
}

fn validate_eras(eras: &[Era]) -> Result<(), AppError> {
    if eras.is_empty() {
        return Err(AppError::new(2, "Config error: at least one era is required."));
    }
    for (idx, era) in eras.iter().enumerate() {
        if era.label.trim().is_empty() {
            return Err(AppError::new(2, "Config error: era labels must not be empty."));
        }
        if idx > 0 && era.starts_on.is_none() {
            return Err(AppError::new(
                2,
                format!("Config error: era '{}' needs `starts_on` (only the first era may be open-ended).", era.label),
            ));
        }
        if let (Some(start), Some(end)) = (era.starts_on, era.ends_before) {
            if end <= start {
                return Err(AppError::new(
                    2,
                    format!("Config error: era '{}' ends before it starts.", era.label),
                ));
            }
        }
    }
    for pair in eras.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        let Some(next_start) = next.starts_on else { continue };
        if prev.starts_on.is_some_and(|s| s >= next_start) {
            return Err(AppError::new(
                2,
                format!("Config error: eras '{}' and '{}' are out of order.", prev.label, next.label),
            ));
        }
        if prev.ends_before.is_some_and(|e| e > next_start) {
            return Err(AppError::new(
                2,
                format!("Config error: eras '{}' and '{}' overlap.", prev.label, next.label),
            ));
        }
    }
    Ok(())
}

fn validate_brackets(brackets: &[AgeBracket]) -> Result<(), AppError> {
    if brackets.is_empty() {
        return Err(AppError::new(2, "Config error: at least one age bracket is required."));
    }
    for (idx, b) in brackets.iter().enumerate() {
        if idx > 0 && b.min_age.is_none() {
            return Err(AppError::new(
                2,
                format!("Config error: bracket '{}' needs `min_age` (only the first may be open).", b.label),
            ));
        }
        if b.min_age.is_some_and(|min| min > b.max_age) {
            return Err(AppError::new(2, format!("Config error: bracket '{}' has min_age > max_age.", b.label)));
        }
    }
    for pair in brackets.windows(2) {
        if pair[1].min_age.is_some_and(|min| min <= pair[0].max_age) {
            return Err(AppError::new(
                2,
                format!(
                    "Config error: brackets '{}' and '{}' overlap or are out of order.",
                    pair[0].label, pair[1].label
                ),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GradingConfig;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn default_resolver() -> AgeGroupResolver {
        let config = GradingConfig::default();
        AgeGroupResolver::new(config.eras, config.age_brackets).unwrap()
    }

    #[test]
    fn era_boundary_goes_to_later_era() {
        let r = default_resolver();
        assert_eq!(r.era_for(date(2024, 9, 1)).unwrap().label, "2024-2028");
        assert_eq!(r.era_for(date(2024, 8, 31)).unwrap().label, "2021-2024");
        assert_eq!(r.era_for(date(2015, 1, 1)).unwrap().label, "2021-2024");
    }

    #[test]
    fn bracket_boundaries_are_adjacent() {
        let r = default_resolver();
        assert_eq!(r.bracket_for(10).unwrap().label, "10&U");
        assert_eq!(r.bracket_for(11).unwrap().label, "11-12");
        assert_eq!(r.bracket_for(18).unwrap().label, "17-18");
        assert_eq!(r.bracket_for(19), Err(GradeError::AgeOutOfRange { age: 19 }));
    }

    #[test]
    fn age_is_checked_before_era() {
        let eras = vec![Era {
            label: "2024-2028".into(),
            starts_on: Some(date(2024, 9, 1)),
            ends_before: None,
        }];
        let r = AgeGroupResolver::new(eras, GradingConfig::default().age_brackets).unwrap();
        assert_eq!(
            r.resolve(date(2020, 1, 1), 20).unwrap_err(),
            GradeError::AgeOutOfRange { age: 20 }
        );
        assert_eq!(
            r.resolve(date(2020, 1, 1), 12).unwrap_err(),
            GradeError::EraNotFound { date: date(2020, 1, 1) }
        );
    }

    #[test]
    fn closed_era_rejects_later_dates() {
        let eras = vec![Era {
            label: "2021-2024".into(),
            starts_on: None,
            ends_before: Some(date(2024, 9, 1)),
        }];
        let r = AgeGroupResolver::new(eras, GradingConfig::default().age_brackets).unwrap();
        assert!(r.era_for(date(2024, 8, 31)).is_ok());
        assert!(matches!(r.era_for(date(2024, 9, 1)), Err(GradeError::EraNotFound { .. })));
    }

    #[test]
    fn age_on_uses_birthday_rule() {
        let born = date(2010, 11, 17);
        assert_eq!(age_on(born, date(2024, 11, 16)), Some(13));
        assert_eq!(age_on(born, date(2024, 11, 17)), Some(14));
        assert_eq!(age_on(born, date(2025, 1, 1)), Some(14));
        assert_eq!(age_on(born, date(2009, 1, 1)), None);
    }

    #[test]
    fn resolve_with_prefers_explicit_age() {
        let r = default_resolver();
        let born = Some(date(2010, 11, 17));
        let (_, b) = r.resolve_with(date(2024, 12, 1), Some(13), born).unwrap();
        assert_eq!(b.label, "13-14");
        let (_, b) = r.resolve_with(date(2027, 12, 1), None, born).unwrap();
        assert_eq!(b.label, "17-18");
        assert_eq!(r.resolve_with(date(2024, 12, 1), None, None).unwrap_err(), GradeError::AgeUnknown);
    }

    #[test]
    fn rejects_overlapping_configuration() {
        let brackets = vec![
            AgeBracket { label: "10&U".into(), min_age: None, max_age: 10 },
            AgeBracket { label: "10-12".into(), min_age: Some(10), max_age: 12 },
        ];
        assert!(AgeGroupResolver::new(GradingConfig::default().eras, brackets).is_err());

        let eras = vec![
            Era { label: "a".into(), starts_on: None, ends_before: None },
            Era { label: "b".into(), starts_on: None, ends_before: None },
        ];
        assert!(AgeGroupResolver::new(eras, GradingConfig::default().age_brackets).is_err());
    }
}
