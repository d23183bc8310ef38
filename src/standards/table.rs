//! The time-standards table.
//!
//! The standards file nests era → bracket → gender → course → event → tier.
//! Here that collapses into one flat map keyed by [`StandardKey`], so a lookup
//! is a single `Option` instead of five string indexings.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::ops::Bound;

use crate::domain::{Course, EventKey, Gender, Tier};

/// One qualifying time: canonical seconds plus the string it was quoted as.
#[derive(Debug, Clone, PartialEq)]
pub struct QualifyingTime {
    pub seconds: f64,
    pub display: String,
}

/// Qualifying times for one bucket, by tier.
///
/// Tiers may be missing (not offered). Faster tiers never have slower times
/// than slower tiers; `insert_checked` enforces this.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TierLadder {
    times: BTreeMap<Tier, QualifyingTime>,
}

impl TierLadder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a time, rejecting entries that would break monotonicity.
    pub fn insert_checked(&mut self, tier: Tier, time: QualifyingTime) -> Result<(), String> {
        let slower_neighbour = self.times.range(..tier).next_back();
        if let Some((slower, t)) = slower_neighbour {
            if time.seconds > t.seconds {
                return Err(format!(
                    "{tier} ({:.2}s) is slower than {slower} ({:.2}s)",
                    time.seconds, t.seconds
                ));
            }
        }
        let faster_neighbour = self.times.range((Bound::Excluded(tier), Bound::Unbounded)).next();
        if let Some((faster, t)) = faster_neighbour {
            if time.seconds < t.seconds {
                return Err(format!(
                    "{tier} ({:.2}s) is faster than {faster} ({:.2}s)",
                    time.seconds, t.seconds
                ));
            }
        }
        self.times.insert(tier, time);
        Ok(())
    }

    pub fn get(&self, tier: Tier) -> Option<&QualifyingTime> {
        self.times.get(&tier)
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Listed tiers, fastest first.
    pub fn iter(&self) -> impl Iterator<Item = (Tier, &QualifyingTime)> {
        self.times.iter().rev().map(|(t, q)| (*t, q))
    }

    pub fn fastest(&self) -> Option<(Tier, &QualifyingTime)> {
        self.times.iter().next_back().map(|(t, q)| (*t, q))
    }

    pub fn slowest(&self) -> Option<(Tier, &QualifyingTime)> {
        self.times.iter().next().map(|(t, q)| (*t, q))
    }

    /// Walk the ladder fastest-first; the first listed tier whose time is at
    /// or above `seconds` is the one achieved.
    pub fn tier_for(&self, seconds: f64) -> Option<Tier> {
        self.iter().find(|(_, q)| seconds <= q.seconds).map(|(t, _)| t)
    }

    /// The nearest listed tier faster than `tier`, skipping unlisted ones.
    pub fn next_faster(&self, tier: Tier) -> Option<(Tier, &QualifyingTime)> {
        self.times
            .range((Bound::Excluded(tier), Bound::Unbounded))
            .next()
            .map(|(t, q)| (*t, q))
    }
}

/// Composite lookup key for one ladder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StandardKey {
    pub era: String,
    pub bracket: String,
    pub gender: Gender,
    pub course: Course,
    pub event: EventKey,
}

/// Immutable once loaded; shared by reference across grading threads.
#[derive(Debug, Clone, Default)]
pub struct StandardsTable {
    ladders: HashMap<StandardKey, TierLadder>,
    eras: BTreeSet<String>,
}

impl StandardsTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that an era exists even if none of its ladders survive loading.
    pub fn add_era(&mut self, era: impl Into<String>) {
        self.eras.insert(era.into());
    }

    pub fn insert(&mut self, key: StandardKey, ladder: TierLadder) {
        self.eras.insert(key.era.clone());
        self.ladders.insert(key, ladder);
    }

    pub fn get(&self, key: &StandardKey) -> Option<&TierLadder> {
        self.ladders.get(key)
    }

    pub fn has_era(&self, era: &str) -> bool {
        self.eras.contains(era)
    }

    pub fn eras(&self) -> impl Iterator<Item = &str> {
        self.eras.iter().map(String::as_str)
    }

    /// Number of ladders.
    pub fn len(&self) -> usize {
        self.ladders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ladders.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Stroke;

    fn qt(seconds: f64) -> QualifyingTime {
        QualifyingTime {
            seconds,
            display: format!("{seconds:.2}"),
        }
    }

    fn ladder(times: &[(Tier, f64)]) -> TierLadder {
        let mut l = TierLadder::new();
        for (tier, s) in times {
            l.insert_checked(*tier, qt(*s)).unwrap();
        }
        l
    }

    #[test]
    fn tier_for_walks_fastest_first() {
        let l = ladder(&[(Tier::Aaaa, 53.99), (Tier::Aaa, 55.99), (Tier::Aa, 58.99), (Tier::A, 62.49)]);
        assert_eq!(l.tier_for(58.42), Some(Tier::Aa));
        assert_eq!(l.tier_for(58.99), Some(Tier::Aa));
        assert_eq!(l.tier_for(50.0), Some(Tier::Aaaa));
        assert_eq!(l.tier_for(62.50), None);
    }

    #[test]
    fn next_faster_skips_unlisted_tiers() {
        let l = ladder(&[(Tier::Aaaa, 50.0), (Tier::A, 60.0), (Tier::B, 70.0)]);
        assert_eq!(l.next_faster(Tier::B).map(|(t, _)| t), Some(Tier::A));
        assert_eq!(l.next_faster(Tier::A).map(|(t, _)| t), Some(Tier::Aaaa));
        assert!(l.next_faster(Tier::Aaaa).is_none());
        assert_eq!(l.fastest().map(|(t, _)| t), Some(Tier::Aaaa));
        assert_eq!(l.slowest().map(|(t, _)| t), Some(Tier::B));
    }

    #[test]
    fn insert_rejects_non_monotonic_times() {
        let mut l = ladder(&[(Tier::Aa, 58.99), (Tier::A, 62.49)]);
        assert!(l.insert_checked(Tier::Aaa, qt(59.50)).is_err());
        assert!(l.insert_checked(Tier::B, qt(60.00)).is_err());
        assert!(l.insert_checked(Tier::Aaa, qt(58.99)).is_ok());
        assert_eq!(l.len(), 3);
    }

    #[test]
    fn table_tracks_eras_separately_from_ladders() {
        let mut table = StandardsTable::new();
        table.add_era("2028-2032");
        let key = StandardKey {
            era: "2024-2028".into(),
            bracket: "13-14".into(),
            gender: Gender::Male,
            course: Course::Yards,
            event: EventKey::new(100, Stroke::Free),
        };
        table.insert(key.clone(), ladder(&[(Tier::A, 62.49)]));
        assert!(table.has_era("2028-2032"));
        assert!(table.has_era("2024-2028"));
        assert!(table.get(&key).is_some());
        assert_eq!(table.len(), 1);
    }
}
