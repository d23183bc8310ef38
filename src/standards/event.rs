//! Course-dependent event resolution.
//!
//! Long course has no 500/1000/1650; the meters races that stand in for them
//! are 400/800/1500. Standards for long course are keyed by the meters
//! distance, so swims (and goals) quoted in yards distances are remapped first.

use crate::domain::{Course, EventKey, Stroke};

/// Yards distance -> long-course equivalent.
const LONG_COURSE_EQUIVALENTS: [(u32, u32); 3] = [(500, 400), (1000, 800), (1650, 1500)];

/// Build the standards event key for a swim.
///
/// Never fails: an event that is not in the table is a miss at lookup time.
pub fn resolve_event(distance: u32, stroke: Stroke, course: Course) -> EventKey {
    let distance = match course {
        Course::Lcm => LONG_COURSE_EQUIVALENTS
            .iter()
            .find(|(yards, _)| *yards == distance)
            .map(|(_, meters)| *meters)
            .unwrap_or(distance),
        Course::Yards | Course::Scm => distance,
    };
    EventKey::new(distance, stroke)
}
