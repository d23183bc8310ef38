//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the grading code stays clean and testable
//! - output changes are localized

use crate::domain::{Course, GradeLabel, GradedSwim, ProgressInfo, Stroke, SwimmerContext};
use crate::report::bests::{ImxScore, NextStandard, PersonalBest, label_counts};
use crate::time::format_time;

/// Header plus the count of swims per label.
pub fn format_grade_summary(graded: &[GradedSwim<'_>], rows_read: usize, row_errors: usize) -> String {
    let mut out = String::new();

    out.push_str("=== swimgrade - Standards Grading ===\n");
    out.push_str(&format!(
        "Rows: read={rows_read} | graded={} | skipped={row_errors}\n",
        graded.len()
    ));
    if let (Some(first), Some(last)) = (
        graded.iter().map(|g| g.record.date).min(),
        graded.iter().map(|g| g.record.date).max(),
    ) {
        out.push_str(&format!("Dates: {first} .. {last}\n"));
    }

    out.push_str("\nStandards achieved:\n");
    for (label, n) in label_counts(graded) {
        out.push_str(&format!("  {:<20} {n:>5}\n", label.to_string()));
    }

    out
}

/// One line per graded swim, in input order.
pub fn format_graded_table(graded: &[GradedSwim<'_>]) -> String {
    let mut out = String::new();
    push_line(
        &mut out,
        format!(
            "{:<10} {:>3} {:<10} {:<5} {:>10} {:<20} {:<24}",
            "date", "age", "event", "course", "time", "standard", "meet"
        ),
    );
    push_line(
        &mut out,
        format!(
            "{:-<10} {:-<3} {:-<10} {:-<5} {:-<10} {:-<20} {:-<24}",
            "", "", "", "", "", "", ""
        ),
    );

    for g in graded {
        let r = g.record;
        push_line(
            &mut out,
            format!(
                "{:<10} {:>3} {:<10} {:<5} {:>10} {:<20} {:<24}",
                r.date,
                r.age.map(|a| a.to_string()).unwrap_or_default(),
                truncate(&r.event().to_string(), 10),
                r.course.display_name(),
                truncate(&r.finals, 10),
                truncate(&g.label.to_string(), 20),
                truncate(r.meet.as_deref().unwrap_or(""), 24),
            ),
        );
    }

    out
}

/// Personal bests with their next target, graded as of `ctx`.
pub fn format_bests(next: &[NextStandard<'_>], ctx: Option<SwimmerContext>) -> String {
    let mut out = String::new();

    match ctx {
        Some(ctx) => out.push_str(&format!("Personal bests (targets as of {}, age {}):\n", ctx.date, ctx.age)),
        None => out.push_str("Personal bests:\n"),
    }
    push_line(
        &mut out,
        format!(
            "{:<10} {:<5} {:>10} {:<6} {:<10} {:<6} {:>9} {:>7} {:>6}",
            "event", "course", "time", "std", "date", "next", "drop", "pen%", "pts"
        ),
    );
    push_line(
        &mut out,
        format!(
            "{:-<10} {:-<5} {:-<10} {:-<6} {:-<10} {:-<6} {:-<9} {:-<7} {:-<6}",
            "", "", "", "", "", "", "", "", ""
        ),
    );

    for n in next {
        let b = n.best;
        let (next_tier, drop, pen) = match &n.progress {
            Ok(p) if p.at_top() => ("top".to_string(), "-".to_string(), format!("{:.1}", p.penetration_pct)),
            Ok(p) => (
                p.next_tier.map(|t| t.to_string()).unwrap_or_default(),
                format!("{:.2}", p.time_to_drop),
                format!("{:.1}", p.penetration_pct),
            ),
            Err(_) => ("-".to_string(), "-".to_string(), "-".to_string()),
        };
        push_line(
            &mut out,
            format!(
                "{:<10} {:<5} {:>10} {:<6} {:<10} {:<6} {:>9} {:>7} {:>6}",
                truncate(&b.event.to_string(), 10),
                b.course.display_name(),
                truncate(&b.time, 10),
                truncate(&b.label.to_string(), 6),
                b.date,
                next_tier,
                drop,
                pen,
                n.points,
            ),
        );
    }

    out
}

/// Contested distances for one stroke, with a placeholder where never swum.
pub fn format_stroke_bests(stroke: Stroke, course: Course, rows: &[(u32, Option<&PersonalBest>)]) -> String {
    let mut out = format!("{} ({}):\n", stroke, course);
    for (distance, best) in rows {
        match best {
            Some(b) => out.push_str(&format!(
                "  {distance:>5}  {:>10}  {:<6} {}\n",
                b.time,
                b.label.to_string(),
                b.date
            )),
            None => out.push_str(&format!("  {distance:>5}  {:>10}\n", "-")),
        }
    }
    out
}

/// Single progress query result.
pub fn format_progress(p: &ProgressInfo, points: u32) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} {}: {}\n",
        p.event,
        p.course.display_name(),
        format_time(p.time_seconds)
    ));

    let current = match (p.current_tier, p.current_tier_time) {
        (Some(t), Some(s)) => format!("{t} ({})", format_time(s)),
        _ => GradeLabel::BelowLowest.to_string(),
    };
    out.push_str(&format!("Current standard: {current}\n"));

    match (p.next_tier, p.next_tier_time) {
        (Some(t), Some(s)) => {
            out.push_str(&format!("Next standard:    {t} ({})\n", format_time(s)));
            out.push_str(&format!("Time to drop:     {:.2}s\n", p.time_to_drop));
        }
        _ => out.push_str("Next standard:    none (fastest standard achieved)\n"),
    }
    out.push_str(&format!("Progress:         {:.1}%\n", p.penetration_pct));
    out.push_str(&format!("Power points:     {points}\n"));
    out
}

pub fn format_imx(score: &ImxScore) -> String {
    let mut out = format!("IMX score ({}): {}\n", score.course.display_name(), score.total);
    for e in &score.entries {
        let time = e.best_seconds.map(format_time).unwrap_or_else(|| "-".to_string());
        out.push_str(&format!("  {:<10} {:>10} {:>6}\n", e.event.to_string(), time, e.points));
    }
    if !score.is_complete() {
        let missing: Vec<String> = score.missing().map(|e| e.to_string()).collect();
        out.push_str(&format!("  missing: {}\n", missing.join(", ")));
    }
    out
}

fn push_line(out: &mut String, line: String) {
    out.push_str(line.trim_end());
    out.push('\n');
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
