//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and sets up logging
//! - loads config, standards and swim records
//! - grades swims and derives personal bests
//! - prints reports and writes optional exports

use chrono::{Local, NaiveDate};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{BestsArgs, Command, GradeArgs, ProgressArgs};
use crate::domain::{Course, Stroke, SwimmerContext};
use crate::error::AppError;
use crate::grade::GradingEngine;
use crate::report;
use crate::standards::age_on;

pub mod pipeline;

/// Entry point for the `swimgrade` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Grade(args) => handle_grade(args),
        Command::Bests(args) => handle_bests(args),
        Command::Progress(args) => handle_progress(args),
    }
}

/// Logs go to stderr so stdout carries only the report.
fn init_logging(verbose: bool) {
    let default = if verbose { "swim_standards=debug" } else { "swim_standards=info" };
    // A second init (tests, embedding) is harmless; keep the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn handle_grade(args: GradeArgs) -> Result<(), AppError> {
    let inputs = pipeline::load_inputs(&args.inputs)?;
    let engine = GradingEngine::new(&inputs.standards, &inputs.config)?;
    let run = pipeline::run_grade(&engine, &inputs, today());

    println!(
        "{}",
        report::format_grade_summary(&run.graded, inputs.ingest.rows_read, inputs.ingest.row_errors.len())
    );
    if args.table {
        println!("{}", report::format_graded_table(&run.graded));
    }

    if let Some(path) = &args.export {
        crate::io::write_graded_csv(path, &run.graded)?;
        info!(path = %path.display(), rows = run.graded.len(), "wrote graded CSV");
    }

    Ok(())
}

fn handle_bests(args: BestsArgs) -> Result<(), AppError> {
    let inputs = pipeline::load_inputs(&args.inputs)?;
    let engine = GradingEngine::new(&inputs.standards, &inputs.config)?;
    let run = pipeline::run_grade(&engine, &inputs, today());

    let bests: Vec<_> = run
        .bests
        .into_iter()
        .filter(|b| args.course.is_none_or(|c| b.course == c))
        .collect();
    if bests.is_empty() {
        return Err(AppError::new(3, "No personal bests to report."));
    }

    let courses: Vec<Course> = match args.course {
        Some(c) => vec![c],
        None => vec![Course::Yards, Course::Lcm],
    };

    let next = match run.context {
        Some(ctx) => report::next_standards(&engine, &bests, ctx),
        None => Vec::new(),
    };
    let imx: Vec<_> = match (args.imx, run.context) {
        (true, Some(ctx)) => courses
            .iter()
            .map(|&c| report::imx_score(&engine, &bests, c, ctx, &inputs.config.imx))
            .collect(),
        _ => Vec::new(),
    };

    if args.json {
        let rows: Vec<serde_json::Value> = if next.is_empty() {
            bests.iter().map(|b| serde_json::json!({ "best": b })).collect()
        } else {
            next.iter()
                .map(|n| {
                    serde_json::json!({
                        "best": n.best,
                        "progress": n.progress.as_ref().ok(),
                        "points": n.points,
                    })
                })
                .collect()
        };
        let doc = serde_json::json!({
            "context": run.context.map(|c| serde_json::json!({ "date": c.date, "age": c.age })),
            "bests": rows,
            "imx": imx,
        });
        let text = serde_json::to_string_pretty(&doc)
            .map_err(|e| AppError::new(4, format!("Failed to serialize bests: {e}")))?;
        println!("{text}");
        return Ok(());
    }

    if next.is_empty() {
        // No "now" to grade against: show bests with the grade earned on the day.
        for b in &bests {
            println!("{:<10} {:<5} {:>10} {} ({})", b.event.to_string(), b.course.display_name(), b.time, b.label, b.date);
        }
    } else {
        println!("{}", report::format_bests(&next, run.context));
    }

    if args.by_stroke {
        for &course in &courses {
            for stroke in Stroke::RATED {
                let rows = report::stroke_bests(&bests, stroke, course);
                println!("{}", report::format_stroke_bests(stroke, course, &rows));
            }
        }
    }

    for score in &imx {
        println!("{}", report::format_imx(score));
    }

    Ok(())
}

fn handle_progress(args: ProgressArgs) -> Result<(), AppError> {
    let config = pipeline::load_config(args.config.as_deref())?;
    let standards = crate::io::load_standards(&args.standards)?;
    let engine = GradingEngine::new(&standards, &config)?;

    let date = args.date.or(config.swimmer.as_of).unwrap_or_else(today);
    let age = args
        .age
        .or_else(|| config.swimmer.birthdate.and_then(|born| age_on(born, date)))
        .ok_or_else(|| AppError::new(2, "No age known: pass --age or configure swimmer.birthdate."))?;
    let ctx = SwimmerContext { date, age };

    let time = crate::time::parse_time(&args.time)
        .map_err(|e| AppError::new(2, format!("Invalid --time '{}': {e}", args.time)))?;

    let progress = engine
        .progress(time, args.event, args.course, ctx)
        .map_err(|e| AppError::new(3, format!("No standards for {} {} at age {age} on {date}: {e}", args.event, args.course)))?;
    let points = engine.power_points(time, args.event, args.course, ctx);

    if args.json {
        let doc = serde_json::json!({ "progress": progress, "points": points });
        let text = serde_json::to_string_pretty(&doc)
            .map_err(|e| AppError::new(4, format!("Failed to serialize progress: {e}")))?;
        println!("{text}");
    } else {
        println!("{}", report::format_progress(&progress, points));
    }

    Ok(())
}
