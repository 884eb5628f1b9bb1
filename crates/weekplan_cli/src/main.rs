//! CLI smoke entry point.
//!
//! # Responsibility
//! - Open a planner session from `WEEKPLAN_*` environment configuration.
//! - Print a deterministic summary of the current week for quick sanity checks.

use std::process::ExitCode;
use weekplan_core::stats::{day_task_counts, task_counts, total_completed_points};
use weekplan_core::{core_version, init_logging, DayId, PlannerConfig, PlannerSession};

fn main() -> ExitCode {
    let config = PlannerConfig::from_env();
    if let Some(log_dir) = &config.log_dir {
        if let Err(err) = init_logging(&config.log_level, log_dir) {
            eprintln!("weekplan logging disabled: {err}");
        }
    }

    let session = match PlannerSession::open(&config) {
        Ok(session) => session,
        Err(err) => {
            eprintln!("weekplan failed to open store: {err}");
            return ExitCode::FAILURE;
        }
    };

    let plan = session.repo().current_plan();
    let counts = task_counts(&plan);
    println!("weekplan_core version={}", core_version());
    println!("week={} label={}", plan.week_id, plan.week_label);
    println!(
        "tasks completed={} total={} percent={} points={}",
        counts.completed,
        counts.total,
        counts.percent,
        total_completed_points(&plan)
    );
    for day in DayId::ALL {
        let day_counts = day_task_counts(&plan, day);
        println!(
            "{} {}/{}",
            day.as_str(),
            day_counts.completed,
            day_counts.total
        );
    }
    ExitCode::SUCCESS
}
