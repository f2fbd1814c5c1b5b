pub mod generate;
pub mod play;
pub mod scores;
pub mod simulate;

use std::fs;
use std::path::Path;

use colored::Colorize;
use ds_simulation::{RunSummary, SimConfig, SimEventKind};

use crate::leaderboard::Leaderboard;

/// Build a run config from an optional JSON file, then apply flag overrides.
fn load_config(
    file: Option<&Path>,
    size: Option<usize>,
    seed: Option<u64>,
) -> Result<SimConfig, String> {
    let mut config = match file {
        Some(path) => {
            let text = fs::read_to_string(path)
                .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
            SimConfig::from_json(&text).map_err(|e| format!("{}: {e}", path.display()))?
        }
        None => SimConfig::default(),
    };
    if let Some(size) = size {
        config = config.with_grid_size(size);
    }
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

/// Add a finished run to the leaderboard at `file` and report its rank.
fn record_score(file: &Path, summary: &RunSummary) -> Result<(), String> {
    let mut board = Leaderboard::load(file)?;
    match board.insert(summary.score) {
        Some(rank) => {
            board.save(file)?;
            println!(
                "  {} score {} entered the leaderboard at #{rank}",
                "NEW".green().bold(),
                summary.score
            );
        }
        None => println!(
            "  {}",
            format!("score {} did not make the leaderboard", summary.score).dimmed()
        ),
    }
    Ok(())
}

fn colorize_event(kind: &SimEventKind, description: &str) -> colored::ColoredString {
    match kind {
        SimEventKind::GameOver(_) => description.red().bold(),
        SimEventKind::HazardChanged { present: true } => description.red(),
        SimEventKind::HazardChanged { present: false } => description.green(),
        SimEventKind::EnemiesSpread { .. } => description.yellow(),
        SimEventKind::ResourcesFound => description.green(),
        SimEventKind::Blocked { .. } | SimEventKind::ResourcesNotFound => description.dimmed(),
        SimEventKind::Narrated { .. } => description.normal(),
        _ => description.cyan(),
    }
}

fn format_meter(value: i32, max: i32) -> String {
    let ratio = if max > 0 {
        f64::from(value.clamp(0, max)) / f64::from(max)
    } else {
        0.0
    };
    let filled = (ratio * 10.0).round() as usize;
    let empty = 10_usize.saturating_sub(filled);
    let bar = format!("{}{}", "#".repeat(filled), "-".repeat(empty));

    if ratio <= 0.15 {
        format!("[{}] {value:>3}", bar.red())
    } else if ratio <= 0.4 {
        format!("[{}] {value:>3}", bar.yellow())
    } else {
        format!("[{}] {value:>3}", bar.green())
    }
}
