use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use crate::leaderboard::{self, Leaderboard};

pub fn run(file: Option<&Path>) -> Result<(), String> {
    let path = leaderboard::resolve_path(file);
    let board = Leaderboard::load(&path)?;

    println!(
        "  {} {}",
        "High Scores".bold(),
        format!("({})", path.display()).dimmed()
    );
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Rank", "Score"]);
    for (i, score) in board.scores().iter().enumerate() {
        let shown = if *score == 0 {
            "--".to_string()
        } else {
            score.to_string()
        };
        table.add_row(vec![format!("#{}", i + 1), shown]);
    }
    println!("{table}");

    Ok(())
}
