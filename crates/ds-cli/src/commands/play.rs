//! Interactive run with live timers.

use std::path::Path;

use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};

use ds_core::Direction;
use ds_simulation::{Engine, EngineHandle, SimEvent, SimEventKind, spawn_engine};

/// Amplitude used by `shout` when none is given.
const DEFAULT_SHOUT: u32 = 20_000;

/// A line of player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlayCommand {
    Move(Direction),
    Search,
    Shake,
    Shout(u32),
    Map,
    Status,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Option<PlayCommand> {
    let mut words = line.split_whitespace();
    let head = words.next()?.to_ascii_lowercase();
    let command = match head.as_str() {
        "search" | "look" => PlayCommand::Search,
        "shake" => PlayCommand::Shake,
        "shout" => match words.next() {
            Some(amp) => PlayCommand::Shout(amp.parse().ok()?),
            None => PlayCommand::Shout(DEFAULT_SHOUT),
        },
        "map" | "m" => PlayCommand::Map,
        "status" => PlayCommand::Status,
        "help" | "?" => PlayCommand::Help,
        "quit" | "q" | "exit" => PlayCommand::Quit,
        other => PlayCommand::Move(Direction::from_str_tag(other)?),
    };
    Some(command)
}

pub fn run(
    size: Option<usize>,
    seed: Option<u64>,
    config: Option<&Path>,
    record: Option<&Path>,
) -> Result<(), String> {
    let config = super::load_config(config, size, seed)?;
    let engine = Engine::generate(config).map_err(|e| format!("generation failed: {e}"))?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("cannot start runtime: {e}"))?;
    let result = runtime.block_on(play(engine, record));
    // A pending stdin read would otherwise hold the runtime open.
    runtime.shutdown_background();
    result
}

async fn play(engine: Engine, record: Option<&Path>) -> Result<(), String> {
    println!("  {}", "The Desolate".bold());
    println!("  {}", "Type 'help' for commands.".dimmed());
    println!();

    let (handle, mut events) = spawn_engine(engine);
    handle.start().map_err(|e| e.to_string())?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else { break };
                print_event(&event);
                if let Some(summary) = event.summary() {
                    println!();
                    println!(
                        "  {} {} days, {} rooms, score {}",
                        "GAME OVER".red().bold(),
                        summary.days_passed,
                        summary.rooms_visited,
                        summary.score.to_string().bold()
                    );
                    if let Some(file) = record {
                        super::record_score(file, &summary)?;
                    }
                    return Ok(());
                }
            }
            line = lines.next_line() => {
                let Some(line) = line.map_err(|e| format!("cannot read input: {e}"))? else {
                    break;
                };
                if !dispatch(&handle, &line).await? {
                    break;
                }
            }
        }
    }

    print_status(&handle).await?;
    handle.shutdown().map_err(|e| e.to_string())?;
    Ok(())
}

/// Apply one input line. Returns `false` when the player quits.
async fn dispatch(handle: &EngineHandle, line: &str) -> Result<bool, String> {
    if line.trim().is_empty() {
        return Ok(true);
    }
    let Some(command) = parse_command(line) else {
        println!("  {}", format!("unknown command: {}", line.trim()).dimmed());
        return Ok(true);
    };
    let sent = match command {
        PlayCommand::Move(dir) => handle.move_player(dir),
        PlayCommand::Search => handle.search(),
        PlayCommand::Shake => handle.escape(),
        PlayCommand::Shout(amplitude) => handle.noise(amplitude),
        PlayCommand::Map => {
            let snapshot = handle.snapshot().await.map_err(|e| e.to_string())?;
            for row in snapshot.map.lines() {
                println!("  {row}");
            }
            Ok(())
        }
        PlayCommand::Status => return print_status(handle).await.map(|()| true),
        PlayCommand::Help => {
            print_help();
            Ok(())
        }
        PlayCommand::Quit => return Ok(false),
    };
    sent.map_err(|e| e.to_string())?;
    Ok(true)
}

async fn print_status(handle: &EngineHandle) -> Result<(), String> {
    let snapshot = handle.snapshot().await.map_err(|e| e.to_string())?;
    let player = &snapshot.player;
    println!(
        "  Day {}  Vitality {}  Rooms {}  Position ({}, {})  Score {}",
        player.days_passed,
        player.vitality,
        player.rooms_visited,
        player.display_x,
        player.display_y,
        player.score()
    );
    Ok(())
}

fn print_event(event: &SimEvent) {
    let text = match &event.kind {
        SimEventKind::VitalityChanged { vitality } if vitality % 10 != 0 && *vitality > 10 => {
            return;
        }
        SimEventKind::EnemyMeterChanged { meter } if meter % 10 != 0 && *meter > 10 => return,
        SimEventKind::PositionChanged { .. } | SimEventKind::GameOver(_) => return,
        _ => super::colorize_event(&event.kind, &event.description),
    };
    println!("  {text}");
}

fn print_help() {
    println!("  n / e / s / w    walk through a door");
    println!("  search           search the room for supplies");
    println!("  shake            shake off a creature");
    println!("  shout [amp]      make noise (creatures come)");
    println!("  map              show the map");
    println!("  status           show counters");
    println!("  quit             leave the run");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_moves() {
        assert_eq!(
            parse_command("n"),
            Some(PlayCommand::Move(Direction::North))
        );
        assert_eq!(
            parse_command("  West "),
            Some(PlayCommand::Move(Direction::West))
        );
        assert_eq!(parse_command("up"), None);
    }

    #[test]
    fn parse_actions() {
        assert_eq!(parse_command("search"), Some(PlayCommand::Search));
        assert_eq!(parse_command("shake"), Some(PlayCommand::Shake));
        assert_eq!(parse_command("Q"), Some(PlayCommand::Quit));
        assert_eq!(parse_command("map"), Some(PlayCommand::Map));
        assert_eq!(parse_command(""), None);
    }

    #[test]
    fn parse_shout_amplitude() {
        assert_eq!(parse_command("shout"), Some(PlayCommand::Shout(DEFAULT_SHOUT)));
        assert_eq!(parse_command("shout 12000"), Some(PlayCommand::Shout(12_000)));
        assert_eq!(parse_command("shout loud"), None);
    }
}
