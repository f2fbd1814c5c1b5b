use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use ds_core::Direction;
use ds_simulation::Engine;

/// Steps between day pulses in a headless run.
const STEPS_PER_DAY: u64 = 30;

/// Options for a headless run.
pub struct SimulateArgs<'a> {
    pub size: Option<usize>,
    pub seed: Option<u64>,
    pub max_steps: u64,
    pub config: Option<&'a Path>,
    pub verbose: bool,
    pub record: Option<&'a Path>,
}

pub fn run(args: SimulateArgs<'_>) -> Result<(), String> {
    let config = super::load_config(args.config, args.size, args.seed)?;
    let (size, seed) = (config.generation.grid_size, config.seed);
    let vitality_max = config.vitality_cap.unwrap_or(config.starting_vitality);
    let meter_max = config.enemy_meter_max;

    let mut engine = Engine::generate(config).map_err(|e| format!("generation failed: {e}"))?;
    let steps = run_headless(&mut engine, args.max_steps);

    // Header
    println!(
        "  {} {}",
        "Simulation".bold(),
        format!("({size}x{size}, seed={seed}, {steps} steps)").dimmed()
    );
    println!(
        "  {} rooms carved, {} events logged, {} elapsed",
        engine.world().room_count(),
        engine.events().len(),
        engine.clock().elapsed_label()
    );
    println!();

    if args.verbose {
        println!("  {}", "Event Log".bold().underline());
        println!();
        for event in engine.events().events() {
            if event.kind.is_hud() {
                continue;
            }
            let tick_label = format!("[tick {:>4}]", event.tick).dimmed();
            let desc = super::colorize_event(&event.kind, &event.description);
            println!("  {tick_label} {desc}");
        }
        println!();
    }

    // Run summary
    let player = engine.player();
    let summary = engine.summary();
    println!("  {}", "Run Summary".bold().underline());
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Stat", "Value"]);
    table.add_row(vec!["Days survived".to_string(), player.days_passed.to_string()]);
    table.add_row(vec![
        "Rooms visited".to_string(),
        player.rooms_visited.to_string(),
    ]);
    table.add_row(vec![
        "Vitality".to_string(),
        super::format_meter(player.vitality, vitality_max),
    ]);
    table.add_row(vec![
        "Enemy meter".to_string(),
        super::format_meter(player.enemy_meter, meter_max),
    ]);
    table.add_row(vec![
        "Outcome".to_string(),
        summary.map_or_else(|| "still alive".to_string(), |s| s.cause.to_string()),
    ]);
    table.add_row(vec!["Score".to_string(), player.score().to_string()]);
    println!("{table}");
    println!();

    match summary {
        Some(summary) => {
            println!(
                "  {} score {}",
                "GAME OVER".red().bold(),
                summary.score.to_string().bold()
            );
            if let Some(file) = args.record {
                super::record_score(file, &summary)?;
            }
        }
        None => println!(
            "  {}",
            format!("stopped after {steps} steps with the survivor still alive").yellow()
        ),
    }

    Ok(())
}

/// Drive `engine` with the explorer policy until the run ends or `max_steps`
/// is reached. Returns the number of steps taken.
///
/// Each step performs one action and then fires one vitality and one enemy
/// pulse; every 30th step also fires a day pulse.
pub fn run_headless(engine: &mut Engine, max_steps: u64) -> u64 {
    engine.start();
    let mut explorer = Explorer::default();
    let mut steps = 0;

    while steps < max_steps && engine.is_running() {
        steps += 1;
        explorer.act(engine);

        engine.tick_vitality();
        engine.tick_enemy();
        if steps % STEPS_PER_DAY == 0 {
            engine.tick_day();
        }
    }
    log::info!("headless run stopped after {steps} steps");
    steps
}

/// Depth-first explorer: walks to unvisited rooms, searches each new room
/// once, backtracks along its own trail and escapes creatures immediately.
#[derive(Debug, Default)]
pub struct Explorer {
    trail: Vec<Direction>,
    pending_search: bool,
}

impl Explorer {
    /// Take one action.
    pub fn act(&mut self, engine: &mut Engine) {
        if engine.hazard_present() {
            engine.escape();
        } else if self.pending_search {
            self.pending_search = false;
            engine.search();
        } else if let Some((dir, fresh)) = self.next_move(engine) {
            engine.move_player(dir);
            self.pending_search = fresh;
        }
    }

    fn next_move(&mut self, engine: &Engine) -> Option<(Direction, bool)> {
        let player = engine.player();
        let world = engine.world();
        let room = world.room(player.x, player.y)?;

        let unvisited = room.open_doors().find(|&dir| {
            world
                .neighbor(player.x, player.y, dir)
                .is_some_and(|n| !n.has_been_visited)
        });
        if let Some(dir) = unvisited {
            self.trail.push(dir);
            return Some((dir, true));
        }
        self.trail.pop().map(|dir| (dir.opposite(), false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ds_simulation::{EndCause, Phase, SimConfig};

    fn engine(seed: u64, size: usize) -> Engine {
        Engine::generate(SimConfig::default().with_seed(seed).with_grid_size(size)).unwrap()
    }

    #[test]
    fn headless_run_ends_in_game_over() {
        let mut engine = engine(42, 9);
        let steps = run_headless(&mut engine, 100_000);
        assert!(steps < 100_000);
        assert_eq!(engine.phase(), Phase::Ended);
        let summary = engine.summary().unwrap();
        assert_eq!(summary.cause, EndCause::Exhaustion);
        assert!(summary.rooms_visited > 1);
        assert_eq!(summary.score, summary.days_passed * summary.rooms_visited);
    }

    #[test]
    fn max_steps_stops_early() {
        let mut engine = engine(42, 9);
        assert_eq!(run_headless(&mut engine, 10), 10);
        assert!(engine.is_running());
        // Any cache found on the way tops vitality back up
        assert!((90..=100).contains(&engine.player().vitality));
    }

    #[test]
    fn explorer_visits_every_reachable_room() {
        let mut engine = engine(3, 7);
        let (cx, cy) = engine.world().center();
        let reachable = engine.world().reachable_from(cx, cy).len();
        engine.start();

        let mut explorer = Explorer::default();
        for _ in 0..reachable * 6 {
            if !engine.is_running() {
                break;
            }
            explorer.act(&mut engine);
        }
        assert_eq!(engine.world().visited_count(), reachable);
    }

    #[test]
    fn headless_runs_are_deterministic() {
        let mut a = engine(11, 11);
        let mut b = engine(11, 11);
        run_headless(&mut a, 5_000);
        run_headless(&mut b, 5_000);
        assert_eq!(a.summary(), b.summary());
        assert_eq!(a.events().len(), b.events().len());
    }
}
