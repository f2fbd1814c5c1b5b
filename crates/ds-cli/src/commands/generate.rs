use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use ds_core::{GenConfig, WorldGenerator};

pub fn run(size: usize, seed: u64, json: bool) -> Result<(), String> {
    let config = GenConfig::default().with_grid_size(size);
    let generator = WorldGenerator::new(config).map_err(|e| e.to_string())?;
    let world = generator.generate_seeded(seed);

    if json {
        let out = serde_json::to_string_pretty(&world).map_err(|e| e.to_string())?;
        println!("{out}");
        return Ok(());
    }

    println!(
        "  {} {}",
        "World".bold(),
        format!("({size}x{size}, seed={seed})").dimmed()
    );
    println!();
    for line in world.render_ascii(None).lines() {
        println!("  {line}");
    }
    println!();

    let (cx, cy) = world.center();
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Stat", "Value"]);
    table.add_row(vec!["Rooms carved".to_string(), world.room_count().to_string()]);
    table.add_row(vec![
        "Reachable from home".to_string(),
        world.reachable_from(cx, cy).len().to_string(),
    ]);
    table.add_row(vec![
        "Resource caches".to_string(),
        world.resource_count().to_string(),
    ]);
    table.add_row(vec!["Creatures".to_string(), world.enemy_count().to_string()]);
    println!("{table}");
    println!(
        "  {}",
        "H home  @ player  R resources  E creature  . carved".dimmed()
    );

    Ok(())
}
