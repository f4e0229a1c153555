use std::path::Path;

use colored::Colorize;
use tf_sim::TileMap;

use super::plural;

pub fn run(path: &Path) -> Result<(), String> {
    let defs = super::load_definitions(Some(path))?;

    let mut maps = 0;
    for map_def in defs.maps() {
        let map = TileMap::from_definition(&defs, map_def)
            .map_err(|e| format!("{}: {e}", path.display()))?;
        let size = map.dimensions();
        println!(
            "  {} {} {}",
            "map".dimmed(),
            map.name().bold(),
            format!(
                "({}x{}, {} spawn{}, {} player start{})",
                size.x,
                size.y,
                map_def.spawns.len(),
                plural(map_def.spawns.len()),
                map_def.player_starts.len(),
                plural(map_def.player_starts.len()),
            )
            .dimmed()
        );
        maps += 1;
    }

    let actors = defs.actors().count();
    let weapons = defs.weapons().count();
    let tiles = defs.tiles().len();
    println!("  All checks passed for '{}'.", path.display());
    println!(
        "  {tiles} tile{}, {actors} actor{}, {weapons} weapon{}, {maps} map{}",
        plural(tiles),
        plural(actors),
        plural(weapons),
        plural(maps),
    );
    Ok(())
}
