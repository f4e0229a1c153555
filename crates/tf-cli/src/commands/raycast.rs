use std::path::Path;

use colored::Colorize;
use tf_sim::World;

pub fn run(
    defs: Option<&Path>,
    map: &str,
    from: &str,
    dir: &str,
    distance: f32,
) -> Result<(), String> {
    let start = super::parse_vec3(from)?;
    let forward = super::parse_vec3(dir)?.normalize_or_zero();
    if forward == glam::Vec3::ZERO {
        return Err("direction must not be zero".into());
    }
    if !(distance.is_finite() && distance > 0.0) {
        return Err(format!("distance must be positive, got {distance}"));
    }

    let defs = super::load_definitions(defs)?;
    let world = World::new(defs, map).map_err(|e| e.to_string())?;
    let hit = world.raycast_all(start, forward, distance, None);

    println!(
        "  {} {} {}",
        "Ray".bold(),
        world.map.name(),
        format!("(from {start}, toward {forward}, max {distance})").dimmed()
    );
    if hit.did_impact {
        println!(
            "  {} at distance {:.3}",
            "HIT".green().bold(),
            hit.impact_distance
        );
        println!("  position {}", hit.impact_position);
        println!("  normal   {}", hit.impact_normal);
    } else {
        println!("  {} nothing within {distance}", "MISS".yellow().bold());
    }
    Ok(())
}
