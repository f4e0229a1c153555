use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use tracing::debug;

use tf_sim::{Controller, SimConfig, SimEventKind, Simulation};

use super::plural;

pub fn run(
    defs: Option<&Path>,
    map: &str,
    players: usize,
    seconds: f64,
    fps: u32,
    seed: u64,
    verbose: bool,
) -> Result<(), String> {
    if !(seconds.is_finite() && seconds >= 0.0) {
        return Err(format!("seconds must be a non-negative number, got {seconds}"));
    }
    let defs = super::load_definitions(defs)?;
    let config = SimConfig::default().with_seed(seed).with_max_events(2000);

    let mut sim = Simulation::new(defs, map, config)
        .map_err(|e| format!("simulation setup failed: {e}"))?;
    for _ in 0..players {
        sim.add_player();
    }
    let frames = sim
        .run_for(seconds, fps)
        .map_err(|e| format!("simulation error: {e}"))?;
    debug!(frames, events = sim.events().len(), "arena run finished");

    // Header
    println!(
        "  {} '{}' {}",
        "Arena".bold(),
        sim.world().map.name(),
        format!("({seconds}s at {fps} fps, seed={seed})").dimmed()
    );
    let living = sim.world().living_actors().count();
    println!(
        "  {frames} frame{}, {} events logged, {living} actor{} standing",
        plural(frames as usize),
        sim.events().len(),
        plural(living)
    );
    println!();

    // Events
    if verbose {
        println!("  {}", "Event Log".bold().underline());
        println!();
        for event in sim.events().events() {
            let frame = format!("[frame {:>5}]", event.frame).dimmed();
            println!("  {frame} {}", colorize_event(&event.kind, &event.description));
        }
        if sim.events().is_empty() {
            println!("  {}", "(no events)".dimmed());
        }
        println!();
    } else {
        let notable: Vec<_> = sim
            .events()
            .events()
            .iter()
            .filter(|e| matches!(e.kind, SimEventKind::Killed { .. }))
            .collect();
        if !notable.is_empty() {
            println!("  {}", "Notable Events".bold().underline());
            for event in notable {
                println!("  {}  {}", "KILL".red().bold(), event.description);
            }
            println!();
        }
    }

    // Actors
    println!("  {}", "Actors".bold().underline());
    println!();
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Handle", "Actor", "State", "Health", "Position", "Driver"]);
    for actor in sim.world().actors.iter() {
        if actor.is_projectile() || actor.definition.radius <= 0.0 {
            continue;
        }
        let p = actor.position;
        let driver = match actor.controller {
            Controller::Human { player } => format!("player {player}"),
            Controller::Ai => "ai".to_string(),
            Controller::None => "--".to_string(),
        };
        table.add_row(vec![
            actor.handle.to_string(),
            actor.name().to_string(),
            actor.state().to_string(),
            format!("{:.0}", actor.health.max(0.0)),
            format!("({:.2}, {:.2}, {:.2})", p.x, p.y, p.z),
            driver,
        ]);
    }
    println!("{table}");
    println!();

    // Scores
    if !sim.world().players.is_empty() {
        println!("  {}", "Players".bold().underline());
        for (index, player) in sim.world().players.iter().enumerate() {
            println!(
                "  player {index}: {} kill{}, {} death{}",
                player.kills,
                plural(player.kills as usize),
                player.deaths,
                plural(player.deaths as usize)
            );
        }
        println!();
    }

    Ok(())
}

fn colorize_event(kind: &SimEventKind, description: &str) -> colored::ColoredString {
    match kind {
        SimEventKind::Killed { .. } => description.red().bold(),
        SimEventKind::Damaged { .. } => description.red(),
        SimEventKind::WeaponFired { .. } => description.yellow(),
        SimEventKind::TargetAcquired { .. } => description.cyan(),
        SimEventKind::Possessed { .. } => description.green(),
        SimEventKind::Spawned { .. } | SimEventKind::Destroyed { .. } => description.blue(),
        SimEventKind::StateChanged { .. } => description.dimmed(),
    }
}
