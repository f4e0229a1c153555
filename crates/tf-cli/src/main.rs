//! CLI frontend for the Twinforge chess and arena simulation cores.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `tf_sim=debug`.
const LOG_ENV: &str = "TWINFORGE_LOG";

#[derive(Parser)]
#[command(
    name = "twinforge",
    about = "Twinforge: a chess rules engine and a headless arena simulation",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play chess moves from the standard position and print the board
    Chess {
        /// Moves such as "e2 e4", "e7 e8 q" or "from=e2 to=e4"
        moves: Vec<String>,

        /// Read moves from a file, one per line ('#' starts a comment)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Require the square a pawn skips on its double step to be empty
        #[arg(long)]
        strict_double_step: bool,

        /// Allow any owned piece to move anywhere not held by a friend
        #[arg(long)]
        teleport: bool,
    },

    /// Run the arena simulation headless and summarize the outcome
    Arena {
        /// Simulated seconds to run
        #[arg(short, long, default_value = "10")]
        seconds: f64,

        /// Frames per simulated second
        #[arg(long, default_value = "60")]
        fps: u32,

        /// RNG seed for deterministic runs
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Definitions JSON file (default: built-in definitions)
        #[arg(short, long)]
        defs: Option<PathBuf>,

        /// Map to load
        #[arg(short, long, default_value = "Arena")]
        map: String,

        /// Player slots; each is spawned at a player start and respawned on death
        #[arg(short, long, default_value = "0")]
        players: usize,

        /// Show every event instead of the notable ones
        #[arg(short, long)]
        verbose: bool,
    },

    /// Load a definitions file and build every map it declares
    Check {
        /// Definitions JSON file
        #[arg(short, long)]
        defs: PathBuf,
    },

    /// Cast a ray through an empty map and report what it hits
    Raycast {
        /// Ray origin as X,Y,Z
        #[arg(long, allow_hyphen_values = true)]
        from: String,

        /// Ray direction as X,Y,Z (normalized for you)
        #[arg(long, allow_hyphen_values = true)]
        dir: String,

        /// Maximum distance
        #[arg(long, default_value = "20")]
        distance: f32,

        /// Map to cast through
        #[arg(short, long, default_value = "Arena")]
        map: String,

        /// Definitions JSON file (default: built-in definitions)
        #[arg(long)]
        defs: Option<PathBuf>,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Chess {
            moves,
            file,
            strict_double_step,
            teleport,
        } => commands::chess::run(&moves, file.as_deref(), strict_double_step, teleport),
        Commands::Arena {
            seconds,
            fps,
            seed,
            defs,
            map,
            players,
            verbose,
        } => commands::arena::run(
            defs.as_deref(),
            &map,
            players,
            seconds,
            fps,
            seed,
            verbose,
        ),
        Commands::Check { defs } => commands::check::run(&defs),
        Commands::Raycast {
            from,
            dir,
            distance,
            map,
            defs,
        } => commands::raycast::run(defs.as_deref(), &map, &from, &dir, distance),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
