// fret: inspect charts, check setlists and run autoplay simulations.

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "fret", about = "Five-lane rhythm chart engine")]
struct Args {
    /// Path to a rule config JSON file.
    #[arg(long, global = true, env = "FRET_RULE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode a chart and print its metadata and parts.
    Inspect {
        /// `.chart` or `.mid` file
        chart: PathBuf,
    },
    /// Load every song of a setlist and report the playable ones.
    Setlist {
        /// Setlist JSON file; chart paths are relative to it
        setlist: PathBuf,
    },
    /// Play a part with a simulated player and print the result.
    Autoplay {
        chart: PathBuf,

        /// Part to play, e.g. "Guitar - Expert".
        #[arg(long, default_value = "Guitar - Expert")]
        part: String,

        /// Scheduler ticks per second.
        #[arg(long, default_value_t = 60.0)]
        fps: f64,

        /// Fraction of notes to hit (0.0 - 1.0).
        #[arg(long, default_value_t = 1.0)]
        accuracy: f64,

        /// Activate boost whenever enough charge is stored.
        #[arg(long)]
        boost: bool,

        /// Print the summary as JSON.
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let rule = commands::load_rule_config(args.config.as_deref());

    match args.command {
        Command::Inspect { chart } => commands::inspect(&chart),
        Command::Setlist { setlist } => commands::setlist(&setlist),
        Command::Autoplay {
            chart,
            part,
            fps,
            accuracy,
            boost,
            json,
        } => commands::autoplay(
            &chart,
            &part,
            &rule,
            fret_play::AutoPlayer {
                fps,
                accuracy,
                use_boost: boost,
            },
            json,
        ),
    }
}
