//! tickroll: apply note-sequence edits to saved song files

mod commands;
mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tickroll_core::Song;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use commands::Edit;
use config::{AppConfig, LoggingConfig};

#[derive(Parser)]
#[command(name = "tickroll", about = "Edit note sequences in saved song files")]
struct Cli {
    /// Song JSON file to read
    song: PathBuf,
    /// Write the edited song here instead of stdout
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,
    /// Restrict the command to one track
    #[arg(short, long, global = true)]
    track: Option<usize>,
    /// Config file to use instead of the user config
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print tracks, event counts and the current selection
    Info,
    #[command(flatten)]
    Edit(Edit),
}

fn init_logging(config: &LoggingConfig) {
    let mut directives = String::from("tickroll=info,tickroll_core=info");
    if let Some(extra) = &config.filter {
        directives.push(',');
        directives.push_str(extra);
    }
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(config::config_path);
    let (config, config_err) = match config::load_config(&config_path) {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };
    init_logging(&config.logging);
    if let Some(e) = config_err {
        tracing::warn!("Ignoring malformed config {}: {e}", config_path.display());
    }

    let json = std::fs::read_to_string(&cli.song)
        .with_context(|| format!("Failed to read {}", cli.song.display()))?;
    let song = Song::from_json(&json)
        .with_context(|| format!("Invalid song file {}", cli.song.display()))?;
    tracing::info!("Loaded {} ({} tracks)", cli.song.display(), song.tracks.len());

    let edit = match cli.command {
        Command::Info => {
            print!("{}", commands::describe(&song, config.editor.grid_ticks));
            return Ok(());
        }
        Command::Edit(edit) => edit,
    };

    let edited = commands::apply(&song, &edit, cli.track)?;
    if edited == song {
        tracing::warn!("{:?} left the song unchanged", edit);
    }

    let out = if config.output.pretty {
        edited.to_json_pretty()?
    } else {
        edited.to_json()?
    };

    match &cli.output {
        Some(path) => {
            std::fs::write(path, out)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote {}", path.display());
        }
        None => println!("{out}"),
    }
    Ok(())
}
