// main.rs

mod builtins;
mod hint;
mod repl;
mod util;

use std::path::PathBuf;

use clap::Parser;
use linehistory::config::DEFAULT_MAX_LENGTH;
use linehistory::HistoryConfig;
use tracing_subscriber::{fmt, EnvFilter};

/// Interactive shell with persistent, searchable line history.
#[derive(Parser, Debug)]
#[command(name = "linehistory")]
struct Args {
    /// History file (defaults to ~/.linehistory)
    #[arg(long, env = "HISTFILE")]
    histfile: Option<PathBuf>,

    /// Entries kept when the history is written; negative keeps everything
    #[arg(long, env = "HISTSIZE", default_value_t = DEFAULT_MAX_LENGTH, allow_negative_numbers = true)]
    histsize: i64,
}

fn main() -> anyhow::Result<()> {
    // stderr keeps log lines off the prompt
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let args = Args::parse();
    let mut config = HistoryConfig::default().with_max_length(args.histsize);
    if let Some(path) = args.histfile {
        config = config.with_path(path);
    }
    let code = repl::start_repl(config)?;
    std::process::exit(code);
}
