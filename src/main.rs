use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod cli_exec;

#[derive(Parser)]
#[command(name = "diffbar")]
#[command(about = "Compact staged/unstaged line-change summary for a file", long_about = None)]
struct Cli {
    /// Settings file (defaults to $DIFFBAR_CONFIG, then built-in defaults)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Default log level; RUST_LOG overrides it
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the change segment for a file once
    Show {
        file: PathBuf,
        /// Emit the styled segment as JSON
        #[arg(long)]
        json: bool,
        /// Print without colors
        #[arg(long)]
        plain: bool,
        /// Also print the staged/unstaged breakdown
        #[arg(long)]
        tooltip: bool,
    },

    /// Keep a live status strip for one or more files
    Watch {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Print the effective settings
    Config {
        /// Write the settings to this path instead of printing them
        #[arg(long, value_name = "PATH")]
        write: Option<PathBuf>,
    },
}

fn main() {
    if let Err(err) = cli_exec::run(Cli::parse()) {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}
