//! Command-line arguments.

use clap::Parser;
use std::path::PathBuf;

/// Storytime - interactive children's stories in your terminal
#[derive(Parser, Debug)]
#[command(name = "storytime")]
#[command(about = "Interactive children's stories written with a language model", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Configuration file layered over the defaults
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Model to use instead of the configured one
    #[arg(short, long)]
    pub model: Option<String>,

    /// Attempts per model call, including the first
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Write logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}
