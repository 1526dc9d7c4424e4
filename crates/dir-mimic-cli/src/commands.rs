use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "dir-mimic")]
#[command(
    about = "Record and replicate directory states using file identification",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create an inventory of a source directory
    Inventory(InventoryArgs),
    /// Reconcile a target directory against an inventory
    Mirror(MirrorArgs),
    /// Print configuration values
    PrintConfig,
}

#[derive(Debug, Args)]
pub struct InventoryArgs {
    /// Source directory to inventory
    pub source_dir: PathBuf,

    /// Output inventory file (default: inventory-<timestamp>.jsonl)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Identification level (1=name+size, 2=+sample hash, 3=+full hash)
    #[arg(short = 'L', long, value_parser = clap::value_parser!(u8).range(1..=3))]
    pub level: Option<u8>,

    /// Print per-file progress detail
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct MirrorArgs {
    /// Target directory to synchronize
    pub target_dir: PathBuf,

    /// Inventory file to mirror from
    #[arg(long)]
    pub inventory: PathBuf,

    /// Identification level (default: inferred from the inventory)
    #[arg(short = 'L', long, value_parser = clap::value_parser!(u8).range(1..=3))]
    pub level: Option<u8>,

    /// Actually perform file operations (default is dry-run)
    #[arg(long)]
    pub doit: bool,

    /// Delete files in the target that are not in the inventory
    #[arg(long)]
    pub delete_extra: bool,

    /// Echo unchanged files in the rendered plan
    #[arg(short, long)]
    pub verbose: bool,
}
