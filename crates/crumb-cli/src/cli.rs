use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Store root used when neither `--config` nor `--root` is given.
pub const DEFAULT_ROOT: &str = ".crumb";

#[derive(Parser)]
#[command(
    name = "crumb",
    about = "Read and write path-addressed values in a crumb store",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// TOML store configuration
    #[arg(long, global = true, conflicts_with = "root")]
    pub config: Option<PathBuf>,

    /// Directory of a file-backed store
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the payload stored at a path
    Get(GetArgs),
    /// Store a payload at a path
    Set(SetArgs),
    /// Remove the payload at a path
    Delete(DeleteArgs),
    /// Remove every payload in the store
    Clear,
    /// List stored paths (file backend only)
    List,
    /// Show how a path parses
    Parse(ParseArgs),
}

#[derive(Args)]
pub struct GetArgs {
    pub path: String,
    /// Print the payload as hex even when it is valid UTF-8
    #[arg(long)]
    pub hex: bool,
}

#[derive(Args)]
pub struct SetArgs {
    pub path: String,
    pub value: String,
    /// Require the value to be JSON; it is stored in compact form
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct DeleteArgs {
    pub path: String,
}

#[derive(Args)]
pub struct ParseArgs {
    pub path: String,
}
