mod config;
mod sidecopy;

use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use clap_complete::Shell;

use crate::sidecopy::SideCopy;

#[derive(Parser)]
#[command(
    author,
    version,
    name = env!("CARGO_BIN_NAME"),
    about = "Copy files next to the target files that share their base name"
)]
pub struct Args {
    /// Source directory holding the files to copy
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    source: Option<PathBuf>,

    /// Target directory tree to copy into
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    target: Option<PathBuf>,

    /// File name suffix of the files to copy, for example ".srt"
    #[arg(short, long, allow_hyphen_values = true)]
    extension: Option<String>,

    /// Use a different settings file
    #[arg(short = 'C', long, value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Save the given source, target and extension as the stored settings and exit
    #[arg(short = 'S', long)]
    save: bool,

    /// Show the current settings, including command line overrides, and exit
    #[arg(short = 'c', long, conflicts_with = "save")]
    show: bool,

    /// Write the copy log to this file
    #[arg(short = 'L', long, value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    log: Option<PathBuf>,

    /// Do not write a copy log
    #[arg(short = 'N', long, conflicts_with = "log")]
    no_log: bool,

    /// Only print matches without copying
    #[arg(short, long)]
    print: bool,

    /// Print debug information
    #[arg(short = 'D', long)]
    debug: bool,

    /// Generate shell completion
    #[arg(short = 'l', long, name = "SHELL")]
    completion: Option<Shell>,

    /// Print verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if let Some(ref shell) = args.completion {
        sidecar_copy::generate_shell_completion(*shell, Args::command(), true, env!("CARGO_BIN_NAME"))
    } else {
        SideCopy::new(args)?.run()
    }
}
