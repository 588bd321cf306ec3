//! vcomply CLI — the command-line interface for the vcomply compliance tool.
//!
//! Provides `vcomply create`, which validates a verification component
//! against the compliance contract and writes an editable compliance
//! testbench template next to the VC sources.

#![warn(missing_docs)]

mod create;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

/// vcomply — compliance testbenches for VUnit verification components.
#[derive(Parser, Debug)]
#[command(name = "vcomply", version, about = "VC compliance testbench generator")]
pub struct Cli {
    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate a verification component and write a testbench template.
    Create(CreateArgs),
}

/// Arguments for the `vcomply create` subcommand.
#[derive(Parser, Debug)]
pub struct CreateArgs {
    /// Path to the VHDL file containing the VC entity.
    pub entity: PathBuf,

    /// Path to the VHDL file containing the VC support package.
    pub package: PathBuf,

    /// Library the VC sources are compiled into.
    #[arg(short, long, default_value = "work")]
    pub library: String,

    /// Directory to write the template into, keeping the default filename.
    /// Defaults to a `.vc` directory beside the entity source.
    #[arg(short, long, conflicts_with = "output_path")]
    pub output_dir: Option<PathBuf>,

    /// Full output path for the template, overriding directory and filename.
    #[arg(long)]
    pub output_path: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Create(ref args) => create::run(args),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
