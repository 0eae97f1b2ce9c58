//! Root CLI structure for ds-tools

use clap::{Parser, Subcommand};

use crate::commands::convert::ConvertArgs;
use crate::commands::info::InfoArgs;

#[derive(Parser)]
#[command(name = "ds-tools")]
#[command(about = "Convert Spriter SCML projects into Don't Starve animation descriptors", long_about = None)]
#[command(version)]
#[command(author)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a project into build, animation and image descriptors
    Convert(ConvertArgs),

    /// Display the atlas folders, entities and animations of a project
    Info(InfoArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
