//! CLI argument parsing

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "lathe")]
#[command(about = "Annotation-driven syntax tree rewriter", long_about = None)]
#[command(version)]
#[command(after_help = "Use 'lathe <command> --help' for more information about a command.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to ./lathe.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override a configuration key, e.g. lathe.allArgsFinal.flagUsage=WARNING
    #[arg(short = 'D', long = "set", value_name = "KEY=VALUE", global = true)]
    pub overrides: Vec<String>,

    /// More log output (repeat for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rewrite compilation units and print or write the result
    Rewrite {
        #[command(flatten)]
        input: InputArgs,

        /// Overwrite each input file with its rewritten unit
        #[arg(short, long, conflicts_with = "output")]
        in_place: bool,

        /// Write rewritten units into this directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run the pass and report diagnostics without writing anything
    Check {
        #[command(flatten)]
        input: InputArgs,
    },

    /// List registered handlers in dispatch order
    Handlers,

    /// List known configuration keys and their current values
    Keys,
}

#[derive(Args)]
pub struct InputArgs {
    /// Files or directories (searched for *.sexp)
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Diagnostic output format
    #[arg(long, value_enum, default_value_t = MessageFormat::Human)]
    pub message_format: MessageFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MessageFormat {
    Human,
    Json,
}
