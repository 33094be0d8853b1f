use clap::{Args, CommandFactory, Parser, Subcommand, ValueHint};
use clap_complete::Shell;
use std::path::PathBuf;

use enersim_core::Selector;

use crate::common::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "enersim", author, version, about, long_about = None)]
pub struct Cli {
    /// Set the logging level (overrides the config file)
    #[arg(long, global = true)]
    pub log_level: Option<tracing::Level>,

    /// Configuration file (defaults to ~/.enersim/config/enersim.toml)
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Source report (.xlsx/.xls/.ods/.csv); overrides the configured path
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub data: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Plain)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the values offered by each filter
    Options {
        /// Also list the municipalities of this state
        #[arg(long)]
        state: Option<String>,
    },
    /// Show the records matching the filters
    Filter {
        #[command(flatten)]
        criteria: CriteriaArgs,
        /// Print at most this many rows
        #[arg(long)]
        limit: Option<usize>,
        /// Write the matching rows to a .csv or .parquet file instead
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: Option<PathBuf>,
    },
    /// Consumption and emission statistics, yearly trend and category ranking
    Summary {
        #[command(flatten)]
        criteria: CriteriaArgs,
    },
    /// Replace part of the consumption with solar generation
    Simulate {
        #[command(flatten)]
        criteria: CriteriaArgs,
        #[command(flatten)]
        simulation: SimulationArgs,
    },
    /// Every dashboard section for one selection
    Report {
        #[command(flatten)]
        criteria: CriteriaArgs,
        #[command(flatten)]
        simulation: SimulationArgs,
    },
    /// Line-oriented session: change filters and watch the dashboard update
    Interactive {
        #[command(flatten)]
        criteria: CriteriaArgs,
        #[command(flatten)]
        simulation: SimulationArgs,
    },
    /// Configuration file helpers
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: Shell,
        /// Write output to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

/// The five dashboard filters. "ALL" leaves a dimension unrestricted.
#[derive(Args, Debug, Clone)]
pub struct CriteriaArgs {
    /// State to analyse (defaults to the first state in the data)
    #[arg(long)]
    pub state: Option<String>,
    /// Municipality of the selected state
    #[arg(long, default_value = "ALL")]
    pub municipality: String,
    /// Activity category
    #[arg(long, default_value = "ALL")]
    pub category: String,
    /// Energy source type
    #[arg(long, default_value = "ALL")]
    pub source: String,
    /// Year
    #[arg(long, default_value = "ALL")]
    pub year: Selector<i32>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct SimulationArgs {
    /// Share of consumption replaced by solar, 0-100 (default from config)
    #[arg(long)]
    pub percent: Option<f64>,
    /// Price per kWh (default from config)
    #[arg(long)]
    pub unit_price: Option<f64>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Write the default configuration file if it does not exist
    Init,
}

pub fn build_cli_command() -> clap::Command {
    Cli::command()
}
