pub mod cli;
pub mod common;
pub mod config;
pub mod render;
pub mod session;

pub use cli::{build_cli_command, Cli, Commands, ConfigCommands, CriteriaArgs, SimulationArgs};
pub use common::{resolve_criteria, App, OutputFormat};
