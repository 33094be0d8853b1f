use clap::Parser;
use std::io::{self, IsTerminal};
use std::process;
use tracing::{debug, error, Level};
use tracing_subscriber::FmtSubscriber;

use enersim_cli::{
    cli::{Cli, Commands, ConfigCommands},
    common::App,
    config::{self, EnersimConfig},
};

mod commands;

fn main() {
    let cli = Cli::parse();

    // A broken config file is reported after logging is up. `config init`
    // must work before the file exists.
    let loaded = match &cli.command {
        Commands::Config {
            command: ConfigCommands::Init,
        } => Ok(EnersimConfig::default()),
        _ => config::load_config(cli.config.as_deref()),
    };
    let level = cli.log_level.unwrap_or_else(|| {
        loaded
            .as_ref()
            .ok()
            .and_then(|config| config.logging.level.parse().ok())
            .unwrap_or(Level::WARN)
    });

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let config = match loaded {
        Ok(config) => config,
        Err(err) => {
            error!("{err:#}");
            process::exit(1);
        }
    };
    debug!(?config, "configuration loaded");

    let mut app = App::new(config, cli.data.clone(), cli.format);
    if let Err(err) = run(&cli, &mut app) {
        error!("{err:#}");
        process::exit(1);
    }
}

fn run(cli: &Cli, app: &mut App) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Options { state } => commands::options::handle(app, state.as_deref()),
        Commands::Filter {
            criteria,
            limit,
            out,
        } => commands::filter::handle(app, criteria, *limit, out.as_deref()),
        Commands::Summary { criteria } => commands::summary::handle(app, criteria),
        Commands::Simulate {
            criteria,
            simulation,
        } => commands::simulate::handle(app, criteria, simulation),
        Commands::Report {
            criteria,
            simulation,
        } => commands::report::handle(app, criteria, simulation),
        Commands::Interactive {
            criteria,
            simulation,
        } => commands::interactive::handle(app, criteria, simulation),
        Commands::Config { command } => {
            commands::config::handle(app, command, cli.config.as_deref())
        }
        Commands::Completions { shell, out } => commands::completions::handle(*shell, out.as_deref()),
    }
}
