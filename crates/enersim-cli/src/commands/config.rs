use std::io::{self, Write};
use std::path::Path;

use anyhow::Result;

use enersim_cli::{
    cli::ConfigCommands,
    common::App,
    config::{config_path, ensure_config},
    render, OutputFormat,
};

pub fn handle(app: &App, command: &ConfigCommands, explicit: Option<&Path>) -> Result<()> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => config_path()?,
    };
    let mut out = io::stdout().lock();
    match command {
        ConfigCommands::Show => match app.format {
            OutputFormat::Plain => {
                writeln!(out, "# {}", path.display())?;
                write!(out, "{}", toml::to_string_pretty(&app.config)?)?;
            }
            OutputFormat::Json => render::write_json(&mut out, &app.config)?,
        },
        ConfigCommands::Init => {
            if ensure_config(&path)? {
                writeln!(out, "Wrote default config to {}", path.display())?;
            } else {
                writeln!(out, "Config already exists at {}", path.display())?;
            }
        }
    }
    out.flush()?;
    Ok(())
}
