use std::io::{self, Write};

use anyhow::Result;

use enersim_cli::{common::App, render, OutputFormat};
use enersim_core::FilterOptions;

pub fn handle(app: &mut App, state: Option<&str>) -> Result<()> {
    let dataset = app.dataset()?;
    let options = FilterOptions::from_dataset(&dataset, state);
    let mut out = io::stdout().lock();
    match app.format {
        OutputFormat::Plain => render::render_options(&mut out, &options)?,
        OutputFormat::Json => render::write_json(&mut out, &options)?,
    }
    out.flush()?;
    Ok(())
}
