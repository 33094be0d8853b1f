use std::io::{self, Write};

use anyhow::Result;

use enersim_cli::{
    cli::{CriteriaArgs, SimulationArgs},
    common::{resolve_criteria, App},
    render::{self, ReportPayload},
    OutputFormat,
};
use enersim_core::pipeline;

pub fn handle(app: &mut App, args: &CriteriaArgs, simulation: &SimulationArgs) -> Result<()> {
    let params = app.simulation_params(simulation)?;
    let dataset = app.dataset()?;
    let criteria = resolve_criteria(args, &dataset)?;
    let snapshot = pipeline::run(&dataset, &criteria, &params)?;

    let mut out = io::stdout().lock();
    match app.format {
        OutputFormat::Plain => {
            render::render_report(&mut out, &snapshot, params.percentage, app.currency())?
        }
        OutputFormat::Json => render::write_json(&mut out, &ReportPayload::from_snapshot(&snapshot))?,
    }
    out.flush()?;
    Ok(())
}
