use serde::Serialize;
use std::io::{self, Write};

use anyhow::Result;

use enersim_cli::{
    cli::{CriteriaArgs, SimulationArgs},
    common::{resolve_criteria, App},
    render, OutputFormat,
};
use enersim_core::{pipeline, FilterCriteria, SimulationOutcome, SimulationParams};

#[derive(Serialize)]
struct SimulationPayload<'a> {
    criteria: &'a FilterCriteria,
    params: &'a SimulationParams,
    currency: &'a str,
    record_count: usize,
    simulation: Option<&'a SimulationOutcome>,
}

pub fn handle(app: &mut App, args: &CriteriaArgs, simulation: &SimulationArgs) -> Result<()> {
    let params = app.simulation_params(simulation)?;
    let dataset = app.dataset()?;
    let criteria = resolve_criteria(args, &dataset)?;
    let snapshot = pipeline::run(&dataset, &criteria, &params)?;

    let mut out = io::stdout().lock();
    match app.format {
        OutputFormat::Plain => {
            render::render_criteria(&mut out, &snapshot.criteria)?;
            match &snapshot.simulation {
                Some(outcome) => {
                    render::render_simulation(&mut out, outcome, params.percentage, app.currency())?
                }
                None => writeln!(out, "{}", render::NO_DATA_NOTICE)?,
            }
        }
        OutputFormat::Json => render::write_json(
            &mut out,
            &SimulationPayload {
                criteria: &snapshot.criteria,
                params: &params,
                currency: app.currency(),
                record_count: snapshot.view.len(),
                simulation: snapshot.simulation.as_ref(),
            },
        )?,
    }
    out.flush()?;
    Ok(())
}
