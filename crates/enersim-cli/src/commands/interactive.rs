use std::io::{self, Write};

use anyhow::{bail, Result};

use enersim_cli::{
    cli::{CriteriaArgs, SimulationArgs},
    common::{resolve_criteria, App},
    session::Session,
    OutputFormat,
};

pub fn handle(app: &mut App, args: &CriteriaArgs, simulation: &SimulationArgs) -> Result<()> {
    if app.format == OutputFormat::Json {
        bail!("interactive mode only supports plain output");
    }
    let params = app.simulation_params(simulation)?;
    let dataset = app.dataset()?;
    let criteria = resolve_criteria(args, &dataset)?;

    let mut session = Session::new(&dataset, criteria, params, app.currency());
    let stdin = io::stdin();
    let mut out = io::stdout().lock();
    writeln!(out, "Type 'help' for commands, 'quit' to leave.")?;
    session.run(stdin.lock(), &mut out)?;
    out.flush()?;
    Ok(())
}
