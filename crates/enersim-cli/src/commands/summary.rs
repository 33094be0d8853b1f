use serde::Serialize;
use std::io::{self, Write};

use anyhow::Result;

use enersim_cli::{
    cli::CriteriaArgs,
    common::{resolve_criteria, App},
    render, OutputFormat,
};
use enersim_core::{apply, summarize, AggregateSummary, FilterCriteria};

#[derive(Serialize)]
struct SummaryPayload<'a> {
    criteria: &'a FilterCriteria,
    record_count: usize,
    summary: Option<AggregateSummary>,
}

pub fn handle(app: &mut App, args: &CriteriaArgs) -> Result<()> {
    let dataset = app.dataset()?;
    let criteria = resolve_criteria(args, &dataset)?;
    let view = apply(&dataset, &criteria);
    let summary = match summarize(&view) {
        Ok(summary) => Some(summary),
        Err(err) if err.is_recognized_state() => None,
        Err(err) => return Err(err.into()),
    };

    let mut out = io::stdout().lock();
    match app.format {
        OutputFormat::Plain => {
            render::render_criteria(&mut out, &criteria)?;
            writeln!(out, "Records: {}", view.len())?;
            writeln!(out)?;
            match &summary {
                Some(summary) => render::render_summary(&mut out, summary)?,
                None => writeln!(out, "{}", render::NO_DATA_NOTICE)?,
            }
        }
        OutputFormat::Json => render::write_json(
            &mut out,
            &SummaryPayload {
                criteria: &criteria,
                record_count: view.len(),
                summary,
            },
        )?,
    }
    out.flush()?;
    Ok(())
}
