use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use enersim_cli::{
    cli::CriteriaArgs,
    common::{resolve_criteria, App},
    render, OutputFormat,
};
use enersim_core::{apply, FilterCriteria, Record};

#[derive(Serialize)]
struct FilterPayload<'a> {
    criteria: &'a FilterCriteria,
    record_count: usize,
    records: Vec<&'a Record>,
}

pub fn handle(
    app: &mut App,
    args: &CriteriaArgs,
    limit: Option<usize>,
    out_path: Option<&Path>,
) -> Result<()> {
    let dataset = app.dataset()?;
    let criteria = resolve_criteria(args, &dataset)?;
    let view = apply(&dataset, &criteria);
    let mut out = io::stdout().lock();

    if let Some(path) = out_path {
        enersim_io::write_view(&view, path)
            .with_context(|| format!("exporting records to {}", path.display()))?;
        info!(records = view.len(), path = %path.display(), "export finished");
        writeln!(out, "Wrote {} record(s) to {}", view.len(), path.display())?;
        return Ok(());
    }

    match app.format {
        OutputFormat::Plain => {
            render::render_criteria(&mut out, &criteria)?;
            if view.is_empty() {
                writeln!(out, "{}", render::NO_DATA_NOTICE)?;
            } else {
                render::render_records(&mut out, &view, limit)?;
            }
        }
        OutputFormat::Json => {
            let shown = limit.unwrap_or(view.len());
            let payload = FilterPayload {
                criteria: &criteria,
                record_count: view.len(),
                records: view.iter().take(shown).collect(),
            };
            render::write_json(&mut out, &payload)?;
        }
    }
    out.flush()?;
    Ok(())
}
