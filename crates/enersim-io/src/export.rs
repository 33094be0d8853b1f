//! Write a filtered view back out as a table.
//!
//! Columns keep the source report's headers so an exported file can be
//! loaded again.

use std::fs::{self, File};
use std::path::Path;

use enersim_core::{FilteredView, Record};
#[cfg(feature = "parquet")]
use polars::prelude::ParquetWriter;
use polars::prelude::{CsvWriter, DataFrame, NamedFrom, SerWriter, Series};
use tracing::info;

use crate::columns;
use crate::error::{ExportError, ExportResult};

/// Build a DataFrame with one row per record of the view.
pub fn view_to_frame(view: &FilteredView<'_>) -> ExportResult<DataFrame> {
    let records = view.records();
    let df = DataFrame::new(vec![
        Series::new(columns::STATE, text_column(records, |r| &r.state)),
        Series::new(
            columns::MUNICIPALITY,
            text_column(records, |r| &r.municipality),
        ),
        Series::new(
            columns::ACTIVITY_CATEGORY,
            text_column(records, |r| &r.activity_category),
        ),
        Series::new(
            columns::ENERGY_SOURCE_TYPE,
            text_column(records, |r| &r.energy_source_type),
        ),
        Series::new(
            columns::YEAR,
            records.iter().map(|r| r.year).collect::<Vec<i32>>(),
        ),
        Series::new(
            columns::ENERGY_TJ,
            records.iter().map(|r| r.energy_tj).collect::<Vec<Option<f64>>>(),
        ),
        Series::new(
            columns::CO2_EMISSIONS,
            records
                .iter()
                .map(|r| r.co2_emissions)
                .collect::<Vec<Option<f64>>>(),
        ),
    ])?;
    Ok(df)
}

fn text_column<'a>(records: &[&'a Record], field: fn(&'a Record) -> &'a String) -> Vec<&'a str> {
    records.iter().map(|r| field(*r).as_str()).collect()
}

/// Write the view to `.csv` or `.parquet`, picked by extension.
pub fn write_view(view: &FilteredView<'_>, path: &Path) -> ExportResult<()> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();
    if extension != "csv" && extension != "parquet" {
        return Err(ExportError::UnsupportedFormat(path.to_path_buf()));
    }
    if cfg!(not(feature = "parquet")) && extension == "parquet" {
        return Err(ExportError::ParquetDisabled);
    }

    let mut df = view_to_frame(view)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    match extension.as_str() {
        #[cfg(feature = "parquet")]
        "parquet" => {
            ParquetWriter::new(&mut file).finish(&mut df)?;
        }
        _ => CsvWriter::new(&mut file).finish(&mut df)?,
    }
    info!(rows = df.height(), "Exported view to {}", path.display());
    Ok(())
}
