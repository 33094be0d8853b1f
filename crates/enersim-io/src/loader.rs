//! Dataset loader for the consumption report.
//!
//! Workbooks (`.xlsx`, `.xlsm`, `.xlsb`, `.xls`, `.ods`) are read with
//! calamine, `.csv` files with the csv crate. Both backends produce header
//! text plus rows of [`RawCell`], and a single normalization pass turns those
//! into [`Record`]s:
//!
//! - text columns are trimmed and upper-cased
//! - energy and emissions are coerced to numbers, unparseable cells become
//!   missing values
//! - the year must be an integer; a bad year aborts the load
//! - fully blank rows are skipped

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use enersim_core::{Dataset, Record};

use crate::columns::{ColumnIndex, RawCell};
use crate::error::{LoadError, LoadResult};

/// Knobs for reading the source file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadOptions {
    /// Worksheet to read; the first sheet when unset
    #[serde(default)]
    pub sheet: Option<String>,
    /// CSV field delimiter; sniffed from the header line when unset
    #[serde(default)]
    pub delimiter: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Workbook,
    Csv,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> LoadResult<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|s| s.to_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(SourceFormat::Workbook),
            "csv" => Ok(SourceFormat::Csv),
            _ => Err(LoadError::UnsupportedFormat(extension)),
        }
    }
}

/// Load a dataset with default options.
pub fn load_dataset(path: impl AsRef<Path>) -> LoadResult<Dataset> {
    load_dataset_with(path, &LoadOptions::default())
}

pub fn load_dataset_with(path: impl AsRef<Path>, options: &LoadOptions) -> LoadResult<Dataset> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }
    let format = SourceFormat::from_path(path)?;
    info!("Loading dataset from {}", path.display());

    let (headers, rows) = match format {
        SourceFormat::Workbook => read_workbook(path, options.sheet.as_deref())?,
        SourceFormat::Csv => read_csv(path, options.delimiter)?,
    };
    let dataset = build_dataset(path, &headers, rows)?;
    info!(records = dataset.len(), "Loaded dataset from {}", path.display());
    Ok(dataset)
}

/// Normalize raw rows into records.
pub fn build_dataset(
    path: &Path,
    headers: &[String],
    rows: Vec<Vec<RawCell>>,
) -> LoadResult<Dataset> {
    let index = ColumnIndex::resolve(headers, path)?;
    let mut records = Vec::with_capacity(rows.len());
    let mut blank_rows = 0usize;
    let mut missing_energy = 0usize;
    let mut missing_co2 = 0usize;
    let empty = RawCell::Empty;

    for (offset, row) in rows.iter().enumerate() {
        if row.iter().all(RawCell::is_empty) {
            blank_rows += 1;
            continue;
        }
        let cell = |idx: usize| row.get(idx).unwrap_or(&empty);

        let year_cell = cell(index.year);
        let year = year_cell.to_year().ok_or_else(|| LoadError::InvalidYear {
            // header is row 1
            row: offset + 2,
            value: year_cell.to_label(),
        })?;

        let energy_tj = cell(index.energy_tj).to_number();
        let co2_emissions = cell(index.co2_emissions).to_number();
        missing_energy += usize::from(energy_tj.is_none());
        missing_co2 += usize::from(co2_emissions.is_none());

        records.push(Record::new(
            &cell(index.state).to_label(),
            &cell(index.municipality).to_label(),
            &cell(index.activity_category).to_label(),
            &cell(index.energy_source_type).to_label(),
            year,
            energy_tj,
            co2_emissions,
        ));
    }

    debug!(
        blank_rows,
        missing_energy, missing_co2, "coerced unreadable numeric cells to missing values"
    );
    if !records.is_empty() && missing_energy == records.len() {
        warn!("no row of {} has a readable energy value", path.display());
    }
    Ok(Dataset::new(records))
}

type RawTable = (Vec<String>, Vec<Vec<RawCell>>);

fn read_workbook(path: &Path, sheet: Option<&str>) -> LoadResult<RawTable> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet_name = match sheet {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| LoadError::EmptyWorkbook(path.to_path_buf()))?,
    };
    debug!("reading worksheet '{sheet_name}'");
    let range = workbook.worksheet_range(&sheet_name)?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .ok_or_else(|| LoadError::EmptyWorkbook(path.to_path_buf()))?
        .iter()
        .map(|cell| workbook_cell(cell).to_label())
        .collect();
    let body: Vec<Vec<RawCell>> = rows
        .map(|row| row.iter().map(workbook_cell).collect())
        .collect();
    Ok((headers, body))
}

fn workbook_cell(cell: &Data) -> RawCell {
    match cell {
        Data::Empty => RawCell::Empty,
        Data::String(s) => RawCell::from_text(s),
        Data::Float(f) => RawCell::Number(*f),
        Data::Int(i) => RawCell::Number(*i as f64),
        Data::Bool(b) => RawCell::Text(b.to_string()),
        Data::Error(_) => RawCell::Empty,
        Data::DateTime(dt) => RawCell::Number(dt.as_f64()),
        Data::DateTimeIso(s) => RawCell::from_text(s),
        Data::DurationIso(s) => RawCell::from_text(s),
    }
}

fn read_csv(path: &Path, delimiter: Option<u8>) -> LoadResult<RawTable> {
    let delimiter = match delimiter {
        Some(d) => d,
        None => sniff_delimiter(path)?,
    };
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)?;
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut body: Vec<Vec<RawCell>> = Vec::new();
    for record in reader.records() {
        let record = record?;
        body.push(record.iter().map(RawCell::from_text).collect());
    }
    Ok((headers, body))
}

/// Semicolon when the header line uses it and has no commas, comma otherwise.
fn sniff_delimiter(path: &Path) -> LoadResult<u8> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut first_line = String::new();
    BufReader::new(file)
        .read_line(&mut first_line)
        .map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    if first_line.contains(';') && !first_line.contains(',') {
        Ok(b';')
    } else {
        Ok(b',')
    }
}
