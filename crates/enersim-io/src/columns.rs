//! Source column names and cell coercion.
//!
//! The report ships with Portuguese headers. Matching is done on the trimmed,
//! lower-cased header text so "Estado " and "estado" both resolve.

use std::path::Path;

use crate::error::{LoadError, LoadResult};

pub const STATE: &str = "estado";
pub const MUNICIPALITY: &str = "municipio";
pub const ACTIVITY_CATEGORY: &str = "categoria de atividade";
pub const ENERGY_SOURCE_TYPE: &str = "tipo de fonte energetica";
pub const YEAR: &str = "ano";
pub const ENERGY_TJ: &str = "energia (TJ)";
pub const CO2_EMISSIONS: &str = "emissoes de co2";

/// Required columns, in the order records are built from them.
pub const REQUIRED: [&str; 7] = [
    STATE,
    MUNICIPALITY,
    ACTIVITY_CATEGORY,
    ENERGY_SOURCE_TYPE,
    YEAR,
    ENERGY_TJ,
    CO2_EMISSIONS,
];

/// A cell as read from either backend, before coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Empty,
    Text(String),
    Number(f64),
}

impl RawCell {
    pub fn from_text(text: &str) -> Self {
        if text.trim().is_empty() {
            RawCell::Empty
        } else {
            RawCell::Text(text.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, RawCell::Empty)
    }

    /// Text form for categorical columns. Whole numbers drop the ".0".
    pub fn to_label(&self) -> String {
        match self {
            RawCell::Empty => String::new(),
            RawCell::Text(text) => text.clone(),
            RawCell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            RawCell::Number(n) => n.to_string(),
        }
    }

    /// Numeric coercion; anything unparseable is a missing value.
    pub fn to_number(&self) -> Option<f64> {
        match self {
            RawCell::Empty => None,
            RawCell::Number(n) => n.is_finite().then_some(*n),
            RawCell::Text(text) => parse_number(text),
        }
    }

    /// Integral years only.
    pub fn to_year(&self) -> Option<i32> {
        let value = match self {
            RawCell::Empty => return None,
            RawCell::Number(n) => *n,
            RawCell::Text(text) => {
                let text = text.trim();
                if let Ok(year) = text.parse::<i32>() {
                    return Some(year);
                }
                text.parse::<f64>().ok()?
            }
        };
        let in_range = value >= f64::from(i32::MIN) && value <= f64::from(i32::MAX);
        (value.fract() == 0.0 && in_range).then_some(value as i32)
    }
}

fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    let parsed = match text.parse::<f64>() {
        Ok(value) => value,
        // decimal comma, as exported by pt-BR spreadsheets
        Err(_) if text.contains(',') && !text.contains('.') => {
            text.replace(',', ".").parse::<f64>().ok()?
        }
        Err(_) => return None,
    };
    parsed.is_finite().then_some(parsed)
}

/// Position of each required column in a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndex {
    pub state: usize,
    pub municipality: usize,
    pub activity_category: usize,
    pub energy_source_type: usize,
    pub year: usize,
    pub energy_tj: usize,
    pub co2_emissions: usize,
}

impl ColumnIndex {
    /// Resolve the required columns, reporting every missing one at once.
    pub fn resolve<S: AsRef<str>>(headers: &[S], path: &Path) -> LoadResult<Self> {
        let normalized: Vec<String> = headers
            .iter()
            // Excel's "CSV UTF-8" export prefixes the first header with a BOM
            .map(|h| h.as_ref().trim_start_matches('\u{feff}').trim().to_lowercase())
            .collect();
        let mut found = [0usize; 7];
        let mut missing = Vec::new();
        for (slot, name) in found.iter_mut().zip(REQUIRED) {
            let wanted = name.to_lowercase();
            match normalized.iter().position(|h| *h == wanted) {
                Some(idx) => *slot = idx,
                None => missing.push(name.to_string()),
            }
        }
        if !missing.is_empty() {
            return Err(LoadError::MissingColumns {
                path: path.to_path_buf(),
                missing,
            });
        }
        let [state, municipality, activity_category, energy_source_type, year, energy_tj, co2_emissions] =
            found;
        Ok(Self {
            state,
            municipality,
            activity_category,
            energy_source_type,
            year,
            energy_tj,
            co2_emissions,
        })
    }
}
