//! Aggregates over a filtered view.
//!
//! Missing values are skipped per field: a record without `energy_tj` still
//! contributes its `co2_emissions`, and the other way round. When a field has
//! no values at all its total is reported as `None` ("no data") instead of
//! a zero that would look like a real measurement.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::filter::FilteredView;
use crate::record::Record;

/// Number of categories kept in the consumption ranking.
pub const TOP_CATEGORY_LIMIT: usize = 10;

/// Running statistics over the non-missing values of one numeric field.
///
/// Serialized through [`FieldStatsReport`] so a field without data shows
/// `null` totals instead of a `0.0` sum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(into = "FieldStatsReport")]
pub struct FieldStats {
    /// Number of non-missing values seen
    pub count: usize,
    pub sum: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl FieldStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.min = Some(self.min.map_or(value, |m| m.min(value)));
        self.max = Some(self.max.map_or(value, |m| m.max(value)));
    }

    /// Skips `None`.
    pub fn push_opt(&mut self, value: Option<f64>) {
        if let Some(value) = value {
            self.push(value);
        }
    }

    pub fn has_data(&self) -> bool {
        self.count > 0
    }

    /// Sum of the values, or `None` when every value was missing.
    pub fn total(&self) -> Option<f64> {
        self.has_data().then_some(self.sum)
    }

    /// Mean over the non-missing values only.
    pub fn mean(&self) -> Option<f64> {
        self.has_data().then(|| self.sum / self.count as f64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldStatsReport {
    pub count: usize,
    pub total: Option<f64>,
    pub mean: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl From<FieldStats> for FieldStatsReport {
    fn from(stats: FieldStats) -> Self {
        Self {
            count: stats.count,
            total: stats.total(),
            mean: stats.mean(),
            min: stats.min,
            max: stats.max,
        }
    }
}

impl FromIterator<Option<f64>> for FieldStats {
    fn from_iter<I: IntoIterator<Item = Option<f64>>>(iter: I) -> Self {
        let mut stats = FieldStats::default();
        for value in iter {
            stats.push_opt(value);
        }
        stats
    }
}

/// Per-year totals for the trend chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearTotals {
    pub year: i32,
    pub total_energy: f64,
    pub total_emissions: f64,
    pub records: usize,
}

/// One bar of the category ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total_energy: f64,
}

/// Everything the statistics, comparison, trend and ranking sections need.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateSummary {
    pub record_count: usize,
    pub energy: FieldStats,
    pub emissions: FieldStats,
    /// Ascending by year
    pub by_year: Vec<YearTotals>,
    /// Descending by energy, at most [`TOP_CATEGORY_LIMIT`] entries
    pub top_categories: Vec<CategoryTotal>,
}

impl AggregateSummary {
    pub fn total_energy(&self) -> Option<f64> {
        self.energy.total()
    }

    pub fn total_emissions(&self) -> Option<f64> {
        self.emissions.total()
    }

    pub fn mean_energy(&self) -> Option<f64> {
        self.energy.mean()
    }

    pub fn max_energy(&self) -> Option<f64> {
        self.energy.max
    }

    pub fn min_energy(&self) -> Option<f64> {
        self.energy.min
    }
}

/// Summarize a non-empty view.
///
/// Returns [`CoreError::EmptyView`] for an empty view rather than a zeroed
/// summary; callers are expected to skip the dependent sections.
pub fn summarize(view: &FilteredView<'_>) -> CoreResult<AggregateSummary> {
    if view.is_empty() {
        return Err(CoreError::EmptyView);
    }

    let mut energy = FieldStats::default();
    let mut emissions = FieldStats::default();
    for record in view.iter() {
        energy.push_opt(record.energy_tj);
        emissions.push_opt(record.co2_emissions);
    }

    let summary = AggregateSummary {
        record_count: view.len(),
        energy,
        emissions,
        by_year: group_by_year(view.iter()),
        top_categories: rank_categories(view.iter(), TOP_CATEGORY_LIMIT),
    };
    debug!(
        records = summary.record_count,
        energy_values = energy.count,
        emission_values = emissions.count,
        years = summary.by_year.len(),
        "summarized view"
    );
    Ok(summary)
}

/// Partition by year and sum both numeric fields, skipping missing values.
/// A year whose values are all missing sums to zero.
pub fn group_by_year<'a>(records: impl IntoIterator<Item = &'a Record>) -> Vec<YearTotals> {
    let mut groups: BTreeMap<i32, YearTotals> = BTreeMap::new();
    for record in records {
        let entry = groups.entry(record.year).or_insert_with(|| YearTotals {
            year: record.year,
            total_energy: 0.0,
            total_emissions: 0.0,
            records: 0,
        });
        entry.records += 1;
        entry.total_energy += record.energy_tj.unwrap_or(0.0);
        entry.total_emissions += record.co2_emissions.unwrap_or(0.0);
    }
    groups.into_values().collect()
}

/// Sum `energy_tj` per activity category and keep the `limit` largest.
/// Ties are ordered by category label ascending.
pub fn rank_categories<'a>(
    records: impl IntoIterator<Item = &'a Record>,
    limit: usize,
) -> Vec<CategoryTotal> {
    let mut totals: HashMap<&str, f64> = HashMap::new();
    for record in records {
        *totals.entry(record.activity_category.as_str()).or_insert(0.0) +=
            record.energy_tj.unwrap_or(0.0);
    }

    let mut ranking: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(category, total_energy)| CategoryTotal {
            category: category.to_string(),
            total_energy,
        })
        .collect();
    ranking.sort_by(|a, b| {
        b.total_energy
            .total_cmp(&a.total_energy)
            .then_with(|| a.category.cmp(&b.category))
    });
    ranking.truncate(limit);
    ranking
}
