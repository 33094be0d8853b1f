use serde::{Deserialize, Serialize};

/// One row of the consumption report.
///
/// The four text fields are stored upper-cased so that filtering can use
/// plain equality. Numeric fields that could not be read are `None` and are
/// skipped by every aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub state: String,
    pub municipality: String,
    pub activity_category: String,
    pub energy_source_type: String,
    pub year: i32,
    /// Energy consumption in terajoules
    pub energy_tj: Option<f64>,
    /// CO2 emissions in tonnes
    pub co2_emissions: Option<f64>,
}

impl Record {
    /// Build a record, normalizing the text fields.
    pub fn new(
        state: &str,
        municipality: &str,
        activity_category: &str,
        energy_source_type: &str,
        year: i32,
        energy_tj: Option<f64>,
        co2_emissions: Option<f64>,
    ) -> Self {
        Self {
            state: normalize_label(state),
            municipality: normalize_label(municipality),
            activity_category: normalize_label(activity_category),
            energy_source_type: normalize_label(energy_source_type),
            year,
            energy_tj,
            co2_emissions,
        }
    }
}

/// Canonical form of a categorical value: trimmed and upper-cased.
///
/// Uses Unicode case mapping, so accented municipality names such as
/// "São Paulo" become "SÃO PAULO".
pub fn normalize_label(value: &str) -> String {
    value.trim().to_uppercase()
}

/// The loaded table. Immutable once built; shared read-only (usually behind
/// an `Arc`) by every filter pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }
}

impl FromIterator<Record> for Dataset {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
