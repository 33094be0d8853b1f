use std::collections::BTreeSet;

use serde::Serialize;

use crate::record::{normalize_label, Dataset};

/// Distinct values offered by each dropdown, sorted ascending.
///
/// Municipalities are limited to the selected state; the other lists cover
/// the whole dataset. The "ALL" choice is not part of the lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOptions {
    pub states: Vec<String>,
    pub municipalities: Vec<String>,
    pub activity_categories: Vec<String>,
    pub energy_source_types: Vec<String>,
    pub years: Vec<i32>,
}

impl FilterOptions {
    /// Collect the choices. Without a state, `municipalities` is empty.
    pub fn from_dataset(dataset: &Dataset, state: Option<&str>) -> Self {
        let state = state.map(normalize_label);
        let mut states = BTreeSet::new();
        let mut municipalities = BTreeSet::new();
        let mut categories = BTreeSet::new();
        let mut sources = BTreeSet::new();
        let mut years = BTreeSet::new();

        for record in dataset {
            states.insert(record.state.as_str());
            categories.insert(record.activity_category.as_str());
            sources.insert(record.energy_source_type.as_str());
            years.insert(record.year);
            if state.as_deref() == Some(record.state.as_str()) {
                municipalities.insert(record.municipality.as_str());
            }
        }

        Self {
            states: to_owned(states),
            municipalities: to_owned(municipalities),
            activity_categories: to_owned(categories),
            energy_source_types: to_owned(sources),
            years: years.into_iter().collect(),
        }
    }

    /// First state in sort order, used as the initial selection.
    pub fn default_state(&self) -> Option<&str> {
        self.states.first().map(String::as_str)
    }
}

fn to_owned(values: BTreeSet<&str>) -> Vec<String> {
    values.into_iter().map(str::to_string).collect()
}
