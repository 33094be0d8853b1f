//! Filter engine: equality selectors combined by conjunction.
//!
//! The state selector is always concrete. The other four default to
//! [`Selector::All`], which leaves that dimension unrestricted.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::record::{normalize_label, Dataset, Record};

/// Label used for the "do not restrict" choice.
pub const ALL_SENTINEL: &str = "ALL";

/// Older label for the same choice, still accepted when parsing.
const ALL_SENTINEL_PT: &str = "TODOS";

/// True if `value` names the "do not restrict" choice.
pub fn is_all_sentinel(value: &str) -> bool {
    let value = value.trim();
    value.eq_ignore_ascii_case(ALL_SENTINEL) || value.eq_ignore_ascii_case(ALL_SENTINEL_PT)
}

/// One dropdown choice: either unrestricted or a concrete value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selector<T> {
    #[default]
    All,
    Only(T),
}

impl<T: PartialEq> Selector<T> {
    /// `All` accepts anything; `Only(v)` accepts exactly `v`.
    pub fn accepts(&self, value: &T) -> bool {
        match self {
            Selector::All => true,
            Selector::Only(expected) => expected == value,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selector::All)
    }
}

impl Selector<String> {
    /// Text selector with the value normalized the same way loaded records are.
    pub fn text(value: &str) -> Self {
        if is_all_sentinel(value) {
            Selector::All
        } else {
            Selector::Only(normalize_label(value))
        }
    }
}

impl<T: FromStr> FromStr for Selector<T> {
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if is_all_sentinel(s) {
            Ok(Selector::All)
        } else {
            s.trim().parse().map(Selector::Only)
        }
    }
}

impl<T: fmt::Display> fmt::Display for Selector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::All => f.write_str(ALL_SENTINEL),
            Selector::Only(value) => value.fmt(f),
        }
    }
}

/// The five user choices that define a filtered view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    state: String,
    pub municipality: Selector<String>,
    pub activity_category: Selector<String>,
    pub energy_source_type: Selector<String>,
    pub year: Selector<i32>,
}

impl FilterCriteria {
    /// Criteria restricted to one state and unrestricted otherwise.
    ///
    /// Rejects an empty state or the "ALL" sentinel.
    pub fn for_state(state: &str) -> CoreResult<Self> {
        Ok(Self {
            state: validate_state(state)?,
            municipality: Selector::All,
            activity_category: Selector::All,
            energy_source_type: Selector::All,
            year: Selector::All,
        })
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    /// Switch to another state. Other selectors are kept as they are.
    pub fn set_state(&mut self, state: &str) -> CoreResult<()> {
        self.state = validate_state(state)?;
        Ok(())
    }

    pub fn with_municipality(mut self, value: &str) -> Self {
        self.municipality = Selector::text(value);
        self
    }

    pub fn with_activity_category(mut self, value: &str) -> Self {
        self.activity_category = Selector::text(value);
        self
    }

    pub fn with_energy_source_type(mut self, value: &str) -> Self {
        self.energy_source_type = Selector::text(value);
        self
    }

    pub fn with_year(mut self, year: Selector<i32>) -> Self {
        self.year = year;
        self
    }

    /// Conjunction of all five predicates. State is checked first since it
    /// always restricts.
    pub fn matches(&self, record: &Record) -> bool {
        record.state == self.state
            && self.municipality.accepts(&record.municipality)
            && self.activity_category.accepts(&record.activity_category)
            && self.energy_source_type.accepts(&record.energy_source_type)
            && self.year.accepts(&record.year)
    }
}

impl fmt::Display for FilterCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "state={} municipality={} category={} source={} year={}",
            self.state,
            self.municipality,
            self.activity_category,
            self.energy_source_type,
            self.year
        )
    }
}

fn validate_state(state: &str) -> CoreResult<String> {
    if is_all_sentinel(state) {
        return Err(CoreError::InvalidCriteria(
            "a concrete state must be selected".to_string(),
        ));
    }
    let state = normalize_label(state);
    if state.is_empty() {
        return Err(CoreError::InvalidCriteria(
            "state must not be empty".to_string(),
        ));
    }
    Ok(state)
}

/// The records of a dataset that satisfy a set of criteria, in dataset order.
#[derive(Debug, Clone, Default)]
pub struct FilteredView<'a> {
    records: Vec<&'a Record>,
}

impl<'a> FilteredView<'a> {
    pub fn records(&self) -> &[&'a Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Record> + '_ {
        self.records.iter().copied()
    }

    /// Narrow this view further. Equivalent to filtering the dataset with
    /// both sets of criteria at once.
    pub fn refine(&self, criteria: &FilterCriteria) -> FilteredView<'a> {
        FilteredView {
            records: self
                .records
                .iter()
                .copied()
                .filter(|record| criteria.matches(record))
                .collect(),
        }
    }
}

/// Filter a dataset. Never fails; no match gives an empty view.
pub fn apply<'a>(dataset: &'a Dataset, criteria: &FilterCriteria) -> FilteredView<'a> {
    let records: Vec<&Record> = dataset
        .iter()
        .filter(|record| criteria.matches(record))
        .collect();
    debug!(
        matched = records.len(),
        total = dataset.len(),
        "applied filters ({criteria})"
    );
    FilteredView { records }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset::new(vec![
            Record::new("SP", "CAMPINAS", "INDUSTRIA", "DIESEL", 2019, Some(10.0), Some(5.0)),
            Record::new("RJ", "NITEROI", "COMERCIO", "GAS", 2019, Some(3.0), Some(1.0)),
            Record::new("SP", "SANTOS", "COMERCIO", "GAS", 2020, Some(7.0), None),
            Record::new("MG", "BETIM", "INDUSTRIA", "DIESEL", 2020, None, Some(2.0)),
            Record::new("RJ", "NITEROI", "INDUSTRIA", "GAS", 2021, Some(1.0), Some(1.0)),
        ])
    }

    #[test]
    fn test_state_only_keeps_dataset_order() {
        let dataset = sample();
        let criteria = FilterCriteria::for_state("SP").unwrap();
        let view = apply(&dataset, &criteria);
        let names: Vec<&str> = view.iter().map(|r| r.municipality.as_str()).collect();
        assert_eq!(names, vec!["CAMPINAS", "SANTOS"]);
    }

    #[test]
    fn test_lowercase_criteria_match_normalized_records() {
        let dataset = sample();
        let criteria = FilterCriteria::for_state("rj")
            .unwrap()
            .with_activity_category("industria");
        let view = apply(&dataset, &criteria);
        assert_eq!(view.len(), 1);
        assert_eq!(view.records()[0].year, 2021);
    }

    #[test]
    fn test_year_selector() {
        let dataset = sample();
        let criteria = FilterCriteria::for_state("SP")
            .unwrap()
            .with_year(Selector::Only(2020));
        let view = apply(&dataset, &criteria);
        assert_eq!(view.len(), 1);
        assert_eq!(view.records()[0].municipality, "SANTOS");
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        let dataset = sample();
        let criteria = FilterCriteria::for_state("BA").unwrap();
        assert!(apply(&dataset, &criteria).is_empty());
        assert!(apply(&Dataset::default(), &criteria).is_empty());
    }

    #[test]
    fn test_state_rejects_sentinel_and_empty() {
        assert!(matches!(
            FilterCriteria::for_state("ALL"),
            Err(CoreError::InvalidCriteria(_))
        ));
        assert!(FilterCriteria::for_state("todos").is_err());
        assert!(FilterCriteria::for_state("   ").is_err());
    }

    #[test]
    fn test_selector_parsing() {
        assert_eq!("ALL".parse::<Selector<i32>>().unwrap(), Selector::All);
        assert_eq!("Todos".parse::<Selector<i32>>().unwrap(), Selector::All);
        assert_eq!(" 2020 ".parse::<Selector<i32>>().unwrap(), Selector::Only(2020));
        assert!("twenty".parse::<Selector<i32>>().is_err());
        assert_eq!(Selector::text("all"), Selector::All);
        assert_eq!(Selector::text("diesel"), Selector::Only("DIESEL".to_string()));
    }

    #[test]
    fn test_refine_matches_combined_filter() {
        let dataset = sample();
        let broad = FilterCriteria::for_state("RJ").unwrap();
        let narrow = FilterCriteria::for_state("RJ")
            .unwrap()
            .with_energy_source_type("gas")
            .with_year(Selector::Only(2019));
        let refined = apply(&dataset, &broad).refine(&narrow);
        let direct = apply(&dataset, &narrow);
        assert_eq!(refined.records(), direct.records());
        assert_eq!(direct.len(), 1);
    }

    #[test]
    fn test_display_uses_sentinel() {
        let criteria = FilterCriteria::for_state("sp").unwrap();
        assert_eq!(
            criteria.to_string(),
            "state=SP municipality=ALL category=ALL source=ALL year=ALL"
        );
    }
}
