//! One full recomputation: filter, summarize, simulate.
//!
//! Every change of a selector or of the slider reruns this from the cached
//! dataset. Nothing is kept between runs.

use serde::Serialize;
use tracing::{debug, info};

use crate::aggregate::{summarize, AggregateSummary};
use crate::error::CoreResult;
use crate::filter::{apply, FilterCriteria, FilteredView};
use crate::record::Dataset;
use crate::simulate::{simulate_outcome, SimulationOutcome, SimulationParams};

/// Output of one pipeline run.
///
/// `summary` and `simulation` are `None` when the view is empty; the
/// renderer shows a "no data" notice instead of those sections.
#[derive(Debug, Clone)]
pub struct Snapshot<'a> {
    pub criteria: FilterCriteria,
    pub view: FilteredView<'a>,
    pub summary: Option<AggregateSummary>,
    pub simulation: Option<SimulationOutcome>,
}

/// A labelled bar of the consumption-vs-emissions comparison chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonBar {
    pub indicator: &'static str,
    pub value: f64,
}

impl Snapshot<'_> {
    pub fn is_empty(&self) -> bool {
        self.view.is_empty()
    }

    /// Two-bar dataset (energy in TJ, emissions in tonnes). Fields without
    /// data are left out.
    pub fn totals_comparison(&self) -> Vec<ComparisonBar> {
        let Some(summary) = &self.summary else {
            return Vec::new();
        };
        [
            ("energy_tj", summary.total_energy()),
            ("co2_tonnes", summary.total_emissions()),
        ]
        .into_iter()
        .filter_map(|(indicator, value)| value.map(|value| ComparisonBar { indicator, value }))
        .collect()
    }
}

/// Run the whole pipeline.
///
/// Invalid simulation parameters fail before any work is done. An empty view
/// and an undefined simulation are reported through the snapshot.
pub fn run<'a>(
    dataset: &'a Dataset,
    criteria: &FilterCriteria,
    params: &SimulationParams,
) -> CoreResult<Snapshot<'a>> {
    params.validate()?;

    let view = apply(dataset, criteria);
    let summary = match summarize(&view) {
        Ok(summary) => Some(summary),
        Err(err) if err.is_recognized_state() => {
            info!("no records match {criteria}");
            None
        }
        Err(err) => return Err(err),
    };

    let simulation = match &summary {
        Some(summary) => Some(simulate_outcome(summary, params)?),
        None => None,
    };
    if matches!(simulation, Some(SimulationOutcome::Undefined)) {
        info!("simulation undefined: total energy is zero or missing");
    }
    debug!(rows = view.len(), "pipeline finished");

    Ok(Snapshot {
        criteria: criteria.clone(),
        view,
        summary,
        simulation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::record::Record;

    fn dataset() -> Dataset {
        Dataset::new(vec![
            Record::new("SP", "SANTOS", "A", "GAS", 2020, Some(1000.0), Some(500.0)),
            Record::new("RJ", "NITEROI", "A", "GAS", 2020, Some(0.0), Some(1.0)),
        ])
    }

    #[test]
    fn test_run_computes_all_sections() {
        let data = dataset();
        let params = SimulationParams::new(30.0, 0.22).unwrap();
        let snapshot = run(&data, &FilterCriteria::for_state("SP").unwrap(), &params).unwrap();
        assert_eq!(snapshot.view.len(), 1);
        let result = snapshot.simulation.and_then(|s| s.result().copied()).unwrap();
        assert!((result.simulated_energy_tj.value() - 300.0).abs() < 1e-9);
        assert_eq!(
            snapshot.totals_comparison(),
            vec![
                ComparisonBar {
                    indicator: "energy_tj",
                    value: 1000.0
                },
                ComparisonBar {
                    indicator: "co2_tonnes",
                    value: 500.0
                },
            ]
        );
    }

    #[test]
    fn test_empty_view_skips_dependent_sections() {
        let data = dataset();
        let params = SimulationParams::new(30.0, 0.35).unwrap();
        let snapshot = run(&data, &FilterCriteria::for_state("MG").unwrap(), &params).unwrap();
        assert!(snapshot.is_empty());
        assert!(snapshot.summary.is_none());
        assert!(snapshot.simulation.is_none());
        assert!(snapshot.totals_comparison().is_empty());
    }

    #[test]
    fn test_zero_energy_is_undefined_simulation() {
        let data = dataset();
        let params = SimulationParams::new(30.0, 0.35).unwrap();
        let snapshot = run(&data, &FilterCriteria::for_state("RJ").unwrap(), &params).unwrap();
        assert_eq!(snapshot.simulation, Some(SimulationOutcome::Undefined));
        assert!(snapshot.summary.is_some());
    }

    #[test]
    fn test_invalid_params_fail_early() {
        let data = dataset();
        let params = SimulationParams {
            percentage: 140.0,
            unit_price_per_kwh: 0.35,
        };
        let err = run(&data, &FilterCriteria::for_state("SP").unwrap(), &params).unwrap_err();
        assert_eq!(err, CoreError::InvalidPercentage(140.0));
    }
}
