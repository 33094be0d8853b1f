//! Types shared by every command: output format and the application context.

use anyhow::{anyhow, Context, Result};
use clap::ValueEnum;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use enersim_core::{Dataset, FilterCriteria, FilterOptions, SimulationParams};
use enersim_io::DatasetCache;

use crate::cli::{CriteriaArgs, SimulationArgs};
use crate::config::EnersimConfig;

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable tables and labelled metrics
    #[default]
    Plain,
    /// JSON document (pipe-friendly, structured)
    Json,
}

/// Application context, built once at startup.
///
/// Holds the configuration and the dataset cache; commands receive it
/// explicitly instead of reaching for globals.
#[derive(Debug)]
pub struct App {
    pub config: EnersimConfig,
    pub format: OutputFormat,
    dataset_path: PathBuf,
    cache: DatasetCache,
}

impl App {
    pub fn new(config: EnersimConfig, data_override: Option<PathBuf>, format: OutputFormat) -> Self {
        let dataset_path = data_override.unwrap_or_else(|| config.data.dataset_path.clone());
        let cache = DatasetCache::with_options(config.data.load_options());
        Self {
            config,
            format,
            dataset_path,
            cache,
        }
    }

    /// The dataset, read on first use and cached afterwards.
    pub fn dataset(&mut self) -> Result<Arc<Dataset>> {
        let path = self.dataset_path.clone();
        let dataset = self
            .cache
            .get_or_load(&path)
            .with_context(|| format!("loading dataset {}", path.display()))?;
        info!(records = dataset.len(), "dataset ready");
        Ok(dataset)
    }

    /// Simulation inputs: flags first, then config.
    pub fn simulation_params(&self, args: &SimulationArgs) -> Result<SimulationParams> {
        let percentage = args
            .percent
            .unwrap_or(self.config.simulation.default_percentage);
        let price = args
            .unit_price
            .unwrap_or(self.config.simulation.unit_price_per_kwh);
        Ok(SimulationParams::new(percentage, price)?)
    }

    pub fn currency(&self) -> &str {
        &self.config.simulation.currency
    }
}

/// Turn the filter flags into criteria. Without `--state` the first state in
/// the data is pre-selected.
pub fn resolve_criteria(args: &CriteriaArgs, dataset: &Dataset) -> Result<FilterCriteria> {
    let state = match &args.state {
        Some(state) => state.clone(),
        None => FilterOptions::from_dataset(dataset, None)
            .default_state()
            .map(str::to_string)
            .ok_or_else(|| anyhow!("the dataset has no states to select"))?,
    };
    let criteria = FilterCriteria::for_state(&state)?
        .with_municipality(&args.municipality)
        .with_activity_category(&args.category)
        .with_energy_source_type(&args.source)
        .with_year(args.year.clone());
    Ok(criteria)
}
