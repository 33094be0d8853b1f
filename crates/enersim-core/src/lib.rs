//! # enersim-core: consumption analysis and solar what-if
//!
//! Pure data-transformation stages behind the energy dashboard. Data flows
//! one way:
//!
//! ```text
//! Dataset ──apply──▶ FilteredView ──summarize──▶ AggregateSummary ──simulate──▶ SimulationResult
//! ```
//!
//! Loading the spreadsheet lives in `enersim-io`; this crate never touches
//! the filesystem.
//!
//! ## Quick Start
//!
//! ```rust
//! use enersim_core::*;
//!
//! let dataset = Dataset::new(vec![
//!     Record::new("sp", "santos", "industria", "diesel", 2020, Some(1000.0), Some(500.0)),
//!     Record::new("rj", "niteroi", "comercio", "gas", 2020, Some(40.0), None),
//! ]);
//!
//! let criteria = FilterCriteria::for_state("SP").unwrap();
//! let view = apply(&dataset, &criteria);
//! let summary = summarize(&view).unwrap();
//! let result = simulate(&summary, 30.0, 0.22).unwrap();
//!
//! assert_eq!(summary.total_energy(), Some(1000.0));
//! assert_eq!(result.simulated_energy_kwh.value(), 83_333_400.0);
//! ```

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod options;
pub mod pipeline;
pub mod record;
pub mod simulate;
pub mod units;

pub use aggregate::{
    group_by_year, rank_categories, summarize, AggregateSummary, CategoryTotal, FieldStats,
    FieldStatsReport, YearTotals, TOP_CATEGORY_LIMIT,
};
pub use error::{CoreError, CoreResult};
pub use filter::{apply, is_all_sentinel, FilterCriteria, FilteredView, Selector, ALL_SENTINEL};
pub use options::FilterOptions;
pub use pipeline::{ComparisonBar, Snapshot};
pub use record::{normalize_label, Dataset, Record};
pub use simulate::{
    simulate, simulate_outcome, simulate_with, SimulationOutcome, SimulationParams,
    SimulationResult, DEFAULT_PERCENTAGE,
};
pub use units::{KilowattHours, Terajoules, Tonnes, KWH_PER_TJ};
