//! # enersim-io: reading the consumption report
//!
//! Turns the source spreadsheet into an [`enersim_core::Dataset`] and writes
//! filtered views back out.
//!
//! - [`loader`]: workbook/CSV reading and normalization
//! - [`cache`]: per-path memoization of loaded datasets
//! - [`export`]: CSV/Parquet output of a filtered view
//! - [`columns`]: the report's column names and cell coercion rules

pub mod cache;
pub mod columns;
pub mod error;
pub mod export;
pub mod loader;

pub use cache::DatasetCache;
pub use error::{ExportError, ExportResult, LoadError, LoadResult};
pub use export::{view_to_frame, write_view};
pub use loader::{build_dataset, load_dataset, load_dataset_with, LoadOptions, SourceFormat};
