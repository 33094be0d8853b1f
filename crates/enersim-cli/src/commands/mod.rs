pub mod completions;
pub mod config;
pub mod filter;
pub mod interactive;
pub mod options;
pub mod report;
pub mod simulate;
pub mod summary;
