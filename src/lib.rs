//! countries-scraper library
//!
//! This crate provides the core functionality for the `countries-scraper` binary.
//! Keep the crate root minimal; implementation and tests live in their modules.
//!
//! ## Overview
//!
//! The library is organized into modules that handle each step of the run:
//!
//! - [`fetcher`] - Fetches the countries page (or reads a saved copy)
//! - [`extractor`] - Extracts typed country records from the page markup
//! - [`dataset`] - Builds the Polars DataFrame and writes the CSV file
//! - [`summary`] - Descriptive statistics and rankings printed after a run
//! - [`chart`] - Log-scale population histogram rendered to PNG
//! - [`pipeline`] - Runs fetch → parse → tabulate → report once
//! - [`cli`] - Command-line interface
//! - [`config`] - Run configuration and TOML loading
//! - [`models`] - Records and field definitions
//! - [`errors`] - Error types used throughout the application
//!
//! ## Example Usage
//!
//! ```no_run
//! use countries_scraper::{config::ScrapeConfig, errors::AppResult, pipeline};
//!
//! # async fn example() -> AppResult<()> {
//! let config = ScrapeConfig {
//!     chart: true,
//!     ..ScrapeConfig::default()
//! };
//! let outcome = pipeline::run(&config).await?;
//! println!("{outcome:?}");
//! # Ok(())
//! # }
//! ```

pub mod chart;
pub mod cli;
pub mod config;
pub mod constants;
pub mod dataset;
pub mod errors;
pub mod extractor;
pub mod fetcher;
pub mod models;
pub mod pipeline;
pub mod summary;
pub mod utils;
