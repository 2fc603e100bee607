use crate::constants::{
    COUNTRIES_URL, DEFAULT_CHART_PATH, DEFAULT_CSV_PATH, DEFAULT_TOP_N, DEFAULT_USER_AGENT,
    MAX_HISTOGRAM_BINS,
};
use crate::errors::{AppError, AppResult};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

/// Resolved run configuration with every value filled in.
///
/// Deserialized by the TOML loader; keys missing from the file take the
/// defaults below and unknown keys are rejected to catch typos.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScrapeConfig {
    /// Page listing the countries
    pub url: String,
    /// `User-Agent` header sent with the request
    pub user_agent: String,
    /// Local HTML file to parse instead of fetching `url`
    pub input: Option<PathBuf>,
    /// Destination of the CSV dataset
    pub output_csv: PathBuf,

    // Chart
    /// Whether to render the population histogram
    pub chart: bool,
    /// Destination of the histogram PNG
    pub chart_path: PathBuf,
    /// Number of histogram bins. 0 picks a count from the number of values.
    pub histogram_bins: usize,

    // Report
    /// How many countries to list in the population ranking
    pub top_n: usize,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            url: COUNTRIES_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            input: None,
            output_csv: PathBuf::from(DEFAULT_CSV_PATH),
            chart: false,
            chart_path: PathBuf::from(DEFAULT_CHART_PATH),
            histogram_bins: 0,
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl ScrapeConfig {
    /// Loads and validates configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `IoError` if the file cannot be read, and `InvalidInput` if the
    /// TOML is malformed, contains unknown keys, or fails [`ScrapeConfig::validate`].
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(path)?;
        let config: ScrapeConfig = toml::from_str(&contents)
            .map_err(|e| AppError::InvalidInput(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the values that deserialization alone cannot.
    pub fn validate(&self) -> AppResult<()> {
        Url::parse(&self.url)?;
        if self.user_agent.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "User agent must not be empty".into(),
            ));
        }
        if self.top_n == 0 {
            return Err(AppError::InvalidInput(
                "Top-N must be greater than 0".into(),
            ));
        }
        if self.histogram_bins > MAX_HISTOGRAM_BINS {
            return Err(AppError::InvalidInput(format!(
                "Histogram bins must be at most {MAX_HISTOGRAM_BINS}, got {}",
                self.histogram_bins
            )));
        }
        Ok(())
    }

    /// Parsed form of [`ScrapeConfig::url`].
    pub fn source_url(&self) -> AppResult<Url> {
        Ok(Url::parse(&self.url)?)
    }
}
