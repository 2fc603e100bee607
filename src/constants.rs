// Data source
pub const COUNTRIES_URL: &str = "https://www.scrapethissite.com/pages/simple/";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";

// Output artifacts
pub const DEFAULT_CSV_PATH: &str = "countries_dataset.csv";
pub const DEFAULT_CHART_PATH: &str = "population_distribution_log.png";

// Markup selectors
pub const COUNTRY_BLOCK_SELECTOR: &str = "div.country";

// Chart
pub const MAX_HISTOGRAM_BINS: usize = 1000;

// Report
pub const DEFAULT_TOP_N: usize = 5;

// CSV schema, in column order
pub const CSV_COLUMNS: [&str; 5] = ["country", "capital", "population", "area", "region"];
