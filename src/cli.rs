use crate::config::ScrapeConfig;
use crate::errors::{AppError, AppResult};
use crate::pipeline::{run, RunOutcome};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use tracing::info;

// CLI metadata constants
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
const APP_AUTHOR: &str = env!("CARGO_PKG_AUTHORS");
const APP_ABOUT: &str = env!("CARGO_PKG_DESCRIPTION");

/// Builds the command-line definition.
///
/// - `scrape`: run with defaults, overridden by flags
/// - `toml`: run using a TOML configuration file
pub fn build_command() -> Command<'static> {
    Command::new("countries-scraper")
        .version(APP_VERSION)
        .author(APP_AUTHOR)
        .about(APP_ABOUT)
        .subcommand(
            Command::new("scrape")
                .about("Fetch the countries page, write the CSV dataset and print a summary")
                .after_help("Example:\n  countries-scraper scrape --chart -o data/countries.csv")
                .arg(
                    Arg::new("url")
                        .short('u')
                        .long("url")
                        .help("Page listing the countries")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("input")
                        .short('i')
                        .long("input")
                        .help("Parse a saved HTML file instead of fetching the page")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help("Destination of the CSV dataset")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("user_agent")
                        .long("user-agent")
                        .alias("ua")
                        .help("User-Agent header sent with the request")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("chart")
                        .short('c')
                        .long("chart")
                        .help("Also render the log-scale population histogram")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("chart_path")
                        .long("chart-path")
                        .help("Destination of the histogram PNG")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("bins")
                        .short('b')
                        .long("bins")
                        .help("Histogram bin count (0 picks one from the data)")
                        .value_parser(clap::value_parser!(usize))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("top")
                        .short('t')
                        .long("top")
                        .help("How many countries to list in the population ranking")
                        .value_parser(clap::value_parser!(usize))
                        .action(ArgAction::Set),
                ),
        )
        .subcommand(
            Command::new("toml")
                .about("Run using a TOML configuration file")
                .arg(
                    Arg::new("config")
                        .help("Path to the TOML config file")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
}

/// Applies the `scrape` flags on top of the default configuration.
pub fn config_from_scrape_args(sub: &ArgMatches) -> ScrapeConfig {
    let mut config = ScrapeConfig::default();
    if let Some(url) = sub.get_one::<String>("url") {
        config.url = url.clone();
    }
    if let Some(input) = sub.get_one::<PathBuf>("input") {
        config.input = Some(input.clone());
    }
    if let Some(output) = sub.get_one::<PathBuf>("output") {
        config.output_csv = output.clone();
    }
    if let Some(user_agent) = sub.get_one::<String>("user_agent") {
        config.user_agent = user_agent.clone();
    }
    if sub.get_one::<bool>("chart").copied().unwrap_or(false) {
        config.chart = true;
    }
    if let Some(chart_path) = sub.get_one::<PathBuf>("chart_path") {
        config.chart_path = chart_path.clone();
    }
    if let Some(&bins) = sub.get_one::<usize>("bins") {
        config.histogram_bins = bins;
    }
    if let Some(&top) = sub.get_one::<usize>("top") {
        config.top_n = top;
    }
    config
}

/// Resolves the run configuration for the selected subcommand.
///
/// Returns `None` when no subcommand was given.
pub fn config_from_matches(matches: &ArgMatches) -> AppResult<Option<ScrapeConfig>> {
    match matches.subcommand() {
        Some(("scrape", sub)) => Ok(Some(config_from_scrape_args(sub))),
        Some(("toml", sub)) => {
            let config_path = sub
                .get_one::<PathBuf>("config")
                .expect("config is required");
            ScrapeConfig::from_toml_file(config_path).map(Some)
        }
        _ => Ok(None),
    }
}

/// Parses command-line arguments and runs the pipeline.
///
/// Without a subcommand, prints help. Runs that stop early (page unavailable,
/// no data) still return `Ok(())`.
pub async fn cli() -> AppResult<()> {
    let cmd = build_command();
    let mut cmd_for_help = cmd.clone();
    let matches = cmd.get_matches();

    let Some(config) = config_from_matches(&matches)? else {
        cmd_for_help
            .print_help()
            .map_err(|e| AppError::IoError(format!("Failed to print help: {e}")))?;
        return Ok(());
    };

    let outcome = run(&config).await?;
    log_outcome(&outcome);
    Ok(())
}

fn log_outcome(outcome: &RunOutcome) {
    match outcome {
        RunOutcome::PageUnavailable { status } => {
            info!(status = *status, "Run ended: page unavailable")
        }
        RunOutcome::NoBlocks => info!("Run ended: no country blocks"),
        RunOutcome::NoRecords { blocks_found } => {
            info!(blocks_found = *blocks_found, "Run ended: no valid records")
        }
        RunOutcome::Completed(report) => info!(
            records = report.records,
            csv = %report.csv_path.display(),
            chart = report.chart_path.is_some(),
            "Run ended: dataset written"
        ),
    }
}
