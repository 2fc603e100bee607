use crate::chart::{self, Histogram};
use crate::config::ScrapeConfig;
use crate::dataset::{records_to_dataframe, write_csv};
use crate::errors::AppResult;
use crate::extractor::scan_document;
use crate::fetcher::{build_client, fetch_page, load_page, PageFetch};
use crate::models::CountryRecord;
use crate::summary::Summary;
use crate::utils::format_duration;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Files produced by a completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub records: usize,
    pub csv_path: PathBuf,
    /// `None` when the chart was not requested or had nothing to draw.
    pub chart_path: Option<PathBuf>,
    pub elapsed: Duration,
}

/// How a run ended. Only `Completed` writes any file.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// The page answered with a status other than `200 OK`.
    PageUnavailable { status: u16 },
    /// The page contained no country blocks.
    NoBlocks,
    /// Country blocks were found but none had a name.
    NoRecords { blocks_found: usize },
    Completed(RunReport),
}

/// Runs the whole fetch → parse → tabulate → report pipeline once.
///
/// The page comes from `config.input` when set, otherwise from `config.url`.
///
/// # Errors
///
/// Returns an error if the request cannot be sent, the input file cannot be
/// read, or writing the CSV or chart fails. A non-`200` response is not an
/// error; it ends the run with [`RunOutcome::PageUnavailable`].
pub async fn run(config: &ScrapeConfig) -> AppResult<RunOutcome> {
    config.validate()?;
    let started = Instant::now();

    let html = match &config.input {
        Some(path) => load_page(path).await?,
        None => {
            let client = build_client(&config.user_agent)?;
            match fetch_page(&client, &config.source_url()?).await? {
                PageFetch::Page(body) => body,
                PageFetch::Unavailable(status) => {
                    println!("Page not found (HTTP {})", status.as_u16());
                    return Ok(RunOutcome::PageUnavailable {
                        status: status.as_u16(),
                    });
                }
            }
        }
    };

    process_document(&html, config, started)
}

/// Extracts, writes and reports the records of an already fetched page.
pub fn process_document(
    html: &str,
    config: &ScrapeConfig,
    started: Instant,
) -> AppResult<RunOutcome> {
    let scan = scan_document(html);

    if scan.blocks_found == 0 {
        warn!("No country blocks found in page");
        println!("No data found");
        return Ok(RunOutcome::NoBlocks);
    }

    let records = scan.records;
    info!(
        blocks_found = scan.blocks_found,
        records = records.len(),
        skipped = scan.blocks_found - records.len(),
        "Country records extracted"
    );
    println!("\nCountries collected: {}", records.len());

    if records.is_empty() {
        println!("No data to analyze");
        return Ok(RunOutcome::NoRecords {
            blocks_found: scan.blocks_found,
        });
    }

    let mut df = records_to_dataframe(&records)?;
    write_csv(&mut df, &config.output_csv)?;
    println!("CSV saved: {}", config.output_csv.display());

    let summary = Summary::build(&df, config.top_n)?;
    println!("\n{summary}");

    let chart_path = if config.chart {
        render_chart(&records, config)?
    } else {
        None
    };

    let elapsed = started.elapsed();
    info!(
        records = records.len(),
        elapsed = %format_duration(elapsed),
        "Run completed successfully"
    );

    Ok(RunOutcome::Completed(RunReport {
        records: records.len(),
        csv_path: config.output_csv.clone(),
        chart_path,
        elapsed,
    }))
}

/// Renders the population histogram, skipping it when no country has a
/// positive population.
fn render_chart(records: &[CountryRecord], config: &ScrapeConfig) -> AppResult<Option<PathBuf>> {
    let populations: Vec<u64> = records.iter().filter_map(|r| r.population).collect();

    let Some(hist) = Histogram::from_populations(&populations, config.histogram_bins) else {
        info!("No positive population values, skipping chart");
        return Ok(None);
    };

    chart::render_png(
        &hist,
        &config.chart_path,
        chart::DEFAULT_WIDTH,
        chart::DEFAULT_HEIGHT,
    )?;
    println!("Chart saved: {}", config.chart_path.display());
    Ok(Some(config.chart_path.clone()))
}
