use crate::constants::CSV_COLUMNS;
use crate::errors::{AppError, AppResult};
use crate::models::CountryRecord;
use polars::prelude::*;
use std::fs::{self, File};
use std::path::Path;
use tracing::info;

/// Converts extracted records into a Polars DataFrame.
///
/// Columns follow the CSV layout: `country`, `capital`, `population` (u64,
/// nullable), `area` (f64, nullable), `region`. An empty slice yields an empty
/// frame with the same schema.
pub fn records_to_dataframe(records: &[CountryRecord]) -> AppResult<DataFrame> {
    let len = records.len();
    let mut countries = Vec::with_capacity(len);
    let mut capitals = Vec::with_capacity(len);
    let mut populations: Vec<Option<u64>> = Vec::with_capacity(len);
    let mut areas: Vec<Option<f64>> = Vec::with_capacity(len);
    let mut regions = Vec::with_capacity(len);

    for record in records {
        countries.push(record.country.as_str());
        capitals.push(record.capital.as_str());
        populations.push(record.population);
        areas.push(record.area);
        regions.push(record.region.as_str());
    }

    let [country, capital, population, area, region] = CSV_COLUMNS;
    DataFrame::new(vec![
        Series::new(country, countries),
        Series::new(capital, capitals),
        Series::new(population, populations),
        Series::new(area, areas),
        Series::new(region, regions),
    ])
    .map_err(|e| AppError::DataFrameError(format!("Failed to create DataFrame: {e}")))
}

/// Writes the dataset as a UTF-8 CSV file with a header row.
///
/// Null numeric cells are written as empty fields. The parent directory is
/// created when missing.
///
/// # Errors
///
/// Returns `IoError` if the file cannot be created and `DataFrameError` if
/// serialization fails.
pub fn write_csv(df: &mut DataFrame, path: &Path) -> AppResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            AppError::IoError(format!(
                "Failed to create output directory {}: {e}",
                parent.display()
            ))
        })?;
    }

    let mut file = File::create(path)
        .map_err(|e| AppError::IoError(format!("Failed to create {}: {e}", path.display())))?;

    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)
        .map_err(|e| AppError::DataFrameError(format!("Failed to write CSV: {e}")))?;

    info!(
        path = %path.display(),
        rows = df.height(),
        "CSV dataset written"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(country: &str, population: Option<u64>, area: Option<f64>) -> CountryRecord {
        CountryRecord {
            country: country.to_string(),
            capital: format!("{country} City"),
            population,
            area,
            region: "Somewhere".to_string(),
        }
    }

    #[test]
    fn dataframe_has_expected_schema() {
        let df = records_to_dataframe(&[record("A", Some(1), None)]).unwrap();
        assert_eq!(df.height(), 1);
        assert_eq!(df.get_column_names(), CSV_COLUMNS.to_vec());
        assert_eq!(df.column("population").unwrap().dtype(), &DataType::UInt64);
        assert_eq!(df.column("area").unwrap().dtype(), &DataType::Float64);
    }

    #[test]
    fn dataframe_keeps_nulls() {
        let df = records_to_dataframe(&[
            record("A", Some(10), Some(1.5)),
            record("B", None, None),
        ])
        .unwrap();
        assert_eq!(df.column("population").unwrap().null_count(), 1);
        assert_eq!(df.column("area").unwrap().null_count(), 1);
    }

    #[test]
    fn empty_records_yield_empty_frame() {
        let df = records_to_dataframe(&[]).unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 5);
    }

    #[test]
    fn write_csv_creates_parent_and_header() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested/out.csv");
        let mut df = records_to_dataframe(&[record("A", None, Some(2.0))]).unwrap();

        write_csv(&mut df, &path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(lines.next(), Some("country,capital,population,area,region"));
        let row: Vec<&str> = lines.next().unwrap().split(',').collect();
        assert_eq!(row[0], "A");
        assert_eq!(row[2], "");
        assert_eq!(row[3].parse::<f64>().unwrap(), 2.0);
    }
}
