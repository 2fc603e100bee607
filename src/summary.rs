//! Console report for an extracted dataset.
//!
//! The report mirrors what one would inspect by hand after a scrape: schema and
//! null counts, descriptive statistics of the numeric columns, the most
//! populous countries, and how many countries each region holds. Everything is
//! computed from the same DataFrame that is written to CSV.

use crate::errors::AppResult;
use crate::utils::round_two_decimals;
use polars::prelude::*;
use std::fmt;

/// Schema entry of one dataset column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    pub non_null: usize,
    pub dtype: String,
}

/// Reads name, non-null count and dtype of every column of the frame.
pub fn column_info(df: &DataFrame) -> Vec<ColumnInfo> {
    df.get_columns()
        .iter()
        .map(|series| ColumnInfo {
            name: series.name().to_string(),
            non_null: series.len() - series.null_count(),
            dtype: series.dtype().to_string(),
        })
        .collect()
}

/// Descriptive statistics of a numeric column, nulls excluded.
#[derive(Debug, Clone, PartialEq)]
pub struct Describe {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; absent with fewer than two values.
    pub std: Option<f64>,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl Describe {
    /// Computes the statistics of a numeric series, or `None` when it holds
    /// no non-null value.
    ///
    /// Quantiles use linear interpolation.
    pub fn from_series(series: &Series) -> AppResult<Option<Self>> {
        let values = series.cast(&DataType::Float64)?;
        let values = values.f64()?;

        let count = values.len() - values.null_count();
        if count == 0 {
            return Ok(None);
        }

        let quantile = |q: f64| -> AppResult<f64> {
            Ok(values
                .quantile(q, QuantileInterpolOptions::Linear)?
                .unwrap_or(f64::NAN))
        };

        Ok(Some(Self {
            count,
            mean: values.mean().unwrap_or(f64::NAN),
            std: values.std(1).filter(|_| count > 1),
            min: values.min().unwrap_or(f64::NAN),
            q25: quantile(0.25)?,
            median: quantile(0.5)?,
            q75: quantile(0.75)?,
            max: values.max().unwrap_or(f64::NAN),
        }))
    }
}

/// Countries with a known population, most populous first.
///
/// Ties keep document order.
pub fn top_by_population(df: &DataFrame, n: usize) -> AppResult<Vec<(String, u64)>> {
    let top = df
        .clone()
        .lazy()
        .filter(col("population").is_not_null())
        .sort(
            ["population"],
            SortMultipleOptions::default()
                .with_order_descending(true)
                .with_maintain_order(true),
        )
        .limit(n as IdxSize)
        .select([col("country"), col("population")])
        .collect()?;

    let countries = top.column("country")?.str()?;
    let populations = top.column("population")?.u64()?;
    Ok(countries
        .into_iter()
        .zip(populations)
        .filter_map(|(country, population)| Some((country?.to_string(), population?)))
        .collect())
}

/// Number of countries per region, largest first, ties by region name.
pub fn region_counts(df: &DataFrame) -> AppResult<Vec<(String, usize)>> {
    let counts = df
        .clone()
        .lazy()
        .group_by([col("region")])
        .agg([col("country").count().alias("count")])
        .sort(
            ["count", "region"],
            SortMultipleOptions::default().with_order_descendings([true, false]),
        )
        .collect()?;

    let regions = counts.column("region")?.str()?;
    let tallies = counts.column("count")?.cast(&DataType::UInt64)?;
    let tallies = tallies.u64()?;
    Ok(regions
        .into_iter()
        .zip(tallies)
        .map(|(region, count)| {
            (
                region.unwrap_or_default().to_string(),
                count.unwrap_or_default() as usize,
            )
        })
        .collect())
}

/// Everything printed after a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub records: usize,
    pub columns: Vec<ColumnInfo>,
    pub population: Option<Describe>,
    pub area: Option<Describe>,
    pub top: Vec<(String, u64)>,
    pub regions: Vec<(String, usize)>,
}

impl Summary {
    /// Builds the report from the dataset frame produced by
    /// [`records_to_dataframe`](crate::dataset::records_to_dataframe).
    pub fn build(df: &DataFrame, top_n: usize) -> AppResult<Self> {
        Ok(Self {
            records: df.height(),
            columns: column_info(df),
            population: Describe::from_series(df.column("population")?)?,
            area: Describe::from_series(df.column("area")?)?,
            top: top_by_population(df, top_n)?,
            regions: region_counts(df)?,
        })
    }
}

fn stat_cell(stat: Option<&Describe>, pick: fn(&Describe) -> Option<f64>) -> String {
    stat.and_then(pick)
        .map(|v| round_two_decimals(v).to_string())
        .unwrap_or_else(|| "-".to_string())
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== INFO ===")?;
        writeln!(f, "Records: {}", self.records)?;
        writeln!(f, "{:>3}  {:<12} {:>10}  {}", "#", "Column", "Non-Null", "Dtype")?;
        for (i, col) in self.columns.iter().enumerate() {
            writeln!(
                f,
                "{:>3}  {:<12} {:>10}  {}",
                i, col.name, col.non_null, col.dtype
            )?;
        }

        writeln!(f)?;
        writeln!(f, "=== DESCRIBE ===")?;
        writeln!(f, "{:<8} {:>18} {:>18}", "", "population", "area")?;
        let rows: [(&str, fn(&Describe) -> Option<f64>); 8] = [
            ("count", |d| Some(d.count as f64)),
            ("mean", |d| Some(d.mean)),
            ("std", |d| d.std),
            ("min", |d| Some(d.min)),
            ("25%", |d| Some(d.q25)),
            ("50%", |d| Some(d.median)),
            ("75%", |d| Some(d.q75)),
            ("max", |d| Some(d.max)),
        ];
        for (label, pick) in rows {
            writeln!(
                f,
                "{:<8} {:>18} {:>18}",
                label,
                stat_cell(self.population.as_ref(), pick),
                stat_cell(self.area.as_ref(), pick)
            )?;
        }

        writeln!(f)?;
        writeln!(f, "=== TOP {} BY POPULATION ===", self.top.len())?;
        for (country, population) in &self.top {
            writeln!(f, "{country:<32} {population:>14}")?;
        }

        writeln!(f)?;
        writeln!(f, "=== COUNTRIES PER REGION ===")?;
        for (region, count) in &self.regions {
            let region = if region.is_empty() { "(empty)" } else { region };
            writeln!(f, "{region:<32} {count:>6}")?;
        }
        Ok(())
    }
}
