use crate::data::series::{Period, ReturnSeries, ReturnTable};
use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, Serialize};
use std::path::Path;

//how the index column encodes the period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeriodFormat {
    //192607 or 1926-07
    YearMonth,
    //iso dates, with slash dates read day-first or month-first
    Date { day_first: bool },
}

//describes how a returns csv maps onto a ReturnTable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoaderOptions {
    //index column name, None for the first column
    pub index_column: Option<String>,
    pub period_format: PeriodFormat,
    //cells equal to this value are treated as missing
    pub missing_sentinel: Option<f64>,
    //multiplier applied to every value (0.01 for percentage files)
    pub scale: f64,
    //(source header, asset name) pairs to keep, None keeps every column
    pub columns: Option<Vec<(String, String)>>,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        LoaderOptions {
            index_column: None,
            period_format: PeriodFormat::Date { day_first: false },
            missing_sentinel: None,
            scale: 1.0,
            columns: None,
        }
    }
}

impl LoaderOptions {
    //fama-french portfolios formed on market equity, smallest and largest decile
    pub fn ffme() -> Self {
        LoaderOptions {
            index_column: None,
            period_format: PeriodFormat::YearMonth,
            missing_sentinel: Some(-99.99),
            scale: 0.01,
            columns: Some(vec![
                ("Lo 10".to_string(), "SmallCap".to_string()),
                ("Hi 10".to_string(), "LargeCap".to_string()),
            ]),
        }
    }

    //edhec hedge fund indices
    pub fn hfi() -> Self {
        LoaderOptions {
            index_column: Some("date".to_string()),
            period_format: PeriodFormat::Date { day_first: true },
            missing_sentinel: None,
            scale: 0.01,
            columns: None,
        }
    }
}

//known dataset layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dataset {
    Ffme,
    Hfi,
    Generic,
}

impl Dataset {
    //parse dataset kind from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ffme" | "fama-french" => Some(Dataset::Ffme),
            "hfi" | "edhec" => Some(Dataset::Hfi),
            "generic" | "csv" => Some(Dataset::Generic),
            _ => None,
        }
    }

    pub fn options(&self) -> LoaderOptions {
        match self {
            Dataset::Ffme => LoaderOptions::ffme(),
            Dataset::Hfi => LoaderOptions::hfi(),
            Dataset::Generic => LoaderOptions::default(),
        }
    }

    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<ReturnTable> {
        load_returns_csv(path, &self.options())
    }
}

pub fn load_ffme_returns<P: AsRef<Path>>(path: P) -> Result<ReturnTable> {
    load_returns_csv(path, &LoaderOptions::ffme())
}

pub fn load_hfi_returns<P: AsRef<Path>>(path: P) -> Result<ReturnTable> {
    load_returns_csv(path, &LoaderOptions::hfi())
}

//parses an index cell into a month
pub fn parse_period(raw: &str, format: PeriodFormat) -> Option<Period> {
    let raw = raw.trim();
    let date = match format {
        PeriodFormat::YearMonth => {
            let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
            if digits.len() != 6 {
                return None;
            }
            NaiveDate::parse_from_str(&format!("{}01", digits), "%Y%m%d").ok()?
        }
        PeriodFormat::Date { day_first } => {
            let slash_format = if day_first { "%d/%m/%Y" } else { "%m/%d/%Y" };
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .or_else(|_| NaiveDate::parse_from_str(raw, slash_format))
                .ok()?
        }
    };

    Some(Period::from_date(date))
}

//loads a wide csv (one period per row, one asset per column) into a ReturnTable
pub fn load_returns_csv<P: AsRef<Path>>(path: P, options: &LoaderOptions) -> Result<ReturnTable> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_path(path)
        .context(format!("Failed to open CSV file: {:?}", path))?;

    let headers = reader.headers()?.clone();

    let index = match &options.index_column {
        Some(name) => headers
            .iter()
            .position(|h| h == name.as_str())
            .with_context(|| format!("Index column '{}' not found in {:?}", name, path))?,
        None => 0,
    };

    //(csv position, asset name)
    let selected: Vec<(usize, String)> = match &options.columns {
        Some(columns) => columns
            .iter()
            .map(|(source, name)| {
                headers
                    .iter()
                    .position(|h| h == source.as_str())
                    .map(|pos| (pos, name.clone()))
                    .with_context(|| format!("Column '{}' not found in {:?}", source, path))
            })
            .collect::<Result<_>>()?,
        None => headers
            .iter()
            .enumerate()
            .filter(|(pos, _)| *pos != index)
            .map(|(pos, h)| (pos, h.to_string()))
            .collect(),
    };

    if selected.is_empty() {
        bail!("No return columns found in {:?}", path);
    }

    let mut rows: Vec<(Period, Vec<Option<f64>>)> = Vec::new();

    for (line, result) in reader.records().enumerate() {
        let record = result.context(format!("Failed to parse CSV record at line {}", line + 2))?;

        let raw_period = record.get(index).unwrap_or_default();
        if raw_period.is_empty() {
            tracing::warn!(line = line + 2, "skipping row without a period");
            continue;
        }

        let period = parse_period(raw_period, options.period_format).with_context(|| {
            format!(
                "Failed to parse period '{}' at line {}",
                raw_period,
                line + 2
            )
        })?;

        let values = selected
            .iter()
            .map(|(pos, name)| {
                parse_cell(record.get(*pos).unwrap_or_default(), options).with_context(|| {
                    format!("Failed to parse {} at line {}", name, line + 2)
                })
            })
            .collect::<Result<Vec<_>>>()?;

        rows.push((period, values));
    }

    //sort by period to ensure chronological order
    rows.sort_by(|a, b| a.0.cmp(&b.0));

    let periods: Vec<Period> = rows.iter().map(|(period, _)| *period).collect();
    let mut columns = Vec::with_capacity(selected.len());
    for (i, (_, name)) in selected.iter().enumerate() {
        let values = rows.iter().map(|(_, values)| values[i]).collect();
        let series = ReturnSeries::new(periods.clone(), values)
            .with_context(|| format!("Invalid period index for {}", name))?;
        columns.push((name.clone(), series));
    }

    let table = ReturnTable::from_columns(columns)?;
    tracing::info!(
        path = %path.display(),
        assets = table.len(),
        periods = table.periods().len(),
        "loaded return table"
    );

    Ok(table)
}

fn parse_cell(raw: &str, options: &LoaderOptions) -> Result<Option<f64>> {
    if raw.is_empty() || raw.eq_ignore_ascii_case("nan") || raw.eq_ignore_ascii_case("na") {
        return Ok(None);
    }

    let value: f64 = raw
        .parse()
        .with_context(|| format!("'{}' is not a number", raw))?;

    if let Some(sentinel) = options.missing_sentinel {
        if (value - sentinel).abs() < 1e-9 {
            return Ok(None);
        }
    }

    Ok(Some(value * options.scale))
}
