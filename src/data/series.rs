use crate::error::RiskError;
use chrono::{Datelike, NaiveDate};
use indexmap::IndexMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

//a calendar month, the time index of a return series
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    //returns None when month is not in 1..=12
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Period { year, month })
        } else {
            None
        }
    }

    //truncates a date to its month
    pub fn from_date(date: NaiveDate) -> Self {
        Period {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    //the following month
    pub fn next(self) -> Self {
        if self.month == 12 {
            Period {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Period {
                year: self.year,
                month: self.month + 1,
            }
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

//an ordered sequence of (period, return) pairs, returns as fractions (0.01 = +1%)
//None marks a missing observation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnSeries {
    periods: Vec<Period>,
    values: Vec<Option<f64>>,
}

impl ReturnSeries {
    //creates a series, validating that periods strictly increase
    pub fn new(periods: Vec<Period>, values: Vec<Option<f64>>) -> Result<Self, RiskError> {
        if periods.len() != values.len() {
            return Err(RiskError::LengthMismatch {
                periods: periods.len(),
                values: values.len(),
            });
        }

        for pair in periods.windows(2) {
            if pair[1] <= pair[0] {
                return Err(RiskError::NonIncreasingPeriod {
                    previous: pair[0],
                    current: pair[1],
                });
            }
        }

        Ok(ReturnSeries { periods, values })
    }

    //complete series on consecutive months starting at 1970-01
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let values: Vec<Option<f64>> = values.into_iter().map(Some).collect();
        let mut periods = Vec::with_capacity(values.len());
        let mut period = Period {
            year: 1970,
            month: 1,
        };
        for _ in 0..values.len() {
            periods.push(period);
            period = period.next();
        }

        ReturnSeries { periods, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (Period, Option<f64>)> + '_ {
        self.periods.iter().copied().zip(self.values.iter().copied())
    }

    pub fn has_missing(&self) -> bool {
        self.values.iter().any(Option::is_none)
    }

    //returns the raw return values, failing on an empty series or the first missing entry
    pub fn observations(&self) -> Result<Vec<f64>, RiskError> {
        if self.is_empty() {
            return Err(RiskError::EmptySeries);
        }

        self.iter()
            .map(|(period, value)| value.ok_or(RiskError::MissingValue { period }))
            .collect()
    }
}

//named return series sharing one period index, kept in insertion order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReturnTable {
    periods: Vec<Period>,
    columns: IndexMap<String, ReturnSeries>,
}

impl ReturnTable {
    //builds a table, rejecting duplicate names and series on a different period index
    pub fn from_columns<I, S>(columns: I) -> Result<Self, RiskError>
    where
        I: IntoIterator<Item = (S, ReturnSeries)>,
        S: Into<String>,
    {
        let mut table = ReturnTable::default();

        for (name, series) in columns {
            let name = name.into();
            if table.columns.contains_key(&name) {
                return Err(RiskError::DuplicateAsset(name));
            }

            if table.columns.is_empty() {
                table.periods = series.periods().to_vec();
            } else if series.periods() != table.periods.as_slice() {
                return Err(RiskError::MisalignedSeries { asset: name });
            }

            table.columns.insert(name, series);
        }

        Ok(table)
    }

    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    //number of assets
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&ReturnSeries> {
        self.columns.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ReturnSeries)> {
        self.columns.iter().map(|(name, series)| (name.as_str(), series))
    }

    //applies an estimator to every asset in parallel, keeping the table's key order
    //the first failing asset aborts the whole table
    pub fn aggregate<T, F>(&self, estimator: F) -> Result<IndexMap<String, T>, RiskError>
    where
        T: Send,
        F: Fn(&ReturnSeries) -> Result<T, RiskError> + Sync,
    {
        tracing::debug!(assets = self.columns.len(), "aggregating over table");

        let results: Vec<(String, T)> = self
            .columns
            .par_iter()
            .map(|(name, series)| {
                estimator(series)
                    .map(|value| (name.clone(), value))
                    .map_err(|err| RiskError::for_asset(name, err))
            })
            .collect::<Result<_, _>>()?;

        Ok(results.into_iter().collect())
    }
}

//input accepted by estimators that work on either a single series or a whole table
#[derive(Debug, Clone, Copy)]
pub enum ReturnData<'a> {
    Series(&'a ReturnSeries),
    Table(&'a ReturnTable),
}

impl<'a> From<&'a ReturnSeries> for ReturnData<'a> {
    fn from(series: &'a ReturnSeries) -> Self {
        ReturnData::Series(series)
    }
}

impl<'a> From<&'a ReturnTable> for ReturnData<'a> {
    fn from(table: &'a ReturnTable) -> Self {
        ReturnData::Table(table)
    }
}

impl ReturnData<'_> {
    //runs a per-series estimator on a series, or on each asset of a table
    pub fn apply<F>(&self, estimator: F) -> Result<Estimate, RiskError>
    where
        F: Fn(&ReturnSeries) -> Result<f64, RiskError> + Sync,
    {
        match *self {
            ReturnData::Series(series) => estimator(series).map(Estimate::Scalar),
            ReturnData::Table(table) => table.aggregate(estimator).map(Estimate::PerAsset),
        }
    }
}

//output shape mirrors the input: one number for a series, one per asset for a table
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Estimate {
    Scalar(f64),
    PerAsset(IndexMap<String, f64>),
}

impl Estimate {
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Estimate::Scalar(value) => Some(*value),
            Estimate::PerAsset(_) => None,
        }
    }

    pub fn as_per_asset(&self) -> Option<&IndexMap<String, f64>> {
        match self {
            Estimate::Scalar(_) => None,
            Estimate::PerAsset(values) => Some(values),
        }
    }
}
