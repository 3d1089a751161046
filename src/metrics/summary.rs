use crate::data::{ReturnSeries, ReturnTable};
use crate::error::RiskError;
use crate::metrics::moments::{kurtosis, semideviation, skewness};
use crate::metrics::tail_risk::{historic_cvar, historic_var, percentile};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

//level used for the var and cvar rows of the summary
pub const SUMMARY_VAR_LEVEL: f64 = 5.0;

pub type SummaryTable = IndexMap<String, SummaryStats>;

//summary statistics for one return series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub mean: f64,
    pub median: f64,
    //sample standard deviation (n-1)
    pub std_dev: f64,
    pub skewness: f64,
    //raw kurtosis, normal = 3
    pub kurtosis: f64,
    pub semideviation: f64,
    pub var_historic: f64,
    pub cvar_historic: f64,
}

impl SummaryStats {
    pub const METRIC_NAMES: [&'static str; 8] = [
        "Mean",
        "Median",
        "Standard Deviation",
        "Skewness",
        "Kurtosis",
        "Semideviation",
        "VaR (5%)",
        "CVaR (5%)",
    ];

    //metric name and value pairs, in the fixed reporting order
    pub fn metrics(&self) -> [(&'static str, f64); 8] {
        let names = Self::METRIC_NAMES;
        [
            (names[0], self.mean),
            (names[1], self.median),
            (names[2], self.std_dev),
            (names[3], self.skewness),
            (names[4], self.kurtosis),
            (names[5], self.semideviation),
            (names[6], self.var_historic),
            (names[7], self.cvar_historic),
        ]
    }

    pub fn get(&self, metric: &str) -> Option<f64> {
        self.metrics()
            .into_iter()
            .find(|(name, _)| *name == metric)
            .map(|(_, value)| value)
    }
}

pub fn summary_stats(series: &ReturnSeries) -> Result<SummaryStats, RiskError> {
    let returns = series.observations()?;
    let mut sorted = returns.clone();
    sorted.sort_by(f64::total_cmp);

    Ok(SummaryStats {
        mean: returns.as_slice().mean(),
        median: percentile(&sorted, 50.0),
        std_dev: returns.as_slice().std_dev(),
        skewness: skewness(series)?,
        kurtosis: kurtosis(series)?,
        semideviation: semideviation(series)?,
        var_historic: historic_var(series, SUMMARY_VAR_LEVEL)?,
        cvar_historic: historic_cvar(series, SUMMARY_VAR_LEVEL)?,
    })
}

//one summary record per asset, in table order
pub fn summary_stats_table(table: &ReturnTable) -> Result<SummaryTable, RiskError> {
    table.aggregate(summary_stats)
}

//mean against median: a mean above the median hints at positive skew
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CentralTendency {
    pub mean: f64,
    pub median: f64,
    pub mean_exceeds_median: bool,
}

pub fn central_tendency(table: &ReturnTable) -> Result<IndexMap<String, CentralTendency>, RiskError> {
    table.aggregate(|series| {
        let mut sorted = series.observations()?;
        let mean = sorted.as_slice().mean();
        sorted.sort_by(f64::total_cmp);
        let median = percentile(&sorted, 50.0);

        Ok(CentralTendency {
            mean,
            median,
            mean_exceeds_median: mean > median,
        })
    })
}
