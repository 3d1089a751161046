use crate::data::{ReturnSeries, ReturnTable};
use crate::error::RiskError;
use indexmap::IndexMap;
use statrs::statistics::Statistics;

//sample standard deviation (n-1) of the strictly negative returns
pub fn semideviation(series: &ReturnSeries) -> Result<f64, RiskError> {
    let returns = series.observations()?;
    let negative: Vec<f64> = returns.iter().filter(|&&r| r < 0.0).copied().collect();

    if negative.len() < 2 {
        return Err(RiskError::InsufficientData {
            what: "negative returns",
            required: 2,
            found: negative.len(),
        });
    }

    Ok(negative.std_dev())
}

//third standardized moment, population definition
//a constant series yields NaN
pub fn skewness(series: &ReturnSeries) -> Result<f64, RiskError> {
    let returns = series.observations()?;
    Ok(standardized_moment(&returns, 3))
}

//fourth standardized moment, population definition
//raw kurtosis: a normal distribution scores 3, subtract 3 for excess kurtosis
pub fn kurtosis(series: &ReturnSeries) -> Result<f64, RiskError> {
    let returns = series.observations()?;
    Ok(standardized_moment(&returns, 4))
}

pub fn semideviation_table(table: &ReturnTable) -> Result<IndexMap<String, f64>, RiskError> {
    table.aggregate(semideviation)
}

pub fn skewness_table(table: &ReturnTable) -> Result<IndexMap<String, f64>, RiskError> {
    table.aggregate(skewness)
}

pub fn kurtosis_table(table: &ReturnTable) -> Result<IndexMap<String, f64>, RiskError> {
    table.aggregate(kurtosis)
}

//mean and population sigma (n divisor), sigma taken from the same deviations as the mean
//a constant series gives sigma exactly 0
pub(crate) fn population_moments(returns: &[f64]) -> (f64, f64) {
    let n = returns.len() as f64;
    let mean = returns.mean();
    let variance = returns.iter().map(|&r| (r - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

//mean of (r - mean)^k over population sigma^k
pub(crate) fn standardized_moment(returns: &[f64], order: i32) -> f64 {
    let n = returns.len() as f64;
    let (mean, sigma) = population_moments(returns);

    let central = returns.iter().map(|&r| (r - mean).powi(order)).sum::<f64>() / n;
    central / sigma.powi(order)
}
