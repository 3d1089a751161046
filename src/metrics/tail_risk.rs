use crate::data::{Estimate, ReturnData, ReturnSeries, ReturnTable};
use crate::error::{check_level, RiskError};
use crate::metrics::moments::{population_moments, standardized_moment};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};
use statrs::statistics::Statistics;

//lower-tail percentage used when no level is given
pub const DEFAULT_VAR_LEVEL: f64 = 5.0;

//all var/cvar figures are loss magnitudes: a positive number means money lost

//linear interpolation percentile over sorted values, level in [0, 100]
pub(crate) fn percentile(sorted: &[f64], level: f64) -> f64 {
    let rank = (sorted.len() - 1) as f64 * level / 100.0;
    let lower = rank.floor() as usize;
    let upper = (lower + 1).min(sorted.len() - 1);
    let fraction = rank - lower as f64;

    sorted[lower] + fraction * (sorted[upper] - sorted[lower])
}

fn sorted_observations(series: &ReturnSeries, level: f64) -> Result<Vec<f64>, RiskError> {
    if series.is_empty() {
        return Err(RiskError::EmptySeries);
    }
    check_level(level)?;

    let mut returns = series.observations()?;
    returns.sort_by(f64::total_cmp);
    Ok(returns)
}

//negated level-th percentile of a single series
pub fn historic_var(series: &ReturnSeries, level: f64) -> Result<f64, RiskError> {
    let sorted = sorted_observations(series, level)?;
    Ok(-percentile(&sorted, level))
}

//negated mean of the returns at or below the historic var threshold
pub fn historic_cvar(series: &ReturnSeries, level: f64) -> Result<f64, RiskError> {
    let sorted = sorted_observations(series, level)?;
    let threshold = percentile(&sorted, level);

    //sorted ascending, and the threshold is never below the minimum
    let tail: Vec<f64> = sorted.iter().copied().take_while(|&r| r <= threshold).collect();
    Ok(-tail.mean())
}

//parametric var assuming normal returns, optionally cornish-fisher adjusted
//checks emptiness, then level range, then missing values
pub fn gaussian_var(series: &ReturnSeries, level: f64, modified: bool) -> Result<f64, RiskError> {
    if series.is_empty() {
        return Err(RiskError::EmptySeries);
    }
    check_level(level)?;
    let returns = series.observations()?;

    let standard = Normal::new(0.0, 1.0).map_err(|e| RiskError::Distribution(e.to_string()))?;
    let mut z = standard.inverse_cdf(level / 100.0);

    if modified {
        let s = standardized_moment(&returns, 3);
        let k = standardized_moment(&returns, 4);
        z = cornish_fisher(z, s, k);
    }

    let (mean, sigma) = population_moments(&returns);

    Ok(-(mean + z * sigma))
}

//adjusts a normal quantile for skewness s and raw kurtosis k
pub fn cornish_fisher(z: f64, s: f64, k: f64) -> f64 {
    z + (z.powi(2) - 1.0) * s / 6.0 + (z.powi(3) - 3.0 * z) * (k - 3.0) / 24.0
        - (2.0 * z.powi(3) - 5.0 * z) * s.powi(2) / 36.0
}

//historic var for a series, or per asset for a table
pub fn var_historic<'a>(input: impl Into<ReturnData<'a>>, level: f64) -> Result<Estimate, RiskError> {
    input.into().apply(|series| historic_var(series, level))
}

//historic cvar for a series, or per asset for a table
pub fn cvar_historic<'a>(
    input: impl Into<ReturnData<'a>>,
    level: f64,
) -> Result<Estimate, RiskError> {
    input.into().apply(|series| historic_cvar(series, level))
}

//gaussian var accepts a single series only, see var_gaussian_table for tables
pub fn var_gaussian<'a>(
    input: impl Into<ReturnData<'a>>,
    level: f64,
    modified: bool,
) -> Result<f64, RiskError> {
    match input.into() {
        ReturnData::Series(series) => gaussian_var(series, level, modified),
        ReturnData::Table(_) => Err(RiskError::ShapeMismatch {
            expected: "a single return series",
        }),
    }
}

pub fn var_gaussian_table(
    table: &ReturnTable,
    level: f64,
    modified: bool,
) -> Result<IndexMap<String, f64>, RiskError> {
    table.aggregate(|series| gaussian_var(series, level, modified))
}

//the three var estimates for one asset, side by side
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VarComparison {
    pub gaussian: f64,
    pub cornish_fisher: f64,
    pub historic: f64,
}

pub fn var_comparison(
    table: &ReturnTable,
    level: f64,
) -> Result<IndexMap<String, VarComparison>, RiskError> {
    table.aggregate(|series| {
        Ok(VarComparison {
            gaussian: gaussian_var(series, level, false)?,
            cornish_fisher: gaussian_var(series, level, true)?,
            historic: historic_var(series, level)?,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Period;

    fn sample() -> ReturnSeries {
        ReturnSeries::from_values(vec![0.01, -0.02, 0.03, -0.01, 0.02])
    }

    #[test]
    fn historic_var_interpolates_linearly() {
        //sorted: -0.02 -0.01 0.01 0.02 0.03, rank 0.8 between the two lowest
        let var = historic_var(&sample(), 20.0).unwrap();
        assert!((var - 0.012).abs() < 1e-15);

        assert!((historic_var(&sample(), 0.0).unwrap() - 0.02).abs() < 1e-15);
        assert!((historic_var(&sample(), 100.0).unwrap() + 0.03).abs() < 1e-15);
        assert!((historic_var(&sample(), 50.0).unwrap() + 0.01).abs() < 1e-15);
    }

    #[test]
    fn cvar_averages_the_tail() {
        //only -0.02 sits at or below the 20th percentile (-0.012)
        let cvar = historic_cvar(&sample(), 20.0).unwrap();
        assert!((cvar - 0.02).abs() < 1e-15);

        //50th percentile is 0.01: tail is -0.02, -0.01, 0.01
        let cvar = historic_cvar(&sample(), 50.0).unwrap();
        assert!((cvar - 0.02 / 3.0).abs() < 1e-15);
    }

    #[test]
    fn cvar_is_at_least_var() {
        let returns: Vec<f64> = (0..120)
            .map(|i| ((i * 37 % 101) as f64 - 50.0) / 1000.0)
            .collect();
        let series = ReturnSeries::from_values(returns);
        for level in [1.0, 5.0, 10.0, 25.0] {
            let var = historic_var(&series, level).unwrap();
            let cvar = historic_cvar(&series, level).unwrap();
            assert!(cvar >= var, "level {}: cvar {} < var {}", level, cvar, var);
        }
    }

    #[test]
    fn gaussian_var_at_median_is_negated_mean() {
        let series = sample();
        let var = gaussian_var(&series, 50.0, false).unwrap();
        assert!((var + 0.006).abs() < 1e-12);
    }

    #[test]
    fn gaussian_var_matches_normal_quantile() {
        let series = sample();
        let mean = 0.006;
        let sigma = (series
            .observations()
            .unwrap()
            .iter()
            .map(|r| (r - mean).powi(2))
            .sum::<f64>()
            / 5.0)
            .sqrt();
        //z at 5% is about -1.6449
        let expected = -(mean - 1.6448536269514722 * sigma);
        assert!((gaussian_var(&series, 5.0, false).unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn cornish_fisher_is_identity_for_normal_moments() {
        for z in [-2.326, -1.645, 0.0, 1.0] {
            assert_eq!(cornish_fisher(z, 0.0, 3.0), z);
        }
        //negative skew pushes the lower quantile further out
        assert!(cornish_fisher(-1.645, -0.5, 3.0) < -1.645);
        //fat tails do too
        assert!(cornish_fisher(-2.326, 0.0, 6.0) < -2.326);
    }

    #[test]
    fn modified_var_grows_with_left_tail() {
        let mut returns = vec![0.01, 0.012, 0.008, 0.011, 0.009, 0.01, 0.013, 0.007];
        returns.extend([0.01; 8]);
        returns.push(-0.15);
        let series = ReturnSeries::from_values(returns);

        let plain = gaussian_var(&series, 1.0, false).unwrap();
        let modified = gaussian_var(&series, 1.0, true).unwrap();
        assert!(modified > plain);
    }

    #[test]
    fn constant_series_gaussian_var() {
        let series = ReturnSeries::from_values(vec![0.01; 10]);
        //zero sigma leaves only the negated mean
        assert_eq!(gaussian_var(&series, 5.0, false).unwrap(), -0.01);
        //undefined skew and kurtosis carry through the expansion
        assert!(gaussian_var(&series, 5.0, true).unwrap().is_nan());
    }

    #[test]
    fn gaussian_var_precondition_order() {
        let empty = ReturnSeries::from_values(Vec::new());
        assert_eq!(gaussian_var(&empty, 5.0, false).unwrap_err(), RiskError::EmptySeries);
        assert_eq!(var_gaussian(&empty, 500.0, true).unwrap_err(), RiskError::EmptySeries);

        let start = Period::new(2020, 1).unwrap();
        let gappy =
            ReturnSeries::new(vec![start, start.next()], vec![Some(0.01), None]).unwrap();
        assert!(matches!(
            gaussian_var(&gappy, 101.0, false).unwrap_err(),
            RiskError::InvalidParameter { name: "level", .. }
        ));
        assert_eq!(
            gaussian_var(&gappy, 5.0, false).unwrap_err(),
            RiskError::MissingValue {
                period: start.next()
            }
        );

        let table = ReturnTable::from_columns(vec![("a", empty)]).unwrap();
        assert_eq!(
            var_gaussian(&table, 5.0, false).unwrap_err(),
            RiskError::ShapeMismatch {
                expected: "a single return series"
            }
        );
    }

    #[test]
    fn dispatch_mirrors_input_shape() {
        let series = sample();
        let scalar = var_historic(&series, 20.0).unwrap();
        assert!((scalar.as_scalar().unwrap() - 0.012).abs() < 1e-15);

        let table = ReturnTable::from_columns(vec![
            ("second", ReturnSeries::from_values(vec![0.05, 0.04, 0.03, 0.02, 0.01])),
            ("first", series),
        ])
        .unwrap();

        let per_asset = cvar_historic(&table, 20.0).unwrap();
        let values = per_asset.as_per_asset().unwrap();
        let keys: Vec<&String> = values.keys().collect();
        assert_eq!(keys, ["second", "first"]);
        assert!((values["first"] - 0.02).abs() < 1e-15);
        assert!((values["second"] + 0.01).abs() < 1e-15);
    }

    #[test]
    fn comparison_covers_every_asset() {
        let table = ReturnTable::from_columns(vec![
            ("a", sample()),
            ("b", ReturnSeries::from_values(vec![0.02, -0.04, 0.01, 0.0, -0.01])),
        ])
        .unwrap();

        let comparison = var_comparison(&table, 5.0).unwrap();
        assert_eq!(comparison.len(), 2);
        let a = comparison["a"];
        assert_eq!(a.historic, historic_var(&sample(), 5.0).unwrap());
        assert_eq!(a.gaussian, gaussian_var(&sample(), 5.0, false).unwrap());

        let gaussian = var_gaussian_table(&table, 5.0, true).unwrap();
        assert_eq!(gaussian["b"], comparison["b"].cornish_fisher);
    }

    #[test]
    fn repeated_calls_are_bit_identical() {
        let series = sample();
        assert_eq!(
            historic_cvar(&series, 5.0).unwrap().to_bits(),
            historic_cvar(&series, 5.0).unwrap().to_bits()
        );
        assert_eq!(
            gaussian_var(&series, 5.0, true).unwrap().to_bits(),
            gaussian_var(&series, 5.0, true).unwrap().to_bits()
        );
    }
}
