use crate::data::{ReturnSeries, ReturnTable};
use crate::error::RiskError;
use crate::metrics::moments::standardized_moment;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ChiSquared, ContinuousCDF};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_NORMALITY_LEVEL: f64 = 0.01;

//how the jarque-bera p-value is compared against the significance level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Alternative {
    #[default]
    TwoSided,
    Greater,
    //passes when p < level/2, the mirror of Greater rather than its complement
    Less,
}

impl FromStr for Alternative {
    type Err = RiskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "two-sided" => Ok(Alternative::TwoSided),
            "greater" => Ok(Alternative::Greater),
            "less" => Ok(Alternative::Less),
            other => Err(RiskError::InvalidArgument(format!(
                "unknown alternative hypothesis '{}', expected two-sided, greater or less",
                other
            ))),
        }
    }
}

impl fmt::Display for Alternative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Alternative::TwoSided => "two-sided",
            Alternative::Greater => "greater",
            Alternative::Less => "less",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JarqueBera {
    pub statistic: f64,
    pub p_value: f64,
}

//jarque-bera statistic n/6 * (s^2 + (k-3)^2/4) against chi-squared with 2 degrees of freedom
pub fn jarque_bera(series: &ReturnSeries) -> Result<JarqueBera, RiskError> {
    let returns = series.observations()?;
    let n = returns.len() as f64;

    let skew = standardized_moment(&returns, 3);
    let excess_kurtosis = standardized_moment(&returns, 4) - 3.0;
    let statistic = n / 6.0 * (skew.powi(2) + excess_kurtosis.powi(2) / 4.0);

    //constant series: no distribution to test
    if statistic.is_nan() {
        return Ok(JarqueBera {
            statistic,
            p_value: f64::NAN,
        });
    }

    let reference = ChiSquared::new(2.0).map_err(|e| RiskError::Distribution(e.to_string()))?;
    let p_value = 1.0 - reference.cdf(statistic);

    Ok(JarqueBera { statistic, p_value })
}

//jarque-bera verdict at the given significance level
pub fn is_normal(
    series: &ReturnSeries,
    level: f64,
    alternative: Alternative,
) -> Result<bool, RiskError> {
    if !(0.0..=1.0).contains(&level) {
        return Err(RiskError::InvalidParameter {
            name: "level",
            reason: format!("significance level {} is outside [0, 1]", level),
        });
    }

    let test = jarque_bera(series)?;
    tracing::trace!(statistic = test.statistic, p_value = test.p_value, %alternative, "jarque-bera");

    Ok(match alternative {
        Alternative::TwoSided => test.p_value > level,
        Alternative::Greater => test.p_value > level / 2.0,
        Alternative::Less => test.p_value < level / 2.0,
    })
}

pub fn is_normal_table(
    table: &ReturnTable,
    level: f64,
    alternative: Alternative,
) -> Result<IndexMap<String, bool>, RiskError> {
    table.aggregate(|series| is_normal(series, level, alternative))
}
