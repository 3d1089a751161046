use crate::data::Period;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RiskError {
    #[error("Input series is empty")]
    EmptySeries,
    #[error("Not enough {what}: need at least {required}, found {found}")]
    InsufficientData {
        what: &'static str,
        required: usize,
        found: usize,
    },
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Input must be {expected}")]
    ShapeMismatch { expected: &'static str },
    #[error("Input series contains a missing value at {period}")]
    MissingValue { period: Period },
    #[error("Series has {periods} periods but {values} values")]
    LengthMismatch { periods: usize, values: usize },
    #[error("Periods must be strictly increasing: {current} follows {previous}")]
    NonIncreasingPeriod { previous: Period, current: Period },
    #[error("Series {asset} is not aligned with the table's period index")]
    MisalignedSeries { asset: String },
    #[error("Duplicate asset name: {0}")]
    DuplicateAsset(String),
    #[error("Distribution error: {0}")]
    Distribution(String),
    #[error("Asset {asset}: {source}")]
    Asset {
        asset: String,
        #[source]
        source: Box<RiskError>,
    },
}

impl RiskError {
    //wraps an error raised while processing one asset of a table
    pub fn for_asset(asset: &str, source: RiskError) -> Self {
        RiskError::Asset {
            asset: asset.to_string(),
            source: Box::new(source),
        }
    }

    //strips asset context, returning the error raised by the estimator
    pub fn root(&self) -> &RiskError {
        match self {
            RiskError::Asset { source, .. } => source.root(),
            other => other,
        }
    }
}

//checks a percentage level lies in [0, 100]
pub(crate) fn check_level(level: f64) -> Result<(), RiskError> {
    if !(0.0..=100.0).contains(&level) {
        return Err(RiskError::InvalidParameter {
            name: "level",
            reason: format!("{} is outside [0, 100]", level),
        });
    }
    Ok(())
}
