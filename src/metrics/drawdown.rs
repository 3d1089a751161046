use crate::data::{Period, ReturnSeries};
use crate::error::RiskError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_INITIAL_WEALTH: f64 = 1000.0;

//a point on the wealth path
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WealthPoint {
    pub period: Period,
    pub wealth: f64,
    pub peak: f64,
    //fractional decline from peak, always <= 0
    pub drawdown: f64,
}

//compounded wealth, running peak and drawdown for every period of a series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WealthPath {
    pub initial_wealth: f64,
    pub points: Vec<WealthPoint>,
}

impl WealthPath {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn final_wealth(&self) -> f64 {
        self.points
            .last()
            .map(|p| p.wealth)
            .unwrap_or(self.initial_wealth)
    }

    //deepest drawdown, reported as a negative fraction (0 when wealth never fell)
    pub fn max_drawdown(&self) -> f64 {
        self.points
            .iter()
            .map(|point| point.drawdown)
            .fold(0.0, f64::min)
    }

    //period at which the deepest drawdown occurred
    pub fn trough(&self) -> Option<&WealthPoint> {
        self.points
            .iter()
            .filter(|point| point.drawdown < 0.0)
            .min_by(|a, b| a.drawdown.total_cmp(&b.drawdown))
    }
}

//compounds a return series from initial_wealth, tracking the running peak
pub fn drawdown(series: &ReturnSeries, initial_wealth: f64) -> Result<WealthPath, RiskError> {
    if !(initial_wealth.is_finite() && initial_wealth > 0.0) {
        return Err(RiskError::InvalidParameter {
            name: "initial_wealth",
            reason: format!("must be positive and finite, got {}", initial_wealth),
        });
    }

    let mut points = Vec::with_capacity(series.len());
    let mut wealth = initial_wealth;
    let mut peak = f64::NEG_INFINITY;

    for (period, value) in series.iter() {
        let r = value.ok_or(RiskError::MissingValue { period })?;

        wealth *= 1.0 + r;

        //update peak
        if wealth > peak {
            peak = wealth;
        }

        //a wiped-out account has no peak to fall from
        let drawdown = if peak > 0.0 {
            (wealth - peak) / peak
        } else {
            0.0
        };

        points.push(WealthPoint {
            period,
            wealth,
            peak,
            drawdown,
        });
    }

    Ok(WealthPath {
        initial_wealth,
        points,
    })
}
