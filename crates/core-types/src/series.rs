use crate::error::CoreError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single dated value of a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// The continuous daily return series of a rebalanced portfolio.
///
/// Dates are strictly increasing with no duplicates. This is the only
/// value the plotting collaborator consumes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioReturnSeries {
    points: Vec<SeriesPoint>,
}

impl PortfolioReturnSeries {
    /// Sorts the points by date (stable) and rejects duplicate dates.
    pub fn from_points(mut points: Vec<SeriesPoint>) -> Result<Self, CoreError> {
        points.sort_by_key(|p| p.date);
        if let Some(pair) = points.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(CoreError::Data(format!(
                "portfolio series has duplicate date {}",
                pair[0].date
            )));
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn returns(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    /// Compounded wealth starting from 1.0: `wealth_t = prod_{s<=t}(1 + r_s)`.
    pub fn wealth_curve(&self) -> Vec<SeriesPoint> {
        let mut wealth = 1.0;
        self.points
            .iter()
            .map(|p| {
                wealth *= 1.0 + p.value;
                SeriesPoint::new(p.date, wealth)
            })
            .collect()
    }

    /// Relative decline of wealth from its running peak; always `<= 0`.
    ///
    /// The running peak starts at the initial wealth of 1.0.
    pub fn drawdown_curve(&self) -> Vec<SeriesPoint> {
        let mut peak: f64 = 1.0;
        self.wealth_curve()
            .into_iter()
            .map(|p| {
                peak = peak.max(p.value);
                SeriesPoint::new(p.date, (p.value - peak) / peak)
            })
            .collect()
    }
}
