use crate::enums::Granularity;
use crate::table::AssetTable;
use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A contiguous calendar bucket used as one rebalancing interval.
///
/// Periods of the same granularity never overlap, so ordering by `start`
/// (the first field) is a strict total order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub granularity: Granularity,
}

impl Period {
    /// Returns true if `date` falls inside this bucket (both ends inclusive).
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// The human-readable bucket label, e.g. `2024-03`, `2024-Q1`, `2024-W09`.
    pub fn label(&self) -> String {
        match self.granularity {
            Granularity::Weekly => {
                let week = self.start.iso_week();
                format!("{}-W{:02}", week.year(), week.week())
            }
            Granularity::Monthly => self.start.format("%Y-%m").to_string(),
            Granularity::Quarterly => {
                format!("{}-Q{}", self.start.year(), self.start.month0() / 3 + 1)
            }
            Granularity::Yearly => self.start.year().to_string(),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl Granularity {
    /// Assigns a date to its bucket. This is a pure function of the date.
    pub fn period_of(&self, date: NaiveDate) -> Period {
        let (start, end) = match self {
            Granularity::Weekly => {
                let start = date - Days::new(u64::from(date.weekday().num_days_from_monday()));
                (start, start + Days::new(6))
            }
            Granularity::Monthly => {
                let start = date - Days::new(u64::from(date.day0()));
                (start, start + Months::new(1) - Days::new(1))
            }
            Granularity::Quarterly => {
                let month_start = date - Days::new(u64::from(date.day0()));
                let start = month_start - Months::new(date.month0() % 3);
                (start, start + Months::new(3) - Days::new(1))
            }
            Granularity::Yearly => {
                let start = date - Days::new(u64::from(date.ordinal0()));
                (start, start + Months::new(12) - Days::new(1))
            }
        };

        Period {
            start,
            end,
            granularity: *self,
        }
    }
}

/// One period's slice of a table, restricted to the assets that passed the
/// period's completeness rule. The asset set may differ between periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodTable {
    pub period: Period,
    pub table: AssetTable,
}

/// A `PeriodTable` whose cells are daily returns.
pub type PeriodReturnTable = PeriodTable;

impl PeriodTable {
    pub fn new(period: Period, table: AssetTable) -> Self {
        Self { period, table }
    }

    /// A period left with no asset columns after filtering.
    pub fn is_zero_width(&self) -> bool {
        self.table.n_assets() == 0
    }
}
