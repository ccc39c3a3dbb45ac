use crate::error::CoreError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Identifier of an asset column (e.g. a symbol such as `BTCUSDT`).
pub type AssetId = String;

/// A date-indexed table of per-asset values with explicit missing cells.
///
/// Dates are strictly increasing and unique. Every row has one cell per
/// asset column; `None` marks an absent value and is never imputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetTable {
    dates: Vec<NaiveDate>,
    assets: Vec<AssetId>,
    rows: Vec<Vec<Option<f64>>>,
}

/// Daily close prices, as produced by the loader.
pub type PriceTable = AssetTable;

/// Simple period-over-period returns derived from a `PriceTable`.
pub type ReturnTable = AssetTable;

impl AssetTable {
    /// Builds a table, validating its shape and index.
    ///
    /// Non-finite cells (`NaN`, `inf`) are normalized to `None`.
    pub fn new(
        dates: Vec<NaiveDate>,
        assets: Vec<AssetId>,
        rows: Vec<Vec<Option<f64>>>,
    ) -> Result<Self, CoreError> {
        if dates.len() != rows.len() {
            return Err(CoreError::Data(format!(
                "index has {} dates but table has {} rows",
                dates.len(),
                rows.len()
            )));
        }
        if let Some(pair) = dates.windows(2).find(|w| w[0] >= w[1]) {
            return Err(CoreError::Data(format!(
                "dates must be strictly increasing, found {} followed by {}",
                pair[0], pair[1]
            )));
        }
        let unique: BTreeSet<&AssetId> = assets.iter().collect();
        if unique.len() != assets.len() {
            return Err(CoreError::Data("asset ids must be unique".to_string()));
        }
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != assets.len()) {
            return Err(CoreError::Data(format!(
                "row {} ({}) has {} cells, expected {}",
                i,
                dates[i],
                row.len(),
                assets.len()
            )));
        }

        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(|v| v.filter(|x| x.is_finite())).collect())
            .collect();

        Ok(Self { dates, assets, rows })
    }

    /// Outer-joins `(date, asset, value)` observations into a table.
    ///
    /// Dates and asset ids come out sorted. A later observation for the same
    /// `(date, asset)` replaces an earlier one.
    pub fn from_observations<I>(observations: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = (NaiveDate, AssetId, f64)>,
    {
        let mut by_date: BTreeMap<NaiveDate, BTreeMap<AssetId, f64>> = BTreeMap::new();
        let mut assets = BTreeSet::new();
        for (date, asset, value) in observations {
            assets.insert(asset.clone());
            by_date.entry(date).or_default().insert(asset, value);
        }

        let assets: Vec<AssetId> = assets.into_iter().collect();
        let mut dates = Vec::with_capacity(by_date.len());
        let mut rows = Vec::with_capacity(by_date.len());
        for (date, cells) in by_date {
            dates.push(date);
            rows.push(assets.iter().map(|a| cells.get(a).copied()).collect());
        }

        Self::new(dates, assets, rows)
    }

    /// A table with the given columns and no rows.
    pub fn empty(assets: Vec<AssetId>) -> Self {
        Self {
            dates: Vec::new(),
            assets,
            rows: Vec::new(),
        }
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn assets(&self) -> &[AssetId] {
        &self.assets
    }

    pub fn rows(&self) -> &[Vec<Option<f64>>] {
        &self.rows
    }

    pub fn n_rows(&self) -> usize {
        self.dates.len()
    }

    pub fn n_assets(&self) -> usize {
        self.assets.len()
    }

    /// True when the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn asset_index(&self, asset: &str) -> Option<usize> {
        self.assets.iter().position(|a| a == asset)
    }

    pub fn value(&self, row: usize, col: usize) -> Option<f64> {
        self.rows.get(row).and_then(|r| r.get(col)).copied().flatten()
    }

    /// Looks a cell up by date and asset id.
    pub fn get(&self, date: NaiveDate, asset: &str) -> Option<f64> {
        let row = self.dates.binary_search(&date).ok()?;
        let col = self.asset_index(asset)?;
        self.value(row, col)
    }

    /// Iterates one column top to bottom, including missing cells.
    pub fn column(&self, col: usize) -> impl Iterator<Item = Option<f64>> + '_ {
        self.rows.iter().map(move |row| row.get(col).copied().flatten())
    }

    /// The defined values of one column, in date order.
    pub fn defined_values(&self, col: usize) -> Vec<f64> {
        self.column(col).flatten().collect()
    }

    /// Number of missing cells in one column.
    pub fn missing_count(&self, col: usize) -> usize {
        self.column(col).filter(Option::is_none).count()
    }

    /// Restricts the table to the given row indices (kept in their given order).
    pub fn select_rows(&self, indices: &[usize]) -> Self {
        Self {
            dates: indices.iter().map(|&i| self.dates[i]).collect(),
            assets: self.assets.clone(),
            rows: indices.iter().map(|&i| self.rows[i].clone()).collect(),
        }
    }

    /// Restricts the table to the given column indices.
    pub fn select_assets(&self, cols: &[usize]) -> Self {
        Self {
            dates: self.dates.clone(),
            assets: cols.iter().map(|&c| self.assets[c].clone()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| cols.iter().map(|&c| row[c]).collect())
                .collect(),
        }
    }
}
