use crate::error::LoaderError;
use chrono::{DateTime, NaiveDate, Utc};
use core_types::{AssetId, PriceTable};
use polars::prelude::*;
use std::path::{Path, PathBuf};

/// Column holding the bar's close time in epoch milliseconds.
pub const TIME_COLUMN: &str = "close_time";
/// Column holding the bar's close price.
pub const PRICE_COLUMN: &str = "close";

/// Lists `*{pattern}*.parquet` files in `folder`, sorted by path.
pub fn discover_files(folder: &Path, pattern: &str) -> Result<Vec<PathBuf>, LoaderError> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(folder)? {
        let path = entry?.path();
        let is_parquet = path.extension().is_some_and(|ext| ext == "parquet");
        let matches = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.contains(pattern));
        if path.is_file() && is_parquet && matches {
            files.push(path);
        }
    }
    files.sort();

    if files.is_empty() {
        return Err(LoaderError::NoFilesFound {
            folder: folder.to_path_buf(),
            pattern: pattern.to_string(),
        });
    }
    Ok(files)
}

/// Loads every matching parquet file and outer-joins them into one `PriceTable`.
///
/// Each file is one asset, named by its file stem. Close times are
/// normalized to their UTC calendar date; a date missing for an asset is
/// left as an explicit missing cell.
pub fn load_prices(folder: &Path, pattern: &str) -> Result<PriceTable, LoaderError> {
    let files = discover_files(folder, pattern)?;
    tracing::info!(files = files.len(), folder = %folder.display(), pattern, "loading price files");

    let mut observations = Vec::new();
    for file in &files {
        let asset = asset_id(file);
        let closes = read_closes(file)?;
        tracing::debug!(%asset, rows = closes.len(), "read price file");
        observations.extend(closes.into_iter().map(|(date, close)| (date, asset.clone(), close)));
    }

    let table = PriceTable::from_observations(observations)?;
    tracing::info!(
        dates = table.n_rows(),
        assets = table.n_assets(),
        "price table assembled"
    );
    Ok(table)
}

/// Reads `(date, close)` pairs from one file, skipping rows with a null field.
///
/// Bars are ordered by close time, so when several share a date the last
/// one wins once they are joined.
pub fn read_closes(file: &Path) -> Result<Vec<(NaiveDate, f64)>, LoaderError> {
    let df = LazyFrame::scan_parquet(file, ScanArgsParquet::default())?
        .select([
            col(TIME_COLUMN).cast(DataType::Int64),
            col(PRICE_COLUMN).cast(DataType::Float64),
        ])
        .collect()?;

    let times = df.column(TIME_COLUMN)?.i64()?;
    let closes = df.column(PRICE_COLUMN)?.f64()?;

    let mut bars: Vec<(i64, f64)> = times
        .into_iter()
        .zip(closes.into_iter())
        .filter_map(|(time, close)| Some((time?, close?)))
        .collect();
    bars.sort_by_key(|(millis, _)| *millis);

    let mut rows = Vec::with_capacity(bars.len());
    for (millis, close) in bars {
        let date = DateTime::<Utc>::from_timestamp_millis(millis)
            .ok_or_else(|| LoaderError::InvalidTimestamp {
                file: file.display().to_string(),
                millis,
            })?
            .date_naive();
        rows.push((date, close));
    }
    Ok(rows)
}

fn asset_id(file: &Path) -> AssetId {
    file.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
