use crate::error::LoaderError;
use core_types::{PeriodTable, PortfolioReturnSeries, SeriesPoint};
use serde::Serialize;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Writes one `{label}.json` file per period into `out_dir`, creating it if needed.
///
/// Returns the written paths in period order.
pub fn export_period_tables(
    out_dir: &Path,
    periods: &[PeriodTable],
) -> Result<Vec<PathBuf>, LoaderError> {
    fs::create_dir_all(out_dir)?;

    let mut written = Vec::with_capacity(periods.len());
    for period in periods {
        let path = out_dir.join(format!("{}.json", period.period.label()));
        write_json(&path, &period.table)?;
        tracing::debug!(path = %path.display(), assets = period.table.n_assets(), "period exported");
        written.push(path);
    }

    tracing::info!(files = written.len(), dir = %out_dir.display(), "period tables exported");
    Ok(written)
}

/// What the plotting collaborator needs: the raw series and its two derived curves.
#[derive(Debug, Serialize)]
pub struct SeriesExport<'a> {
    pub returns: &'a [SeriesPoint],
    pub wealth: Vec<SeriesPoint>,
    pub drawdown: Vec<SeriesPoint>,
}

impl<'a> SeriesExport<'a> {
    pub fn new(series: &'a PortfolioReturnSeries) -> Self {
        Self {
            returns: series.points(),
            wealth: series.wealth_curve(),
            drawdown: series.drawdown_curve(),
        }
    }
}

/// Writes the portfolio series with its wealth and drawdown curves to `path`.
pub fn export_series(path: &Path, series: &PortfolioReturnSeries) -> Result<(), LoaderError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    write_json(path, &SeriesExport::new(series))?;
    tracing::info!(path = %path.display(), points = series.len(), "portfolio series exported");
    Ok(())
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), LoaderError> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, value)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use core_types::{AssetTable, Granularity};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn writes_one_file_per_period() {
        let dir = tempfile::tempdir().unwrap();
        let table = AssetTable::new(
            vec![day(2), day(3)],
            vec!["BTC".to_string()],
            vec![vec![Some(0.01)], vec![None]],
        )
        .unwrap();
        let periods = vec![PeriodTable::new(Granularity::Monthly.period_of(day(2)), table.clone())];

        let written = export_period_tables(&dir.path().join("periods"), &periods).unwrap();

        assert_eq!(written.len(), 1);
        assert!(written[0].ends_with("2024-01.json"));
        let restored: AssetTable =
            serde_json::from_reader(File::open(&written[0]).unwrap()).unwrap();
        assert_eq!(restored, table);
    }

    #[test]
    fn series_export_carries_derived_curves() {
        let dir = tempfile::tempdir().unwrap();
        let series = PortfolioReturnSeries::from_points(vec![
            SeriesPoint::new(day(1), 0.10),
            SeriesPoint::new(day(2), -0.10),
        ])
        .unwrap();
        let path = dir.path().join("out").join("series.json");

        export_series(&path, &series).unwrap();

        let json: serde_json::Value = serde_json::from_reader(File::open(&path).unwrap()).unwrap();
        assert_eq!(json["returns"].as_array().unwrap().len(), 2);
        assert_eq!(json["wealth"][0]["value"].as_f64().unwrap(), 1.1);
        assert!(json["drawdown"][1]["value"].as_f64().unwrap() < 0.0);
    }
}
