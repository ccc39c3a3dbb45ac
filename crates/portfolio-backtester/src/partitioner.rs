use core_types::{AssetTable, CompletenessPolicy, CoreError, Granularity, Period, PeriodTable};
use std::collections::BTreeMap;

/// Splits a table into calendar periods in ascending order.
///
/// Every date lands in exactly one period. Within each period, asset columns
/// are filtered by `policy`. A period left with no columns is kept as a
/// zero-width table rather than dropped, so callers see every period that
/// had dates.
pub fn partition(
    table: &AssetTable,
    granularity: Granularity,
    policy: CompletenessPolicy,
) -> Result<Vec<PeriodTable>, CoreError> {
    if table.is_empty() {
        return Err(CoreError::InsufficientData(
            "cannot partition a table with no rows".to_string(),
        ));
    }

    let mut buckets: BTreeMap<Period, Vec<usize>> = BTreeMap::new();
    for (row, date) in table.dates().iter().enumerate() {
        buckets.entry(granularity.period_of(*date)).or_default().push(row);
    }

    let periods: Vec<PeriodTable> = buckets
        .into_iter()
        .map(|(period, rows)| {
            let slice = table.select_rows(&rows);
            let keep: Vec<usize> = (0..slice.n_assets())
                .filter(|&col| policy.keeps(slice.missing_count(col), slice.n_rows()))
                .collect();

            if keep.is_empty() {
                tracing::warn!(%period, "no asset satisfies the completeness policy");
            } else {
                tracing::debug!(%period, days = rows.len(), assets = keep.len(), "period partitioned");
            }
            PeriodTable::new(period, slice.select_assets(&keep))
        })
        .collect();

    tracing::info!(periods = periods.len(), ?granularity, ?policy, "table partitioned");
    Ok(periods)
}
