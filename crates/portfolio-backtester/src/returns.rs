use core_types::{CoreError, PriceTable, ReturnTable};

/// Converts a price table into simple daily returns.
///
/// `r[t, a] = p[t, a] / p[t-1, a] - 1` when both prices exist and the prior
/// one is non-zero; otherwise the cell is missing. The first date has no
/// prior price and is dropped, as is any later date on which every asset's
/// return is missing.
pub fn compute_returns(prices: &PriceTable) -> Result<ReturnTable, CoreError> {
    if prices.n_rows() == 0 || prices.n_assets() == 0 {
        return Err(CoreError::Data(format!(
            "price table must be non-empty, got {} rows and {} assets",
            prices.n_rows(),
            prices.n_assets()
        )));
    }

    let mut dates = Vec::with_capacity(prices.n_rows().saturating_sub(1));
    let mut rows = Vec::with_capacity(prices.n_rows().saturating_sub(1));

    for (t, window) in prices.rows().windows(2).enumerate() {
        let (prev, curr) = (&window[0], &window[1]);
        let row: Vec<Option<f64>> = prev
            .iter()
            .zip(curr)
            .map(|(p, c)| match (p, c) {
                (Some(p), Some(c)) if *p != 0.0 => Some(c / p - 1.0),
                _ => None,
            })
            .collect();

        if row.iter().all(Option::is_none) {
            tracing::debug!(date = %prices.dates()[t + 1], "dropping date with no defined return");
            continue;
        }
        dates.push(prices.dates()[t + 1]);
        rows.push(row);
    }

    ReturnTable::new(dates, prices.assets().to_vec(), rows)
}
