use core_types::AssetTable;

/// Which end of the cross-sectional distribution to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tail {
    Top,
    Bottom,
}

/// Linearly interpolated quantile of an ascending slice.
///
/// The quantile sits at position `(n - 1) * q` between the two closest ranks.
pub(crate) fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = (sorted.len() - 1) as f64 * q.clamp(0.0, 1.0);
    let lo = pos.floor() as usize;
    let hi = (pos.ceil() as usize).min(sorted.len() - 1);
    let frac = pos - lo as f64;
    Some(sorted[lo] + frac * (sorted[hi] - sorted[lo]))
}

/// Compounded return `prod(1 + r) - 1` of every column with at least one defined value.
pub(crate) fn compounded_returns(table: &AssetTable) -> Vec<(usize, f64)> {
    (0..table.n_assets())
        .filter_map(|col| {
            let values = table.defined_values(col);
            if values.is_empty() {
                return None;
            }
            let growth: f64 = values.iter().map(|r| 1.0 + r).product();
            Some((col, growth - 1.0))
        })
        .collect()
}

/// Column indices whose compounded return lies in the top (or bottom) `fraction`.
///
/// The cutoff is inclusive, so ties at the cutoff are all selected and the
/// result can hold more than `fraction * n` assets.
pub(crate) fn select_tail(table: &AssetTable, fraction: f64, tail: Tail) -> Vec<usize> {
    let scores = compounded_returns(table);
    let mut sorted: Vec<f64> = scores.iter().map(|(_, s)| *s).filter(|s| s.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);

    let q = match tail {
        Tail::Top => 1.0 - fraction,
        Tail::Bottom => fraction,
    };
    let Some(cutoff) = quantile(&sorted, q) else {
        return Vec::new();
    };

    tracing::debug!(?tail, fraction, cutoff, candidates = sorted.len(), "quantile cutoff");

    scores
        .into_iter()
        .filter(|(_, s)| s.is_finite())
        .filter(|(_, s)| match tail {
            Tail::Top => *s >= cutoff,
            Tail::Bottom => *s <= cutoff,
        })
        .map(|(col, _)| col)
        .collect()
}
