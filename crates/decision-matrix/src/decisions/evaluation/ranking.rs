use std::cmp::Ordering;

use super::RankedOption;

/// Orders evaluated options by descending total score.
///
/// `sort_by` is stable, so options with equal totals keep their input order.
pub(crate) fn rank(options: &mut [RankedOption]) {
    options.sort_by(|a, b| descending(a.total_score, b.total_score));
}

/// Descending comparison that treats incomparable values (NaN) as equal.
pub(crate) fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}
