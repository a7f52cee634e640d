//! Summary statistics over integer reading values.
//!
//! Every function returns `None` for input that is too small to produce a
//! result; "no data" is never an error here. Divisions truncate toward zero.

use std::collections::BTreeMap;

/// Smallest value. The HTTP min endpoint does not call this; it asks the
/// store for SQL `MIN` so only one row crosses the connection.
pub fn min(values: &[i64]) -> Option<i64> {
    values.iter().copied().min()
}

pub fn max(values: &[i64]) -> Option<i64> {
    values.iter().copied().max()
}

/// Integer mean, truncated toward zero: `[22, 50, 100]` gives `172 / 3 = 57`.
pub fn mean(values: &[i64]) -> Option<i64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<i64>() / values.len() as i64)
}

/// Middle value; for even lengths the two middle values are averaged and
/// truncated.
pub fn median(values: &[i64]) -> Option<i64> {
    let sorted = sorted(values);
    let n = sorted.len();
    if n == 0 {
        return None;
    }

    if n % 2 == 1 {
        Some(sorted[n / 2])
    } else {
        Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2)
    }
}

/// Most frequent value. Ties go to the smallest tied value, so the result
/// does not depend on retrieval order.
pub fn mode(values: &[i64]) -> Option<i64> {
    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for &v in values {
        *counts.entry(v).or_default() += 1;
    }

    let mut best: Option<(i64, usize)> = None;
    for (value, count) in counts {
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((value, count)),
        }
    }
    best.map(|(value, _)| value)
}

/// First and third quartile using the exclusive method with linear
/// interpolation. Needs at least two values.
///
/// With `m = n + 1`, the i-th cut point sits at position `i * m / 4`
/// (1-based) in the sorted data. The position is clamped to `[1, n - 1]` so
/// that the interpolation always has a left and right neighbour, which lets
/// the cut extrapolate past the extremes for tiny inputs: `[22, 30]` yields
/// `(20, 32)`.
pub fn quartiles(values: &[i64]) -> Option<(i64, i64)> {
    let sorted = sorted(values);
    if sorted.len() < 2 {
        return None;
    }

    Some((cut_point(&sorted, 1), cut_point(&sorted, 3)))
}

fn cut_point(sorted: &[i64], i: i64) -> i64 {
    const GROUPS: i64 = 4;

    let n = sorted.len() as i64;
    let m = n + 1;
    let j = (i * m / GROUPS).clamp(1, n - 1);
    let delta = i * m - j * GROUPS;

    let lower = sorted[(j - 1) as usize];
    let upper = sorted[j as usize];

    (lower * (GROUPS - delta) + upper * delta) / GROUPS
}

fn sorted(values: &[i64]) -> Vec<i64> {
    let mut v = values.to_vec();
    v.sort_unstable();
    v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_yields_none() {
        assert_eq!(min(&[]), None);
        assert_eq!(max(&[]), None);
        assert_eq!(mean(&[]), None);
        assert_eq!(median(&[]), None);
        assert_eq!(mode(&[]), None);
        assert_eq!(quartiles(&[]), None);
    }

    #[test]
    fn test_min_max() {
        assert_eq!(min(&[50, 22, 100]), Some(22));
        assert_eq!(max(&[50, 22, 100]), Some(100));
    }

    #[test]
    fn test_mean_truncates() {
        assert_eq!(mean(&[22, 50, 100]), Some(57));
        assert_eq!(mean(&[22, 50, 100, 73]), Some(61));
        assert_eq!(mean(&[0, 0]), Some(0));
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[100, 22, 50]), Some(50));
        assert_eq!(median(&[22, 50, 100, 73]), Some(61));
        assert_eq!(median(&[22, 30]), Some(26));
        assert_eq!(median(&[73]), Some(73));
    }

    #[test]
    fn test_mode_single_winner() {
        assert_eq!(mode(&[5, 7, 7, 9]), Some(7));
    }

    #[test]
    fn test_mode_tie_picks_smallest() {
        assert_eq!(mode(&[22, 50, 100, 73]), Some(22));
        assert_eq!(mode(&[9, 3, 9, 3]), Some(3));
    }

    #[test]
    fn test_quartiles_need_two_values() {
        assert_eq!(quartiles(&[73]), None);
    }

    #[test]
    fn test_quartiles_exclusive_method() {
        assert_eq!(quartiles(&[22, 50, 100]), Some((22, 100)));
        assert_eq!(quartiles(&[22, 30]), Some((20, 32)));
        assert_eq!(quartiles(&[22, 50, 100, 73]), Some((29, 93)));
    }

    #[test]
    fn test_quartiles_larger_sample() {
        // positions 2.5 and 7.5 over 1..=9
        assert_eq!(quartiles(&[1, 2, 3, 4, 5, 6, 7, 8, 9]), Some((2, 7)));
    }

    #[test]
    fn test_quartiles_can_extrapolate_below_zero() {
        assert_eq!(quartiles(&[0, 100]), Some((-25, 125)));
    }
}
