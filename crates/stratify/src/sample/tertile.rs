//! Equal-frequency binning into three strata.

use serde::{Deserialize, Serialize};

/// One of three equal-frequency income bins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tertile {
    Low,
    Medium,
    High,
}

impl Tertile {
    /// All tertiles in ascending order.
    pub const ALL: [Tertile; 3] = [Tertile::Low, Tertile::Medium, Tertile::High];

    pub fn label(&self) -> &'static str {
        match self {
            Tertile::Low => "Low",
            Tertile::Medium => "Medium",
            Tertile::High => "High",
        }
    }
}

impl std::fmt::Display for Tertile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Quantile edges at probabilities 0, 1/3, 2/3 and 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TertileBounds {
    pub min: f64,
    pub lower: f64,
    pub upper: f64,
    pub max: f64,
}

impl TertileBounds {
    /// Compute edges from unsorted values. `None` when there are no values.
    pub fn compute(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        Some(Self {
            min: sorted[0],
            lower: quantile_sorted(&sorted, cut_probability(1)),
            upper: quantile_sorted(&sorted, cut_probability(2)),
            max: sorted[sorted.len() - 1],
        })
    }

    /// Bins are right-closed; the lowest bin also takes the minimum.
    pub fn classify(&self, value: f64) -> Tertile {
        if value <= self.lower {
            Tertile::Low
        } else if value <= self.upper {
            Tertile::Medium
        } else {
            Tertile::High
        }
    }

    /// Whether two or more edges coincide, leaving a bin empty or thin.
    pub fn has_duplicate_edges(&self) -> bool {
        self.min == self.lower || self.lower == self.upper || self.upper == self.max
    }
}

/// Probability of the `k`-th interior tertile edge.
///
/// The reference quantile-cut scales `k / 3` to a percentage and back, which
/// lands one ulp below the exact third (`0.33333333333333326`). Keeping that
/// round trip puts an order statistic sitting exactly on an edge in the
/// upper bin, as the reference does.
pub fn cut_probability(k: u32) -> f64 {
    (f64::from(k) / 3.0 * 100.0) / 100.0
}

/// Linear-interpolation quantile of an ascending slice.
///
/// Uses the virtual index `h = (n - 1) * p` and interpolates between the
/// neighbouring order statistics. The interpolation is taken from the upper
/// neighbour when the fraction is at least one half, which keeps results
/// bit-identical with the common numerical-library implementation.
pub fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }

    let h = (n - 1) as f64 * p;
    let lo = (h.floor() as usize).min(n - 1);
    let hi = (lo + 1).min(n - 1);
    let t = h - lo as f64;

    let a = sorted[lo];
    let b = sorted[hi];
    let diff = b - a;
    if t >= 0.5 {
        b - diff * (1.0 - t)
    } else {
        a + diff * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantile_interpolates() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile_sorted(&sorted, 0.0), 1.0);
        assert_eq!(quantile_sorted(&sorted, 1.0), 4.0);
        assert_eq!(quantile_sorted(&sorted, 0.5), 2.5);
        assert_eq!(quantile_sorted(&sorted, 1.0 / 3.0), 2.0);
    }

    #[test]
    fn test_bounds_for_one_to_ten() {
        let values: Vec<f64> = (1..=10).map(f64::from).collect();
        let bounds = TertileBounds::compute(&values).unwrap();

        assert_eq!(bounds.min, 1.0);
        assert_eq!(bounds.max, 10.0);
        // h falls just short of the order statistic, so 4 and 7 move up a bin.
        assert!(bounds.lower < 4.0 && bounds.lower > 4.0 - 1e-12);
        assert!(bounds.upper < 7.0 && bounds.upper > 7.0 - 1e-12);

        let mut counts = [0usize; 3];
        for &v in &values {
            counts[bounds.classify(v) as usize] += 1;
        }
        assert_eq!(counts, [3, 3, 4]);
    }

    #[test]
    fn test_cut_probability_round_trips_through_percent() {
        assert_eq!(cut_probability(1), 0.33333333333333326);
        assert_eq!(cut_probability(2), 0.6666666666666665);
        assert!(cut_probability(1) < 1.0 / 3.0);
        assert!(cut_probability(2) < 2.0 / 3.0);
    }

    #[test]
    fn test_classify_is_right_closed() {
        let values: Vec<f64> = (1..=9).map(f64::from).collect();
        let bounds = TertileBounds::compute(&values).unwrap();
        // h = 8/3 → 3.666.., h = 16/3 → 6.333..
        let tertiles: Vec<Tertile> = values.iter().map(|&v| bounds.classify(v)).collect();

        assert_eq!(
            tertiles,
            vec![
                Tertile::Low,
                Tertile::Low,
                Tertile::Low,
                Tertile::Medium,
                Tertile::Medium,
                Tertile::Medium,
                Tertile::High,
                Tertile::High,
                Tertile::High,
            ]
        );
    }

    #[test]
    fn test_unsorted_input() {
        let bounds = TertileBounds::compute(&[30.0, 10.0, 20.0]).unwrap();
        assert_eq!(bounds.min, 10.0);
        assert_eq!(bounds.lower, quantile_sorted(&[10.0, 20.0, 30.0], cut_probability(1)));
        assert_eq!(bounds.classify(10.0), Tertile::Low);
        assert_eq!(bounds.classify(20.0), Tertile::Medium);
        assert_eq!(bounds.classify(30.0), Tertile::High);
    }

    #[test]
    fn test_empty_and_constant() {
        assert!(TertileBounds::compute(&[]).is_none());

        let bounds = TertileBounds::compute(&[5.0, 5.0, 5.0]).unwrap();
        assert!(bounds.has_duplicate_edges());
        assert_eq!(bounds.classify(5.0), Tertile::Low);

        let bounds = TertileBounds::compute(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert!(!bounds.has_duplicate_edges());
    }
}
