//! Multiplicative adjustments applied to the base score

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Penalty for erratic growth, based on the coefficient of variation of the
/// year-over-year series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyFactor {
    pub min: f64,
    pub max: f64,
}

impl Default for ConsistencyFactor {
    fn default() -> Self {
        Self { min: 0.5, max: 1.0 }
    }
}

impl ConsistencyFactor {
    pub fn compute(&self, annual_growth_rates: &[f64]) -> f64 {
        if annual_growth_rates.len() < 2 {
            return self.max;
        }

        let mean = annual_growth_rates.mean();
        if mean.is_nan() || mean <= 0.0 {
            return self.min;
        }

        // sample standard deviation (n - 1)
        let std_dev = annual_growth_rates.std_dev();
        let cf = 1.0 - std_dev / mean;
        if cf.is_nan() {
            return self.min;
        }
        cf.clamp(self.min, self.max)
    }
}

/// Reward for capital efficiency: scales linearly with ROIC/WACC up to parity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityFactor {
    pub min: f64,
    pub max: f64,
}

impl Default for QualityFactor {
    fn default() -> Self {
        Self { min: 0.7, max: 1.0 }
    }
}

impl QualityFactor {
    pub fn compute(&self, roic: f64, wacc: f64) -> f64 {
        if wacc <= 0.0 {
            return self.max;
        }
        // no extra reward past parity; negative ROIC bottoms out at the minimum
        let ratio = (roic / wacc).clamp(0.0, 1.0);
        self.min + (self.max - self.min) * ratio
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_consistency_zero_variance() {
        assert_eq!(ConsistencyFactor::default().compute(&[10.0, 10.0, 10.0]), 1.0);
    }

    #[test]
    fn test_consistency_non_positive_mean() {
        let cf = ConsistencyFactor::default();
        assert_eq!(cf.compute(&[-5.0, -5.0, -5.0]), 0.5);
        assert_eq!(cf.compute(&[-10.0, 0.0, 10.0]), 0.5);
    }

    #[test]
    fn test_consistency_too_few_points() {
        let cf = ConsistencyFactor::default();
        assert_eq!(cf.compute(&[]), 1.0);
        assert_eq!(cf.compute(&[-40.0]), 1.0);
    }

    #[test]
    fn test_consistency_uses_sample_std_dev() {
        // mean 19.633, sample sd 3.4196
        let cf = ConsistencyFactor::default().compute(&[15.7, 21.9, 21.3]);
        assert_relative_eq!(cf, 0.82583, epsilon = 1e-4);
    }

    #[test]
    fn test_consistency_stays_in_bounds() {
        let cf = ConsistencyFactor::default();
        let series: [&[f64]; 5] = [
            &[1.0, 80.0, -30.0],
            &[0.1, 0.2, 1000.0],
            &[5.0, 6.0],
            &[-1e9, 2e9, 1.0],
            &[12.0, 11.5, 12.5],
        ];
        for s in series {
            let value = cf.compute(s);
            assert!((0.5..=1.0).contains(&value), "{:?} -> {}", s, value);
        }
    }

    #[test]
    fn test_quality_at_parity() {
        assert_relative_eq!(QualityFactor::default().compute(12.7, 12.7), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_quality_floor_and_cap() {
        let qf = QualityFactor::default();
        assert_relative_eq!(qf.compute(0.0, 10.0), 0.7, epsilon = 1e-12);
        assert_relative_eq!(qf.compute(-25.0, 10.0), 0.7, epsilon = 1e-12);
        assert_relative_eq!(qf.compute(34.0, 12.7), 1.0, epsilon = 1e-12);
        assert_relative_eq!(qf.compute(5.0, 10.0), 0.85, epsilon = 1e-12);
    }

    #[test]
    fn test_quality_zero_wacc() {
        let qf = QualityFactor::default();
        assert_eq!(qf.compute(3.0, 0.0), 1.0);
        assert_eq!(qf.compute(-3.0, -1.0), 1.0);
    }
}
