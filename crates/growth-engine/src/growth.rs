//! Growth-rate primitives

/// Compound annual growth rate in percent, defined across sign changes.
///
/// `start` is the oldest value and `end` the newest. When either side is not
/// positive the compound form is meaningless, so growth is measured linearly
/// against the magnitude of the starting value instead.
pub fn cagr(start: f64, end: f64, years: f64) -> f64 {
    if years <= 0.0 || start == 0.0 {
        return 0.0;
    }

    if start < 0.0 && end > 0.0 {
        ((end - start) / start.abs()) * 100.0 / years
    } else if start > 0.0 && end < 0.0 {
        ((end - start) / start) * 100.0 / years
    } else if start < 0.0 && end < 0.0 {
        // Shrinking losses count as growth
        ((start.abs() - end.abs()) / start.abs()) * 100.0 / years
    } else {
        ((end / start).powf(1.0 / years) - 1.0) * 100.0
    }
}

/// Year-over-year growth in percent, 0 when the prior value is zero
pub fn year_over_year(prev: f64, curr: f64) -> f64 {
    if prev == 0.0 {
        return 0.0;
    }
    ((curr - prev) / prev.abs()) * 100.0
}

/// Round half away from zero to `decimals` places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cagr_positive_compound() {
        assert_relative_eq!(cagr(100.0, 133.1, 3.0), 10.0, epsilon = 1e-9);
        assert_eq!(cagr(100.0, 100.0, 3.0), 0.0);
    }

    #[test]
    fn test_cagr_negative_to_positive() {
        // linear swing relative to the negative base, not the compound form
        assert_relative_eq!(cagr(-100.0, 50.0, 3.0), 50.0, epsilon = 1e-9);
    }

    #[test]
    fn test_cagr_positive_to_negative() {
        assert_relative_eq!(cagr(100.0, -50.0, 3.0), -50.0, epsilon = 1e-9);
    }

    #[test]
    fn test_cagr_shrinking_losses() {
        assert_relative_eq!(cagr(-100.0, -50.0, 3.0), 50.0 / 3.0, epsilon = 1e-9);
        assert_relative_eq!(cagr(-50.0, -100.0, 3.0), -100.0 / 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_cagr_guards() {
        assert_eq!(cagr(0.0, 50.0, 3.0), 0.0);
        assert_eq!(cagr(100.0, 200.0, 0.0), 0.0);
        assert_eq!(cagr(100.0, 200.0, -1.0), 0.0);
    }

    #[test]
    fn test_cagr_positive_to_zero_is_total_loss() {
        assert_relative_eq!(cagr(100.0, 0.0, 3.0), -100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_year_over_year() {
        assert_relative_eq!(year_over_year(100.0, 115.7), 15.7, epsilon = 1e-9);
        assert_relative_eq!(year_over_year(-50.0, 25.0), 150.0, epsilon = 1e-9);
        assert_eq!(year_over_year(0.0, 25.0), 0.0);
    }

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(round_to(2.25, 1), 2.3);
        assert_eq!(round_to(-2.25, 1), -2.3);
        assert_eq!(round_to(0.8258, 3), 0.826);
        assert_eq!(round_to(34.1357, 2), 34.14);
    }
}
