/// Small numeric helpers shared by the property tables and tests.

/// Assert that the percentage deviation between two values stays under a
/// threshold. Useful where a test cares about "within n percent" rather than
/// an absolute epsilon.
#[macro_export]
macro_rules! assert_deviation {
    ($actual:expr, $expected:expr, $max_deviation:expr) => {{
        let actual_val = $actual;
        let expected_val = $expected;
        let max_dev = $max_deviation;
        let actual_deviation = $crate::math_utils::deviation(actual_val, expected_val);

        if actual_deviation >= max_dev {
            panic!(
                "assertion failed: deviation {:.2}% >= {:.2}%\n  actual: {:?},\n  expected: {:?}",
                actual_deviation, max_dev, actual_val, expected_val
            );
        }
    }};
}

/// Linear interpolation: `ratio` 0.0 gives `a`, 1.0 gives `b`.
pub fn lerp(a: f64, b: f64, ratio: f64) -> f64 {
    a + (b - a) * ratio
}

/// Percentage deviation of `actual` from `expected`, as a positive number.
pub fn deviation(actual: f64, expected: f64) -> f64 {
    if expected.abs() < f64::EPSILON {
        if actual.abs() < f64::EPSILON {
            0.0
        } else {
            f64::INFINITY
        }
    } else {
        ((actual - expected).abs() / expected.abs()) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(0.0, 10.0, 0.0), 0.0);
        assert_eq!(lerp(0.0, 10.0, 1.0), 10.0);
        assert_eq!(lerp(1500.0, 1700.0, 0.25), 1550.0);
    }

    #[test]
    fn test_deviation() {
        assert_eq!(deviation(105.0, 100.0), 5.0);
        assert_eq!(deviation(95.0, 100.0), 5.0);
        assert_eq!(deviation(0.0, 0.0), 0.0);
        assert_eq!(deviation(10.0, 0.0), f64::INFINITY);
    }

    #[test]
    fn test_assert_deviation_macro() {
        assert_deviation!(1630.0, 1625.0, 1.0);
    }

    #[test]
    #[should_panic(expected = "assertion failed: deviation")]
    fn test_assert_deviation_macro_fails() {
        assert_deviation!(120.0, 100.0, 10.0);
    }
}
