//! Threshold rounding of normalized phase into whole 2π jumps.

use spgen_core::TWO_PI;

/// Rounds `x` toward zero unless its fractional magnitude exceeds
/// `threshold`, in which case it rounds one unit away from zero.
///
/// `threshold_round(0.85, 0.8) == 1`, `threshold_round(-1.85, 0.8) == -2`,
/// `threshold_round(0.75, 0.8) == 0`.
pub fn threshold_round(x: f64, threshold: f64) -> i64 {
    let whole = x.trunc();
    let frac = x.abs() - whole.abs();
    if frac > threshold {
        (whole + x.signum()) as i64
    } else {
        whole as i64
    }
}

/// Jump count of `phase` relative to its calibration `offset`.
pub fn normalized_jump(phase: f64, offset: f64, threshold: f64) -> i64 {
    threshold_round((phase - offset) / TWO_PI, threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_values() {
        assert_eq!(threshold_round(0.75, 0.8), 0);
        assert_eq!(threshold_round(0.85, 0.8), 1);
        assert_eq!(threshold_round(-1.85, 0.8), -2);
        assert_eq!(threshold_round(5.0, 0.8), 5);
        assert_eq!(threshold_round(-0.3, 0.8), 0);
        assert_eq!(threshold_round(-19.75, 0.8), -19);
    }

    #[test]
    fn representation_error_can_cross_threshold() {
        // |-19.8| - 19 evaluates to 0.8000000000000007.
        assert_eq!(threshold_round(-19.8, 0.8), -20);
        assert_eq!(threshold_round(19.8, 0.8), 20);
    }

    #[test]
    fn fraction_equal_to_threshold_stays_put() {
        assert_eq!(threshold_round(0.5, 0.5), 0);
        assert_eq!(threshold_round(-2.5, 0.5), -2);
    }

    #[test]
    fn normalized_against_offset() {
        let offset = 1.3;
        assert_eq!(normalized_jump(offset, offset, 0.8), 0);
        assert_eq!(normalized_jump(offset + TWO_PI, offset, 0.8), 1);
        assert_eq!(normalized_jump(offset + 0.9 * TWO_PI, offset, 0.8), 1);
        assert_eq!(normalized_jump(offset - 0.9 * TWO_PI, offset, 0.8), -1);
        assert_eq!(normalized_jump(offset + 0.5 * TWO_PI, offset, 0.8), 0);
    }
}
