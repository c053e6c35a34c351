//! Bessel functions of the first kind for integer order, and their zeros.
//!
//! J_n is evaluated from Bessel's integral
//!
//! ```text
//! J_n(x) = 1/(2π) ∫₀^{2π} cos(nτ − x sin τ) dτ
//! ```
//!
//! with the trapezoid rule. The integrand is periodic and entire, so the rule
//! is exact up to aliased terms J_{n ± kN}(x). Those decay like Ai(t) with
//! t = (N − |n| − |x|) / (|x|/2)^{1/3}, so the margin past |x| has to grow
//! with the cube root of the argument.

use std::f64::consts::TAU;

/// Extra quadrature samples beyond |n| + |x|
const QUADRATURE_MARGIN: usize = 48;

/// Additional samples per unit of |x|^{1/3}, about 15 Airy transition widths
const TRANSITION_SAMPLES: f64 = 12.0;

/// Scan step when bracketing zeros (consecutive zeros are never closer than ~3)
const ZERO_SCAN_STEP: f64 = 0.25;

/// Bessel function of the first kind, J_order(x).
pub fn bessel_j(order: i32, x: f64) -> f64 {
    if x == 0.0 {
        return if order == 0 { 1.0 } else { 0.0 };
    }

    let n = order as f64;
    let samples = order.unsigned_abs() as usize
        + x.abs().ceil() as usize
        + QUADRATURE_MARGIN
        + (TRANSITION_SAMPLES * x.abs().cbrt()).ceil() as usize;
    let step = TAU / samples as f64;

    let sum: f64 = (0..samples)
        .map(|k| {
            let tau = k as f64 * step;
            (n * tau - x * tau.sin()).cos()
        })
        .sum();

    sum / samples as f64
}

/// First derivative dJ_order/dx via (J_{n-1} − J_{n+1}) / 2.
pub fn bessel_j_prime(order: i32, x: f64) -> f64 {
    0.5 * (bessel_j(order - 1, x) - bessel_j(order + 1, x))
}

/// The `rank`-th positive zero of J_order (1-based). Returns `None` for rank 0.
pub fn bessel_j_zero(order: u32, rank: u32) -> Option<f64> {
    if rank == 0 {
        return None;
    }
    bessel_j_zeros(order, rank as usize).pop()
}

/// The first `count` positive zeros of J_order, ascending.
pub fn bessel_j_zeros(order: u32, count: usize) -> Vec<f64> {
    let signed_order = order as i32;
    let mut zeros = Vec::with_capacity(count);

    // J_m is positive on (0, m] for m > 0, so the scan can start at x = m.
    let mut lower = order as f64;
    let mut lower_value = bessel_j(signed_order, lower);

    while zeros.len() < count {
        let upper = lower + ZERO_SCAN_STEP;
        let upper_value = bessel_j(signed_order, upper);

        if upper_value == 0.0 {
            zeros.push(upper);
        } else if lower_value.signum() != upper_value.signum() && lower_value != 0.0 {
            zeros.push(bisect(signed_order, lower, upper, lower_value));
        }

        lower = upper;
        lower_value = upper_value;
    }

    zeros
}

/// Bisect a bracketed sign change down to adjacent floats.
fn bisect(order: i32, mut lower: f64, mut upper: f64, mut lower_value: f64) -> f64 {
    loop {
        let mid = 0.5 * (lower + upper);
        if mid <= lower || mid >= upper {
            return mid;
        }

        let mid_value = bessel_j(order, mid);
        if mid_value == 0.0 {
            return mid;
        }

        if mid_value.signum() == lower_value.signum() {
            lower = mid;
            lower_value = mid_value;
        } else {
            upper = mid;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {}, got {} (diff {:e})",
            expected,
            actual,
            (actual - expected).abs()
        );
    }

    #[test]
    fn test_reference_values() {
        assert_close(bessel_j(0, 1.0), 0.765_197_686_557_966_6, 1e-14);
        assert_close(bessel_j(1, 1.0), 0.440_050_585_744_933_5, 1e-14);
        assert_close(bessel_j(0, 10.0), -0.245_935_764_451_348_3, 1e-14);
        assert_close(bessel_j(1, 10.0), 0.043_472_746_168_861_44, 1e-14);
    }

    #[test]
    fn test_value_at_origin() {
        assert_eq!(bessel_j(0, 0.0), 1.0);
        assert_eq!(bessel_j(3, 0.0), 0.0);
        assert_eq!(bessel_j(-2, 0.0), 0.0);
    }

    #[test]
    fn test_negative_order_reflection() {
        for &x in &[0.3, 1.7, 5.2, 12.9] {
            assert_close(bessel_j(-1, x), -bessel_j(1, x), 1e-14);
            assert_close(bessel_j(-2, x), bessel_j(2, x), 1e-14);
        }
    }

    #[test]
    fn test_three_term_recurrence() {
        // J_{n-1}(x) + J_{n+1}(x) = (2n/x) J_n(x)
        for order in 1..6 {
            for &x in &[0.8, 3.3, 9.1, 21.5] {
                let lhs = bessel_j(order - 1, x) + bessel_j(order + 1, x);
                let rhs = 2.0 * order as f64 / x * bessel_j(order, x);
                assert_close(lhs, rhs, 1e-13);
            }
        }
    }

    #[test]
    fn test_derivative_matches_finite_difference() {
        let h = 1e-5;
        for order in 0..4 {
            for &x in &[0.5, 2.0, 7.5] {
                let numeric = (bessel_j(order, x + h) - bessel_j(order, x - h)) / (2.0 * h);
                assert_close(bessel_j_prime(order, x), numeric, 1e-9);
            }
        }
        // J_0' = -J_1
        assert_close(bessel_j_prime(0, 2.5), -bessel_j(1, 2.5), 1e-14);
    }

    #[test]
    fn test_known_zeros() {
        let cases = [
            (0, 1, 2.404_825_557_695_773),
            (0, 2, 5.520_078_110_286_311),
            (1, 1, 3.831_705_970_207_512),
            (1, 5, 16.470_630_050_877_634),
            (2, 1, 5.135_622_301_840_683),
            (2, 5, 17.959_819_494_987_826),
            (2, 6, 21.116_997_053_021_846),
            (6, 2, 13.589_290_170_541_217),
        ];
        for (order, rank, expected) in cases {
            let zero = bessel_j_zero(order, rank).unwrap();
            assert!(
                ((zero - expected) / expected).abs() < 1e-9,
                "j({}, {}) = {}, expected {}",
                order,
                rank,
                zero,
                expected
            );
        }
    }

    #[test]
    fn test_large_argument_values() {
        assert_close(bessel_j(0, 1000.0), 0.024_786_686_152_420_17, 1e-13);
        assert_close(bessel_j(1, 1000.0), 0.004_728_311_907_089_523, 1e-13);
        for &x in &[250.0, 612.5, 1000.0] {
            let lhs = bessel_j(2, x) + bessel_j(4, x);
            let rhs = 6.0 / x * bessel_j(3, x);
            assert_close(lhs, rhs, 1e-13);
        }
    }

    /// McMahon's expansion, accurate to ~1e-14 once the zero is in the hundreds
    fn mcmahon_zero(order: u32, rank: u32) -> f64 {
        let mu = 4.0 * (order as f64).powi(2);
        let beta = (rank as f64 + order as f64 / 2.0 - 0.25) * std::f64::consts::PI;
        let e = 8.0 * beta;
        beta - (mu - 1.0) / e - 4.0 * (mu - 1.0) * (7.0 * mu - 31.0) / (3.0 * e.powi(3))
    }

    #[test]
    fn test_high_rank_zeros() {
        for (order, rank) in [(0, 300), (2, 300)] {
            let zero = bessel_j_zero(order, rank).unwrap();
            let expected = mcmahon_zero(order, rank);
            assert!(
                ((zero - expected) / expected).abs() < 1e-9,
                "j({}, {}) = {}, expected {}",
                order,
                rank,
                zero,
                expected
            );
        }
        assert!((mcmahon_zero(0, 300) - 941.692_530_653).abs() < 1e-8);
    }

    #[test]
    fn test_zero_rank_is_none() {
        assert_eq!(bessel_j_zero(2, 0), None);
    }

    #[test]
    fn test_zeros_are_ascending_roots() {
        let zeros = bessel_j_zeros(3, 6);
        assert_eq!(zeros.len(), 6);
        assert!(zeros[0] > 3.0);
        for pair in zeros.windows(2) {
            assert!(pair[1] - pair[0] > 3.0, "zeros too close: {:?}", pair);
        }
        for &zero in &zeros {
            assert!(bessel_j(3, zero).abs() < 1e-13);
        }
    }

    #[test]
    fn test_zero_prefix_is_stable() {
        let first_four = bessel_j_zeros(1, 4);
        let first_six = bessel_j_zeros(1, 6);
        assert_eq!(&first_six[..4], &first_four[..]);
    }
}
