//! Assertion helpers for scroll and overscroll tests.
//!
//! Scroll math runs in f32 across many frames, so exact comparisons are
//! usually wrong; these helpers compare within a tolerance and print both
//! sides on failure.

use cranpose_ui_graphics::{Offset, Velocity};

/// Assert that a value is within `tolerance` of `expected`.
pub fn assert_approx_eq(actual: f32, expected: f32, tolerance: f32, msg: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "{}: expected {} (±{}), got {} (diff: {})",
        msg,
        expected,
        tolerance,
        actual,
        diff
    );
}

pub fn assert_offset_approx_eq(actual: Offset, expected: Offset, tolerance: f32, msg: &str) {
    assert_approx_eq(actual.x, expected.x, tolerance, &format!("{} - x", msg));
    assert_approx_eq(actual.y, expected.y, tolerance, &format!("{} - y", msg));
}

pub fn assert_velocity_approx_eq(actual: Velocity, expected: Velocity, tolerance: f32, msg: &str) {
    assert_offset_approx_eq(
        actual.as_offset(),
        expected.as_offset(),
        tolerance,
        msg,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approx_eq_accepts_values_inside_tolerance() {
        assert_approx_eq(1.0, 1.05, 0.1, "close");
        assert_offset_approx_eq(Offset::new(0.0, -40.001), Offset::new(0.0, -40.0), 0.01, "offset");
    }

    #[test]
    #[should_panic(expected = "far - y")]
    fn offset_mismatch_names_the_axis() {
        assert_offset_approx_eq(Offset::new(0.0, 3.0), Offset::ZERO, 0.5, "far");
    }
}
