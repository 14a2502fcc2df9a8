//! Decay physics for fling animations.
//!
//! Android-feel spline deceleration: a fling of velocity `v` travels a
//! distance and lasts a duration derived from the `android.widget.Scroller`
//! constants, following a precomputed spline.

use std::sync::LazyLock;

const INFLECTION: f32 = 0.35;
const START_TENSION: f32 = 0.5;
const END_TENSION: f32 = 1.0;
const P1: f32 = START_TENSION * INFLECTION;
const P2: f32 = 1.0 - END_TENSION * (1.0 - INFLECTION);

const NB_SAMPLES: usize = 100;

/// Distance covered (0..=1) at each of the evenly spaced time samples.
static SPLINE_POSITIONS: LazyLock<[f32; NB_SAMPLES + 1]> = LazyLock::new(|| {
    let mut positions = [0.0f32; NB_SAMPLES + 1];
    let mut x_min = 0.0f32;

    for (i, slot) in positions.iter_mut().enumerate().take(NB_SAMPLES) {
        let alpha = i as f32 / NB_SAMPLES as f32;
        let mut x_max = 1.0f32;
        // Bisection for x where the bezier time curve reaches alpha.
        let (x, coef) = loop {
            let x_mid = x_min + (x_max - x_min) / 2.0;
            let coef = 3.0 * x_mid * (1.0 - x_mid);
            let tx = coef * ((1.0 - x_mid) * P1 + x_mid * P2) + x_mid * x_mid * x_mid;
            if (tx - alpha).abs() < 1e-5 {
                break (x_mid, coef);
            }
            if tx > alpha {
                x_max = x_mid;
            } else {
                x_min = x_mid;
            }
        };
        *slot = coef * ((1.0 - x) * START_TENSION + x) + x * x * x;
    }
    positions[NB_SAMPLES] = 1.0;
    positions
});

/// Samples the spline at normalized `time` (0..=1).
///
/// Returns `(distance_fraction, velocity_coefficient)`.
fn spline_at(time: f32) -> (f32, f32) {
    let time = time.clamp(0.0, 1.0);
    let index = (NB_SAMPLES as f32 * time) as usize;
    if index >= NB_SAMPLES {
        return (1.0, 0.0);
    }
    let t_inf = index as f32 / NB_SAMPLES as f32;
    let t_sup = (index + 1) as f32 / NB_SAMPLES as f32;
    let d_inf = SPLINE_POSITIONS[index];
    let d_sup = SPLINE_POSITIONS[index + 1];
    let velocity = (d_sup - d_inf) / (t_sup - t_inf);
    (d_inf + (time - t_inf) * velocity, velocity)
}

const GRAVITY_EARTH: f32 = 9.80665;
const INCHES_PER_METER: f32 = 39.37;
/// `(ln(0.78) / ln(0.9)).abs()`
const DECELERATION_RATE: f64 = 2.358_201_6;

/// Computes fling distance and duration for a given density.
#[derive(Debug, Clone, Copy)]
pub struct FlingCalculator {
    friction: f32,
    physical_coefficient: f32,
}

impl FlingCalculator {
    pub const DEFAULT_FRICTION: f32 = 0.015;

    pub fn new(friction: f32, density: f32) -> Self {
        Self {
            friction,
            physical_coefficient: GRAVITY_EARTH * INCHES_PER_METER * density * 160.0 * 0.84,
        }
    }

    pub fn with_density(density: f32) -> Self {
        Self::new(Self::DEFAULT_FRICTION, density)
    }

    fn spline_deceleration(&self, velocity: f32) -> f64 {
        (INFLECTION as f64 * velocity.abs() as f64
            / (self.friction * self.physical_coefficient) as f64)
            .ln()
    }

    /// Duration of a fling in milliseconds; zero for a zero velocity.
    pub fn fling_duration_millis(&self, velocity: f32) -> u64 {
        if velocity == 0.0 || !velocity.is_finite() {
            return 0;
        }
        let l = self.spline_deceleration(velocity);
        (1000.0 * (l / (DECELERATION_RATE - 1.0)).exp()) as u64
    }

    /// Unsigned distance a fling travels.
    pub fn fling_distance(&self, velocity: f32) -> f32 {
        if velocity == 0.0 || !velocity.is_finite() {
            return 0.0;
        }
        let l = self.spline_deceleration(velocity);
        self.friction
            * self.physical_coefficient
            * (DECELERATION_RATE / (DECELERATION_RATE - 1.0) * l).exp() as f32
    }
}

/// A decay animation has no target: it starts with a velocity and slows to zero.
pub trait DecayAnimationSpec {
    fn value_at(&self, elapsed_nanos: u64, initial_value: f32, initial_velocity: f32) -> f32;

    fn velocity_at(&self, elapsed_nanos: u64, initial_value: f32, initial_velocity: f32) -> f32;

    fn duration_nanos(&self, initial_value: f32, initial_velocity: f32) -> u64;

    fn target_value(&self, initial_value: f32, initial_velocity: f32) -> f32;
}

#[derive(Debug, Clone, Copy)]
pub struct SplineBasedDecaySpec {
    calculator: FlingCalculator,
}

impl SplineBasedDecaySpec {
    pub fn new(density: f32) -> Self {
        Self {
            calculator: FlingCalculator::with_density(density),
        }
    }

    pub fn with_calculator(calculator: FlingCalculator) -> Self {
        Self { calculator }
    }

    fn fraction(&self, elapsed_nanos: u64, initial_velocity: f32) -> Option<(f32, f32)> {
        let duration_millis = self.calculator.fling_duration_millis(initial_velocity);
        if duration_millis == 0 {
            return None;
        }
        let t = (elapsed_nanos / 1_000_000) as f32 / duration_millis as f32;
        Some((t, duration_millis as f32))
    }
}

impl DecayAnimationSpec for SplineBasedDecaySpec {
    fn value_at(&self, elapsed_nanos: u64, initial_value: f32, initial_velocity: f32) -> f32 {
        match self.fraction(elapsed_nanos, initial_velocity) {
            Some((t, _)) => {
                let distance = self.calculator.fling_distance(initial_velocity);
                initial_value + distance * initial_velocity.signum() * spline_at(t).0
            }
            None => initial_value,
        }
    }

    fn velocity_at(&self, elapsed_nanos: u64, _initial_value: f32, initial_velocity: f32) -> f32 {
        match self.fraction(elapsed_nanos, initial_velocity) {
            Some((t, duration_millis)) => {
                let distance = self.calculator.fling_distance(initial_velocity);
                spline_at(t).1 * initial_velocity.signum() * distance / duration_millis * 1000.0
            }
            None => 0.0,
        }
    }

    fn duration_nanos(&self, _initial_value: f32, initial_velocity: f32) -> u64 {
        self.calculator.fling_duration_millis(initial_velocity) * 1_000_000
    }

    fn target_value(&self, initial_value: f32, initial_velocity: f32) -> f32 {
        initial_value + self.calculator.fling_distance(initial_velocity) * initial_velocity.signum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spline_runs_from_zero_to_one_monotonically() {
        assert!(spline_at(0.0).0.abs() < 0.01);
        assert!((spline_at(1.0).0 - 1.0).abs() < 0.01);

        let mut previous = 0.0;
        for i in 0..=100 {
            let (distance, _) = spline_at(i as f32 / 100.0);
            assert!(distance >= previous);
            previous = distance;
        }
    }

    #[test]
    fn faster_fling_goes_further_and_longer() {
        let calculator = FlingCalculator::with_density(2.0);
        assert!(calculator.fling_distance(10_000.0) > calculator.fling_distance(5_000.0));
        assert!(
            calculator.fling_duration_millis(10_000.0) > calculator.fling_duration_millis(5_000.0)
        );
        assert_eq!(calculator.fling_distance(0.0), 0.0);
        assert_eq!(calculator.fling_duration_millis(f32::NAN), 0);
    }

    #[test]
    fn decay_ends_near_target_in_fling_direction() {
        let spec = SplineBasedDecaySpec::new(2.0);
        let duration = spec.duration_nanos(100.0, -4_000.0);
        let end = spec.value_at(duration, 100.0, -4_000.0);
        let target = spec.target_value(100.0, -4_000.0);

        assert!(target < 100.0);
        assert!((end - target).abs() < 10.0, "end {end} target {target}");
        assert!((spec.value_at(0, 100.0, -4_000.0) - 100.0).abs() < 1.0);
        assert_eq!(spec.velocity_at(duration, 100.0, -4_000.0), 0.0);
    }

    #[test]
    fn zero_velocity_decay_stays_put() {
        let spec = SplineBasedDecaySpec::new(1.0);
        assert_eq!(spec.duration_nanos(5.0, 0.0), 0);
        assert_eq!(spec.value_at(1_000_000_000, 5.0, 0.0), 5.0);
        assert_eq!(spec.velocity_at(0, 5.0, 0.0), 0.0);
    }
}
