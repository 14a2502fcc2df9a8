//! Spring physics used to relax overscroll back to rest.
//!
//! The simulation is closed-form (no integration step), so sampling it at an
//! arbitrary frame time gives the same answer regardless of frame pacing.

/// Spring animation configuration, in pixels and seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringSpec {
    /// 1.0 = critically damped, < 1.0 = bouncy, > 1.0 = sluggish.
    pub damping_ratio: f32,
    /// Higher values settle faster.
    pub stiffness: f32,
    /// Speed (px/sec) below which the spring may be considered at rest.
    pub velocity_threshold: f32,
    /// Distance (px) from the target below which the spring may be considered at rest.
    pub position_threshold: f32,
}

impl SpringSpec {
    pub const DAMPING_RATIO_NO_BOUNCY: f32 = 1.0;
    pub const DAMPING_RATIO_LOW_BOUNCY: f32 = 0.75;
    pub const DAMPING_RATIO_MEDIUM_BOUNCY: f32 = 0.5;

    pub const STIFFNESS_HIGH: f32 = 10_000.0;
    pub const STIFFNESS_MEDIUM: f32 = 1_500.0;
    pub const STIFFNESS_MEDIUM_LOW: f32 = 400.0;
    pub const STIFFNESS_LOW: f32 = 200.0;

    pub const fn new(damping_ratio: f32, stiffness: f32) -> Self {
        Self {
            damping_ratio,
            stiffness,
            velocity_threshold: 1.0,
            position_threshold: 0.5,
        }
    }

    pub fn default_spring() -> Self {
        Self::new(Self::DAMPING_RATIO_NO_BOUNCY, Self::STIFFNESS_MEDIUM)
    }

    pub fn bouncy() -> Self {
        Self::new(Self::DAMPING_RATIO_MEDIUM_BOUNCY, Self::STIFFNESS_MEDIUM)
    }

    pub fn stiff() -> Self {
        Self::new(Self::DAMPING_RATIO_NO_BOUNCY, Self::STIFFNESS_HIGH)
    }

    pub fn with_thresholds(mut self, position_threshold: f32, velocity_threshold: f32) -> Self {
        self.position_threshold = position_threshold;
        self.velocity_threshold = velocity_threshold;
        self
    }
}

impl Default for SpringSpec {
    fn default() -> Self {
        Self::default_spring()
    }
}

/// Damped harmonic oscillator pulling a value towards `target`.
#[derive(Debug, Clone, Copy)]
pub struct SpringSimulation {
    spec: SpringSpec,
    target: f32,
}

/// Position and velocity of a spring at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringState {
    pub value: f32,
    pub velocity: f32,
}

impl SpringSimulation {
    pub fn new(spec: SpringSpec, target: f32) -> Self {
        let spec = SpringSpec {
            damping_ratio: spec.damping_ratio.max(0.0),
            stiffness: spec.stiffness.max(f32::EPSILON),
            ..spec
        };
        Self { spec, target }
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn spec(&self) -> SpringSpec {
        self.spec
    }

    /// Samples the spring `elapsed_secs` after it was released from
    /// `initial_value` moving at `initial_velocity`.
    pub fn state_at(
        &self,
        initial_value: f32,
        initial_velocity: f32,
        elapsed_secs: f32,
    ) -> SpringState {
        let omega = (self.spec.stiffness as f64).sqrt();
        let zeta = self.spec.damping_ratio as f64;
        let x0 = (initial_value - self.target) as f64;
        let v0 = initial_velocity as f64;
        let t = elapsed_secs.max(0.0) as f64;

        let (displacement, velocity) = if (zeta - 1.0).abs() < 1e-6 {
            let b = v0 + omega * x0;
            let decay = (-omega * t).exp();
            let x = (x0 + b * t) * decay;
            let v = (v0 - omega * b * t) * decay;
            (x, v)
        } else if zeta < 1.0 {
            let damped = omega * (1.0 - zeta * zeta).sqrt();
            let decay = (-zeta * omega * t).exp();
            let a = x0;
            let b = (v0 + zeta * omega * x0) / damped;
            let (sin, cos) = (damped * t).sin_cos();
            let x = decay * (a * cos + b * sin);
            let v = decay
                * ((b * damped - zeta * omega * a) * cos - (a * damped + zeta * omega * b) * sin);
            (x, v)
        } else {
            let root = omega * (zeta * zeta - 1.0).sqrt();
            let r1 = -zeta * omega + root;
            let r2 = -zeta * omega - root;
            let c2 = (v0 - r1 * x0) / (r2 - r1);
            let c1 = x0 - c2;
            let e1 = (r1 * t).exp();
            let e2 = (r2 * t).exp();
            (c1 * e1 + c2 * e2, c1 * r1 * e1 + c2 * r2 * e2)
        };

        SpringState {
            value: self.target + displacement as f32,
            velocity: velocity as f32,
        }
    }

    pub fn is_at_rest(&self, state: SpringState) -> bool {
        (state.value - self.target).abs() < self.spec.position_threshold
            && state.velocity.abs() < self.spec.velocity_threshold
    }
}
