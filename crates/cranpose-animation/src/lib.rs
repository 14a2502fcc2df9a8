//! Animation system for Cranpose
//!
//! Spring and spline-decay physics plus the frame-driven loops that run
//! them on a [`cranpose_core::FrameClock`].

pub mod animate;
pub mod decay_spec;
pub mod spring;

pub use animate::{animate_decay, animate_spring, AnimationEndReason, AnimationResult, FrameControl};
pub use decay_spec::{DecayAnimationSpec, FlingCalculator, SplineBasedDecaySpec};
pub use spring::{SpringSimulation, SpringSpec, SpringState};
