//! Pure math/data for scroll geometry & units in Cranpose
//!
//! This crate contains the offset, velocity, size and layer types shared by
//! the scroll pipeline, the overscroll effects and the render layer.

mod geometry;
mod unit;
mod velocity;

pub use geometry::*;
pub use unit::*;
pub use velocity::*;

pub mod prelude {
    pub use crate::geometry::{GraphicsLayer, Offset, Size};
    pub use crate::unit::Dp;
    pub use crate::velocity::Velocity;
}
