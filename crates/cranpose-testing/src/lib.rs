//! Testing utilities and harness for Cranpose

pub mod assertions;
pub mod recording;
pub mod testing;

pub use assertions::{assert_approx_eq, assert_offset_approx_eq, assert_velocity_approx_eq};
pub use recording::{OverscrollRecord, RecordingOverscrollEffect};
pub use testing::*;

pub mod prelude {
    pub use crate::assertions::*;
    pub use crate::recording::*;
    pub use crate::testing::*;
}
