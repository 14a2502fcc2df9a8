//! Foundation elements for Cranpose scrolling
//!
//! This crate hosts the overscroll contract and the scroll pipeline that
//! drives it: nested scroll dispatch, scroll state and fling handling.

pub mod gesture_constants;
pub mod nested_scroll;
pub mod overscroll;
pub mod scrollable;

pub use nested_scroll::{NestedScrollChain, NestedScrollConnection, NestedScrollSource};
pub use overscroll::{
    default_overscroll_factory, platform_overscroll_effect, NoOpOverscrollEffect,
    OverscrollConfig, OverscrollDecoration, OverscrollEffect, OverscrollFactory,
    OverscrollModifier, OverscrollPhase, PerformFling, PlatformOverscrollFactory,
    StretchOverscrollEffect, TargetPlatform,
};
pub use scrollable::{Orientation, ScrollState, ScrollableDispatch, ScrollableDispatchBuilder};

pub mod prelude {
    pub use crate::nested_scroll::NestedScrollSource;
    pub use crate::overscroll::{OverscrollEffect, OverscrollPhase};
    pub use crate::scrollable::{Orientation, ScrollState, ScrollableDispatch};
}
