//! Per-platform choice of overscroll effect.

use std::fmt;
use std::rc::Rc;

use cranpose_core::FrameClock;

use super::{NoOpOverscrollEffect, OverscrollConfig, OverscrollEffect, StretchOverscrollEffect};

/// Platform family a scrollable container is built for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TargetPlatform {
    Android,
    Ios,
    Desktop,
    Web,
}

impl TargetPlatform {
    /// The platform this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(target_os = "android") {
            TargetPlatform::Android
        } else if cfg!(target_os = "ios") {
            TargetPlatform::Ios
        } else if cfg!(target_arch = "wasm32") {
            TargetPlatform::Web
        } else {
            TargetPlatform::Desktop
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TargetPlatform::Android => "android",
            TargetPlatform::Ios => "ios",
            TargetPlatform::Desktop => "desktop",
            TargetPlatform::Web => "web",
        }
    }
}

impl fmt::Display for TargetPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Effect a container on `platform` gets, or `None` when the platform draws
/// no overscroll at all.
pub fn platform_overscroll_effect(
    platform: TargetPlatform,
    clock: &FrameClock,
    density: f32,
) -> Option<Rc<dyn OverscrollEffect>> {
    match platform {
        TargetPlatform::Android => Some(Rc::new(StretchOverscrollEffect::new(
            clock.clone(),
            OverscrollConfig::stretch(density),
        ))),
        TargetPlatform::Ios => Some(Rc::new(StretchOverscrollEffect::new(
            clock.clone(),
            OverscrollConfig::bounce(density),
        ))),
        TargetPlatform::Web => Some(Rc::new(NoOpOverscrollEffect)),
        TargetPlatform::Desktop => None,
    }
}

/// Creates one effect per scrollable container.
pub trait OverscrollFactory {
    fn create_overscroll_effect(&self) -> Option<Rc<dyn OverscrollEffect>>;
}

/// Factory backed by [`platform_overscroll_effect`].
#[derive(Clone)]
pub struct PlatformOverscrollFactory {
    platform: TargetPlatform,
    clock: FrameClock,
    density: f32,
}

impl PlatformOverscrollFactory {
    pub fn new(platform: TargetPlatform, clock: FrameClock, density: f32) -> Self {
        Self {
            platform,
            clock,
            density,
        }
    }

    pub fn platform(&self) -> TargetPlatform {
        self.platform
    }
}

impl OverscrollFactory for PlatformOverscrollFactory {
    fn create_overscroll_effect(&self) -> Option<Rc<dyn OverscrollEffect>> {
        platform_overscroll_effect(self.platform, &self.clock, self.density)
    }
}

/// Factory installed for containers that do not pick their own.
///
/// Web and desktop install none, which disables overscroll for every
/// container built without an explicit factory.
pub fn default_overscroll_factory(
    platform: TargetPlatform,
    clock: &FrameClock,
    density: f32,
) -> Option<Rc<dyn OverscrollFactory>> {
    match platform {
        TargetPlatform::Android | TargetPlatform::Ios => Some(Rc::new(
            PlatformOverscrollFactory::new(platform, clock.clone(), density),
        )),
        TargetPlatform::Web | TargetPlatform::Desktop => {
            log::debug!("no default overscroll factory on {platform}");
            None
        }
    }
}
