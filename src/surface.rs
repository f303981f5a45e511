// FrameSeq Display Surface
// Copyright (c) 2026 Xing_The_Creator | FrameSeq
//
// The thing an animation draws onto. Players only ever hold a Weak handle
// to it, so dropping the owner's Arc is enough to end playback.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use image::{ColorType, RgbaImage};
use tracing::trace;

/// Shape of the image a surface currently holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceLayout {
    pub width: u32,
    pub height: u32,
    pub color: ColorType,
}

pub trait DisplaySurface: Send + Sync {
    /// Show `image`. The pixels are only borrowed for the call; a surface
    /// that needs them later must copy or upload them.
    fn present(&self, image: &RgbaImage);

    /// Whether the surface is currently visible to the user.
    fn is_shown(&self) -> bool;

    /// Layout of the current image, if any.
    fn layout(&self) -> Option<SurfaceLayout>;
}

/// In-memory surface with no window behind it.
pub struct HeadlessSurface {
    image: Mutex<Option<RgbaImage>>,
    shown: AtomicBool,
    presented: AtomicU64,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self {
            image: Mutex::new(None),
            shown: AtomicBool::new(true),
            presented: AtomicU64::new(0),
        }
    }

    pub fn set_shown(&self, shown: bool) {
        self.shown.store(shown, Ordering::SeqCst);
    }

    /// Number of `present` calls so far.
    pub fn presented(&self) -> u64 {
        self.presented.load(Ordering::SeqCst)
    }

    /// Copy of the current image.
    pub fn snapshot(&self) -> Option<RgbaImage> {
        self.image
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for HeadlessSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplaySurface for HeadlessSurface {
    fn present(&self, image: &RgbaImage) {
        let mut current = self.image.lock().unwrap_or_else(PoisonError::into_inner);
        match current.as_mut() {
            Some(existing) if existing.dimensions() == image.dimensions() => {
                existing.copy_from_slice(image.as_raw());
            }
            _ => *current = Some(image.clone()),
        }
        let count = self.presented.fetch_add(1, Ordering::SeqCst) + 1;
        trace!("[SURFACE] Presented frame #{}", count);
    }

    fn is_shown(&self) -> bool {
        self.shown.load(Ordering::SeqCst)
    }

    fn layout(&self) -> Option<SurfaceLayout> {
        let current = self.image.lock().unwrap_or_else(PoisonError::into_inner);
        current.as_ref().map(|img| SurfaceLayout {
            width: img.width(),
            height: img.height(),
            color: ColorType::Rgba8,
        })
    }
}
