// FrameSeq Preloaded Animation
// Copyright (c) 2026 Xing_The_Creator | FrameSeq
//
// Baseline player: every frame is decoded up front and stays resident,
// the way a classic frame-animation drawable works. Same controls as the
// sequence animator so the two can be swapped and compared.

use std::sync::{Arc, Weak};

use image::RgbaImage;
use tracing::info;

use crate::error::AnimationError;
use crate::frames::{Frame, FrameTable};
use crate::playback::{Engine, Painter, PlaybackState, StoppedListener};
use crate::queue::TickQueue;
use crate::resources::FrameLoader;
use crate::surface::DisplaySurface;

struct ResidentFrames {
    images: Vec<RgbaImage>,
}

impl Painter for ResidentFrames {
    fn paint(&mut self, surface: &dyn DisplaySurface, index: usize, _frame: &Frame) {
        if let Some(image) = self.images.get(index) {
            surface.present(image);
        }
    }
}

impl ResidentFrames {
    fn bytes(&self) -> usize {
        self.images.iter().map(|img| img.as_raw().len()).sum()
    }
}

pub struct PreloadedAnimation {
    engine: Engine<ResidentFrames>,
}

impl PreloadedAnimation {
    /// Decode every frame, show frame 0, and bind to `surface`.
    pub fn create<S>(
        queue: &TickQueue,
        surface: &Arc<S>,
        frames: FrameTable,
        loader: &dyn FrameLoader,
        looping: bool,
    ) -> Result<Self, AnimationError>
    where
        S: DisplaySurface + 'static,
    {
        if frames.is_empty() {
            return Err(AnimationError::EmptySequence);
        }

        let images = frames
            .iter()
            .enumerate()
            .map(|(index, frame)| {
                loader
                    .load(frame.image)
                    .map_err(|source| AnimationError::Preload { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        surface.present(&images[0]);
        let painter = ResidentFrames { images };
        info!(
            "[PRELOADED] Decoded {} frames up front ({} bytes resident)",
            frames.len(),
            painter.bytes()
        );

        let weak: Weak<S> = Arc::downgrade(surface);
        Ok(Self {
            engine: Engine::new("[PRELOADED]", queue, weak, frames, painter, looping),
        })
    }

    pub fn start(&self) {
        self.engine.start();
    }

    pub fn stop(&self) {
        self.engine.stop();
    }

    pub fn set_stopped_listener<L>(&self, listener: L)
    where
        L: StoppedListener + 'static,
    {
        self.engine.set_stopped_listener(Some(Arc::new(listener)));
    }

    pub fn clear_stopped_listener(&self) {
        self.engine.set_stopped_listener(None);
    }

    pub fn state(&self) -> PlaybackState {
        self.engine.state()
    }

    pub fn frames(&self) -> &FrameTable {
        self.engine.frames()
    }

    /// Bytes held by the decoded frames.
    pub fn resident_bytes(&self) -> usize {
        self.engine.with_painter(ResidentFrames::bytes)
    }
}

impl Drop for PreloadedAnimation {
    fn drop(&mut self) {
        self.engine.stop();
    }
}
