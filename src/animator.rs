// FrameSeq Sequence Animator
// Copyright (c) 2026 Xing_The_Creator | FrameSeq
//
// Frame-by-frame player: decodes one frame per tick into a single reused
// buffer instead of keeping every frame resident, and only holds a weak
// handle to the surface it draws on.

use std::sync::{Arc, Weak};

use tracing::{debug, info};

use crate::buffer::{FrameRenderer, RenderOutcome, ReusableBuffer};
use crate::error::AnimationError;
use crate::frames::{Frame, FrameTable};
use crate::playback::{Engine, Painter, PlaybackState, StoppedListener};
use crate::queue::TickQueue;
use crate::resources::{FrameLoader, ResourceTable};
use crate::surface::DisplaySurface;

struct SequencePainter {
    loader: Arc<dyn FrameLoader>,
    renderer: FrameRenderer,
}

impl Painter for SequencePainter {
    fn paint(&mut self, surface: &dyn DisplaySurface, index: usize, frame: &Frame) {
        let outcome = self.renderer.render(self.loader.as_ref(), surface, frame);
        if outcome != RenderOutcome::Reused {
            debug!("[ANIMATOR] Frame {} rendered: {:?}", index, outcome);
        }
    }
}

pub struct SequenceAnimator {
    engine: Engine<SequencePainter>,
}

impl SequenceAnimator {
    /// Bind a frame table to `surface`.
    ///
    /// Frame 0 is decoded and shown right away. If the surface then holds an
    /// RGBA8 image, a buffer of that shape is allocated and every later frame
    /// is decoded into it.
    pub fn create<S>(
        queue: &TickQueue,
        surface: &Arc<S>,
        frames: FrameTable,
        loader: Arc<dyn FrameLoader>,
        looping: bool,
    ) -> Result<Self, AnimationError>
    where
        S: DisplaySurface + 'static,
    {
        let first = *frames.first().ok_or(AnimationError::EmptySequence)?;
        let pixels = loader.load(first.image).map_err(AnimationError::FirstFrame)?;
        surface.present(&pixels);

        let buffer = surface.layout().and_then(ReusableBuffer::matching);
        let painter = SequencePainter {
            loader,
            renderer: FrameRenderer::new(buffer),
        };

        let weak: Weak<S> = Arc::downgrade(surface);
        info!(
            "[ANIMATOR] Created for {} frames (loop: {}, cycle: {}ms)",
            frames.len(),
            looping,
            frames.cycle_millis()
        );
        Ok(Self {
            engine: Engine::new("[ANIMATOR]", queue, weak, frames, painter, looping),
        })
    }

    /// Build the frame table from two named resource arrays and bind it to `surface`.
    pub fn from_resources<S>(
        queue: &TickQueue,
        surface: &Arc<S>,
        resources: Arc<ResourceTable>,
        images: &str,
        durations: &str,
        looping: bool,
    ) -> Result<Self, AnimationError>
    where
        S: DisplaySurface + 'static,
    {
        let frames = FrameTable::from_resources(&resources, images, durations)?;
        Self::create(queue, surface, frames, resources, looping)
    }

    /// Start (or resume) playback. Calling it while running does nothing.
    pub fn start(&self) {
        self.engine.start();
    }

    /// Stop playback and cancel the pending tick. No-op when idle.
    pub fn stop(&self) {
        self.engine.stop();
    }

    /// Replace the stopped listener.
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

    /// False once a decode into the shared buffer has failed (or none was allocated).
    pub fn is_reusing_buffer(&self) -> bool {
        self.engine.with_painter(|p| p.renderer.has_buffer())
    }

    /// Bytes held by the reusable buffer.
    pub fn resident_bytes(&self) -> usize {
        self.engine.with_painter(|p| p.renderer.buffer_bytes())
    }
}

impl Drop for SequenceAnimator {
    fn drop(&mut self) {
        self.engine.stop();
    }
}
