// FrameSeq Reusable Frame Buffer
// Copyright (c) 2026 Xing_The_Creator | FrameSeq
//
// An arena of one: a single RGBA scratch image that every frame is decoded
// into. The first failed decode retires it for good and the renderer falls
// back to a fresh allocation per frame.

use image::{ColorType, RgbaImage};
use tracing::{debug, info, warn};

use crate::error::DecodeError;
use crate::frames::Frame;
use crate::resources::FrameLoader;
use crate::surface::{DisplaySurface, SurfaceLayout};

pub struct ReusableBuffer {
    pixels: RgbaImage,
}

impl ReusableBuffer {
    /// Allocate a buffer shaped like `layout`. Only RGBA8 layouts can be reused.
    pub fn matching(layout: SurfaceLayout) -> Option<Self> {
        if layout.color != ColorType::Rgba8 || layout.width == 0 || layout.height == 0 {
            debug!("[BUFFER] Layout {:?} cannot be reused", layout);
            return None;
        }
        Some(Self {
            pixels: RgbaImage::new(layout.width, layout.height),
        })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn byte_len(&self) -> usize {
        self.pixels.as_raw().len()
    }

    /// Decode `frame` over the previous contents.
    pub fn decode(
        &mut self,
        loader: &dyn FrameLoader,
        frame: &Frame,
    ) -> Result<&RgbaImage, DecodeError> {
        loader.load_into(frame.image, &mut self.pixels)?;
        Ok(&self.pixels)
    }
}

/// What happened when a frame was pushed to a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Decoded into the reusable buffer.
    Reused,
    /// Decoded into a fresh allocation.
    Allocated,
    /// Nothing could be decoded; the surface keeps its old image.
    Skipped,
}

/// Renders frames onto a surface, preferring the reusable buffer.
pub struct FrameRenderer {
    buffer: Option<ReusableBuffer>,
}

impl FrameRenderer {
    pub fn new(buffer: Option<ReusableBuffer>) -> Self {
        if let Some(buf) = &buffer {
            info!(
                "[BUFFER] Reusing a {}x{} frame buffer ({} bytes)",
                buf.dimensions().0,
                buf.dimensions().1,
                buf.byte_len()
            );
        }
        Self { buffer }
    }

    pub fn has_buffer(&self) -> bool {
        self.buffer.is_some()
    }

    pub fn buffer_bytes(&self) -> usize {
        self.buffer.as_ref().map_or(0, ReusableBuffer::byte_len)
    }

    pub fn render(
        &mut self,
        loader: &dyn FrameLoader,
        surface: &dyn DisplaySurface,
        frame: &Frame,
    ) -> RenderOutcome {
        if let Some(buffer) = self.buffer.as_mut() {
            match buffer.decode(loader, frame) {
                Ok(pixels) => {
                    surface.present(pixels);
                    return RenderOutcome::Reused;
                }
                Err(e) => {
                    warn!(
                        "[BUFFER] Decode of {} into shared buffer failed ({}), falling back to per-frame allocation",
                        frame.image, e
                    );
                    self.buffer = None;
                }
            }
        }

        match loader.load(frame.image) {
            Ok(pixels) => {
                surface.present(&pixels);
                RenderOutcome::Allocated
            }
            Err(e) => {
                warn!("[BUFFER] Could not decode {}: {}", frame.image, e);
                RenderOutcome::Skipped
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::ResourceId;
    use crate::surface::HeadlessSurface;
    use image::Rgba;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Solid 2x2 frames whose red channel is the resource id. Id 3 is 4x4.
    struct Solid {
        into_calls: AtomicUsize,
    }

    impl Solid {
        fn new() -> Self {
            Self {
                into_calls: AtomicUsize::new(0),
            }
        }

        fn image(id: ResourceId) -> RgbaImage {
            let side = if id.0 == 3 { 4 } else { 2 };
            RgbaImage::from_pixel(side, side, Rgba([id.0 as u8, 0, 0, 255]))
        }
    }

    impl FrameLoader for Solid {
        fn load(&self, id: ResourceId) -> Result<RgbaImage, DecodeError> {
            if id.0 == 9 {
                return Err(DecodeError::Unresolved(id));
            }
            Ok(Self::image(id))
        }

        fn load_into(&self, id: ResourceId, buffer: &mut RgbaImage) -> Result<(), DecodeError> {
            self.into_calls.fetch_add(1, Ordering::SeqCst);
            let img = Self::image(id);
            if img.dimensions() != buffer.dimensions() {
                return Err(DecodeError::ShapeMismatch {
                    expected: buffer.dimensions(),
                    found: img.dimensions(),
                });
            }
            buffer.copy_from_slice(img.as_raw());
            Ok(())
        }
    }

    fn frame(id: u32) -> Frame {
        Frame {
            image: ResourceId(id),
            duration: 10,
        }
    }

    fn layout(width: u32, height: u32, color: ColorType) -> SurfaceLayout {
        SurfaceLayout {
            width,
            height,
            color,
        }
    }

    #[test]
    fn test_only_rgba8_layouts_are_reused() {
        assert!(ReusableBuffer::matching(layout(2, 2, ColorType::Rgba8)).is_some());
        assert!(ReusableBuffer::matching(layout(2, 2, ColorType::Rgb8)).is_none());
        assert!(ReusableBuffer::matching(layout(0, 2, ColorType::Rgba8)).is_none());
    }

    #[test]
    fn test_render_through_buffer() {
        let loader = Solid::new();
        let surface = HeadlessSurface::new();
        let mut renderer = FrameRenderer::new(ReusableBuffer::matching(layout(2, 2, ColorType::Rgba8)));

        assert_eq!(renderer.render(&loader, &surface, &frame(1)), RenderOutcome::Reused);
        assert_eq!(renderer.render(&loader, &surface, &frame(2)), RenderOutcome::Reused);
        assert_eq!(surface.snapshot().unwrap().get_pixel(0, 0)[0], 2);
        assert_eq!(renderer.buffer_bytes(), 16);
    }

    #[test]
    fn test_mismatch_retires_buffer_for_good() {
        let loader = Solid::new();
        let surface = HeadlessSurface::new();
        let mut renderer = FrameRenderer::new(ReusableBuffer::matching(layout(2, 2, ColorType::Rgba8)));

        assert_eq!(renderer.render(&loader, &surface, &frame(3)), RenderOutcome::Allocated);
        assert!(!renderer.has_buffer());
        assert_eq!(surface.snapshot().unwrap().get_pixel(0, 0)[0], 3);

        // Same-shaped frames no longer go through the buffer.
        assert_eq!(renderer.render(&loader, &surface, &frame(1)), RenderOutcome::Allocated);
        assert_eq!(loader.into_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_undecodable_frame_is_skipped() {
        let loader = Solid::new();
        let surface = HeadlessSurface::new();
        let mut renderer = FrameRenderer::new(None);

        renderer.render(&loader, &surface, &frame(1));
        assert_eq!(renderer.render(&loader, &surface, &frame(9)), RenderOutcome::Skipped);
        assert_eq!(surface.presented(), 1);
        assert_eq!(surface.snapshot().unwrap().get_pixel(0, 0)[0], 1);
    }
}
