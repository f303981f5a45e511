// FrameSeq Frame Table
// Copyright (c) 2026 Xing_The_Creator | FrameSeq

use tracing::{debug, warn};

use crate::error::ResourceError;
use crate::resources::{ResourceId, ResourceTable};

/// One entry of an animation: what to show and for how long (ms).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub image: ResourceId,
    pub duration: u32,
}

/// Immutable, ordered list of frames. Every stored frame has a resolved image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameTable {
    frames: Vec<Frame>,
}

impl FrameTable {
    /// Pair up two parallel arrays.
    ///
    /// Extra entries on either side are dropped. Unresolved image ids are
    /// skipped, so the table never contains a hole.
    pub fn build(images: &[ResourceId], durations: &[u32]) -> Self {
        if images.len() != durations.len() {
            warn!(
                "[FRAMES] {} images but {} durations, truncating to {}",
                images.len(),
                durations.len(),
                images.len().min(durations.len())
            );
        }

        let frames = images
            .iter()
            .zip(durations)
            .enumerate()
            .filter_map(|(i, (&image, &duration))| {
                if image.is_resolved() {
                    Some(Frame { image, duration })
                } else {
                    warn!("[FRAMES] Skipping unresolved image at index {}", i);
                    None
                }
            })
            .collect::<Vec<_>>();

        debug!("[FRAMES] Built table with {} frames", frames.len());
        Self { frames }
    }

    /// Build from two named arrays of a resource table.
    pub fn from_resources(
        resources: &ResourceTable,
        images: &str,
        durations: &str,
    ) -> Result<Self, ResourceError> {
        let image_ids = resources.image_array(images)?;
        let durations = resources.int_array(durations)?;
        Ok(Self::build(&image_ids, durations))
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    pub fn first(&self) -> Option<&Frame> {
        self.frames.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Frame> {
        self.frames.iter()
    }

    /// Sum of all frame durations in ms.
    pub fn cycle_millis(&self) -> u64 {
        self.frames.iter().map(|f| f.duration as u64).sum()
    }
}

impl<'a> IntoIterator for &'a FrameTable {
    type Item = &'a Frame;
    type IntoIter = std::slice::Iter<'a, Frame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}
