// FrameSeq Core Library
// Copyright (c) 2026 Xing_The_Creator | FrameSeq

pub mod animator;
pub mod buffer;
pub mod config;
pub mod demo;
pub mod error;
pub mod frames;
pub mod playback;
pub mod preloaded;
pub mod queue;
pub mod resources;
pub mod surface;

pub use animator::SequenceAnimator;
pub use error::{AnimationError, DecodeError, ResourceError};
pub use frames::{Frame, FrameTable};
pub use playback::{PlaybackState, StoppedListener};
pub use preloaded::PreloadedAnimation;
pub use queue::TickQueue;
pub use resources::{FrameLoader, ResourceId, ResourceTable};
pub use surface::{DisplaySurface, HeadlessSurface, SurfaceLayout};
