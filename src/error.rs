// FrameSeq Error Types
// Copyright (c) 2026 Xing_The_Creator | FrameSeq

use std::io;
use std::path::PathBuf;

use crate::resources::ResourceId;

/// Errors raised while loading or querying the resource table.
#[derive(thiserror::Error, Debug)]
pub enum ResourceError {
    #[error("io error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("manifest error: {0}")]
    Manifest(#[from] serde_json::Error),

    #[error("no resource array named '{0}'")]
    MissingArray(String),
}

/// Errors raised while turning a resource into pixels.
#[derive(thiserror::Error, Debug)]
pub enum DecodeError {
    #[error("resource {0} is not resolved")]
    Unresolved(ResourceId),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("buffer is {expected:?} but frame is {found:?}")]
    ShapeMismatch {
        expected: (u32, u32),
        found: (u32, u32),
    },
}

/// Errors raised when constructing a player.
#[derive(thiserror::Error, Debug)]
pub enum AnimationError {
    #[error("frame sequence is empty")]
    EmptySequence,

    #[error("first frame could not be shown: {0}")]
    FirstFrame(#[source] DecodeError),

    #[error("resource error: {0}")]
    Resource(#[from] ResourceError),

    #[error("frame {index} could not be preloaded: {source}")]
    Preload {
        index: usize,
        #[source]
        source: DecodeError,
    },
}
