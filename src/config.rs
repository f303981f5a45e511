// FrameSeq Player Configuration
// Copyright (c) 2026 Xing_The_Creator | FrameSeq

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Environment fallback for `--manifest`.
pub const MANIFEST_ENV: &str = "FRAMESEQ_MANIFEST";
pub const DEFAULT_IMAGES_ARRAY: &str = "loading_anim_res";
pub const DEFAULT_DURATIONS_ARRAY: &str = "loading_anim_duration";
pub const DEFAULT_RUN_SECS: u64 = 3;

/// Which player drives the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerMode {
    /// Decode frame by frame into a reused buffer.
    Sequence,
    /// Decode every frame up front.
    Preloaded,
}

impl fmt::Display for PlayerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerMode::Sequence => write!(f, "sequence"),
            PlayerMode::Preloaded => write!(f, "preloaded"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerConfig {
    pub manifest: PathBuf,
    pub images: String,
    pub durations: String,
    pub mode: PlayerMode,
    pub looping: bool,
    pub run_for: Duration,
}

impl PlayerConfig {
    pub fn new(manifest: PathBuf) -> Self {
        Self {
            manifest,
            images: DEFAULT_IMAGES_ARRAY.to_string(),
            durations: DEFAULT_DURATIONS_ARRAY.to_string(),
            mode: PlayerMode::Sequence,
            looping: true,
            run_for: Duration::from_secs(DEFAULT_RUN_SECS),
        }
    }

    /// The flag wins; otherwise `FRAMESEQ_MANIFEST` from the environment (or `.env`).
    pub fn resolve_manifest(flag: Option<PathBuf>) -> Option<PathBuf> {
        flag.or_else(|| env::var_os(MANIFEST_ENV).map(PathBuf::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PlayerConfig::new(PathBuf::from("anim.json"));
        assert_eq!(config.images, "loading_anim_res");
        assert_eq!(config.durations, "loading_anim_duration");
        assert_eq!(config.mode, PlayerMode::Sequence);
        assert!(config.looping);
        assert_eq!(config.run_for, Duration::from_secs(3));
    }

    #[test]
    fn test_flag_beats_environment() {
        let resolved = PlayerConfig::resolve_manifest(Some(PathBuf::from("flag.json")));
        assert_eq!(resolved, Some(PathBuf::from("flag.json")));
    }

    #[test]
    fn test_environment_fills_missing_flag() {
        env::set_var(MANIFEST_ENV, "from-env.json");
        let resolved = PlayerConfig::resolve_manifest(None);
        env::remove_var(MANIFEST_ENV);
        assert_eq!(resolved, Some(PathBuf::from("from-env.json")));
    }

    #[test]
    fn test_mode_serializes_lowercase() {
        let json = serde_json::to_string(&PlayerMode::Preloaded).unwrap();
        assert_eq!(json, "\"preloaded\"");
        assert_eq!(PlayerMode::Sequence.to_string(), "sequence");
    }
}
