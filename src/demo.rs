// FrameSeq Demo Runner
// Copyright (c) 2026 Xing_The_Creator | FrameSeq
//
// Plays a manifest's animation on a headless surface for a fixed time and
// reports what happened, so the two players can be compared side by side.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::animator::SequenceAnimator;
use crate::config::{PlayerConfig, PlayerMode};
use crate::error::AnimationError;
use crate::frames::FrameTable;
use crate::playback::PlaybackState;
use crate::preloaded::PreloadedAnimation;
use crate::queue::TickQueue;
use crate::resources::ResourceTable;
use crate::surface::HeadlessSurface;

enum Player {
    Sequence(SequenceAnimator),
    Preloaded(PreloadedAnimation),
}

impl Player {
    fn start(&self) {
        match self {
            Player::Sequence(p) => p.start(),
            Player::Preloaded(p) => p.start(),
        }
    }

    fn stop(&self) {
        match self {
            Player::Sequence(p) => p.stop(),
            Player::Preloaded(p) => p.stop(),
        }
    }

    fn state(&self) -> PlaybackState {
        match self {
            Player::Sequence(p) => p.state(),
            Player::Preloaded(p) => p.state(),
        }
    }

    fn resident_bytes(&self) -> usize {
        match self {
            Player::Sequence(p) => p.resident_bytes(),
            Player::Preloaded(p) => p.resident_bytes(),
        }
    }

    fn reusing_buffer(&self) -> Option<bool> {
        match self {
            Player::Sequence(p) => Some(p.is_reusing_buffer()),
            Player::Preloaded(_) => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DemoReport {
    pub mode: PlayerMode,
    pub frames: usize,
    pub presented: u64,
    pub stop_events: u64,
    pub finished: bool,
    /// Only meaningful for the sequence player.
    pub reusing_buffer: Option<bool>,
    pub resident_bytes: usize,
}

impl fmt::Display for DemoReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Mode:            {}", self.mode)?;
        writeln!(f, "Frames:          {}", self.frames)?;
        writeln!(f, "Presented:       {}", self.presented)?;
        writeln!(f, "Stop events:     {}", self.stop_events)?;
        writeln!(f, "Finished:        {}", self.finished)?;
        if let Some(reusing) = self.reusing_buffer {
            writeln!(f, "Buffer reuse:    {}", if reusing { "active" } else { "disabled" })?;
        }
        write!(f, "Resident bytes:  {}", self.resident_bytes)
    }
}

/// Play for `config.run_for`, then stop and report.
pub async fn run_demo(
    config: &PlayerConfig,
    resources: Arc<ResourceTable>,
) -> Result<DemoReport, AnimationError> {
    let frames = FrameTable::from_resources(&resources, &config.images, &config.durations)?;
    let frame_count = frames.len();
    let queue = TickQueue::spawn();
    let surface = Arc::new(HeadlessSurface::new());

    let player = match config.mode {
        PlayerMode::Sequence => Player::Sequence(SequenceAnimator::create(
            &queue,
            &surface,
            frames,
            resources,
            config.looping,
        )?),
        PlayerMode::Preloaded => Player::Preloaded(PreloadedAnimation::create(
            &queue,
            &surface,
            frames,
            resources.as_ref(),
            config.looping,
        )?),
    };

    let stops = Arc::new(AtomicU64::new(0));
    let counter = stops.clone();
    let on_stopped = move || {
        counter.fetch_add(1, Ordering::SeqCst);
    };
    match &player {
        Player::Sequence(p) => p.set_stopped_listener(on_stopped),
        Player::Preloaded(p) => p.set_stopped_listener(on_stopped),
    }

    info!("[DEMO] Playing {} frames with the {} player for {:?}", frame_count, config.mode, config.run_for);
    player.start();
    tokio::time::sleep(config.run_for).await;
    player.stop();

    Ok(DemoReport {
        mode: config.mode,
        frames: frame_count,
        presented: surface.presented(),
        stop_events: stops.load(Ordering::SeqCst),
        finished: player.state().exhausted,
        reusing_buffer: player.reusing_buffer(),
        resident_bytes: player.resident_bytes(),
    })
}
