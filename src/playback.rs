// FrameSeq Playback Engine
// Copyright (c) 2026 Xing_The_Creator | FrameSeq
//
// The timed loop shared by every player: run flags, frame index, the
// stopped listener and self-scheduling on the tick queue. What a player
// actually draws is delegated to its Painter.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tracing::{debug, info, trace};

use crate::frames::{Frame, FrameTable};
use crate::queue::{OwnerId, TickQueue};
use crate::surface::DisplaySurface;

/// Zero-length frames are rescheduled this far out so the queue can go idle.
const MIN_FRAME_MILLIS: u32 = 1;

/// Notified once each time playback comes to a halt.
pub trait StoppedListener: Send + Sync {
    fn on_stopped(&self);
}

impl<F> StoppedListener for F
where
    F: Fn() + Send + Sync,
{
    fn on_stopped(&self) {
        self()
    }
}

/// Draws frame `index` onto a surface.
pub(crate) trait Painter: Send + 'static {
    fn paint(&mut self, surface: &dyn DisplaySurface, index: usize, frame: &Frame);
}

/// Point-in-time copy of a player's run state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackState {
    /// Last frame advanced to, `None` before the first tick.
    pub index: Option<usize>,
    pub should_run: bool,
    /// A tick chain is active (posted or executing).
    pub is_running: bool,
    pub looping: bool,
    /// A non-looping sequence reached its end. Terminal.
    pub exhausted: bool,
}

struct RunState {
    public: PlaybackState,
    /// Bumped whenever a chain starts or is cancelled; stale ticks compare unequal.
    generation: u64,
}

struct Shared<P> {
    tag: &'static str,
    queue: TickQueue,
    owner: OwnerId,
    frames: FrameTable,
    surface: Weak<dyn DisplaySurface>,
    state: Mutex<RunState>,
    painter: Mutex<P>,
    listener: Mutex<Option<Arc<dyn StoppedListener>>>,
}

pub(crate) struct Engine<P: Painter> {
    shared: Arc<Shared<P>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<P: Painter> Engine<P> {
    pub(crate) fn new(
        tag: &'static str,
        queue: &TickQueue,
        surface: Weak<dyn DisplaySurface>,
        frames: FrameTable,
        painter: P,
        looping: bool,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                tag,
                queue: queue.clone(),
                owner: queue.next_owner(),
                frames,
                surface,
                state: Mutex::new(RunState {
                    public: PlaybackState {
                        index: None,
                        should_run: false,
                        is_running: false,
                        looping,
                        exhausted: false,
                    },
                    generation: 0,
                }),
                painter: Mutex::new(painter),
                listener: Mutex::new(None),
            }),
        }
    }

    pub(crate) fn start(&self) {
        let shared = &self.shared;
        let mut state = lock(&shared.state);

        let last = shared.frames.len().saturating_sub(1);
        if !state.public.looping && state.public.index == Some(last) {
            state.public.exhausted = true;
        }
        if state.public.exhausted {
            debug!("{} Sequence already finished, start ignored", shared.tag);
            return;
        }
        state.public.should_run = true;
        if state.public.is_running {
            trace!("{} Already running", shared.tag);
            return;
        }

        state.public.is_running = true;
        state.generation += 1;
        schedule(shared, state.generation, Duration::ZERO);
        info!("{} Playback started ({} frames)", shared.tag, shared.frames.len());
    }

    pub(crate) fn stop(&self) {
        let shared = &self.shared;
        {
            let mut state = lock(&shared.state);
            state.public.should_run = false;
            if !state.public.is_running {
                return;
            }
            state.public.is_running = false;
            state.generation += 1;
            shared.queue.remove(shared.owner);
        }

        info!("{} Playback stopped", shared.tag);
        notify(shared);
    }

    pub(crate) fn set_stopped_listener(&self, listener: Option<Arc<dyn StoppedListener>>) {
        *lock(&self.shared.listener) = listener;
    }

    pub(crate) fn state(&self) -> PlaybackState {
        lock(&self.shared.state).public
    }

    pub(crate) fn frames(&self) -> &FrameTable {
        &self.shared.frames
    }

    pub(crate) fn with_painter<R>(&self, f: impl FnOnce(&P) -> R) -> R {
        let painter = lock(&self.shared.painter);
        f(&*painter)
    }
}

fn schedule<P: Painter>(shared: &Arc<Shared<P>>, generation: u64, delay: Duration) {
    let weak = Arc::downgrade(shared);
    shared.queue.post(shared.owner, delay, move || {
        if let Some(shared) = weak.upgrade() {
            tick(&shared, generation);
        }
    });
}

fn notify<P: Painter>(shared: &Shared<P>) {
    let listener = lock(&shared.listener).clone();
    if let Some(listener) = listener {
        listener.on_stopped();
    }
}

fn tick<P: Painter>(shared: &Arc<Shared<P>>, generation: u64) {
    let (surface, index) = {
        let mut state = lock(&shared.state);
        if state.generation != generation || !state.public.is_running {
            trace!("{} Dropping stale tick", shared.tag);
            return;
        }

        let last = shared.frames.len().saturating_sub(1);
        let surface = shared.surface.upgrade();
        let halt = match &surface {
            None => Some("surface released"),
            Some(_) if !state.public.looping && state.public.index == Some(last) => {
                state.public.should_run = false;
                state.public.exhausted = true;
                Some("sequence finished")
            }
            Some(_) => None,
        };

        if let Some(reason) = halt {
            state.public.is_running = false;
            drop(state);
            info!("{} Playback halted: {}", shared.tag, reason);
            notify(shared);
            return;
        }

        let index = state.public.index.map_or(0, |i| (i + 1) % shared.frames.len());
        state.public.index = Some(index);
        let duration = shared
            .frames
            .get(index)
            .map_or(0, |f| f.duration)
            .max(MIN_FRAME_MILLIS);
        schedule(shared, generation, Duration::from_millis(duration as u64));
        (surface, index)
    };

    let (Some(surface), Some(frame)) = (surface, shared.frames.get(index)) else {
        return;
    };
    if surface.is_shown() {
        lock(&shared.painter).paint(surface.as_ref(), index, frame);
    } else {
        trace!("{} Surface hidden, skipping frame {}", shared.tag, index);
    }
}
