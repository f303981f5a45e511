// FrameSeq Tick Queue
// Copyright (c) 2026 Xing_The_Creator | FrameSeq
//
// A single cooperative timer queue. Players post one-shot jobs with a delay;
// one tokio task runs them in deadline order, one at a time, so two ticks
// never overlap. Removal is keyed by owner, like cancelling every pending
// callback a player posted.

use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, error, info, trace};

pub type TickJob = Box<dyn FnOnce() + Send + 'static>;

/// Identifies whoever posted a job, so it can be removed later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OwnerId(u64);

enum Command {
    Post {
        owner: OwnerId,
        due: Instant,
        job: TickJob,
    },
    Remove {
        owner: OwnerId,
    },
}

struct Entry {
    owner: OwnerId,
    job: TickJob,
}

#[derive(Clone)]
pub struct TickQueue {
    tx: mpsc::UnboundedSender<Command>,
    owners: Arc<AtomicU64>,
}

impl TickQueue {
    /// Start the queue's loop on the current tokio runtime.
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::unbounded_channel::<Command>();
        tokio::spawn(run_loop(rx));
        Self {
            tx,
            owners: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn next_owner(&self) -> OwnerId {
        OwnerId(self.owners.fetch_add(1, Ordering::Relaxed))
    }

    /// Run `job` once `delay` has passed. Returns false if the loop is gone.
    pub fn post<F>(&self, owner: OwnerId, delay: Duration, job: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        let due = Instant::now() + delay;
        self.tx
            .send(Command::Post {
                owner,
                due,
                job: Box::new(job),
            })
            .is_ok()
    }

    /// Drop every job `owner` still has pending.
    pub fn remove(&self, owner: OwnerId) {
        let _ = self.tx.send(Command::Remove { owner });
    }
}

async fn run_loop(mut rx: mpsc::UnboundedReceiver<Command>) {
    let mut pending: BTreeMap<(Instant, u64), Entry> = BTreeMap::new();
    let mut seq: u64 = 0;
    debug!("[QUEUE] Tick queue started.");

    loop {
        let next_due = pending.keys().next().map(|(due, _)| *due);

        tokio::select! {
            // Commands first, so a removal sent before a deadline always wins.
            biased;

            cmd = rx.recv() => match cmd {
                Some(Command::Post { owner, due, job }) => {
                    seq += 1;
                    pending.insert((due, seq), Entry { owner, job });
                }
                Some(Command::Remove { owner }) => {
                    let before = pending.len();
                    pending.retain(|_, entry| entry.owner != owner);
                    trace!("[QUEUE] Removed {} entries for {:?}", before - pending.len(), owner);
                }
                None => break,
            },

            _ = sleep_until(next_due.unwrap_or_else(Instant::now)), if next_due.is_some() => {
                if let Some((_, entry)) = pending.pop_first() {
                    run_entry(entry);
                }
            }
        }
    }

    info!("[QUEUE] Tick queue closed with {} entries pending.", pending.len());
}

fn run_entry(entry: Entry) {
    let owner = entry.owner;
    if let Err(panic) = panic::catch_unwind(AssertUnwindSafe(entry.job)) {
        let reason = panic
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| panic.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        error!("[QUEUE] Job for {:?} panicked: {}", owner, reason);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn recorder() -> (Arc<Mutex<Vec<&'static str>>>, impl Fn(&'static str) -> TickJob) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let handle = log.clone();
        let make = move |name: &'static str| -> TickJob {
            let log = handle.clone();
            Box::new(move || log.lock().unwrap().push(name))
        };
        (log, make)
    }

    #[tokio::test(start_paused = true)]
    async fn test_runs_in_deadline_order() {
        let queue = TickQueue::spawn();
        let owner = queue.next_owner();
        let (log, job) = recorder();

        queue.post(owner, Duration::from_millis(30), job("late"));
        queue.post(owner, Duration::from_millis(10), job("early"));
        queue.post(owner, Duration::from_millis(10), job("early-too"));

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(*log.lock().unwrap(), vec!["early", "early-too", "late"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove_only_hits_one_owner() {
        let queue = TickQueue::spawn();
        let a = queue.next_owner();
        let b = queue.next_owner();
        assert_ne!(a, b);
        let (log, job) = recorder();

        queue.post(a, Duration::from_millis(10), job("a"));
        queue.post(b, Duration::from_millis(10), job("b"));
        queue.remove(a);

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(*log.lock().unwrap(), vec!["b"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_panicking_job_does_not_kill_queue() {
        let queue = TickQueue::spawn();
        let owner = queue.next_owner();
        let (log, job) = recorder();

        queue.post(owner, Duration::from_millis(5), || panic!("boom"));
        queue.post(owner, Duration::from_millis(10), job("after"));

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(*log.lock().unwrap(), vec!["after"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_job_can_post_follow_up() {
        let queue = TickQueue::spawn();
        let owner = queue.next_owner();
        let (log, job) = recorder();

        let inner = queue.clone();
        let second = job("second");
        queue.post(owner, Duration::ZERO, move || {
            inner.post(owner, Duration::from_millis(10), second);
        });

        tokio::time::sleep(Duration::from_millis(5)).await;
        assert!(log.lock().unwrap().is_empty());
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(*log.lock().unwrap(), vec!["second"]);
    }
}
