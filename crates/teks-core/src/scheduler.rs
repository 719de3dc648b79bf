//! Executes the firing protocol of resolved rules: cooldown gate,
//! immediate press, optional deferred press after a wait.
//!
//! Deferred presses run on a dedicated worker thread fed over a channel,
//! so resolution of later events never blocks on an earlier rule's wait.
//! Once scheduled, a deferred press is not cancellable; that matches the
//! configured semantics, not a missing feature.

use crate::rules::{Rule, RuleId};
use crate::types::Chord;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// The keystroke sink. One call is one atomic press-and-release of the
/// whole chord; implementations must not interleave concurrent calls.
/// Failures are reported per attempt and never retried.
pub trait KeySink: Send + Sync {
    fn press(&self, chord: &Chord) -> anyhow::Result<()>;
}

/// A scheduled second-stage press.
struct Deferred {
    due: Instant,
    chord: Chord,
}

impl PartialEq for Deferred {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due
    }
}

impl Eq for Deferred {}

impl PartialOrd for Deferred {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Deferred {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.due.cmp(&other.due)
    }
}

enum Msg {
    Schedule(Deferred),
    Shutdown,
}

/// Runs each fired rule's protocol against the keystroke sink and tracks
/// per-rule cooldown state.
pub struct ActionScheduler {
    sink: Arc<dyn KeySink>,
    cooldowns: Mutex<HashMap<RuleId, Instant>>,
    tx: Sender<Msg>,
    worker: Option<JoinHandle<()>>,
}

impl ActionScheduler {
    pub fn new(sink: Arc<dyn KeySink>) -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        let worker_sink = Arc::clone(&sink);
        let worker = std::thread::spawn(move || deferred_loop(rx, worker_sink));
        Self {
            sink,
            cooldowns: Mutex::new(HashMap::new()),
            tx,
            worker: Some(worker),
        }
    }

    /// Run one rule's firing protocol.
    pub fn fire(&self, rule: &Rule) {
        self.fire_at(rule, Instant::now());
    }

    /// Protocol with `now` as the moment of the immediate press. Split
    /// out from [`fire`](Self::fire) so cooldown behavior is testable
    /// with synthetic timestamps instead of real waiting.
    pub fn fire_at(&self, rule: &Rule, now: Instant) {
        if let Some(cooldown_ms) = rule.cooldown_ms {
            let mut cooldowns = self.cooldowns.lock();
            match cooldowns.get(&rule.id) {
                Some(&last) if now.duration_since(last) < Duration::from_millis(cooldown_ms) => {
                    // Inside the window: nothing is pressed, nothing is
                    // scheduled, and the clock is not reset.
                    debug!(rule = ?rule.id, "fire suppressed by cooldown");
                    return;
                }
                _ => {
                    // The window starts at immediate-press time, not when
                    // the deferred press completes.
                    cooldowns.insert(rule.id, now);
                }
            }
        }

        if let Err(e) = self.sink.press(&rule.on_event) {
            warn!("failed to press {}: {e:#}", rule.on_event.display());
        }

        if let Some(wait_ms) = rule.wait_ms {
            let deferred = Deferred {
                due: now + Duration::from_millis(wait_ms),
                chord: rule.after_wait,
            };
            // Send only fails when the worker is gone, i.e. on teardown.
            let _ = self.tx.send(Msg::Schedule(deferred));
        }
    }
}

impl Drop for ActionScheduler {
    fn drop(&mut self) {
        let _ = self.tx.send(Msg::Shutdown);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

/// Worker loop: sleeps until the earliest pending press is due, pressing
/// and re-arming as schedules arrive. Pending presses from independent
/// rules carry no ordering guarantee between each other.
fn deferred_loop(rx: Receiver<Msg>, sink: Arc<dyn KeySink>) {
    let mut pending: BinaryHeap<Reverse<Deferred>> = BinaryHeap::new();
    loop {
        let msg = match pending.peek() {
            Some(Reverse(next)) => {
                let now = Instant::now();
                if next.due <= now {
                    if let Some(Reverse(deferred)) = pending.pop() {
                        if let Err(e) = sink.press(&deferred.chord) {
                            warn!("failed to press {}: {e:#}", deferred.chord.display());
                        }
                    }
                    continue;
                }
                match rx.recv_timeout(next.due - now) {
                    Ok(msg) => msg,
                    Err(RecvTimeoutError::Timeout) => continue,
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            None => match rx.recv() {
                Ok(msg) => msg,
                Err(_) => break,
            },
        };
        match msg {
            Msg::Schedule(deferred) => pending.push(Reverse(deferred)),
            Msg::Shutdown => break,
        }
    }
}
