use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::event::MessageId;
use super::intent::types::Section;
use super::time::Tick;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(pub u64);

/// What a timer does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKey {
    Reveal { message_id: MessageId },
    Navigate { message_id: MessageId, section: Section },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiredTimer {
    pub id: TimerId,
    pub key: TimerKey,
    pub at: Tick,
}

/// Cancelable one-shot timers.
///
/// Implementations only deliver firings; they never touch presenter state. The owner
/// decides whether a firing is still wanted.
pub trait TimerScheduler {
    fn now(&self) -> Tick;
    fn schedule(&mut self, delay: Duration, key: TimerKey) -> TimerId;
    /// Returns false when the timer already fired or was never scheduled.
    fn cancel(&mut self, id: TimerId) -> bool;
    /// Cancels everything outstanding and returns how many timers were dropped.
    fn cancel_all(&mut self) -> usize;
    fn pending(&self) -> usize;
}

/// Virtual clock. Time only moves when the caller pops due timers.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: Tick,
    next_id: u64,
    queue: BTreeMap<(Tick, TimerId), TimerKey>,
    deadlines: HashMap<TimerId, Tick>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_deadline(&self) -> Option<Tick> {
        self.queue.keys().next().map(|(at, _)| *at)
    }

    /// Pops the earliest timer due at or before `until`, moving the clock to its deadline.
    /// Ties fire in scheduling order.
    pub fn pop_due(&mut self, until: Tick) -> Option<FiredTimer> {
        let (at, id) = *self.queue.keys().next()?;
        if at > until {
            return None;
        }
        let key = self.queue.remove(&(at, id))?;
        self.deadlines.remove(&id);
        self.now = self.now.max(at);
        Some(FiredTimer { id, key, at })
    }

    /// Moves the clock forward without firing anything.
    pub fn advance_to(&mut self, until: Tick) {
        self.now = self.now.max(until);
    }
}

impl TimerScheduler for ManualScheduler {
    fn now(&self) -> Tick {
        self.now
    }

    fn schedule(&mut self, delay: Duration, key: TimerKey) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        let at = self.now.after(delay);
        self.queue.insert((at, id), key);
        self.deadlines.insert(id, at);
        id
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        match self.deadlines.remove(&id) {
            Some(at) => self.queue.remove(&(at, id)).is_some(),
            None => false,
        }
    }

    fn cancel_all(&mut self) -> usize {
        let dropped = self.queue.len();
        self.queue.clear();
        self.deadlines.clear();
        dropped
    }

    fn pending(&self) -> usize {
        self.queue.len()
    }
}

/// Runtime timers: one sleeping task per timer, raced against a shared token so a
/// single `cancel_all` stops every outstanding task at once. Firings arrive on the
/// receiver returned by [`TokioScheduler::new`].
///
/// Must be used from inside a Tokio runtime.
#[derive(Debug)]
pub struct TokioScheduler {
    origin: Instant,
    next_id: u64,
    token: CancellationToken,
    tasks: HashMap<TimerId, JoinHandle<()>>,
    fired_tx: mpsc::UnboundedSender<FiredTimer>,
}

impl TokioScheduler {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<FiredTimer>) {
        let (fired_tx, fired_rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            origin: Instant::now(),
            next_id: 0,
            token: CancellationToken::new(),
            tasks: HashMap::new(),
            fired_tx,
        };
        (scheduler, fired_rx)
    }

    fn reap(&mut self) {
        self.tasks.retain(|_, task| !task.is_finished());
    }
}

impl TimerScheduler for TokioScheduler {
    fn now(&self) -> Tick {
        Tick::from_duration(self.origin.elapsed())
    }

    fn schedule(&mut self, delay: Duration, key: TimerKey) -> TimerId {
        self.reap();
        self.next_id += 1;
        let id = TimerId(self.next_id);

        let token = self.token.child_token();
        let tx = self.fired_tx.clone();
        let origin = self.origin;

        let task = tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    let at = Tick::from_duration(origin.elapsed());
                    // Receiver gone means the host is shutting down.
                    let _ = tx.send(FiredTimer { id, key, at });
                }
            }
        });

        self.tasks.insert(id, task);
        id
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        match self.tasks.remove(&id) {
            Some(task) => {
                let was_pending = !task.is_finished();
                task.abort();
                was_pending
            }
            None => false,
        }
    }

    fn cancel_all(&mut self) -> usize {
        self.token.cancel();
        self.token = CancellationToken::new();

        let mut dropped = 0;
        for (_, task) in self.tasks.drain() {
            if !task.is_finished() {
                dropped += 1;
            }
            task.abort();
        }
        if dropped > 0 {
            debug!(dropped, "cancelled outstanding timers");
        }
        dropped
    }

    fn pending(&self) -> usize {
        self.tasks.values().filter(|task| !task.is_finished()).count()
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        self.token.cancel();
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}
