//! Virtual-time scheduler for tests and host-driven loops.
//!
//! Nothing sleeps: [`ManualScheduler::advance`] moves a virtual clock and
//! queues firings in the order their deadlines pass. Tests drive the
//! carousel in frame-sized steps (`advance` then `pump`) and can inspect
//! [`remaining`](ManualScheduler::remaining) to assert that a no-op really
//! left a timer untouched.

use std::time::Duration;

use super::{Firing, Scheduler, TimerKind};

#[derive(Debug, Clone, Copy)]
struct Dwell {
    due: Duration,
    armed_for: Duration,
}

#[derive(Debug, Clone, Copy)]
struct Ticker {
    next_due: Duration,
    period: Duration,
}

/// Deterministic scheduler over a virtual clock starting at zero.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: Duration,
    dwell: Option<Dwell>,
    ticker: Option<Ticker>,
    queue: Vec<Firing>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Move virtual time forward, queuing every firing whose deadline
    /// passes, in chronological order. A deadline exactly on the target
    /// time fires.
    pub fn advance(&mut self, delta: Duration) {
        let target = self.now + delta;
        loop {
            // Earliest pending deadline within the window, ticker first on
            // exact ties so progress is current when the dwell fires.
            let tick_due = self.ticker.map(|t| t.next_due).filter(|d| *d <= target);
            let dwell_due = self.dwell.map(|d| d.due).filter(|d| *d <= target);

            match (tick_due, dwell_due) {
                (Some(t), d) if d.is_none() || t <= d.unwrap() => {
                    let ticker = self.ticker.as_mut().unwrap();
                    self.now = t;
                    self.queue.push(Firing {
                        kind: TimerKind::ProgressTick,
                        delta: ticker.period,
                    });
                    ticker.next_due = t + ticker.period;
                }
                (_, Some(d)) => {
                    let dwell = self.dwell.take().unwrap();
                    self.now = d;
                    self.queue.push(Firing {
                        kind: TimerKind::Dwell,
                        delta: dwell.armed_for,
                    });
                }
                (None, None) => break,
                // The guarded tick arm matches whenever dwell_due is None,
                // but the compiler cannot see through the guard.
                (Some(_), None) => unreachable!(),
            }
        }
        self.now = target;
    }

    /// Time left until the timer fires. `None` when not armed.
    pub fn remaining(&self, kind: TimerKind) -> Option<Duration> {
        match kind {
            TimerKind::Dwell => self.dwell.map(|d| d.due.saturating_sub(self.now)),
            TimerKind::ProgressTick => {
                self.ticker.map(|t| t.next_due.saturating_sub(self.now))
            }
        }
    }

    /// Firings queued but not yet drained (test introspection).
    pub fn pending(&self) -> &[Firing] {
        &self.queue
    }

    fn purge_queue(&mut self, kind: TimerKind) {
        self.queue.retain(|firing| firing.kind != kind);
    }
}

impl Scheduler for ManualScheduler {
    fn arm(&mut self, kind: TimerKind, after: Duration) {
        self.purge_queue(kind);
        match kind {
            TimerKind::Dwell => {
                self.dwell = Some(Dwell {
                    due: self.now + after,
                    armed_for: after,
                });
            }
            TimerKind::ProgressTick => {
                self.ticker = Some(Ticker {
                    next_due: self.now + after,
                    period: after,
                });
            }
        }
    }

    fn cancel(&mut self, kind: TimerKind) {
        self.purge_queue(kind);
        match kind {
            TimerKind::Dwell => self.dwell = None,
            TimerKind::ProgressTick => self.ticker = None,
        }
    }

    fn drain(&mut self) -> Vec<Firing> {
        std::mem::take(&mut self.queue)
    }

    fn is_armed(&self, kind: TimerKind) -> bool {
        match kind {
            TimerKind::Dwell => self.dwell.is_some(),
            TimerKind::ProgressTick => self.ticker.is_some(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
