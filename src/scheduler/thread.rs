//! Real-time scheduler backed by sleeper threads.
//!
//! Same pattern as spark-tui's shared blink clocks: a background thread
//! sleeps and signals, the owning thread picks the signal up on its own
//! loop. Here every armed timer gets a sleeper thread that pushes firings
//! into an mpsc channel; the host drains them via `Carousel::pump()` on
//! each frame.
//!
//! Cancellation is a generation counter per timer kind. Arming or
//! cancelling bumps the generation; a sleeper that wakes up with a stale
//! generation sends nothing and exits. A firing already in the channel
//! with a stale generation is dropped at drain time. Sleeping threads are
//! never joined - they wake, notice the stale generation, and exit.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use super::{Firing, Scheduler, TimerKind};

struct RawFiring {
    kind: TimerKind,
    generation: u64,
    delta: Duration,
}

/// Wall-clock scheduler. The default for [`crate::mount::Carousel`].
pub struct ThreadScheduler {
    dwell_generation: Arc<AtomicU64>,
    ticker_generation: Arc<AtomicU64>,
    dwell_armed: bool,
    ticker_armed: bool,
    tx: Sender<RawFiring>,
    rx: Receiver<RawFiring>,
}

impl ThreadScheduler {
    pub fn new() -> Self {
        let (tx, rx) = channel();
        Self {
            dwell_generation: Arc::new(AtomicU64::new(0)),
            ticker_generation: Arc::new(AtomicU64::new(0)),
            dwell_armed: false,
            ticker_armed: false,
            tx,
            rx,
        }
    }

    fn generation(&self, kind: TimerKind) -> &Arc<AtomicU64> {
        match kind {
            TimerKind::Dwell => &self.dwell_generation,
            TimerKind::ProgressTick => &self.ticker_generation,
        }
    }

    /// Bump the generation, invalidating any sleeper and any queued firing
    /// of this kind. Returns the new generation.
    fn invalidate(&self, kind: TimerKind) -> u64 {
        self.generation(kind).fetch_add(1, Ordering::SeqCst) + 1
    }
}

impl Default for ThreadScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for ThreadScheduler {
    fn arm(&mut self, kind: TimerKind, after: Duration) {
        let my_generation = self.invalidate(kind);
        let generation = Arc::clone(self.generation(kind));
        let tx = self.tx.clone();

        match kind {
            TimerKind::Dwell => {
                self.dwell_armed = true;
                thread::spawn(move || {
                    thread::sleep(after);
                    if generation.load(Ordering::SeqCst) == my_generation {
                        // Receiver gone means the carousel unmounted.
                        let _ = tx.send(RawFiring {
                            kind: TimerKind::Dwell,
                            generation: my_generation,
                            delta: after,
                        });
                    }
                });
            }
            TimerKind::ProgressTick => {
                self.ticker_armed = true;
                thread::spawn(move || {
                    while generation.load(Ordering::SeqCst) == my_generation {
                        thread::sleep(after);
                        if generation.load(Ordering::SeqCst) != my_generation {
                            break;
                        }
                        if tx
                            .send(RawFiring {
                                kind: TimerKind::ProgressTick,
                                generation: my_generation,
                                delta: after,
                            })
                            .is_err()
                        {
                            break;
                        }
                    }
                });
            }
        }
    }

    fn cancel(&mut self, kind: TimerKind) {
        self.invalidate(kind);
        match kind {
            TimerKind::Dwell => self.dwell_armed = false,
            TimerKind::ProgressTick => self.ticker_armed = false,
        }
    }

    fn drain(&mut self) -> Vec<Firing> {
        let mut firings = Vec::new();
        while let Ok(raw) = self.rx.try_recv() {
            if self.generation(raw.kind).load(Ordering::SeqCst) != raw.generation {
                continue; // Cancelled or re-armed after this was sent.
            }
            if raw.kind == TimerKind::Dwell {
                self.dwell_armed = false;
            }
            firings.push(Firing {
                kind: raw.kind,
                delta: raw.delta,
            });
        }
        firings
    }

    fn is_armed(&self, kind: TimerKind) -> bool {
        match kind {
            TimerKind::Dwell => self.dwell_armed,
            TimerKind::ProgressTick => self.ticker_armed,
        }
    }
}

impl Drop for ThreadScheduler {
    fn drop(&mut self) {
        // Let sleepers exit on their next wake.
        self.invalidate(TimerKind::Dwell);
        self.invalidate(TimerKind::ProgressTick);
    }
}

// =============================================================================
// TESTS
// =============================================================================
