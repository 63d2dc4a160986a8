use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent};

/// How often the sampling task fires, well under a second so second
/// boundaries are caught promptly. Responsiveness knob only: phase
/// correctness comes from elapsed-time derivation, not from this period.
pub const SAMPLE_PERIOD_MS: u64 = 200;

/// Unified event type consumed by the app loop
#[derive(Clone, Debug)]
pub enum Event {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Spawns the terminal input reader; key and resize events flow into `tx`
/// until the receiving side goes away.
pub fn spawn_key_reader(tx: Sender<Event>) {
    thread::spawn(move || loop {
        match event::read() {
            Ok(CtEvent::Key(key)) => {
                if tx.send(Event::Key(key)).is_err() {
                    break;
                }
            }
            Ok(CtEvent::Resize(_, _)) => {
                if tx.send(Event::Resize).is_err() {
                    break;
                }
            }
            Ok(_) => {}
            Err(_) => break,
        }
    });
}

/// Explicit cancellable repeating tick task.
///
/// At most one task is live per sampler: `start` cancels any previous task
/// before spawning, and `cancel` is idempotent. A tick already queued when
/// the task is cancelled is harmless; the session controller ignores ticks
/// while not running.
#[derive(Debug)]
pub struct Sampler {
    tx: Sender<Event>,
    period: Duration,
    cancel: Option<Arc<AtomicBool>>,
}

impl Sampler {
    pub fn new(tx: Sender<Event>) -> Self {
        Self::with_period(tx, Duration::from_millis(SAMPLE_PERIOD_MS))
    }

    pub fn with_period(tx: Sender<Event>, period: Duration) -> Self {
        Self {
            tx,
            period,
            cancel: None,
        }
    }

    /// Cancels any running task, then spawns a fresh one that sends
    /// `Event::Tick` every period until cancelled.
    pub fn start(&mut self) {
        self.cancel();

        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);
        let tx = self.tx.clone();
        let period = self.period;

        thread::spawn(move || {
            while !flag.load(Ordering::Relaxed) {
                if tx.send(Event::Tick).is_err() {
                    break;
                }
                thread::sleep(period);
            }
        });

        self.cancel = Some(cancelled);
    }

    /// Stops the running task, if any. The task exits within one period.
    pub fn cancel(&mut self) {
        if let Some(flag) = self.cancel.take() {
            flag.store(true, Ordering::Relaxed);
        }
    }

    pub fn is_active(&self) -> bool {
        self.cancel.is_some()
    }
}

impl Drop for Sampler {
    fn drop(&mut self) {
        self.cancel();
    }
}
