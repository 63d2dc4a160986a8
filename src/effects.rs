use std::io::{self, Write};

use tracing::{debug, warn};

/// Side-effect signals emitted by the session controller.
///
/// The controller never touches the terminal, the bell, or the display
/// itself; it announces what should happen and the shell decides how.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Signal {
    /// Audible cue at a phase start (session start, phase change, wrap).
    Cue,
    /// Best-effort request to keep the display awake for the session.
    WakeAcquire,
    /// Release the display wake request.
    WakeRelease,
    /// Session state changed; the screen should be redrawn.
    Render,
}

/// Receiver of controller signals.
pub trait SignalSink {
    fn emit(&mut self, signal: Signal);
}

/// Best-effort display wake-lock seam.
///
/// Acquire/release must never fail loudly; a platform without the
/// capability is a normal condition and degrades silently.
pub trait WakeLock {
    fn acquire(&mut self);
    fn release(&mut self);
}

/// Wake-lock provider for plain terminals, which have no portable
/// display-sleep inhibitor. Logs and otherwise does nothing.
#[derive(Debug, Default)]
pub struct UnsupportedWakeLock {
    held: bool,
}

impl WakeLock for UnsupportedWakeLock {
    fn acquire(&mut self) {
        self.held = true;
        debug!("display wake lock not supported here; continuing without");
    }

    fn release(&mut self) {
        if self.held {
            self.held = false;
            debug!("display wake lock released");
        }
    }
}

/// Audible cue via the terminal bell (BEL).
///
/// Muted unless sound is enabled; write failures are logged, never fatal.
#[derive(Debug)]
pub struct TerminalBell {
    enabled: bool,
}

impl TerminalBell {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
    }

    pub fn ring(&mut self) {
        if !self.enabled {
            return;
        }
        let mut out = io::stdout();
        if let Err(err) = out.write_all(b"\x07").and_then(|_| out.flush()) {
            warn!(%err, "could not ring the terminal bell");
        }
    }
}

/// Production sink: routes controller signals to the terminal collaborators
/// and latches the render request for the event loop to collect.
#[derive(Debug)]
pub struct TerminalEffects<W: WakeLock> {
    pub bell: TerminalBell,
    wake: W,
    needs_render: bool,
}

impl<W: WakeLock> TerminalEffects<W> {
    pub fn new(bell: TerminalBell, wake: W) -> Self {
        Self {
            bell,
            wake,
            needs_render: false,
        }
    }

    /// Returns and clears the pending render request.
    pub fn take_render(&mut self) -> bool {
        std::mem::take(&mut self.needs_render)
    }
}

impl<W: WakeLock> SignalSink for TerminalEffects<W> {
    fn emit(&mut self, signal: Signal) {
        match signal {
            Signal::Cue => self.bell.ring(),
            Signal::WakeAcquire => self.wake.acquire(),
            Signal::WakeRelease => self.wake.release(),
            Signal::Render => self.needs_render = true,
        }
    }
}

/// Signal sink for unit tests: records every emitted signal in order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub signals: Vec<Signal>,
}

impl RecordingSink {
    pub fn count(&self, signal: Signal) -> usize {
        self.signals.iter().filter(|s| **s == signal).count()
    }
}

impl SignalSink for RecordingSink {
    fn emit(&mut self, signal: Signal) {
        self.signals.push(signal);
    }
}
