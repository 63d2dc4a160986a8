use std::fs::OpenOptions;
use std::io::{self, Write};
use std::time::Instant;

use chrono::prelude::*;
use tracing::debug;

use crate::app_dirs::AppDirs;
use crate::effects::{Signal, SignalSink};
use crate::phase::{self, Phase};
use crate::runtime::Sampler;

/// Per-session breathing configuration, editable only while idle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub inhale_secs: u64,
    pub exhale_secs: u64,
    /// `None` or `Some(0)` means unlimited.
    pub time_limit_mins: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            inhale_secs: 4,
            exhale_secs: 6,
            time_limit_mins: None,
        }
    }
}

impl SessionConfig {
    pub fn cycle_secs(&self) -> u64 {
        self.inhale_secs + self.exhale_secs
    }

    fn limit_secs(&self) -> Option<u64> {
        match self.time_limit_mins {
            Some(mins) if mins > 0 => Some(mins * 60),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Idle,
    Running,
    /// Terminal: the time limit was reached and the cycle wrapped. Leaving
    /// requires an explicit reset back to Idle.
    Complete,
}

/// The session controller: owns all session state and the sampling task,
/// applies the time-limit stop rule, and announces side effects through the
/// signal sink. Invalid operation calls (start while running, reset while
/// running) are silent no-ops; the UI only offers valid actions per screen.
#[derive(Debug)]
pub struct Session<S: SignalSink> {
    config: SessionConfig,
    status: Status,
    started_at: Option<Instant>,
    elapsed_secs: u64,
    phase: Phase,
    countdown: u64,
    limit_reached: bool,
    sink: S,
    sampler: Sampler,
}

impl<S: SignalSink> Session<S> {
    pub fn new(config: SessionConfig, sink: S, sampler: Sampler) -> Self {
        let at_rest = phase::sample(0, config.inhale_secs, config.exhale_secs);
        Self {
            config,
            status: Status::Idle,
            started_at: None,
            elapsed_secs: 0,
            phase: at_rest.phase,
            countdown: at_rest.countdown,
            limit_reached: false,
            sink,
            sampler,
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == Status::Running
    }

    pub fn is_complete(&self) -> bool {
        self.status == Status::Complete
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn countdown(&self) -> u64 {
        self.countdown
    }

    pub fn limit_reached(&self) -> bool {
        self.limit_reached
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Begins a fresh session at `now`. No-op while running. Prior state is
    /// discarded whether the last session was paused or completed; starting
    /// always means starting over. The opening cue fires immediately:
    /// session start counts as the first phase start.
    pub fn start(&mut self, now: Instant) {
        if self.is_running() {
            return;
        }

        let opening = phase::sample(0, self.config.inhale_secs, self.config.exhale_secs);
        self.status = Status::Running;
        self.started_at = Some(now);
        self.elapsed_secs = 0;
        self.phase = opening.phase;
        self.countdown = opening.countdown;
        self.limit_reached = false;

        self.sink.emit(Signal::Cue);
        self.sink.emit(Signal::WakeAcquire);
        self.sampler.start();
        self.sink.emit(Signal::Render);
    }

    /// Sets the time limit to `minutes` and starts.
    pub fn start_with_preset(&mut self, minutes: u64, now: Instant) {
        if self.is_running() {
            return;
        }
        self.config.time_limit_mins = Some(minutes);
        self.start(now);
    }

    /// Stops sampling and returns to Idle. State is kept for display but a
    /// later `start` resets it; there is no resume-from-paused-point.
    pub fn pause(&mut self) {
        if !self.is_running() {
            return;
        }
        self.sampler.cancel();
        self.status = Status::Idle;
        self.sink.emit(Signal::WakeRelease);
        self.sink.emit(Signal::Render);
    }

    /// Clears all session state and the configured time limit. Rejected
    /// without touching anything while running.
    pub fn reset(&mut self) {
        if self.is_running() {
            return;
        }
        self.config.time_limit_mins = None;
        let at_rest = phase::sample(0, self.config.inhale_secs, self.config.exhale_secs);
        self.status = Status::Idle;
        self.started_at = None;
        self.elapsed_secs = 0;
        self.phase = at_rest.phase;
        self.countdown = at_rest.countdown;
        self.limit_reached = false;
        self.sink.emit(Signal::Render);
    }

    pub fn set_time_limit(&mut self, minutes: Option<u64>) {
        if self.is_running() {
            return;
        }
        self.config.time_limit_mins = minutes;
    }

    pub fn set_exhale_secs(&mut self, secs: u64) {
        if self.is_running() || secs == 0 {
            return;
        }
        self.config.exhale_secs = secs;
    }

    /// Sampling-task entry point. Elapsed time is re-derived from the start
    /// instant on every call, so the tick cadence only affects how promptly
    /// a second boundary is noticed, never where it falls.
    pub fn tick(&mut self, now: Instant) {
        if !self.is_running() {
            return;
        }
        let Some(started_at) = self.started_at else {
            return;
        };

        let elapsed = now.saturating_duration_since(started_at).as_secs();
        if elapsed <= self.elapsed_secs {
            return;
        }
        self.elapsed_secs = elapsed;

        if let Some(limit) = self.config.limit_secs() {
            if !self.limit_reached && elapsed >= limit {
                self.limit_reached = true;
                debug!(elapsed, "time limit reached; stopping at next cycle wrap");
            }
        }

        let sample = phase::sample(elapsed, self.config.inhale_secs, self.config.exhale_secs);
        if sample.phase != self.phase || sample.wrapped {
            self.sink.emit(Signal::Cue);
        }
        self.phase = sample.phase;
        self.countdown = sample.countdown;

        // The session only ever stops on a wrap back into Inhale, never
        // mid-cycle, so a reached limit still lets the breath finish.
        if sample.phase == Phase::Inhale && sample.wrapped && self.limit_reached {
            self.complete();
        }

        self.sink.emit(Signal::Render);
    }

    fn complete(&mut self) {
        self.sampler.cancel();
        self.status = Status::Complete;
        self.sink.emit(Signal::WakeRelease);
        let _ = self.append_record();
    }

    /// Appends one line describing the completed session to the history log.
    fn append_record(&self) -> io::Result<()> {
        let Some(log_path) = AppDirs::history_path() else {
            return Ok(());
        };

        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // If the log doesn't exist yet, we need to emit a header
        let needs_header = !log_path.exists();

        let mut log_file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(log_path)?;

        if needs_header {
            writeln!(
                log_file,
                "date,inhale_secs,exhale_secs,limit_mins,elapsed_secs,cycles"
            )?;
        }

        writeln!(
            log_file,
            "{},{},{},{},{},{}",
            Local::now().format("%c"),
            self.config.inhale_secs,
            self.config.exhale_secs,
            self.config
                .time_limit_mins
                .map_or(String::new(), |mins| mins.to_string()),
            self.elapsed_secs,
            self.elapsed_secs / self.config.cycle_secs(),
        )?;

        Ok(())
    }
}
