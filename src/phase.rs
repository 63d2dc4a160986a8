use strum_macros::Display;

/// One of the two alternating states of a breathing cycle.
///
/// The `Display` form ("Inhale" / "Exhale") doubles as the on-screen
/// instruction text.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
pub enum Phase {
    Inhale,
    Exhale,
}

/// Snapshot of the breathing cycle at a given elapsed time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseSample {
    pub phase: Phase,
    /// Seconds remaining in the current phase, always in `1..=phase_len`.
    pub countdown: u64,
    /// True exactly when elapsed time sits on a cycle boundary past zero,
    /// i.e. the instant a new cycle re-enters Inhale.
    pub wrapped: bool,
}

/// Derive the current phase and countdown purely from total elapsed seconds.
///
/// Phase state is never carried between calls and never decremented: missed
/// ticks, irregular sampling intervals, or a stalled loop cannot accumulate
/// drift, because re-evaluating at any later elapsed time yields the exact
/// correct answer. Both durations must be positive.
pub fn sample(elapsed_secs: u64, inhale_secs: u64, exhale_secs: u64) -> PhaseSample {
    debug_assert!(inhale_secs > 0 && exhale_secs > 0);

    let cycle = inhale_secs + exhale_secs;
    let pos = elapsed_secs % cycle;

    let (phase, countdown) = if pos < inhale_secs {
        (Phase::Inhale, inhale_secs - pos)
    } else {
        (Phase::Exhale, exhale_secs - (pos - inhale_secs))
    };

    PhaseSample {
        phase,
        countdown,
        wrapped: pos == 0 && elapsed_secs > 0,
    }
}
