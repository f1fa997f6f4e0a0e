//! AC-coupled input debounce/classifier.
//!
//! A switch on an AC-coupled input does not produce a steady level while
//! closed: the opto-coupler toggles at twice the mains frequency.  The
//! filter therefore counts raw edges over a fixed window and classifies
//! the edge rate:
//!
//! | Edge rate (edges/s)            | Classification            |
//! |--------------------------------|---------------------------|
//! | 0                              | `Off`                     |
//! | > 3/4 × (2 × nominal Hz)       | `On`                      |
//! | anything in between            | ambiguous, state is held  |
//!
//! Elapsed time is supplied by the caller; the filter never reads a clock.

use crate::config::FilterConfig;
use crate::model::DiscreteState;

/// Default classification window.
pub const DEFAULT_PERIOD_MS: u32 = 75;
/// Default mains frequency.
pub const DEFAULT_NOMINAL_FREQUENCY_HZ: u32 = 50;

/// Edge-rate classifier for one input channel.
#[derive(Debug, Clone, Copy)]
pub struct InputFilter {
    last_raw: DiscreteState,
    edge_count: u32,
    window_ms: u32,

    last_stable: DiscreteState,
    stable: DiscreteState,
    stable_duration_ms: u32,

    period_ms: u32,
    nominal_frequency_hz: u32,
}

impl Default for InputFilter {
    fn default() -> Self {
        Self::new(DEFAULT_PERIOD_MS, DEFAULT_NOMINAL_FREQUENCY_HZ)
    }
}

impl InputFilter {
    pub fn new(period_ms: u32, nominal_frequency_hz: u32) -> Self {
        Self {
            last_raw: DiscreteState::Unknown,
            edge_count: 0,
            window_ms: 0,
            last_stable: DiscreteState::Unknown,
            stable: DiscreteState::Unknown,
            stable_duration_ms: 0,
            period_ms,
            nominal_frequency_hz,
        }
    }

    pub fn from_config(config: &FilterConfig) -> Self {
        Self::new(config.period_ms, config.nominal_frequency_hz)
    }

    /// Feed one raw sample together with the time since the previous call.
    ///
    /// Without a usable previous sample (first call, or the previous sample
    /// was `Unknown`) the sample only becomes the new baseline: counters are
    /// cleared and the stable state drops to `Unknown`.
    pub fn update(&mut self, raw: DiscreteState, elapsed_ms: u32) {
        if self.last_raw == DiscreteState::Unknown {
            self.last_raw = raw;
            self.edge_count = 0;
            self.window_ms = 0;
            self.stable_duration_ms = 0;
            self.stable = DiscreteState::Unknown;
            return;
        }

        if raw != DiscreteState::Unknown && raw != self.last_raw {
            self.edge_count = self.edge_count.saturating_add(1);
        }

        self.window_ms = self.window_ms.saturating_add(elapsed_ms);
        self.stable_duration_ms = self.stable_duration_ms.saturating_add(elapsed_ms);

        // A zero-length window cannot be classified; keep accumulating.
        if self.window_ms >= self.period_ms && self.window_ms > 0 {
            if let Some(state) = self.classify() {
                self.stable = state;
                if self.last_stable != state {
                    self.stable_duration_ms = 0;
                    self.last_stable = state;
                }
            }
            self.edge_count = 0;
            self.window_ms = 0;
        }

        self.last_raw = raw;
    }

    /// Last committed stable state (initially `Unknown`).
    pub fn resulting_state(&self) -> DiscreteState {
        self.stable
    }

    /// Time spent in the current stable state.
    pub fn stable_duration_ms(&self) -> u32 {
        self.stable_duration_ms
    }

    pub fn period_ms(&self) -> u32 {
        self.period_ms
    }

    pub fn set_period_ms(&mut self, value: u32) {
        self.period_ms = value;
    }

    pub fn nominal_frequency_hz(&self) -> u32 {
        self.nominal_frequency_hz
    }

    pub fn set_nominal_frequency_hz(&mut self, value: u32) {
        self.nominal_frequency_hz = value;
    }

    // ── Internal ──────────────────────────────────────────────────

    /// `None` means ambiguous.  Caller guarantees `window_ms > 0`.
    fn classify(&self) -> Option<DiscreteState> {
        let edges_per_sec = u64::from(self.edge_count) * 1000 / u64::from(self.window_ms);
        let nominal_edges_per_sec = u64::from(self.nominal_frequency_hz) * 2;

        if edges_per_sec == 0 {
            Some(DiscreteState::Off)
        } else if edges_per_sec > nominal_edges_per_sec * 3 / 4 {
            Some(DiscreteState::On)
        } else {
            None
        }
    }
}
