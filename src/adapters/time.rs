//! Cycle clock adapter.
//!
//! Supplies the elapsed-milliseconds argument for each control cycle.
//!
//! - **`feature = "espidf"`**: wraps `esp_timer_get_time()` from the
//!   ESP-IDF high-resolution timer (microsecond precision, monotonic).
//! - otherwise, uses `std::time::Instant` for host-side runs.

pub struct CycleClock {
    /// Timestamp up to which time has been handed out.
    last_us: u64,
    #[cfg(not(feature = "espidf"))]
    start: std::time::Instant,
}

impl Default for CycleClock {
    fn default() -> Self {
        Self::new()
    }
}

impl CycleClock {
    pub fn new() -> Self {
        let mut clock = Self {
            last_us: 0,
            #[cfg(not(feature = "espidf"))]
            start: std::time::Instant::now(),
        };
        clock.last_us = clock.uptime_us();
        clock
    }

    /// Microseconds since boot (monotonic).
    #[cfg(feature = "espidf")]
    pub fn uptime_us(&self) -> u64 {
        (unsafe { esp_idf_sys::esp_timer_get_time() }) as u64
    }

    /// Microseconds since construction (monotonic).
    #[cfg(not(feature = "espidf"))]
    pub fn uptime_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }

    /// Whole milliseconds since the previous call.  The sub-millisecond
    /// remainder carries over, so no time is lost across calls.
    pub fn elapsed_ms(&mut self) -> u32 {
        let delta_ms = self.uptime_us().saturating_sub(self.last_us) / 1000;
        self.last_us += delta_ms * 1000;
        u32::try_from(delta_ms).unwrap_or(u32::MAX)
    }
}
