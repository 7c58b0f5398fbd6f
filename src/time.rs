//! Frame clock for the browser render loop.
//!
//! `draw_web()` fires at ~60fps with whatever the browser gives us. The game
//! simulation takes elapsed milliseconds directly, so the clock just turns
//! `performance.now()` timestamps into clamped per-frame deltas.

/// Longest delta a single frame may claim. Keeps a backgrounded tab from
/// dumping minutes of income in one tick when it wakes up.
pub const MAX_FRAME_DELTA_MS: f64 = 1_000.0;

pub struct FrameClock {
    /// Timestamp of the last update (ms), None if first frame.
    last_timestamp: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last_timestamp: None,
        }
    }

    /// Feed a wall-clock timestamp (from `performance.now()` or similar)
    /// and get the delta to simulate this frame, in milliseconds.
    ///
    /// The first frame returns 0.0. A backwards-running clock also yields
    /// 0.0 rather than a negative delta.
    pub fn update(&mut self, now_ms: f64) -> f64 {
        let delta = match self.last_timestamp {
            Some(prev) => (now_ms - prev).clamp(0.0, MAX_FRAME_DELTA_MS),
            None => 0.0,
        };
        self.last_timestamp = Some(now_ms);
        delta
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_returns_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.update(12345.0), 0.0);
    }

    #[test]
    fn delta_between_frames() {
        let mut clock = FrameClock::new();
        clock.update(0.0);
        assert_eq!(clock.update(16.0), 16.0);
        assert_eq!(clock.update(33.0), 17.0);
    }

    #[test]
    fn large_gap_is_clamped() {
        // Tab backgrounded for a minute, then one frame fires.
        let mut clock = FrameClock::new();
        clock.update(0.0);
        assert_eq!(clock.update(60_000.0), MAX_FRAME_DELTA_MS);
    }

    #[test]
    fn backwards_clock_yields_zero() {
        let mut clock = FrameClock::new();
        clock.update(100.0);
        assert_eq!(clock.update(50.0), 0.0);
        // Clock recovers from the bogus timestamp.
        assert_eq!(clock.update(66.0), 16.0);
    }

    #[test]
    fn steady_60fps_sums_to_a_second() {
        let mut clock = FrameClock::new();
        clock.update(0.0);
        let mut total = 0.0;
        for i in 1..=60 {
            total += clock.update(i as f64 * 16.667);
        }
        assert!((total - 1_000.0).abs() < 1.0, "got {}", total);
    }
}
