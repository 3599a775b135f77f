//! Per-frame run loop.

use std::cell::Cell;
use std::rc::Rc;

use tracing::{debug, trace};

/// Radians per frame around the vertical axis.
pub const IDLE_SPEED: f32 = 0.005;
pub const SURGICAL_SPEED: f32 = 0.02;
/// The horizontal axis turns at this fraction of the vertical speed.
pub const TILT_RATIO: f32 = 0.4;

/// Gaps longer than this (tab in background, debugger pause) are treated as
/// a single short frame so tweens do not jump to their end.
const LAG_THRESHOLD_MS: f64 = 500.0;
const LAG_FRAME_MS: f64 = 33.0;

pub fn rotation_speed(surgical: bool) -> f32 {
    if surgical {
        SURGICAL_SPEED
    } else {
        IDLE_SPEED
    }
}

/// Shared stop switch for the run loop. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

#[derive(Debug, Default)]
pub struct RunLoop {
    token: CancelToken,
    last_timestamp: Option<f64>,
    frames: u64,
}

impl RunLoop {
    pub fn new(token: CancelToken) -> Self {
        Self {
            token,
            last_timestamp: None,
            frames: 0,
        }
    }

    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Registers a frame at `timestamp_ms` and returns the seconds elapsed
    /// since the previous one, or `None` once the loop has been cancelled.
    pub fn begin_frame(&mut self, timestamp_ms: f64) -> Option<f32> {
        if self.token.is_cancelled() {
            debug!(frames = self.frames, "run loop cancelled");
            return None;
        }
        let mut elapsed_ms = self
            .last_timestamp
            .map_or(0.0, |last| (timestamp_ms - last).max(0.0));
        if elapsed_ms > LAG_THRESHOLD_MS {
            trace!(elapsed_ms, "smoothing frame lag");
            elapsed_ms = LAG_FRAME_MS;
        }
        self.last_timestamp = Some(timestamp_ms);
        self.frames += 1;
        Some((elapsed_ms / 1000.0) as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_has_no_elapsed_time() {
        let mut run = RunLoop::default();
        assert_eq!(run.begin_frame(1234.0), Some(0.0));
        let dt = run.begin_frame(1250.0).unwrap();
        assert!((dt - 0.016).abs() < 1e-6);
        assert_eq!(run.frames(), 2);
    }

    #[test]
    fn long_gaps_are_smoothed() {
        let mut run = RunLoop::default();
        run.begin_frame(0.0);
        let dt = run.begin_frame(10_000.0).unwrap();
        assert!((dt - 0.033).abs() < 1e-6);
    }

    #[test]
    fn cancelled_loop_stops_counting() {
        let token = CancelToken::new();
        let mut run = RunLoop::new(token.clone());
        run.begin_frame(0.0);
        token.cancel();
        assert_eq!(run.begin_frame(16.0), None);
        assert_eq!(run.frames(), 1);
    }

    #[test]
    fn speeds() {
        assert_eq!(rotation_speed(false), 0.005);
        assert_eq!(rotation_speed(true), 0.02);
    }
}
