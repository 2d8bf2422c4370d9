//! Scroll-offset animation driven by compositor frame times.

/// Default scroll speed in pixels per second.
pub const DEFAULT_SCROLL_RATE: f64 = 24.0;

/// Offsets wrap at a multiple of the 8-px checker period, so wrapping never
/// changes the painted pattern while keeping the value bounded over long
/// sessions.
const OFFSET_PERIOD: f64 = 1024.0;

/// Scroll offset plus the timestamp of the last frame callback.
///
/// Timestamps are compositor milliseconds (`wl_callback.done`), a u32 that
/// may wrap; 0 means no frame has been observed yet. This state has exactly
/// one writer: the frame-callback handler on the dispatch thread.
#[derive(Debug, Clone)]
pub struct AnimationState {
    offset: f64,
    last_frame_ms: u32,
    rate: f64,
}

impl AnimationState {
    /// Creates a state scrolling at `rate` pixels per second.
    pub fn new(rate: f64) -> Self {
        Self {
            offset: 0.0,
            last_frame_ms: 0,
            rate,
        }
    }

    /// Current scroll offset in pixels.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Timestamp of the last processed frame, 0 before the first.
    pub fn last_frame_ms(&self) -> u32 {
        self.last_frame_ms
    }

    /// Advances the offset to the frame at `time_ms`.
    ///
    /// The very first callback only records the timestamp; there is no
    /// prior frame to measure an interval against.
    pub fn advance_to(&mut self, time_ms: u32) {
        if self.last_frame_ms != 0 {
            let elapsed_ms = time_ms.wrapping_sub(self.last_frame_ms);
            self.offset = (self.offset + f64::from(elapsed_ms) / 1000.0 * self.rate) % OFFSET_PERIOD;
        }
        self.last_frame_ms = time_ms;
    }
}

impl Default for AnimationState {
    fn default() -> Self {
        Self::new(DEFAULT_SCROLL_RATE)
    }
}
