//! The consumer-facing side of the accumulators.

use crate::keyboard::{KeyEvent, KeyTranslation};
use crate::pointer::PointerFrame;
use crate::touch::TouchFrame;

/// Receives the logical events the accumulators emit.
///
/// Exactly one call per coalesced frame per device; key activity is
/// reported as it arrives since the keyboard has no frame boundary at this
/// protocol version.
pub trait InputSink {
    /// One coalesced pointer frame.
    fn on_pointer_frame(&mut self, frame: &PointerFrame);

    /// One coalesced touch frame.
    fn on_touch_frame(&mut self, frame: &TouchFrame);

    /// A translated key press or release.
    fn on_key(&mut self, event: &KeyEvent);

    /// Keyboard focus entered the surface with `pressed` keys held.
    fn on_keyboard_enter(&mut self, pressed: &[KeyTranslation]);

    /// Keyboard focus left the surface.
    fn on_keyboard_leave(&mut self);
}
