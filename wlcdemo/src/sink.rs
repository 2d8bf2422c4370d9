//! Log sink: the application side of the input accumulators.

use tracing::info;
use wlc_input::{InputSink, KeyEvent, KeyTranslation, PointerFrame, TouchFrame};

/// Writes every coalesced frame and key event to the log stream.
pub struct LogSink;

impl InputSink for LogSink {
    fn on_pointer_frame(&mut self, frame: &PointerFrame) {
        info!("{frame}");
    }

    fn on_touch_frame(&mut self, frame: &TouchFrame) {
        info!("{frame}");
    }

    fn on_key(&mut self, event: &KeyEvent) {
        let action = if event.pressed { "press" } else { "release" };
        info!(
            "key {action}: sym {} utf8 {:?}",
            event.translation.sym_name, event.translation.utf8
        );
    }

    fn on_keyboard_enter(&mut self, pressed: &[KeyTranslation]) {
        if pressed.is_empty() {
            info!("keyboard focus entered");
        } else {
            let held: Vec<&str> = pressed.iter().map(|key| key.sym_name.as_str()).collect();
            info!("keyboard focus entered, keys held: {}", held.join(", "));
        }
    }

    fn on_keyboard_leave(&mut self) {
        info!("keyboard focus left");
    }
}
