//! Per-device input accumulators.
//!
//! Wayland seats deliver input as bursts of fine-grained sub-events
//! ("axis value", "axis source", "button", "motion") terminated by a frame
//! signal meaning "everything describing one logical occurrence has now
//! been delivered". This crate buffers those sub-events per device and
//! coalesces them into one consistent snapshot per frame:
//!
//! - [`PointerAccumulator`] folds pointer sub-events into a
//!   [`PointerFrame`] (flags OR-accumulate, fields are last-write-wins).
//! - [`TouchAccumulator`] does the same for up to [`MAX_CONTACTS`]
//!   simultaneous contact points keyed by server-assigned ids.
//! - [`KeyTranslator`] wraps xkbcommon for keycode-to-symbol translation.
//!
//! The accumulators are pure state machines with no protocol types: the
//! connection layer decodes wire events, routes each one to a mutation
//! method, and calls `take_frame` on the frame signal. Everything here runs
//! on the single dispatch thread.

mod keyboard;
mod pointer;
mod sink;
mod touch;

pub use keyboard::{KeyEvent, KeyTranslation, KeyTranslator};
pub use pointer::{
    AxisSlot, AxisSource, ButtonState, PointerAccumulator, PointerAction, PointerEventKind,
    PointerFrame, AXIS_COUNT, BTN_LEFT,
};
pub use sink::InputSink;
pub use touch::{ContactSnapshot, TouchAccumulator, TouchEventKind, TouchFrame, MAX_CONTACTS};

use thiserror::Error;

/// Errors surfaced by the accumulators and the key translator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    /// Axis index outside the fixed two-slot table.
    #[error("axis index {0} outside the two-slot axis table")]
    InvalidAxis(u32),

    /// Non-down sub-event named a contact id with no live slot.
    #[error("sub-event for unknown touch contact {0}")]
    UnknownContact(i32),

    /// All contact slots are live; the new contact was dropped.
    #[error("touch contact table full, contact {0} dropped")]
    ContactTableFull(i32),

    /// xkb refused to compile a keymap the server sent.
    #[error("keymap rejected by xkb")]
    KeymapRejected,
}

impl InputError {
    /// The server sent something the protocol forbids.
    #[must_use]
    pub fn is_protocol_violation(&self) -> bool {
        matches!(self, Self::InvalidAxis(_) | Self::UnknownContact(_))
    }

    /// Valid input was dropped for lack of capacity.
    #[must_use]
    pub fn is_resource_exhaustion(&self) -> bool {
        matches!(self, Self::ContactTableFull(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_classification() {
        assert!(InputError::InvalidAxis(7).is_protocol_violation());
        assert!(InputError::UnknownContact(3).is_protocol_violation());
        assert!(!InputError::InvalidAxis(7).is_resource_exhaustion());
        assert!(InputError::ContactTableFull(11).is_resource_exhaustion());
        assert!(!InputError::ContactTableFull(11).is_protocol_violation());
    }
}
