//! Pointer sub-event accumulation.

use std::fmt;

use bitflags::bitflags;

use crate::InputError;

/// Left button code from the kernel input-event tables.
pub const BTN_LEFT: u32 = 0x110;

/// Number of scroll axis slots: vertical (0) and horizontal (1).
pub const AXIS_COUNT: usize = 2;

bitflags! {
    /// Dirty flags naming the sub-events folded into a pending frame.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PointerEventKind: u32 {
        /// Pointer entered the surface.
        const ENTER = 1 << 0;
        /// Pointer left the surface.
        const LEAVE = 1 << 1;
        /// Pointer moved within the surface.
        const MOTION = 1 << 2;
        /// A button changed state.
        const BUTTON = 1 << 3;
        /// Continuous scroll on at least one axis.
        const AXIS = 1 << 4;
        /// The scroll source was named.
        const AXIS_SOURCE = 1 << 5;
        /// Scrolling stopped on at least one axis.
        const AXIS_STOP = 1 << 6;
        /// Discrete scroll steps on at least one axis.
        const AXIS_DISCRETE = 1 << 7;
    }
}

impl Default for PointerEventKind {
    fn default() -> Self {
        Self::empty()
    }
}

/// Button phase reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonState {
    /// Button went down.
    Pressed,
    /// Button came up.
    #[default]
    Released,
}

impl fmt::Display for ButtonState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pressed => f.write_str("pressed"),
            Self::Released => f.write_str("released"),
        }
    }
}

/// What produced the scroll sub-events of this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisSource {
    /// A wheel with detents.
    Wheel,
    /// Finger on a touchpad.
    Finger,
    /// Continuous device, e.g. button-based scrolling.
    Continuous,
    /// Tilting the wheel sideways.
    WheelTilt,
}

impl fmt::Display for AxisSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wheel => f.write_str("wheel"),
            Self::Finger => f.write_str("finger"),
            Self::Continuous => f.write_str("continuous"),
            Self::WheelTilt => f.write_str("wheel tilt"),
        }
    }
}

/// One scroll axis slot.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisSlot {
    /// Whether any sub-event touched this axis in the current frame.
    pub valid: bool,
    /// Continuous scroll distance.
    pub value: f64,
    /// Discrete scroll steps.
    pub discrete: i32,
}

/// The aggregated state of one pointer frame.
///
/// Flags accumulate across sub-events; every other field holds the value of
/// the last sub-event that wrote it. Only fields whose flag is set are
/// meaningful.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PointerFrame {
    /// Which sub-events contributed to this frame.
    pub kinds: PointerEventKind,
    /// Surface-local x coordinate.
    pub x: f64,
    /// Surface-local y coordinate.
    pub y: f64,
    /// Last button code (kernel input-event code).
    pub button: u32,
    /// Phase of the last button change.
    pub button_state: ButtonState,
    /// Compositor timestamp of the last timed sub-event, in ms.
    pub time: u32,
    /// Serial of the last serialed sub-event.
    pub serial: u32,
    /// Vertical (0) and horizontal (1) scroll slots.
    pub axes: [AxisSlot; AXIS_COUNT],
    /// Scroll source, when named.
    pub axis_source: Option<AxisSource>,
}

impl fmt::Display for PointerFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pointer frame @ {}:", self.time)?;
        if self.kinds.contains(PointerEventKind::ENTER) {
            write!(f, " entered {:.2}, {:.2}", self.x, self.y)?;
        }
        if self.kinds.contains(PointerEventKind::LEAVE) {
            f.write_str(" leave")?;
        }
        if self.kinds.contains(PointerEventKind::MOTION) {
            write!(f, " motion {:.2}, {:.2}", self.x, self.y)?;
        }
        if self.kinds.contains(PointerEventKind::BUTTON) {
            write!(f, " button {} {}", self.button, self.button_state)?;
        }
        for (index, slot) in self.axes.iter().enumerate() {
            if !slot.valid {
                continue;
            }
            let name = if index == 0 { "vertical" } else { "horizontal" };
            write!(f, " {name} axis")?;
            if self.kinds.contains(PointerEventKind::AXIS) {
                write!(f, " value {:.2}", slot.value)?;
            }
            if self.kinds.contains(PointerEventKind::AXIS_DISCRETE) {
                write!(f, " discrete {}", slot.discrete)?;
            }
            if self.kinds.contains(PointerEventKind::AXIS_SOURCE) {
                if let Some(source) = self.axis_source {
                    write!(f, " via {source}")?;
                }
            }
            if self.kinds.contains(PointerEventKind::AXIS_STOP) {
                f.write_str(" (stopped)")?;
            }
        }
        Ok(())
    }
}

/// Immediate side effects a sub-event requests, separate from coalescing.
///
/// These fire as soon as the sub-event is applied rather than riding along
/// in the frame snapshot, because they address window management, not input
/// reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerAction {
    /// Ask the shell for an interactive move of the toplevel.
    StartMove {
        /// Serial of the triggering button press.
        serial: u32,
    },
}

/// Folds pointer sub-events into one pending [`PointerFrame`].
///
/// Idle (no dirty flags) until a sub-event arrives; the frame signal is the
/// only reader, and reading resets the accumulator to idle. There is no
/// queue, only current aggregated state.
#[derive(Debug, Default)]
pub struct PointerAccumulator {
    pending: PointerFrame,
}

impl PointerAccumulator {
    /// Creates an idle accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no sub-event has arrived since the last flush.
    pub fn is_idle(&self) -> bool {
        self.pending.kinds.is_empty()
    }

    /// Pointer entered the surface at (`x`, `y`).
    pub fn enter(&mut self, serial: u32, x: f64, y: f64) {
        self.pending.kinds |= PointerEventKind::ENTER;
        self.pending.serial = serial;
        self.pending.x = x;
        self.pending.y = y;
    }

    /// Pointer left the surface.
    pub fn leave(&mut self, serial: u32) {
        self.pending.kinds |= PointerEventKind::LEAVE;
        self.pending.serial = serial;
    }

    /// Pointer moved to (`x`, `y`).
    pub fn motion(&mut self, time: u32, x: f64, y: f64) {
        self.pending.kinds |= PointerEventKind::MOTION;
        self.pending.time = time;
        self.pending.x = x;
        self.pending.y = y;
    }

    /// A button changed state.
    ///
    /// A primary-button press additionally requests an interactive move;
    /// the caller forwards the returned action to the shell. The request is
    /// an immediate event, not part of the coalesced snapshot.
    pub fn button(
        &mut self,
        serial: u32,
        time: u32,
        button: u32,
        state: ButtonState,
    ) -> Option<PointerAction> {
        self.pending.kinds |= PointerEventKind::BUTTON;
        self.pending.serial = serial;
        self.pending.time = time;
        self.pending.button = button;
        self.pending.button_state = state;

        (button == BTN_LEFT && state == ButtonState::Pressed)
            .then_some(PointerAction::StartMove { serial })
    }

    /// Continuous scroll on `axis` (0 = vertical, 1 = horizontal).
    pub fn axis(&mut self, time: u32, axis: u32, value: f64) -> Result<(), InputError> {
        let slot = Self::slot(&mut self.pending.axes, axis)?;
        slot.valid = true;
        slot.value = value;
        self.pending.kinds |= PointerEventKind::AXIS;
        self.pending.time = time;
        Ok(())
    }

    /// The scroll source for this frame was named.
    pub fn axis_source(&mut self, source: AxisSource) {
        self.pending.kinds |= PointerEventKind::AXIS_SOURCE;
        self.pending.axis_source = Some(source);
    }

    /// Scrolling stopped on `axis`.
    pub fn axis_stop(&mut self, time: u32, axis: u32) -> Result<(), InputError> {
        let slot = Self::slot(&mut self.pending.axes, axis)?;
        slot.valid = true;
        self.pending.kinds |= PointerEventKind::AXIS_STOP;
        self.pending.time = time;
        Ok(())
    }

    /// Discrete scroll steps on `axis`.
    pub fn axis_discrete(&mut self, axis: u32, discrete: i32) -> Result<(), InputError> {
        let slot = Self::slot(&mut self.pending.axes, axis)?;
        slot.valid = true;
        slot.discrete = discrete;
        self.pending.kinds |= PointerEventKind::AXIS_DISCRETE;
        Ok(())
    }

    /// Frame signal: emits the aggregated snapshot and resets to idle.
    ///
    /// Returns `None` when no sub-event arrived since the last flush, so a
    /// stray frame signal emits nothing downstream.
    pub fn take_frame(&mut self) -> Option<PointerFrame> {
        if self.pending.kinds.is_empty() {
            return None;
        }
        Some(std::mem::take(&mut self.pending))
    }

    fn slot(axes: &mut [AxisSlot; AXIS_COUNT], axis: u32) -> Result<&mut AxisSlot, InputError> {
        axes.get_mut(axis as usize).ok_or(InputError::InvalidAxis(axis))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn flags_accumulate_and_fields_take_the_last_write() {
        let mut acc = PointerAccumulator::new();
        acc.enter(1, 10.0, 20.0);
        acc.motion(100, 30.0, 40.0);
        acc.motion(101, 35.0, 45.0);
        acc.axis(102, 0, 2.5).unwrap();
        acc.axis_source(AxisSource::Finger);

        let frame = acc.take_frame().expect("dirty accumulator emits a frame");
        assert_eq!(
            frame.kinds,
            PointerEventKind::ENTER
                | PointerEventKind::MOTION
                | PointerEventKind::AXIS
                | PointerEventKind::AXIS_SOURCE
        );
        assert_eq!((frame.x, frame.y), (35.0, 45.0));
        assert_eq!(frame.time, 102);
        assert_eq!(frame.axis_source, Some(AxisSource::Finger));
        assert!(frame.axes[0].valid);
        assert_eq!(frame.axes[0].value, 2.5);
        assert!(!frame.axes[1].valid);
    }

    #[test]
    fn flush_returns_the_accumulator_to_idle() {
        let mut acc = PointerAccumulator::new();
        acc.enter(1, 1.0, 1.0);
        acc.button(2, 50, BTN_LEFT, ButtonState::Pressed);
        acc.axis(51, 1, -4.0).unwrap();
        acc.axis_discrete(1, -1).unwrap();
        let _ = acc.take_frame();

        assert!(acc.is_idle());
        assert!(acc.take_frame().is_none());
        // A fresh frame must not inherit stale axis validity.
        acc.motion(60, 2.0, 2.0);
        let frame = acc.take_frame().unwrap();
        assert_eq!(frame.kinds, PointerEventKind::MOTION);
        assert!(frame.axes.iter().all(|slot| !slot.valid));
        assert_eq!(frame.serial, 0);
    }

    #[test]
    fn out_of_range_axis_is_rejected_without_corruption() {
        let mut acc = PointerAccumulator::new();
        acc.axis(10, 0, 1.0).unwrap();
        assert_eq!(acc.axis(11, 2, 9.0), Err(InputError::InvalidAxis(2)));
        assert_eq!(acc.axis_stop(11, 99), Err(InputError::InvalidAxis(99)));
        assert_eq!(acc.axis_discrete(7, 2), Err(InputError::InvalidAxis(7)));

        let frame = acc.take_frame().unwrap();
        assert_eq!(frame.kinds, PointerEventKind::AXIS);
        assert_eq!(frame.time, 10);
        assert!(frame.axes[0].valid);
        assert!(!frame.axes[1].valid);
    }

    #[test]
    fn primary_press_requests_an_interactive_move() {
        let mut acc = PointerAccumulator::new();
        assert_eq!(
            acc.button(7, 100, BTN_LEFT, ButtonState::Pressed),
            Some(PointerAction::StartMove { serial: 7 })
        );
        assert_eq!(acc.button(8, 101, BTN_LEFT, ButtonState::Released), None);
        assert_eq!(acc.button(9, 102, 0x111, ButtonState::Pressed), None);

        // The move request never appears in the coalesced snapshot.
        let frame = acc.take_frame().unwrap();
        assert_eq!(frame.kinds, PointerEventKind::BUTTON);
        assert_eq!(frame.button, 0x111);
    }

    #[test]
    fn display_narrates_the_dirty_parts_only() {
        let mut acc = PointerAccumulator::new();
        acc.motion(500, 12.0, 8.5);
        acc.axis(500, 0, 3.0).unwrap();
        acc.axis_source(AxisSource::Wheel);
        let frame = acc.take_frame().unwrap();
        let text = frame.to_string();
        assert!(text.contains("motion 12.00, 8.50"));
        assert!(text.contains("vertical axis value 3.00 via wheel"));
        assert!(!text.contains("horizontal"));
        assert!(!text.contains("button"));
    }
}
