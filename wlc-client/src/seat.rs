//! Seat capability binding and input-event translation.
//!
//! Wire events are decoded here and routed to the accumulators; the frame
//! events perform the atomic read-and-reset and hand the snapshot to the
//! sink. Nothing in this module keeps input state of its own.

use std::fs::File;
use std::os::fd::OwnedFd;

use tracing::{debug, info, warn};
use wayland_client::protocol::{wl_keyboard, wl_pointer, wl_seat, wl_touch};
use wayland_client::{Connection, Dispatch, QueueHandle, WEnum};

use wlc_input::{
    AxisSource, ButtonState, InputError, KeyEvent, KeyTranslation, KeyTranslator,
    PointerAccumulator, PointerAction, TouchAccumulator,
};

use crate::app::DemoApp;

impl Dispatch<wl_seat::WlSeat, ()> for DemoApp {
    fn event(
        app: &mut Self,
        seat: &wl_seat::WlSeat,
        event: wl_seat::Event,
        _: &(),
        _conn: &Connection,
        qh: &QueueHandle<Self>,
    ) {
        match event {
            wl_seat::Event::Capabilities { capabilities } => {
                let caps = match capabilities {
                    WEnum::Value(caps) => caps,
                    WEnum::Unknown(bits) => {
                        warn!("unknown seat capability bits {bits:#x}");
                        return;
                    }
                };
                app.sync_pointer(caps.contains(wl_seat::Capability::Pointer), seat, qh);
                app.sync_keyboard(caps.contains(wl_seat::Capability::Keyboard), seat, qh);
                app.sync_touch(caps.contains(wl_seat::Capability::Touch), seat, qh);
            }
            wl_seat::Event::Name { name } => {
                info!("seat name: {name}");
            }
            _ => {}
        }
    }
}

impl DemoApp {
    /// Creates or releases the pointer to match the advertised capability.
    /// Each device's accumulator lives exactly as long as the device.
    fn sync_pointer(&mut self, available: bool, seat: &wl_seat::WlSeat, qh: &QueueHandle<Self>) {
        if available && self.pointer.is_none() {
            self.pointer = Some(seat.get_pointer(qh, ()));
            self.pointer_events = PointerAccumulator::new();
            debug!("pointer capability bound");
        } else if !available {
            if let Some(pointer) = self.pointer.take() {
                pointer.release();
                self.pointer_events = PointerAccumulator::new();
                debug!("pointer capability withdrawn");
            }
        }
    }

    fn sync_keyboard(&mut self, available: bool, seat: &wl_seat::WlSeat, qh: &QueueHandle<Self>) {
        if available && self.keyboard.is_none() {
            self.keyboard = Some(seat.get_keyboard(qh, ()));
            self.keys = KeyTranslator::new();
            debug!("keyboard capability bound");
        } else if !available {
            if let Some(keyboard) = self.keyboard.take() {
                keyboard.release();
                self.keys = KeyTranslator::new();
                debug!("keyboard capability withdrawn");
            }
        }
    }

    fn sync_touch(&mut self, available: bool, seat: &wl_seat::WlSeat, qh: &QueueHandle<Self>) {
        if available && self.touch.is_none() {
            self.touch = Some(seat.get_touch(qh, ()));
            self.touch_events = TouchAccumulator::new();
            debug!("touch capability bound");
        } else if !available {
            if let Some(touch) = self.touch.take() {
                touch.release();
                self.touch_events = TouchAccumulator::new();
                debug!("touch capability withdrawn");
            }
        }
    }

    fn start_interactive_move(&self, serial: u32) {
        if let (Some(seat), Some(toplevel)) = (&self.seat, &self.toplevel) {
            debug!("requesting interactive move (serial {serial})");
            toplevel._move(seat, serial);
        }
    }

    fn load_keymap(&mut self, fd: OwnedFd, size: u32) {
        let file = File::from(fd);
        let map = match wlc_shm::map_readonly(&file, size as usize) {
            Ok(map) => map,
            Err(err) => {
                warn!("keymap fd could not be mapped: {err}");
                return;
            }
        };
        // The blob is NUL-terminated keymap text.
        let end = map.iter().position(|&b| b == 0).unwrap_or(map.len());
        let text = match std::str::from_utf8(&map[..end]) {
            Ok(text) => text,
            Err(err) => {
                warn!("keymap is not valid UTF-8: {err}");
                return;
            }
        };
        match self.keys.set_keymap(text) {
            Ok(()) => debug!("keymap compiled ({size} bytes)"),
            Err(err) => warn!("keeping previous keymap: {err}"),
        }
    }
}

/// Maps a wire axis identifier onto the accumulator's slot index. Unknown
/// identifiers pass through so the fixed-table validation rejects them.
fn axis_index(axis: WEnum<wl_pointer::Axis>) -> u32 {
    match axis {
        WEnum::Value(wl_pointer::Axis::VerticalScroll) => 0,
        WEnum::Value(wl_pointer::Axis::HorizontalScroll) => 1,
        WEnum::Value(_) => u32::MAX,
        WEnum::Unknown(raw) => raw,
    }
}

/// Logs and drops a rejected sub-event; accumulator state is untouched.
fn report_dropped(device: &str, result: Result<(), InputError>) {
    if let Err(err) = result {
        warn!("dropped {device} sub-event: {err}");
    }
}

impl Dispatch<wl_pointer::WlPointer, ()> for DemoApp {
    fn event(
        app: &mut Self,
        _pointer: &wl_pointer::WlPointer,
        event: wl_pointer::Event,
        _: &(),
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
    ) {
        use wl_pointer::Event;
        match event {
            Event::Enter {
                serial,
                surface_x,
                surface_y,
                ..
            } => app.pointer_events.enter(serial, surface_x, surface_y),
            Event::Leave { serial, .. } => app.pointer_events.leave(serial),
            Event::Motion {
                time,
                surface_x,
                surface_y,
            } => app.pointer_events.motion(time, surface_x, surface_y),
            Event::Button {
                serial,
                time,
                button,
                state,
            } => {
                let phase = match state {
                    WEnum::Value(wl_pointer::ButtonState::Pressed) => ButtonState::Pressed,
                    WEnum::Value(wl_pointer::ButtonState::Released) => ButtonState::Released,
                    other => {
                        warn!("unknown button state {other:?}");
                        return;
                    }
                };
                if let Some(PointerAction::StartMove { serial }) =
                    app.pointer_events.button(serial, time, button, phase)
                {
                    app.start_interactive_move(serial);
                }
            }
            Event::Axis { time, axis, value } => {
                report_dropped("pointer", app.pointer_events.axis(time, axis_index(axis), value));
            }
            Event::AxisSource { axis_source } => {
                let source = match axis_source {
                    WEnum::Value(wl_pointer::AxisSource::Wheel) => AxisSource::Wheel,
                    WEnum::Value(wl_pointer::AxisSource::Finger) => AxisSource::Finger,
                    WEnum::Value(wl_pointer::AxisSource::Continuous) => AxisSource::Continuous,
                    WEnum::Value(wl_pointer::AxisSource::WheelTilt) => AxisSource::WheelTilt,
                    other => {
                        warn!("unknown axis source {other:?}");
                        return;
                    }
                };
                app.pointer_events.axis_source(source);
            }
            Event::AxisStop { time, axis } => {
                report_dropped("pointer", app.pointer_events.axis_stop(time, axis_index(axis)));
            }
            Event::AxisDiscrete { axis, discrete } => {
                report_dropped(
                    "pointer",
                    app.pointer_events.axis_discrete(axis_index(axis), discrete),
                );
            }
            Event::Frame => {
                if let Some(frame) = app.pointer_events.take_frame() {
                    app.sink.on_pointer_frame(&frame);
                }
            }
            _ => {}
        }
    }
}

impl Dispatch<wl_touch::WlTouch, ()> for DemoApp {
    fn event(
        app: &mut Self,
        _touch: &wl_touch::WlTouch,
        event: wl_touch::Event,
        _: &(),
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
    ) {
        use wl_touch::Event;
        match event {
            Event::Down {
                serial,
                time,
                id,
                x,
                y,
                ..
            } => report_dropped("touch", app.touch_events.down(serial, time, id, x, y)),
            Event::Up { serial, time, id } => {
                report_dropped("touch", app.touch_events.up(serial, time, id));
            }
            Event::Motion { time, id, x, y } => {
                report_dropped("touch", app.touch_events.motion(time, id, x, y));
            }
            Event::Shape { id, major, minor } => {
                report_dropped("touch", app.touch_events.shape(id, major, minor));
            }
            Event::Orientation { id, orientation } => {
                report_dropped("touch", app.touch_events.orientation(id, orientation));
            }
            Event::Cancel => app.touch_events.cancel(),
            Event::Frame => {
                if let Some(frame) = app.touch_events.take_frame() {
                    app.sink.on_touch_frame(&frame);
                }
            }
            _ => {}
        }
    }
}

impl Dispatch<wl_keyboard::WlKeyboard, ()> for DemoApp {
    fn event(
        app: &mut Self,
        _keyboard: &wl_keyboard::WlKeyboard,
        event: wl_keyboard::Event,
        _: &(),
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
    ) {
        use wl_keyboard::Event;
        match event {
            Event::Keymap { format, fd, size } => {
                if !matches!(format, WEnum::Value(wl_keyboard::KeymapFormat::XkbV1)) {
                    warn!("unsupported keymap format {format:?}");
                    return;
                }
                app.load_keymap(fd, size);
            }
            Event::Enter { keys, .. } => {
                let pressed: Vec<KeyTranslation> = keys
                    .chunks_exact(4)
                    .filter_map(|raw| {
                        let code = u32::from_ne_bytes([raw[0], raw[1], raw[2], raw[3]]);
                        app.keys.translate(code)
                    })
                    .collect();
                app.sink.on_keyboard_enter(&pressed);
            }
            Event::Leave { .. } => app.sink.on_keyboard_leave(),
            Event::Key {
                time, key, state, ..
            } => {
                let pressed = matches!(state, WEnum::Value(wl_keyboard::KeyState::Pressed));
                if let Some(translation) = app.keys.translate(key) {
                    app.sink.on_key(&KeyEvent {
                        translation,
                        pressed,
                        time,
                    });
                }
            }
            Event::Modifiers {
                mods_depressed,
                mods_latched,
                mods_locked,
                group,
                ..
            } => {
                app.keys
                    .update_modifiers(mods_depressed, mods_latched, mods_locked, group);
            }
            Event::RepeatInfo { rate, delay } => {
                debug!("key repeat: {rate} per second after {delay} ms");
            }
            _ => {}
        }
    }
}
