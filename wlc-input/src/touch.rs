//! Touch sub-event accumulation across simultaneous contacts.

use std::fmt;

use bitflags::bitflags;

use crate::InputError;

/// Maximum simultaneous contacts the slot table holds.
pub const MAX_CONTACTS: usize = 10;

bitflags! {
    /// Dirty flags naming the sub-events folded into a contact.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TouchEventKind: u32 {
        /// Contact touched down.
        const DOWN = 1 << 0;
        /// Contact lifted.
        const UP = 1 << 1;
        /// Contact moved.
        const MOTION = 1 << 2;
        /// The whole gesture was aborted by the compositor.
        const CANCEL = 1 << 3;
        /// Contact ellipse dimensions changed.
        const SHAPE = 1 << 4;
        /// Contact orientation changed.
        const ORIENTATION = 1 << 5;
    }
}

impl Default for TouchEventKind {
    fn default() -> Self {
        Self::empty()
    }
}

/// The emitted per-contact snapshot of one touch frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContactSnapshot {
    /// Server-assigned contact id (reusable after release).
    pub id: i32,
    /// Which sub-events touched this contact during the frame.
    pub kinds: TouchEventKind,
    /// Surface-local x coordinate.
    pub x: f64,
    /// Surface-local y coordinate.
    pub y: f64,
    /// Major axis of the contact ellipse.
    pub major: f64,
    /// Minor axis of the contact ellipse.
    pub minor: f64,
    /// Orientation of the contact ellipse in degrees.
    pub orientation: f64,
}

impl fmt::Display for ContactSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "point {}:", self.id)?;
        if self.kinds.contains(TouchEventKind::DOWN) {
            write!(f, " down {:.2},{:.2}", self.x, self.y)?;
        }
        if self.kinds.contains(TouchEventKind::UP) {
            f.write_str(" up")?;
        }
        if self.kinds.contains(TouchEventKind::MOTION) {
            write!(f, " motion {:.2},{:.2}", self.x, self.y)?;
        }
        if self.kinds.contains(TouchEventKind::SHAPE) {
            write!(f, " shape {:.2}x{:.2}", self.major, self.minor)?;
        }
        if self.kinds.contains(TouchEventKind::ORIENTATION) {
            write!(f, " orientation {:.2}", self.orientation)?;
        }
        if self.kinds.contains(TouchEventKind::CANCEL) {
            f.write_str(" cancelled")?;
        }
        Ok(())
    }
}

/// One coalesced touch frame: every live contact plus frame metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct TouchFrame {
    /// Compositor timestamp of the last timed sub-event, in ms.
    pub time: u32,
    /// Serial of the last serialed sub-event.
    pub serial: u32,
    /// The compositor aborted the in-flight gesture.
    pub cancelled: bool,
    /// Snapshots of every live contact, in slot order.
    pub contacts: Vec<ContactSnapshot>,
}

impl fmt::Display for TouchFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "touch frame @ {}:", self.time)?;
        if self.cancelled {
            f.write_str(" (cancelled)")?;
        }
        for contact in &self.contacts {
            write!(f, " [{contact}]")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Slot {
    valid: bool,
    id: i32,
    kinds: TouchEventKind,
    x: f64,
    y: f64,
    major: f64,
    minor: f64,
    orientation: f64,
}

impl Slot {
    fn snapshot(&self, cancelled: bool) -> ContactSnapshot {
        let mut kinds = self.kinds;
        if cancelled {
            kinds |= TouchEventKind::CANCEL;
        }
        ContactSnapshot {
            id: self.id,
            kinds,
            x: self.x,
            y: self.y,
            major: self.major,
            minor: self.minor,
            orientation: self.orientation,
        }
    }
}

/// Folds touch sub-events into a fixed table of contact slots.
///
/// Slots are matched by id with a linear scan; a free slot is claimed when
/// an unseen id touches down. An `up` sub-event marks the slot but must not
/// free it, since later sub-events in the same frame may still reference the
/// id; slots are reclaimed only by the frame flush.
#[derive(Debug, Default)]
pub struct TouchAccumulator {
    slots: [Slot; MAX_CONTACTS],
    time: u32,
    serial: u32,
    cancelled: bool,
}

impl TouchAccumulator {
    /// Creates an accumulator with every slot free.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live contact slots.
    pub fn active_contacts(&self) -> usize {
        self.slots.iter().filter(|slot| slot.valid).count()
    }

    /// Contact `id` touched down at (`x`, `y`).
    ///
    /// Claims a free slot for an unseen id; fails with
    /// [`InputError::ContactTableFull`] when all slots are live, leaving
    /// the live contacts untouched.
    pub fn down(&mut self, serial: u32, time: u32, id: i32, x: f64, y: f64) -> Result<(), InputError> {
        let index = match self.slots.iter().position(|slot| slot.valid && slot.id == id) {
            Some(index) => index,
            None => {
                let free = self
                    .slots
                    .iter()
                    .position(|slot| !slot.valid)
                    .ok_or(InputError::ContactTableFull(id))?;
                self.slots[free] = Slot {
                    valid: true,
                    id,
                    ..Slot::default()
                };
                free
            }
        };
        let slot = &mut self.slots[index];
        slot.kinds |= TouchEventKind::DOWN;
        slot.x = x;
        slot.y = y;
        self.time = time;
        self.serial = serial;
        Ok(())
    }

    /// Contact `id` lifted. The slot stays live until the frame flush.
    pub fn up(&mut self, serial: u32, time: u32, id: i32) -> Result<(), InputError> {
        let slot = self.live_slot(id)?;
        slot.kinds |= TouchEventKind::UP;
        self.time = time;
        self.serial = serial;
        Ok(())
    }

    /// Contact `id` moved to (`x`, `y`).
    pub fn motion(&mut self, time: u32, id: i32, x: f64, y: f64) -> Result<(), InputError> {
        let slot = self.live_slot(id)?;
        slot.kinds |= TouchEventKind::MOTION;
        slot.x = x;
        slot.y = y;
        self.time = time;
        Ok(())
    }

    /// Contact `id` changed its ellipse dimensions.
    pub fn shape(&mut self, id: i32, major: f64, minor: f64) -> Result<(), InputError> {
        let slot = self.live_slot(id)?;
        slot.kinds |= TouchEventKind::SHAPE;
        slot.major = major;
        slot.minor = minor;
        Ok(())
    }

    /// Contact `id` changed orientation.
    pub fn orientation(&mut self, id: i32, orientation: f64) -> Result<(), InputError> {
        let slot = self.live_slot(id)?;
        slot.kinds |= TouchEventKind::ORIENTATION;
        slot.orientation = orientation;
        Ok(())
    }

    /// The compositor aborted the whole in-flight gesture.
    ///
    /// Device-wide, not per contact: every contact emitted by the next
    /// flush carries the cancel flag, and all slots are freed afterwards.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    /// Frame signal: emits one snapshot per live contact, then reclaims
    /// slots whose emission included `up` (all of them after a cancel) and
    /// clears the flags of the survivors.
    pub fn take_frame(&mut self) -> Option<TouchFrame> {
        let cancelled = self.cancelled;
        let contacts: Vec<ContactSnapshot> = self
            .slots
            .iter()
            .filter(|slot| slot.valid)
            .map(|slot| slot.snapshot(cancelled))
            .collect();
        if contacts.is_empty() && !cancelled {
            return None;
        }

        for slot in &mut self.slots {
            if cancelled || slot.kinds.contains(TouchEventKind::UP) {
                slot.valid = false;
            }
            slot.kinds = TouchEventKind::empty();
        }
        self.cancelled = false;

        Some(TouchFrame {
            time: self.time,
            serial: self.serial,
            cancelled,
            contacts,
        })
    }

    fn live_slot(&mut self, id: i32) -> Result<&mut Slot, InputError> {
        self.slots
            .iter_mut()
            .find(|slot| slot.valid && slot.id == id)
            .ok_or(InputError::UnknownContact(id))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn interleaved_motion_folds_into_identifier_stable_slots() {
        let mut acc = TouchAccumulator::new();
        acc.down(1, 100, 4, 10.0, 10.0).unwrap();
        acc.down(2, 100, 9, 50.0, 50.0).unwrap();
        acc.motion(101, 4, 11.0, 12.0).unwrap();
        acc.motion(101, 9, 51.0, 52.0).unwrap();
        acc.motion(102, 4, 13.0, 14.0).unwrap();

        let frame = acc.take_frame().unwrap();
        assert_eq!(frame.contacts.len(), 2);
        let four = frame.contacts.iter().find(|c| c.id == 4).unwrap();
        let nine = frame.contacts.iter().find(|c| c.id == 9).unwrap();
        assert_eq!((four.x, four.y), (13.0, 14.0));
        assert_eq!((nine.x, nine.y), (51.0, 52.0));
        assert_eq!(four.kinds, TouchEventKind::DOWN | TouchEventKind::MOTION);
    }

    #[test]
    fn up_contact_is_emitted_once_then_absent() {
        let mut acc = TouchAccumulator::new();
        acc.down(1, 100, 3, 5.0, 5.0).unwrap();
        let _ = acc.take_frame();

        acc.up(2, 200, 3).unwrap();
        // The slot must survive the up sub-event itself: a shape update in
        // the same frame still refers to the id.
        acc.shape(3, 1.0, 1.0).unwrap();
        let frame = acc.take_frame().unwrap();
        assert_eq!(frame.contacts.len(), 1);
        assert!(frame.contacts[0]
            .kinds
            .contains(TouchEventKind::UP | TouchEventKind::SHAPE));

        assert_eq!(acc.active_contacts(), 0);
        assert!(acc.take_frame().is_none());
        assert_eq!(
            acc.motion(201, 3, 1.0, 1.0),
            Err(InputError::UnknownContact(3))
        );
    }

    #[test]
    fn surviving_contacts_keep_identity_but_not_flags() {
        let mut acc = TouchAccumulator::new();
        acc.down(1, 100, 7, 1.0, 2.0).unwrap();
        let first = acc.take_frame().unwrap();
        assert!(first.contacts[0].kinds.contains(TouchEventKind::DOWN));

        acc.motion(150, 7, 3.0, 4.0).unwrap();
        let second = acc.take_frame().unwrap();
        assert_eq!(second.contacts[0].kinds, TouchEventKind::MOTION);
        assert_eq!(second.contacts[0].id, 7);
    }

    #[test]
    fn eleventh_contact_is_rejected_and_others_unaffected() {
        let mut acc = TouchAccumulator::new();
        for id in 0..10 {
            acc.down(1, 100, id, f64::from(id), 0.0).unwrap();
        }
        assert_eq!(
            acc.down(2, 101, 10, 99.0, 99.0),
            Err(InputError::ContactTableFull(10))
        );
        assert_eq!(acc.active_contacts(), 10);

        let frame = acc.take_frame().unwrap();
        assert_eq!(frame.contacts.len(), 10);
        assert!(frame.contacts.iter().all(|c| c.id != 10));
    }

    #[test]
    fn unknown_id_sub_events_do_not_allocate() {
        let mut acc = TouchAccumulator::new();
        assert_eq!(
            acc.motion(100, 5, 1.0, 1.0),
            Err(InputError::UnknownContact(5))
        );
        assert_eq!(acc.up(1, 100, 5), Err(InputError::UnknownContact(5)));
        assert_eq!(acc.shape(5, 1.0, 1.0), Err(InputError::UnknownContact(5)));
        assert_eq!(acc.active_contacts(), 0);
        assert!(acc.take_frame().is_none());
    }

    #[test]
    fn cancel_marks_every_contact_and_frees_all_slots() {
        let mut acc = TouchAccumulator::new();
        acc.down(1, 100, 0, 1.0, 1.0).unwrap();
        acc.down(1, 100, 1, 2.0, 2.0).unwrap();
        acc.cancel();

        let frame = acc.take_frame().unwrap();
        assert!(frame.cancelled);
        assert!(frame
            .contacts
            .iter()
            .all(|c| c.kinds.contains(TouchEventKind::CANCEL)));
        assert_eq!(acc.active_contacts(), 0);
    }

    #[test]
    fn identifier_reuse_claims_a_fresh_slot_after_release() {
        let mut acc = TouchAccumulator::new();
        acc.down(1, 100, 2, 9.0, 9.0).unwrap();
        acc.up(2, 110, 2).unwrap();
        let _ = acc.take_frame();

        acc.down(3, 200, 2, 4.0, 4.0).unwrap();
        let frame = acc.take_frame().unwrap();
        assert_eq!(frame.contacts.len(), 1);
        assert_eq!(frame.contacts[0].kinds, TouchEventKind::DOWN);
        assert_eq!((frame.contacts[0].x, frame.contacts[0].y), (4.0, 4.0));
    }
}
