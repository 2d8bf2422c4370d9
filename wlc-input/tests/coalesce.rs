//! Scenario tests driving the accumulators the way a dispatch loop would:
//! long sub-event conversations, interleaved devices, stray frame signals.

use pretty_assertions::assert_eq;
use wlc_input::{
    AxisSource, ButtonState, InputError, PointerAccumulator, PointerEventKind, TouchAccumulator,
    TouchEventKind, BTN_LEFT,
};

#[test]
fn long_conversation_still_flushes_to_idle() {
    let mut pointer = PointerAccumulator::new();
    pointer.enter(1, 0.0, 0.0);
    for step in 0..100u32 {
        pointer.motion(step, f64::from(step), f64::from(step) / 2.0);
        if step % 3 == 0 {
            pointer.axis(step, 0, 0.5).unwrap();
        }
        if step % 7 == 0 {
            pointer.axis_discrete(1, 1).unwrap();
        }
    }
    pointer.axis_source(AxisSource::Continuous);
    pointer.button(2, 100, BTN_LEFT, ButtonState::Released);

    let frame = pointer.take_frame().expect("conversation produced a frame");
    assert_eq!((frame.x, frame.y), (99.0, 49.5));
    assert!(frame.kinds.contains(
        PointerEventKind::ENTER
            | PointerEventKind::MOTION
            | PointerEventKind::AXIS
            | PointerEventKind::AXIS_DISCRETE
            | PointerEventKind::AXIS_SOURCE
            | PointerEventKind::BUTTON
    ));

    // Regardless of conversation length, the flush resets everything.
    assert!(pointer.is_idle());
    assert!(pointer.take_frame().is_none());
    pointer.motion(200, 1.0, 1.0);
    let next = pointer.take_frame().unwrap();
    assert_eq!(next.kinds, PointerEventKind::MOTION);
    assert!(next.axes.iter().all(|slot| !slot.valid));
    assert_eq!(next.axis_source, None);
}

#[test]
fn touch_and_pointer_state_are_independent() {
    let mut pointer = PointerAccumulator::new();
    let mut touch = TouchAccumulator::new();

    touch.down(1, 10, 0, 1.0, 1.0).unwrap();
    pointer.motion(11, 5.0, 5.0);
    touch.motion(12, 0, 2.0, 2.0).unwrap();

    // Touch frame arrives first; the pointer keeps accumulating.
    let touch_frame = touch.take_frame().unwrap();
    assert_eq!(touch_frame.contacts.len(), 1);
    assert!(!pointer.is_idle());

    pointer.motion(13, 6.0, 6.0);
    let pointer_frame = pointer.take_frame().unwrap();
    assert_eq!((pointer_frame.x, pointer_frame.y), (6.0, 6.0));
}

#[test]
fn rejected_contact_does_not_disturb_a_full_table() {
    let mut touch = TouchAccumulator::new();
    for id in 0..10 {
        touch.down(1, 50, id, f64::from(id) * 10.0, 0.0).unwrap();
    }
    assert!(matches!(
        touch.down(2, 51, 10, 0.0, 0.0),
        Err(InputError::ContactTableFull(10))
    ));
    // The ten live contacts keep coalescing normally.
    touch.motion(52, 9, 95.0, 5.0).unwrap();
    let frame = touch.take_frame().unwrap();
    assert_eq!(frame.contacts.len(), 10);
    let ninth = frame.contacts.iter().find(|c| c.id == 9).unwrap();
    assert_eq!((ninth.x, ninth.y), (95.0, 5.0));
    assert!(ninth
        .kinds
        .contains(TouchEventKind::DOWN | TouchEventKind::MOTION));
}

#[test]
fn contact_lifecycle_across_three_frames() {
    let mut touch = TouchAccumulator::new();

    // Frame 1: down.
    touch.down(1, 100, 6, 1.0, 1.0).unwrap();
    let f1 = touch.take_frame().unwrap();
    assert_eq!(f1.contacts[0].kinds, TouchEventKind::DOWN);

    // Frame 2: motion then up; the contact is still reported.
    touch.motion(150, 6, 2.0, 2.0).unwrap();
    touch.up(2, 160, 6).unwrap();
    let f2 = touch.take_frame().unwrap();
    assert_eq!(f2.contacts.len(), 1);
    assert!(f2.contacts[0]
        .kinds
        .contains(TouchEventKind::MOTION | TouchEventKind::UP));

    // Frame 3: the contact is gone.
    assert!(touch.take_frame().is_none());
}
