//! Frame pacing and buffer reclamation.

use tracing::trace;
use wayland_client::protocol::{wl_buffer, wl_callback};
use wayland_client::{Connection, Dispatch, QueueHandle};

use crate::app::DemoApp;

impl Dispatch<wl_callback::WlCallback, ()> for DemoApp {
    fn event(
        app: &mut Self,
        _callback: &wl_callback::WlCallback,
        event: wl_callback::Event,
        _: &(),
        _conn: &Connection,
        qh: &QueueHandle<Self>,
    ) {
        if let wl_callback::Event::Done { callback_data } = event {
            if app.closed {
                // A stopped client lets in-flight callbacks expire quietly.
                return;
            }
            // Re-request before drawing so pacing never has a gap.
            if let Some(surface) = &app.surface {
                surface.frame(qh, ());
            }
            app.animation.advance_to(callback_data);
            app.submit_frame(qh);
        }
    }
}

impl Dispatch<wl_buffer::WlBuffer, ()> for DemoApp {
    fn event(
        _app: &mut Self,
        buffer: &wl_buffer::WlBuffer,
        event: wl_buffer::Event,
        _: &(),
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
    ) {
        // The compositor is done reading; only now may the region go away.
        if let wl_buffer::Event::Release = event {
            buffer.destroy();
            trace!("buffer released and destroyed");
        }
    }
}
