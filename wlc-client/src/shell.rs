//! xdg-shell lifecycle: ping/pong, configure, resize, close.

use tracing::{debug, info};
use wayland_client::{Connection, Dispatch, QueueHandle};
use wayland_protocols::xdg::shell::client::{xdg_surface, xdg_toplevel, xdg_wm_base};

use crate::app::DemoApp;

impl Dispatch<xdg_wm_base::XdgWmBase, ()> for DemoApp {
    fn event(
        _app: &mut Self,
        wm_base: &xdg_wm_base::XdgWmBase,
        event: xdg_wm_base::Event,
        _: &(),
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
    ) {
        if let xdg_wm_base::Event::Ping { serial } = event {
            wm_base.pong(serial);
        }
    }
}

impl Dispatch<xdg_surface::XdgSurface, ()> for DemoApp {
    fn event(
        app: &mut Self,
        xdg_surface: &xdg_surface::XdgSurface,
        event: xdg_surface::Event,
        _: &(),
        _conn: &Connection,
        qh: &QueueHandle<Self>,
    ) {
        if let xdg_surface::Event::Configure { serial } = event {
            xdg_surface.ack_configure(serial);
            debug!("configure acked (serial {serial})");
            app.submit_frame(qh);
        }
    }
}

impl Dispatch<xdg_toplevel::XdgToplevel, ()> for DemoApp {
    fn event(
        app: &mut Self,
        _toplevel: &xdg_toplevel::XdgToplevel,
        event: xdg_toplevel::Event,
        _: &(),
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
    ) {
        match event {
            xdg_toplevel::Event::Configure { width, height, .. } => {
                // Zero means the compositor defers to us; keep our size.
                if width > 0 && height > 0 {
                    app.width = width as u32;
                    app.height = height as u32;
                    debug!("toplevel sized to {width}x{height}");
                }
            }
            xdg_toplevel::Event::Close => {
                info!("compositor requested close");
                app.closed = true;
            }
            _ => {}
        }
    }
}
