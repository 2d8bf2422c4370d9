//! Registry handling: binding the globals the client needs.

use tracing::{debug, trace};
use wayland_client::protocol::{wl_compositor, wl_registry, wl_seat, wl_shm};
use wayland_client::{Connection, Dispatch, QueueHandle};
use wayland_protocols::xdg::shell::client::xdg_wm_base;

use crate::app::DemoApp;

// Versions this client speaks. Seats are bound at whatever the server
// offers up to 7 so that touch shape/orientation events arrive when
// available.
const COMPOSITOR_VERSION: u32 = 4;
const SEAT_VERSION: u32 = 7;

impl Dispatch<wl_registry::WlRegistry, ()> for DemoApp {
    fn event(
        app: &mut Self,
        registry: &wl_registry::WlRegistry,
        event: wl_registry::Event,
        _: &(),
        _conn: &Connection,
        qh: &QueueHandle<Self>,
    ) {
        match event {
            wl_registry::Event::Global {
                name,
                interface,
                version,
            } => match interface.as_str() {
                "wl_shm" => {
                    app.shm = Some(registry.bind::<wl_shm::WlShm, _, _>(name, 1, qh, ()));
                    debug!("bound wl_shm v1");
                }
                "wl_compositor" => {
                    app.compositor = Some(registry.bind::<wl_compositor::WlCompositor, _, _>(
                        name,
                        COMPOSITOR_VERSION,
                        qh,
                        (),
                    ));
                    debug!("bound wl_compositor v{COMPOSITOR_VERSION}");
                }
                "xdg_wm_base" => {
                    app.wm_base =
                        Some(registry.bind::<xdg_wm_base::XdgWmBase, _, _>(name, 1, qh, ()));
                    debug!("bound xdg_wm_base v1");
                }
                "wl_seat" => {
                    let bound = version.min(SEAT_VERSION);
                    app.seat =
                        Some(registry.bind::<wl_seat::WlSeat, _, _>(name, bound, qh, ()));
                    debug!("bound wl_seat v{bound}");
                }
                other => trace!("ignoring global {other} v{version}"),
            },
            wl_registry::Event::GlobalRemove { name } => {
                debug!("global {name} removed");
            }
            _ => {}
        }
    }
}

impl Dispatch<wl_shm::WlShm, ()> for DemoApp {
    fn event(
        _app: &mut Self,
        _shm: &wl_shm::WlShm,
        event: wl_shm::Event,
        _: &(),
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
    ) {
        if let wl_shm::Event::Format { format } = event {
            trace!("shm format advertised: {format:?}");
        }
    }
}
