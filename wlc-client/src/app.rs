//! The client context threaded through every dispatch handler.

use tracing::{debug, warn};
use wayland_client::protocol::{
    wl_compositor, wl_keyboard, wl_pointer, wl_seat, wl_shm, wl_shm_pool, wl_surface, wl_touch,
};
use wayland_client::QueueHandle;
use wayland_protocols::xdg::shell::client::{xdg_surface, xdg_toplevel, xdg_wm_base};

use wlc_input::{InputSink, KeyTranslator, PointerAccumulator, TouchAccumulator};
use wlc_render::{paint_checkerboard, AnimationState};
use wlc_shm::FrameBuffer;

use crate::config::Config;
use crate::errors::ClientError;

/// Everything the client tracks: bound globals, window objects, input
/// devices, and the core accumulator/animation state.
///
/// Exactly one of these exists per connection, owned by the dispatch loop
/// and passed into every handler by exclusive reference.
pub struct DemoApp {
    pub(crate) config: Config,
    pub(crate) sink: Box<dyn InputSink>,

    // Globals bound from the registry.
    pub(crate) shm: Option<wl_shm::WlShm>,
    pub(crate) compositor: Option<wl_compositor::WlCompositor>,
    pub(crate) wm_base: Option<xdg_wm_base::XdgWmBase>,
    pub(crate) seat: Option<wl_seat::WlSeat>,

    // Window objects.
    pub(crate) surface: Option<wl_surface::WlSurface>,
    pub(crate) xdg_surface: Option<xdg_surface::XdgSurface>,
    pub(crate) toplevel: Option<xdg_toplevel::XdgToplevel>,

    // Input devices, live while the seat advertises the capability.
    pub(crate) pointer: Option<wl_pointer::WlPointer>,
    pub(crate) keyboard: Option<wl_keyboard::WlKeyboard>,
    pub(crate) touch: Option<wl_touch::WlTouch>,

    // Core state.
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) animation: AnimationState,
    pub(crate) pointer_events: PointerAccumulator,
    pub(crate) touch_events: TouchAccumulator,
    pub(crate) keys: KeyTranslator,
    pub(crate) closed: bool,
}

impl DemoApp {
    /// Creates the context for `config`, reporting input to `sink`.
    pub fn new(config: Config, sink: Box<dyn InputSink>) -> Self {
        let width = config.display.width;
        let height = config.display.height;
        let animation = AnimationState::new(config.animation.scroll_rate);
        Self {
            config,
            sink,
            shm: None,
            compositor: None,
            wm_base: None,
            seat: None,
            surface: None,
            xdg_surface: None,
            toplevel: None,
            pointer: None,
            keyboard: None,
            touch: None,
            width,
            height,
            animation,
            pointer_events: PointerAccumulator::new(),
            touch_events: TouchAccumulator::new(),
            keys: KeyTranslator::new(),
            closed: false,
        }
    }

    /// Whether the compositor asked the toplevel to close.
    pub fn closed(&self) -> bool {
        self.closed
    }

    /// Creates the surface and xdg-shell objects and requests the first
    /// frame callback.
    ///
    /// Requires the registry roundtrip to have bound all mandatory
    /// globals.
    pub(crate) fn create_window(&mut self, qh: &QueueHandle<Self>) -> Result<(), ClientError> {
        if self.shm.is_none() {
            return Err(ClientError::MissingGlobal("wl_shm"));
        }
        let compositor = self
            .compositor
            .as_ref()
            .ok_or(ClientError::MissingGlobal("wl_compositor"))?;
        let wm_base = self
            .wm_base
            .as_ref()
            .ok_or(ClientError::MissingGlobal("xdg_wm_base"))?;

        let surface = compositor.create_surface(qh, ());
        let xdg_surface = wm_base.get_xdg_surface(&surface, qh, ());
        let toplevel = xdg_surface.get_toplevel(qh, ());
        toplevel.set_title(self.config.display.title.clone());
        surface.commit();
        surface.frame(qh, ());

        self.surface = Some(surface);
        self.xdg_surface = Some(xdg_surface);
        self.toplevel = Some(toplevel);
        Ok(())
    }

    /// Paints and submits one frame at the current size and scroll offset.
    ///
    /// Allocation failure skips the submission; the surface simply keeps
    /// its previous content until the next pacing callback retries.
    pub(crate) fn submit_frame(&self, qh: &QueueHandle<Self>) {
        if let Err(err) = self.try_submit_frame(qh) {
            warn!("skipping frame: {err}");
        }
    }

    fn try_submit_frame(&self, qh: &QueueHandle<Self>) -> Result<(), ClientError> {
        let (shm, surface) = match (&self.shm, &self.surface) {
            (Some(shm), Some(surface)) => (shm, surface),
            _ => return Ok(()),
        };

        let buffer = FrameBuffer::allocate(self.width, self.height)?;
        {
            let mut canvas = buffer.map_mut()?;
            paint_checkerboard(
                &mut canvas,
                self.width,
                self.height,
                self.animation.offset(),
            );
        } // the mapping is gone before the compositor sees the buffer

        let pool = shm.create_pool(buffer.as_fd(), buffer.len() as i32, qh, ());
        let wl_buffer = pool.create_buffer(
            0,
            self.width as i32,
            self.height as i32,
            buffer.stride() as i32,
            wl_shm::Format::Xrgb8888,
            qh,
            (),
        );
        pool.destroy();

        surface.attach(Some(&wl_buffer), 0, 0);
        surface.damage_buffer(0, 0, i32::MAX, i32::MAX);
        surface.commit();
        debug!(
            "submitted {}x{} frame at offset {:.2}",
            self.width,
            self.height,
            self.animation.offset()
        );
        Ok(())
    }
}

// Objects whose events carry nothing this client acts on.
wayland_client::delegate_noop!(DemoApp: ignore wl_compositor::WlCompositor);
wayland_client::delegate_noop!(DemoApp: ignore wl_shm_pool::WlShmPool);
wayland_client::delegate_noop!(DemoApp: ignore wl_surface::WlSurface);
