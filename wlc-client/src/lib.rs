//! Wayland protocol glue for the demo client.
//!
//! This crate connects the pure pieces (shm buffers in [`wlc_shm`], input
//! accumulators in [`wlc_input`], the painter in [`wlc_render`]) to a live
//! compositor:
//!
//! - **Registry**: binds `wl_shm`, `wl_compositor`, `xdg_wm_base`, and
//!   `wl_seat` as they are advertised.
//! - **Capability binder**: creates and releases pointer/keyboard/touch
//!   devices (and their accumulators) as seat capabilities change.
//! - **xdg-shell lifecycle**: configure/ack, resize, close, ping/pong.
//! - **Frame pacing**: one `wl_callback` in flight at all times; each
//!   `done` advances the animation and submits a freshly painted buffer.
//!
//! # Concurrency
//!
//! Everything runs on one thread inside [`run`]'s blocking dispatch loop.
//! Handlers are invoked one at a time to completion; the only suspension
//! point is the dispatch call itself. The [`DemoApp`] context is threaded
//! through every handler by exclusive reference; there are no ambient
//! globals.
//!
//! # Error policy
//!
//! Frame-buffer allocation failures skip one frame and retry on the next
//! callback. Protocol violations and capacity overruns are logged and the
//! offending sub-event dropped. Only a hard dispatch error (or the
//! compositor closing the toplevel) ends the loop.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod errors;

mod app;
mod event_loop;
mod frame;
mod registry;
mod seat;
mod shell;

pub use app::DemoApp;
pub use config::Config;
pub use errors::ClientError;
pub use event_loop::run;
