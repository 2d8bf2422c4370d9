//! Anonymous shared-memory pixel buffers for `wl_shm` surfaces.
//!
//! This crate owns the buffer-lifecycle side of software rendering: it
//! creates anonymous POSIX shared-memory objects sized for one XRGB8888
//! frame, hands out short-lived writable views for painting, and keeps the
//! file descriptor alive so the compositor can map the same bytes through
//! `wl_shm.create_pool`.
//!
//! # Ownership model
//!
//! A [`FrameBuffer`] is exclusively owned by this process until its fd has
//! been turned into a `wl_buffer` and attached to a surface. From that point
//! the compositor may read the region at any time; the buffer must not be
//! written to or reclaimed until the server sends `wl_buffer.release`.
//!
//! The process-local mapping is independent of the compositor-visible
//! object: [`FrameBuffer::map_mut`] returns a view that should be dropped as
//! soon as painting finishes, while the fd (and the shm object behind it)
//! lives on.
//!
//! # Example
//!
//! ```no_run
//! use wlc_shm::FrameBuffer;
//!
//! let buffer = FrameBuffer::allocate(640, 480)?;
//! {
//!     let mut canvas = buffer.map_mut()?;
//!     canvas.fill(0xEE);
//! } // mapping dropped here; the fd remains valid for wl_shm
//! assert_eq!(buffer.stride(), 640 * 4);
//! # Ok::<(), wlc_shm::ShmError>(())
//! ```

mod alloc;
mod buffer;

pub use alloc::{map_readonly, ShmError};
pub use buffer::{FrameBuffer, BYTES_PER_PIXEL};
