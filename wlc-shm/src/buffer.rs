//! Frame-sized shared-memory buffers.

use std::fs::File;
use std::os::fd::{AsFd, BorrowedFd};

use memmap2::{MmapMut, MmapOptions};

use crate::alloc::{allocate_shm_file, ShmError};

/// Bytes per pixel for XRGB8888, the only format this renderer produces.
pub const BYTES_PER_PIXEL: u32 = 4;

/// One frame's worth of anonymous shared memory.
///
/// The region is sized `width * height * 4` bytes with no row padding, so
/// the stride always equals `width * 4`.
///
/// Dropping a `FrameBuffer` closes the fd. That is safe once the fd has
/// been passed to `wl_shm.create_pool` (the server holds its own duplicate)
/// but must not happen while a painter still holds a mapping.
#[derive(Debug)]
pub struct FrameBuffer {
    file: File,
    width: u32,
    height: u32,
}

impl FrameBuffer {
    /// Allocates a zero-filled buffer for a `width` x `height` frame.
    pub fn allocate(width: u32, height: u32) -> Result<Self, ShmError> {
        let len = u64::from(width) * u64::from(height) * u64::from(BYTES_PER_PIXEL);
        let file = allocate_shm_file(len)?;
        Ok(Self {
            file,
            width,
            height,
        })
    }

    /// Buffer width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Buffer height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row stride in bytes.
    pub fn stride(&self) -> u32 {
        self.width * BYTES_PER_PIXEL
    }

    /// Total region length in bytes.
    pub fn len(&self) -> usize {
        self.stride() as usize * self.height as usize
    }

    /// Whether the buffer covers zero pixels.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maps the region writable for painting.
    ///
    /// The returned view must be dropped before the buffer is handed to the
    /// compositor; the fd itself stays valid independently of any mapping.
    pub fn map_mut(&self) -> Result<MmapMut, ShmError> {
        // SAFETY: the underlying object is an unlinked shm region created by
        // this process at exactly `len` bytes; nothing else can resize it.
        unsafe { MmapOptions::new().len(self.len()).map_mut(&self.file) }.map_err(ShmError::Map)
    }

    /// Borrows the fd for `wl_shm.create_pool`.
    pub fn as_fd(&self) -> BorrowedFd<'_> {
        self.file.as_fd()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_matches_xrgb8888() {
        let buffer = FrameBuffer::allocate(640, 480).unwrap();
        assert_eq!(buffer.width(), 640);
        assert_eq!(buffer.height(), 480);
        assert_eq!(buffer.stride(), 2560);
        assert_eq!(buffer.len(), 2560 * 480);
    }

    #[test]
    fn fresh_buffer_is_zero_filled() {
        let buffer = FrameBuffer::allocate(8, 8).unwrap();
        let view = buffer.map_mut().unwrap();
        assert!(view.iter().all(|&b| b == 0));
    }

    #[test]
    fn bytes_survive_remapping() {
        // Writes through one view must be observed through a later, fresh
        // view of the same region.
        let buffer = FrameBuffer::allocate(16, 2).unwrap();
        let pattern: Vec<u8> = (0..buffer.len()).map(|i| (i % 251) as u8).collect();
        {
            let mut view = buffer.map_mut().unwrap();
            view.copy_from_slice(&pattern);
        }
        let reread = buffer.map_mut().unwrap();
        assert_eq!(&reread[..], &pattern[..]);
    }
}
