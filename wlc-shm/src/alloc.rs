//! Anonymous shm object creation.
//!
//! Objects are created under a randomized name, with exclusive-create
//! semantics, and unlinked immediately so their lifetime is scoped to open
//! file descriptors rather than the `/dev/shm` namespace.

use std::fs::File;
use std::io;
use std::os::fd::OwnedFd;

use memmap2::{Mmap, MmapOptions};
use rustix::fs::{ftruncate, Mode};
use rustix::io::Errno;
use rustix::shm;
use rustix::time::{clock_gettime, ClockId};
use thiserror::Error;
use tracing::trace;

/// Attempts made to find an unused shm object name before giving up.
pub(crate) const NAME_RETRIES: u32 = 100;

const NAME_PREFIX: &str = "/wlc-shm-";

/// Errors raised while creating or mapping shared-memory regions.
#[derive(Debug, Error)]
pub enum ShmError {
    /// Every randomized name collided with an existing shm object.
    #[error("no unique shm object name found after {NAME_RETRIES} attempts")]
    NameExhausted,

    /// `shm_open` failed for a reason other than a name collision.
    #[error("shm object creation failed: {0}")]
    Create(#[source] io::Error),

    /// Resizing the freshly created object failed.
    #[error("shm object resize failed: {0}")]
    Truncate(#[source] io::Error),

    /// Mapping the object into the address space failed.
    #[error("shm mapping failed: {0}")]
    Map(#[source] io::Error),
}

/// Derives a 6-character name suffix from the monotonic clock.
///
/// Each character consumes 5 bits of the nanosecond counter: 4 bits select a
/// letter A..P and the fifth flips it to lowercase, giving 2^30 distinct
/// suffixes per second of clock.
fn name_suffix() -> String {
    let ts = clock_gettime(ClockId::Monotonic);
    let mut bits = ts.tv_nsec as u64 ^ ((ts.tv_sec as u64) << 30);
    let mut suffix = String::with_capacity(6);
    for _ in 0..6 {
        let c = b'A' + (bits & 15) as u8 + ((bits & 16) as u8) * 2;
        suffix.push(c as char);
        bits >>= 5;
    }
    suffix
}

/// Creates an anonymous shm object and returns its fd.
///
/// The object is unlinked before this function returns, so the name can
/// never leak even if the process aborts.
fn create_shm_file() -> Result<OwnedFd, ShmError> {
    for _ in 0..NAME_RETRIES {
        let name = format!("{NAME_PREFIX}{}", name_suffix());
        match shm::open(
            &name,
            shm::OFlags::CREATE | shm::OFlags::EXCL | shm::OFlags::RDWR,
            Mode::RUSR | Mode::WUSR,
        ) {
            Ok(fd) => {
                let _ = shm::unlink(&name);
                trace!("created shm object {name}");
                return Ok(fd);
            }
            Err(Errno::EXIST) => continue,
            Err(err) => return Err(ShmError::Create(err.into())),
        }
    }
    Err(ShmError::NameExhausted)
}

/// Creates an anonymous shm object resized to exactly `len` bytes.
///
/// On resize failure the partially-created object is closed before the
/// error is returned.
pub(crate) fn allocate_shm_file(len: u64) -> Result<File, ShmError> {
    let fd = create_shm_file()?;
    loop {
        match ftruncate(&fd, len) {
            Ok(()) => break,
            Err(Errno::INTR) => continue,
            Err(err) => return Err(ShmError::Truncate(err.into())),
        }
    }
    Ok(File::from(fd))
}

/// Maps `len` bytes of a foreign shared-memory fd read-only.
///
/// Used for regions the server owns and this process merely reads, such as
/// keymap fds delivered over the wire.
pub fn map_readonly(file: &File, len: usize) -> Result<Mmap, ShmError> {
    // SAFETY: the fd refers to a shared-memory object the server created at
    // this length and will not shrink while the event carrying it is being
    // handled.
    unsafe { MmapOptions::new().len(len).map(file) }.map_err(ShmError::Map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffixes_are_alphabetic() {
        let suffix = name_suffix();
        assert_eq!(suffix.len(), 6);
        assert!(suffix.chars().all(|c| c.is_ascii_alphabetic()));
    }

    #[test]
    fn allocation_produces_requested_length() {
        let file = allocate_shm_file(4096).unwrap();
        assert_eq!(file.metadata().unwrap().len(), 4096);
    }

    #[test]
    fn consecutive_allocations_coexist() {
        // Each allocation owns a distinct unlinked object even though the
        // names come from the same clock.
        let a = allocate_shm_file(64).unwrap();
        let b = allocate_shm_file(64).unwrap();
        assert_eq!(a.metadata().unwrap().len(), 64);
        assert_eq!(b.metadata().unwrap().len(), 64);
    }
}
