//! Host file-system seam
//!
//! Game loading and the core's VFS interface both go through a
//! [`HostFileSystem`], so hosts with sandboxed storage can supply their own.

use bitflags::bitflags;
use std::fs::{File, OpenOptions};
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};
use std::path::Path;

bitflags! {
    /// File access mode, bit-compatible with the native VFS access mask
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FileAccess: u32 {
        const READ            = 0b0001;
        const WRITE           = 0b0010;
        const READ_WRITE      = Self::READ.bits() | Self::WRITE.bits();
        /// Keep existing contents when opening for writing
        const UPDATE_EXISTING = 0b0100;
    }
}

/// A seekable byte stream handed out by the host
pub trait FileStream: Read + Write + Seek + Send {
    /// Total length in bytes
    fn length(&mut self) -> io::Result<u64> {
        let position = self.stream_position()?;
        let end = self.seek(SeekFrom::End(0))?;
        if position != end {
            self.seek(SeekFrom::Start(position))?;
        }
        Ok(end)
    }

    /// Grow or shrink the stream to exactly `len` bytes
    fn set_length(&mut self, len: u64) -> io::Result<()>;
}

impl FileStream for File {
    fn length(&mut self) -> io::Result<u64> {
        Ok(self.metadata()?.len())
    }

    fn set_length(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)
    }
}

impl FileStream for Cursor<Vec<u8>> {
    fn length(&mut self) -> io::Result<u64> {
        Ok(self.get_ref().len() as u64)
    }

    fn set_length(&mut self, len: u64) -> io::Result<()> {
        let len = usize::try_from(len)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "length exceeds address space"))?;
        self.get_mut().resize(len, 0);
        Ok(())
    }
}

/// File operations the adapter needs from the host
pub trait HostFileSystem: Send + Sync {
    /// Open `path` with the given access mode
    fn open(&self, path: &Path, access: FileAccess) -> io::Result<Box<dyn FileStream>>;

    /// Return a stream obtained from [`HostFileSystem::open`]
    fn close(&self, stream: Box<dyn FileStream>) {
        drop(stream);
    }

    fn remove(&self, _path: &Path) -> io::Result<()> {
        Err(io::ErrorKind::Unsupported.into())
    }

    fn rename(&self, _from: &Path, _to: &Path) -> io::Result<()> {
        Err(io::ErrorKind::Unsupported.into())
    }
}

/// [`HostFileSystem`] backed by `std::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeFileSystem;

impl HostFileSystem for NativeFileSystem {
    fn open(&self, path: &Path, access: FileAccess) -> io::Result<Box<dyn FileStream>> {
        let writing = access.contains(FileAccess::WRITE);
        let file = OpenOptions::new()
            .read(access.contains(FileAccess::READ))
            .write(writing)
            .create(writing)
            .truncate(writing && !access.contains(FileAccess::UPDATE_EXISTING))
            .open(path)?;
        tracing::trace!("Opened {:?} ({:?})", path, access);
        Ok(Box::new(file))
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        std::fs::rename(from, to)
    }
}
