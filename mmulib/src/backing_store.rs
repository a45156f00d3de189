use std::fs::File;
use std::io::{self, ErrorKind, Read, Seek, SeekFrom};
use memmap2::Mmap;
use crate::error::MmuError;

/// A read-only, randomly addressable byte source standing in for disk-resident pages
///
/// Implementations only need to provide `read_exact_at`; page addressing is shared. There is
/// no caching at this layer, every call is a read from the underlying medium
pub trait BackingStore {
    /// Fills `buf` with the bytes starting at `offset`, failing if the store can't supply all of
    /// them
    fn read_exact_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<()>;

    /// Reads one page into `page`, the page size being the length of the buffer
    ///
    /// # Arguments
    ///
    /// * `page_number`: The page to read, its byte offset is `page_number * page.len()`
    /// * `page`: The destination buffer
    ///
    /// returns: Result<(), MmuError>, StoreReadError when the store is too short
    fn read_page(&mut self, page_number: u32, page: &mut [u8]) -> Result<(), MmuError> {
        let offset = page_number as u64 * page.len() as u64;
        self.read_exact_at(offset, page)
            .map_err(|source| MmuError::StoreReadError { page: page_number, offset, source })
    }
}

fn read_from_slice(bytes: &[u8], offset: u64, buf: &mut [u8]) -> io::Result<()> {
    let range = usize::try_from(offset)
        .ok()
        .and_then(|start| Some(start..start.checked_add(buf.len())?));
    match range.and_then(|r| bytes.get(r)) {
        Some(src) => {
            buf.copy_from_slice(src);
            Ok(())
        }
        None => Err(io::Error::new(
            ErrorKind::UnexpectedEof,
            format!("store holds {} bytes, {} requested at offset {offset}", bytes.len(), buf.len()),
        )),
    }
}

impl BackingStore for Vec<u8> {
    fn read_exact_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<()> {
        read_from_slice(self, offset, buf)
    }
}

impl BackingStore for &[u8] {
    fn read_exact_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<()> {
        read_from_slice(self, offset, buf)
    }
}

/// Backing store over any seekable reader, each page read is a seek followed by a read
pub struct SeekBackingStore<R: Read + Seek> {
    inner: R,
}

impl<R: Read + Seek> SeekBackingStore<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read + Seek> BackingStore for SeekBackingStore<R> {
    fn read_exact_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<()> {
        self.inner.seek(SeekFrom::Start(offset))?;
        self.inner.read_exact(buf)
    }
}

/// Backing store over a read-only memory map of the whole file
///
/// The map is created once; the OS faults the file in as pages are touched, so reads still go
/// to the medium the first time each page is requested
pub struct MappedBackingStore {
    map: Mmap,
}

impl MappedBackingStore {
    /// Maps a file read-only
    ///
    /// The file must not be truncated or modified by another process while mapped
    pub fn open(file: &File) -> Result<Self, MmuError> {
        // Safety: the mapping is read-only and the simulator never hands out references which
        // outlive a single read
        let map = unsafe { Mmap::map(file)? };
        #[cfg(unix)]
        {
            // Page numbers arrive in whatever order the address list has
            map.advise(memmap2::Advice::Random)?;
        }
        Ok(Self { map })
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl BackingStore for MappedBackingStore {
    fn read_exact_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<()> {
        read_from_slice(&self.map, offset, buf)
    }
}
