use log::debug;
use crate::backing_store::BackingStore;
use crate::error::MmuError;
use crate::replacement_policies::{EvictionPolicy, Fifo, LeastRecentlyUsed, NoEviction};

/// One fixed-size slot of the page table
///
/// A frame's index is its position in the table. Frames start empty, become resident on their
/// first load, and from then on are only ever overwritten in place
#[derive(Clone, Debug)]
pub struct Frame {
    resident_page: Option<u32>,
    data: Box<[u8]>,
    created_at: u64,
    last_used_at: u64,
}

impl Frame {
    fn empty(page_size: usize) -> Self {
        Self {
            resident_page: None,
            data: vec![0; page_size].into_boxed_slice(),
            created_at: 0,
            last_used_at: 0,
        }
    }

    pub fn resident_page(&self) -> Option<u32> {
        self.resident_page
    }

    pub fn is_empty(&self) -> bool {
        self.resident_page.is_none()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Sequence number of the access which loaded the current page
    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    /// Sequence number of the most recent access to hit the current page
    pub fn last_used_at(&self) -> u64 {
        self.last_used_at
    }
}

/// A generic trait for page tables
///
/// Like the policies, this exists so the translator can branch once on a concrete table type
/// rather than dereferencing a trait object on every access
pub trait PageTableTrait {
    /// Finds the frame holding a page, if it's resident
    fn lookup(&self, page_number: u32) -> Option<usize>;

    /// Loads a page after a confirmed miss, returning the frame it now lives in
    ///
    /// The lowest-indexed empty frame is used while any remain, after that the policy picks a
    /// victim. Whatever page the victim held is no longer mapped
    ///
    /// # Arguments
    ///
    /// * `page_number`: The page to load
    /// * `sequence`: Sequence number of the faulting access, becomes the frame's age and recency
    /// * `store`: Where the page's bytes come from
    ///
    /// returns: Result<usize, MmuError>
    fn install<S: BackingStore + ?Sized>(&mut self, page_number: u32, sequence: u64, store: &mut S) -> Result<usize, MmuError>;

    /// Records a hit on a frame
    fn touch(&mut self, frame_index: usize, sequence: u64);

    fn frame(&self, frame_index: usize) -> &Frame;

    fn frame_count(&self) -> usize;

    /// Gets the number of frames which have never been loaded. Useful for analysing runs or
    /// debugging
    fn get_empty_frame_count(&self) -> usize;

    /// Reads the byte at `offset` within a frame, as the signed value the report prints
    fn read_byte(&self, frame_index: usize, offset: usize) -> i8 {
        self.frame(frame_index).data[offset] as i8
    }
}

/// A fixed-capacity page table, parameterised by its eviction policy
///
/// The frame array is allocated once at construction and never grows or shrinks. Lookups are a
/// linear scan, tables here are a few hundred frames at most
pub struct PageTable<P: EvictionPolicy> {
    frames: Vec<Frame>,
    // Frames fill strictly in index order, so this is also the index of the lowest empty frame
    filled: usize,
    // Pages are read here first so a failed read never leaves a frame half overwritten
    scratch: Box<[u8]>,
    policy: P,
}

impl<P: EvictionPolicy> PageTable<P> {
    pub fn new(frame_count: usize, page_size: usize, policy: P) -> Result<Self, MmuError> {
        if frame_count == 0 {
            return Err(MmuError::InvalidConfig("the page table needs at least one frame".to_string()));
        }
        Ok(Self {
            frames: vec![Frame::empty(page_size); frame_count],
            filled: 0,
            scratch: vec![0; page_size].into_boxed_slice(),
            policy,
        })
    }
}

impl<P: EvictionPolicy> PageTableTrait for PageTable<P> {
    fn lookup(&self, page_number: u32) -> Option<usize> {
        self.frames.iter().position(|frame| frame.resident_page == Some(page_number))
    }

    fn install<S: BackingStore + ?Sized>(&mut self, page_number: u32, sequence: u64, store: &mut S) -> Result<usize, MmuError> {
        let frame_index = if self.filled < self.frames.len() {
            self.filled
        } else {
            self.policy.select_victim(&self.frames).ok_or_else(|| {
                MmuError::InvalidConfig(format!(
                    "all {} frames are resident and the policy never evicts, can't load page {page_number}",
                    self.frames.len()
                ))
            })?
        };
        store.read_page(page_number, &mut self.scratch)?;

        let frame = &mut self.frames[frame_index];
        match frame.resident_page {
            Some(evicted) => debug!(
                "Evicting page {evicted} from frame {frame_index} (loaded at {}, last used at {}) for page {page_number}",
                frame.created_at, frame.last_used_at
            ),
            None => self.filled += 1,
        }
        frame.data.copy_from_slice(&self.scratch);
        frame.resident_page = Some(page_number);
        frame.created_at = sequence;
        frame.last_used_at = sequence;
        Ok(frame_index)
    }

    fn touch(&mut self, frame_index: usize, sequence: u64) {
        self.frames[frame_index].last_used_at = sequence;
    }

    fn frame(&self, frame_index: usize) -> &Frame {
        &self.frames[frame_index]
    }

    fn frame_count(&self) -> usize {
        self.frames.len()
    }

    fn get_empty_frame_count(&self) -> usize {
        self.frames.len() - self.filled
    }
}

/// Enum for the page tables of each provided policy
///
/// Branching explicitly on each variant lets the compiler see the concrete policy, which a
/// trait object would hide on every access
pub enum GenericPageTable {
    Fifo(PageTable<Fifo>),
    LeastRecentlyUsed(PageTable<LeastRecentlyUsed>),
    NoEviction(PageTable<NoEviction>),
}

impl From<PageTable<Fifo>> for GenericPageTable {
    fn from(value: PageTable<Fifo>) -> Self {
        Self::Fifo(value)
    }
}

impl From<PageTable<LeastRecentlyUsed>> for GenericPageTable {
    fn from(value: PageTable<LeastRecentlyUsed>) -> Self {
        Self::LeastRecentlyUsed(value)
    }
}

impl From<PageTable<NoEviction>> for GenericPageTable {
    fn from(value: PageTable<NoEviction>) -> Self {
        Self::NoEviction(value)
    }
}

impl PageTableTrait for GenericPageTable {
    fn lookup(&self, page_number: u32) -> Option<usize> {
        match self {
            GenericPageTable::Fifo(t) => t.lookup(page_number),
            GenericPageTable::LeastRecentlyUsed(t) => t.lookup(page_number),
            GenericPageTable::NoEviction(t) => t.lookup(page_number),
        }
    }

    fn install<S: BackingStore + ?Sized>(&mut self, page_number: u32, sequence: u64, store: &mut S) -> Result<usize, MmuError> {
        match self {
            GenericPageTable::Fifo(t) => t.install(page_number, sequence, store),
            GenericPageTable::LeastRecentlyUsed(t) => t.install(page_number, sequence, store),
            GenericPageTable::NoEviction(t) => t.install(page_number, sequence, store),
        }
    }

    fn touch(&mut self, frame_index: usize, sequence: u64) {
        match self {
            GenericPageTable::Fifo(t) => t.touch(frame_index, sequence),
            GenericPageTable::LeastRecentlyUsed(t) => t.touch(frame_index, sequence),
            GenericPageTable::NoEviction(t) => t.touch(frame_index, sequence),
        }
    }

    fn frame(&self, frame_index: usize) -> &Frame {
        match self {
            GenericPageTable::Fifo(t) => t.frame(frame_index),
            GenericPageTable::LeastRecentlyUsed(t) => t.frame(frame_index),
            GenericPageTable::NoEviction(t) => t.frame(frame_index),
        }
    }

    fn frame_count(&self) -> usize {
        match self {
            GenericPageTable::Fifo(t) => t.frame_count(),
            GenericPageTable::LeastRecentlyUsed(t) => t.frame_count(),
            GenericPageTable::NoEviction(t) => t.frame_count(),
        }
    }

    fn get_empty_frame_count(&self) -> usize {
        match self {
            GenericPageTable::Fifo(t) => t.get_empty_frame_count(),
            GenericPageTable::LeastRecentlyUsed(t) => t.get_empty_frame_count(),
            GenericPageTable::NoEviction(t) => t.get_empty_frame_count(),
        }
    }
}
