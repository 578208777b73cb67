//! Physical memory of the emulated machine
//!
//! This module provides the backing store behind `*addr` dereferences and the
//! `x` command:
//! - A [`MemoryWindow`] describing the inclusive address range that is backed
//! - Sparse page storage, so a 128 MiB window costs nothing until written
//! - Little-endian reads and writes of 1, 2 or 4 bytes
//! - Raw image loading at the window base
//!
//! Pages that were never written read as zero.

use super::constants::{PAGE_SIZE, PMEM_BASE, PMEM_SIZE};
use rustc_hash::FxHashMap;
use std::fmt;

/// Memory address type (32-bit physical)
pub type PAddr = u32;

/// Inclusive physical address range `[low, high]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryWindow {
    pub low: PAddr,
    pub high: PAddr,
}

impl MemoryWindow {
    pub fn new(low: PAddr, high: PAddr) -> Self {
        assert!(low <= high, "memory window 0x{:x}..0x{:x} is inverted", low, high);
        MemoryWindow { low, high }
    }

    /// Window starting at `base` spanning `size` bytes.
    ///
    /// Returns `None` for an empty window or one that runs past 4 GiB.
    pub fn from_base_size(base: PAddr, size: u32) -> Option<Self> {
        if size == 0 {
            return None;
        }
        let high = base.checked_add(size - 1)?;
        Some(MemoryWindow { low: base, high })
    }

    pub fn contains(&self, addr: PAddr) -> bool {
        addr >= self.low && addr <= self.high
    }

    /// Check that every byte of `[addr, addr + width)` is inside the window
    pub fn contains_range(&self, addr: PAddr, width: usize) -> bool {
        if width == 0 {
            return false;
        }
        let last = match u32::try_from(width - 1)
            .ok()
            .and_then(|w| addr.checked_add(w))
        {
            Some(last) => last,
            None => return false,
        };
        self.contains(addr) && self.contains(last)
    }

    /// Number of bytes in the window
    pub fn len(&self) -> u64 {
        (self.high - self.low) as u64 + 1
    }
}

impl Default for MemoryWindow {
    fn default() -> Self {
        // PMEM_SIZE is non-zero and the window stays below 4 GiB
        MemoryWindow {
            low: PMEM_BASE,
            high: PMEM_BASE + (PMEM_SIZE - 1),
        }
    }
}

impl fmt::Display for MemoryWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[0x{:08x}, 0x{:08x}]", self.low, self.high)
    }
}

/// Errors from physical memory accesses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    /// Some byte of the access lies outside the window
    OutOfRange { addr: PAddr, width: usize },

    /// Only 1, 2 and 4 byte accesses exist
    InvalidWidth(usize),

    /// Image does not fit in the window
    ImageTooLarge { len: usize, capacity: u64 },
}

impl fmt::Display for MemoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryError::OutOfRange { addr, width } => write!(
                f,
                "{}-byte access at 0x{:08x} is outside physical memory",
                width, addr
            ),
            MemoryError::InvalidWidth(width) => {
                write!(f, "Invalid access width: {} bytes", width)
            }
            MemoryError::ImageTooLarge { len, capacity } => write!(
                f,
                "Image of {} bytes does not fit in {} bytes of physical memory",
                len, capacity
            ),
        }
    }
}

impl std::error::Error for MemoryError {}

/// Sparse physical memory
#[derive(Debug, Clone)]
pub struct PhysicalMemory {
    window: MemoryWindow,
    pages: FxHashMap<u32, Box<[u8]>>,
}

impl PhysicalMemory {
    /// Create an empty memory backing `window`
    pub fn new(window: MemoryWindow) -> Self {
        PhysicalMemory {
            window,
            pages: FxHashMap::default(),
        }
    }

    pub fn window(&self) -> MemoryWindow {
        self.window
    }

    /// Number of pages that have been written at least once
    pub fn resident_pages(&self) -> usize {
        self.pages.len()
    }

    /// Read a little-endian value of `width` bytes
    pub fn read(&self, addr: PAddr, width: usize) -> Result<u32, MemoryError> {
        self.check_access(addr, width)?;
        let mut bytes = [0u8; 4];
        for (i, byte) in bytes.iter_mut().take(width).enumerate() {
            *byte = self.read_byte(addr + i as u32);
        }
        Ok(u32::from_le_bytes(bytes))
    }

    /// Write the low `width` bytes of `value`, little-endian
    pub fn write(&mut self, addr: PAddr, width: usize, value: u32) -> Result<(), MemoryError> {
        self.check_access(addr, width)?;
        for (i, &byte) in value.to_le_bytes().iter().take(width).enumerate() {
            self.write_byte(addr + i as u32, byte);
        }
        Ok(())
    }

    /// Copy `bytes` into memory starting at `addr`
    pub fn write_bytes(&mut self, addr: PAddr, bytes: &[u8]) -> Result<(), MemoryError> {
        if bytes.is_empty() {
            return Ok(());
        }
        if !self.window.contains_range(addr, bytes.len()) {
            return Err(MemoryError::OutOfRange {
                addr,
                width: bytes.len(),
            });
        }
        for (i, &byte) in bytes.iter().enumerate() {
            self.write_byte(addr + i as u32, byte);
        }
        Ok(())
    }

    /// Load a raw image at the start of the window
    pub fn load_image(&mut self, image: &[u8]) -> Result<(), MemoryError> {
        if image.len() as u64 > self.window.len() {
            return Err(MemoryError::ImageTooLarge {
                len: image.len(),
                capacity: self.window.len(),
            });
        }
        self.write_bytes(self.window.low, image)
    }

    fn check_access(&self, addr: PAddr, width: usize) -> Result<(), MemoryError> {
        if !matches!(width, 1 | 2 | 4) {
            return Err(MemoryError::InvalidWidth(width));
        }
        if !self.window.contains_range(addr, width) {
            return Err(MemoryError::OutOfRange { addr, width });
        }
        Ok(())
    }

    /// Caller has checked the window
    fn read_byte(&self, addr: PAddr) -> u8 {
        let (page, offset) = Self::split(addr);
        self.pages.get(&page).map_or(0, |data| data[offset])
    }

    /// Caller has checked the window
    fn write_byte(&mut self, addr: PAddr, byte: u8) {
        let (page, offset) = Self::split(addr);
        let data = self
            .pages
            .entry(page)
            .or_insert_with(|| vec![0u8; PAGE_SIZE].into_boxed_slice());
        data[offset] = byte;
    }

    fn split(addr: PAddr) -> (u32, usize) {
        let addr = addr as usize;
        ((addr / PAGE_SIZE) as u32, addr % PAGE_SIZE)
    }
}

impl Default for PhysicalMemory {
    fn default() -> Self {
        Self::new(MemoryWindow::default())
    }
}
