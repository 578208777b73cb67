//! Emulated machine state seen by the debugger
//!
//! This module provides the two collaborators the expression evaluator needs:
//! - [`RegisterResolver`]: `$name` → register value
//! - [`MemoryReader`]: the backing memory window and 4-byte physical reads
//!
//! [`Machine`] implements both on top of [`registers::Registers`] and
//! [`memory::PhysicalMemory`]. Tests are free to implement the traits on
//! their own fixtures instead.
//!
//! Instruction execution is not modelled here; the debugger only inspects
//! state.

pub mod constants;
pub mod memory;
pub mod registers;

use memory::{MemoryError, MemoryWindow, PAddr, PhysicalMemory};
use registers::Registers;

/// Resolves register names for `$name` references
pub trait RegisterResolver {
    /// Value of register `name` (no leading `$`), or `None` if it does not exist
    fn reg_str2val(&self, name: &str) -> Option<i32>;
}

/// Physical memory as seen by `*addr`
pub trait MemoryReader {
    /// Inclusive range of backed physical addresses
    fn window(&self) -> MemoryWindow;

    /// Read `width` bytes at `addr`.
    ///
    /// Callers check `addr` against [`MemoryReader::window`] first; reads
    /// inside the window always succeed.
    fn mem_read(&self, addr: PAddr, width: usize) -> u32;
}

/// Registers plus physical memory
#[derive(Debug, Clone, Default)]
pub struct Machine {
    pub registers: Registers,
    pub memory: PhysicalMemory,
}

impl Machine {
    pub fn new(window: MemoryWindow) -> Self {
        Machine {
            registers: Registers::new(),
            memory: PhysicalMemory::new(window),
        }
    }

    /// Load a raw image at the start of physical memory
    pub fn load_image(&mut self, image: &[u8]) -> Result<(), MemoryError> {
        self.memory.load_image(image)?;
        tracing::info!(
            pages = self.memory.resident_pages(),
            "loaded {} byte image at 0x{:08x}",
            image.len(),
            self.memory.window().low
        );
        Ok(())
    }
}

impl RegisterResolver for Machine {
    fn reg_str2val(&self, name: &str) -> Option<i32> {
        self.registers.by_name(name).map(|v| v as i32)
    }
}

impl MemoryReader for Machine {
    fn window(&self) -> MemoryWindow {
        self.memory.window()
    }

    fn mem_read(&self, addr: PAddr, width: usize) -> u32 {
        debug_assert!(self.memory.window().contains_range(addr, width));
        self.memory.read(addr, width).unwrap_or(0)
    }
}
