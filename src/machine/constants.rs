// Constants for the emulated machine

/// Default start of physical memory (the RAM aperture of the emulated board)
pub const PMEM_BASE: u32 = 0x8000_0000;

/// Default size of physical memory: 128 MiB, so the window ends at 0x87ff_ffff
pub const PMEM_SIZE: u32 = 0x0800_0000;

/// Granularity of the sparse backing store
pub const PAGE_SIZE: usize = 4096;

/// Program counter after reset
pub const RESET_VECTOR: u32 = PMEM_BASE;
