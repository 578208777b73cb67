//! Session configuration
//!
//! [`SdbConfig`] is what the command line boils down to. It is plain data;
//! [`crate::monitor::Sdb::from_config`] turns it into a running session.

use crate::machine::constants::{PMEM_BASE, PMEM_SIZE};
use crate::watchpoint::DEFAULT_WATCHPOINTS;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdbConfig {
    /// Start of physical memory
    pub pmem_base: u32,

    /// Size of physical memory in bytes
    pub pmem_size: u32,

    /// Number of watchpoint slots
    pub watchpoints: usize,

    /// Raw image copied to `pmem_base` at startup
    pub image: Option<PathBuf>,

    /// Initial register values, applied in order
    pub registers: Vec<(String, u32)>,
}

impl Default for SdbConfig {
    fn default() -> Self {
        SdbConfig {
            pmem_base: PMEM_BASE,
            pmem_size: PMEM_SIZE,
            watchpoints: DEFAULT_WATCHPOINTS,
            image: None,
            registers: Vec::new(),
        }
    }
}
