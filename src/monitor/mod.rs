//! Debugger session
//!
//! [`Sdb`] owns the [`Machine`] being inspected and the [`WatchpointPool`],
//! and runs monitor command lines against them through the table in
//! [`commands`]. Both the interactive front-end and batch mode drive it the
//! same way: one [`Sdb::execute`] call per line.

pub mod commands;
pub mod config;
pub mod errors;

pub use commands::Outcome;
pub use config::SdbConfig;
pub use errors::{CommandError, ConfigError};

use crate::expr::{evaluate_expression, EvalError};
use crate::machine::memory::{MemoryError, MemoryWindow, PAddr};
use crate::machine::Machine;
use crate::watchpoint::{Watchpoint, WatchpointError, WatchpointId, WatchpointPool};

pub struct Sdb {
    machine: Machine,
    watchpoints: WatchpointPool,
}

impl Sdb {
    pub fn new(machine: Machine, capacity: usize) -> Self {
        Sdb {
            machine,
            watchpoints: WatchpointPool::new(capacity),
        }
    }

    /// Build a session: memory window, register presets, then the image
    pub fn from_config(config: &SdbConfig) -> Result<Self, ConfigError> {
        let window = MemoryWindow::from_base_size(config.pmem_base, config.pmem_size).ok_or(
            ConfigError::InvalidWindow {
                base: config.pmem_base,
                size: config.pmem_size,
            },
        )?;
        let mut machine = Machine::new(window);

        for (name, value) in &config.registers {
            let name = name.strip_prefix('$').unwrap_or(name);
            if !machine.registers.set_by_name(name, *value) {
                return Err(ConfigError::UnknownRegister(name.to_string()));
            }
        }

        if let Some(path) = &config.image {
            let image = std::fs::read(path).map_err(|source| ConfigError::ImageRead {
                path: path.clone(),
                source,
            })?;
            machine.load_image(&image).map_err(ConfigError::ImageLoad)?;
        }

        tracing::info!(
            window = %window,
            watchpoints = config.watchpoints,
            "session ready"
        );
        Ok(Sdb::new(machine, config.watchpoints))
    }

    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut Machine {
        &mut self.machine
    }

    pub fn watchpoint_capacity(&self) -> usize {
        self.watchpoints.capacity()
    }

    /// Evaluate an expression against the current machine state
    pub fn evaluate(&self, text: &str) -> Result<i32, EvalError> {
        evaluate_expression(text, &self.machine)
    }

    pub fn create_watchpoint(&mut self, text: &str) -> Result<WatchpointId, WatchpointError> {
        self.watchpoints.create(text, &self.machine)
    }

    pub fn delete_watchpoint(&mut self, id: WatchpointId) -> Result<(), WatchpointError> {
        self.watchpoints.release(id)
    }

    pub fn watchpoint(&self, id: WatchpointId) -> Option<&Watchpoint> {
        self.watchpoints.get(id)
    }

    /// Active watchpoints in ascending id order
    pub fn watchpoints(&self) -> Vec<&Watchpoint> {
        self.watchpoints.list()
    }

    /// Re-evaluate every active watchpoint and record the result as its new
    /// value. Returns the ids whose value differs from the creation value.
    pub fn refresh_watchpoints(&mut self) -> Vec<WatchpointId> {
        self.watchpoints.refresh(&self.machine)
    }

    /// Read `count` 4-byte words starting at the value of `text`
    pub fn scan_memory(&self, count: usize, text: &str) -> Result<Vec<(PAddr, u32)>, CommandError> {
        let start = self.evaluate(text)? as u32;
        let mut words = Vec::with_capacity(count);

        for i in 0..count {
            let addr = (i as u32)
                .checked_mul(4)
                .and_then(|offset| start.checked_add(offset))
                .ok_or(MemoryError::OutOfRange {
                    addr: start,
                    width: 4,
                })?;
            words.push((addr, self.machine.memory.read(addr, 4)?));
        }
        Ok(words)
    }

    /// Run one command line
    pub fn execute(&mut self, line: &str) -> Result<Outcome, CommandError> {
        let Some((name, arg)) = commands::split_line(line) else {
            return Ok(Outcome::empty());
        };
        let command =
            commands::find(name).ok_or_else(|| CommandError::UnknownCommand(name.to_string()))?;

        tracing::debug!(command = command.name, arg = arg.unwrap_or(""), "executing");
        let result = command.run(self, arg);
        if let Err(e) = &result {
            tracing::warn!(command = command.name, error = %e, "command failed");
        }
        result
    }
}

impl Default for Sdb {
    fn default() -> Self {
        Sdb::new(Machine::default(), crate::watchpoint::DEFAULT_WATCHPOINTS)
    }
}
