//! Command layer errors
//!
//! [`CommandError`] is what a command line can fail with. It wraps the
//! errors of the layers below so the front-end has a single type to print.
//! [`ConfigError`] covers building a session from [`super::config::SdbConfig`].

use crate::expr::EvalError;
use crate::machine::memory::MemoryError;
use crate::watchpoint::WatchpointError;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// First word of the line is not a command
    UnknownCommand(String),

    /// Command needs an argument that was not given
    MissingArgument {
        command: &'static str,
        usage: &'static str,
    },

    /// Argument was given but makes no sense
    InvalidArgument {
        command: &'static str,
        message: String,
    },

    Eval(EvalError),

    Watchpoint(WatchpointError),

    Memory(MemoryError),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::UnknownCommand(name) => write!(f, "Unknown command '{}'", name),
            CommandError::MissingArgument { command, usage } => {
                write!(f, "'{}' needs an argument. Usage: {}", command, usage)
            }
            CommandError::InvalidArgument { command, message } => {
                write!(f, "{}: {}", command, message)
            }
            CommandError::Eval(e) => write!(f, "{}", e),
            CommandError::Watchpoint(e) => write!(f, "{}", e),
            CommandError::Memory(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CommandError::Eval(e) => Some(e),
            CommandError::Watchpoint(e) => Some(e),
            CommandError::Memory(e) => Some(e),
            _ => None,
        }
    }
}

impl From<EvalError> for CommandError {
    fn from(e: EvalError) -> Self {
        CommandError::Eval(e)
    }
}

impl From<WatchpointError> for CommandError {
    fn from(e: WatchpointError) -> Self {
        CommandError::Watchpoint(e)
    }
}

impl From<MemoryError> for CommandError {
    fn from(e: MemoryError) -> Self {
        CommandError::Memory(e)
    }
}

/// Errors while building a session from its configuration
#[derive(Debug)]
pub enum ConfigError {
    /// `--pmem-base` / `--pmem-size` describe no usable window
    InvalidWindow { base: u32, size: u32 },

    /// A register preset names no register
    UnknownRegister(String),

    /// Image file could not be read
    ImageRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Image file does not fit
    ImageLoad(MemoryError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidWindow { base, size } => write!(
                f,
                "Physical memory of 0x{:x} bytes at 0x{:08x} is empty or wraps past 4 GiB",
                size, base
            ),
            ConfigError::UnknownRegister(name) => {
                write!(f, "Unknown register '{}' in register preset", name)
            }
            ConfigError::ImageRead { path, source } => {
                write!(f, "Cannot read image '{}': {}", path.display(), source)
            }
            ConfigError::ImageLoad(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::ImageRead { source, .. } => Some(source),
            ConfigError::ImageLoad(e) => Some(e),
            _ => None,
        }
    }
}
