//! Watchpoint pool errors
//!
//! All of these are reported back to the command layer. None of them stops
//! the debugger.

use crate::expr::EvalError;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchpointError {
    /// The expression could not be evaluated; nothing was allocated
    Eval(EvalError),

    /// Expression text is longer than a watchpoint keeps
    ExpressionTooLong { len: usize, max: usize },

    /// Every slot is in use
    PoolExhausted { capacity: usize },

    /// No active watchpoint has this number
    NotFound { id: usize },
}

impl fmt::Display for WatchpointError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WatchpointError::Eval(e) => write!(f, "{}", e),
            WatchpointError::ExpressionTooLong { len, max } => {
                write!(f, "Expression is {} bytes long, at most {} allowed", len, max)
            }
            WatchpointError::PoolExhausted { capacity } => {
                write!(f, "No free watchpoints left (all {} in use)", capacity)
            }
            WatchpointError::NotFound { id } => {
                write!(f, "Watchpoint {} not found", id)
            }
        }
    }
}

impl std::error::Error for WatchpointError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WatchpointError::Eval(e) => Some(e),
            _ => None,
        }
    }
}

impl From<EvalError> for WatchpointError {
    fn from(e: EvalError) -> Self {
        WatchpointError::Eval(e)
    }
}
