// Limits for the expression pipeline

/// Capacity of a token buffer. Overflowing it is a configuration error.
pub const MAX_TOKENS: usize = 1000;

/// Longest literal or register name a token may carry, in bytes
pub const TOKEN_TEXT_MAX: usize = 31;

/// Width of a memory dereference, in bytes
pub const DEREF_WIDTH: usize = 4;
