//! # Introduction
//!
//! sdb is the inspection half of an emulator debugger. It evaluates
//! expressions over the emulated machine's registers and physical memory,
//! and keeps a fixed pool of watchpoints over such expressions.
//!
//! ## Evaluation pipeline
//!
//! ```text
//! Text → Lexer → Syntax check → Normalization → Evaluator → i32
//! ```
//!
//! 1. [`expr`]: tokenizes the text, rejects malformed token sequences,
//!    resolves `$reg` and hex literals to decimal, and evaluates the token
//!    range by splitting at the main operator.
//! 2. [`machine`]: the register file and sparse physical memory the
//!    evaluator reads through [`machine::RegisterResolver`] and
//!    [`machine::MemoryReader`].
//! 3. [`watchpoint`]: fixed-capacity arena with a free queue and an active
//!    list threaded through it.
//! 4. [`monitor`]: the [`monitor::Sdb`] session and its command table
//!    (`help`, `q`, `p`, `w`, `d`, `info w`, `x`).
//! 5. [`ui`]: ratatui-based TUI; not part of the stable library API.
//!
//! ## Expression language
//!
//! Decimal and `0x` hex literals, `$name` registers, `+ - * /`, `== != <=`,
//! `&& ||`, `!`, unary `-`, `*` dereference of a 4-byte word, and
//! parentheses. All arithmetic is 32-bit wrapping.

pub mod expr;
pub mod machine;
pub mod monitor;
pub mod ui;
pub mod watchpoint;
