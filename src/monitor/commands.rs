//! Monitor command table
//!
//! Every command is one [`Command`] row: a name, a one-line description
//! shown by `help`, a usage string, and the handler that runs it. A line is
//! dispatched on its first whitespace-separated word; the rest of the line,
//! trimmed, is passed to the handler as its argument.

use super::errors::CommandError;
use super::Sdb;
use crate::watchpoint::{WatchpointError, WatchpointId};

/// Largest word count `x` will print in one go
pub const MAX_SCAN_WORDS: usize = 4096;

/// Words per line in `x` output
const SCAN_WORDS_PER_LINE: usize = 4;

/// Result of one command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    /// Text to show the user, one entry per line
    pub lines: Vec<String>,

    /// The user asked to leave
    pub quit: bool,
}

impl Outcome {
    pub fn empty() -> Self {
        Outcome::default()
    }

    pub fn line(text: impl Into<String>) -> Self {
        Outcome {
            lines: vec![text.into()],
            quit: false,
        }
    }

    pub fn lines(lines: Vec<String>) -> Self {
        Outcome { lines, quit: false }
    }

    pub fn quit() -> Self {
        Outcome {
            lines: Vec::new(),
            quit: true,
        }
    }
}

type Handler = fn(&mut Sdb, Option<&str>) -> Result<Outcome, CommandError>;

pub struct Command {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    handler: Handler,
}

impl Command {
    pub fn run(&self, sdb: &mut Sdb, arg: Option<&str>) -> Result<Outcome, CommandError> {
        (self.handler)(sdb, arg)
    }
}

pub static COMMANDS: &[Command] = &[
    Command {
        name: "help",
        description: "Display information about all supported commands",
        usage: "help [COMMAND]",
        handler: cmd_help,
    },
    Command {
        name: "q",
        description: "Exit the debugger",
        usage: "q",
        handler: cmd_quit,
    },
    Command {
        name: "p",
        description: "Evaluate an expression and print its value",
        usage: "p EXPR",
        handler: cmd_print,
    },
    Command {
        name: "w",
        description: "Set a watchpoint on an expression",
        usage: "w EXPR",
        handler: cmd_watch,
    },
    Command {
        name: "d",
        description: "Delete watchpoint number N",
        usage: "d N",
        handler: cmd_delete,
    },
    Command {
        name: "info",
        description: "List watchpoints ('info w')",
        usage: "info w",
        handler: cmd_info,
    },
    Command {
        name: "x",
        description: "Print N 4-byte words of memory starting at EXPR",
        usage: "x N EXPR",
        handler: cmd_scan,
    },
];

/// Look up a command by exact name
pub fn find(name: &str) -> Option<&'static Command> {
    COMMANDS.iter().find(|cmd| cmd.name == name)
}

/// Split a line into its command word and trimmed argument
pub fn split_line(line: &str) -> Option<(&str, Option<&str>)> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match line.split_once(char::is_whitespace) {
        Some((name, rest)) => {
            let rest = rest.trim();
            Some((name, (!rest.is_empty()).then_some(rest)))
        }
        None => Some((line, None)),
    }
}

/// Render a value the way `p` and the watchpoint listing show it
pub fn format_value(value: i32) -> String {
    format!("{} (0x{:08x})", value, value as u32)
}

fn require<'a>(command: &'static str, arg: Option<&'a str>) -> Result<&'a str, CommandError> {
    let usage = find(command).map_or("", |cmd| cmd.usage);
    arg.ok_or(CommandError::MissingArgument { command, usage })
}

fn cmd_help(_sdb: &mut Sdb, arg: Option<&str>) -> Result<Outcome, CommandError> {
    match arg {
        None => Ok(Outcome::lines(
            COMMANDS
                .iter()
                .map(|cmd| format!("{:<6} - {}", cmd.name, cmd.description))
                .collect(),
        )),
        Some(name) => match find(name) {
            Some(cmd) => Ok(Outcome::lines(vec![
                format!("{} - {}", cmd.name, cmd.description),
                format!("Usage: {}", cmd.usage),
            ])),
            None => Err(CommandError::UnknownCommand(name.to_string())),
        },
    }
}

fn cmd_quit(_sdb: &mut Sdb, _arg: Option<&str>) -> Result<Outcome, CommandError> {
    Ok(Outcome::quit())
}

fn cmd_print(sdb: &mut Sdb, arg: Option<&str>) -> Result<Outcome, CommandError> {
    let expr = require("p", arg)?;
    let value = sdb.evaluate(expr)?;
    Ok(Outcome::line(format_value(value)))
}

fn cmd_watch(sdb: &mut Sdb, arg: Option<&str>) -> Result<Outcome, CommandError> {
    let expr = require("w", arg)?;
    let id = sdb.create_watchpoint(expr)?;
    let Some(wp) = sdb.watchpoint(id) else {
        return Err(WatchpointError::NotFound { id }.into());
    };
    Ok(Outcome::line(format!(
        "Watchpoint {}: {} = {}",
        wp.id(),
        wp.expression(),
        format_value(wp.old_value())
    )))
}

fn cmd_delete(sdb: &mut Sdb, arg: Option<&str>) -> Result<Outcome, CommandError> {
    let text = require("d", arg)?;
    let id: WatchpointId = text.parse().map_err(|_| CommandError::InvalidArgument {
        command: "d",
        message: format!("'{}' is not a watchpoint number", text),
    })?;
    sdb.delete_watchpoint(id)?;
    Ok(Outcome::line(format!("Deleted watchpoint {}", id)))
}

fn cmd_info(sdb: &mut Sdb, arg: Option<&str>) -> Result<Outcome, CommandError> {
    match require("info", arg)? {
        "w" => {
            let watchpoints = sdb.watchpoints();
            if watchpoints.is_empty() {
                return Ok(Outcome::line("No watchpoints"));
            }
            let mut lines = vec![format!(
                "{:<4} {:<24} {:<24} {}",
                "Num", "Expression", "Old", "New"
            )];
            lines.extend(watchpoints.iter().map(|wp| {
                format!(
                    "{:<4} {:<24} {:<24} {}",
                    wp.id(),
                    wp.expression(),
                    format_value(wp.old_value()),
                    format_value(wp.new_value())
                )
            }));
            Ok(Outcome::lines(lines))
        }
        "r" => Err(CommandError::InvalidArgument {
            command: "info",
            message: "register listing is not available here".to_string(),
        }),
        other => Err(CommandError::InvalidArgument {
            command: "info",
            message: format!("unknown subcommand '{}', only 'w' is supported", other),
        }),
    }
}

fn cmd_scan(sdb: &mut Sdb, arg: Option<&str>) -> Result<Outcome, CommandError> {
    let text = require("x", arg)?;
    let (count, expr) = match text.split_once(char::is_whitespace) {
        Some((count, expr)) => (count, expr.trim()),
        None => {
            return Err(CommandError::MissingArgument {
                command: "x",
                usage: "x N EXPR",
            })
        }
    };

    let count: usize = count.parse().map_err(|_| CommandError::InvalidArgument {
        command: "x",
        message: format!("'{}' is not a word count", count),
    })?;
    if count > MAX_SCAN_WORDS {
        return Err(CommandError::InvalidArgument {
            command: "x",
            message: format!("at most {} words can be printed at once", MAX_SCAN_WORDS),
        });
    }

    let words = sdb.scan_memory(count, expr)?;
    let lines = words
        .chunks(SCAN_WORDS_PER_LINE)
        .map(|chunk| {
            let values: Vec<String> = chunk.iter().map(|(_, w)| format!("0x{:08x}", w)).collect();
            format!("0x{:08x}: {}", chunk[0].0, values.join(" "))
        })
        .collect();
    Ok(Outcome::lines(lines))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_line() {
        assert_eq!(split_line(""), None);
        assert_eq!(split_line("   "), None);
        assert_eq!(split_line("q"), Some(("q", None)));
        assert_eq!(split_line("  p   1 + 2  "), Some(("p", Some("1 + 2"))));
        assert_eq!(split_line("x\t4 $sp"), Some(("x", Some("4 $sp"))));
    }

    #[test]
    fn test_command_names_are_unique() {
        for (i, a) in COMMANDS.iter().enumerate() {
            for b in &COMMANDS[i + 1..] {
                assert_ne!(a.name, b.name);
            }
        }
    }

    #[test]
    fn test_find() {
        assert_eq!(find("p").map(|c| c.usage), Some("p EXPR"));
        assert!(find("P").is_none());
        assert!(find("si").is_none());
    }

    #[test]
    fn test_require() {
        assert_eq!(require("p", Some("1 + 2")), Ok("1 + 2"));
        assert_eq!(
            require("x", None),
            Err(CommandError::MissingArgument {
                command: "x",
                usage: "x N EXPR"
            })
        );
    }

    #[test]
    fn test_watch_echoes_stored_expression() {
        let mut sdb = Sdb::default();
        let out = cmd_watch(&mut sdb, Some("$sp + 4")).unwrap();
        assert_eq!(out.lines, vec!["Watchpoint 0: $sp + 4 = 4 (0x00000004)".to_string()]);

        let listing = cmd_info(&mut sdb, Some("w")).unwrap();
        assert!(listing.lines[1].contains("$sp + 4"));
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(42), "42 (0x0000002a)");
        assert_eq!(format_value(-1), "-1 (0xffffffff)");
    }
}
