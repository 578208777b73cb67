// sdb: expression evaluator and watchpoint monitor for an emulator debugger

use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;

use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::Level;

use sdb::monitor::{Sdb, SdbConfig};
use sdb::ui::App;
use sdb::watchpoint::DEFAULT_WATCHPOINTS;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// Raw image loaded at the start of physical memory
    #[arg(short, long)]
    image: Option<PathBuf>,

    /// Start of physical memory
    #[arg(long, value_name = "HEX", value_parser = parse_hex, default_value = "0x80000000")]
    pmem_base: u32,

    /// Size of physical memory in bytes
    #[arg(long, value_name = "HEX", value_parser = parse_hex, default_value = "0x8000000")]
    pmem_size: u32,

    /// Number of watchpoint slots
    #[arg(short, long, default_value_t = DEFAULT_WATCHPOINTS)]
    watchpoints: usize,

    /// Initial register value (repeatable)
    #[arg(short, long, value_name = "NAME=VALUE", value_parser = parse_register)]
    reg: Vec<(String, u32)>,

    /// Run commands without the TUI and print results to stdout
    #[arg(short, long)]
    batch: bool,

    /// Command to run at startup (repeatable)
    #[arg(short, long, value_name = "CMD")]
    exec: Vec<String>,

    /// One of `TRACE`, `DEBUG`, `INFO`, `WARN`, or `ERROR`
    #[arg(short, long, default_value_t = Level::INFO)]
    log_level: Level,

    /// Write logs to this file (the TUI otherwise logs nothing)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn parse_hex(s: &str) -> Result<u32, String> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u32::from_str_radix(digits, 16).map_err(|e| format!("invalid hex value `{s}`: {e}"))
}

fn parse_register(s: &str) -> Result<(String, u32), Box<dyn Error + Send + Sync + 'static>> {
    let pos = s
        .find('=')
        .ok_or_else(|| format!("invalid NAME=VALUE: no `=` found in `{s}`"))?;
    let value = &s[pos + 1..];
    let value = if value.starts_with("0x") || value.starts_with("0X") {
        parse_hex(value)?
    } else {
        // negative values wrap to their 32-bit pattern
        value
            .parse::<i32>()
            .map(|v| v as u32)
            .or_else(|_| value.parse::<u32>())
            .map_err(|_| format!("invalid register value `{value}`"))?
    };
    Ok((s[..pos].to_string(), value))
}

impl Args {
    fn config(&self) -> SdbConfig {
        SdbConfig {
            pmem_base: self.pmem_base,
            pmem_size: self.pmem_size,
            watchpoints: self.watchpoints,
            image: self.image.clone(),
            registers: self.reg.clone(),
        }
    }
}

fn init_logging(args: &Args) -> Result<(), Box<dyn Error>> {
    if let Some(path) = &args.log_file {
        let file = File::create(path).map_err(|e| format!("cant open log file: {e}"))?;
        tracing_subscriber::fmt()
            .with_max_level(args.log_level)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else if args.batch {
        tracing_subscriber::fmt()
            .with_max_level(args.log_level)
            .with_writer(io::stderr)
            .init();
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_logging(&args) {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    let result = if args.batch {
        run_batch(&args)
    } else {
        run_tui(&args)
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Run `--exec` commands, or stdin lines when none were given
fn run_batch(args: &Args) -> Result<ExitCode, Box<dyn Error>> {
    let mut sdb = Sdb::from_config(&args.config())?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut failed = false;

    let mut run = |line: &str, out: &mut dyn Write| -> io::Result<bool> {
        match sdb.execute(line) {
            Ok(outcome) => {
                for text in &outcome.lines {
                    writeln!(out, "{text}")?;
                }
                Ok(outcome.quit)
            }
            Err(e) => {
                eprintln!("error: {e}");
                failed = true;
                Ok(false)
            }
        }
    };

    if args.exec.is_empty() {
        for line in io::stdin().lock().lines() {
            if run(&line?, &mut out)? {
                break;
            }
        }
    } else {
        for line in &args.exec {
            if run(line, &mut out)? {
                break;
            }
        }
    }

    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn run_tui(args: &Args) -> Result<ExitCode, Box<dyn Error>> {
    let sdb = Sdb::from_config(&args.config())?;
    let mut app = App::new(sdb);
    for line in &args.exec {
        app.submit(line);
    }
    if app.should_quit {
        return Ok(ExitCode::SUCCESS);
    }

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res?;
    Ok(ExitCode::SUCCESS)
}
