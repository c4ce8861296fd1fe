//! Line-oriented console messages.
//!
//! Every notice the fixer prints goes through a [`ConsoleLog`], which echoes
//! it to stdout and keeps a copy so callers (and tests) can inspect what was
//! reported for each file.
//!
//! Diagnostics (headers read, absent columns, row counts) go through
//! `tracing` instead and are written to stderr; see [`init_tracing`].

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, EnvFilter};

/// Default diagnostics filter when `RUST_LOG` is not set
const DEFAULT_FILTER: &str = "warn";

/// Install the stderr diagnostics subscriber.
///
/// `RUST_LOG` overrides the level, e.g. `RUST_LOG=csvfix=debug`. Calling
/// this more than once is harmless.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}

/// Log level for console display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A single console line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Log level
    pub level: LogLevel,
    /// Log message
    pub message: String,
    /// Optional indentation level (for detail lines)
    #[serde(default)]
    pub indent: u8,
}

impl LogEntry {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Info, message: message.into(), indent: 0 }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Success, message: message.into(), indent: 0 }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Warning, message: message.into(), indent: 0 }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Error, message: message.into(), indent: 0 }
    }

    pub fn with_indent(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }

    /// Render the entry as it appears on the console
    pub fn render(&self) -> String {
        let prefix = match self.level {
            LogLevel::Info => "",
            LogLevel::Success => "[OK] ",
            LogLevel::Warning => "⚠ ",
            LogLevel::Error => "❌ ",
        };
        let indent = "  ".repeat(self.indent as usize);
        format!("{}{}{}", indent, prefix, self.message)
    }
}

/// Console sink that records what it prints
#[derive(Debug, Default)]
pub struct ConsoleLog {
    entries: Vec<LogEntry>,
    echo: bool,
}

impl ConsoleLog {
    /// A log that prints entries to stdout (errors to stderr)
    pub fn stdout() -> Self {
        Self { entries: Vec::new(), echo: true }
    }

    /// A silent log, entries are only recorded
    pub fn captured() -> Self {
        Self { entries: Vec::new(), echo: false }
    }

    pub fn log(&mut self, entry: LogEntry) {
        if self.echo {
            match entry.level {
                LogLevel::Error => eprintln!("{}", entry.render()),
                _ => println!("{}", entry.render()),
            }
        }
        self.entries.push(entry);
    }

    pub fn info(&mut self, msg: impl Into<String>) {
        self.log(LogEntry::info(msg));
    }

    pub fn success(&mut self, msg: impl Into<String>) {
        self.log(LogEntry::success(msg));
    }

    pub fn warning(&mut self, msg: impl Into<String>) {
        self.log(LogEntry::warning(msg));
    }

    pub fn error(&mut self, msg: impl Into<String>) {
        self.log(LogEntry::error(msg));
    }

    pub fn info_indent(&mut self, msg: impl Into<String>, indent: u8) {
        self.log(LogEntry::info(msg).with_indent(indent));
    }

    /// Everything logged so far, in order
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Entries at the given level
    pub fn at_level(&self, level: LogLevel) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().filter(move |e| e.level == level)
    }

    /// Whether any logged message contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.entries.iter().any(|e| e.message.contains(needle))
    }
}
