//! Escape sequence support detection.
//!
//! Whether escape sequences are enabled by default is decided once per
//! process:
//!
//! 1. `FORCE_ESCAPE_SEQUENCES` (case-insensitive, surrounding whitespace
//!    ignored) forces the answer: `1`, `true`, `on`, `yes`, `enable`, `y`
//!    enable; `0`, `false`, `off`, `no`, `disable`, `n` disable.
//! 2. Otherwise escape sequences are enabled when standard output is a
//!    terminal and `TERM` is not `dumb`.
//!
//! The environment and the terminal are reached through [`EnvReader`] and
//! [`TerminalProbe`] so the rule can be tested with the mock implementations.

use once_cell::sync::Lazy;
use tracing::debug;

/// Environment variable that overrides terminal detection.
pub const FORCE_ESCAPE_SEQUENCES_ENV: &str = "FORCE_ESCAPE_SEQUENCES";

/// Abstraction over environment variables.
pub trait EnvReader: Send + Sync {
    /// Get an environment variable value.
    fn var(&self, name: &str) -> Option<String>;
}

/// Abstraction over the standard output terminal.
pub trait TerminalProbe: Send + Sync {
    /// Returns `true` if standard output is an interactive terminal.
    fn is_terminal(&self) -> bool;
}

// === Real implementations ===

/// Real environment variable reader.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealEnv;

impl EnvReader for RealEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Real terminal probe for standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealTerminal;

impl TerminalProbe for RealTerminal {
    fn is_terminal(&self) -> bool {
        console::Term::stdout().is_term()
    }
}

// === Mock implementations for testing ===

/// Mock environment variable reader for testing.
#[derive(Debug, Clone, Default)]
pub struct MockEnv {
    vars: std::collections::HashMap<String, String>,
}

impl MockEnv {
    /// Create an empty mock environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an environment variable.
    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl EnvReader for MockEnv {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

/// Mock terminal probe with a fixed answer.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockTerminal {
    is_terminal: bool,
}

impl MockTerminal {
    /// A probe reporting an interactive terminal.
    pub fn terminal() -> Self {
        Self { is_terminal: true }
    }

    /// A probe reporting redirected output.
    pub fn redirected() -> Self {
        Self { is_terminal: false }
    }
}

impl TerminalProbe for MockTerminal {
    fn is_terminal(&self) -> bool {
        self.is_terminal
    }
}

/// Interprets a `FORCE_ESCAPE_SEQUENCES` value; `None` means auto-detect.
pub fn parse_force(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "on" | "yes" | "enable" | "y" => Some(true),
        "0" | "false" | "off" | "no" | "disable" | "n" => Some(false),
        _ => None,
    }
}

/// Applies the detection rule to the given environment and terminal.
pub fn detect_escape_sequences(env: &dyn EnvReader, terminal: &dyn TerminalProbe) -> bool {
    if let Some(forced) = env
        .var(FORCE_ESCAPE_SEQUENCES_ENV)
        .as_deref()
        .and_then(parse_force)
    {
        return forced;
    }

    env.var("TERM").as_deref() != Some("dumb") && terminal.is_terminal()
}

/// Returns `true` if the current environment supports escape sequences.
///
/// Reads the environment every time it is called.
pub fn are_escape_sequences_supported() -> bool {
    detect_escape_sequences(&RealEnv, &RealTerminal)
}

static DEFAULT_ESCAPE_SEQUENCES: Lazy<bool> = Lazy::new(|| {
    let enabled = are_escape_sequences_supported();
    debug!(enabled, "escape sequences detected");
    enabled
});

/// The process-wide default captured by every new formatter.
pub(crate) fn default_escape_sequences() -> bool {
    *DEFAULT_ESCAPE_SEQUENCES
}
