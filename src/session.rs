use crate::alias::Aliases;
use crate::command::ExitCode;
use crate::env::Environment;
use crate::history::History;
use std::path::PathBuf;

/// Startup settings for a [`Session`].
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Name used as the prefix of diagnostics, normally `argv[0]`.
    pub name: String,
    /// Whether input comes from a terminal.
    pub interactive: bool,
    /// History file to seed from and write back to at shutdown.
    pub history_path: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            name: "hsh".to_string(),
            interactive: false,
            history_path: None,
        }
    }
}

/// Everything a running shell mutates between lines.
#[derive(Debug, Clone)]
pub struct Session {
    pub env: Environment,
    pub aliases: Aliases,
    pub history: History,
    /// Status of the most recently executed segment.
    pub last_status: ExitCode,
    /// Number of input lines read so far.
    pub line_count: usize,
    pub interactive: bool,
    pub name: String,
    exit_request: Option<ExitCode>,
}

impl Session {
    /// Create a session over `env`, seeding history from the configured file.
    ///
    /// An unreadable history file is logged and leaves the history empty.
    pub fn new(config: SessionConfig, env: Environment) -> Self {
        let history = match config.history_path {
            Some(path) => History::load(path.clone()).unwrap_or_else(|e| {
                log::warn!("{e}; continuing with empty history");
                History::new(Some(path))
            }),
            None => History::new(None),
        };
        Self {
            env,
            aliases: Aliases::new(),
            history,
            last_status: 0,
            line_count: 0,
            interactive: config.interactive,
            name: config.name,
            exit_request: None,
        }
    }

    /// Ask the session loop to stop with `code`.
    pub fn request_exit(&mut self, code: ExitCode) {
        self.exit_request = Some(code);
    }

    pub fn exit_requested(&self) -> Option<ExitCode> {
        self.exit_request
    }

    /// Format a diagnostic as `<shell>: <line>: <command>: <message>`.
    pub fn diagnostic(&self, command: &str, message: impl std::fmt::Display) -> String {
        format!("{}: {}: {}: {}", self.name, self.line_count, command, message)
    }
}
