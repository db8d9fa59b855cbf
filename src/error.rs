use crate::command::ExitCode;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Status reported when a command cannot be resolved.
pub const STATUS_NOT_FOUND: ExitCode = 127;
/// Status reported when a resolved command cannot be executed.
pub const STATUS_EXEC_FAILED: ExitCode = 126;

/// Recoverable failures surfaced while running a session.
///
/// Every variant is reported as `<shell>: <line>: <command>: <message>` and
/// mapped to a status with [`ShellError::status`].
#[derive(Debug, Error)]
pub enum ShellError {
    /// Neither a builtin nor anything on PATH matched.
    #[error("not found")]
    CommandNotFound,

    /// The program was found but could not be started.
    #[error("{0}")]
    Exec(#[source] io::Error),

    /// A builtin rejected its arguments and left the session unchanged.
    #[error("{message}")]
    BuiltinArgument { status: ExitCode, message: String },

    #[error("history file {}: {source}", .path.display())]
    HistoryIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("input: {0}")]
    Input(#[from] rustyline::error::ReadlineError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ShellError {
    /// Shorthand for [`ShellError::BuiltinArgument`].
    pub fn usage(status: ExitCode, message: impl Into<String>) -> Self {
        Self::BuiltinArgument {
            status,
            message: message.into(),
        }
    }

    /// Exit status a segment ends with when it fails with this error.
    pub fn status(&self) -> ExitCode {
        match self {
            Self::CommandNotFound => STATUS_NOT_FOUND,
            Self::Exec(e) if e.kind() == io::ErrorKind::NotFound => STATUS_NOT_FOUND,
            Self::Exec(_) => STATUS_EXEC_FAILED,
            Self::BuiltinArgument { status, .. } => *status,
            Self::HistoryIo { .. } | Self::Input(_) | Self::Io(_) => 1,
        }
    }
}

/// Status for an arbitrary command error: the carried [`ShellError`] status, or 1.
pub fn status_of(err: &anyhow::Error) -> ExitCode {
    err.downcast_ref::<ShellError>()
        .map_or(1, ShellError::status)
}
