use crate::session::Session;
use anyhow::Result;
use std::io::{self, Write};
use std::process::Stdio;

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
/// This mirrors the convention used by POSIX shells and many command-line tools.
pub type ExitCode = i32;

/// Abstraction over a writable output stream that external processes can also
/// write to.
///
/// Streams backed by a real file descriptor hand out a [`Stdio`] for the child;
/// in-memory streams return `None`, and the child's output is captured and
/// copied into them instead.
pub trait Stdout: Write {
    /// A [`Stdio`] handle for `std::process::Command`, if the stream has one.
    fn stdio(&self) -> Option<Stdio>;
}

impl Stdout for io::Stdout {
    fn stdio(&self) -> Option<Stdio> {
        Some(Stdio::inherit())
    }
}

impl Stdout for io::Stderr {
    fn stdio(&self) -> Option<Stdio> {
        Some(Stdio::inherit())
    }
}

/// Output and error streams commands write to.
pub struct Streams {
    pub out: Box<dyn Stdout>,
    pub err: Box<dyn Stdout>,
}

impl Streams {
    pub fn new(out: Box<dyn Stdout>, err: Box<dyn Stdout>) -> Self {
        Self { out, err }
    }

    /// The process's own stdout and stderr.
    pub fn inherited() -> Self {
        Self::new(Box::new(io::stdout()), Box::new(io::stderr()))
    }
}

/// Object-safe trait for any command that can be executed by the shell.
///
/// This is implemented by built-ins via a blanket impl and by external commands.
pub trait ExecutableCommand {
    /// Executes the command and returns its exit status.
    fn execute(self: Box<Self>, io: &mut Streams, session: &mut Session) -> Result<ExitCode>;
}

/// Factory that tries to create a command from a name and its arguments.
///
/// Returns `None` when the factory doesn't recognize the `name`.
/// Implementations can use the session to resolve executables (e.g., using PATH).
pub trait CommandFactory {
    /// Attempt to create a command instance for the provided name and arguments.
    fn try_create(
        &self,
        session: &Session,
        name: &str,
        args: &[&str],
    ) -> Option<Box<dyn ExecutableCommand>>;
}
