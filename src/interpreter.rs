use crate::builtin::Builtins;
use crate::command::{CommandFactory, ExitCode, Streams};
use crate::error::{STATUS_NOT_FOUND, ShellError, status_of};
use crate::expand::expand_segment;
use crate::external::PathLookup;
use crate::input::InputReader;
use crate::parser::split_into_segments;
use crate::session::Session;
use std::fmt::Display;
use std::io::Write;

/// A minimal shell-like interpreter that can execute built-in and external commands.
///
/// The interpreter owns a [`Session`] and a list of [`CommandFactory`] objects
/// that are queried in order to create commands by name: builtins first, then
/// PATH lookup (see [`Interpreter::from_session`]).
///
/// Example
/// ```
/// use hsh::{Environment, Interpreter, Session, SessionConfig};
/// let env = Environment::from_process();
/// let mut sh = Interpreter::from_session(Session::new(SessionConfig::default(), env));
/// sh.run_line("setenv GREETING hello && unsetenv GREETING");
/// assert_eq!(sh.session().last_status, 0);
/// ```
pub struct Interpreter {
    session: Session,
    commands: Vec<Box<dyn CommandFactory>>,
    io: Streams,
}

impl Interpreter {
    /// Create an interpreter with a custom set of command factories and streams.
    pub fn new(session: Session, commands: Vec<Box<dyn CommandFactory>>, io: Streams) -> Self {
        Self {
            session,
            commands,
            io,
        }
    }

    /// Builtins and PATH lookup, writing to the process's stdout and stderr.
    pub fn from_session(session: Session) -> Self {
        Self::new(session, default_commands(), Streams::inherited())
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Run a single command invocation by name with arguments.
    ///
    /// Returns the command's exit status. Failures are reported on the error
    /// stream and turned into a status.
    pub fn run(&mut self, name: &str, args: &[&str]) -> ExitCode {
        let created = self
            .commands
            .iter()
            .find_map(|factory| factory.try_create(&self.session, name, args));
        let Some(cmd) = created else {
            self.report(name, ShellError::CommandNotFound);
            return STATUS_NOT_FOUND;
        };
        match cmd.execute(&mut self.io, &mut self.session) {
            Ok(code) => code,
            Err(e) => {
                let status = status_of(&e);
                self.report(name, e);
                status
            }
        }
    }

    /// Expands, tokenizes and runs one segment, recording its status.
    ///
    /// A segment without words runs nothing and returns `None`.
    pub fn run_segment(&mut self, text: &str) -> Option<ExitCode> {
        let argv = expand_segment(text, &self.session);
        let (name, rest) = argv.split_first()?;
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();
        let status = self.run(name, &args);
        self.session.last_status = status;
        Some(status)
    }

    /// Runs every segment of a line whose gate allows it.
    pub fn run_line(&mut self, line: &str) {
        for segment in split_into_segments(line) {
            if self.session.exit_requested().is_some() {
                break;
            }
            if !segment.operator.permits(self.session.last_status) {
                log::debug!(
                    "skipping {:?} segment after status {}",
                    segment.operator,
                    self.session.last_status
                );
                continue;
            }
            self.run_segment(segment.text);
        }
    }

    /// Reads and runs lines until `exit` or end of input.
    pub fn repl(&mut self, input: &mut InputReader) {
        input.seed_recall(self.session.history.iter().map(|(_, line)| line));
        while self.session.exit_requested().is_none() {
            let line = match input.read_line() {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    log::error!("{e}");
                    break;
                }
            };
            self.session.line_count += 1;
            let entry = line.trim();
            if !entry.is_empty() {
                self.session.history.push(entry);
            }
            self.run_line(&line);
        }
    }

    /// Ends the session: writes the history file and returns the status the
    /// process should exit with.
    ///
    /// Without an explicit `exit`, an interactive session ends with 0 and a
    /// batch session with the status of its last command.
    pub fn finish(mut self) -> ExitCode {
        let _ = self.io.out.flush();
        let _ = self.io.err.flush();
        if let Err(e) = self.session.history.save() {
            log::warn!("{e}");
        }
        let fallback = if self.session.interactive {
            0
        } else {
            self.session.last_status
        };
        self.session.exit_requested().unwrap_or(fallback)
    }

    fn report(&mut self, command: &str, message: impl Display) {
        let line = self.session.diagnostic(command, message);
        if let Err(e) = writeln!(self.io.err, "{line}") {
            log::warn!("cannot write diagnostic: {e}");
        }
    }
}

/// Builtins first, then commands found through PATH.
pub fn default_commands() -> Vec<Box<dyn CommandFactory>> {
    vec![Box::new(Builtins), Box::new(PathLookup)]
}
