use crate::alias::format_alias;
use crate::command::{CommandFactory, ExecutableCommand, ExitCode, Streams};
use crate::error::{ShellError, status_of};
use crate::session::Session;
use anyhow::Result;
use argh::{EarlyExit, FromArgs};
use std::fs;
use std::io::Write;

/// Built-in commands known to the shell at compile time.
///
/// Builtins are parsed using the [`argh`] crate (`FromArgs`) and executed directly
/// in-process without spawning a child process.
pub(crate) trait BuiltinCommand: Sized + FromArgs {
    /// Canonical name of the command, e.g. "exit" or "cd".
    const NAME: &'static str;

    /// When set, every argument is an operand, so values such as `-` or `-la`
    /// reach the command instead of being rejected as unknown flags.
    const POSITIONAL_ONLY: bool = false;

    /// Executes the command against the session.
    ///
    /// Return value should follow shell conventions: 0 for success, non-zero for error.
    /// An error is reported on the error stream and its status becomes the result.
    fn execute(self, io: &mut Streams, session: &mut Session) -> Result<ExitCode>;
}

impl<T: BuiltinCommand> ExecutableCommand for T {
    fn execute(self: Box<Self>, io: &mut Streams, session: &mut Session) -> Result<ExitCode> {
        match <T as BuiltinCommand>::execute(*self, io, session) {
            Ok(x) => Ok(x),
            Err(e) => {
                writeln!(io.err, "{}", session.diagnostic(T::NAME, &e))?;
                Ok(status_of(&e))
            }
        }
    }
}

struct InvalidArgs {
    output: String,
    is_error: bool,
}

impl ExecutableCommand for InvalidArgs {
    fn execute(self: Box<Self>, io: &mut Streams, _session: &mut Session) -> Result<ExitCode> {
        let stream = if self.is_error { &mut io.err } else { &mut io.out };
        writeln!(stream, "{}", self.output.trim_end())?;
        Ok(if self.is_error { 1 } else { 0 })
    }
}

/// One row of the builtin table.
struct Builtin {
    name: &'static str,
    create: fn(&[&str]) -> Box<dyn ExecutableCommand>,
    usage: fn() -> String,
}

const fn entry<T: BuiltinCommand + 'static>() -> Builtin {
    Builtin {
        name: T::NAME,
        create: create::<T>,
        usage: usage::<T>,
    }
}

fn create<T: BuiltinCommand + 'static>(args: &[&str]) -> Box<dyn ExecutableCommand> {
    let parsed = if T::POSITIONAL_ONLY {
        let mut operands = Vec::with_capacity(args.len() + 1);
        operands.push("--");
        operands.extend_from_slice(args);
        T::from_args(&[T::NAME], &operands)
    } else {
        T::from_args(&[T::NAME], args)
    };
    match parsed {
        Ok(cmd) => Box::new(cmd),
        Err(EarlyExit { output, status }) => Box::new(InvalidArgs {
            output,
            is_error: status.is_err(),
        }),
    }
}

fn usage<T: BuiltinCommand>() -> String {
    match T::from_args(&[T::NAME], &["--help"]) {
        Ok(_) => String::new(),
        Err(early) => early.output,
    }
}

/// Lookup order of the builtins. Names are matched exactly.
static BUILTINS: [Builtin; 8] = [
    entry::<Exit>(),
    entry::<Cd>(),
    entry::<Env>(),
    entry::<SetEnv>(),
    entry::<UnsetEnv>(),
    entry::<Help>(),
    entry::<ShowHistory>(),
    entry::<Alias>(),
];

/// Names of all builtins, in lookup order.
pub fn builtin_names() -> impl Iterator<Item = &'static str> {
    BUILTINS.iter().map(|b| b.name)
}

/// Factory for the builtin table. Consulted before any PATH lookup.
#[derive(Debug, Default)]
pub struct Builtins;

impl CommandFactory for Builtins {
    fn try_create(
        &self,
        _session: &Session,
        name: &str,
        args: &[&str],
    ) -> Option<Box<dyn ExecutableCommand>> {
        let builtin = BUILTINS.iter().find(|b| b.name == name)?;
        log::debug!("dispatching builtin {name}");
        Some((builtin.create)(args))
    }
}

/// Parses an `exit` operand: decimal digits with an optional leading `+`.
fn parse_status(arg: &str) -> Option<ExitCode> {
    let digits = arg.strip_prefix('+').unwrap_or(arg);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[derive(FromArgs)]
/// Exit the shell. Without a status, the status of the last command is used.
pub struct Exit {
    #[argh(positional)]
    /// exit status, a non-negative integer
    pub code: Option<String>,
}

impl BuiltinCommand for Exit {
    const NAME: &'static str = "exit";
    const POSITIONAL_ONLY: bool = true;

    fn execute(self, _io: &mut Streams, session: &mut Session) -> Result<ExitCode> {
        let code = match &self.code {
            None => session.last_status,
            Some(arg) => parse_status(arg)
                .ok_or_else(|| ShellError::usage(2, format!("Illegal number: {arg}")))?,
        };
        session.request_exit(code);
        Ok(code)
    }
}

#[derive(FromArgs)]
/// Change the current working directory.
/// If no target is provided, changes to the directory specified by the HOME environment variable.
pub struct Cd {
    #[argh(positional)]
    /// directory to switch to; `-` returns to the previous directory. Defaults to $HOME when omitted.
    pub target: Option<String>,
}

impl BuiltinCommand for Cd {
    const NAME: &'static str = "cd";
    const POSITIONAL_ONLY: bool = true;

    fn execute(self, io: &mut Streams, session: &mut Session) -> Result<ExitCode> {
        let previous = session.env.current_dir.clone();
        let mut announce = false;
        let target = match self.target.as_deref() {
            None | Some("") => match session.env.get_var("HOME") {
                Some(home) => home.to_string(),
                None => return Err(ShellError::usage(2, "HOME not set").into()),
            },
            Some("-") => match session.env.get_var("OLDPWD") {
                Some(old) => {
                    announce = true;
                    old.to_string()
                }
                None => {
                    writeln!(io.out, "{}", previous.display())?;
                    return Ok(0);
                }
            },
            Some(t) => t.to_string(),
        };

        let new_dir = previous.join(&target);
        let canonical = fs::canonicalize(&new_dir)
            .ok()
            .filter(|p| p.is_dir())
            .ok_or_else(|| ShellError::usage(2, format!("can't cd to {target}")))?;

        log::debug!("cd {} -> {}", previous.display(), canonical.display());
        session
            .env
            .set_var("OLDPWD", &previous.to_string_lossy());
        session.env.set_var("PWD", &canonical.to_string_lossy());
        session.env.current_dir = canonical;
        if announce {
            writeln!(io.out, "{}", session.env.current_dir.display())?;
        }
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Print the environment, one NAME=VALUE per line.
pub struct Env {}

impl BuiltinCommand for Env {
    const NAME: &'static str = "env";

    fn execute(self, io: &mut Streams, session: &mut Session) -> Result<ExitCode> {
        for entry in session.env.entries() {
            writeln!(io.out, "{entry}")?;
        }
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Set an environment variable, replacing any previous value.
pub struct SetEnv {
    #[argh(positional, greedy)]
    /// variable name followed by its value
    pub args: Vec<String>,
}

impl BuiltinCommand for SetEnv {
    const NAME: &'static str = "setenv";
    const POSITIONAL_ONLY: bool = true;

    fn execute(self, _io: &mut Streams, session: &mut Session) -> Result<ExitCode> {
        let [name, value] = self.args.as_slice() else {
            return Err(ShellError::usage(1, "Incorrect number of arguments").into());
        };
        if name.is_empty() || name.contains('=') {
            return Err(ShellError::usage(1, format!("invalid variable name: {name}")).into());
        }
        session.env.set_var(name, value);
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Remove variables from the environment.
pub struct UnsetEnv {
    #[argh(positional, greedy)]
    /// names of the variables to remove
    pub names: Vec<String>,
}

impl BuiltinCommand for UnsetEnv {
    const NAME: &'static str = "unsetenv";

    fn execute(self, _io: &mut Streams, session: &mut Session) -> Result<ExitCode> {
        if self.names.is_empty() {
            return Err(ShellError::usage(1, "Too few arguments.").into());
        }
        for name in &self.names {
            session.env.unset_var(name);
        }
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Describe the builtin commands.
pub struct Help {
    #[argh(positional)]
    /// builtin to describe in full
    pub topic: Option<String>,
}

impl BuiltinCommand for Help {
    const NAME: &'static str = "help";

    fn execute(self, io: &mut Streams, _session: &mut Session) -> Result<ExitCode> {
        match self.topic.as_deref() {
            None => {
                for builtin in &BUILTINS {
                    let text = (builtin.usage)();
                    writeln!(io.out, "{}", text.lines().next().unwrap_or(builtin.name))?;
                }
                Ok(0)
            }
            Some(topic) => {
                let builtin = BUILTINS
                    .iter()
                    .find(|b| b.name == topic)
                    .ok_or_else(|| ShellError::usage(1, format!("no help topics match `{topic}`")))?;
                writeln!(io.out, "{}", (builtin.usage)().trim_end())?;
                Ok(0)
            }
        }
    }
}

#[derive(FromArgs)]
/// List the command history with entry numbers.
pub struct ShowHistory {}

impl BuiltinCommand for ShowHistory {
    const NAME: &'static str = "history";

    fn execute(self, io: &mut Streams, session: &mut Session) -> Result<ExitCode> {
        for (number, line) in session.history.iter() {
            writeln!(io.out, "{number}: {line}")?;
        }
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Define or show aliases. Without operands, list every alias.
pub struct Alias {
    #[argh(positional, greedy)]
    /// definitions as name=value (name= removes the alias) or names to show
    pub args: Vec<String>,
}

/// Groups `alias` operands into `(name, Some(value))` definitions and
/// `(name, None)` queries.
///
/// Operands without `=` that follow a definition continue its value, so
/// `ll=ls -la` arrives as one definition. Matching outer quotes are removed.
fn group_alias_operands(args: &[String]) -> Vec<(String, Option<String>)> {
    let mut out: Vec<(String, Option<String>)> = Vec::new();
    for arg in args {
        if let Some((name, value)) = arg.split_once('=') {
            out.push((name.to_string(), Some(value.to_string())));
            continue;
        }
        match out.last_mut() {
            Some((_, Some(value))) => {
                value.push(' ');
                value.push_str(arg);
            }
            _ => out.push((arg.clone(), None)),
        }
    }
    for (_, value) in &mut out {
        if let Some(v) = value {
            *v = unquote(v).to_string();
        }
    }
    out
}

fn unquote(value: &str) -> &str {
    for quote in ['\'', '"'] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

impl BuiltinCommand for Alias {
    const NAME: &'static str = "alias";
    const POSITIONAL_ONLY: bool = true;

    fn execute(self, io: &mut Streams, session: &mut Session) -> Result<ExitCode> {
        if self.args.is_empty() {
            for (name, value) in session.aliases.iter() {
                writeln!(io.out, "{}", format_alias(name, value))?;
            }
            return Ok(0);
        }

        let mut status = 0;
        for (name, value) in group_alias_operands(&self.args) {
            match value {
                _ if name.is_empty() => {
                    writeln!(io.err, "{}", session.diagnostic(Self::NAME, "invalid alias name"))?;
                    status = 1;
                }
                Some(value) if value.is_empty() => {
                    session.aliases.unset(&name);
                }
                Some(value) => session.aliases.set(&name, &value),
                None => match session.aliases.get(&name) {
                    Some(value) => writeln!(io.out, "{}", format_alias(&name, value))?,
                    None => {
                        let message = format!("{name} not found");
                        writeln!(io.err, "{}", session.diagnostic(Self::NAME, message))?;
                        status = 1;
                    }
                },
            }
        }
        Ok(status)
    }
}
