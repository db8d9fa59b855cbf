use crate::command::{CommandFactory, ExecutableCommand, ExitCode, Streams};
use crate::error::ShellError;
use crate::session::Session;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

/// Command that is not a builtin.
pub struct ExternalCommand {
    /// Name as typed, passed to the program as `argv[0]`.
    name: String,
    path: PathBuf,
    args: Vec<String>,
}

impl ExternalCommand {
    pub fn new(name: String, path: PathBuf, args: Vec<String>) -> Self {
        Self { name, path, args }
    }
}

/// Factory resolving command names through PATH or as literal paths.
#[derive(Debug, Default)]
pub struct PathLookup;

impl CommandFactory for PathLookup {
    fn try_create(
        &self,
        session: &Session,
        name: &str,
        args: &[&str],
    ) -> Option<Box<dyn ExecutableCommand>> {
        let path = find_command_path(
            session.env.get_var("PATH"),
            &session.env.current_dir,
            name,
        )?;
        log::debug!("resolved {name} to {}", path.display());
        Some(Box::new(ExternalCommand::new(
            name.to_string(),
            path,
            args.iter().map(|x| x.to_string()).collect(),
        )))
    }
}

impl ExecutableCommand for ExternalCommand {
    fn execute(self: Box<Self>, io: &mut Streams, session: &mut Session) -> Result<ExitCode> {
        // keep builtin output ahead of the child's
        io.out.flush()?;
        io.err.flush()?;

        let out = io.out.stdio();
        let err = io.err.stdio();
        let captured = out.is_none() || err.is_none();

        let mut cmd = std::process::Command::new(&self.path);
        set_arg0(&mut cmd, &self.name);
        cmd.args(&self.args)
            .env_clear()
            .envs(session.env.snapshot())
            .current_dir(&session.env.current_dir)
            .stdin(Stdio::inherit())
            .stdout(out.unwrap_or_else(Stdio::piped))
            .stderr(err.unwrap_or_else(Stdio::piped));

        log::debug!("spawning {} with {} args", self.path.display(), self.args.len());
        let child = cmd.spawn().map_err(ShellError::Exec)?;

        let exit_status = if captured {
            let output = child
                .wait_with_output()
                .with_context(|| format!("waiting for {}", self.name))?;
            io.out.write_all(&output.stdout)?;
            io.err.write_all(&output.stderr)?;
            output.status
        } else {
            let mut child = child;
            child
                .wait()
                .with_context(|| format!("waiting for {}", self.name))?
        };
        match exit_status.code() {
            Some(x) => Ok(x),
            None => Ok(terminated_by_signal(exit_status)),
        }
    }
}

#[cfg(unix)]
fn set_arg0(cmd: &mut std::process::Command, name: &str) {
    use std::os::unix::process::CommandExt;
    cmd.arg0(name);
}

#[cfg(not(unix))]
fn set_arg0(_cmd: &mut std::process::Command, _name: &str) {}

#[cfg(unix)]
fn terminated_by_signal(exit_status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = ExitStatusExt::signal(&exit_status) {
        128 + signal
    } else if ExitStatusExt::core_dumped(&exit_status) {
        255
    } else {
        -1
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_exit_status: ExitStatus) -> i32 {
    -1
}

/// Resolve a command path the way a typical shell would.
///
/// Behavior:
/// - A name containing `/` is taken literally; relative names are anchored at
///   `current_dir`. It resolves if it names an existing file. Whether it is
///   executable is left to the spawn.
/// - Otherwise every `:`-separated entry of `search_paths` is tried in order
///   (an empty entry means `current_dir`) and the first executable regular
///   file wins.
/// - An empty name, an unset PATH or no match resolves to `None`.
pub fn find_command_path(
    search_paths: Option<&str>,
    current_dir: &Path,
    name: &str,
) -> Option<PathBuf> {
    if name.is_empty() {
        return None;
    }
    if name.contains('/') {
        let path = current_dir.join(name);
        return path.is_file().then_some(path);
    }
    search_paths?
        .split(':')
        .map(|dir| {
            if dir.is_empty() {
                current_dir.join(name)
            } else {
                current_dir.join(dir).join(name)
            }
        })
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    match path.metadata() {
        Ok(meta) => meta.is_file() && meta.permissions().mode() & 0o111 != 0,
        Err(_) => false,
    }
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str, mode: u32) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, "#!/bin/sh\nexit 0\n").expect("write file");
        fs::set_permissions(&path, fs::Permissions::from_mode(mode)).expect("chmod");
        path
    }

    fn dirs(n: usize) -> Vec<TempDir> {
        (0..n).map(|_| tempfile::tempdir().expect("tempdir")).collect()
    }

    #[test]
    fn absolute_existing_true() {
        let res = find_command_path(Some("/bin"), Path::new("/"), "/bin/sh");
        assert_eq!(res.as_deref(), Some(Path::new("/bin/sh")));
    }

    #[test]
    fn absolute_nonexisting() {
        let res = find_command_path(Some("/bin"), Path::new("/"), "/bin/nonexisting");
        assert!(res.is_none(), "Expected not to find /bin/nonexisting via absolute path");
    }

    #[test]
    fn first_path_entry_wins() {
        let d = dirs(2);
        let first = touch(d[0].path(), "cmd", 0o755);
        touch(d[1].path(), "cmd", 0o755);
        let path = format!("{}:{}", d[0].path().display(), d[1].path().display());
        for _ in 0..3 {
            let found = find_command_path(Some(path.as_str()), Path::new("/"), "cmd");
            assert_eq!(found.as_deref(), Some(first.as_path()));
        }
    }

    #[test]
    fn non_executable_candidates_are_skipped() {
        let d = dirs(2);
        touch(d[0].path(), "cmd", 0o644);
        let second = touch(d[1].path(), "cmd", 0o700);
        let path = format!("{}:{}", d[0].path().display(), d[1].path().display());
        let found = find_command_path(Some(path.as_str()), Path::new("/"), "cmd");
        assert_eq!(found, Some(second));
    }

    #[test]
    fn directories_are_not_commands() {
        let d = dirs(1);
        fs::create_dir(d[0].path().join("sub")).unwrap();
        let path = d[0].path().display().to_string();
        assert!(find_command_path(Some(path.as_str()), Path::new("/"), "sub").is_none());
    }

    #[test]
    fn single_component_not_found_in_path() {
        let res = find_command_path(Some("/bin"), Path::new("/"), "nonexisting");
        assert!(res.is_none(), "Expected not to find 'nonexisting' in PATH");
    }

    #[test]
    fn unset_path_fails() {
        assert!(find_command_path(None, Path::new("/"), "sh").is_none());
    }

    #[test]
    fn empty_entry_means_current_dir() {
        let d = dirs(1);
        let here = touch(d[0].path(), "local", 0o755);
        let found = find_command_path(Some(":/nonexistent"), d[0].path(), "local");
        assert_eq!(found, Some(here));
    }

    #[test]
    fn relative_literal_is_anchored_at_current_dir() {
        let d = dirs(1);
        fs::create_dir(d[0].path().join("bin")).unwrap();
        // literal paths only need to exist
        let target = touch(&d[0].path().join("bin"), "tool", 0o644);
        let found = find_command_path(Some("/does/not/matter"), d[0].path(), "bin/tool");
        assert_eq!(found, Some(target.clone()));
        let dotted = find_command_path(None, &d[0].path().join("bin"), "./tool");
        assert!(dotted.is_some_and(|p| p.ends_with("tool")));
    }

    #[test]
    fn empty_path_is_none() {
        let res = find_command_path(Some("/bin"), Path::new("/"), "");
        assert!(res.is_none(), "Empty path should not resolve to anything");
    }
}
