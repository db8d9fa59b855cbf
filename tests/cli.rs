use pretty_assertions::assert_eq;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

const BIN: &str = env!("CARGO_BIN_EXE_hsh");

fn command(home: &Path) -> Command {
    let path = std::env::var("PATH").unwrap_or_else(|_| "/usr/bin:/bin".to_string());
    let mut cmd = Command::new(BIN);
    cmd.env_clear()
        .env("PATH", path)
        .env("HOME", home)
        .current_dir(home);
    cmd
}

fn feed(home: &Path, input: &str) -> Output {
    let mut child = command(home)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn shell");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(input.as_bytes())
        .expect("write input");
    child.wait_with_output().expect("wait shell")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn home() -> TempDir {
    tempfile::tempdir().expect("tempdir")
}

#[test]
fn batch_runs_chains() {
    let home = home();
    let out = feed(home.path(), "echo hi ; echo bye\nfalse && echo no\nfalse || echo yes\n");
    assert_eq!(stdout(&out), "hi\nbye\nyes\n");
    assert_eq!(out.status.code(), Some(0));
}

#[test]
fn exit_status_is_propagated() {
    let home = home();
    let out = feed(home.path(), "exit 7\necho unreachable\n");
    assert_eq!(stdout(&out), "");
    assert_eq!(out.status.code(), Some(7));
}

#[test]
fn end_of_input_exits_with_last_status() {
    let home = home();
    let out = feed(home.path(), "false\n");
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn unknown_command_reports_line_number() {
    let home = home();
    let out = feed(home.path(), "echo ok\nqwertyuiop\n");
    assert_eq!(stdout(&out), "ok\n");
    assert!(
        stderr(&out).ends_with(": 2: qwertyuiop: not found\n"),
        "unexpected stderr: {}",
        stderr(&out)
    );
    assert_eq!(out.status.code(), Some(127));
}

#[test]
fn alias_is_expanded() {
    let home = home();
    fs::write(home.path().join("marker"), "").unwrap();
    let out = feed(home.path(), "alias ll=ls -a\nll\n");
    assert!(stdout(&out).contains("marker"));
    assert_eq!(out.status.code(), Some(0));
}

#[test]
fn single_command_mode() {
    let home = home();
    let out = command(home.path())
        .args(["-c", "echo one && echo two # trailing"])
        .output()
        .expect("run shell");
    assert_eq!(stdout(&out), "one\ntwo\n");
    assert_eq!(out.status.code(), Some(0));
    // no history is written for -c
    assert!(!home.path().join(".simple_shell_history").exists());
}

#[test]
fn script_file_is_run() {
    let home = home();
    let script = home.path().join("script.sh");
    fs::write(&script, "# setup\nsetenv WHO world\necho hello $WHO\nexit 3\n").unwrap();
    let out = command(home.path()).arg(&script).output().expect("run shell");
    assert_eq!(stdout(&out), "hello world\n");
    assert_eq!(out.status.code(), Some(3));
}

#[test]
fn missing_script_is_127() {
    let home = home();
    let out = command(home.path())
        .arg("no_such_script")
        .output()
        .expect("run shell");
    assert_eq!(out.status.code(), Some(127));
    assert!(stderr(&out).ends_with(": 0: Can't open no_such_script\n"));
}

#[test]
fn history_is_written_and_reloaded() {
    let home = home();
    feed(home.path(), "echo first\n\nexit\n");
    let saved = fs::read_to_string(home.path().join(".simple_shell_history")).unwrap();
    assert_eq!(saved, "echo first\nexit\n");

    let out = feed(home.path(), "history\n");
    assert_eq!(stdout(&out), "0: echo first\n1: exit\n2: history\n");
}
