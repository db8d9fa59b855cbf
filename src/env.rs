use crate::store::EntryList;
use std::env as stdenv;
use std::path::PathBuf;

/// Session-owned view of the environment used by the interpreter.
///
/// The environment contains:
/// - `vars`: ordered `KEY=VALUE` entries that will be visible to executed commands.
/// - `current_dir`: the working directory for command execution.
///
/// Nothing here reads the process environment after construction; children are
/// spawned with [`Environment::snapshot`], so every builtin mutation is visible to
/// the next spawned command.
#[derive(Debug, Clone)]
pub struct Environment {
    vars: EntryList,
    /// The current working directory for command execution.
    pub current_dir: PathBuf,
}

impl Environment {
    /// Capture the current process state into a new `Environment` instance.
    ///
    /// This copies variables from `std::env::vars()` in their inherited order and
    /// initializes `current_dir` from `std::env::current_dir()`.
    pub fn from_process() -> Self {
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::from_vars(stdenv::vars(), current_dir)
    }

    /// Build an environment from explicit variables.
    pub fn from_vars<K, V>(vars: impl IntoIterator<Item = (K, V)>, current_dir: PathBuf) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut env = Self {
            vars: EntryList::new(),
            current_dir,
        };
        for (k, v) in vars {
            env.set_var(k.as_ref(), v.as_ref());
        }
        env
    }

    /// Get the value of an environment variable.
    pub fn get_var(&self, key: &str) -> Option<&str> {
        self.vars.value_of(key)
    }

    /// Set or override an environment variable. An existing variable keeps its
    /// position in the list.
    pub fn set_var(&mut self, key: &str, val: &str) {
        let text = format!("{key}={val}");
        match self.vars.position_of_key(key) {
            Some(index) => {
                self.vars.replace(index, text);
            }
            None => self.vars.push(text, 0),
        }
    }

    /// Remove a variable. Returns `true` if it was present.
    pub fn unset_var(&mut self, key: &str) -> bool {
        match self.vars.position_of_key(key) {
            Some(index) => self.vars.remove(index).is_some(),
            None => false,
        }
    }

    /// All entries as `KEY=VALUE`, in order.
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.vars.iter().map(|entry| entry.text.as_str())
    }

    /// Flat `(key, value)` pairs handed to a spawned process.
    pub fn snapshot(&self) -> Vec<(String, String)> {
        self.vars
            .iter()
            .filter_map(|entry| entry.text.split_once('='))
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}
