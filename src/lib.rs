//! A small interactive command interpreter.
//!
//! Input lines are cut into segments at `;`, `&&` and `||`. Each segment that
//! its operator allows to run has its first word alias-expanded and its
//! `$?`, `$$` and `$NAME` references replaced, and is then split into words.
//! The first word is looked up among the builtins and then on `PATH`.
//!
//! The main entry point is [`Interpreter`], which runs lines against a
//! [`Session`] using a set of pluggable factories. The public modules
//! [`command`] and [`env`] expose the traits and types needed to add commands
//! of your own.

pub mod alias;
mod builtin;
pub mod command;
pub mod env;
pub mod error;
pub mod expand;
mod external;
pub mod history;
pub mod input;
mod interpreter;
pub mod io_adapters;
pub mod lexer;
pub mod parser;
pub mod session;
mod store;

pub use builtin::{Builtins, builtin_names};
pub use env::Environment;
pub use error::ShellError;
pub use external::{PathLookup, find_command_path};
pub use input::{InputReader, Interrupt};
pub use interpreter::{Interpreter, default_commands};
pub use io_adapters::MemWriter;
pub use session::{Session, SessionConfig};
