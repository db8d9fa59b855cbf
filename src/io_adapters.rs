use std::cell::RefCell;
use std::io::{Result as IoResult, Write};
use std::process::Stdio;
use std::rc::Rc;

/// Memory-backed writer for capturing output of a session.
///
/// Cloning shares the buffer, so a clone kept by the caller can read what the
/// interpreter wrote.
#[derive(Clone, Default)]
pub struct MemWriter {
    buf: Rc<RefCell<Vec<u8>>>,
}

impl MemWriter {
    /// Public constructor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collected bytes decoded lossily.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.borrow()).into_owned()
    }
}

impl Write for MemWriter {
    fn write(&mut self, data: &[u8]) -> IoResult<usize> {
        self.buf.borrow_mut().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> IoResult<()> {
        Ok(())
    }
}

impl crate::command::Stdout for MemWriter {
    /// No file descriptor: child output gets piped and copied in.
    fn stdio(&self) -> Option<Stdio> {
        None
    }
}
