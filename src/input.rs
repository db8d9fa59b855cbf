//! Acquisition of input lines.

use crate::error::ShellError;
use crate::lexer::is_blank;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::BufRead;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Prompt printed before each interactive read.
pub const PROMPT: &str = "$ ";

/// Flag raised by the SIGINT handler.
///
/// The handler only records the signal, so an interrupt delivered while a
/// child runs does not terminate the shell. The flag is consumed by
/// [`InputReader::read_line`].
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    flag: Arc<AtomicBool>,
}

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the process-wide SIGINT handler. Can be called once per process.
    pub fn install(&self) -> Result<(), ctrlc::Error> {
        let flag = self.flag.clone();
        ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))
    }

    pub fn raise(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Returns whether an interrupt arrived since the last call and clears it.
    pub fn take(&self) -> bool {
        self.flag.swap(false, Ordering::SeqCst)
    }
}

enum Source {
    Editor(DefaultEditor),
    Lines(Box<dyn BufRead>),
}

/// Reads logical lines from a terminal or from a stream.
pub struct InputReader {
    source: Source,
    interrupt: Interrupt,
}

impl InputReader {
    /// Interactive reader with prompt and line editing.
    pub fn interactive(interrupt: Interrupt) -> Result<Self, ShellError> {
        Ok(Self {
            source: Source::Editor(DefaultEditor::new()?),
            interrupt,
        })
    }

    /// Non-interactive reader over any buffered stream. No prompt is printed.
    pub fn from_reader(reader: Box<dyn BufRead>, interrupt: Interrupt) -> Self {
        Self {
            source: Source::Lines(reader),
            interrupt,
        }
    }

    pub fn is_interactive(&self) -> bool {
        matches!(self.source, Source::Editor(_))
    }

    /// Make earlier lines reachable through the editor's recall keys.
    pub fn seed_recall<'a>(&mut self, lines: impl IntoIterator<Item = &'a str>) {
        if let Source::Editor(editor) = &mut self.source {
            for line in lines {
                let _ = editor.add_history_entry(line);
            }
        }
    }

    /// Returns the next line without its newline and comment, or `None` at end
    /// of input.
    pub fn read_line(&mut self) -> Result<Option<String>, ShellError> {
        // an interrupt that hit a running child is not meant for the next read
        self.interrupt.take();
        match &mut self.source {
            Source::Editor(editor) => loop {
                match editor.readline(PROMPT) {
                    Ok(line) => {
                        if !line.trim().is_empty() {
                            let _ = editor.add_history_entry(line.as_str());
                        }
                        return Ok(Some(strip_comment(&line).to_string()));
                    }
                    Err(ReadlineError::Interrupted) => {
                        self.interrupt.take();
                        println!();
                    }
                    Err(ReadlineError::Eof) => {
                        println!();
                        return Ok(None);
                    }
                    Err(e) => return Err(e.into()),
                }
            },
            Source::Lines(reader) => {
                let mut buf = Vec::new();
                if reader.read_until(b'\n', &mut buf)? == 0 {
                    return Ok(None);
                }
                if buf.last() == Some(&b'\n') {
                    buf.pop();
                }
                let line = String::from_utf8_lossy(&buf);
                Ok(Some(strip_comment(&line).to_string()))
            }
        }
    }
}

/// Cuts the line at the first `#` that starts the line or follows a blank.
///
/// Quotes are not taken into account.
pub fn strip_comment(line: &str) -> &str {
    let mut prev: Option<char> = None;
    for (i, ch) in line.char_indices() {
        if ch == '#' && prev.is_none_or(is_blank) {
            return &line[..i];
        }
        prev = Some(ch);
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn reader(text: &str) -> InputReader {
        InputReader::from_reader(Box::new(Cursor::new(text.as_bytes().to_vec())), Interrupt::new())
    }

    #[test]
    fn strips_comments() {
        assert_eq!(strip_comment("# all comment"), "");
        assert_eq!(strip_comment("ls -l # list"), "ls -l ");
        assert_eq!(strip_comment("ls\t#tab"), "ls\t");
        assert_eq!(strip_comment("echo a#b"), "echo a#b");
        assert_eq!(strip_comment("echo 'x #y'"), "echo 'x ");
    }

    #[test]
    fn reads_lines_until_eof() {
        let mut r = reader("echo a\n\necho b # c\nlast");
        assert_eq!(r.read_line().unwrap().as_deref(), Some("echo a"));
        assert_eq!(r.read_line().unwrap().as_deref(), Some(""));
        assert_eq!(r.read_line().unwrap().as_deref(), Some("echo b "));
        assert_eq!(r.read_line().unwrap().as_deref(), Some("last"));
        assert_eq!(r.read_line().unwrap(), None);
        assert!(!r.is_interactive());
    }

    #[test]
    fn invalid_utf8_is_lossy() {
        let mut r = InputReader::from_reader(
            Box::new(Cursor::new(vec![b'a', 0xff, b'\n'])),
            Interrupt::new(),
        );
        assert_eq!(r.read_line().unwrap().as_deref(), Some("a\u{fffd}"));
    }

    #[test]
    fn stale_interrupt_is_cleared_at_read() {
        let interrupt = Interrupt::new();
        let mut r = InputReader::from_reader(Box::new(Cursor::new(b"x\n".to_vec())), interrupt.clone());
        interrupt.raise();
        assert_eq!(r.read_line().unwrap().as_deref(), Some("x"));
        assert!(!interrupt.take());
    }
}
