//! Output destination for `puts`.
//!
//! The REPL and `run` write to stdout; tests capture into a buffer.

use std::cell::RefCell;

/// Where `puts` lines go.
pub trait PrintHandler {
    /// Write one line (newline appended by the handler).
    fn print_line(&self, line: &str);

    /// Captured output, if this handler captures. Stdout returns "".
    fn output(&self) -> String {
        String::new()
    }

    /// Drop captured output, if any.
    fn clear(&self) {}
}

/// Writes straight to stdout.
pub struct StdoutPrintHandler;

impl PrintHandler for StdoutPrintHandler {
    fn print_line(&self, line: &str) {
        println!("{line}");
    }
}

/// Accumulates output for inspection (tests).
#[derive(Default)]
pub struct BufferPrintHandler {
    buffer: RefCell<String>,
}

impl BufferPrintHandler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PrintHandler for BufferPrintHandler {
    fn print_line(&self, line: &str) {
        let mut buffer = self.buffer.borrow_mut();
        buffer.push_str(line);
        buffer.push('\n');
    }

    fn output(&self) -> String {
        self.buffer.borrow().clone()
    }

    fn clear(&self) {
        self.buffer.borrow_mut().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_captures_lines() {
        let handler = BufferPrintHandler::new();
        handler.print_line("a");
        handler.print_line("b");
        assert_eq!(handler.output(), "a\nb\n");
        handler.clear();
        assert_eq!(handler.output(), "");
    }
}
