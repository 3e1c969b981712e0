//! Host boundary: a line-based input source and two text sinks.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Where READ gets its lines from.
pub trait LineSource {
    /// The next line without its terminator, or `None` at end of input.
    fn next_line(&mut self) -> io::Result<Option<String>>;
}

/// Adapts any buffered reader, stripping `\n` and `\r\n`. Bytes that are
/// not UTF-8 become U+FFFD.
#[derive(Debug)]
pub struct Lines<R> {
    reader: R,
}

impl<R: BufRead> Lines<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> LineSource for Lines<R> {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        let mut buf = Vec::new();
        if self.reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }
        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }
}

/// Pre-collected lines, consumed front to back.
impl LineSource for VecDeque<String> {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        Ok(self.pop_front())
    }
}

/// The three host streams a program talks to.
pub struct Io<'a> {
    pub input: &'a mut dyn LineSource,
    /// WRITE goes here.
    pub output: &'a mut dyn Write,
    /// DPRINT and BREAK go here.
    pub diagnostics: &'a mut dyn Write,
}

impl<'a> Io<'a> {
    pub fn new(
        input: &'a mut dyn LineSource,
        output: &'a mut dyn Write,
        diagnostics: &'a mut dyn Write,
    ) -> Self {
        Self {
            input,
            output,
            diagnostics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_strip_terminators() {
        let mut lines = Lines::new("one\r\ntwo\n\nlast".as_bytes());
        assert_eq!(lines.next_line().unwrap().as_deref(), Some("one"));
        assert_eq!(lines.next_line().unwrap().as_deref(), Some("two"));
        assert_eq!(lines.next_line().unwrap().as_deref(), Some(""));
        assert_eq!(lines.next_line().unwrap().as_deref(), Some("last"));
        assert_eq!(lines.next_line().unwrap(), None);
    }

    #[test]
    fn lines_decode_invalid_utf8_lossily() {
        let mut lines = Lines::new(&b"caf\xe9\r\nok\n"[..]);
        assert_eq!(lines.next_line().unwrap().as_deref(), Some("caf\u{fffd}"));
        assert_eq!(lines.next_line().unwrap().as_deref(), Some("ok"));
        assert_eq!(lines.next_line().unwrap(), None);
    }

    #[test]
    fn queue_source_drains() {
        let mut queue: VecDeque<String> = VecDeque::from(vec!["a".to_string()]);
        assert_eq!(queue.next_line().unwrap().as_deref(), Some("a"));
        assert_eq!(queue.next_line().unwrap(), None);
    }
}
