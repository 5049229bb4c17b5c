use std::io::{self, BufRead};

/// Reads input one line at a time, distinguishing a blank line from
/// end-of-input.
pub struct LineReader<R> {
    inner: R,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Returns the next line including its trailing newline, or `None` once the
    /// input is exhausted. A trailing `\r\n` comes back as `\n`. Invalid UTF-8
    /// is replaced rather than rejected.
    pub fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut buf = Vec::new();
        if self.inner.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }

        if buf.ends_with(b"\r\n") {
            buf.truncate(buf.len() - 2);
            buf.push(b'\n');
        }
        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }
}
