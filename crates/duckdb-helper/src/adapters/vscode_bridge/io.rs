use std::io::{BufRead, BufReader, BufWriter, Write};

use crate::error::AppResult;

/// Newline-delimited JSON over a reader/writer pair (stdio in production).
pub struct NdjsonIo<R, W> {
    input: R,
    output: W,
}

impl NdjsonIo<BufReader<std::io::Stdin>, BufWriter<std::io::Stdout>> {
    pub fn stdio() -> Self {
        Self::new(BufReader::new(std::io::stdin()), BufWriter::new(std::io::stdout()))
    }
}

impl<R: BufRead, W: Write> NdjsonIo<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// `None` on EOF; blank lines come back as empty strings.
    pub fn read_line(&mut self) -> AppResult<Option<String>> {
        let mut line = String::new();
        let n = self.input.read_line(&mut line)?;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    pub fn write_json_line<T: serde::Serialize>(&mut self, v: &T) -> AppResult<()> {
        serde_json::to_writer(&mut self.output, v)?;
        self.output.write_all(b"\n")?;
        self.output.flush()?;
        Ok(())
    }

    pub fn into_output(self) -> W {
        self.output
    }
}
