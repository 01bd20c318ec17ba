//! Input and output streams a command reads from and writes to.

use std::io::{self, BufRead, Write};

pub struct IoStreams {
    pub input: Box<dyn BufRead>,
    pub out: Box<dyn Write>,
    pub err: Box<dyn Write>,
}

impl IoStreams {
    /// The process's stdin, stdout and stderr.
    pub fn stdio() -> Self {
        Self {
            input: Box::new(io::stdin().lock()),
            out: Box::new(io::stdout()),
            err: Box::new(io::stderr()),
        }
    }

    /// Ask a yes/no question on `out` and read the answer from `input`.
    pub fn confirm(&mut self, question: &str) -> io::Result<bool> {
        write!(self.out, "{} [y/N] ", question)?;
        self.out.flush()?;

        let mut answer = String::new();
        self.input.read_line(&mut answer)?;
        Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
    }
}

#[cfg(test)]
pub use test_support::SharedBuffer;
