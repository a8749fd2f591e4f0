use std::io::{BufRead, StdinLock, Stdout, Write};

use crate::{RentalError, RentalResult};

/// Line-oriented operator terminal.
pub trait Terminal {
    /// Next input line with surrounding whitespace removed.
    ///
    /// Returns `RentalError::InputClosed` once the input is exhausted.
    fn read_line(&mut self) -> RentalResult<String>;

    fn write_line(&mut self, line: &str) -> RentalResult<()>;
}

/// Terminal over any buffered reader and writer.
pub struct LineTerminal<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LineTerminal<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl LineTerminal<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> Terminal for LineTerminal<R, W> {
    fn read_line(&mut self) -> RentalResult<String> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(RentalError::InputClosed);
        }
        Ok(line.trim().to_string())
    }

    fn write_line(&mut self, line: &str) -> RentalResult<()> {
        writeln!(self.output, "{line}")?;
        self.output.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_trimmed_lines_until_closed() {
        let mut term = LineTerminal::new(Cursor::new("  game0001 \r\n\n"), Vec::new());
        assert_eq!(term.read_line().unwrap(), "game0001");
        assert_eq!(term.read_line().unwrap(), "");
        assert!(matches!(term.read_line(), Err(RentalError::InputClosed)));
    }

    #[test]
    fn writes_one_line_per_call() {
        let mut term = LineTerminal::new(Cursor::new(""), Vec::new());
        term.write_line("MAIN MENU").unwrap();
        term.write_line("---------").unwrap();
        assert_eq!(
            String::from_utf8(term.into_output()).unwrap(),
            "MAIN MENU\n---------\n"
        );
    }
}
