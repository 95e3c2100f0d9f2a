//! Operator reset prompt

use hc11boot_serial::{BootError, ResetSignal};
use std::io::{self, BufRead, Write};

/// Asks the operator to reset the board and waits for Enter
pub struct ConsoleReset<R, W> {
    input: R,
    output: W,
}

impl ConsoleReset<io::StdinLock<'static>, io::Stdout> {
    /// Prompt on stdout, wait on stdin
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsoleReset<R, W> {
    /// Prompt on `output`, wait for a line on `input`
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> ResetSignal for ConsoleReset<R, W> {
    fn wait_for_reset(&mut self) -> hc11boot_serial::Result<()> {
        writeln!(self.output, "Press RESET on the HC11 board now.")?;
        write!(self.output, "Press ENTER after resetting the HC11...")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(BootError::ResetAborted("standard input closed".to_string()));
        }
        log::debug!("Operator acknowledged target reset");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_waits_for_enter() {
        let mut output = Vec::new();
        let mut signal = ConsoleReset::new(Cursor::new(b"\n".to_vec()), &mut output);
        signal.wait_for_reset().unwrap();
        drop(signal);
        let prompt = String::from_utf8(output).unwrap();
        assert!(prompt.starts_with("Press RESET on the HC11 board now."));
    }

    #[test]
    fn test_closed_input_aborts() {
        let mut signal = ConsoleReset::new(Cursor::new(Vec::new()), io::sink());
        assert!(matches!(
            signal.wait_for_reset(),
            Err(BootError::ResetAborted(_))
        ));
    }
}
