//! Scripted in-memory transport for tests
//!
//! Records every call in order and replays a script of read results, so
//! protocol sequencing can be checked without hardware.

use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use crate::error::{BootError, Result};
use crate::transport::Transport;

/// A recorded transport call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Write(Vec<u8>),
    Read,
    SetTimeout(Duration),
    ResetInput,
    Flush,
    Delay(Duration),
}

/// Outcome of one scripted read
#[derive(Debug, Clone, Copy)]
pub enum ReadStep {
    Byte(u8),
    Timeout,
    Error,
}

#[derive(Default)]
pub struct MockTransport {
    events: Vec<Event>,
    reads: VecDeque<ReadStep>,
    fail_write_at: Option<usize>,
    writes: usize,
    written: usize,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue bytes returned by successive reads; once the script runs
    /// out every read times out
    pub fn with_bytes(mut self, bytes: &[u8]) -> Self {
        self.reads.extend(bytes.iter().map(|&b| ReadStep::Byte(b)));
        self
    }

    pub fn then(mut self, step: ReadStep) -> Self {
        self.reads.push_back(step);
        self
    }

    /// Make the `n`th write call (0-based) fail
    pub fn fail_write_at(mut self, n: usize) -> Self {
        self.fail_write_at = Some(n);
        self
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Total bytes successfully written
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn reads(&self) -> usize {
        self.events.iter().filter(|e| **e == Event::Read).count()
    }
}

impl Transport for MockTransport {
    fn write(&mut self, data: &[u8]) -> Result<()> {
        let idx = self.writes;
        self.writes += 1;
        if self.fail_write_at == Some(idx) {
            return Err(BootError::Io(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "mock write failure",
            )));
        }
        self.written += data.len();
        self.events.push(Event::Write(data.to_vec()));
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.events.push(Event::Read);
        if buf.is_empty() {
            return Ok(0);
        }
        match self.reads.pop_front().unwrap_or(ReadStep::Timeout) {
            ReadStep::Byte(b) => {
                buf[0] = b;
                Ok(1)
            }
            ReadStep::Timeout => Ok(0),
            ReadStep::Error => Err(BootError::Io(io::Error::new(
                io::ErrorKind::Other,
                "mock read failure",
            ))),
        }
    }

    fn set_timeout(&mut self, timeout: Duration) -> Result<()> {
        self.events.push(Event::SetTimeout(timeout));
        Ok(())
    }

    fn reset_input_buffer(&mut self) -> Result<()> {
        self.events.push(Event::ResetInput);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.events.push(Event::Flush);
        Ok(())
    }

    fn delay(&mut self, duration: Duration) {
        self.events.push(Event::Delay(duration));
    }
}
