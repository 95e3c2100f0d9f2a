//! Readback of the data sent by the resident loader
//!
//! The target streams a fixed number of bytes with no framing, so a single
//! missed byte makes everything after it untrustworthy. Collection stops at
//! the first gap and whatever arrived so far is handed back.

use std::time::Duration;

use hc11boot_core::protocol::EPROM_READ_LEN;
use hc11boot_core::Timing;

use crate::transport::Transport;

/// Bytes received from the target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadbackBuffer {
    data: Vec<u8>,
    expected: usize,
}

impl ReadbackBuffer {
    /// Received bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Number of bytes received
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether nothing was received
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of bytes that were requested
    pub fn expected(&self) -> usize {
        self.expected
    }

    /// Whether every requested byte arrived
    pub fn is_complete(&self) -> bool {
        self.data.len() == self.expected
    }

    /// Consume the buffer, returning the received bytes
    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }
}

/// Collects a fixed-length response one byte at a time
#[derive(Debug, Clone, Copy)]
pub struct ReadbackCollector {
    expected: usize,
    byte_timeout: Duration,
}

impl Default for ReadbackCollector {
    fn default() -> Self {
        Self::new(EPROM_READ_LEN, Timing::default().byte_timeout)
    }
}

impl ReadbackCollector {
    /// Collector for `expected` bytes, waiting at most `byte_timeout` each
    pub fn new(expected: usize, byte_timeout: Duration) -> Self {
        Self {
            expected,
            byte_timeout,
        }
    }

    /// Collect the response
    pub fn collect<T: Transport + ?Sized>(&self, transport: &mut T) -> ReadbackBuffer {
        self.collect_with_progress(transport, |_| {})
    }

    /// Collect the response, calling `progress` with the running byte count
    pub fn collect_with_progress<T, F>(&self, transport: &mut T, mut progress: F) -> ReadbackBuffer
    where
        T: Transport + ?Sized,
        F: FnMut(usize),
    {
        if let Err(e) = transport.set_timeout(self.byte_timeout) {
            log::warn!("readback: could not set per-byte timeout: {}", e);
        }

        let mut data = Vec::with_capacity(self.expected.min(EPROM_READ_LEN));
        let mut byte = [0u8; 1];

        while data.len() < self.expected {
            let index = data.len();
            match transport.read(&mut byte) {
                Ok(0) => {
                    log::error!("readback: timeout at byte {}, address {:02X}", index, index);
                    break;
                }
                Ok(_) => {
                    log::trace!("readback: byte {} = 0x{:02X}", index, byte[0]);
                    data.push(byte[0]);
                    progress(data.len());
                }
                Err(e) => {
                    log::error!("readback: read failed at byte {}: {}", index, e);
                    break;
                }
            }
        }

        log::debug!("readback: received {} of {} bytes", data.len(), self.expected);
        ReadbackBuffer {
            data,
            expected: self.expected,
        }
    }
}

/// Collect `expected_count` bytes with the given per-byte timeout
pub fn collect<T: Transport + ?Sized>(
    transport: &mut T,
    expected_count: usize,
    per_byte_timeout: Duration,
) -> ReadbackBuffer {
    ReadbackCollector::new(expected_count, per_byte_timeout).collect(transport)
}
