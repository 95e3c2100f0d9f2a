//! hc11boot-serial - HC11 bootstrap-mode serial protocol
//!
//! This crate talks to an HC11 held in bootstrap mode: it uploads a 256-byte
//! RAM image behind an autobaud sync byte, then collects the fixed-length
//! response the uploaded program sends back.
//!
//! # Protocol Overview
//!
//! - The port is opened at 1200 baud, 8N1, with no flow control.
//! - Stale input is discarded, then the operator resets the target.
//! - `0xFF` is sent for autobaud, followed by the image.
//! - The target runs the image and streams its result bytes back.
//!
//! # Example
//!
//! ```no_run
//! use hc11boot_core::{srec, Timing};
//! use hc11boot_serial::{BootstrapUploader, ReadbackCollector, SerialTransport, SessionConfig};
//! use std::sync::mpsc;
//!
//! let image = srec::parse(&std::fs::read_to_string("loader.s19")?)?;
//! let timing = Timing::default();
//!
//! let mut transport = SerialTransport::open("/dev/ttyUSB0", &SessionConfig::from_timing(&timing))?;
//!
//! let (reset_done, reset_signal) = mpsc::channel();
//! reset_done.send(())?;
//! BootstrapUploader::new(reset_signal, timing).upload(&mut transport, &image)?;
//!
//! let data = ReadbackCollector::new(25, timing.byte_timeout).collect(&mut transport);
//! println!("{} of {} bytes", data.len(), data.expected());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod readback;
pub mod transport;
pub mod uploader;

#[cfg(test)]
mod mock;

// Re-exports
pub use error::{BootError, Result};
pub use readback::{ReadbackBuffer, ReadbackCollector};
pub use transport::serial::{SerialTransport, SessionConfig};
pub use transport::Transport;
pub use uploader::{BootstrapUploader, FnSignal, ResetSignal, UploadState};
