//! CLI command implementations
//!
//! ## Bootload
//!
//! `bootload` runs the whole session: parse the S19 file, open the port,
//! upload the RAM loader behind the sync byte and show what the target
//! sends back.
//!
//! ## Dry run
//!
//! `load` parses the S19 file and prints the resulting RAM image without
//! touching the serial port.

pub mod bootload;
mod console;
pub mod load;

pub use bootload::{run_bootload, BootloadOptions};
pub use load::run_dry_run;

use thiserror::Error;

/// Command-level failures that are not errors of the underlying crates
#[derive(Debug, Error)]
pub enum CommandError {
    /// Fewer bytes than expected arrived and the caller asked to fail on it
    #[error("EPROM data incomplete: received {received} of {expected} bytes")]
    ReadbackIncomplete {
        /// Bytes received
        received: usize,
        /// Bytes expected
        expected: usize,
    },

    /// The S19 file could not be read
    #[error("Failed to read {path}: {source}")]
    ReadInput {
        /// File path
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}
