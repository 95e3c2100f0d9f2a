//! Error types for bootstrap sessions

use thiserror::Error;

use crate::uploader::UploadState;

/// Errors raised while talking to the target
#[derive(Debug, Error)]
pub enum BootError {
    /// The serial port could not be opened
    #[error("Failed to open serial port {port}: {source}")]
    Open {
        /// Port name as given by the user
        port: String,
        /// Underlying serial port error
        #[source]
        source: serialport::Error,
    },

    /// A transport operation failed in the middle of the handshake
    #[error("Transfer failed in state {state}: {source}")]
    Transfer {
        /// State the uploader was in when the failure happened
        state: UploadState,
        /// Underlying error
        #[source]
        source: Box<BootError>,
    },

    /// The operator reset acknowledgement never arrived
    #[error("Reset acknowledgement not received: {0}")]
    ResetAborted(String),

    /// I/O error during communication
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serial port error
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),
}

/// Result type for bootstrap operations
pub type Result<T> = core::result::Result<T, BootError>;
