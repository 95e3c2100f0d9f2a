//! Error types for hc11boot-core
//!
//! These are `no_std` compatible and `Copy`, like the rest of the core
//! crate. Every parse error carries the 1-based line number of the
//! offending record.

use core::fmt;

/// A fixed-position field of an S-record line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Record length, in bytes, of address + data + checksum
    ByteCount,
    /// 16-bit load address
    Address,
    /// Data bytes
    Data,
    /// Trailing checksum byte
    Checksum,
}

/// Errors raised while writing into a [`MemoryImage`](crate::MemoryImage)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageError {
    /// A byte would land at or past the end of the image
    AddressOutOfRange {
        /// First address that does not fit
        address: u32,
        /// Capacity of the image in bytes
        capacity: usize,
    },
}

/// Errors raised while parsing an S19 file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// A field contains something other than hex digits
    InvalidHex {
        /// Line number (1-based)
        line: usize,
        /// Field that failed to decode
        field: Field,
    },
    /// The line ends before the length declared by its byte count
    Truncated {
        /// Line number (1-based)
        line: usize,
        /// Field that was cut short
        field: Field,
        /// Number of characters the record needs
        needed: usize,
        /// Number of characters actually present
        found: usize,
    },
    /// The byte count cannot even cover the address and checksum
    ByteCountTooSmall {
        /// Line number (1-based)
        line: usize,
        /// Declared byte count
        byte_count: u8,
    },
    /// Record data extends beyond the end of the image
    AddressOutOfRange {
        /// Line number (1-based)
        line: usize,
        /// First address that does not fit
        address: u32,
        /// Capacity of the image in bytes
        capacity: usize,
    },
    /// Checksum verification was requested and did not match
    ChecksumMismatch {
        /// Line number (1-based)
        line: usize,
        /// Checksum computed over the record
        expected: u8,
        /// Checksum found on the line
        found: u8,
    },
}

impl ParseError {
    /// Line number (1-based) of the record that failed
    pub fn line(&self) -> usize {
        match *self {
            Self::InvalidHex { line, .. }
            | Self::Truncated { line, .. }
            | Self::ByteCountTooSmall { line, .. }
            | Self::AddressOutOfRange { line, .. }
            | Self::ChecksumMismatch { line, .. } => line,
        }
    }

    pub(crate) fn from_image(line: usize, err: ImageError) -> Self {
        match err {
            ImageError::AddressOutOfRange { address, capacity } => Self::AddressOutOfRange {
                line,
                address,
                capacity,
            },
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ByteCount => write!(f, "byte count"),
            Self::Address => write!(f, "address"),
            Self::Data => write!(f, "data"),
            Self::Checksum => write!(f, "checksum"),
        }
    }
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddressOutOfRange { address, capacity } => write!(
                f,
                "address 0x{:04X} is outside the {}-byte image",
                address, capacity
            ),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidHex { line, field } => {
                write!(f, "line {}: malformed hex in {} field", line, field)
            }
            Self::Truncated {
                line,
                field,
                needed,
                found,
            } => write!(
                f,
                "line {}: truncated record in {} field (need {} characters, found {})",
                line, field, needed, found
            ),
            Self::ByteCountTooSmall { line, byte_count } => write!(
                f,
                "line {}: byte count 0x{:02X} is too small for an S1 record",
                line, byte_count
            ),
            Self::AddressOutOfRange {
                line,
                address,
                capacity,
            } => write!(
                f,
                "line {}: address 0x{:04X} is outside the {}-byte image",
                line, address, capacity
            ),
            Self::ChecksumMismatch {
                line,
                expected,
                found,
            } => write!(
                f,
                "line {}: checksum mismatch (computed 0x{:02X}, found 0x{:02X})",
                line, expected, found
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ImageError {}

#[cfg(feature = "std")]
impl std::error::Error for ParseError {}

/// Result type alias using the parse error type
pub type Result<T> = core::result::Result<T, ParseError>;
