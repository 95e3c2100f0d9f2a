//! hc11boot-core - Core library for the HC11 bootstrap loader
//!
//! This crate holds everything that does not touch the serial line:
//! the S19 parser that turns an S-record file into the 256-byte RAM
//! image, the image type itself, the hex/ASCII table used to show the
//! data read back from the target, and the protocol constants and
//! timing defaults shared by the transport layer.
//!
//! It is `no_std` compatible (it only needs `alloc`).
//!
//! # Features
//!
//! - `std` - Implement `std::error::Error` for the error types
//!
//! # Example
//!
//! ```
//! use hc11boot_core::srec;
//!
//! let image = srec::parse("S1050010AABB85\nS9030000FC\n")?;
//! assert_eq!(image.get(0x10), Some(0xAA));
//! assert_eq!(image.get(0x11), Some(0xBB));
//! # Ok::<(), hc11boot_core::ParseError>(())
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod error;
pub mod format;
pub mod image;
pub mod protocol;
pub mod srec;

pub use error::{Field, ImageError, ParseError, Result};
pub use format::HexTable;
pub use image::MemoryImage;
pub use protocol::Timing;
