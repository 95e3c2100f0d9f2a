//! RAM image uploaded to the target in bootstrap mode
//!
//! In bootstrap mode the HC11 receives exactly [`LOADER_SIZE`] bytes into
//! internal RAM starting at address 0x0000 and then jumps to it. The image
//! is addressed by the 16-bit load addresses found in the S19 file, but
//! only the first [`LOADER_SIZE`] addresses exist.

use core::fmt;

use crate::error::ImageError;

/// Size of the bootstrap RAM loader in bytes
pub const LOADER_SIZE: usize = 256;

/// Bounds-checked, zero-initialised RAM image
#[derive(Clone, PartialEq, Eq)]
pub struct MemoryImage {
    data: [u8; LOADER_SIZE],
}

impl MemoryImage {
    /// Create an image with every byte set to 0
    pub const fn new() -> Self {
        Self {
            data: [0; LOADER_SIZE],
        }
    }

    /// Number of addressable bytes
    pub const fn capacity(&self) -> usize {
        LOADER_SIZE
    }

    /// Byte at `address`, or `None` if the address is outside the image
    pub fn get(&self, address: u16) -> Option<u8> {
        self.data.get(address as usize).copied()
    }

    /// Store a single byte
    pub fn set(&mut self, address: u16, value: u8) -> Result<(), ImageError> {
        self.write(address, &[value])
    }

    /// Store `bytes` at consecutive addresses starting at `address`
    ///
    /// The whole span is checked before anything is written, so a failed
    /// call leaves the image untouched.
    pub fn write(&mut self, address: u16, bytes: &[u8]) -> Result<(), ImageError> {
        let start = address as usize;
        let end = start + bytes.len();
        if end > LOADER_SIZE {
            return Err(ImageError::AddressOutOfRange {
                address: start.max(LOADER_SIZE) as u32,
                capacity: LOADER_SIZE,
            });
        }
        self.data[start..end].copy_from_slice(bytes);
        Ok(())
    }

    /// Raw image contents, in upload order
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Iterate over `(address, byte)` pairs holding a non-zero value
    pub fn non_zero(&self) -> impl Iterator<Item = (u16, u8)> + '_ {
        self.data
            .iter()
            .enumerate()
            .filter(|&(_, &b)| b != 0)
            .map(|(addr, &b)| (addr as u16, b))
    }
}

impl Default for MemoryImage {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<[u8]> for MemoryImage {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl fmt::Debug for MemoryImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryImage")
            .field("capacity", &LOADER_SIZE)
            .field("non_zero", &self.non_zero().count())
            .finish()
    }
}
