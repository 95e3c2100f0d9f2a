//! Motorola S-record (S19) parsing
//!
//! Only `S1` data records are interpreted; every other line (S0 header,
//! S9 termination, blank lines, comments) is skipped without error.
//!
//! An `S1` record uses fixed character offsets:
//!
//! ```text
//! S1 nn aaaa dd dd .. dd cc
//! |  |  |    |           +-- checksum (one byte)
//! |  |  |    +-------------- nn - 3 data bytes
//! |  |  +------------------- 16-bit big-endian load address
//! |  +---------------------- byte count (address + data + checksum)
//! +------------------------- record tag
//! ```
//!
//! The checksum is ignored unless [`ParserOptions::verify_checksum`] is set.

mod hex;

use alloc::vec::Vec;

use crate::error::{Field, ParseError, Result};
use crate::image::MemoryImage;

/// Tag of the only record type the loader understands
pub const DATA_RECORD_TAG: &str = "S1";

const BYTE_COUNT_OFFSET: usize = 2;
const ADDRESS_OFFSET: usize = 4;
const DATA_OFFSET: usize = 8;
/// Two address bytes plus the checksum byte
const RECORD_OVERHEAD: u8 = 3;

/// Parser options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParserOptions {
    /// Reject records whose checksum does not match their contents
    pub verify_checksum: bool,
}

/// A single parsed `S1` record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SRecord {
    /// Declared byte count (address + data + checksum)
    pub byte_count: u8,
    /// Load address of the first data byte
    pub address: u16,
    /// Data bytes, `byte_count - 3` of them
    pub data: Vec<u8>,
    /// Checksum found on the line, if present and well formed
    pub checksum: Option<u8>,
}

impl SRecord {
    /// Parse one line of an S19 file
    ///
    /// Returns `Ok(None)` for lines that are not `S1` records.
    pub fn parse_line(line: &str, line_no: usize, options: &ParserOptions) -> Result<Option<Self>> {
        let text = line.trim_end().as_bytes();
        if !text.starts_with(DATA_RECORD_TAG.as_bytes()) {
            return Ok(None);
        }

        let byte_count = decode_field(text, line_no, Field::ByteCount, BYTE_COUNT_OFFSET, 1)
            .and_then(|digits| hex_byte(digits, line_no, Field::ByteCount))?;
        if byte_count < RECORD_OVERHEAD {
            return Err(ParseError::ByteCountTooSmall {
                line: line_no,
                byte_count,
            });
        }
        let data_count = (byte_count - RECORD_OVERHEAD) as usize;

        let address = decode_field(text, line_no, Field::Address, ADDRESS_OFFSET, 2).and_then(
            |digits| {
                hex::decode_u16(digits).ok_or(ParseError::InvalidHex {
                    line: line_no,
                    field: Field::Address,
                })
            },
        )?;

        let data_digits = decode_field(text, line_no, Field::Data, DATA_OFFSET, data_count)?;
        let data = data_digits
            .chunks(hex::digits_for(1))
            .map(|pair| hex_byte(pair, line_no, Field::Data))
            .collect::<Result<Vec<u8>>>()?;

        let checksum_offset = DATA_OFFSET + hex::digits_for(data_count);
        let checksum = if options.verify_checksum {
            let digits = decode_field(text, line_no, Field::Checksum, checksum_offset, 1)?;
            Some(hex_byte(digits, line_no, Field::Checksum)?)
        } else {
            text.get(checksum_offset..checksum_offset + hex::digits_for(1))
                .and_then(hex::decode_byte)
        };

        let record = Self {
            byte_count,
            address,
            data,
            checksum,
        };

        if options.verify_checksum {
            record.verify_checksum(line_no)?;
        }

        Ok(Some(record))
    }

    /// Checksum the record should carry: the one's complement of the low
    /// byte of the sum of the byte count, address and data bytes
    pub fn computed_checksum(&self) -> u8 {
        let sum = self
            .address
            .to_be_bytes()
            .iter()
            .chain(self.data.iter())
            .fold(self.byte_count, |acc, &b| acc.wrapping_add(b));
        !sum
    }

    fn verify_checksum(&self, line_no: usize) -> Result<()> {
        let expected = self.computed_checksum();
        match self.checksum {
            Some(found) if found == expected => Ok(()),
            Some(found) => Err(ParseError::ChecksumMismatch {
                line: line_no,
                expected,
                found,
            }),
            None => Err(ParseError::InvalidHex {
                line: line_no,
                field: Field::Checksum,
            }),
        }
    }
}

/// Slice out the hex digits for a field of `bytes` bytes at `offset`
fn decode_field(
    text: &[u8],
    line: usize,
    field: Field,
    offset: usize,
    bytes: usize,
) -> Result<&[u8]> {
    let end = offset + hex::digits_for(bytes);
    text.get(offset..end).ok_or(ParseError::Truncated {
        line,
        field,
        needed: end,
        found: text.len(),
    })
}

fn hex_byte(digits: &[u8], line: usize, field: Field) -> Result<u8> {
    hex::decode_byte(digits).ok_or(ParseError::InvalidHex { line, field })
}

/// S19 to [`MemoryImage`] parser
///
/// An optional callback sees every record after it has been merged into
/// the image, which the CLI uses to print a load trace.
#[derive(Default)]
pub struct S19Parser<'a> {
    options: ParserOptions,
    on_record: Option<&'a mut dyn FnMut(&SRecord)>,
}

impl<'a> S19Parser<'a> {
    /// Create a parser with default options (checksums not verified)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with the given options
    pub fn with_options(options: ParserOptions) -> Self {
        Self {
            options,
            on_record: None,
        }
    }

    /// Register a callback invoked for every record loaded
    pub fn on_record(mut self, callback: &'a mut dyn FnMut(&SRecord)) -> Self {
        self.on_record = Some(callback);
        self
    }

    /// Parse S19 text into a fresh image
    pub fn parse(&mut self, text: &str) -> Result<MemoryImage> {
        let mut image = MemoryImage::new();
        let mut records = 0usize;

        for (idx, line) in text.lines().enumerate() {
            let line_no = idx + 1;
            let Some(record) = SRecord::parse_line(line, line_no, &self.options)? else {
                continue;
            };

            image
                .write(record.address, &record.data)
                .map_err(|e| ParseError::from_image(line_no, e))?;
            log::trace!(
                "srec: line {}: {} bytes at 0x{:04X}",
                line_no,
                record.data.len(),
                record.address
            );
            records += 1;

            if let Some(callback) = self.on_record.as_deref_mut() {
                callback(&record);
            }
        }

        log::debug!("srec: loaded {} S1 records", records);
        Ok(image)
    }
}

/// Parse S19 text with default options
pub fn parse(text: &str) -> Result<MemoryImage> {
    S19Parser::new().parse(text)
}
