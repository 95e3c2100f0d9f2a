//! Address / hex / ASCII table for data read back from the target

use alloc::string::{String, ToString};
use core::fmt;

/// Bytes shown on each row of the table
pub const BYTES_PER_ROW: usize = 8;

/// Width of the hex column ("XX " per byte)
const HEX_COLUMN_WIDTH: usize = BYTES_PER_ROW * 3;

/// Column titles
pub const TABLE_HEADER: &str = "ADDR | HEX DATA (8 bytes)             | ASCII";
/// Separator printed under the column titles
pub const TABLE_RULE: &str = "-----|--------------------------------|---------";

/// Character shown in the ASCII column for `byte`
///
/// Printable ASCII (0x20..=0x7E) is shown as-is, everything else as `.`.
pub fn ascii_char(byte: u8) -> char {
    if (0x20..=0x7E).contains(&byte) {
        byte as char
    } else {
        '.'
    }
}

/// Formats a byte slice as a table, one row per 8 bytes
///
/// ```
/// use hc11boot_core::HexTable;
///
/// let table = HexTable::new(b"ABCDEFGH").without_header().to_string();
/// assert_eq!(table, "0000 | 41 42 43 44 45 46 47 48  | ABCDEFGH\n");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct HexTable<'a> {
    data: &'a [u8],
    header: bool,
}

impl<'a> HexTable<'a> {
    /// Table over `data`, with column titles
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, header: true }
    }

    /// Omit the column titles
    pub fn without_header(mut self) -> Self {
        self.header = false;
        self
    }
}

impl fmt::Display for HexTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.header {
            writeln!(f, "{}", TABLE_HEADER)?;
            writeln!(f, "{}", TABLE_RULE)?;
        }
        for (row, chunk) in self.data.chunks(BYTES_PER_ROW).enumerate() {
            write_row(f, row * BYTES_PER_ROW, chunk)?;
        }
        Ok(())
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, offset: usize, chunk: &[u8]) -> fmt::Result {
    write!(f, "{:04X} | ", offset)?;

    let mut width = 0;
    for (i, byte) in chunk.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
            width += 1;
        }
        write!(f, "{:02X}", byte)?;
        width += 2;
    }
    for _ in width..HEX_COLUMN_WIDTH {
        f.write_str(" ")?;
    }

    f.write_str(" | ")?;
    for &byte in chunk {
        write!(f, "{}", ascii_char(byte))?;
    }
    writeln!(f)
}

/// Render `data` as a table with column titles
pub fn format_table(data: &[u8]) -> String {
    HexTable::new(data).to_string()
}
