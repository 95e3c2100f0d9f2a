//! S19 loading with a per-record trace

use super::CommandError;
use hc11boot_core::srec::{ParserOptions, S19Parser, SRecord};
use hc11boot_core::{HexTable, MemoryImage};
use std::fs;
use std::path::Path;

/// Read and parse the S19 file, printing one trace line per record
pub fn load_image(
    path: &Path,
    options: ParserOptions,
) -> Result<MemoryImage, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path).map_err(|source| CommandError::ReadInput {
        path: path.display().to_string(),
        source,
    })?;

    let mut trace = |record: &SRecord| println!("{}", trace_line(record));
    let image = S19Parser::with_options(options)
        .on_record(&mut trace)
        .parse(&text)?;

    log::info!(
        "Loaded {} non-zero bytes from {}",
        image.non_zero().count(),
        path.display()
    );
    Ok(image)
}

/// `@ 0xADDR: BB BB ..` for one record
fn trace_line(record: &SRecord) -> String {
    let bytes: Vec<String> = record.data.iter().map(|b| format!("{:02X}", b)).collect();
    format!("@ 0x{:04X}: {}", record.address, bytes.join(" "))
}

/// Parse the S19 file and print the RAM image that would be uploaded
pub fn run_dry_run(
    path: &Path,
    options: ParserOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Parsing S19 file: {}", path.display());
    let image = load_image(path, options)?;
    println!("\nS19 parsing complete.\n");

    print!("{}", HexTable::new(image.as_bytes()));
    println!(
        "\n{} bytes, {} non-zero",
        image.capacity(),
        image.non_zero().count()
    );
    Ok(())
}
