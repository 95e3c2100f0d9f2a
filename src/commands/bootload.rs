//! Full bootstrap session: parse, upload, read back, display

use super::console::ConsoleReset;
use super::load::load_image;
use super::CommandError;
use hc11boot_core::srec::ParserOptions;
use hc11boot_core::{HexTable, Timing};
use hc11boot_serial::{
    BootstrapUploader, ReadbackBuffer, ReadbackCollector, SerialTransport, SessionConfig,
    Transport,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

/// Everything a bootstrap session needs
#[derive(Debug, Clone)]
pub struct BootloadOptions<'a> {
    /// Serial port name
    pub port: &'a str,
    /// S19 file with the RAM loader
    pub input: &'a Path,
    /// S19 parser options
    pub parser: ParserOptions,
    /// Serial line settings
    pub session: SessionConfig,
    /// Handshake delays and timeouts
    pub timing: Timing,
    /// Bytes expected back from the target
    pub count: usize,
    /// Treat a short readback as an error
    pub fail_on_incomplete: bool,
}

/// Run the bootstrap session
pub fn run_bootload(options: &BootloadOptions<'_>) -> Result<(), Box<dyn std::error::Error>> {
    println!("Using serial port: {}", options.port);
    println!("Parsing S19 file: {}", options.input.display());

    // Parse errors abort before the port is touched
    let image = load_image(options.input, options.parser)?;
    println!("\nS19 parsing complete.\n");

    let mut transport = SerialTransport::open(options.port, &options.session)?;

    let mut uploader = BootstrapUploader::new(ConsoleReset::stdio(), options.timing);
    uploader.upload(&mut transport, &image)?;

    println!("\nWaiting for EPROM data from HC11...");
    let buffer = read_back_with_progress(&mut transport, options)?;
    drop(transport);

    report(&buffer, options.fail_on_incomplete)
}

fn read_back_with_progress<T: Transport + ?Sized>(
    transport: &mut T,
    options: &BootloadOptions<'_>,
) -> Result<ReadbackBuffer, Box<dyn std::error::Error>> {
    log::debug!(
        "Collecting {} bytes, giving up after at most {:?}",
        options.count,
        options.timing.readback_budget(options.count)
    );

    let pb = ProgressBar::new(options.count as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} bytes")?
            .progress_chars("#>-"),
    );

    let buffer = ReadbackCollector::new(options.count, options.timing.byte_timeout)
        .collect_with_progress(transport, |n| pb.set_position(n as u64));

    if buffer.is_complete() {
        pb.finish_with_message("Read complete");
    } else {
        pb.abandon();
    }
    Ok(buffer)
}

/// Print the readback table, or the incomplete-read report
fn report(
    buffer: &ReadbackBuffer,
    fail_on_incomplete: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if buffer.is_complete() {
        println!("\nEPROM Read Complete!\n");
        print!("{}", HexTable::new(buffer.as_bytes()));
        println!("\nTotal bytes read: {}", buffer.len());
    } else {
        println!("\nERROR: EPROM data incomplete.");
        println!("Bytes received: {}", buffer.len());
        if !buffer.is_empty() {
            println!();
            print!("{}", HexTable::new(buffer.as_bytes()));
        }
        if fail_on_incomplete {
            return Err(CommandError::ReadbackIncomplete {
                received: buffer.len(),
                expected: buffer.expected(),
            }
            .into());
        }
    }

    println!("\nDone.");
    Ok(())
}
