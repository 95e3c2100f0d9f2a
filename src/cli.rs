//! CLI argument parsing

use clap::{Args, Parser};
use hc11boot_core::protocol::{BOOTSTRAP_BAUD, EPROM_READ_LEN};
use hc11boot_core::Timing;
use std::path::PathBuf;
use std::time::Duration;

/// Parse a string as a number of milliseconds
fn parse_millis(s: &str) -> Result<Duration, String> {
    s.parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|e| format!("Invalid number of milliseconds: {}", e))
}

#[derive(Parser, Debug)]
#[command(name = "hc11boot")]
#[command(
    author,
    version,
    about = "HC11 bootstrap-mode RAM loader and EPROM reader",
    long_about = None
)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Serial port wired to the HC11 SCI (e.g. /dev/ttyUSB0 or COM3)
    #[arg(
        short = 'c',
        long = "port",
        value_name = "PORT",
        required_unless_present = "dry_run"
    )]
    pub port: Option<String>,

    /// S19 file holding the RAM loader program
    #[arg(short = 'i', long = "ifile", value_name = "FILE")]
    pub input: PathBuf,

    /// Loopback mode (accepted for compatibility, has no effect)
    #[arg(short = 'l', long)]
    pub loopback: bool,

    /// Reject S1 records with a bad checksum
    #[arg(long)]
    pub verify_checksum: bool,

    /// Number of bytes the loader sends back
    #[arg(
        long,
        value_name = "BYTES",
        default_value_t = EPROM_READ_LEN as u16,
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub count: u16,

    /// Handshake baud rate
    #[arg(long, default_value_t = BOOTSTRAP_BAUD)]
    pub baud: u32,

    /// Exit with an error status if fewer than --count bytes arrive
    #[arg(long)]
    pub fail_on_incomplete: bool,

    /// Parse the S19 file and show the RAM image without opening the port
    #[arg(long)]
    pub dry_run: bool,

    #[command(flatten)]
    pub timing: TimingArgs,
}

/// Bootstrap delays and timeouts, in milliseconds
#[derive(Args, Debug, Clone)]
#[command(next_help_heading = "Timing")]
pub struct TimingArgs {
    /// Wait after the reset acknowledgement before sending sync
    #[arg(long, value_name = "MS", default_value = "500", value_parser = parse_millis)]
    pub reset_delay: Duration,

    /// Wait after the sync byte for autobaud detection
    #[arg(long, value_name = "MS", default_value = "100", value_parser = parse_millis)]
    pub sync_delay: Duration,

    /// Wait after the image for the target to start it
    #[arg(long, value_name = "MS", default_value = "150", value_parser = parse_millis)]
    pub boot_delay: Duration,

    /// Read timeout while the port is open for the upload
    #[arg(long, value_name = "MS", default_value = "6500", value_parser = parse_millis)]
    pub open_timeout: Duration,

    /// Per-byte timeout while reading back
    #[arg(long, value_name = "MS", default_value = "2000", value_parser = parse_millis)]
    pub byte_timeout: Duration,
}

impl TimingArgs {
    /// Session timing from the command line values
    pub fn to_timing(&self) -> Timing {
        Timing {
            open_timeout: self.open_timeout,
            reset_settle: self.reset_delay,
            sync_settle: self.sync_delay,
            boot_settle: self.boot_delay,
            byte_timeout: self.byte_timeout,
        }
    }
}
