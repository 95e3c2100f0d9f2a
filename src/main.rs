//! hc11boot - HC11 bootstrap-mode RAM loader
//!
//! Loads a 256-byte program from an S19 file into the RAM of an HC11 held
//! in bootstrap mode, then shows the bytes the program sends back (the
//! stock loader dumps the first 25 bytes of an EPROM).
//!
//! # Architecture
//!
//! - `hc11boot-core` parses the S19 file into a bounds-checked RAM image
//!   and formats the readback as a hex/ASCII table.
//! - `hc11boot-serial` owns the serial line: the upload state machine and
//!   the readback collector, both written against a `Transport` trait.
//!
//! This binary only wires them together and talks to the operator.

mod cli;
mod commands;

use clap::Parser;
use cli::Cli;
use commands::BootloadOptions;
use hc11boot_core::srec::ParserOptions;
use hc11boot_serial::SessionConfig;

fn main() {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Set log level based on verbosity
    match cli.verbose {
        0 => {} // default (info)
        1 => log::set_max_level(log::LevelFilter::Debug),
        _ => log::set_max_level(log::LevelFilter::Trace),
    }

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.loopback {
        log::warn!("Loopback mode has no effect on the bootstrap sequence");
    }

    let parser = ParserOptions {
        verify_checksum: cli.verify_checksum,
    };

    println!("HC11 Bootload Mode RAM Loader");

    if cli.dry_run {
        return commands::run_dry_run(&cli.input, parser);
    }

    let port = cli.port.as_deref().ok_or("No serial port given (use -c/--port)")?;
    let timing = cli.timing.to_timing();
    let session = SessionConfig {
        baud_rate: cli.baud,
        ..SessionConfig::from_timing(&timing)
    };

    commands::run_bootload(&BootloadOptions {
        port,
        input: &cli.input,
        parser,
        session,
        timing,
        count: usize::from(cli.count),
        fail_on_incomplete: cli.fail_on_incomplete,
    })
}
