//! HC11 bootstrap-mode protocol constants and timing
//!
//! After reset in bootstrap mode the HC11 boot ROM waits for a break or an
//! `0xFF` on the SCI to detect the baud rate, then receives 256 bytes into
//! RAM and jumps to address 0x0000.

use core::time::Duration;

/// Byte sent first so the boot ROM can measure the bit timing
pub const SYNC_BYTE: u8 = 0xFF;

/// Baud rate the boot ROM detects for the handshake
pub const BOOTSTRAP_BAUD: u32 = 1200;

/// Number of EPROM bytes the resident loader sends back
pub const EPROM_READ_LEN: usize = 25;

/// Delays and timeouts of a bootstrap session
///
/// The defaults were tuned against real boards; they are kept configurable
/// since other board revisions may need different values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Read timeout while the port is open for the upload
    pub open_timeout: Duration,
    /// Wait after the operator acknowledged the reset, before the sync byte
    pub reset_settle: Duration,
    /// Wait after the sync byte for the autobaud routine to finish
    pub sync_settle: Duration,
    /// Wait after the image for the target to start executing it
    pub boot_settle: Duration,
    /// Per-byte read timeout while collecting the readback
    pub byte_timeout: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            open_timeout: Duration::from_millis(6500),
            reset_settle: Duration::from_millis(500),
            sync_settle: Duration::from_millis(100),
            boot_settle: Duration::from_millis(150),
            byte_timeout: Duration::from_secs(2),
        }
    }
}

impl Timing {
    /// Worst-case time spent collecting `count` readback bytes
    pub fn readback_budget(&self, count: usize) -> Duration {
        let count = u32::try_from(count).unwrap_or(u32::MAX);
        self.byte_timeout.saturating_mul(count)
    }
}
