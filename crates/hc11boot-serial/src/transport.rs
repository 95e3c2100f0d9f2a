//! Transport layer abstraction for bootstrap sessions
//!
//! The uploader and the readback collector only need a handful of
//! operations from the serial line, collected in [`Transport`]. Delays go
//! through the transport as well so that tests can record them instead of
//! sleeping.

use std::time::Duration;

use crate::error::Result;

/// Transport trait for the bootstrap link
pub trait Transport {
    /// Write all of `data`
    fn write(&mut self, data: &[u8]) -> Result<()>;

    /// Read up to `buf.len()` bytes, waiting at most the current timeout
    ///
    /// Returns the number of bytes read, or 0 if the timeout expired.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Change the read timeout
    fn set_timeout(&mut self, timeout: Duration) -> Result<()>;

    /// Discard anything already received but not yet read
    fn reset_input_buffer(&mut self) -> Result<()>;

    /// Flush any buffered output
    fn flush(&mut self) -> Result<()>;

    /// Block for `duration`
    fn delay(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn write(&mut self, data: &[u8]) -> Result<()> {
        (**self).write(data)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        (**self).read(buf)
    }

    fn set_timeout(&mut self, timeout: Duration) -> Result<()> {
        (**self).set_timeout(timeout)
    }

    fn reset_input_buffer(&mut self) -> Result<()> {
        (**self).reset_input_buffer()
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }

    fn delay(&mut self, duration: Duration) {
        (**self).delay(duration)
    }
}

pub mod serial {
    //! Serial port transport implementation

    use super::*;
    use crate::error::BootError;
    use hc11boot_core::protocol::BOOTSTRAP_BAUD;
    use hc11boot_core::Timing;
    use serialport::{ClearBuffer, DataBits, FlowControl, Parity, SerialPort, StopBits};
    use std::io::{Read, Write};

    /// Serial line settings for a bootstrap session
    ///
    /// The boot ROM only talks 8N1 and the target board has no handshake
    /// lines wired, so flow control is always off.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SessionConfig {
        /// Baud rate
        pub baud_rate: u32,
        /// Initial read timeout
        pub timeout: Duration,
    }

    impl Default for SessionConfig {
        fn default() -> Self {
            Self::from_timing(&Timing::default())
        }
    }

    impl SessionConfig {
        /// Handshake baud rate with the open timeout from `timing`
        pub fn from_timing(timing: &Timing) -> Self {
            Self {
                baud_rate: BOOTSTRAP_BAUD,
                timeout: timing.open_timeout,
            }
        }
    }

    /// Serial port transport
    ///
    /// The port is closed when the transport is dropped.
    pub struct SerialTransport {
        port: Box<dyn SerialPort>,
        name: String,
    }

    impl SerialTransport {
        /// Open `device` with the given session settings
        pub fn open(device: &str, config: &SessionConfig) -> Result<Self> {
            let port = serialport::new(device, config.baud_rate)
                .data_bits(DataBits::Eight)
                .parity(Parity::None)
                .stop_bits(StopBits::One)
                .flow_control(FlowControl::None)
                .timeout(config.timeout)
                .open()
                .map_err(|source| BootError::Open {
                    port: device.to_string(),
                    source,
                })?;

            log::info!(
                "Opened serial port {} at {} baud (timeout {:?})",
                device,
                config.baud_rate,
                config.timeout
            );

            Ok(Self {
                port,
                name: device.to_string(),
            })
        }
    }

    impl Transport for SerialTransport {
        fn write(&mut self, data: &[u8]) -> Result<()> {
            self.port.write_all(data)?;
            Ok(())
        }

        fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
            match self.port.read(buf) {
                Ok(n) => Ok(n),
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => Ok(0),
                Err(e) => Err(BootError::from(e)),
            }
        }

        fn set_timeout(&mut self, timeout: Duration) -> Result<()> {
            self.port.set_timeout(timeout)?;
            Ok(())
        }

        fn reset_input_buffer(&mut self) -> Result<()> {
            self.port.clear(ClearBuffer::Input)?;
            Ok(())
        }

        fn flush(&mut self) -> Result<()> {
            self.port.flush()?;
            Ok(())
        }
    }

    /// The port itself is closed when `port` is dropped; this only logs it.
    impl Drop for SerialTransport {
        fn drop(&mut self) {
            log::debug!("Closing serial port {}", self.name);
        }
    }
}
