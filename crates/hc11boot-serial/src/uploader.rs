//! Bootstrap upload: sync byte plus RAM image
//!
//! The upload is a one-shot sequence keyed to a single autobaud edge:
//!
//! 1. clear stale input before the target starts talking
//! 2. wait for the operator to reset the board into bootstrap mode
//! 3. send [`SYNC_BYTE`] and give the autobaud routine time to finish
//! 4. send the 256-byte image and give the target time to jump into it
//!
//! Any failure aborts the session. A second attempt needs a fresh reset
//! of the target, so nothing is retried here.

use std::fmt;
use std::sync::mpsc;

use hc11boot_core::protocol::SYNC_BYTE;
use hc11boot_core::{MemoryImage, Timing};

use crate::error::{BootError, Result};
use crate::transport::Transport;

/// Uploader state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadState {
    /// Nothing done yet
    Idle,
    /// The transport is open and configured
    PortOpened,
    /// Stale input has been discarded
    InputFlushed,
    /// Waiting for the operator to reset the target
    AwaitingUserReset,
    /// The sync byte has been written
    SyncSent,
    /// The full image has been written
    ImageSent,
    /// Waiting for the target to start the uploaded program
    SettleDelay,
    /// The target is running the uploaded program
    Done,
}

impl fmt::Display for UploadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::PortOpened => "port opened",
            Self::InputFlushed => "input flushed",
            Self::AwaitingUserReset => "awaiting reset",
            Self::SyncSent => "sync sent",
            Self::ImageSent => "image sent",
            Self::SettleDelay => "settle delay",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Source of the "target has been reset" acknowledgement
pub trait ResetSignal {
    /// Block until the target has been reset into bootstrap mode
    fn wait_for_reset(&mut self) -> Result<()>;
}

impl ResetSignal for mpsc::Receiver<()> {
    fn wait_for_reset(&mut self) -> Result<()> {
        self.recv()
            .map_err(|_| BootError::ResetAborted("signal channel closed".to_string()))
    }
}

/// Adapts a closure into a [`ResetSignal`]
pub struct FnSignal<F>(pub F);

impl<F: FnMut() -> Result<()>> ResetSignal for FnSignal<F> {
    fn wait_for_reset(&mut self) -> Result<()> {
        (self.0)()
    }
}

impl<S: ResetSignal + ?Sized> ResetSignal for &mut S {
    fn wait_for_reset(&mut self) -> Result<()> {
        (**self).wait_for_reset()
    }
}

/// Drives the bootstrap handshake over a [`Transport`]
pub struct BootstrapUploader<S> {
    signal: S,
    timing: Timing,
    state: UploadState,
}

impl<S: ResetSignal> BootstrapUploader<S> {
    /// Create an uploader waiting on `signal` for the target reset
    pub fn new(signal: S, timing: Timing) -> Self {
        Self {
            signal,
            timing,
            state: UploadState::Idle,
        }
    }

    /// Current state
    pub fn state(&self) -> UploadState {
        self.state
    }

    /// Run the handshake and send `image` over an already opened transport
    pub fn upload<T: Transport + ?Sized>(
        &mut self,
        transport: &mut T,
        image: &MemoryImage,
    ) -> Result<()> {
        self.enter(UploadState::PortOpened);

        transport
            .reset_input_buffer()
            .map_err(|e| self.fail(e))?;
        self.enter(UploadState::InputFlushed);

        self.enter(UploadState::AwaitingUserReset);
        self.signal.wait_for_reset()?;
        transport.delay(self.timing.reset_settle);

        log::info!("Sending bootloader sync and machine code...");
        transport.write(&[SYNC_BYTE]).map_err(|e| self.fail(e))?;
        self.enter(UploadState::SyncSent);
        transport.delay(self.timing.sync_settle);

        transport
            .write(image.as_bytes())
            .and_then(|_| transport.flush())
            .map_err(|e| self.fail(e))?;
        self.enter(UploadState::ImageSent);

        self.enter(UploadState::SettleDelay);
        transport.delay(self.timing.boot_settle);

        self.enter(UploadState::Done);
        Ok(())
    }

    fn enter(&mut self, state: UploadState) {
        log::debug!("upload: {} -> {}", self.state, state);
        self.state = state;
    }

    fn fail(&self, source: BootError) -> BootError {
        log::error!("upload: transfer failed in state {}: {}", self.state, source);
        BootError::Transfer {
            state: self.state,
            source: Box::new(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{Event, MockTransport};
    use std::time::Duration;

    struct Ack(usize);

    impl ResetSignal for Ack {
        fn wait_for_reset(&mut self) -> Result<()> {
            self.0 += 1;
            Ok(())
        }
    }

    struct NoAck;

    impl ResetSignal for NoAck {
        fn wait_for_reset(&mut self) -> Result<()> {
            Err(BootError::ResetAborted("operator went away".to_string()))
        }
    }

    fn test_image() -> MemoryImage {
        let mut image = MemoryImage::new();
        image.write(0x00, &[0x8E, 0x00, 0xFF, 0xCE, 0x10, 0x00]).unwrap();
        image
    }

    #[test]
    fn test_upload_sequence() {
        let timing = Timing::default();
        let image = test_image();
        let mut transport = MockTransport::new();
        let mut uploader = BootstrapUploader::new(Ack(0), timing);

        assert_eq!(uploader.state(), UploadState::Idle);
        uploader.upload(&mut transport, &image).unwrap();
        assert_eq!(uploader.state(), UploadState::Done);
        assert_eq!(uploader.signal.0, 1);

        assert_eq!(
            transport.events(),
            &[
                Event::ResetInput,
                Event::Delay(timing.reset_settle),
                Event::Write(vec![SYNC_BYTE]),
                Event::Delay(timing.sync_settle),
                Event::Write(image.as_bytes().to_vec()),
                Event::Flush,
                Event::Delay(timing.boot_settle),
            ]
        );
    }

    #[test]
    fn test_sync_precedes_image_and_settle_follows_it() {
        let timing = Timing {
            boot_settle: Duration::from_millis(42),
            ..Timing::default()
        };
        let mut transport = MockTransport::new();
        BootstrapUploader::new(Ack(0), timing)
            .upload(&mut transport, &test_image())
            .unwrap();

        let events = transport.events();
        let sync = events
            .iter()
            .position(|e| *e == Event::Write(vec![SYNC_BYTE]))
            .unwrap();
        let image = events
            .iter()
            .position(|e| matches!(e, Event::Write(data) if data.len() == 256))
            .unwrap();
        let settle = events
            .iter()
            .position(|e| *e == Event::Delay(Duration::from_millis(42)))
            .unwrap();
        assert!(sync < image);
        assert!(image < settle);
        assert_eq!(transport.written(), 257);
    }

    #[test]
    fn test_flush_happens_before_reset_wait() {
        let (tx, rx) = mpsc::channel();
        tx.send(()).unwrap();
        let mut transport = MockTransport::new();
        BootstrapUploader::new(rx, Timing::default())
            .upload(&mut transport, &test_image())
            .unwrap();
        assert_eq!(transport.events()[0], Event::ResetInput);
    }

    #[test]
    fn test_closure_signal() {
        let mut calls = 0;
        let mut transport = MockTransport::new();
        BootstrapUploader::new(
            FnSignal(|| {
                calls += 1;
                Ok::<(), BootError>(())
            }),
            Timing::default(),
        )
        .upload(&mut transport, &test_image())
        .unwrap();
        assert_eq!(calls, 1);
        assert_eq!(transport.written(), 257);
    }

    #[test]
    fn test_closed_signal_channel_aborts() {
        let (tx, rx) = mpsc::channel::<()>();
        drop(tx);
        let mut transport = MockTransport::new();
        let mut uploader = BootstrapUploader::new(rx, Timing::default());
        let err = uploader.upload(&mut transport, &test_image()).unwrap_err();
        assert!(matches!(err, BootError::ResetAborted(_)));
        assert_eq!(uploader.state(), UploadState::AwaitingUserReset);
        assert_eq!(transport.written(), 0);
    }

    #[test]
    fn test_no_write_without_reset_ack() {
        let mut transport = MockTransport::new();
        let err = BootstrapUploader::new(NoAck, Timing::default())
            .upload(&mut transport, &test_image())
            .unwrap_err();
        assert!(matches!(err, BootError::ResetAborted(_)));
        assert_eq!(transport.events(), &[Event::ResetInput]);
    }

    #[test]
    fn test_write_failure_is_fatal() {
        // Sync byte goes out, image write fails
        let mut transport = MockTransport::new().fail_write_at(1);
        let mut uploader = BootstrapUploader::new(Ack(0), Timing::default());
        let err = uploader.upload(&mut transport, &test_image()).unwrap_err();

        match err {
            BootError::Transfer { state, .. } => assert_eq!(state, UploadState::SyncSent),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(uploader.state(), UploadState::SyncSent);
        // No settle delay after a failed image write
        assert!(!transport
            .events()
            .contains(&Event::Delay(Timing::default().boot_settle)));
    }

    #[test]
    fn test_sync_write_failure() {
        let mut transport = MockTransport::new().fail_write_at(0);
        let err = BootstrapUploader::new(Ack(0), Timing::default())
            .upload(&mut transport, &test_image())
            .unwrap_err();
        assert!(matches!(
            err,
            BootError::Transfer {
                state: UploadState::AwaitingUserReset,
                ..
            }
        ));
        assert_eq!(transport.written(), 0);
    }
}
