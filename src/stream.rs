//! Streaming adapters around [`FrameDecoder`]
//!
//! Each adapter owns one decoder and feeds it bytes in arrival order. Completed
//! frames are handed downstream; dropped frames are reported through `tracing`
//! and counted in [`StreamMetrics`], never propagated.

use std::io::{self, Read};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender};

use tracing::{debug, warn};

use crate::metrics::{MetricsSnapshot, StreamMetrics};
use crate::protocol::{Frame, FrameDecoder, Result};

/// Read size used by [`decode_reader`]
const READ_CHUNK_SIZE: usize = 256;

/// Decoder plus counters shared by all adapters
#[derive(Debug)]
struct Driver {
    decoder: FrameDecoder,
    metrics: Arc<StreamMetrics>,
}

impl Driver {
    fn new(decoder: FrameDecoder) -> Self {
        Self {
            decoder,
            metrics: Arc::new(StreamMetrics::new()),
        }
    }

    fn feed(&mut self, byte: u8) -> Option<Frame> {
        self.metrics.record_bytes(1);
        match self.decoder.push(byte) {
            Ok(Some(frame)) => {
                self.metrics.record_frame();
                Some(frame)
            }
            Ok(None) => None,
            Err(err) => {
                self.metrics.record_error(&err);
                warn!(error = %err, "dropping frame");
                None
            }
        }
    }
}

/// Iterator of frames decoded from a byte iterator
///
/// ```rust
/// use rclib::{Configuration, Frame, FrameStream, Header, Resolution};
///
/// let config = Configuration::new(2, Resolution::Steps256)?;
/// let frame = Frame::new(Header::new(1, 0), config, vec![1, 2])?;
///
/// let mut wire = frame.encode();
/// wire.extend(frame.encode());
///
/// let frames: Vec<Frame> = FrameStream::new(wire).collect();
/// assert_eq!(frames.len(), 2);
/// # Ok::<(), rclib::Error>(())
/// ```
#[derive(Debug)]
pub struct FrameStream<I> {
    bytes: I,
    driver: Driver,
}

impl<I: Iterator<Item = u8>> FrameStream<I> {
    /// Decode frames from `bytes` with a fresh decoder
    pub fn new<T>(bytes: T) -> Self
    where
        T: IntoIterator<Item = u8, IntoIter = I>,
    {
        Self::with_decoder(bytes, FrameDecoder::new())
    }

    /// Decode frames from `bytes` with a preconfigured decoder
    pub fn with_decoder<T>(bytes: T, decoder: FrameDecoder) -> Self
    where
        T: IntoIterator<Item = u8, IntoIter = I>,
    {
        Self {
            bytes: bytes.into_iter(),
            driver: Driver::new(decoder),
        }
    }

    /// Counters for this stream
    #[must_use]
    pub fn metrics(&self) -> Arc<StreamMetrics> {
        Arc::clone(&self.driver.metrics)
    }

    /// Decoder state (inspect a partial frame left at end of input)
    #[must_use]
    pub fn decoder(&self) -> &FrameDecoder {
        &self.driver.decoder
    }
}

impl<I: Iterator<Item = u8>> Iterator for FrameStream<I> {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        loop {
            let byte = self.bytes.next()?;
            if let Some(frame) = self.driver.feed(byte) {
                return Some(frame);
            }
        }
    }
}

/// Decode bytes from a channel and forward completed frames.
///
/// Returns once the input channel is closed or the frame receiver is dropped.
/// A partial frame left at that point is discarded.
pub fn decode_channel(input: Receiver<u8>, output: Sender<Frame>) -> MetricsSnapshot {
    let frames = FrameStream::new(input);
    let metrics = frames.metrics();

    for frame in frames {
        if output.send(frame).is_err() {
            debug!("frame receiver dropped; stopping");
            return metrics.snapshot();
        }
    }

    debug!("byte channel closed");
    metrics.snapshot()
}

/// Decode bytes from a reader and forward completed frames.
///
/// Reads until end of input or until the frame receiver is dropped. I/O errors
/// other than interruptions are returned.
pub fn decode_reader<R: Read>(mut reader: R, output: Sender<Frame>) -> Result<MetricsSnapshot> {
    let mut driver = Driver::new(FrameDecoder::new());
    let mut chunk = [0u8; READ_CHUNK_SIZE];

    loop {
        let read = match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(read) => read,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        };

        for &byte in &chunk[..read] {
            if let Some(frame) = driver.feed(byte) {
                if output.send(frame).is_err() {
                    debug!("frame receiver dropped; stopping");
                    return Ok(driver.metrics.snapshot());
                }
            }
        }
    }

    debug!("reader reached end of input");
    Ok(driver.metrics.snapshot())
}
