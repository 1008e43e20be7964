//! Frame codec (encode / incremental decode)
//!
//! Encoding is a pure function of a [`Frame`]. Decoding is driven one byte at a
//! time through [`FrameDecoder`], so frames can be reassembled from a stream of
//! arbitrary chunking.

use std::mem;
use std::sync::Arc;

use bytes::{Buf, BufMut};
use tracing::{debug, trace};

use super::{
    CONTINUATION_BIT, Configuration, END_BYTE, Error, Frame, ROUTING_LENGTH_MASK, Result,
    START_BYTE, UidGenerator,
};

/// XOR fold of a byte sequence
#[must_use]
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0, |acc, byte| acc ^ byte)
}

/// Encode a frame to bytes
///
/// # Format
///
/// ```text
/// [START] [UID] [TID] [CONFIG (1+)] [DATA (n)] [CHECKSUM] [END]
/// ```
///
/// The checksum is the XOR fold of every byte between the start marker and the
/// checksum itself.
#[must_use]
pub fn encode(frame: &Frame) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(frame.encoded_len());
    encode_into(frame, &mut bytes);
    bytes
}

/// Encode a frame, appending to `dst`
pub fn encode_into<B: BufMut>(frame: &Frame, dst: &mut B) {
    let config = frame.config();
    let header = frame.header();

    let mut body = Vec::with_capacity(frame.encoded_len() - 2);
    body.push(header.uid);
    body.push(header.transmitter_id);
    body.extend_from_slice(&config.to_bytes());
    body.extend_from_slice(&pack_channels(config, frame.channels()));

    dst.put_u8(START_BYTE);
    dst.put_slice(&body);
    dst.put_u8(checksum(&body));
    dst.put_u8(END_BYTE);
}

/// Bit-pack channel values, least-significant bit first
///
/// Channel `i` occupies absolute bits `i * bits .. (i + 1) * bits` of the data
/// region; values are masked to the channel width.
fn pack_channels(config: &Configuration, channels: &[u16]) -> Vec<u8> {
    let resolution = config.resolution();
    let bits = resolution.bits_per_channel();
    let max = resolution.max_value();
    let mut data = vec![0u8; config.data_bytes_count()];

    for (index, &value) in channels.iter().enumerate() {
        if value > max {
            debug!(
                channel = index,
                value,
                max,
                "channel value exceeds resolution; truncating"
            );
        }
        let value = value & max;

        for bit in 0..bits {
            let position = index * bits + bit;
            let bit_value = u8::from((value >> bit) & 1 == 1);
            data[position / 8] |= bit_value << (position % 8);
        }
    }

    data
}

/// Decoder state, in wire order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DecodeState {
    /// Waiting for the start marker
    #[default]
    Initial,
    /// Expecting the uid byte
    Uid,
    /// Expecting the transmitter id byte
    TransmitterId,
    /// Expecting the config byte
    Config,
    /// Expecting the mesh byte
    Mesh,
    /// Reading continuation-chained additional-config bytes
    AdditionalConfig,
    /// Reading bit-packed channel data
    Data,
    /// Expecting the checksum byte
    Checksum,
    /// Expecting the end marker
    EndByte,
    /// A terminal outcome was reported; the next byte starts over
    Finished,
}

/// Outcome of one state transition
#[derive(Debug)]
enum Step {
    Next(DecodeState),
    Complete,
    Failed(Error),
}

/// Incremental, byte-driven frame decoder
///
/// Owns the frame under construction plus the transient decode state. One
/// decoder serves exactly one byte stream.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    frame: Frame,
    state: DecodeState,
    buffer: Vec<u8>,
    decoded_data_bytes: usize,
    total_data_bytes: usize,
    received_checksum: u8,
    uid_tracker: Option<Arc<UidGenerator>>,
}

impl FrameDecoder {
    /// Create a new decoder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a decoder that reports every received uid to `tracker`
    #[must_use]
    pub fn with_uid_tracker(tracker: Arc<UidGenerator>) -> Self {
        Self {
            uid_tracker: Some(tracker),
            ..Self::default()
        }
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> DecodeState {
        self.state
    }

    /// Frame under construction (complete after `decode` returned `Ok(true)`)
    #[must_use]
    pub const fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Bytes received since the last start marker, start marker included
    #[must_use]
    pub fn buffered(&self) -> &[u8] {
        &self.buffer
    }

    /// Checksum byte received for the current frame
    #[must_use]
    pub const fn received_checksum(&self) -> u8 {
        self.received_checksum
    }

    /// Take the frame under construction and reset the decoder
    pub fn take_frame(&mut self) -> Frame {
        let frame = mem::take(&mut self.frame);
        self.reset();
        frame
    }

    /// Discard any partial frame and wait for the next start marker
    pub fn reset(&mut self) {
        self.frame = Frame::default();
        self.state = DecodeState::Initial;
        self.buffer.clear();
        self.decoded_data_bytes = 0;
        self.total_data_bytes = 0;
        self.received_checksum = 0;
    }

    /// Feed one byte.
    ///
    /// Returns `Ok(false)` while the frame is incomplete and `Ok(true)` exactly once
    /// for a correctly terminated frame, which is then available through
    /// [`FrameDecoder::frame`]. A checksum mismatch or a missing end byte is
    /// returned as `Err`; the partial frame must be discarded. Either terminal
    /// outcome moves the decoder to [`DecodeState::Finished`], and the next byte
    /// starts a fresh frame.
    pub fn decode(&mut self, byte: u8) -> Result<bool> {
        match self.step(byte) {
            Step::Next(next) => {
                self.state = next;
                self.buffer.push(byte);
                Ok(false)
            }
            Step::Complete => {
                self.state = DecodeState::Finished;
                debug!(
                    uid = self.frame.uid(),
                    transmitter_id = self.frame.transmitter_id(),
                    channels = self.frame.channels().len(),
                    "frame decoded"
                );
                Ok(true)
            }
            Step::Failed(err) => {
                self.state = DecodeState::Finished;
                debug!(error = %err, "frame rejected");
                Err(err)
            }
        }
    }

    /// Feed one byte, yielding the frame once it completes.
    ///
    /// The decoder resets itself after every terminal outcome, so it can be fed
    /// an endless stream.
    pub fn push(&mut self, byte: u8) -> Result<Option<Frame>> {
        match self.decode(byte) {
            Ok(false) => Ok(None),
            Ok(true) => Ok(Some(self.take_frame())),
            Err(err) => {
                self.reset();
                Err(err)
            }
        }
    }

    /// Consume bytes from `src` up to the next terminal outcome.
    ///
    /// Returns `None` once `src` is exhausted without completing a frame; the
    /// partial frame is kept for the next call.
    pub fn decode_buf<B: Buf>(&mut self, src: &mut B) -> Option<Result<Frame>> {
        while src.has_remaining() {
            match self.push(src.get_u8()) {
                Ok(None) => {}
                Ok(Some(frame)) => return Some(Ok(frame)),
                Err(err) => return Some(Err(err)),
            }
        }
        None
    }

    fn step(&mut self, byte: u8) -> Step {
        match self.state {
            DecodeState::Initial | DecodeState::Finished => {
                if self.state == DecodeState::Finished {
                    self.reset();
                }
                self.buffer.clear();
                if byte == START_BYTE {
                    trace!("found start byte");
                    self.frame = Frame::default();
                    Step::Next(DecodeState::Uid)
                } else {
                    Step::Next(DecodeState::Initial)
                }
            }
            DecodeState::Uid => {
                trace!(uid = byte, "found uid byte");
                self.frame.header_mut().uid = byte;
                if let Some(tracker) = &self.uid_tracker {
                    tracker.observe(byte);
                }
                Step::Next(DecodeState::TransmitterId)
            }
            DecodeState::TransmitterId => {
                trace!(transmitter_id = byte, "found transmitter id byte");
                self.frame.header_mut().transmitter_id = byte;
                Step::Next(DecodeState::Config)
            }
            DecodeState::Config => {
                let (config, follows) = Configuration::from_config_byte(byte);
                self.total_data_bytes = config.data_bytes_count();
                self.decoded_data_bytes = 0;
                trace!(
                    channel_count = config.channel_count(),
                    bits_per_channel = config.resolution().bits_per_channel(),
                    error = config.error(),
                    follows,
                    data_bytes = self.total_data_bytes,
                    "found config byte"
                );
                self.frame.reset_layout(config);

                if follows {
                    Step::Next(DecodeState::Mesh)
                } else {
                    Step::Next(DecodeState::Data)
                }
            }
            DecodeState::Mesh => {
                let routing_length = byte & ROUTING_LENGTH_MASK;
                trace!(routing_length, "found mesh byte");
                self.frame.config_mut().set_routing_length(routing_length);

                if byte & CONTINUATION_BIT != 0 {
                    Step::Next(DecodeState::AdditionalConfig)
                } else {
                    Step::Next(DecodeState::Data)
                }
            }
            DecodeState::AdditionalConfig => {
                trace!(byte, "found additional config byte");
                self.frame
                    .config_mut()
                    .push_additional_config(byte & !CONTINUATION_BIT);

                if byte & CONTINUATION_BIT != 0 {
                    Step::Next(DecodeState::AdditionalConfig)
                } else {
                    Step::Next(DecodeState::Data)
                }
            }
            DecodeState::Data => {
                self.unpack_data_byte(byte);
                self.decoded_data_bytes += 1;

                if self.decoded_data_bytes >= self.total_data_bytes {
                    Step::Next(DecodeState::Checksum)
                } else {
                    Step::Next(DecodeState::Data)
                }
            }
            DecodeState::Checksum => {
                self.received_checksum = byte;
                let expected = self.buffer.get(1..).map_or(0, checksum);
                trace!(found = byte, expected, "found checksum byte");

                if byte == expected {
                    Step::Next(DecodeState::EndByte)
                } else {
                    Step::Failed(Error::ChecksumMismatch {
                        expected,
                        found: byte,
                    })
                }
            }
            DecodeState::EndByte => {
                if byte == END_BYTE {
                    trace!("found end byte");
                    Step::Complete
                } else {
                    Step::Failed(Error::MissingEndByte { found: byte })
                }
            }
        }
    }

    /// Scatter the eight bits of one data byte into their channel slots
    fn unpack_data_byte(&mut self, byte: u8) {
        let bits = self.frame.config().resolution().bits_per_channel();
        let first_bit = self.decoded_data_bytes * 8;
        let channels = self.frame.channels_mut();

        for bit in 0..8 {
            let position = first_bit + bit;
            let channel = position / bits;
            // Padding bits past the last channel are ignored
            let Some(slot) = channels.get_mut(channel) else {
                break;
            };
            let bit_value = u16::from((byte >> bit) & 1);
            *slot |= bit_value << (position % bits);
        }
    }
}
