//! Frame reader, reassembles API frames from the serial byte stream

use xbee_data::frame::{checksum, valid_length, MAX_FRAME_LENGTH, START_DELIMITER};

/// Source of serial bytes
pub trait SerialRead {
    /// Read up to `buffer.len()` bytes without blocking, returns the number
    /// of bytes read
    fn read(&mut self, buffer: &mut [u8]) -> usize;
}

impl SerialRead for &[u8] {
    fn read(&mut self, buffer: &mut [u8]) -> usize {
        let size = core::cmp::min(self.len(), buffer.len());
        buffer[..size].copy_from_slice(&self[..size]);
        *self = &self[size..];
        size
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum ReaderState {
    WaitStart,
    LengthMsb,
    LengthLsb,
    Frame,
}

/// Frame reader state machine
///
/// Partial frames are kept between calls to `poll`, bytes are only pulled
/// from the source until a frame completes.
pub struct FrameReader {
    state: ReaderState,
    length: usize,
    received: usize,
    buffer: [u8; MAX_FRAME_LENGTH + 1],
}

impl Default for FrameReader {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameReader {
    pub fn new() -> Self {
        Self {
            state: ReaderState::WaitStart,
            length: 0,
            received: 0,
            buffer: [0u8; MAX_FRAME_LENGTH + 1],
        }
    }

    fn read_byte(port: &mut dyn SerialRead) -> Option<u8> {
        let mut byte = [0u8; 1];
        if port.read(&mut byte) == 1 {
            Some(byte[0])
        } else {
            None
        }
    }

    /// Read from `port` until a frame is complete or the source runs dry
    ///
    /// Returns the frame content, type byte through payload, of a frame
    /// with a valid checksum. Frames with an invalid length or checksum are
    /// dropped.
    pub fn poll(&mut self, port: &mut dyn SerialRead) -> Option<&[u8]> {
        loop {
            match self.state {
                ReaderState::WaitStart => {
                    let byte = Self::read_byte(port)?;
                    if byte == START_DELIMITER {
                        self.state = ReaderState::LengthMsb;
                    }
                }
                ReaderState::LengthMsb => {
                    let byte = Self::read_byte(port)?;
                    // a start delimiter here is a resync, stay
                    if byte != START_DELIMITER {
                        self.length = (byte as usize) << 8;
                        self.state = ReaderState::LengthLsb;
                    }
                }
                ReaderState::LengthLsb => {
                    let byte = Self::read_byte(port)?;
                    self.length |= byte as usize;
                    if valid_length(self.length) {
                        self.received = 0;
                        self.state = ReaderState::Frame;
                    } else {
                        log::warn!("Dropped frame, invalid length {}", self.length);
                        self.state = if byte == START_DELIMITER {
                            ReaderState::LengthMsb
                        } else {
                            ReaderState::WaitStart
                        };
                    }
                }
                ReaderState::Frame => {
                    let total = self.length + 1;
                    let used = port.read(&mut self.buffer[self.received..total]);
                    if used == 0 {
                        return None;
                    }
                    self.received += used;
                    if self.received >= total {
                        self.state = ReaderState::WaitStart;
                        if checksum(&self.buffer[..total], 0xff) != 0 {
                            log::warn!("Dropped frame, invalid checksum");
                            continue;
                        }
                        return Some(&self.buffer[..self.length]);
                    }
                }
            }
        }
    }

    /// Is the reader in the middle of a frame
    pub fn is_idle(&self) -> bool {
        self.state == ReaderState::WaitStart
    }
}
