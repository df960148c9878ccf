//! # XBee API frames
//!
//! A frame on the serial link looks like,
//!
//! ```text
//! 0x7e | length (BE u16) | type | [id] | payload ... | checksum
//! ```
//!
//! The length covers everything from the type byte up to, not including,
//! the checksum.

mod at_command;
mod explicit;
mod modem_status;
mod transmit_status;

pub use at_command::{AtCommand, AtCommandRequest, AtCommandResponse, AtCommandStatus};
pub use explicit::{
    ExplicitReceiveHeader, ExplicitTransmitHeader, ReceiveOptions, TransmitOptions,
    EXPLICIT_RECEIVE_HEADER_SIZE, EXPLICIT_TRANSMIT_HEADER_SIZE,
};
pub use modem_status::ModemStatus;
pub use transmit_status::{DeliveryStatus, TransmitStatus};

use crate::Error;

/// Start of frame marker
pub const START_DELIMITER: u8 = 0x7e;
/// Largest RF payload carried in a frame
pub const MAX_RF_PAYLOAD: usize = 128;
/// Largest frame accepted, RF payload plus the largest header
pub const MAX_FRAME_LENGTH: usize = MAX_RF_PAYLOAD + 18;
/// Smallest frame accepted, type plus one byte
pub const MIN_FRAME_LENGTH: usize = 2;
/// Bytes framing the content, start delimiter, length and checksum
pub const FRAME_OVERHEAD: usize = 4;

extended_enum!(
    /// XBee API frame types, types with the upper bit set are sent by the
    /// module
    FrameType, u8,
    /// AT command for the local module
    LocalAtCommand => 0x08,
    /// Queued AT command for the local module
    LocalAtCommandQueued => 0x09,
    /// Transmit to the default endpoint and cluster
    Transmit => 0x10,
    /// Transmit with explicit addressing
    TransmitExplicit => 0x11,
    /// AT command for a remote module
    RemoteAtCommand => 0x17,
    /// Response to a local AT command
    LocalAtCommandResponse => 0x88,
    /// Modem status
    ModemStatus => 0x8a,
    /// Status of a transmit request
    TransmitStatus => 0x8b,
    /// Received data
    Receive => 0x90,
    /// Received data with explicit addressing
    ReceiveExplicit => 0x91,
    /// Response to a remote AT command
    RemoteAtCommandResponse => 0x97,
);

/// Fold bytes into a checksum, `initial - sum(data)` modulo 256
///
/// Seed with 0xff to build the checksum for outgoing content. A received
/// content plus checksum byte is valid when it folds to zero from a seed
/// of 0xff.
pub fn checksum(data: &[u8], initial: u8) -> u8 {
    data.iter().fold(initial, |sum, b| sum.wrapping_sub(*b))
}

/// Check a frame length against the bounds of the API
pub fn valid_length(length: usize) -> bool {
    (MIN_FRAME_LENGTH..=MAX_FRAME_LENGTH).contains(&length)
}

/// Write a complete frame, header followed by payload, into `data`
///
/// Returns the number of bytes written, including the framing.
pub fn pack_frame(header: &[u8], payload: &[u8], data: &mut [u8]) -> Result<usize, Error> {
    let length = header.len() + payload.len();
    if length == 0 {
        return Err(Error::WrongNumberOfBytes);
    }
    if length > MAX_FRAME_LENGTH {
        return Err(Error::InvalidLength);
    }
    let total = length + FRAME_OVERHEAD;
    if data.len() < total {
        return Err(Error::NotEnoughSpace);
    }
    data[0] = START_DELIMITER;
    data[1] = (length >> 8) as u8;
    data[2] = (length & 0xff) as u8;
    let header_end = 3 + header.len();
    data[3..header_end].copy_from_slice(header);
    data[header_end..header_end + payload.len()].copy_from_slice(payload);
    let sum = checksum(header, 0xff);
    data[total - 1] = checksum(payload, sum);
    Ok(total)
}

/// Extract the content of a complete frame, verifying length and checksum
pub fn unpack_frame(data: &[u8]) -> Result<&[u8], Error> {
    if data.len() < FRAME_OVERHEAD + MIN_FRAME_LENGTH || data[0] != START_DELIMITER {
        return Err(Error::WrongNumberOfBytes);
    }
    let length = ((data[1] as usize) << 8) | data[2] as usize;
    if !valid_length(length) {
        return Err(Error::InvalidLength);
    }
    if data.len() < length + FRAME_OVERHEAD {
        return Err(Error::WrongNumberOfBytes);
    }
    if checksum(&data[3..3 + length + 1], 0xff) != 0 {
        return Err(Error::InvalidChecksum);
    }
    Ok(&data[3..3 + length])
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::TryFrom;

    #[test]
    fn checksum_modem_status() {
        assert_eq!(checksum(&[0x8a, 0x06], 0xff), 0x6f);
        assert_eq!(checksum(&[0x8a, 0x06, 0x6f], 0xff), 0x00);
    }

    #[test]
    fn pack_modem_status() {
        let mut data = [0u8; 16];
        let used = pack_frame(&[0x8a], &[0x06], &mut data).unwrap();
        assert_eq!(used, 6);
        assert_eq!(data[..used], [0x7e, 0x00, 0x02, 0x8a, 0x06, 0x6f]);
        let content = unpack_frame(&data[..used]).unwrap();
        assert_eq!(content, [0x8a, 0x06]);
    }

    #[test]
    fn frame_corruption() {
        let payload = [0x91, 0x00, 0x13, 0xa2, 0x00, 0x40, 0x52, 0x2b, 0xaa, 0x7d];
        let mut data = [0u8; 32];
        let used = pack_frame(&payload[..1], &payload[1..], &mut data).unwrap();
        assert_eq!(unpack_frame(&data[..used]).unwrap(), payload);
        for n in 3..used {
            let mut corrupt = data;
            corrupt[n] ^= 0x10;
            assert_eq!(
                unpack_frame(&corrupt[..used]),
                Err(Error::InvalidChecksum),
                "corrupted byte {}",
                n
            );
        }
    }

    #[test]
    fn frame_length_bounds() {
        assert!(!valid_length(0));
        assert!(!valid_length(1));
        assert!(valid_length(2));
        assert!(valid_length(MAX_FRAME_LENGTH));
        assert!(!valid_length(MAX_FRAME_LENGTH + 1));

        let mut data = [0u8; 256];
        let payload = [0u8; MAX_FRAME_LENGTH];
        assert_eq!(
            pack_frame(&[0x11], &payload, &mut data),
            Err(Error::InvalidLength)
        );
        assert_eq!(
            pack_frame(&[], &[], &mut data),
            Err(Error::WrongNumberOfBytes)
        );
        assert_eq!(
            pack_frame(&[0x11], &payload[..10], &mut data[..10]),
            Err(Error::NotEnoughSpace)
        );
    }

    #[test]
    fn frame_type() {
        assert_eq!(FrameType::try_from(0x91u8), Ok(FrameType::ReceiveExplicit));
        assert_eq!(u8::from(FrameType::TransmitExplicit), 0x11);
        assert_eq!(FrameType::try_from(0x42u8), Err(Error::InvalidValue));
    }
}
