use core::convert::TryFrom;

use crate::pack::Pack;
use crate::Error;

/// Two character AT command
pub type AtCommand = [u8; 2];

extended_enum!(
    /// Status of a AT command response
    AtCommandStatus, u8,
    /// Command was accepted
    Ok => 0x00,
    /// Command failed
    Error => 0x01,
    /// Unknown command
    InvalidCommand => 0x02,
    /// Invalid parameter
    InvalidParameter => 0x03,
);

/// Local AT command request header, frame 0x08, parameter bytes follow
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AtCommandRequest {
    /// Frame identifier, 0 for no response
    pub frame_id: u8,
    /// Command
    pub command: AtCommand,
}

impl Pack<AtCommandRequest, Error> for AtCommandRequest {
    fn pack(&self, data: &mut [u8]) -> Result<usize, Error> {
        if data.len() < 4 {
            return Err(Error::NotEnoughSpace);
        }
        data[0] = 0x08;
        data[1] = self.frame_id;
        data[2..4].copy_from_slice(&self.command);
        Ok(4)
    }

    fn unpack(data: &[u8]) -> Result<(Self, usize), Error> {
        if data.len() < 4 {
            return Err(Error::WrongNumberOfBytes);
        }
        if data[0] != 0x08 && data[0] != 0x09 {
            return Err(Error::UnknownFrameType);
        }
        Ok((
            Self {
                frame_id: data[1],
                command: [data[2], data[3]],
            },
            4,
        ))
    }
}

/// Local AT command response header, frame 0x88, value bytes follow
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AtCommandResponse {
    /// Frame identifier of the request
    pub frame_id: u8,
    /// Command
    pub command: AtCommand,
    /// Result of the command
    pub status: AtCommandStatus,
}

impl AtCommandResponse {
    /// Read a big endian value of up to eight bytes from the response value
    pub fn value(value: &[u8]) -> Option<u64> {
        if value.is_empty() || value.len() > 8 {
            return None;
        }
        Some(value.iter().fold(0u64, |v, b| (v << 8) | u64::from(*b)))
    }
}

impl Pack<AtCommandResponse, Error> for AtCommandResponse {
    fn pack(&self, data: &mut [u8]) -> Result<usize, Error> {
        if data.len() < 5 {
            return Err(Error::NotEnoughSpace);
        }
        data[0] = 0x88;
        data[1] = self.frame_id;
        data[2..4].copy_from_slice(&self.command);
        data[4] = u8::from(self.status);
        Ok(5)
    }

    fn unpack(data: &[u8]) -> Result<(Self, usize), Error> {
        if data.len() < 5 {
            return Err(Error::WrongNumberOfBytes);
        }
        if data[0] != 0x88 {
            return Err(Error::UnknownFrameType);
        }
        Ok((
            Self {
                frame_id: data[1],
                command: [data[2], data[3]],
                status: AtCommandStatus::try_from(data[4])?,
            },
            5,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_at_command_request() {
        let mut data = [0u8; 8];
        let request = AtCommandRequest {
            frame_id: 0x52,
            command: *b"MY",
        };
        let used = request.pack(&mut data).unwrap();
        assert_eq!(used, 4);
        assert_eq!(data[..4], [0x08, 0x52, b'M', b'Y']);
    }

    #[test]
    fn unpack_at_command_response() {
        let data = [0x88, 0x01, b'S', b'H', 0x00, 0x00, 0x13, 0xa2, 0x00];
        let (response, used) = AtCommandResponse::unpack(&data).unwrap();
        assert_eq!(used, 5);
        assert_eq!(response.frame_id, 0x01);
        assert_eq!(&response.command, b"SH");
        assert_eq!(response.status, AtCommandStatus::Ok);
        assert_eq!(AtCommandResponse::value(&data[used..]), Some(0x0013_a200));
        assert_eq!(AtCommandResponse::value(&[]), None);

        let data = [0x88, 0x02, b'M', b'Y', 0x01];
        let (response, _) = AtCommandResponse::unpack(&data).unwrap();
        assert_eq!(response.status, AtCommandStatus::Error);
    }
}
