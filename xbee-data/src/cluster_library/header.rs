use crate::error::Error;
use crate::pack::{Pack, PackFixed};

use byteorder::{ByteOrder, LittleEndian};

/// Frame control bit, cluster specific frame
pub const FRAME_CONTROL_CLUSTER: u8 = 0b0000_0001;
/// Frame control mask, frame type sub-field
pub const FRAME_CONTROL_TYPE_MASK: u8 = 0b0000_0011;
/// Frame control bit, manufacturer specific
pub const FRAME_CONTROL_MANUFACTURER: u8 = 0b0000_0100;
/// Frame control bit, server to client direction
pub const FRAME_CONTROL_DIRECTION: u8 = 0b0000_1000;
/// Frame control bit, default response disabled
pub const FRAME_CONTROL_DISABLE_DEFAULT_RESPONSE: u8 = 0b0001_0000;

// ZCL, 2.4.1.1.1 Frame Type Sub-field
/// Frame type field
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum FrameType {
    /// The command is global for all clusters
    Global = 0b00,
    /// Command is specific or local to a cluster
    Local = 0b01,
}

impl TryFrom<u8> for FrameType {
    type Error = Error;
    /// Get `FrameType` from a `u8`
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value & FRAME_CONTROL_TYPE_MASK {
            0b00 => Ok(FrameType::Global),
            0b01 => Ok(FrameType::Local),
            _ => Err(Error::UnknownFrameType),
        }
    }
}

/// Direction of the command
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Direction {
    /// Sent from the client side to the server side
    ToServer,
    /// Sent from the server side to the client side
    ToClient,
}

impl Direction {
    /// The direction of a response to a command travelling in this direction
    pub fn reverse(self) -> Self {
        match self {
            Direction::ToServer => Direction::ToClient,
            Direction::ToClient => Direction::ToServer,
        }
    }
}

impl From<u8> for Direction {
    /// Get `Direction` from the frame control `u8`
    fn from(value: u8) -> Self {
        if value & FRAME_CONTROL_DIRECTION == FRAME_CONTROL_DIRECTION {
            Direction::ToClient
        } else {
            Direction::ToServer
        }
    }
}

impl From<Direction> for u8 {
    /// Get `u8` from `Direction`
    fn from(value: Direction) -> u8 {
        match value {
            Direction::ToServer => 0,
            Direction::ToClient => FRAME_CONTROL_DIRECTION,
        }
    }
}

// ZCL, 2.4.1.1 Frame Control Field
/// Cluster library frame control field
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FrameControl {
    /// Frame type, see `FrameType`
    pub frame_type: FrameType,
    /// Manufacturer specific command
    pub manufacturer_specific: bool,
    /// Command direction, see `Direction`
    pub direction: Direction,
    /// Disable default response mechanism
    pub disable_default_response: bool,
}

impl FrameControl {
    /// Frame control for a response, the direction is reversed and default
    /// responses are disabled, frame type and manufacturer flag are kept
    pub fn response(&self) -> Self {
        Self {
            frame_type: self.frame_type,
            manufacturer_specific: self.manufacturer_specific,
            direction: self.direction.reverse(),
            disable_default_response: true,
        }
    }
}

impl PackFixed<FrameControl, Error> for FrameControl {
    fn pack(&self, data: &mut [u8]) -> Result<(), Error> {
        if data.len() != 1 {
            Err(Error::WrongNumberOfBytes)
        } else {
            let frame_type = self.frame_type as u8;
            data[0] = frame_type
                | ((self.manufacturer_specific as u8) << 2)
                | u8::from(self.direction)
                | ((self.disable_default_response as u8) << 4);
            Ok(())
        }
    }

    fn unpack(data: &[u8]) -> Result<Self, Error> {
        if data.len() != 1 {
            Err(Error::WrongNumberOfBytes)
        } else {
            let frame_type = FrameType::try_from(data[0])?;
            let manufacturer_specific =
                (data[0] & FRAME_CONTROL_MANUFACTURER) == FRAME_CONTROL_MANUFACTURER;
            let direction = Direction::from(data[0]);
            let disable_default_response = (data[0] & FRAME_CONTROL_DISABLE_DEFAULT_RESPONSE)
                == FRAME_CONTROL_DISABLE_DEFAULT_RESPONSE;
            Ok(Self {
                frame_type,
                manufacturer_specific,
                direction,
                disable_default_response,
            })
        }
    }
}

// ZCL, 2.4.1 General ZCL Frame Format
/// Cluster library frame header
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ClusterLibraryHeader {
    /// Frame control, see `FrameControl`
    pub control: FrameControl,
    /// Optional manufacturer code for manufacturer specific clusters
    pub manufacturer: Option<u16>,
    /// Transaction sequence code
    pub transaction_sequence: u8,
    /// Command identifier
    pub command: u8,
}

impl ClusterLibraryHeader {
    /// Header for the response to the command described by this header
    pub fn response(&self, command: u8) -> Self {
        Self {
            control: self.control.response(),
            manufacturer: self.manufacturer,
            transaction_sequence: self.transaction_sequence,
            command,
        }
    }

    /// Number of bytes the header occupies on the wire
    pub fn size(&self) -> usize {
        if self.manufacturer.is_some() {
            5
        } else {
            3
        }
    }
}

impl Pack<ClusterLibraryHeader, Error> for ClusterLibraryHeader {
    fn pack(&self, data: &mut [u8]) -> Result<usize, Error> {
        let length = self.size();
        if data.len() < length {
            return Err(Error::WrongNumberOfBytes);
        }
        let mut control = self.control;
        control.manufacturer_specific = self.manufacturer.is_some();
        control.pack(&mut data[0..1])?;
        let mut offset = 1;
        if let Some(manufacturer) = self.manufacturer {
            LittleEndian::write_u16(&mut data[offset..offset + 2], manufacturer);
            offset += 2;
        }
        data[offset] = self.transaction_sequence;
        offset += 1;
        data[offset] = self.command;
        offset += 1;
        Ok(offset)
    }

    fn unpack(data: &[u8]) -> Result<(Self, usize), Error> {
        if data.len() < 3 {
            return Err(Error::WrongNumberOfBytes);
        }
        let control = FrameControl::unpack(&data[0..1])?;
        let mut offset = 1;
        let manufacturer = if control.manufacturer_specific {
            if data.len() < 5 {
                return Err(Error::WrongNumberOfBytes);
            }
            let manufacturer = LittleEndian::read_u16(&data[offset..offset + 2]);
            offset += 2;
            Some(manufacturer)
        } else {
            None
        };

        let transaction_sequence = data[offset];
        offset += 1;
        let command = data[offset];
        offset += 1;

        Ok((
            Self {
                control,
                manufacturer,
                transaction_sequence,
                command,
            },
            offset,
        ))
    }
}
