use byteorder::{ByteOrder, LittleEndian};

use crate::common::address::ExtendedAddress;
use crate::pack::{Pack, PackFixed};
use crate::Error;

/// Destination address mode, extended address and endpoint
pub const BIND_ADDRESS_MODE_EXTENDED: u8 = 0x03;

// 2.4.3.2.2 Bind_req and 2.4.3.2.3 Unbind_req
/// Bind or unbind request, always with a extended destination address
#[derive(Clone, Debug, PartialEq)]
pub struct BindRequest {
    /// Source of the binding
    pub source_address: ExtendedAddress,
    /// Source endpoint
    pub source_endpoint: u8,
    /// Cluster bound
    pub cluster: u16,
    /// Destination of the binding
    pub destination_address: ExtendedAddress,
    /// Destination endpoint
    pub destination_endpoint: u8,
}

impl Pack<BindRequest, Error> for BindRequest {
    fn pack(&self, data: &mut [u8]) -> Result<usize, Error> {
        if data.len() < 21 {
            return Err(Error::WrongNumberOfBytes);
        }
        self.source_address.pack(&mut data[0..8])?;
        data[8] = self.source_endpoint;
        LittleEndian::write_u16(&mut data[9..11], self.cluster);
        data[11] = BIND_ADDRESS_MODE_EXTENDED;
        self.destination_address.pack(&mut data[12..20])?;
        data[20] = self.destination_endpoint;
        Ok(21)
    }

    fn unpack(data: &[u8]) -> Result<(Self, usize), Error> {
        if data.len() < 21 {
            return Err(Error::WrongNumberOfBytes);
        }
        if data[11] != BIND_ADDRESS_MODE_EXTENDED {
            return Err(Error::InvalidValue);
        }
        Ok((
            Self {
                source_address: ExtendedAddress::unpack(&data[0..8])?,
                source_endpoint: data[8],
                cluster: LittleEndian::read_u16(&data[9..11]),
                destination_address: ExtendedAddress::unpack(&data[12..20])?,
                destination_endpoint: data[20],
            },
            21,
        ))
    }
}
