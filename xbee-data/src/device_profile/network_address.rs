use core::convert::TryFrom;

use crate::common::address::{ExtendedAddress, NetworkAddress};
use crate::device_profile::Status;
use crate::pack::{Pack, PackFixed};
use crate::Error;

extended_enum!(
    /// Kind of address response requested
    RequestType, u8,
    /// Only the address of the device of interest
    SingleDevice => 0x00,
    /// The address of the device and its associated devices
    Extended => 0x01,
);

// 2.4.3.1.1 NWK_addr_req
/// Network address request
/// Requests the network address for a remote device
#[derive(Clone, Debug, PartialEq)]
pub struct NetworkAddressRequest {
    /// Extended address of the device of interest
    pub address: ExtendedAddress,
    /// Request type
    pub request_type: RequestType,
    /// Start index into the associated devices
    pub start_index: u8,
}

impl Pack<NetworkAddressRequest, Error> for NetworkAddressRequest {
    fn pack(&self, data: &mut [u8]) -> Result<usize, Error> {
        if data.len() < 10 {
            return Err(Error::WrongNumberOfBytes);
        }
        self.address.pack(&mut data[0..8])?;
        data[8] = u8::from(self.request_type);
        data[9] = self.start_index;
        Ok(10)
    }

    fn unpack(data: &[u8]) -> Result<(Self, usize), Error> {
        if data.len() < 10 {
            return Err(Error::WrongNumberOfBytes);
        }
        let address = ExtendedAddress::unpack(&data[0..8])?;
        let request_type = RequestType::try_from(data[8])?;
        Ok((
            Self {
                address,
                request_type,
                start_index: data[9],
            },
            10,
        ))
    }
}

// 2.4.3.1.2 IEEE_addr_req
/// Extended (IEEE) address request
/// Requests the extended address for a remote device
#[derive(Clone, Debug, PartialEq)]
pub struct ExtendedAddressRequest {
    /// Network address of the device of interest
    pub address: NetworkAddress,
    /// Request type
    pub request_type: RequestType,
    /// Start index into the associated devices
    pub start_index: u8,
}

impl Pack<ExtendedAddressRequest, Error> for ExtendedAddressRequest {
    fn pack(&self, data: &mut [u8]) -> Result<usize, Error> {
        if data.len() < 4 {
            return Err(Error::WrongNumberOfBytes);
        }
        self.address.pack(&mut data[0..2])?;
        data[2] = u8::from(self.request_type);
        data[3] = self.start_index;
        Ok(4)
    }

    fn unpack(data: &[u8]) -> Result<(Self, usize), Error> {
        if data.len() < 4 {
            return Err(Error::WrongNumberOfBytes);
        }
        let address = NetworkAddress::unpack(&data[0..2])?;
        let request_type = RequestType::try_from(data[2])?;
        Ok((
            Self {
                address,
                request_type,
                start_index: data[3],
            },
            4,
        ))
    }
}

// 2.4.4.2.1 NWK_addr_rsp and 2.4.4.2.2 IEEE_addr_rsp
/// Network and IEEE address response
///
/// Only the single device part is decoded, any list of associated devices
/// is skipped.
#[derive(Clone, Debug, PartialEq)]
pub struct AddressResponse {
    /// Response status
    pub status: Status,
    /// Extended address of the device of interest
    pub extended_address: ExtendedAddress,
    /// Network address of the device of interest
    pub network_address: NetworkAddress,
}

impl Pack<AddressResponse, Error> for AddressResponse {
    fn pack(&self, data: &mut [u8]) -> Result<usize, Error> {
        if data.len() < 11 {
            return Err(Error::WrongNumberOfBytes);
        }
        data[0] = u8::from(self.status);
        self.extended_address.pack(&mut data[1..9])?;
        self.network_address.pack(&mut data[9..11])?;
        Ok(11)
    }

    fn unpack(data: &[u8]) -> Result<(Self, usize), Error> {
        if data.len() < 11 {
            return Err(Error::WrongNumberOfBytes);
        }
        let status = Status::try_from(data[0])?;
        let extended_address = ExtendedAddress::unpack(&data[1..9])?;
        let network_address = NetworkAddress::unpack(&data[9..11])?;
        Ok((
            Self {
                status,
                extended_address,
                network_address,
            },
            data.len(),
        ))
    }
}
