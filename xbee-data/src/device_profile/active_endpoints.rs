use core::convert::TryFrom;

use heapless::Vec;

use crate::common::address::NetworkAddress;
use crate::device_profile::Status;
use crate::pack::{Pack, PackFixed};
use crate::Error;

/// Most endpoints listed in a active endpoint response
pub const ENDPOINT_LIST_MAX: usize = 32;

// 2.4.3.1.6 Active_EP_req
/// Active endpoint request
/// Requests the active endpoints for a remote device
#[derive(Clone, Debug, PartialEq)]
pub struct ActiveEndpointRequest {
    /// Network address of interest
    pub address: NetworkAddress,
}

impl Pack<ActiveEndpointRequest, Error> for ActiveEndpointRequest {
    fn pack(&self, data: &mut [u8]) -> Result<usize, Error> {
        if data.len() < 2 {
            return Err(Error::WrongNumberOfBytes);
        }
        self.address.pack(&mut data[0..2])?;
        Ok(2)
    }

    fn unpack(data: &[u8]) -> Result<(Self, usize), Error> {
        if data.len() < 2 {
            return Err(Error::WrongNumberOfBytes);
        }
        let address = NetworkAddress::unpack(&data[0..2])?;
        Ok((Self { address }, 2))
    }
}

// 2.4.4.2.6 Active_EP_rsp
/// Active endpoint response
/// Response to a active endpoint request
#[derive(Clone, Debug, PartialEq)]
pub struct ActiveEndpointResponse {
    /// Response status
    pub status: Status,
    /// Network address of interest
    pub address: NetworkAddress,
    /// Active endpoints
    pub endpoints: Vec<u8, ENDPOINT_LIST_MAX>,
}

impl ActiveEndpointResponse {
    /// Successful response listing the endpoints, the list is truncated to
    /// `ENDPOINT_LIST_MAX` entries
    pub fn success_response(address: NetworkAddress, endpoints: &[u8]) -> Self {
        let count = core::cmp::min(endpoints.len(), ENDPOINT_LIST_MAX);
        let mut list = Vec::new();
        for endpoint in &endpoints[..count] {
            let _ = list.push(*endpoint);
        }
        Self {
            status: Status::Success,
            address,
            endpoints: list,
        }
    }

    /// Response with a failure status and no endpoints
    pub fn failure_response(status: Status, address: NetworkAddress) -> Self {
        Self {
            status,
            address,
            endpoints: Vec::new(),
        }
    }
}

impl Pack<ActiveEndpointResponse, Error> for ActiveEndpointResponse {
    fn pack(&self, data: &mut [u8]) -> Result<usize, Error> {
        let count = if self.status == Status::Success {
            self.endpoints.len()
        } else {
            0
        };
        if data.len() < 4 + count {
            return Err(Error::WrongNumberOfBytes);
        }
        data[0] = u8::from(self.status);
        self.address.pack(&mut data[1..3])?;
        data[3] = count as u8;
        let end = 4 + count;
        data[4..end].copy_from_slice(&self.endpoints[..count]);
        Ok(end)
    }

    fn unpack(data: &[u8]) -> Result<(Self, usize), Error> {
        if data.len() < 4 {
            return Err(Error::WrongNumberOfBytes);
        }
        let status = Status::try_from(data[0])?;
        let address = NetworkAddress::unpack(&data[1..3])?;
        let count = if status == Status::Success {
            data[3] as usize
        } else {
            0
        };
        if data.len() < 4 + count {
            return Err(Error::WrongNumberOfBytes);
        }
        let endpoints =
            Vec::from_slice(&data[4..4 + count]).map_err(|_| Error::NotEnoughSpace)?;
        Ok((
            Self {
                status,
                address,
                endpoints,
            },
            4 + count,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unpack_active_endpoint_request() {
        let data = [0x96, 0x1f];
        let (req, used) = ActiveEndpointRequest::unpack(&data[..]).unwrap();
        assert_eq!(used, 2);
        assert_eq!(req.address, 0x1f96);
    }

    #[test]
    fn unpack_active_endpoint_response_success() {
        let data = [0x00, 0x45, 0x78, 0x04, 0x01, 0x10, 0x0f, 0x20];
        let (rsp, used) = ActiveEndpointResponse::unpack(&data[..]).unwrap();
        assert_eq!(used, 8);
        assert_eq!(rsp.status, Status::Success);
        assert_eq!(rsp.address, 0x7845);
        assert_eq!(rsp.endpoints[..], [0x01, 0x10, 0x0f, 0x20]);
    }

    #[test]
    fn unpack_active_endpoint_response_error() {
        let data = [0x80, 0x54, 0x76, 0x00];
        let (rsp, used) = ActiveEndpointResponse::unpack(&data[..]).unwrap();
        assert_eq!(used, 4);
        assert_eq!(rsp.status, Status::InvalidRequestType);
        assert_eq!(rsp.address, 0x7654);
        assert!(rsp.endpoints.is_empty());
    }

    #[test]
    fn pack_active_endpoint_response_success() {
        let response =
            ActiveEndpointResponse::success_response(NetworkAddress::from(0xcdfe), &[0x01, 0x02]);
        let mut data = [0u8; 6];
        let used = response.pack(&mut data[..]).unwrap();
        assert_eq!(used, 6);
        assert_eq!(data, [0x00, 0xfe, 0xcd, 0x02, 0x01, 0x02]);
    }

    #[test]
    fn pack_active_endpoint_response_error() {
        let response = ActiveEndpointResponse::failure_response(
            Status::InvalidRequestType,
            NetworkAddress::from(0xcdfe),
        );
        let mut data = [0u8; 4];
        let used = response.pack(&mut data[..]).unwrap();
        assert_eq!(used, 4);
        assert_eq!(data, [0x80, 0xfe, 0xcd, 0x00]);
    }
}
