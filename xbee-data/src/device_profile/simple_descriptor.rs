use byteorder::{ByteOrder, LittleEndian};
use heapless::Vec;

use crate::common::address::NetworkAddress;
use crate::device_profile::Status;
use crate::pack::{Pack, PackFixed};
use crate::Error;

/// Most clusters listed per direction in a simple descriptor
pub const DESCRIPTOR_CLUSTERS_MAX: usize = 32;

/// List of cluster identifiers
pub type ClusterList = Vec<u16, DESCRIPTOR_CLUSTERS_MAX>;

pub(crate) fn pack_cluster_list(clusters: &[u16], data: &mut [u8]) -> Result<usize, Error> {
    let size = 1 + clusters.len() * 2;
    if data.len() < size {
        return Err(Error::WrongNumberOfBytes);
    }
    data[0] = clusters.len() as u8;
    let mut offset = 1;
    for cluster in clusters {
        LittleEndian::write_u16(&mut data[offset..offset + 2], *cluster);
        offset += 2;
    }
    Ok(offset)
}

pub(crate) fn unpack_cluster_list(data: &[u8]) -> Result<(ClusterList, usize), Error> {
    if data.is_empty() {
        return Err(Error::WrongNumberOfBytes);
    }
    let count = data[0] as usize;
    if data.len() < 1 + count * 2 {
        return Err(Error::WrongNumberOfBytes);
    }
    let mut clusters = ClusterList::new();
    let mut offset = 1;
    for _ in 0..count {
        clusters
            .push(LittleEndian::read_u16(&data[offset..offset + 2]))
            .map_err(|_| Error::NotEnoughSpace)?;
        offset += 2;
    }
    Ok((clusters, offset))
}

// 2.3.2.5 Simple Descriptor
/// Simple descriptor for a node endpoint
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimpleDescriptor {
    /// Endpoint described
    pub endpoint: u8,
    /// Profile identifier
    pub profile: u16,
    /// Device identifier
    pub device: u16,
    /// Device version, 4 bits
    pub device_version: u8,
    /// Server clusters implemented by the device
    pub input_clusters: ClusterList,
    /// Client clusters implemented by the device
    pub output_clusters: ClusterList,
}

impl Pack<SimpleDescriptor, Error> for SimpleDescriptor {
    fn pack(&self, data: &mut [u8]) -> Result<usize, Error> {
        let size = 8 + self.input_clusters.len() * 2 + self.output_clusters.len() * 2;
        if data.len() < size {
            return Err(Error::WrongNumberOfBytes);
        }
        data[0] = self.endpoint;
        LittleEndian::write_u16(&mut data[1..3], self.profile);
        LittleEndian::write_u16(&mut data[3..5], self.device);
        data[5] = self.device_version & 0x0f;
        let mut offset = 6;
        offset += pack_cluster_list(&self.input_clusters, &mut data[offset..])?;
        offset += pack_cluster_list(&self.output_clusters, &mut data[offset..])?;
        Ok(offset)
    }

    fn unpack(data: &[u8]) -> Result<(Self, usize), Error> {
        if data.len() < 8 {
            return Err(Error::WrongNumberOfBytes);
        }
        let endpoint = data[0];
        let profile = LittleEndian::read_u16(&data[1..3]);
        let device = LittleEndian::read_u16(&data[3..5]);
        let device_version = data[5] & 0x0f;
        let mut offset = 6;
        let (input_clusters, used) = unpack_cluster_list(&data[offset..])?;
        offset += used;
        let (output_clusters, used) = unpack_cluster_list(&data[offset..])?;
        offset += used;
        Ok((
            Self {
                endpoint,
                profile,
                device,
                device_version,
                input_clusters,
                output_clusters,
            },
            offset,
        ))
    }
}

// 2.4.3.1.5 Simple_Desc_req
/// Simple descriptor request
/// Requests the simple descriptor for a remote device endpoint
#[derive(Clone, Debug, PartialEq)]
pub struct SimpleDescriptorRequest {
    /// Network address of interest
    pub address: NetworkAddress,
    /// Endpoint of interest
    pub endpoint: u8,
}

impl Pack<SimpleDescriptorRequest, Error> for SimpleDescriptorRequest {
    fn pack(&self, data: &mut [u8]) -> Result<usize, Error> {
        if data.len() < 3 {
            return Err(Error::WrongNumberOfBytes);
        }
        self.address.pack(&mut data[0..2])?;
        data[2] = self.endpoint;
        Ok(3)
    }

    fn unpack(data: &[u8]) -> Result<(Self, usize), Error> {
        if data.len() < 3 {
            return Err(Error::WrongNumberOfBytes);
        }
        let address = NetworkAddress::unpack(&data[0..2])?;
        let endpoint = data[2];
        Ok((Self { address, endpoint }, 3))
    }
}

// 2.4.4.2.5 Simple_Desc_rsp
/// Simple descriptor response
/// Response to a simple descriptor request
#[derive(Clone, Debug, PartialEq)]
pub struct SimpleDescriptorResponse {
    /// Response status
    pub status: Status,
    /// Network address of interest
    pub address: NetworkAddress,
    /// The descriptor, only for successful responses
    pub descriptor: Option<SimpleDescriptor>,
}

impl Pack<SimpleDescriptorResponse, Error> for SimpleDescriptorResponse {
    fn pack(&self, data: &mut [u8]) -> Result<usize, Error> {
        if data.len() < 4 {
            return Err(Error::WrongNumberOfBytes);
        }
        data[0] = u8::from(self.status);
        self.address.pack(&mut data[1..3])?;
        let size = match (&self.descriptor, self.status) {
            (Some(descriptor), Status::Success) => {
                let size = descriptor.pack(&mut data[4..])?;
                data[3] = size as u8;
                size + 4
            }
            (_, _) => {
                data[3] = 0;
                4
            }
        };
        Ok(size)
    }

    fn unpack(data: &[u8]) -> Result<(Self, usize), Error> {
        if data.len() < 4 {
            return Err(Error::WrongNumberOfBytes);
        }
        let status = Status::try_from(data[0])?;
        let address = NetworkAddress::unpack(&data[1..3])?;
        let length = data[3] as usize;
        if data.len() < length + 4 {
            return Err(Error::WrongNumberOfBytes);
        }
        let (descriptor, size) = if status == Status::Success && length > 0 {
            let (descriptor, _) = SimpleDescriptor::unpack(&data[4..4 + length])?;
            (Some(descriptor), length + 4)
        } else {
            (None, 4)
        };
        Ok((
            Self {
                status,
                address,
                descriptor,
            },
            size,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unpack_simple_descriptor() {
        let data = [
            0x01, 0x23, 0x01, 0xdc, 0xfe, 0x0f, 0x03, 0x00, 0x00, 0x01, 0x00, 0x02, 0x00, 0x04,
            0xff, 0xff, 0x01, 0x80, 0x00, 0x00, 0xf0, 0x0f,
        ];
        let (descriptor, used) = SimpleDescriptor::unpack(&data[..]).unwrap();
        assert_eq!(used, 22);
        assert_eq!(descriptor.endpoint, 0x01);
        assert_eq!(descriptor.profile, 0x0123);
        assert_eq!(descriptor.device, 0xfedc);
        assert_eq!(descriptor.device_version, 0x0f);
        assert_eq!(descriptor.input_clusters[..], [0x0000, 0x0001, 0x0002]);
        assert_eq!(descriptor.output_clusters[..], [0xffff, 0x8001, 0x0000, 0x0ff0]);
    }

    #[test]
    fn unpack_simple_descriptor_request() {
        let data = [0x96, 0x1f, 0x01];
        let (req, used) = SimpleDescriptorRequest::unpack(&data[..]).unwrap();
        assert_eq!(used, 3);
        assert_eq!(req.address, 0x1f96);
        assert_eq!(req.endpoint, 0x01);
    }

    #[test]
    fn pack_simple_descriptor_response_success() {
        let mut descriptor = SimpleDescriptor {
            endpoint: 0x02,
            profile: 0x5678,
            device: 0x1234,
            device_version: 0x0f,
            ..Default::default()
        };
        descriptor.input_clusters.extend_from_slice(&[0x0001, 0x0002]).unwrap();
        descriptor.output_clusters.extend_from_slice(&[0x0003, 0x0004]).unwrap();
        let response = SimpleDescriptorResponse {
            status: Status::Success,
            address: NetworkAddress::from(0xfffe),
            descriptor: Some(descriptor.clone()),
        };

        let mut data = [0u8; 20];
        let used = response.pack(&mut data[..]).unwrap();
        assert_eq!(used, 20);
        assert_eq!(
            data,
            [
                0x00, 0xfe, 0xff, 16, 0x02, 0x78, 0x56, 0x34, 0x12, 0x0f, 2, 0x01, 0x00, 0x02,
                0x00, 2, 0x03, 0x00, 0x04, 0x00
            ]
        );
        let (unpacked, used) = SimpleDescriptorResponse::unpack(&data).unwrap();
        assert_eq!(used, 20);
        assert_eq!(unpacked.descriptor, Some(descriptor));
    }

    #[test]
    fn pack_simple_descriptor_response_error() {
        let response = SimpleDescriptorResponse {
            status: Status::InvalidEndpoint,
            address: NetworkAddress::from(0xfffe),
            descriptor: None,
        };
        let mut data = [0u8; 4];
        let used = response.pack(&mut data[..]).unwrap();
        assert_eq!(used, 4);
        assert_eq!(data, [0x82, 0xfe, 0xff, 0x00]);
    }
}
