use core::convert::TryFrom;

use byteorder::{ByteOrder, LittleEndian};
use heapless::Vec;

use crate::common::address::NetworkAddress;
use crate::device_profile::simple_descriptor::{pack_cluster_list, unpack_cluster_list};
use crate::device_profile::{ClusterList, Status};
use crate::pack::{Pack, PackFixed};
use crate::Error;

/// Most endpoints listed in a match descriptor response
pub const MATCH_LIST_MAX: usize = 20;

// 2.4.3.1.7 Match_Desc_req
/// Match descriptor request
/// Requests simple descriptors for devices matching the requested requirements
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MatchDescriptorRequest {
    /// Network address of interest
    pub address: NetworkAddress,
    /// Profile to match
    pub profile: u16,
    /// Server clusters to match
    pub input_clusters: ClusterList,
    /// Client clusters to match
    pub output_clusters: ClusterList,
}

impl Pack<MatchDescriptorRequest, Error> for MatchDescriptorRequest {
    fn pack(&self, data: &mut [u8]) -> Result<usize, Error> {
        let num_clusters = self.input_clusters.len() + self.output_clusters.len();
        if data.len() < 6 + (num_clusters * 2) {
            return Err(Error::WrongNumberOfBytes);
        }
        self.address.pack(&mut data[0..2])?;
        LittleEndian::write_u16(&mut data[2..4], self.profile);
        let mut offset = 4;
        offset += pack_cluster_list(&self.input_clusters, &mut data[offset..])?;
        offset += pack_cluster_list(&self.output_clusters, &mut data[offset..])?;
        Ok(offset)
    }

    fn unpack(data: &[u8]) -> Result<(Self, usize), Error> {
        if data.len() < 6 {
            return Err(Error::WrongNumberOfBytes);
        }
        let address = NetworkAddress::unpack(&data[0..2])?;
        let profile = LittleEndian::read_u16(&data[2..4]);
        let mut offset = 4;
        let (input_clusters, used) = unpack_cluster_list(&data[offset..])?;
        offset += used;
        let (output_clusters, used) = unpack_cluster_list(&data[offset..])?;
        offset += used;
        Ok((
            Self {
                address,
                profile,
                input_clusters,
                output_clusters,
            },
            offset,
        ))
    }
}

// 2.4.4.2.7 Match_Desc_rsp
/// Match descriptor response
/// Lists the endpoints matching a match descriptor request
#[derive(Clone, Debug, PartialEq)]
pub struct MatchDescriptorResponse {
    /// Response status
    pub status: Status,
    /// Network address of interest
    pub address: NetworkAddress,
    /// Matching endpoints
    pub list: Vec<u8, MATCH_LIST_MAX>,
}

impl Pack<MatchDescriptorResponse, Error> for MatchDescriptorResponse {
    fn pack(&self, data: &mut [u8]) -> Result<usize, Error> {
        let num_entries = self.list.len();
        if data.len() < 4 + num_entries {
            return Err(Error::WrongNumberOfBytes);
        }
        data[0] = u8::from(self.status);
        self.address.pack(&mut data[1..=2])?;
        data[3] = num_entries as u8;
        data[4..4 + num_entries].copy_from_slice(&self.list);
        Ok(4 + num_entries)
    }

    fn unpack(data: &[u8]) -> Result<(Self, usize), Error> {
        if data.len() < 4 {
            return Err(Error::WrongNumberOfBytes);
        }
        let status = Status::try_from(data[0])?;
        let address = NetworkAddress::unpack(&data[1..=2])?;
        let num_entries = data[3] as usize;
        if data.len() < 4 + num_entries {
            return Err(Error::WrongNumberOfBytes);
        }
        let list = Vec::from_slice(&data[4..4 + num_entries]).map_err(|_| Error::NotEnoughSpace)?;
        Ok((
            Self {
                status,
                address,
                list,
            },
            4 + num_entries,
        ))
    }
}
