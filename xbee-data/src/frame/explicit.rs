//! Explicit addressing frames, these carry the Z**bee application layer
//! addressing, endpoints, cluster and profile.

use byteorder::{BigEndian, ByteOrder};

use crate::common::address::{ExtendedAddress, NetworkAddress};
use crate::pack::Pack;
use crate::Error;

/// Size of the explicit receive header, including the frame type
pub const EXPLICIT_RECEIVE_HEADER_SIZE: usize = 18;
/// Size of the explicit transmit header, including the frame type
pub const EXPLICIT_TRANSMIT_HEADER_SIZE: usize = 20;

bitflags! {
    /// Options of a received frame
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ReceiveOptions: u8 {
        /// The packet was acknowledged
        const ACKNOWLEDGED = 0x01;
        /// The packet was a broadcast
        const BROADCAST = 0x02;
        /// The packet was APS encrypted
        const APS_ENCRYPTED = 0x20;
    }
}

bitflags! {
    /// Options for a transmit request
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct TransmitOptions: u8 {
        /// Do not retry or wait for a acknowledge
        const DISABLE_ACK = 0x01;
        /// Use APS encryption
        const APS_ENCRYPT = 0x20;
        /// Use the extended transmission timeout
        const EXTENDED_TIMEOUT = 0x40;
    }
}

/// Explicit receive header, frame 0x91, the payload follows
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExplicitReceiveHeader {
    /// Sender IEEE address
    pub extended_address: ExtendedAddress,
    /// Sender network address
    pub network_address: NetworkAddress,
    /// Sender endpoint
    pub source_endpoint: u8,
    /// Destination endpoint
    pub destination_endpoint: u8,
    /// Cluster identifier
    pub cluster: u16,
    /// Profile identifier
    pub profile: u16,
    /// Receive options
    pub options: ReceiveOptions,
}

impl Pack<ExplicitReceiveHeader, Error> for ExplicitReceiveHeader {
    fn pack(&self, data: &mut [u8]) -> Result<usize, Error> {
        if data.len() < EXPLICIT_RECEIVE_HEADER_SIZE {
            return Err(Error::NotEnoughSpace);
        }
        data[0] = 0x91;
        self.extended_address.write_be(&mut data[1..9]);
        self.network_address.write_be(&mut data[9..11]);
        data[11] = self.source_endpoint;
        data[12] = self.destination_endpoint;
        BigEndian::write_u16(&mut data[13..15], self.cluster);
        BigEndian::write_u16(&mut data[15..17], self.profile);
        data[17] = self.options.bits();
        Ok(EXPLICIT_RECEIVE_HEADER_SIZE)
    }

    fn unpack(data: &[u8]) -> Result<(Self, usize), Error> {
        if data.len() < EXPLICIT_RECEIVE_HEADER_SIZE {
            return Err(Error::WrongNumberOfBytes);
        }
        if data[0] != 0x91 {
            return Err(Error::UnknownFrameType);
        }
        Ok((
            Self {
                extended_address: ExtendedAddress::read_be(&data[1..9]),
                network_address: NetworkAddress::read_be(&data[9..11]),
                source_endpoint: data[11],
                destination_endpoint: data[12],
                cluster: BigEndian::read_u16(&data[13..15]),
                profile: BigEndian::read_u16(&data[15..17]),
                options: ReceiveOptions::from_bits_truncate(data[17]),
            },
            EXPLICIT_RECEIVE_HEADER_SIZE,
        ))
    }
}

/// Explicit transmit header, frame 0x11, the payload follows
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExplicitTransmitHeader {
    /// Frame identifier, 0 for no transmit status
    pub frame_id: u8,
    /// Destination IEEE address
    pub extended_address: ExtendedAddress,
    /// Destination network address
    pub network_address: NetworkAddress,
    /// Source endpoint
    pub source_endpoint: u8,
    /// Destination endpoint
    pub destination_endpoint: u8,
    /// Cluster identifier
    pub cluster: u16,
    /// Profile identifier
    pub profile: u16,
    /// Maximum hops of a broadcast, 0 for the network maximum
    pub broadcast_radius: u8,
    /// Transmit options
    pub options: TransmitOptions,
}

impl Pack<ExplicitTransmitHeader, Error> for ExplicitTransmitHeader {
    fn pack(&self, data: &mut [u8]) -> Result<usize, Error> {
        if data.len() < EXPLICIT_TRANSMIT_HEADER_SIZE {
            return Err(Error::NotEnoughSpace);
        }
        data[0] = 0x11;
        data[1] = self.frame_id;
        self.extended_address.write_be(&mut data[2..10]);
        self.network_address.write_be(&mut data[10..12]);
        data[12] = self.source_endpoint;
        data[13] = self.destination_endpoint;
        BigEndian::write_u16(&mut data[14..16], self.cluster);
        BigEndian::write_u16(&mut data[16..18], self.profile);
        data[18] = self.broadcast_radius;
        data[19] = self.options.bits();
        Ok(EXPLICIT_TRANSMIT_HEADER_SIZE)
    }

    fn unpack(data: &[u8]) -> Result<(Self, usize), Error> {
        if data.len() < EXPLICIT_TRANSMIT_HEADER_SIZE {
            return Err(Error::WrongNumberOfBytes);
        }
        if data[0] != 0x11 {
            return Err(Error::UnknownFrameType);
        }
        Ok((
            Self {
                frame_id: data[1],
                extended_address: ExtendedAddress::read_be(&data[2..10]),
                network_address: NetworkAddress::read_be(&data[10..12]),
                source_endpoint: data[12],
                destination_endpoint: data[13],
                cluster: BigEndian::read_u16(&data[14..16]),
                profile: BigEndian::read_u16(&data[16..18]),
                broadcast_radius: data[18],
                options: TransmitOptions::from_bits_truncate(data[19]),
            },
            EXPLICIT_TRANSMIT_HEADER_SIZE,
        ))
    }
}
