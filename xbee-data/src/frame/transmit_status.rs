use core::convert::TryFrom;

use crate::common::address::NetworkAddress;
use crate::pack::Pack;
use crate::Error;

extended_enum!(
    /// Delivery status of a transmit request
    DeliveryStatus, u8,
    /// Delivered
    Success => 0x00,
    /// MAC layer acknowledge failure
    MacAcknowledgeFailure => 0x01,
    /// Clear channel assessment failure
    ClearChannelFailure => 0x02,
    /// Invalid destination endpoint
    InvalidDestinationEndpoint => 0x15,
    /// No buffers available
    NoBuffers => 0x18,
    /// Network acknowledge failure
    NetworkAcknowledgeFailure => 0x21,
    /// Not joined to a network
    NotJoined => 0x22,
    /// Sent to self
    SelfAddressed => 0x23,
    /// Address not found
    AddressNotFound => 0x24,
    /// Route not found
    RouteNotFound => 0x25,
    /// No neighbour relayed the broadcast
    BroadcastNotHeard => 0x26,
    /// Invalid binding table index
    InvalidBindingIndex => 0x2b,
    /// Invalid endpoint
    InvalidEndpoint => 0x2c,
    /// Lack of free buffers, timers or similar
    ResourceError => 0x32,
    /// Payload too large
    PayloadTooLarge => 0x74,
    /// Indirect message unrequested
    IndirectNotRequested => 0x75,
    /// Key not authorised
    KeyNotAuthorised => 0xbb,
);

/// Transmit status, frame 0x8b
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransmitStatus {
    /// Frame identifier of the transmit request
    pub frame_id: u8,
    /// Network address the frame was delivered to
    pub network_address: NetworkAddress,
    /// Number of retries
    pub retries: u8,
    /// Delivery status
    pub delivery: DeliveryStatus,
    /// Discovery overhead, see XBee manual
    pub discovery: u8,
}

impl Pack<TransmitStatus, Error> for TransmitStatus {
    fn pack(&self, data: &mut [u8]) -> Result<usize, Error> {
        if data.len() < 7 {
            return Err(Error::NotEnoughSpace);
        }
        data[0] = 0x8b;
        data[1] = self.frame_id;
        self.network_address.write_be(&mut data[2..4]);
        data[4] = self.retries;
        data[5] = u8::from(self.delivery);
        data[6] = self.discovery;
        Ok(7)
    }

    fn unpack(data: &[u8]) -> Result<(Self, usize), Error> {
        if data.len() < 7 {
            return Err(Error::WrongNumberOfBytes);
        }
        if data[0] != 0x8b {
            return Err(Error::UnknownFrameType);
        }
        Ok((
            Self {
                frame_id: data[1],
                network_address: NetworkAddress::read_be(&data[2..4]),
                retries: data[4],
                delivery: DeliveryStatus::try_from(data[5])?,
                discovery: data[6],
            },
            7,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unpack_transmit_status() {
        let data = [0x8b, 0x47, 0x7d, 0x84, 0x00, 0x00, 0x01];
        let (status, used) = TransmitStatus::unpack(&data).unwrap();
        assert_eq!(used, 7);
        assert_eq!(status.frame_id, 0x47);
        assert_eq!(status.network_address, 0x7d84);
        assert_eq!(status.retries, 0);
        assert_eq!(status.delivery, DeliveryStatus::Success);
        assert_eq!(status.discovery, 0x01);

        let data = [0x8b, 0x02, 0xff, 0xfd, 0x02, 0x21, 0x00];
        let (status, _) = TransmitStatus::unpack(&data).unwrap();
        assert_eq!(status.delivery, DeliveryStatus::NetworkAcknowledgeFailure);
        assert_eq!(status.retries, 2);
    }
}
