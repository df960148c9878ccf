//! Explicit addressing frames, the glue between the XBee device and the
//! application service

use bbqueue::ArrayLength;

use xbee_data::frame::{
    ExplicitReceiveHeader, ExplicitTransmitHeader, ReceiveOptions, TransmitOptions,
    EXPLICIT_TRANSMIT_HEADER_SIZE,
};
use xbee_data::pack::Pack;
use xbee_data::{ExtendedAddress, NetworkAddress};

use crate::application_service::{ApplicationService, Envelope, EnvelopeOptions, WpanDevice};
use crate::device::XBeeDevice;
use crate::dispatch::FrameHandler;
use crate::Error;

impl<'a, N: ArrayLength<u8>> WpanDevice for XBeeDevice<'a, N> {
    fn extended_address(&self) -> ExtendedAddress {
        XBeeDevice::extended_address(self)
    }

    fn network_address(&self) -> NetworkAddress {
        XBeeDevice::network_address(self)
    }

    fn seconds(&self) -> u32 {
        XBeeDevice::seconds(self)
    }

    fn send(&self, envelope: &Envelope, encrypt: bool) -> Result<(), Error> {
        let header = ExplicitTransmitHeader {
            frame_id: self.next_frame_id(),
            extended_address: envelope.extended_address,
            network_address: envelope.network_address,
            source_endpoint: envelope.source_endpoint,
            destination_endpoint: envelope.destination_endpoint,
            cluster: envelope.cluster,
            profile: envelope.profile,
            broadcast_radius: 0,
            options: if encrypt {
                TransmitOptions::APS_ENCRYPT
            } else {
                TransmitOptions::empty()
            },
        };
        let mut data = [0u8; EXPLICIT_TRANSMIT_HEADER_SIZE];
        let used = header.pack(&mut data)?;
        log::info!(
            "< Explicit {:04x} {:02x} -> {} {:02x} cluster {:04x}",
            envelope.profile,
            envelope.source_endpoint,
            envelope.network_address,
            envelope.destination_endpoint,
            envelope.cluster
        );
        self.write_frame(&data[..used], envelope.payload)?;
        Ok(())
    }
}

impl<'a> FrameHandler for ApplicationService<'a> {
    /// Receive explicit receive frames, 0x91
    fn handle_frame(&self, frame: &[u8]) -> Result<(), Error> {
        let (header, used) = ExplicitReceiveHeader::unpack(frame)?;
        let mut options = EnvelopeOptions::empty();
        if header.options.contains(ReceiveOptions::BROADCAST) {
            options |= EnvelopeOptions::BROADCAST_ADDRESS;
        }
        if header.options.contains(ReceiveOptions::APS_ENCRYPTED) {
            options |= EnvelopeOptions::RECEIVED_ENCRYPTED;
        }
        let envelope = Envelope {
            extended_address: header.extended_address,
            network_address: header.network_address,
            source_endpoint: header.source_endpoint,
            destination_endpoint: header.destination_endpoint,
            cluster: header.cluster,
            profile: header.profile,
            options,
            payload: &frame[used..],
        };
        log::info!(
            "> Explicit {:04x} {} {:02x} -> {:02x} cluster {:04x}",
            envelope.profile,
            envelope.network_address,
            envelope.source_endpoint,
            envelope.destination_endpoint,
            envelope.cluster
        );
        match self.dispatch(&envelope) {
            Err(Error::NoHandler) => {
                log::info!("> No handler for cluster {:04x}", envelope.cluster);
                Ok(())
            }
            result => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application_service::{Cluster, ClusterFlags, Endpoint, EnvelopeHandler};
    use crate::dispatch::FrameHandlerEntry;
    use bbqueue::{consts::U1024, BBBuffer};
    use core::cell::RefCell;
    use xbee_data::frame::pack_frame;

    struct Echo {
        received: RefCell<std::vec::Vec<(u16, u8, EnvelopeOptions, std::vec::Vec<u8>)>>,
    }

    impl EnvelopeHandler for Echo {
        fn receive(&self, service: &ApplicationService, envelope: &Envelope) -> Result<(), Error> {
            self.received.borrow_mut().push((
                envelope.network_address.into(),
                envelope.source_endpoint,
                envelope.options,
                envelope.payload.to_vec(),
            ));
            service.send(&envelope.reply(envelope.payload))
        }
    }

    #[test]
    fn receive_and_reply() {
        let tx_queue: BBBuffer<U1024> = BBBuffer::new();
        let (tx_producer, mut tx_consumer) = tx_queue.try_split().unwrap();
        let device = XBeeDevice::new(tx_producer);
        let echo = Echo {
            received: RefCell::new(std::vec::Vec::new()),
        };
        let clusters = [Cluster {
            cluster: 0x0006,
            flags: ClusterFlags::INPUT,
            handler: Some(&echo),
        }];
        let endpoints = [Endpoint {
            endpoint: 0x01,
            profile: 0x0104,
            device: 0x0100,
            device_version: 0,
            clusters: &clusters,
            handler: None,
            state: None,
        }];
        let service = ApplicationService::new(&device, &endpoints);
        let handlers = [FrameHandlerEntry::new(0x91, 0, &service)];

        let header = [
            0x91, 0x00, 0x13, 0xa2, 0x00, 0x40, 0x52, 0x2b, 0xaa, 0x7d, 0x84, 0x02, 0x01, 0x00,
            0x06, 0x01, 0x04, 0x20,
        ];
        let mut data = [0u8; 64];
        let used = pack_frame(&header, &[0x01, 0x05, 0x02], &mut data).unwrap();
        let mut input: &[u8] = &data[..used];
        assert_eq!(device.tick(&mut input, &handlers, 0), Ok(1));
        assert_eq!(
            *echo.received.borrow(),
            [(
                0x7d84,
                0x02,
                EnvelopeOptions::RECEIVED_ENCRYPTED,
                std::vec![0x01, 0x05, 0x02]
            )]
        );

        let grant = tx_consumer.read().unwrap();
        assert_eq!(
            grant[..],
            [
                0x7e, 0x00, 0x17, 0x11, 0x01, 0x00, 0x13, 0xa2, 0x00, 0x40, 0x52, 0x2b, 0xaa,
                0x7d, 0x84, 0x01, 0x02, 0x00, 0x06, 0x01, 0x04, 0x00, 0x20, 0x01, 0x05, 0x02,
                0x9a
            ]
        );
    }

    #[test]
    fn unroutable_frames_are_dropped() {
        let tx_queue: BBBuffer<U1024> = BBBuffer::new();
        let (tx_producer, mut tx_consumer) = tx_queue.try_split().unwrap();
        let device = XBeeDevice::new(tx_producer);
        let service = ApplicationService::new(&device, &[]);
        let frame = [
            0x91, 0x00, 0x13, 0xa2, 0x00, 0x40, 0x52, 0x2b, 0xaa, 0x7d, 0x84, 0x02, 0x01, 0x00,
            0x06, 0x01, 0x04, 0x02, 0x01, 0x05, 0x02,
        ];
        assert_eq!(service.handle_frame(&frame), Ok(()));
        assert!(tx_consumer.read().is_err());
        assert_eq!(
            service.handle_frame(&frame[..12]),
            Err(Error::DataError(xbee_data::Error::WrongNumberOfBytes))
        );
    }
}
