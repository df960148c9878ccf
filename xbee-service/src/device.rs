//! XBee device, the local module attached to the serial port

use core::cell::{Cell, RefCell};
use core::convert::TryFrom;

use bbqueue::{ArrayLength, Producer};

use xbee_data::frame::{
    pack_frame, AtCommand, AtCommandRequest, AtCommandResponse, AtCommandStatus, FrameType,
    ModemStatus, FRAME_OVERHEAD, MAX_FRAME_LENGTH,
};
use xbee_data::pack::Pack;
use xbee_data::{ExtendedAddress, NetworkAddress};

use crate::dispatch::{dispatch, FrameHandlerEntry};
use crate::reader::{FrameReader, SerialRead};
use crate::Error;

/// Most frames dispatched in one call to `XBeeDevice::tick`
pub const MAX_DISPATCH_PER_TICK: usize = 5;

bitflags! {
    /// Network state of the device
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct DeviceFlags: u8 {
        /// Joined to a network
        const JOINED = 0x01;
        /// Authenticated on the network
        const AUTHENTICATED = 0x02;
    }
}

const IDENTITY_COMMANDS: [AtCommand; 3] = [*b"MY", *b"SH", *b"SL"];

/// The local XBee module
///
/// Owns the producer side of the transmit queue, the frame reader and the
/// identity reported by the module.
pub struct XBeeDevice<'a, N: ArrayLength<u8>> {
    tx_queue: RefCell<Producer<'a, N>>,
    reader: RefCell<FrameReader>,
    busy: Cell<bool>,
    clear_to_send: Cell<bool>,
    frame_id: Cell<u8>,
    seconds: Cell<u32>,
    extended_address: Cell<ExtendedAddress>,
    network_address: Cell<NetworkAddress>,
    flags: Cell<DeviceFlags>,
}

impl<'a, N: ArrayLength<u8>> XBeeDevice<'a, N> {
    pub fn new(tx_queue: Producer<'a, N>) -> Self {
        Self {
            tx_queue: RefCell::new(tx_queue),
            reader: RefCell::new(FrameReader::new()),
            busy: Cell::new(false),
            clear_to_send: Cell::new(true),
            frame_id: Cell::new(0),
            seconds: Cell::new(0),
            extended_address: Cell::new(ExtendedAddress::undefined()),
            network_address: Cell::new(NetworkAddress::undefined()),
            flags: Cell::new(DeviceFlags::empty()),
        }
    }

    pub fn extended_address(&self) -> ExtendedAddress {
        self.extended_address.get()
    }

    pub fn network_address(&self) -> NetworkAddress {
        self.network_address.get()
    }

    pub fn flags(&self) -> DeviceFlags {
        self.flags.get()
    }

    /// Seconds timer value of the last tick
    pub fn seconds(&self) -> u32 {
        self.seconds.get()
    }

    /// Flow control, frames are only queued while clear to send
    pub fn set_clear_to_send(&self, clear: bool) {
        self.clear_to_send.set(clear);
    }

    /// Get the next frame identifier, 0 is never used since it disables
    /// the status response
    pub fn next_frame_id(&self) -> u8 {
        let frame_id = match self.frame_id.get().wrapping_add(1) {
            0 => 1,
            id => id,
        };
        self.frame_id.set(frame_id);
        frame_id
    }

    /// Queue a frame built from `header` followed by `payload`
    ///
    /// Returns the number of bytes queued, including the framing.
    pub fn write_frame(&self, header: &[u8], payload: &[u8]) -> Result<usize, Error> {
        let length = header.len() + payload.len();
        if length == 0 {
            return Err(Error::NoData);
        }
        if length > MAX_FRAME_LENGTH {
            return Err(Error::MessageTooLarge);
        }
        if !self.clear_to_send.get() {
            return Err(Error::Busy);
        }
        let size = length + FRAME_OVERHEAD;
        match self.tx_queue.borrow_mut().grant_exact(size) {
            Ok(mut grant) => {
                let used = pack_frame(header, payload, &mut grant)?;
                grant.commit(used);
                log::debug!("< Queued frame {}", used);
                Ok(used)
            }
            Err(_) => {
                log::warn!("< Failed to queue frame {}, queue full", size);
                Err(Error::Busy)
            }
        }
    }

    /// Queue a local AT command, returns the frame identifier used
    pub fn send_at_command(&self, command: AtCommand, parameter: &[u8]) -> Result<u8, Error> {
        let request = AtCommandRequest {
            frame_id: self.next_frame_id(),
            command,
        };
        let mut header = [0u8; 4];
        let used = request.pack(&mut header)?;
        self.write_frame(&header[..used], parameter)?;
        Ok(request.frame_id)
    }

    /// Ask the module for its addresses, the responses update the device
    pub fn query_identity(&self) -> Result<(), Error> {
        for command in IDENTITY_COMMANDS.iter() {
            self.send_at_command(*command, &[])?;
        }
        Ok(())
    }

    /// Read and dispatch frames from `port`
    ///
    /// At most `MAX_DISPATCH_PER_TICK` frames are dispatched, remaining
    /// bytes are left in `port` for the next call. Calling `tick` from a
    /// frame handler fails with `Error::Busy`.
    ///
    /// Returns the number of frames dispatched.
    pub fn tick(
        &self,
        port: &mut dyn SerialRead,
        handlers: &[FrameHandlerEntry],
        seconds: u32,
    ) -> Result<usize, Error> {
        if self.busy.replace(true) {
            return Err(Error::Busy);
        }
        self.seconds.set(seconds);
        let mut frame = [0u8; MAX_FRAME_LENGTH];
        let mut count = 0;
        while count < MAX_DISPATCH_PER_TICK {
            let length = match self.reader.borrow_mut().poll(port) {
                Some(content) => {
                    frame[..content.len()].copy_from_slice(content);
                    content.len()
                }
                None => break,
            };
            self.handle_frame(&frame[..length]);
            dispatch(handlers, &frame[..length]);
            count += 1;
        }
        self.busy.set(false);
        Ok(count)
    }

    fn handle_frame(&self, frame: &[u8]) {
        match FrameType::try_from(frame[0]) {
            Ok(FrameType::ModemStatus) => self.handle_modem_status(frame),
            Ok(FrameType::LocalAtCommandResponse) => self.handle_at_command_response(frame),
            _ => (),
        }
    }

    fn handle_modem_status(&self, frame: &[u8]) {
        let status = match ModemStatus::from_frame(frame) {
            Ok(status) => status,
            Err(_) => {
                log::info!("> Modem status {:02x}", frame[1]);
                return;
            }
        };
        log::info!("> Modem status {:?}", status);
        let flags = self.flags.get();
        match status {
            ModemStatus::CoordinatorStarted => {
                self.network_address.set(NetworkAddress::new(0x0000));
                self.flags
                    .set(flags | DeviceFlags::JOINED | DeviceFlags::AUTHENTICATED);
            }
            ModemStatus::KeyEstablished => {
                self.flags
                    .set(flags | DeviceFlags::JOINED | DeviceFlags::AUTHENTICATED);
            }
            ModemStatus::Joined => {
                self.flags.set(flags | DeviceFlags::JOINED);
            }
            status if status.is_reset() => {
                self.flags.set(DeviceFlags::empty());
                self.network_address.set(NetworkAddress::undefined());
            }
            _ => (),
        }
    }

    fn handle_at_command_response(&self, frame: &[u8]) {
        let (response, used) = match AtCommandResponse::unpack(frame) {
            Ok(response) => response,
            Err(err) => {
                log::warn!("> Invalid AT command response, {:?}", err);
                return;
            }
        };
        if response.status != AtCommandStatus::Ok {
            log::warn!(
                "> AT command {}{} failed, {:?}",
                response.command[0] as char,
                response.command[1] as char,
                response.status
            );
            return;
        }
        let value = match AtCommandResponse::value(&frame[used..]) {
            Some(value) => value,
            None => return,
        };
        match &response.command {
            b"MY" => {
                let address = NetworkAddress::new(value as u16);
                log::info!("> Network address {}", address);
                self.network_address.set(address);
            }
            b"SH" => {
                let low = u64::from(self.extended_address.get()) & 0xffff_ffff;
                self.extended_address
                    .set(ExtendedAddress::new((value << 32) | low));
            }
            b"SL" => {
                let high = u64::from(self.extended_address.get()) & 0xffff_ffff_0000_0000;
                self.extended_address
                    .set(ExtendedAddress::new(high | (value & 0xffff_ffff)));
                log::info!("> Extended address {}", self.extended_address.get());
            }
            _ => (),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::FrameHandler;
    use bbqueue::{consts::U1024, BBBuffer};

    struct Counter {
        count: Cell<usize>,
    }

    impl FrameHandler for Counter {
        fn handle_frame(&self, _frame: &[u8]) -> Result<(), Error> {
            self.count.set(self.count.get() + 1);
            Ok(())
        }
    }

    #[test]
    fn modem_status_updates_state() {
        let tx_queue: BBBuffer<U1024> = BBBuffer::new();
        let (tx_producer, _tx_consumer) = tx_queue.try_split().unwrap();
        let device = XBeeDevice::new(tx_producer);
        let counter = Counter {
            count: Cell::new(0),
        };
        let handlers = [FrameHandlerEntry::new(0x8a, 0, &counter)];

        assert!(device.network_address().is_undefined());
        let mut input: &[u8] = &[0x7e, 0x00, 0x02, 0x8a, 0x06, 0x6f];
        assert_eq!(device.tick(&mut input, &handlers, 10), Ok(1));
        assert_eq!(counter.count.get(), 1);
        assert_eq!(device.network_address(), 0x0000);
        assert_eq!(
            device.flags(),
            DeviceFlags::JOINED | DeviceFlags::AUTHENTICATED
        );
        assert_eq!(device.seconds(), 10);

        // watchdog reset
        let mut input: &[u8] = &[0x7e, 0x00, 0x02, 0x8a, 0x01, 0x74];
        assert_eq!(device.tick(&mut input, &handlers, 11), Ok(1));
        assert_eq!(counter.count.get(), 2);
        assert!(device.network_address().is_undefined());
        assert_eq!(device.flags(), DeviceFlags::empty());

        // joined
        let mut input: &[u8] = &[0x7e, 0x00, 0x02, 0x8a, 0x02, 0x73];
        assert_eq!(device.tick(&mut input, &handlers, 12), Ok(1));
        assert_eq!(device.flags(), DeviceFlags::JOINED);
    }

    #[test]
    fn dispatch_at_most_five_frames_per_tick() {
        let tx_queue: BBBuffer<U1024> = BBBuffer::new();
        let (tx_producer, _tx_consumer) = tx_queue.try_split().unwrap();
        let device = XBeeDevice::new(tx_producer);
        let counter = Counter {
            count: Cell::new(0),
        };
        let handlers = [FrameHandlerEntry::new(0x8a, 0, &counter)];
        let frame = [0x7e, 0x00, 0x02, 0x8a, 0x02, 0x73];
        let mut data = std::vec::Vec::new();
        for _ in 0..7 {
            data.extend_from_slice(&frame);
        }
        let mut input: &[u8] = &data;
        assert_eq!(device.tick(&mut input, &handlers, 0), Ok(5));
        assert_eq!(counter.count.get(), 5);
        assert_eq!(input.len(), 2 * frame.len());
        assert_eq!(device.tick(&mut input, &handlers, 0), Ok(2));
        assert_eq!(counter.count.get(), 7);
        assert_eq!(device.tick(&mut input, &handlers, 0), Ok(0));
    }

    struct Reentrant<'d, 'q> {
        device: &'d XBeeDevice<'q, U1024>,
        result: Cell<Option<Result<usize, Error>>>,
    }

    impl<'d, 'q> FrameHandler for Reentrant<'d, 'q> {
        fn handle_frame(&self, _frame: &[u8]) -> Result<(), Error> {
            let mut input: &[u8] = &[0x7e, 0x00, 0x02, 0x8a, 0x02, 0x73];
            self.result.set(Some(self.device.tick(&mut input, &[], 0)));
            Ok(())
        }
    }

    #[test]
    fn reentrant_tick_is_busy() {
        let tx_queue: BBBuffer<U1024> = BBBuffer::new();
        let (tx_producer, _tx_consumer) = tx_queue.try_split().unwrap();
        let device = XBeeDevice::new(tx_producer);
        let reentrant = Reentrant {
            device: &device,
            result: Cell::new(None),
        };
        let handlers = [FrameHandlerEntry::new(0x8a, 0, &reentrant)];
        let mut input: &[u8] = &[0x7e, 0x00, 0x02, 0x8a, 0x06, 0x6f];
        assert_eq!(device.tick(&mut input, &handlers, 0), Ok(1));
        assert_eq!(reentrant.result.get(), Some(Err(Error::Busy)));
        // the guard is released afterwards
        let mut input: &[u8] = &[];
        assert_eq!(device.tick(&mut input, &handlers, 0), Ok(0));
    }

    #[test]
    fn write_frame_to_queue() {
        let tx_queue: BBBuffer<U1024> = BBBuffer::new();
        let (tx_producer, mut tx_consumer) = tx_queue.try_split().unwrap();
        let device = XBeeDevice::new(tx_producer);

        assert_eq!(device.write_frame(&[0x8a], &[0x06]), Ok(6));
        let grant = tx_consumer.read().unwrap();
        assert_eq!(grant[..], [0x7e, 0x00, 0x02, 0x8a, 0x06, 0x6f]);
        grant.release(6);

        assert_eq!(device.write_frame(&[], &[]), Err(Error::NoData));
        let payload = [0u8; MAX_FRAME_LENGTH];
        assert_eq!(
            device.write_frame(&[0x11], &payload),
            Err(Error::MessageTooLarge)
        );
        device.set_clear_to_send(false);
        assert_eq!(device.write_frame(&[0x8a], &[0x06]), Err(Error::Busy));
        assert!(tx_consumer.read().is_err());
    }

    #[test]
    fn frame_identifiers_skip_zero() {
        let tx_queue: BBBuffer<U1024> = BBBuffer::new();
        let (tx_producer, _tx_consumer) = tx_queue.try_split().unwrap();
        let device = XBeeDevice::new(tx_producer);
        assert_eq!(device.next_frame_id(), 1);
        for _ in 1..254 {
            device.next_frame_id();
        }
        assert_eq!(device.next_frame_id(), 255);
        assert_eq!(device.next_frame_id(), 1);
    }

    #[test]
    fn query_and_store_identity() {
        let tx_queue: BBBuffer<U1024> = BBBuffer::new();
        let (tx_producer, mut tx_consumer) = tx_queue.try_split().unwrap();
        let device = XBeeDevice::new(tx_producer);

        device.query_identity().unwrap();
        let grant = tx_consumer.read().unwrap();
        assert_eq!(
            grant[..],
            [
                0x7e, 0x00, 0x04, 0x08, 0x01, b'M', b'Y', 0x50, 0x7e, 0x00, 0x04, 0x08, 0x02,
                b'S', b'H', 0x5a, 0x7e, 0x00, 0x04, 0x08, 0x03, b'S', b'L', 0x55
            ]
        );
        let length = grant.len();
        grant.release(length);

        let mut data = [0u8; 64];
        let mut offset = 0;
        offset += pack_frame(&[0x88, 0x01, b'M', b'Y', 0x00], &[0x12, 0x34], &mut data[offset..])
            .unwrap();
        offset += pack_frame(
            &[0x88, 0x02, b'S', b'H', 0x00],
            &[0x00, 0x13, 0xa2, 0x00],
            &mut data[offset..],
        )
        .unwrap();
        offset += pack_frame(
            &[0x88, 0x03, b'S', b'L', 0x00],
            &[0x40, 0x52, 0x2b, 0xaa],
            &mut data[offset..],
        )
        .unwrap();
        let mut input: &[u8] = &data[..offset];
        assert_eq!(device.tick(&mut input, &[], 0), Ok(3));
        assert_eq!(device.network_address(), 0x1234);
        assert_eq!(device.extended_address(), 0x0013_a200_4052_2baa);
    }
}
