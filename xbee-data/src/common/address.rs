//! # Addresses used in the network
//!
//! Addresses are little endian inside Z**bee payloads and big endian inside
//! XBee API frames, both encodings are provided.

use core::default::Default;

use crate::pack::PackFixed;
use crate::Error;

use byteorder::{BigEndian, ByteOrder, LittleEndian};

/// Network address size
pub const NETWORK_ADDRESS_SIZE: usize = 2;
/// Network address, broadcast to all nodes
pub const NETWORK_ADDRESS_BROADCAST: u16 = 0xffff;
/// Network address, the address is not known
pub const NETWORK_ADDRESS_UNDEFINED: u16 = 0xfffe;
/// Network address of the coordinator
pub const NETWORK_ADDRESS_COORDINATOR: u16 = 0x0000;

/// 16-bit network address
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NetworkAddress(u16);

impl NetworkAddress {
    /// Create a network address
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    /// The all nodes broadcast address
    pub const fn broadcast() -> Self {
        Self(NETWORK_ADDRESS_BROADCAST)
    }

    /// The address used when the address is unknown
    pub const fn undefined() -> Self {
        Self(NETWORK_ADDRESS_UNDEFINED)
    }

    /// Is this the all nodes broadcast address
    pub fn is_broadcast(self) -> bool {
        self.0 == NETWORK_ADDRESS_BROADCAST
    }

    /// Is the address unknown
    pub fn is_undefined(self) -> bool {
        self.0 == NETWORK_ADDRESS_UNDEFINED
    }

    /// Is the address an actual node address
    pub fn is_assigned(self) -> bool {
        self.0 < 0xfff8
    }

    /// Read a big endian address from a XBee frame
    pub fn read_be(data: &[u8]) -> Self {
        Self(BigEndian::read_u16(data))
    }

    /// Write the address big endian into a XBee frame
    pub fn write_be(self, data: &mut [u8]) {
        BigEndian::write_u16(data, self.0)
    }
}

impl PackFixed<NetworkAddress, Error> for NetworkAddress {
    fn pack(&self, data: &mut [u8]) -> Result<(), Error> {
        if data.len() == NETWORK_ADDRESS_SIZE {
            LittleEndian::write_u16(data, self.0);
            Ok(())
        } else {
            Err(Error::NotEnoughSpace)
        }
    }

    fn unpack(data: &[u8]) -> Result<Self, Error> {
        if data.len() == NETWORK_ADDRESS_SIZE {
            Ok(NetworkAddress(LittleEndian::read_u16(data)))
        } else {
            Err(Error::WrongNumberOfBytes)
        }
    }
}

impl From<u16> for NetworkAddress {
    fn from(value: u16) -> Self {
        NetworkAddress(value)
    }
}

impl From<NetworkAddress> for u16 {
    fn from(value: NetworkAddress) -> Self {
        value.0
    }
}

impl PartialEq<u16> for NetworkAddress {
    fn eq(&self, other: &u16) -> bool {
        self.0 == *other
    }
}

impl Default for NetworkAddress {
    fn default() -> Self {
        Self::undefined()
    }
}

impl core::fmt::Display for NetworkAddress {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:04x}", self.0)
    }
}

/// Extended IEEE address size
pub const EXTENDED_ADDRESS_SIZE: usize = 8;
/// Extended IEEE address, the address is not known
pub const EXTENDED_ADDRESS_UNDEFINED: u64 = 0xffff_ffff_ffff_ffff;
/// Extended IEEE address, broadcast address
pub const EXTENDED_ADDRESS_BROADCAST: u64 = 0x0000_0000_0000_ffff;
/// Extended IEEE address, coordinator address
pub const EXTENDED_ADDRESS_COORDINATOR: u64 = 0x0000_0000_0000_0000;

/// 64-bit extended IEEE address
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ExtendedAddress(u64);

impl ExtendedAddress {
    /// Create a extended address
    pub const fn new(address: u64) -> Self {
        Self(address)
    }

    /// The broadcast address
    pub const fn broadcast() -> Self {
        Self(EXTENDED_ADDRESS_BROADCAST)
    }

    /// The address used when the address is unknown
    pub const fn undefined() -> Self {
        Self(EXTENDED_ADDRESS_UNDEFINED)
    }

    /// Is this the broadcast address
    pub fn is_broadcast(self) -> bool {
        self.0 == EXTENDED_ADDRESS_BROADCAST
    }

    /// Is the address unknown
    pub fn is_undefined(self) -> bool {
        self.0 == EXTENDED_ADDRESS_UNDEFINED
    }

    /// Read a big endian address from a XBee frame
    pub fn read_be(data: &[u8]) -> Self {
        Self(BigEndian::read_u64(data))
    }

    /// Write the address big endian into a XBee frame
    pub fn write_be(self, data: &mut [u8]) {
        BigEndian::write_u64(data, self.0)
    }
}

impl PackFixed<ExtendedAddress, Error> for ExtendedAddress {
    fn pack(&self, data: &mut [u8]) -> Result<(), Error> {
        if data.len() == EXTENDED_ADDRESS_SIZE {
            LittleEndian::write_u64(data, self.0);
            Ok(())
        } else {
            Err(Error::NotEnoughSpace)
        }
    }

    fn unpack(data: &[u8]) -> Result<Self, Error> {
        if data.len() == EXTENDED_ADDRESS_SIZE {
            Ok(ExtendedAddress(LittleEndian::read_u64(data)))
        } else {
            Err(Error::WrongNumberOfBytes)
        }
    }
}

impl From<u64> for ExtendedAddress {
    fn from(value: u64) -> Self {
        ExtendedAddress(value)
    }
}

impl From<ExtendedAddress> for u64 {
    fn from(value: ExtendedAddress) -> Self {
        value.0
    }
}

impl PartialEq<u64> for ExtendedAddress {
    fn eq(&self, other: &u64) -> bool {
        self.0 == *other
    }
}

impl Default for ExtendedAddress {
    fn default() -> Self {
        Self::undefined()
    }
}

impl core::fmt::Display for ExtendedAddress {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            ((self.0 >> 56) & 0xff) as u8,
            ((self.0 >> 48) & 0xff) as u8,
            ((self.0 >> 40) & 0xff) as u8,
            ((self.0 >> 32) & 0xff) as u8,
            ((self.0 >> 24) & 0xff) as u8,
            ((self.0 >> 16) & 0xff) as u8,
            ((self.0 >> 8) & 0xff) as u8,
            ((self.0) & 0xff) as u8,
        )
    }
}
