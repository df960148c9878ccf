use byteorder::{ByteOrder, LittleEndian};

use crate::cluster_library::{AttributeDataType, ClusterLibraryStatus};
use crate::pack::Pack;
use crate::Error;

/// Iterate the attribute identifiers of a read attributes request
///
/// A trailing odd byte is ignored, callers check the payload length.
pub fn attribute_identifiers(payload: &[u8]) -> impl Iterator<Item = u16> + '_ {
    payload.chunks_exact(2).map(LittleEndian::read_u16)
}

/// Discover attributes request
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DiscoverAttributes {
    /// First attribute identifier to report
    pub start: u16,
    /// Maximum number of attributes to report
    pub maximum: u8,
}

impl Pack<DiscoverAttributes, Error> for DiscoverAttributes {
    fn pack(&self, data: &mut [u8]) -> Result<usize, Error> {
        if data.len() < 3 {
            return Err(Error::NotEnoughSpace);
        }
        LittleEndian::write_u16(&mut data[0..2], self.start);
        data[2] = self.maximum;
        Ok(3)
    }

    fn unpack(data: &[u8]) -> Result<(Self, usize), Error> {
        if data.len() < 3 {
            return Err(Error::WrongNumberOfBytes);
        }
        Ok((
            Self {
                start: LittleEndian::read_u16(&data[0..2]),
                maximum: data[2],
            },
            3,
        ))
    }
}

/// Attribute identifier and type, record of the discover attributes response
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttributeInformation {
    /// Attribute identifier
    pub identifier: u16,
    /// Attribute data type
    pub data_type: AttributeDataType,
}

impl Pack<AttributeInformation, Error> for AttributeInformation {
    fn pack(&self, data: &mut [u8]) -> Result<usize, Error> {
        if data.len() < 3 {
            return Err(Error::NotEnoughSpace);
        }
        LittleEndian::write_u16(&mut data[0..2], self.identifier);
        data[2] = u8::from(self.data_type);
        Ok(3)
    }

    fn unpack(data: &[u8]) -> Result<(Self, usize), Error> {
        if data.len() < 3 {
            return Err(Error::WrongNumberOfBytes);
        }
        Ok((
            Self {
                identifier: LittleEndian::read_u16(&data[0..2]),
                data_type: AttributeDataType::try_from(data[2])?,
            },
            3,
        ))
    }
}

/// Status record of the write attributes response
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WriteAttributeStatus {
    /// Status of the write
    pub status: ClusterLibraryStatus,
    /// Attribute identifier
    pub identifier: u16,
}

impl Pack<WriteAttributeStatus, Error> for WriteAttributeStatus {
    fn pack(&self, data: &mut [u8]) -> Result<usize, Error> {
        if data.len() < 3 {
            return Err(Error::NotEnoughSpace);
        }
        data[0] = u8::from(self.status);
        LittleEndian::write_u16(&mut data[1..3], self.identifier);
        Ok(3)
    }

    fn unpack(data: &[u8]) -> Result<(Self, usize), Error> {
        if data.len() < 3 {
            return Err(Error::WrongNumberOfBytes);
        }
        Ok((
            Self {
                status: ClusterLibraryStatus::try_from(data[0])?,
                identifier: LittleEndian::read_u16(&data[1..3]),
            },
            3,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unpack_read_attributes() {
        let data = [0x0b, 0x05, 0x00, 0x00, 0x01];
        let mut identifiers = attribute_identifiers(&data);
        assert_eq!(identifiers.next(), Some(0x050b));
        assert_eq!(identifiers.next(), Some(0x0000));
        assert_eq!(identifiers.next(), None);
    }

    #[test]
    fn unpack_discover_attributes() {
        let data = [0x04, 0x00, 0x10];
        let (request, used) = DiscoverAttributes::unpack(&data).unwrap();
        assert_eq!(used, 3);
        assert_eq!(request.start, 0x0004);
        assert_eq!(request.maximum, 0x10);
    }

    #[test]
    fn pack_write_attribute_status() {
        let mut data = [0u8; 3];
        let status = WriteAttributeStatus {
            status: ClusterLibraryStatus::ReadOnly,
            identifier: 0x4000,
        };
        assert_eq!(status.pack(&mut data).unwrap(), 3);
        assert_eq!(data, [0x88, 0x00, 0x40]);
    }
}
