//! Length prefixed string types

use heapless::{String, Vec};

use crate::pack::Pack;
use crate::Error;

/// Maximum number of octets in a short string, 0xff is reserved for invalid
pub const STRING_MAX_LENGTH: usize = 254;

/// Octet string with a one octet length prefix on the wire
pub type OctetString = Vec<u8, STRING_MAX_LENGTH>;

/// Character string with a one octet length prefix on the wire
pub type CharacterString = String<STRING_MAX_LENGTH>;

fn pack_prefixed(value: &[u8], data: &mut [u8]) -> Result<usize, Error> {
    if data.len() <= value.len() {
        return Err(Error::NotEnoughSpace);
    }
    data[0] = value.len() as u8;
    data[1..=value.len()].copy_from_slice(value);
    Ok(value.len() + 1)
}

fn unpack_prefixed(data: &[u8]) -> Result<&[u8], Error> {
    if data.is_empty() {
        return Err(Error::WrongNumberOfBytes);
    }
    let length = data[0] as usize;
    if length == 0xff {
        // invalid string, no content follows
        return Ok(&data[1..1]);
    }
    if data.len() <= length {
        return Err(Error::WrongNumberOfBytes);
    }
    Ok(&data[1..=length])
}

impl Pack<OctetString, Error> for OctetString {
    fn pack(&self, data: &mut [u8]) -> Result<usize, Error> {
        pack_prefixed(self.as_ref(), data)
    }

    fn unpack(data: &[u8]) -> Result<(Self, usize), Error> {
        let content = unpack_prefixed(data)?;
        let mut value = OctetString::new();
        value
            .extend_from_slice(content)
            .map_err(|_| Error::InvalidValue)?;
        Ok((value, content.len() + 1))
    }
}

impl Pack<CharacterString, Error> for CharacterString {
    fn pack(&self, data: &mut [u8]) -> Result<usize, Error> {
        pack_prefixed(self.as_bytes(), data)
    }

    fn unpack(data: &[u8]) -> Result<(Self, usize), Error> {
        let content = unpack_prefixed(data)?;
        let text = core::str::from_utf8(content).map_err(|_| Error::InvalidValue)?;
        let mut value = CharacterString::new();
        value.push_str(text).map_err(|_| Error::InvalidValue)?;
        Ok((value, content.len() + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn character_string() {
        let mut buffer = [0u8; 8];
        let mut value = CharacterString::new();
        value.push_str("Digi").unwrap();
        let used = value.pack(&mut buffer).unwrap();
        assert_eq!(used, 5);
        assert_eq!(buffer[..5], [0x04, b'D', b'i', b'g', b'i']);
        let (unpacked, used) = CharacterString::unpack(&buffer[..]).unwrap();
        assert_eq!(used, 5);
        assert_eq!(unpacked.as_str(), "Digi");

        assert_eq!(value.pack(&mut buffer[..4]), Err(Error::NotEnoughSpace));
        assert_eq!(
            CharacterString::unpack(&[0x05, b'a', b'b']),
            Err(Error::WrongNumberOfBytes)
        );
    }

    #[test]
    fn empty_octet_string() {
        let mut buffer = [0xaau8; 2];
        let value = OctetString::new();
        assert_eq!(value.pack(&mut buffer).unwrap(), 1);
        assert_eq!(buffer[0], 0x00);
        let (unpacked, used) = OctetString::unpack(&buffer).unwrap();
        assert_eq!(used, 1);
        assert!(unpacked.is_empty());
    }
}
