use byteorder::{ByteOrder, LittleEndian};
use heapless::Vec;

use crate::cluster_library::AttributeDataType;
use crate::common::types::{CharacterString, OctetString};
use crate::Error;

/// Largest fixed size value, 128-bit key
pub const RAW_VALUE_MAX: usize = 16;

/// Attribute value, the wire format is given by the accompanying
/// `AttributeDataType`
///
/// Integer, bitmap, enumeration and the time and identifier types share
/// the `Unsigned` and `Signed` variants. The semi precision float is kept
/// as its raw bits.
#[derive(Clone, Debug, PartialEq)]
pub enum AttributeValue {
    /// No data
    None,
    /// Boolean
    Boolean(bool),
    /// Unsigned integer types, bitmaps, enumerations and identifiers
    Unsigned(u64),
    /// Signed integer types
    Signed(i64),
    /// Single precision float
    FloatingPoint32(f32),
    /// Double precision float
    FloatingPoint64(f64),
    /// Octet string
    OctetString(OctetString),
    /// Character string
    CharacterString(CharacterString),
    /// Opaque little endian bytes, security keys
    Raw(Vec<u8, RAW_VALUE_MAX>),
}

fn mask(num_octets: usize) -> u64 {
    if num_octets >= 8 {
        u64::MAX
    } else {
        (1u64 << (num_octets * 8)) - 1
    }
}

impl AttributeValue {
    /// Value as a signed integer, used for limit checks
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AttributeValue::Boolean(v) => Some(*v as i64),
            AttributeValue::Unsigned(v) => Some(*v as i64),
            AttributeValue::Signed(v) => Some(*v),
            _ => None,
        }
    }

    /// Number of bytes the value occupies on the wire
    pub fn size(&self, data_type: AttributeDataType) -> usize {
        match (data_type.num_octets(), self) {
            (Some(size), _) => size,
            (None, AttributeValue::OctetString(v)) => v.len() + data_type.length_prefix().unwrap_or(1),
            (None, AttributeValue::CharacterString(v)) => {
                v.len() + data_type.length_prefix().unwrap_or(1)
            }
            (None, _) => 0,
        }
    }

    /// Serialise the value as `data_type`, returning the number of bytes
    /// written
    pub fn pack(&self, data_type: AttributeDataType, data: &mut [u8]) -> Result<usize, Error> {
        if let Some(num_octets) = data_type.num_octets() {
            if data.len() < num_octets {
                return Err(Error::NotEnoughSpace);
            }
        }
        match (data_type, self) {
            (AttributeDataType::None, _) | (AttributeDataType::Unknown, _) => Ok(0),
            (AttributeDataType::Boolean, AttributeValue::Boolean(v)) => {
                data[0] = if *v { 0x01 } else { 0x00 };
                Ok(1)
            }
            (AttributeDataType::FloatingPoint32, AttributeValue::FloatingPoint32(v)) => {
                LittleEndian::write_f32(&mut data[..4], *v);
                Ok(4)
            }
            (AttributeDataType::FloatingPoint64, AttributeValue::FloatingPoint64(v)) => {
                LittleEndian::write_f64(&mut data[..8], *v);
                Ok(8)
            }
            (AttributeDataType::Key128, AttributeValue::Raw(v)) => {
                if v.len() != RAW_VALUE_MAX {
                    return Err(Error::UnsupportedAttributeValue);
                }
                data[..RAW_VALUE_MAX].copy_from_slice(v);
                Ok(RAW_VALUE_MAX)
            }
            (AttributeDataType::OctetString, AttributeValue::OctetString(v))
            | (AttributeDataType::LongOctetString, AttributeValue::OctetString(v)) => {
                Self::pack_string(data_type, v, data)
            }
            (AttributeDataType::CharacterString, AttributeValue::CharacterString(v))
            | (AttributeDataType::LongCharacterString, AttributeValue::CharacterString(v)) => {
                Self::pack_string(data_type, v.as_bytes(), data)
            }
            (_, AttributeValue::Unsigned(v)) if !data_type.is_signed() => {
                let size = data_type
                    .num_octets()
                    .ok_or(Error::UnsupportedAttributeValue)?;
                LittleEndian::write_uint(&mut data[..size], *v & mask(size), size);
                Ok(size)
            }
            (_, AttributeValue::Signed(v)) if data_type.is_signed() && !data_type.is_float() => {
                let size = data_type
                    .num_octets()
                    .ok_or(Error::UnsupportedAttributeValue)?;
                LittleEndian::write_int(&mut data[..size], *v, size);
                Ok(size)
            }
            (AttributeDataType::FloatingPoint16, AttributeValue::Unsigned(v)) => {
                LittleEndian::write_u16(&mut data[..2], *v as u16);
                Ok(2)
            }
            (_, AttributeValue::Raw(v)) => {
                let size = data_type
                    .num_octets()
                    .ok_or(Error::UnsupportedAttributeValue)?;
                if v.len() != size {
                    return Err(Error::UnsupportedAttributeValue);
                }
                data[..size].copy_from_slice(v);
                Ok(size)
            }
            (_, _) => Err(Error::UnsupportedAttributeValue),
        }
    }

    fn pack_string(data_type: AttributeDataType, value: &[u8], data: &mut [u8]) -> Result<usize, Error> {
        let prefix = data_type.length_prefix().unwrap_or(1);
        let size = prefix + value.len();
        if data.len() < size {
            return Err(Error::NotEnoughSpace);
        }
        if prefix == 2 {
            LittleEndian::write_u16(&mut data[..2], value.len() as u16);
        } else {
            data[0] = value.len() as u8;
        }
        data[prefix..size].copy_from_slice(value);
        Ok(size)
    }

    /// De-serialise a value of `data_type`, returning the value and the
    /// number of bytes used
    pub fn unpack(data: &[u8], data_type: AttributeDataType) -> Result<(Self, usize), Error> {
        if let Some(num_octets) = data_type.num_octets() {
            if data.len() < num_octets {
                return Err(Error::WrongNumberOfBytes);
            }
        }
        match data_type {
            AttributeDataType::None | AttributeDataType::Unknown => Ok((AttributeValue::None, 0)),
            AttributeDataType::Boolean => match data[0] {
                0x00 => Ok((AttributeValue::Boolean(false), 1)),
                0x01 => Ok((AttributeValue::Boolean(true), 1)),
                _ => Err(Error::InvalidValue),
            },
            AttributeDataType::FloatingPoint16 => Ok((
                AttributeValue::Unsigned(u64::from(LittleEndian::read_u16(&data[..2]))),
                2,
            )),
            AttributeDataType::FloatingPoint32 => Ok((
                AttributeValue::FloatingPoint32(LittleEndian::read_f32(&data[..4])),
                4,
            )),
            AttributeDataType::FloatingPoint64 => Ok((
                AttributeValue::FloatingPoint64(LittleEndian::read_f64(&data[..8])),
                8,
            )),
            AttributeDataType::Key128 => {
                let mut value = Vec::new();
                value
                    .extend_from_slice(&data[..RAW_VALUE_MAX])
                    .map_err(|_| Error::NotEnoughSpace)?;
                Ok((AttributeValue::Raw(value), RAW_VALUE_MAX))
            }
            AttributeDataType::OctetString
            | AttributeDataType::LongOctetString
            | AttributeDataType::CharacterString
            | AttributeDataType::LongCharacterString => {
                let prefix = data_type.length_prefix().unwrap_or(1);
                if data.len() < prefix {
                    return Err(Error::WrongNumberOfBytes);
                }
                let length = if prefix == 2 {
                    LittleEndian::read_u16(&data[..2]) as usize
                } else {
                    data[0] as usize
                };
                let end = prefix + length;
                if data.len() < end {
                    return Err(Error::WrongNumberOfBytes);
                }
                let content = &data[prefix..end];
                if data_type.is_character_string() {
                    let text = core::str::from_utf8(content).map_err(|_| Error::InvalidValue)?;
                    let mut value = CharacterString::new();
                    value.push_str(text).map_err(|_| Error::NotEnoughSpace)?;
                    Ok((AttributeValue::CharacterString(value), end))
                } else {
                    let mut value = OctetString::new();
                    value
                        .extend_from_slice(content)
                        .map_err(|_| Error::NotEnoughSpace)?;
                    Ok((AttributeValue::OctetString(value), end))
                }
            }
            _ => {
                let size = data_type
                    .num_octets()
                    .ok_or(Error::UnsupportedAttributeValue)?;
                if data_type.is_signed() {
                    let value = LittleEndian::read_int(&data[..size], size);
                    Ok((AttributeValue::Signed(value), size))
                } else {
                    let value = LittleEndian::read_uint(&data[..size], size);
                    Ok((AttributeValue::Unsigned(value), size))
                }
            }
        }
    }
}

impl core::fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            AttributeValue::None => write!(f, "None"),
            AttributeValue::Boolean(v) => write!(f, "{}", v),
            AttributeValue::Unsigned(v) => write!(f, "{}", v),
            AttributeValue::Signed(v) => write!(f, "{}", v),
            AttributeValue::FloatingPoint32(v) => write!(f, "{}", v),
            AttributeValue::FloatingPoint64(v) => write!(f, "{}", v),
            AttributeValue::CharacterString(v) => write!(f, "\"{}\"", v),
            AttributeValue::OctetString(v) => {
                for b in v.iter() {
                    write!(f, "{:02x}", b)?;
                }
                Ok(())
            }
            AttributeValue::Raw(v) => {
                for b in v.iter() {
                    write!(f, "{:02x}", b)?;
                }
                Ok(())
            }
        }
    }
}
