extended_enum!(
    /// Attribute data type
    AttributeDataType, u8,
    None => 0x00,
    Data8 => 0x08,
    Data16 => 0x09,
    Data24 => 0x0a,
    Data32 => 0x0b,
    Data40 => 0x0c,
    Data48 => 0x0d,
    Data56 => 0x0e,
    Data64 => 0x0f,
    Boolean => 0x10,
    Bitmap8 => 0x18,
    Bitmap16 => 0x19,
    Bitmap24 => 0x1a,
    Bitmap32 => 0x1b,
    Bitmap40 => 0x1c,
    Bitmap48 => 0x1d,
    Bitmap56 => 0x1e,
    Bitmap64 => 0x1f,
    Unsigned8 => 0x20,
    Unsigned16 => 0x21,
    Unsigned24 => 0x22,
    Unsigned32 => 0x23,
    Unsigned40 => 0x24,
    Unsigned48 => 0x25,
    Unsigned56 => 0x26,
    Unsigned64 => 0x27,
    Signed8 => 0x28,
    Signed16 => 0x29,
    Signed24 => 0x2a,
    Signed32 => 0x2b,
    Signed40 => 0x2c,
    Signed48 => 0x2d,
    Signed56 => 0x2e,
    Signed64 => 0x2f,
    Enumeration8 => 0x30,
    Enumeration16 => 0x31,
    FloatingPoint16 => 0x38,
    FloatingPoint32 => 0x39,
    FloatingPoint64 => 0x3a,
    OctetString => 0x41,
    CharacterString => 0x42,
    LongOctetString => 0x43,
    LongCharacterString => 0x44,
    TimeOfDay => 0xe0,
    Date => 0xe1,
    UtcTime => 0xe2,
    ClusterIdentifier => 0xe8,
    AttributeIdentifier => 0xe9,
    BuildingAutomationControlNetworkObjectIdentifier => 0xea,
    IeeeAddress => 0xf0,
    Key128 => 0xf1,
    Unknown => 0xff,
);

impl AttributeDataType {
    /// Number of octets of a fixed size type, `None` for variable sized
    /// types
    pub fn num_octets(self) -> Option<usize> {
        match self {
            AttributeDataType::None | AttributeDataType::Unknown => Some(0),
            AttributeDataType::Data8
            | AttributeDataType::Boolean
            | AttributeDataType::Bitmap8
            | AttributeDataType::Unsigned8
            | AttributeDataType::Signed8
            | AttributeDataType::Enumeration8 => Some(1),
            AttributeDataType::Data16
            | AttributeDataType::Bitmap16
            | AttributeDataType::Unsigned16
            | AttributeDataType::Signed16
            | AttributeDataType::Enumeration16
            | AttributeDataType::FloatingPoint16
            | AttributeDataType::ClusterIdentifier
            | AttributeDataType::AttributeIdentifier => Some(2),
            AttributeDataType::Data24
            | AttributeDataType::Bitmap24
            | AttributeDataType::Unsigned24
            | AttributeDataType::Signed24 => Some(3),
            AttributeDataType::Data32
            | AttributeDataType::Bitmap32
            | AttributeDataType::Unsigned32
            | AttributeDataType::Signed32
            | AttributeDataType::FloatingPoint32
            | AttributeDataType::TimeOfDay
            | AttributeDataType::Date
            | AttributeDataType::UtcTime
            | AttributeDataType::BuildingAutomationControlNetworkObjectIdentifier => Some(4),
            AttributeDataType::Data40
            | AttributeDataType::Bitmap40
            | AttributeDataType::Unsigned40
            | AttributeDataType::Signed40 => Some(5),
            AttributeDataType::Data48
            | AttributeDataType::Bitmap48
            | AttributeDataType::Unsigned48
            | AttributeDataType::Signed48 => Some(6),
            AttributeDataType::Data56
            | AttributeDataType::Bitmap56
            | AttributeDataType::Unsigned56
            | AttributeDataType::Signed56 => Some(7),
            AttributeDataType::Data64
            | AttributeDataType::Bitmap64
            | AttributeDataType::Unsigned64
            | AttributeDataType::Signed64
            | AttributeDataType::FloatingPoint64
            | AttributeDataType::IeeeAddress => Some(8),
            AttributeDataType::Key128 => Some(16),
            AttributeDataType::OctetString
            | AttributeDataType::CharacterString
            | AttributeDataType::LongOctetString
            | AttributeDataType::LongCharacterString => None,
        }
    }

    /// Size of the length prefix of string types
    pub fn length_prefix(self) -> Option<usize> {
        match self {
            AttributeDataType::OctetString | AttributeDataType::CharacterString => Some(1),
            AttributeDataType::LongOctetString | AttributeDataType::LongCharacterString => Some(2),
            _ => None,
        }
    }

    /// Signed integer or floating point type
    pub fn is_signed(self) -> bool {
        matches!(
            self,
            AttributeDataType::Signed8
                | AttributeDataType::Signed16
                | AttributeDataType::Signed24
                | AttributeDataType::Signed32
                | AttributeDataType::Signed40
                | AttributeDataType::Signed48
                | AttributeDataType::Signed56
                | AttributeDataType::Signed64
        ) || self.is_float()
    }

    /// Floating point type
    pub fn is_float(self) -> bool {
        matches!(
            self,
            AttributeDataType::FloatingPoint16
                | AttributeDataType::FloatingPoint32
                | AttributeDataType::FloatingPoint64
        )
    }

    /// Character string type
    pub fn is_character_string(self) -> bool {
        matches!(
            self,
            AttributeDataType::CharacterString | AttributeDataType::LongCharacterString
        )
    }

    /// Types that carry a value, `None` and `Unknown` do not
    pub fn has_value(self) -> bool {
        !matches!(self, AttributeDataType::None | AttributeDataType::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn data_type_sizes() {
        assert_eq!(AttributeDataType::Boolean.num_octets(), Some(1));
        assert_eq!(AttributeDataType::Signed24.num_octets(), Some(3));
        assert_eq!(AttributeDataType::UtcTime.num_octets(), Some(4));
        assert_eq!(AttributeDataType::Key128.num_octets(), Some(16));
        assert_eq!(AttributeDataType::CharacterString.num_octets(), None);
        assert_eq!(AttributeDataType::CharacterString.length_prefix(), Some(1));
        assert_eq!(AttributeDataType::LongOctetString.length_prefix(), Some(2));
        assert!(AttributeDataType::Signed8.is_signed());
        assert!(AttributeDataType::FloatingPoint32.is_signed());
        assert!(AttributeDataType::FloatingPoint32.is_float());
        assert!(!AttributeDataType::Unsigned32.is_signed());
    }

    #[test]
    fn invalid_data_types() {
        for value in [0x01u8, 0x07, 0x11, 0x17, 0x32, 0x37, 0x3b, 0x40, 0x45, 0x48, 0x4c, 0x50, 0x51, 0x5f] {
            assert_eq!(
                AttributeDataType::try_from(value),
                Err(Error::InvalidValue),
                "type {:02x}",
                value
            );
        }
        assert_eq!(
            AttributeDataType::try_from(0x2au8),
            Ok(AttributeDataType::Signed24)
        );
    }
}
