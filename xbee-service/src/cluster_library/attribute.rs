//! Attribute tables and the attribute value codec
//!
//! Attributes are described by static tables, sorted by identifier, that
//! point at the storage holding the value. Storage is interior mutable so
//! that the tables themselves can be shared.

use core::cell::{Cell, RefCell};

use byteorder::{ByteOrder, LittleEndian};
use heapless::Vec;

use xbee_data::cluster_library::{
    AttributeDataType, AttributeValue, ClusterLibraryStatus, RAW_VALUE_MAX,
};
use xbee_data::common::types::{CharacterString, OctetString};

bitflags! {
    /// Attribute table flags
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct AttributeFlags: u8 {
        /// Can not be written over the air
        const READ_ONLY = 0x01;
        /// Can not be read over the air
        const WRITE_ONLY = 0x02;
        /// Storage holds the little endian wire bytes
        const RAW = 0x04;
    }
}

bitflags! {
    /// Attribute record parsing flags
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct RecordFlags: u8 {
        /// Assign the parsed value to the attribute
        const ASSIGN = 0x01;
        /// Records are read attributes response records, with a status
        const READ_RESPONSE = 0x02;
    }
}

/// Backing storage of a attribute value
pub trait AttributeStorage {
    /// Current value
    fn load(&self) -> AttributeValue;
    /// Replace the value
    fn store(&self, value: &AttributeValue) -> Result<(), ClusterLibraryStatus>;
}

macro_rules! integer_storage {
    ($variant:ident, $wide:ty, $($t:ty),+) => {
        $(
            impl AttributeStorage for Cell<$t> {
                fn load(&self) -> AttributeValue {
                    AttributeValue::$variant(<$wide>::from(self.get()))
                }

                fn store(&self, value: &AttributeValue) -> Result<(), ClusterLibraryStatus> {
                    match value {
                        AttributeValue::$variant(v) => {
                            let v = <$t>::try_from(*v)
                                .map_err(|_| ClusterLibraryStatus::InvalidValue)?;
                            self.set(v);
                            Ok(())
                        }
                        _ => Err(ClusterLibraryStatus::InvalidDataType),
                    }
                }
            }
        )+
    };
}

integer_storage!(Unsigned, u64, u8, u16, u32, u64);
integer_storage!(Signed, i64, i8, i16, i32, i64);

impl AttributeStorage for Cell<bool> {
    fn load(&self) -> AttributeValue {
        AttributeValue::Boolean(self.get())
    }

    fn store(&self, value: &AttributeValue) -> Result<(), ClusterLibraryStatus> {
        match value {
            AttributeValue::Boolean(v) => {
                self.set(*v);
                Ok(())
            }
            _ => Err(ClusterLibraryStatus::InvalidDataType),
        }
    }
}

impl AttributeStorage for Cell<f32> {
    fn load(&self) -> AttributeValue {
        AttributeValue::FloatingPoint32(self.get())
    }

    fn store(&self, value: &AttributeValue) -> Result<(), ClusterLibraryStatus> {
        match value {
            AttributeValue::FloatingPoint32(v) => {
                self.set(*v);
                Ok(())
            }
            _ => Err(ClusterLibraryStatus::InvalidDataType),
        }
    }
}

impl AttributeStorage for RefCell<CharacterString> {
    fn load(&self) -> AttributeValue {
        AttributeValue::CharacterString(self.borrow().clone())
    }

    fn store(&self, value: &AttributeValue) -> Result<(), ClusterLibraryStatus> {
        match value {
            AttributeValue::CharacterString(v) => {
                self.replace(v.clone());
                Ok(())
            }
            _ => Err(ClusterLibraryStatus::InvalidDataType),
        }
    }
}

impl AttributeStorage for RefCell<OctetString> {
    fn load(&self) -> AttributeValue {
        AttributeValue::OctetString(self.borrow().clone())
    }

    fn store(&self, value: &AttributeValue) -> Result<(), ClusterLibraryStatus> {
        match value {
            AttributeValue::OctetString(v) => {
                self.replace(v.clone());
                Ok(())
            }
            _ => Err(ClusterLibraryStatus::InvalidDataType),
        }
    }
}

/// Opaque little endian storage, used with `AttributeFlags::RAW`
impl<const N: usize> AttributeStorage for Cell<[u8; N]> {
    fn load(&self) -> AttributeValue {
        let mut raw = Vec::new();
        for octet in self.get().iter().take(RAW_VALUE_MAX) {
            let _ = raw.push(*octet);
        }
        AttributeValue::Raw(raw)
    }

    fn store(&self, value: &AttributeValue) -> Result<(), ClusterLibraryStatus> {
        match value {
            AttributeValue::Raw(v) if v.len() == N => {
                let mut octets = [0u8; N];
                octets.copy_from_slice(v);
                self.set(octets);
                Ok(())
            }
            AttributeValue::Raw(_) => Err(ClusterLibraryStatus::InvalidValue),
            _ => Err(ClusterLibraryStatus::InvalidDataType),
        }
    }
}

/// Inclusive value range of a integer attribute, the maximum is the
/// maximum length for string attributes
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AttributeLimits {
    pub minimum: Option<i64>,
    pub maximum: Option<i64>,
}

/// Hooks for attributes with a live value or side effects of writes
pub trait AttributeHooks {
    /// Called before the value is encoded for a read
    fn refresh(&self, _attribute: &Attribute) -> Result<(), ClusterLibraryStatus> {
        Ok(())
    }

    /// Parse, and assign if requested, the value of a write record
    ///
    /// `record.data` starts at the value. Returns the number of bytes
    /// consumed.
    fn write(&self, attribute: &Attribute, record: &mut AttributeRecord) -> usize {
        decode_attribute(attribute, record)
    }
}

/// Attribute table entry
#[derive(Clone, Copy)]
pub struct Attribute<'a> {
    pub identifier: u16,
    pub data_type: AttributeDataType,
    pub flags: AttributeFlags,
    /// Storage, `None` for values defined out of band
    pub storage: Option<&'a dyn AttributeStorage>,
    pub limits: Option<AttributeLimits>,
    pub hooks: Option<&'a dyn AttributeHooks>,
}

impl<'a> Attribute<'a> {
    pub fn new(
        identifier: u16,
        data_type: AttributeDataType,
        flags: AttributeFlags,
        storage: &'a dyn AttributeStorage,
    ) -> Self {
        Self {
            identifier,
            data_type,
            flags,
            storage: Some(storage),
            limits: None,
            hooks: None,
        }
    }

    /// Stand-in for a unknown or rejected attribute, used to step over the
    /// value of a write record
    fn ghost(identifier: u16, data_type: AttributeDataType) -> Self {
        Self {
            identifier,
            data_type,
            flags: AttributeFlags::empty(),
            storage: None,
            limits: None,
            hooks: None,
        }
    }

    pub fn with_limits(mut self, minimum: Option<i64>, maximum: Option<i64>) -> Self {
        self.limits = Some(AttributeLimits { minimum, maximum });
        self
    }

    pub fn with_hooks(mut self, hooks: &'a dyn AttributeHooks) -> Self {
        self.hooks = Some(hooks);
        self
    }
}

/// Attribute tables of a cluster for one manufacturer
#[derive(Clone, Copy)]
pub struct AttributeTree<'a> {
    /// Manufacturer code, `None` for the standard attributes
    pub manufacturer: Option<u16>,
    /// Attributes of the server side, sorted by identifier
    pub server: &'a [Attribute<'a>],
    /// Attributes of the client side, sorted by identifier
    pub client: &'a [Attribute<'a>],
}

impl<'a> AttributeTree<'a> {
    /// Standard server attributes only
    pub fn server(attributes: &'a [Attribute<'a>]) -> Self {
        Self {
            manufacturer: None,
            server: attributes,
            client: &[],
        }
    }
}

/// Cursor over the records of a write attributes request or read
/// attributes response
#[derive(Debug)]
pub struct AttributeRecord<'d> {
    /// Data not yet parsed
    pub data: &'d [u8],
    pub flags: RecordFlags,
    /// Status of the current record
    pub status: ClusterLibraryStatus,
}

impl<'d> AttributeRecord<'d> {
    pub fn new(data: &'d [u8], flags: RecordFlags) -> Self {
        Self {
            data,
            flags,
            status: ClusterLibraryStatus::Success,
        }
    }

    /// Set the status unless a earlier error is recorded
    pub fn fail(&mut self, status: ClusterLibraryStatus) {
        if self.status == ClusterLibraryStatus::Success {
            self.status = status;
        }
    }
}

pub fn find_attribute<'t, 'a>(
    attributes: &'t [Attribute<'a>],
    identifier: u16,
) -> Option<&'t Attribute<'a>> {
    attributes.iter().find(|a| a.identifier == identifier)
}

/// Check the wire value in `data` against the limits of the attribute
///
/// Only integer types of up to four octets are checked.
pub fn check_limits(attribute: &Attribute, data: &[u8]) -> ClusterLibraryStatus {
    let limits = match attribute.limits {
        Some(limits) => limits,
        None => return ClusterLibraryStatus::Success,
    };
    let size = match attribute.data_type.num_octets() {
        Some(size) if (1..=4).contains(&size) && !attribute.data_type.is_float() => size,
        _ => return ClusterLibraryStatus::Success,
    };
    if data.len() < size {
        return ClusterLibraryStatus::MalformedCommand;
    }
    let value = if attribute.data_type.is_signed() {
        LittleEndian::read_int(&data[..size], size)
    } else {
        LittleEndian::read_uint(&data[..size], size) as i64
    };
    let below = limits.minimum.map_or(false, |minimum| value < minimum);
    let above = limits.maximum.map_or(false, |maximum| value > maximum);
    if below || above {
        ClusterLibraryStatus::InvalidValue
    } else {
        ClusterLibraryStatus::Success
    }
}

fn assign(attribute: &Attribute, value: &AttributeValue) -> ClusterLibraryStatus {
    match attribute.storage {
        Some(storage) => match storage.store(value) {
            Ok(()) => ClusterLibraryStatus::Success,
            Err(status) => status,
        },
        None => ClusterLibraryStatus::DefinedOutOfBand,
    }
}

fn decode_fixed(attribute: &Attribute, data: &[u8], assign_value: bool) -> ClusterLibraryStatus {
    if attribute.data_type == AttributeDataType::Boolean && data[0] & 0xfe != 0 {
        return ClusterLibraryStatus::InvalidValue;
    }
    if !assign_value {
        return ClusterLibraryStatus::Success;
    }
    if attribute.flags.contains(AttributeFlags::RAW) {
        let mut raw = Vec::new();
        if raw.extend_from_slice(data).is_err() {
            return ClusterLibraryStatus::InsufficientSpace;
        }
        return assign(attribute, &AttributeValue::Raw(raw));
    }
    match AttributeValue::unpack(data, attribute.data_type) {
        Ok((value, _)) => assign(attribute, &value),
        Err(_) => ClusterLibraryStatus::InvalidValue,
    }
}

fn decode_string(
    attribute: &Attribute,
    data: &[u8],
    prefix: usize,
    assign_value: bool,
) -> (ClusterLibraryStatus, usize) {
    if data.len() < prefix {
        return (ClusterLibraryStatus::MalformedCommand, data.len());
    }
    let length = if prefix == 2 {
        LittleEndian::read_u16(&data[..2]) as usize
    } else {
        data[0] as usize
    };
    let end = prefix + length;
    if end > data.len() {
        return (ClusterLibraryStatus::MalformedCommand, data.len());
    }
    let maximum = attribute.limits.and_then(|l| l.maximum).unwrap_or(0);
    if maximum > 0 && length as i64 > maximum {
        return (ClusterLibraryStatus::InvalidValue, end);
    }
    if !assign_value {
        return (ClusterLibraryStatus::Success, end);
    }
    let status = match AttributeValue::unpack(&data[..end], attribute.data_type) {
        Ok((value, _)) => assign(attribute, &value),
        Err(xbee_data::Error::NotEnoughSpace) => ClusterLibraryStatus::InsufficientSpace,
        Err(_) => ClusterLibraryStatus::InvalidValue,
    };
    (status, end)
}

/// Parse the value at the start of `record.data` as the type of the
/// attribute, and assign it when the record has the `ASSIGN` flag
///
/// Returns the number of bytes consumed, `record.data` is not advanced.
/// Errors are recorded in `record.status` unless it already holds one.
pub fn decode_attribute(attribute: &Attribute, record: &mut AttributeRecord) -> usize {
    let data = record.data;
    let mut assign_value = record.flags.contains(RecordFlags::ASSIGN);
    let mut status = ClusterLibraryStatus::Success;
    if assign_value && attribute.storage.is_none() {
        status = ClusterLibraryStatus::DefinedOutOfBand;
        assign_value = false;
    }
    let consumed = match (attribute.data_type.num_octets(), attribute.data_type.length_prefix()) {
        (Some(_), _) if !attribute.data_type.has_value() => {
            status = ClusterLibraryStatus::InvalidDataType;
            0
        }
        (Some(size), _) => {
            if data.len() < size {
                status = ClusterLibraryStatus::MalformedCommand;
                data.len()
            } else {
                let result = decode_fixed(attribute, &data[..size], assign_value);
                if status == ClusterLibraryStatus::Success {
                    status = result;
                }
                size
            }
        }
        (None, Some(prefix)) => {
            let (result, consumed) = decode_string(attribute, data, prefix, assign_value);
            if status == ClusterLibraryStatus::Success {
                status = result;
            }
            consumed
        }
        (None, None) => {
            status = ClusterLibraryStatus::InvalidDataType;
            data.len()
        }
    };
    record.fail(status);
    consumed
}

/// Parse one write record, `identifier type value`, or one read response
/// record, `identifier status [type value]`, advancing `record.data` past it
///
/// Values of rejected records are stepped over so that parsing can go on
/// with the next record. A malformed record consumes all remaining data.
pub fn parse_attribute_record(attributes: &[Attribute], record: &mut AttributeRecord) {
    let data = record.data;
    let value_offset = if record.flags.contains(RecordFlags::READ_RESPONSE) {
        if data.len() >= 3 && data[2] != u8::from(ClusterLibraryStatus::Success) {
            record.data = &data[3..];
            return;
        }
        4
    } else {
        3
    };
    if data.len() < value_offset {
        log::warn!("> Attribute record too short, {} bytes", data.len());
        record.fail(ClusterLibraryStatus::MalformedCommand);
        record.data = &[];
        return;
    }
    let identifier = LittleEndian::read_u16(&data[..2]);
    let type_octet = data[value_offset - 1];
    let data_type = AttributeDataType::try_from(type_octet);
    let value = &data[value_offset..];

    let entry = find_attribute(attributes, identifier);
    let status = match (entry, data_type) {
        (None, _) => ClusterLibraryStatus::UnsupportedAttribute,
        (Some(_), Err(_)) => ClusterLibraryStatus::MalformedCommand,
        (Some(entry), Ok(data_type)) if entry.data_type != data_type => {
            ClusterLibraryStatus::InvalidDataType
        }
        (Some(entry), _) if entry.flags.contains(AttributeFlags::READ_ONLY) => {
            ClusterLibraryStatus::ReadOnly
        }
        (Some(entry), _)
            if entry
                .data_type
                .num_octets()
                .map_or(false, |size| size > value.len()) =>
        {
            ClusterLibraryStatus::MalformedCommand
        }
        (Some(entry), _) => check_limits(entry, value),
    };
    record.fail(status);
    record.data = value;

    if record.status == ClusterLibraryStatus::MalformedCommand {
        log::warn!("> Malformed record for attribute {:04x}", identifier);
        record.data = &[];
        return;
    }

    let consumed = if record.status != ClusterLibraryStatus::Success {
        log::info!(
            "> Attribute {:04x} rejected, {:?}",
            identifier,
            record.status
        );
        record.flags.remove(RecordFlags::ASSIGN);
        match data_type {
            Ok(data_type) => decode_attribute(&Attribute::ghost(identifier, data_type), record),
            Err(_) => record.data.len(),
        }
    } else {
        match entry {
            Some(entry) => match entry.hooks {
                Some(hooks) => hooks.write(entry, record),
                None => decode_attribute(entry, record),
            },
            None => record.data.len(),
        }
    };
    let consumed = core::cmp::min(consumed, record.data.len());
    record.data = &record.data[consumed..];
}

/// Encode the current value of the attribute into `data`, returns the
/// number of bytes written
pub fn encode_attribute_value(
    attribute: &Attribute,
    data: &mut [u8],
) -> Result<usize, ClusterLibraryStatus> {
    let storage = attribute
        .storage
        .ok_or(ClusterLibraryStatus::DefinedOutOfBand)?;
    if let Some(hooks) = attribute.hooks {
        hooks.refresh(attribute)?;
    }
    if let Some(size) = attribute.data_type.num_octets() {
        if data.len() < size {
            return Err(ClusterLibraryStatus::InsufficientSpace);
        }
    }
    let value = match (attribute.data_type, storage.load()) {
        (AttributeDataType::Boolean, value) => {
            AttributeValue::Boolean(value.as_i64().map_or(false, |v| v != 0))
        }
        (_, value) => value,
    };
    value
        .pack(attribute.data_type, data)
        .map_err(|err| match err {
            xbee_data::Error::NotEnoughSpace => ClusterLibraryStatus::InsufficientSpace,
            _ => ClusterLibraryStatus::SoftwareFailure,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn string(text: &str) -> CharacterString {
        let mut value = CharacterString::new();
        value.push_str(text).unwrap();
        value
    }

    #[test]
    fn integer_storage() {
        let level = Cell::new(0u8);
        assert_eq!(level.store(&AttributeValue::Unsigned(0xfe)), Ok(()));
        assert_eq!(level.load(), AttributeValue::Unsigned(0xfe));
        assert_eq!(
            level.store(&AttributeValue::Unsigned(0x100)),
            Err(ClusterLibraryStatus::InvalidValue)
        );
        assert_eq!(
            level.store(&AttributeValue::Signed(1)),
            Err(ClusterLibraryStatus::InvalidDataType)
        );
        let offset = Cell::new(0i16);
        assert_eq!(offset.store(&AttributeValue::Signed(-300)), Ok(()));
        assert_eq!(offset.get(), -300);
    }

    #[test]
    fn limits_with_sign_extension() {
        let storage = Cell::new(0i8);
        let attribute = Attribute::new(
            0x0001,
            AttributeDataType::Signed8,
            AttributeFlags::empty(),
            &storage,
        )
        .with_limits(Some(-10), Some(10));
        assert_eq!(check_limits(&attribute, &[0xf6]), ClusterLibraryStatus::Success);
        assert_eq!(check_limits(&attribute, &[0xf5]), ClusterLibraryStatus::InvalidValue);
        assert_eq!(check_limits(&attribute, &[0x0b]), ClusterLibraryStatus::InvalidValue);

        let storage = Cell::new(0u16);
        let attribute = Attribute::new(
            0x0002,
            AttributeDataType::Unsigned16,
            AttributeFlags::empty(),
            &storage,
        )
        .with_limits(Some(0x0100), Some(0xfff0));
        assert_eq!(check_limits(&attribute, &[0xf0, 0xff]), ClusterLibraryStatus::Success);
        assert_eq!(
            check_limits(&attribute, &[0xf1, 0xff]),
            ClusterLibraryStatus::InvalidValue
        );
        assert_eq!(
            check_limits(&attribute, &[0xff, 0x00]),
            ClusterLibraryStatus::InvalidValue
        );
    }

    #[test]
    fn decode_boolean() {
        let storage = Cell::new(false);
        let attribute = Attribute::new(
            0x0012,
            AttributeDataType::Boolean,
            AttributeFlags::empty(),
            &storage,
        );
        let mut record = AttributeRecord::new(&[0x01, 0x55], RecordFlags::ASSIGN);
        assert_eq!(decode_attribute(&attribute, &mut record), 1);
        assert_eq!(record.status, ClusterLibraryStatus::Success);
        assert!(storage.get());

        let mut record = AttributeRecord::new(&[0x02], RecordFlags::ASSIGN);
        assert_eq!(decode_attribute(&attribute, &mut record), 1);
        assert_eq!(record.status, ClusterLibraryStatus::InvalidValue);
        assert!(storage.get());
    }

    #[test]
    fn decode_string_within_maximum() {
        let storage = RefCell::new(CharacterString::new());
        let attribute = Attribute::new(
            0x0010,
            AttributeDataType::CharacterString,
            AttributeFlags::empty(),
            &storage,
        )
        .with_limits(None, Some(4));

        let mut record = AttributeRecord::new(b"\x04hall", RecordFlags::ASSIGN);
        assert_eq!(decode_attribute(&attribute, &mut record), 5);
        assert_eq!(record.status, ClusterLibraryStatus::Success);
        assert_eq!(*storage.borrow(), string("hall"));

        let mut record = AttributeRecord::new(b"\x05attic", RecordFlags::ASSIGN);
        assert_eq!(decode_attribute(&attribute, &mut record), 6);
        assert_eq!(record.status, ClusterLibraryStatus::InvalidValue);
        assert_eq!(*storage.borrow(), string("hall"));

        // length beyond the data
        let mut record = AttributeRecord::new(b"\x05at", RecordFlags::ASSIGN);
        assert_eq!(decode_attribute(&attribute, &mut record), 3);
        assert_eq!(record.status, ClusterLibraryStatus::MalformedCommand);
    }

    #[test]
    fn decode_out_of_band() {
        let attribute = Attribute::ghost(0x0001, AttributeDataType::Unsigned16);
        let mut record = AttributeRecord::new(&[0x01, 0x02, 0x03], RecordFlags::ASSIGN);
        assert_eq!(decode_attribute(&attribute, &mut record), 2);
        assert_eq!(record.status, ClusterLibraryStatus::DefinedOutOfBand);

        let mut record = AttributeRecord::new(&[0x01, 0x02, 0x03], RecordFlags::empty());
        assert_eq!(decode_attribute(&attribute, &mut record), 2);
        assert_eq!(record.status, ClusterLibraryStatus::Success);
    }

    #[test]
    fn raw_storage() {
        let storage = Cell::new([0u8; 8]);
        let attribute = Attribute::new(
            0x0001,
            AttributeDataType::IeeeAddress,
            AttributeFlags::RAW,
            &storage,
        );
        let wire = [0xaa, 0x2b, 0x52, 0x40, 0x00, 0xa2, 0x13, 0x00];
        let mut record = AttributeRecord::new(&wire, RecordFlags::ASSIGN);
        assert_eq!(decode_attribute(&attribute, &mut record), 8);
        assert_eq!(storage.get(), wire);
        let mut data = [0u8; 8];
        assert_eq!(encode_attribute_value(&attribute, &mut data), Ok(8));
        assert_eq!(data, wire);
    }

    #[test]
    fn encode_values() {
        let level = Cell::new(0x1234_5678u32);
        let attribute = Attribute::new(
            0x0000,
            AttributeDataType::Unsigned24,
            AttributeFlags::empty(),
            &level,
        );
        let mut data = [0u8; 4];
        assert_eq!(encode_attribute_value(&attribute, &mut data), Ok(3));
        assert_eq!(data[..3], [0x78, 0x56, 0x34]);
        assert_eq!(
            encode_attribute_value(&attribute, &mut data[..2]),
            Err(ClusterLibraryStatus::InsufficientSpace)
        );

        let flag = Cell::new(7u8);
        let attribute = Attribute::new(
            0x0000,
            AttributeDataType::Boolean,
            AttributeFlags::empty(),
            &flag,
        );
        assert_eq!(encode_attribute_value(&attribute, &mut data), Ok(1));
        assert_eq!(data[0], 0x01);

        let name = RefCell::new(string("XBee"));
        let attribute = Attribute::new(
            0x0004,
            AttributeDataType::CharacterString,
            AttributeFlags::READ_ONLY,
            &name,
        );
        let mut data = [0u8; 8];
        assert_eq!(encode_attribute_value(&attribute, &mut data), Ok(5));
        assert_eq!(data[..5], *b"\x04XBee");
        assert_eq!(
            encode_attribute_value(&attribute, &mut data[..4]),
            Err(ClusterLibraryStatus::InsufficientSpace)
        );

        let attribute = Attribute::ghost(0x0005, AttributeDataType::Unsigned8);
        assert_eq!(
            encode_attribute_value(&attribute, &mut data),
            Err(ClusterLibraryStatus::DefinedOutOfBand)
        );
    }

    #[test]
    fn parse_rejected_records() {
        let level = Cell::new(0u8);
        let name = RefCell::new(CharacterString::new());
        let attributes = [
            Attribute::new(
                0x0000,
                AttributeDataType::Unsigned8,
                AttributeFlags::empty(),
                &level,
            ),
            Attribute::new(
                0x0004,
                AttributeDataType::CharacterString,
                AttributeFlags::READ_ONLY,
                &name,
            ),
        ];
        let payload = [
            0x04, 0x00, 0x42, 0x02, b'a', b'b', // read only
            0x07, 0x00, 0x21, 0x01, 0x02, // unknown
            0x00, 0x00, 0x21, 0x01, 0x02, // wrong type
            0x00, 0x00, 0x20, 0x2a, // ok
        ];
        let mut record = AttributeRecord::new(&payload, RecordFlags::ASSIGN);
        let mut statuses = std::vec::Vec::new();
        while !record.data.is_empty() {
            record.status = ClusterLibraryStatus::Success;
            parse_attribute_record(&attributes, &mut record);
            statuses.push(record.status);
        }
        assert_eq!(
            statuses,
            [
                ClusterLibraryStatus::ReadOnly,
                ClusterLibraryStatus::UnsupportedAttribute,
                ClusterLibraryStatus::InvalidDataType,
                ClusterLibraryStatus::Success,
            ]
        );
        assert_eq!(level.get(), 0x2a);
        assert!(name.borrow().is_empty());
    }

    #[test]
    fn parse_malformed_record() {
        let level = Cell::new(0u16);
        let attributes = [Attribute::new(
            0x0000,
            AttributeDataType::Unsigned16,
            AttributeFlags::empty(),
            &level,
        )];
        // value cut short
        let mut record = AttributeRecord::new(&[0x00, 0x00, 0x21, 0x01], RecordFlags::ASSIGN);
        parse_attribute_record(&attributes, &mut record);
        assert_eq!(record.status, ClusterLibraryStatus::MalformedCommand);
        assert!(record.data.is_empty());

        // unparseable type
        let mut record =
            AttributeRecord::new(&[0x00, 0x00, 0x4c, 0x01, 0x00], RecordFlags::ASSIGN);
        parse_attribute_record(&attributes, &mut record);
        assert_eq!(record.status, ClusterLibraryStatus::MalformedCommand);
        assert!(record.data.is_empty());
        assert_eq!(level.get(), 0);
    }
}
