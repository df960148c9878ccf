//! # Error handling

/// Errors
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Error {
    /// Not enough space for the operation
    NotEnoughSpace,
    /// Wrong number of bytes provided to the operation
    WrongNumberOfBytes,
    /// The value provided is invalid
    InvalidValue,
    /// The frame type is unknown
    UnknownFrameType,
    /// The frame checksum did not add up
    InvalidChecksum,
    /// The frame length is out of bounds
    InvalidLength,
    /// The attribute value is unsupported
    UnsupportedAttributeValue,
}
