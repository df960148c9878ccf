use core::convert::From;

use xbee_data;

/// Errors
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Error {
    /// Invalid argument given
    InvalidArgument,
    /// The transport is busy, re-entrant tick or not clear to send
    Busy,
    /// Required data is not available yet, e.g. the network address
    NoData,
    /// No free slot in a table
    NoSpace,
    /// No handler accepted the envelope
    NoHandler,
    /// No matching conversation
    NotFound,
    /// The message could not be parsed
    BadMessage,
    /// The message does not fit in a frame
    MessageTooLarge,
    /// The operation is not supported
    NotSupported,
    /// Failed to pack or unpack data
    DataError(xbee_data::Error),
}

impl From<xbee_data::Error> for Error {
    fn from(error: xbee_data::Error) -> Self {
        Self::DataError(error)
    }
}
