//! # Device Profile (ZDP)
//!
//! Payloads carried on endpoint 0. The transaction sequence number that
//! starts every device profile payload is not part of these types.

mod active_endpoints;
mod bind;
mod device_announce;
mod leave;
mod match_descriptor;
mod network_address;
mod simple_descriptor;

pub use active_endpoints::{ActiveEndpointRequest, ActiveEndpointResponse, ENDPOINT_LIST_MAX};
pub use bind::{BindRequest, BIND_ADDRESS_MODE_EXTENDED};
pub use device_announce::DeviceAnnounce;
pub use leave::{LeaveFlags, ManagementLeaveRequest};
pub use match_descriptor::{MatchDescriptorRequest, MatchDescriptorResponse, MATCH_LIST_MAX};
pub use network_address::{AddressResponse, ExtendedAddressRequest, NetworkAddressRequest, RequestType};
pub use simple_descriptor::{
    ClusterList, SimpleDescriptor, SimpleDescriptorRequest, SimpleDescriptorResponse,
    DESCRIPTOR_CLUSTERS_MAX,
};

/// Endpoint of the device profile
pub const DEVICE_PROFILE_ENDPOINT: u8 = 0x00;
/// Endpoint used for broadcasting to all endpoints
pub const BROADCAST_ENDPOINT: u8 = 0xff;
/// Bit set in the cluster identifier of responses
pub const RESPONSE: u16 = 0x8000;

/// Is the endpoint usable as an application endpoint
pub fn is_application_endpoint(endpoint: u8) -> bool {
    endpoint != DEVICE_PROFILE_ENDPOINT && endpoint != BROADCAST_ENDPOINT
}

// 2.4.2 Device Profile Overview
extended_enum!(
    /// Device profile cluster identifiers
    ClusterIdentifier, u16,
    /// Request the network address of another device
    NetworkAddressRequest => 0x0000,
    /// Request the extended (IEEE) address of another device
    ExtendedAddressRequest => 0x0001,
    /// Request the node descriptor of another device
    NodeDescriptorRequest => 0x0002,
    /// Request the power descriptor of another device
    PowerDescriptorRequest => 0x0003,
    /// Request the simple descriptor of another device
    SimpleDescriptorRequest => 0x0004,
    /// Request the active endpoints of another device
    ActiveEndpointRequest => 0x0005,
    /// Find other devices that match the criteria
    MatchDescriptorRequest => 0x0006,
    /// Request the complex descriptor of another device
    ComplexDescriptorRequest => 0x0010,
    /// Request the user descriptor of another device
    UserDescriptorRequest => 0x0011,
    /// Device announcement notification
    DeviceAnnounce => 0x0013,
    /// Request a binding
    BindRequest => 0x0021,
    /// Request removal of a binding
    UnbindRequest => 0x0022,
    /// Management link quality indicator (LQI) request
    ManagementLinkQualityIndicatorRequest => 0x0031,
    /// Management routing table request
    ManagementRoutingTableRequest => 0x0032,
    /// Management binding table request
    ManagementBindingTableRequest => 0x0033,
    /// Request a device to leave the network
    ManagementLeaveRequest => 0x0034,
    /// Management permit joining request
    ManagementPermitJoiningRequest => 0x0036,
);

impl ClusterIdentifier {
    /// The cluster identifier of the response to this request
    pub fn response(self) -> u16 {
        u16::from(self) | RESPONSE
    }
}

/// Is the cluster identifier a device profile response
pub fn is_response(cluster: u16) -> bool {
    cluster & RESPONSE == RESPONSE
}

// 2.4.5 ZDP Enumeration Description
extended_enum!(
    /// Response status codes
    Status, u8,
    /// Request succeeded
    Success => 0x00,
    /// The supplied request type was invalid
    InvalidRequestType => 0x80,
    /// The requested device cannot be found
    DeviceNotFound => 0x81,
    /// The provided endpoint is invalid (0x00 or 0xff)
    InvalidEndpoint => 0x82,
    /// Endpoint is not described by a simple descriptor
    NotActive => 0x83,
    /// The requested optional feature is not supported by this device
    NotSupported => 0x84,
    /// The request timed out
    Timeout => 0x85,
    /// Bind request was unsuccessful because the requested cluster was not found
    NoMatch => 0x86,
    /// Failed to unbind because lack of binding entries
    NoEntry => 0x88,
    /// The child descriptor is not available to the parent
    NoDescriptor => 0x89,
    /// The device do not have sufficient storage to support the request
    InsufficientSpace => 0x8a,
    /// The device could not complete the operation at this time
    NotPermitted => 0x8b,
    /// The device could not complete the operation since the table is full
    TableFull => 0x8c,
    /// The device was not authorised to complete the operation
    NotAuthorised => 0x8d,
    /// The device could not complete the operation because the device binding table is full
    DeviceBindingTableFull => 0x8e,
    /// The index is out of range
    InvalidIndex => 0x8f,
);
