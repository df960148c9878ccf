//! # Application service
//!
//! Envelopes carry the application addressing of a message, endpoints,
//! cluster and profile, together with the payload. Received envelopes are
//! routed through the endpoint and cluster tables to their handlers.

mod conversation;
mod explicit;

pub use conversation::{
    ConversationHandler, ConversationStatus, EndpointState, MAX_CONVERSATIONS,
};

use xbee_data::device_profile::BROADCAST_ENDPOINT;
use xbee_data::{ExtendedAddress, NetworkAddress};

use crate::cluster_library;
use crate::Error;

/// Profile identifier matching any profile
pub const WILDCARD_PROFILE: u16 = 0xffff;

bitflags! {
    /// Envelope options
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct EnvelopeOptions: u8 {
        /// Received as a broadcast
        const BROADCAST_ADDRESS = 0x01;
        /// Sent to the broadcast endpoint
        const BROADCAST_ENDPOINT = 0x02;
        /// Received with APS encryption
        const RECEIVED_ENCRYPTED = 0x04;
        /// Send with APS encryption
        const ENCRYPT = 0x10;
        /// Cluster requires encryption of unicast messages
        const ENCRYPT_UNICAST = 0x20;
        /// Cluster does not use the cluster library
        const NOT_CLUSTER_LIBRARY = 0x40;
        /// Options derived from the cluster table
        const CLUSTER_OPTIONS = Self::ENCRYPT.bits()
            | Self::ENCRYPT_UNICAST.bits()
            | Self::NOT_CLUSTER_LIBRARY.bits();
    }
}

bitflags! {
    /// Cluster table flags
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ClusterFlags: u8 {
        /// Input cluster, this endpoint is the server
        const INPUT = 0x01;
        /// Output cluster, this endpoint is the client
        const OUTPUT = 0x02;
        /// Only accept encrypted messages
        const ENCRYPT = 0x10;
        /// Only accept encrypted unicast messages
        const ENCRYPT_UNICAST = 0x20;
        /// Not a cluster library cluster
        const NOT_CLUSTER_LIBRARY = 0x40;
    }
}

/// Addressing and payload of a message
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Envelope<'p> {
    /// Extended address of the remote device
    pub extended_address: ExtendedAddress,
    /// Network address of the remote device
    pub network_address: NetworkAddress,
    /// Source endpoint
    pub source_endpoint: u8,
    /// Destination endpoint
    pub destination_endpoint: u8,
    /// Cluster identifier
    pub cluster: u16,
    /// Profile identifier
    pub profile: u16,
    /// Options
    pub options: EnvelopeOptions,
    /// Payload
    pub payload: &'p [u8],
}

impl<'p> Envelope<'p> {
    /// Envelope for the device profile of a remote device, endpoints,
    /// cluster and profile are 0
    pub fn new(extended_address: ExtendedAddress, network_address: NetworkAddress) -> Self {
        Self {
            extended_address,
            network_address,
            source_endpoint: 0,
            destination_endpoint: 0,
            cluster: 0,
            profile: 0,
            options: EnvelopeOptions::empty(),
            payload: &[],
        }
    }

    /// Envelope for a reply to this envelope carrying `payload`
    ///
    /// The addressing is kept, the endpoints are swapped. The reply is
    /// encrypted if this envelope was received encrypted.
    pub fn reply<'b>(&self, payload: &'b [u8]) -> Envelope<'b> {
        let options = if self.options.contains(EnvelopeOptions::RECEIVED_ENCRYPTED) {
            EnvelopeOptions::ENCRYPT
        } else {
            EnvelopeOptions::empty()
        };
        Envelope {
            extended_address: self.extended_address,
            network_address: self.network_address,
            source_endpoint: self.destination_endpoint,
            destination_endpoint: self.source_endpoint,
            cluster: self.cluster,
            profile: self.profile,
            options,
            payload,
        }
    }

    /// Was the envelope sent to a broadcast address or endpoint
    pub fn is_broadcast(&self) -> bool {
        self.options
            .intersects(EnvelopeOptions::BROADCAST_ADDRESS | EnvelopeOptions::BROADCAST_ENDPOINT)
    }
}

/// Receiver of envelopes
pub trait EnvelopeHandler {
    /// Handle a envelope routed to this handler
    fn receive(&self, service: &ApplicationService, envelope: &Envelope) -> Result<(), Error>;
}

/// The device sending and receiving envelopes
pub trait WpanDevice {
    /// Extended address of this device
    fn extended_address(&self) -> ExtendedAddress;
    /// Network address of this device, undefined until joined
    fn network_address(&self) -> NetworkAddress;
    /// Seconds timer
    fn seconds(&self) -> u32;
    /// Send a envelope
    fn send(&self, envelope: &Envelope, encrypt: bool) -> Result<(), Error>;
}

/// Cluster table entry
#[derive(Clone, Copy)]
pub struct Cluster<'a> {
    /// Cluster identifier
    pub cluster: u16,
    /// Flags
    pub flags: ClusterFlags,
    /// Handler, the endpoint handler is used when `None`
    pub handler: Option<&'a dyn EnvelopeHandler>,
}

/// Endpoint table entry
#[derive(Clone, Copy)]
pub struct Endpoint<'a> {
    /// Endpoint number
    pub endpoint: u8,
    /// Profile identifier, `WILDCARD_PROFILE` accepts any profile
    pub profile: u16,
    /// Device identifier
    pub device: u16,
    /// Device version
    pub device_version: u8,
    /// Clusters, searched in order
    pub clusters: &'a [Cluster<'a>],
    /// Handler for clusters without a handler of their own
    pub handler: Option<&'a dyn EnvelopeHandler>,
    /// Conversation state
    pub state: Option<&'a EndpointState<'a>>,
}

impl<'a> Endpoint<'a> {
    /// Find the first cluster with a matching identifier and any of the
    /// flags in `mask`
    pub fn cluster_match(&self, cluster: u16, mask: ClusterFlags) -> Option<&'a Cluster<'a>> {
        self.clusters
            .iter()
            .find(|c| c.cluster == cluster && c.flags.intersects(mask))
    }

    /// Identifiers of the clusters with any of the flags in `mask`
    pub fn clusters_with(&self, mask: ClusterFlags) -> impl Iterator<Item = u16> + 'a {
        self.clusters
            .iter()
            .filter(move |c| c.flags.intersects(mask))
            .map(|c| c.cluster)
    }
}

/// Application service, routes envelopes between the device and the
/// endpoint table
pub struct ApplicationService<'a> {
    device: &'a dyn WpanDevice,
    endpoints: &'a [Endpoint<'a>],
}

impl<'a> ApplicationService<'a> {
    pub fn new(device: &'a dyn WpanDevice, endpoints: &'a [Endpoint<'a>]) -> Self {
        Self { device, endpoints }
    }

    pub fn device(&self) -> &'a dyn WpanDevice {
        self.device
    }

    pub fn endpoints(&self) -> &'a [Endpoint<'a>] {
        self.endpoints
    }

    /// Find the endpoint, `WILDCARD_PROFILE` matches any profile
    pub fn endpoint_match(&self, endpoint: u8, profile: u16) -> Option<&'a Endpoint<'a>> {
        self.endpoints
            .iter()
            .find(|e| e.endpoint == endpoint && (profile == WILDCARD_PROFILE || e.profile == profile))
    }

    /// Route a received envelope to its handlers
    ///
    /// Envelopes for the broadcast endpoint are passed to every endpoint
    /// with a matching profile, this succeeds if any endpoint accepted it.
    pub fn dispatch(&self, envelope: &Envelope) -> Result<(), Error> {
        let mut envelope = *envelope;
        if envelope.destination_endpoint == BROADCAST_ENDPOINT {
            envelope.options |= EnvelopeOptions::BROADCAST_ENDPOINT;
            let profile = envelope.profile;
            let mut accepted = false;
            for endpoint in self.endpoints.iter().filter(|e| e.profile == profile) {
                envelope.destination_endpoint = endpoint.endpoint;
                envelope.options.remove(EnvelopeOptions::CLUSTER_OPTIONS);
                if self.endpoint_dispatch(endpoint, &mut envelope).is_ok() {
                    accepted = true;
                }
            }
            if accepted {
                Ok(())
            } else {
                Err(Error::NoHandler)
            }
        } else {
            match self.endpoint_match(envelope.destination_endpoint, envelope.profile) {
                Some(endpoint) => self.endpoint_dispatch(endpoint, &mut envelope),
                None => {
                    log::info!(
                        "> No endpoint {:02x} for profile {:04x}",
                        envelope.destination_endpoint,
                        envelope.profile
                    );
                    Err(Error::NoHandler)
                }
            }
        }
    }

    fn endpoint_dispatch(&self, endpoint: &Endpoint, envelope: &mut Envelope) -> Result<(), Error> {
        let mask = ClusterFlags::INPUT | ClusterFlags::OUTPUT;
        if let Some(cluster) = endpoint.cluster_match(envelope.cluster, mask) {
            let requires_encryption = cluster.flags.contains(ClusterFlags::ENCRYPT)
                || (cluster.flags.contains(ClusterFlags::ENCRYPT_UNICAST)
                    && !envelope.options.contains(EnvelopeOptions::BROADCAST_ADDRESS));
            if requires_encryption
                && !envelope.options.contains(EnvelopeOptions::RECEIVED_ENCRYPTED)
                && !cluster.flags.contains(ClusterFlags::NOT_CLUSTER_LIBRARY)
            {
                log::warn!(
                    "> Unencrypted message for cluster {:04x} on endpoint {:02x}",
                    envelope.cluster,
                    endpoint.endpoint
                );
                return cluster_library::invalid_cluster(self, envelope);
            }
            envelope.options |= EnvelopeOptions::from_bits_truncate(cluster.flags.bits())
                & EnvelopeOptions::CLUSTER_OPTIONS;
            if let Some(handler) = cluster.handler {
                return handler.receive(self, envelope);
            }
        }
        match endpoint.handler {
            Some(handler) => handler.receive(self, envelope),
            None => Err(Error::NoHandler),
        }
    }

    /// Send a envelope through the device
    pub fn send(&self, envelope: &Envelope) -> Result<(), Error> {
        self.device
            .send(envelope, envelope.options.contains(EnvelopeOptions::ENCRYPT))
    }

    /// Register a conversation on a endpoint, returns the transaction
    /// identifier to use in the request
    pub fn register_conversation(
        &self,
        endpoint: u8,
        profile: u16,
        handler: Option<&'a dyn ConversationHandler>,
        timeout: u16,
    ) -> Result<u8, Error> {
        let state = self
            .endpoint_match(endpoint, profile)
            .and_then(|e| e.state)
            .ok_or(Error::InvalidArgument)?;
        state.register(handler, self.device.seconds(), timeout)
    }

    /// Pass a response to the conversation waiting for `transaction` on
    /// the destination endpoint of `envelope`
    pub fn conversation_response(&self, transaction: u8, envelope: &Envelope) -> Result<(), Error> {
        let state = self
            .endpoint_match(envelope.destination_endpoint, envelope.profile)
            .and_then(|e| e.state)
            .ok_or(Error::NotFound)?;
        state.response(self, transaction, envelope)
    }

    /// Time out expired conversations, call after each device tick
    pub fn tick(&self) {
        let now = self.device.seconds();
        for endpoint in self.endpoints.iter() {
            if let Some(state) = endpoint.state {
                state.expire(self, now);
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use core::cell::{Cell, RefCell};
    use std::vec::Vec;

    /// Envelope sent through the test device
    #[derive(Clone, Debug, PartialEq)]
    pub struct SentEnvelope {
        pub network_address: NetworkAddress,
        pub source_endpoint: u8,
        pub destination_endpoint: u8,
        pub cluster: u16,
        pub profile: u16,
        pub encrypt: bool,
        pub payload: Vec<u8>,
    }

    pub struct TestDevice {
        pub network_address: Cell<NetworkAddress>,
        pub seconds: Cell<u32>,
        pub sent: RefCell<Vec<SentEnvelope>>,
    }

    impl TestDevice {
        pub fn new() -> Self {
            Self {
                network_address: Cell::new(NetworkAddress::new(0x0000)),
                seconds: Cell::new(0),
                sent: RefCell::new(Vec::new()),
            }
        }

        pub fn take(&self) -> Vec<SentEnvelope> {
            self.sent.replace(Vec::new())
        }
    }

    impl WpanDevice for TestDevice {
        fn extended_address(&self) -> ExtendedAddress {
            ExtendedAddress::new(0x0013_a200_0000_0001)
        }

        fn network_address(&self) -> NetworkAddress {
            self.network_address.get()
        }

        fn seconds(&self) -> u32 {
            self.seconds.get()
        }

        fn send(&self, envelope: &Envelope, encrypt: bool) -> Result<(), Error> {
            self.sent.borrow_mut().push(SentEnvelope {
                network_address: envelope.network_address,
                source_endpoint: envelope.source_endpoint,
                destination_endpoint: envelope.destination_endpoint,
                cluster: envelope.cluster,
                profile: envelope.profile,
                encrypt,
                payload: envelope.payload.to_vec(),
            });
            Ok(())
        }
    }
}
