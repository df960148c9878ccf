//! # Device profile
//!
//! Responder for the device profile requests received on endpoint 0, and
//! senders for the requests this device makes to others. Responses to our
//! own requests are passed to the conversation that is waiting for them.

use core::cell::Cell;
use core::convert::TryFrom;

use heapless::Vec;

use xbee_data::device_profile::{
    is_application_endpoint, is_response, ActiveEndpointResponse, AddressResponse, BindRequest,
    ClusterIdentifier, ClusterList, DeviceAnnounce, ExtendedAddressRequest, LeaveFlags,
    ManagementLeaveRequest, MatchDescriptorRequest, MatchDescriptorResponse,
    NetworkAddressRequest, RequestType, SimpleDescriptor, SimpleDescriptorRequest,
    SimpleDescriptorResponse, Status, DESCRIPTOR_CLUSTERS_MAX, DEVICE_PROFILE_ENDPOINT,
    ENDPOINT_LIST_MAX, MATCH_LIST_MAX, RESPONSE,
};
use xbee_data::pack::{Pack, PackFixed};
use xbee_data::{ExtendedAddress, NetworkAddress};

use crate::application_service::{
    ApplicationService, ClusterFlags, ConversationHandler, ConversationStatus, Endpoint,
    EndpointState, Envelope, EnvelopeHandler, EnvelopeOptions, WILDCARD_PROFILE,
};
use crate::Error;

/// Profile identifier of the device profile
pub const DEVICE_PROFILE: u16 = 0x0000;

/// Seconds to wait for the response to a device profile request
pub const ZDO_CONVERSATION_TIMEOUT: u16 = 15;

/// Network address lookup in progress
pub const NETWORK_ADDRESS_PENDING: u16 = 0xfffe;
/// Network address lookup timed out
pub const NETWORK_ADDRESS_TIMEOUT: u16 = 0xffff;
/// Network address lookup failed
pub const NETWORK_ADDRESS_ERROR: u16 = 0xfffd;

/// Extended address lookup in progress
pub const EXTENDED_ADDRESS_PENDING: u64 = 0xffff_ffff_ffff_ffff;
/// Extended address lookup timed out
pub const EXTENDED_ADDRESS_TIMEOUT: u64 = 0x0000_0000_0000_ffff;
/// Extended address lookup failed
pub const EXTENDED_ADDRESS_ERROR: u64 = 0x0000_0000_0000_0000;

// transaction, status, address, length, endpoint, profile, device, version
// and the two cluster counts
const SIMPLE_DESCRIPTOR_RESPONSE_MAX: usize = 13 + 4 * DESCRIPTOR_CLUSTERS_MAX;
const MATCH_DESCRIPTOR_REQUEST_MAX: usize = 7 + 4 * DESCRIPTOR_CLUSTERS_MAX;

/// Notified about device announcements
pub trait DeviceAnnounceHandler {
    fn announce(&self, service: &ApplicationService, envelope: &Envelope, announce: &DeviceAnnounce);
}

/// Envelope handler for the device profile endpoint
pub struct DeviceProfileResponder<'a> {
    announce: Option<&'a dyn DeviceAnnounceHandler>,
}

impl<'a> DeviceProfileResponder<'a> {
    pub fn new(announce: Option<&'a dyn DeviceAnnounceHandler>) -> Self {
        Self { announce }
    }

    /// Endpoint table entry for the device profile, served by this
    /// responder
    pub fn endpoint(&'a self, state: &'a EndpointState<'a>) -> Endpoint<'a> {
        Endpoint {
            endpoint: DEVICE_PROFILE_ENDPOINT,
            profile: DEVICE_PROFILE,
            device: 0,
            device_version: 0,
            clusters: &[],
            handler: Some(self),
            state: Some(state),
        }
    }

    fn simple_descriptor(
        &self,
        service: &ApplicationService,
        envelope: &Envelope,
        transaction: u8,
        address: NetworkAddress,
    ) -> Result<(), Error> {
        let (request, _) = SimpleDescriptorRequest::unpack(&envelope.payload[1..])
            .map_err(|_| Error::BadMessage)?;
        log::info!("> ZDO Simple descriptor request {:02x}", request.endpoint);
        let mut response = SimpleDescriptorResponse {
            status: Status::Success,
            address,
            descriptor: None,
        };
        if !is_application_endpoint(request.endpoint) {
            response.status = Status::InvalidEndpoint;
        } else {
            match service.endpoint_match(request.endpoint, WILDCARD_PROFILE) {
                Some(endpoint) => {
                    response.descriptor = Some(SimpleDescriptor {
                        endpoint: endpoint.endpoint,
                        profile: endpoint.profile,
                        device: endpoint.device,
                        device_version: endpoint.device_version,
                        input_clusters: cluster_list(endpoint, ClusterFlags::INPUT)?,
                        output_clusters: cluster_list(endpoint, ClusterFlags::OUTPUT)?,
                    });
                }
                None => response.status = Status::NotActive,
            }
        }
        let mut data = [0u8; SIMPLE_DESCRIPTOR_RESPONSE_MAX];
        data[0] = transaction;
        let used = response.pack(&mut data[1..])?;
        send_response(service, envelope, &data[..=used])
    }

    fn active_endpoints(
        &self,
        service: &ApplicationService,
        envelope: &Envelope,
        transaction: u8,
        address: NetworkAddress,
    ) -> Result<(), Error> {
        log::info!("> ZDO Active endpoint request");
        let mut endpoints: Vec<u8, ENDPOINT_LIST_MAX> = Vec::new();
        for endpoint in service
            .endpoints()
            .iter()
            .filter(|e| e.endpoint != DEVICE_PROFILE_ENDPOINT)
        {
            endpoints
                .push(endpoint.endpoint)
                .map_err(|_| Error::NoSpace)?;
        }
        let response = ActiveEndpointResponse::success_response(address, &endpoints);
        let mut data = [0u8; 5 + ENDPOINT_LIST_MAX];
        data[0] = transaction;
        let used = response.pack(&mut data[1..])?;
        send_response(service, envelope, &data[..=used])
    }

    fn match_descriptor(
        &self,
        service: &ApplicationService,
        envelope: &Envelope,
        transaction: u8,
        address: NetworkAddress,
    ) -> Result<(), Error> {
        let (request, _) = MatchDescriptorRequest::unpack(&envelope.payload[1..])
            .map_err(|_| Error::BadMessage)?;
        log::info!("> ZDO Match descriptor request {:04x}", request.profile);
        let mut list: Vec<u8, MATCH_LIST_MAX> = Vec::new();
        for endpoint in service
            .endpoints()
            .iter()
            .filter(|e| e.endpoint != DEVICE_PROFILE_ENDPOINT && e.profile == request.profile)
        {
            let matched = request
                .input_clusters
                .iter()
                .any(|c| endpoint.cluster_match(*c, ClusterFlags::INPUT).is_some())
                || request
                    .output_clusters
                    .iter()
                    .any(|c| endpoint.cluster_match(*c, ClusterFlags::OUTPUT).is_some());
            if matched && list.push(endpoint.endpoint).is_err() {
                break;
            }
        }
        if list.is_empty() {
            return Ok(());
        }
        let response = MatchDescriptorResponse {
            status: Status::Success,
            address,
            list,
        };
        let mut data = [0u8; 5 + MATCH_LIST_MAX];
        data[0] = transaction;
        let used = response.pack(&mut data[1..])?;
        send_response(service, envelope, &data[..=used])
    }

    fn device_announce(&self, service: &ApplicationService, envelope: &Envelope) -> Result<(), Error> {
        let (announce, _) =
            DeviceAnnounce::unpack(&envelope.payload[1..]).map_err(|_| Error::BadMessage)?;
        log::info!(
            "> ZDO Device announce {} {} capability {:02x}",
            announce.extended_address,
            announce.network_address,
            announce.capability
        );
        if let Some(handler) = self.announce {
            handler.announce(service, envelope, &announce);
        }
        Ok(())
    }
}

impl<'a> Default for DeviceProfileResponder<'a> {
    fn default() -> Self {
        Self::new(None)
    }
}

impl<'a> EnvelopeHandler for DeviceProfileResponder<'a> {
    fn receive(&self, service: &ApplicationService, envelope: &Envelope) -> Result<(), Error> {
        let transaction = *envelope.payload.first().ok_or(Error::BadMessage)?;
        let address = service.device().network_address();

        match ClusterIdentifier::try_from(envelope.cluster) {
            Ok(ClusterIdentifier::SimpleDescriptorRequest) => {
                let address = assigned(address)?;
                return self.simple_descriptor(service, envelope, transaction, address);
            }
            Ok(ClusterIdentifier::ActiveEndpointRequest) => {
                let address = assigned(address)?;
                return self.active_endpoints(service, envelope, transaction, address);
            }
            Ok(ClusterIdentifier::MatchDescriptorRequest) => {
                let address = assigned(address)?;
                return self.match_descriptor(service, envelope, transaction, address);
            }
            Ok(ClusterIdentifier::DeviceAnnounce) => {
                return self.device_announce(service, envelope);
            }
            _ => (),
        }

        if is_response(envelope.cluster) {
            match service.conversation_response(transaction, envelope) {
                Err(Error::NotFound) => {
                    log::info!(
                        "> ZDO No conversation for {:04x} transaction {:02x}",
                        envelope.cluster,
                        transaction
                    );
                }
                result => return result,
            }
        }

        if is_response(envelope.cluster) || envelope.is_broadcast() {
            log::info!("> ZDO Ignoring cluster {:04x}", envelope.cluster);
            return Ok(());
        }

        log::info!("< ZDO Not supported {:04x}", envelope.cluster);
        send_response(
            service,
            envelope,
            &[transaction, u8::from(Status::NotSupported)],
        )
    }
}

fn assigned(address: NetworkAddress) -> Result<NetworkAddress, Error> {
    if address.is_undefined() {
        log::warn!("> ZDO Own network address unknown");
        Err(Error::NoData)
    } else {
        Ok(address)
    }
}

fn cluster_list(endpoint: &Endpoint, mask: ClusterFlags) -> Result<ClusterList, Error> {
    let mut clusters = ClusterList::new();
    for cluster in endpoint.clusters_with(mask) {
        clusters.push(cluster).map_err(|_| Error::NoSpace)?;
    }
    Ok(clusters)
}

/// Send `payload` as the response to the device profile `request`
pub fn send_response(
    service: &ApplicationService,
    request: &Envelope,
    payload: &[u8],
) -> Result<(), Error> {
    let mut reply = request.reply(payload);
    reply.cluster |= RESPONSE;
    service.send(&reply)
}

// Device profile request to the device addressed by `envelope`
fn request_envelope<'p>(
    envelope: &Envelope,
    cluster: ClusterIdentifier,
    payload: &'p [u8],
) -> Envelope<'p> {
    Envelope {
        source_endpoint: DEVICE_PROFILE_ENDPOINT,
        destination_endpoint: DEVICE_PROFILE_ENDPOINT,
        cluster: cluster.into(),
        profile: DEVICE_PROFILE,
        payload,
        ..*envelope
    }
}

fn register<'a>(
    service: &ApplicationService<'a>,
    handler: Option<&'a dyn ConversationHandler>,
) -> Result<u8, Error> {
    service.register_conversation(
        DEVICE_PROFILE_ENDPOINT,
        DEVICE_PROFILE,
        handler,
        ZDO_CONVERSATION_TIMEOUT,
    )
}

/// Request the simple descriptor of `endpoint` on the device addressed by
/// `envelope`, returns the transaction sequence number
pub fn simple_descriptor_request<'a>(
    service: &ApplicationService<'a>,
    envelope: &Envelope,
    address: NetworkAddress,
    endpoint: u8,
    handler: Option<&'a dyn ConversationHandler>,
) -> Result<u8, Error> {
    if !is_application_endpoint(endpoint) {
        return Err(Error::InvalidArgument);
    }
    let transaction = register(service, handler)?;
    let mut data = [0u8; 4];
    data[0] = transaction;
    let used = SimpleDescriptorRequest { address, endpoint }.pack(&mut data[1..])?;
    log::info!("< ZDO Simple descriptor request {} {:02x}", address, endpoint);
    service.send(&request_envelope(
        envelope,
        ClusterIdentifier::SimpleDescriptorRequest,
        &data[..=used],
    ))?;
    Ok(transaction)
}

/// Send a descriptor request carrying only the network address of
/// interest, such as the node, power or active endpoint requests
pub fn descriptor_request<'a>(
    service: &ApplicationService<'a>,
    envelope: &Envelope,
    cluster: ClusterIdentifier,
    address: NetworkAddress,
    handler: Option<&'a dyn ConversationHandler>,
) -> Result<u8, Error> {
    let transaction = register(service, handler)?;
    let mut data = [0u8; 3];
    data[0] = transaction;
    address.pack(&mut data[1..3])?;
    log::info!("< ZDO Descriptor request {:04x} {}", u16::from(cluster), address);
    service.send(&request_envelope(envelope, cluster, &data))?;
    Ok(transaction)
}

/// Ask the remote device in `envelope` to bind, or unbind, its endpoint
/// and cluster to the source endpoint of `envelope` on this device
pub fn bind_request<'a>(
    service: &ApplicationService<'a>,
    envelope: &Envelope,
    cluster: ClusterIdentifier,
    handler: Option<&'a dyn ConversationHandler>,
) -> Result<u8, Error> {
    if cluster != ClusterIdentifier::BindRequest && cluster != ClusterIdentifier::UnbindRequest {
        return Err(Error::InvalidArgument);
    }
    let transaction = register(service, handler)?;
    let request = BindRequest {
        source_address: envelope.extended_address,
        source_endpoint: envelope.destination_endpoint,
        cluster: envelope.cluster,
        destination_address: service.device().extended_address(),
        destination_endpoint: envelope.source_endpoint,
    };
    let mut data = [0u8; 22];
    data[0] = transaction;
    let used = request.pack(&mut data[1..])?;
    log::info!(
        "< ZDO {:?} {} {:02x} cluster {:04x}",
        cluster,
        envelope.extended_address,
        envelope.destination_endpoint,
        envelope.cluster
    );
    service.send(&request_envelope(envelope, cluster, &data[..=used]))?;
    Ok(transaction)
}

/// Ask the device `address` to leave the network, or this device when
/// `address` is `None`
///
/// No response is expected. Returns the transaction sequence number.
pub fn management_leave_request(
    service: &ApplicationService,
    address: Option<ExtendedAddress>,
    flags: LeaveFlags,
    encrypt: bool,
) -> Result<u8, Error> {
    let device = service.device();
    let (mut envelope, target) = match address {
        Some(address) => (
            Envelope::new(address, NetworkAddress::undefined()),
            address,
        ),
        None => (
            Envelope::new(device.extended_address(), device.network_address()),
            ExtendedAddress::new(0),
        ),
    };
    if encrypt {
        envelope.options |= EnvelopeOptions::ENCRYPT;
    }
    let transaction = register(service, None)?;
    let mut data = [0u8; 10];
    data[0] = transaction;
    let used = ManagementLeaveRequest {
        address: target,
        flags,
    }
    .pack(&mut data[1..])?;
    log::info!("< ZDO Management leave {} {:?}", envelope.extended_address, flags);
    service.send(&request_envelope(
        &envelope,
        ClusterIdentifier::ManagementLeaveRequest,
        &data[..=used],
    ))?;
    Ok(transaction)
}

/// Build a match descriptor request payload, including the transaction
/// sequence number, in `buffer`, returns the size
pub fn match_descriptor_request(
    buffer: &mut [u8],
    transaction: u8,
    address: NetworkAddress,
    profile: u16,
    input_clusters: &[u16],
    output_clusters: &[u16],
) -> Result<usize, Error> {
    if buffer.is_empty() {
        return Err(Error::NoSpace);
    }
    let request = MatchDescriptorRequest {
        address,
        profile,
        input_clusters: ClusterList::from_slice(input_clusters).map_err(|_| Error::NoSpace)?,
        output_clusters: ClusterList::from_slice(output_clusters).map_err(|_| Error::NoSpace)?,
    };
    buffer[0] = transaction;
    let used = request
        .pack(&mut buffer[1..])
        .map_err(|_| Error::NoSpace)?;
    Ok(used + 1)
}

/// Find the endpoints of `profile` using any of the clusters, on the
/// devices addressed by `envelope`
pub fn send_match_descriptor_request<'a>(
    service: &ApplicationService<'a>,
    envelope: &Envelope,
    address: NetworkAddress,
    profile: u16,
    input_clusters: &[u16],
    output_clusters: &[u16],
    handler: Option<&'a dyn ConversationHandler>,
) -> Result<u8, Error> {
    let mut data = [0u8; MATCH_DESCRIPTOR_REQUEST_MAX];
    let used = match_descriptor_request(
        &mut data,
        0,
        address,
        profile,
        input_clusters,
        output_clusters,
    )?;
    let transaction = register(service, handler)?;
    data[0] = transaction;
    log::info!("< ZDO Match descriptor request {} {:04x}", address, profile);
    service.send(&request_envelope(
        envelope,
        ClusterIdentifier::MatchDescriptorRequest,
        &data[..used],
    ))?;
    Ok(transaction)
}

fn address_response(envelope: &Envelope) -> Option<AddressResponse> {
    let payload = envelope.payload.get(1..)?;
    match AddressResponse::unpack(payload) {
        Ok((response, _)) if response.status == Status::Success => Some(response),
        Ok((response, _)) => {
            log::warn!("> ZDO Address lookup failed, {:?}", response.status);
            None
        }
        Err(_) => {
            log::warn!("> ZDO Invalid address response");
            None
        }
    }
}

/// The result of a network address request
pub struct NetworkAddressLookup {
    address: Cell<u16>,
}

impl NetworkAddressLookup {
    pub fn new() -> Self {
        Self {
            address: Cell::new(NETWORK_ADDRESS_PENDING),
        }
    }

    /// The address found, or one of `NETWORK_ADDRESS_PENDING`,
    /// `NETWORK_ADDRESS_TIMEOUT` and `NETWORK_ADDRESS_ERROR`
    pub fn address(&self) -> u16 {
        self.address.get()
    }
}

impl Default for NetworkAddressLookup {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationHandler for NetworkAddressLookup {
    fn respond(
        &self,
        _service: &ApplicationService,
        envelope: Option<&Envelope>,
    ) -> Result<ConversationStatus, Error> {
        let address = match envelope {
            Some(envelope) => match address_response(envelope) {
                Some(response) => u16::from(response.network_address),
                None => NETWORK_ADDRESS_ERROR,
            },
            None => NETWORK_ADDRESS_TIMEOUT,
        };
        self.address.set(address);
        Ok(ConversationStatus::End)
    }
}

/// Ask the device with extended address `address` for its network
/// address, the result is stored in `lookup`
pub fn network_address_request<'a>(
    service: &ApplicationService<'a>,
    address: ExtendedAddress,
    lookup: &'a NetworkAddressLookup,
) -> Result<u8, Error> {
    let transaction = register(service, Some(lookup))?;
    let mut data = [0u8; 11];
    data[0] = transaction;
    let used = NetworkAddressRequest {
        address,
        request_type: RequestType::SingleDevice,
        start_index: 0,
    }
    .pack(&mut data[1..])?;
    lookup.address.set(NETWORK_ADDRESS_PENDING);
    log::info!("< ZDO Network address request {}", address);
    let envelope = Envelope::new(address, NetworkAddress::undefined());
    service.send(&request_envelope(
        &envelope,
        ClusterIdentifier::NetworkAddressRequest,
        &data[..=used],
    ))?;
    Ok(transaction)
}

/// The result of a extended address request
pub struct ExtendedAddressLookup {
    address: Cell<u64>,
}

impl ExtendedAddressLookup {
    pub fn new() -> Self {
        Self {
            address: Cell::new(EXTENDED_ADDRESS_PENDING),
        }
    }

    /// The address found, or one of `EXTENDED_ADDRESS_PENDING`,
    /// `EXTENDED_ADDRESS_TIMEOUT` and `EXTENDED_ADDRESS_ERROR`
    pub fn address(&self) -> u64 {
        self.address.get()
    }
}

impl Default for ExtendedAddressLookup {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationHandler for ExtendedAddressLookup {
    fn respond(
        &self,
        _service: &ApplicationService,
        envelope: Option<&Envelope>,
    ) -> Result<ConversationStatus, Error> {
        let address = match envelope {
            Some(envelope) => match address_response(envelope) {
                Some(response) => u64::from(response.extended_address),
                None => EXTENDED_ADDRESS_ERROR,
            },
            None => EXTENDED_ADDRESS_TIMEOUT,
        };
        self.address.set(address);
        Ok(ConversationStatus::End)
    }
}

/// Ask the device with network address `address` for its extended
/// address, the result is stored in `lookup`
pub fn extended_address_request<'a>(
    service: &ApplicationService<'a>,
    address: NetworkAddress,
    lookup: &'a ExtendedAddressLookup,
) -> Result<u8, Error> {
    let transaction = register(service, Some(lookup))?;
    let mut data = [0u8; 5];
    data[0] = transaction;
    let used = ExtendedAddressRequest {
        address,
        request_type: RequestType::SingleDevice,
        start_index: 0,
    }
    .pack(&mut data[1..])?;
    lookup.address.set(EXTENDED_ADDRESS_PENDING);
    log::info!("< ZDO Extended address request {}", address);
    let envelope = Envelope::new(ExtendedAddress::undefined(), address);
    service.send(&request_envelope(
        &envelope,
        ClusterIdentifier::ExtendedAddressRequest,
        &data[..=used],
    ))?;
    Ok(transaction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application_service::mock::TestDevice;
    use crate::application_service::Cluster;
    use core::cell::RefCell;

    const REMOTE: u64 = 0x0013_a200_4052_2baa;

    fn home_clusters() -> [Cluster<'static>; 3] {
        [
            Cluster {
                cluster: 0x0000,
                flags: ClusterFlags::INPUT,
                handler: None,
            },
            Cluster {
                cluster: 0x000a,
                flags: ClusterFlags::INPUT,
                handler: None,
            },
            Cluster {
                cluster: 0x0019,
                flags: ClusterFlags::OUTPUT,
                handler: None,
            },
        ]
    }

    fn vendor_clusters() -> [Cluster<'static>; 1] {
        [Cluster {
            cluster: 0x0011,
            flags: ClusterFlags::INPUT,
            handler: None,
        }]
    }

    fn endpoints<'a>(
        responder: &'a DeviceProfileResponder<'a>,
        state: &'a EndpointState<'a>,
        home: &'a [Cluster<'a>],
        vendor: &'a [Cluster<'a>],
    ) -> [Endpoint<'a>; 3] {
        [
            responder.endpoint(state),
            Endpoint {
                endpoint: 0x01,
                profile: 0x0104,
                device: 0x0100,
                device_version: 0,
                clusters: home,
                handler: None,
                state: None,
            },
            Endpoint {
                endpoint: 0x02,
                profile: 0xc105,
                device: 0x0001,
                device_version: 2,
                clusters: vendor,
                handler: None,
                state: None,
            },
        ]
    }

    fn request<'p>(cluster: u16, payload: &'p [u8]) -> Envelope<'p> {
        Envelope {
            extended_address: ExtendedAddress::new(REMOTE),
            network_address: NetworkAddress::new(0x7d84),
            source_endpoint: 0,
            destination_endpoint: 0,
            cluster,
            profile: DEVICE_PROFILE,
            options: EnvelopeOptions::empty(),
            payload,
        }
    }

    struct Announcements {
        log: RefCell<std::vec::Vec<(u16, u64)>>,
    }

    impl DeviceAnnounceHandler for Announcements {
        fn announce(
            &self,
            _service: &ApplicationService,
            _envelope: &Envelope,
            announce: &DeviceAnnounce,
        ) {
            self.log.borrow_mut().push((
                u16::from(announce.network_address),
                u64::from(announce.extended_address),
            ));
        }
    }

    #[test]
    fn active_endpoints() {
        let device = TestDevice::new();
        let responder = DeviceProfileResponder::default();
        let state = EndpointState::new();
        let (home, vendor) = (home_clusters(), vendor_clusters());
        let endpoints = endpoints(&responder, &state, &home, &vendor);
        let service = ApplicationService::new(&device, &endpoints);

        assert_eq!(service.dispatch(&request(0x0005, &[0x12, 0x00, 0x00])), Ok(()));
        let sent = device.take();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].cluster, 0x8005);
        assert_eq!(sent[0].network_address, 0x7d84);
        assert_eq!(sent[0].destination_endpoint, 0x00);
        assert_eq!(sent[0].payload, [0x12, 0x00, 0x00, 0x00, 0x02, 0x01, 0x02]);
    }

    #[test]
    fn simple_descriptor() {
        let device = TestDevice::new();
        let responder = DeviceProfileResponder::default();
        let state = EndpointState::new();
        let (home, vendor) = (home_clusters(), vendor_clusters());
        let endpoints = endpoints(&responder, &state, &home, &vendor);
        let service = ApplicationService::new(&device, &endpoints);

        service
            .dispatch(&request(0x0004, &[0x21, 0x00, 0x00, 0x01]))
            .unwrap();
        let sent = device.take();
        assert_eq!(sent[0].cluster, 0x8004);
        assert_eq!(
            sent[0].payload,
            [
                0x21, 0x00, 0x00, 0x00, 14, 0x01, 0x04, 0x01, 0x00, 0x01, 0x00, 0x02, 0x00, 0x00,
                0x0a, 0x00, 0x01, 0x19, 0x00
            ]
        );

        service
            .dispatch(&request(0x0004, &[0x22, 0x00, 0x00, 0xff]))
            .unwrap();
        assert_eq!(device.take()[0].payload, [0x22, 0x82, 0x00, 0x00, 0x00]);

        service
            .dispatch(&request(0x0004, &[0x23, 0x00, 0x00, 0x07]))
            .unwrap();
        assert_eq!(device.take()[0].payload, [0x23, 0x83, 0x00, 0x00, 0x00]);

        assert_eq!(
            service.dispatch(&request(0x0004, &[0x24, 0x00])),
            Err(Error::BadMessage)
        );
        assert!(device.take().is_empty());
    }

    #[test]
    fn match_descriptor() {
        let device = TestDevice::new();
        let responder = DeviceProfileResponder::default();
        let state = EndpointState::new();
        let (home, vendor) = (home_clusters(), vendor_clusters());
        let endpoints = endpoints(&responder, &state, &home, &vendor);
        let service = ApplicationService::new(&device, &endpoints);

        // time server
        let payload = [0x31, 0xfd, 0xff, 0x04, 0x01, 0x01, 0x0a, 0x00, 0x00];
        service.dispatch(&request(0x0006, &payload)).unwrap();
        let sent = device.take();
        assert_eq!(sent[0].cluster, 0x8006);
        assert_eq!(sent[0].payload, [0x31, 0x00, 0x00, 0x00, 0x01, 0x01]);

        // ota client
        let payload = [0x32, 0xfd, 0xff, 0x04, 0x01, 0x00, 0x01, 0x19, 0x00];
        service.dispatch(&request(0x0006, &payload)).unwrap();
        assert_eq!(device.take()[0].payload, [0x32, 0x00, 0x00, 0x00, 0x01, 0x01]);

        // ota server, no match and no response
        let payload = [0x33, 0xfd, 0xff, 0x04, 0x01, 0x01, 0x19, 0x00, 0x00];
        service.dispatch(&request(0x0006, &payload)).unwrap();
        assert!(device.take().is_empty());

        let payload = [0x34, 0xfd, 0xff, 0x05, 0xc1, 0x01, 0x11, 0x00, 0x00];
        service.dispatch(&request(0x0006, &payload)).unwrap();
        assert_eq!(device.take()[0].payload, [0x34, 0x00, 0x00, 0x00, 0x01, 0x02]);
    }

    #[test]
    fn unknown_network_address() {
        let device = TestDevice::new();
        device.network_address.set(NetworkAddress::undefined());
        let responder = DeviceProfileResponder::default();
        let state = EndpointState::new();
        let (home, vendor) = (home_clusters(), vendor_clusters());
        let endpoints = endpoints(&responder, &state, &home, &vendor);
        let service = ApplicationService::new(&device, &endpoints);

        assert_eq!(
            service.dispatch(&request(0x0005, &[0x12, 0x00, 0x00])),
            Err(Error::NoData)
        );
        assert_eq!(
            service.dispatch(&request(0x0004, &[0x13, 0x00, 0x00, 0x01])),
            Err(Error::NoData)
        );
        assert!(device.take().is_empty());
    }

    #[test]
    fn device_announce() {
        let device = TestDevice::new();
        let announcements = Announcements {
            log: RefCell::new(std::vec::Vec::new()),
        };
        let responder = DeviceProfileResponder::new(Some(&announcements));
        let state = EndpointState::new();
        let (home, vendor) = (home_clusters(), vendor_clusters());
        let endpoints = endpoints(&responder, &state, &home, &vendor);
        let service = ApplicationService::new(&device, &endpoints);

        let payload = [
            0x05, 0x34, 0x12, 0xaa, 0x2b, 0x52, 0x40, 0x00, 0xa2, 0x13, 0x00, 0x8e,
        ];
        let mut announce = request(0x0013, &payload);
        announce.options = EnvelopeOptions::BROADCAST_ADDRESS;
        assert_eq!(service.dispatch(&announce), Ok(()));
        assert_eq!(*announcements.log.borrow(), [(0x1234, REMOTE)]);
        assert!(device.take().is_empty());
    }

    #[test]
    fn unsupported_requests() {
        let device = TestDevice::new();
        let responder = DeviceProfileResponder::default();
        let state = EndpointState::new();
        let (home, vendor) = (home_clusters(), vendor_clusters());
        let endpoints = endpoints(&responder, &state, &home, &vendor);
        let service = ApplicationService::new(&device, &endpoints);

        // node descriptor request
        service
            .dispatch(&request(0x0002, &[0x41, 0x00, 0x00]))
            .unwrap();
        let sent = device.take();
        assert_eq!(sent[0].cluster, 0x8002);
        assert_eq!(sent[0].payload, [0x41, 0x84]);

        let mut broadcast = request(0x0002, &[0x42, 0x00, 0x00]);
        broadcast.options = EnvelopeOptions::BROADCAST_ADDRESS;
        service.dispatch(&broadcast).unwrap();
        assert!(device.take().is_empty());

        // response nobody waits for
        service
            .dispatch(&request(0x8004, &[0x43, 0x00, 0x00, 0x00, 0x00]))
            .unwrap();
        assert!(device.take().is_empty());

        assert_eq!(service.dispatch(&request(0x0002, &[])), Err(Error::BadMessage));
    }

    #[test]
    fn network_address_lookup() {
        let device = TestDevice::new();
        let lookup = NetworkAddressLookup::new();
        let responder = DeviceProfileResponder::default();
        let state = EndpointState::new();
        let (home, vendor) = (home_clusters(), vendor_clusters());
        let endpoints = endpoints(&responder, &state, &home, &vendor);
        let service = ApplicationService::new(&device, &endpoints);

        let transaction =
            network_address_request(&service, ExtendedAddress::new(REMOTE), &lookup).unwrap();
        let sent = device.take();
        assert_eq!(sent[0].cluster, 0x0000);
        assert_eq!(sent[0].profile, 0x0000);
        assert_eq!(sent[0].network_address, 0xfffe);
        assert_eq!(
            sent[0].payload,
            [transaction, 0xaa, 0x2b, 0x52, 0x40, 0x00, 0xa2, 0x13, 0x00, 0x00, 0x00]
        );
        assert_eq!(lookup.address(), NETWORK_ADDRESS_PENDING);

        let response = [
            transaction, 0x00, 0xaa, 0x2b, 0x52, 0x40, 0x00, 0xa2, 0x13, 0x00, 0x84, 0x7d,
        ];
        service.dispatch(&request(0x8000, &response)).unwrap();
        assert_eq!(lookup.address(), 0x7d84);
        assert_eq!(state.active(), 0);

        let transaction =
            network_address_request(&service, ExtendedAddress::new(REMOTE), &lookup).unwrap();
        let response = [
            transaction, 0x81, 0xaa, 0x2b, 0x52, 0x40, 0x00, 0xa2, 0x13, 0x00, 0x84, 0x7d,
        ];
        service.dispatch(&request(0x8000, &response)).unwrap();
        assert_eq!(lookup.address(), NETWORK_ADDRESS_ERROR);

        network_address_request(&service, ExtendedAddress::new(REMOTE), &lookup).unwrap();
        device.seconds.set(u32::from(ZDO_CONVERSATION_TIMEOUT));
        service.tick();
        assert_eq!(lookup.address(), NETWORK_ADDRESS_TIMEOUT);
    }

    #[test]
    fn extended_address_lookup() {
        let device = TestDevice::new();
        let lookup = ExtendedAddressLookup::new();
        let responder = DeviceProfileResponder::default();
        let state = EndpointState::new();
        let (home, vendor) = (home_clusters(), vendor_clusters());
        let endpoints = endpoints(&responder, &state, &home, &vendor);
        let service = ApplicationService::new(&device, &endpoints);

        let transaction =
            extended_address_request(&service, NetworkAddress::new(0x7d84), &lookup).unwrap();
        let sent = device.take();
        assert_eq!(sent[0].cluster, 0x0001);
        assert_eq!(sent[0].network_address, 0x7d84);
        assert_eq!(sent[0].payload, [transaction, 0x84, 0x7d, 0x00, 0x00]);
        assert_eq!(lookup.address(), EXTENDED_ADDRESS_PENDING);

        let response = [
            transaction, 0x00, 0xaa, 0x2b, 0x52, 0x40, 0x00, 0xa2, 0x13, 0x00, 0x84, 0x7d,
        ];
        service.dispatch(&request(0x8001, &response)).unwrap();
        assert_eq!(lookup.address(), REMOTE);

        extended_address_request(&service, NetworkAddress::new(0x7d84), &lookup).unwrap();
        device.seconds.set(u32::from(ZDO_CONVERSATION_TIMEOUT));
        service.tick();
        assert_eq!(lookup.address(), EXTENDED_ADDRESS_TIMEOUT);
    }

    #[test]
    fn bind_and_leave_requests() {
        let device = TestDevice::new();
        let responder = DeviceProfileResponder::default();
        let state = EndpointState::new();
        let (home, vendor) = (home_clusters(), vendor_clusters());
        let endpoints = endpoints(&responder, &state, &home, &vendor);
        let service = ApplicationService::new(&device, &endpoints);

        let target = Envelope {
            extended_address: ExtendedAddress::new(REMOTE),
            network_address: NetworkAddress::new(0x7d84),
            source_endpoint: 0x01,
            destination_endpoint: 0x02,
            cluster: 0x0006,
            profile: 0x0104,
            options: EnvelopeOptions::empty(),
            payload: &[],
        };
        let transaction =
            bind_request(&service, &target, ClusterIdentifier::BindRequest, None).unwrap();
        let sent = device.take();
        assert_eq!(sent[0].cluster, 0x0021);
        assert_eq!(sent[0].source_endpoint, 0x00);
        assert_eq!(sent[0].destination_endpoint, 0x00);
        assert_eq!(sent[0].network_address, 0x7d84);
        assert_eq!(
            sent[0].payload,
            [
                transaction, 0xaa, 0x2b, 0x52, 0x40, 0x00, 0xa2, 0x13, 0x00, 0x02, 0x06, 0x00,
                0x03, 0x01, 0x00, 0x00, 0x00, 0x00, 0xa2, 0x13, 0x00, 0x01
            ]
        );
        assert_eq!(
            bind_request(&service, &target, ClusterIdentifier::DeviceAnnounce, None),
            Err(Error::InvalidArgument)
        );

        let transaction = management_leave_request(
            &service,
            Some(ExtendedAddress::new(REMOTE)),
            LeaveFlags::REJOIN,
            true,
        )
        .unwrap();
        let sent = device.take();
        assert_eq!(sent[0].cluster, 0x0034);
        assert_eq!(sent[0].network_address, 0xfffe);
        assert!(sent[0].encrypt);
        assert_eq!(
            sent[0].payload,
            [transaction, 0xaa, 0x2b, 0x52, 0x40, 0x00, 0xa2, 0x13, 0x00, 0x80]
        );

        // leave ourselves
        let transaction =
            management_leave_request(&service, None, LeaveFlags::empty(), false).unwrap();
        let sent = device.take();
        assert_eq!(sent[0].network_address, 0x0000);
        assert!(!sent[0].encrypt);
        assert_eq!(
            sent[0].payload,
            [transaction, 0, 0, 0, 0, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn descriptor_requests() {
        let device = TestDevice::new();
        let responder = DeviceProfileResponder::default();
        let state = EndpointState::new();
        let (home, vendor) = (home_clusters(), vendor_clusters());
        let endpoints = endpoints(&responder, &state, &home, &vendor);
        let service = ApplicationService::new(&device, &endpoints);
        let target = request(0, &[]);
        let address = NetworkAddress::new(0x7d84);

        let transaction =
            simple_descriptor_request(&service, &target, address, 0x01, None).unwrap();
        let sent = device.take();
        assert_eq!(sent[0].cluster, 0x0004);
        assert_eq!(sent[0].payload, [transaction, 0x84, 0x7d, 0x01]);
        assert_eq!(
            simple_descriptor_request(&service, &target, address, 0x00, None),
            Err(Error::InvalidArgument)
        );

        let transaction = descriptor_request(
            &service,
            &target,
            ClusterIdentifier::ActiveEndpointRequest,
            address,
            None,
        )
        .unwrap();
        let sent = device.take();
        assert_eq!(sent[0].cluster, 0x0005);
        assert_eq!(sent[0].payload, [transaction, 0x84, 0x7d]);

        let transaction = send_match_descriptor_request(
            &service,
            &target,
            NetworkAddress::broadcast(),
            0x0104,
            &[],
            &[0x000a],
            None,
        )
        .unwrap();
        let sent = device.take();
        assert_eq!(sent[0].cluster, 0x0006);
        assert_eq!(
            sent[0].payload,
            [transaction, 0xff, 0xff, 0x04, 0x01, 0x00, 0x01, 0x0a, 0x00]
        );

        let mut buffer = [0u8; 8];
        assert_eq!(
            match_descriptor_request(
                &mut buffer,
                0x01,
                NetworkAddress::broadcast(),
                0x0104,
                &[0x0000],
                &[0x000a]
            ),
            Err(Error::NoSpace)
        );
    }
}
