//! # Cluster library
//!
//! Command engine for the general commands, read, write and discover
//! attributes, working on attribute tables.

mod attribute;
pub mod basic;
pub mod client;
pub mod time;

pub use attribute::{
    check_limits, decode_attribute, encode_attribute_value, find_attribute,
    parse_attribute_record, Attribute, AttributeFlags, AttributeHooks, AttributeLimits,
    AttributeRecord, AttributeStorage, AttributeTree, RecordFlags,
};

use byteorder::{ByteOrder, LittleEndian};
use heapless::Vec;

use xbee_data::cluster_library::commands::{
    attribute_identifiers, AttributeInformation, DiscoverAttributes, WriteAttributeStatus,
};
use xbee_data::cluster_library::{
    ClusterLibraryHeader, ClusterLibraryStatus, DefaultResponse, Direction, FrameType,
    GeneralCommandIdentifier,
};
use xbee_data::pack::Pack;

use crate::application_service::{ApplicationService, Envelope, EnvelopeHandler};
use crate::Error;

/// Space for the records of a read attributes response
pub const READ_RESPONSE_MAX: usize = 80;
/// Maximum number of status records in a write attributes response
pub const WRITE_STATUS_MAX: usize = 25;
/// Maximum number of records in a discover attributes response
pub const DISCOVER_ATTRIBUTES_MAX: usize = 20;

const HEADER_MAX: usize = 5;

/// A parsed cluster library command
#[derive(Clone, Copy)]
pub struct ClusterLibraryCommand<'e, 't> {
    /// The envelope the command arrived in
    pub envelope: Envelope<'e>,
    pub header: ClusterLibraryHeader,
    /// Command payload following the header
    pub payload: &'e [u8],
    /// Attributes addressed by the command, picked from the attribute tree
    /// by manufacturer and direction
    pub attributes: &'t [Attribute<'t>],
}

impl<'e, 't> ClusterLibraryCommand<'e, 't> {
    pub fn build(envelope: &Envelope<'e>, tree: &[AttributeTree<'t>]) -> Result<Self, Error> {
        let (header, used) =
            ClusterLibraryHeader::unpack(envelope.payload).map_err(|_| Error::BadMessage)?;
        let attributes = tree
            .iter()
            .find(|t| t.manufacturer == header.manufacturer)
            .map(|t| match header.control.direction {
                Direction::ToServer => t.server,
                Direction::ToClient => t.client,
            })
            .unwrap_or(&[]);
        Ok(Self {
            envelope: *envelope,
            header,
            payload: &envelope.payload[used..],
            attributes,
        })
    }

    fn is_general(&self, command: GeneralCommandIdentifier) -> bool {
        self.header.control.frame_type == FrameType::Global
            && self.header.command == u8::from(command)
    }
}

/// Send `payload` as the response to `command`
pub fn send_response(
    service: &ApplicationService,
    command: &ClusterLibraryCommand,
    payload: &[u8],
) -> Result<(), Error> {
    service.send(&command.envelope.reply(payload))
}

/// Answer `command` with a default response
///
/// Nothing is sent for successful commands that disabled the default
/// response, for broadcasts and for default responses.
pub fn default_response(
    service: &ApplicationService,
    command: &ClusterLibraryCommand,
    status: ClusterLibraryStatus,
) -> Result<(), Error> {
    let header = &command.header;
    if (status == ClusterLibraryStatus::Success && header.control.disable_default_response)
        || command.envelope.is_broadcast()
        || command.is_general(GeneralCommandIdentifier::DefaultResponse)
    {
        return Ok(());
    }
    log::info!(
        "< Default response {:02x} {:?} cluster {:04x}",
        header.command,
        status,
        command.envelope.cluster
    );
    let mut response = header.response(GeneralCommandIdentifier::DefaultResponse.into());
    response.control.frame_type = FrameType::Global;
    let mut data = [0u8; HEADER_MAX + 2];
    let mut used = response.pack(&mut data)?;
    used += DefaultResponse {
        command: header.command,
        status,
    }
    .pack(&mut data[used..])?;
    send_response(service, command, &data[..used])
}

/// Answer a envelope for a cluster that refused it with a failure
pub fn invalid_cluster(service: &ApplicationService, envelope: &Envelope) -> Result<(), Error> {
    let command = ClusterLibraryCommand::build(envelope, &[])?;
    default_response(service, &command, ClusterLibraryStatus::Failure)
}

/// Answer a unsupported command
pub fn invalid_command(
    service: &ApplicationService,
    command: &ClusterLibraryCommand,
) -> Result<(), Error> {
    let status = ClusterLibraryStatus::unsupported_command(
        command.header.control.frame_type,
        command.header.manufacturer.is_some(),
    );
    default_response(service, command, status)
}

/// Handle a general command
pub fn general_command(
    service: &ApplicationService,
    command: &ClusterLibraryCommand,
) -> Result<(), Error> {
    if command.header.control.frame_type != FrameType::Global {
        return invalid_command(service, command);
    }
    match GeneralCommandIdentifier::try_from(command.header.command) {
        Ok(GeneralCommandIdentifier::ReadAttributes) => read_attributes(service, command),
        Ok(GeneralCommandIdentifier::WriteAttributes)
        | Ok(GeneralCommandIdentifier::WriteAttributesUndivided)
        | Ok(GeneralCommandIdentifier::WriteAttributesNoResponse) => {
            write_attributes(service, command)
        }
        Ok(GeneralCommandIdentifier::DiscoverAttributes) => discover_attributes(service, command),
        Ok(GeneralCommandIdentifier::DefaultResponse)
        | Ok(GeneralCommandIdentifier::ReadAttributesResponse)
        | Ok(GeneralCommandIdentifier::WriteAttributesResponse)
        | Ok(GeneralCommandIdentifier::DiscoverAttributesResponse)
        | Ok(GeneralCommandIdentifier::WriteAttributesStructuredResponse) => {
            match service
                .conversation_response(command.header.transaction_sequence, &command.envelope)
            {
                Err(Error::NotFound) => {
                    log::info!(
                        "> Unexpected response {:02x}, transaction {:02x}",
                        command.header.command,
                        command.header.transaction_sequence
                    );
                    invalid_command(service, command)
                }
                result => result,
            }
        }
        _ => invalid_command(service, command),
    }
}

/// Read attributes
///
/// The response holds a record for each requested attribute that fits. A
/// attribute that fails to encode ends the response.
pub fn read_attributes(
    service: &ApplicationService,
    command: &ClusterLibraryCommand,
) -> Result<(), Error> {
    if command.payload.len() % 2 != 0 {
        return default_response(service, command, ClusterLibraryStatus::MalformedCommand);
    }
    let header = command
        .header
        .response(GeneralCommandIdentifier::ReadAttributesResponse.into());
    let mut data = [0u8; HEADER_MAX + READ_RESPONSE_MAX];
    let start = header.pack(&mut data)?;
    let end = start + READ_RESPONSE_MAX;
    let mut offset = start;
    for identifier in attribute_identifiers(command.payload) {
        if end - offset < 3 {
            break;
        }
        LittleEndian::write_u16(&mut data[offset..offset + 2], identifier);
        let status = match find_attribute(command.attributes, identifier) {
            None => ClusterLibraryStatus::UnsupportedAttribute,
            Some(attribute) if attribute.flags.contains(AttributeFlags::WRITE_ONLY) => {
                ClusterLibraryStatus::WriteOnly
            }
            Some(_) if end - offset < 4 => {
                data[offset + 2] = ClusterLibraryStatus::InsufficientSpace.into();
                offset += 3;
                break;
            }
            Some(attribute) => {
                match encode_attribute_value(attribute, &mut data[offset + 4..end]) {
                    Ok(size) => {
                        data[offset + 2] = ClusterLibraryStatus::Success.into();
                        data[offset + 3] = attribute.data_type.into();
                        offset += 4 + size;
                        continue;
                    }
                    Err(status) => {
                        log::warn!("> Read attribute {:04x} failed, {:?}", identifier, status);
                        data[offset + 2] = status.into();
                        offset += 3;
                        break;
                    }
                }
            }
        };
        data[offset + 2] = status.into();
        offset += 3;
    }
    send_response(service, command, &data[..offset])
}

/// Write attributes, all three variants
///
/// The undivided variant validates every record before assigning any. The
/// response lists the records that failed, or a single success status.
/// Records following a full status list are not processed.
pub fn write_attributes(
    service: &ApplicationService,
    command: &ClusterLibraryCommand,
) -> Result<(), Error> {
    let undivided =
        command.header.command == u8::from(GeneralCommandIdentifier::WriteAttributesUndivided);
    let no_response =
        command.header.command == u8::from(GeneralCommandIdentifier::WriteAttributesNoResponse);
    let mut failures: Vec<WriteAttributeStatus, WRITE_STATUS_MAX> = Vec::new();
    let first_pass = if undivided { 0 } else { 1 };
    for pass in first_pass..2 {
        if pass == 1 && !failures.is_empty() {
            break;
        }
        let flags = if pass == 1 {
            RecordFlags::ASSIGN
        } else {
            RecordFlags::empty()
        };
        let mut record = AttributeRecord::new(command.payload, flags);
        while !record.data.is_empty() {
            let identifier = if record.data.len() >= 2 {
                LittleEndian::read_u16(&record.data[..2])
            } else {
                0
            };
            record.flags = flags;
            record.status = ClusterLibraryStatus::Success;
            parse_attribute_record(command.attributes, &mut record);
            if record.status != ClusterLibraryStatus::Success {
                let failure = WriteAttributeStatus {
                    status: record.status,
                    identifier,
                };
                if failures.push(failure).is_err() {
                    log::warn!("> Write attributes, status list full at {:04x}", identifier);
                    break;
                }
            }
        }
    }
    if no_response {
        return Ok(());
    }
    let header = command
        .header
        .response(GeneralCommandIdentifier::WriteAttributesResponse.into());
    let mut data = [0u8; HEADER_MAX + 3 * WRITE_STATUS_MAX];
    let mut offset = header.pack(&mut data)?;
    if failures.is_empty() {
        data[offset] = ClusterLibraryStatus::Success.into();
        offset += 1;
    } else {
        for failure in failures.iter() {
            offset += failure.pack(&mut data[offset..])?;
        }
    }
    send_response(service, command, &data[..offset])
}

/// Discover attributes, reports the attributes from the start identifier
/// on, and if the end of the table was reached
pub fn discover_attributes(
    service: &ApplicationService,
    command: &ClusterLibraryCommand,
) -> Result<(), Error> {
    let request = match DiscoverAttributes::unpack(command.payload) {
        Ok((request, _)) => request,
        Err(_) => {
            return default_response(service, command, ClusterLibraryStatus::MalformedCommand)
        }
    };
    let header = command
        .header
        .response(GeneralCommandIdentifier::DiscoverAttributesResponse.into());
    let mut data = [0u8; HEADER_MAX + 1 + 3 * DISCOVER_ATTRIBUTES_MAX];
    let complete_offset = header.pack(&mut data)?;
    let mut offset = complete_offset + 1;
    let mut remaining = core::cmp::min(request.maximum as usize, DISCOVER_ATTRIBUTES_MAX);
    let mut attributes = command
        .attributes
        .iter()
        .filter(|a| a.identifier >= request.start);
    let complete = loop {
        let attribute = match attributes.next() {
            Some(attribute) => attribute,
            None => break true,
        };
        if remaining == 0 {
            break false;
        }
        offset += AttributeInformation {
            identifier: attribute.identifier,
            data_type: attribute.data_type,
        }
        .pack(&mut data[offset..])?;
        remaining -= 1;
    };
    data[complete_offset] = complete as u8;
    send_response(service, command, &data[..offset])
}

/// Handler of the cluster specific commands of a cluster
pub trait ClusterCommands {
    fn command(&self, service: &ApplicationService, command: &ClusterLibraryCommand)
        -> Result<(), Error>;
}

/// Envelope handler for a cluster library cluster
///
/// General commands work on the attribute tree, cluster specific commands
/// are passed on.
pub struct ClusterHandler<'a> {
    tree: &'a [AttributeTree<'a>],
    commands: Option<&'a dyn ClusterCommands>,
}

impl<'a> ClusterHandler<'a> {
    pub fn new(tree: &'a [AttributeTree<'a>], commands: Option<&'a dyn ClusterCommands>) -> Self {
        Self { tree, commands }
    }
}

impl<'a> EnvelopeHandler for ClusterHandler<'a> {
    fn receive(&self, service: &ApplicationService, envelope: &Envelope) -> Result<(), Error> {
        let command = ClusterLibraryCommand::build(envelope, self.tree)?;
        log::info!(
            "> ZCL cluster {:04x} command {:02x} {:?}",
            envelope.cluster,
            command.header.command,
            command.header.control.frame_type
        );
        match (command.header.control.frame_type, self.commands) {
            (FrameType::Global, _) => general_command(service, &command),
            (FrameType::Local, Some(commands)) => commands.command(service, &command),
            (FrameType::Local, None) => invalid_command(service, &command),
        }
    }
}
