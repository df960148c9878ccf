//! Client side of the general commands

use core::cell::Cell;

use byteorder::{ByteOrder, LittleEndian};

use xbee_data::cluster_library::{
    ClusterLibraryHeader, ClusterLibraryStatus, Direction, FrameControl, FrameType,
    GeneralCommandIdentifier,
};
use xbee_data::pack::Pack;

use crate::application_service::{
    ApplicationService, ConversationHandler, ConversationStatus, Envelope,
};
use crate::cluster_library::{parse_attribute_record, Attribute, AttributeRecord, RecordFlags};
use crate::Error;

/// Maximum number of attributes in a read attributes request
pub const READ_REQUEST_MAX: usize = 20;

/// Seconds to wait for a response
pub const ZCL_CONVERSATION_TIMEOUT: u16 = 15;

/// Send a read attributes request for up to `READ_REQUEST_MAX` attributes
///
/// `envelope` holds the addressing, its payload is ignored. The response is
/// passed to `handler`, if any. Returns the transaction sequence number.
pub fn read_attributes_request<'a>(
    service: &ApplicationService<'a>,
    envelope: &Envelope,
    manufacturer: Option<u16>,
    attributes: &[u16],
    handler: Option<&'a dyn ConversationHandler>,
) -> Result<u8, Error> {
    let timeout = if handler.is_some() {
        ZCL_CONVERSATION_TIMEOUT
    } else {
        0
    };
    let transaction =
        service.register_conversation(envelope.source_endpoint, envelope.profile, handler, timeout)?;
    let header = ClusterLibraryHeader {
        control: FrameControl {
            frame_type: FrameType::Global,
            manufacturer_specific: manufacturer.is_some(),
            direction: Direction::ToServer,
            disable_default_response: false,
        },
        manufacturer,
        transaction_sequence: transaction,
        command: GeneralCommandIdentifier::ReadAttributes.into(),
    };
    let mut data = [0u8; 5 + 2 * READ_REQUEST_MAX];
    let mut offset = header.pack(&mut data)?;
    for identifier in attributes.iter().take(READ_REQUEST_MAX) {
        LittleEndian::write_u16(&mut data[offset..offset + 2], *identifier);
        offset += 2;
    }
    log::info!(
        "< ZCL Read attributes {} cluster {:04x} transaction {:02x}",
        envelope.network_address,
        envelope.cluster,
        transaction
    );
    let request = Envelope {
        payload: &data[..offset],
        ..*envelope
    };
    service.send(&request)?;
    Ok(transaction)
}

/// Store the values of a read attributes response payload in `attributes`
///
/// Failed records are skipped, parsing stops at the first record that can
/// not be stored.
pub fn process_read_attributes_response(
    attributes: &[Attribute],
    payload: &[u8],
) -> ClusterLibraryStatus {
    let mut record = AttributeRecord::new(payload, RecordFlags::ASSIGN | RecordFlags::READ_RESPONSE);
    while record.status == ClusterLibraryStatus::Success && !record.data.is_empty() {
        record.flags = RecordFlags::ASSIGN | RecordFlags::READ_RESPONSE;
        parse_attribute_record(attributes, &mut record);
    }
    record.status
}

/// Conversation handler keeping a copy of remote attributes
pub struct AttributeMirror<'a> {
    attributes: &'a [Attribute<'a>],
    status: Cell<Option<ClusterLibraryStatus>>,
}

impl<'a> AttributeMirror<'a> {
    pub fn new(attributes: &'a [Attribute<'a>]) -> Self {
        Self {
            attributes,
            status: Cell::new(None),
        }
    }

    /// Status of the last response, `Timeout` if none arrived
    pub fn status(&self) -> Option<ClusterLibraryStatus> {
        self.status.get()
    }
}

impl<'a> ConversationHandler for AttributeMirror<'a> {
    fn respond(
        &self,
        _service: &ApplicationService,
        envelope: Option<&Envelope>,
    ) -> Result<ConversationStatus, Error> {
        let envelope = match envelope {
            Some(envelope) => envelope,
            None => {
                self.status.set(Some(ClusterLibraryStatus::Timeout));
                return Ok(ConversationStatus::End);
            }
        };
        let (header, used) = ClusterLibraryHeader::unpack(envelope.payload)?;
        let status = if header.command == u8::from(GeneralCommandIdentifier::ReadAttributesResponse)
        {
            process_read_attributes_response(self.attributes, &envelope.payload[used..])
        } else {
            match envelope.payload.get(used + 1) {
                Some(status) => {
                    ClusterLibraryStatus::try_from(*status).unwrap_or(ClusterLibraryStatus::Failure)
                }
                None => ClusterLibraryStatus::MalformedCommand,
            }
        };
        self.status.set(Some(status));
        Ok(ConversationStatus::End)
    }
}
