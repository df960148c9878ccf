//! General cluster library commands

mod attributes;
mod default_response;

pub use attributes::{
    attribute_identifiers, AttributeInformation, DiscoverAttributes, WriteAttributeStatus,
};
pub use default_response::DefaultResponse;

extended_enum!(
    /// Cluster library general command identifiers
    GeneralCommandIdentifier, u8,
    ReadAttributes => 0x00,
    ReadAttributesResponse => 0x01,
    WriteAttributes => 0x02,
    WriteAttributesUndivided => 0x03,
    WriteAttributesResponse => 0x04,
    WriteAttributesNoResponse => 0x05,
    ConfigureReporting => 0x06,
    ConfigureReportingResponse => 0x07,
    ReadReportingConfiguration => 0x08,
    ReadReportingConfigurationResponse => 0x09,
    ReportAttributes => 0x0a,
    DefaultResponse => 0x0b,
    DiscoverAttributes => 0x0c,
    DiscoverAttributesResponse => 0x0d,
    ReadAttributesStructured => 0x0e,
    WriteAttributesStructured => 0x0f,
    WriteAttributesStructuredResponse => 0x10,
    DiscoverCommandsReceived => 0x11,
    DiscoverCommandsReceivedResponse => 0x12,
    DiscoverCommandsGenerated => 0x13,
    DiscoverCommandsGeneratedResponse => 0x14,
    DiscoverAttributesExtended => 0x15,
    DiscoverAttributesExtendedResponse => 0x16,
);

impl GeneralCommandIdentifier {
    /// Is the command a response to another command
    pub fn is_response(self) -> bool {
        matches!(
            self,
            GeneralCommandIdentifier::ReadAttributesResponse
                | GeneralCommandIdentifier::WriteAttributesResponse
                | GeneralCommandIdentifier::ConfigureReportingResponse
                | GeneralCommandIdentifier::ReadReportingConfigurationResponse
                | GeneralCommandIdentifier::DefaultResponse
                | GeneralCommandIdentifier::DiscoverAttributesResponse
                | GeneralCommandIdentifier::WriteAttributesStructuredResponse
                | GeneralCommandIdentifier::DiscoverCommandsReceivedResponse
                | GeneralCommandIdentifier::DiscoverCommandsGeneratedResponse
                | GeneralCommandIdentifier::DiscoverAttributesExtendedResponse
        )
    }
}
