//! Basic cluster server

use core::cell::{Cell, RefCell};

use xbee_data::cluster_library::basic::*;
use xbee_data::cluster_library::{AttributeDataType, ClusterLibraryStatus, Direction};
use xbee_data::common::types::CharacterString;

use crate::application_service::ApplicationService;
use crate::cluster_library::{
    default_response, invalid_command, Attribute, AttributeFlags, ClusterCommands,
    ClusterLibraryCommand,
};
use crate::Error;

/// Character string from `text`, truncated to fit
pub fn character_string(text: &str) -> CharacterString {
    let mut value = CharacterString::new();
    for c in text.chars() {
        if value.push(c).is_err() {
            break;
        }
    }
    value
}

/// Number of attributes of the basic cluster
pub const BASIC_ATTRIBUTES: usize = 12;

/// Values of the basic cluster
///
/// Location description, physical environment and device enabled can be
/// written, the reset command restores them.
pub struct BasicCluster {
    library_version: Cell<u8>,
    pub application_version: Cell<u8>,
    pub stack_version: Cell<u8>,
    pub hardware_version: Cell<u8>,
    pub manufacturer_name: RefCell<CharacterString>,
    pub model_identifier: RefCell<CharacterString>,
    pub date_code: RefCell<CharacterString>,
    pub power_source: Cell<u8>,
    pub location_description: RefCell<CharacterString>,
    pub physical_environment: Cell<u8>,
    pub device_enabled: Cell<bool>,
    pub software_build: RefCell<CharacterString>,
}

impl BasicCluster {
    pub fn new(manufacturer_name: &str, model_identifier: &str, power_source: PowerSource) -> Self {
        Self {
            library_version: Cell::new(LIBRARY_VERSION),
            application_version: Cell::new(0),
            stack_version: Cell::new(0),
            hardware_version: Cell::new(0),
            manufacturer_name: RefCell::new(character_string(manufacturer_name)),
            model_identifier: RefCell::new(character_string(model_identifier)),
            date_code: RefCell::new(CharacterString::new()),
            power_source: Cell::new(power_source.into()),
            location_description: RefCell::new(CharacterString::new()),
            physical_environment: Cell::new(0),
            device_enabled: Cell::new(true),
            software_build: RefCell::new(CharacterString::new()),
        }
    }

    /// Set the location description, truncated to the longest allowed
    pub fn set_location_description(&self, location: &str) {
        let location: CharacterString = location.chars().take(LOCATION_DESCRIPTION_MAX).collect();
        self.location_description.replace(location);
    }

    /// Restore the writable attributes
    pub fn reset(&self) {
        self.location_description.replace(CharacterString::new());
        self.physical_environment.set(0);
        self.device_enabled.set(true);
    }

    /// Server attribute table
    pub fn attributes(&self) -> [Attribute<'_>; BASIC_ATTRIBUTES] {
        let read_only = AttributeFlags::READ_ONLY;
        [
            Attribute::new(
                ATTR_LIBRARY_VERSION,
                AttributeDataType::Unsigned8,
                read_only,
                &self.library_version,
            ),
            Attribute::new(
                ATTR_APPLICATION_VERSION,
                AttributeDataType::Unsigned8,
                read_only,
                &self.application_version,
            ),
            Attribute::new(
                ATTR_STACK_VERSION,
                AttributeDataType::Unsigned8,
                read_only,
                &self.stack_version,
            ),
            Attribute::new(
                ATTR_HARDWARE_VERSION,
                AttributeDataType::Unsigned8,
                read_only,
                &self.hardware_version,
            ),
            Attribute::new(
                ATTR_MANUFACTURER_NAME,
                AttributeDataType::CharacterString,
                read_only,
                &self.manufacturer_name,
            ),
            Attribute::new(
                ATTR_MODEL_IDENTIFIER,
                AttributeDataType::CharacterString,
                read_only,
                &self.model_identifier,
            ),
            Attribute::new(
                ATTR_DATE_CODE,
                AttributeDataType::CharacterString,
                read_only,
                &self.date_code,
            ),
            Attribute::new(
                ATTR_POWER_SOURCE,
                AttributeDataType::Enumeration8,
                read_only,
                &self.power_source,
            ),
            Attribute::new(
                ATTR_LOCATION_DESCRIPTION,
                AttributeDataType::CharacterString,
                AttributeFlags::empty(),
                &self.location_description,
            )
            .with_limits(None, Some(LOCATION_DESCRIPTION_MAX as i64)),
            Attribute::new(
                ATTR_PHYSICAL_ENVIRONMENT,
                AttributeDataType::Enumeration8,
                AttributeFlags::empty(),
                &self.physical_environment,
            ),
            Attribute::new(
                ATTR_DEVICE_ENABLED,
                AttributeDataType::Boolean,
                AttributeFlags::empty(),
                &self.device_enabled,
            ),
            Attribute::new(
                ATTR_SOFTWARE_BUILD_IDENTIFIER,
                AttributeDataType::CharacterString,
                read_only,
                &self.software_build,
            ),
        ]
    }
}

impl ClusterCommands for BasicCluster {
    fn command(
        &self,
        service: &ApplicationService,
        command: &ClusterLibraryCommand,
    ) -> Result<(), Error> {
        let header = &command.header;
        if header.command == CMD_RESET
            && header.manufacturer.is_none()
            && header.control.direction == Direction::ToServer
        {
            log::info!("> ZCL Basic reset to factory defaults");
            self.reset();
            default_response(service, command, ClusterLibraryStatus::Success)
        } else {
            invalid_command(service, command)
        }
    }
}
