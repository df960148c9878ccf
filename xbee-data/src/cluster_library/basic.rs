//! # Basic Cluster

/// Basic cluster
pub const CLUSTER: u16 = 0x0000;
/// Basic cluster attribute, cluster library version
pub const ATTR_LIBRARY_VERSION: u16 = 0x0000;
/// Basic cluster attribute, application version
pub const ATTR_APPLICATION_VERSION: u16 = 0x0001;
/// Basic cluster attribute, stack version
pub const ATTR_STACK_VERSION: u16 = 0x0002;
/// Basic cluster attribute, hardware version
pub const ATTR_HARDWARE_VERSION: u16 = 0x0003;
/// Basic cluster attribute, manufacturer name
pub const ATTR_MANUFACTURER_NAME: u16 = 0x0004;
/// Basic cluster attribute, model identifier
pub const ATTR_MODEL_IDENTIFIER: u16 = 0x0005;
/// Basic cluster attribute, date code, YYYYMMDD
pub const ATTR_DATE_CODE: u16 = 0x0006;
/// Basic cluster attribute, power source
pub const ATTR_POWER_SOURCE: u16 = 0x0007;
/// Basic cluster attribute, location description
pub const ATTR_LOCATION_DESCRIPTION: u16 = 0x0010;
/// Basic cluster attribute, physical environment
pub const ATTR_PHYSICAL_ENVIRONMENT: u16 = 0x0011;
/// Basic cluster attribute, device enabled
pub const ATTR_DEVICE_ENABLED: u16 = 0x0012;
/// Basic cluster attribute, alarm mask
pub const ATTR_ALARM_MASK: u16 = 0x0013;
/// Basic cluster attribute, software build identifier
pub const ATTR_SOFTWARE_BUILD_IDENTIFIER: u16 = 0x4000;

/// Basic cluster command, reset to factory defaults
pub const CMD_RESET: u8 = 0x00;

/// Cluster library version implemented
pub const LIBRARY_VERSION: u8 = 0x01;
/// Longest location description
pub const LOCATION_DESCRIPTION_MAX: usize = 16;

/// Power source flag, a battery backup is present
pub const POWER_SOURCE_BATTERY_BACKUP: u8 = 0x80;

extended_enum!(
    /// Power source
    PowerSource, u8,
    /// Unknown
    Unknown => 0x00,
    /// Mains power, single phase
    Mains => 0x01,
    /// Mains power, three phase
    MainsThreePhase => 0x02,
    /// Battery
    Battery => 0x03,
    /// Direct current
    Dc => 0x04,
    /// Emergency mains constantly powered
    EmergencyConstant => 0x05,
    /// Emergency mains and transfer switch
    EmergencySwitched => 0x06,
);
