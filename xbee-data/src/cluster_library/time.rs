//! # Time Cluster

/// Time cluster
pub const CLUSTER: u16 = 0x000a;
/// Time cluster attribute, UTC time, seconds since 2000-01-01 00:00:00
pub const ATTR_TIME: u16 = 0x0000;
/// Time cluster attribute, time status
pub const ATTR_TIME_STATUS: u16 = 0x0001;
/// Time cluster attribute, time zone offset in seconds
pub const ATTR_TIME_ZONE: u16 = 0x0002;

/// Time status, the time is the master clock of the network
pub const STATUS_MASTER: u8 = 0x01;
/// Time status, the time has been synchronised with a master clock
pub const STATUS_SYNCHRONIZED: u8 = 0x02;
/// Time status, the time zone and daylight saving are mastered
pub const STATUS_MASTER_ZONE_DST: u8 = 0x04;

/// Invalid UTC time
pub const UTC_TIME_INVALID: u32 = 0xffff_ffff;
/// Seconds between the Unix epoch and the cluster library epoch, 2000-01-01
pub const EPOCH_OFFSET: u64 = 946_684_800;
