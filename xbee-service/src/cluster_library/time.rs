//! Time cluster server
//!
//! The time is kept as a skew against the seconds timer of the device.
//! Times are seconds since 2000-01-01 UTC.

use core::cell::Cell;

use xbee_data::cluster_library::time::*;
use xbee_data::cluster_library::{AttributeDataType, ClusterLibraryStatus};

use crate::application_service::WpanDevice;
use crate::cluster_library::{
    decode_attribute, Attribute, AttributeFlags, AttributeHooks, AttributeRecord, RecordFlags,
};

pub struct TimeCluster<'a> {
    device: &'a dyn WpanDevice,
    epoch: u32,
    skew: Cell<u32>,
    time: Cell<u32>,
    status: Cell<u8>,
    time_zone: Cell<i32>,
}

impl<'a> TimeCluster<'a> {
    /// Time cluster using the seconds timer of `device`, `epoch` is the
    /// timer value at which the time is valid
    pub fn new(device: &'a dyn WpanDevice, epoch: u32) -> Self {
        Self {
            device,
            epoch,
            skew: Cell::new(0),
            time: Cell::new(UTC_TIME_INVALID),
            status: Cell::new(0),
            time_zone: Cell::new(0),
        }
    }

    fn elapsed(&self) -> Option<u32> {
        let seconds = self.device.seconds();
        if self.skew.get() == 0 && seconds < self.epoch {
            None
        } else {
            Some(seconds.wrapping_sub(self.epoch))
        }
    }

    fn current(&self) -> u32 {
        match self.elapsed() {
            Some(elapsed) => self.skew.get().wrapping_add(elapsed),
            None => UTC_TIME_INVALID,
        }
    }

    /// Current time, invalid unless this is a time master or has been
    /// synchronised
    pub fn now(&self) -> u32 {
        if self.status.get() & (STATUS_MASTER | STATUS_SYNCHRONIZED) != 0 {
            self.current()
        } else {
            UTC_TIME_INVALID
        }
    }

    /// Set the current time
    pub fn set_time(&self, time: u32) {
        let elapsed = self.device.seconds().wrapping_sub(self.epoch);
        self.skew.set(time.wrapping_sub(elapsed));
    }

    /// Claim to be a time master, the time can not be written over the air
    pub fn set_master(&self, master: bool) {
        self.set_status(STATUS_MASTER, master);
    }

    pub fn set_synchronized(&self, synchronized: bool) {
        self.set_status(STATUS_SYNCHRONIZED, synchronized);
    }

    pub fn status(&self) -> u8 {
        self.status.get()
    }

    pub fn time_zone(&self) -> i32 {
        self.time_zone.get()
    }

    fn set_status(&self, mask: u8, set: bool) {
        let status = self.status.get();
        self.status
            .set(if set { status | mask } else { status & !mask });
    }

    fn is_master(&self) -> bool {
        self.status.get() & STATUS_MASTER == STATUS_MASTER
    }

    /// Server attribute table
    pub fn attributes(&self) -> [Attribute<'_>; 3] {
        [
            Attribute::new(
                ATTR_TIME,
                AttributeDataType::UtcTime,
                AttributeFlags::empty(),
                &self.time,
            )
            .with_hooks(self),
            Attribute::new(
                ATTR_TIME_STATUS,
                AttributeDataType::Bitmap8,
                AttributeFlags::empty(),
                &self.status,
            )
            .with_hooks(self),
            Attribute::new(
                ATTR_TIME_ZONE,
                AttributeDataType::Signed32,
                AttributeFlags::empty(),
                &self.time_zone,
            )
            .with_limits(Some(-86400), Some(86400)),
        ]
    }
}

impl<'a> AttributeHooks for TimeCluster<'a> {
    fn refresh(&self, attribute: &Attribute) -> Result<(), ClusterLibraryStatus> {
        if attribute.identifier == ATTR_TIME {
            self.time.set(self.current());
        }
        Ok(())
    }

    fn write(&self, attribute: &Attribute, record: &mut AttributeRecord) -> usize {
        match attribute.identifier {
            ATTR_TIME => {
                if self.is_master() {
                    record.fail(ClusterLibraryStatus::ReadOnly);
                    return core::cmp::min(4, record.data.len());
                }
                let consumed = decode_attribute(attribute, record);
                if record.flags.contains(RecordFlags::ASSIGN)
                    && record.status == ClusterLibraryStatus::Success
                {
                    self.set_time(self.time.get());
                    log::info!("> ZCL Time set to {}", self.time.get());
                }
                consumed
            }
            ATTR_TIME_STATUS => {
                let value = match record.data.first() {
                    Some(value) => *value,
                    None => {
                        record.fail(ClusterLibraryStatus::MalformedCommand);
                        return 0;
                    }
                };
                if record.flags.contains(RecordFlags::ASSIGN) && !self.is_master() {
                    self.set_synchronized(value & STATUS_SYNCHRONIZED != 0);
                }
                1
            }
            _ => decode_attribute(attribute, record),
        }
    }
}
