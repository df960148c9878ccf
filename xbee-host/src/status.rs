//! Printing of the status frames from the module

use std::convert::TryFrom;

use chrono::{Local, SecondsFormat, TimeZone, Utc};

use xbee_data::cluster_library::time::{EPOCH_OFFSET, UTC_TIME_INVALID};
use xbee_data::device_profile::DeviceAnnounce;
use xbee_data::frame::{FrameType, ModemStatus, TransmitStatus};
use xbee_data::pack::Pack;
use xbee_service::application_service::{ApplicationService, Envelope};
use xbee_service::device_profile::DeviceAnnounceHandler;
use xbee_service::{Error, FrameHandler};

fn timestamp() -> String {
    Local::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Cluster library time as RFC 3339
pub fn format_time(time: u32) -> String {
    if time == UTC_TIME_INVALID {
        return String::from("invalid");
    }
    match Utc
        .timestamp_opt(i64::from(time) + EPOCH_OFFSET as i64, 0)
        .single()
    {
        Some(time) => time.to_rfc3339_opts(SecondsFormat::Secs, true),
        None => String::from("invalid"),
    }
}

/// Prints modem status and transmit status frames
pub struct StatusLog;

impl FrameHandler for StatusLog {
    fn handle_frame(&self, frame: &[u8]) -> Result<(), Error> {
        let frame_type = match frame.first() {
            Some(frame_type) => *frame_type,
            None => return Ok(()),
        };
        match FrameType::try_from(frame_type) {
            Ok(FrameType::ModemStatus) => match ModemStatus::from_frame(frame) {
                Ok(status) => println!("{} Modem status {:?}", timestamp(), status),
                Err(_) => println!("{} Modem status {:02x}", timestamp(), frame[1]),
            },
            Ok(FrameType::TransmitStatus) => {
                let (status, _) = TransmitStatus::unpack(frame)?;
                println!(
                    "{} Transmit {:02x} to {} {:?} retries {} discovery {:02x}",
                    timestamp(),
                    status.frame_id,
                    status.network_address,
                    status.delivery,
                    status.retries,
                    status.discovery
                );
            }
            _ => (),
        }
        Ok(())
    }
}

/// Prints device announcements
pub struct AnnounceLog;

impl DeviceAnnounceHandler for AnnounceLog {
    fn announce(&self, _service: &ApplicationService, _envelope: &Envelope, announce: &DeviceAnnounce) {
        println!(
            "{} Device {} joined as {}, capability {:02x}",
            timestamp(),
            announce.extended_address,
            announce.network_address,
            announce.capability
        );
    }
}
