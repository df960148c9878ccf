mod config;
mod status;

use std::io::{self, Read, Write};
use std::time::{Duration, Instant};

use bbqueue::{consts::U1024, BBBuffer};
use chrono::Utc;
use clap::{App, AppSettings, Arg};

use serialport::prelude::*;

use slice_deque::SliceDeque;

use xbee_data::cluster_library::basic::{self, PowerSource};
use xbee_data::cluster_library::time::{self, EPOCH_OFFSET};
use xbee_data::frame::FrameType;
use xbee_data::ProfileIdentifier;
use xbee_service::application_service::{
    ApplicationService, Cluster, ClusterFlags, Endpoint, EndpointState,
};
use xbee_service::cluster_library::basic::BasicCluster;
use xbee_service::cluster_library::time::TimeCluster;
use xbee_service::cluster_library::{AttributeTree, ClusterHandler};
use xbee_service::device_profile::DeviceProfileResponder;
use xbee_service::{FrameHandlerEntry, SerialRead, XBeeDevice};

use crate::config::{read_config, Config};
use crate::status::{format_time, AnnounceLog, StatusLog};

const HOME_ENDPOINT: u8 = 0x01;
// Home automation combined interface
const HOME_DEVICE: u16 = 0x0007;
const TIME_REPORT_INTERVAL: u32 = 60;

/// Bytes read from the serial port, waiting for the frame reader
struct ReceiveBuffer {
    buffer: SliceDeque<u8>,
}

impl SerialRead for ReceiveBuffer {
    fn read(&mut self, buffer: &mut [u8]) -> usize {
        let size = std::cmp::min(self.buffer.len(), buffer.len());
        buffer[..size].copy_from_slice(&self.buffer[..size]);
        let remaining = self.buffer.len() - size;
        self.buffer.truncate_front(remaining);
        size
    }
}

/// Current time in seconds since the cluster library epoch
fn utc_time() -> u32 {
    (Utc::now().timestamp() - EPOCH_OFFSET as i64) as u32
}

fn main() {
    env_logger::init();
    let matches = App::new("XBee host")
        .about("Runs a Zigbee node on a XBee module in API mode")
        .setting(AppSettings::DisableVersion)
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .help("Path to configuration file")
                .use_delimiter(false)
                .required(false)
                .takes_value(true),
        )
        .arg(
            Arg::with_name("baud")
                .short("b")
                .long("baud")
                .help("Baud rate of the serial port")
                .use_delimiter(false)
                .required(false)
                .takes_value(true),
        )
        .arg(
            Arg::with_name("port")
                .help("The device path to a serial port")
                .use_delimiter(false)
                .required(false),
        )
        .get_matches();

    let config = match matches.value_of("config") {
        Some(file_path) => match read_config(file_path) {
            Some(config) => config,
            None => ::std::process::exit(1),
        },
        None => Config::default(),
    };

    let port_name = match matches.value_of("port").map(String::from).or(config.port) {
        Some(port_name) => port_name,
        None => {
            eprintln!("No serial port given");
            ::std::process::exit(1);
        }
    };
    let baud_rate = match matches.value_of("baud") {
        Some(baud) => match baud.parse::<u32>() {
            Ok(baud) => baud,
            Err(_) => {
                eprintln!("Invalid baud rate \"{}\"", baud);
                ::std::process::exit(1);
            }
        },
        None => config.baud_rate.unwrap_or(115_200),
    };
    let mut settings: SerialPortSettings = Default::default();
    settings.baud_rate = baud_rate;
    settings.timeout = Duration::from_millis(1000);

    let mut port = match serialport::open_with_settings(&port_name, &settings) {
        Ok(port) => port,
        Err(e) => {
            eprintln!("Failed to open \"{}\". Error: {}", port_name, e);
            ::std::process::exit(1);
        }
    };

    let tx_queue: BBBuffer<U1024> = BBBuffer::new();
    let (tx_producer, mut tx_consumer) = match tx_queue.try_split() {
        Ok(queue) => queue,
        Err(e) => {
            eprintln!("Failed to split the transmit queue, {:?}", e);
            ::std::process::exit(1);
        }
    };
    let device = XBeeDevice::new(tx_producer);
    let start = Instant::now();

    let announce_log = AnnounceLog;
    let status_log = StatusLog;
    let responder = DeviceProfileResponder::new(Some(&announce_log));
    let basic_cluster = BasicCluster::new(
        config.manufacturer.as_deref().unwrap_or("Digi"),
        config.model.as_deref().unwrap_or("XBee host"),
        PowerSource::Mains,
    );
    if let Some(location) = config.location.as_deref() {
        basic_cluster.set_location_description(location);
    }
    let time_cluster = TimeCluster::new(&device, 0);
    time_cluster.set_time(utc_time());
    time_cluster.set_master(true);

    let basic_attributes = basic_cluster.attributes();
    let time_attributes = time_cluster.attributes();
    let basic_tree = [AttributeTree::server(&basic_attributes)];
    let time_tree = [AttributeTree::server(&time_attributes)];
    let basic_handler = ClusterHandler::new(&basic_tree, Some(&basic_cluster));
    let time_handler = ClusterHandler::new(&time_tree, None);
    let device_profile_state = EndpointState::new();
    let home_state = EndpointState::new();
    let home_clusters = [
        Cluster {
            cluster: basic::CLUSTER,
            flags: ClusterFlags::INPUT,
            handler: Some(&basic_handler),
        },
        Cluster {
            cluster: time::CLUSTER,
            flags: ClusterFlags::INPUT,
            handler: Some(&time_handler),
        },
    ];
    let endpoints = [
        responder.endpoint(&device_profile_state),
        Endpoint {
            endpoint: HOME_ENDPOINT,
            profile: u16::from(ProfileIdentifier::HomeAutomation),
            device: HOME_DEVICE,
            device_version: 0,
            clusters: &home_clusters,
            handler: None,
            state: Some(&home_state),
        },
    ];
    let service = ApplicationService::new(&device, &endpoints);
    let handlers = [
        FrameHandlerEntry::new(u8::from(FrameType::ReceiveExplicit), 0, &service),
        FrameHandlerEntry::new(u8::from(FrameType::ModemStatus), 0, &status_log),
        FrameHandlerEntry::new(u8::from(FrameType::TransmitStatus), 0, &status_log),
    ];

    if let Err(e) = device.query_identity() {
        log::error!("Failed to query the module identity, {:?}", e);
    }

    let mut receive = ReceiveBuffer {
        buffer: SliceDeque::with_capacity(256),
    };
    let mut data = [0u8; 256];
    let mut last_report = 0;

    println!("XBee host on {} at {} baud", &port_name, baud_rate);
    loop {
        match port.read(&mut data) {
            Ok(rx_count) => receive.buffer.extend_from_slice(&data[..rx_count]),
            Err(ref e) if e.kind() == io::ErrorKind::TimedOut => (),
            Err(e) => eprintln!("{:?}", e),
        }
        let seconds = start.elapsed().as_secs() as u32;
        loop {
            match device.tick(&mut receive, &handlers, seconds) {
                Ok(0) => break,
                Ok(_) => (),
                Err(e) => {
                    log::warn!("Device tick failed, {:?}", e);
                    break;
                }
            }
        }
        service.tick();

        if seconds.wrapping_sub(last_report) >= TIME_REPORT_INTERVAL {
            last_report = seconds;
            log::info!(
                "Network address {} time {}",
                device.network_address(),
                format_time(time_cluster.now())
            );
        }

        while let Ok(grant) = tx_consumer.read() {
            let size = grant.len();
            if let Err(e) = port.write_all(&grant) {
                log::error!("Failed to write {} bytes, {:?}", size, e);
            }
            grant.release(size);
        }
    }
}
