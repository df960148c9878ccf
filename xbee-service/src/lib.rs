//! # XBee Service
//!
//! Drives a XBee module in API mode. Frames read from the serial link are
//! dispatched to frame handlers, explicit receive frames are routed to
//! endpoints and clusters by the application service. The device profile
//! and the cluster library are implemented on top of it.

#![cfg_attr(not(test), no_std)]

#[macro_use]
extern crate bitflags;

pub mod application_service;
pub mod cluster_library;
mod device;
pub mod device_profile;
mod dispatch;
mod error;
mod reader;

pub use device::{DeviceFlags, XBeeDevice, MAX_DISPATCH_PER_TICK};
pub use dispatch::{dispatch, FrameHandler, FrameHandlerEntry};
pub use error::Error;
pub use reader::{FrameReader, SerialRead};

/// Capacity of the transmit queue
pub const TX_QUEUE_CAPACITY: usize = 1024;
