//! # XBee data - XBee API frames and Z**bee application payloads
//!
//! This crate contains the wire formats used when talking to a XBee module
//! in API mode, and the Z**bee application layer payloads carried inside
//! explicit addressing frames.
//!

#![warn(missing_docs)]
#![cfg_attr(not(test), no_std)]

#[macro_use]
extern crate bitflags;

#[macro_use]
mod utils;

pub mod cluster_library; // ZCL
pub mod common;
pub mod device_profile; // ZDP
pub mod error;
pub mod frame;
pub mod pack;

pub use common::address::{ExtendedAddress, NetworkAddress};
pub use common::profile_identifier::ProfileIdentifier;
pub use error::Error;
