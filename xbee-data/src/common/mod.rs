//! # Common structs and functions
//!
//! Addresses, profile identifiers and string types shared by the layers.

pub mod address;
pub mod profile_identifier;
pub mod types;

pub use profile_identifier::ProfileIdentifier;
