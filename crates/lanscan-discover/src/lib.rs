//! lanscan-discover: Local subnet inventory.
//!
//! Reads the OS ARP cache (optionally after a ping sweep), turns it into a
//! canonical device list, tracks changes between scans, and flags devices
//! that deserve a closer look.

pub mod aggregate;
pub mod arp_table;
pub mod config;
pub mod diff;
pub mod error;
pub mod reader;
pub mod requests;
pub mod security;
pub mod service;
pub mod store;
pub mod sweep;
pub mod vendor;

#[cfg(all(test, unix))]
pub(crate) mod test_support;
