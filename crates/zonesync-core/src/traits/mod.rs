//! Core traits for the reconciliation engine
//!
//! This module defines the abstract interfaces the engine orchestrates.
//!
//! - [`PublicIpResolver`]: Fetch the current public IPv4 address
//! - [`DnsProvider`]: Look up, create, and update the managed record

pub mod dns_provider;
pub mod ip_resolver;

pub use dns_provider::{DnsProvider, DnsRecord};
pub use ip_resolver::{PublicIp, PublicIpResolver};
