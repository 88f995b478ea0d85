// # zonesync-core
//
// Core library for keeping a DNS "A" record synchronized with the
// machine's current public IPv4 address.
//
// ## Architecture Overview
//
// - **PublicIpResolver**: Trait for fetching the current public IP from
//   an external echo service
// - **DnsProvider**: Trait for looking up, creating, and updating the
//   managed record via the provider's zone API
// - **Reconciler**: Orchestrates resolve → lookup → decide → mutate on a
//   fixed schedule
//
// ## Design Principles
//
// 1. **Stateless ticks**: every value is created at the start of a tick
//    and discarded at the end; the provider's record is the only state
// 2. **Errors stay inside the tick**: a failed operation aborts the tick,
//    never the scheduling loop
// 3. **Library-first**: the engine takes trait objects, so tests (and
//    embedders) can substitute their own resolver and provider

pub mod config;
pub mod engine;
pub mod error;
pub mod traits;

// Re-export core types for convenience
pub use config::{EngineConfig, ProviderConfig, RecordConfig, ResolverConfig, SyncConfig};
pub use engine::{Reconciler, ReconcilerEvent, TickOutcome};
pub use error::{Error, Result};
pub use traits::{DnsProvider, DnsRecord, PublicIp, PublicIpResolver};
