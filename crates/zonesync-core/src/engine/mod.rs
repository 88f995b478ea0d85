//! Core reconciliation engine
//!
//! The Reconciler is responsible for:
//! - Resolving the current public IP via PublicIpResolver
//! - Looking up the managed record via DnsProvider
//! - Deciding between no-op, create, and update
//! - Running the above on a fixed schedule
//!
//! ## Tick flow
//!
//! ```text
//! ┌──────────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ PublicIpResolver │ ──▶ │  Reconciler  │ ──▶ │ DnsProvider  │
//! │    (resolve)     │     │   (decide)   │     │ (find/mutate)│
//! └──────────────────┘     └──────────────┘     └──────────────┘
//! ```
//!
//! 1. Resolve the public IP; on failure abort the tick
//! 2. Look up the record by name; on failure abort the tick
//! 3. No record → create; content differs → update by id; else no-op
//!
//! Every per-tick value goes out of scope when the tick ends. Errors are
//! caught at the boundary of the operation that produced them and folded
//! into the tick's outcome; nothing can crash the scheduling loop.

use crate::config::SyncConfig;
use crate::error::Result;
use crate::traits::{DnsProvider, PublicIp, PublicIpResolver};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

/// The result of one reconciliation tick
///
/// Not persisted anywhere — used for logging, engine events, and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// The record already carries the current public IP
    Unchanged {
        /// The resolved public IP
        current: PublicIp,
    },

    /// No record existed; one was created with the resolved IP
    Created {
        /// Provider-assigned id of the new record
        record_id: String,
        /// The resolved public IP the record now carries
        new_ip: PublicIp,
    },

    /// The record was stale and has been updated
    Updated {
        /// Id of the record that was updated
        record_id: String,
        /// Content the record carried before the update
        previous: String,
        /// The resolved public IP the record now carries
        new_ip: PublicIp,
    },

    /// The public IP could not be resolved; lookup and mutation skipped
    ResolveFailed {
        /// Underlying error message
        error: String,
    },

    /// The record lookup failed; mutation skipped
    LookupFailed {
        /// Underlying error message
        error: String,
    },

    /// The create or update call failed
    MutationFailed {
        /// Underlying error message
        error: String,
    },
}

/// Events emitted by the Reconciler for external observation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcilerEvent {
    /// Engine started
    Started {
        /// Name of the record being managed
        record_name: String,
    },

    /// A reconciliation tick completed
    TickCompleted(TickOutcome),

    /// Engine stopped
    Stopped {
        /// Why the engine stopped
        reason: String,
    },
}

/// Core reconciliation engine
///
/// The engine orchestrates the resolve → lookup → decide → mutate flow.
/// It runs one tick immediately at startup and then once per configured
/// interval, forever, until the process is terminated.
///
/// ## Scheduling
///
/// Ticks are serialized: the loop awaits the current tick's completion
/// before the next interval fire is honored, so a tick slower than the
/// interval delays the next tick instead of overlapping it. There is no
/// backoff, no jitter, and no retry cap — a failed tick simply waits for
/// the next scheduled one.
pub struct Reconciler {
    /// Resolver for the current public IP
    resolver: Box<dyn PublicIpResolver>,

    /// DNS provider for lookup and mutation
    provider: Box<dyn DnsProvider>,

    /// Name of the record to keep synchronized
    record_name: String,

    /// Interval between ticks
    interval: Duration,

    /// Event sender for external monitoring
    event_tx: mpsc::Sender<ReconcilerEvent>,
}

impl Reconciler {
    /// Create a new reconciler
    ///
    /// # Parameters
    ///
    /// - `resolver`: Public-IP resolver implementation
    /// - `provider`: DNS provider implementation
    /// - `config`: Validated at construction; an invalid configuration
    ///   is a startup error, not a per-tick one
    ///
    /// # Returns
    ///
    /// A tuple of (engine, event_receiver) where event_receiver yields
    /// engine events
    pub fn new(
        resolver: Box<dyn PublicIpResolver>,
        provider: Box<dyn DnsProvider>,
        config: SyncConfig,
    ) -> Result<(Self, mpsc::Receiver<ReconcilerEvent>)> {
        config.validate()?;

        let (tx, rx) = mpsc::channel(config.engine.event_channel_capacity);

        let engine = Self {
            resolver,
            provider,
            record_name: config.record.name,
            interval: Duration::from_secs(config.engine.interval_secs),
            event_tx: tx,
        };

        Ok((engine, rx))
    }

    /// Run the engine
    ///
    /// Runs one tick immediately, then one per interval, until a
    /// shutdown signal (SIGINT) is received.
    pub async fn run(&self) -> Result<()> {
        self.run_internal(None).await
    }

    /// Internal run implementation that accepts an optional shutdown signal
    async fn run_internal(
        &self,
        shutdown_rx: Option<tokio::sync::oneshot::Receiver<()>>,
    ) -> Result<()> {
        self.emit_event(ReconcilerEvent::Started {
            record_name: self.record_name.clone(),
        });
        info!(
            "Reconciling {} via {} every {}s",
            self.record_name,
            self.provider.provider_name(),
            self.interval.as_secs()
        );

        // The first tick() completes immediately; Delay keeps ticks
        // serialized when one runs longer than the interval.
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        if let Some(mut rx) = shutdown_rx {
            // Test mode: wait for provided shutdown signal
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let outcome = self.tick().await;
                        self.emit_event(ReconcilerEvent::TickCompleted(outcome));
                    }

                    _ = &mut rx => {
                        info!("Shutdown signal received");
                        self.emit_event(ReconcilerEvent::Stopped {
                            reason: "Shutdown signal".to_string(),
                        });
                        break;
                    }
                }
            }
        } else {
            // Production mode: wait for SIGINT
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let outcome = self.tick().await;
                        self.emit_event(ReconcilerEvent::TickCompleted(outcome));
                    }

                    _ = tokio::signal::ctrl_c() => {
                        info!("Shutdown signal received");
                        self.emit_event(ReconcilerEvent::Stopped {
                            reason: "Shutdown signal".to_string(),
                        });
                        break;
                    }
                }
            }
        }

        info!("Engine stopped");
        Ok(())
    }

    /// Run one reconciliation tick
    ///
    /// Infallible by design: every operation error is caught at its
    /// boundary, logged with operation context, and folded into the
    /// returned outcome.
    pub async fn tick(&self) -> TickOutcome {
        debug!("Checking public IP for {}", self.record_name);

        let ip = match self.resolver.resolve().await {
            Ok(ip) => ip,
            Err(e) => {
                error!("Failed to resolve public IP: {}", e);
                return TickOutcome::ResolveFailed {
                    error: e.to_string(),
                };
            }
        };

        let found = match self.provider.find_record(&self.record_name).await {
            Ok(found) => found,
            Err(e) => {
                error!("Failed to look up record {}: {}", self.record_name, e);
                return TickOutcome::LookupFailed {
                    error: e.to_string(),
                };
            }
        };

        match found {
            None => {
                info!(
                    "No record for {}, creating with IP {}",
                    self.record_name, ip
                );
                match self.provider.create_record(&self.record_name, &ip).await {
                    Ok(record) => {
                        info!("Created record {} -> {}", self.record_name, ip);
                        TickOutcome::Created {
                            record_id: record.id,
                            new_ip: ip,
                        }
                    }
                    Err(e) => {
                        error!("Failed to create record {}: {}", self.record_name, e);
                        TickOutcome::MutationFailed {
                            error: e.to_string(),
                        }
                    }
                }
            }

            Some(record) if record.matches(&ip) => {
                info!("IP unchanged ({}), nothing to do", ip);
                TickOutcome::Unchanged { current: ip }
            }

            Some(record) => {
                info!(
                    "IP changed from {} to {}, updating record {}",
                    record.content, ip, record.id
                );
                match self
                    .provider
                    .update_record(&record.id, &self.record_name, &ip)
                    .await
                {
                    Ok(_) => {
                        info!("Updated record {} -> {}", self.record_name, ip);
                        TickOutcome::Updated {
                            record_id: record.id,
                            previous: record.content,
                            new_ip: ip,
                        }
                    }
                    Err(e) => {
                        error!("Failed to update record {}: {}", self.record_name, e);
                        TickOutcome::MutationFailed {
                            error: e.to_string(),
                        }
                    }
                }
            }
        }
    }

    /// Emit an engine event
    fn emit_event(&self, event: ReconcilerEvent) {
        // Events are observability, not control flow: when the channel is
        // full the event is dropped rather than blocking the tick.
        if self.event_tx.try_send(event).is_err() {
            warn!("Event channel full, dropping event. Consider increasing event_channel_capacity.");
        }
    }

    /// Test-only helper to run the engine with a controlled shutdown signal
    ///
    /// **TESTING ONLY**: contract tests require deterministic shutdown.
    /// Production code should use `run()`, which manages shutdown via
    /// OS signals.
    pub async fn run_with_shutdown(
        &self,
        shutdown_rx: Option<tokio::sync::oneshot::Receiver<()>>,
    ) -> Result<()> {
        self.run_internal(shutdown_rx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_equality_distinguishes_variants() {
        let unchanged = TickOutcome::Unchanged {
            current: PublicIp::new("203.0.113.9"),
        };
        let created = TickOutcome::Created {
            record_id: "abc".to_string(),
            new_ip: PublicIp::new("203.0.113.9"),
        };

        assert_eq!(unchanged.clone(), unchanged);
        assert_ne!(unchanged, created);
    }

    #[test]
    fn record_match_is_string_equality() {
        let record = crate::DnsRecord {
            id: "abc".to_string(),
            name: "home.example.com".to_string(),
            record_type: "A".to_string(),
            content: "203.0.113.9".to_string(),
            ttl: 120,
            proxied: false,
        };

        assert!(record.matches(&PublicIp::new("203.0.113.9")));
        assert!(!record.matches(&PublicIp::new("203.0.113.5")));
    }
}
