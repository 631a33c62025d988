//! The event-consumption loop.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Notify;
use tracing::{debug, info, warn};

use vigil_alerts::AlertSink;
use vigil_queue::{parse_event, EventSource};
use vigil_rules::{evaluate, Rule, RuleError, RuleRepository};

/// Cap on the exponential backoff applied after event source errors.
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Engine tuning knobs.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Pause between polls when the event feed is empty.
    pub poll_interval: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
        }
    }
}

/// Running totals, logged when the loop exits.
#[derive(Debug, Default)]
struct Totals {
    received: u64,
    malformed: u64,
    matched: u64,
    recorded: u64,
    write_failures: u64,
}

/// The alert engine: one logical worker over an immutable rule snapshot.
///
/// Exactly one event is in flight at a time — matching and recording for an
/// event fully complete before the next pop. Events are processed in feed
/// order with no batching or reordering. Because the pop is destructive and
/// not transactional with the alert write, a crash between the two loses
/// that event (at-most-once from the engine's perspective).
pub struct Engine {
    rules: Vec<Rule>,
    source: Arc<dyn EventSource>,
    sink: Arc<dyn AlertSink>,
    config: EngineConfig,
    shutdown: Arc<Notify>,
}

impl Engine {
    /// Load the rule snapshot and build the engine.
    ///
    /// This is the STARTING phase: a repository failure here is fatal —
    /// the engine must not run with an empty-because-broken rule set.
    pub async fn start(
        repository: &dyn RuleRepository,
        source: Arc<dyn EventSource>,
        sink: Arc<dyn AlertSink>,
        config: EngineConfig,
    ) -> Result<Self, RuleError> {
        let rules = repository.load_active_rules().await?;
        if rules.is_empty() {
            warn!("no enabled rules — events will be consumed without producing alerts");
        }

        Ok(Self {
            rules,
            source,
            sink,
            config,
            shutdown: Arc::new(Notify::new()),
        })
    }

    /// Handle used to stop the loop; checked once per cycle.
    pub fn shutdown_handle(&self) -> Arc<Notify> {
        self.shutdown.clone()
    }

    /// The rule snapshot this engine evaluates.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Run the cycle until shutdown is signalled.
    ///
    /// No error from event processing terminates the loop: malformed
    /// payloads are dropped, sink failures are per-alert, and source errors
    /// back off and retry.
    pub async fn run(self) {
        info!(
            rules = self.rules.len(),
            poll_interval_ms = self.config.poll_interval.as_millis() as u64,
            "engine running, waiting for events"
        );

        let mut totals = Totals::default();
        let mut consecutive_errors: u32 = 0;

        loop {
            tokio::select! {
                _ = self.shutdown.notified() => {
                    break;
                }
                result = self.source.pop() => match result {
                    Ok(Some(payload)) => {
                        consecutive_errors = 0;
                        totals.received += 1;
                        self.process_payload(&payload, &mut totals).await;
                    }
                    Ok(None) => {
                        consecutive_errors = 0;
                        tokio::time::sleep(self.config.poll_interval).await;
                    }
                    Err(e) => {
                        consecutive_errors += 1;
                        let backoff = self
                            .config
                            .poll_interval
                            .saturating_mul(2u32.pow(consecutive_errors.min(5)))
                            .min(MAX_BACKOFF);
                        warn!(
                            error = %e,
                            consecutive_errors,
                            backoff_ms = backoff.as_millis() as u64,
                            "event source error, backing off"
                        );
                        tokio::time::sleep(backoff).await;
                    }
                }
            }
        }

        info!(
            received = totals.received,
            malformed = totals.malformed,
            matched = totals.matched,
            recorded = totals.recorded,
            write_failures = totals.write_failures,
            "engine stopped"
        );
    }

    /// Decode one payload, match it, and record the resulting alerts.
    async fn process_payload(&self, payload: &str, totals: &mut Totals) {
        // Decode failures are permanently malformed: dropped, never requeued.
        let event = match parse_event(payload) {
            Ok(event) => event,
            Err(e) => {
                totals.malformed += 1;
                warn!(error = %e, payload, "dropping malformed event");
                return;
            }
        };

        let drafts = evaluate(&event, &self.rules, Utc::now());
        if drafts.is_empty() {
            debug!("event matched no rules");
            return;
        }
        totals.matched += drafts.len() as u64;

        // One failed write must not block the remaining drafts.
        for draft in drafts {
            let rule_name = draft.rule_name.clone();
            match self.sink.record(draft).await {
                Ok(alert) => {
                    totals.recorded += 1;
                    info!(
                        alert_id = %alert.id,
                        rule = %alert.rule_name,
                        severity = %alert.severity,
                        "alert created"
                    );
                }
                Err(e) => {
                    totals.write_failures += 1;
                    warn!(rule = %rule_name, error = %e, "failed to record alert");
                }
            }
        }
    }
}
