//! Prometheus metrics for pipeline outcomes, retry contention, and
//! webhook throughput. Registered against the process-wide default
//! registry so `server-framework`'s `/metrics` endpoint picks them up
//! without any wiring at the call site.

use once_cell::sync::Lazy;
use prometheus::{register_int_counter_vec, register_histogram_vec, HistogramVec, IntCounterVec};

/// Count of pipeline invocations, labeled by pipeline name and outcome
/// (`ok` or the `BoomsError::code()` of the failure).
pub static PIPELINE_OUTCOMES: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "booms_pipeline_outcomes_total",
        "Pipeline invocations by pipeline name and outcome",
        &["pipeline", "outcome"]
    )
    .expect("metric registration cannot fail at startup")
});

/// How long a pipeline's transactional body took, labeled by pipeline
/// name. Retried attempts are recorded individually.
pub static PIPELINE_DURATION_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "booms_pipeline_duration_seconds",
        "Pipeline transactional body duration in seconds",
        &["pipeline"]
    )
    .expect("metric registration cannot fail at startup")
});

/// Count of deadlock/serialization retries, labeled by pipeline name.
pub static DEADLOCK_RETRIES: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "booms_deadlock_retries_total",
        "Transactional retries triggered by a serialization failure",
        &["pipeline"]
    )
    .expect("metric registration cannot fail at startup")
});

/// Count of reconciled provider webhooks, labeled by provider and
/// `ReconcileOutcome` variant name.
pub static WEBHOOK_RECONCILIATIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "booms_webhook_reconciliations_total",
        "Reconciled provider webhooks by provider and outcome",
        &["provider", "outcome"]
    )
    .expect("metric registration cannot fail at startup")
});

pub fn record_pipeline_outcome(pipeline: &str, outcome: &str) {
    PIPELINE_OUTCOMES.with_label_values(&[pipeline, outcome]).inc();
}

pub fn record_deadlock_retry(pipeline: &str) {
    DEADLOCK_RETRIES.with_label_values(&[pipeline]).inc();
}

pub fn record_webhook_reconciliation(provider: &str, outcome: &str) {
    WEBHOOK_RECONCILIATIONS.with_label_values(&[provider, outcome]).inc();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_increment() {
        let before = PIPELINE_OUTCOMES.with_label_values(&["purchase", "ok"]).get();
        record_pipeline_outcome("purchase", "ok");
        let after = PIPELINE_OUTCOMES.with_label_values(&["purchase", "ok"]).get();
        assert_eq!(after, before + 1);
    }
}
