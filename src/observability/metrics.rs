use prometheus::{
    HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

// Declare the static OnceCell to hold the Metrics.
static METRICS_INSTANCE: OnceCell<Arc<Metrics>> = OnceCell::const_new();

/// Asynchronously initializes and gets a reference to the process-wide `Metrics`.
pub async fn get_metrics() -> &'static Arc<Metrics> {
    METRICS_INSTANCE
        .get_or_init(|| async {
            info!("Initializing Metrics ...");
            Metrics::new()
        })
        .await
}

pub const OUTCOME_ISSUED: &str = "issued";
pub const RESULT_VALID: &str = "valid";
pub const RESULT_INVALID: &str = "invalid";

pub struct Metrics {
    pub registry: Registry,

    // Grant metrics
    pub token_requests: IntCounterVec,
    pub tokens_issued: IntCounter,

    // Validation metrics
    pub token_validations: IntCounterVec,

    // Store metrics
    pub active_tokens: IntGauge,
    pub expired_tokens_purged: IntCounter,

    // HTTP
    pub request_duration: HistogramVec,

    // Config/runtime
    pub config_validation_errors: IntCounter,
    pub up: IntGauge,
}

impl Metrics {
    fn new() -> Arc<Self> {
        let registry = Registry::new_custom(Some("oauthtokenserver".into()), None)
            .expect("valid registry prefix");

        let metrics: Arc<Metrics> = Arc::new(Self {
            // Grant
            token_requests: IntCounterVec::new(Opts::new("token_requests_total", "Token requests by outcome"), &["outcome"]).expect("metric"),
            tokens_issued: IntCounter::new("tokens_issued_total", "Access tokens issued").expect("metric"),

            // Validation
            token_validations: IntCounterVec::new(Opts::new("token_validations_total", "Token validations by result"), &["result"]).expect("metric"),

            // Store
            active_tokens: IntGauge::new("active_tokens", "Tokens held in the store, expired ones until purged").expect("metric"),
            expired_tokens_purged: IntCounter::new("expired_tokens_purged_total", "Expired tokens removed by cleanup").expect("metric"),

            // HTTP
            request_duration: HistogramVec::new(HistogramOpts::new("request_duration_seconds", "Request handling time").buckets(vec![0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.5]), &["endpoint"]).expect("metric"),

            // Config/runtime
            config_validation_errors: IntCounter::new("config_validation_errors_total", "Validation errors during startup").expect("metric"),
            up: IntGauge::new("up", "1 if service is healthy").expect("metric"),

            registry,
        });

        // Register all metrics in the registry
        let reg = &metrics.registry;
        let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
            Box::new(metrics.token_requests.clone()),
            Box::new(metrics.tokens_issued.clone()),
            Box::new(metrics.token_validations.clone()),
            Box::new(metrics.active_tokens.clone()),
            Box::new(metrics.expired_tokens_purged.clone()),
            Box::new(metrics.request_duration.clone()),
            Box::new(metrics.config_validation_errors.clone()),
            Box::new(metrics.up.clone()),
        ];
        for collector in collectors {
            reg.register(collector).expect("metric registered once");
        }

        metrics
    }
}
