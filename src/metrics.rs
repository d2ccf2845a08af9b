//! Join compiler observability.
//!
//! With the `metrics` feature, [`METRICS`] counts emitted joins, reused joins
//! and failed path resolutions on the global OpenTelemetry meter. With the
//! `tracing` feature, [`tracing_helpers`] provides the span entered for each
//! path resolution.

#[cfg(feature = "metrics")]
use once_cell::sync::Lazy;
#[cfg(feature = "metrics")]
use opentelemetry::{global, metrics::Counter};

#[cfg(feature = "metrics")]
pub static METRICS: Lazy<JoinMetrics> = Lazy::new(JoinMetrics::init);

#[cfg(feature = "metrics")]
pub struct JoinMetrics {
    pub joins_emitted: Counter<u64>,
    pub joins_reused: Counter<u64>,
    pub resolve_errors: Counter<u64>,
}

#[cfg(feature = "metrics")]
impl JoinMetrics {
    pub fn init() -> Self {
        let meter = global::meter("lifeguard_join");

        let joins_emitted = meter
            .u64_counter("lifeguard_join_joins_emitted_total")
            .with_description("LEFT JOINs added to queries")
            .build();

        let joins_reused = meter
            .u64_counter("lifeguard_join_joins_reused_total")
            .with_description("Relation segments served by an existing join")
            .build();

        let resolve_errors = meter
            .u64_counter("lifeguard_join_resolve_errors_total")
            .with_description("Relation paths that failed to resolve")
            .build();

        Self {
            joins_emitted,
            joins_reused,
            resolve_errors,
        }
    }

    pub fn record_emitted(&self) {
        self.joins_emitted.add(1, &[]);
    }

    pub fn record_reused(&self, count: u64) {
        if count > 0 {
            self.joins_reused.add(count, &[]);
        }
    }

    pub fn record_error(&self) {
        self.resolve_errors.add(1, &[]);
    }
}

#[cfg(feature = "tracing")]
pub mod tracing_helpers {
    use tracing::Span;

    /// Span covering the resolution of one relation path.
    pub fn resolve_path_span(path: &str) -> Span {
        tracing::debug_span!("lifeguard_join.resolve_path", path = %path)
    }
}
