//! Telemetry helpers for applications embedding `geochart-rs`.
//!
//! Cache transitions and draw passes emit `tracing` events; nothing is
//! logged unless the host installs a subscriber. Hosts with their own
//! telemetry stack should wire `tracing` directly and ignore this module.

/// Installs a compact stdout subscriber honoring `RUST_LOG`, falling back
/// to the given filter directive. Only available with the `telemetry`
/// feature; returns `false` when the feature is off or a global subscriber
/// already exists.
#[must_use]
pub fn try_init_tracing(fallback_filter: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback_filter));
        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = fallback_filter;
        false
    }
}

/// `try_init_tracing` with an info-level default for this crate.
#[must_use]
pub fn init_default_tracing() -> bool {
    try_init_tracing("geochart_rs=info")
}
