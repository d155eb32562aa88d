pub mod error;
mod server;
mod traits;

pub use self::{error::Error, server::start_metrics_server, traits::Metrics};

/// Metrics source backed by a dedicated Prometheus registry.
#[derive(Clone, Debug)]
pub struct DefaultMetrics {
    registry: prometheus::Registry,
}

impl DefaultMetrics {
    /// # Errors
    ///
    /// Returns an error when a collector cannot be registered.
    #[allow(clippy::unnecessary_wraps)]
    pub fn new() -> Result<Self, Error> {
        let registry = prometheus::Registry::new();

        Ok(Self { registry })
    }

    #[must_use]
    pub const fn registry(&self) -> &prometheus::Registry { &self.registry }
}

impl Metrics for DefaultMetrics {
    fn gather(&self) -> Vec<prometheus::proto::MetricFamily> { self.registry.gather() }
}

#[cfg(test)]
mod tests {
    use crate::DefaultMetrics;

    #[test]
    fn test_new() { drop(DefaultMetrics::new().unwrap()); }

    #[test]
    fn fresh_registry_gathers_nothing() {
        use crate::Metrics;

        let metrics = DefaultMetrics::new().unwrap();
        assert!(metrics.gather().is_empty());
    }
}
