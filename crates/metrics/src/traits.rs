/// Source of metric families for the exposition endpoint.
pub trait Metrics: Clone + Send + Sync + 'static {
    fn gather(&self) -> Vec<prometheus::proto::MetricFamily>;
}
