//! Process-wide query counter and throughput sampling. One relaxed atomic
//! increment per request; QPS is recomputed periodically from the delta by a
//! background task, never on the query path.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub const QPS_SAMPLE_INTERVAL: Duration = Duration::from_secs(10);

#[derive(Debug, Default)]
pub struct QueryMetrics {
    total: AtomicU64,
    sampled_total: AtomicU64,
    qps_bits: AtomicU64,
}

impl QueryMetrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    #[inline]
    pub fn record_query(&self) {
        self.total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }

    pub fn qps(&self) -> f64 {
        f64::from_bits(self.qps_bits.load(Ordering::Relaxed))
    }

    /// Recompute QPS from the counter delta over one interval.
    pub fn sample(&self, interval: Duration) {
        let total = self.total.load(Ordering::Relaxed);
        let previous = self.sampled_total.swap(total, Ordering::Relaxed);
        let qps = (total.saturating_sub(previous)) as f64 / interval.as_secs_f64();
        self.qps_bits.store(qps.to_bits(), Ordering::Relaxed);
        debug!(total = total, qps = qps, "Sampled query throughput");
    }

    pub fn spawn_sampler(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let metrics = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(QPS_SAMPLE_INTERVAL);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                metrics.sample(QPS_SAMPLE_INTERVAL);
            }
        })
    }
}
