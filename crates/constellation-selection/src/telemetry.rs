//! Prometheus metrics for selection runs

use prometheus::{Histogram, HistogramOpts, IntCounter, Registry};
use std::time::Duration;

use crate::selection::SelectionReport;

/// Prometheus metrics for the selection engine
#[derive(Clone)]
pub struct SelectionMetrics {
    pub selections_total: IntCounter,
    pub candidates_generated: IntCounter,
    pub stars_blocked: IntCounter,
    pub candidates_admitted: IntCounter,
    pub candidates_capped: IntCounter,
    pub selection_duration_seconds: Histogram,
}

impl SelectionMetrics {
    pub fn new() -> prometheus::Result<Self> {
        Ok(Self {
            selections_total: IntCounter::new(
                "constellation_selections_total",
                "Total selection runs",
            )?,
            candidates_generated: IntCounter::new(
                "constellation_candidates_generated_total",
                "Candidates generated before admission",
            )?,
            stars_blocked: IntCounter::new(
                "constellation_stars_blocked_total",
                "Stars excluded by an active blocker",
            )?,
            candidates_admitted: IntCounter::new(
                "constellation_candidates_admitted_total",
                "Candidates admitted by the selector",
            )?,
            candidates_capped: IntCounter::new(
                "constellation_candidates_capped_total",
                "Candidates turned away by a cap",
            )?,
            selection_duration_seconds: Histogram::with_opts(
                HistogramOpts::new(
                    "constellation_selection_duration_seconds",
                    "Selection run duration",
                )
                .buckets(vec![0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05]),
            )?,
        })
    }

    pub fn register(&self, registry: &Registry) -> prometheus::Result<()> {
        registry.register(Box::new(self.selections_total.clone()))?;
        registry.register(Box::new(self.candidates_generated.clone()))?;
        registry.register(Box::new(self.stars_blocked.clone()))?;
        registry.register(Box::new(self.candidates_admitted.clone()))?;
        registry.register(Box::new(self.candidates_capped.clone()))?;
        registry.register(Box::new(self.selection_duration_seconds.clone()))?;
        Ok(())
    }

    /// Record one finished run
    pub fn observe(&self, report: &SelectionReport, elapsed: Duration) {
        self.selections_total.inc();
        self.candidates_generated.inc_by(report.generated as u64);
        self.stars_blocked.inc_by(report.blocked.len() as u64);
        self.candidates_admitted.inc_by(report.admitted.len() as u64);
        self.candidates_capped.inc_by(report.capped.len() as u64);
        self.selection_duration_seconds.observe(elapsed.as_secs_f64());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use constellation_common::StarId;

    #[test]
    fn test_observe_counts() {
        let metrics = SelectionMetrics::new().unwrap();
        let report = SelectionReport {
            blocked: vec![StarId::from("wealth")],
            generated: 4,
            ..SelectionReport::default()
        };
        metrics.observe(&report, Duration::from_micros(80));

        assert_eq!(metrics.selections_total.get(), 1);
        assert_eq!(metrics.candidates_generated.get(), 4);
        assert_eq!(metrics.stars_blocked.get(), 1);
        assert_eq!(metrics.candidates_admitted.get(), 0);
        assert_eq!(metrics.selection_duration_seconds.get_sample_count(), 1);
    }

    #[test]
    fn test_register_once() {
        let registry = Registry::new();
        let metrics = SelectionMetrics::new().unwrap();
        assert!(metrics.register(&registry).is_ok());
        // Same names cannot be registered twice
        assert!(metrics.register(&registry).is_err());
        assert_eq!(registry.gather().len(), 6);
    }
}
