//! Cluster detection over an appliance's toggle history.
//!
//! The heuristic is deliberately cheap: the median of the logged minutes is
//! the candidate time, and the min-to-max range is the dispersion measure.
//! Median resists outliers better than the mean, and for a buffer of
//! fourteen samples a full variance computation buys nothing a range test
//! does not.
//!
//! Minutes are compared linearly — a habit spanning midnight (23:50 one
//! day, 00:10 the next) shows up as a ~1420-minute spread and is never
//! suggested. Known limitation, pinned by a test below.

use super::event_log::EventLog;
use super::ApplianceId;
use crate::config::SystemConfig;

/// An inferred recurring-use time the node proposes to automate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Suggestion {
    pub appliance: ApplianceId,
    /// Suggested minute-of-day (`0..1440`).
    pub minute: u16,
}

/// Decides whether a log's samples form a stable daily habit.
#[derive(Debug, Clone, Copy)]
pub struct PatternEvaluator {
    min_samples: u8,
    cluster_threshold_min: u16,
}

impl PatternEvaluator {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            min_samples: config.min_samples,
            cluster_threshold_min: config.cluster_threshold_min,
        }
    }

    /// Evaluate a log. Pure function of the log contents: no mutation,
    /// re-evaluating an unchanged log returns the same answer.
    ///
    /// Returns `None` when there is not enough evidence or the samples are
    /// too scattered — the expected outcome, not an error.
    pub fn evaluate(&self, appliance: ApplianceId, log: &EventLog) -> Option<Suggestion> {
        if log.len() < usize::from(self.min_samples) {
            return None;
        }

        let mut sorted = log.snapshot();
        sorted.sort_unstable();

        let n = sorted.len();
        let median = if n % 2 == 1 {
            sorted[n / 2]
        } else {
            // Floor-averaged integer mean of the two central elements.
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2
        };

        let range = sorted[n - 1] - sorted[0];
        if range < self.cluster_threshold_min {
            Some(Suggestion {
                appliance,
                minute: median,
            })
        } else {
            None
        }
    }
}
