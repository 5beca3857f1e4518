//! Severity buckets for visual triage of call timings
//!
//! A left-to-right threshold ladder, first match wins. Classification is
//! total: zero, negative and tiny magnitudes fall to [`Severity::Fastest`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Qualitative speed class of a call
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Severity {
    Fastest,
    Fast,
    Medium,
    Slow,
    VerySlow,
}

impl Severity {
    /// Stable kebab-case label, also used as a CSS class suffix
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Fastest => "fastest",
            Severity::Fast => "fast",
            Severity::Medium => "medium",
            Severity::Slow => "slow",
            Severity::VerySlow => "very-slow",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which ladder of cutoffs to classify against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketSet {
    /// Milliseconds
    Duration,
    /// Share of the reference duration, in percent
    Percentage,
}

impl BucketSet {
    /// Lower bounds (exclusive) from most to least severe
    fn ladder(&self) -> [(f64, Severity); 4] {
        match self {
            BucketSet::Duration => [
                (1000.0, Severity::VerySlow),
                (500.0, Severity::Slow),
                (150.0, Severity::Medium),
                (40.0, Severity::Fast),
            ],
            BucketSet::Percentage => [
                (75.0, Severity::VerySlow),
                (50.0, Severity::Slow),
                (25.0, Severity::Medium),
                (10.0, Severity::Fast),
            ],
        }
    }
}

/// Map a magnitude into one of the five buckets
pub fn classify(magnitude: f64, buckets: BucketSet) -> Severity {
    buckets
        .ladder()
        .iter()
        .find(|(cutoff, _)| magnitude > *cutoff)
        .map(|(_, severity)| *severity)
        .unwrap_or(Severity::Fastest)
}
