//! Share of a root call's time spent in a descendant
//!
//! The reference duration is the duration of the root call whose subtree is
//! being explored. It is fixed when the root is first expanded and threaded
//! unchanged through every nested expansion, so a grandchild reports its share
//! of the root's time, not of its direct caller's.

use crate::duration::DurationValue;
use crate::severity::{classify, BucketSet, Severity};
use serde::Serialize;
use std::fmt;

/// Placeholder displayed when no percentage can be computed
pub const NO_PERCENT: &str = "-";

/// A computed percentage with its severity bucket
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PercentShare {
    pub value: f64,
    pub severity: Severity,
}

impl fmt::Display for PercentShare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%", self.value)
    }
}

/// `round(d / reference * 1000) / 10`, or `None` for a non-positive reference
pub fn percent_of(duration: &DurationValue, reference: &DurationValue) -> Option<f64> {
    let reference = reference.magnitude();
    if reference <= 0.0 {
        return None;
    }
    // Half-up rounding, matching what the existing displays show
    let scaled = duration.magnitude() / reference * 1000.0;
    Some((scaled + 0.5).floor() / 10.0)
}

/// Percentage plus its bucket on the percentage ladder
pub fn share_of(duration: &DurationValue, reference: &DurationValue) -> Option<PercentShare> {
    percent_of(duration, reference).map(|value| PercentShare {
        value,
        severity: classify(value, BucketSet::Percentage),
    })
}

/// Render an optional share for display
pub fn display_share(share: Option<&PercentShare>) -> String {
    share
        .map(|s| s.to_string())
        .unwrap_or_else(|| NO_PERCENT.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(text: &str) -> DurationValue {
        DurationValue::parse(text).unwrap()
    }

    #[test]
    fn test_quarter_share() {
        assert_eq!(percent_of(&ms("250ms"), &ms("1000ms")), Some(25.0));
        assert_eq!(percent_of(&ms("300ms"), &ms("1200ms")), Some(25.0));
    }

    #[test]
    fn test_one_decimal_rounding() {
        assert_eq!(percent_of(&ms("1ms"), &ms("3ms")), Some(33.3));
        assert_eq!(percent_of(&ms("2ms"), &ms("3ms")), Some(66.7));
        // 6.25% rounds half up
        assert_eq!(percent_of(&ms("1ms"), &ms("16ms")), Some(6.3));
    }

    #[test]
    fn test_zero_reference_is_none() {
        assert_eq!(percent_of(&ms("10ms"), &ms("0ms")), None);
        assert_eq!(percent_of(&ms("10ms"), &ms("-4ms")), None);
        assert_eq!(share_of(&ms("10ms"), &ms("0ms")), None);
    }

    #[test]
    fn test_share_bucket_uses_percentage_ladder() {
        let share = share_of(&ms("300ms"), &ms("1200ms")).unwrap();
        assert_eq!(share.value, 25.0);
        assert_eq!(share.severity, Severity::Fast);
        assert_eq!(share.to_string(), "25.0%");
    }

    #[test]
    fn test_display_share_placeholder() {
        assert_eq!(display_share(None), "-");
        let share = share_of(&ms("900ms"), &ms("1000ms")).unwrap();
        assert_eq!(display_share(Some(&share)), "90.0%");
    }
}
