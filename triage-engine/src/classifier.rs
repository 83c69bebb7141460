//! Priority classification
//!
//! Blends extracted signals into a severity score, maps it onto the
//! configured priority bands, then applies the customer tier boost and the
//! pattern-declared severity floor. Priority only ever moves toward
//! Critical; no step of the pipeline lowers it.

use triage_core::{ClassifierConfig, CustomerTier, Priority, SignalScores, TriageConfig};

/// Classifies tickets into priority bands from signal scores.
#[derive(Debug, Clone)]
pub struct PriorityClassifier {
    config: ClassifierConfig,
}

impl PriorityClassifier {
    /// Build a classifier from a validated configuration.
    pub fn new(config: &TriageConfig) -> Self {
        Self {
            config: config.classifier.clone(),
        }
    }

    /// Weighted severity blend in [0, 1].
    ///
    /// Urgency is the primary driver; only the negative side of sentiment
    /// contributes.
    pub fn severity(&self, signals: &SignalScores) -> f32 {
        let c = &self.config;
        let weight_sum = c.urgency_weight + c.sentiment_weight + c.complexity_weight;
        let blended = c.urgency_weight * signals.urgency
            + c.sentiment_weight * (-signals.sentiment).max(0.0)
            + c.complexity_weight * signals.complexity;
        (blended / weight_sum).clamp(0.0, 1.0)
    }

    /// Classify a priority from signals, customer tier, and an optional
    /// pattern-declared floor.
    pub fn classify(
        &self,
        signals: &SignalScores,
        tier: CustomerTier,
        floor: Option<Priority>,
    ) -> Priority {
        let severity = self.severity(signals);
        let mut priority = self.band(severity);

        if tier.receives_priority_boost() {
            priority = priority.raised();
        }
        if let Some(floor) = floor {
            // max-severity policy: the stricter of band and floor wins
            priority = priority.max(floor);
        }

        tracing::debug!(severity, priority = %priority, tier = %tier, "priority classified");
        priority
    }

    fn band(&self, severity: f32) -> Priority {
        if severity >= self.config.critical_threshold {
            Priority::Critical
        } else if severity >= self.config.high_threshold {
            Priority::High
        } else if severity >= self.config.medium_threshold {
            Priority::Medium
        } else {
            Priority::Low
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn classifier() -> PriorityClassifier {
        PriorityClassifier::new(&triage_core::TriageConfig::default_config())
    }

    fn signals(sentiment: f32, urgency: f32, complexity: f32) -> SignalScores {
        SignalScores {
            sentiment,
            urgency,
            complexity,
            keywords: BTreeSet::new(),
        }
    }

    #[test]
    fn test_calm_low_signals_classify_low() {
        let priority = classifier().classify(&signals(0.5, 0.0, 0.1), CustomerTier::Standard, None);
        assert_eq!(priority, Priority::Low);
    }

    #[test]
    fn test_max_signals_classify_critical() {
        let priority =
            classifier().classify(&signals(-1.0, 1.0, 1.0), CustomerTier::Standard, None);
        assert_eq!(priority, Priority::Critical);
    }

    #[test]
    fn test_positive_sentiment_does_not_raise_severity() {
        let c = classifier();
        let neutral = c.severity(&signals(0.0, 0.5, 0.5));
        let positive = c.severity(&signals(1.0, 0.5, 0.5));
        assert_eq!(neutral, positive);
    }

    #[test]
    fn test_negative_sentiment_raises_severity() {
        let c = classifier();
        let neutral = c.severity(&signals(0.0, 0.5, 0.5));
        let negative = c.severity(&signals(-1.0, 0.5, 0.5));
        assert!(negative > neutral);
    }

    #[test]
    fn test_tier_boost_shifts_one_level() {
        let c = classifier();
        let scores = signals(0.0, 0.65, 0.3); // lands in High for standard
        let standard = c.classify(&scores, CustomerTier::Standard, None);
        let premium = c.classify(&scores, CustomerTier::Premium, None);
        assert_eq!(premium, standard.raised());
    }

    #[test]
    fn test_tier_boost_saturates_at_critical() {
        let c = classifier();
        let scores = signals(-1.0, 1.0, 1.0);
        let enterprise = c.classify(&scores, CustomerTier::Enterprise, None);
        assert_eq!(enterprise, Priority::Critical);
    }

    #[test]
    fn test_pattern_floor_raises() {
        let c = classifier();
        let scores = signals(0.2, 0.0, 0.1); // Low on its own
        let floored = c.classify(&scores, CustomerTier::Standard, Some(Priority::High));
        assert_eq!(floored, Priority::High);
    }

    #[test]
    fn test_pattern_floor_never_lowers() {
        let c = classifier();
        let scores = signals(-1.0, 1.0, 1.0); // Critical on its own
        let priority = c.classify(&scores, CustomerTier::Standard, Some(Priority::Low));
        assert_eq!(priority, Priority::Critical);
    }
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn signals(sentiment: f32, urgency: f32, complexity: f32) -> SignalScores {
        SignalScores {
            sentiment,
            urgency,
            complexity,
            keywords: BTreeSet::new(),
        }
    }

    proptest! {
        #[test]
        fn prop_severity_in_unit_range(
            sentiment in -1.0f32..=1.0,
            urgency in 0.0f32..=1.0,
            complexity in 0.0f32..=1.0,
        ) {
            let c = PriorityClassifier::new(&triage_core::TriageConfig::default_config());
            let severity = c.severity(&signals(sentiment, urgency, complexity));
            prop_assert!((0.0..=1.0).contains(&severity));
        }

        #[test]
        fn prop_priority_monotonic_in_urgency(
            sentiment in -1.0f32..=1.0,
            complexity in 0.0f32..=1.0,
            low in 0.0f32..=1.0,
            high in 0.0f32..=1.0,
        ) {
            prop_assume!(low <= high);
            let c = PriorityClassifier::new(&triage_core::TriageConfig::default_config());
            let lower = c.classify(&signals(sentiment, low, complexity), CustomerTier::Standard, None);
            let higher = c.classify(&signals(sentiment, high, complexity), CustomerTier::Standard, None);
            prop_assert!(lower <= higher);
        }

        #[test]
        fn prop_floor_is_lower_bound(
            urgency in 0.0f32..=1.0,
            floor_idx in 0usize..4,
        ) {
            let floors = [Priority::Low, Priority::Medium, Priority::High, Priority::Critical];
            let floor = floors[floor_idx];
            let c = PriorityClassifier::new(&triage_core::TriageConfig::default_config());
            let priority = c.classify(&signals(0.0, urgency, 0.0), CustomerTier::Standard, Some(floor));
            prop_assert!(priority >= floor);
        }
    }
}
