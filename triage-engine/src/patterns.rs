//! Problem pattern matching
//!
//! Patterns are registered through a mutable `PatternTable`, validated on
//! insert, then composed into an immutable `PatternMatcher` snapshot that the
//! pipeline reads lock-free. Registration order is preserved because it
//! breaks score ties: the first registered pattern wins.

use std::collections::BTreeSet;
use std::sync::Arc;
use triage_core::{PatternError, ProblemPattern, TriageError, TriageResult};

/// Builder for the pattern set.
#[derive(Debug, Clone, Default)]
pub struct PatternTable {
    patterns: Vec<ProblemPattern>,
}

impl PatternTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pattern, validating it and rejecting duplicate names.
    pub fn register(&mut self, pattern: ProblemPattern) -> TriageResult<()> {
        pattern.validate().map_err(TriageError::Validation)?;
        if self.patterns.iter().any(|p| p.name == pattern.name) {
            return Err(TriageError::Pattern(PatternError::DuplicatePattern {
                name: pattern.name,
            }));
        }
        tracing::debug!(pattern = %pattern.name, category = %pattern.category, "pattern registered");
        self.patterns.push(pattern);
        Ok(())
    }

    /// Number of registered patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Check whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Compose the current table into an immutable matcher snapshot.
    pub fn matcher(&self, min_score: f32) -> PatternMatcher {
        PatternMatcher {
            patterns: self.patterns.clone().into(),
            min_score,
        }
    }
}

/// A matched pattern with its containment score.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternMatch<'a> {
    pub pattern: &'a ProblemPattern,
    /// Fraction of the pattern's keywords present in the ticket, in (0, 1]
    pub score: f32,
}

/// Immutable pattern matcher over a composed table.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    patterns: Arc<[ProblemPattern]>,
    min_score: f32,
}

impl PatternMatcher {
    /// Find the best-scoring pattern at or above the minimum score.
    ///
    /// Score is the fraction of a pattern's keywords present in the ticket
    /// keyword set. Ties keep the earlier registered pattern.
    pub fn best_match(&self, keywords: &BTreeSet<String>) -> Option<PatternMatch<'_>> {
        let mut best: Option<PatternMatch<'_>> = None;
        for pattern in self.patterns.iter() {
            let present = pattern
                .keywords
                .iter()
                .filter(|k| keywords.contains(*k))
                .count();
            let score = present as f32 / pattern.keywords.len() as f32;
            if score < self.min_score {
                continue;
            }
            // strictly-greater keeps the first registered pattern on ties
            let better = match &best {
                Some(b) => score > b.score,
                None => true,
            };
            if better {
                best = Some(PatternMatch { pattern, score });
            }
        }

        if let Some(m) = &best {
            tracing::debug!(pattern = %m.pattern.name, score = m.score, "pattern matched");
        }
        best
    }

    /// Number of patterns in this snapshot.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Check whether the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use triage_core::{Priority, RoutingDecision};

    fn keywords(words: &[&str]) -> BTreeSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn payment_pattern() -> ProblemPattern {
        ProblemPattern::new("payment_failure", "billing")
            .with_keyword("payment")
            .with_keyword("card")
            .with_keyword("declined")
            .with_keyword("charge")
            .with_default_priority(Priority::Medium)
    }

    fn reset_pattern() -> ProblemPattern {
        ProblemPattern::new("password_reset", "account")
            .with_keyword("password")
            .with_keyword("reset")
            .with_default_routing(RoutingDecision::BotAutomation)
            .with_expected_resolution_minutes(5)
    }

    #[test]
    fn test_register_rejects_duplicate_name() {
        let mut table = PatternTable::new();
        table.register(payment_pattern()).unwrap();
        let err = table.register(payment_pattern()).unwrap_err();
        assert!(matches!(
            err,
            TriageError::Pattern(PatternError::DuplicatePattern { .. })
        ));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_register_rejects_invalid_pattern() {
        let mut table = PatternTable::new();
        let err = table
            .register(ProblemPattern::new("empty", "misc"))
            .unwrap_err();
        assert!(matches!(err, TriageError::Validation(_)));
    }

    #[test]
    fn test_best_match_scores_fraction() {
        let mut table = PatternTable::new();
        table.register(payment_pattern()).unwrap();
        let matcher = table.matcher(0.3);

        let m = matcher
            .best_match(&keywords(&["card", "declined", "payment"]))
            .unwrap();
        assert_eq!(m.pattern.name, "payment_failure");
        assert!((m.score - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_best_match_below_minimum_is_none() {
        let mut table = PatternTable::new();
        table.register(payment_pattern()).unwrap();
        let matcher = table.matcher(0.5);

        // 1 of 4 keywords present: 0.25 < 0.5
        assert!(matcher.best_match(&keywords(&["card", "shipping"])).is_none());
    }

    #[test]
    fn test_best_match_no_keywords_is_none() {
        let mut table = PatternTable::new();
        table.register(payment_pattern()).unwrap();
        table.register(reset_pattern()).unwrap();
        let matcher = table.matcher(0.3);

        assert!(matcher.best_match(&keywords(&["shipping", "delayed"])).is_none());
    }

    #[test]
    fn test_best_match_highest_score_wins() {
        let mut table = PatternTable::new();
        table.register(payment_pattern()).unwrap();
        table.register(reset_pattern()).unwrap();
        let matcher = table.matcher(0.3);

        let m = matcher
            .best_match(&keywords(&["password", "reset", "card"]))
            .unwrap();
        // password_reset scores 1.0, payment_failure 0.25
        assert_eq!(m.pattern.name, "password_reset");
        assert_eq!(m.score, 1.0);
    }

    #[test]
    fn test_tie_keeps_first_registered() {
        let first = ProblemPattern::new("first", "a")
            .with_keyword("shared")
            .with_keyword("alpha");
        let second = ProblemPattern::new("second", "b")
            .with_keyword("shared")
            .with_keyword("beta");

        let mut table = PatternTable::new();
        table.register(first).unwrap();
        table.register(second).unwrap();
        let matcher = table.matcher(0.3);

        // both score 0.5 on "shared"
        let m = matcher.best_match(&keywords(&["shared"])).unwrap();
        assert_eq!(m.pattern.name, "first");
    }

    #[test]
    fn test_matcher_snapshot_is_independent() {
        let mut table = PatternTable::new();
        table.register(payment_pattern()).unwrap();
        let matcher = table.matcher(0.3);

        table.register(reset_pattern()).unwrap();
        // the earlier snapshot does not see the later registration
        assert_eq!(matcher.len(), 1);
        assert_eq!(table.len(), 2);
    }
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_match_score_in_unit_range(
            pattern_words in proptest::collection::btree_set("[a-z]{3,8}", 1..6),
            ticket_words in proptest::collection::btree_set("[a-z]{3,8}", 0..12),
        ) {
            let mut pattern = ProblemPattern::new("p", "c");
            for w in &pattern_words {
                pattern = pattern.with_keyword(w.clone());
            }
            let mut table = PatternTable::new();
            table.register(pattern).unwrap();
            let matcher = table.matcher(0.0001);

            if let Some(m) = matcher.best_match(&ticket_words) {
                prop_assert!(m.score > 0.0);
                prop_assert!(m.score <= 1.0);
            }
        }
    }
}
