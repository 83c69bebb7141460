//! Configuration types
//!
//! All thresholds, weights, and lexicons for the decision pipeline live here.
//! Configuration is loadable from JSON and must pass `validate()` before any
//! ticket is processed; nothing in the engine re-checks these invariants.

use crate::{ConfigError, TriageError, TriageResult};
use serde::{Deserialize, Serialize};

/// Sentiment lexicon configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentConfig {
    /// Words counted as positive signal
    pub positive_words: Vec<String>,
    /// Words counted as negative signal
    pub negative_words: Vec<String>,
}

/// Urgency indicator tiers.
///
/// The highest tier with at least one match wins; additional matches push
/// the score up from the tier base in `per_hit_step` increments, clamped to
/// the tier band ceiling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrgencyConfig {
    pub high_indicators: Vec<String>,
    pub medium_indicators: Vec<String>,
    pub low_indicators: Vec<String>,
    /// Base score when a high indicator matches
    pub high_base: f32,
    /// Base score when a medium indicator matches
    pub medium_base: f32,
    /// Base score when a low indicator matches
    pub low_base: f32,
    /// Increment per additional match within a tier
    pub per_hit_step: f32,
}

/// Priority classifier weights and band thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    pub urgency_weight: f32,
    pub sentiment_weight: f32,
    pub complexity_weight: f32,
    /// Severity at or above this classifies Critical
    pub critical_threshold: f32,
    /// Severity at or above this classifies High
    pub high_threshold: f32,
    /// Severity at or above this classifies Medium; below is Low
    pub medium_threshold: f32,
}

/// Per-priority resolution time defaults and scaling bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionTimeConfig {
    pub critical_minutes: u32,
    pub high_minutes: u32,
    pub medium_minutes: u32,
    pub low_minutes: u32,
    /// Linear complexity scale factor applied to the base estimate
    pub complexity_scale: f32,
    pub floor_minutes: u32,
    pub ceiling_minutes: u32,
}

/// Routing engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Minimum pattern match score to count as a match at all
    pub min_match_score: f32,
    /// Match score at or above which a pattern's automation hint is honored
    pub automation_match_threshold: f32,
    /// Name of the escalation queue
    pub escalation_queue: String,
    /// Fixed confidence for critical-priority escalations
    pub critical_escalation_confidence: f32,
    pub resolution: ResolutionTimeConfig,
}

/// Master configuration struct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageConfig {
    pub sentiment: SentimentConfig,
    pub urgency: UrgencyConfig,
    pub classifier: ClassifierConfig,
    pub routing: RoutingConfig,
}

fn check_unit_range(field: &str, value: f32) -> TriageResult<()> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(TriageError::Config(ConfigError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "must be between 0.0 and 1.0".to_string(),
        }));
    }
    Ok(())
}

fn check_lexicon(field: &str, words: &[String]) -> TriageResult<()> {
    if words.is_empty() {
        return Err(TriageError::Config(ConfigError::EmptyLexicon {
            field: field.to_string(),
        }));
    }
    Ok(())
}

impl TriageConfig {
    /// Load a configuration from a JSON string.
    ///
    /// Parsing alone does not make the configuration usable; callers must
    /// still run `validate()`.
    pub fn from_json(json: &str) -> TriageResult<Self> {
        serde_json::from_str(json).map_err(|e| {
            TriageError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// Validate the configuration.
    ///
    /// Validates:
    /// - All lexicons and indicator tiers are non-empty
    /// - Urgency tier bases are in [0, 1] and strictly decreasing
    /// - Classifier weights are non-negative with a positive sum
    /// - Band thresholds are in (0, 1) and strictly decreasing
    /// - Routing thresholds are in [0, 1]; the escalation queue is named
    /// - Resolution times are positive with floor <= ceiling
    pub fn validate(&self) -> TriageResult<()> {
        check_lexicon("sentiment.positive_words", &self.sentiment.positive_words)?;
        check_lexicon("sentiment.negative_words", &self.sentiment.negative_words)?;
        check_lexicon("urgency.high_indicators", &self.urgency.high_indicators)?;
        check_lexicon("urgency.medium_indicators", &self.urgency.medium_indicators)?;
        check_lexicon("urgency.low_indicators", &self.urgency.low_indicators)?;

        check_unit_range("urgency.high_base", self.urgency.high_base)?;
        check_unit_range("urgency.medium_base", self.urgency.medium_base)?;
        check_unit_range("urgency.low_base", self.urgency.low_base)?;
        check_unit_range("urgency.per_hit_step", self.urgency.per_hit_step)?;

        if !(self.urgency.high_base > self.urgency.medium_base
            && self.urgency.medium_base > self.urgency.low_base)
        {
            return Err(TriageError::Config(ConfigError::NonMonotonic {
                field: "urgency".to_string(),
                reason: "tier bases must satisfy high > medium > low".to_string(),
            }));
        }

        for (field, weight) in [
            ("classifier.urgency_weight", self.classifier.urgency_weight),
            (
                "classifier.sentiment_weight",
                self.classifier.sentiment_weight,
            ),
            (
                "classifier.complexity_weight",
                self.classifier.complexity_weight,
            ),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(TriageError::Config(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: weight.to_string(),
                    reason: "must be a non-negative number".to_string(),
                }));
            }
        }
        let weight_sum = self.classifier.urgency_weight
            + self.classifier.sentiment_weight
            + self.classifier.complexity_weight;
        if weight_sum <= 0.0 {
            return Err(TriageError::Config(ConfigError::InvalidValue {
                field: "classifier".to_string(),
                value: weight_sum.to_string(),
                reason: "weights must sum to a positive value".to_string(),
            }));
        }

        check_unit_range(
            "classifier.critical_threshold",
            self.classifier.critical_threshold,
        )?;
        check_unit_range("classifier.high_threshold", self.classifier.high_threshold)?;
        check_unit_range(
            "classifier.medium_threshold",
            self.classifier.medium_threshold,
        )?;

        if !(self.classifier.critical_threshold > self.classifier.high_threshold
            && self.classifier.high_threshold > self.classifier.medium_threshold)
        {
            return Err(TriageError::Config(ConfigError::NonMonotonic {
                field: "classifier".to_string(),
                reason: "thresholds must satisfy critical > high > medium".to_string(),
            }));
        }

        check_unit_range("routing.min_match_score", self.routing.min_match_score)?;
        check_unit_range(
            "routing.automation_match_threshold",
            self.routing.automation_match_threshold,
        )?;
        check_unit_range(
            "routing.critical_escalation_confidence",
            self.routing.critical_escalation_confidence,
        )?;
        if self.routing.min_match_score <= 0.0 {
            return Err(TriageError::Config(ConfigError::InvalidValue {
                field: "routing.min_match_score".to_string(),
                value: self.routing.min_match_score.to_string(),
                reason: "must be greater than 0.0".to_string(),
            }));
        }
        if self.routing.escalation_queue.trim().is_empty() {
            return Err(TriageError::Config(ConfigError::MissingRequired {
                field: "routing.escalation_queue".to_string(),
            }));
        }

        let res = &self.routing.resolution;
        for (field, minutes) in [
            ("routing.resolution.critical_minutes", res.critical_minutes),
            ("routing.resolution.high_minutes", res.high_minutes),
            ("routing.resolution.medium_minutes", res.medium_minutes),
            ("routing.resolution.low_minutes", res.low_minutes),
            ("routing.resolution.floor_minutes", res.floor_minutes),
            ("routing.resolution.ceiling_minutes", res.ceiling_minutes),
        ] {
            if minutes == 0 {
                return Err(TriageError::Config(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: minutes.to_string(),
                    reason: "must be greater than 0".to_string(),
                }));
            }
        }
        if res.floor_minutes > res.ceiling_minutes {
            return Err(TriageError::Config(ConfigError::NonMonotonic {
                field: "routing.resolution".to_string(),
                reason: "floor_minutes must not exceed ceiling_minutes".to_string(),
            }));
        }
        if !res.complexity_scale.is_finite() || res.complexity_scale < 0.0 {
            return Err(TriageError::Config(ConfigError::InvalidValue {
                field: "routing.resolution.complexity_scale".to_string(),
                value: res.complexity_scale.to_string(),
                reason: "must be a non-negative number".to_string(),
            }));
        }

        Ok(())
    }

    /// Built-in configuration with English lexicons.
    ///
    /// Lets a desk be stood up without external files; still passes through
    /// `validate()` in the facade constructor.
    pub fn default_config() -> Self {
        fn words(list: &[&str]) -> Vec<String> {
            list.iter().map(|s| s.to_string()).collect()
        }

        Self {
            sentiment: SentimentConfig {
                positive_words: words(&[
                    "thanks",
                    "thank",
                    "great",
                    "good",
                    "appreciate",
                    "love",
                    "happy",
                    "pleased",
                    "excellent",
                    "wonderful",
                    "helpful",
                ]),
                negative_words: words(&[
                    "bad",
                    "terrible",
                    "awful",
                    "angry",
                    "frustrated",
                    "frustrating",
                    "broken",
                    "down",
                    "outage",
                    "crash",
                    "crashed",
                    "error",
                    "fail",
                    "failed",
                    "failing",
                    "unacceptable",
                    "worst",
                    "disappointed",
                    "unhappy",
                    "useless",
                    "emergency",
                ]),
            },
            urgency: UrgencyConfig {
                high_indicators: words(&[
                    "urgent",
                    "immediately",
                    "asap",
                    "emergency",
                    "outage",
                    "down",
                    "critical",
                    "production",
                    "cannot access",
                    "as soon as possible",
                    "right now",
                ]),
                medium_indicators: words(&[
                    "soon",
                    "important",
                    "blocked",
                    "deadline",
                    "waiting",
                    "stuck",
                ]),
                low_indicators: words(&[
                    "whenever",
                    "eventually",
                    "minor",
                    "no rush",
                    "curious",
                    "question",
                ]),
                high_base: 0.7,
                medium_base: 0.4,
                low_base: 0.15,
                per_hit_step: 0.1,
            },
            classifier: ClassifierConfig {
                urgency_weight: 0.5,
                sentiment_weight: 0.3,
                complexity_weight: 0.2,
                critical_threshold: 0.75,
                high_threshold: 0.55,
                medium_threshold: 0.3,
            },
            routing: RoutingConfig {
                min_match_score: 0.3,
                automation_match_threshold: 0.6,
                escalation_queue: "tier2-escalations".to_string(),
                critical_escalation_confidence: 0.95,
                resolution: ResolutionTimeConfig {
                    critical_minutes: 30,
                    high_minutes: 60,
                    medium_minutes: 240,
                    low_minutes: 480,
                    complexity_scale: 0.5,
                    floor_minutes: 15,
                    ceiling_minutes: 1440,
                },
            },
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================


// =============================================================================
// PROPERTY TESTS
// =============================================================================
