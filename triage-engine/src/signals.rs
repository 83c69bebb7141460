//! Lexical signal extraction
//!
//! Pure scoring over raw ticket text. No state, no IO; every score is a
//! deterministic function of the text, the channel, and the configured
//! lexicons.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use triage_core::{Channel, SentimentConfig, SignalScores, TriageConfig, UrgencyConfig};

/// Word tokenizer shared by all extractors.
static WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-z0-9']+").expect("word tokenizer regex"));

/// Tokens carrying no classification signal.
static STOP_WORDS: &[&str] = &[
    "a", "an", "the", "i", "my", "me", "we", "our", "you", "your", "it", "its", "is", "are",
    "was", "were", "be", "been", "am", "do", "does", "did", "to", "of", "in", "on", "at", "for",
    "with", "and", "or", "but", "not", "no", "so", "if", "this", "that", "these", "those",
    "have", "has", "had", "can", "cant", "cannot", "could", "will", "would", "should", "may",
    "might", "when", "what", "how", "why", "who", "where", "there", "here", "they", "them",
    "their", "he", "she", "his", "her", "from", "by", "as", "about", "into", "just", "very",
    "please", "hi", "hello", "im", "ive", "dont", "get", "got",
];

/// Extracts sentiment, urgency, and complexity scores plus the keyword set
/// used for pattern matching.
#[derive(Debug, Clone)]
pub struct SignalExtractor {
    sentiment: SentimentConfig,
    urgency: UrgencyConfig,
}

impl SignalExtractor {
    /// Build an extractor from a validated configuration.
    ///
    /// Lexicon words and indicator phrases are lowercased here so matching
    /// never depends on how the configuration was written.
    pub fn new(config: &TriageConfig) -> Self {
        fn lowered(words: &[String]) -> Vec<String> {
            words.iter().map(|w| w.to_lowercase()).collect()
        }

        Self {
            sentiment: SentimentConfig {
                positive_words: lowered(&config.sentiment.positive_words),
                negative_words: lowered(&config.sentiment.negative_words),
            },
            urgency: UrgencyConfig {
                high_indicators: lowered(&config.urgency.high_indicators),
                medium_indicators: lowered(&config.urgency.medium_indicators),
                low_indicators: lowered(&config.urgency.low_indicators),
                ..config.urgency.clone()
            },
        }
    }

    /// Extract signals from subject and content.
    ///
    /// Empty text yields neutral scores and an empty keyword set.
    pub fn extract(&self, subject: &str, content: &str, channel: Channel) -> SignalScores {
        let text = format!("{} {}", subject, content).to_lowercase();
        if text.trim().is_empty() {
            return SignalScores::neutral();
        }

        let tokens: Vec<&str> = WORD_RE.find_iter(&text).map(|m| m.as_str()).collect();
        let keywords = self.keywords(&tokens);
        let scores = SignalScores {
            sentiment: self.sentiment_score(&tokens),
            urgency: self.urgency_score(&text),
            complexity: self.complexity_score(text.len(), keywords.len(), channel),
            keywords,
        };

        tracing::debug!(
            sentiment = scores.sentiment,
            urgency = scores.urgency,
            complexity = scores.complexity,
            keyword_count = scores.keywords.len(),
            "signals extracted"
        );
        scores
    }

    fn keywords(&self, tokens: &[&str]) -> BTreeSet<String> {
        tokens
            .iter()
            .filter(|t| t.len() >= 2 && !STOP_WORDS.contains(t))
            .map(|t| t.to_string())
            .collect()
    }

    /// Positive and negative occurrence counts normalized into [-1, 1].
    fn sentiment_score(&self, tokens: &[&str]) -> f32 {
        let positive = tokens
            .iter()
            .filter(|t| self.sentiment.positive_words.iter().any(|w| w == *t))
            .count();
        let negative = tokens
            .iter()
            .filter(|t| self.sentiment.negative_words.iter().any(|w| w == *t))
            .count();

        let total = positive + negative;
        if total == 0 {
            return 0.0;
        }
        let score = (positive as f32 - negative as f32) / total as f32;
        score.clamp(-1.0, 1.0)
    }

    /// Highest matched indicator tier wins; extra matches push the score up
    /// within the tier band.
    fn urgency_score(&self, text: &str) -> f32 {
        let tiers = [
            (&self.urgency.high_indicators, self.urgency.high_base, 1.0),
            (
                &self.urgency.medium_indicators,
                self.urgency.medium_base,
                self.urgency.high_base,
            ),
            (
                &self.urgency.low_indicators,
                self.urgency.low_base,
                self.urgency.medium_base,
            ),
        ];

        for (indicators, base, ceiling) in tiers {
            let hits = indicators.iter().filter(|i| text.contains(i.as_str())).count();
            if hits > 0 {
                let score = base + (hits as f32 - 1.0) * self.urgency.per_hit_step;
                return score.min(ceiling).clamp(0.0, 1.0);
            }
        }
        0.0
    }

    /// Text length, distinct issue keywords, and a synchronous-channel bias.
    fn complexity_score(&self, text_len: usize, keyword_count: usize, channel: Channel) -> f32 {
        let length_component = (text_len as f32 / 1200.0).min(1.0) * 0.4;
        let keyword_component = (keyword_count as f32 / 10.0).min(1.0) * 0.4;
        let channel_bias = if channel.is_synchronous() { 0.2 } else { 0.0 };
        (length_component + keyword_component + channel_bias).clamp(0.0, 1.0)
    }
}

// =============================================================================
// TESTS
// =============================================================================


// =============================================================================
// PROPERTY TESTS
// =============================================================================

#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;
    use triage_core::TriageConfig;

    proptest! {
        #[test]
        fn prop_scores_always_in_bounds(
            subject in ".{0,100}",
            content in ".{0,500}",
            sync in any::<bool>(),
        ) {
            let extractor = SignalExtractor::new(&TriageConfig::default_config());
            let channel = if sync { Channel::Chat } else { Channel::Email };
            let scores = extractor.extract(&subject, &content, channel);
            prop_assert!(scores.validate().is_ok());
        }

        #[test]
        fn prop_extraction_is_deterministic(content in ".{0,200}") {
            let extractor = SignalExtractor::new(&TriageConfig::default_config());
            let a = extractor.extract("subject", &content, Channel::Email);
            let b = extractor.extract("subject", &content, Channel::Email);
            prop_assert_eq!(a, b);
        }
    }
}
