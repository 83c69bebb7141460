//! Core entity structures

use crate::{
    compute_content_hash, new_entity_id, AgentId, Channel, ContentHash, CustomerId, CustomerTier,
    EscalationSource, Priority, RecommendationId, RoutingDecision, TicketId, TicketState,
    Timestamp, ValidationError,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

// ============================================================================
// SIGNAL SCORES
// ============================================================================

/// Lexical signals extracted from raw ticket text.
///
/// Scores are clamped by the extractor; `validate` re-checks the bounds so
/// hand-built values cannot smuggle out-of-range numbers into a ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalScores {
    /// Sentiment polarity in [-1.0, 1.0]; negative is unhappy
    pub sentiment: f32,
    /// Urgency in [0.0, 1.0]
    pub urgency: f32,
    /// Complexity in [0.0, 1.0]
    pub complexity: f32,
    /// Lowercased word tokens minus stop words, deterministically ordered
    pub keywords: BTreeSet<String>,
}

impl SignalScores {
    /// Neutral scores for empty or unscorable text.
    pub fn neutral() -> Self {
        Self {
            sentiment: 0.0,
            urgency: 0.0,
            complexity: 0.0,
            keywords: BTreeSet::new(),
        }
    }

    /// Validate score bounds.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.sentiment.is_finite() || !(-1.0..=1.0).contains(&self.sentiment) {
            return Err(ValidationError::InvalidValue {
                field: "sentiment".to_string(),
                reason: "must be between -1.0 and 1.0".to_string(),
            });
        }
        if !self.urgency.is_finite() || !(0.0..=1.0).contains(&self.urgency) {
            return Err(ValidationError::InvalidValue {
                field: "urgency".to_string(),
                reason: "must be between 0.0 and 1.0".to_string(),
            });
        }
        if !self.complexity.is_finite() || !(0.0..=1.0).contains(&self.complexity) {
            return Err(ValidationError::InvalidValue {
                field: "complexity".to_string(),
                reason: "must be between 0.0 and 1.0".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for SignalScores {
    fn default() -> Self {
        Self::neutral()
    }
}

// ============================================================================
// TICKET
// ============================================================================

/// Ticket - a classified support request.
///
/// Tickets are never deleted. Routing fields are written once by the routing
/// pipeline; state and escalation reasons are mutated only through the
/// lifecycle tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub ticket_id: TicketId,
    pub subject: String,
    pub content: String,
    pub channel: Channel,
    pub customer_id: CustomerId,
    pub priority: Priority,
    pub sentiment_score: f32,
    pub urgency_score: f32,
    pub complexity_score: f32,
    pub category: String,
    pub keywords: BTreeSet<String>,
    /// Earlier tickets with identical content, linked at insert time
    pub related_ticket_ids: Vec<TicketId>,
    pub content_hash: ContentHash,
    pub state: TicketState,
    /// Agent holding reserved capacity for this ticket, if any
    pub assigned_agent_id: Option<AgentId>,
    /// Append-only escalation log
    pub escalation_reasons: Vec<EscalationEvent>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Ticket {
    /// Create a new open ticket with neutral signals.
    pub fn new(
        subject: impl Into<String>,
        content: impl Into<String>,
        customer_id: CustomerId,
        channel: Channel,
    ) -> Self {
        let content = content.into();
        let now = Utc::now();
        Self {
            ticket_id: new_entity_id(),
            subject: subject.into(),
            content_hash: compute_content_hash(content.as_bytes()),
            content,
            channel,
            customer_id,
            priority: Priority::default(),
            sentiment_score: 0.0,
            urgency_score: 0.0,
            complexity_score: 0.0,
            category: "general".to_string(),
            keywords: BTreeSet::new(),
            related_ticket_ids: Vec::new(),
            state: TicketState::Open,
            assigned_agent_id: None,
            escalation_reasons: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Set extracted signal scores and keywords.
    pub fn with_signals(mut self, signals: SignalScores) -> Self {
        self.sentiment_score = signals.sentiment;
        self.urgency_score = signals.urgency;
        self.complexity_score = signals.complexity;
        self.keywords = signals.keywords;
        self
    }

    /// Set the classified priority.
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Set the matched category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Validate field constraints and score ranges.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.subject.trim().is_empty() {
            return Err(ValidationError::RequiredFieldMissing {
                field: "subject".to_string(),
            });
        }
        if self.category.trim().is_empty() {
            return Err(ValidationError::RequiredFieldMissing {
                field: "category".to_string(),
            });
        }
        let scores = SignalScores {
            sentiment: self.sentiment_score,
            urgency: self.urgency_score,
            complexity: self.complexity_score,
            keywords: BTreeSet::new(),
        };
        scores.validate()
    }

    /// Bump the updated timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

// ============================================================================
// AGENT
// ============================================================================

/// Agent - a human specialist who can be assigned tickets.
///
/// Current load is owned by the registry and never stored on the entity;
/// capacity is reserved and released exclusively through registry operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub agent_id: AgentId,
    pub name: String,
    /// Categories and pattern names this agent handles
    pub specialties: BTreeSet<String>,
    /// Maximum concurrent assignments; must be positive
    pub max_capacity: u32,
    /// Customer satisfaction rating in [0.0, 5.0]
    pub satisfaction_rating: f32,
    pub created_at: Timestamp,
}

impl Agent {
    /// Create a new agent with no specialties and a neutral rating.
    pub fn new(name: impl Into<String>, max_capacity: u32) -> Self {
        Self {
            agent_id: new_entity_id(),
            name: name.into(),
            specialties: BTreeSet::new(),
            max_capacity,
            satisfaction_rating: 2.5,
            created_at: Utc::now(),
        }
    }

    /// Add a specialty.
    pub fn with_specialty(mut self, specialty: impl Into<String>) -> Self {
        self.specialties.insert(specialty.into());
        self
    }

    /// Set the satisfaction rating.
    pub fn with_rating(mut self, rating: f32) -> Self {
        self.satisfaction_rating = rating;
        self
    }

    /// Check whether this agent covers any of the given requirements.
    pub fn covers(&self, requirements: &[&str]) -> bool {
        requirements.iter().any(|r| self.specialties.contains(*r))
    }

    /// Validate field constraints.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::RequiredFieldMissing {
                field: "name".to_string(),
            });
        }
        if self.max_capacity == 0 {
            return Err(ValidationError::InvalidValue {
                field: "max_capacity".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
        if !self.satisfaction_rating.is_finite()
            || !(0.0..=5.0).contains(&self.satisfaction_rating)
        {
            return Err(ValidationError::InvalidValue {
                field: "satisfaction_rating".to_string(),
                reason: "must be between 0.0 and 5.0".to_string(),
            });
        }
        Ok(())
    }
}

// ============================================================================
// CUSTOMER
// ============================================================================

/// Customer - the account a ticket belongs to.
///
/// Immutable after registration except for the submission counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: CustomerId,
    pub name: String,
    pub tier: CustomerTier,
    /// Number of accepted submissions from this customer
    pub history_count: u32,
    pub created_at: Timestamp,
}

impl Customer {
    /// Create a new customer with an empty history.
    pub fn new(name: impl Into<String>, tier: CustomerTier) -> Self {
        Self {
            customer_id: new_entity_id(),
            name: name.into(),
            tier,
            history_count: 0,
            created_at: Utc::now(),
        }
    }

    /// Validate field constraints.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::RequiredFieldMissing {
                field: "name".to_string(),
            });
        }
        Ok(())
    }
}

// ============================================================================
// PROBLEM PATTERN
// ============================================================================

/// ProblemPattern - a known problem shape matched by keyword containment.
///
/// Patterns are validated when registered and become immutable once the
/// table is composed into a matcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemPattern {
    pub name: String,
    /// Keywords scored by containment; must be non-empty
    pub keywords: BTreeSet<String>,
    pub category: String,
    /// Severity floor applied when this pattern matches
    pub default_priority: Option<Priority>,
    /// Routing hint declared by this pattern
    pub default_routing: Option<RoutingDecision>,
    pub expected_resolution_minutes: Option<u32>,
}

impl ProblemPattern {
    /// Create a new pattern with no keywords or hints.
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            keywords: BTreeSet::new(),
            category: category.into(),
            default_priority: None,
            default_routing: None,
            expected_resolution_minutes: None,
        }
    }

    /// Add a keyword.
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keywords.insert(keyword.into().to_lowercase());
        self
    }

    /// Set the priority floor.
    pub fn with_default_priority(mut self, priority: Priority) -> Self {
        self.default_priority = Some(priority);
        self
    }

    /// Set the routing hint.
    pub fn with_default_routing(mut self, decision: RoutingDecision) -> Self {
        self.default_routing = Some(decision);
        self
    }

    /// Set the expected resolution time in minutes.
    pub fn with_expected_resolution_minutes(mut self, minutes: u32) -> Self {
        self.expected_resolution_minutes = Some(minutes);
        self
    }

    /// Validate field constraints.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::RequiredFieldMissing {
                field: "name".to_string(),
            });
        }
        if self.category.trim().is_empty() {
            return Err(ValidationError::RequiredFieldMissing {
                field: "category".to_string(),
            });
        }
        if self.keywords.is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "keywords".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

// ============================================================================
// ROUTING RECOMMENDATION
// ============================================================================

/// Concrete destination of a routing decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoutingTarget {
    /// A specific human specialist
    Agent(AgentId),
    /// An automated responder, named by the matched pattern
    Automation(String),
    /// A named escalation queue
    Queue(String),
}

impl RoutingTarget {
    /// The agent ID when this target is a human specialist.
    pub fn agent_id(&self) -> Option<AgentId> {
        match self {
            RoutingTarget::Agent(id) => Some(*id),
            _ => None,
        }
    }
}

impl fmt::Display for RoutingTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoutingTarget::Agent(id) => write!(f, "agent:{}", id),
            RoutingTarget::Automation(name) => write!(f, "automation:{}", name),
            RoutingTarget::Queue(name) => write!(f, "queue:{}", name),
        }
    }
}

/// A lower-ranked routing option recorded alongside the chosen one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeRoute {
    pub decision: RoutingDecision,
    pub target: RoutingTarget,
    pub confidence: f32,
}

/// RoutingRecommendation - an explainable routing outcome.
///
/// Immutable once produced; re-routing creates a new record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingRecommendation {
    pub recommendation_id: RecommendationId,
    pub ticket_id: TicketId,
    pub decision: RoutingDecision,
    pub target: RoutingTarget,
    /// Confidence in [0.0, 1.0]
    pub confidence: f32,
    /// Ordered factual statements explaining the decision; never empty
    pub reasoning: Vec<String>,
    /// At most two next-ranked options
    pub alternatives: Vec<AlternativeRoute>,
    pub estimated_resolution_minutes: u32,
    pub created_at: Timestamp,
}

impl RoutingRecommendation {
    /// Create a new recommendation with empty reasoning.
    pub fn new(
        ticket_id: TicketId,
        decision: RoutingDecision,
        target: RoutingTarget,
        confidence: f32,
        estimated_resolution_minutes: u32,
    ) -> Self {
        Self {
            recommendation_id: new_entity_id(),
            ticket_id,
            decision,
            target,
            confidence,
            reasoning: Vec::new(),
            alternatives: Vec::new(),
            estimated_resolution_minutes,
            created_at: Utc::now(),
        }
    }

    /// Append a reasoning statement.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reasoning.push(reason.into());
        self
    }

    /// Set the alternatives list.
    pub fn with_alternatives(mut self, alternatives: Vec<AlternativeRoute>) -> Self {
        self.alternatives = alternatives;
        self
    }

    /// Validate field constraints.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.confidence.is_finite() || !(0.0..=1.0).contains(&self.confidence) {
            return Err(ValidationError::InvalidValue {
                field: "confidence".to_string(),
                reason: "must be between 0.0 and 1.0".to_string(),
            });
        }
        if self.reasoning.is_empty() {
            return Err(ValidationError::RequiredFieldMissing {
                field: "reasoning".to_string(),
            });
        }
        if self.alternatives.len() > 2 {
            return Err(ValidationError::ConstraintViolation {
                constraint: "alternatives".to_string(),
                reason: "at most 2 alternatives allowed".to_string(),
            });
        }
        for alt in &self.alternatives {
            if !alt.confidence.is_finite() || !(0.0..=1.0).contains(&alt.confidence) {
                return Err(ValidationError::InvalidValue {
                    field: "alternatives.confidence".to_string(),
                    reason: "must be between 0.0 and 1.0".to_string(),
                });
            }
        }
        Ok(())
    }
}

// ============================================================================
// ESCALATION EVENT
// ============================================================================

/// EscalationEvent - one entry in a ticket's append-only escalation log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EscalationEvent {
    pub timestamp: Timestamp,
    pub reason: String,
    pub source: EscalationSource,
}

impl EscalationEvent {
    /// Create an event stamped now.
    pub fn new(reason: impl Into<String>, source: EscalationSource) -> Self {
        Self {
            timestamp: Utc::now(),
            reason: reason.into(),
            source,
        }
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

    proptest! {
        #[test]
        fn prop_signal_scores_in_range_validate(
            sentiment in -1.0f32..=1.0,
            urgency in 0.0f32..=1.0,
            complexity in 0.0f32..=1.0,
        ) {
            let scores = SignalScores {
                sentiment,
                urgency,
                complexity,
                keywords: BTreeSet::new(),
            };
            prop_assert!(scores.validate().is_ok());
        }

        #[test]
        fn prop_signal_scores_out_of_range_rejected(urgency in 1.0001f32..10.0) {
            let scores = SignalScores {
                sentiment: 0.0,
                urgency,
                complexity: 0.0,
                keywords: BTreeSet::new(),
            };
            prop_assert!(scores.validate().is_err());
        }

        #[test]
        fn prop_agent_capacity_positive_validates(capacity in 1u32..1000) {
            let agent = Agent::new("agent", capacity);
            prop_assert!(agent.validate().is_ok());
        }

        #[test]
        fn prop_recommendation_confidence_bounds(confidence in 0.0f32..=1.0) {
            let rec = RoutingRecommendation::new(
                new_entity_id(),
                RoutingDecision::Escalate,
                RoutingTarget::Queue("tier2".to_string()),
                confidence,
                30,
            )
            .with_reason("reason");
            prop_assert!(rec.validate().is_ok());
        }
    }
}
