//! TRIAGE Core - Data types for support-request classification and routing
//!
//! Pure data layer shared by the decision engine:
//! - Identity types (UUIDv7 timestamp-sortable IDs, content hashes)
//! - Enum types with database string conversions
//! - Entity structures (tickets, agents, customers, patterns, recommendations)
//! - Error taxonomy
//! - Validated configuration types
//!
//! No business logic lives here; the engine crate composes these types.

pub mod config;
pub mod entities;
pub mod enums;
pub mod error;
pub mod identity;

pub use config::{
    ClassifierConfig, ResolutionTimeConfig, RoutingConfig, SentimentConfig, TriageConfig,
    UrgencyConfig,
};
pub use entities::{
    Agent, AlternativeRoute, Customer, EscalationEvent, ProblemPattern, RoutingRecommendation,
    RoutingTarget, SignalScores, Ticket,
};
pub use enums::{
    Channel, ChannelParseError, CustomerTier, CustomerTierParseError, EscalationSource,
    EscalationSourceParseError, Priority, PriorityParseError, RoutingDecision,
    RoutingDecisionParseError, TicketState, TicketStateParseError,
};
pub use error::{
    ConfigError, CustomerError, LifecycleError, PatternError, RegistryError, StoreError,
    TriageError, TriageResult, ValidationError,
};
pub use identity::{
    compute_content_hash, new_entity_id, AgentId, ContentHash, CustomerId, RecommendationId,
    TicketId, Timestamp,
};
