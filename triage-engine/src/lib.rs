//! TRIAGE Engine - Support-request classification and capacity-aware routing
//!
//! The decision pipeline that turns raw ticket text plus customer and agent
//! context into a scored, explainable routing outcome:
//!
//! 1. `SignalExtractor` scores sentiment, urgency, and complexity from text
//! 2. `PatternMatcher` recognizes known problem shapes by keyword containment
//! 3. `PriorityClassifier` blends signals into a priority band
//! 4. `RoutingEngine` picks a destination and reserves specialist capacity
//! 5. `EscalationTracker` drives the ticket lifecycle state machine
//! 6. `TicketStore` keeps tickets and recommendation records in memory
//!
//! `TriageDesk` composes the pipeline behind a single facade.

pub mod classifier;
pub mod desk;
pub mod escalation;
pub mod patterns;
pub mod registry;
pub mod routing;
pub mod signals;
pub mod store;

pub use classifier::PriorityClassifier;
pub use desk::TriageDesk;
pub use escalation::EscalationTracker;
pub use patterns::{PatternMatch, PatternMatcher, PatternTable};
pub use registry::{AgentRegistry, AgentUtilization, CandidateAgent};
pub use routing::RoutingEngine;
pub use signals::SignalExtractor;
pub use store::{DashboardCounts, TicketStore};
