//! Enum types for TRIAGE entities

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// PRIORITY
// ============================================================================

/// Ticket priority level.
///
/// Derives `Ord` with Low < Medium < High < Critical so severity policies
/// (tier boost, pattern floor) are plain `max` operations.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Priority {
    /// Convert to database string representation.
    pub fn as_db_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Critical => "Critical",
        }
    }

    /// Parse from database string representation.
    pub fn from_db_str(s: &str) -> Result<Self, PriorityParseError> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "critical" => Ok(Priority::Critical),
            _ => Err(PriorityParseError(s.to_string())),
        }
    }

    /// The next level toward Critical, saturating at Critical.
    pub fn raised(&self) -> Priority {
        match self {
            Priority::Low => Priority::Medium,
            Priority::Medium => Priority::High,
            Priority::High => Priority::Critical,
            Priority::Critical => Priority::Critical,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_db_str())
    }
}

impl FromStr for Priority {
    type Err = PriorityParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_db_str(s)
    }
}

/// Error when parsing an invalid priority string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityParseError(pub String);

impl fmt::Display for PriorityParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid priority: {}", self.0)
    }
}

impl std::error::Error for PriorityParseError {}

// ============================================================================
// ROUTING DECISION
// ============================================================================

/// Routing outcome class for a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoutingDecision {
    /// Route to a human specialist with reserved capacity
    HumanSpecialist,
    /// Route to an automated responder
    BotAutomation,
    /// Route to the escalation queue
    Escalate,
}

impl RoutingDecision {
    /// Convert to database string representation.
    pub fn as_db_str(&self) -> &'static str {
        match self {
            RoutingDecision::HumanSpecialist => "HumanSpecialist",
            RoutingDecision::BotAutomation => "BotAutomation",
            RoutingDecision::Escalate => "Escalate",
        }
    }

    /// Parse from database string representation.
    pub fn from_db_str(s: &str) -> Result<Self, RoutingDecisionParseError> {
        match s.to_lowercase().as_str() {
            "humanspecialist" | "human_specialist" => Ok(RoutingDecision::HumanSpecialist),
            "botautomation" | "bot_automation" => Ok(RoutingDecision::BotAutomation),
            "escalate" => Ok(RoutingDecision::Escalate),
            _ => Err(RoutingDecisionParseError(s.to_string())),
        }
    }
}

impl fmt::Display for RoutingDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_db_str())
    }
}

impl FromStr for RoutingDecision {
    type Err = RoutingDecisionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_db_str(s)
    }
}

/// Error when parsing an invalid routing decision string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingDecisionParseError(pub String);

impl fmt::Display for RoutingDecisionParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid routing decision: {}", self.0)
    }
}

impl std::error::Error for RoutingDecisionParseError {}

// ============================================================================
// TICKET STATE
// ============================================================================

/// Lifecycle state of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TicketState {
    /// Submitted, routing not yet completed
    #[default]
    Open,
    /// A routing recommendation has been produced
    Routed,
    /// Escalated to the escalation queue
    Escalated,
    /// Closed; terminal state
    Resolved,
}

impl TicketState {
    /// Convert to database string representation.
    pub fn as_db_str(&self) -> &'static str {
        match self {
            TicketState::Open => "Open",
            TicketState::Routed => "Routed",
            TicketState::Escalated => "Escalated",
            TicketState::Resolved => "Resolved",
        }
    }

    /// Parse from database string representation.
    pub fn from_db_str(s: &str) -> Result<Self, TicketStateParseError> {
        match s.to_lowercase().as_str() {
            "open" => Ok(TicketState::Open),
            "routed" => Ok(TicketState::Routed),
            "escalated" => Ok(TicketState::Escalated),
            "resolved" => Ok(TicketState::Resolved),
            _ => Err(TicketStateParseError(s.to_string())),
        }
    }

    /// Check if this state accepts no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TicketState::Resolved)
    }

    /// Check whether a transition to `next` is allowed.
    ///
    /// Open -> Routed -> {Escalated, Resolved}; Escalated -> Resolved.
    /// Escalated -> Escalated is allowed so repeated escalations append
    /// reasons without regressing state.
    pub fn can_transition_to(&self, next: TicketState) -> bool {
        matches!(
            (self, next),
            (TicketState::Open, TicketState::Routed)
                | (TicketState::Routed, TicketState::Escalated)
                | (TicketState::Routed, TicketState::Resolved)
                | (TicketState::Escalated, TicketState::Escalated)
                | (TicketState::Escalated, TicketState::Resolved)
        )
    }
}

impl fmt::Display for TicketState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_db_str())
    }
}

impl FromStr for TicketState {
    type Err = TicketStateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_db_str(s)
    }
}

/// Error when parsing an invalid ticket state string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketStateParseError(pub String);

impl fmt::Display for TicketStateParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid ticket state: {}", self.0)
    }
}

impl std::error::Error for TicketStateParseError {}

// ============================================================================
// CHANNEL
// ============================================================================

/// Intake channel of a support request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    Email,
    Chat,
    Phone,
    WebForm,
}

impl Channel {
    /// Convert to database string representation.
    pub fn as_db_str(&self) -> &'static str {
        match self {
            Channel::Email => "Email",
            Channel::Chat => "Chat",
            Channel::Phone => "Phone",
            Channel::WebForm => "WebForm",
        }
    }

    /// Parse from database string representation.
    pub fn from_db_str(s: &str) -> Result<Self, ChannelParseError> {
        match s.to_lowercase().as_str() {
            "email" => Ok(Channel::Email),
            "chat" => Ok(Channel::Chat),
            "phone" => Ok(Channel::Phone),
            "webform" | "web_form" | "web" => Ok(Channel::WebForm),
            _ => Err(ChannelParseError(s.to_string())),
        }
    }

    /// Channels where the customer is waiting live on the line.
    pub fn is_synchronous(&self) -> bool {
        matches!(self, Channel::Phone | Channel::Chat)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_db_str())
    }
}

impl FromStr for Channel {
    type Err = ChannelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_db_str(s)
    }
}

/// Error when parsing an invalid channel string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelParseError(pub String);

impl fmt::Display for ChannelParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid channel: {}", self.0)
    }
}

impl std::error::Error for ChannelParseError {}

// ============================================================================
// CUSTOMER TIER
// ============================================================================

/// Service tier of a customer account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CustomerTier {
    #[default]
    Standard,
    Premium,
    Enterprise,
}

impl CustomerTier {
    /// Convert to database string representation.
    pub fn as_db_str(&self) -> &'static str {
        match self {
            CustomerTier::Standard => "Standard",
            CustomerTier::Premium => "Premium",
            CustomerTier::Enterprise => "Enterprise",
        }
    }

    /// Parse from database string representation.
    pub fn from_db_str(s: &str) -> Result<Self, CustomerTierParseError> {
        match s.to_lowercase().as_str() {
            "standard" => Ok(CustomerTier::Standard),
            "premium" => Ok(CustomerTier::Premium),
            "enterprise" => Ok(CustomerTier::Enterprise),
            _ => Err(CustomerTierParseError(s.to_string())),
        }
    }

    /// Tiers whose tickets are shifted one priority level toward Critical.
    pub fn receives_priority_boost(&self) -> bool {
        matches!(self, CustomerTier::Premium | CustomerTier::Enterprise)
    }
}

impl fmt::Display for CustomerTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_db_str())
    }
}

impl FromStr for CustomerTier {
    type Err = CustomerTierParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_db_str(s)
    }
}

/// Error when parsing an invalid customer tier string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerTierParseError(pub String);

impl fmt::Display for CustomerTierParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid customer tier: {}", self.0)
    }
}

impl std::error::Error for CustomerTierParseError {}

// ============================================================================
// ESCALATION SOURCE
// ============================================================================

/// Origin of an escalation event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EscalationSource {
    /// Raised by the routing pipeline
    System,
    /// Raised by an operator
    Manual,
}

impl EscalationSource {
    /// Convert to database string representation.
    pub fn as_db_str(&self) -> &'static str {
        match self {
            EscalationSource::System => "System",
            EscalationSource::Manual => "Manual",
        }
    }

    /// Parse from database string representation.
    pub fn from_db_str(s: &str) -> Result<Self, EscalationSourceParseError> {
        match s.to_lowercase().as_str() {
            "system" => Ok(EscalationSource::System),
            "manual" => Ok(EscalationSource::Manual),
            _ => Err(EscalationSourceParseError(s.to_string())),
        }
    }
}

impl fmt::Display for EscalationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_db_str())
    }
}

impl FromStr for EscalationSource {
    type Err = EscalationSourceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_db_str(s)
    }
}

/// Error when parsing an invalid escalation source string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscalationSourceParseError(pub String);

impl fmt::Display for EscalationSourceParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid escalation source: {}", self.0)
    }
}

impl std::error::Error for EscalationSourceParseError {}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::Low < Priority::Medium);
        assert!(Priority::Medium < Priority::High);
        assert!(Priority::High < Priority::Critical);
    }

    #[test]
    fn test_priority_raised_saturates() {
        assert_eq!(Priority::Low.raised(), Priority::Medium);
        assert_eq!(Priority::High.raised(), Priority::Critical);
        assert_eq!(Priority::Critical.raised(), Priority::Critical);
    }

    #[test]
    fn test_priority_db_round_trip() {
        for p in [
            Priority::Low,
            Priority::Medium,
            Priority::High,
            Priority::Critical,
        ] {
            assert_eq!(Priority::from_db_str(p.as_db_str()), Ok(p));
        }
    }

    #[test]
    fn test_priority_parse_invalid() {
        let err = Priority::from_db_str("severe").unwrap_err();
        assert!(format!("{}", err).contains("severe"));
    }

    #[test]
    fn test_routing_decision_parse_accepts_snake_case() {
        assert_eq!(
            RoutingDecision::from_db_str("human_specialist"),
            Ok(RoutingDecision::HumanSpecialist)
        );
        assert_eq!(
            RoutingDecision::from_db_str("bot_automation"),
            Ok(RoutingDecision::BotAutomation)
        );
    }

    #[test]
    fn test_ticket_state_transitions() {
        assert!(TicketState::Open.can_transition_to(TicketState::Routed));
        assert!(TicketState::Routed.can_transition_to(TicketState::Escalated));
        assert!(TicketState::Routed.can_transition_to(TicketState::Resolved));
        assert!(TicketState::Escalated.can_transition_to(TicketState::Escalated));
        assert!(TicketState::Escalated.can_transition_to(TicketState::Resolved));

        assert!(!TicketState::Open.can_transition_to(TicketState::Escalated));
        assert!(!TicketState::Open.can_transition_to(TicketState::Resolved));
        assert!(!TicketState::Resolved.can_transition_to(TicketState::Escalated));
        assert!(!TicketState::Resolved.can_transition_to(TicketState::Routed));
        assert!(!TicketState::Escalated.can_transition_to(TicketState::Routed));
    }

    #[test]
    fn test_ticket_state_terminal() {
        assert!(TicketState::Resolved.is_terminal());
        assert!(!TicketState::Open.is_terminal());
        assert!(!TicketState::Routed.is_terminal());
        assert!(!TicketState::Escalated.is_terminal());
    }

    #[test]
    fn test_channel_synchronous() {
        assert!(Channel::Phone.is_synchronous());
        assert!(Channel::Chat.is_synchronous());
        assert!(!Channel::Email.is_synchronous());
        assert!(!Channel::WebForm.is_synchronous());
    }

    #[test]
    fn test_channel_parse_web_form_variants() {
        assert_eq!(Channel::from_db_str("webform"), Ok(Channel::WebForm));
        assert_eq!(Channel::from_db_str("web_form"), Ok(Channel::WebForm));
        assert_eq!(Channel::from_db_str("WebForm"), Ok(Channel::WebForm));
    }

    #[test]
    fn test_customer_tier_boost() {
        assert!(!CustomerTier::Standard.receives_priority_boost());
        assert!(CustomerTier::Premium.receives_priority_boost());
        assert!(CustomerTier::Enterprise.receives_priority_boost());
    }

    #[test]
    fn test_escalation_source_display() {
        assert_eq!(format!("{}", EscalationSource::System), "System");
        assert_eq!(format!("{}", EscalationSource::Manual), "Manual");
    }

    #[test]
    fn test_enum_serde_round_trip() {
        let json = serde_json::to_string(&Priority::Critical).unwrap();
        let back: Priority = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Priority::Critical);

        let json = serde_json::to_string(&TicketState::Escalated).unwrap();
        let back: TicketState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, TicketState::Escalated);
    }
}
