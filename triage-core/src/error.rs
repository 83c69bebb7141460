//! Error types for TRIAGE operations

use crate::{AgentId, CustomerId, TicketId, TicketState};
use thiserror::Error;

/// Configuration errors, raised at load time only.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Thresholds for {field} are not monotonic: {reason}")]
    NonMonotonic { field: String, reason: String },

    #[error("Lexicon {field} must not be empty")]
    EmptyLexicon { field: String },

    #[error("Configuration parse failed: {reason}")]
    ParseFailed { reason: String },
}

/// Validation errors from entity constructors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    RequiredFieldMissing { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Constraint violation on {constraint}: {reason}")]
    ConstraintViolation { constraint: String, reason: String },
}

/// Problem pattern registration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PatternError {
    #[error("Pattern already registered: {name}")]
    DuplicatePattern { name: String },

    #[error("Pattern table lock poisoned")]
    LockPoisoned,
}

/// Agent registry errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Agent already registered: {agent_id}")]
    DuplicateAgent { agent_id: AgentId },

    #[error("Agent not registered: {agent_id}")]
    UnknownAgent { agent_id: AgentId },

    #[error("Capacity exceeded for agent {agent_id}: at {max_capacity}")]
    CapacityExceeded { agent_id: AgentId, max_capacity: u32 },

    #[error("Release for agent {agent_id} with no reserved capacity")]
    InvalidRelease { agent_id: AgentId },

    #[error("Registry lock poisoned")]
    LockPoisoned,
}

/// Customer directory errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CustomerError {
    #[error("Customer not registered: {customer_id}")]
    UnknownCustomer { customer_id: CustomerId },

    #[error("Customer already registered: {customer_id}")]
    DuplicateCustomer { customer_id: CustomerId },

    #[error("Customer directory lock poisoned")]
    LockPoisoned,
}

/// Ticket store errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Ticket not found: {ticket_id}")]
    TicketNotFound { ticket_id: TicketId },

    #[error("Ticket already stored: {ticket_id}")]
    DuplicateTicket { ticket_id: TicketId },

    #[error("Store lock poisoned")]
    LockPoisoned,
}

/// Ticket lifecycle errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("Invalid transition for ticket {ticket_id}: {from} -> {to}")]
    InvalidTransition {
        ticket_id: TicketId,
        from: TicketState,
        to: TicketState,
    },
}

/// Master error type for all TRIAGE errors.
#[derive(Debug, Clone, Error)]
pub enum TriageError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Pattern error: {0}")]
    Pattern(#[from] PatternError),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Customer error: {0}")]
    Customer(#[from] CustomerError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Lifecycle error: {0}")]
    Lifecycle(#[from] LifecycleError),
}

/// Result type alias for TRIAGE operations.
pub type TriageResult<T> = Result<T, TriageError>;

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_registry_error_display_capacity_exceeded() {
        let err = RegistryError::CapacityExceeded {
            agent_id: Uuid::nil(),
            max_capacity: 5,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("Capacity exceeded"));
        assert!(msg.contains("5"));
        assert!(msg.contains("00000000-0000-0000-0000-000000000000"));
    }

    #[test]
    fn test_lifecycle_error_display_invalid_transition() {
        let err = LifecycleError::InvalidTransition {
            ticket_id: Uuid::nil(),
            from: TicketState::Resolved,
            to: TicketState::Escalated,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("Invalid transition"));
        assert!(msg.contains("Resolved"));
        assert!(msg.contains("Escalated"));
    }

    #[test]
    fn test_config_error_display_invalid_value() {
        let err = ConfigError::InvalidValue {
            field: "classifier.critical_threshold".to_string(),
            value: "1.5".to_string(),
            reason: "must be between 0.0 and 1.0".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("classifier.critical_threshold"));
        assert!(msg.contains("1.5"));
        assert!(msg.contains("must be between 0.0 and 1.0"));
    }

    #[test]
    fn test_customer_error_display_unknown() {
        let err = CustomerError::UnknownCustomer {
            customer_id: Uuid::nil(),
        };
        assert!(format!("{}", err).contains("Customer not registered"));
    }

    #[test]
    fn test_triage_error_from_variants() {
        let config = TriageError::from(ConfigError::EmptyLexicon {
            field: "sentiment.positive_words".to_string(),
        });
        assert!(matches!(config, TriageError::Config(_)));

        let validation = TriageError::from(ValidationError::RequiredFieldMissing {
            field: "subject".to_string(),
        });
        assert!(matches!(validation, TriageError::Validation(_)));

        let pattern = TriageError::from(PatternError::DuplicatePattern {
            name: "payment_failure".to_string(),
        });
        assert!(matches!(pattern, TriageError::Pattern(_)));

        let registry = TriageError::from(RegistryError::LockPoisoned);
        assert!(matches!(registry, TriageError::Registry(_)));

        let customer = TriageError::from(CustomerError::DuplicateCustomer {
            customer_id: Uuid::nil(),
        });
        assert!(matches!(customer, TriageError::Customer(_)));

        let store = TriageError::from(StoreError::LockPoisoned);
        assert!(matches!(store, TriageError::Store(_)));

        let lifecycle = TriageError::from(LifecycleError::InvalidTransition {
            ticket_id: Uuid::nil(),
            from: TicketState::Open,
            to: TicketState::Resolved,
        });
        assert!(matches!(lifecycle, TriageError::Lifecycle(_)));
    }
}
