//! TRIAGE Test Utilities
//!
//! Centralized test infrastructure for the TRIAGE workspace:
//! - Proptest generators for core entity types
//! - Pre-built fixtures for common triage scenarios

// Re-export core types for convenience
pub use triage_core::{
    Agent, AgentId, Channel, ContentHash, Customer, CustomerId, CustomerTier, EscalationSource,
    Priority, ProblemPattern, RoutingDecision, SignalScores, Ticket, TicketId, TicketState,
    Timestamp, TriageConfig, TriageError, TriageResult, compute_content_hash, new_entity_id,
};

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for generating TRIAGE entity types.

    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeSet;
    use uuid::Uuid;

    // === Identity Type Generators ===

    /// Generate a random UUID (for generic ID generation).
    pub fn arb_uuid() -> impl Strategy<Value = Uuid> {
        any::<[u8; 16]>().prop_map(Uuid::from_bytes)
    }

    /// Generate a valid UUIDv7 (timestamp-sortable).
    pub fn arb_uuid_v7() -> impl Strategy<Value = Uuid> {
        Just(()).prop_map(|_| Uuid::now_v7())
    }

    /// Generate a Timestamp (DateTime<Utc>).
    pub fn arb_timestamp() -> impl Strategy<Value = Timestamp> {
        // timestamps within a reasonable range (2020-2030)
        (1577836800i64..1893456000i64).prop_map(|secs| {
            chrono::DateTime::from_timestamp(secs, 0).unwrap_or_else(chrono::Utc::now)
        })
    }

    /// Generate a ContentHash (32 bytes).
    pub fn arb_content_hash() -> impl Strategy<Value = ContentHash> {
        any::<[u8; 32]>()
    }

    // === Enum Generators ===

    /// Generate a Priority variant.
    pub fn arb_priority() -> impl Strategy<Value = Priority> {
        prop_oneof![
            Just(Priority::Low),
            Just(Priority::Medium),
            Just(Priority::High),
            Just(Priority::Critical),
        ]
    }

    /// Generate a Channel variant.
    pub fn arb_channel() -> impl Strategy<Value = Channel> {
        prop_oneof![
            Just(Channel::Email),
            Just(Channel::Chat),
            Just(Channel::Phone),
            Just(Channel::WebForm),
        ]
    }

    /// Generate a CustomerTier variant.
    pub fn arb_customer_tier() -> impl Strategy<Value = CustomerTier> {
        prop_oneof![
            Just(CustomerTier::Standard),
            Just(CustomerTier::Premium),
            Just(CustomerTier::Enterprise),
        ]
    }

    /// Generate a RoutingDecision variant.
    pub fn arb_routing_decision() -> impl Strategy<Value = RoutingDecision> {
        prop_oneof![
            Just(RoutingDecision::HumanSpecialist),
            Just(RoutingDecision::BotAutomation),
            Just(RoutingDecision::Escalate),
        ]
    }

    /// Generate a TicketState variant.
    pub fn arb_ticket_state() -> impl Strategy<Value = TicketState> {
        prop_oneof![
            Just(TicketState::Open),
            Just(TicketState::Routed),
            Just(TicketState::Escalated),
            Just(TicketState::Resolved),
        ]
    }

    /// Generate an EscalationSource variant.
    pub fn arb_escalation_source() -> impl Strategy<Value = EscalationSource> {
        prop_oneof![Just(EscalationSource::System), Just(EscalationSource::Manual)]
    }

    // === Entity Generators ===

    /// Generate a lowercase keyword set.
    pub fn arb_keywords() -> impl Strategy<Value = BTreeSet<String>> {
        proptest::collection::btree_set("[a-z]{3,10}", 0..12)
    }

    /// Generate in-range SignalScores.
    pub fn arb_signal_scores() -> impl Strategy<Value = SignalScores> {
        (
            -1.0f32..=1.0,
            0.0f32..=1.0,
            0.0f32..=1.0,
            arb_keywords(),
        )
            .prop_map(|(sentiment, urgency, complexity, keywords)| SignalScores {
                sentiment,
                urgency,
                complexity,
                keywords,
            })
    }

    /// Generate a valid Agent.
    pub fn arb_agent() -> impl Strategy<Value = Agent> {
        (
            "[A-Za-z]{3,12}",
            1u32..8,
            0.0f32..=5.0,
            proptest::collection::btree_set("[a-z]{3,10}", 0..4),
        )
            .prop_map(|(name, capacity, rating, specialties)| {
                let mut agent = Agent::new(name, capacity).with_rating(rating);
                for specialty in specialties {
                    agent = agent.with_specialty(specialty);
                }
                agent
            })
    }

    /// Generate a valid Customer.
    pub fn arb_customer() -> impl Strategy<Value = Customer> {
        ("[A-Za-z]{3,12}", arb_customer_tier())
            .prop_map(|(name, tier)| Customer::new(name, tier))
    }

    /// Generate a valid ProblemPattern.
    pub fn arb_problem_pattern() -> impl Strategy<Value = ProblemPattern> {
        (
            "[a-z_]{3,16}",
            "[a-z]{3,10}",
            proptest::collection::btree_set("[a-z]{3,10}", 1..6),
            proptest::option::of(arb_priority()),
            proptest::option::of(arb_routing_decision()),
            proptest::option::of(5u32..600),
        )
            .prop_map(|(name, category, keywords, priority, routing, minutes)| {
                let mut pattern = ProblemPattern::new(name, category);
                for keyword in keywords {
                    pattern = pattern.with_keyword(keyword);
                }
                if let Some(p) = priority {
                    pattern = pattern.with_default_priority(p);
                }
                if let Some(r) = routing {
                    pattern = pattern.with_default_routing(r);
                }
                if let Some(m) = minutes {
                    pattern = pattern.with_expected_resolution_minutes(m);
                }
                pattern
            })
    }

    /// Generate a valid open Ticket with in-range signals.
    pub fn arb_ticket() -> impl Strategy<Value = Ticket> {
        (
            "[A-Za-z][A-Za-z ]{0,39}",
            "[A-Za-z ]{0,200}",
            arb_channel(),
            arb_signal_scores(),
            arb_priority(),
        )
            .prop_map(|(subject, content, channel, signals, priority)| {
                Ticket::new(subject, content, new_entity_id(), channel)
                    .with_signals(signals)
                    .with_priority(priority)
            })
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built fixtures for common triage scenarios.

    use super::*;

    /// The built-in validated configuration.
    pub fn config() -> TriageConfig {
        TriageConfig::default_config()
    }

    /// Billing pattern matched by card/payment complaints.
    pub fn payment_pattern() -> ProblemPattern {
        ProblemPattern::new("payment_failure", "billing")
            .with_keyword("payment")
            .with_keyword("card")
            .with_keyword("declined")
            .with_keyword("charge")
            .with_default_priority(Priority::Medium)
            .with_expected_resolution_minutes(45)
    }

    /// Automation-eligible account pattern.
    pub fn reset_pattern() -> ProblemPattern {
        ProblemPattern::new("password_reset", "account")
            .with_keyword("password")
            .with_keyword("reset")
            .with_keyword("login")
            .with_default_routing(RoutingDecision::BotAutomation)
            .with_expected_resolution_minutes(5)
    }

    /// High-floor infrastructure pattern.
    pub fn outage_pattern() -> ProblemPattern {
        ProblemPattern::new("service_outage", "infrastructure")
            .with_keyword("outage")
            .with_keyword("down")
            .with_keyword("unreachable")
            .with_default_priority(Priority::Critical)
    }

    /// A billing specialist with spare capacity.
    pub fn billing_agent() -> Agent {
        Agent::new("Rivera", 3)
            .with_specialty("billing")
            .with_specialty("payment_failure")
            .with_rating(4.6)
    }

    /// A generalist covering the default category.
    pub fn generalist_agent() -> Agent {
        Agent::new("Okafor", 5).with_specialty("general").with_rating(3.9)
    }

    /// A standard-tier customer.
    pub fn standard_customer() -> Customer {
        Customer::new("Acme Widgets", CustomerTier::Standard)
    }

    /// An enterprise-tier customer that receives the priority boost.
    pub fn enterprise_customer() -> Customer {
        Customer::new("Globex", CustomerTier::Enterprise)
    }

    /// An angry, urgent outage report.
    pub fn outage_text() -> (&'static str, &'static str) {
        (
            "Production outage",
            "Everything is down and unreachable, this is urgent and a terrible failure",
        )
    }

    /// A calm, low-signal request.
    pub fn calm_text() -> (&'static str, &'static str) {
        ("Invoice copy", "Send over a copy of last month's invoice")
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_fixture_patterns_validate() {
        assert!(fixtures::payment_pattern().validate().is_ok());
        assert!(fixtures::reset_pattern().validate().is_ok());
        assert!(fixtures::outage_pattern().validate().is_ok());
    }

    #[test]
    fn test_fixture_agents_validate() {
        assert!(fixtures::billing_agent().validate().is_ok());
        assert!(fixtures::generalist_agent().validate().is_ok());
    }

    #[test]
    fn test_fixture_config_validates() {
        assert!(fixtures::config().validate().is_ok());
    }

    proptest! {
        #[test]
        fn prop_generated_agents_validate(agent in generators::arb_agent()) {
            prop_assert!(agent.validate().is_ok());
        }

        #[test]
        fn prop_generated_patterns_validate(pattern in generators::arb_problem_pattern()) {
            prop_assert!(pattern.validate().is_ok());
        }

        #[test]
        fn prop_generated_scores_validate(scores in generators::arb_signal_scores()) {
            prop_assert!(scores.validate().is_ok());
        }

        #[test]
        fn prop_generated_tickets_validate(ticket in generators::arb_ticket()) {
            prop_assert!(ticket.validate().is_ok());
        }
    }
}
