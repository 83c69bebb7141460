//! TriageDesk facade
//!
//! Owns the composed pipeline and every directory the pipeline reads:
//! signal extraction, pattern matching, classification, routing, lifecycle
//! tracking, the agent registry, the customer directory, and the ticket
//! store. `submit` is the single entry point that runs a raw request all the
//! way to a stored, routed, explainable outcome.
//!
//! Pattern registration swaps in a fresh matcher snapshot; in-flight
//! submissions keep the snapshot they started with.

use crate::classifier::PriorityClassifier;
use crate::escalation::EscalationTracker;
use crate::patterns::{PatternMatcher, PatternTable};
use crate::registry::{AgentRegistry, AgentUtilization};
use crate::routing::RoutingEngine;
use crate::signals::SignalExtractor;
use crate::store::{DashboardCounts, TicketStore};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use triage_core::{
    Agent, AgentId, Channel, Customer, CustomerError, CustomerId, EscalationSource,
    LifecycleError, PatternError, Priority, ProblemPattern, RoutingRecommendation, StoreError,
    Ticket, TicketId, TicketState, TriageConfig, TriageResult,
};

/// The composed triage pipeline behind one surface.
#[derive(Debug)]
pub struct TriageDesk {
    extractor: SignalExtractor,
    classifier: PriorityClassifier,
    routing: RoutingEngine,
    tracker: EscalationTracker,
    registry: AgentRegistry,
    store: TicketStore,
    patterns: Mutex<PatternTable>,
    matcher: RwLock<Arc<PatternMatcher>>,
    customers: RwLock<HashMap<CustomerId, Customer>>,
    min_match_score: f32,
}

impl TriageDesk {
    /// Build a desk from a configuration, validating it first.
    ///
    /// No ticket is processed through an invalid configuration.
    pub fn new(config: TriageConfig) -> TriageResult<Self> {
        config.validate()?;
        let min_match_score = config.routing.min_match_score;
        let table = PatternTable::new();
        let matcher = Arc::new(table.matcher(min_match_score));
        Ok(Self {
            extractor: SignalExtractor::new(&config),
            classifier: PriorityClassifier::new(&config),
            routing: RoutingEngine::new(&config),
            tracker: EscalationTracker::new(),
            registry: AgentRegistry::new(),
            store: TicketStore::new(),
            patterns: Mutex::new(table),
            matcher: RwLock::new(matcher),
            customers: RwLock::new(HashMap::new()),
            min_match_score,
        })
    }

    /// Build a desk over the built-in default configuration.
    pub fn with_defaults() -> TriageResult<Self> {
        Self::new(TriageConfig::default_config())
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    /// Register an agent.
    pub fn register_agent(&self, agent: Agent) -> TriageResult<()> {
        self.registry.register(agent)
    }

    /// Register a customer, rejecting duplicates.
    pub fn register_customer(&self, customer: Customer) -> TriageResult<()> {
        customer.validate()?;
        let mut customers = self
            .customers
            .write()
            .map_err(|_| CustomerError::LockPoisoned)?;
        if customers.contains_key(&customer.customer_id) {
            return Err(CustomerError::DuplicateCustomer {
                customer_id: customer.customer_id,
            }
            .into());
        }
        tracing::debug!(customer = %customer.name, tier = %customer.tier, "customer registered");
        customers.insert(customer.customer_id, customer);
        Ok(())
    }

    /// Register a problem pattern and swap in a fresh matcher snapshot.
    pub fn register_pattern(&self, pattern: ProblemPattern) -> TriageResult<()> {
        let mut table = self.patterns.lock().map_err(|_| PatternError::LockPoisoned)?;
        table.register(pattern)?;
        let snapshot = Arc::new(table.matcher(self.min_match_score));
        let mut matcher = self.matcher.write().map_err(|_| PatternError::LockPoisoned)?;
        *matcher = snapshot;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Submission
    // ------------------------------------------------------------------

    /// Run a raw support request through the full pipeline.
    ///
    /// Rejects submissions from unregistered customers; callers register
    /// customers first.
    pub fn submit(
        &self,
        subject: impl Into<String>,
        content: impl Into<String>,
        customer_id: CustomerId,
        channel: Channel,
    ) -> TriageResult<(Ticket, RoutingRecommendation)> {
        let tier = {
            let customers = self
                .customers
                .read()
                .map_err(|_| CustomerError::LockPoisoned)?;
            customers
                .get(&customer_id)
                .map(|c| c.tier)
                .ok_or(CustomerError::UnknownCustomer { customer_id })?
        };

        let subject = subject.into();
        let content = content.into();
        let signals = self.extractor.extract(&subject, &content, channel);

        let matcher = self.matcher()?;
        let matched = matcher.best_match(&signals.keywords);
        let floor = matched.as_ref().and_then(|m| m.pattern.default_priority);
        let priority = self.classifier.classify(&signals, tier, floor);

        let mut ticket = Ticket::new(subject, content, customer_id, channel)
            .with_signals(signals)
            .with_priority(priority);
        if let Some(m) = &matched {
            ticket = ticket.with_category(m.pattern.category.clone());
        }
        ticket.validate()?;

        let ticket_id = ticket.ticket_id;
        let recommendation = self.routing.route(&ticket, matched.as_ref(), &self.registry)?;
        self.store.insert(ticket)?;

        {
            let handle = self.store.get(ticket_id)?;
            let mut guard = handle
                .lock()
                .map_err(|_| StoreError::LockPoisoned)?;
            guard.assigned_agent_id = recommendation.target.agent_id();
            self.tracker.mark_routed(&mut guard)?;
            // critical tickets escalate automatically, whatever the decision
            if priority == Priority::Critical {
                self.tracker.escalate(
                    &mut guard,
                    "critical priority escalation",
                    EscalationSource::System,
                )?;
            }
        }

        self.store.record_recommendation(recommendation.clone())?;
        {
            let mut customers = self
                .customers
                .write()
                .map_err(|_| CustomerError::LockPoisoned)?;
            if let Some(customer) = customers.get_mut(&customer_id) {
                customer.history_count += 1;
            }
        }

        tracing::info!(
            ticket_id = %ticket_id,
            priority = %priority,
            decision = %recommendation.decision,
            "submission triaged"
        );
        Ok((self.store.snapshot(ticket_id)?, recommendation))
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Manually escalate a ticket, recording the reason.
    pub fn escalate(&self, ticket_id: TicketId, reason: impl Into<String>) -> TriageResult<Ticket> {
        let handle = self.store.get(ticket_id)?;
        let mut guard = handle
            .lock()
            .map_err(|_| StoreError::LockPoisoned)?;
        self.tracker
            .escalate(&mut guard, reason, EscalationSource::Manual)?;
        Ok(guard.clone())
    }

    /// Resolve a ticket, releasing any capacity reserved for it.
    pub fn resolve(&self, ticket_id: TicketId) -> TriageResult<Ticket> {
        let handle = self.store.get(ticket_id)?;
        let mut guard = handle
            .lock()
            .map_err(|_| StoreError::LockPoisoned)?;
        self.tracker.resolve(&mut guard)?;
        if let Some(agent_id) = guard.assigned_agent_id.take() {
            self.registry.release(agent_id)?;
        }
        Ok(guard.clone())
    }

    /// Release one unit of capacity reserved on an agent.
    ///
    /// Caller-side rollback for an abandoned recommendation; nothing else
    /// hands capacity back automatically.
    pub fn release_assignment(&self, agent_id: AgentId) -> TriageResult<()> {
        self.registry.release(agent_id)
    }

    /// Re-route a stored ticket, producing a new recommendation record.
    ///
    /// The prior agent assignment is released first. Resolved tickets
    /// cannot be re-routed.
    pub fn reroute(&self, ticket_id: TicketId) -> TriageResult<RoutingRecommendation> {
        let handle = self.store.get(ticket_id)?;
        let mut guard = handle
            .lock()
            .map_err(|_| StoreError::LockPoisoned)?;
        if guard.state == TicketState::Resolved {
            return Err(LifecycleError::InvalidTransition {
                ticket_id,
                from: TicketState::Resolved,
                to: TicketState::Routed,
            }
            .into());
        }
        if let Some(agent_id) = guard.assigned_agent_id.take() {
            self.registry.release(agent_id)?;
        }

        let matcher = self.matcher()?;
        let matched = matcher.best_match(&guard.keywords);
        let recommendation = self.routing.route(&guard, matched.as_ref(), &self.registry)?;
        guard.assigned_agent_id = recommendation.target.agent_id();
        guard.touch();
        drop(guard);

        self.store.record_recommendation(recommendation.clone())?;
        tracing::info!(
            ticket_id = %ticket_id,
            decision = %recommendation.decision,
            "ticket re-routed"
        );
        Ok(recommendation)
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Snapshot of a stored ticket.
    pub fn ticket(&self, ticket_id: TicketId) -> TriageResult<Ticket> {
        self.store.snapshot(ticket_id)
    }

    /// All recommendations recorded for a ticket, oldest first.
    pub fn recommendations_for(
        &self,
        ticket_id: TicketId,
    ) -> TriageResult<Vec<RoutingRecommendation>> {
        self.store.recommendations_for(ticket_id)
    }

    /// Snapshot of a registered customer.
    pub fn customer(&self, customer_id: CustomerId) -> TriageResult<Customer> {
        let customers = self
            .customers
            .read()
            .map_err(|_| CustomerError::LockPoisoned)?;
        customers
            .get(&customer_id)
            .cloned()
            .ok_or_else(|| CustomerError::UnknownCustomer { customer_id }.into())
    }

    /// Aggregate dashboard counts across all tickets.
    pub fn dashboard(&self) -> TriageResult<DashboardCounts> {
        self.store.dashboard()
    }

    /// Per-agent load snapshot.
    pub fn agent_utilization(&self) -> TriageResult<Vec<AgentUtilization>> {
        self.registry.utilization()
    }

    fn matcher(&self) -> TriageResult<Arc<PatternMatcher>> {
        Ok(self
            .matcher
            .read()
            .map_err(|_| PatternError::LockPoisoned)?
            .clone())
    }
}

// =============================================================================
// TESTS
// =============================================================================
