//! Ticket lifecycle state machine
//!
//! Stateless transition logic over a mutably borrowed ticket. Callers hold
//! the ticket's store lock across a transition, so each transition is
//! check-then-write without interleaving. Escalation reasons are append-only
//! and state never regresses.

use triage_core::{
    EscalationEvent, EscalationSource, LifecycleError, Ticket, TicketState, TriageResult,
};

/// Drives ticket state transitions and the escalation log.
#[derive(Debug, Clone, Default)]
pub struct EscalationTracker;

impl EscalationTracker {
    /// Create a tracker.
    pub fn new() -> Self {
        Self
    }

    /// Move a freshly routed ticket from Open to Routed.
    pub fn mark_routed(&self, ticket: &mut Ticket) -> TriageResult<()> {
        self.transition(ticket, TicketState::Routed)
    }

    /// Escalate a ticket, recording the reason.
    ///
    /// Valid from Routed and from Escalated; re-escalation appends another
    /// reason without changing state.
    pub fn escalate(
        &self,
        ticket: &mut Ticket,
        reason: impl Into<String>,
        source: EscalationSource,
    ) -> TriageResult<()> {
        self.transition(ticket, TicketState::Escalated)?;
        let event = EscalationEvent::new(reason, source);
        tracing::info!(
            ticket_id = %ticket.ticket_id,
            reason = %event.reason,
            source = %event.source,
            "ticket escalated"
        );
        ticket.escalation_reasons.push(event);
        Ok(())
    }

    /// Resolve a ticket. Terminal; no transition leaves Resolved.
    pub fn resolve(&self, ticket: &mut Ticket) -> TriageResult<()> {
        self.transition(ticket, TicketState::Resolved)?;
        tracing::info!(ticket_id = %ticket.ticket_id, "ticket resolved");
        Ok(())
    }

    fn transition(&self, ticket: &mut Ticket, next: TicketState) -> TriageResult<()> {
        if !ticket.state.can_transition_to(next) {
            return Err(LifecycleError::InvalidTransition {
                ticket_id: ticket.ticket_id,
                from: ticket.state,
                to: next,
            }
            .into());
        }
        tracing::debug!(
            ticket_id = %ticket.ticket_id,
            from = %ticket.state,
            to = %next,
            "state transition"
        );
        ticket.state = next;
        ticket.touch();
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================


// =============================================================================
// PROPERTY TESTS
// =============================================================================
