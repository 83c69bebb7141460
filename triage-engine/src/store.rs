//! In-memory ticket and recommendation store
//!
//! Tickets live behind a per-ticket `Mutex` inside a shared map, so lifecycle
//! transitions on one ticket serialize without blocking reads or writes on
//! others. A content-hash index links duplicate submissions at insert time.
//! Recommendations are append-only per ticket; re-routing adds a record, it
//! never rewrites one.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use triage_core::{
    ContentHash, Priority, RoutingRecommendation, StoreError, Ticket, TicketId, TicketState,
    TriageResult,
};

/// Aggregate counts for the dashboard read surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardCounts {
    pub open: usize,
    pub escalated: usize,
    pub resolved: usize,
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

/// Shared in-memory store for tickets and their routing records.
#[derive(Debug, Default)]
pub struct TicketStore {
    tickets: RwLock<HashMap<TicketId, Arc<Mutex<Ticket>>>>,
    by_hash: RwLock<HashMap<ContentHash, Vec<TicketId>>>,
    recommendations: RwLock<HashMap<TicketId, Vec<RoutingRecommendation>>>,
}

impl TicketStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a ticket, linking earlier tickets with identical content.
    ///
    /// Returns the IDs that were linked onto the ticket.
    pub fn insert(&self, mut ticket: Ticket) -> TriageResult<Vec<TicketId>> {
        let ticket_id = ticket.ticket_id;
        let hash = ticket.content_hash;

        let mut tickets = self.tickets.write().map_err(|_| StoreError::LockPoisoned)?;
        if tickets.contains_key(&ticket_id) {
            return Err(StoreError::DuplicateTicket { ticket_id }.into());
        }

        let mut by_hash = self.by_hash.write().map_err(|_| StoreError::LockPoisoned)?;
        let priors = by_hash.entry(hash).or_default();
        ticket.related_ticket_ids = priors.clone();
        let related = ticket.related_ticket_ids.clone();
        priors.push(ticket_id);

        if !related.is_empty() {
            tracing::debug!(
                ticket_id = %ticket_id,
                related = related.len(),
                "duplicate content linked"
            );
        }
        tickets.insert(ticket_id, Arc::new(Mutex::new(ticket)));
        Ok(related)
    }

    /// Handle to a stored ticket for locked mutation.
    pub fn get(&self, ticket_id: TicketId) -> TriageResult<Arc<Mutex<Ticket>>> {
        let tickets = self.tickets.read().map_err(|_| StoreError::LockPoisoned)?;
        tickets
            .get(&ticket_id)
            .cloned()
            .ok_or_else(|| StoreError::TicketNotFound { ticket_id }.into())
    }

    /// Cloned snapshot of a stored ticket.
    pub fn snapshot(&self, ticket_id: TicketId) -> TriageResult<Ticket> {
        let handle = self.get(ticket_id)?;
        let guard = handle.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(guard.clone())
    }

    /// Number of stored tickets.
    pub fn len(&self) -> usize {
        self.tickets.read().map(|t| t.len()).unwrap_or(0)
    }

    /// Check whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append a routing recommendation for a ticket.
    pub fn record_recommendation(&self, rec: RoutingRecommendation) -> TriageResult<()> {
        {
            let tickets = self.tickets.read().map_err(|_| StoreError::LockPoisoned)?;
            if !tickets.contains_key(&rec.ticket_id) {
                return Err(StoreError::TicketNotFound {
                    ticket_id: rec.ticket_id,
                }
                .into());
            }
        }
        let mut recs = self
            .recommendations
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;
        recs.entry(rec.ticket_id).or_default().push(rec);
        Ok(())
    }

    /// All recommendations recorded for a ticket, oldest first.
    pub fn recommendations_for(&self, ticket_id: TicketId) -> TriageResult<Vec<RoutingRecommendation>> {
        {
            let tickets = self.tickets.read().map_err(|_| StoreError::LockPoisoned)?;
            if !tickets.contains_key(&ticket_id) {
                return Err(StoreError::TicketNotFound { ticket_id }.into());
            }
        }
        let recs = self
            .recommendations
            .read()
            .map_err(|_| StoreError::LockPoisoned)?;
        Ok(recs.get(&ticket_id).cloned().unwrap_or_default())
    }

    /// Aggregate state and priority counts across all tickets.
    pub fn dashboard(&self) -> TriageResult<DashboardCounts> {
        let tickets = self.tickets.read().map_err(|_| StoreError::LockPoisoned)?;
        let mut counts = DashboardCounts::default();
        for handle in tickets.values() {
            let ticket = handle.lock().map_err(|_| StoreError::LockPoisoned)?;
            match ticket.state {
                TicketState::Open | TicketState::Routed => counts.open += 1,
                TicketState::Escalated => counts.escalated += 1,
                TicketState::Resolved => counts.resolved += 1,
            }
            match ticket.priority {
                Priority::Critical => counts.critical += 1,
                Priority::High => counts.high += 1,
                Priority::Medium => counts.medium += 1,
                Priority::Low => counts.low += 1,
            }
        }
        Ok(counts)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use triage_core::{
        Channel, RoutingDecision, RoutingTarget, TriageError, new_entity_id,
    };

    fn ticket(content: &str) -> Ticket {
        Ticket::new("subject", content, new_entity_id(), Channel::Email)
    }

    fn recommendation(ticket_id: TicketId) -> RoutingRecommendation {
        RoutingRecommendation::new(
            ticket_id,
            RoutingDecision::Escalate,
            RoutingTarget::Queue("tier2-escalations".to_string()),
            0.9,
            30,
        )
        .with_reason("test")
    }

    #[test]
    fn test_insert_and_snapshot() {
        let store = TicketStore::new();
        let t = ticket("body");
        let id = t.ticket_id;
        let related = store.insert(t).unwrap();

        assert!(related.is_empty());
        assert_eq!(store.len(), 1);
        assert_eq!(store.snapshot(id).unwrap().ticket_id, id);
    }

    #[test]
    fn test_insert_rejects_duplicate_id() {
        let store = TicketStore::new();
        let t = ticket("body");
        store.insert(t.clone()).unwrap();
        let err = store.insert(t).unwrap_err();
        assert!(matches!(
            err,
            TriageError::Store(StoreError::DuplicateTicket { .. })
        ));
    }

    #[test]
    fn test_identical_content_is_linked() {
        let store = TicketStore::new();
        let first = ticket("my card was declined");
        let first_id = first.ticket_id;
        store.insert(first).unwrap();

        let second = ticket("my card was declined");
        let second_id = second.ticket_id;
        let related = store.insert(second).unwrap();

        assert_eq!(related, vec![first_id]);
        let snapshot = store.snapshot(second_id).unwrap();
        assert_eq!(snapshot.related_ticket_ids, vec![first_id]);
        // linking is one-way: the earlier ticket is not rewritten
        assert!(store.snapshot(first_id).unwrap().related_ticket_ids.is_empty());
    }

    #[test]
    fn test_different_content_is_not_linked() {
        let store = TicketStore::new();
        store.insert(ticket("first body")).unwrap();
        let related = store.insert(ticket("second body")).unwrap();
        assert!(related.is_empty());
    }

    #[test]
    fn test_get_unknown_ticket() {
        let store = TicketStore::new();
        let err = store.get(new_entity_id()).unwrap_err();
        assert!(matches!(
            err,
            TriageError::Store(StoreError::TicketNotFound { .. })
        ));
    }

    #[test]
    fn test_locked_mutation_is_visible_in_snapshot() {
        let store = TicketStore::new();
        let t = ticket("body");
        let id = t.ticket_id;
        store.insert(t).unwrap();

        {
            let handle = store.get(id).unwrap();
            let mut guard = handle.lock().unwrap();
            guard.priority = Priority::Critical;
        }
        assert_eq!(store.snapshot(id).unwrap().priority, Priority::Critical);
    }

    #[test]
    fn test_recommendations_append_in_order() {
        let store = TicketStore::new();
        let t = ticket("body");
        let id = t.ticket_id;
        store.insert(t).unwrap();

        let first = recommendation(id);
        let first_rec_id = first.recommendation_id;
        store.record_recommendation(first).unwrap();
        store.record_recommendation(recommendation(id)).unwrap();

        let recs = store.recommendations_for(id).unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].recommendation_id, first_rec_id);
    }

    #[test]
    fn test_recommendation_for_unknown_ticket_fails() {
        let store = TicketStore::new();
        let err = store.record_recommendation(recommendation(new_entity_id())).unwrap_err();
        assert!(matches!(
            err,
            TriageError::Store(StoreError::TicketNotFound { .. })
        ));
        assert!(store.recommendations_for(new_entity_id()).is_err());
    }

    #[test]
    fn test_dashboard_counts() {
        let store = TicketStore::new();

        let open = ticket("a").with_priority(Priority::Low);
        store.insert(open).unwrap();

        let escalated = ticket("b").with_priority(Priority::Critical);
        let escalated_id = escalated.ticket_id;
        store.insert(escalated).unwrap();
        {
            let handle = store.get(escalated_id).unwrap();
            let mut guard = handle.lock().unwrap();
            guard.state = TicketState::Escalated;
        }

        let resolved = ticket("c").with_priority(Priority::High);
        let resolved_id = resolved.ticket_id;
        store.insert(resolved).unwrap();
        {
            let handle = store.get(resolved_id).unwrap();
            let mut guard = handle.lock().unwrap();
            guard.state = TicketState::Resolved;
        }

        let counts = store.dashboard().unwrap();
        assert_eq!(counts.open, 1);
        assert_eq!(counts.escalated, 1);
        assert_eq!(counts.resolved, 1);
        assert_eq!(counts.critical, 1);
        assert_eq!(counts.high, 1);
        assert_eq!(counts.low, 1);
        assert_eq!(counts.medium, 0);
    }

    #[test]
    fn test_routed_counts_as_open() {
        let store = TicketStore::new();
        let t = ticket("a");
        let id = t.ticket_id;
        store.insert(t).unwrap();
        {
            let handle = store.get(id).unwrap();
            handle.lock().unwrap().state = TicketState::Routed;
        }
        assert_eq!(store.dashboard().unwrap().open, 1);
    }
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================
