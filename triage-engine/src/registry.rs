//! Agent registry and capacity accounting
//!
//! Holds registered agents together with their live load counters. Load is
//! an `AtomicU32` per agent so reservation is a lock-free compare-and-swap;
//! the registry map lock is only taken to look slots up, never held across
//! a reservation. Reserve-then-fail paths release the counter, so the load
//! never exceeds `max_capacity` and never underflows.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, RwLock};
use triage_core::{Agent, AgentId, RegistryError, TriageResult};

/// An agent plus its live load counter.
#[derive(Debug)]
struct AgentSlot {
    agent: Agent,
    load: AtomicU32,
}

/// A ranked candidate returned by a registry query.
///
/// Snapshot of the agent at query time; the load may have moved by the time
/// a reservation is attempted, which is why `reserve` re-checks atomically.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateAgent {
    pub agent_id: AgentId,
    pub name: String,
    pub satisfaction_rating: f32,
    pub load: u32,
    pub max_capacity: u32,
}

impl CandidateAgent {
    /// Current load as a fraction of capacity, in [0, 1].
    pub fn load_ratio(&self) -> f32 {
        self.load as f32 / self.max_capacity as f32
    }
}

/// Point-in-time load snapshot for dashboards.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentUtilization {
    pub agent_id: AgentId,
    pub name: String,
    pub load: u32,
    pub max_capacity: u32,
}

/// Registry of agents with atomic per-agent capacity reservation.
#[derive(Debug, Default)]
pub struct AgentRegistry {
    slots: RwLock<HashMap<AgentId, Arc<AgentSlot>>>,
}

impl AgentRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an agent, validating it and rejecting duplicate IDs.
    pub fn register(&self, agent: Agent) -> TriageResult<()> {
        agent.validate()?;
        let mut slots = self.slots.write().map_err(|_| RegistryError::LockPoisoned)?;
        if slots.contains_key(&agent.agent_id) {
            return Err(RegistryError::DuplicateAgent {
                agent_id: agent.agent_id,
            }
            .into());
        }
        tracing::debug!(
            agent = %agent.name,
            capacity = agent.max_capacity,
            specialties = ?agent.specialties,
            "agent registered"
        );
        slots.insert(
            agent.agent_id,
            Arc::new(AgentSlot {
                agent,
                load: AtomicU32::new(0),
            }),
        );
        Ok(())
    }

    /// Number of registered agents.
    pub fn len(&self) -> usize {
        self.slots.read().map(|s| s.len()).unwrap_or(0)
    }

    /// Check whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Agents covering any of the requirements, with spare capacity, ranked.
    ///
    /// Ranking is load ratio ascending, then satisfaction rating descending,
    /// then agent ID ascending so the order is total and deterministic.
    pub fn candidates(&self, requirements: &[&str]) -> TriageResult<Vec<CandidateAgent>> {
        let slots = self.slots.read().map_err(|_| RegistryError::LockPoisoned)?;
        let mut candidates: Vec<CandidateAgent> = slots
            .values()
            .filter(|slot| slot.agent.covers(requirements))
            .filter_map(|slot| {
                let load = slot.load.load(Ordering::Acquire);
                if load >= slot.agent.max_capacity {
                    return None;
                }
                Some(CandidateAgent {
                    agent_id: slot.agent.agent_id,
                    name: slot.agent.name.clone(),
                    satisfaction_rating: slot.agent.satisfaction_rating,
                    load,
                    max_capacity: slot.agent.max_capacity,
                })
            })
            .collect();

        candidates.sort_by(|a, b| {
            a.load_ratio()
                .total_cmp(&b.load_ratio())
                .then(b.satisfaction_rating.total_cmp(&a.satisfaction_rating))
                .then(a.agent_id.cmp(&b.agent_id))
        });
        Ok(candidates)
    }

    /// Reserve one unit of capacity on an agent.
    ///
    /// The increment is a compare-and-swap loop, so concurrent reservations
    /// against the last free unit produce exactly one success.
    pub fn reserve(&self, agent_id: AgentId) -> TriageResult<()> {
        let slot = self.slot(agent_id)?;
        slot.load
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |load| {
                if load < slot.agent.max_capacity {
                    Some(load + 1)
                } else {
                    None
                }
            })
            .map_err(|_| RegistryError::CapacityExceeded {
                agent_id,
                max_capacity: slot.agent.max_capacity,
            })?;
        tracing::debug!(agent = %slot.agent.name, "capacity reserved");
        Ok(())
    }

    /// Release one unit of capacity on an agent.
    pub fn release(&self, agent_id: AgentId) -> TriageResult<()> {
        let slot = self.slot(agent_id)?;
        slot.load
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |load| {
                load.checked_sub(1)
            })
            .map_err(|_| RegistryError::InvalidRelease { agent_id })?;
        tracing::debug!(agent = %slot.agent.name, "capacity released");
        Ok(())
    }

    /// Current load for an agent.
    pub fn current_load(&self, agent_id: AgentId) -> TriageResult<u32> {
        Ok(self.slot(agent_id)?.load.load(Ordering::Acquire))
    }

    /// Load snapshot for every registered agent, ordered by name.
    pub fn utilization(&self) -> TriageResult<Vec<AgentUtilization>> {
        let slots = self.slots.read().map_err(|_| RegistryError::LockPoisoned)?;
        let mut report: Vec<AgentUtilization> = slots
            .values()
            .map(|slot| AgentUtilization {
                agent_id: slot.agent.agent_id,
                name: slot.agent.name.clone(),
                load: slot.load.load(Ordering::Acquire),
                max_capacity: slot.agent.max_capacity,
            })
            .collect();
        report.sort_by(|a, b| a.name.cmp(&b.name).then(a.agent_id.cmp(&b.agent_id)));
        Ok(report)
    }

    fn slot(&self, agent_id: AgentId) -> TriageResult<Arc<AgentSlot>> {
        let slots = self.slots.read().map_err(|_| RegistryError::LockPoisoned)?;
        slots
            .get(&agent_id)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownAgent { agent_id }.into())
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
        fn prop_load_never_exceeds_capacity(
            capacity in 1u32..8,
            attempts in 0usize..24,
        ) {
            let registry = AgentRegistry::new();
            let agent = Agent::new("a", capacity).with_specialty("x");
            let id = agent.agent_id;
            registry.register(agent).unwrap();

            for _ in 0..attempts {
                let _ = registry.reserve(id);
            }
            let load = registry.current_load(id).unwrap();
            prop_assert!(load <= capacity);
            prop_assert_eq!(load, (attempts as u32).min(capacity));
        }

        #[test]
        fn prop_reserve_release_is_balanced(ops in proptest::collection::vec(any::<bool>(), 0..32)) {
            let registry = AgentRegistry::new();
            let agent = Agent::new("a", 4).with_specialty("x");
            let id = agent.agent_id;
            registry.register(agent).unwrap();

            let mut expected: u32 = 0;
            for reserve in ops {
                if reserve {
                    if registry.reserve(id).is_ok() {
                        expected += 1;
                    }
                } else if registry.release(id).is_ok() {
                    expected -= 1;
                }
            }
            prop_assert_eq!(registry.current_load(id).unwrap(), expected);
        }
    }
}
