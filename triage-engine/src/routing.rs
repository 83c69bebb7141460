//! Capacity-aware routing
//!
//! Turns a classified ticket plus an optional pattern match into a
//! `RoutingRecommendation`. Rules fire in a fixed order:
//!
//! 1. Critical tickets escalate to the configured queue, unless a matched
//!    pattern declares automation at or above the automation threshold
//! 2. Automation-eligible patterns route to the bot responder
//! 3. Otherwise the best-ranked specialist with spare capacity is reserved
//! 4. With no reservable specialist, the ticket escalates
//!
//! Capacity is reserved before the recommendation is returned. When every
//! candidate reservation races away, the ranking is re-queried once and
//! walked again before giving up.

use crate::patterns::PatternMatch;
use crate::registry::{AgentRegistry, CandidateAgent};
use triage_core::{
    AlternativeRoute, Priority, RoutingConfig, RoutingDecision, RoutingRecommendation,
    RoutingTarget, Ticket, TriageConfig, TriageResult,
};

/// Confidence reported when routing falls back to escalation for lack of a
/// reservable specialist.
const FALLBACK_CONFIDENCE: f32 = 0.5;

/// Pattern strength assumed when no pattern matched.
const NEUTRAL_PATTERN_STRENGTH: f32 = 0.5;

/// Picks a routing destination and reserves specialist capacity.
#[derive(Debug, Clone)]
pub struct RoutingEngine {
    config: RoutingConfig,
}

impl RoutingEngine {
    /// Build a routing engine from a validated configuration.
    pub fn new(config: &TriageConfig) -> Self {
        Self {
            config: config.routing.clone(),
        }
    }

    /// Route a ticket, reserving agent capacity when a specialist is chosen.
    pub fn route(
        &self,
        ticket: &Ticket,
        pattern: Option<&PatternMatch<'_>>,
        registry: &AgentRegistry,
    ) -> TriageResult<RoutingRecommendation> {
        let automation = pattern.filter(|m| {
            m.pattern.default_routing == Some(RoutingDecision::BotAutomation)
                && m.score >= self.config.automation_match_threshold
        });

        if ticket.priority == Priority::Critical && automation.is_none() {
            return self.escalate_critical(ticket, pattern);
        }
        if let Some(m) = automation {
            return self.route_to_automation(ticket, m);
        }
        self.route_to_specialist(ticket, pattern, registry)
    }

    fn escalate_critical(
        &self,
        ticket: &Ticket,
        pattern: Option<&PatternMatch<'_>>,
    ) -> TriageResult<RoutingRecommendation> {
        let queue = self.config.escalation_queue.clone();
        tracing::info!(ticket_id = %ticket.ticket_id, queue = %queue, "critical ticket escalated");

        let mut rec = RoutingRecommendation::new(
            ticket.ticket_id,
            RoutingDecision::Escalate,
            RoutingTarget::Queue(queue.clone()),
            self.config.critical_escalation_confidence,
            self.estimated_minutes(ticket, pattern),
        )
        .with_reason(format!(
            "critical priority routed to escalation queue '{}'",
            queue
        ));
        if let Some(m) = pattern {
            rec = rec.with_reason(format!(
                "pattern '{}' matched at score {:.2}",
                m.pattern.name, m.score
            ));
        }
        rec.validate()?;
        Ok(rec)
    }

    fn route_to_automation(
        &self,
        ticket: &Ticket,
        m: &PatternMatch<'_>,
    ) -> TriageResult<RoutingRecommendation> {
        tracing::info!(
            ticket_id = %ticket.ticket_id,
            pattern = %m.pattern.name,
            score = m.score,
            "ticket routed to automation"
        );

        let rec = RoutingRecommendation::new(
            ticket.ticket_id,
            RoutingDecision::BotAutomation,
            RoutingTarget::Automation(m.pattern.name.clone()),
            m.score.clamp(0.0, 1.0),
            self.estimated_minutes(ticket, Some(m)),
        )
        .with_reason(format!(
            "pattern '{}' declares automation and matched at score {:.2}",
            m.pattern.name, m.score
        ));
        rec.validate()?;
        Ok(rec)
    }

    fn route_to_specialist(
        &self,
        ticket: &Ticket,
        pattern: Option<&PatternMatch<'_>>,
        registry: &AgentRegistry,
    ) -> TriageResult<RoutingRecommendation> {
        let mut requirements: Vec<&str> = vec![ticket.category.as_str()];
        if let Some(m) = pattern {
            requirements.push(m.pattern.name.as_str());
        }

        // two passes: a reservation can race away between query and reserve,
        // so a fully-failed walk re-queries the ranking once
        for attempt in 0..2 {
            let candidates = registry.candidates(&requirements)?;
            if candidates.is_empty() {
                break;
            }
            for (idx, candidate) in candidates.iter().enumerate() {
                if registry.reserve(candidate.agent_id).is_err() {
                    continue;
                }
                if attempt > 0 {
                    tracing::debug!(
                        ticket_id = %ticket.ticket_id,
                        "specialist reserved on re-queried ranking"
                    );
                }
                return self.specialist_recommendation(
                    ticket,
                    pattern,
                    candidate,
                    &candidates[idx + 1..],
                );
            }
        }

        tracing::warn!(
            ticket_id = %ticket.ticket_id,
            category = %ticket.category,
            "no reservable specialist, escalating"
        );
        let rec = RoutingRecommendation::new(
            ticket.ticket_id,
            RoutingDecision::Escalate,
            RoutingTarget::Queue(self.config.escalation_queue.clone()),
            FALLBACK_CONFIDENCE,
            self.estimated_minutes(ticket, pattern),
        )
        .with_reason(format!(
            "no available specialist for category '{}'",
            ticket.category
        ));
        rec.validate()?;
        Ok(rec)
    }

    fn specialist_recommendation(
        &self,
        ticket: &Ticket,
        pattern: Option<&PatternMatch<'_>>,
        chosen: &CandidateAgent,
        runners_up: &[CandidateAgent],
    ) -> TriageResult<RoutingRecommendation> {
        tracing::info!(
            ticket_id = %ticket.ticket_id,
            agent = %chosen.name,
            load = chosen.load,
            capacity = chosen.max_capacity,
            "ticket assigned to specialist"
        );

        let alternatives: Vec<AlternativeRoute> = runners_up
            .iter()
            .take(2)
            .map(|c| AlternativeRoute {
                decision: RoutingDecision::HumanSpecialist,
                target: RoutingTarget::Agent(c.agent_id),
                confidence: self.specialist_confidence(ticket, pattern, c),
            })
            .collect();

        let mut rec = RoutingRecommendation::new(
            ticket.ticket_id,
            RoutingDecision::HumanSpecialist,
            RoutingTarget::Agent(chosen.agent_id),
            self.specialist_confidence(ticket, pattern, chosen),
            self.estimated_minutes(ticket, pattern),
        )
        .with_reason(format!(
            "assigned specialist '{}' at load {}/{}",
            chosen.name, chosen.load, chosen.max_capacity
        ))
        .with_alternatives(alternatives);
        if let Some(m) = pattern {
            rec = rec.with_reason(format!(
                "pattern '{}' matched at score {:.2}",
                m.pattern.name, m.score
            ));
        }
        rec.validate()?;
        Ok(rec)
    }

    /// Pattern strength, agent headroom, and signal strength blended 40/40/20.
    fn specialist_confidence(
        &self,
        ticket: &Ticket,
        pattern: Option<&PatternMatch<'_>>,
        candidate: &CandidateAgent,
    ) -> f32 {
        let pattern_strength = pattern.map_or(NEUTRAL_PATTERN_STRENGTH, |m| m.score);
        let headroom = 1.0 - candidate.load_ratio();
        let signal_strength = (ticket.urgency_score + ticket.sentiment_score.abs()) / 2.0;
        (0.4 * pattern_strength + 0.4 * headroom + 0.2 * signal_strength).clamp(0.0, 1.0)
    }

    /// Expected resolution time scaled by complexity and clamped to the
    /// configured band.
    fn estimated_minutes(&self, ticket: &Ticket, pattern: Option<&PatternMatch<'_>>) -> u32 {
        let r = &self.config.resolution;
        let base = pattern
            .and_then(|m| m.pattern.expected_resolution_minutes)
            .unwrap_or(match ticket.priority {
                Priority::Critical => r.critical_minutes,
                Priority::High => r.high_minutes,
                Priority::Medium => r.medium_minutes,
                Priority::Low => r.low_minutes,
            });
        let scaled = base as f32 * (1.0 + ticket.complexity_score * r.complexity_scale);
        (scaled.round() as u32).clamp(r.floor_minutes, r.ceiling_minutes)
    }
}

// =============================================================================
// TESTS
// =============================================================================


// =============================================================================
// PROPERTY TESTS
// =============================================================================
