// SPDX-FileCopyrightText: 2026 Haku Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Organ routing.
//!
//! Maps a classification onto one of four organs and the engine that organ
//! is configured to use. Precedence, highest first:
//! 1. Privacy floor: tier 3 always goes to the local-only engine
//! 2. Validation work or tier >= 2 goes to Conscience
//! 3. Baseline task-class mapping

use haku_config::model::RoutingConfig;
use haku_core::{AgentDefinition, Mode, Organ, PrivacyTier, RoutingDecision, TaskClass};
use tracing::{debug, info};

/// Baseline organ for a task class, before overrides.
pub fn baseline_organ(task_class: TaskClass) -> Organ {
    match task_class {
        TaskClass::Observation => Organ::Senses,
        TaskClass::Strategy => Organ::Brain,
        TaskClass::Validation => Organ::Conscience,
        TaskClass::Execution | TaskClass::BuyerFacing => Organ::Hands,
    }
}

/// Organ after the Conscience override. Total over every input.
pub fn select_organ(task_class: TaskClass, tier: PrivacyTier) -> Organ {
    if task_class == TaskClass::Validation || tier >= PrivacyTier::Important {
        Organ::Conscience
    } else {
        baseline_organ(task_class)
    }
}

/// Routes classifications to engines.
#[derive(Debug, Clone)]
pub struct OrganRouter {
    config: RoutingConfig,
}

impl OrganRouter {
    pub fn new(config: RoutingConfig) -> Self {
        Self { config }
    }

    /// Engine configured for an organ.
    pub fn engine_for(&self, organ: Organ) -> &str {
        match organ {
            Organ::Senses => &self.config.senses,
            Organ::Brain => &self.config.brain,
            Organ::Conscience => &self.config.conscience,
            Organ::Hands => &self.config.hands,
        }
    }

    /// The only engine tier-3 queries may reach.
    pub fn local_engine(&self) -> &str {
        &self.config.local_engine
    }

    /// Route a classification triple.
    pub fn route(&self, task_class: TaskClass, mode: Mode, tier: PrivacyTier) -> RoutingDecision {
        let organ = select_organ(task_class, tier);
        let baseline = baseline_organ(task_class);

        let why = if tier >= PrivacyTier::Important && organ != baseline {
            format!("tier {tier} needs review, so {task_class} work goes to {organ}")
        } else {
            format!("{task_class} work in {mode} mode belongs to {organ}")
        };

        let decision = self.finish(organ, tier, why);
        info!(
            task_class = %task_class,
            mode = %mode,
            tier = tier.level(),
            organ = %decision.organ,
            engine = decision.engine_id.as_str(),
            local_only = decision.local_only,
            "routed query"
        );
        decision
    }

    /// Route to a pre-selected organ. The tier-3 floor still applies.
    pub fn route_fixed(&self, organ: Organ, tier: PrivacyTier) -> RoutingDecision {
        let decision = self.finish(organ, tier, format!("{organ} requested directly"));
        info!(
            tier = tier.level(),
            organ = %decision.organ,
            engine = decision.engine_id.as_str(),
            local_only = decision.local_only,
            "routed query to fixed organ"
        );
        decision
    }

    /// Redirect a decision to a custom agent's engine.
    ///
    /// Returns the decision unchanged when the privacy floor fired or the
    /// agent targets a different organ.
    pub fn apply_agent(&self, decision: RoutingDecision, agent: &AgentDefinition) -> RoutingDecision {
        if decision.local_only || agent.organ != decision.organ {
            debug!(
                agent = agent.name.as_str(),
                organ = %decision.organ,
                local_only = decision.local_only,
                "agent definition not applied"
            );
            return decision;
        }
        info!(
            agent = agent.name.as_str(),
            organ = %decision.organ,
            engine = agent.engine.as_str(),
            "agent definition overrides engine"
        );
        RoutingDecision {
            rationale: format!(
                "{}; agent `{}` ({}) supplies engine {}",
                decision.rationale, agent.name, agent.scope, agent.engine
            ),
            engine_id: agent.engine.clone(),
            agent: Some(agent.name.clone()),
            ..decision
        }
    }

    fn finish(&self, organ: Organ, tier: PrivacyTier, why: String) -> RoutingDecision {
        if tier.is_local_only() {
            RoutingDecision {
                organ,
                engine_id: self.config.local_engine.clone(),
                rationale: format!("tier {tier} content stays local; {why}"),
                local_only: true,
                agent: None,
            }
        } else {
            RoutingDecision {
                organ,
                engine_id: self.engine_for(organ).to_string(),
                rationale: why,
                local_only: false,
                agent: None,
            }
        }
    }
}
