// SPDX-FileCopyrightText: 2026 Haku Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query classification and organ routing for Haku.
//!
//! This crate provides:
//! - [`TaskClassifier`]: ordered phrase rules to a task class
//! - [`ModeDetector`]: ordered rules to an operating mode, with a task-class prior
//! - [`PrivacyClassifier`]: keyword and pattern sensitivity tiers
//! - [`OrganRouter`]: classification to organ and engine, with the tier-3 floor
//! - [`QueryRouter`]: all of the above compiled once from a [`HakuConfig`]
//!
//! Everything here is a pure function of configuration and input.

pub mod classifier;
pub mod mode;
pub mod privacy;
pub mod router;

pub use classifier::TaskClassifier;
pub use mode::ModeDetector;
pub use privacy::PrivacyClassifier;
pub use router::{OrganRouter, baseline_organ, select_organ};

use haku_config::HakuConfig;
use haku_core::{ClassificationResult, HakuError, Organ, Query, RoutingDecision};

/// The three classifiers and the router, compiled from one config snapshot.
#[derive(Debug, Clone)]
pub struct QueryRouter {
    tasks: TaskClassifier,
    modes: ModeDetector,
    privacy: PrivacyClassifier,
    organs: OrganRouter,
}

impl QueryRouter {
    /// Compile every rule list and pattern. Fails only on bad configuration.
    pub fn from_config(config: &HakuConfig) -> Result<Self, HakuError> {
        Ok(Self {
            tasks: TaskClassifier::from_config(&config.classifier)?,
            modes: ModeDetector::from_config(&config.modes)?,
            privacy: PrivacyClassifier::from_config(&config.privacy)?,
            organs: OrganRouter::new(config.routing.clone()),
        })
    }

    /// Run all three classifiers.
    pub fn classify(&self, query: &Query) -> ClassificationResult {
        let task_class = self.tasks.classify(&query.text);
        ClassificationResult {
            task_class,
            mode: self.modes.detect(&query.text, task_class),
            tier: self.privacy.classify_query(query),
        }
    }

    /// Classify and pick an organ and engine. Agent overrides are not applied.
    pub fn classify_and_route(&self, query: &Query) -> (ClassificationResult, RoutingDecision) {
        let classification = self.classify(query);
        let decision = self.organs.route(
            classification.task_class,
            classification.mode,
            classification.tier,
        );
        (classification, decision)
    }

    /// Classify, then route to a pre-selected organ.
    pub fn classify_and_route_fixed(
        &self,
        query: &Query,
        organ: Organ,
    ) -> (ClassificationResult, RoutingDecision) {
        let classification = self.classify(query);
        let decision = self.organs.route_fixed(organ, classification.tier);
        (classification, decision)
    }

    pub fn organs(&self) -> &OrganRouter {
        &self.organs
    }

    pub fn privacy(&self) -> &PrivacyClassifier {
        &self.privacy
    }
}
