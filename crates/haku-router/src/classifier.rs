// SPDX-FileCopyrightText: 2026 Haku Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Heuristic task classification.
//!
//! Classifies query text into a [`TaskClass`] with an ordered list of
//! phrase rules. First match wins; no match is `observation`. No network,
//! no model call, never fails.

use haku_config::model::ClassifierConfig;
use haku_core::{HakuError, PhraseSet, TaskClass, normalize};

/// Class returned when no rule matches.
pub const DEFAULT_TASK_CLASS: TaskClass = TaskClass::Observation;

#[derive(Debug, Clone)]
struct TaskRule {
    class: TaskClass,
    phrases: PhraseSet,
}

/// Ordered-rule task classifier.
#[derive(Debug, Clone)]
pub struct TaskClassifier {
    rules: Vec<TaskRule>,
}

impl TaskClassifier {
    /// Compile the rule list from configuration.
    pub fn from_config(config: &ClassifierConfig) -> Result<Self, HakuError> {
        let rules = config
            .task_rules
            .iter()
            .map(|rule| {
                Ok(TaskRule {
                    class: rule.class,
                    phrases: PhraseSet::new(&rule.phrases)?,
                })
            })
            .collect::<Result<Vec<_>, HakuError>>()?;
        Ok(Self { rules })
    }

    /// Classify a query's text.
    pub fn classify(&self, text: &str) -> TaskClass {
        self.explain(text).0
    }

    /// Classify and report the phrase that decided it, if any.
    pub fn explain(&self, text: &str) -> (TaskClass, Option<&str>) {
        let normalized = normalize(text);
        for rule in &self.rules {
            if let Some(phrase) = rule.phrases.first_match(&normalized) {
                return (rule.class, Some(phrase));
            }
        }
        (DEFAULT_TASK_CLASS, None)
    }
}

impl Default for TaskClassifier {
    fn default() -> Self {
        Self::from_config(&ClassifierConfig::default()).expect("default phrase lists compile")
    }
}
