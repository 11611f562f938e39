// SPDX-FileCopyrightText: 2026 Haku Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Operating-mode detection.
//!
//! A second ordered rule list. A rule can require phrases, a task-class
//! prior and question phrasing; every condition it sets must hold. The
//! task class is only a weak prior: phrase rules listed earlier win over it.

use haku_config::model::ModeConfig;
use haku_core::{HakuError, Mode, PhraseSet, TaskClass, normalize};

/// Mode returned when no rule matches.
pub const DEFAULT_MODE: Mode = Mode::General;

#[derive(Debug, Clone)]
struct ModeRule {
    mode: Mode,
    phrases: Option<PhraseSet>,
    task_class: Option<TaskClass>,
    question: bool,
}

/// Ordered-rule mode detector.
#[derive(Debug, Clone)]
pub struct ModeDetector {
    rules: Vec<ModeRule>,
    interrogatives: Vec<String>,
}

impl ModeDetector {
    pub fn from_config(config: &ModeConfig) -> Result<Self, HakuError> {
        let mut rules = Vec::with_capacity(config.rules.len());
        for rule in &config.rules {
            let phrases = if rule.phrases.is_empty() {
                None
            } else {
                Some(PhraseSet::new(&rule.phrases)?)
            };
            rules.push(ModeRule {
                mode: rule.mode,
                phrases,
                task_class: rule.task_class,
                question: rule.question,
            });
        }
        Ok(Self {
            rules,
            interrogatives: config
                .interrogatives
                .iter()
                .map(|w| w.to_lowercase())
                .collect(),
        })
    }

    /// Detect the mode for `text` given its task class.
    pub fn detect(&self, text: &str, task_class: TaskClass) -> Mode {
        let normalized = normalize(text);
        let question = self.is_question(&normalized);

        self.rules
            .iter()
            .find(|rule| {
                rule.task_class.is_none_or(|c| c == task_class)
                    && (!rule.question || question)
                    && rule
                        .phrases
                        .as_ref()
                        .is_none_or(|p| p.matches(&normalized))
            })
            .map(|rule| rule.mode)
            .unwrap_or(DEFAULT_MODE)
    }

    /// A question ends with `?` or opens with an interrogative word.
    pub fn is_question(&self, text: &str) -> bool {
        let trimmed = text.trim();
        if trimmed.ends_with('?') {
            return true;
        }
        let first: String = trimmed
            .chars()
            .take_while(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();
        !first.is_empty() && self.interrogatives.iter().any(|w| *w == first)
    }
}

impl Default for ModeDetector {
    fn default() -> Self {
        Self::from_config(&ModeConfig::default()).expect("default phrase lists compile")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> ModeDetector {
        ModeDetector::default()
    }

    #[test]
    fn ideation_phrases_win_first() {
        assert_eq!(
            detector().detect("What if we built our own CRM?", TaskClass::Strategy),
            Mode::Ideating
        );
    }

    #[test]
    fn strategy_question_defaults_to_ideating() {
        assert_eq!(
            detector().detect("Is expansion the right plan?", TaskClass::Strategy),
            Mode::Ideating
        );
    }

    #[test]
    fn strategy_statement_is_not_ideating() {
        assert_eq!(
            detector().detect("Outline the roadmap", TaskClass::Strategy),
            Mode::General
        );
    }

    #[test]
    fn execution_phrases() {
        assert_eq!(
            detector().detect("Fix the login page", TaskClass::Observation),
            Mode::Executing
        );
    }

    #[test]
    fn validating_phrases() {
        assert_eq!(
            detector().detect("Please verify the totals", TaskClass::Validation),
            Mode::Validating
        );
    }

    #[test]
    fn researching_phrases() {
        assert_eq!(
            detector().detect("Explain the churn numbers", TaskClass::Observation),
            Mode::Researching
        );
    }

    #[test]
    fn task_class_prior_applies_last() {
        let d = detector();
        assert_eq!(d.detect("ship it tonight", TaskClass::Execution), Mode::Executing);
        assert_eq!(d.detect("numbers look off", TaskClass::Validation), Mode::Validating);
        assert_eq!(d.detect("numbers look off", TaskClass::Observation), Mode::General);
    }

    #[test]
    fn question_detection() {
        let d = detector();
        assert!(d.is_question("Anything else?"));
        assert!(d.is_question("what's next"));
        assert!(d.is_question("  Does it scale"));
        assert!(!d.is_question("Whatever works"));
        assert!(!d.is_question(""));
    }
}
