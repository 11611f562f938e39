// SPDX-FileCopyrightText: 2026 Haku Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks the constraints serde cannot express: routing tables must name
//! configured engines, the tier-3 floor must name an Ollama engine, phrase
//! lists must be non-empty and privacy patterns must compile. All errors are
//! collected, not just the first.

use std::collections::HashSet;

use regex::Regex;

use crate::diagnostic::ConfigError;
use crate::model::{EngineKind, HakuConfig};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
pub fn validate_config(config: &HakuConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    validate_agent(config, &mut errors);
    let engine_ids = validate_engines(config, &mut errors);
    validate_engine_refs(config, &engine_ids, &mut errors);
    validate_rules(config, &mut errors);
    validate_privacy(config, &mut errors);
    validate_validator(config, &mut errors);

    if config.invocation.timeout_secs == 0 {
        errors.push(ConfigError::validation(
            "invocation.timeout_secs must be greater than 0",
        ));
    }

    if config.knowledge.enabled && config.knowledge.max_results == 0 {
        errors.push(ConfigError::validation(
            "knowledge.max_results must be greater than 0 when knowledge is enabled",
        ));
    }

    if config.agents.dir.trim().is_empty() {
        errors.push(ConfigError::validation("agents.dir must not be empty"));
    }

    if config.gateway.host.trim().is_empty() {
        errors.push(ConfigError::validation("gateway.host must not be empty"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_agent(config: &HakuConfig, errors: &mut Vec<ConfigError>) {
    let level = config.agent.log_level.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::validation(format!(
            "agent.log_level `{}` is not one of {}",
            config.agent.log_level,
            LOG_LEVELS.join(", ")
        )));
    }
}

fn validate_engines<'a>(config: &'a HakuConfig, errors: &mut Vec<ConfigError>) -> HashSet<&'a str> {
    let mut seen = HashSet::new();
    for (i, engine) in config.engines.iter().enumerate() {
        if engine.id.trim().is_empty() {
            errors.push(ConfigError::validation(format!(
                "engines[{i}].id must not be empty"
            )));
            continue;
        }
        if !seen.insert(engine.id.as_str()) {
            errors.push(ConfigError::validation(format!(
                "duplicate engine id `{}` in [[engines]] array",
                engine.id
            )));
        }
        if engine.model.trim().is_empty() {
            errors.push(ConfigError::validation(format!(
                "engines[{i}].model must not be empty"
            )));
        }
        if engine.max_tokens == 0 {
            errors.push(ConfigError::validation(format!(
                "engines[{i}].max_tokens must be greater than 0"
            )));
        }
    }
    seen
}

fn validate_engine_refs(
    config: &HakuConfig,
    engine_ids: &HashSet<&str>,
    errors: &mut Vec<ConfigError>,
) {
    let refs = [
        ("routing.senses", &config.routing.senses),
        ("routing.brain", &config.routing.brain),
        ("routing.conscience", &config.routing.conscience),
        ("routing.hands", &config.routing.hands),
        ("routing.local_engine", &config.routing.local_engine),
        ("merge.perspective_a.engine", &config.merge.perspective_a.engine),
        ("merge.perspective_b.engine", &config.merge.perspective_b.engine),
        ("merge.synthesis_engine", &config.merge.synthesis_engine),
    ];
    for (key, id) in refs {
        if !engine_ids.contains(id.as_str()) {
            let known: Vec<&str> = engine_ids.iter().copied().collect();
            let hint = crate::diagnostic::suggest_key(id, &known)
                .map(|s| format!(" (did you mean `{s}`?)"))
                .unwrap_or_default();
            errors.push(ConfigError::validation(format!(
                "{key} names unknown engine `{id}`{hint}"
            )));
        }
    }

    // Secret queries must never leave the machine.
    let local = &config.routing.local_engine;
    if let Some(engine) = config.engine(local) {
        if engine.kind != EngineKind::Ollama {
            errors.push(ConfigError::validation(format!(
                "routing.local_engine `{local}` must be a local engine (kind = \"ollama\"), not {}",
                format!("{:?}", engine.kind).to_lowercase()
            )));
        }
    }
}

fn validate_rules(config: &HakuConfig, errors: &mut Vec<ConfigError>) {
    if config.classifier.task_rules.is_empty() {
        errors.push(ConfigError::validation(
            "classifier.task_rules must contain at least one rule",
        ));
    }
    for (i, rule) in config.classifier.task_rules.iter().enumerate() {
        check_phrases(&format!("classifier.task_rules[{i}].phrases"), &rule.phrases, errors);
    }

    if config.modes.rules.is_empty() {
        errors.push(ConfigError::validation(
            "modes.rules must contain at least one rule",
        ));
    }
    for (i, rule) in config.modes.rules.iter().enumerate() {
        if rule.phrases.is_empty() && rule.task_class.is_none() && !rule.question {
            errors.push(ConfigError::validation(format!(
                "modes.rules[{i}] has no condition; set phrases, task_class or question"
            )));
        }
        if rule.phrases.iter().any(|p| p.trim().is_empty()) {
            errors.push(ConfigError::validation(format!(
                "modes.rules[{i}].phrases contains a blank phrase"
            )));
        }
    }
}

fn validate_privacy(config: &HakuConfig, errors: &mut Vec<ConfigError>) {
    let privacy = &config.privacy;
    if privacy.tier3_keywords.is_empty() && privacy.tier3_patterns.is_empty() {
        errors.push(ConfigError::validation(
            "privacy needs at least one tier3 keyword or pattern",
        ));
    }
    for (i, pattern) in privacy.tier3_patterns.iter().enumerate() {
        if let Err(e) = Regex::new(pattern) {
            errors.push(ConfigError::validation(format!(
                "privacy.tier3_patterns[{i}] does not compile: {e}"
            )));
        }
    }
    check_phrases("privacy.tier3_keywords", &privacy.tier3_keywords, errors);
    check_phrases("privacy.tier2_keywords", &privacy.tier2_keywords, errors);
    check_phrases("privacy.tier1_keywords", &privacy.tier1_keywords, errors);
}

fn validate_validator(config: &HakuConfig, errors: &mut Vec<ConfigError>) {
    let v = &config.validator;
    check_phrases("validator.assumption_phrases", &v.assumption_phrases, errors);
    check_phrases("validator.assumption_markers", &v.assumption_markers, errors);
    check_phrases("validator.certainty_phrases", &v.certainty_phrases, errors);
    check_phrases("validator.evidence_markers", &v.evidence_markers, errors);
    check_phrases("validator.negation_words", &v.negation_words, errors);

    if v.min_claim_words == 0 {
        errors.push(ConfigError::validation(
            "validator.min_claim_words must be greater than 0",
        ));
    }
    if v.assumption_clause_max_chars == 0 {
        errors.push(ConfigError::validation(
            "validator.assumption_clause_max_chars must be greater than 0",
        ));
    }
}

fn check_phrases(key: &str, phrases: &[String], errors: &mut Vec<ConfigError>) {
    if phrases.is_empty() {
        errors.push(ConfigError::validation(format!("{key} must not be empty")));
    } else if phrases.iter().any(|p| p.trim().is_empty()) {
        errors.push(ConfigError::validation(format!(
            "{key} contains a blank phrase"
        )));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(errors: &[ConfigError]) -> Vec<String> {
        errors.iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn default_config_validates() {
        let config = HakuConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn routing_to_unknown_engine_fails() {
        let mut config = HakuConfig::default();
        config.routing.brain = "gtp".to_string();
        let errors = validate_config(&config).unwrap_err();
        let msgs = messages(&errors);
        assert!(msgs.iter().any(|m| m.contains("routing.brain")));
        assert!(msgs.iter().any(|m| m.contains("did you mean `gpt`")));
    }

    #[test]
    fn local_engine_must_be_ollama() {
        let mut config = HakuConfig::default();
        config.routing.local_engine = "claude".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(messages(&errors)[0].contains("routing.local_engine `claude` must be a local engine"));
    }

    #[test]
    fn local_engine_may_be_any_ollama_engine() {
        let mut config = HakuConfig::default();
        let mut second = config.engine("ollama").unwrap().clone();
        second.id = "ollama-small".to_string();
        config.engines.push(second);
        config.routing.local_engine = "ollama-small".to_string();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn duplicate_engine_id_fails() {
        let mut config = HakuConfig::default();
        let dup = config.engines[0].clone();
        config.engines.push(dup);
        let errors = validate_config(&config).unwrap_err();
        assert!(messages(&errors).iter().any(|m| m.contains("duplicate engine id")));
    }

    #[test]
    fn empty_certainty_list_fails() {
        let mut config = HakuConfig::default();
        config.validator.certainty_phrases.clear();
        let errors = validate_config(&config).unwrap_err();
        assert!(
            messages(&errors)
                .iter()
                .any(|m| m.contains("validator.certainty_phrases must not be empty"))
        );
    }

    #[test]
    fn bad_privacy_pattern_fails() {
        let mut config = HakuConfig::default();
        config.privacy.tier3_patterns.push("([unclosed".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert!(messages(&errors).iter().any(|m| m.contains("does not compile")));
    }

    #[test]
    fn zero_timeout_fails() {
        let mut config = HakuConfig::default();
        config.invocation.timeout_secs = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn mode_rule_without_condition_fails() {
        let mut config = HakuConfig::default();
        config.modes.rules[0].phrases.clear();
        let errors = validate_config(&config).unwrap_err();
        assert!(messages(&errors).iter().any(|m| m.contains("has no condition")));
    }

    #[test]
    fn errors_are_collected_not_fail_fast() {
        let mut config = HakuConfig::default();
        config.invocation.timeout_secs = 0;
        config.gateway.host = String::new();
        config.agent.log_level = "loud".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
