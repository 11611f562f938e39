// SPDX-FileCopyrightText: 2026 Haku Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-shot query commands: `ask`, `exec`, `council`, `route`, `merge`,
//! `validate` and `config`.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use haku_agent::{FileAgentStore, Pipeline};
use haku_config::HakuConfig;
use haku_core::{HakuError, Mode, Organ, PrivacyTier, Query, TaskClass};
use haku_engines::EngineRegistry;
use haku_validator::annotate;

use crate::output::Output;

/// Wire the HTTP engines and the agent store into a pipeline.
pub fn build_pipeline(config: Arc<HakuConfig>) -> Result<Pipeline, HakuError> {
    let engines = EngineRegistry::from_config(&config)?;
    let store = FileAgentStore::new(&config.agents.dir);
    info!(
        engines = engines.len(),
        agents_dir = config.agents.dir.as_str(),
        "pipeline ready"
    );
    Ok(Pipeline::new(config, Arc::new(engines))?.with_agents(Arc::new(store)))
}

/// `ask`, or `exec`/`council` when an organ is fixed.
pub async fn run_ask(
    pipeline: &Pipeline,
    query: &Query,
    organ: Option<Organ>,
    out: Output,
) -> Result<(), HakuError> {
    let payload = match organ {
        Some(organ) => pipeline.process_with_organ(query, organ).await?,
        None => pipeline.process(query).await?,
    };
    out.payload(&payload);
    Ok(())
}

pub async fn run_merge(pipeline: &Pipeline, query: &Query, out: Output) -> Result<(), HakuError> {
    let payload = pipeline.merge_all(query).await?;
    out.payload(&payload);
    Ok(())
}

/// Where a query would go.
#[derive(Debug, Serialize)]
pub struct RouteReport {
    pub task_class: TaskClass,
    pub mode: Mode,
    pub privacy_tier: PrivacyTier,
    pub organ: Organ,
    pub ai_engine: String,
    pub rationale: String,
    pub local_only: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
}

pub async fn run_route(pipeline: &Pipeline, query: &Query, out: Output) -> Result<(), HakuError> {
    let routed = pipeline.classify_and_route(query).await?;
    let report = RouteReport {
        task_class: routed.classification.task_class,
        mode: routed.classification.mode,
        privacy_tier: routed.classification.tier,
        organ: routed.decision.organ,
        ai_engine: routed.decision.engine_id,
        rationale: routed.decision.rationale,
        local_only: routed.decision.local_only,
        agent: routed.decision.agent,
    };

    let mut lines = vec![
        ("task", report.task_class.to_string()),
        ("mode", report.mode.to_string()),
        ("tier", report.privacy_tier.to_string()),
        (
            "organ",
            format!("{} ({})", report.organ, report.organ.role()),
        ),
        ("engine", report.ai_engine.clone()),
        ("local only", report.local_only.to_string()),
        ("rationale", report.rationale.clone()),
    ];
    if let Some(agent) = &report.agent {
        lines.push(("agent", agent.clone()));
    }
    out.route(&report, &lines);
    Ok(())
}

pub fn run_validate(pipeline: &Pipeline, text: &str, out: Output) {
    let result = pipeline.validate(text);
    let rendered = annotate::render(text, &result);
    out.validation(&result, &rendered);
}

/// Summary printed by `config check`.
#[derive(Debug, Serialize)]
pub struct ConfigSummary {
    pub valid: bool,
    pub engines: Vec<String>,
    pub senses: String,
    pub brain: String,
    pub conscience: String,
    pub hands: String,
    pub local_engine: String,
    pub agents_dir: String,
}

/// Reached only after the config loaded and validated.
pub fn run_config_check(config: &HakuConfig, out: Output) {
    let summary = ConfigSummary {
        valid: true,
        engines: config.engines.iter().map(|e| e.id.clone()).collect(),
        senses: config.routing.senses.clone(),
        brain: config.routing.brain.clone(),
        conscience: config.routing.conscience.clone(),
        hands: config.routing.hands.clone(),
        local_engine: config.routing.local_engine.clone(),
        agents_dir: config.agents.dir.clone(),
    };
    if out.json {
        return out.json(&summary);
    }
    out.success("configuration is valid");
    println!("  engines:    {}", summary.engines.join(", "));
    println!(
        "  routing:    senses={} brain={} conscience={} hands={} local={}",
        summary.senses, summary.brain, summary.conscience, summary.hands, summary.local_engine
    );
    println!("  agents dir: {}", summary.agents_dir);
}

/// Print the effective configuration. Inline API keys are redacted.
pub fn run_config_show(config: &HakuConfig) -> Result<(), HakuError> {
    let rendered = toml::to_string_pretty(&redacted(config))
        .map_err(|e| HakuError::Config(format!("cannot render configuration: {e}")))?;
    print!("{rendered}");
    Ok(())
}

fn redacted(config: &HakuConfig) -> HakuConfig {
    let mut config = config.clone();
    for engine in &mut config.engines {
        if engine.api_key.is_some() {
            engine.api_key = Some("<redacted>".to_string());
        }
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_builds_a_pipeline() {
        let pipeline = build_pipeline(Arc::new(HakuConfig::default())).unwrap();
        let mut ids = pipeline.engine_ids();
        ids.sort();
        assert_eq!(ids, ["claude", "gemini", "gpt", "grok", "ollama"]);
    }

    #[test]
    fn default_config_renders_as_toml() {
        let rendered = toml::to_string_pretty(&HakuConfig::default()).unwrap();
        let reparsed = haku_config::load_and_validate_str(&rendered).unwrap();
        assert_eq!(reparsed.routing.local_engine, "ollama");
        assert_eq!(reparsed.engines.len(), 5);
    }

    #[test]
    fn inline_api_keys_are_redacted() {
        let mut config = HakuConfig::default();
        config.engines[0].api_key = Some("sk-live-123".to_string());
        let shown = redacted(&config);
        assert_eq!(shown.engines[0].api_key.as_deref(), Some("<redacted>"));
        assert!(shown.engines[1].api_key.is_none());
    }
}
