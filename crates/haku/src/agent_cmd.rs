// SPDX-FileCopyrightText: 2026 Haku Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `haku agent` subcommands over the file-backed agent store.

use haku_agent::FileAgentStore;
use haku_config::HakuConfig;
use haku_core::{AgentDefinition, HakuError};

use crate::output::Output;

pub fn store_for(config: &HakuConfig) -> FileAgentStore {
    FileAgentStore::new(&config.agents.dir)
}

/// Reject engine ids the config does not define, suggesting the closest one.
pub fn check_engine(config: &HakuConfig, engine: &str) -> Result<(), HakuError> {
    if config.engine(engine).is_some() {
        return Ok(());
    }
    let suggestion = config
        .engines
        .iter()
        .map(|e| (strsim::jaro_winkler(engine, &e.id), e.id.as_str()))
        .filter(|(score, _)| *score > 0.75)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, id)| format!(" (did you mean `{id}`?)"))
        .unwrap_or_default();
    Err(HakuError::Agent {
        message: format!("unknown engine `{engine}`{suggestion}"),
        source: None,
    })
}

pub async fn create(
    store: &FileAgentStore,
    config: &HakuConfig,
    definition: AgentDefinition,
    out: Output,
) -> Result<(), HakuError> {
    check_engine(config, &definition.engine)?;
    store.save(&definition).await?;
    if out.json {
        out.json(&definition);
    } else {
        out.success(&format!(
            "saved agent `{}` ({} -> {}, {})",
            definition.name, definition.organ, definition.engine, definition.scope
        ));
    }
    Ok(())
}

pub async fn list(store: &FileAgentStore, out: Output) -> Result<(), HakuError> {
    let definitions = store.list().await?;
    out.agents(&definitions);
    Ok(())
}

pub async fn show(store: &FileAgentStore, name: &str, out: Output) -> Result<(), HakuError> {
    match store.get(name).await? {
        Some(definition) => {
            out.agent(&definition);
            Ok(())
        }
        None => Err(not_found(name)),
    }
}

pub async fn delete(store: &FileAgentStore, name: &str, out: Output) -> Result<(), HakuError> {
    if !store.delete(name).await? {
        return Err(not_found(name));
    }
    if out.json {
        out.json(&serde_json::json!({ "deleted": name }));
    } else {
        out.success(&format!("deleted agent `{name}`"));
    }
    Ok(())
}

fn not_found(name: &str) -> HakuError {
    HakuError::Agent {
        message: format!("no agent named `{name}`"),
        source: None,
    }
}

#[cfg(test)]
mod tests {
    use haku_core::{AgentScope, Organ};

    use super::*;

    fn definition(engine: &str) -> AgentDefinition {
        AgentDefinition {
            name: "builder".into(),
            organ: Organ::Hands,
            engine: engine.into(),
            system_prompt: None,
            scope: AgentScope::Group("acme".into()),
        }
    }

    #[test]
    fn unknown_engine_gets_a_suggestion() {
        let err = check_engine(&HakuConfig::default(), "claud").unwrap_err();
        assert!(err.to_string().contains("did you mean `claude`"));
        assert!(check_engine(&HakuConfig::default(), "ollama").is_ok());
    }

    #[tokio::test]
    async fn create_show_delete_round() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileAgentStore::new(dir.path());
        let out = Output {
            json: true,
            color: false,
        };
        let config = HakuConfig::default();

        create(&store, &config, definition("claude"), out).await.unwrap();
        show(&store, "builder", out).await.unwrap();
        delete(&store, "builder", out).await.unwrap();

        let err = delete(&store, "builder", out).await.unwrap_err();
        assert!(err.to_string().contains("no agent named `builder`"));
    }

    #[tokio::test]
    async fn create_rejects_unknown_engine_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileAgentStore::new(dir.path());
        let out = Output {
            json: true,
            color: false,
        };

        let res = create(&store, &HakuConfig::default(), definition("gpt5"), out).await;
        assert!(res.is_err());
        assert!(store.list().await.unwrap().is_empty());
    }
}
