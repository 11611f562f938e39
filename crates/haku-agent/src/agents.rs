// SPDX-FileCopyrightText: 2026 Haku Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Directory-backed agent definitions.
//!
//! One pretty-printed JSON file per definition, named `<name>.json`.
//! Resolution walks definitions in name order and returns the first whose
//! scope and organ both match.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use haku_core::{AgentDefinition, AgentResolver, AgentScope, HakuError, Organ};
use tracing::{debug, info};

const MAX_NAME_LEN: usize = 64;

/// Agent definitions stored as JSON files in one directory.
#[derive(Debug, Clone)]
pub struct FileAgentStore {
    dir: PathBuf,
}

fn agent_error(message: impl Into<String>, source: std::io::Error) -> HakuError {
    HakuError::Agent {
        message: message.into(),
        source: Some(Box::new(source)),
    }
}

/// Names become file names, so only `[A-Za-z0-9_-]` is allowed.
pub fn validate_name(name: &str) -> Result<(), HakuError> {
    let ok = !name.is_empty()
        && name.len() <= MAX_NAME_LEN
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if ok {
        Ok(())
    } else {
        Err(HakuError::Agent {
            message: format!(
                "invalid agent name `{name}`: use 1-{MAX_NAME_LEN} letters, digits, `-` or `_`"
            ),
            source: None,
        })
    }
}

impl FileAgentStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }

    /// Create or replace a definition.
    pub async fn save(&self, definition: &AgentDefinition) -> Result<(), HakuError> {
        validate_name(&definition.name)?;
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| agent_error(format!("cannot create {}", self.dir.display()), e))?;

        let json = serde_json::to_string_pretty(definition).map_err(|e| HakuError::Agent {
            message: format!("cannot encode agent `{}`", definition.name),
            source: Some(Box::new(e)),
        })?;
        let path = self.path_for(&definition.name);
        tokio::fs::write(&path, json)
            .await
            .map_err(|e| agent_error(format!("cannot write {}", path.display()), e))?;
        info!(
            agent = definition.name.as_str(),
            organ = %definition.organ,
            engine = definition.engine.as_str(),
            scope = %definition.scope,
            "agent definition saved"
        );
        Ok(())
    }

    /// Load one definition by name.
    pub async fn get(&self, name: &str) -> Result<Option<AgentDefinition>, HakuError> {
        validate_name(name)?;
        let path = self.path_for(name);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => parse(&path, &content).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(agent_error(format!("cannot read {}", path.display()), e)),
        }
    }

    /// All definitions, sorted by name. A missing directory is an empty store.
    pub async fn list(&self) -> Result<Vec<AgentDefinition>, HakuError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(agent_error(format!("cannot list {}", self.dir.display()), e));
            }
        };

        let mut definitions = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| agent_error(format!("cannot list {}", self.dir.display()), e))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let content = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| agent_error(format!("cannot read {}", path.display()), e))?;
            definitions.push(parse(&path, &content)?);
        }
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(definitions)
    }

    /// Remove a definition. Returns whether it existed.
    pub async fn delete(&self, name: &str) -> Result<bool, HakuError> {
        validate_name(name)?;
        let path = self.path_for(name);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                info!(agent = name, "agent definition deleted");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(agent_error(format!("cannot delete {}", path.display()), e)),
        }
    }
}

fn parse(path: &Path, content: &str) -> Result<AgentDefinition, HakuError> {
    serde_json::from_str(content).map_err(|e| HakuError::Agent {
        message: format!("malformed agent definition {}", path.display()),
        source: Some(Box::new(e)),
    })
}

#[async_trait]
impl AgentResolver for FileAgentStore {
    async fn resolve_agent(
        &self,
        scope: &AgentScope,
        organ: Organ,
    ) -> Result<Option<AgentDefinition>, HakuError> {
        let found = self
            .list()
            .await?
            .into_iter()
            .find(|d| d.scope == *scope && d.organ == organ);
        debug!(
            scope = %scope,
            organ = %organ,
            agent = found.as_ref().map(|d| d.name.as_str()),
            "agent resolution"
        );
        Ok(found)
    }
}
