// SPDX-FileCopyrightText: 2026 Haku Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./haku.toml` > `~/.config/haku/haku.toml` > `/etc/haku/haku.toml`
//! with environment variable overrides via `HAKU_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::HakuConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG: &str = "/etc/haku/haku.toml";

/// Config file in the working directory.
pub const LOCAL_CONFIG: &str = "haku.toml";

/// Sections reachable through `HAKU_<SECTION>_<KEY>` variables.
///
/// Longer names come first so `agents_dir` is not read as `agent.s_dir`.
const ENV_SECTIONS: &[&str] = &[
    "agents",
    "agent",
    "invocation",
    "routing",
    "privacy",
    "validator",
    "merge",
    "knowledge",
    "gateway",
];

/// The per-user config file, if the platform has a config dir.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("haku").join("haku.toml"))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/haku/haku.toml`
/// 3. `~/.config/haku/haku.toml`
/// 4. `./haku.toml`
/// 5. `HAKU_*` environment variables
pub fn load_config() -> Result<HakuConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<HakuConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(HakuConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<HakuConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(HakuConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the layered Figment before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(HakuConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG))
        .merge(env_provider())
}

/// Map a lowercased, prefix-stripped env key onto a dotted config path.
///
/// Uses an explicit section table rather than splitting on `_` because key
/// names contain underscores: `HAKU_ROUTING_LOCAL_ENGINE` must land on
/// `routing.local_engine`, not `routing.local.engine`.
pub fn map_env_key(key: &str) -> String {
    for section in ENV_SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|r| r.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}

fn env_provider() -> Env {
    Env::prefixed("HAKU_").map(|key| map_env_key(key.as_str()).into())
}
