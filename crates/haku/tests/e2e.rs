// SPDX-FileCopyrightText: 2026 Haku Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests: the compiled `haku` binary for commands that never
//! reach an engine, and the mock-backed harness for the full pipeline.

use std::path::Path;
use std::process::{Command, Output};

use haku_core::{Mode, Organ, PrivacyTier, ProviderErrorKind, Query, TaskClass, ValidationStatus};
use haku_test_utils::TestHarness;
use serde_json::Value;

fn haku(config: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_haku"))
        .arg("--config")
        .arg(config)
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run haku")
}

fn write_config(dir: &Path, content: &str) -> std::path::PathBuf {
    let path = dir.join("haku.toml");
    std::fs::write(&path, content).unwrap();
    path
}

fn stdout_json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "haku failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

// ---- Binary ----

#[test]
fn route_keeps_password_questions_local() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "");

    let out = haku(
        &config,
        &["route", "What's the password reset procedure?", "--json"],
    );
    let body = stdout_json(&out);

    assert_eq!(body["privacy_tier"], 3);
    assert_eq!(body["ai_engine"], "ollama");
    assert_eq!(body["local_only"], true);
}

#[test]
fn validate_command_reports_hedging() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "");

    let out = haku(&config, &["validate", "I think this is probably fine", "--json"]);
    let body = stdout_json(&out);

    assert_eq!(body["status"], "warnings");
    let issues = body["issues"].as_array().unwrap();
    assert!(issues.iter().any(|i| i["kind"] == "assumption_language"
        && i["detail"].as_str().unwrap().contains("probably")));
}

#[test]
fn invalid_config_exits_with_status_one() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "[routing]\nbrian = \"gpt\"\n");

    let out = haku(&config, &["config", "check"]);

    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("brian"));
}

#[test]
fn config_check_summarizes_routing() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "[routing]\nbrain = \"claude\"\n");

    let body = stdout_json(&haku(&config, &["config", "check", "--json"]));

    assert_eq!(body["valid"], true);
    assert_eq!(body["brain"], "claude");
    assert_eq!(body["local_engine"], "ollama");
}

#[test]
fn agent_definitions_change_routing() {
    let dir = tempfile::tempdir().unwrap();
    let agents = dir.path().join("agents");
    let config = write_config(
        dir.path(),
        &format!("[agents]\ndir = {:?}\n", agents.display().to_string()),
    );

    let created = haku(
        &config,
        &[
            "agent",
            "create",
            "acme-builder",
            "--organ",
            "hands",
            "--engine",
            "claude",
            "--group",
            "acme",
        ],
    );
    assert!(created.status.success());

    let listed = stdout_json(&haku(&config, &["agent", "list", "--json"]));
    assert_eq!(listed[0]["name"], "acme-builder");

    let routed = stdout_json(&haku(
        &config,
        &["route", "Build the landing page", "--group", "acme", "--json"],
    ));
    assert_eq!(routed["organ"], "hands");
    assert_eq!(routed["ai_engine"], "claude");
    assert_eq!(routed["agent"], "acme-builder");

    let deleted = haku(&config, &["agent", "delete", "acme-builder"]);
    assert!(deleted.status.success());
    let missing = haku(&config, &["agent", "show", "acme-builder"]);
    assert_eq!(missing.status.code(), Some(1));
}

// ---- Pipeline ----

#[tokio::test]
async fn validation_work_goes_to_conscience_while_ideating() {
    let harness = TestHarness::builder().build().unwrap();
    let routed = harness
        .pipeline
        .classify_and_route(&Query::new("Brainstorm ways to verify the totals"))
        .await
        .unwrap();

    assert_eq!(routed.classification.task_class, TaskClass::Validation);
    assert_eq!(routed.classification.mode, Mode::Ideating);
    assert_eq!(routed.decision.organ, Organ::Conscience);
    assert_eq!(routed.decision.engine_id, "claude");
}

#[tokio::test]
async fn important_tier_is_reviewed_by_conscience() {
    let harness = TestHarness::builder().build().unwrap();
    let payload = harness
        .ask("Summarize the confidential board notes")
        .await
        .unwrap();

    assert_eq!(payload.tier, PrivacyTier::Important);
    assert_eq!(payload.engine_id, "claude");
}

#[tokio::test]
async fn unsupported_certainty_is_blocked_end_to_end() {
    let harness = TestHarness::builder()
        .with_response("gemini", "This is definitely guaranteed to work")
        .build()
        .unwrap();

    let payload = harness.ask("Summarize the rollout").await.unwrap();

    assert_eq!(payload.validation_status, ValidationStatus::Blocked);
    assert!(!payload.response_text.contains("guaranteed to work"));
}

#[tokio::test]
async fn timeouts_surface_as_provider_errors() {
    let harness = TestHarness::builder()
        .with_failure("gemini", ProviderErrorKind::Timeout)
        .build()
        .unwrap();

    let err = harness.ask("Summarize the rollout").await.unwrap_err();
    assert!(err.is_provider());
    assert_eq!(err.provider_kind(), Some(ProviderErrorKind::Timeout));
}
