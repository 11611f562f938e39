// SPDX-FileCopyrightText: 2026 Haku Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by the classifiers, the router, the validator and the
//! transport layer.
//!
//! Everything here is created per request and dropped once the payload is
//! returned. Nothing in this module holds shared state.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Intent category of a query.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskClass {
    Observation,
    Strategy,
    Validation,
    Execution,
    BuyerFacing,
}

/// Operating posture of the operator when asking.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Ideating,
    Executing,
    Validating,
    Researching,
    General,
}

/// Sensitivity level of a query, 0 (generic) through 3 (secret).
///
/// Ordering follows the level, so `max` never lowers a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum PrivacyTier {
    /// Public knowledge.
    Generic,
    /// High-level planning.
    Planning,
    /// Business-sensitive or explicitly important.
    Important,
    /// Credentials, secrets and personal identifiers. Never leaves the machine.
    Secret,
}

impl PrivacyTier {
    /// All tiers, lowest first.
    pub const ALL: [PrivacyTier; 4] = [
        PrivacyTier::Generic,
        PrivacyTier::Planning,
        PrivacyTier::Important,
        PrivacyTier::Secret,
    ];

    /// Numeric level (0-3).
    pub fn level(self) -> u8 {
        match self {
            PrivacyTier::Generic => 0,
            PrivacyTier::Planning => 1,
            PrivacyTier::Important => 2,
            PrivacyTier::Secret => 3,
        }
    }

    /// Tier for a numeric level, `None` above 3.
    pub fn from_level(level: u8) -> Option<Self> {
        Self::ALL.get(usize::from(level)).copied()
    }

    /// Whether queries at this tier must stay on the local engine.
    pub fn is_local_only(self) -> bool {
        self == PrivacyTier::Secret
    }
}

impl fmt::Display for PrivacyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.level())
    }
}

impl From<PrivacyTier> for u8 {
    fn from(tier: PrivacyTier) -> Self {
        tier.level()
    }
}

impl TryFrom<u8> for PrivacyTier {
    type Error = String;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        PrivacyTier::from_level(level)
            .ok_or_else(|| format!("privacy tier must be 0-3, got {level}"))
    }
}

/// One of the four fixed routing destinations.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Organ {
    /// Perception and research.
    Senses,
    /// Strategic reasoning.
    Brain,
    /// Compliance and validation.
    Conscience,
    /// Execution and output.
    Hands,
}

impl Organ {
    /// Short description used in rationales and CLI output.
    pub fn role(self) -> &'static str {
        match self {
            Organ::Senses => "perception/research",
            Organ::Brain => "strategic reasoning",
            Organ::Conscience => "compliance/validation",
            Organ::Hands => "execution/output",
        }
    }
}

/// Key under which a custom agent definition is filed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum AgentScope {
    Group(String),
    Workstream(String),
}

impl fmt::Display for AgentScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentScope::Group(id) => write!(f, "group:{id}"),
            AgentScope::Workstream(id) => write!(f, "workstream:{id}"),
        }
    }
}

/// An inbound query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    /// The operator's text.
    pub text: String,
    /// Declared sensitivity. Can raise the detected tier, never lower it.
    #[serde(default)]
    pub sensitivity_hint: Option<PrivacyTier>,
    /// Extra context appended to the prompt.
    #[serde(default)]
    pub context: Option<String>,
    /// Group or workstream used to look up a custom agent.
    #[serde(default)]
    pub scope: Option<AgentScope>,
}

impl Query {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sensitivity_hint: None,
            context: None,
            scope: None,
        }
    }

    pub fn with_sensitivity(mut self, tier: PrivacyTier) -> Self {
        self.sensitivity_hint = Some(tier);
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_scope(mut self, scope: AgentScope) -> Self {
        self.scope = Some(scope);
        self
    }
}

/// Output of the three classifiers for one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub task_class: TaskClass,
    pub mode: Mode,
    pub tier: PrivacyTier,
}

/// Where a query goes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingDecision {
    pub organ: Organ,
    pub engine_id: String,
    /// Human-readable explanation. Never inspected by control flow.
    pub rationale: String,
    /// The tier-3 privacy floor selected the local engine.
    pub local_only: bool,
    /// Name of the agent definition that supplied the engine, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
}

/// What a validation issue is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    AssumptionLanguage,
    Contradiction,
    FalseCertainty,
}

/// How serious a validation issue is.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Blocking,
}

/// Outcome of a validation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    Approved,
    Warnings,
    Blocked,
}

/// A single finding from one of the validator scans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub kind: IssueKind,
    pub detail: String,
    pub severity: Severity,
}

/// Aggregated result of the three validator scans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub status: ValidationStatus,
    pub issues: Vec<ValidationIssue>,
    pub stated_assumptions: BTreeSet<String>,
}

impl ValidationResult {
    /// Build a result, deriving the status from the issue severities.
    pub fn from_issues(issues: Vec<ValidationIssue>, stated_assumptions: BTreeSet<String>) -> Self {
        let status = if issues.iter().any(|i| i.severity == Severity::Blocking) {
            ValidationStatus::Blocked
        } else if issues.is_empty() {
            ValidationStatus::Approved
        } else {
            ValidationStatus::Warnings
        };
        Self {
            status,
            issues,
            stated_assumptions,
        }
    }

    pub fn blocking_issues(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Blocking)
    }

    pub fn warning_issues(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
    }
}

/// The payload handed back to the transport layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponsePayload {
    #[serde(rename = "response")]
    pub response_text: String,
    #[serde(rename = "ai_engine")]
    pub engine_id: String,
    #[serde(rename = "privacy_tier")]
    pub tier: PrivacyTier,
    pub task_class: TaskClass,
    pub mode: Mode,
    pub validation_status: ValidationStatus,
    pub heritage_context_used: bool,
}

/// A snippet returned by the knowledge source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeSnippet {
    pub topic: String,
    pub content: String,
}

/// A named agent definition: a custom engine (and optional system prompt)
/// for one organ within a group or workstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AgentDefinition {
    pub name: String,
    pub organ: Organ,
    pub engine: String,
    #[serde(default)]
    pub system_prompt: Option<String>,
    pub scope: AgentScope,
}

/// Entry handed to the audit sink after a response has been validated.
///
/// The original engine text is kept here even when the user-visible body
/// was replaced by a refusal.
#[derive(Debug, Clone, Serialize)]
pub struct AuditRecord {
    pub timestamp: DateTime<Utc>,
    /// `process`, `process_with_organ` or `merge_all`.
    pub operation: String,
    pub classification: ClassificationResult,
    pub engine_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routing: Option<RoutingDecision>,
    pub validation: ValidationResult,
    pub original_text: String,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn tier_ordering_follows_level() {
        assert!(PrivacyTier::Secret > PrivacyTier::Important);
        assert!(PrivacyTier::Important > PrivacyTier::Planning);
        assert!(PrivacyTier::Planning > PrivacyTier::Generic);
        assert_eq!(
            PrivacyTier::Planning.max(PrivacyTier::Secret),
            PrivacyTier::Secret
        );
    }

    #[test]
    fn tier_levels_round_trip() {
        for tier in PrivacyTier::ALL {
            assert_eq!(PrivacyTier::from_level(tier.level()), Some(tier));
        }
        assert_eq!(PrivacyTier::from_level(4), None);
        assert!(PrivacyTier::try_from(9u8).is_err());
    }

    #[test]
    fn tier_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&PrivacyTier::Secret).unwrap(), "3");
        let tier: PrivacyTier = serde_json::from_str("1").unwrap();
        assert_eq!(tier, PrivacyTier::Planning);
        assert!(serde_json::from_str::<PrivacyTier>("7").is_err());
    }

    #[test]
    fn only_secret_tier_is_local_only() {
        let local: Vec<_> = PrivacyTier::ALL
            .into_iter()
            .filter(|t| t.is_local_only())
            .collect();
        assert_eq!(local, vec![PrivacyTier::Secret]);
    }

    #[test]
    fn enums_use_snake_case_names() {
        assert_eq!(TaskClass::BuyerFacing.to_string(), "buyer_facing");
        assert_eq!(
            TaskClass::from_str("buyer_facing").unwrap(),
            TaskClass::BuyerFacing
        );
        assert_eq!(Mode::Researching.to_string(), "researching");
        assert_eq!(IssueKind::FalseCertainty.to_string(), "false_certainty");
        assert_eq!(ValidationStatus::Warnings.to_string(), "warnings");
        assert_eq!(
            serde_json::to_string(&TaskClass::BuyerFacing).unwrap(),
            "\"buyer_facing\""
        );
    }

    #[test]
    fn organ_parses_case_insensitively() {
        assert_eq!(Organ::from_str("Conscience").unwrap(), Organ::Conscience);
        assert_eq!(Organ::from_str("hands").unwrap(), Organ::Hands);
        assert_eq!(Organ::iter().count(), 4);
    }

    #[test]
    fn payload_uses_transport_field_names() {
        let payload = ResponsePayload {
            response_text: "hello".into(),
            engine_id: "claude".into(),
            tier: PrivacyTier::Important,
            task_class: TaskClass::Strategy,
            mode: Mode::Ideating,
            validation_status: ValidationStatus::Approved,
            heritage_context_used: false,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["response"], "hello");
        assert_eq!(json["ai_engine"], "claude");
        assert_eq!(json["privacy_tier"], 2);
        assert_eq!(json["task_class"], "strategy");
        assert_eq!(json["mode"], "ideating");
        assert_eq!(json["validation_status"], "approved");
        assert_eq!(json["heritage_context_used"], false);
    }

    #[test]
    fn status_derives_from_issue_severity() {
        let warning = ValidationIssue {
            kind: IssueKind::AssumptionLanguage,
            detail: "probably".into(),
            severity: Severity::Warning,
        };
        let blocking = ValidationIssue {
            kind: IssueKind::FalseCertainty,
            detail: "guaranteed".into(),
            severity: Severity::Blocking,
        };

        let approved = ValidationResult::from_issues(vec![], BTreeSet::new());
        assert_eq!(approved.status, ValidationStatus::Approved);

        let warned = ValidationResult::from_issues(vec![warning.clone()], BTreeSet::new());
        assert_eq!(warned.status, ValidationStatus::Warnings);

        let blocked = ValidationResult::from_issues(vec![warning, blocking], BTreeSet::new());
        assert_eq!(blocked.status, ValidationStatus::Blocked);
        assert_eq!(blocked.blocking_issues().count(), 1);
        assert_eq!(blocked.warning_issues().count(), 1);
    }

    #[test]
    fn agent_scope_serializes_tagged() {
        let scope = AgentScope::Workstream("patents".into());
        let json = serde_json::to_value(&scope).unwrap();
        assert_eq!(json["kind"], "workstream");
        assert_eq!(json["id"], "patents");
        assert_eq!(scope.to_string(), "workstream:patents");
    }

    #[test]
    fn query_builder_sets_optional_fields() {
        let q = Query::new("review the plan")
            .with_sensitivity(PrivacyTier::Important)
            .with_context("Q3 notes")
            .with_scope(AgentScope::Group("ops".into()));
        assert_eq!(q.sensitivity_hint, Some(PrivacyTier::Important));
        assert_eq!(q.context.as_deref(), Some("Q3 notes"));
        assert_eq!(q.scope, Some(AgentScope::Group("ops".into())));
    }
}
