// SPDX-FileCopyrightText: 2026 Haku Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Haku router.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup. The phrase lists and rule tables that drive the
//! classifiers and the validator live here too: they are loaded once and
//! treated as read-only for the process lifetime.

use haku_core::{Mode, TaskClass};
use serde::{Deserialize, Serialize};

/// Top-level Haku configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. Every section has compiled defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HakuConfig {
    /// Identity, logging and default system context.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Concrete model engines that routing decisions can name.
    #[serde(default = "default_engines")]
    pub engines: Vec<EngineConfig>,

    /// Engine call limits.
    #[serde(default)]
    pub invocation: InvocationConfig,

    /// Organ-to-engine table.
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Task classification rules.
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Operating-mode rules.
    #[serde(default)]
    pub modes: ModeConfig,

    /// Privacy tier keyword and pattern sets.
    #[serde(default)]
    pub privacy: PrivacyConfig,

    /// Response validation phrase sets and thresholds.
    #[serde(default)]
    pub validator: ValidatorConfig,

    /// Multi-perspective merge settings.
    #[serde(default)]
    pub merge: MergeConfig,

    /// Knowledge base lookup settings.
    #[serde(default)]
    pub knowledge: KnowledgeConfig,

    /// Agent definition store settings.
    #[serde(default)]
    pub agents: AgentStoreConfig,

    /// HTTP transport settings.
    #[serde(default)]
    pub gateway: GatewayConfig,
}

impl Default for HakuConfig {
    fn default() -> Self {
        Self {
            agent: AgentConfig::default(),
            engines: default_engines(),
            invocation: InvocationConfig::default(),
            routing: RoutingConfig::default(),
            classifier: ClassifierConfig::default(),
            modes: ModeConfig::default(),
            privacy: PrivacyConfig::default(),
            validator: ValidatorConfig::default(),
            merge: MergeConfig::default(),
            knowledge: KnowledgeConfig::default(),
            agents: AgentStoreConfig::default(),
            gateway: GatewayConfig::default(),
        }
    }
}

impl HakuConfig {
    /// Look up an engine definition by id.
    pub fn engine(&self, id: &str) -> Option<&EngineConfig> {
        self.engines.iter().find(|e| e.id == id)
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Identity and behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the assistant.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// System context sent with every routed call.
    #[serde(default = "default_system_context")]
    pub system_context: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
            system_context: default_system_context(),
        }
    }
}

fn default_agent_name() -> String {
    "haku".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_system_context() -> String {
    "You are Haku, an AI orchestration assistant with access to Heritage knowledge.".to_string()
}

/// Wire protocol spoken by an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// Anthropic Messages API.
    Anthropic,
    /// OpenAI-compatible chat completions (GPT, Grok).
    OpenAi,
    /// Google Gemini `generateContent`.
    Gemini,
    /// Local Ollama `/api/generate`.
    Ollama,
}

/// One concrete engine.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Identifier used by routing tables and payloads (`claude`, `gpt`, ...).
    pub id: String,

    /// Wire protocol.
    pub kind: EngineKind,

    /// Provider model name.
    pub model: String,

    /// Override for the provider base URL.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Inline API key. Prefer `api_key_env`.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Environment variable holding the API key.
    #[serde(default)]
    pub api_key_env: Option<String>,

    /// Maximum tokens to generate per response.
    #[serde(default = "default_engine_max_tokens")]
    pub max_tokens: u32,
}

fn default_engine_max_tokens() -> u32 {
    1024
}

fn default_engines() -> Vec<EngineConfig> {
    let engine = |id: &str, kind, model: &str, base_url: Option<&str>, key: Option<&str>| {
        EngineConfig {
            id: id.to_string(),
            kind,
            model: model.to_string(),
            base_url: base_url.map(str::to_string),
            api_key: None,
            api_key_env: key.map(str::to_string),
            max_tokens: default_engine_max_tokens(),
        }
    };
    vec![
        engine(
            "claude",
            EngineKind::Anthropic,
            "claude-sonnet-4-20250514",
            None,
            Some("ANTHROPIC_API_KEY"),
        ),
        engine("gpt", EngineKind::OpenAi, "gpt-4o", None, Some("OPENAI_API_KEY")),
        engine(
            "gemini",
            EngineKind::Gemini,
            "gemini-2.0-flash-exp",
            None,
            Some("GOOGLE_API_KEY"),
        ),
        engine(
            "grok",
            EngineKind::OpenAi,
            "grok-2-latest",
            Some("https://api.x.ai/v1"),
            Some("XAI_API_KEY"),
        ),
        engine(
            "ollama",
            EngineKind::Ollama,
            "mistral",
            Some("http://localhost:11434"),
            None,
        ),
    ]
}

/// Engine call limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct InvocationConfig {
    /// Per-call timeout in seconds. A timeout is a provider error, never retried.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for InvocationConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    120
}

/// Organ-to-engine table.
///
/// `local_engine` is the only engine tier-3 queries may reach.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RoutingConfig {
    #[serde(default = "default_senses_engine")]
    pub senses: String,

    #[serde(default = "default_brain_engine")]
    pub brain: String,

    #[serde(default = "default_conscience_engine")]
    pub conscience: String,

    #[serde(default = "default_hands_engine")]
    pub hands: String,

    #[serde(default = "default_local_engine")]
    pub local_engine: String,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            senses: default_senses_engine(),
            brain: default_brain_engine(),
            conscience: default_conscience_engine(),
            hands: default_hands_engine(),
            local_engine: default_local_engine(),
        }
    }
}

fn default_senses_engine() -> String {
    "gemini".to_string()
}

fn default_brain_engine() -> String {
    "gpt".to_string()
}

fn default_conscience_engine() -> String {
    "claude".to_string()
}

fn default_hands_engine() -> String {
    "grok".to_string()
}

fn default_local_engine() -> String {
    "ollama".to_string()
}

/// One task classification rule: any phrase matching selects `class`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TaskRuleConfig {
    pub class: TaskClass,
    pub phrases: Vec<String>,
}

/// Ordered task classification rules, first match wins.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ClassifierConfig {
    #[serde(default = "default_task_rules")]
    pub task_rules: Vec<TaskRuleConfig>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            task_rules: default_task_rules(),
        }
    }
}

fn default_task_rules() -> Vec<TaskRuleConfig> {
    let rule = |class, phrases: &[&str]| TaskRuleConfig {
        class,
        phrases: strings(phrases),
    };
    vec![
        rule(
            TaskClass::BuyerFacing,
            &["buyer", "customer", "client", "earnout", "valuation"],
        ),
        rule(
            TaskClass::Execution,
            &["build", "create", "implement", "deploy", "execute", "write code"],
        ),
        rule(
            TaskClass::Strategy,
            &["plan", "strategy", "should we", "how to approach", "what if"],
        ),
        rule(
            TaskClass::Validation,
            &["validate", "check", "verify", "is this correct", "review"],
        ),
        rule(
            TaskClass::Observation,
            &["what is", "analyze", "summarize", "extract", "find"],
        ),
    ]
}

/// One mode rule. Every condition that is set must hold.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ModeRuleConfig {
    pub mode: Mode,

    /// Any of these phrases must appear.
    #[serde(default)]
    pub phrases: Vec<String>,

    /// The task class must equal this.
    #[serde(default)]
    pub task_class: Option<TaskClass>,

    /// The query must be phrased as a question.
    #[serde(default)]
    pub question: bool,
}

/// Ordered operating-mode rules, first match wins.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ModeConfig {
    #[serde(default = "default_mode_rules")]
    pub rules: Vec<ModeRuleConfig>,

    /// Leading words that make a query a question even without `?`.
    #[serde(default = "default_interrogatives")]
    pub interrogatives: Vec<String>,
}

impl Default for ModeConfig {
    fn default() -> Self {
        Self {
            rules: default_mode_rules(),
            interrogatives: default_interrogatives(),
        }
    }
}

fn default_mode_rules() -> Vec<ModeRuleConfig> {
    let phrases = |mode, phrases: &[&str]| ModeRuleConfig {
        mode,
        phrases: strings(phrases),
        task_class: None,
        question: false,
    };
    let prior = |mode, task_class, question| ModeRuleConfig {
        mode,
        phrases: Vec::new(),
        task_class: Some(task_class),
        question,
    };
    vec![
        phrases(
            Mode::Ideating,
            &[
                "what if",
                "could we",
                "should we",
                "idea",
                "brainstorm",
                "thinking about",
            ],
        ),
        prior(Mode::Ideating, TaskClass::Strategy, true),
        phrases(
            Mode::Executing,
            &["build", "create", "make", "implement", "deploy", "write", "add", "fix"],
        ),
        phrases(
            Mode::Validating,
            &["check", "verify", "validate", "review", "is this", "correct"],
        ),
        phrases(
            Mode::Researching,
            &["what", "how", "why", "explain", "find", "search"],
        ),
        prior(Mode::Executing, TaskClass::Execution, false),
        prior(Mode::Validating, TaskClass::Validation, false),
    ]
}

fn default_interrogatives() -> Vec<String> {
    strings(&[
        "what", "why", "how", "when", "where", "who", "which", "should", "could", "would", "can",
        "is", "are", "do", "does",
    ])
}

/// Privacy tier keyword and pattern sets, evaluated tier 3 first.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PrivacyConfig {
    /// Credential, secret and personal-data keywords.
    #[serde(default = "default_tier3_keywords")]
    pub tier3_keywords: Vec<String>,

    /// Regexes for personal identifiers and credential formats.
    #[serde(default = "default_tier3_patterns")]
    pub tier3_patterns: Vec<String>,

    /// Business-sensitive or explicitly important phrasing.
    #[serde(default = "default_tier2_keywords")]
    pub tier2_keywords: Vec<String>,

    /// Planning phrasing.
    #[serde(default = "default_tier1_keywords")]
    pub tier1_keywords: Vec<String>,
}

impl Default for PrivacyConfig {
    fn default() -> Self {
        Self {
            tier3_keywords: default_tier3_keywords(),
            tier3_patterns: default_tier3_patterns(),
            tier2_keywords: default_tier2_keywords(),
            tier1_keywords: default_tier1_keywords(),
        }
    }
}

fn default_tier3_keywords() -> Vec<String> {
    strings(&[
        "ssn",
        "social security",
        "credit card",
        "password",
        "passwords",
        "api key",
        "secret key",
        "customer data",
        "financial",
        "bank account",
    ])
}

fn default_tier3_patterns() -> Vec<String> {
    strings(&[
        r"\b\d{3}-\d{2}-\d{4}\b",
        r"\b\d{4}[- ]?\d{4}[- ]?\d{4}[- ]?\d{4}\b",
        r"\b[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}\b",
        r"\bsk-[a-z0-9_-]{16,}",
        r"\bbearer\s+[a-z0-9._~+/-]{10,}",
    ])
}

fn default_tier2_keywords() -> Vec<String> {
    strings(&["important", "strategy", "competitive", "internal", "confidential"])
}

fn default_tier1_keywords() -> Vec<String> {
    strings(&["plan", "roadmap", "execute", "planning"])
}

/// Response validation phrase sets and thresholds.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ValidatorConfig {
    /// Hedging phrases; each occurrence is a warning.
    #[serde(default = "default_assumption_phrases")]
    pub assumption_phrases: Vec<String>,

    /// Phrases that open a stated assumption clause.
    #[serde(default = "default_assumption_markers")]
    pub assumption_markers: Vec<String>,

    /// Longest extracted assumption clause, in characters.
    #[serde(default = "default_assumption_clause_max_chars")]
    pub assumption_clause_max_chars: usize,

    /// Absolute-certainty phrases.
    #[serde(default = "default_certainty_phrases")]
    pub certainty_phrases: Vec<String>,

    /// Evidence or citation markers that support a certainty phrase in the same sentence.
    #[serde(default = "default_evidence_markers")]
    pub evidence_markers: Vec<String>,

    /// Standalone negation words removed when comparing claims.
    #[serde(default = "default_negation_words")]
    pub negation_words: Vec<String>,

    /// Negated contractions and the affirmative word they stand for.
    #[serde(default = "default_negated_forms")]
    pub negated_forms: Vec<NegatedForm>,

    /// Shortest claim (in words, after normalization) compared for contradictions.
    #[serde(default = "default_min_claim_words")]
    pub min_claim_words: usize,
}

/// A contraction such as `isn't` and its affirmative form `is`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NegatedForm {
    pub negated: String,
    pub affirmative: String,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            assumption_phrases: default_assumption_phrases(),
            assumption_markers: default_assumption_markers(),
            assumption_clause_max_chars: default_assumption_clause_max_chars(),
            certainty_phrases: default_certainty_phrases(),
            evidence_markers: default_evidence_markers(),
            negation_words: default_negation_words(),
            negated_forms: default_negated_forms(),
            min_claim_words: default_min_claim_words(),
        }
    }
}

fn default_assumption_phrases() -> Vec<String> {
    strings(&[
        "probably",
        "likely",
        "seems like",
        "appears to",
        "i assume",
        "presumably",
        "i think",
        "maybe",
        "could be",
        "might be",
        "assuming",
    ])
}

fn default_assumption_markers() -> Vec<String> {
    strings(&["assuming", "if we assume", "given that"])
}

fn default_assumption_clause_max_chars() -> usize {
    100
}

fn default_certainty_phrases() -> Vec<String> {
    strings(&[
        "definitely",
        "certainly",
        "obviously",
        "clearly",
        "without a doubt",
        "100% certain",
        "guaranteed",
        "absolutely",
    ])
}

fn default_evidence_markers() -> Vec<String> {
    strings(&[
        "according to",
        "evidence",
        "source",
        "study",
        "studies",
        "data shows",
        "benchmark",
        "measured",
        "cited",
    ])
}

fn default_negation_words() -> Vec<String> {
    strings(&["not", "no", "never"])
}

fn default_negated_forms() -> Vec<NegatedForm> {
    [
        ("isn't", "is"),
        ("aren't", "are"),
        ("wasn't", "was"),
        ("weren't", "were"),
        ("doesn't", "does"),
        ("don't", "do"),
        ("didn't", "did"),
        ("won't", "will"),
        ("can't", "can"),
        ("cannot", "can"),
        ("shouldn't", "should"),
        ("wouldn't", "would"),
        ("hasn't", "has"),
        ("haven't", "have"),
    ]
    .into_iter()
    .map(|(negated, affirmative)| NegatedForm {
        negated: negated.to_string(),
        affirmative: affirmative.to_string(),
    })
    .collect()
}

fn default_min_claim_words() -> usize {
    3
}

/// One fixed perspective used by the merge workflow.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PerspectiveConfig {
    /// Name shown in the synthesis headings.
    pub name: String,
    /// Engine that answers under this perspective.
    pub engine: String,
    /// System context framing the perspective.
    pub system_context: String,
}

/// Multi-perspective merge settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MergeConfig {
    #[serde(default = "default_perspective_a")]
    pub perspective_a: PerspectiveConfig,

    #[serde(default = "default_perspective_b")]
    pub perspective_b: PerspectiveConfig,

    /// Engine that writes the synthesis.
    #[serde(default = "default_synthesis_engine")]
    pub synthesis_engine: String,

    /// System context for the synthesis call.
    #[serde(default = "default_synthesis_context")]
    pub synthesis_context: String,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            perspective_a: default_perspective_a(),
            perspective_b: default_perspective_b(),
            synthesis_engine: default_synthesis_engine(),
            synthesis_context: default_synthesis_context(),
        }
    }
}

fn default_perspective_a() -> PerspectiveConfig {
    PerspectiveConfig {
        name: "Builder".to_string(),
        engine: "gpt".to_string(),
        system_context: "You are the Builder. Answer as someone who has to make this work: \
                         concrete steps, trade-offs you would accept, and what you would do first."
            .to_string(),
    }
}

fn default_perspective_b() -> PerspectiveConfig {
    PerspectiveConfig {
        name: "Skeptic".to_string(),
        engine: "claude".to_string(),
        system_context: "You are the Skeptic. Answer as a reviewer looking for weak points: \
                         hidden assumptions, risks, missing evidence, and what would change your mind."
            .to_string(),
    }
}

fn default_synthesis_engine() -> String {
    "claude".to_string()
}

fn default_synthesis_context() -> String {
    "You merge independent answers into one structured synthesis. Keep each view faithful \
     to its source and state disagreements plainly."
        .to_string()
}

/// Knowledge base lookup settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct KnowledgeConfig {
    /// Consult the knowledge source before invoking an engine.
    #[serde(default = "default_knowledge_enabled")]
    pub enabled: bool,

    /// Snippets requested per query.
    #[serde(default = "default_knowledge_max_results")]
    pub max_results: usize,

    /// Characters kept from each snippet in the prompt.
    #[serde(default = "default_snippet_chars")]
    pub snippet_chars: usize,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            enabled: default_knowledge_enabled(),
            max_results: default_knowledge_max_results(),
            snippet_chars: default_snippet_chars(),
        }
    }
}

fn default_knowledge_enabled() -> bool {
    true
}

fn default_knowledge_max_results() -> usize {
    3
}

fn default_snippet_chars() -> usize {
    200
}

/// Agent definition store settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentStoreConfig {
    /// Directory holding one JSON file per agent definition.
    #[serde(default = "default_agents_dir")]
    pub dir: String,
}

impl Default for AgentStoreConfig {
    fn default() -> Self {
        Self {
            dir: default_agents_dir(),
        }
    }
}

fn default_agents_dir() -> String {
    dirs::data_dir()
        .map(|p| p.join("haku").join("agents"))
        .unwrap_or_else(|| std::path::PathBuf::from("agents"))
        .to_string_lossy()
        .into_owned()
}

/// HTTP transport settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Address to bind.
    #[serde(default = "default_gateway_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_gateway_port")]
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_gateway_host(),
            port: default_gateway_port(),
        }
    }
}

fn default_gateway_host() -> String {
    "127.0.0.1".to_string()
}

fn default_gateway_port() -> u16 {
    8000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_engines_cover_default_routing() {
        let config = HakuConfig::default();
        for id in [
            &config.routing.senses,
            &config.routing.brain,
            &config.routing.conscience,
            &config.routing.hands,
            &config.routing.local_engine,
        ] {
            assert!(config.engine(id).is_some(), "missing engine `{id}`");
        }
    }

    #[test]
    fn default_task_rules_keep_priority_order() {
        let classes: Vec<TaskClass> = default_task_rules().iter().map(|r| r.class).collect();
        assert_eq!(
            classes,
            vec![
                TaskClass::BuyerFacing,
                TaskClass::Execution,
                TaskClass::Strategy,
                TaskClass::Validation,
                TaskClass::Observation,
            ]
        );
    }

    #[test]
    fn engine_kind_uses_lowercase_names() {
        let toml_str = r#"
id = "local"
kind = "ollama"
model = "llama3.2:3b"
"#;
        let engine: EngineConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(engine.kind, EngineKind::Ollama);
        assert_eq!(engine.max_tokens, 1024);
        assert!(engine.api_key_env.is_none());
    }

    #[test]
    fn mode_rule_with_prior_only_deserializes() {
        let toml_str = r#"
mode = "validating"
task_class = "validation"
"#;
        let rule: ModeRuleConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(rule.mode, Mode::Validating);
        assert_eq!(rule.task_class, Some(TaskClass::Validation));
        assert!(rule.phrases.is_empty());
        assert!(!rule.question);
    }
}
