// SPDX-FileCopyrightText: 2026 Haku Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Human and JSON rendering for CLI results.

use std::io::IsTerminal;

use colored::Colorize;
use serde::Serialize;

use haku_core::{AgentDefinition, ResponsePayload, ValidationResult, ValidationStatus};

/// How results are printed.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub json: bool,
    pub color: bool,
}

impl Output {
    /// Colors only when stdout is a terminal and `--plain` was not given.
    pub fn new(json: bool, plain: bool) -> Self {
        Self {
            json,
            color: !plain && std::io::stdout().is_terminal(),
        }
    }

    /// Print any serializable value as pretty JSON.
    pub fn json<T: Serialize>(&self, value: &T) {
        println!(
            "{}",
            serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
        );
    }

    pub fn error(&self, message: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": message }));
        } else if self.color {
            eprintln!("{} {message}", "error:".red().bold());
        } else {
            eprintln!("error: {message}");
        }
    }

    pub fn success(&self, message: &str) {
        if self.color {
            println!("{} {message}", "✓".green());
        } else {
            println!("[OK] {message}");
        }
    }

    fn status(&self, status: ValidationStatus) -> String {
        let label = status.to_string();
        if !self.color {
            return label;
        }
        match status {
            ValidationStatus::Approved => label.green().to_string(),
            ValidationStatus::Warnings => label.yellow().to_string(),
            ValidationStatus::Blocked => label.red().bold().to_string(),
        }
    }

    fn label(&self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn payload(&self, payload: &ResponsePayload) {
        if self.json {
            return self.json(payload);
        }
        println!("{}", payload.response_text);
        println!();
        println!(
            "{} {}  {} {}  {} {}  {} {}  {} {}{}",
            self.label("engine:"),
            payload.engine_id,
            self.label("tier:"),
            payload.tier,
            self.label("task:"),
            payload.task_class,
            self.label("mode:"),
            payload.mode,
            self.label("validation:"),
            self.status(payload.validation_status),
            if payload.heritage_context_used {
                "  (heritage context)"
            } else {
                ""
            },
        );
    }

    pub fn route<T: Serialize>(&self, report: &T, lines: &[(&str, String)]) {
        if self.json {
            return self.json(report);
        }
        for (key, value) in lines {
            println!("  {} {value}", self.label(&format!("{:<12}", format!("{key}:"))));
        }
    }

    pub fn validation(&self, result: &ValidationResult, rendered: &str) {
        if self.json {
            return self.json(result);
        }
        println!("{} {}", self.label("status:"), self.status(result.status));
        for issue in &result.issues {
            println!("  - [{}] {}: {}", issue.severity, issue.kind, issue.detail);
        }
        for assumption in &result.stated_assumptions {
            println!("  {} {assumption}", self.label("assumes:"));
        }
        println!();
        println!("{rendered}");
    }

    pub fn agent(&self, definition: &AgentDefinition) {
        if self.json {
            return self.json(definition);
        }
        if self.color {
            println!("{}", definition.name.bold());
        } else {
            println!("{}", definition.name);
        }
        println!("  {} {}", self.label("organ:        "), definition.organ);
        println!("  {} {}", self.label("engine:       "), definition.engine);
        println!("  {} {}", self.label("scope:        "), definition.scope);
        if let Some(prompt) = &definition.system_prompt {
            println!("  {} {prompt}", self.label("system prompt:"));
        }
    }

    pub fn agents(&self, definitions: &[AgentDefinition]) {
        if self.json {
            return self.json(&definitions);
        }
        if definitions.is_empty() {
            println!("no agent definitions");
            return;
        }
        for d in definitions {
            println!(
                "{:<24} {:<11} {:<10} {}",
                d.name, d.organ, d.engine, d.scope
            );
        }
    }
}
