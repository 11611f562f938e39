// SPDX-FileCopyrightText: 2026 Haku Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Privacy tier assignment.
//!
//! Tiers are evaluated from the top: tier 3, then 2, then 1, else 0. Once a
//! higher tier matches the lower sets are never consulted, so nothing can
//! lower a tier-3 result.

use haku_config::model::PrivacyConfig;
use haku_core::{HakuError, PhraseSet, PrivacyTier, Query};
use regex::{Regex, RegexBuilder};

/// Keyword and pattern based sensitivity classifier.
#[derive(Debug, Clone)]
pub struct PrivacyClassifier {
    tier3_keywords: PhraseSet,
    tier3_patterns: Vec<Regex>,
    tier2_keywords: PhraseSet,
    tier1_keywords: PhraseSet,
}

impl PrivacyClassifier {
    pub fn from_config(config: &PrivacyConfig) -> Result<Self, HakuError> {
        let tier3_patterns = config
            .tier3_patterns
            .iter()
            .map(|p| {
                RegexBuilder::new(p)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| HakuError::Config(format!("privacy pattern `{p}`: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            tier3_keywords: PhraseSet::new(&config.tier3_keywords)?,
            tier3_patterns,
            tier2_keywords: PhraseSet::new(&config.tier2_keywords)?,
            tier1_keywords: PhraseSet::new(&config.tier1_keywords)?,
        })
    }

    /// Detect the tier of raw text.
    pub fn classify(&self, text: &str) -> PrivacyTier {
        if self.tier3_keywords.matches(text) || self.tier3_patterns.iter().any(|r| r.is_match(text))
        {
            PrivacyTier::Secret
        } else if self.tier2_keywords.matches(text) {
            PrivacyTier::Important
        } else if self.tier1_keywords.matches(text) {
            PrivacyTier::Planning
        } else {
            PrivacyTier::Generic
        }
    }

    /// Detect the tier of a query, treating its sensitivity hint as a floor.
    ///
    /// Context supplied with the query is scanned too: secrets pasted into
    /// the context block leave the process just like the question does.
    pub fn classify_query(&self, query: &Query) -> PrivacyTier {
        let mut tier = self.classify(&query.text);
        if let Some(context) = &query.context {
            tier = tier.max(self.classify(context));
        }
        match query.sensitivity_hint {
            Some(hint) => tier.max(hint),
            None => tier,
        }
    }
}

impl Default for PrivacyClassifier {
    fn default() -> Self {
        Self::from_config(&PrivacyConfig::default()).expect("default phrase lists compile")
    }
}
