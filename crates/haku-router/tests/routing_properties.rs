// SPDX-FileCopyrightText: 2026 Haku Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property tests for classification and routing.

use haku_config::HakuConfig;
use haku_core::{Mode, Organ, PrivacyTier, Query, TaskClass};
use haku_router::{OrganRouter, QueryRouter, select_organ};
use proptest::prelude::*;

fn task_class() -> impl Strategy<Value = TaskClass> {
    prop_oneof![
        Just(TaskClass::Observation),
        Just(TaskClass::Strategy),
        Just(TaskClass::Validation),
        Just(TaskClass::Execution),
        Just(TaskClass::BuyerFacing),
    ]
}

fn mode() -> impl Strategy<Value = Mode> {
    prop_oneof![
        Just(Mode::Ideating),
        Just(Mode::Executing),
        Just(Mode::Validating),
        Just(Mode::Researching),
        Just(Mode::General),
    ]
}

fn tier() -> impl Strategy<Value = PrivacyTier> {
    (0u8..=3).prop_map(|l| PrivacyTier::from_level(l).unwrap())
}

fn words() -> impl Strategy<Value = String> {
    let vocab = prop::sample::select(vec![
        "what", "if", "should", "we", "build", "the", "plan", "password", "review", "customer",
        "check", "roadmap", "internal", "explain", "maybe", "?", "deploy", "ssn", "hello",
    ]);
    prop::collection::vec(vocab, 0..12).prop_map(|w| w.join(" "))
}

proptest! {
    #[test]
    fn tier_three_always_routes_local(class in task_class(), mode in mode()) {
        let router = OrganRouter::new(HakuConfig::default().routing);
        let d = router.route(class, mode, PrivacyTier::Secret);
        prop_assert_eq!(d.engine_id.as_str(), "ollama");
        prop_assert!(d.local_only);
    }

    #[test]
    fn routing_is_total_and_pure(class in task_class(), mode in mode(), tier in tier()) {
        let router = OrganRouter::new(HakuConfig::default().routing);
        let a = router.route(class, mode, tier);
        let b = router.route(class, mode, tier);
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(a.organ, select_organ(class, tier));
        if class == TaskClass::Validation || tier >= PrivacyTier::Important {
            prop_assert_eq!(a.organ, Organ::Conscience);
        }
    }

    #[test]
    fn classification_is_deterministic(text in words()) {
        let router = QueryRouter::from_config(&HakuConfig::default()).unwrap();
        let q = Query::new(text);
        prop_assert_eq!(router.classify(&q), router.classify(&q));
    }

    #[test]
    fn classification_never_panics_on_arbitrary_text(text in any::<String>()) {
        let router = QueryRouter::from_config(&HakuConfig::default()).unwrap();
        let _ = router.classify_and_route(&Query::new(text));
    }

    #[test]
    fn hint_is_a_floor(text in words(), hint in tier()) {
        let router = QueryRouter::from_config(&HakuConfig::default()).unwrap();
        let plain = router.classify(&Query::new(text.clone())).tier;
        let hinted = router.classify(&Query::new(text).with_sensitivity(hint)).tier;
        prop_assert_eq!(hinted, plain.max(hint));
    }

    #[test]
    fn secret_keywords_force_local(prefix in words(), suffix in words()) {
        let router = QueryRouter::from_config(&HakuConfig::default()).unwrap();
        let q = Query::new(format!("{prefix} password {suffix}"));
        let (c, d) = router.classify_and_route(&q);
        prop_assert_eq!(c.tier, PrivacyTier::Secret);
        prop_assert_eq!(d.engine_id.as_str(), "ollama");
    }
}
