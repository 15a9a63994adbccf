use super::*;

// =============================================================
// Serialization layout
// =============================================================

#[test]
fn enums_serialize_as_display_strings() {
    assert_eq!(serde_json::to_string(&Language::English).unwrap(), r#""Inglés""#);
    assert_eq!(serde_json::to_string(&Objective::LeadGen).unwrap(), r#""Captación de Leads""#);
    assert_eq!(serde_json::to_string(&Channel::FacebookAds).unwrap(), r#""Facebook Ads""#);
    assert_eq!(serde_json::to_string(&Channel::Sms).unwrap(), r#""SMS""#);
}

#[test]
fn assistant_uses_camel_case_fields() {
    let json = serde_json::to_value(&seed_assistants()[0]).unwrap();
    assert_eq!(json["responseLength"]["medium"], 50);
    assert_eq!(json["audioEnabled"], true);
    assert_eq!(json["trainingConfig"]["leadCategory"], "Hot");
    assert_eq!(json["trainingConfig"]["productRecommendations"], true);
}

#[test]
fn assistant_without_training_config_gets_defaults() {
    let raw = r#"{"id":"a","name":"Old","language":"Portugués","tone":"Casual",
        "responseLength":{"short":10,"medium":10,"long":80},"audioEnabled":false}"#;
    let assistant: Assistant = serde_json::from_str(raw).unwrap();
    assert_eq!(assistant.language, Language::Portuguese);
    assert_eq!(assistant.rules, "");
    assert_eq!(assistant.training_config, TrainingConfig::default());
}

#[test]
fn label_lookups_roundtrip() {
    for lang in Language::ALL {
        assert_eq!(Language::from_label(lang.label()), Some(lang));
    }
    assert_eq!(Tone::from_label("Amigable"), Some(Tone::Amigable));
    assert_eq!(Tone::from_label("Gruñón"), None);
}

#[test]
fn speech_tags_per_language() {
    assert_eq!(Language::Spanish.speech_tag(), "es-ES");
    assert_eq!(Language::English.speech_tag(), "en-US");
    assert_eq!(Language::Portuguese.speech_tag(), "pt-BR");
}

// =============================================================
// ResponseLength rebalancing
// =============================================================

#[test]
fn default_distribution_sums_to_hundred() {
    assert_eq!(ResponseLength::default().total(), 100);
}

#[test]
fn raising_a_slider_takes_from_the_others_left_to_right() {
    let mut len = ResponseLength::default();
    len.set(LengthSlot::Short, 80);
    assert_eq!(len, ResponseLength { short: 80, medium: 0, long: 20 });
}

#[test]
fn lowering_a_slider_gives_to_the_first_other() {
    let mut len = ResponseLength::default();
    len.set(LengthSlot::Long, 0);
    assert_eq!(len, ResponseLength { short: 66, medium: 34, long: 0 });
}

#[test]
fn editing_the_middle_slider_skips_itself() {
    let mut len = ResponseLength { short: 10, medium: 10, long: 80 };
    len.set(LengthSlot::Medium, 95);
    assert_eq!(len, ResponseLength { short: 0, medium: 95, long: 5 });
}

#[test]
fn values_above_hundred_are_clamped() {
    let mut len = ResponseLength::default();
    len.set(LengthSlot::Medium, 250);
    assert_eq!(len, ResponseLength { short: 0, medium: 100, long: 0 });
}

#[test]
fn every_edit_keeps_total_at_hundred() {
    let mut len = ResponseLength::default();
    for (i, value) in [0_u32, 100, 37, 64, 1, 99, 50, 12, 88, 0].into_iter().enumerate() {
        len.set(LengthSlot::ORDER[i % 3], value);
        assert_eq!(len.total(), 100, "after setting slot {i} to {value}: {len:?}");
    }
}

// =============================================================
// Patches
// =============================================================

#[test]
fn patch_only_touches_given_fields() {
    let mut assistant = seed_assistants().remove(1);
    AssistantPatch {
        name: Some("Renamed".to_owned()),
        audio_enabled: Some(true),
        ..AssistantPatch::default()
    }
    .apply(&mut assistant);
    assert_eq!(assistant.name, "Renamed");
    assert!(assistant.audio_enabled);
    assert_eq!(assistant.tone, Tone::Formal);
    assert_eq!(assistant.language, Language::English);
}

#[test]
fn normalized_fills_missing_integrations() {
    let cfg = TrainingConfig {
        integrations: Vec::new(),
        ..TrainingConfig::default()
    };
    assert_eq!(cfg.normalized().integrations.len(), 14);
}

#[test]
fn seeds_match_expected_profiles() {
    let seeds = seed_assistants();
    assert_eq!(seeds.len(), 2);
    assert_eq!(seeds[0].name, "Asistente de Ventas");
    assert_eq!(seeds[0].response_length.total(), 100);
    assert_eq!(seeds[1].name, "Soporte Técnico Bot");
    assert_eq!(seeds[1].training_config.objective, Objective::Support);
    assert!(!seeds[1].audio_enabled);
}
