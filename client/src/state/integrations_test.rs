use super::*;

// =============================================================
// Catalog
// =============================================================

#[test]
fn catalog_has_fourteen_disconnected_entries() {
    let all = default_integrations();
    assert_eq!(all.len(), 14);
    assert!(all.iter().all(|i| !i.connected && i.api_key.is_none()));
}

#[test]
fn catalog_kinds_match_families() {
    let all = default_integrations();
    let count = |kind| all.iter().filter(|i| i.kind == kind).count();
    assert_eq!(count(IntegrationKind::Messaging), 4);
    assert_eq!(count(IntegrationKind::Ads), 5);
    assert_eq!(count(IntegrationKind::Crm), 2);
    assert_eq!(count(IntegrationKind::Automation), 3);
    assert_eq!(count(IntegrationKind::Analytics), 0);
}

#[test]
fn every_catalog_entry_has_docs() {
    assert!(default_integrations().iter().all(|i| i.docs_url().is_some()));
}

#[test]
fn integration_serializes_type_field() {
    let json = serde_json::to_value(&default_integrations()[0]).unwrap();
    assert_eq!(json["type"], "messaging");
    assert_eq!(json["id"], "whatsapp");
    assert!(json.get("apiKey").is_none());
}

// =============================================================
// IntegrationDraft
// =============================================================

#[test]
fn connect_requires_api_key() {
    let mut draft = IntegrationDraft::open(&default_integrations()[0]);
    draft.api_key = "   ".to_owned();
    assert_eq!(draft.begin_connect(), Err(IntegrationError::MissingApiKey));
    assert!(!draft.connecting);
}

#[test]
fn connect_carries_credentials() {
    let mut draft = IntegrationDraft::open(&default_integrations()[9]);
    draft.api_key = "key-123".to_owned();
    draft.account_id = "acct".to_owned();
    draft.begin_connect().unwrap();
    assert!(draft.connecting);

    let connected = draft.finish_connect();
    assert!(!draft.connecting);
    assert!(connected.connected);
    assert_eq!(connected.id, "hubspot");
    assert_eq!(connected.api_key.as_deref(), Some("key-123"));
    assert_eq!(connected.account_id.as_deref(), Some("acct"));
    assert_eq!(connected.webhook_url, None);
}

#[test]
fn disconnect_clears_credentials() {
    let mut integration = default_integrations()[0].clone();
    integration.connected = true;
    integration.api_key = Some("k".to_owned());
    integration.webhook_url = Some("https://hook".to_owned());
    integration.account_id = Some("a".to_owned());

    let draft = IntegrationDraft::open(&integration);
    assert_eq!(draft.api_key, "k");
    let off = draft.disconnect();
    assert!(!off.connected);
    assert_eq!(off.api_key, None);
    assert_eq!(off.webhook_url, None);
    assert_eq!(off.account_id, None);
}
