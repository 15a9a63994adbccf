use super::*;
use crate::state::assistant::{Channel, Objective};
use crate::util::storage::MemoryStorage;

fn repo(backend: &MemoryStorage) -> AssistantsState {
    let mut repo = AssistantsState::default();
    repo.hydrate(backend).unwrap();
    repo
}

// =============================================================
// changed
// =============================================================

#[test]
fn fresh_draft_is_unchanged() {
    let backend = MemoryStorage::new();
    let repo = repo(&backend);
    let draft = TrainingDraft::new(&repo.items()[0]);
    assert!(!draft.changed());
    assert_eq!(draft.connected_count(), 0);
}

#[test]
fn missing_integrations_do_not_count_as_a_change() {
    let mut assistant = crate::state::assistant::seed_assistants().remove(0);
    assistant.training_config.integrations.clear();
    let draft = TrainingDraft::new(&assistant);
    assert_eq!(draft.config.integrations.len(), 14);
    assert!(!draft.changed());
}

#[test]
fn editing_then_reverting_clears_changed() {
    let backend = MemoryStorage::new();
    let repo = repo(&backend);
    let mut draft = TrainingDraft::new(&repo.items()[0]);
    draft.config.channel = Channel::Telegram;
    assert!(draft.changed());
    draft.config.channel = Channel::Webchat;
    assert!(!draft.changed());

    draft.rules.push_str(" Sé breve.");
    assert!(draft.changed());
}

// =============================================================
// Integrations
// =============================================================

#[test]
fn update_integration_replaces_by_id() {
    let backend = MemoryStorage::new();
    let repo = repo(&backend);
    let mut draft = TrainingDraft::new(&repo.items()[0]);
    let mut slack_like = draft.config.integrations[3].clone();
    slack_like.connected = true;
    slack_like.api_key = Some("t0k3n".to_owned());
    draft.update_integration(slack_like);
    assert_eq!(draft.connected_count(), 1);
    assert!(draft.config.integrations[3].connected);
    assert!(draft.changed());
}

// =============================================================
// Save
// =============================================================

#[test]
fn begin_save_requires_changes() {
    let backend = MemoryStorage::new();
    let repo = repo(&backend);
    let mut draft = TrainingDraft::new(&repo.items()[0]);
    assert!(!draft.begin_save());
    draft.config.objective = Objective::Marketing;
    assert!(draft.begin_save());
    assert!(!draft.begin_save());
}

#[test]
fn commit_writes_through_repository() {
    let backend = MemoryStorage::new();
    let mut repo = repo(&backend);
    let id = repo.items()[1].id.clone();
    let mut draft = TrainingDraft::new(&repo.items()[1]);
    draft.rules = "Always greet first.".to_owned();
    draft.config.auto_escalate = false;
    assert!(draft.begin_save());

    draft.commit(&mut repo, &backend).unwrap();
    assert!(!draft.saving);
    assert!(!draft.changed());

    let saved = repo.get(&id).unwrap();
    assert_eq!(saved.rules, "Always greet first.");
    assert!(!saved.training_config.auto_escalate);
}

#[test]
fn sync_reloads_only_clean_drafts() {
    let backend = MemoryStorage::new();
    let mut repo = repo(&backend);
    let id = repo.items()[0].id.clone();
    let mut draft = TrainingDraft::new(&repo.items()[0]);

    repo.update_rules(&backend, &id, "Nuevas reglas".to_owned()).unwrap();
    draft.sync(repo.get(&id).unwrap());
    assert_eq!(draft.rules, "Nuevas reglas");

    draft.rules = "Mis cambios".to_owned();
    repo.update_rules(&backend, &id, "Otra vez".to_owned()).unwrap();
    draft.sync(repo.get(&id).unwrap());
    assert_eq!(draft.rules, "Mis cambios");
}

#[test]
fn tab_labels() {
    assert_eq!(TrainingTab::default(), TrainingTab::Config);
    assert_eq!(TrainingTab::Rules.label(), "Reglas");
    assert_eq!(TrainingTab::ALL.len(), 5);
}
