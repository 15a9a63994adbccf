use super::*;
use crate::util::storage::MemoryStorage;

// =============================================================
// Links
// =============================================================

#[test]
fn invite_url_joins_origin_and_id() {
    assert_eq!(invite_url("https://app.test/", "assistant-1"), "https://app.test/invite/assistant-1");
    assert_eq!(invite_url("", "a"), "/invite/a");
}

#[test]
fn qr_url_encodes_invite_link() {
    let url = qr_url("https://app.test/invite/a 1");
    assert_eq!(
        url,
        "https://api.qrserver.com/v1/create-qr-code/?size=200x200&data=https%3A%2F%2Fapp.test%2Finvite%2Fa%201"
    );
}

#[test]
fn qr_file_name_slugs_assistant_name() {
    assert_eq!(qr_file_name("Asistente de Ventas"), "invite-asistente-de-ventas-qr.png");
    assert_eq!(qr_file_name("  Soporte   Técnico "), "invite-soporte-técnico-qr.png");
}

// =============================================================
// Roles
// =============================================================

#[test]
fn roles_round_trip_through_select_values() {
    for role in CollaboratorRole::ALL {
        assert_eq!(CollaboratorRole::parse(role.as_str()), Some(role));
    }
    assert_eq!(CollaboratorRole::default(), CollaboratorRole::Editor);
    assert_eq!(CollaboratorRole::Viewer.label(), "Visualizador");
    assert_eq!(CollaboratorRole::parse("owner"), None);
}

// =============================================================
// Invite / remove
// =============================================================

#[test]
fn invite_rejects_addresses_without_at() {
    let backend = MemoryStorage::new();
    let mut state = CollaboratorsState::new("a1");
    state.hydrate(&backend);
    assert!(matches!(
        state.invite(&backend, "nobody", CollaboratorRole::Editor),
        Err(InviteError::InvalidEmail)
    ));
    assert!(!is_invitable(""));
    assert!(state.items().is_empty());
}

#[test]
fn invite_adds_pending_collaborator_and_persists() {
    let backend = MemoryStorage::new();
    let mut state = CollaboratorsState::new("a1");
    state.hydrate(&backend);

    let added = state.invite(&backend, "ana@empresa.com", CollaboratorRole::Admin).unwrap();
    assert_eq!(added.name, "ana");
    assert_eq!(added.status, CollaboratorStatus::Pending);
    assert!(added.id.starts_with("colab-"));

    let raw = backend.raw(&collaborators_key("a1")).unwrap();
    assert!(raw.contains("\"addedAt\""));
    assert!(raw.contains("\"admin\""));

    let mut reloaded = CollaboratorsState::new("a1");
    reloaded.hydrate(&backend);
    assert_eq!(reloaded.items(), state.items());
}

#[test]
fn remove_drops_by_id_only() {
    let backend = MemoryStorage::new();
    let mut state = CollaboratorsState::new("a1");
    state.hydrate(&backend);
    let first = state.invite(&backend, "a@x.io", CollaboratorRole::Editor).unwrap();
    state.invite(&backend, "b@x.io", CollaboratorRole::Viewer).unwrap();

    state.remove(&backend, &first.id).unwrap();
    assert_eq!(state.items().len(), 1);
    assert_eq!(state.items()[0].email, "b@x.io");

    state.remove(&backend, "missing").unwrap();
    assert_eq!(state.items().len(), 1);
}

#[test]
fn lists_are_scoped_per_assistant() {
    let backend = MemoryStorage::new();
    let mut one = CollaboratorsState::new("a1");
    one.hydrate(&backend);
    one.invite(&backend, "a@x.io", CollaboratorRole::Editor).unwrap();

    let mut two = CollaboratorsState::new("a2");
    two.hydrate(&backend);
    assert!(two.items().is_empty());
}
