//! Per-assistant collaborator list and invite links.

#[cfg(test)]
#[path = "collaborators_test.rs"]
mod collaborators_test;

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::util::ids::generate_id;
use crate::util::storage::{Persisted, StorageBackend, StorageError};

const COLLABORATORS_KEY_PREFIX: &str = "ai-assistant-collaborators";
const QR_ENDPOINT: &str = "https://api.qrserver.com/v1/create-qr-code/?size=200x200&data=";

/// Simulated time to "send" an invitation e-mail.
pub const INVITE_DELAY: Duration = Duration::from_secs(1);
/// How long the "sent" confirmation stays visible.
pub const SENT_FLAG_DURATION: Duration = Duration::from_secs(3);

#[must_use]
pub fn collaborators_key(assistant_id: &str) -> String {
    format!("{COLLABORATORS_KEY_PREFIX}-{assistant_id}")
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollaboratorRole {
    Admin,
    #[default]
    Editor,
    Viewer,
}

impl CollaboratorRole {
    pub const ALL: [CollaboratorRole; 3] = [CollaboratorRole::Editor, CollaboratorRole::Viewer, CollaboratorRole::Admin];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            CollaboratorRole::Admin => "Administrador",
            CollaboratorRole::Editor => "Editor",
            CollaboratorRole::Viewer => "Visualizador",
        }
    }

    /// Value used in `<select>` options.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CollaboratorRole::Admin => "admin",
            CollaboratorRole::Editor => "editor",
            CollaboratorRole::Viewer => "viewer",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == value)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollaboratorStatus {
    #[default]
    Pending,
    Active,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collaborator {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: CollaboratorRole,
    pub status: CollaboratorStatus,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum InviteError {
    #[error("correo electrónico inválido")]
    InvalidEmail,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Whether `email` is good enough to send an invite to.
#[must_use]
pub fn is_invitable(email: &str) -> bool {
    !email.is_empty() && email.contains('@')
}

/// Shareable invite link for an assistant.
#[must_use]
pub fn invite_url(origin: &str, assistant_id: &str) -> String {
    format!("{}/invite/{assistant_id}", origin.trim_end_matches('/'))
}

/// Image URL of a QR code encoding `invite_url`.
#[must_use]
pub fn qr_url(invite_url: &str) -> String {
    format!("{QR_ENDPOINT}{}", urlencoding::encode(invite_url))
}

/// Download file name for an assistant's QR code, e.g. `invite-ventas-pro-qr.png`.
#[must_use]
pub fn qr_file_name(assistant_name: &str) -> String {
    let slug = assistant_name.split_whitespace().collect::<Vec<_>>().join("-").to_lowercase();
    format!("invite-{slug}-qr.png")
}

#[derive(Clone, Debug, PartialEq)]
pub struct CollaboratorsState {
    store: Persisted<Vec<Collaborator>>,
}

impl CollaboratorsState {
    #[must_use]
    pub fn new(assistant_id: &str) -> Self {
        Self { store: Persisted::new(collaborators_key(assistant_id), Vec::new()) }
    }

    pub fn hydrate(&mut self, backend: &dyn StorageBackend) {
        self.store.hydrate(backend);
    }

    #[must_use]
    pub fn items(&self) -> &[Collaborator] {
        self.store.get()
    }

    /// Append a pending collaborator named after the e-mail's local part.
    ///
    /// # Errors
    ///
    /// [`InviteError::InvalidEmail`] when the address has no `@`, or the
    /// storage write failure.
    pub fn invite(
        &mut self,
        backend: &dyn StorageBackend,
        email: &str,
        role: CollaboratorRole,
    ) -> Result<Collaborator, InviteError> {
        let email = email.trim();
        if !is_invitable(email) {
            return Err(InviteError::InvalidEmail);
        }
        let name = email.split('@').next().unwrap_or_default().to_owned();
        let collaborator = Collaborator {
            id: generate_id("colab"),
            name,
            email: email.to_owned(),
            role,
            status: CollaboratorStatus::Pending,
            added_at: Utc::now(),
        };
        let added = collaborator.clone();
        self.store.update(backend, |list| list.push(added))?;
        log::info!("invited {} as {}", collaborator.email, collaborator.role.as_str());
        Ok(collaborator)
    }

    /// # Errors
    ///
    /// Returns the storage write failure.
    pub fn remove(&mut self, backend: &dyn StorageBackend, id: &str) -> Result<(), StorageError> {
        self.store.update(backend, |list| list.retain(|c| c.id != id))
    }
}
