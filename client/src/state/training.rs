//! Training configuration editor: a draft of rules and config with a
//! `changed` flag against the saved assistant.

#[cfg(test)]
#[path = "training_test.rs"]
mod training_test;

use std::time::Duration;

use crate::state::assistant::{Assistant, TrainingConfig};
use crate::state::assistants::AssistantsState;
use crate::state::integrations::Integration;
use crate::util::storage::{StorageBackend, StorageError};

/// Simulated latency of a save.
pub const SAVE_DELAY: Duration = Duration::from_millis(500);

/// Sections of the training panel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TrainingTab {
    #[default]
    Config,
    Rules,
    Analysis,
    Context,
    Collaborators,
}

impl TrainingTab {
    pub const ALL: [TrainingTab; 5] = [
        TrainingTab::Config,
        TrainingTab::Rules,
        TrainingTab::Analysis,
        TrainingTab::Context,
        TrainingTab::Collaborators,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            TrainingTab::Config => "Config",
            TrainingTab::Rules => "Reglas",
            TrainingTab::Analysis => "Análisis",
            TrainingTab::Context => "Contexto",
            TrainingTab::Collaborators => "Colaboradores",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrainingDraft {
    assistant_id: String,
    pub rules: String,
    pub config: TrainingConfig,
    saved_rules: String,
    saved_config: TrainingConfig,
    pub saving: bool,
}

impl TrainingDraft {
    #[must_use]
    pub fn new(assistant: &Assistant) -> Self {
        let config = assistant.training_config.normalized();
        Self {
            assistant_id: assistant.id.clone(),
            rules: assistant.rules.clone(),
            saved_rules: assistant.rules.clone(),
            saved_config: config.clone(),
            config,
            saving: false,
        }
    }

    /// True when the draft differs from what is stored.
    #[must_use]
    pub fn changed(&self) -> bool {
        self.rules != self.saved_rules || self.config != self.saved_config
    }

    /// Pick up external edits to the assistant unless the user has unsaved changes.
    pub fn sync(&mut self, assistant: &Assistant) {
        if !self.changed() && !self.saving {
            *self = Self::new(assistant);
        }
    }

    /// Replace the integration with the same id.
    pub fn update_integration(&mut self, integration: Integration) {
        if let Some(slot) = self.config.integrations.iter_mut().find(|i| i.id == integration.id) {
            *slot = integration;
        }
    }

    #[must_use]
    pub fn connected_count(&self) -> usize {
        self.config.integrations.iter().filter(|i| i.connected).count()
    }

    /// Enter the saving state. Returns false when there is nothing to save or a
    /// save is already running; the caller finishes with
    /// [`TrainingDraft::commit`] after [`SAVE_DELAY`].
    pub fn begin_save(&mut self) -> bool {
        if self.saving || !self.changed() {
            return false;
        }
        self.saving = true;
        true
    }

    /// Write rules and config through the repository.
    ///
    /// # Errors
    ///
    /// Returns the storage failure; the draft keeps its changes so the user
    /// can retry.
    pub fn commit(&mut self, repo: &mut AssistantsState, backend: &dyn StorageBackend) -> Result<(), StorageError> {
        self.saving = false;
        repo.update_rules(backend, &self.assistant_id, self.rules.clone())?;
        repo.update_training_config(backend, &self.assistant_id, self.config.clone())?;
        self.saved_rules = self.rules.clone();
        self.saved_config = self.config.clone();
        log::info!("saved training for {}", self.assistant_id);
        Ok(())
    }
}
