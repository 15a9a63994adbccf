//! Assistant repository: CRUD over the persisted assistant list.
//!
//! DESIGN
//! ======
//! Every mutation rewrites the whole list under [`ASSISTANTS_KEY`]. The list is
//! seeded with two example assistants on the very first hydrate only; an empty
//! list the user produced by deleting everything stays empty.

#[cfg(test)]
#[path = "assistants_test.rs"]
mod assistants_test;

use crate::state::assistant::{Assistant, AssistantDraft, AssistantPatch, TrainingConfig, seed_assistants};
use crate::util::ids::generate_id;
use crate::util::storage::{Persisted, StorageBackend, StorageError, has_entry};

pub const ASSISTANTS_KEY: &str = "ai-assistants";

/// Repository state provided to pages through context.
#[derive(Clone, Debug, PartialEq)]
pub struct AssistantsState {
    store: Persisted<Vec<Assistant>>,
}

impl Default for AssistantsState {
    fn default() -> Self {
        Self {
            store: Persisted::new(ASSISTANTS_KEY, Vec::new()),
        }
    }
}

impl AssistantsState {
    /// Initial read, seeding the example assistants on a first run.
    ///
    /// # Errors
    ///
    /// Returns the write failure if seeding could not be persisted; the seeds
    /// stay in memory either way.
    pub fn hydrate(&mut self, backend: &dyn StorageBackend) -> Result<(), StorageError> {
        let never_written = !has_entry(backend, ASSISTANTS_KEY);
        self.store.hydrate(backend);
        if self.store.get().is_empty() && never_written {
            log::info!("seeding example assistants");
            return self.store.set(backend, seed_assistants());
        }
        Ok(())
    }

    #[must_use]
    pub fn loaded(&self) -> bool {
        self.store.loaded()
    }

    #[must_use]
    pub fn items(&self) -> &[Assistant] {
        self.store.get()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Assistant> {
        self.items().iter().find(|a| a.id == id)
    }

    /// Case-insensitive name filter. A blank query matches everything.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&Assistant> {
        let needle = query.trim().to_lowercase();
        self.items()
            .iter()
            .filter(|a| needle.is_empty() || a.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Append a new assistant with a fresh id.
    ///
    /// # Errors
    ///
    /// Returns the storage write failure.
    pub fn create(&mut self, backend: &dyn StorageBackend, draft: AssistantDraft) -> Result<Assistant, StorageError> {
        let assistant = draft.into_assistant(generate_id("assistant"));
        let created = assistant.clone();
        self.store.update(backend, |list| list.push(assistant))?;
        log::info!("created assistant {}", created.id);
        Ok(created)
    }

    /// Merge `patch` into the assistant with `id`. Unknown ids are a no-op.
    ///
    /// # Errors
    ///
    /// Returns the storage write failure.
    pub fn update(&mut self, backend: &dyn StorageBackend, id: &str, patch: AssistantPatch) -> Result<(), StorageError> {
        if self.get(id).is_none() {
            return Ok(());
        }
        self.store.update(backend, |list| {
            if let Some(assistant) = list.iter_mut().find(|a| a.id == id) {
                patch.apply(assistant);
            }
        })
    }

    /// Remove the assistant with `id`. Unknown ids are a no-op.
    ///
    /// # Errors
    ///
    /// Returns the storage write failure.
    pub fn delete(&mut self, backend: &dyn StorageBackend, id: &str) -> Result<(), StorageError> {
        if self.get(id).is_none() {
            return Ok(());
        }
        self.store.update(backend, |list| list.retain(|a| a.id != id))?;
        log::info!("deleted assistant {id}");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns the storage write failure.
    pub fn update_rules(&mut self, backend: &dyn StorageBackend, id: &str, rules: String) -> Result<(), StorageError> {
        self.update(
            backend,
            id,
            AssistantPatch {
                rules: Some(rules),
                ..AssistantPatch::default()
            },
        )
    }

    /// # Errors
    ///
    /// Returns the storage write failure.
    pub fn update_training_config(
        &mut self,
        backend: &dyn StorageBackend,
        id: &str,
        config: TrainingConfig,
    ) -> Result<(), StorageError> {
        self.update(
            backend,
            id,
            AssistantPatch {
                training_config: Some(config),
                ..AssistantPatch::default()
            },
        )
    }
}
