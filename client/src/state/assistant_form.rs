//! Two-step create / edit wizard for assistants.
//!
//! Step one collects name, language and tone; step two the response-length
//! distribution and audio toggle. Validation messages are user-facing.

#[cfg(test)]
#[path = "assistant_form_test.rs"]
mod assistant_form_test;

use std::time::Duration;

use crate::state::assistant::{
    Assistant, AssistantDraft, AssistantPatch, Language, LengthSlot, ResponseLength, Tone, TrainingConfig,
};
use crate::state::assistants::AssistantsState;
use crate::util::storage::{StorageBackend, StorageError};

/// Simulated latency of a save.
pub const SAVE_DELAY: Duration = Duration::from_millis(400);

const MIN_NAME_CHARS: usize = 3;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormStep {
    #[default]
    Basics,
    Distribution,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormField {
    Name,
    Language,
    Tone,
    ResponseLength,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("El nombre es requerido")]
    NameRequired,
    #[error("El nombre debe tener al menos 3 caracteres")]
    NameTooShort,
    #[error("Selecciona un idioma")]
    LanguageRequired,
    #[error("Selecciona un tono")]
    ToneRequired,
    #[error("La suma debe ser exactamente 100% (actual: {0}%)")]
    DistributionSum(u32),
}

impl FormError {
    #[must_use]
    pub fn field(&self) -> FormField {
        match self {
            FormError::NameRequired | FormError::NameTooShort => FormField::Name,
            FormError::LanguageRequired => FormField::Language,
            FormError::ToneRequired => FormField::Tone,
            FormError::DistributionSum(_) => FormField::ResponseLength,
        }
    }
}

/// What a valid form turns into.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormSubmission {
    Create(AssistantDraft),
    Update { id: String, patch: AssistantPatch },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssistantForm {
    editing: Option<String>,
    pub step: FormStep,
    pub name: String,
    pub language: Option<Language>,
    pub tone: Option<Tone>,
    pub response_length: ResponseLength,
    pub audio_enabled: bool,
    /// Set once the user tried to advance; inline errors show only after that.
    pub touched: bool,
    pub saving: bool,
}

impl Default for AssistantForm {
    fn default() -> Self {
        Self {
            editing: None,
            step: FormStep::Basics,
            name: String::new(),
            language: None,
            tone: None,
            response_length: ResponseLength::default(),
            audio_enabled: false,
            touched: false,
            saving: false,
        }
    }
}

impl AssistantForm {
    /// Empty form for a new assistant.
    #[must_use]
    pub fn create() -> Self {
        Self::default()
    }

    /// Form pre-filled from an existing assistant.
    #[must_use]
    pub fn edit(assistant: &Assistant) -> Self {
        Self {
            editing: Some(assistant.id.clone()),
            name: assistant.name.clone(),
            language: Some(assistant.language),
            tone: Some(assistant.tone),
            response_length: assistant.response_length,
            audio_enabled: assistant.audio_enabled,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    #[must_use]
    pub fn title(&self) -> &'static str {
        if self.is_editing() { "Editar Asistente" } else { "Crear Asistente" }
    }

    #[must_use]
    pub fn basics_errors(&self) -> Vec<FormError> {
        let mut errors = Vec::new();
        let name = self.name.trim();
        if name.is_empty() {
            errors.push(FormError::NameRequired);
        } else if name.chars().count() < MIN_NAME_CHARS {
            errors.push(FormError::NameTooShort);
        }
        if self.language.is_none() {
            errors.push(FormError::LanguageRequired);
        }
        if self.tone.is_none() {
            errors.push(FormError::ToneRequired);
        }
        errors
    }

    #[must_use]
    pub fn distribution_errors(&self) -> Vec<FormError> {
        let total = self.response_length.total();
        if total == 100 {
            Vec::new()
        } else {
            vec![FormError::DistributionSum(total)]
        }
    }

    /// Errors for the current step.
    #[must_use]
    pub fn errors(&self) -> Vec<FormError> {
        match self.step {
            FormStep::Basics => self.basics_errors(),
            FormStep::Distribution => self.distribution_errors(),
        }
    }

    /// Message to show under `field`, if any. Step-one fields stay quiet until
    /// the user has tried to advance.
    #[must_use]
    pub fn field_error(&self, field: FormField) -> Option<String> {
        if field != FormField::ResponseLength && !self.touched {
            return None;
        }
        self.errors()
            .into_iter()
            .find(|e| e.field() == field)
            .map(|e| e.to_string())
    }

    /// Advance to step two. Returns false and marks fields touched when step
    /// one is invalid.
    pub fn next(&mut self) -> bool {
        self.touched = true;
        if !self.basics_errors().is_empty() {
            return false;
        }
        self.step = FormStep::Distribution;
        true
    }

    pub fn back(&mut self) {
        if !self.saving {
            self.step = FormStep::Basics;
        }
    }

    pub fn set_length(&mut self, slot: LengthSlot, value: u32) {
        self.response_length.set(slot, value);
    }

    /// Enter the saving state; false when the form is invalid or already saving.
    pub fn begin_save(&mut self) -> bool {
        if self.saving || !self.basics_errors().is_empty() || !self.distribution_errors().is_empty() {
            return false;
        }
        self.saving = true;
        true
    }

    /// Validated create or update request.
    ///
    /// # Errors
    ///
    /// Every validation error across both steps.
    pub fn submission(&self) -> Result<FormSubmission, Vec<FormError>> {
        let mut errors = self.basics_errors();
        errors.extend(self.distribution_errors());
        let (Some(language), Some(tone)) = (self.language, self.tone) else {
            return Err(errors);
        };
        if !errors.is_empty() {
            return Err(errors);
        }
        let name = self.name.trim().to_owned();
        Ok(match &self.editing {
            Some(id) => FormSubmission::Update {
                id: id.clone(),
                patch: AssistantPatch {
                    name: Some(name),
                    language: Some(language),
                    tone: Some(tone),
                    response_length: Some(self.response_length),
                    audio_enabled: Some(self.audio_enabled),
                    ..AssistantPatch::default()
                },
            },
            None => FormSubmission::Create(AssistantDraft {
                name,
                language,
                tone,
                response_length: self.response_length,
                audio_enabled: self.audio_enabled,
                rules: String::new(),
                training_config: TrainingConfig::default(),
            }),
        })
    }
}

/// Outcome of [`save_form`].
#[derive(Debug, thiserror::Error)]
pub enum SaveFormError {
    #[error("{}", .0.first().map(ToString::to_string).unwrap_or_default())]
    Invalid(Vec<FormError>),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Apply a finished form to the repository. Returns the assistant id.
///
/// # Errors
///
/// Validation errors, or the storage write failure.
pub fn save_form(
    form: &mut AssistantForm,
    repo: &mut AssistantsState,
    backend: &dyn StorageBackend,
) -> Result<String, SaveFormError> {
    form.saving = false;
    match form.submission().map_err(SaveFormError::Invalid)? {
        FormSubmission::Create(draft) => Ok(repo.create(backend, draft)?.id),
        FormSubmission::Update { id, patch } => {
            repo.update(backend, &id, patch)?;
            Ok(id)
        }
    }
}
