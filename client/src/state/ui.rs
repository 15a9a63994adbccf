//! Local UI chrome state for the list page (landing, search, alerts).
//!
//! DESIGN
//! ======
//! Keeps transient presentation concerns out of domain state (`assistants`,
//! `session`) so pages can evolve independently of the stored records.

#[cfg(test)]
#[path = "ui_test.rs"]
mod ui_test;

use crate::util::storage::{StorageBackend, StorageError, read_json, write_json};

/// Storage flag set once the visitor leaves the landing hero.
pub const LANDING_SEEN_KEY: &str = "funnelhot-landing-seen";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlertKind {
    Success,
    Error,
}

/// Blocking result dialog. `continue_to` is a route to open on "Continuar".
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub title: String,
    pub description: String,
    pub continue_to: Option<String>,
}

impl Alert {
    #[must_use]
    pub fn created(name: &str, id: &str) -> Self {
        Self {
            kind: AlertKind::Success,
            title: "¡Asistente creado!".to_owned(),
            description: format!("\"{name}\" ha sido creado exitosamente. Presiona continuar para entrenarlo."),
            continue_to: Some(format!("/{id}")),
        }
    }

    #[must_use]
    pub fn updated(name: &str, id: &str) -> Self {
        Self {
            kind: AlertKind::Success,
            title: "¡Asistente actualizado!".to_owned(),
            description: format!("\"{name}\" ha sido actualizado correctamente."),
            continue_to: Some(format!("/{id}")),
        }
    }

    #[must_use]
    pub fn deleted(name: Option<&str>) -> Self {
        Self {
            kind: AlertKind::Success,
            title: "¡Asistente eliminado!".to_owned(),
            description: match name {
                Some(name) => format!("\"{name}\" ha sido eliminado correctamente."),
                None => "El asistente ha sido eliminado.".to_owned(),
            },
            continue_to: None,
        }
    }

    #[must_use]
    pub fn training_saved() -> Self {
        Self {
            kind: AlertKind::Success,
            title: "¡Entrenamiento guardado!".to_owned(),
            description: "Las reglas y configuración del asistente han sido actualizadas correctamente.".to_owned(),
            continue_to: None,
        }
    }

    #[must_use]
    pub fn error(title: &str, err: &dyn std::error::Error) -> Self {
        Self {
            kind: AlertKind::Error,
            title: title.to_owned(),
            description: err.to_string(),
            continue_to: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UiState {
    pub show_landing: bool,
    pub search_query: String,
    pub alert: Option<Alert>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            show_landing: true,
            search_query: String::new(),
            alert: None,
        }
    }
}

impl UiState {
    /// Skip the landing hero for returning visitors.
    pub fn hydrate(&mut self, backend: &dyn StorageBackend) {
        if read_json::<bool>(backend, LANDING_SEEN_KEY) == Some(true) {
            self.show_landing = false;
        }
    }

    /// Leave the landing hero and remember it.
    ///
    /// # Errors
    ///
    /// Returns the storage write failure; the hero is dismissed regardless.
    pub fn start(&mut self, backend: &dyn StorageBackend) -> Result<(), StorageError> {
        self.show_landing = false;
        write_json(backend, LANDING_SEEN_KEY, &true)
    }

    /// Show the landing hero again and forget that it was seen.
    ///
    /// # Errors
    ///
    /// Returns the storage failure.
    pub fn back_to_landing(&mut self, backend: &dyn StorageBackend) -> Result<(), StorageError> {
        self.show_landing = true;
        backend.remove_item(LANDING_SEEN_KEY)
    }

    pub fn show_alert(&mut self, alert: Alert) {
        self.alert = Some(alert);
    }

    pub fn close_alert(&mut self) {
        self.alert = None;
    }

    /// Hint shown under the search box when the query filters everything out.
    #[must_use]
    pub fn no_results_message(&self, visible: usize) -> Option<String> {
        (!self.search_query.is_empty() && visible == 0)
            .then(|| format!("No se encontraron asistentes con \"{}\"", self.search_query))
    }
}

/// Subtitle of the list page.
#[must_use]
pub fn assistant_count_label(count: usize) -> String {
    match count {
        0 => "Crea tu primer asistente de IA".to_owned(),
        1 => "1 asistente configurado".to_owned(),
        n => format!("{n} asistentes configurados"),
    }
}
