//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render dialogs, cards and the assistant page panels while
//! reading/writing shared state from Leptos context providers.

pub mod alert_modal;
pub mod assistant_card;
pub mod assistant_modal;
pub mod chat_panel;
pub mod collaborators_tab;
pub mod integration_dialog;
pub mod training_panel;
