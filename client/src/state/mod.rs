//! Application state: domain records, persisted stores and the chat reducer.

pub mod analytics;
pub mod assistant;
pub mod assistant_form;
pub mod assistants;
pub mod chat;
pub mod collaborators;
pub mod insights;
pub mod integrations;
pub mod session;
pub mod training;
pub mod ui;
