//! Simulated assistant brain: canned replies and fake file analysis.
//!
//! ARCHITECTURE
//! ============
//! The chat session only sees the [`ResponseSource`] and [`FileAnalyzer`]
//! traits. [`Simulator`] implements both from static tables; a real inference
//! backend would slot in behind the same traits.

pub mod analysis;
pub mod responses;

use rand::RngCore;

use crate::state::assistant::{Language, Objective};
use crate::state::chat::ChatAttachment;
use crate::state::insights::FileAnalysis;

/// Produces assistant reply text.
pub trait ResponseSource {
    /// A reply for an assistant speaking `language`, trained for `objective`.
    fn pick(&self, language: Language, objective: Option<Objective>, rng: &mut dyn RngCore) -> String;

    /// Lead-in sentence acknowledging files the user attached.
    fn attachment_remark(&self, language: Language, rng: &mut dyn RngCore) -> String;
}

/// Produces metadata for an uploaded file.
pub trait FileAnalyzer {
    fn analyze(&self, attachment: &ChatAttachment, language: Language, rng: &mut dyn RngCore) -> FileAnalysis;
}

/// Table-driven implementation of both strategies.
#[derive(Clone, Copy, Debug, Default)]
pub struct Simulator;

impl ResponseSource for Simulator {
    fn pick(&self, language: Language, objective: Option<Objective>, rng: &mut dyn RngCore) -> String {
        responses::pick_from(responses::RESPONSES, language, objective, rng)
    }

    fn attachment_remark(&self, language: Language, rng: &mut dyn RngCore) -> String {
        responses::attachment_remark(language, rng)
    }
}

impl FileAnalyzer for Simulator {
    fn analyze(&self, attachment: &ChatAttachment, language: Language, rng: &mut dyn RngCore) -> FileAnalysis {
        analysis::fake_analysis(attachment, language, rng)
    }
}
