//! Assistant profile and training configuration model.
//!
//! DESIGN
//! ======
//! Field names serialize in camelCase and enum values as their Spanish display
//! strings, which is the layout already sitting in users' `localStorage`.

#[cfg(test)]
#[path = "assistant_test.rs"]
mod assistant_test;

use serde::{Deserialize, Serialize};

use crate::state::integrations::{Integration, default_integrations};

/// Conversation language of an assistant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "Español")]
    Spanish,
    #[serde(rename = "Inglés")]
    English,
    #[serde(rename = "Portugués")]
    Portuguese,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Spanish, Language::English, Language::Portuguese];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Language::Spanish => "Español",
            Language::English => "Inglés",
            Language::Portuguese => "Portugués",
        }
    }

    /// BCP 47 tag handed to speech recognition and synthesis.
    #[must_use]
    pub fn speech_tag(self) -> &'static str {
        match self {
            Language::Spanish => "es-ES",
            Language::English => "en-US",
            Language::Portuguese => "pt-BR",
        }
    }

    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.label() == label)
    }
}

/// Conversational register.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tone {
    #[default]
    Formal,
    Casual,
    Profesional,
    Amigable,
}

impl Tone {
    pub const ALL: [Tone; 4] = [Tone::Formal, Tone::Casual, Tone::Profesional, Tone::Amigable];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Tone::Formal => "Formal",
            Tone::Casual => "Casual",
            Tone::Profesional => "Profesional",
            Tone::Amigable => "Amigable",
        }
    }

    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.label() == label)
    }
}

/// What the assistant is trained to accomplish.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Objective {
    #[default]
    #[serde(rename = "Ventas")]
    Sales,
    #[serde(rename = "Soporte")]
    Support,
    #[serde(rename = "Marketing")]
    Marketing,
    #[serde(rename = "Automatización")]
    Automation,
    #[serde(rename = "Captación de Leads")]
    LeadGen,
}

impl Objective {
    pub const ALL: [Objective; 5] = [
        Objective::Sales,
        Objective::Support,
        Objective::Marketing,
        Objective::Automation,
        Objective::LeadGen,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Objective::Sales => "Ventas",
            Objective::Support => "Soporte",
            Objective::Marketing => "Marketing",
            Objective::Automation => "Automatización",
            Objective::LeadGen => "Captación de Leads",
        }
    }
}

/// Lead temperature the assistant focuses on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeadCategory {
    Hot,
    Warm,
    Cold,
    #[default]
    Todos,
}

impl LeadCategory {
    pub const ALL: [LeadCategory; 4] = [
        LeadCategory::Hot,
        LeadCategory::Warm,
        LeadCategory::Cold,
        LeadCategory::Todos,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            LeadCategory::Hot => "Hot",
            LeadCategory::Warm => "Warm",
            LeadCategory::Cold => "Cold",
            LeadCategory::Todos => "Todos",
        }
    }
}

/// Channel the assistant is deployed on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    #[default]
    Webchat,
    WhatsApp,
    Email,
    #[serde(rename = "SMS")]
    Sms,
    #[serde(rename = "Facebook Ads")]
    FacebookAds,
    Instagram,
    YouTube,
    TikTok,
    LinkedIn,
    Telegram,
    Messenger,
    #[serde(rename = "Google Ads")]
    GoogleAds,
    Todos,
}

impl Channel {
    pub const ALL: [Channel; 13] = [
        Channel::Webchat,
        Channel::WhatsApp,
        Channel::Email,
        Channel::Sms,
        Channel::FacebookAds,
        Channel::Instagram,
        Channel::YouTube,
        Channel::TikTok,
        Channel::LinkedIn,
        Channel::Telegram,
        Channel::Messenger,
        Channel::GoogleAds,
        Channel::Todos,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Channel::Webchat => "Webchat",
            Channel::WhatsApp => "WhatsApp",
            Channel::Email => "Email",
            Channel::Sms => "SMS",
            Channel::FacebookAds => "Facebook Ads",
            Channel::Instagram => "Instagram",
            Channel::YouTube => "YouTube",
            Channel::TikTok => "TikTok",
            Channel::LinkedIn => "LinkedIn",
            Channel::Telegram => "Telegram",
            Channel::Messenger => "Messenger",
            Channel::GoogleAds => "Google Ads",
            Channel::Todos => "Todos",
        }
    }
}

/// Percentage split between short, medium and long replies. Sums to 100 when valid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseLength {
    pub short: u32,
    pub medium: u32,
    pub long: u32,
}

impl Default for ResponseLength {
    fn default() -> Self {
        Self {
            short: 33,
            medium: 34,
            long: 33,
        }
    }
}

/// One of the three response-length sliders.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LengthSlot {
    Short,
    Medium,
    Long,
}

impl LengthSlot {
    /// Left-to-right slider order.
    pub const ORDER: [LengthSlot; 3] = [LengthSlot::Short, LengthSlot::Medium, LengthSlot::Long];
}

impl ResponseLength {
    #[must_use]
    pub fn total(&self) -> u32 {
        self.short + self.medium + self.long
    }

    #[must_use]
    pub fn get(&self, slot: LengthSlot) -> u32 {
        match slot {
            LengthSlot::Short => self.short,
            LengthSlot::Medium => self.medium,
            LengthSlot::Long => self.long,
        }
    }

    fn slot_mut(&mut self, slot: LengthSlot) -> &mut u32 {
        match slot {
            LengthSlot::Short => &mut self.short,
            LengthSlot::Medium => &mut self.medium,
            LengthSlot::Long => &mut self.long,
        }
    }

    /// Move one slider and rebalance the other two so the total stays at 100.
    ///
    /// `value` is clamped to 0..=100. The difference is absorbed by the other
    /// sliders in left-to-right order: any excess is taken from them (never
    /// below 0), any shortfall is handed to them (never above 100).
    pub fn set(&mut self, slot: LengthSlot, value: u32) {
        *self.slot_mut(slot) = value.min(100);
        let others = LengthSlot::ORDER.into_iter().filter(|s| *s != slot);

        let total = self.total();
        if total > 100 {
            let mut excess = total - 100;
            for other in others {
                let current = self.slot_mut(other);
                let reduction = (*current).min(excess);
                *current -= reduction;
                excess -= reduction;
            }
        } else if total < 100 {
            let mut deficit = 100 - total;
            for other in others {
                let current = self.slot_mut(other);
                let raise = (100 - *current).min(deficit);
                *current += raise;
                deficit -= raise;
            }
        }
    }
}

/// Behavioural settings edited on the training screen.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingConfig {
    pub objective: Objective,
    pub lead_category: LeadCategory,
    pub channel: Channel,
    pub auto_escalate: bool,
    pub schedule_enabled: bool,
    pub sentiment_analysis: bool,
    pub product_recommendations: bool,
    #[serde(default)]
    pub custom_prompt: String,
    #[serde(default)]
    pub integrations: Vec<Integration>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            objective: Objective::Sales,
            lead_category: LeadCategory::Todos,
            channel: Channel::Webchat,
            auto_escalate: true,
            schedule_enabled: false,
            sentiment_analysis: true,
            product_recommendations: false,
            custom_prompt: String::new(),
            integrations: default_integrations(),
        }
    }
}

impl TrainingConfig {
    /// Copy with the integration catalog filled in when none were stored.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut cfg = self.clone();
        if cfg.integrations.is_empty() {
            cfg.integrations = default_integrations();
        }
        cfg
    }
}

/// A configured mock chat assistant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assistant {
    pub id: String,
    pub name: String,
    pub language: Language,
    pub tone: Tone,
    pub response_length: ResponseLength,
    pub audio_enabled: bool,
    #[serde(default)]
    pub rules: String,
    #[serde(default)]
    pub training_config: TrainingConfig,
}

/// Everything needed to create an assistant; the repository assigns the id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssistantDraft {
    pub name: String,
    pub language: Language,
    pub tone: Tone,
    pub response_length: ResponseLength,
    pub audio_enabled: bool,
    pub rules: String,
    pub training_config: TrainingConfig,
}

impl AssistantDraft {
    #[must_use]
    pub fn into_assistant(self, id: String) -> Assistant {
        Assistant {
            id,
            name: self.name,
            language: self.language,
            tone: self.tone,
            response_length: self.response_length,
            audio_enabled: self.audio_enabled,
            rules: self.rules,
            training_config: self.training_config,
        }
    }
}

/// Partial update merged into an existing assistant. `None` leaves a field alone.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssistantPatch {
    pub name: Option<String>,
    pub language: Option<Language>,
    pub tone: Option<Tone>,
    pub response_length: Option<ResponseLength>,
    pub audio_enabled: Option<bool>,
    pub rules: Option<String>,
    pub training_config: Option<TrainingConfig>,
}

impl AssistantPatch {
    pub fn apply(self, assistant: &mut Assistant) {
        if let Some(name) = self.name {
            assistant.name = name;
        }
        if let Some(language) = self.language {
            assistant.language = language;
        }
        if let Some(tone) = self.tone {
            assistant.tone = tone;
        }
        if let Some(response_length) = self.response_length {
            assistant.response_length = response_length;
        }
        if let Some(audio_enabled) = self.audio_enabled {
            assistant.audio_enabled = audio_enabled;
        }
        if let Some(rules) = self.rules {
            assistant.rules = rules;
        }
        if let Some(training_config) = self.training_config {
            assistant.training_config = training_config;
        }
    }
}

/// The two example assistants written on a first run.
#[must_use]
pub fn seed_assistants() -> Vec<Assistant> {
    vec![
        Assistant {
            id: "assistant-1".to_owned(),
            name: "Asistente de Ventas".to_owned(),
            language: Language::Spanish,
            tone: Tone::Profesional,
            response_length: ResponseLength {
                short: 30,
                medium: 50,
                long: 20,
            },
            audio_enabled: true,
            rules: "Responde siempre de manera profesional y enfocada en ayudar al cliente a encontrar el producto ideal."
                .to_owned(),
            training_config: TrainingConfig {
                objective: Objective::Sales,
                lead_category: LeadCategory::Hot,
                product_recommendations: true,
                ..TrainingConfig::default()
            },
        },
        Assistant {
            id: "assistant-2".to_owned(),
            name: "Soporte Técnico Bot".to_owned(),
            language: Language::English,
            tone: Tone::Formal,
            response_length: ResponseLength {
                short: 20,
                medium: 40,
                long: 40,
            },
            audio_enabled: false,
            rules: "Provide detailed technical support. Always ask for error codes and system information.".to_owned(),
            training_config: TrainingConfig {
                objective: Objective::Support,
                lead_category: LeadCategory::Todos,
                sentiment_analysis: true,
                auto_escalate: true,
                ..TrainingConfig::default()
            },
        },
    ]
}
