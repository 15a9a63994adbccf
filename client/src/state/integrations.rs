//! Third-party integration catalog and the connect/disconnect draft.

#[cfg(test)]
#[path = "integrations_test.rs"]
mod integrations_test;

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Simulated round trip for a connect request.
pub const CONNECT_DELAY: Duration = Duration::from_millis(1500);

/// Integration family, used for grouping in the training screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegrationKind {
    Messaging,
    Ads,
    Crm,
    Analytics,
    Automation,
}

impl IntegrationKind {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            IntegrationKind::Messaging => "Mensajería",
            IntegrationKind::Ads => "Publicidad",
            IntegrationKind::Crm => "CRM",
            IntegrationKind::Analytics => "Analítica",
            IntegrationKind::Automation => "Automatización",
        }
    }
}

/// One catalog entry plus its connection state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Integration {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: IntegrationKind,
    pub connected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
}

impl Integration {
    fn catalog(id: &str, name: &str, kind: IntegrationKind) -> Self {
        Self {
            id: id.to_owned(),
            name: name.to_owned(),
            kind,
            connected: false,
            api_key: None,
            webhook_url: None,
            account_id: None,
        }
    }

    /// Vendor documentation for obtaining credentials, when known.
    #[must_use]
    pub fn docs_url(&self) -> Option<&'static str> {
        let url = match self.id.as_str() {
            "whatsapp" => "https://developers.facebook.com/docs/whatsapp",
            "messenger" => "https://developers.facebook.com/docs/messenger-platform",
            "instagram" => "https://developers.facebook.com/docs/instagram-api",
            "telegram" => "https://core.telegram.org/bots/api",
            "facebook-ads" => "https://developers.facebook.com/docs/marketing-apis",
            "google-ads" => "https://developers.google.com/google-ads/api/docs/start",
            "youtube" => "https://developers.google.com/youtube/v3",
            "tiktok" => "https://ads.tiktok.com/marketing_api/docs",
            "linkedin" => "https://learn.microsoft.com/en-us/linkedin/marketing/",
            "hubspot" => "https://developers.hubspot.com/docs/api/overview",
            "salesforce" => "https://developer.salesforce.com/docs/apis",
            "zapier" => "https://platform.zapier.com/docs",
            "make" => "https://www.make.com/en/api-documentation",
            "n8n" => "https://docs.n8n.io/api/",
            _ => return None,
        };
        Some(url)
    }
}

/// The 14 supported integrations, all disconnected.
#[must_use]
pub fn default_integrations() -> Vec<Integration> {
    use IntegrationKind::{Ads, Automation, Crm, Messaging};
    vec![
        Integration::catalog("whatsapp", "WhatsApp Business", Messaging),
        Integration::catalog("messenger", "Facebook Messenger", Messaging),
        Integration::catalog("instagram", "Instagram Direct", Messaging),
        Integration::catalog("telegram", "Telegram", Messaging),
        Integration::catalog("facebook-ads", "Facebook Ads", Ads),
        Integration::catalog("google-ads", "Google Ads", Ads),
        Integration::catalog("youtube", "YouTube", Ads),
        Integration::catalog("tiktok", "TikTok Ads", Ads),
        Integration::catalog("linkedin", "LinkedIn Ads", Ads),
        Integration::catalog("hubspot", "HubSpot", Crm),
        Integration::catalog("salesforce", "Salesforce", Crm),
        Integration::catalog("zapier", "Zapier", Automation),
        Integration::catalog("make", "Make (Integromat)", Automation),
        Integration::catalog("n8n", "n8n", Automation),
    ]
}

/// Validation failures in the integration dialog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntegrationError {
    #[error("La API Key es requerida para conectar")]
    MissingApiKey,
}

/// Editable copy of one integration inside the connect dialog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntegrationDraft {
    pub integration: Integration,
    pub api_key: String,
    pub webhook_url: String,
    pub account_id: String,
    pub connecting: bool,
}

impl IntegrationDraft {
    #[must_use]
    pub fn open(integration: &Integration) -> Self {
        Self {
            integration: integration.clone(),
            api_key: integration.api_key.clone().unwrap_or_default(),
            webhook_url: integration.webhook_url.clone().unwrap_or_default(),
            account_id: integration.account_id.clone().unwrap_or_default(),
            connecting: false,
        }
    }

    /// Validate and enter the connecting state. The caller completes it with
    /// [`IntegrationDraft::finish_connect`] after [`CONNECT_DELAY`].
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationError::MissingApiKey`] when no key was entered.
    pub fn begin_connect(&mut self) -> Result<(), IntegrationError> {
        if self.api_key.trim().is_empty() {
            return Err(IntegrationError::MissingApiKey);
        }
        self.connecting = true;
        Ok(())
    }

    /// Connected integration carrying the entered credentials.
    #[must_use]
    pub fn finish_connect(&mut self) -> Integration {
        self.connecting = false;
        let non_empty = |s: &str| {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_owned())
        };
        Integration {
            connected: true,
            api_key: non_empty(&self.api_key),
            webhook_url: non_empty(&self.webhook_url),
            account_id: non_empty(&self.account_id),
            ..self.integration.clone()
        }
    }

    /// Disconnected integration with all credentials cleared.
    #[must_use]
    pub fn disconnect(&self) -> Integration {
        Integration {
            connected: false,
            api_key: None,
            webhook_url: None,
            account_id: None,
            ..self.integration.clone()
        }
    }
}
