//! Chat transcript model and attachment intake.

#[cfg(test)]
#[path = "chat_test.rs"]
mod chat_test;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::util::ids::generate_id;

/// Per-file upload limit.
pub const MAX_ATTACHMENT_BYTES: u64 = 10 * 1024 * 1024;

/// Content of a user message that only carries attachments.
pub const ATTACHMENTS_ONLY_TEXT: &str = "📎 Archivos adjuntos";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// Coarse file category derived from the MIME type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Image,
    Video,
    Pdf,
    Excel,
    Word,
    Text,
    Other,
}

impl FileType {
    #[must_use]
    pub fn from_mime(mime: &str) -> Self {
        let mime = mime.to_ascii_lowercase();
        if mime.starts_with("image/") {
            FileType::Image
        } else if mime.starts_with("video/") {
            FileType::Video
        } else if mime == "application/pdf" {
            FileType::Pdf
        } else if mime.contains("spreadsheet") || mime.contains("excel") || mime == "text/csv" {
            FileType::Excel
        } else if mime.contains("word") || mime.contains("document") {
            FileType::Word
        } else if mime.starts_with("text/") {
            FileType::Text
        } else {
            FileType::Other
        }
    }

    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            FileType::Image => "🖼️",
            FileType::Video => "🎬",
            FileType::Pdf => "📕",
            FileType::Excel => "📊",
            FileType::Word => "📝",
            FileType::Text => "📄",
            FileType::Other => "📎",
        }
    }
}

/// Human-readable byte count: `512 B`, `1.5 KB`, `10.0 MB`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;
    if bytes < KB {
        format!("{bytes} B")
    } else if bytes < MB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    }
}

/// File attached to a message, referenced by a blob URL.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatAttachment {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub file_type: FileType,
    pub size: u64,
    pub url: String,
    pub mime_type: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_audio: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<ChatAttachment>>,
}

impl ChatMessage {
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content.into())
    }

    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content.into())
    }

    fn new(role: ChatRole, content: String) -> Self {
        Self {
            id: generate_id("msg"),
            role,
            content,
            timestamp: Utc::now(),
            is_audio: None,
            attachments: None,
        }
    }

    #[must_use]
    pub fn with_audio(mut self) -> Self {
        self.is_audio = Some(true);
        self
    }

    #[must_use]
    pub fn with_attachments(mut self, attachments: Vec<ChatAttachment>) -> Self {
        if !attachments.is_empty() {
            self.attachments = Some(attachments);
        }
        self
    }

    #[must_use]
    pub fn attachment_list(&self) -> &[ChatAttachment] {
        self.attachments.as_deref().unwrap_or_default()
    }
}

/// A file chosen in the picker, before it becomes an attachment.
pub trait FileSource {
    fn name(&self) -> String;
    fn mime_type(&self) -> String;
    fn size(&self) -> u64;
    /// Create a blob URL for the file. Called only for accepted files.
    fn object_url(&self) -> Option<String>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttachmentError {
    #[error("El archivo {name} supera el límite de 10MB")]
    TooLarge { name: String },
    #[error("No se pudo leer el archivo {name}")]
    Unreadable { name: String },
}

/// Turn a picked file into an attachment, rejecting files over the size limit.
///
/// # Errors
///
/// [`AttachmentError::TooLarge`] over [`MAX_ATTACHMENT_BYTES`];
/// [`AttachmentError::Unreadable`] when no blob URL could be created.
pub fn accept_file(file: &dyn FileSource) -> Result<ChatAttachment, AttachmentError> {
    let name = file.name();
    if file.size() > MAX_ATTACHMENT_BYTES {
        return Err(AttachmentError::TooLarge { name });
    }
    let Some(url) = file.object_url() else {
        return Err(AttachmentError::Unreadable { name });
    };
    let mime_type = file.mime_type();
    Ok(ChatAttachment {
        id: generate_id("file"),
        file_type: FileType::from_mime(&mime_type),
        name,
        size: file.size(),
        url,
        mime_type,
    })
}
