use super::*;

struct FakeFile {
    name: &'static str,
    mime: &'static str,
    size: u64,
    url: Option<&'static str>,
}

impl FileSource for FakeFile {
    fn name(&self) -> String {
        self.name.to_owned()
    }
    fn mime_type(&self) -> String {
        self.mime.to_owned()
    }
    fn size(&self) -> u64 {
        self.size
    }
    fn object_url(&self) -> Option<String> {
        self.url.map(str::to_owned)
    }
}

// =============================================================
// FileType / format_file_size
// =============================================================

#[test]
fn file_type_from_mime() {
    assert_eq!(FileType::from_mime("image/png"), FileType::Image);
    assert_eq!(FileType::from_mime("video/mp4"), FileType::Video);
    assert_eq!(FileType::from_mime("application/pdf"), FileType::Pdf);
    assert_eq!(
        FileType::from_mime("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        FileType::Excel
    );
    assert_eq!(FileType::from_mime("text/csv"), FileType::Excel);
    assert_eq!(FileType::from_mime("application/msword"), FileType::Word);
    assert_eq!(FileType::from_mime("text/plain"), FileType::Text);
    assert_eq!(FileType::from_mime("application/zip"), FileType::Other);
}

#[test]
fn format_file_size_units() {
    assert_eq!(format_file_size(512), "512 B");
    assert_eq!(format_file_size(1536), "1.5 KB");
    assert_eq!(format_file_size(10 * 1024 * 1024), "10.0 MB");
}

// =============================================================
// ChatMessage
// =============================================================

#[test]
fn message_serializes_camel_case_and_skips_absent_options() {
    let msg = ChatMessage::user("hola");
    let json = serde_json::to_value(&msg).unwrap();
    assert_eq!(json["role"], "user");
    assert!(json.get("isAudio").is_none());
    assert!(json.get("attachments").is_none());

    let json = serde_json::to_value(ChatMessage::user("voz").with_audio()).unwrap();
    assert_eq!(json["isAudio"], true);
}

#[test]
fn empty_attachment_list_is_not_stored() {
    let msg = ChatMessage::assistant("ok").with_attachments(Vec::new());
    assert_eq!(msg.attachments, None);
    assert!(msg.attachment_list().is_empty());
}

// =============================================================
// accept_file
// =============================================================

#[test]
fn accept_file_builds_attachment() {
    let file = FakeFile {
        name: "report.pdf",
        mime: "application/pdf",
        size: 2048,
        url: Some("blob:1"),
    };
    let attachment = accept_file(&file).unwrap();
    assert_eq!(attachment.file_type, FileType::Pdf);
    assert_eq!(attachment.url, "blob:1");
    assert_eq!(attachment.size, 2048);
}

#[test]
fn accept_file_rejects_oversized() {
    let file = FakeFile {
        name: "movie.mp4",
        mime: "video/mp4",
        size: MAX_ATTACHMENT_BYTES + 1,
        url: Some("blob:2"),
    };
    assert_eq!(
        accept_file(&file),
        Err(AttachmentError::TooLarge {
            name: "movie.mp4".to_owned()
        })
    );
}

#[test]
fn accept_file_at_exact_limit_is_fine() {
    let file = FakeFile {
        name: "big.txt",
        mime: "text/plain",
        size: MAX_ATTACHMENT_BYTES,
        url: Some("blob:3"),
    };
    assert!(accept_file(&file).is_ok());
}

#[test]
fn accept_file_without_url_is_unreadable() {
    let file = FakeFile {
        name: "x.txt",
        mime: "text/plain",
        size: 1,
        url: None,
    };
    assert!(matches!(accept_file(&file), Err(AttachmentError::Unreadable { .. })));
}
