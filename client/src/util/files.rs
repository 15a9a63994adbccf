//! Browser file-picker glue: picked files as [`FileSource`]s and blob URL
//! lifetime.
//!
//! Outside the `hydrate` build there are no files to pick and revocation is a
//! no-op, so callers need no feature gates of their own.

#[cfg(feature = "hydrate")]
use crate::state::chat::FileSource;

/// A file chosen through an `<input type="file">`.
#[cfg(feature = "hydrate")]
pub struct WebFile(web_sys::File);

#[cfg(feature = "hydrate")]
impl FileSource for WebFile {
    fn name(&self) -> String {
        self.0.name()
    }

    fn mime_type(&self) -> String {
        self.0.type_()
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn size(&self) -> u64 {
        self.0.size() as u64
    }

    fn object_url(&self) -> Option<String> {
        match web_sys::Url::create_object_url_with_blob(&self.0) {
            Ok(url) => Some(url),
            Err(e) => {
                log::warn!("could not create blob url for {}: {e:?}", self.0.name());
                None
            }
        }
    }
}

/// Drain the files currently selected in `input` and clear it so the same
/// file can be picked again.
#[cfg(feature = "hydrate")]
pub fn take_selected_files(input: &web_sys::HtmlInputElement) -> Vec<WebFile> {
    let mut picked = Vec::new();
    if let Some(list) = input.files() {
        for i in 0..list.length() {
            if let Some(file) = list.get(i) {
                picked.push(WebFile(file));
            }
        }
    }
    input.set_value("");
    picked
}

/// Release a blob URL created for an attachment.
pub fn revoke_object_url(url: &str) {
    #[cfg(feature = "hydrate")]
    {
        if let Err(e) = web_sys::Url::revoke_object_url(url) {
            log::debug!("revoke failed for {url}: {e:?}");
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = url;
    }
}
