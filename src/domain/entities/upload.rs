use std::path::Path;

use actix_web::web::Bytes;
use serde::{Serialize, Serializer};

/// A file part received in a multipart body, buffered in memory.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
    /// Bytes the client actually sent; may be larger than `bytes` when over `limit`.
    pub size: usize,
    pub limit: usize,
}

impl UploadedFile {
    pub fn new(file_name: impl Into<String>, content_type: Option<&str>, bytes: impl Into<Bytes>) -> Self {
        let bytes = bytes.into();
        UploadedFile {
            file_name: Some(file_name.into()),
            content_type: content_type.map(str::to_owned),
            size: bytes.len(),
            limit: usize::MAX,
            bytes,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn exceeds_limit(&self) -> bool {
        self.size > self.limit
    }

    /// Browsers submit an empty part for a file input left untouched.
    pub fn is_blank(&self) -> bool {
        self.size == 0 && self.file_name.as_deref().map_or(true, str::is_empty)
    }

    /// Extension of the client file name, lowercased.
    pub fn client_extension(&self) -> Option<String> {
        self.file_name
            .as_deref()
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(|ext| ext.to_ascii_lowercase())
    }
}

/// What arrived under the `image` key once empty values are discarded.
#[derive(Debug, Clone)]
pub enum ImageInput {
    File(UploadedFile),
    /// A plain text value where a file was expected.
    NotAFile,
}

/// Validation reports carry the offending value; only a tag is written, never file contents.
impl Serialize for ImageInput {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ImageInput::File(_) => serializer.serialize_str("file"),
            ImageInput::NotAFile => serializer.serialize_str("string"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_extension_is_lowercased() {
        let file = UploadedFile::new("Holiday.JPG", Some("image/jpeg"), Vec::new());
        assert_eq!(file.client_extension().as_deref(), Some("jpg"));
    }

    #[test]
    fn client_extension_ignores_odd_suffixes() {
        let file = UploadedFile::new("archive.tar.g$", None, Vec::new());
        assert_eq!(file.client_extension(), None);
    }

    #[test]
    fn untouched_file_input_is_blank() {
        let mut file = UploadedFile::new("", None, Vec::new());
        assert!(file.is_blank());

        file.file_name = Some("empty.jpg".into());
        assert!(!file.is_blank());
    }

    #[test]
    fn image_input_serializes_as_tag_only() {
        let file = ImageInput::File(UploadedFile::new("a.jpg", None, vec![0xFF, 0xD8, 0xFF]));

        assert_eq!(serde_json::to_value(&file).unwrap(), serde_json::json!("file"));
        assert_eq!(serde_json::to_value(ImageInput::NotAFile).unwrap(), serde_json::json!("string"));
    }

    #[test]
    fn limit_is_compared_against_sent_size() {
        let file = UploadedFile::new("big.png", None, vec![0u8; 16]).with_limit(8);
        assert!(file.exceeds_limit());
    }
}
