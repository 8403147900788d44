//! Image files picked for upload (logo or gallery pictures).

use std::path::Path;

use crate::i18n::{Language, Text, localize};

/// Upper bound accepted by the backend for a single image.
pub const MAX_UPLOAD_BYTES: usize = 2 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageType {
    Png,
    Jpeg,
}

impl ImageType {
    pub fn mime(&self) -> &'static str {
        match self {
            ImageType::Png => "image/png",
            ImageType::Jpeg => "image/jpeg",
        }
    }

    /// Derive the type from the file extension (`png`, `jpg`, `jpeg`).
    pub fn from_file_name(name: &str) -> Option<Self> {
        let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "png" => Some(ImageType::Png),
            "jpg" | "jpeg" => Some(ImageType::Jpeg),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    #[error("unsupported image type: {0}")]
    UnsupportedType(String),
    #[error("image is {size} bytes, limit is {MAX_UPLOAD_BYTES}")]
    TooLarge { size: usize },
    #[error("cannot read {path}: {message}")]
    Read { path: String, message: String },
}

impl UploadError {
    pub fn localized(&self, lang: Language) -> String {
        match self {
            UploadError::UnsupportedType(_) => localize(lang, Text::FileTypeError).to_string(),
            UploadError::TooLarge { .. } => localize(lang, Text::FileSizeError).to_string(),
            UploadError::Read { path, .. } => format!("{}: {}", localize(lang, Text::InvalidField), path),
        }
    }
}

/// A validated image held in memory until the next save.
#[derive(Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: String,
    pub image_type: ImageType,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for Upload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Upload")
            .field("file_name", &self.file_name)
            .field("image_type", &self.image_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl Upload {
    /// Accept a PNG or JPEG no larger than [`MAX_UPLOAD_BYTES`].
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, UploadError> {
        let file_name = file_name.into();
        let image_type = ImageType::from_file_name(&file_name)
            .ok_or_else(|| UploadError::UnsupportedType(file_name.clone()))?;
        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(UploadError::TooLarge { size: bytes.len() });
        }
        Ok(Self {
            file_name,
            image_type,
            bytes,
        })
    }

    /// Read and validate a file from disk.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, UploadError> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        // Reject by extension before touching the disk.
        if ImageType::from_file_name(&file_name).is_none() {
            return Err(UploadError::UnsupportedType(file_name));
        }
        let bytes = tokio::fs::read(path).await.map_err(|e| UploadError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::new(file_name, bytes)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
