//! Supporting files attached to an analysis request.
//!
//! Attachments are held as names only. They are listed and removable but
//! their contents are never read or sent to the analysis generator.

use std::path::Path;
use thiserror::Error;

/// Maximum number of files per analysis.
pub const MAX_ATTACHMENTS: usize = 10;

/// Extensions accepted for upload (documents, spreadsheets, images, text).
pub const PERMITTED_EXTENSIONS: [&str; 10] = [
    "pdf", "doc", "docx", "txt", "png", "jpg", "jpeg", "csv", "xls", "xlsx",
];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AttachmentError {
    #[error("At most 10 files can be attached")]
    LimitReached,

    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("No attachment at position {0}")]
    NoSuchAttachment(usize),
}

/// An attached file, by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub name: String,
}

/// Ordered list of attached files.
#[derive(Debug, Clone, Default)]
pub struct AttachmentList {
    items: Vec<Attachment>,
}

impl AttachmentList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a file by name or path; only the final path component is kept.
    pub fn add(&mut self, file: impl AsRef<Path>) -> Result<&Attachment, AttachmentError> {
        let path = file.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();

        let permitted = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .is_some_and(|e| PERMITTED_EXTENSIONS.contains(&e.as_str()));
        if !permitted {
            return Err(AttachmentError::UnsupportedType(name));
        }

        if self.items.len() >= MAX_ATTACHMENTS {
            return Err(AttachmentError::LimitReached);
        }

        self.items.push(Attachment { name });
        Ok(&self.items[self.items.len() - 1])
    }

    /// Remove the attachment at `index`, shifting later ones down.
    pub fn remove(&mut self, index: usize) -> Result<Attachment, AttachmentError> {
        if index >= self.items.len() {
            return Err(AttachmentError::NoSuchAttachment(index));
        }
        Ok(self.items.remove(index))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|a| a.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
