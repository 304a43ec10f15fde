//! Attachments and the data needed to upload them.

use url::Url;

/// An attachment created on Qualtive, referenced by id from entry content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Attachment {
    pub id: u64,
}

/// File format of an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Png,
    Jpeg,
}

impl UploadKind {
    pub fn mime_type(&self) -> &'static str {
        match self {
            UploadKind::Png => "image/png",
            UploadKind::Jpeg => "image/jpeg",
        }
    }
}

/// Raw bytes to attach, with their format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub data: Vec<u8>,
    pub kind: UploadKind,
}

impl Upload {
    pub fn new(data: impl Into<Vec<u8>>, kind: UploadKind) -> Self {
        Self {
            data: data.into(),
            kind,
        }
    }
}

/// Result of the create step: the attachment row exists, its bytes do not.
///
/// `upload_url` is pre-signed; the upload step sends the bytes there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingUpload {
    pub attachment: Attachment,
    pub upload_url: Url,
}
