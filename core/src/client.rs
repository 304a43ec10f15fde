//! Stateless HTTP request builder and response parser for the Qualtive API.
//!
//! # Design
//! `QualtiveClient` holds only a base URL and carries no mutable state between
//! calls. Each remote exchange is split into a `build_*` method that produces
//! an `HttpRequest` and a `parse_*` method that consumes the transport
//! outcome. The caller executes the actual HTTP round-trip.
//!
//! Creating an attachment takes two exchanges: `build_create_attachment` /
//! `parse_create_attachment` yield a `PendingUpload`, then
//! `build_upload_attachment` / `parse_upload_attachment` PUT the bytes to the
//! pre-signed URL. The second exchange must only run after the first one
//! succeeded.

use url::Url;

use crate::attachment::{Attachment, PendingUpload, Upload};
use crate::attributes::Attributes;
use crate::codec;
use crate::entry::{Entry, EntryContent};
use crate::error::{FetchError, GeneralError, PostError, UnexpectedError, UploadError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, TransportOutcome, JSON_CONTENT_TYPE};
use crate::question::Question;
use crate::types::{Collection, Locale, User};

/// Production API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.qualtive.io";

const CONTAINER_HEADER: &str = "X-Container";

/// Synchronous, stateless client for the Qualtive API.
#[derive(Debug, Clone)]
pub struct QualtiveClient {
    base_url: Url,
}

impl QualtiveClient {
    /// Endpoint paths replace whatever path `base_url` carries.
    pub fn new(base_url: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        let mut url = self.base_url.clone();
        url.set_path(path);
        url.set_query(None);
        url.to_string()
    }

    pub fn build_fetch_question(&self, collection: &Collection, locale: &Locale) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: self.endpoint(&format!("/feedback/questions/{}/", collection.question_id)),
            headers: vec![
                (CONTAINER_HEADER.to_string(), collection.container_id.clone()),
                ("Accept-Language".to_string(), locale.accept_language()),
            ],
            body: None,
        }
    }

    pub fn parse_fetch_question(&self, outcome: TransportOutcome) -> Result<Question, FetchError> {
        let response = check_status(outcome).map_err(|failure| match failure {
            Failure::NotFound => FetchError::NotFound,
            Failure::General(err) => FetchError::General(err),
        })?;
        let json = codec::parse_body(&response.body).map_err(UnexpectedError::from)?;
        Ok(codec::decode_question(&json).map_err(UnexpectedError::from)?)
    }

    /// `attributes` must already be merged (platform defaults overlaid with
    /// the caller's custom attributes).
    pub fn build_post_entry(
        &self,
        collection: &Collection,
        content: &[EntryContent],
        user: &User,
        attributes: &Attributes,
    ) -> Result<HttpRequest, PostError> {
        let body = codec::encode_entry_post(&collection.question_id, content, user, attributes)
            .map_err(|e| UnexpectedError::Encode(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: self.endpoint("/feedback/entries/"),
            headers: vec![
                (CONTAINER_HEADER.to_string(), collection.container_id.clone()),
                ("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string()),
            ],
            body: Some(body),
        })
    }

    pub fn parse_post_entry(&self, outcome: TransportOutcome) -> Result<Entry, PostError> {
        let response = check_status(outcome).map_err(|failure| match failure {
            Failure::NotFound => PostError::QuestionNotFound,
            Failure::General(err) => PostError::General(err),
        })?;
        let json = codec::parse_body(&response.body).map_err(UnexpectedError::from)?;
        Ok(codec::decode_entry(&json).map_err(UnexpectedError::from)?)
    }

    pub fn build_create_attachment(
        &self,
        upload: &Upload,
        container_id: &str,
    ) -> Result<HttpRequest, UploadError> {
        let body = codec::encode_attachment_create(upload.kind)
            .map_err(|e| UnexpectedError::Encode(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: self.endpoint("/feedback/attachments/"),
            headers: vec![
                (CONTAINER_HEADER.to_string(), container_id.to_string()),
                ("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string()),
            ],
            body: Some(body),
        })
    }

    pub fn parse_create_attachment(
        &self,
        outcome: TransportOutcome,
    ) -> Result<PendingUpload, UploadError> {
        let response = check_status(outcome).map_err(Failure::into_upload_error)?;
        let json = codec::parse_body(&response.body).map_err(UnexpectedError::from)?;
        Ok(codec::decode_pending_upload(&json).map_err(UnexpectedError::from)?)
    }

    /// The upload URL is self-authorizing, so no `X-Container` header.
    pub fn build_upload_attachment(&self, pending: &PendingUpload, upload: &Upload) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Put,
            url: pending.upload_url.to_string(),
            headers: vec![("Content-Type".to_string(), upload.kind.mime_type().to_string())],
            body: Some(upload.data.clone()),
        }
    }

    /// Resolves with the attachment from the create step; the upload response
    /// body is ignored.
    pub fn parse_upload_attachment(
        &self,
        pending: &PendingUpload,
        outcome: TransportOutcome,
    ) -> Result<Attachment, UploadError> {
        check_status(outcome).map_err(Failure::into_upload_error)?;
        Ok(pending.attachment)
    }
}

/// A non-success outcome before any operation-specific meaning is applied.
enum Failure {
    NotFound,
    General(GeneralError),
}

impl Failure {
    /// Attachments have no dedicated 404 meaning.
    fn into_upload_error(self) -> UploadError {
        match self {
            Failure::NotFound => UnexpectedError::HttpStatus(404).into(),
            Failure::General(err) => UploadError::General(err),
        }
    }
}

/// Map the transport outcome and status code to a `Failure`.
fn check_status(outcome: TransportOutcome) -> Result<HttpResponse, Failure> {
    let response = outcome.map_err(|err| Failure::General(err.into()))?;
    match response.status {
        200..=299 => Ok(response),
        404 => Err(Failure::NotFound),
        503 => Err(Failure::General(UnexpectedError::RemoteMaintenance.into())),
        status => Err(Failure::General(UnexpectedError::HttpStatus(status).into())),
    }
}
