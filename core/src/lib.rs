//! Synchronous API client core for the Qualtive feedback service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses transport outcomes without touching
//! the network (host-does-IO pattern). The `qualtive` crate executes the
//! round-trips; embedders with their own HTTP stack can drive
//! `QualtiveClient` directly.
//!
//! # Design
//! - `QualtiveClient` is stateless: it holds only the base URL.
//! - Each exchange is split into `build_*` (produces request) and `parse_*`
//!   (consumes outcome), so the I/O boundary is explicit.
//! - Question and entry content are closed enums. Decoding drops content
//!   variants it does not recognize instead of failing, so older clients keep
//!   working when the API grows new field types.
//! - `Question::entry_template` yields one blank answer per question content
//!   element, in order.

pub mod attachment;
pub mod attributes;
pub mod client;
pub mod codec;
pub mod entry;
pub mod error;
pub mod http;
pub mod question;
pub mod score;
pub mod types;

pub use attachment::{Attachment, PendingUpload, Upload, UploadKind};
pub use attributes::{merge_attributes, Attributes, AttributesProvider, NoAttributes};
pub use client::{QualtiveClient, DEFAULT_BASE_URL};
pub use entry::{
    AttachmentsAnswer, Entry, EntryContent, MultiselectAnswer, ScoreAnswer, SelectAnswer,
    TextAnswer, TitleAnswer,
};
pub use error::{
    DecodeError, FetchError, GeneralError, PostError, ScoreRangeError, UnexpectedError,
    UploadError,
};
pub use http::{
    HttpMethod, HttpRequest, HttpResponse, TransportError, TransportOutcome, REQUEST_TIMEOUT,
};
pub use question::{
    AttachmentsDefinition, MultiselectDefinition, Question, QuestionContent, ScoreDefinition,
    SelectDefinition, TextDefinition, TitleDefinition,
};
pub use score::{Score, ScoreKind};
pub use types::{Collection, Locale, User};
