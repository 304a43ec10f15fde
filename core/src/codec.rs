//! JSON wire format of the Qualtive API.
//!
//! # Design
//! Decoding walks a `serde_json::Value` by hand instead of deriving
//! `Deserialize`: every failure has to name the offending field, and content
//! elements with an unknown `type` (or an unknown `scoreType`) must be dropped
//! while the rest of the question still decodes. A dropped element yields
//! `Ok(None)` from `decode_question_content`; `decode_question` keeps the
//! filtered sequence.
//!
//! Encoding goes through `#[derive(Serialize)]` wire structs that borrow from
//! the domain types.

use serde::Serialize;
use serde_json::{Map, Value};
use url::Url;

use crate::attachment::{Attachment, PendingUpload, UploadKind};
use crate::attributes::Attributes;
use crate::entry::{Entry, EntryContent};
use crate::error::DecodeError;
use crate::question::{
    AttachmentsDefinition, MultiselectDefinition, Question, QuestionContent, ScoreDefinition,
    SelectDefinition, TextDefinition, TitleDefinition,
};
use crate::score::ScoreKind;
use crate::types::User;

/// Marks which client library produced an entry.
pub const CLIENT_LIBRARY: &str = "rust";

// ---------------------------------------------------------------------------
// Decode
// ---------------------------------------------------------------------------

/// Parse a response body into a JSON value.
pub fn parse_body(body: &[u8]) -> Result<Value, DecodeError> {
    serde_json::from_slice(body).map_err(|e| DecodeError::NotJson(e.to_string()))
}

pub fn decode_question(json: &Value) -> Result<Question, DecodeError> {
    let root = json.as_object().ok_or(DecodeError::NotAnObject)?;
    let id = required_str(root, "id")?;
    let name = required_str(root, "name")?;
    let raw_content = root
        .get("content")
        .and_then(Value::as_array)
        .ok_or_else(|| DecodeError::field("content"))?;

    let mut content = Vec::with_capacity(raw_content.len());
    for element in raw_content {
        let element = element
            .as_object()
            .ok_or_else(|| DecodeError::field("content"))?;
        if let Some(decoded) = decode_question_content(element)? {
            content.push(decoded);
        }
    }

    Ok(Question {
        id: id.to_string(),
        name: name.to_string(),
        content,
    })
}

/// Decode one content element. `Ok(None)` means the element uses a variant
/// this version does not know and should be skipped.
pub fn decode_question_content(
    json: &Map<String, Value>,
) -> Result<Option<QuestionContent>, DecodeError> {
    let kind = required_str(json, "type")?;
    let content = match kind {
        "title" => QuestionContent::Title(TitleDefinition {
            text: required_str(json, "text")?.to_string(),
        }),
        "score" => match decode_score_kind(json)? {
            Some(kind) => QuestionContent::Score(ScoreDefinition { kind }),
            None => return Ok(None),
        },
        "text" => QuestionContent::Text(TextDefinition {
            placeholder: optional_str(json, "placeholder"),
        }),
        "select" => QuestionContent::Select(SelectDefinition {
            options: string_array(json, "options")?,
        }),
        "multiselect" => QuestionContent::Multiselect(MultiselectDefinition {
            options: string_array(json, "options")?,
        }),
        "attachments" => QuestionContent::Attachments(AttachmentsDefinition {}),
        other => {
            hint_new_version("type", other);
            return Ok(None);
        }
    };
    Ok(Some(content))
}

fn decode_score_kind(json: &Map<String, Value>) -> Result<Option<ScoreKind>, DecodeError> {
    let kind = match required_str(json, "scoreType")? {
        "smilies5" => ScoreKind::Smilies5,
        "smilies3" => ScoreKind::Smilies3,
        "thumbs" => ScoreKind::Thumbs,
        "nps" => ScoreKind::Nps {
            leading_text: optional_str(json, "leadingText").unwrap_or_default(),
            trailing_text: optional_str(json, "trailingText").unwrap_or_default(),
        },
        other => {
            hint_new_version("scoreType", other);
            return Ok(None);
        }
    };
    Ok(Some(kind))
}

pub fn decode_entry(json: &Value) -> Result<Entry, DecodeError> {
    let root = json.as_object().ok_or(DecodeError::NotAnObject)?;
    Ok(Entry {
        id: required_u64(root, "id")?,
    })
}

pub fn decode_attachment(json: &Value) -> Result<Attachment, DecodeError> {
    let root = json.as_object().ok_or(DecodeError::NotAnObject)?;
    Ok(Attachment {
        id: required_u64(root, "id")?,
    })
}

/// Decode the create-attachment response: `{id, uploadUrl}`.
pub fn decode_pending_upload(json: &Value) -> Result<PendingUpload, DecodeError> {
    let root = json.as_object().ok_or(DecodeError::NotAnObject)?;
    let upload_url = required_str(root, "uploadUrl")?;
    let upload_url = Url::parse(upload_url).map_err(|_| DecodeError::field("uploadUrl"))?;
    Ok(PendingUpload {
        attachment: decode_attachment(json)?,
        upload_url,
    })
}

fn required_str<'a>(json: &'a Map<String, Value>, field: &str) -> Result<&'a str, DecodeError> {
    json.get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| DecodeError::field(field))
}

fn required_u64(json: &Map<String, Value>, field: &str) -> Result<u64, DecodeError> {
    json.get(field)
        .and_then(Value::as_u64)
        .ok_or_else(|| DecodeError::field(field))
}

/// Missing, null and non-string values all read as absent.
fn optional_str(json: &Map<String, Value>, field: &str) -> Option<String> {
    json.get(field).and_then(Value::as_str).map(str::to_string)
}

fn string_array(json: &Map<String, Value>, field: &str) -> Result<Vec<String>, DecodeError> {
    json.get(field)
        .and_then(Value::as_array)
        .ok_or_else(|| DecodeError::field(field))?
        .iter()
        .map(|value| {
            value
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| DecodeError::field(field))
        })
        .collect()
}

fn hint_new_version(field: &str, value: &str) {
    tracing::info!(
        field,
        value,
        "skipping unknown question content; a newer version of the Qualtive client library may be available"
    );
}

// ---------------------------------------------------------------------------
// Encode
// ---------------------------------------------------------------------------

/// `scoreType` plus the nps labels, shared by question and entry encoding.
struct ScoreKindWire<'a> {
    score_type: &'static str,
    leading_text: Option<&'a str>,
    trailing_text: Option<&'a str>,
}

impl<'a> From<&'a ScoreKind> for ScoreKindWire<'a> {
    fn from(kind: &'a ScoreKind) -> Self {
        let (leading_text, trailing_text) = match kind {
            ScoreKind::Nps {
                leading_text,
                trailing_text,
            } => (Some(leading_text.as_str()), Some(trailing_text.as_str())),
            _ => (None, None),
        };
        Self {
            score_type: kind.wire_name(),
            leading_text,
            trailing_text,
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum QuestionContentWire<'a> {
    Title {
        text: &'a str,
    },
    Score {
        #[serde(rename = "scoreType")]
        score_type: &'static str,
        #[serde(rename = "leadingText", skip_serializing_if = "Option::is_none")]
        leading_text: Option<&'a str>,
        #[serde(rename = "trailingText", skip_serializing_if = "Option::is_none")]
        trailing_text: Option<&'a str>,
    },
    Text {
        #[serde(skip_serializing_if = "Option::is_none")]
        placeholder: Option<&'a str>,
    },
    Select {
        options: &'a [String],
    },
    Multiselect {
        options: &'a [String],
    },
    Attachments {},
}

impl<'a> From<&'a QuestionContent> for QuestionContentWire<'a> {
    fn from(content: &'a QuestionContent) -> Self {
        match content {
            QuestionContent::Title(def) => QuestionContentWire::Title { text: &def.text },
            QuestionContent::Score(def) => {
                let kind = ScoreKindWire::from(&def.kind);
                QuestionContentWire::Score {
                    score_type: kind.score_type,
                    leading_text: kind.leading_text,
                    trailing_text: kind.trailing_text,
                }
            }
            QuestionContent::Text(def) => QuestionContentWire::Text {
                placeholder: def.placeholder.as_deref(),
            },
            QuestionContent::Select(def) => QuestionContentWire::Select {
                options: &def.options,
            },
            QuestionContent::Multiselect(def) => QuestionContentWire::Multiselect {
                options: &def.options,
            },
            QuestionContent::Attachments(_) => QuestionContentWire::Attachments {},
        }
    }
}

#[derive(Serialize)]
struct QuestionWire<'a> {
    id: &'a str,
    name: &'a str,
    content: Vec<QuestionContentWire<'a>>,
}

/// Encode a question into the shape the API serves it in.
pub fn encode_question(question: &Question) -> Result<Value, serde_json::Error> {
    serde_json::to_value(QuestionWire {
        id: &question.id,
        name: &question.name,
        content: question.content.iter().map(Into::into).collect(),
    })
}

#[derive(Serialize)]
struct AttachmentRefWire {
    id: u64,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum EntryContentWire<'a> {
    Title {
        text: &'a str,
    },
    Score {
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<u8>,
        #[serde(rename = "scoreType")]
        score_type: &'static str,
        #[serde(rename = "leadingText", skip_serializing_if = "Option::is_none")]
        leading_text: Option<&'a str>,
        #[serde(rename = "trailingText", skip_serializing_if = "Option::is_none")]
        trailing_text: Option<&'a str>,
    },
    Text {
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<&'a str>,
    },
    Select {
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<&'a str>,
    },
    Multiselect {
        values: &'a [String],
    },
    Attachments {
        values: Vec<AttachmentRefWire>,
    },
}

impl<'a> From<&'a EntryContent> for EntryContentWire<'a> {
    fn from(content: &'a EntryContent) -> Self {
        match content {
            EntryContent::Title(answer) => EntryContentWire::Title { text: &answer.text },
            EntryContent::Score(answer) => {
                let kind = ScoreKindWire::from(&answer.definition.kind);
                EntryContentWire::Score {
                    value: answer.value().map(|score| score.value()),
                    score_type: kind.score_type,
                    leading_text: kind.leading_text,
                    trailing_text: kind.trailing_text,
                }
            }
            EntryContent::Text(answer) => EntryContentWire::Text {
                value: answer.value.as_deref(),
            },
            EntryContent::Select(answer) => EntryContentWire::Select {
                value: answer.value.as_deref(),
            },
            EntryContent::Multiselect(answer) => EntryContentWire::Multiselect {
                values: &answer.values,
            },
            EntryContent::Attachments(answer) => EntryContentWire::Attachments {
                values: answer
                    .values
                    .iter()
                    .map(|attachment| AttachmentRefWire { id: attachment.id })
                    .collect(),
            },
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AttributeHintsWire {
    client_library: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EntryPostWire<'a> {
    question_id: &'a str,
    content: Vec<EntryContentWire<'a>>,
    attribute_hints: AttributeHintsWire,
    user: &'a User,
    attributes: &'a Attributes,
}

/// Request body for `POST /feedback/entries/`. `attributes` is expected to
/// be already merged.
pub fn encode_entry_post(
    question_id: &str,
    content: &[EntryContent],
    user: &User,
    attributes: &Attributes,
) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(&EntryPostWire {
        question_id,
        content: content.iter().map(Into::into).collect(),
        attribute_hints: AttributeHintsWire {
            client_library: CLIENT_LIBRARY,
        },
        user,
        attributes,
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AttachmentCreateWire {
    content_type: &'static str,
}

/// Request body for `POST /feedback/attachments/`.
pub fn encode_attachment_create(kind: UploadKind) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(&AttachmentCreateWire {
        content_type: kind.mime_type(),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::entry::{
        AttachmentsAnswer, MultiselectAnswer, ScoreAnswer, SelectAnswer, TextAnswer, TitleAnswer,
    };

    fn question_json(content: Value) -> Value {
        json!({ "id": "question-id", "name": "Question Name", "content": content })
    }

    #[test]
    fn decode_empty_content() {
        let question = decode_question(&question_json(json!([]))).unwrap();
        assert_eq!(question.id, "question-id");
        assert_eq!(question.name, "Question Name");
        assert!(question.content.is_empty());
    }

    #[test]
    fn decode_every_variant() {
        let question = decode_question(&question_json(json!([
            { "type": "title", "text": "Your thoughts?" },
            { "type": "score", "scoreType": "smilies3" },
            { "type": "text", "placeholder": "Write here…" },
            { "type": "select", "options": ["A", "B"] },
            { "type": "multiselect", "options": ["X", "Y", "Z"] },
            { "type": "attachments" },
        ])))
        .unwrap();

        assert_eq!(
            question.content,
            vec![
                QuestionContent::Title(TitleDefinition {
                    text: "Your thoughts?".to_string()
                }),
                QuestionContent::Score(ScoreDefinition {
                    kind: ScoreKind::Smilies3
                }),
                QuestionContent::Text(TextDefinition {
                    placeholder: Some("Write here…".to_string())
                }),
                QuestionContent::Select(SelectDefinition {
                    options: vec!["A".to_string(), "B".to_string()]
                }),
                QuestionContent::Multiselect(MultiselectDefinition {
                    options: vec!["X".to_string(), "Y".to_string(), "Z".to_string()]
                }),
                QuestionContent::Attachments(AttachmentsDefinition {}),
            ]
        );
    }

    #[test]
    fn null_placeholder_is_absent() {
        let question =
            decode_question(&question_json(json!([{ "type": "text", "placeholder": null }])))
                .unwrap();
        assert_eq!(
            question.content,
            vec![QuestionContent::Text(TextDefinition { placeholder: None })]
        );
    }

    #[test]
    fn nps_texts_default_to_empty() {
        let question =
            decode_question(&question_json(json!([{ "type": "score", "scoreType": "nps" }])))
                .unwrap();
        assert_eq!(
            question.content,
            vec![QuestionContent::Score(ScoreDefinition {
                kind: ScoreKind::Nps {
                    leading_text: String::new(),
                    trailing_text: String::new(),
                }
            })]
        );
    }

    #[test]
    fn unknown_type_is_dropped_and_order_kept() {
        let question = decode_question(&question_json(json!([
            { "type": "title", "text": "First" },
            { "type": "hologram", "depth": 3 },
            { "type": "text" },
        ])))
        .unwrap();
        assert_eq!(question.content.len(), 2);
        assert_eq!(question.content[0].type_name(), "title");
        assert_eq!(question.content[1].type_name(), "text");
    }

    #[test]
    fn unknown_score_type_drops_only_that_element() {
        let question = decode_question(&question_json(json!([
            { "type": "score", "scoreType": "stars10" },
            { "type": "score", "scoreType": "thumbs" },
        ])))
        .unwrap();
        assert_eq!(
            question.content,
            vec![QuestionContent::Score(ScoreDefinition {
                kind: ScoreKind::Thumbs
            })]
        );
    }

    #[test]
    fn invalid_roots_and_fields() {
        assert_eq!(decode_question(&json!([1])), Err(DecodeError::NotAnObject));
        assert_eq!(
            decode_question(&json!({ "id": 1, "name": "n", "content": [] })),
            Err(DecodeError::field("id"))
        );
        assert_eq!(
            decode_question(&json!({ "id": "a", "content": [] })),
            Err(DecodeError::field("name"))
        );
        assert_eq!(
            decode_question(&json!({ "id": "a", "name": "n", "content": {} })),
            Err(DecodeError::field("content"))
        );
        assert_eq!(
            decode_question(&question_json(json!([1]))),
            Err(DecodeError::field("content"))
        );
    }

    #[test]
    fn invalid_variant_fields_fail_the_decode() {
        assert_eq!(
            decode_question(&question_json(json!([{ "text": "no type" }]))),
            Err(DecodeError::field("type"))
        );
        assert_eq!(
            decode_question(&question_json(json!([{ "type": "title" }]))),
            Err(DecodeError::field("text"))
        );
        assert_eq!(
            decode_question(&question_json(json!([{ "type": "select", "options": [1] }]))),
            Err(DecodeError::field("options"))
        );
        assert_eq!(
            decode_question(&question_json(json!([{ "type": "multiselect" }]))),
            Err(DecodeError::field("options"))
        );
        assert_eq!(
            decode_question(&question_json(json!([{ "type": "score" }]))),
            Err(DecodeError::field("scoreType"))
        );
    }

    #[test]
    fn question_encode_decode_round_trip() {
        let question = Question {
            id: "q".to_string(),
            name: "Q".to_string(),
            content: vec![
                QuestionContent::Title(TitleDefinition {
                    text: "T".to_string(),
                }),
                QuestionContent::Score(ScoreDefinition {
                    kind: ScoreKind::Nps {
                        leading_text: "Low".to_string(),
                        trailing_text: "High".to_string(),
                    },
                }),
                QuestionContent::Score(ScoreDefinition {
                    kind: ScoreKind::Smilies5,
                }),
                QuestionContent::Text(TextDefinition {
                    placeholder: Some("P".to_string()),
                }),
                QuestionContent::Text(TextDefinition { placeholder: None }),
                QuestionContent::Select(SelectDefinition {
                    options: vec!["a".to_string()],
                }),
                QuestionContent::Multiselect(MultiselectDefinition {
                    options: vec!["b".to_string(), "c".to_string()],
                }),
                QuestionContent::Attachments(AttachmentsDefinition {}),
            ],
        };
        assert_eq!(decode_question(&encode_question(&question).unwrap()).unwrap(), question);
    }

    #[test]
    fn decode_entry_requires_integer_id() {
        assert_eq!(decode_entry(&json!({ "id": 123 })).unwrap(), Entry { id: 123 });
        assert_eq!(decode_entry(&json!({ "id": "123" })), Err(DecodeError::field("id")));
        assert_eq!(decode_entry(&json!({ "id": -4 })), Err(DecodeError::field("id")));
        assert_eq!(decode_entry(&json!([1])), Err(DecodeError::NotAnObject));
    }

    #[test]
    fn decode_pending_upload_validates_url() {
        let pending =
            decode_pending_upload(&json!({ "id": 7, "uploadUrl": "https://x/y" })).unwrap();
        assert_eq!(pending.attachment, Attachment { id: 7 });
        assert_eq!(pending.upload_url.as_str(), "https://x/y");

        assert_eq!(
            decode_pending_upload(&json!({ "id": 7, "uploadUrl": "not a url" })),
            Err(DecodeError::field("uploadUrl"))
        );
        assert_eq!(
            decode_pending_upload(&json!({ "id": 7 })),
            Err(DecodeError::field("uploadUrl"))
        );
        assert_eq!(
            decode_pending_upload(&json!({ "uploadUrl": "https://x/y" })),
            Err(DecodeError::field("id"))
        );
    }

    #[test]
    fn parse_body_rejects_garbage() {
        assert!(matches!(parse_body(b"not json"), Err(DecodeError::NotJson(_))));
    }

    #[test]
    fn encode_entry_post_body() {
        let content = vec![
            EntryContent::Title(TitleAnswer::new("Hi")),
            EntryContent::Score(ScoreAnswer::new(Some(75)).unwrap()),
            EntryContent::Score(ScoreAnswer::new(None).unwrap()),
            EntryContent::Text(TextAnswer::new(Some("Hello world!".to_string()))),
            EntryContent::Text(TextAnswer::new(None)),
            EntryContent::Select(SelectAnswer::new(Some("Selected".to_string()))),
            EntryContent::Multiselect(MultiselectAnswer::new(Vec::new())),
            EntryContent::Attachments(AttachmentsAnswer::new(vec![Attachment { id: 9 }])),
        ];
        let user = User::new("cid").with_id("ci-rust");
        let attributes = Attributes::from([("Age".to_string(), "23".to_string())]);

        let body = encode_entry_post("question-id", &content, &user, &attributes).unwrap();
        let body: Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(
            body,
            json!({
                "questionId": "question-id",
                "content": [
                    { "type": "title", "text": "Hi" },
                    { "type": "score", "value": 75, "scoreType": "smilies5" },
                    { "type": "score", "scoreType": "smilies5" },
                    { "type": "text", "value": "Hello world!" },
                    { "type": "text" },
                    { "type": "select", "value": "Selected" },
                    { "type": "multiselect", "values": [] },
                    { "type": "attachments", "values": [{ "id": 9 }] },
                ],
                "attributeHints": { "clientLibrary": "rust" },
                "user": { "clientId": "cid", "id": "ci-rust" },
                "attributes": { "Age": "23" },
            })
        );
    }

    #[test]
    fn encode_score_answer_carries_nps_texts() {
        let mut answer = ScoreAnswer::from_definition(&ScoreDefinition {
            kind: ScoreKind::Nps {
                leading_text: "No".to_string(),
                trailing_text: "Yes".to_string(),
            },
        });
        answer.set_value(Some(10)).unwrap();
        let body = encode_entry_post(
            "q",
            &[EntryContent::Score(answer)],
            &User::new("cid"),
            &Attributes::new(),
        )
        .unwrap();
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            body["content"][0],
            json!({ "type": "score", "value": 10, "scoreType": "nps", "leadingText": "No", "trailingText": "Yes" })
        );
    }

    #[test]
    fn encode_attachment_create_body() {
        let body = encode_attachment_create(UploadKind::Jpeg).unwrap();
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, json!({ "contentType": "image/jpeg" }));
    }
}
