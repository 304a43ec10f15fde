//! In-memory stand-in for the Qualtive feedback API.
//!
//! Serves the four endpoints the client libraries talk to. Requests to the
//! `/feedback/` routes must carry `X-Container`; questions are looked up per
//! container. Upload URLs handed out by the attachment route point back at
//! this server (`/uploads/{token}`) and need no container header.

use std::{collections::HashMap, sync::Arc};

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const CONTAINER_HEADER: &str = "x-container";

/// A question as served on the wire. `content` stays raw so tests can serve
/// content types no client knows yet.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuestionDoc {
    pub id: String,
    pub name: String,
    pub content: Vec<Value>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostedUser {
    pub client_id: String,
    pub id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Body of `POST /feedback/entries/`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPost {
    pub question_id: String,
    pub content: Vec<Value>,
    pub attribute_hints: HashMap<String, String>,
    pub user: PostedUser,
    pub attributes: HashMap<String, String>,
}

#[derive(Clone, Debug)]
pub struct StoredEntry {
    pub id: u64,
    pub container_id: String,
    pub post: EntryPost,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentCreate {
    pub content_type: String,
}

#[derive(Clone, Debug)]
pub struct StoredAttachment {
    pub id: u64,
    pub container_id: String,
    pub content_type: String,
    pub token: Uuid,
    /// `None` until the bytes have been PUT to the upload URL.
    pub data: Option<Vec<u8>>,
    pub uploaded_content_type: Option<String>,
}

#[derive(Default)]
struct Store {
    questions: HashMap<(String, String), QuestionDoc>,
    entries: Vec<StoredEntry>,
    attachments: Vec<StoredAttachment>,
    maintenance: bool,
}

/// Shared handle to the server's data, usable from tests while the server
/// runs.
#[derive(Clone, Default)]
pub struct MockState {
    store: Arc<RwLock<Store>>,
}

impl MockState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State holding the `ci-test` / `rust` question used by the test suites.
    pub fn seeded() -> Self {
        let question = QuestionDoc {
            id: "rust".to_string(),
            name: "Rust client".to_string(),
            content: vec![
                json!({ "type": "title", "text": "How are we doing?" }),
                json!({ "type": "score", "scoreType": "smilies5" }),
                json!({ "type": "text", "placeholder": "Tell us more" }),
                json!({ "type": "select", "options": ["Good", "Bad"] }),
                json!({ "type": "multiselect", "options": ["Fast", "Simple", "Cheap"] }),
                json!({ "type": "attachments" }),
            ],
        };
        let mut store = Store::default();
        store
            .questions
            .insert(("ci-test".to_string(), question.id.clone()), question);
        Self {
            store: Arc::new(RwLock::new(store)),
        }
    }

    pub async fn insert_question(&self, container_id: &str, question: QuestionDoc) {
        self.store
            .write()
            .await
            .questions
            .insert((container_id.to_string(), question.id.clone()), question);
    }

    /// While enabled every `/feedback/` route answers 503.
    pub async fn set_maintenance(&self, enabled: bool) {
        self.store.write().await.maintenance = enabled;
    }

    pub async fn entries(&self) -> Vec<StoredEntry> {
        self.store.read().await.entries.clone()
    }

    pub async fn attachment(&self, id: u64) -> Option<StoredAttachment> {
        self.store
            .read()
            .await
            .attachments
            .iter()
            .find(|attachment| attachment.id == id)
            .cloned()
    }
}

pub fn app() -> Router {
    app_with_state(MockState::seeded())
}

pub fn app_with_state(state: MockState) -> Router {
    Router::new()
        .route("/feedback/questions/{question_id}/", get(get_question))
        .route("/feedback/entries/", post(create_entry))
        .route("/feedback/attachments/", post(create_attachment))
        .route("/uploads/{token}", put(upload_attachment))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with_state(listener, MockState::seeded()).await
}

pub async fn run_with_state(listener: TcpListener, state: MockState) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_state(state)).await
}

/// Container of the request, or the status to answer with.
fn container(headers: &HeaderMap, store: &Store) -> Result<String, StatusCode> {
    if store.maintenance {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }
    headers
        .get(CONTAINER_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or(StatusCode::BAD_REQUEST)
}

async fn get_question(
    State(state): State<MockState>,
    Path(question_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<QuestionDoc>, StatusCode> {
    let store = state.store.read().await;
    let container_id = container(&headers, &store)?;
    tracing::debug!(%container_id, %question_id, "fetch question");
    store
        .questions
        .get(&(container_id, question_id))
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn create_entry(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(post): Json<EntryPost>,
) -> Result<Json<Value>, StatusCode> {
    let mut store = state.store.write().await;
    let container_id = container(&headers, &store)?;
    if !store
        .questions
        .contains_key(&(container_id.clone(), post.question_id.clone()))
    {
        return Err(StatusCode::NOT_FOUND);
    }
    let id = store.entries.len() as u64 + 1;
    tracing::debug!(%container_id, id, "entry posted");
    store.entries.push(StoredEntry {
        id,
        container_id,
        post,
    });
    Ok(Json(json!({ "id": id })))
}

async fn create_attachment(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(input): Json<AttachmentCreate>,
) -> Result<Json<Value>, StatusCode> {
    let mut store = state.store.write().await;
    let container_id = container(&headers, &store)?;
    if !matches!(input.content_type.as_str(), "image/png" | "image/jpeg") {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }
    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .ok_or(StatusCode::BAD_REQUEST)?;

    let id = store.attachments.len() as u64 + 1;
    let token = Uuid::new_v4();
    store.attachments.push(StoredAttachment {
        id,
        container_id,
        content_type: input.content_type,
        token,
        data: None,
        uploaded_content_type: None,
    });
    Ok(Json(json!({
        "id": id,
        "uploadUrl": format!("http://{host}/uploads/{token}"),
    })))
}

async fn upload_attachment(
    State(state): State<MockState>,
    Path(token): Path<Uuid>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let mut store = state.store.write().await;
    let Some(attachment) = store
        .attachments
        .iter_mut()
        .find(|attachment| attachment.token == token)
    else {
        return StatusCode::NOT_FOUND;
    };
    attachment.uploaded_content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    attachment.data = Some(body.to_vec());
    StatusCode::OK
}
