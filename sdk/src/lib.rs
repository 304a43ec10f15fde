//! Async client for the Qualtive feedback service.
//!
//! # Overview
//! [`Qualtive`] fetches question forms, posts filled-out entries and uploads
//! image attachments. Request building and response parsing live in
//! `qualtive-core`; this crate runs the exchanges on tokio, owns the
//! persistent client id and gathers default entry attributes.
//!
//! Every operation returns a [`Pending`] future that resolves exactly once,
//! and can be cancelled before its requests go out.
//!
//! ```no_run
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! use qualtive::{Collection, Config, EntryContent, Qualtive};
//!
//! let qualtive = Qualtive::new(Config::from_env())?;
//! let collection = Collection::new("my-container", "my-question");
//! let question = qualtive.fetch_question(&collection).await?;
//!
//! let mut content = question.entry_template();
//! for answer in &mut content {
//!     if let EntryContent::Score(score) = answer {
//!         score.set_value(Some(80))?;
//!     }
//! }
//! let entry = qualtive
//!     .post_entry(&collection, content, None, [("Age", "23")])
//!     .await?;
//! println!("posted entry {}", entry.id);
//! # Ok(())
//! # }
//! ```

pub mod attributes;
pub mod cancel;
pub mod client_id;
pub mod config;
pub mod error;
pub mod pending;
pub mod transport;

use std::sync::Arc;

pub use attributes::SystemAttributes;
pub use cancel::CancellationToken;
pub use client_id::{ClientIdCell, ClientIdStore, FileStore, MemoryStore, CLIENT_ID_KEY};
pub use config::{AppInfo, Config, UserProfile};
pub use error::{ConfigError, StorageError};
pub use pending::Pending;
pub use qualtive_core::*;
pub use transport::{Transport, UreqTransport};

/// Handle to the feedback service. Cheap to clone; clones share the
/// transport, attribute provider and client id.
///
/// Operations spawn onto the current tokio runtime and must be started from
/// within one.
#[derive(Clone)]
pub struct Qualtive {
    inner: Arc<Inner>,
}

struct Inner {
    client: QualtiveClient,
    config: Config,
    transport: Arc<dyn Transport>,
    attributes: Arc<dyn AttributesProvider>,
    client_id: Arc<ClientIdCell>,
}

impl Qualtive {
    /// Instance with the default transport, system attributes and the
    /// process-wide on-disk client id.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        Self::builder(config).build()
    }

    pub fn builder(config: Config) -> QualtiveBuilder {
        QualtiveBuilder {
            config,
            transport: None,
            attributes: None,
            client_id: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Stable per-installation id. Generated and persisted on first use,
    /// which may touch the disk.
    pub fn client_id(&self) -> String {
        self.inner.client_id.get()
    }

    /// The user sent when a post names none: the client id plus the
    /// configured profile.
    pub fn user(&self) -> User {
        self.inner.default_user()
    }

    /// Fetch a question form in the configured locale.
    pub fn fetch_question(&self, collection: &Collection) -> Pending<Question, FetchError> {
        self.fetch_question_in(collection, &self.inner.config.locale)
    }

    /// Fetch a question form with an explicit `Accept-Language`.
    pub fn fetch_question_in(
        &self,
        collection: &Collection,
        locale: &Locale,
    ) -> Pending<Question, FetchError> {
        let inner = Arc::clone(&self.inner);
        let request = inner.client.build_fetch_question(collection, locale);
        Pending::spawn(|cancel| async move {
            let outcome = inner.execute(request, &cancel).await;
            inner.client.parse_fetch_question(outcome)
        })
    }

    /// Post a filled-out entry with attributes for the configured locale.
    ///
    /// `user` defaults to [`Qualtive::user`]. `custom_attributes` are merged
    /// over the default attributes; caller values win.
    pub fn post_entry<I, K, V>(
        &self,
        collection: &Collection,
        content: Vec<EntryContent>,
        user: Option<User>,
        custom_attributes: I,
    ) -> Pending<Entry, PostError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let locale = self.inner.config.locale.clone();
        self.post_entry_in(collection, content, user, custom_attributes, &locale)
    }

    /// Post a filled-out entry; `locale` drives the `Language` and `Region`
    /// attributes.
    pub fn post_entry_in<I, K, V>(
        &self,
        collection: &Collection,
        content: Vec<EntryContent>,
        user: Option<User>,
        custom_attributes: I,
        locale: &Locale,
    ) -> Pending<Entry, PostError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let inner = Arc::clone(&self.inner);
        let collection = collection.clone();
        let locale = locale.clone();
        let custom = merge_attributes(Attributes::new(), custom_attributes);
        Pending::spawn(|cancel| async move {
            // Client id and platform lookups may hit the disk.
            let prepare = Arc::clone(&inner);
            let prepared = run_blocking(move || {
                let user = user.unwrap_or_else(|| prepare.default_user());
                let defaults = prepare.attributes.default_attributes(&locale);
                (user, merge_attributes(defaults, custom))
            })
            .await;
            let Some((user, attributes)) = prepared else {
                return Err(GeneralError::Cancelled.into());
            };

            let request = inner
                .client
                .build_post_entry(&collection, &content, &user, &attributes)?;
            let outcome = inner.execute(request, &cancel).await;
            inner.client.parse_post_entry(outcome)
        })
    }

    /// Register an attachment, then upload its bytes to the returned URL.
    ///
    /// The attachment id comes from the first phase; the second phase only
    /// has to succeed. Cancelling between the phases skips the upload.
    pub fn create_attachment(
        &self,
        upload: Upload,
        container_id: &str,
    ) -> Pending<Attachment, UploadError> {
        let inner = Arc::clone(&self.inner);
        let container_id = container_id.to_string();
        Pending::spawn(|cancel| async move {
            let request = inner.client.build_create_attachment(&upload, &container_id)?;
            let outcome = inner.execute(request, &cancel).await;
            let pending = inner.client.parse_create_attachment(outcome)?;

            let request = inner.client.build_upload_attachment(&pending, &upload);
            let outcome = inner.execute(request, &cancel).await;
            inner.client.parse_upload_attachment(&pending, outcome)
        })
    }
}

impl Inner {
    fn default_user(&self) -> User {
        let profile = &self.config.user;
        User {
            client_id: self.client_id.get(),
            id: profile.id.clone(),
            name: profile.name.clone(),
            email: profile.email.clone(),
        }
    }

    async fn execute(&self, request: HttpRequest, cancel: &CancellationToken) -> TransportOutcome {
        let method = request.method;
        let url = request.url.clone();
        if cancel.is_cancelled() {
            tracing::debug!(method = method.as_str(), %url, "exchange skipped, cancelled");
            return Err(TransportError::Cancelled);
        }
        let transport = Arc::clone(&self.transport);
        let cancel = cancel.clone();
        let outcome = run_blocking(move || transport.execute(request, &cancel))
            .await
            .unwrap_or(Err(TransportError::Cancelled));
        match &outcome {
            Ok(response) => {
                tracing::debug!(method = method.as_str(), %url, status = response.status, "exchange")
            }
            Err(err) => tracing::debug!(method = method.as_str(), %url, error = %err, "exchange failed"),
        }
        outcome
    }
}

/// Runs `f` on the blocking pool. `None` if the runtime shut down first;
/// panics in `f` propagate.
async fn run_blocking<T, F>(f: F) -> Option<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(value) => Some(value),
        Err(err) if err.is_cancelled() => None,
        Err(err) => std::panic::resume_unwind(err.into_panic()),
    }
}

pub struct QualtiveBuilder {
    config: Config,
    transport: Option<Arc<dyn Transport>>,
    attributes: Option<Arc<dyn AttributesProvider>>,
    client_id: Option<Arc<ClientIdCell>>,
}

impl QualtiveBuilder {
    pub fn transport(mut self, transport: impl Transport) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    pub fn attributes(mut self, provider: impl AttributesProvider + 'static) -> Self {
        self.attributes = Some(Arc::new(provider));
        self
    }

    /// Keep the client id in `store` instead of the process-wide default.
    pub fn client_id_store(mut self, store: impl ClientIdStore + 'static) -> Self {
        self.client_id = Some(Arc::new(ClientIdCell::new(store)));
        self
    }

    pub fn build(self) -> Result<Qualtive, ConfigError> {
        let client = QualtiveClient::new(&self.config.base_url).map_err(|source| {
            ConfigError::InvalidBaseUrl {
                url: self.config.base_url.clone(),
                source,
            }
        })?;
        let client_id = self.client_id.unwrap_or_else(ClientIdCell::shared);
        let attributes = self
            .attributes
            .unwrap_or_else(|| Arc::new(SystemAttributes::new(self.config.app.clone())));
        let transport = self
            .transport
            .unwrap_or_else(|| Arc::new(UreqTransport::new()));

        Ok(Qualtive {
            inner: Arc::new(Inner {
                client,
                config: self.config,
                transport,
                attributes,
                client_id,
            }),
        })
    }
}
