//! Blocking HTTP client for the notes REST resource.
//!
//! # Responsibility
//! - Build endpoint URLs from one configured API base.
//! - Attach the Telegram init-data auth header to every request.
//! - Decode JSON bodies and treat any non-2xx status as a failure.
//!
//! # Invariants
//! - One `reqwest` client per `HttpNotesRemote`, built once.
//! - Note ids are sent as a single percent-encoded path segment; ids that
//!   would collapse into the collection path are rejected before sending.
//! - Init data content is never logged, only its length.

use super::{NotesRemote, RemoteError, RemoteResult};
use crate::model::note::{validate_note_id, CreateNoteRequest, Note, NotesEnvelope};
use log::{debug, warn};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::{Duration, Instant};

/// Header carrying the raw launch init data for server-side validation.
pub const INIT_DATA_HEADER: &str = "X-Init-Data";

const API_PATH_SEGMENT: &str = "api";

/// Connection settings for `HttpNotesRemote`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    /// API base, e.g. `http://localhost:3000/api`.
    pub base_url: String,
    /// Raw init data; sent as an empty header when absent.
    pub init_data_raw: String,
    /// Whole-request timeout enforced by the transport.
    pub timeout: Duration,
}

/// Body of the backend `GET /health` probe.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub version: String,
}

/// Notes resource reached over HTTP.
pub struct HttpNotesRemote {
    client: Client,
    base_url: Url,
    init_data_raw: String,
}

impl HttpNotesRemote {
    /// Builds the client. Fails on an unusable base URL or TLS setup error.
    pub fn new(config: RemoteConfig) -> RemoteResult<Self> {
        let base_url = Url::parse(config.base_url.trim())
            .map_err(|err| RemoteError::InvalidUrl(format!("{}: {err}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(RemoteError::InvalidUrl(config.base_url));
        }
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url,
            init_data_raw: config.init_data_raw,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Probes the server health endpoint, which lives beside `/api`.
    pub fn health(&self) -> RemoteResult<HealthStatus> {
        let url = self.origin_url(&["health"])?;
        let body = self.send(self.client.get(url), "GET", "/health")?;
        decode(&body)
    }

    fn endpoint(&self, segments: &[&str]) -> RemoteResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| RemoteError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn origin_url(&self, segments: &[&str]) -> RemoteResult<Url> {
        let mut url = self.base_url.clone();
        let ends_with_api = url
            .path_segments()
            .and_then(|mut parts| parts.rfind(|part| !part.is_empty()))
            == Some(API_PATH_SEGMENT);
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| RemoteError::InvalidUrl(self.base_url.to_string()))?;
            path.pop_if_empty();
            if ends_with_api {
                path.pop();
            }
            path.extend(segments);
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .header(CONTENT_TYPE, "application/json")
            .header(INIT_DATA_HEADER, self.init_data_raw.as_str())
    }

    /// Sends one request and returns the body of a 2xx response.
    fn send(&self, builder: RequestBuilder, method: &str, endpoint: &str) -> RemoteResult<String> {
        let started_at = Instant::now();
        debug!(
            "event=remote_request module=remote status=start method={method} endpoint={endpoint} init_data_len={}",
            self.init_data_raw.len()
        );

        let response = builder.send().map_err(|err| {
            warn!(
                "event=remote_request module=remote status=error method={method} endpoint={endpoint} duration_ms={} error_code=transport error={err}",
                started_at.elapsed().as_millis()
            );
            RemoteError::Transport(err)
        })?;

        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            warn!(
                "event=remote_request module=remote status=error method={method} endpoint={endpoint} duration_ms={} error_code=status http_status={}",
                started_at.elapsed().as_millis(),
                status.as_u16()
            );
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }

        debug!(
            "event=remote_request module=remote status=ok method={method} endpoint={endpoint} duration_ms={} http_status={}",
            started_at.elapsed().as_millis(),
            status.as_u16()
        );
        Ok(body)
    }
}

impl NotesRemote for HttpNotesRemote {
    fn fetch_all(&self) -> RemoteResult<Vec<Note>> {
        let url = self.endpoint(&["notes"])?;
        let body = self.send(self.request(Method::GET, url), "GET", "/notes")?;
        let envelope: NotesEnvelope = decode(&body)?;
        Ok(envelope.notes)
    }

    fn create(&self, text: &str) -> RemoteResult<Note> {
        let url = self.endpoint(&["notes"])?;
        let payload = CreateNoteRequest {
            text: text.to_string(),
        };
        let body = self.send(
            self.request(Method::POST, url).json(&payload),
            "POST",
            "/notes",
        )?;
        decode(&body)
    }

    fn delete(&self, id: &str) -> RemoteResult<()> {
        let id = validate_note_id(id).map_err(|_| RemoteError::InvalidNoteId(id.to_string()))?;
        let url = self.endpoint(&["notes", id])?;
        self.send(self.request(Method::DELETE, url), "DELETE", "/notes/{id}")?;
        Ok(())
    }

    fn delete_all(&self) -> RemoteResult<()> {
        let url = self.endpoint(&["notes"])?;
        self.send(self.request(Method::DELETE, url), "DELETE", "/notes")?;
        Ok(())
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> RemoteResult<T> {
    serde_json::from_str(body).map_err(RemoteError::Decode)
}
