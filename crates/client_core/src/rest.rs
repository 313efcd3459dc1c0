//! PostgREST binding of [`NoteGateway`] (the Supabase `/rest/v1` surface).

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use shared::{
    domain::{Note, NoteDraft, NoteId, NotePatch},
    error::TransportError,
};
use tracing::{debug, warn};
use url::Url;

use crate::{config::Settings, GatewayResult, NoteGateway};

const REST_PREFIX: &str = "rest/v1";
const RETURN_REPRESENTATION: &str = "return=representation";

/// Error body PostgREST sends with non-2xx responses.
#[derive(Debug, Deserialize)]
struct PostgrestErrorBody {
    message: Option<String>,
    details: Option<String>,
}

#[derive(Debug, Clone)]
struct Endpoint {
    table_url: Url,
    api_key: String,
}

pub struct RestNoteGateway {
    http: Client,
    /// `Err` when the URL or key is missing or malformed; every call then
    /// fails with the same transport error.
    endpoint: Result<Endpoint, TransportError>,
}

impl RestNoteGateway {
    pub fn new(settings: &Settings) -> Self {
        Self::with_client(Client::new(), settings)
    }

    pub fn with_client(http: Client, settings: &Settings) -> Self {
        Self {
            http,
            endpoint: resolve_endpoint(settings),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.endpoint.is_ok()
    }

    fn endpoint(&self) -> GatewayResult<&Endpoint> {
        self.endpoint.as_ref().map_err(Clone::clone)
    }

    fn authorized(&self, builder: RequestBuilder, endpoint: &Endpoint) -> RequestBuilder {
        builder
            .header("apikey", &endpoint.api_key)
            .bearer_auth(&endpoint.api_key)
    }

    async fn send_for_rows(
        &self,
        op: &'static str,
        builder: RequestBuilder,
    ) -> GatewayResult<Vec<Note>> {
        debug!(op, "note gateway request");
        let result = async {
            let response = builder.send().await.map_err(transport_from_reqwest)?;
            let response = check_status(response).await?;
            response.json::<Vec<Note>>().await.map_err(|err| {
                TransportError::new(format!("invalid note payload from store: {err}"))
            })
        }
        .await;
        if let Err(err) = &result {
            warn!(op, status = ?err.status, "note gateway request failed: {err}");
        }
        result
    }
}

#[async_trait]
impl NoteGateway for RestNoteGateway {
    async fn list(&self) -> GatewayResult<Vec<Note>> {
        let endpoint = self.endpoint()?;
        let builder = self
            .http
            .get(endpoint.table_url.clone())
            .query(&[("select", "*"), ("order", "updated_at.desc")]);
        self.send_for_rows("list", self.authorized(builder, endpoint))
            .await
    }

    async fn insert(&self, draft: &NoteDraft) -> GatewayResult<Note> {
        let endpoint = self.endpoint()?;
        let builder = self
            .http
            .post(endpoint.table_url.clone())
            .query(&[("select", "*")])
            .header("Prefer", RETURN_REPRESENTATION)
            .json(&[draft]);
        let rows = self
            .send_for_rows("insert", self.authorized(builder, endpoint))
            .await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| TransportError::new("store returned no row for the inserted note"))
    }

    async fn update(&self, id: NoteId, patch: &NotePatch) -> GatewayResult<Note> {
        let endpoint = self.endpoint()?;
        let builder = self
            .http
            .patch(endpoint.table_url.clone())
            .query(&[("id", format!("eq.{id}")), ("select", "*".to_string())])
            .header("Prefer", RETURN_REPRESENTATION)
            .json(patch);
        let rows = self
            .send_for_rows("update", self.authorized(builder, endpoint))
            .await?;
        rows.into_iter().next().ok_or_else(|| not_found(id))
    }

    async fn delete(&self, id: NoteId) -> GatewayResult<()> {
        let endpoint = self.endpoint()?;
        let builder = self
            .http
            .delete(endpoint.table_url.clone())
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", RETURN_REPRESENTATION);
        let rows = self
            .send_for_rows("delete", self.authorized(builder, endpoint))
            .await?;
        if rows.is_empty() {
            return Err(not_found(id));
        }
        Ok(())
    }
}

fn resolve_endpoint(settings: &Settings) -> Result<Endpoint, TransportError> {
    let raw_url = settings
        .supabase_url
        .as_deref()
        .ok_or_else(|| TransportError::new("remote store url is not configured"))?;
    let api_key = settings
        .supabase_key
        .clone()
        .ok_or_else(|| TransportError::new("remote store key is not configured"))?;

    let mut base = Url::parse(raw_url.trim()).map_err(|err| {
        TransportError::new(format!("invalid remote store url '{raw_url}': {err}"))
    })?;
    if !matches!(base.scheme(), "http" | "https") {
        return Err(TransportError::new(format!(
            "remote store url must start with http:// or https://: {raw_url}"
        )));
    }
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    let table_url = base
        .join(&format!("{REST_PREFIX}/{}", settings.table))
        .map_err(|err| {
            TransportError::new(format!("invalid note table '{}': {err}", settings.table))
        })?;

    Ok(Endpoint { table_url, api_key })
}

async fn check_status(response: Response) -> GatewayResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<PostgrestErrorBody>(&body)
        .ok()
        .and_then(|err| match (err.message, err.details) {
            (Some(message), Some(details)) if !details.is_empty() => {
                Some(format!("{message} ({details})"))
            }
            (Some(message), _) => Some(message),
            (None, details) => details,
        })
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
    Err(TransportError::with_status(status.as_u16(), message))
}

fn transport_from_reqwest(err: reqwest::Error) -> TransportError {
    TransportError {
        status: err.status().map(|status| status.as_u16()),
        message: err.to_string(),
    }
}

fn not_found(id: NoteId) -> TransportError {
    TransportError::new(format!("note {id} not found"))
}

#[cfg(test)]
#[path = "tests/rest_tests.rs"]
mod tests;
