//! Bluesky platform implementation
//!
//! Talks XRPC to the account's PDS directly: a session is created with the
//! handle and app password, then an `app.bsky.feed.post` record is written to
//! the user's repo. A fresh session is created for every post.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::BlueskyConfig;
use crate::error::{PlatformError, Result};
use crate::platforms::Platform;

pub const DEFAULT_SERVICE: &str = "https://bsky.social";

const POST_COLLECTION: &str = "app.bsky.feed.post";

#[derive(Serialize)]
struct CreateSessionRequest<'a> {
    identifier: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Session {
    access_jwt: String,
    did: String,
}

#[derive(Serialize)]
struct CreateRecordRequest<'a> {
    repo: &'a str,
    collection: &'a str,
    record: PostRecord<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PostRecord<'a> {
    #[serde(rename = "$type")]
    record_type: &'a str,
    text: &'a str,
    created_at: String,
}

#[derive(Deserialize)]
struct CreateRecordResponse {
    uri: String,
}

pub struct BlueskyClient {
    client: reqwest::Client,
    service: String,
    handle: Option<String>,
    app_password: Option<String>,
}

impl BlueskyClient {
    /// Create a client for `service` (a PDS base URL)
    pub fn new(service: String, handle: Option<String>, app_password: Option<String>) -> Self {
        Self {
            client: super::http_client(),
            service: service.trim_end_matches('/').to_string(),
            handle: handle.filter(|h| !h.trim().is_empty()),
            app_password: app_password.filter(|p| !p.is_empty()),
        }
    }

    pub fn from_config(config: Option<&BlueskyConfig>) -> Self {
        match config {
            Some(config) => Self::new(
                config
                    .service
                    .clone()
                    .unwrap_or_else(|| DEFAULT_SERVICE.to_string()),
                config.username.clone(),
                config.password.clone(),
            ),
            None => Self::new(DEFAULT_SERVICE.to_string(), None, None),
        }
    }

    fn xrpc_url(&self, method: &str) -> String {
        format!("{}/xrpc/{}", self.service, method)
    }

    async fn create_session(&self, handle: &str, password: &str) -> Result<Session> {
        tracing::debug!("Creating Bluesky session for handle: {}", handle);

        let response = self
            .client
            .post(self.xrpc_url("com.atproto.server.createSession"))
            .json(&CreateSessionRequest {
                identifier: handle,
                password,
            })
            .send()
            .await
            .map_err(|e| map_transport_error(e, "authentication"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PlatformError::from_status(
                "Bluesky",
                "authentication",
                status.as_u16(),
                &body,
            )
            .into());
        }

        let session = response.json().await.map_err(|e| {
            PlatformError::Authentication(format!("Unexpected Bluesky session response: {}", e))
        })?;
        Ok(session)
    }
}

fn map_transport_error(error: reqwest::Error, context: &str) -> PlatformError {
    PlatformError::Network(format!(
        "Network error while connecting to Bluesky PDS during {}: {}",
        context, error
    ))
}

#[async_trait]
impl Platform for BlueskyClient {
    fn name(&self) -> &str {
        "bluesky"
    }

    fn is_configured(&self) -> bool {
        self.handle.is_some() && self.app_password.is_some()
    }

    async fn post(&self, content: &str) -> Result<String> {
        let (Some(handle), Some(password)) = (&self.handle, &self.app_password) else {
            return Err(PlatformError::MissingCredentials("Bluesky".to_string()).into());
        };

        let session = self.create_session(handle, password).await?;

        tracing::debug!("Posting to Bluesky: {} characters", content.chars().count());

        let request = CreateRecordRequest {
            repo: &session.did,
            collection: POST_COLLECTION,
            record: PostRecord {
                record_type: POST_COLLECTION,
                text: content,
                created_at: chrono::Utc::now()
                    .to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            },
        };

        let response = self
            .client
            .post(self.xrpc_url("com.atproto.repo.createRecord"))
            .bearer_auth(&session.access_jwt)
            .json(&request)
            .send()
            .await
            .map_err(|e| map_transport_error(e, "posting"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(
                PlatformError::from_status("Bluesky", "posting", status.as_u16(), &body).into(),
            );
        }

        let created: CreateRecordResponse = response.json().await.map_err(|e| {
            PlatformError::Posting(format!("Unexpected Bluesky createRecord response: {}", e))
        })?;

        tracing::debug!("Posted to Bluesky: {}", created.uri);
        Ok(created.uri)
    }
}
