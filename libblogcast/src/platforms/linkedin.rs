//! LinkedIn platform implementation
//!
//! Shares a text post through the UGC Posts API with a bearer token. The
//! author URN comes from config when set, otherwise from the OpenID
//! `userinfo` endpoint on every post.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::config::LinkedInConfig;
use crate::error::{PlatformError, Result};
use crate::platforms::Platform;

const API_BASE: &str = "https://api.linkedin.com/v2";

#[derive(Deserialize)]
struct UserInfo {
    sub: String,
}

#[derive(Deserialize)]
struct CreatedShare {
    id: Option<String>,
}

pub struct LinkedInClient {
    client: reqwest::Client,
    access_token: Option<String>,
    author_urn: Option<String>,
}

impl LinkedInClient {
    pub fn new(access_token: Option<String>, author_urn: Option<String>) -> Self {
        Self {
            client: super::http_client(),
            access_token: access_token.filter(|t| !t.trim().is_empty()),
            author_urn: author_urn.filter(|u| !u.trim().is_empty()),
        }
    }

    pub fn from_config(config: Option<&LinkedInConfig>) -> Self {
        match config {
            Some(config) => Self::new(config.access_token.clone(), config.author_urn.clone()),
            None => Self::new(None, None),
        }
    }

    async fn author(&self, token: &str) -> Result<String> {
        if let Some(urn) = &self.author_urn {
            return Ok(urn.clone());
        }

        let response = self
            .client
            .get(format!("{}/userinfo", API_BASE))
            .bearer_auth(token)
            .send()
            .await
            .map_err(PlatformError::from)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PlatformError::from_status(
                "LinkedIn",
                "profile lookup",
                status.as_u16(),
                &body,
            )
            .into());
        }

        let info: UserInfo = response.json().await.map_err(|e| {
            PlatformError::Authentication(format!("Failed to get LinkedIn profile: {}", e))
        })?;
        Ok(person_urn(&info.sub))
    }
}

pub fn person_urn(id: &str) -> String {
    format!("urn:li:person:{}", id)
}

/// Body for `POST /v2/ugcPosts`
pub fn share_body(author: &str, content: &str) -> serde_json::Value {
    json!({
        "author": author,
        "lifecycleState": "PUBLISHED",
        "specificContent": {
            "com.linkedin.ugc.ShareContent": {
                "shareCommentary": { "text": content },
                "shareMediaCategory": "NONE"
            }
        },
        "visibility": {
            "com.linkedin.ugc.MemberNetworkVisibility": "PUBLIC"
        }
    })
}

#[async_trait]
impl Platform for LinkedInClient {
    fn name(&self) -> &str {
        "linkedin"
    }

    fn is_configured(&self) -> bool {
        self.access_token.is_some()
    }

    async fn post(&self, content: &str) -> Result<String> {
        let token = self
            .access_token
            .as_deref()
            .ok_or_else(|| PlatformError::MissingCredentials("LinkedIn".to_string()))?;

        let author = self.author(token).await?;

        let response = self
            .client
            .post(format!("{}/ugcPosts", API_BASE))
            .bearer_auth(token)
            .header("X-Restli-Protocol-Version", "2.0.0")
            .json(&share_body(&author, content))
            .send()
            .await
            .map_err(PlatformError::from)?;

        let status = response.status();
        if status != reqwest::StatusCode::CREATED {
            let body = response.text().await.unwrap_or_default();
            return Err(
                PlatformError::from_status("LinkedIn", "share", status.as_u16(), &body).into(),
            );
        }

        let header_id = response
            .headers()
            .get("x-restli-id")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body_id = response
            .json::<CreatedShare>()
            .await
            .ok()
            .and_then(|share| share.id);

        body_id.or(header_id).ok_or_else(|| {
            PlatformError::Posting("LinkedIn accepted the share but returned no id".to_string())
                .into()
        })
    }
}
