//! Twitter/X platform implementation
//!
//! Posts through the v2 `POST /2/tweets` endpoint with OAuth 1.0a user
//! context. Requests are signed with HMAC-SHA1 as described in RFC 5849.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use sha1::Sha1;

use crate::config::TwitterConfig;
use crate::error::{PlatformError, Result};
use crate::platforms::Platform;

const TWEETS_URL: &str = "https://api.twitter.com/2/tweets";

type HmacSha1 = Hmac<Sha1>;

/// The four secrets needed to sign a user-context request
#[derive(Debug, Clone)]
pub struct OAuthCredentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub token: String,
    pub token_secret: String,
}

impl OAuthCredentials {
    /// `None` unless every field is present and non-empty
    pub fn from_config(config: &TwitterConfig) -> Option<Self> {
        let field = |value: &Option<String>| value.clone().filter(|v| !v.trim().is_empty());
        Some(Self {
            consumer_key: field(&config.api_key)?,
            consumer_secret: field(&config.api_secret)?,
            token: field(&config.access_token)?,
            token_secret: field(&config.access_token_secret)?,
        })
    }
}

/// RFC 3986 percent-encoding, as OAuth 1.0a requires
fn encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Build the OAuth 1.0a signature base string
///
/// `params` holds every oauth_* parameter plus any query or form parameters.
/// JSON request bodies are not part of the signature.
pub fn signature_base_string(method: &str, url: &str, params: &[(String, String)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (encode(k), encode(v)))
        .collect();
    encoded.sort();

    let parameter_string = encoded
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_uppercase(),
        encode(url),
        encode(&parameter_string)
    )
}

/// HMAC-SHA1 sign a base string, returning the base64 signature
pub fn sign(base_string: &str, consumer_secret: &str, token_secret: &str) -> Result<String> {
    let key = format!("{}&{}", encode(consumer_secret), encode(token_secret));
    let mut mac = HmacSha1::new_from_slice(key.as_bytes())
        .map_err(|e| PlatformError::Authentication(format!("Invalid signing key: {}", e)))?;
    mac.update(base_string.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// `Authorization` header value for a signed request
pub fn authorization_header(
    credentials: &OAuthCredentials,
    method: &str,
    url: &str,
    nonce: &str,
    timestamp: i64,
) -> Result<String> {
    let mut oauth_params = vec![
        ("oauth_consumer_key".to_string(), credentials.consumer_key.clone()),
        ("oauth_nonce".to_string(), nonce.to_string()),
        ("oauth_signature_method".to_string(), "HMAC-SHA1".to_string()),
        ("oauth_timestamp".to_string(), timestamp.to_string()),
        ("oauth_token".to_string(), credentials.token.clone()),
        ("oauth_version".to_string(), "1.0".to_string()),
    ];

    let base = signature_base_string(method, url, &oauth_params);
    let signature = sign(&base, &credentials.consumer_secret, &credentials.token_secret)?;
    oauth_params.push(("oauth_signature".to_string(), signature));
    oauth_params.sort();

    let fields = oauth_params
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", encode(k), encode(v)))
        .collect::<Vec<_>>()
        .join(", ");

    Ok(format!("OAuth {}", fields))
}

fn nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

#[derive(Serialize)]
struct CreateTweet<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct CreateTweetResponse {
    data: TweetData,
}

#[derive(Deserialize)]
struct TweetData {
    id: String,
}

pub struct TwitterClient {
    client: reqwest::Client,
    credentials: Option<OAuthCredentials>,
}

impl TwitterClient {
    pub fn new(credentials: Option<OAuthCredentials>) -> Self {
        Self {
            client: super::http_client(),
            credentials,
        }
    }

    pub fn from_config(config: Option<&TwitterConfig>) -> Self {
        Self::new(config.and_then(OAuthCredentials::from_config))
    }
}

#[async_trait]
impl Platform for TwitterClient {
    fn name(&self) -> &str {
        "twitter"
    }

    fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }

    async fn post(&self, content: &str) -> Result<String> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or_else(|| PlatformError::MissingCredentials("Twitter".to_string()))?;

        let header = authorization_header(
            credentials,
            "POST",
            TWEETS_URL,
            &nonce(),
            chrono::Utc::now().timestamp(),
        )?;

        tracing::debug!("Posting to Twitter: {} characters", content.chars().count());

        let response = self
            .client
            .post(TWEETS_URL)
            .header(reqwest::header::AUTHORIZATION, header)
            .json(&CreateTweet { text: content })
            .send()
            .await
            .map_err(PlatformError::from)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(
                PlatformError::from_status("Twitter", "create tweet", status.as_u16(), &body).into(),
            );
        }

        let created: CreateTweetResponse = response.json().await.map_err(|e| {
            PlatformError::Posting(format!("Twitter returned an unexpected response: {}", e))
        })?;

        Ok(created.data.id)
    }
}
