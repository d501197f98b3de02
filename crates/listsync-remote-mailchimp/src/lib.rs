// # MailChimp Remote Client
//
// This crate provides the MailChimp Marketing API v3 implementation of the
// `RemoteClient` trait.
//
// ## Constraints
//
// - One HTTP request per engine operation, with a 30 second timeout
// - Full error propagation to the engine; a failed call rolls the request's
//   local writes back
// - NO retry logic (retry policy is a non-goal of the whole system)
// - NO caching and no state between requests
// - NO access to the local store (owned by `SyncEngine`)
//
// ## Security Requirements
//
// - The API key NEVER appears in logs or Debug output
// - The client fails fast at construction if the key is empty
//
// ## API Reference
//
// - MailChimp Marketing API v3: https://mailchimp.com/developer/marketing/api/
// - The datacenter is the suffix of the API key ("abc123-us6" → "us6") and
//   selects the endpoint host: https://<dc>.api.mailchimp.com/3.0
// - Create List: POST `/lists`
// - Update List: PATCH `/lists/{list_id}`
// - Delete List: DELETE `/lists/{list_id}`
// - Add Member: POST `/lists/{list_id}/members`
// - Update Member: PATCH `/lists/{list_id}/members/{subscriber}`
// - Archive Member: DELETE `/lists/{list_id}/members/{subscriber}`

use std::time::Duration;

use async_trait::async_trait;
use listsync_core::config::RemoteApiConfig;
use listsync_core::entity::RemoteView;
use listsync_core::traits::{RemoteClient, RemoteResource};
use listsync_core::{Error, Result};
use reqwest::{Method, StatusCode};
use serde_json::Value;

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// MailChimp Marketing API client
///
/// Stateless request/response wrapper; all coordination (transactions,
/// rollback, ordering) is owned by `SyncEngine`.
pub struct MailchimpClient {
    /// MailChimp API key
    /// ⚠️ NEVER log this value
    api_key: String,

    /// Resolved API base URL, without trailing slash
    base_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the API key
impl std::fmt::Debug for MailchimpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailchimpClient")
            .field("api_key", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl MailchimpClient {
    /// Create a new MailChimp client
    ///
    /// When `base_url` is `None` the endpoint host is derived from the API
    /// key's datacenter suffix. Construction fails on an empty key or a key
    /// without a datacenter suffix.
    pub fn new(api_key: impl Into<String>, base_url: Option<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(Error::config("MailChimp API key cannot be empty"));
        }

        let base_url = match base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => {
                let dc = datacenter(&api_key)?;
                format!("https://{dc}.api.mailchimp.com/3.0")
            }
        };

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_key,
            base_url,
            client,
        })
    }

    /// Create a client from validated configuration
    pub fn from_config(config: &RemoteApiConfig) -> Result<Self> {
        Self::new(config.api_key.clone(), config.base_url.clone())
    }

    /// Issue one API request and decode the JSON response body, if any
    ///
    /// # API Call
    ///
    /// ```http
    /// <METHOD> <base>/<path>
    /// Authorization: Basic anystring:<api_key>
    /// ```
    async fn request(
        &self,
        method: Method,
        path: &str,
        payload: Option<&RemoteView>,
    ) -> Result<Value> {
        let url = format!("{}/{}", self.base_url, path);
        tracing::debug!(%method, path, "mailchimp API call");

        let mut request = self
            .client
            .request(method, &url)
            // MailChimp ignores the username; the key is the password
            .basic_auth("anystring", Some(&self.api_key));
        if let Some(payload) = payload {
            request = request.json(payload);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::remote(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if status.is_success() {
            if status == StatusCode::NO_CONTENT {
                return Ok(Value::Null);
            }
            let body = response
                .text()
                .await
                .map_err(|e| Error::remote(format!("failed to read response body: {e}")))?;
            if body.is_empty() {
                return Ok(Value::Null);
            }
            return serde_json::from_str(&body)
                .map_err(|e| Error::remote(format!("invalid JSON in response: {e}")));
        }

        let detail = error_detail(response).await;
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(Error::auth(detail)),
            StatusCode::TOO_MANY_REQUESTS => Err(Error::rate_limited(detail)),
            StatusCode::NOT_FOUND => Err(Error::remote(format!(
                "remote resource not found: {detail}"
            ))),
            _ => Err(Error::remote(format!("API returned {status}: {detail}"))),
        }
    }
}

/// Extract the datacenter suffix from an API key ("abc123-us6" → "us6")
fn datacenter(api_key: &str) -> Result<&str> {
    match api_key.rsplit_once('-') {
        Some((_, dc)) if !dc.is_empty() => Ok(dc),
        _ => Err(Error::config(
            "MailChimp API key has no datacenter suffix; set an explicit base URL instead",
        )),
    }
}

/// Best-effort extraction of MailChimp's problem-detail error body
async fn error_detail(response: reqwest::Response) -> String {
    let body = response.text().await.unwrap_or_default();
    match serde_json::from_str::<Value>(&body) {
        Ok(json) => {
            let title = json.get("title").and_then(Value::as_str).unwrap_or("");
            let detail = json.get("detail").and_then(Value::as_str).unwrap_or("");
            match (title.is_empty(), detail.is_empty()) {
                (false, false) => format!("{title}: {detail}"),
                (false, true) => title.to_string(),
                (true, false) => detail.to_string(),
                (true, true) => body,
            }
        }
        Err(_) => body,
    }
}

/// Pull the remote identity out of a create response
fn resource_from(body: Value) -> Result<RemoteResource> {
    let id = body
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::remote("create response carries no id field"))?
        .to_string();
    Ok(RemoteResource { id, extra: body })
}

#[async_trait]
impl RemoteClient for MailchimpClient {
    async fn create_list(&self, payload: &RemoteView) -> Result<RemoteResource> {
        let body = self.request(Method::POST, "lists", Some(payload)).await?;
        resource_from(body)
    }

    async fn update_list(&self, remote_list_id: &str, payload: &RemoteView) -> Result<()> {
        self.request(
            Method::PATCH,
            &format!("lists/{remote_list_id}"),
            Some(payload),
        )
        .await?;
        Ok(())
    }

    async fn delete_list(&self, remote_list_id: &str) -> Result<()> {
        self.request(Method::DELETE, &format!("lists/{remote_list_id}"), None)
            .await?;
        Ok(())
    }

    async fn create_member(
        &self,
        remote_list_id: &str,
        payload: &RemoteView,
    ) -> Result<RemoteResource> {
        let body = self
            .request(
                Method::POST,
                &format!("lists/{remote_list_id}/members"),
                Some(payload),
            )
            .await?;
        resource_from(body)
    }

    async fn update_member(
        &self,
        remote_list_id: &str,
        remote_member_id: &str,
        payload: &RemoteView,
    ) -> Result<()> {
        self.request(
            Method::PATCH,
            &format!("lists/{remote_list_id}/members/{remote_member_id}"),
            Some(payload),
        )
        .await?;
        Ok(())
    }

    async fn delete_member(&self, remote_list_id: &str, remote_member_id: &str) -> Result<()> {
        self.request(
            Method::DELETE,
            &format!("lists/{remote_list_id}/members/{remote_member_id}"),
            None,
        )
        .await?;
        Ok(())
    }

    fn client_name(&self) -> &'static str {
        "mailchimp"
    }
}
