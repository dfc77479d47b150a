//! Reqwest-backed [`Backend`].
//!
//! This adapter owns transport details only: URL building, bearer headers,
//! body encoding and mapping HTTP failures onto [`BrieflyError`]. There is no
//! request timeout and no retry; a call runs until the server answers or the
//! connection fails.

use super::Backend;
use crate::error::{BrieflyError, Result};
use crate::model::{
    AccessToken, AdminAnalytics, CreatedUser, Credentials, NoteRecord, Registration,
    SubscriptionTier, SummarizeResponse, SummaryContent, SummaryEntry, SummaryUpload,
};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde_json::json;

const USER_AGENT: &str = concat!("briefly/", env!("CARGO_PKG_VERSION"));

pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    /// # Errors
    ///
    /// Returns [`BrieflyError::Config`] when `base_url` is not an absolute URL
    /// or the HTTP client cannot be constructed.
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base_url = Url::parse(base_url)
            .map_err(|err| BrieflyError::Config(format!("invalid base url '{base_url}': {err}")))?;
        // Url::join replaces the last segment unless the path ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|err| BrieflyError::Config(format!("cannot build http client: {err}")))?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|err| BrieflyError::Config(format!("invalid endpoint '{path}': {err}")))
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn register(&self, registration: &Registration) -> Result<CreatedUser> {
        let response = self
            .client
            .post(self.url("auth/registration")?)
            .json(registration)
            .send()
            .await
            .map_err(map_transport_error)?;
        decode(response).await
    }

    async fn login(&self, credentials: &Credentials) -> Result<AccessToken> {
        let response = self
            .client
            .post(self.url("auth/login")?)
            .form(credentials)
            .send()
            .await
            .map_err(map_transport_error)?;
        decode(response).await
    }

    async fn refresh(&self, token: &str) -> Result<AccessToken> {
        let response = self
            .client
            .post(self.url("refresh")?)
            .bearer_auth(token)
            .send()
            .await
            .map_err(map_transport_error)?;
        decode(response).await
    }

    async fn forgot_password(&self, email: &str) -> Result<()> {
        let response = self
            .client
            .post(self.url("auth/password/forgot")?)
            .json(&json!({ "email": email }))
            .send()
            .await
            .map_err(map_transport_error)?;
        check(response).await.map(drop)
    }

    async fn reset_password(&self, reset_token: &str, new_password: &str) -> Result<()> {
        let response = self
            .client
            .post(self.url("auth/password/reset")?)
            .json(&json!({ "token": reset_token, "new_password": new_password }))
            .send()
            .await
            .map_err(map_transport_error)?;
        check(response).await.map(drop)
    }

    async fn list_notes(&self, token: &str) -> Result<Vec<NoteRecord>> {
        let response = self
            .client
            .get(self.url("note")?)
            .bearer_auth(token)
            .send()
            .await
            .map_err(map_transport_error)?;
        decode(response).await
    }

    async fn create_note(&self, token: &str, content: &str) -> Result<NoteRecord> {
        let response = self
            .client
            .post(self.url("note")?)
            .bearer_auth(token)
            .json(&json!({ "content": content }))
            .send()
            .await
            .map_err(map_transport_error)?;
        decode(response).await
    }

    async fn list_history(&self, token: &str) -> Result<Vec<SummaryEntry>> {
        let response = self
            .client
            .get(self.url("user/history")?)
            .bearer_auth(token)
            .send()
            .await
            .map_err(map_transport_error)?;
        decode(response).await
    }

    async fn summary_content(&self, token: &str, id: i64) -> Result<SummaryContent> {
        let response = self
            .client
            .get(self.url(&format!("summary/{id}"))?)
            .bearer_auth(token)
            .send()
            .await
            .map_err(map_transport_error)?;
        decode(response).await
    }

    async fn download_summary(&self, token: &str, id: i64) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(self.url(&format!("summary/{id}/download"))?)
            .bearer_auth(token)
            .send()
            .await
            .map_err(map_transport_error)?;
        let body = check(response)
            .await?
            .bytes()
            .await
            .map_err(map_transport_error)?;
        Ok(body.to_vec())
    }

    async fn summarize(&self, token: &str, upload: &SummaryUpload) -> Result<SummarizeResponse> {
        let part = Part::bytes(upload.bytes.clone())
            .file_name(upload.filename.clone())
            .mime_str("application/pdf")
            .map_err(|err| BrieflyError::Api(format!("invalid upload: {err}")))?;
        let form = Form::new().part("file", part);

        tracing::debug!(
            filename = %upload.filename,
            bytes = upload.bytes.len(),
            length = %upload.length,
            style = %upload.style,
            "uploading document"
        );
        let response = self
            .client
            .post(self.url("summary/summarize")?)
            .bearer_auth(token)
            .query(&[
                ("length", upload.length.as_query()),
                ("style", upload.style.as_query()),
            ])
            .multipart(form)
            .send()
            .await
            .map_err(map_transport_error)?;
        decode(response).await
    }

    async fn admin_analytics(&self, token: &str) -> Result<AdminAnalytics> {
        let response = self
            .client
            .get(self.url("admin/analytics")?)
            .bearer_auth(token)
            .send()
            .await
            .map_err(map_transport_error)?;
        decode(response).await
    }

    async fn subscribe(&self, token: &str, tier: SubscriptionTier) -> Result<()> {
        let response = self
            .client
            .post(self.url("subscription")?)
            .bearer_auth(token)
            .json(&json!({ "subscriptionType": tier }))
            .send()
            .await
            .map_err(map_transport_error)?;
        check(response).await.map(drop)
    }
}

/// Passes 2xx responses through, turns anything else into `Request`.
async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    tracing::debug!(url = %response.url(), %status, "response");
    if status.is_success() {
        return Ok(response);
    }
    let body = response.bytes().await.map_err(map_transport_error)?;
    Err(BrieflyError::Request {
        status: status.as_u16(),
        message: server_message(body.as_ref()),
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = check(response)
        .await?
        .bytes()
        .await
        .map_err(map_transport_error)?;
    serde_json::from_slice(body.as_ref()).map_err(BrieflyError::Serialization)
}

fn map_transport_error(err: reqwest::Error) -> BrieflyError {
    tracing::debug!(error = %err, "transport failure");
    BrieflyError::from(err)
}

/// The `message` or `detail` string of a JSON error body, if any.
fn server_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    ["message", "detail"].iter().find_map(|key| {
        value
            .get(key)
            .and_then(serde_json::Value::as_str)
            .filter(|text| !text.trim().is_empty())
            .map(str::to_owned)
    })
}
