//! # Backend Port
//!
//! Every network collaborator the client talks to, as one async trait. The
//! command layer only ever sees [`Backend`]; it never builds URLs or touches
//! HTTP types.
//!
//! Implementations:
//! - [`http::HttpBackend`]: reqwest against the real service
//! - [`memory::MemoryBackend`]: in-process fake with scripted failures (tests)
//!
//! Authenticated operations take the bearer token as a plain `&str`. Callers
//! obtain it through [`crate::session::Session::require_token`], so a missing
//! token is rejected before any method here runs.

use crate::error::Result;
use crate::model::{
    AccessToken, AdminAnalytics, CreatedUser, Credentials, NoteRecord, Registration,
    SubscriptionTier, SummarizeResponse, SummaryContent, SummaryEntry, SummaryUpload,
};
use async_trait::async_trait;

pub mod http;
pub mod memory;

#[async_trait]
pub trait Backend: Send + Sync {
    async fn register(&self, registration: &Registration) -> Result<CreatedUser>;

    async fn login(&self, credentials: &Credentials) -> Result<AccessToken>;

    async fn refresh(&self, token: &str) -> Result<AccessToken>;

    async fn forgot_password(&self, email: &str) -> Result<()>;

    async fn reset_password(&self, reset_token: &str, new_password: &str) -> Result<()>;

    async fn list_notes(&self, token: &str) -> Result<Vec<NoteRecord>>;

    async fn create_note(&self, token: &str, content: &str) -> Result<NoteRecord>;

    async fn list_history(&self, token: &str) -> Result<Vec<SummaryEntry>>;

    async fn summary_content(&self, token: &str, id: i64) -> Result<SummaryContent>;

    async fn download_summary(&self, token: &str, id: i64) -> Result<Vec<u8>>;

    async fn summarize(&self, token: &str, upload: &SummaryUpload) -> Result<SummarizeResponse>;

    async fn admin_analytics(&self, token: &str) -> Result<AdminAnalytics>;

    async fn subscribe(&self, token: &str, tier: SubscriptionTier) -> Result<()>;
}
