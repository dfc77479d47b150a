//! Records exchanged with the summarization backend.
//!
//! Field names follow the backend's JSON (snake_case); anything the client only
//! reads is `Deserialize`, anything it sends is `Serialize`.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A user note, owned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteRecord {
    pub id: i64,
    #[serde(default)]
    pub content: String,
}

impl NoteRecord {
    pub fn new(id: i64, content: impl Into<String>) -> Self {
        Self {
            id,
            content: content.into(),
        }
    }

    /// Length in characters, the unit the length filter works in.
    pub fn len(&self) -> usize {
        self.content.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// One generated summary in the user's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryEntry {
    pub id: i64,
    pub filename: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryContent {
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarizeResponse {
    pub summary: String,
    #[serde(default)]
    pub file_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminAnalytics {
    pub total_summaries: u64,
    pub total_users: u64,
    #[serde(default)]
    pub is_admin: bool,
}

/// Login / refresh response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub is_admin: bool,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Whatever the backend echoes back after registration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CreatedUser {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SummaryLength {
    Short,
    Long,
    BulletPoints,
}

impl SummaryLength {
    pub fn as_query(&self) -> &'static str {
        match self {
            SummaryLength::Short => "short",
            SummaryLength::Long => "long",
            SummaryLength::BulletPoints => "bullets",
        }
    }
}

impl fmt::Display for SummaryLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SummaryStyle {
    Scientific,
    Regular,
    Simple,
}

impl SummaryStyle {
    pub fn as_query(&self) -> &'static str {
        match self {
            SummaryStyle::Scientific => "scientific",
            SummaryStyle::Regular => "regular",
            SummaryStyle::Simple => "simple",
        }
    }
}

impl fmt::Display for SummaryStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query())
    }
}

/// A document queued for summarization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub length: SummaryLength,
    pub style: SummaryStyle,
}

/// Paid plans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum SubscriptionTier {
    Premium,
    Enterprise,
}

impl fmt::Display for SubscriptionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubscriptionTier::Premium => write!(f, "Premium"),
            SubscriptionTier::Enterprise => write!(f, "Enterprise"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_length_counts_characters() {
        assert_eq!(NoteRecord::new(1, "héllo").len(), 5);
    }

    #[test]
    fn token_defaults_missing_flags() {
        let token: AccessToken = serde_json::from_str(r#"{"access_token":"abc"}"#).unwrap();
        assert_eq!(token.token_type, "bearer");
        assert!(!token.is_admin);

        let token: AccessToken =
            serde_json::from_str(r#"{"access_token":"abc","token_type":"bearer","is_admin":true}"#)
                .unwrap();
        assert!(token.is_admin);
    }

    #[test]
    fn subscription_tier_serializes_like_the_plan_names() {
        assert_eq!(
            serde_json::to_string(&SubscriptionTier::Enterprise).unwrap(),
            "\"Enterprise\""
        );
    }

    #[test]
    fn length_query_values() {
        assert_eq!(SummaryLength::Short.as_query(), "short");
        assert_eq!(SummaryLength::BulletPoints.as_query(), "bullets");
        assert_eq!(SummaryStyle::Scientific.to_string(), "scientific");
    }
}
