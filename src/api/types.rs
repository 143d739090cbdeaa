//! Wire types for the learning platform API
//!
//! The platform serializes timestamps without a timezone, so every
//! `created_at`-style field is a `NaiveDateTime` here and gets interpreted
//! as UTC at the point where local time handling matters.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A video record as returned by the platform
#[derive(Debug, Clone, Deserialize)]
pub struct Video {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub subject: Option<String>,
    pub topic: Option<String>,
    pub level: Option<String>,
    pub file_path: String,
    pub thumbnail_path: Option<String>,
    /// Duration in seconds; absent until the platform has probed the file
    pub duration: Option<f64>,
    pub uploader_id: i64,
    #[serde(default)]
    pub views_count: i64,
    pub created_at: NaiveDateTime,
    pub uploader_name: Option<String>,
}

/// One page of the video catalog
#[derive(Debug, Clone, Deserialize)]
pub struct VideoPage {
    pub videos: Vec<Video>,
    pub total: i64,
}

/// Query parameters for browsing the catalog
#[derive(Debug, Clone, Serialize)]
pub struct VideoQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    pub skip: u32,
    pub limit: u32,
}

impl Default for VideoQuery {
    fn default() -> Self {
        Self {
            subject: None,
            topic: None,
            level: None,
            skip: 0,
            limit: 20,
        }
    }
}

/// Metadata sent alongside a video file upload
#[derive(Debug, Clone, Default)]
pub struct VideoUpload {
    pub title: String,
    pub description: Option<String>,
    pub subject: Option<String>,
    pub topic: Option<String>,
    pub level: Option<String>,
}

/// One watch-history row (most recent progress per video)
#[derive(Debug, Clone, Deserialize)]
pub struct WatchHistoryEntry {
    pub id: i64,
    pub video_id: i64,
    pub watch_duration: f64,
    pub completion_percentage: f64,
    pub last_watched_at: NaiveDateTime,
    pub video: Option<Video>,
}

/// An uploaded study document
#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    pub id: i64,
    pub title: String,
    pub file_path: String,
    pub file_type: String,
    pub owner_id: i64,
    pub created_at: NaiveDateTime,
}

/// The material a study question is scoped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextRef {
    Video(i64),
    Document(i64),
}

impl ContextRef {
    /// The platform's context type discriminator
    pub fn kind(&self) -> &'static str {
        match self {
            ContextRef::Video(_) => "video",
            ContextRef::Document(_) => "document",
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            ContextRef::Video(id) | ContextRef::Document(id) => *id,
        }
    }
}

impl std::fmt::Display for ContextRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} #{}", self.kind(), self.id())
    }
}

/// The answering service's reply to one question
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    pub response: String,
    pub context_used: Option<String>,
}

/// One persisted question/answer exchange
#[derive(Debug, Clone, Deserialize)]
pub struct ChatExchange {
    pub id: i64,
    pub message: String,
    pub response: String,
    pub context_type: Option<String>,
    pub context_id: Option<i64>,
    pub created_at: NaiveDateTime,
}

impl ChatExchange {
    /// The typed context scope, when the stored exchange has a complete one.
    ///
    /// Exchanges persisted without a scope (or with a type the client does
    /// not know) count as unscoped.
    pub fn context_ref(&self) -> Option<ContextRef> {
        match (self.context_type.as_deref(), self.context_id) {
            (Some("video"), Some(id)) => Some(ContextRef::Video(id)),
            (Some("document"), Some(id)) => Some(ContextRef::Document(id)),
            _ => None,
        }
    }
}

/// A video entry in the learning-context summary
#[derive(Debug, Clone, Deserialize)]
pub struct ContextVideo {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub transcript: Option<String>,
    pub subject: Option<String>,
    pub topic: Option<String>,
}

/// A document entry in the learning-context summary
#[derive(Debug, Clone, Deserialize)]
pub struct ContextDocument {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(rename = "type")]
    pub file_type: String,
}

/// Everything the answering service can ground answers in for this user
#[derive(Debug, Clone, Deserialize)]
pub struct LearningContext {
    #[serde(default)]
    pub watched_videos: Vec<ContextVideo>,
    #[serde(default)]
    pub documents: Vec<ContextDocument>,
}
