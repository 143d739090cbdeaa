//! HTTP client for the learning platform's REST API
//!
//! One `ApiClient` is built from settings at startup and shared by every
//! part of the program that talks to the platform.

mod client;
mod types;

pub use client::ApiClient;
pub use types::{
    ChatExchange, ChatReply, ContextDocument, ContextRef, ContextVideo, Document, LearningContext,
    Video, VideoPage, VideoQuery, VideoUpload, WatchHistoryEntry,
};
