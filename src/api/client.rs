//! REST client for the learning platform

use std::path::Path;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;

use crate::api::types::{
    ChatExchange, ChatReply, ContextRef, Document, LearningContext, Video, VideoPage, VideoQuery,
    VideoUpload, WatchHistoryEntry,
};
use crate::config::Settings;
use crate::{LecternError, Result};

/// The one place HTTP happens.
///
/// Cheap to share behind an `Arc`; the underlying reqwest client pools
/// connections across clones of the same instance.
pub struct ApiClient {
    http: Client,
    base_url: String,
    api_token: Option<String>,
}

impl ApiClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let base_url = settings
            .server
            .base_url
            .trim()
            .trim_end_matches('/')
            .to_string();
        if base_url.is_empty() {
            return Err(LecternError::Config(
                "server.base_url must not be empty".to_string(),
            ));
        }

        let token = settings.server.api_token.trim();
        let api_token = (!token.is_empty()).then(|| token.to_string());

        let http = Client::builder().timeout(settings.request_timeout()).build()?;

        Ok(Self {
            http,
            base_url,
            api_token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut builder = self.http.request(method, url);
        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// Browse the video catalog with optional subject/topic/level filters.
    pub async fn list_videos(&self, query: &VideoQuery) -> Result<VideoPage> {
        let response = self
            .request(Method::GET, "/videos")
            .query(query)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    pub async fn get_video(&self, id: i64) -> Result<Video> {
        let response = self
            .request(Method::GET, &format!("/videos/{id}"))
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    /// Upload a video file with its metadata.
    ///
    /// The title is validated and the file read before anything goes on the
    /// wire, so bad input fails without touching the network.
    pub async fn upload_video(&self, file: &Path, upload: &VideoUpload) -> Result<Video> {
        let title = upload.title.trim();
        if title.is_empty() {
            return Err(LecternError::InvalidInput(
                "title must not be empty".to_string(),
            ));
        }

        let mut form = Form::new()
            .part("file", file_part(file).await?)
            .text("title", title.to_string());
        if let Some(description) = &upload.description {
            form = form.text("description", description.clone());
        }
        if let Some(subject) = &upload.subject {
            form = form.text("subject", subject.clone());
        }
        if let Some(topic) = &upload.topic {
            form = form.text("topic", topic.clone());
        }
        if let Some(level) = &upload.level {
            form = form.text("level", level.clone());
        }

        let response = self
            .request(Method::POST, "/videos/upload")
            .multipart(form)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    /// Record an absolute watch-progress snapshot for a video.
    pub async fn record_watch(
        &self,
        video_id: i64,
        watch_duration: f64,
        completion_percentage: f64,
    ) -> Result<()> {
        let body = WatchRequest {
            video_id,
            watch_duration,
            completion_percentage,
        };
        let response = self
            .request(Method::POST, &format!("/videos/{video_id}/watch"))
            .json(&body)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    /// Videos the current user uploaded.
    pub async fn my_videos(&self) -> Result<Vec<Video>> {
        let response = self
            .request(Method::GET, "/videos/my/uploaded")
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    /// The current user's watch history, most recent first.
    pub async fn watch_history(&self) -> Result<Vec<WatchHistoryEntry>> {
        let response = self
            .request(Method::GET, "/videos/my/history")
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    pub async fn list_documents(&self) -> Result<Vec<Document>> {
        let response = self.request(Method::GET, "/documents").send().await?;
        Ok(check(response).await?.json().await?)
    }

    pub async fn upload_document(&self, file: &Path, title: &str) -> Result<Document> {
        let title = title.trim();
        if title.is_empty() {
            return Err(LecternError::InvalidInput(
                "title must not be empty".to_string(),
            ));
        }

        let form = Form::new()
            .part("file", file_part(file).await?)
            .text("title", title.to_string());

        let response = self
            .request(Method::POST, "/documents/upload")
            .multipart(form)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    pub async fn delete_document(&self, id: i64) -> Result<()> {
        let response = self
            .request(Method::DELETE, &format!("/documents/{id}"))
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    /// Ask the answering service a question, optionally scoped to one
    /// video or document.
    pub async fn send_chat(&self, message: &str, context: Option<ContextRef>) -> Result<ChatReply> {
        let message = message.trim();
        if message.is_empty() {
            return Err(LecternError::InvalidInput(
                "question must not be empty".to_string(),
            ));
        }

        let body = ChatRequest {
            message,
            context_type: context.map(|c| c.kind()),
            context_id: context.map(|c| c.id()),
        };
        let response = self
            .request(Method::POST, "/study/chat")
            .json(&body)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    /// Persisted question/answer exchanges, oldest first.
    pub async fn chat_history(&self) -> Result<Vec<ChatExchange>> {
        let response = self.request(Method::GET, "/study/history").send().await?;
        Ok(check(response).await?.json().await?)
    }

    /// Everything the answering service grounds answers in for this user.
    pub async fn learning_context(&self) -> Result<LearningContext> {
        let response = self.request(Method::GET, "/study/context").send().await?;
        Ok(check(response).await?.json().await?)
    }
}

/// Map non-success statuses onto the crate's error taxonomy.
async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let detail = error_detail(response).await;
    Err(match status {
        StatusCode::UNAUTHORIZED => LecternError::Auth(detail),
        StatusCode::NOT_FOUND => LecternError::NotFound(detail),
        _ => LecternError::Api { status, detail },
    })
}

/// Pull the platform's `{"detail": ...}` message out of an error body,
/// falling back to the raw body or the status line.
async fn error_detail(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(&body) {
        if let Some(detail) = value.get("detail").and_then(|d| d.as_str()) {
            return detail.to_string();
        }
    }

    let body = body.trim();
    if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        body.to_string()
    }
}

async fn file_part(path: &Path) -> Result<Part> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            LecternError::InvalidInput(format!("not a usable file name: {}", path.display()))
        })?;

    let bytes = tokio::fs::read(path).await?;
    Ok(Part::bytes(bytes).file_name(name))
}

#[derive(Debug, Serialize)]
struct WatchRequest {
    video_id: i64,
    watch_duration: f64,
    completion_percentage: f64,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    context_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    context_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed_from_base_url() {
        let mut settings = Settings::default();
        settings.server.base_url = "http://example.test/api/".to_string();
        let client = ApiClient::from_settings(&settings).unwrap();
        assert_eq!(client.base_url(), "http://example.test/api");
    }

    #[test]
    fn blank_token_is_not_attached() {
        let mut settings = Settings::default();
        settings.server.api_token = "   ".to_string();
        let client = ApiClient::from_settings(&settings).unwrap();
        assert!(client.api_token.is_none());
    }

    #[test]
    fn chat_request_omits_missing_context() {
        let body = ChatRequest {
            message: "hello",
            context_type: None,
            context_id: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "message": "hello" }));
    }

    #[test]
    fn chat_request_carries_context_fields() {
        let context = ContextRef::Document(9);
        let body = ChatRequest {
            message: "summarize this",
            context_type: Some(context.kind()),
            context_id: Some(context.id()),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "message": "summarize this",
                "context_type": "document",
                "context_id": 9
            })
        );
    }
}
