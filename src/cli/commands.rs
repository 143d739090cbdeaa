//! CLI command implementations

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;

use crate::api::{ApiClient, ContextRef, VideoQuery, VideoUpload};
use crate::cli::args::{ConfigCommand, DocsCommand, StudyCommand};
use crate::config::Settings;
use crate::study::{ChatGateway, Role, Transcript};

/// Browse the video catalog
pub async fn browse_videos(
    settings: &Settings,
    subject: Option<String>,
    topic: Option<String>,
    level: Option<String>,
    page: u32,
    limit: u32,
) -> Result<()> {
    let api = ApiClient::from_settings(settings)?;

    let limit = limit.max(1);
    let query = VideoQuery {
        subject,
        topic,
        level,
        skip: page.saturating_sub(1) * limit,
        limit,
    };

    let catalog = api
        .list_videos(&query)
        .await
        .context("Failed to load videos")?;

    if catalog.videos.is_empty() {
        println!("No videos found");
        return Ok(());
    }

    println!(
        "{:<6} {:<32} {:<14} {:<12} {:<9} {:<6}",
        "ID", "Title", "Subject", "Level", "Duration", "Views"
    );
    println!("{}", "-".repeat(84));

    for video in &catalog.videos {
        let duration = video
            .duration
            .map(format_seconds)
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<6} {:<32} {:<14} {:<12} {:<9} {:<6}",
            video.id,
            truncate(&video.title, 30),
            truncate(video.subject.as_deref().unwrap_or("-"), 12),
            video.level.as_deref().unwrap_or("-"),
            duration,
            video.views_count
        );
    }

    println!();
    println!("Showing {} of {} videos", catalog.videos.len(), catalog.total);

    Ok(())
}

/// Show one video's details
pub async fn show_video(settings: &Settings, id: i64) -> Result<()> {
    let api = ApiClient::from_settings(settings)?;

    let video = api.get_video(id).await.context("Failed to load video")?;

    println!("Title: {}", video.title);
    if let Some(uploader) = video.uploader_name.as_deref() {
        println!("Uploader: {}", uploader);
    }
    println!("Uploaded: {}", video.created_at.format("%Y-%m-%d %H:%M"));
    if let Some(subject) = video.subject.as_deref() {
        match video.topic.as_deref() {
            Some(topic) => println!("Subject: {} / {}", subject, topic),
            None => println!("Subject: {}", subject),
        }
    }
    if let Some(level) = video.level.as_deref() {
        println!("Level: {}", level);
    }
    if let Some(duration) = video.duration {
        println!("Duration: {}", format_seconds(duration));
    }
    println!("Views: {}", video.views_count);

    if let Some(description) = video.description.as_deref() {
        println!();
        println!("{}", description);
    }

    Ok(())
}

/// Upload a video with its catalog metadata
pub async fn upload_video(
    settings: &Settings,
    file: PathBuf,
    title: String,
    description: Option<String>,
    subject: Option<String>,
    topic: Option<String>,
    level: Option<String>,
) -> Result<()> {
    let api = ApiClient::from_settings(settings)?;

    let upload = VideoUpload {
        title,
        description,
        subject,
        topic,
        level,
    };

    let video = api
        .upload_video(&file, &upload)
        .await
        .context("Failed to upload video")?;

    println!("Uploaded: {} (id {})", video.title, video.id);
    println!("The platform is transcribing it; answers can use it once that finishes.");

    Ok(())
}

/// List videos the current user uploaded
pub async fn list_my_videos(settings: &Settings) -> Result<()> {
    let api = ApiClient::from_settings(settings)?;

    let videos = api
        .my_videos()
        .await
        .context("Failed to load your videos")?;

    if videos.is_empty() {
        println!("You have not uploaded any videos yet");
        return Ok(());
    }

    println!(
        "{:<6} {:<40} {:<12} {:<6}",
        "ID", "Title", "Uploaded", "Views"
    );
    println!("{}", "-".repeat(68));

    for video in &videos {
        println!(
            "{:<6} {:<40} {:<12} {:<6}",
            video.id,
            truncate(&video.title, 38),
            video.created_at.format("%Y-%m-%d"),
            video.views_count
        );
    }

    Ok(())
}

/// Show the current user's watch history
pub async fn show_watch_history(settings: &Settings) -> Result<()> {
    let api = ApiClient::from_settings(settings)?;

    let entries = api
        .watch_history()
        .await
        .context("Failed to load watch history")?;

    if entries.is_empty() {
        println!("No watch history yet");
        return Ok(());
    }

    println!(
        "{:<6} {:<36} {:<9} {:<10} {:<16}",
        "ID", "Video", "Watched", "Complete", "Last watched"
    );
    println!("{}", "-".repeat(80));

    for entry in &entries {
        let title = entry
            .video
            .as_ref()
            .map(|v| v.title.as_str())
            .unwrap_or("(removed)");
        println!(
            "{:<6} {:<36} {:<9} {:<10} {:<16}",
            entry.video_id,
            truncate(title, 34),
            format_seconds(entry.watch_duration),
            format!("{:.0}%", entry.completion_percentage),
            entry.last_watched_at.format("%Y-%m-%d %H:%M")
        );
    }

    Ok(())
}

/// Handle document subcommands
pub async fn docs_command(settings: &Settings, cmd: DocsCommand) -> Result<()> {
    let api = ApiClient::from_settings(settings)?;

    match cmd {
        DocsCommand::List => {
            let documents = api
                .list_documents()
                .await
                .context("Failed to load documents")?;

            if documents.is_empty() {
                println!("No documents uploaded yet");
                return Ok(());
            }

            println!("{:<6} {:<40} {:<8} {:<12}", "ID", "Title", "Type", "Uploaded");
            println!("{}", "-".repeat(70));

            for document in &documents {
                println!(
                    "{:<6} {:<40} {:<8} {:<12}",
                    document.id,
                    truncate(&document.title, 38),
                    document.file_type,
                    document.created_at.format("%Y-%m-%d")
                );
            }
        }
        DocsCommand::Upload { file, title } => {
            let document = api
                .upload_document(&file, &title)
                .await
                .context("Failed to upload document")?;
            println!("Uploaded: {} (id {})", document.title, document.id);
        }
        DocsCommand::Delete { id } => {
            api.delete_document(id)
                .await
                .context("Failed to delete document")?;
            println!("Document {} deleted", id);
        }
    }

    Ok(())
}

/// Handle study subcommands
pub async fn study_command(settings: &Settings, cmd: StudyCommand) -> Result<()> {
    match cmd {
        StudyCommand::Ask {
            question,
            video,
            document,
        } => {
            let question = question.trim().to_string();
            if question.is_empty() {
                anyhow::bail!("Question must not be empty");
            }

            let context = match (video, document) {
                (Some(id), _) => Some(ContextRef::Video(id)),
                (_, Some(id)) => Some(ContextRef::Document(id)),
                _ => None,
            };

            let api = Arc::new(ApiClient::from_settings(settings)?);
            let gateway = ChatGateway::new(api);

            let answer = gateway.ask(&question, context).await;
            println!("{}", answer);
        }
        StudyCommand::History => {
            let api = ApiClient::from_settings(settings)?;
            let transcript = Transcript::load(&api)
                .await
                .context("Failed to load study history")?;

            if transcript.is_empty() {
                println!("No study history yet");
                return Ok(());
            }

            for turn in transcript.turns() {
                let speaker = match turn.role {
                    Role::User => "you",
                    Role::Assistant => "assistant",
                };
                let when = turn.created_at.format("%Y-%m-%d %H:%M");
                match turn.context {
                    Some(context) => println!("[{}] {} ({}):", when, speaker, context),
                    None => println!("[{}] {}:", when, speaker),
                }
                for line in turn.text.lines() {
                    println!("  {}", line);
                }
                println!();
            }
        }
        StudyCommand::Context => {
            let api = ApiClient::from_settings(settings)?;
            let context = api
                .learning_context()
                .await
                .context("Failed to load learning context")?;

            if context.watched_videos.is_empty() && context.documents.is_empty() {
                println!("Nothing for the assistant to ground answers in yet.");
                println!("Watch a video or upload a document first.");
                return Ok(());
            }

            println!("Watched videos ({}):", context.watched_videos.len());
            for video in &context.watched_videos {
                let scope = match (video.subject.as_deref(), video.topic.as_deref()) {
                    (Some(subject), Some(topic)) => format!(" ({} / {})", subject, topic),
                    (Some(subject), None) => format!(" ({})", subject),
                    _ => String::new(),
                };
                println!("  {:<6} {}{}", video.id, truncate(&video.title, 50), scope);
            }

            println!();
            println!("Documents ({}):", context.documents.len());
            for document in &context.documents {
                println!(
                    "  {:<6} {} ({})",
                    document.id,
                    truncate(&document.title, 50),
                    document.file_type
                );
            }
        }
    }

    Ok(())
}

/// Handle config subcommands
pub fn config_command(settings: &Settings, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show => {
            let toml = toml::to_string_pretty(settings)?;
            println!("{}", toml);
        }
        ConfigCommand::Path => {
            let path = Settings::config_path()?;
            println!("{}", path.display());
        }
        ConfigCommand::Init { force } => {
            let path = Settings::config_path()?;
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at {}. Use --force to overwrite.",
                    path.display()
                );
            }
            Settings::write_default(&path)?;
            println!("Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

// Helper functions

fn format_seconds(secs: f64) -> String {
    let total = secs.max(0.0) as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
