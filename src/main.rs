//! lectern - Terminal client for your learning platform
//!
//! Entry point for the lectern CLI application.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use lectern::cli::{Cli, Commands};
use lectern::config::Settings;
use lectern::tui::Launch;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match cli.command {
        Commands::Completions { shell } => {
            lectern::cli::completions::print(shell);
        }
        command => {
            // Load configuration only for runtime commands.
            let settings = Settings::load()?;

            // Execute command
            match command {
                Commands::Browse {
                    subject,
                    topic,
                    level,
                    page,
                    limit,
                } => {
                    lectern::cli::commands::browse_videos(
                        &settings, subject, topic, level, page, limit,
                    )
                    .await?;
                }
                Commands::Show { id } => {
                    lectern::cli::commands::show_video(&settings, id).await?;
                }
                Commands::Upload {
                    file,
                    title,
                    description,
                    subject,
                    topic,
                    level,
                } => {
                    lectern::cli::commands::upload_video(
                        &settings,
                        file,
                        title,
                        description,
                        subject,
                        topic,
                        level,
                    )
                    .await?;
                }
                Commands::Mine => {
                    lectern::cli::commands::list_my_videos(&settings).await?;
                }
                Commands::History => {
                    lectern::cli::commands::show_watch_history(&settings).await?;
                }
                Commands::Watch { id } => {
                    lectern::tui::run(&settings, Launch::Player(id)).await?;
                }
                Commands::Docs(docs_cmd) => {
                    lectern::cli::commands::docs_command(&settings, docs_cmd).await?;
                }
                Commands::Study(study_cmd) => {
                    lectern::cli::commands::study_command(&settings, study_cmd).await?;
                }
                Commands::Tui => {
                    lectern::tui::run(&settings, Launch::Library).await?;
                }
                Commands::Config(config_cmd) => {
                    lectern::cli::commands::config_command(&settings, config_cmd)?;
                }
                Commands::Completions { .. } => unreachable!(),
            }
        }
    }

    Ok(())
}
