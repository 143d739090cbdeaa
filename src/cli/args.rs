//! CLI argument definitions using clap

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// lectern - Terminal client for your learning platform
#[derive(Parser, Debug)]
#[command(name = "lectern")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Browse the video catalog
    Browse {
        /// Filter by subject
        #[arg(short, long)]
        subject: Option<String>,

        /// Filter by topic
        #[arg(short, long)]
        topic: Option<String>,

        /// Filter by difficulty level
        #[arg(short, long)]
        level: Option<String>,

        /// Page number, starting at 1
        #[arg(short, long, default_value = "1")]
        page: u32,

        /// Videos per page
        #[arg(long, default_value = "20")]
        limit: u32,
    },

    /// Show one video's details
    Show {
        /// Video ID
        id: i64,
    },

    /// Upload a video to the platform
    Upload {
        /// Path to the video file
        file: PathBuf,

        /// Title shown in the catalog
        #[arg(short, long)]
        title: String,

        /// Longer description
        #[arg(short, long)]
        description: Option<String>,

        /// Subject (e.g. Math)
        #[arg(short, long)]
        subject: Option<String>,

        /// Topic within the subject
        #[arg(long)]
        topic: Option<String>,

        /// Difficulty level (beginner, intermediate, advanced)
        #[arg(short, long)]
        level: Option<String>,
    },

    /// List videos you uploaded
    Mine,

    /// Show your watch history
    History,

    /// Watch a video in the TUI player
    Watch {
        /// Video ID
        id: i64,
    },

    /// Manage study documents
    #[command(subcommand)]
    Docs(DocsCommand),

    /// Ask the study assistant, or review past conversations
    #[command(subcommand)]
    Study(StudyCommand),

    /// Launch the interactive TUI
    Tui,

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum DocsCommand {
    /// List your documents
    List,

    /// Upload a document (PDF, DOCX, or TXT)
    Upload {
        /// Path to the document
        file: PathBuf,

        /// Title shown in your library
        #[arg(short, long)]
        title: String,
    },

    /// Delete one of your documents
    Delete {
        /// Document ID
        id: i64,
    },
}

#[derive(Subcommand, Debug)]
pub enum StudyCommand {
    /// Ask the study assistant a question
    Ask {
        /// The question
        question: String,

        /// Ground the answer in one of your watched videos
        #[arg(long, conflicts_with = "document")]
        video: Option<i64>,

        /// Ground the answer in one of your documents
        #[arg(long)]
        document: Option<i64>,
    },

    /// Show past questions and answers
    History,

    /// Show the material answers can be grounded in
    Context,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}
