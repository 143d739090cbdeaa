//! lectern - A terminal client for self-hosted learning platforms
//!
//! A "lectern" is the stand a lecturer reads from; this one sits in your
//! terminal.

pub mod api;
pub mod cli;
pub mod config;
pub mod playback;
pub mod study;
pub mod tui;

use thiserror::Error;

/// Main error type for lectern
#[derive(Error, Debug)]
pub enum LecternError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Server returned {status}: {detail}")]
    Api {
        status: reqwest::StatusCode,
        detail: String,
    },

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, LecternError>;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "lectern";
