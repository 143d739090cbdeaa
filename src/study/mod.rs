//! Study conversations
//!
//! The platform persists question/answer exchanges; this module expands
//! them into an ordered transcript of user and assistant turns, appends new
//! turns as questions are asked, and wraps the answering service so a
//! failed question still produces something to show.

mod gateway;
mod transcript;

pub use gateway::ChatGateway;
pub use transcript::{ChatTurn, ExchangeId, Role, Transcript, TurnId};

/// Fixed assistant-side text used when no answer could be produced
pub const FALLBACK_ANSWER: &str = "Sorry, I encountered an error. Please try again.";
