//! Ordered transcript of a study conversation

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::api::{ApiClient, ChatExchange, ContextRef};
use crate::study::FALLBACK_ANSWER;
use crate::Result;

/// Who a turn belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// Identity of the exchange a turn belongs to.
///
/// Turns expanded from persisted history carry the platform's exchange id;
/// turns created in this session carry a locally minted one. The two live
/// in different variants, so they can never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExchangeId {
    Stored(i64),
    Local(Uuid),
}

/// Unique identity of one turn: which exchange, which side of it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TurnId {
    pub exchange: ExchangeId,
    pub role: Role,
}

/// One rendered line of the conversation
#[derive(Debug, Clone, PartialEq)]
pub struct ChatTurn {
    pub id: TurnId,
    pub role: Role,
    pub text: String,
    pub created_at: DateTime<Utc>,
    /// The material the question was scoped to; assistant turns carry none
    pub context: Option<ContextRef>,
}

/// Ordered, display-ready turns of one study session.
///
/// History expansion and local appends share this one structure so the UI
/// renders a single list. Appends go to the end, in call order; nothing is
/// reordered or batched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transcript {
    turns: Vec<ChatTurn>,
    /// Local exchange opened by the latest question, closed by its answer
    pending_exchange: Option<Uuid>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the persisted history and expand it, oldest exchange first.
    ///
    /// Unlike the telemetry path this propagates failures: callers must be
    /// able to tell "failed to load" apart from "no history yet".
    pub async fn load(api: &ApiClient) -> Result<Self> {
        let history = api.chat_history().await?;
        Ok(Self::from_history(&history))
    }

    /// Expand persisted exchanges into user/assistant turn pairs.
    ///
    /// Each exchange becomes exactly two turns, question before answer,
    /// sharing the exchange's timestamp. Exchange order is preserved, and
    /// expanding the same history twice yields the same transcript.
    pub fn from_history(exchanges: &[ChatExchange]) -> Self {
        let mut transcript = Self::new();
        for exchange in exchanges {
            let id = ExchangeId::Stored(exchange.id);
            let created_at = exchange.created_at.and_utc();
            transcript.push(
                id,
                Role::User,
                exchange.message.clone(),
                created_at,
                exchange.context_ref(),
            );
            transcript.push(id, Role::Assistant, exchange.response.clone(), created_at, None);
        }
        transcript
    }

    /// Append the user's question and return the new turn.
    ///
    /// Opens a local exchange that the matching `append_assistant_turn` or
    /// `append_error_turn` closes, so the answer shares the question's
    /// exchange id.
    pub fn append_user_turn(
        &mut self,
        text: impl Into<String>,
        context: Option<ContextRef>,
    ) -> &ChatTurn {
        let exchange = Uuid::new_v4();
        self.pending_exchange = Some(exchange);
        self.push(
            ExchangeId::Local(exchange),
            Role::User,
            text.into(),
            Utc::now(),
            context,
        )
    }

    /// Append the answer to the pending question and return the new turn.
    pub fn append_assistant_turn(&mut self, text: impl Into<String>) -> &ChatTurn {
        let exchange = self.close_pending();
        self.push(exchange, Role::Assistant, text.into(), Utc::now(), None)
    }

    /// Append the fixed fallback turn for a question whose answer never
    /// arrived, so the conversation is not left hanging.
    pub fn append_error_turn(&mut self) -> &ChatTurn {
        let exchange = self.close_pending();
        self.push(
            exchange,
            Role::Assistant,
            FALLBACK_ANSWER.to_string(),
            Utc::now(),
            None,
        )
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Whether a question is waiting for its answer turn
    pub fn awaiting_answer(&self) -> bool {
        self.pending_exchange.is_some()
    }

    fn close_pending(&mut self) -> ExchangeId {
        ExchangeId::Local(self.pending_exchange.take().unwrap_or_else(Uuid::new_v4))
    }

    fn push(
        &mut self,
        exchange: ExchangeId,
        role: Role,
        text: String,
        created_at: DateTime<Utc>,
        context: Option<ContextRef>,
    ) -> &ChatTurn {
        self.turns.push(ChatTurn {
            id: TurnId { exchange, role },
            role,
            text,
            created_at,
            context,
        });
        let last = self.turns.len() - 1;
        &self.turns[last]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn exchange(id: i64, message: &str, response: &str) -> ChatExchange {
        ChatExchange {
            id,
            message: message.to_string(),
            response: response.to_string(),
            context_type: None,
            context_id: None,
            created_at: chrono::NaiveDate::from_ymd_opt(2024, 5, 1)
                .unwrap()
                .and_hms_opt(10, 0, id as u32)
                .unwrap(),
        }
    }

    #[test]
    fn history_expands_to_ordered_pairs() {
        let history = vec![
            exchange(1, "what is a limit?", "a value a function approaches"),
            exchange(2, "and a derivative?", "its rate of change"),
        ];

        let transcript = Transcript::from_history(&history);
        let turns = transcript.turns();
        assert_eq!(turns.len(), 4);

        assert_eq!(turns[0].role, Role::User);
        assert_eq!(turns[0].text, "what is a limit?");
        assert_eq!(turns[1].role, Role::Assistant);
        assert_eq!(turns[1].text, "a value a function approaches");
        assert_eq!(turns[2].text, "and a derivative?");
        assert_eq!(turns[3].text, "its rate of change");

        // Both sides of an exchange share its id and timestamp.
        assert_eq!(turns[0].id.exchange, ExchangeId::Stored(1));
        assert_eq!(turns[1].id.exchange, ExchangeId::Stored(1));
        assert_eq!(turns[0].created_at, turns[1].created_at);
        assert_ne!(turns[0].id, turns[1].id);
    }

    #[test]
    fn expansion_is_idempotent() {
        let history = vec![exchange(5, "q", "a")];
        assert_eq!(
            Transcript::from_history(&history),
            Transcript::from_history(&history)
        );
    }

    #[test]
    fn context_rides_on_the_user_turn_only() {
        let mut stored = exchange(9, "summarize the video", "it covers limits");
        stored.context_type = Some("video".to_string());
        stored.context_id = Some(42);

        let transcript = Transcript::from_history(&[stored]);
        assert_eq!(transcript.turns()[0].context, Some(ContextRef::Video(42)));
        assert_eq!(transcript.turns()[1].context, None);
    }

    #[test]
    fn local_pair_shares_one_exchange_id() {
        let mut transcript = Transcript::new();
        let question_id = transcript.append_user_turn("why is the sky blue?", None).id;
        assert!(transcript.awaiting_answer());

        let answer_id = transcript.append_assistant_turn("scattering").id;
        assert!(!transcript.awaiting_answer());

        assert_eq!(question_id.exchange, answer_id.exchange);
        assert_eq!(question_id.role, Role::User);
        assert_eq!(answer_id.role, Role::Assistant);
    }

    #[test]
    fn error_turn_carries_the_fixed_fallback_text() {
        let mut transcript = Transcript::new();
        transcript.append_user_turn("anyone there?", Some(ContextRef::Document(7)));
        let turn = transcript.append_error_turn();

        assert_eq!(turn.role, Role::Assistant);
        assert_eq!(turn.text, FALLBACK_ANSWER);
        assert_eq!(transcript.len(), 2);
    }

    #[test]
    fn ids_stay_unique_across_history_and_local_turns() {
        let history = vec![exchange(1, "q1", "a1"), exchange(2, "q2", "a2")];
        let mut transcript = Transcript::from_history(&history);
        transcript.append_user_turn("q3", None);
        transcript.append_assistant_turn("a3");
        transcript.append_user_turn("q4", None);
        transcript.append_error_turn();

        let ids: HashSet<TurnId> = transcript.turns().iter().map(|t| t.id).collect();
        assert_eq!(ids.len(), transcript.len());
    }
}
