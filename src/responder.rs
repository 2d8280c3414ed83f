//! Message responder - the decision pipeline, detached from teloxide.

use async_trait::async_trait;
use tracing::{debug, error};

use crate::gate::{self, GateResult};
use crate::openai::Completions;

/// Reply to /start.
pub const GREETING: &str = "Hi! I'm an AI bot here to help answer questions in this group.";

/// Reply to /help.
pub const HELP_TEXT: &str = "I'm an AI-powered bot that can answer questions in this group.\n\
    Just tag me with your question or ask a question in the group and I'll try to help!\n\
    \n\
    Commands:\n\
    /start - Start the bot\n\
    /help - Show this help message";

/// Sent instead of an answer when the completion call fails.
pub const FALLBACK_REPLY: &str =
    "Sorry, I'm having trouble processing your question right now.";

/// One incoming group message.
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    pub chat_id: i64,
    pub sender_is_bot: bool,
    pub text: String,
}

/// Outbound capabilities the responder needs from the chat platform.
#[async_trait]
pub trait ReplySink {
    async fn send_text(&self, text: &str) -> Result<(), String>;
    async fn send_typing(&self) -> Result<(), String>;
}

/// What [`respond`] decided to do with a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Authored by a bot - never answered.
    FromBot,
    /// Not the authorized chat.
    WrongChat,
    /// Neither a question nor a mention.
    NotTriggered,
    /// Completion text sent as the reply.
    Answered,
    /// Completion failed; fallback text sent instead.
    FellBack,
}

/// Handle one incoming message. Each gate short-circuits without touching
/// the sink; a qualifying message gets a typing action, one completion
/// attempt, and exactly one reply.
pub async fn respond<C, S>(
    msg: &IncomingMessage,
    group_chat_id: &str,
    bot_username: Option<&str>,
    completions: &C,
    sink: &S,
) -> Outcome
where
    C: Completions + Sync,
    S: ReplySink + Sync,
{
    if msg.sender_is_bot {
        return Outcome::FromBot;
    }
    if msg.chat_id.to_string() != group_chat_id {
        return Outcome::WrongChat;
    }
    match gate::gate(&msg.text, bot_username) {
        GateResult::Ignored => return Outcome::NotTriggered,
        trigger => debug!("Replying in chat {} ({:?})", msg.chat_id, trigger),
    }

    match answer(&msg.text, completions, sink).await {
        Ok(text) => {
            sink.send_text(&text).await.ok();
            Outcome::Answered
        }
        Err(detail) => {
            error!("Error generating response: {detail}");
            sink.send_text(FALLBACK_REPLY).await.ok();
            Outcome::FellBack
        }
    }
}

/// Typing action plus a single completion attempt, no retries.
async fn answer<C, S>(text: &str, completions: &C, sink: &S) -> Result<String, String>
where
    C: Completions + Sync,
    S: ReplySink + Sync,
{
    sink.send_typing().await?;
    completions.complete(text).await.map_err(|e| e.to_string())
}
