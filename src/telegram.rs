//! Telegram reply sink using teloxide.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatAction, MessageId, ReplyParameters};
use tracing::warn;

use crate::responder::ReplySink;

/// Sends replies into one chat, quoting the message being answered.
pub struct TelegramSink {
    bot: Bot,
    chat_id: ChatId,
    reply_to: MessageId,
}

impl TelegramSink {
    pub fn new(bot: Bot, chat_id: ChatId, reply_to: MessageId) -> Self {
        Self {
            bot,
            chat_id,
            reply_to,
        }
    }
}

#[async_trait]
impl ReplySink for TelegramSink {
    async fn send_text(&self, text: &str) -> Result<(), String> {
        self.bot
            .send_message(self.chat_id, text)
            .reply_parameters(ReplyParameters::new(self.reply_to))
            .await
            .map(|_| ())
            .map_err(|e| {
                let msg = format!("Failed to send: {e}");
                warn!("{}", msg);
                msg
            })
    }

    async fn send_typing(&self) -> Result<(), String> {
        self.bot
            .send_chat_action(self.chat_id, ChatAction::Typing)
            .await
            .map(|_| ())
            .map_err(|e| {
                let msg = format!("Failed to send typing action: {e}");
                warn!("{}", msg);
                msg
            })
    }
}
