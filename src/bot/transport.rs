//! Chat transport used to deliver notifications.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::Recipient;

use crate::error::BotError;

/// Outbound channel to the single configured chat
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Sends a plain text message.
    ///
    /// # Errors
    ///
    /// Returns `BotError::Notification` if the messaging API rejects the call.
    async fn send_text(&self, text: &str) -> Result<(), BotError>;
}

/// Telegram Bot API transport bound to one chat.
pub struct TelegramTransport {
    bot: Bot,
    recipient: Recipient,
}

impl TelegramTransport {
    /// Create a transport for `chat_id` using the given bot token.
    ///
    /// Numeric ids address a chat directly; anything else is treated as a
    /// channel username such as `@my_channel`.
    #[must_use]
    pub fn new(token: &str, chat_id: &str) -> Self {
        Self::with_bot(Bot::new(token), chat_id)
    }

    /// Create a transport around an existing bot handle.
    #[must_use]
    pub fn with_bot(bot: Bot, chat_id: &str) -> Self {
        Self {
            bot,
            recipient: parse_recipient(chat_id),
        }
    }
}

fn parse_recipient(chat_id: &str) -> Recipient {
    let chat_id = chat_id.trim();
    chat_id.parse::<i64>().map_or_else(
        |_| Recipient::ChannelUsername(chat_id.to_string()),
        |id| Recipient::Id(ChatId(id)),
    )
}

#[async_trait]
impl ChatTransport for TelegramTransport {
    async fn send_text(&self, text: &str) -> Result<(), BotError> {
        self.bot
            .send_message(self.recipient.clone(), text)
            .await
            .map(|_| ())
            .map_err(|e| BotError::Notification(e.to_string()))
    }
}
