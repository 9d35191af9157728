//! Best-effort delivery of notifications.

use tracing::{debug, error};

use super::transport::ChatTransport;

/// Maximum message length for Telegram with safety margin.
/// Telegram's official limit is 4096.
pub const TELEGRAM_MESSAGE_LIMIT: usize = 4000;

/// Sends `message` to the configured chat.
///
/// Delivery failures are logged and swallowed: a lost notification is never
/// retried and never interrupts polling. Returns whether the message went out.
pub async fn send_message(transport: &dyn ChatTransport, message: &str) -> bool {
    let text = truncate_message(message);
    match transport.send_text(&text).await {
        Ok(()) => {
            debug!("Сообщение успешно отправлено в Telegram");
            true
        }
        Err(e) => {
            error!(error = %e, "Failed to deliver notification");
            false
        }
    }
}

fn truncate_message(message: &str) -> String {
    if message.chars().count() <= TELEGRAM_MESSAGE_LIMIT {
        return message.to_string();
    }
    let mut truncated: String = message.chars().take(TELEGRAM_MESSAGE_LIMIT).collect();
    truncated.push_str("...");
    truncated
}
