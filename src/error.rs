//! Error types shared by the poller and its collaborators.

use thiserror::Error;

/// Errors that can occur while polling the review API and relaying statuses
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BotError {
    /// One or more required environment variables are absent
    #[error("Отсутствуют обязательные переменные окружения: {}", .0.join(", "))]
    MissingConfig(Vec<&'static str>),
    /// Request could not be sent or its body could not be decoded
    #[error("Ошибка при запросе к API: {0}")]
    ApiAnswer(String),
    /// Endpoint answered with a status other than 200
    #[error("Ошибка при запросе к API. Код ответа: {0}")]
    ApiStatus(u16),
    /// Payload has an unexpected JSON type
    #[error("{0}")]
    Type(&'static str),
    /// Required key is absent from a payload
    #[error("Отсутствует ключ \"{0}\" в ответе API")]
    MissingKey(&'static str),
    /// Homework status is not in the verdict table
    #[error("Неизвестный статус домашней работы {0}.")]
    ParseStatus(String),
    /// Telegram refused or failed to deliver a message
    #[error("Ошибка при отправке сообщения в Telegram: {0}")]
    Notification(String),
}

impl From<reqwest::Error> for BotError {
    fn from(err: reqwest::Error) -> Self {
        Self::ApiAnswer(err.to_string())
    }
}
