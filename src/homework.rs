//! Response validation and homework status parsing.

use serde_json::Value;

use crate::error::BotError;

/// Verdict text for every known review status
pub const HOMEWORK_VERDICTS: &[(&str, &str)] = &[
    (
        "approved",
        "Работа проверена: ревьюеру всё понравилось. Ура!",
    ),
    ("reviewing", "Работа взята на проверку ревьюером."),
    ("rejected", "Работа проверена: у ревьюера есть замечания."),
];

/// Outcome of parsing the most recent homework record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusUpdate {
    /// Nothing to report yet
    Unchanged,
    /// Review status changed; carries the ready-to-send notification
    Changed(String),
}

/// Looks up the verdict text for a status code.
#[must_use]
pub fn verdict(status: &str) -> Option<&'static str> {
    HOMEWORK_VERDICTS
        .iter()
        .find(|(code, _)| *code == status)
        .map(|(_, text)| *text)
}

/// Checks that an API answer is an object holding a `homeworks` list.
///
/// # Errors
///
/// Returns `BotError::Type` when the answer is not an object or `homeworks`
/// is not a list, and `BotError::MissingKey` when `homeworks` is absent.
pub fn check_response(response: &Value) -> Result<&[Value], BotError> {
    let object = response
        .as_object()
        .ok_or(BotError::Type("Ответ от эндпоинта пришел не в формате словаря"))?;

    let homeworks = object
        .get("homeworks")
        .ok_or(BotError::MissingKey("homeworks"))?;

    homeworks
        .as_array()
        .map(Vec::as_slice)
        .ok_or(BotError::Type("Данные homeworks получены не в виде списка"))
}

/// Reads the server-side cursor for the next request, if any.
#[must_use]
pub fn current_date(response: &Value) -> Option<i64> {
    response.get("current_date").and_then(Value::as_i64)
}

/// Turns a homework record into a notification.
///
/// A missing record and a record without a status are both reported as
/// [`StatusUpdate::Unchanged`].
///
/// # Errors
///
/// Returns `BotError::MissingKey` if the record has no `homework_name`, and
/// `BotError::ParseStatus` if its status has no verdict.
pub fn parse_status(homework: Option<&Value>) -> Result<StatusUpdate, BotError> {
    let Some(homework) = homework else {
        return Ok(StatusUpdate::Unchanged);
    };

    let name = homework
        .get("homework_name")
        .and_then(Value::as_str)
        .ok_or(BotError::MissingKey("homework_name"))?;

    let Some(status) = homework.get("status").filter(|s| !s.is_null()) else {
        return Ok(StatusUpdate::Unchanged);
    };

    let text = status
        .as_str()
        .and_then(verdict)
        .ok_or_else(|| BotError::ParseStatus(display_status(status)))?;

    Ok(StatusUpdate::Changed(format!(
        "Изменился статус проверки работы \"{name}\". {text}"
    )))
}

fn display_status(status: &Value) -> String {
    status
        .as_str()
        .map_or_else(|| status.to_string(), ToString::to_string)
}
