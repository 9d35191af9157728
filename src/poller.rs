//! Poll loop
//!
//! Asks the review API for updates, turns the newest homework into a
//! notification and relays it, then sleeps for a fixed period. Every failure
//! inside an iteration is logged and reported to the chat once per distinct
//! text; nothing short of process shutdown stops the loop.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::api::HomeworkApi;
use crate::bot::messaging::send_message;
use crate::bot::transport::ChatTransport;
use crate::error::BotError;
use crate::homework::{check_response, current_date, parse_status, StatusUpdate};

/// Prefix of the chat message sent when an iteration fails
pub const FAILURE_PREFIX: &str = "Сбой в работе программы";

/// Timer used between two polls
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Blocks the poll loop for `period`.
    async fn sleep(&self, period: Duration);
}

/// Production timer backed by `tokio::time::sleep`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, period: Duration) {
        tokio::time::sleep(period).await;
    }
}

/// Long-lived poll loop and its process-local state.
pub struct Poller {
    api: Arc<dyn HomeworkApi>,
    transport: Arc<dyn ChatTransport>,
    sleeper: Arc<dyn Sleeper>,
    retry_period: Duration,
    cursor: i64,
    last_message: Option<String>,
    last_error: Option<String>,
}

impl Poller {
    /// Create a poller whose first request asks for updates after `start`.
    #[must_use]
    pub fn new(
        api: Arc<dyn HomeworkApi>,
        transport: Arc<dyn ChatTransport>,
        sleeper: Arc<dyn Sleeper>,
        retry_period: Duration,
        start: i64,
    ) -> Self {
        Self {
            api,
            transport,
            sleeper,
            retry_period,
            cursor: start,
            last_message: None,
            last_error: None,
        }
    }

    /// Timestamp sent as `from_date` on the next request
    #[must_use]
    pub const fn cursor(&self) -> i64 {
        self.cursor
    }

    /// Last status notification handed to the transport
    #[must_use]
    pub fn last_message(&self) -> Option<&str> {
        self.last_message.as_deref()
    }

    /// Last error text reported to the chat
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Runs forever: one iteration, then the fixed sleep.
    pub async fn run(&mut self) {
        info!(
            retry_period_secs = self.retry_period.as_secs(),
            cursor = self.cursor,
            "Poll loop started"
        );
        loop {
            self.cycle().await;
        }
    }

    /// One full iteration including the trailing sleep.
    pub async fn cycle(&mut self) {
        self.tick().await;
        self.sleeper.sleep(self.retry_period).await;
    }

    /// One iteration without the sleep. Never fails.
    pub async fn tick(&mut self) {
        match self.poll().await {
            Ok(StatusUpdate::Changed(message)) => self.notify_change(message).await,
            Ok(StatusUpdate::Unchanged) => debug!("Статус домашних работ не изменился."),
            Err(e) => self.report_failure(&e).await,
        }
    }

    /// Fetches, validates and parses the newest homework.
    ///
    /// Advances the cursor from the server-reported `current_date`; the cursor
    /// never moves backwards and is kept when the field is absent.
    ///
    /// # Errors
    ///
    /// Propagates API, validation and parsing errors.
    pub async fn poll(&mut self) -> Result<StatusUpdate, BotError> {
        let response = self.api.get_api_answer(self.cursor).await?;

        if let Some(next) = current_date(&response) {
            self.cursor = self.cursor.max(next);
        }

        let homeworks = check_response(&response)?;
        parse_status(homeworks.first())
    }

    async fn notify_change(&mut self, message: String) {
        if self.last_message.as_deref() == Some(message.as_str()) {
            debug!("Status message already sent, skipping");
            return;
        }
        info!(message = %message, "Homework status changed");
        send_message(self.transport.as_ref(), &message).await;
        self.last_message = Some(message);
    }

    async fn report_failure(&mut self, err: &BotError) {
        let message = format!("{FAILURE_PREFIX}: {err}");
        error!(error = %err, "{FAILURE_PREFIX}");

        if self.last_error.as_deref() == Some(message.as_str()) {
            return;
        }
        send_message(self.transport.as_ref(), &message).await;
        self.last_error = Some(message);
    }
}
