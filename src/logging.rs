//! Tracing setup with secret redaction.
//!
//! Every log line goes through [`RedactingWriter`], which masks Telegram bot
//! tokens and the Practicum `OAuth` token before they reach stderr.

use regex::Regex;
use std::io::{self, Write};
use std::sync::Arc;
use tracing_subscriber::{prelude::*, EnvFilter};

/// Filter used when neither `RUST_LOG` nor `DEBUG_MODE` is set
pub const DEFAULT_FILTER: &str = "homework_bot=info,reqwest=warn,hyper=warn,teloxide=warn";

/// Regex patterns for redacting sensitive data
pub struct RedactionPatterns {
    bot_url: Regex,
    bot_token: Regex,
    oauth: Regex,
    env_secret: Regex,
}

impl RedactionPatterns {
    /// Compile all redaction patterns.
    ///
    /// # Errors
    ///
    /// Returns an error if any regex pattern is invalid
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            bot_url: Regex::new(r"(https?://[^/]+/bot)([0-9]+:[A-Za-z0-9_-]+)")?,
            bot_token: Regex::new(r"[0-9]{8,10}:[A-Za-z0-9_-]{35}")?,
            oauth: Regex::new(r"(OAuth\s+)[A-Za-z0-9_.-]+")?,
            env_secret: Regex::new(r"((?:PRACTICUM|TELEGRAM)_TOKEN=)[^\s&]+")?,
        })
    }

    /// Replace every secret found in `input` with a placeholder.
    #[must_use]
    pub fn redact(&self, input: &str) -> String {
        let output = self.bot_url.replace_all(input, "$1[TELEGRAM_TOKEN]");
        let output = self.bot_token.replace_all(&output, "[TELEGRAM_TOKEN]");
        let output = self.oauth.replace_all(&output, "$1[MASKED]");
        self.env_secret
            .replace_all(&output, "$1[MASKED]")
            .into_owned()
    }
}

/// Writer that redacts secrets before forwarding to `inner`
pub struct RedactingWriter<W: Write> {
    inner: W,
    patterns: Arc<RedactionPatterns>,
}

impl<W: Write> RedactingWriter<W> {
    /// Wrap `inner` with redaction.
    pub const fn new(inner: W, patterns: Arc<RedactionPatterns>) -> Self {
        Self { inner, patterns }
    }
}

impl<W: Write> Write for RedactingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let s = String::from_utf8_lossy(buf);
        let redacted = self.patterns.redact(&s);
        self.inner.write_all(redacted.as_bytes())?;
        // Report the original length even if redaction changed it
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

struct RedactingMakeWriter<F> {
    make_inner: F,
    patterns: Arc<RedactionPatterns>,
}

impl<'a, F, W> tracing_subscriber::fmt::MakeWriter<'a> for RedactingMakeWriter<F>
where
    F: Fn() -> W + 'static,
    W: Write,
{
    type Writer = RedactingWriter<W>;

    fn make_writer(&'a self) -> Self::Writer {
        RedactingWriter::new((self.make_inner)(), self.patterns.clone())
    }
}

/// Picks the log filter: `RUST_LOG` wins, then `DEBUG_MODE`, then the default.
#[must_use]
pub fn build_filter(debug_mode: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if debug_mode {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new(DEFAULT_FILTER)
        }
    })
}

/// Installs the global tracing subscriber writing redacted lines to stderr.
pub fn init_logging(patterns: Arc<RedactionPatterns>) {
    let debug_mode = std::env::var("DEBUG_MODE")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false);

    let make_writer = RedactingMakeWriter {
        make_inner: io::stderr,
        patterns,
    };

    tracing_subscriber::registry()
        .with(build_filter(debug_mode))
        .with(tracing_subscriber::fmt::layer().with_writer(make_writer))
        .init();
}
