use anyhow::Context;
use dotenvy::dotenv;
use homework_bot::api::PracticumClient;
use homework_bot::bot::transport::TelegramTransport;
use homework_bot::config::Settings;
use homework_bot::logging::{init_logging, RedactionPatterns};
use homework_bot::poller::{Poller, TokioSleeper};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenv().ok();

    // Redaction patterns must exist before the first log line
    let patterns = Arc::new(RedactionPatterns::new().context("Failed to compile regex patterns")?);
    init_logging(patterns);

    info!("Starting homework status bot...");

    let settings = match Settings::new() {
        Ok(settings) => settings,
        Err(e) => {
            error!(severity = "critical", "Failed to load configuration: {}", e);
            return Ok(());
        }
    };

    // Missing secrets are logged inside `credentials`; exit cleanly without polling
    let Ok(credentials) = settings.credentials() else {
        error!(severity = "critical", "Программа принудительно остановлена.");
        return Ok(());
    };

    info!(
        endpoint = %settings.practicum_endpoint,
        retry_period_secs = settings.retry_period,
        "Configuration loaded successfully."
    );

    let api = Arc::new(PracticumClient::from_settings(&settings, &credentials));
    let transport = Arc::new(TelegramTransport::new(
        &credentials.telegram_token,
        &credentials.telegram_chat_id,
    ));

    let mut poller = Poller::new(
        api,
        transport,
        Arc::new(TokioSleeper),
        settings.retry_period(),
        chrono::Utc::now().timestamp(),
    );

    tokio::select! {
        () = poller.run() => {}
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                error!("Failed to listen for Ctrl-C: {}", e);
            }
            info!("Interrupted, shutting down.");
        }
    }

    Ok(())
}
