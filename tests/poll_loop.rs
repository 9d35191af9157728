use async_trait::async_trait;
use homework_bot::api::{create_http_client, PracticumClient};
use homework_bot::bot::transport::ChatTransport;
use homework_bot::error::BotError;
use homework_bot::poller::{Poller, Sleeper};
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::{header, method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PERIOD: Duration = Duration::from_secs(600);

#[derive(Default)]
struct RecordingTransport {
    sent: Mutex<Vec<String>>,
}

impl RecordingTransport {
    fn sent(&self) -> Vec<String> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn send_text(&self, text: &str) -> Result<(), BotError> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(text.to_string());
        }
        Ok(())
    }
}

struct FailingTransport;

#[async_trait]
impl ChatTransport for FailingTransport {
    async fn send_text(&self, _text: &str) -> Result<(), BotError> {
        Err(BotError::Notification("Bad Request: chat not found".to_string()))
    }
}

#[derive(Default)]
struct RecordingSleeper {
    naps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    fn naps(&self) -> Vec<Duration> {
        self.naps.lock().map(|n| n.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, period: Duration) {
        if let Ok(mut naps) = self.naps.lock() {
            naps.push(period);
        }
    }
}

fn practicum(server: &MockServer) -> Arc<PracticumClient> {
    Arc::new(PracticumClient::new(
        create_http_client(Duration::from_secs(5)),
        format!("{}/api/user_api/homework_statuses/", server.uri()),
        "test-token",
    ))
}

#[tokio::test]
async fn test_http_404_is_logged_reported_and_followed_by_sleep() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(2)
        .mount(&server)
        .await;

    let transport = Arc::new(RecordingTransport::default());
    let sleeper = Arc::new(RecordingSleeper::default());
    let mut poller = Poller::new(
        practicum(&server),
        transport.clone(),
        sleeper.clone(),
        PERIOD,
        1_700_000_000,
    );

    poller.cycle().await;
    poller.cycle().await;

    assert_eq!(sleeper.naps(), vec![PERIOD, PERIOD]);
    assert_eq!(
        transport.sent(),
        vec!["Сбой в работе программы: Ошибка при запросе к API. Код ответа: 404".to_string()]
    );
}

#[tokio::test]
async fn test_status_change_is_relayed_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("Authorization", "OAuth test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "homeworks": [
                {"homework_name": "sprint_7.zip", "status": "reviewing"},
                {"homework_name": "sprint_6.zip", "status": "approved"}
            ],
            "current_date": 1_700_000_500
        })))
        .mount(&server)
        .await;

    let transport = Arc::new(RecordingTransport::default());
    let sleeper = Arc::new(RecordingSleeper::default());
    let mut poller = Poller::new(
        practicum(&server),
        transport.clone(),
        sleeper.clone(),
        PERIOD,
        1_700_000_000,
    );

    for _ in 0..3 {
        poller.cycle().await;
    }

    assert_eq!(
        transport.sent(),
        vec![
            "Изменился статус проверки работы \"sprint_7.zip\". Работа взята на проверку ревьюером."
                .to_string()
        ]
    );
    assert_eq!(poller.cursor(), 1_700_000_500);
    assert_eq!(sleeper.naps().len(), 3);
}

#[tokio::test]
async fn test_cursor_is_sent_as_from_date() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("from_date", "100"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"homeworks": [], "current_date": 200})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("from_date", "200"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"homeworks": [], "current_date": 300})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let transport = Arc::new(RecordingTransport::default());
    let mut poller = Poller::new(
        practicum(&server),
        transport.clone(),
        Arc::new(RecordingSleeper::default()),
        PERIOD,
        100,
    );

    poller.cycle().await;
    poller.cycle().await;

    assert_eq!(poller.cursor(), 300);
    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn test_malformed_payload_does_not_stop_polling() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"homeworks": "none"})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "homeworks": [{"homework_name": "final.zip", "status": "rejected"}],
            "current_date": 5
        })))
        .mount(&server)
        .await;

    let transport = Arc::new(RecordingTransport::default());
    let mut poller = Poller::new(
        practicum(&server),
        transport.clone(),
        Arc::new(RecordingSleeper::default()),
        PERIOD,
        0,
    );

    poller.cycle().await;
    poller.cycle().await;

    assert_eq!(
        transport.sent(),
        vec![
            "Сбой в работе программы: Данные homeworks получены не в виде списка".to_string(),
            "Изменился статус проверки работы \"final.zip\". Работа проверена: у ревьюера есть замечания."
                .to_string(),
        ]
    );
}

#[tokio::test]
async fn test_undeliverable_notifications_are_swallowed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let sleeper = Arc::new(RecordingSleeper::default());
    let mut poller = Poller::new(
        practicum(&server),
        Arc::new(FailingTransport),
        sleeper.clone(),
        PERIOD,
        0,
    );

    poller.cycle().await;

    assert_eq!(sleeper.naps(), vec![PERIOD]);
    assert!(poller.last_error().is_some_and(|e| e.contains("500")));
}
