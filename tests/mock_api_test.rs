//! Tests for the HTTP clients against mock servers.

use std::sync::Arc;
use std::time::Duration;

use httpmock::Method::GET;
use httpmock::Method::POST;
use httpmock::MockServer;
use wod_bot::analysis::ANALYSIS_FAILED;
use wod_bot::analysis::WorkoutAnalyst;
use wod_bot::analysis::error::AnalysisError;
use wod_bot::analysis::openai::OpenAiAnalyst;
use wod_bot::service::delivery_service::DeliveryService;
use wod_bot::telegram::MessageSender;
use wod_bot::telegram::TelegramClient;
use wod_bot::telegram::error::TelegramError;
use wod_bot::telegram::model::BotCommand;
use wod_bot::telegram::model::ParseMode;
use wod_bot::workout::WorkoutSource;
use wod_bot::workout::date_window::DateWindow;
use wod_bot::workout::sugarwod::SugarWodClient;

mod common;

#[tokio::test]
async fn test_sugarwod_fetch_workouts() {
    let server = MockServer::start();
    let client = SugarWodClient::new(&server.url(""), "secret-key").unwrap();

    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/workouts")
            .query_param("dates", "20240320,20240321")
            .header("Authorization", "secret-key");
        then.status(200)
            .header("content-type", "application/json")
            .body(common::get_response("sugarwod_workouts.json"));
    });

    let window = DateWindow::parse("2024-03-20", true).unwrap();
    let workouts = client.try_fetch(&window).await.expect("Failed to fetch workouts");

    mock.assert();
    assert_eq!(workouts.len(), 2);
    assert_eq!(workouts[0].id, "wk_01");
    assert_eq!(workouts[0].title.as_deref(), Some("Fran"));
    assert_eq!(workouts[1].scheduled_day(), "2024-03-21");
}

#[tokio::test]
async fn test_sugarwod_single_day_filter() {
    let server = MockServer::start();
    let client = SugarWodClient::new(&server.url(""), "secret-key").unwrap();

    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/workouts")
            .query_param("dates", "20240320");
        then.status(200).body(r#"{"data": []}"#);
    });

    let window = DateWindow::parse("20240320", false).unwrap();
    let workouts = client.fetch(&window).await;
    mock.assert();
    assert!(workouts.is_empty());
}

#[tokio::test]
async fn test_sugarwod_error_status_yields_empty() {
    let server = MockServer::start();
    let client = SugarWodClient::new(&server.url(""), "bad-key").unwrap();

    let mock = server.mock(|when, then| {
        when.method(GET).path("/workouts");
        then.status(401).body(r#"{"errors": [{"title": "Unauthorized"}]}"#);
    });

    let window = DateWindow::parse("20240320", false).unwrap();
    assert!(client.fetch(&window).await.is_empty());
    assert!(client.try_fetch(&window).await.is_err());
    mock.assert_hits(2);
}

#[tokio::test]
async fn test_sugarwod_bad_json_yields_empty() {
    let server = MockServer::start();
    let client = SugarWodClient::new(&server.url(""), "key").unwrap();

    server.mock(|when, then| {
        when.method(GET).path("/workouts");
        then.status(200).body("<html>maintenance</html>");
    });

    let window = DateWindow::parse("20240320", false).unwrap();
    assert!(client.fetch(&window).await.is_empty());
}

#[tokio::test]
async fn test_sugarwod_unreachable_yields_empty() {
    // Nothing listens on port 9 on a test host.
    let client = SugarWodClient::new("http://127.0.0.1:9", "key").unwrap();
    let window = DateWindow::parse("20240320", false).unwrap();
    assert!(client.fetch(&window).await.is_empty());
}

#[tokio::test]
async fn test_openai_analyze() {
    let server = MockServer::start();
    let analyst = OpenAiAnalyst::new(&server.url(""), "sk-test", "gpt-4o").unwrap();

    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/chat/completions")
            .header("Authorization", "Bearer sk-test")
            .body_contains("\"model\":\"gpt-4o\"")
            .body_contains("\"max_tokens\":500")
            .body_contains("Title: Fran");
        then.status(200)
            .header("content-type", "application/json")
            .body(common::get_response("openai_completion.json"));
    });

    let workouts = vec![common::workout("1", "Fran", "2024-03-20")];
    let text = analyst.analyze(&workouts).await;

    mock.assert();
    assert!(text.starts_with("Fran is a short, intense couplet."));
}

#[tokio::test]
async fn test_openai_rate_limit() {
    let server = MockServer::start();
    let analyst = OpenAiAnalyst::new(&server.url(""), "sk-test", "gpt-4o").unwrap();

    server.mock(|when, then| {
        when.method(POST).path("/chat/completions");
        then.status(429).body("slow down");
    });

    let workouts = vec![common::workout("1", "Fran", "2024-03-20")];
    assert!(matches!(
        analyst.try_analyze(&workouts).await,
        Err(AnalysisError::RateLimitExceeded(_))
    ));
    assert_eq!(analyst.analyze(&workouts).await, ANALYSIS_FAILED);
}

#[tokio::test]
async fn test_openai_empty_choices() {
    let server = MockServer::start();
    let analyst = OpenAiAnalyst::new(&server.url(""), "sk-test", "gpt-4o").unwrap();

    server.mock(|when, then| {
        when.method(POST).path("/chat/completions");
        then.status(200).body(r#"{"choices": []}"#);
    });

    assert!(matches!(
        analyst.try_analyze(&[]).await,
        Err(AnalysisError::EmptyCompletion)
    ));
}

#[tokio::test]
async fn test_telegram_send_message() {
    let server = MockServer::start();
    let client = TelegramClient::new(&server.url(""), "123:abc").unwrap();

    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/bot123:abc/sendMessage")
            .body_contains("\"chat_id\":\"42\"")
            .body_contains("\"parse_mode\":\"Markdown\"");
        then.status(200)
            .header("content-type", "application/json")
            .body(common::get_response("telegram_send_message.json"));
    });

    client
        .send_message("42", "hi", ParseMode::Markdown)
        .await
        .expect("Failed to send message");
    mock.assert();
}

#[tokio::test]
async fn test_telegram_api_error() {
    let server = MockServer::start();
    let client = TelegramClient::new(&server.url(""), "123:abc").unwrap();

    server.mock(|when, then| {
        when.method(POST).path("/bot123:abc/sendMessage");
        then.status(400)
            .body(r#"{"ok": false, "error_code": 400, "description": "Bad Request: chat not found"}"#);
    });

    match client.send_message("404", "hi", ParseMode::Plain).await {
        Err(TelegramError::ApiError { code, description }) => {
            assert_eq!(code, 400);
            assert!(description.contains("chat not found"));
        }
        other => panic!("unexpected result: {other:?}"),
    }

    // Delivery logs the failure and hands it back to the caller.
    let delivery = DeliveryService::new(Arc::new(client), 1);
    assert!(delivery.deliver("404", "hi", ParseMode::Plain).await.is_err());
}

#[tokio::test]
async fn test_telegram_get_updates() {
    let server = MockServer::start();
    let client = TelegramClient::new(&server.url(""), "123:abc").unwrap();

    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/bot123:abc/getUpdates")
            .body_contains("\"offset\":1000");
        then.status(200)
            .body(common::get_response("telegram_get_updates.json"));
    });

    let updates = client
        .get_updates(Some(1000), Duration::ZERO)
        .await
        .expect("Failed to get updates");

    mock.assert();
    assert_eq!(updates.len(), 2);
    assert_eq!(updates[0].any_message().unwrap().chat.id, 42);
    assert_eq!(
        updates[1].any_message().unwrap().chat.title.as_deref(),
        Some("Box WOD")
    );
}

#[tokio::test]
async fn test_telegram_set_my_commands() {
    let server = MockServer::start();
    let client = TelegramClient::new(&server.url(""), "123:abc").unwrap();

    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/bot123:abc/setMyCommands")
            .body_contains("\"command\":\"get_wod\"");
        then.status(200).body(r#"{"ok": true, "result": true}"#);
    });

    client
        .set_my_commands(&[BotCommand::new("get_wod", "Get the WOD")])
        .await
        .expect("Failed to set commands");
    mock.assert();
}

#[tokio::test]
async fn test_telegram_get_me() {
    let server = MockServer::start();
    let client = TelegramClient::new(&server.url(""), "123:abc").unwrap();

    server.mock(|when, then| {
        when.method(POST).path("/bot123:abc/getMe");
        then.status(200).body(
            r#"{"ok": true, "result": {"id": 123, "is_bot": true, "first_name": "WOD", "username": "WodBot"}}"#,
        );
    });

    let me = client.get_me().await.expect("Failed to get bot account");
    assert!(me.is_bot);
    assert_eq!(me.username.as_deref(), Some("WodBot"));
}
