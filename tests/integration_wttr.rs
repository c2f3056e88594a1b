use std::sync::Arc;

use qrtoolbot_rs::config::AppConfig;
use qrtoolbot_rs::dispatch::get_update_handler;
use qrtoolbot_rs::handlers::default_registry;
use serial_test::serial;
use teloxide::dptree;
use teloxide_tests::{MockBot, MockMessageText};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FAKE_PNG: &[u8] = b"\x89PNG\r\n\x1a\nnot really pixels";

fn cfg_for(server: &MockServer) -> AppConfig {
    AppConfig {
        token: "123:test".to_string(),
        wttr_base_url: server.uri(),
        wttr_default_location: "weilheim".to_string(),
    }
}

#[tokio::test]
#[serial]
async fn wttr_without_arguments_fetches_the_default_location() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weilheim.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(FAKE_PNG))
        .expect(1)
        .mount(&server)
        .await;

    let registry = Arc::new(default_registry(Arc::new(cfg_for(&server))));
    let mock = MockMessageText::new().text("/wttr");

    let mut bot = MockBot::new(mock, get_update_handler());
    bot.dependencies(dptree::deps![registry, CancellationToken::new()]);
    bot.dispatch().await;

    let binding = bot.get_responses();
    assert_eq!(binding.sent_messages.len(), 1);

    let last = binding.sent_messages.last().expect("no response");
    assert_eq!(last.caption(), Some("Weather in weilheim"));
    assert!(last.photo().is_some(), "expected a photo reply");

    server.verify().await;
}

#[tokio::test]
#[serial]
async fn wttr_fetches_locations_in_order_and_survives_a_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/a.png"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(FAKE_PNG))
        .expect(1)
        .mount(&server)
        .await;

    let registry = Arc::new(default_registry(Arc::new(cfg_for(&server))));
    let mock = MockMessageText::new().text("/wttr a b");

    let mut bot = MockBot::new(mock, get_update_handler());
    bot.dependencies(dptree::deps![registry, CancellationToken::new()]);
    bot.dispatch().await;

    let binding = bot.get_responses();
    assert_eq!(
        binding.sent_messages.len(),
        2,
        "one reply per location expected"
    );

    // Failing location a: error text, sent first.
    let first = &binding.sent_messages[0];
    let first_text = first.text().unwrap_or_default();
    assert!(first_text.ends_with("for a"), "Unexpected reply: {first_text}");
    assert!(first.photo().is_none());

    // Healthy location b still gets its image, after a.
    let second = &binding.sent_messages[1];
    assert_eq!(second.caption(), Some("Weather in b"));
    assert!(second.photo().is_some());

    server.verify().await;
}

#[tokio::test]
#[serial]
async fn wttr_cancelled_before_fetch_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(FAKE_PNG))
        .expect(0)
        .mount(&server)
        .await;

    let registry = Arc::new(default_registry(Arc::new(cfg_for(&server))));
    let shutdown = CancellationToken::new();
    shutdown.cancel();

    let mock = MockMessageText::new().text("/wttr berlin");

    let mut bot = MockBot::new(mock, get_update_handler());
    bot.dependencies(dptree::deps![registry, shutdown]);
    bot.dispatch().await;

    let binding = bot.get_responses();
    assert!(binding.sent_messages.is_empty());

    server.verify().await;
}
