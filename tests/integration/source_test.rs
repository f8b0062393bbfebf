//! Source adapters against a local HTTP listener

use rust_decimal_macros::dec;
use skin_price_monitor::catalog::CatalogItem;
use skin_price_monitor::source::{
    BuffConfig, BuffSource, FetchConfig, HttpFetcher, PriceSource, SourceError, SteamConfig,
    SteamSource,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serves one scripted response per connection and records each request head
struct StubServer {
    base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    async fn start(responses: Vec<(u16, &'static str)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));

        let recorded = requests.clone();
        tokio::spawn(async move {
            for (status, body) in responses {
                let Ok((mut stream, _)) = listener.accept().await else {
                    return;
                };

                let mut head = Vec::new();
                let mut buf = [0u8; 1024];
                while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => head.extend_from_slice(&buf[..n]),
                    }
                }
                recorded
                    .lock()
                    .unwrap()
                    .push(String::from_utf8_lossy(&head).to_lowercase());

                let response = format!(
                    "HTTP/1.1 {status} Stub\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });

        Self { base_url, requests }
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

fn fetcher(attempts: u32) -> HttpFetcher {
    HttpFetcher::new(FetchConfig {
        timeout: Duration::from_secs(5),
        attempts,
        base_delay: Duration::from_millis(10),
        ..Default::default()
    })
    .unwrap()
}

fn redline() -> CatalogItem {
    CatalogItem::new("ak-redline", "AK-47 | Redline (Field-Tested)", Some(33815))
}

#[tokio::test]
async fn test_fetcher_retries_until_success() {
    let server = StubServer::start(vec![(503, "busy"), (200, r#"{"ok":true}"#)]).await;

    let value: serde_json::Value = fetcher(3)
        .get_json(&format!("{}/ping", server.base_url), &[], &[])
        .await
        .unwrap();

    assert_eq!(value["ok"], true);
    assert_eq!(server.requests().len(), 2);
}

#[tokio::test]
async fn test_fetcher_gives_up_after_all_attempts() {
    let server = StubServer::start(vec![
        (503, "maintenance"),
        (503, "maintenance"),
        (503, "maintenance"),
    ])
    .await;

    let result: Result<serde_json::Value, _> = fetcher(3)
        .get_json(&format!("{}/ping", server.base_url), &[], &[])
        .await;

    match result {
        Err(SourceError::Status { status, body }) => {
            assert_eq!(status.as_u16(), 503);
            assert_eq!(body, "maintenance");
        }
        other => panic!("expected status error, got {other:?}"),
    }
    assert_eq!(server.requests().len(), 3);
}

#[tokio::test]
async fn test_fetcher_sends_user_agent() {
    let server = StubServer::start(vec![(200, "{}")]).await;

    let _: serde_json::Value = fetcher(1)
        .get_json(&server.base_url, &[], &[])
        .await
        .unwrap();

    let requests = server.requests();
    assert!(requests[0].contains("user-agent: mozilla/5.0 polystrikebot/1.0"));
}

#[tokio::test]
async fn test_buff_request_shape() {
    let server = StubServer::start(vec![(
        200,
        r#"{"code":"OK","data":{"goods_info":{"sell_min_price":"100.00","sell_num":50}}}"#,
    )])
    .await;
    let source = BuffSource::new(
        BuffConfig {
            base_url: server.base_url.clone(),
        },
        fetcher(1),
    );

    let quote = source.fetch_quote(&redline()).await.unwrap().unwrap();
    assert_eq!(quote.price, Some(dec!(100.00)));
    assert_eq!(quote.volume, Some(50));

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert!(request.starts_with("get /api/market/goods?goods_id=33815 http/1.1"));
    assert!(request.contains("accept-language: en-us,en;q=0.9"));
    assert!(request.contains("referer: https://buff.163.com/market/csgo"));
}

#[tokio::test]
async fn test_steam_request_shape() {
    let server = StubServer::start(vec![(
        200,
        r#"{"success":true,"lowest_price":"$1.00","volume":12}"#,
    )])
    .await;
    let source = SteamSource::new(
        SteamConfig {
            base_url: server.base_url.clone(),
            ..Default::default()
        },
        fetcher(1),
    );

    let quote = source.fetch_quote(&redline()).await.unwrap().unwrap();
    assert_eq!(quote.price, Some(dec!(1.00)));
    assert_eq!(quote.volume, Some(12));

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert!(request.starts_with(
        "get /market/priceoverview/?appid=730&currency=1&market_hash_name=ak-47+%7c+redline+%28field-tested%29 http/1.1"
    ));
    assert!(request.contains("referer: https://steamcommunity.com/market/"));
}

#[tokio::test]
async fn test_steam_error_status_is_reported() {
    let server = StubServer::start(vec![(429, "slow down")]).await;
    let source = SteamSource::new(
        SteamConfig {
            base_url: server.base_url.clone(),
            ..Default::default()
        },
        fetcher(1),
    );

    let result = source.fetch_quote(&redline()).await;
    assert!(matches!(
        result,
        Err(SourceError::Status { status, .. }) if status.as_u16() == 429
    ));
}
