mod common;

use std::time::Duration;

use shootingbias::dashboard::Dashboard;
use shootingbias::server::serve_listener;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::{sleep, timeout};

#[tokio::test]
async fn idle_connection_does_not_block_later_requests() {
    let dir = TempDir::new().unwrap();
    let mut config = common::write_fixture(dir.path());
    config.request_timeout = Duration::from_millis(200);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(serve_listener(listener, Dashboard::new(config)));

    // Connects first and never sends a byte.
    let mut idle = TcpStream::connect(addr).await.unwrap();
    sleep(Duration::from_millis(50)).await;

    let mut client = TcpStream::connect(addr).await.unwrap();
    client
        .write_all(b"GET /api/health HTTP/1.1\r\nHost: localhost\r\n\r\n")
        .await
        .unwrap();
    let mut response = String::new();
    timeout(Duration::from_secs(5), client.read_to_string(&mut response))
        .await
        .expect("health request was not answered")
        .unwrap();
    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"), "{}", response);
    assert!(response.ends_with(r#"{"status":"ok"}"#), "{}", response);

    let mut dropped = String::new();
    timeout(Duration::from_secs(5), idle.read_to_string(&mut dropped))
        .await
        .expect("idle connection was never closed")
        .unwrap();
    assert!(dropped.starts_with("HTTP/1.1 408 Request Timeout\r\n"), "{}", dropped);

    server.abort();
}
