//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::Arc;

use contact_manager::http::HttpServer;
use contact_manager::lifecycle::Shutdown;
use contact_manager::{ServerConfig, SqliteContactStore};
use serde_json::Value;
use tokio::net::TcpListener;

/// A running server over a fresh in-memory database.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    shutdown: Shutdown,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn get(&self, path: &str) -> (u16, Value) {
        let res = self.client.get(self.url(path)).send().await.unwrap();
        decode(res).await
    }

    pub async fn post(&self, path: &str, body: Value) -> (u16, Value) {
        let res = self.client.post(self.url(path)).json(&body).send().await.unwrap();
        decode(res).await
    }

    pub async fn put(&self, path: &str, body: Value) -> (u16, Value) {
        let res = self.client.put(self.url(path)).json(&body).send().await.unwrap();
        decode(res).await
    }

    pub async fn delete(&self, path: &str) -> (u16, Value) {
        let res = self.client.delete(self.url(path)).send().await.unwrap();
        decode(res).await
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

async fn decode(res: reqwest::Response) -> (u16, Value) {
    let status = res.status().as_u16();
    let body = res.json().await.unwrap_or(Value::Null);
    (status, body)
}

/// Boot the server on an ephemeral port.
pub async fn spawn_app() -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let store = Arc::new(SqliteContactStore::open_in_memory().unwrap());
    let server = HttpServer::new(&ServerConfig::default(), store);

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.signalled();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    let client = reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap();

    TestApp {
        addr,
        client,
        shutdown,
    }
}
