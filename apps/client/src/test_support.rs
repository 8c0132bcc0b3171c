//! Stub proxy servers for client tests.

use axum::Router;
use tokio::net::TcpListener;

use crate::api::ProxyClient;
use crate::config::ClientConfig;

/// Serves `router` on an ephemeral loopback port and returns its base URL.
pub async fn spawn_proxy(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

pub fn client_for(base_url: &str) -> ProxyClient {
    ProxyClient::new(&ClientConfig::new(base_url)).unwrap()
}
