//! Periodic self-ping for hosts that idle out quiet services

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::KeepAlive;

/// Ping `url` every `interval_secs` until the task is dropped
pub fn spawn(keep_alive: KeepAlive) -> JoinHandle<()> {
    tokio::spawn(async move {
        let http = reqwest::Client::new();
        let mut interval = tokio::time::interval(Duration::from_secs(keep_alive.interval_secs.max(1)));
        // The first tick completes immediately
        interval.tick().await;

        loop {
            interval.tick().await;
            ping(&http, &keep_alive.url).await;
        }
    })
}

async fn ping(http: &reqwest::Client, url: &str) {
    match http.get(url).send().await {
        Ok(response) => info!(url, status = %response.status(), "Keep-alive ping"),
        Err(e) => warn!(url, error = %e, "Keep-alive ping failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use axum::Router;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_pings_on_interval() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let app = Router::new().route(
            "/",
            get(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    "alive"
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let handle = spawn(KeepAlive {
            url: format!("http://{}/", addr),
            interval_secs: 1,
        });
        tokio::time::sleep(Duration::from_millis(2500)).await;
        handle.abort();

        assert!(hits.load(Ordering::SeqCst) >= 1);
    }

    #[tokio::test]
    async fn test_unreachable_target_is_ignored() {
        let handle = spawn(KeepAlive {
            url: "http://127.0.0.1:9/".to_string(),
            interval_secs: 1,
        });
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(!handle.is_finished());
        handle.abort();
    }
}
