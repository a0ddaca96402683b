//! Middleware for the HTTP client.
//!
//! Composed into the `reqwest-middleware` stack built in [`super::ArxivClient::new`].

use std::time::Instant;

use async_trait::async_trait;
use http::Extensions;
use reqwest::{Request, Response};
use reqwest_middleware::{Middleware, Next, Result};

/// Logs every outgoing request with its status and latency.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestLogger;

#[async_trait]
impl Middleware for RequestLogger {
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> Result<Response> {
        let method = req.method().clone();
        let url = req.url().clone();
        let started = Instant::now();

        let result = next.run(req, extensions).await;
        let elapsed_ms = started.elapsed().as_millis();

        match &result {
            Ok(response) => tracing::debug!(
                %method,
                %url,
                status = response.status().as_u16(),
                elapsed_ms,
                "arXiv request completed"
            ),
            Err(error) => tracing::warn!(%method, %url, elapsed_ms, %error, "arXiv request failed"),
        }

        result
    }
}
