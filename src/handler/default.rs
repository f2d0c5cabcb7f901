use bytes::Bytes;

use crate::config::HandlerConfig;
use crate::handler::Handler;
use crate::http::body::RequestBody;
use crate::http::request::{Method, Request};
use crate::http::response::{Response, ResponseBuilder, StatusCode};
use crate::stream::Transport;

/// Echoes `POST /echo` bodies and answers everything else with a fixed body.
#[derive(Debug, Clone)]
pub struct DefaultHandler {
    default_body: Bytes,
}

impl DefaultHandler {
    pub fn new(default_body: impl Into<Bytes>) -> Self {
        Self {
            default_body: default_body.into(),
        }
    }

    pub fn from_config(config: &HandlerConfig) -> Self {
        Self::new(config.default_body.clone())
    }
}

impl Handler for DefaultHandler {
    async fn handle<S: Transport>(
        &self,
        request: Request,
        body: &mut RequestBody<'_, S>,
    ) -> anyhow::Result<Response> {
        if request.method == Method::POST && request.target == "/echo" {
            let content_type = request
                .header_str("Content-Type")
                .unwrap_or("application/octet-stream")
                .to_string();
            let echoed = body.read_to_end().await?;

            tracing::debug!(bytes = echoed.len(), "echoing request body");

            return Ok(ResponseBuilder::new(StatusCode::Ok)
                .header("Content-Type", content_type)
                .body(echoed)
                .build());
        }

        Ok(ResponseBuilder::new(StatusCode::Ok)
            .header("Content-Type", "text/plain")
            .body(self.default_body.clone())
            .build())
    }
}
