//! Pass-through proxy to the video generation API.
//!
//! The caller supplies its own API key; nothing is stored.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error};

use crate::error::JsonBody;
use crate::state::AppState;

/// Body of `POST /api/video`.
#[derive(Debug, Deserialize)]
pub struct VideoRequest {
    #[serde(rename = "apiKey")]
    pub api_key: Option<String>,
    pub action: Option<String>,
    #[serde(rename = "taskId")]
    pub task_id: Option<String>,
    /// Forwarded as the upstream JSON body on POST.
    pub body: Option<Value>,
}

/// Where a proxied call goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoTarget {
    pub method: Method,
    pub url: String,
}

impl VideoTarget {
    /// Map an action to the upstream endpoint.
    ///
    /// `generate` starts a job, `status` polls one, anything else posts to
    /// the base URL.
    pub fn resolve(base: &str, action: Option<&str>, task_id: Option<&str>) -> Self {
        match action {
            Some("generate") => Self {
                method: Method::POST,
                url: format!("{}/videos/generations", base),
            },
            Some("status") => Self {
                method: Method::GET,
                url: format!("{}/async-result/{}", base, task_id.unwrap_or_default()),
            },
            _ => Self {
                method: Method::POST,
                url: base.to_string(),
            },
        }
    }
}

fn video_error(status: StatusCode, code: u16, message: &str) -> Response {
    (
        status,
        Json(json!({ "error": { "code": code, "message": message } })),
    )
        .into_response()
}

/// Forward a request and relay the upstream status and JSON body.
pub async fn proxy(State(state): State<AppState>, body: JsonBody<VideoRequest>) -> Response {
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => {
            return video_error(StatusCode::BAD_REQUEST, 400, &rejection.body_text());
        }
    };
    let Some(api_key) = req
        .api_key
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
    else {
        return video_error(StatusCode::UNAUTHORIZED, 1001, "API key is required");
    };

    let target = VideoTarget::resolve(
        &state.video_api_base,
        req.action.as_deref(),
        req.task_id.as_deref(),
    );
    debug!(method = %target.method, url = %target.url, "Proxying video request");

    match forward(&state.http, &target, api_key, req.body).await {
        Ok((status, body)) => (status, Json(body)).into_response(),
        Err(e) => {
            error!(url = %target.url, error = %e, "Video API error");
            video_error(StatusCode::INTERNAL_SERVER_ERROR, 500, "Internal server error")
        }
    }
}

async fn forward(
    http: &reqwest::Client,
    target: &VideoTarget,
    api_key: &str,
    body: Option<Value>,
) -> Result<(StatusCode, Value), reqwest::Error> {
    let mut request = http
        .request(target.method.clone(), &target.url)
        .bearer_auth(api_key)
        .header("Accept-Language", "en-US,en");

    if target.method == Method::POST {
        request = request.json(&body.unwrap_or_else(|| json!({})));
    }

    let response = request.send().await?;
    let status =
        StatusCode::from_u16(response.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let body: Value = response.json().await?;
    Ok((status, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::*;

    const BASE: &str = "https://video.example/v4";

    #[test]
    fn test_resolve_targets() {
        let generate = VideoTarget::resolve(BASE, Some("generate"), None);
        assert_eq!(generate.method, Method::POST);
        assert_eq!(generate.url, "https://video.example/v4/videos/generations");

        let status = VideoTarget::resolve(BASE, Some("status"), Some("task-9"));
        assert_eq!(status.method, Method::GET);
        assert_eq!(status.url, "https://video.example/v4/async-result/task-9");

        let other = VideoTarget::resolve(BASE, None, None);
        assert_eq!(other.method, Method::POST);
        assert_eq!(other.url, BASE);
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let app = app(TestOptions::default()).await;

        let (status, body) = call_json(
            &app.router,
            json_request("POST", "/api/video", json!({ "action": "generate" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], 1001);
        assert_eq!(body["error"]["message"], "API key is required");
    }

    #[tokio::test]
    async fn test_unreachable_upstream() {
        let app = app(TestOptions::default()).await;

        let (status, body) = call_json(
            &app.router,
            json_request(
                "POST",
                "/api/video",
                json!({ "apiKey": "k", "action": "generate", "body": { "prompt": "cat" } }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], 500);
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let app = app(TestOptions::default()).await;

        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/api/video")
            .header("content-type", "application/json")
            .body(axum::body::Body::from("{\"apiKey\":"))
            .unwrap();
        let (status, body) = call_json(&app.router, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], 400);
    }
}
