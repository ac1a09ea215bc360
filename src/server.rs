//! HTTP front end: `POST /visualize-keypoints/` answers with the rendered MP4.

use std::sync::Arc;

use anyhow::Context as _;
use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;

use crate::config::ServerConfig;
use crate::foundation::error::ReelError;
use crate::pipeline::RenderOpts;
use crate::service::{OUTPUT_FILENAME, VisualizeRequest, Visualizer};

/// Shared handler state.
pub struct AppState {
    /// Runs each request.
    pub visualizer: Visualizer,
}

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"healthy"`.
    pub status: &'static str,
    /// Crate version.
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

/// Error returned by a handler, rendered as `{"detail": ...}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    /// HTTP status the error is sent with.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    fn internal(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: detail.into(),
        }
    }
}

impl From<ReelError> for ApiError {
    fn from(err: ReelError) -> Self {
        let status = if err.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self {
            status,
            detail: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { detail: self.detail })).into_response()
    }
}

/// All routes, bound to `state`.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/visualize-keypoints/", post(visualize_keypoints))
        .with_state(state)
}

/// `GET /`: a one-line usage hint.
pub async fn root() -> &'static str {
    "Keypoint visualization API. POST {\"json_file_path\": ...} to /visualize-keypoints/"
}

/// `GET /health`.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: crate::VERSION,
    })
}

/// `POST /visualize-keypoints/`: render the referenced document and answer with the MP4.
///
/// Rendering runs on the blocking pool. A bad body or source is a 400, any later failure a
/// 500.
pub async fn visualize_keypoints(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<VisualizeRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = payload.map_err(|rejection| ApiError {
        status: StatusCode::BAD_REQUEST,
        detail: rejection.body_text(),
    })?;

    let visualizer = state.visualizer.clone();
    let video = tokio::task::spawn_blocking(move || visualizer.visualize(&req))
        .await
        .map_err(|e| ApiError::internal(format!("render task failed: {e}")))?
        .inspect_err(|e| tracing::warn!(error = %e, "visualization failed"))?;

    let bytes = tokio::fs::read(video.path()).await.map_err(|e| {
        ApiError::internal(format!(
            "failed to read rendered video '{}': {e}",
            video.path().display()
        ))
    })?;
    tracing::info!(frames = video.frames, bytes = bytes.len(), "serving video");
    // The body is in memory; the request directory can go.
    drop(video);

    Ok((
        [
            (header::CONTENT_TYPE, "video/mp4".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{OUTPUT_FILENAME}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

/// Bind `cfg.addr()` and serve until the process is stopped.
pub async fn serve(cfg: ServerConfig, opts: RenderOpts) -> anyhow::Result<()> {
    opts.validate()?;
    let addr = cfg.addr()?;
    tokio::fs::create_dir_all(&cfg.output_dir)
        .await
        .with_context(|| format!("create output directory '{}'", cfg.output_dir.display()))?;

    let state = Arc::new(AppState {
        visualizer: Visualizer::new(cfg.output_dir.clone(), opts),
    });
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    tracing::info!(
        addr = %listener.local_addr()?,
        output_dir = %cfg.output_dir.display(),
        "server listening"
    );
    axum::serve(listener, app).await.context("serve http")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(out: &str) -> Arc<AppState> {
        let out = std::path::Path::new("target/server_unit").join(out);
        let _ = std::fs::remove_dir_all(&out);
        std::fs::create_dir_all(&out).unwrap();
        Arc::new(AppState {
            visualizer: Visualizer::new(out, RenderOpts::default()),
        })
    }

    fn output_entries(out: &str) -> usize {
        std::fs::read_dir(std::path::Path::new("target/server_unit").join(out))
            .unwrap()
            .count()
    }

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_reports_version() {
        let Json(h) = health().await;
        assert_eq!(h.status, "healthy");
        assert_eq!(h.version, crate::VERSION);
    }

    #[tokio::test]
    async fn missing_file_maps_to_400_with_detail() {
        let req = VisualizeRequest {
            json_file_path: "target/server_unit/nope.json".into(),
        };
        let err = visualize_keypoints(State(state("out_missing")), Ok(Json(req)))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(output_entries("out_missing"), 0);

        let body = body_json(err.into_response()).await;
        let detail = body["detail"].as_str().unwrap();
        assert!(detail.contains("not found"), "{detail}");
    }

    #[tokio::test]
    async fn malformed_json_maps_to_400() {
        std::fs::create_dir_all("target/server_unit").unwrap();
        let path = "target/server_unit/broken.json";
        std::fs::write(path, b"{\"frames\": [").unwrap();
        let req = VisualizeRequest {
            json_file_path: path.into(),
        };
        let err = visualize_keypoints(State(state("out_malformed")), Ok(Json(req)))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(output_entries("out_malformed"), 0);
    }

    #[tokio::test]
    async fn structural_errors_map_to_500_with_message() {
        std::fs::create_dir_all("target/server_unit").unwrap();
        let path = "target/server_unit/short.json";
        std::fs::write(path, br#"{"frames":[{"keypoints":[[0.5,0.5]]}]}"#).unwrap();
        let req = VisualizeRequest {
            json_file_path: path.into(),
        };
        let err = visualize_keypoints(State(state("out_short")), Ok(Json(req)))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(output_entries("out_short"), 0);
        let body = body_json(err.into_response()).await;
        assert!(body["detail"].as_str().unwrap().contains("1 keypoints"));
    }

    #[test]
    fn encode_errors_are_server_errors() {
        let err = ApiError::from(ReelError::encode("ffmpeg missing"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
