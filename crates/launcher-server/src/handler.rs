//! HTTP request handlers.

use crate::server::AppState;
use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
};
use game_launcher_core::{LaunchOutcome, ProcessController, StopOutcome};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error};

/// Content type of every JSON response.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// `{"status": ..., "message": ...}` body shared by all fixed routes.
#[derive(Debug, Serialize)]
pub struct StatusBody {
    pub status: &'static str,
    pub message: String,
}

impl StatusBody {
    pub fn healthy(message: String) -> Self {
        Self {
            status: "healthy",
            message,
        }
    }

    pub fn success(message: String) -> Self {
        Self {
            status: "success",
            message,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            status: "error",
            message,
        }
    }
}

/// Serialize `body` with the JSON content type and the given status.
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    match serde_json::to_string(body) {
        Ok(json) => (status, [(header::CONTENT_TYPE, JSON_CONTENT_TYPE)], json).into_response(),
        Err(e) => {
            error!("Failed to serialize response body: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Response messages for the configured game.
#[derive(Debug, Clone)]
pub struct Messages {
    game: String,
}

impl Messages {
    pub fn new(game_name: impl Into<String>) -> Self {
        Self {
            game: game_name.into(),
        }
    }

    pub fn running(&self) -> String {
        format!("{} server is running", self.game)
    }

    pub fn launched(&self, outcome: LaunchOutcome) -> String {
        match outcome {
            LaunchOutcome::Started { .. } => format!("{} launched successfully", self.game),
            LaunchOutcome::AlreadyRunning { .. } => format!("{} is already running", self.game),
            LaunchOutcome::Initiated => format!("{} launch initiated", self.game),
        }
    }

    pub fn launch_failed(&self) -> String {
        format!("Failed to launch {}", self.game)
    }

    pub fn stopped(&self) -> String {
        format!("{} stopped successfully", self.game)
    }

    pub fn stop_failed(&self) -> String {
        format!("Failed to stop {}", self.game)
    }
}

/// Run a blocking controller call off the async workers.
async fn with_controller<T, F>(state: &AppState, f: F) -> Option<T>
where
    T: Send + 'static,
    F: FnOnce(&ProcessController) -> T + Send + 'static,
{
    let controller = Arc::clone(&state.controller);
    match tokio::task::spawn_blocking(move || f(&controller)).await {
        Ok(value) => Some(value),
        Err(e) => {
            error!("Controller task failed: {}", e);
            None
        }
    }
}

/// Health check endpoint. Independent of the managed process.
pub async fn handle_health(State(state): State<Arc<AppState>>) -> Response {
    json_response(StatusCode::OK, &StatusBody::healthy(state.messages.running()))
}

/// Launch the game.
pub async fn handle_launch(State(state): State<Arc<AppState>>) -> Response {
    let result = with_controller(&state, |controller| controller.try_launch()).await;

    match result {
        Some(Ok(outcome)) => {
            debug!("Launch outcome: {:?}", outcome);
            json_response(
                StatusCode::OK,
                &StatusBody::success(state.messages.launched(outcome)),
            )
        }
        Some(Err(e)) => {
            error!(kind = e.kind(), "Launch failed: {}", e);
            launch_error(&state)
        }
        None => launch_error(&state),
    }
}

fn launch_error(state: &AppState) -> Response {
    json_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        &StatusBody::error(state.messages.launch_failed()),
    )
}

/// Close the game.
pub async fn handle_close(State(state): State<Arc<AppState>>) -> Response {
    let result = with_controller(&state, |controller| controller.try_stop()).await;

    match result {
        Some(Ok(outcome)) => {
            if let StopOutcome::Swept { killed } = outcome {
                debug!("Kill-by-name sweep stopped {} process(es)", killed);
            } else {
                debug!("Stop outcome: {:?}", outcome);
            }
            json_response(StatusCode::OK, &StatusBody::success(state.messages.stopped()))
        }
        Some(Err(e)) => {
            error!(kind = e.kind(), "Stop failed: {}", e);
            close_error(&state)
        }
        None => close_error(&state),
    }
}

fn close_error(state: &AppState) -> Response {
    json_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        &StatusBody::error(state.messages.stop_failed()),
    )
}

/// Snapshot of the managed process.
pub async fn handle_status(State(state): State<Arc<AppState>>) -> Response {
    match with_controller(&state, |controller| controller.status()).await {
        Some(status) => json_response(StatusCode::OK, &status),
        None => json_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            &StatusBody::error("Failed to read process status".into()),
        ),
    }
}

/// CORS preflight: 204 with no body. The CORS headers come from the router layers.
pub async fn handle_preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Unmatched paths. OPTIONS on any path is still a preflight.
pub async fn handle_fallback(method: Method) -> Response {
    if method == Method::OPTIONS {
        return StatusCode::NO_CONTENT.into_response();
    }
    json_response(
        StatusCode::NOT_FOUND,
        &StatusBody::error("Resource not found".into()),
    )
}

/// Known path, wrong method.
pub async fn handle_method_not_allowed() -> Response {
    json_response(
        StatusCode::METHOD_NOT_ALLOWED,
        &StatusBody::error("Method not allowed".into()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_body_field_order() {
        let body = StatusBody::healthy("VR Cricket server is running".into());
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"status":"healthy","message":"VR Cricket server is running"}"#
        );
    }

    #[test]
    fn test_messages() {
        let messages = Messages::new("VR Cricket");
        assert_eq!(messages.running(), "VR Cricket server is running");
        assert_eq!(
            messages.launched(LaunchOutcome::Started { pid: 7 }),
            "VR Cricket launched successfully"
        );
        assert_eq!(
            messages.launched(LaunchOutcome::AlreadyRunning { pid: 7 }),
            "VR Cricket is already running"
        );
        assert_eq!(
            messages.launched(LaunchOutcome::Initiated),
            "VR Cricket launch initiated"
        );
        assert_eq!(messages.launch_failed(), "Failed to launch VR Cricket");
        assert_eq!(messages.stopped(), "VR Cricket stopped successfully");
        assert_eq!(messages.stop_failed(), "Failed to stop VR Cricket");
    }
}
