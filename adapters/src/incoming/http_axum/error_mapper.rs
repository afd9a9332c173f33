use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value, json};
use tracing::{debug, error};

use domain::error::{DomainError, ErrorKind};
use metatile_application::error::AppError;

pub struct HttpError(pub AppError);

fn domain_status(error: &DomainError) -> StatusCode {
    match error.kind() {
        ErrorKind::UnknownTileset | ErrorKind::UnknownPalette => StatusCode::NOT_FOUND,
        ErrorKind::DuplicateTileset => StatusCode::CONFLICT,
        _ => StatusCode::BAD_REQUEST,
    }
}

impl HttpError {
    fn status_and_message(&self) -> (StatusCode, String) {
        let app_error = &self.0;
        match app_error {
            AppError::Domain(domain_error) => (domain_status(domain_error), app_error.to_string()),

            AppError::ValidationError { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, app_error.to_string())
            }

            AppError::PayloadTooLarge { .. } => {
                (StatusCode::PAYLOAD_TOO_LARGE, app_error.to_string())
            }

            AppError::WebSocketError { .. } => (StatusCode::BAD_REQUEST, app_error.to_string()),

            AppError::ConfigError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Configuration error".to_string(),
            ),

            AppError::CodecError { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Codec error".to_string())
            }

            AppError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status_code, message) = self.status_and_message();

        if status_code.is_server_error() {
            error!("Server error response generated: {}", self.0);
        } else {
            debug!("Client error response generated: {}", self.0);
        }

        let mut body = Map::new();
        body.insert("ok".to_string(), json!(false));
        body.insert("error".to_string(), json!(message));
        body.insert("status".to_string(), json!(status_code.as_u16()));

        if let AppError::Domain(domain_error) = &self.0 {
            body.insert("kind".to_string(), json!(domain_error.kind().as_str()));
            if let Some((line, text)) = domain_error.line_context() {
                body.insert("line".to_string(), json!(line));
                body.insert("text".to_string(), json!(text));
            }
        }

        (status_code, Json(Value::Object(body))).into_response()
    }
}

impl From<AppError> for HttpError {
    fn from(app_error: AppError) -> Self {
        HttpError(app_error)
    }
}
