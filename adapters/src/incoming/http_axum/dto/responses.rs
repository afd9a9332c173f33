use axum::{
    http::{
        HeaderMap, HeaderValue,
        header::{CACHE_CONTROL, CONTENT_DISPOSITION, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    #[must_use]
    pub fn success_with_data(data: Option<T>) -> Self {
        Self {
            ok: true,
            error: None,
            data,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SelectedSlotResponse {
    pub slot: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub environment: String,
    pub tilesets: usize,
    pub assigned_slots: usize,
    pub selected_slot: Option<usize>,
    pub live_connections: usize,
}

/// Rendered pixels. Never cached since slots change under the same URL.
pub struct PngResponse {
    pub png_data: Vec<u8>,
}

impl IntoResponse for PngResponse {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("image/png"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
        (headers, self.png_data).into_response()
    }
}

fn attachment_headers(content_type: &'static str, file_name: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
    let disposition = format!("attachment; filename=\"{}\"", file_name);
    if let Ok(disposition_value) = HeaderValue::from_str(&disposition) {
        headers.insert(CONTENT_DISPOSITION, disposition_value);
    }
    headers
}

/// Definition or palette text served as a download.
pub struct TextFileResponse {
    pub text: String,
    pub file_name: String,
}

impl IntoResponse for TextFileResponse {
    fn into_response(self) -> Response {
        let headers = attachment_headers("text/plain; charset=utf-8", &self.file_name);
        (headers, self.text).into_response()
    }
}

/// Compiled binary output served as a download.
pub struct BinaryFileResponse {
    pub bytes: Vec<u8>,
    pub file_name: String,
}

impl IntoResponse for BinaryFileResponse {
    fn into_response(self) -> Response {
        let headers = attachment_headers("application/octet-stream", &self.file_name);
        (headers, self.bytes).into_response()
    }
}
