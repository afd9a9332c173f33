pub mod http_axum;
pub mod ws_axum;
