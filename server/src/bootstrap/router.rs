use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::bootstrap::state::AppState;
use metatile_adapters::incoming::http_axum::routes::build_application_router;
use metatile_adapters::shared::app_state::AppState as AdaptersAppState;

pub fn create_router(state: &AppState) -> Router {
    let adapters_state = state.to_adapters_state();
    let cors_layer = create_cors_layer(&adapters_state);

    build_application_router(&adapters_state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer),
        )
        .with_state(adapters_state)
}

fn create_cors_layer(state: &AdaptersAppState) -> CorsLayer {
    let base_cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            HeaderName::from_static("content-type"),
            HeaderName::from_static("accept"),
            HeaderName::from_static("origin"),
            HeaderName::from_static("x-requested-with"),
        ])
        .expose_headers([
            HeaderName::from_static("content-disposition"),
            HeaderName::from_static("x-request-id"),
        ]);

    match &state.config.server.cors_origin {
        Some(origin) => base_cors.allow_origin(
            origin
                .parse::<HeaderValue>()
                .unwrap_or_else(|_| HeaderValue::from_static("http://localhost:3000")),
        ),
        None => base_cors.allow_origin(HeaderValue::from_static("http://localhost:3000")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
        response::Response,
    };
    use domain::{compile::IndexedImage, palette::Palette};
    use metatile_adapters::outgoing::image_rs::png_codec_image::ImagePngAdapter;
    use metatile_application::{
        infrastructure_config::Config, ports::outgoing::image_codec::ImageCodecPort,
    };
    use tower::ServiceExt;

    fn router() -> Router {
        create_router(&AppState::new(Config::default()))
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn health_responds() {
        let response = router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn export_without_tilesets_is_empty_attachment() {
        let response = router()
            .oneshot(Request::get("/definitions").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.contains("metatile_definitions.txt"));
        assert_eq!(body_text(response).await, "");
    }

    #[tokio::test]
    async fn import_with_unknown_alias_reports_line() {
        let response = router()
            .oneshot(
                Request::post("/definitions")
                    .header(header::CONTENT_TYPE, "text/plain")
                    .body(Body::from("A,0,A,0"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_text(response).await;
        assert!(body.contains("\"line\":1"));
    }

    #[tokio::test]
    async fn out_of_range_slot_is_rejected() {
        let response = router()
            .oneshot(Request::get("/slots/128").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn empty_bank_compiles_to_blank_outputs() {
        let app = router();

        let metatiles = app
            .clone()
            .oneshot(Request::get("/compiled/metatiles.bin").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(metatiles.status(), StatusCode::OK);
        let bytes = to_bytes(metatiles.into_body(), usize::MAX).await.unwrap();
        assert_eq!(bytes.len(), 128 * 16);
        assert!(bytes.iter().all(|&b| b == 0));

        let sheet = app
            .clone()
            .oneshot(Request::get("/compiled/tileset.png").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(sheet.status(), StatusCode::OK);
        assert_eq!(sheet.headers().get(header::CONTENT_TYPE).unwrap(), "image/png");

        let palette = app
            .oneshot(Request::get("/compiled/palettes/0").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(palette.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn indexed_upload_serves_palette_and_compiles() {
        let palette = Palette::from_rgb_triplets(&[255, 0, 253, 0, 128, 0]);
        let image = IndexedImage::new(16, 16, vec![1; 256]).unwrap();
        let png = ImagePngAdapter::new()
            .encode_indexed_png(&image, &palette)
            .unwrap();
        let app = router();

        let upload = app
            .clone()
            .oneshot(Request::put("/tilesets/grass.png").body(Body::from(png)).unwrap())
            .await
            .unwrap();
        assert_eq!(upload.status(), StatusCode::CREATED);
        assert!(body_text(upload).await.contains("\"has_palette\":true"));

        let pal = app
            .clone()
            .oneshot(
                Request::get("/tilesets/grasspng/palette.pal")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(pal.status(), StatusCode::OK);
        assert!(
            body_text(pal)
                .await
                .starts_with("JASC-PAL\r\n0100\r\n16\r\n255 0 253\r\n0 128 0\r\n")
        );

        let set = app
            .clone()
            .oneshot(
                Request::put("/slots/0/bottom")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"tileset_id":"grasspng","tile_index":0}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(set.status(), StatusCode::OK);

        let summary = app
            .oneshot(Request::get("/compiled").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = body_text(summary).await;
        assert!(body.contains("\"tiles\":2"));
        assert!(body.contains("\"palettes\":[\"grasspng\"]"));
    }
}
