use std::sync::Arc;

use axum::{
    routing::{get, post},
    Json,
    Router,
};
use blob_store::BlobStorage;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::{
    config::UploadConfig,
    http_objects::GatewayAPIError,
    middleware::InstanceRequestSpan,
    source::SourceFile,
};

mod objects;
pub use objects::{download_file, upload_file};

#[derive(OpenApi)]
#[openapi(
        paths(
            objects::upload_file,
            objects::download_file,
        ),
        components(
            schemas(
                GatewayAPIError,
            )
        ),
        tags(
            (name = "objects", description = "Bucket Gateway object API")
        )
    )]
pub struct ApiDoc;

#[derive(Clone)]
pub struct RouteState {
    pub blob_storage: Arc<BlobStorage>,
    pub upload: Arc<UploadConfig>,
    pub source_file: SourceFile,
}

impl RouteState {
    pub fn new(blob_storage: Arc<BlobStorage>, upload: UploadConfig) -> Self {
        let source_file = SourceFile::new(upload.source_file.clone());
        Self {
            blob_storage,
            upload: Arc::new(upload),
            source_file,
        }
    }
}

pub fn create_routes(route_state: RouteState, request_span: InstanceRequestSpan) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/openapi.json", get(openapi_json))
        .route(
            "/{partner_hash}/{file_name}",
            post(upload_file).get(download_file),
        )
        .with_state(route_state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(request_span)
                .on_failure(()),
        )
}

async fn index() -> &'static str {
    "Bucket Gateway"
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
