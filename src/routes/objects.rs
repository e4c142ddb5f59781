use axum::{
    body::Body,
    extract::{Path, State},
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE},
        HeaderValue,
        StatusCode,
    },
    response::Response,
};
use blob_store::ObjectKey;
use tracing::{debug, error, info};

use super::RouteState;
use crate::http_objects::GatewayAPIError;

const TEXT_PLAIN: &str = "text/plain";

/// Upload the source file to `{partner_hash}/{file_name}`
///
/// The request body is ignored; the configured source file is written on
/// every call.
#[utoipa::path(
    post,
    path = "/{partner_hash}/{file_name}",
    tag = "objects",
    params(
        ("partner_hash" = String, Path, description = "Partner identifier, first key segment"),
        ("file_name" = String, Path, description = "Object file name, second key segment"),
    ),
    responses(
        (status = CREATED, description = "Object written"),
        (status = BAD_REQUEST, description = "Invalid key segment", body = GatewayAPIError),
        (status = INTERNAL_SERVER_ERROR, description = "Unable to read the source file or write the object", body = GatewayAPIError)
    ),
)]
#[tracing::instrument(skip_all)]
pub async fn upload_file(
    Path((partner_hash, file_name)): Path<(String, String)>,
    State(state): State<RouteState>,
) -> Result<StatusCode, GatewayAPIError> {
    let key = ObjectKey::new(&partner_hash, &file_name)?;
    info!(key = %key, "upload started");

    let content = state
        .source_file
        .read()
        .await
        .map_err(GatewayAPIError::internal_error)?;

    match state
        .blob_storage
        .put(&key, &content, &state.upload.content_type)
        .await
    {
        Ok(put_result) => {
            info!(
                key = %key,
                size_bytes = put_result.size_bytes,
                sha256 = %put_result.sha256_hash,
                "upload finished"
            );
        }
        Err(e) if state.upload.mask_store_errors => {
            error!(key = %key, "upload failed, reporting created: {}", e);
        }
        Err(e) => {
            error!(key = %key, "upload failed: {}", e);
            return Err(e.into());
        }
    }
    Ok(StatusCode::CREATED)
}

/// Download the object stored at `{partner_hash}/{file_name}`
#[utoipa::path(
    get,
    path = "/{partner_hash}/{file_name}",
    tag = "objects",
    params(
        ("partner_hash" = String, Path, description = "Partner identifier, first key segment"),
        ("file_name" = String, Path, description = "Object file name, second key segment"),
    ),
    responses(
        (status = 200, description = "Object content", body = String, content_type = "text/plain"),
        (status = BAD_REQUEST, description = "Invalid key segment", body = GatewayAPIError),
        (status = NOT_FOUND, description = "No object at this key", body = GatewayAPIError),
        (status = CONFLICT, description = "Object was rewritten while being read", body = GatewayAPIError),
        (status = INTERNAL_SERVER_ERROR, description = "Internal Server Error", body = GatewayAPIError)
    ),
)]
#[tracing::instrument(skip_all)]
pub async fn download_file(
    Path((partner_hash, file_name)): Path<(String, String)>,
    State(state): State<RouteState>,
) -> Result<Response<Body>, GatewayAPIError> {
    let key = ObjectKey::new(&partner_hash, &file_name)?;
    let disposition = HeaderValue::from_str(&format!("attachment;filename={}", file_name))
        .map_err(|e| GatewayAPIError::bad_request(&format!("invalid file name: {}", e)))?;
    info!(key = %key, "download started");

    let handle = state.blob_storage.head(&key).await?;
    debug!(key = %key, size_bytes = handle.size_bytes, "found object");
    let object = state.blob_storage.read(&handle).await?;
    info!(key = %key, size_bytes = object.data.len(), "download finished");

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, TEXT_PLAIN)
        .header(CONTENT_DISPOSITION, disposition)
        .header(CONTENT_LENGTH, object.data.len())
        .body(Body::from(object.data))
        .map_err(|e| GatewayAPIError::internal_error_str(&e.to_string()))
}
