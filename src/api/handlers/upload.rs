//! File upload endpoint.
//!
//! Uploads are streamed to disk chunk by chunk rather than buffered in
//! memory, and the client-supplied filename is reduced to its base
//! component before it touches the filesystem.

use std::path::Path;

use axum::extract::multipart::Field;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use tokio::io::{AsyncWriteExt, BufWriter};

use crate::api::dto::UploadResponse;
use crate::app_state::AppState;
use crate::config::RelayConfig;
use crate::error::{ErrorResponse, RelayError};

/// Write buffer size for streaming uploads to disk.
const UPLOAD_BUFFER_BYTES: usize = 1024 * 1024;

/// `POST /upload` — Store a multipart file upload.
///
/// The first `file` field is streamed to the uploads directory under its
/// sanitized base filename; an upload with the same name overwrites the
/// previous one.
///
/// # Errors
///
/// Returns [`RelayError`] when the request carries no `file` field, the
/// filename reduces to nothing usable, or the write to disk fails.
#[utoipa::path(
    post,
    path = "/upload",
    tag = "Uploads",
    summary = "Upload a file",
    description = "Stores a multipart file upload under its base filename and returns the URL it is served from. Any directory components in the client-supplied name are discarded.",
    responses(
        (status = 200, description = "File stored", body = UploadResponse),
        (status = 400, description = "Malformed upload request", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn upload_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, RelayError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }

        let raw_name = field.file_name().ok_or(RelayError::MissingFile)?.to_owned();
        let file_name = sanitize_filename(&raw_name)?;

        let upload_dir = state.config.upload_dir();
        tokio::fs::create_dir_all(&upload_dir).await?;
        let bytes = stream_to_disk(field, &upload_dir.join(&file_name)).await?;

        tracing::info!(file = %file_name, bytes, "upload stored");
        return Ok((
            StatusCode::OK,
            Json(UploadResponse {
                url: format!("/static/uploads/{file_name}"),
            }),
        ));
    }

    Err(RelayError::MissingFile)
}

/// Reduces a client-supplied filename to its base component.
///
/// Both `/` and `\` are treated as separators so traversal attempts from
/// any client platform are stripped. Names that reduce to nothing
/// (empty, `.`, `..`) are rejected.
///
/// # Errors
///
/// Returns [`RelayError::InvalidFilename`] when no usable base component
/// remains.
pub fn sanitize_filename(raw: &str) -> Result<String, RelayError> {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or(raw);
    match Path::new(base).file_name().and_then(|name| name.to_str()) {
        Some(name) if !name.is_empty() => Ok(name.to_owned()),
        _ => Err(RelayError::InvalidFilename(raw.to_owned())),
    }
}

/// Streams one multipart field to `dest` through a fixed-size buffer,
/// returning the number of bytes written.
async fn stream_to_disk(mut field: Field<'_>, dest: &Path) -> Result<u64, RelayError> {
    let file = tokio::fs::File::create(dest).await?;
    let mut writer = BufWriter::with_capacity(UPLOAD_BUFFER_BYTES, file);

    let mut written: u64 = 0;
    while let Some(chunk) = field.chunk().await? {
        writer.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    writer.flush().await?;
    Ok(written)
}

/// Upload routes, with the body limit raised to the configured maximum.
pub fn routes(config: &RelayConfig) -> Router<AppState> {
    Router::new().route(
        "/upload",
        post(upload_handler).layer(DefaultBodyLimit::max(config.max_upload_bytes)),
    )
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn plain_names_pass_through() {
        assert_eq!(sanitize_filename("photo.png").ok().as_deref(), Some("photo.png"));
        assert_eq!(
            sanitize_filename("report.v2.pdf").ok().as_deref(),
            Some("report.v2.pdf")
        );
    }

    #[test]
    fn traversal_is_reduced_to_basename() {
        assert_eq!(
            sanitize_filename("a/../../evil.png").ok().as_deref(),
            Some("evil.png")
        );
        assert_eq!(
            sanitize_filename("/etc/passwd").ok().as_deref(),
            Some("passwd")
        );
    }

    #[test]
    fn backslash_paths_are_reduced_too() {
        assert_eq!(
            sanitize_filename("C:\\Users\\me\\evil.png").ok().as_deref(),
            Some("evil.png")
        );
    }

    #[test]
    fn unusable_names_are_rejected() {
        assert!(sanitize_filename("").is_err());
        assert!(sanitize_filename("..").is_err());
        assert!(sanitize_filename(".").is_err());
        assert!(sanitize_filename("uploads/").is_err());
    }

    #[test]
    fn dotted_but_valid_names_survive() {
        assert_eq!(
            sanitize_filename("weird..name.png").ok().as_deref(),
            Some("weird..name.png")
        );
        assert_eq!(sanitize_filename(".hidden").ok().as_deref(), Some(".hidden"));
    }
}
