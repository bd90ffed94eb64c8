//! DTOs for the upload endpoint.

use serde::Serialize;
use utoipa::ToSchema;

/// Response to a successful upload.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UploadResponse {
    /// Relative URL the stored file is served from.
    pub url: String,
}
