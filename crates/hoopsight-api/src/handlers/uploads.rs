//! Video upload handler.

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Response for a stored upload.
#[derive(Serialize)]
pub struct UploadResponse {
    pub filename: String,
    /// Path relative to the uploads mount, as the front-end expects it
    pub location: String,
}

/// Store an uploaded video under the uploads directory.
///
/// The file is served back as a static asset at `/uploads/{filename}`.
pub async fn upload_video(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart payload: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .map(sanitize_filename)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| ApiError::bad_request("Uploaded file has no usable filename"))?;

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Failed to read upload: {}", e)))?;

        let destination = state.config.upload_dir.join(&filename);
        tokio::fs::write(&destination, &bytes)
            .await
            .map_err(|e| ApiError::internal(format!("Failed to store upload: {}", e)))?;

        info!(
            filename = %filename,
            bytes = bytes.len(),
            "Stored uploaded video"
        );

        return Ok(Json(UploadResponse {
            location: filename.clone(),
            filename,
        }));
    }

    Err(ApiError::bad_request("Missing 'file' field in upload"))
}

/// Keep only the final path component and drop characters that could
/// escape the uploads directory.
fn sanitize_filename(name: &str) -> String {
    name.rsplit(['/', '\\'])
        .next()
        .unwrap_or("")
        .chars()
        .filter(|c| !matches!(c, '\0' | ':'))
        .collect::<String>()
        .trim_start_matches('.')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("game.mp4"), "game.mp4");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("c:\\videos\\game.mp4"), "game.mp4");
        assert_eq!(sanitize_filename(".hidden"), "hidden");
    }
}
