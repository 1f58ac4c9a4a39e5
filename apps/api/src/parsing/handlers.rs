//! Axum route handlers for the parse API.

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::affinda_client::FILE_FIELD;
use crate::errors::AppError;
use crate::parsing::models::{ParsedResume, SelectedFile, UploadStatus};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SessionQuery {
    /// Id the page generates on load. Uploads sharing it share one controller.
    pub session: Option<Uuid>,
}

/// POST /api/v1/resumes/parse?session=<uuid>
///
/// Takes the picked file from the `file` part, relays it to the parsing API
/// and returns the normalized resume. A request without a file resubmits the
/// session's previous selection, or fails like an empty submit when there is
/// none. A second upload on a session that is still loading gets 409.
pub async fn handle_parse(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
    mut multipart: Multipart,
) -> Result<Json<ParsedResume>, AppError> {
    let controller = match query.session {
        Some(id) => state.sessions.controller(id),
        None => state.sessions.detached(),
    };

    if let Some(file) = read_selected_file(&mut multipart).await? {
        controller.select_file(file);
    }

    let resume = controller.submit().await?;
    Ok(Json(resume))
}

/// GET /api/v1/resumes/sessions/:id
///
/// Current upload status of a session: idle, loading, success or failure.
pub async fn handle_session_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UploadStatus>, AppError> {
    let controller = state
        .sessions
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("Upload session {id} not found")))?;
    Ok(Json(controller.status()))
}

/// Pulls the `file` part out of the form. Browsers send an empty part with an
/// empty file name when nothing was picked; that counts as no selection.
async fn read_selected_file(multipart: &mut Multipart) -> Result<Option<SelectedFile>, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        if file_name.is_empty() {
            return Ok(None);
        }

        let content = field.bytes().await.map_err(multipart_error)?;
        return SelectedFile::new(file_name.clone(), content)
            .map(Some)
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "Unsupported file '{file_name}': only .pdf and .docx files are accepted"
                ))
            });
    }
    Ok(None)
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::Validation(e.body_text())
    }
}
