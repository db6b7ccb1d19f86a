use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use store::Note;
use tracing::info;
use uuid::Uuid;

use super::{optional_payload, payload, JsonBody, MessageResponse};
use crate::auth::Identity;
use crate::error::ApiError;
use crate::state::AppState;
use crate::validation::{CreateNotePayload, UpdateNotePayload};

const NOTE_NOT_FOUND: &str = "Note not found";

/// A malformed id cannot name any note.
fn note_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound(NOTE_NOT_FOUND))
}

/// GET /api/notes/get
pub async fn list(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<Note>>, ApiError> {
    let notes = state.notes.list(identity.account_id).await?;
    Ok(Json(notes))
}

/// POST /api/notes/save
pub async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    body: JsonBody<CreateNotePayload>,
) -> Result<(StatusCode, Json<Note>), ApiError> {
    let draft = payload(body)?.validate()?;
    let note = state.notes.create(identity.account_id, draft).await?;
    info!(note = %note.id, owner = %note.owner, "note created");
    Ok((StatusCode::CREATED, Json(note)))
}

/// PUT /api/notes/{id}
///
/// A missing body is an empty patch: the note comes back unchanged.
pub async fn update(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Note>, ApiError> {
    let patch = optional_payload::<UpdateNotePayload>(&body)?.validate()?;
    let id = note_id(&id)?;
    let note = state.notes.update(identity.account_id, id, patch).await?;
    Ok(Json(note))
}

/// DELETE /api/notes/{id}
pub async fn delete(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = note_id(&id)?;
    state.notes.delete(identity.account_id, id).await?;
    info!(note = %id, "note deleted");
    Ok(Json(MessageResponse::new("Deleted")))
}
