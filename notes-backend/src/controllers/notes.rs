//! Notes REST API consumed by the upload form.
//!
//! Each handler performs exactly one `NoteStore` operation and maps its
//! outcome to a status code plus a plain-text message. Store failures never
//! escape the handler.

use actix_multipart::Multipart;
use actix_web::http::StatusCode;
use actix_web::{web, Either, HttpResponse, Responder};
use futures_util::StreamExt;
use serde::Deserialize;

use super::plain_text;
use crate::notes::NoteStoreError;
use crate::AppState;

pub const MSG_CREATED: &str = "Note uploaded successfully.";
pub const MSG_UPDATED: &str = "Note updated successfully.";
pub const MSG_DELETED: &str = "Note deleted successfully.";
pub const MSG_NOT_FOUND: &str = "Note not found.";
pub const MSG_DUPLICATE: &str = "A note with this name already exists.";
pub const MSG_NAME_REQUIRED: &str = "Please provide a note name.";
pub const MSG_INTERNAL: &str = "Internal server error";

/// Map a store failure to its HTTP response, logging internal ones with context
fn store_error_response(operation: &str, name: &str, err: NoteStoreError) -> HttpResponse {
    if err.is_internal() {
        log::error!("[NOTES] {} failed for '{}': {}", operation, name, err);
        return plain_text(StatusCode::INTERNAL_SERVER_ERROR, MSG_INTERNAL);
    }

    match err {
        NoteStoreError::NotFound(_) => {
            log::debug!("[NOTES] {}: '{}' not found", operation, name);
            plain_text(StatusCode::NOT_FOUND, MSG_NOT_FOUND)
        }
        NoteStoreError::DuplicateName(_) => {
            log::warn!("[NOTES] {}: duplicate name '{}'", operation, name);
            plain_text(StatusCode::BAD_REQUEST, MSG_DUPLICATE)
        }
        NoteStoreError::InvalidInput(reason) => {
            log::debug!("[NOTES] {}: rejected input: {}", operation, reason);
            plain_text(StatusCode::BAD_REQUEST, MSG_NAME_REQUIRED)
        }
        NoteStoreError::Corrupt { .. } | NoteStoreError::Io { .. } => {
            plain_text(StatusCode::INTERNAL_SERVER_ERROR, MSG_INTERNAL)
        }
    }
}

// --- List / read ---

async fn list_notes(data: web::Data<AppState>) -> impl Responder {
    match data.store.load_all().await {
        Ok(notes) => HttpResponse::Ok().json(notes),
        Err(e) => store_error_response("list", "*", e),
    }
}

async fn read_note(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let name = path.into_inner();

    match data.store.find_by_name(&name).await {
        Ok(note) => plain_text(StatusCode::OK, note.note),
        Err(e) => store_error_response("read", &name, e),
    }
}

// --- Create ---

#[derive(Debug, Default, Deserialize)]
struct UploadNoteForm {
    #[serde(default)]
    note_name: String,
    #[serde(default)]
    note: String,
}

/// Collect `note_name` and `note` from a multipart body.
/// File parts are drained and discarded; only text fields carry note content.
async fn read_multipart_form(mut payload: Multipart, limit: usize) -> Result<UploadNoteForm, String> {
    let mut form = UploadNoteForm::default();

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| format!("Failed to process upload: {}", e))?;

        let disposition = field.content_disposition();
        let is_file = disposition.get_filename().is_some();
        let name = disposition.get_name().unwrap_or_default().to_string();

        let mut value: Vec<u8> = Vec::new();
        while let Some(chunk) = field.next().await {
            let data = chunk.map_err(|e| format!("Failed to read upload data: {}", e))?;
            if is_file {
                continue;
            }
            if value.len() + data.len() > limit {
                return Err(format!("Field '{}' exceeds the {} byte limit", name, limit));
            }
            value.extend_from_slice(&data);
        }

        if is_file {
            log::debug!("[NOTES] Ignoring file part '{}' in upload", name);
            continue;
        }

        let text = String::from_utf8(value)
            .map_err(|_| format!("Field '{}' is not valid UTF-8", name))?;
        match name.as_str() {
            "note_name" => form.note_name = text,
            "note" => form.note = text,
            _ => {}
        }
    }

    Ok(form)
}

async fn upload_note(
    data: web::Data<AppState>,
    payload: Either<web::Form<UploadNoteForm>, Multipart>,
) -> impl Responder {
    let form = match payload {
        Either::Left(form) => form.into_inner(),
        Either::Right(multipart) => {
            match read_multipart_form(multipart, data.config.max_body_bytes).await {
                Ok(form) => form,
                Err(e) => {
                    log::warn!("[NOTES] Rejected upload: {}", e);
                    return plain_text(StatusCode::BAD_REQUEST, e);
                }
            }
        }
    };

    match data.store.insert(&form.note_name, &form.note).await {
        Ok(()) => {
            log::info!("[NOTES] Created note '{}'", form.note_name);
            plain_text(StatusCode::CREATED, MSG_CREATED)
        }
        Err(e) => store_error_response("create", &form.note_name, e),
    }
}

// --- Update / delete ---

/// The raw request body, trimmed, becomes the new note text
async fn update_note(
    data: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Bytes,
) -> impl Responder {
    let name = path.into_inner();
    if name.trim().is_empty() {
        return plain_text(StatusCode::BAD_REQUEST, MSG_NAME_REQUIRED);
    }

    let text = String::from_utf8_lossy(&body).trim().to_string();

    match data.store.update(&name, &text).await {
        Ok(()) => {
            log::info!("[NOTES] Updated note '{}'", name);
            plain_text(StatusCode::OK, MSG_UPDATED)
        }
        Err(e) => store_error_response("update", &name, e),
    }
}

async fn delete_note(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let name = path.into_inner();

    match data.store.delete(&name).await {
        Ok(()) => {
            log::info!("[NOTES] Deleted note '{}'", name);
            plain_text(StatusCode::OK, MSG_DELETED)
        }
        Err(e) => store_error_response("delete", &name, e),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/notes").route(web::get().to(list_notes)))
        .service(
            web::resource("/notes/{name}")
                .route(web::get().to(read_note))
                .route(web::put().to(update_note))
                .route(web::delete().to(delete_note)),
        )
        .service(web::resource("/upload").route(web::post().to(upload_note)));
}
