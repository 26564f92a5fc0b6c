use actix_files::NamedFile;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};

use super::plain_text;
use crate::AppState;

pub const GREETING: &str = "Server is running...";

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(index)));
    cfg.service(web::resource("/UploadForm.html").route(web::get().to(upload_form)));
}

async fn index() -> HttpResponse {
    plain_text(StatusCode::OK, GREETING)
}

/// Serve the static uploader page; a missing file surfaces as 404
async fn upload_form(data: web::Data<AppState>) -> actix_web::Result<NamedFile> {
    let path = data.config.upload_form_path();
    match NamedFile::open_async(&path).await {
        Ok(file) => Ok(file),
        Err(e) => {
            log::warn!("Upload form unavailable at {}: {}", path.display(), e);
            Err(e.into())
        }
    }
}
