use actix_web::http::header::ContentType;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;

pub mod health;
pub mod index;
pub mod notes;

/// Plain-text response, the format every note endpoint except the listing answers in
pub(crate) fn plain_text(status: StatusCode, body: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status)
        .content_type(ContentType::plaintext())
        .body(body.into())
}
