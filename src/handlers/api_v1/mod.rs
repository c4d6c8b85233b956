pub mod forms;
pub mod meetings;

use actix_web::{
    Error, HttpResponse,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
    web,
};

/// CSRF protection for REST API mutation endpoints.
///
/// Rejects POST/PUT/DELETE requests that don't have Content-Type:
/// application/json. Browsers cannot send cross-origin JSON with cookies via
/// simple form POST, so the Content-Type check acts as a CSRF guard without
/// requiring tokens. GET requests are exempt (read-only, no state changes).
async fn require_json_content_type(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let method = req.method().clone();

    if method == actix_web::http::Method::POST
        || method == actix_web::http::Method::PUT
        || method == actix_web::http::Method::DELETE
    {
        let content_type = req
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if !content_type.starts_with("application/json") {
            let body = serde_json::json!({
                "error": "Content-Type must be application/json for mutation requests"
            });
            let response = HttpResponse::BadRequest().json(body);
            return Ok(req.into_response(response).map_into_right_body());
        }
    }

    next.call(req).await.map(|res| res.map_into_left_body())
}

/// Configure API v1 routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/meetings")
            .wrap(actix_web::middleware::from_fn(require_json_content_type))
            .route("", web::get().to(meetings::list))
            .route("", web::post().to(meetings::create))
            .route("/{id}", web::get().to(meetings::read))
            .route("/{id}", web::delete().to(meetings::delete))
            .route("/{id}/stats", web::get().to(meetings::stats))
            .route("/{id}/slots.csv", web::get().to(meetings::export_slots))
            .route("/{id}/responses", web::get().to(meetings::responses))
            .route(
                "/{id}/responses.csv",
                web::get().to(meetings::export_responses),
            ),
    );
    cfg.service(
        web::scope("/forms")
            .wrap(actix_web::middleware::from_fn(require_json_content_type))
            .route("", web::get().to(forms::list))
            .route("", web::post().to(forms::create))
            .route("/{id}", web::get().to(forms::read))
            .route("/{id}/links", web::get().to(forms::links))
            .route("/{id}/responses", web::get().to(forms::responses)),
    );
}
