use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::export;
use crate::links::{LinkMode, participant_link};
use crate::models::{form, meeting, response, slot};

const DEFAULT_MAX_NUMBER: i64 = 999;

#[derive(Debug, Deserialize)]
pub struct ApiMeetingRequest {
    pub meeting_name: String,
    pub max_number: Option<i64>,
    #[serde(default)]
    pub form_ids: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub struct ApiMeetingResponse {
    pub id: i64,
    pub slug: String,
    pub meeting_name: String,
    pub created_at: String,
    pub max_number: i64,
    pub assigned_count: i64,
    pub participant_link: String,
}

#[derive(Debug, Serialize)]
pub struct ApiMeetingDetail {
    pub id: i64,
    pub slug: String,
    pub meeting_name: String,
    pub created_at: String,
    pub max_number: i64,
    pub participant_link: String,
    pub stats: ApiMeetingStats,
    pub forms: Vec<ApiLinkedForm>,
}

#[derive(Debug, Serialize)]
pub struct ApiMeetingStats {
    pub total_numbers: i64,
    pub assigned_numbers: i64,
    pub percent_assigned: f64,
}

#[derive(Debug, Serialize)]
pub struct ApiLinkedForm {
    pub id: i64,
    pub slug: String,
    pub form_name: String,
    pub link: String,
}

#[derive(Debug, Serialize)]
pub struct ApiGradedResponse {
    pub participant_id: String,
    pub form_name: String,
    pub question_text: String,
    pub answer: String,
    pub verdict: String,
}

impl From<response::GradedResponse> for ApiGradedResponse {
    fn from(r: response::GradedResponse) -> Self {
        ApiGradedResponse {
            participant_id: r.participant_id,
            form_name: r.form_name,
            question_text: r.question_text,
            answer: r.answer_display,
            verdict: r.verdict,
        }
    }
}

fn stats_body(s: meeting::MeetingStats) -> ApiMeetingStats {
    ApiMeetingStats {
        total_numbers: s.total_numbers,
        assigned_numbers: s.assigned_numbers,
        percent_assigned: s.percent_assigned,
    }
}

/// GET /api/v1/meetings — all meetings with occupancy and share links.
pub async fn list(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let items: Vec<ApiMeetingResponse> = meeting::list_all(&conn)?
        .into_iter()
        .map(|m| ApiMeetingResponse {
            participant_link: participant_link(
                &config.base_url,
                &m.slug,
                None,
                LinkMode::Participant,
            ),
            id: m.id,
            slug: m.slug,
            meeting_name: m.meeting_name,
            created_at: m.created_at,
            max_number: m.max_number,
            assigned_count: m.assigned_count,
        })
        .collect();
    Ok(HttpResponse::Ok().json(items))
}

/// POST /api/v1/meetings — create a meeting and materialize its number pool.
pub async fn create(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    body: web::Json<ApiMeetingRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let max_number = body.max_number.unwrap_or(DEFAULT_MAX_NUMBER);

    let conn = pool.get()?;
    let created = meeting::create_with_pool(&conn, &body.meeting_name, max_number, &body.form_ids)?;

    log::info!(
        "Created meeting '{}' ({}) with {} numbers",
        created.meeting_name,
        created.slug,
        created.max_number
    );

    let link = participant_link(&config.base_url, &created.slug, None, LinkMode::Participant);
    Ok(HttpResponse::Created().json(ApiMeetingResponse {
        id: created.id,
        slug: created.slug,
        meeting_name: created.meeting_name,
        created_at: created.created_at,
        max_number: created.max_number,
        assigned_count: 0,
        participant_link: link,
    }))
}

/// GET /api/v1/meetings/{id} — metadata, occupancy and linked forms.
pub async fn read(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let meeting_id = path.into_inner();
    let conn = pool.get()?;

    let m = meeting::find_by_id(&conn, meeting_id)?.ok_or(AppError::NotFound)?;
    let stats = meeting::stats(&conn, meeting_id)?;
    let forms = form::forms_for_meeting(&conn, meeting_id)?
        .into_iter()
        .map(|f| ApiLinkedForm {
            link: participant_link(
                &config.base_url,
                &f.slug,
                None,
                LinkMode::ParticipantForm,
            ),
            id: f.id,
            slug: f.slug,
            form_name: f.form_name,
        })
        .collect();

    Ok(HttpResponse::Ok().json(ApiMeetingDetail {
        participant_link: participant_link(
            &config.base_url,
            &m.slug,
            None,
            LinkMode::Participant,
        ),
        id: m.id,
        slug: m.slug,
        meeting_name: m.meeting_name,
        created_at: m.created_at,
        max_number: m.max_number,
        stats: stats_body(stats),
        forms,
    }))
}

/// DELETE /api/v1/meetings/{id} — remove a meeting and its pool.
pub async fn delete(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let meeting_id = path.into_inner();
    let conn = pool.get()?;
    if !meeting::delete(&conn, meeting_id)? {
        return Err(AppError::NotFound);
    }
    log::info!("Deleted meeting {meeting_id}");
    Ok(HttpResponse::Ok().json(serde_json::json!({ "ok": true })))
}

/// GET /api/v1/meetings/{id}/stats — pool occupancy counts.
pub async fn stats(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let meeting_id = path.into_inner();
    let conn = pool.get()?;
    meeting::find_by_id(&conn, meeting_id)?.ok_or(AppError::NotFound)?;
    let stats = meeting::stats(&conn, meeting_id)?;
    Ok(HttpResponse::Ok().json(stats_body(stats)))
}

/// GET /api/v1/meetings/{id}/slots.csv — whole slot table as CSV.
pub async fn export_slots(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let meeting_id = path.into_inner();
    let conn = pool.get()?;
    let m = meeting::find_by_id(&conn, meeting_id)?.ok_or(AppError::NotFound)?;
    let slots = slot::list_all(&conn, meeting_id)?;
    let csv = export::slots_csv(&slots);

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}_numbers_export.csv\"", m.slug),
        ))
        .body(csv))
}

/// GET /api/v1/meetings/{id}/responses — graded answers for the meeting's forms.
pub async fn responses(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let meeting_id = path.into_inner();
    let conn = pool.get()?;
    meeting::find_by_id(&conn, meeting_id)?.ok_or(AppError::NotFound)?;
    let rows: Vec<ApiGradedResponse> = response::graded_for_meeting(&conn, meeting_id)?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(HttpResponse::Ok().json(rows))
}

/// GET /api/v1/meetings/{id}/responses.csv — graded answers as CSV.
pub async fn export_responses(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let meeting_id = path.into_inner();
    let conn = pool.get()?;
    let m = meeting::find_by_id(&conn, meeting_id)?.ok_or(AppError::NotFound)?;
    let rows = response::graded_for_meeting(&conn, meeting_id)?;
    let csv = export::responses_csv(&rows);

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}_responses_export.csv\"", m.slug),
        ))
        .body(csv))
}
