use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::config::Config;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::links::{LinkMode, participant_link};
use crate::models::form::{self, FormDraft};
use crate::models::{response, slot};

use super::meetings::ApiGradedResponse;

#[derive(Debug, Serialize)]
pub struct ApiFormResponse {
    pub id: i64,
    pub slug: String,
    pub form_name: String,
    pub created_at: String,
    pub participant_link: String,
}

#[derive(Debug, Serialize)]
pub struct ApiFormDetail {
    pub id: i64,
    pub slug: String,
    pub form_name: String,
    pub created_at: String,
    pub participant_link: String,
    pub questions: Vec<ApiQuestion>,
}

/// Admin view of a question — unlike the participant view this includes the
/// configured correct answer.
#[derive(Debug, Serialize)]
pub struct ApiQuestion {
    pub id: i64,
    pub question_text: String,
    pub question_type: String,
    pub correct_answer: Option<String>,
    pub options: Vec<ApiOption>,
}

#[derive(Debug, Serialize)]
pub struct ApiOption {
    pub id: i64,
    pub option_text: String,
}

/// A persistent per-participant link for this form.
#[derive(Debug, Serialize)]
pub struct ApiUserLink {
    pub number: i64,
    pub link: String,
}

fn form_body(config: &Config, f: form::Form) -> ApiFormResponse {
    ApiFormResponse {
        participant_link: participant_link(
            &config.base_url,
            &f.slug,
            None,
            LinkMode::ParticipantForm,
        ),
        id: f.id,
        slug: f.slug,
        form_name: f.form_name,
        created_at: f.created_at,
    }
}

/// GET /api/v1/forms — all forms with their generic share links.
pub async fn list(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let items: Vec<ApiFormResponse> = form::list_all(&conn)?
        .into_iter()
        .map(|f| form_body(&config, f))
        .collect();
    Ok(HttpResponse::Ok().json(items))
}

/// POST /api/v1/forms — persist an authored draft as a new form.
pub async fn create(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    body: web::Json<FormDraft>,
) -> Result<HttpResponse, AppError> {
    let draft = body.into_inner();
    let conn = pool.get()?;
    let created = form::create(&conn, &draft)?;
    log::info!(
        "Created form '{}' ({}) with {} questions",
        created.form_name,
        created.slug,
        draft.questions.len()
    );
    Ok(HttpResponse::Created().json(form_body(&config, created)))
}

/// GET /api/v1/forms/{id} — form with questions, options and correct answers.
pub async fn read(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let form_id = path.into_inner();
    let conn = pool.get()?;
    let f = form::find_by_id(&conn, form_id)?.ok_or(AppError::NotFound)?;
    let questions = form::find_questions(&conn, form_id)?
        .into_iter()
        .map(|q| ApiQuestion {
            id: q.question.id,
            question_text: q.question.question_text,
            question_type: q.question.question_type,
            correct_answer: q.question.correct_answer,
            options: q
                .options
                .into_iter()
                .map(|o| ApiOption {
                    id: o.id,
                    option_text: o.option_text,
                })
                .collect(),
        })
        .collect();

    let base = form_body(&config, f);
    Ok(HttpResponse::Ok().json(ApiFormDetail {
        id: base.id,
        slug: base.slug,
        form_name: base.form_name,
        created_at: base.created_at,
        participant_link: base.participant_link,
        questions,
    }))
}

/// GET /api/v1/forms/{id}/links — persistent per-participant links, one for
/// each number already claimed in any pool.
pub async fn links(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let form_id = path.into_inner();
    let conn = pool.get()?;
    let f = form::find_by_id(&conn, form_id)?.ok_or(AppError::NotFound)?;

    let items: Vec<ApiUserLink> = slot::assigned_across_pools(&conn)?
        .into_iter()
        .map(|s| ApiUserLink {
            number: s.number,
            link: participant_link(
                &config.base_url,
                &f.slug,
                Some(&s.user_id),
                LinkMode::ParticipantForm,
            ),
        })
        .collect();
    Ok(HttpResponse::Ok().json(items))
}

/// GET /api/v1/forms/{id}/responses — graded answers for one form.
pub async fn responses(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let form_id = path.into_inner();
    let conn = pool.get()?;
    form::find_by_id(&conn, form_id)?.ok_or(AppError::NotFound)?;
    let rows: Vec<ApiGradedResponse> = response::graded_for_form(&conn, form_id)?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(HttpResponse::Ok().json(rows))
}
