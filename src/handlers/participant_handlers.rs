//! Participant-facing flows: joining a meeting to receive a number, and
//! answering a form. These are the flows behind the shareable links; the
//! `mode` link parameter selects which one the entry route dispatches to.

use std::collections::HashMap;

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::identity;
use crate::links::{LinkMode, participant_link};
use crate::models::{form, meeting, response, slot};

#[derive(Debug, Deserialize)]
pub struct JoinQuery {
    pub table: String,
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct IdentityQuery {
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub user_id: String,
    /// question id -> answer. For multiple choice the answer is the chosen
    /// option's id as text.
    pub answers: HashMap<i64, String>,
}

#[derive(Debug, Serialize)]
pub struct FormLinkItem {
    pub form_name: String,
    pub slug: String,
    pub answered: bool,
    pub link: String,
}

#[derive(Debug, Serialize)]
pub struct JoinResponse {
    pub meeting_name: String,
    pub meeting_slug: String,
    pub user_id: String,
    pub number: i64,
    pub persistent_link: String,
    pub forms: Vec<FormLinkItem>,
}

#[derive(Debug, Serialize)]
pub struct OptionItem {
    pub id: i64,
    pub option_text: String,
}

#[derive(Debug, Serialize)]
pub struct QuestionItem {
    pub id: i64,
    pub question_text: String,
    pub question_type: String,
    pub options: Vec<OptionItem>,
}

#[derive(Debug, Serialize)]
pub struct FormViewResponse {
    pub form_name: String,
    pub slug: String,
    pub participant_id: String,
    pub already_submitted: bool,
    pub questions: Vec<QuestionItem>,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub ok: bool,
    pub answers_saved: usize,
    pub participant_link: String,
}

/// GET / — entry point for shareable links.
///
/// `?table=<pool>&mode=participant` joins a meeting,
/// `?table=<slug>&mode=participant_form` opens a form. Without routing
/// parameters it identifies the service.
pub async fn entry(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    let table = query.get("table").cloned();
    let mode = query.get("mode").map(String::as_str);
    let user_id = query.get("user_id").cloned();

    match (table, mode) {
        (Some(table), Some("participant")) => join_meeting(&pool, &config, &table, user_id),
        (Some(table), Some("participant_form")) => view_form(&pool, &table, user_id),
        _ => Ok(HttpResponse::Ok().json(serde_json::json!({
            "service": "plenum",
            "modes": ["participant", "participant_form"],
        }))),
    }
}

/// GET /join?table=<pool>&user_id=<token> — the `participant` flow.
pub async fn join(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    query: web::Query<JoinQuery>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    join_meeting(&pool, &config, &query.table, query.user_id)
}

/// GET /forms/{slug}?user_id=<token> — the `participant_form` flow.
pub async fn form_view(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
    query: web::Query<IdentityQuery>,
) -> Result<HttpResponse, AppError> {
    view_form(&pool, &path.into_inner(), query.into_inner().user_id)
}

/// POST /forms/{slug}/responses — record a participant's answers.
pub async fn submit(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    path: web::Path<String>,
    body: web::Json<SubmitRequest>,
) -> Result<HttpResponse, AppError> {
    let slug = path.into_inner();
    let body = body.into_inner();
    identity::validate_token(&body.user_id)?;

    let conn = pool.get()?;
    let form = form::find_by_slug(&conn, &slug)?.ok_or(AppError::NotFound)?;

    // Answering requires an assigned number; the number doubles as the
    // participant id on response rows.
    let held = slot::find_number_for_identity(&conn, &body.user_id)?
        .ok_or(AppError::Unauthorized)?;
    let participant_id = held.number.to_string();

    let answers_saved = response::submit(&conn, form.id, &participant_id, &body.answers)?;

    let back_link = participant_link(
        &config.base_url,
        &held.meeting_slug,
        Some(&body.user_id),
        LinkMode::Participant,
    );
    Ok(HttpResponse::Ok().json(SubmitResponse {
        ok: true,
        answers_saved,
        participant_link: back_link,
    }))
}

fn join_meeting(
    pool: &DbPool,
    config: &Config,
    table: &str,
    user_id: Option<String>,
) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let meeting = meeting::find_by_slug(&conn, table)?.ok_or(AppError::NotFound)?;

    let user_id = match user_id {
        Some(token) => {
            identity::validate_token(&token)?;
            token
        }
        None => identity::generate_token(),
    };

    let number = slot::assign_or_get(&conn, meeting.id, &user_id)?;

    let persistent_link = participant_link(
        &config.base_url,
        &meeting.slug,
        Some(&user_id),
        LinkMode::Participant,
    );

    let participant_id = number.to_string();
    let answered = response::answered_form_ids(&conn, &participant_id)?;
    let forms = form::forms_for_meeting(&conn, meeting.id)?
        .into_iter()
        .map(|f| FormLinkItem {
            link: participant_link(
                &config.base_url,
                &f.slug,
                Some(&user_id),
                LinkMode::ParticipantForm,
            ),
            answered: answered.contains(&f.id),
            form_name: f.form_name,
            slug: f.slug,
        })
        .collect();

    Ok(HttpResponse::Ok().json(JoinResponse {
        meeting_name: meeting.meeting_name,
        meeting_slug: meeting.slug,
        user_id,
        number,
        persistent_link,
        forms,
    }))
}

fn view_form(pool: &DbPool, slug: &str, user_id: Option<String>) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let form = form::find_by_slug(&conn, slug)?.ok_or(AppError::NotFound)?;

    let questions = form::find_questions(&conn, form.id)?;
    if questions.is_empty() {
        return Err(AppError::Validation(
            "This form has no questions".to_string(),
        ));
    }

    let user_id = user_id.ok_or(AppError::Unauthorized)?;
    identity::validate_token(&user_id)?;
    let held = slot::find_number_for_identity(&conn, &user_id)?
        .ok_or(AppError::Unauthorized)?;
    let participant_id = held.number.to_string();

    let already_submitted = response::has_submitted(&conn, form.id, &participant_id)?;

    // Correct answers stay server side.
    let questions = questions
        .into_iter()
        .map(|q| QuestionItem {
            id: q.question.id,
            question_text: q.question.question_text,
            question_type: q.question.question_type,
            options: q
                .options
                .into_iter()
                .map(|o| OptionItem {
                    id: o.id,
                    option_text: o.option_text,
                })
                .collect(),
        })
        .collect();

    Ok(HttpResponse::Ok().json(FormViewResponse {
        form_name: form.form_name,
        slug: form.slug,
        participant_id,
        already_submitted,
        questions,
    }))
}
