//! HTTP-level tests for the participant flows and the admin API surface.

use actix_web::{App, test, web};
use serde_json::json;

use plenum::config::Config;
use plenum::db::DbPool;
use plenum::handlers;
use plenum::models::{form, meeting};

mod common;
use common::{sample_draft, setup_test_pool};

fn test_config() -> Config {
    Config {
        base_url: "http://test.local".to_string(),
        database_path: String::new(),
    }
}

macro_rules! test_app {
    ($pool:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($pool.clone()))
                .app_data(web::Data::new(test_config()))
                .route("/", web::get().to(handlers::participant_handlers::entry))
                .route("/join", web::get().to(handlers::participant_handlers::join))
                .route(
                    "/forms/{slug}",
                    web::get().to(handlers::participant_handlers::form_view),
                )
                .route(
                    "/forms/{slug}/responses",
                    web::post().to(handlers::participant_handlers::submit),
                )
                .service(web::scope("/api/v1").configure(handlers::api_v1::configure)),
        )
        .await
    };
}

fn seed_meeting_with_quiz(pool: &DbPool) -> (meeting::Meeting, form::Form) {
    let conn = pool.get().expect("conn");
    let quiz = form::create(&conn, &sample_draft("Entry quiz")).expect("create form");
    let m = meeting::create_with_pool(&conn, "Plenary", 5, &[quiz.id]).expect("create meeting");
    (m, quiz)
}

#[actix_web::test]
async fn test_join_assigns_and_replays_the_same_number() {
    let (_dir, pool) = setup_test_pool();
    let (m, _quiz) = seed_meeting_with_quiz(&pool);
    let app = test_app!(pool);

    let req = test::TestRequest::get()
        .uri(&format!("/join?table={}", m.slug))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["meeting_name"], "Plenary");
    let number = body["number"].as_i64().expect("number");
    assert!((1..=5).contains(&number));
    let token = body["user_id"].as_str().expect("token").to_string();
    assert_eq!(
        body["persistent_link"],
        format!("http://test.local/?table={}&mode=participant&user_id={token}", m.slug)
    );
    let forms = body["forms"].as_array().expect("forms");
    assert_eq!(forms.len(), 1);
    assert_eq!(forms[0]["answered"], false);

    // Presenting the same token again yields the same number.
    let req = test::TestRequest::get()
        .uri(&format!("/join?table={}&user_id={token}", m.slug))
        .to_request();
    let replay: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(replay["number"].as_i64(), Some(number));
    assert_eq!(replay["user_id"].as_str(), Some(token.as_str()));
}

#[actix_web::test]
async fn test_entry_route_dispatches_on_mode() {
    let (_dir, pool) = setup_test_pool();
    let (m, _quiz) = seed_meeting_with_quiz(&pool);
    let app = test_app!(pool);

    let req = test::TestRequest::get()
        .uri(&format!("/?table={}&mode=participant", m.slug))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["number"].as_i64().is_some());

    let req = test::TestRequest::get().uri("/").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["service"], "plenum");
}

#[actix_web::test]
async fn test_join_unknown_pool_is_not_found() {
    let (_dir, pool) = setup_test_pool();
    let app = test_app!(pool);

    let req = test::TestRequest::get()
        .uri("/join?table=meeting_0_missing")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn test_form_flow_submit_then_conflict() {
    let (_dir, pool) = setup_test_pool();
    let (m, quiz) = seed_meeting_with_quiz(&pool);
    let app = test_app!(pool);

    // Join first to obtain a number and token.
    let req = test::TestRequest::get()
        .uri(&format!("/join?table={}", m.slug))
        .to_request();
    let joined: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    let token = joined["user_id"].as_str().expect("token").to_string();
    let number = joined["number"].as_i64().expect("number");

    // The form view shows the questions and the participant's number.
    let req = test::TestRequest::get()
        .uri(&format!("/forms/{}?user_id={token}", quiz.slug))
        .to_request();
    let view: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(view["participant_id"], number.to_string());
    assert_eq!(view["already_submitted"], false);
    let questions = view["questions"].as_array().expect("questions");
    assert_eq!(questions.len(), 2);
    let text_id = questions[0]["id"].as_i64().unwrap();
    let choice_id = questions[1]["id"].as_i64().unwrap();
    let red_id = questions[1]["options"][0]["id"].as_i64().unwrap();

    let mut answers = serde_json::Map::new();
    answers.insert(text_id.to_string(), json!("hello"));
    answers.insert(choice_id.to_string(), json!(red_id.to_string()));
    let payload = json!({ "user_id": token, "answers": answers });
    let req = test::TestRequest::post()
        .uri(&format!("/forms/{}/responses", quiz.slug))
        .set_json(&payload)
        .to_request();
    let submitted: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(submitted["ok"], true);
    assert_eq!(submitted["answers_saved"], 2);

    // A second submission for the same participant and form is rejected.
    let req = test::TestRequest::post()
        .uri(&format!("/forms/{}/responses", quiz.slug))
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 409);

    // The join view now reports the form as answered.
    let req = test::TestRequest::get()
        .uri(&format!("/join?table={}&user_id={token}", m.slug))
        .to_request();
    let joined: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(joined["forms"][0]["answered"], true);
}

#[actix_web::test]
async fn test_form_view_requires_an_assigned_number() {
    let (_dir, pool) = setup_test_pool();
    let (_m, quiz) = seed_meeting_with_quiz(&pool);
    let app = test_app!(pool);

    let req = test::TestRequest::get()
        .uri(&format!("/forms/{}?user_id=token-stranger", quiz.slug))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);

    let req = test::TestRequest::get()
        .uri(&format!("/forms/{}", quiz.slug))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);
}

#[actix_web::test]
async fn test_admin_meeting_lifecycle() {
    let (_dir, pool) = setup_test_pool();
    let app = test_app!(pool);

    let req = test::TestRequest::post()
        .uri("/api/v1/meetings")
        .set_json(json!({ "meeting_name": "Board meeting", "max_number": 12 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let created: serde_json::Value = test::read_body_json(resp).await;
    assert!(created["slug"].as_str().unwrap().starts_with("meeting_"));
    assert_eq!(created["max_number"], 12);
    let meeting_id = created["id"].as_i64().unwrap();

    let req = test::TestRequest::get().uri("/api/v1/meetings").to_request();
    let listed: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/meetings/{meeting_id}/stats"))
        .to_request();
    let stats: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(stats["total_numbers"], 12);
    assert_eq!(stats["assigned_numbers"], 0);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/meetings/{meeting_id}"))
        .insert_header(("content-type", "application/json"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/meetings/{meeting_id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn test_admin_mutations_require_json_content_type() {
    let (_dir, pool) = setup_test_pool();
    let app = test_app!(pool);

    let req = test::TestRequest::post()
        .uri("/api/v1/meetings")
        .insert_header(("content-type", "text/plain"))
        .set_payload("meeting_name=Sneaky")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn test_slot_export_streams_csv() {
    let (_dir, pool) = setup_test_pool();
    let (m, _quiz) = seed_meeting_with_quiz(&pool);
    let app = test_app!(pool);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/meetings/{}/slots.csv", m.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let headers = resp.headers().clone();
    assert!(
        headers
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("text/csv")
    );

    let body = test::read_body(resp).await;
    let text = std::str::from_utf8(&body).expect("utf-8 csv");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "number,assigned,assigned_at,user_id");
    assert_eq!(lines.len(), 6, "header plus one line per slot");
}
