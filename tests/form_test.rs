//! Form authoring: draft validation, persistence, and catalog lookups.

use plenum::errors::AppError;
use plenum::models::form::{self, FormDraft, QUESTION_TYPE_MULTIPLE_CHOICE, QUESTION_TYPE_TEXT};

mod common;
use common::{choice_question, sample_draft, setup_test_db, text_question};

#[test]
fn test_create_persists_questions_and_options() {
    let (_dir, conn) = setup_test_db();
    let created = form::create(&conn, &sample_draft("Exit survey")).expect("create form");

    assert!(created.slug.starts_with("form_"));
    assert!(created.slug.ends_with("exit_survey"));

    let questions = form::find_questions(&conn, created.id).expect("questions");
    assert_eq!(questions.len(), 2);

    let text = &questions[0];
    assert_eq!(text.question.question_type, QUESTION_TYPE_TEXT);
    assert_eq!(text.question.correct_answer, None);
    assert!(text.options.is_empty());

    let choice = &questions[1];
    assert_eq!(choice.question.question_type, QUESTION_TYPE_MULTIPLE_CHOICE);
    assert_eq!(choice.options.len(), 2);
    assert_eq!(choice.options[0].option_text, "Red");
    assert_eq!(choice.options[1].option_text, "Blue");

    // The authored correct option "Red" is rewritten to its option id.
    let red_id = choice.options[0].id.to_string();
    assert_eq!(choice.question.correct_answer.as_deref(), Some(red_id.as_str()));
}

#[test]
fn test_text_question_keeps_expected_answer() {
    let (_dir, conn) = setup_test_db();
    let draft = FormDraft {
        form_name: "Graded text".to_string(),
        questions: vec![text_question("Capital of Portugal?", Some("Lisbon"))],
    };
    let created = form::create(&conn, &draft).expect("create form");

    let questions = form::find_questions(&conn, created.id).expect("questions");
    assert_eq!(questions[0].question.correct_answer.as_deref(), Some("Lisbon"));
}

#[test]
fn test_draft_validation() {
    let (_dir, conn) = setup_test_db();

    let unnamed = FormDraft {
        form_name: "  ".to_string(),
        questions: vec![text_question("q", None)],
    };
    assert!(matches!(form::create(&conn, &unnamed), Err(AppError::Validation(_))));

    let no_questions = FormDraft {
        form_name: "Empty".to_string(),
        questions: Vec::new(),
    };
    assert!(matches!(form::create(&conn, &no_questions), Err(AppError::Validation(_))));

    let one_option = FormDraft {
        form_name: "Thin choice".to_string(),
        questions: vec![choice_question("Pick", &["Only"], None)],
    };
    assert!(matches!(form::create(&conn, &one_option), Err(AppError::Validation(_))));

    let wrong_correct = FormDraft {
        form_name: "Bad correct".to_string(),
        questions: vec![choice_question("Pick", &["A", "B"], Some("C"))],
    };
    assert!(matches!(form::create(&conn, &wrong_correct), Err(AppError::Validation(_))));

    let bad_type = FormDraft {
        form_name: "Bad type".to_string(),
        questions: vec![plenum::models::form::QuestionDraft {
            question_text: "q".to_string(),
            question_type: "checkbox".to_string(),
            options: Vec::new(),
            correct: None,
        }],
    };
    assert!(matches!(form::create(&conn, &bad_type), Err(AppError::Validation(_))));

    let text_with_options = FormDraft {
        form_name: "Confused".to_string(),
        questions: vec![plenum::models::form::QuestionDraft {
            question_text: "q".to_string(),
            question_type: QUESTION_TYPE_TEXT.to_string(),
            options: vec!["A".to_string()],
            correct: None,
        }],
    };
    assert!(matches!(form::create(&conn, &text_with_options), Err(AppError::Validation(_))));

    // Nothing was persisted by the rejected drafts.
    assert!(form::list_all(&conn).expect("list").is_empty());
}

#[test]
fn test_catalog_lookups() {
    let (_dir, conn) = setup_test_db();
    assert!(form::list_all(&conn).expect("list").is_empty());
    assert!(form::find_by_id(&conn, 7).expect("query").is_none());
    assert!(form::find_by_slug(&conn, "form_0_nope").expect("query").is_none());
    assert!(form::forms_for_meeting(&conn, 7).expect("query").is_empty());

    let a = form::create(&conn, &sample_draft("Catalog alpha")).expect("create");
    let _b = form::create(&conn, &sample_draft("Catalog beta")).expect("create");

    assert_eq!(form::list_all(&conn).expect("list").len(), 2);
    let found = form::find_by_slug(&conn, &a.slug).expect("query").expect("exists");
    assert_eq!(found.form_name, "Catalog alpha");
}
