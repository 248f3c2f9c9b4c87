use std::sync::atomic::Ordering;

use ::common::event::{ContestEvent, Event};
use contest_server::entity::contest;
use sea_orm::EntityTrait;
use serde_json::json;

use crate::common::{TestApp, routes};

fn contest_body(quantity: i32, tables: i32) -> serde_json::Value {
    json!({
        "title": "Autumn Open",
        "description": "Landscapes only.",
        "start_date": "2030-01-01T00:00:00Z",
        "end_date": "2030-12-31T00:00:00Z",
        "round2_quantity": quantity,
        "number_of_tables_round2": tables,
    })
}

fn field_names(body: &serde_json::Value) -> Vec<String> {
    body["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap().to_string())
        .collect()
}

mod creation {
    use super::*;

    #[tokio::test]
    async fn new_contest_is_draft_without_rounds() {
        let app = TestApp::spawn().await;

        let res = app.post(routes::CONTESTS, &contest_body(12, 4)).await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["status"], "DRAFT");
        assert_eq!(res.body["phase"], "NO_ROUNDS");
        assert_eq!(res.body["is_schedule_enforced"], true);
        assert_eq!(res.body["round2_quantity"], 12);
    }

    #[tokio::test]
    async fn enforcement_can_be_disabled_at_creation() {
        let app = TestApp::spawn().await;
        let mut body = contest_body(12, 4);
        body["is_schedule_enforced"] = json!(false);

        let res = app.post(routes::CONTESTS, &body).await;

        assert_eq!(res.status, 201);
        assert_eq!(res.body["is_schedule_enforced"], false);
    }

    #[tokio::test]
    async fn rejects_quantity_not_divisible_by_tables() {
        let app = TestApp::spawn().await;

        let res = app.post(routes::CONTESTS, &contest_body(10, 4)).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert_eq!(res.body["fields"][0]["field"], "round2_quantity");
        let stored = contest::Entity::find().all(&app.db).await.unwrap();
        assert!(stored.is_empty());
    }

    #[tokio::test]
    async fn rejects_end_before_start() {
        let app = TestApp::spawn().await;
        let mut body = contest_body(12, 4);
        body["end_date"] = json!("2029-06-01T00:00:00Z");

        let res = app.post(routes::CONTESTS, &body).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["fields"][0]["field"], "end_date");
    }

    #[tokio::test]
    async fn bad_title_and_bad_sizing_are_reported_together() {
        let app = TestApp::spawn().await;
        let mut body = contest_body(10, 4);
        body["title"] = json!("   ");

        let res = app.post(routes::CONTESTS, &body).await;

        assert_eq!(res.status, 400);
        assert_eq!(field_names(&res.body), vec!["title", "round2_quantity"]);
    }

    #[tokio::test]
    async fn malformed_body_is_a_validation_error() {
        let app = TestApp::spawn().await;

        let res = app.post(routes::CONTESTS, &json!({ "title": "x" })).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod validation_endpoint {
    use super::*;

    #[tokio::test]
    async fn reports_every_failing_field_without_saving() {
        let app = TestApp::spawn().await;
        let body = json!({
            "start_date": "2030-01-01T00:00:00Z",
            "end_date": "2030-12-31T00:00:00Z",
            "round2_quantity": 0,
            "number_of_tables_round2": 3,
            "round1": {
                "start_date": "2030-02-01T00:00:00Z",
                "end_date": "2030-04-30T00:00:00Z",
                "submission_deadline": "2030-05-15T00:00:00Z",
            },
        });

        let res = app.post(routes::CONTESTS_VALIDATE, &body).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["ok"], false);
        let fields: Vec<&str> = res.body["errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["field"].as_str().unwrap())
            .collect();
        assert!(fields.contains(&"round1.submission_deadline"));
        assert!(fields.contains(&"number_of_tables_round2"));
        assert!(contest::Entity::find().all(&app.db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn accepts_a_consistent_configuration() {
        let app = TestApp::spawn().await;
        let body = json!({
            "start_date": "2030-01-01T00:00:00Z",
            "end_date": "2030-12-31T00:00:00Z",
            "round2_quantity": 12,
            "number_of_tables_round2": 4,
        });

        let res = app.post(routes::CONTESTS_VALIDATE, &body).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["ok"], true);
        assert_eq!(res.body["errors"], json!([]));
    }
}

mod reading {
    use super::*;

    #[tokio::test]
    async fn get_reports_round1_phase() {
        let app = TestApp::spawn().await;
        let id = app.create_contest(12, 4).await;
        app.create_round1(id).await;

        let res = app.get(&routes::contest(id)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["phase"], "ROUND_1_ACTIVE");
    }

    #[tokio::test]
    async fn unknown_contest_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::contest(9999)).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn list_filters_by_status() {
        let app = TestApp::spawn().await;
        let draft = app.create_contest(12, 4).await;
        let cancelled = app.create_contest(12, 4).await;
        app.patch(&routes::contest_status(cancelled), &json!({ "status": "CANCELLED" }))
            .await;

        let res = app
            .get(&format!("{}?status=DRAFT", routes::CONTESTS))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        let data = res.body["data"].as_array().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["id"], draft);
        assert_eq!(res.body["pagination"]["total"], 1);
    }
}

mod update {
    use super::*;

    #[tokio::test]
    async fn partial_update_keeps_other_fields() {
        let app = TestApp::spawn().await;
        let id = app.create_contest(12, 4).await;

        let res = app
            .patch(&routes::contest(id), &json!({ "title": "Renamed" }))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["title"], "Renamed");
        assert_eq!(res.body["round2_quantity"], 12);
    }

    #[tokio::test]
    async fn empty_patch_is_rejected() {
        let app = TestApp::spawn().await;
        let id = app.create_contest(12, 4).await;

        let res = app.patch(&routes::contest(id), &json!({})).await;

        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn shrinking_contest_around_round1_is_rejected() {
        let app = TestApp::spawn().await;
        let id = app.create_contest(12, 4).await;
        app.create_round1(id).await;

        let res = app
            .patch(&routes::contest(id), &json!({ "end_date": "2030-03-01T00:00:00Z" }))
            .await;

        assert_eq!(res.status, 400);
        let fields: Vec<&str> = res.body["fields"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["field"].as_str().unwrap())
            .collect();
        assert!(fields.contains(&"round1.end_date"), "{fields:?}");
    }

    #[tokio::test]
    async fn edit_reports_text_and_date_errors_together() {
        let app = TestApp::spawn().await;
        let id = app.create_contest(12, 4).await;

        let res = app
            .patch(
                &routes::contest(id),
                &json!({ "title": "", "end_date": "2029-06-01T00:00:00Z" }),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(field_names(&res.body), vec!["title", "end_date"]);
    }

    #[tokio::test]
    async fn shrinking_contest_past_a_table_window_is_rejected() {
        let app = TestApp::spawn().await;
        let id = app.create_contest(4, 2).await;
        let r1 = app.create_round1(id).await;
        let entrants = app.seed_round1_results(id, r1, 4).await;
        app.confirm_originals(id, &entrants).await;
        let res = app
            .create_round2(
                id,
                &json!({
                    "tables": [{
                        "table_number": 2,
                        "start_date": "2030-11-01T00:00:00Z",
                        "end_date": "2030-11-10T00:00:00Z",
                    }],
                }),
            )
            .await;
        assert_eq!(res.status, 201, "{}", res.text);

        let res = app
            .patch(&routes::contest(id), &json!({ "end_date": "2030-10-31T00:00:00Z" }))
            .await;

        assert_eq!(res.status, 400, "{}", res.text);
        assert_eq!(field_names(&res.body), vec!["tables.2"]);
        let stored = contest::Entity::find_by_id(id).one(&app.db).await.unwrap().unwrap();
        assert_eq!(stored.end_date.to_rfc3339(), "2030-12-31T00:00:00+00:00");
    }
}

mod status {
    use super::*;

    #[tokio::test]
    async fn terminal_contest_accepts_no_changes() {
        let app = TestApp::spawn().await;
        let id = app.create_contest(12, 4).await;

        let res = app
            .patch(&routes::contest_status(id), &json!({ "status": "COMPLETED" }))
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["status"], "COMPLETED");

        let again = app
            .patch(&routes::contest_status(id), &json!({ "status": "CANCELLED" }))
            .await;
        assert_eq!(again.status, 409);
        assert_eq!(again.body["code"], "STATE_CONFLICT");

        let edit = app
            .patch(&routes::contest(id), &json!({ "title": "Too late" }))
            .await;
        assert_eq!(edit.status, 409);
    }

    #[tokio::test]
    async fn draft_is_not_an_external_target() {
        let app = TestApp::spawn().await;
        let id = app.create_contest(12, 4).await;

        let res = app
            .patch(&routes::contest_status(id), &json!({ "status": "ACTIVE" }))
            .await;

        assert_eq!(res.status, 400);
    }
}

mod publish {
    use super::*;

    #[tokio::test]
    async fn requires_round1() {
        let app = TestApp::spawn().await;
        let id = app.create_contest(12, 4).await;

        let res = app.post(&routes::publish(id), &json!({})).await;

        assert_eq!(res.status, 409);
        assert!(app.notifier.topics().is_empty());
    }

    #[tokio::test]
    async fn activates_contest_and_notifies() {
        let app = TestApp::spawn().await;
        let id = app.create_contest(12, 4).await;
        app.create_round1(id).await;

        let res = app.post(&routes::publish(id), &json!({})).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["status"], "ACTIVE");
        let events = app.notifier.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].topic, ContestEvent::PUBLISHED);
        let event = ContestEvent::from_generic_event(&events[0]).unwrap();
        assert_eq!(
            event,
            ContestEvent::Published {
                contest_id: id,
                title: "Spring Salon".into(),
            }
        );

        let second = app.post(&routes::publish(id), &json!({})).await;
        assert_eq!(second.status, 409);
    }

    #[tokio::test]
    async fn failed_notification_does_not_undo_publish() {
        let app = TestApp::spawn().await;
        let id = app.create_contest(12, 4).await;
        app.create_round1(id).await;
        app.notifier.fail.store(true, Ordering::SeqCst);

        let res = app.post(&routes::publish(id), &json!({})).await;

        assert_eq!(res.status, 200);
        let stored = contest::Entity::find_by_id(id).one(&app.db).await.unwrap().unwrap();
        assert_eq!(stored.status, ::common::ContestStatus::Active);
    }
}
