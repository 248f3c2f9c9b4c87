use contest_server::entity::{examiner_assignment, schedule};
use sea_orm::EntityTrait;
use serde_json::json;

use crate::common::{TestApp, routes};

async fn round1_examiner(app: &TestApp, contest_id: i32, name: &str) -> i32 {
    let examiner = app.create_examiner(name).await;
    let res = app
        .assign_examiner(contest_id, &json!({ "examiner_id": examiner, "role": "ROUND_1" }))
        .await;
    assert_eq!(res.status, 201, "assign failed: {}", res.text);
    examiner
}

mod directory {
    use super::*;

    #[tokio::test]
    async fn created_examiners_are_listed() {
        let app = TestApp::spawn().await;
        app.create_examiner("Berthe Morisot").await;
        app.create_examiner("Mary Cassatt").await;

        let res = app.get(routes::EXAMINERS).await;

        assert_eq!(res.status, 200);
        let names: Vec<&str> = res
            .body
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Berthe Morisot", "Mary Cassatt"]);
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post(routes::EXAMINERS, &json!({ "name": "  ", "specialization": "Oil" }))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["fields"][0]["field"], "name");
    }
}

mod assignment {
    use super::*;

    #[tokio::test]
    async fn same_role_twice_is_a_duplicate() {
        let app = TestApp::spawn().await;
        let id = app.create_contest(12, 4).await;
        let examiner = round1_examiner(&app, id, "Panel").await;

        let res = app
            .assign_examiner(id, &json!({ "examiner_id": examiner, "role": "ROUND_1" }))
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "DUPLICATE_ASSIGNMENT");
        let rows = examiner_assignment::Entity::find().all(&app.db).await.unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn one_examiner_may_judge_both_rounds() {
        let app = TestApp::spawn().await;
        let id = app.create_contest(12, 4).await;
        let examiner = round1_examiner(&app, id, "Panel").await;

        let res = app
            .assign_examiner(
                id,
                &json!({ "examiner_id": examiner, "role": "ROUND_2", "table_number": 3 }),
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["table_number"], 3);
        let listed = app.get(&routes::contest_examiners(id)).await;
        assert_eq!(listed.body.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn table_number_must_exist() {
        let app = TestApp::spawn().await;
        let id = app.create_contest(12, 4).await;
        let examiner = app.create_examiner("Panel").await;

        let res = app
            .assign_examiner(
                id,
                &json!({ "examiner_id": examiner, "role": "ROUND_2", "table_number": 5 }),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["fields"][0]["field"], "table_number");
    }

    #[tokio::test]
    async fn round1_takes_no_table() {
        let app = TestApp::spawn().await;
        let id = app.create_contest(12, 4).await;
        let examiner = app.create_examiner("Panel").await;

        let res = app
            .assign_examiner(
                id,
                &json!({ "examiner_id": examiner, "role": "ROUND_1", "table_number": 1 }),
            )
            .await;

        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn round2_role_needs_round2_enabled() {
        let app = TestApp::spawn().await;
        let id = app.create_contest(0, 0).await;
        let examiner = app.create_examiner("Panel").await;

        let res = app
            .assign_examiner(id, &json!({ "examiner_id": examiner, "role": "ROUND_2" }))
            .await;

        assert_eq!(res.status, 409);
    }

    #[tokio::test]
    async fn unknown_examiner_is_not_found() {
        let app = TestApp::spawn().await;
        let id = app.create_contest(12, 4).await;

        let res = app
            .assign_examiner(id, &json!({ "examiner_id": 4242, "role": "ROUND_1" }))
            .await;

        assert_eq!(res.status, 404);
    }
}

mod scheduling {
    use super::*;

    #[tokio::test]
    async fn setting_twice_moves_the_single_schedule() {
        let app = TestApp::spawn().await;
        let id = app.create_contest(12, 4).await;
        app.create_round1(id).await;
        let examiner = round1_examiner(&app, id, "Panel").await;

        let first = app
            .put(&routes::schedule(id, examiner), &json!({ "date": "2030-02-10T09:00:00Z" }))
            .await;
        assert_eq!(first.status, 200, "{}", first.text);
        assert_eq!(first.body["task"], "Judging visit");

        let second = app
            .put(
                &routes::schedule(id, examiner),
                &json!({ "date": "2030-03-20T09:00:00Z", "task": "Final walk-through" }),
            )
            .await;
        assert_eq!(second.status, 200, "{}", second.text);

        let rows = schedule::Entity::find().all(&app.db).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].task, "Final walk-through");
        let listed = app.get(&routes::schedules(id)).await;
        assert_eq!(listed.body[0]["date"], "2030-03-20T09:00:00Z");
    }

    #[tokio::test]
    async fn date_outside_round_is_rejected_when_enforced() {
        let app = TestApp::spawn().await;
        let id = app.create_contest(12, 4).await;
        app.create_round1(id).await;
        let examiner = round1_examiner(&app, id, "Panel").await;

        let res = app
            .put(&routes::schedule(id, examiner), &json!({ "date": "2030-08-01T09:00:00Z" }))
            .await;

        assert_eq!(res.status, 422);
        assert_eq!(res.body["code"], "DATE_OUT_OF_WINDOW");
        assert!(schedule::Entity::find().all(&app.db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn toggled_off_enforcement_accepts_any_date() {
        let app = TestApp::spawn().await;
        let id = app.create_contest(12, 4).await;
        app.create_round1(id).await;
        let examiner = round1_examiner(&app, id, "Panel").await;
        app.toggle_off_enforcement(id).await;

        let res = app
            .put(&routes::schedule(id, examiner), &json!({ "date": "2030-08-01T09:00:00Z" }))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);

        let back_on = app
            .post(&routes::toggle_enforcement(id), &json!({}))
            .await;
        assert_eq!(back_on.body["is_schedule_enforced"], true);
        let kept = schedule::Entity::find().all(&app.db).await.unwrap();
        assert_eq!(kept.len(), 1);
    }

    #[tokio::test]
    async fn unassigned_examiner_cannot_be_scheduled() {
        let app = TestApp::spawn().await;
        let id = app.create_contest(12, 4).await;
        app.create_round1(id).await;
        let examiner = app.create_examiner("Visitor").await;

        let res = app
            .put(&routes::schedule(id, examiner), &json!({ "date": "2030-02-10T09:00:00Z" }))
            .await;

        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn enforced_schedule_needs_a_window() {
        let app = TestApp::spawn().await;
        let id = app.create_contest(12, 4).await;
        let examiner = app.create_examiner("Early Bird").await;
        app.assign_examiner(id, &json!({ "examiner_id": examiner, "role": "ROUND_2" }))
            .await;

        let res = app
            .put(&routes::schedule(id, examiner), &json!({ "date": "2030-05-10T09:00:00Z" }))
            .await;

        assert_eq!(res.status, 409);
    }

    #[tokio::test]
    async fn pinned_table_window_applies() {
        let app = TestApp::spawn().await;
        let id = app.create_contest(4, 2).await;
        let r1 = app.create_round1(id).await;
        let entrants = app.seed_round1_results(id, r1, 4).await;
        app.confirm_originals(id, &entrants).await;
        let res = app
            .create_round2(
                id,
                &json!({
                    "dates": {
                        "start_date": "2030-05-01T00:00:00Z",
                        "end_date": "2030-06-30T00:00:00Z",
                    },
                    "tables": [{
                        "table_number": 2,
                        "start_date": "2030-05-10T00:00:00Z",
                        "end_date": "2030-05-12T00:00:00Z",
                    }],
                }),
            )
            .await;
        assert_eq!(res.status, 201, "{}", res.text);
        let pinned = app.create_examiner("Table Two").await;
        app.assign_examiner(
            id,
            &json!({ "examiner_id": pinned, "role": "ROUND_2", "table_number": 2 }),
        )
        .await;
        let floating = app.create_examiner("Unpinned").await;
        app.assign_examiner(id, &json!({ "examiner_id": floating, "role": "ROUND_2" }))
            .await;

        let outside_table = app
            .put(&routes::schedule(id, pinned), &json!({ "date": "2030-06-01T09:00:00Z" }))
            .await;
        let inside_table = app
            .put(&routes::schedule(id, pinned), &json!({ "date": "2030-05-11T09:00:00Z" }))
            .await;
        let table_one = app
            .put(&routes::schedule(id, floating), &json!({ "date": "2030-06-01T09:00:00Z" }))
            .await;

        assert_eq!(outside_table.status, 422);
        assert_eq!(inside_table.status, 200, "{}", inside_table.text);
        assert_eq!(table_one.status, 200, "{}", table_one.text);
    }
}

mod removal {
    use super::*;

    #[tokio::test]
    async fn drops_assignments_and_schedule() {
        let app = TestApp::spawn().await;
        let id = app.create_contest(12, 4).await;
        app.create_round1(id).await;
        let examiner = round1_examiner(&app, id, "Panel").await;
        app.assign_examiner(id, &json!({ "examiner_id": examiner, "role": "ROUND_2" }))
            .await;
        app.put(&routes::schedule(id, examiner), &json!({ "date": "2030-02-10T09:00:00Z" }))
            .await;

        let res = app.delete(&routes::contest_examiner(id, examiner)).await;

        assert_eq!(res.status, 204, "{}", res.text);
        assert!(examiner_assignment::Entity::find().all(&app.db).await.unwrap().is_empty());
        assert!(schedule::Entity::find().all(&app.db).await.unwrap().is_empty());

        let again = app.delete(&routes::contest_examiner(id, examiner)).await;
        assert_eq!(again.status, 404);
    }
}
