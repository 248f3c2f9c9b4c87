use ::common::RoundName;
use ::common::event::{ContestEvent, Event};
use contest_server::entity::{evaluation, examiner_assignment, judging_table, round, schedule, table_seat};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde_json::{Value, json};

use crate::common::{Entrant, TestApp, routes};

/// Contest with Round 1 and twelve ranked, confirmed entrants.
async fn ready_for_round2(app: &TestApp) -> (i32, i32, Vec<Entrant>) {
    let id = app.create_contest(12, 4).await;
    let r1 = app.create_round1(id).await;
    let entrants = app.seed_round1_results(id, r1, 12).await;
    app.confirm_originals(id, &entrants).await;
    (id, r1, entrants)
}

fn table<'a>(round: &'a Value, number: i64) -> &'a Value {
    round["tables"]
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["table_number"] == number)
        .unwrap()
}

fn seat_ranks(table: &Value) -> Vec<i64> {
    table["competitors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["qualification_rank"].as_i64().unwrap())
        .collect()
}

mod round1 {
    use super::*;

    #[tokio::test]
    async fn second_round1_is_a_conflict() {
        let app = TestApp::spawn().await;
        let id = app.create_contest(12, 4).await;
        app.create_round1(id).await;

        let res = app
            .post(
                &routes::round1(id),
                &json!({
                    "start_date": "2030-02-01T00:00:00Z",
                    "end_date": "2030-03-01T00:00:00Z",
                }),
            )
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "STATE_CONFLICT");
    }

    #[tokio::test]
    async fn round1_requires_bounds() {
        let app = TestApp::spawn().await;
        let id = app.create_contest(12, 4).await;

        let res = app
            .post(&routes::round1(id), &json!({ "start_date": "2030-02-01T00:00:00Z" }))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["fields"][0]["field"], "round1.end_date");
    }

    #[tokio::test]
    async fn deadline_outside_round_is_rejected() {
        let app = TestApp::spawn().await;
        let id = app.create_contest(12, 4).await;

        let res = app
            .post(
                &routes::round1(id),
                &json!({
                    "start_date": "2030-02-01T00:00:00Z",
                    "end_date": "2030-04-30T00:00:00Z",
                    "result_announce_date": "2030-05-02T00:00:00Z",
                }),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["fields"][0]["field"], "round1.result_announce_date");
        assert!(round::Entity::find().all(&app.db).await.unwrap().is_empty());
    }
}

mod round2 {
    use super::*;

    #[tokio::test]
    async fn deals_qualifiers_round_robin_across_tables() {
        let app = TestApp::spawn().await;
        let (id, _, entrants) = ready_for_round2(&app).await;

        let res = app.create_round2(id, &json!({})).await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["name"], "ROUND_2");
        assert_eq!(res.body["tables"].as_array().unwrap().len(), 4);
        assert_eq!(seat_ranks(table(&res.body, 1)), vec![1, 5, 9]);
        assert_eq!(seat_ranks(table(&res.body, 2)), vec![2, 6, 10]);
        assert_eq!(seat_ranks(table(&res.body, 4)), vec![4, 8, 12]);
        assert_eq!(
            table(&res.body, 1)["competitors"][0]["painting_id"],
            entrants[0].painting_id
        );

        let seats = table_seat::Entity::find().all(&app.db).await.unwrap();
        assert_eq!(seats.len(), 12);
    }

    #[tokio::test]
    async fn announces_qualifiers_in_rank_order() {
        let app = TestApp::spawn().await;
        let (id, _, entrants) = ready_for_round2(&app).await;

        let res = app.create_round2(id, &json!({})).await;
        assert_eq!(res.status, 201, "{}", res.text);

        let events = app.notifier.events();
        let announced = events
            .iter()
            .find(|e| e.topic == ContestEvent::QUALIFIERS_ANNOUNCED)
            .expect("qualifiers notification");
        let expected: Vec<i32> = entrants.iter().map(|e| e.competitor_id).collect();
        assert_eq!(
            ContestEvent::from_generic_event(announced).unwrap(),
            ContestEvent::QualifiersAnnounced {
                contest_id: id,
                round_id: res.id(),
                competitor_ids: expected,
            }
        );
    }

    #[tokio::test]
    async fn missing_originals_block_creation_entirely() {
        let app = TestApp::spawn().await;
        let id = app.create_contest(12, 4).await;
        let r1 = app.create_round1(id).await;
        let entrants = app.seed_round1_results(id, r1, 12).await;
        app.confirm_originals(id, &entrants[..10]).await;

        let res = app.create_round2(id, &json!({})).await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "INSUFFICIENT_QUALIFIERS");
        let rounds = round::Entity::find().all(&app.db).await.unwrap();
        assert_eq!(rounds.len(), 1);
        assert_eq!(rounds[0].name, RoundName::Round1);
        assert!(judging_table::Entity::find().all(&app.db).await.unwrap().is_empty());
        assert!(app.notifier.topics().is_empty());
    }

    #[tokio::test]
    async fn requires_round1() {
        let app = TestApp::spawn().await;
        let id = app.create_contest(12, 4).await;

        let res = app.create_round2(id, &json!({})).await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "STATE_CONFLICT");
    }

    #[tokio::test]
    async fn second_round2_is_a_conflict() {
        let app = TestApp::spawn().await;
        let (id, _, _) = ready_for_round2(&app).await;
        assert_eq!(app.create_round2(id, &json!({})).await.status, 201);

        let res = app.create_round2(id, &json!({})).await;

        assert_eq!(res.status, 409);
        assert_eq!(judging_table::Entity::find().all(&app.db).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn concurrent_requests_create_one_round2() {
        let app = TestApp::spawn().await;
        let (id, _, _) = ready_for_round2(&app).await;
        let body = json!({});

        let (a, b) = tokio::join!(app.create_round2(id, &body), app.create_round2(id, &body));

        let mut statuses = vec![a.status, b.status];
        statuses.sort();
        assert_eq!(statuses, vec![201, 409], "{} / {}", a.text, b.text);
        let loser = if a.status == 409 { &a } else { &b };
        assert_eq!(loser.body["code"], "STATE_CONFLICT");

        let round2s = round::Entity::find()
            .filter(round::Column::Name.eq(RoundName::Round2))
            .all(&app.db)
            .await
            .unwrap();
        assert_eq!(round2s.len(), 1);
        assert_eq!(judging_table::Entity::find().all(&app.db).await.unwrap().len(), 4);
        assert_eq!(table_seat::Entity::find().all(&app.db).await.unwrap().len(), 12);
        let announced = app
            .notifier
            .topics()
            .into_iter()
            .filter(|t| t == ContestEvent::QUALIFIERS_ANNOUNCED)
            .count();
        assert_eq!(announced, 1);
    }

    #[tokio::test]
    async fn stores_explicit_table_dates() {
        let app = TestApp::spawn().await;
        let (id, _, _) = ready_for_round2(&app).await;
        let body = json!({
            "dates": {
                "start_date": "2030-05-01T00:00:00Z",
                "end_date": "2030-06-30T00:00:00Z",
            },
            "tables": [{
                "table_number": 2,
                "start_date": "2030-05-10T00:00:00Z",
                "end_date": "2030-05-12T00:00:00Z",
            }],
        });

        let res = app.create_round2(id, &body).await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(table(&res.body, 2)["start_date"], "2030-05-10T00:00:00Z");
        assert_eq!(table(&res.body, 1)["start_date"], Value::Null);
    }

    #[tokio::test]
    async fn table_outside_round2_is_rejected() {
        let app = TestApp::spawn().await;
        let (id, _, _) = ready_for_round2(&app).await;
        let body = json!({
            "dates": {
                "start_date": "2030-05-01T00:00:00Z",
                "end_date": "2030-06-30T00:00:00Z",
            },
            "tables": [{
                "table_number": 3,
                "start_date": "2030-06-20T00:00:00Z",
                "end_date": "2030-07-05T00:00:00Z",
            }],
        });

        let res = app.create_round2(id, &body).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["fields"][0]["field"], "tables.3");
        assert_eq!(round::Entity::find().all(&app.db).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn listed_with_tables_after_round1() {
        let app = TestApp::spawn().await;
        let (id, _, _) = ready_for_round2(&app).await;
        app.create_round2(id, &json!({})).await;

        let res = app.get(&routes::rounds(id)).await;

        assert_eq!(res.status, 200);
        let rounds = res.body.as_array().unwrap();
        assert_eq!(rounds.len(), 2);
        assert_eq!(rounds[0]["name"], "ROUND_1");
        assert!(rounds[0].get("tables").is_none());
        assert_eq!(seat_ranks(table(&rounds[1], 3)), vec![3, 7, 11]);
    }
}

mod deletion {
    use super::*;

    #[tokio::test]
    async fn only_draft_contests_drop_rounds() {
        let app = TestApp::spawn().await;
        let id = app.create_contest(12, 4).await;
        let r1 = app.create_round1(id).await;
        assert_eq!(app.post(&routes::publish(id), &json!({})).await.status, 200);

        let res = app.delete(&routes::round(id, r1)).await;

        assert_eq!(res.status, 409);
        assert_eq!(round::Entity::find().all(&app.db).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn round1_stays_while_round2_exists() {
        let app = TestApp::spawn().await;
        let (id, r1, _) = ready_for_round2(&app).await;
        app.create_round2(id, &json!({})).await;

        let res = app.delete(&routes::round(id, r1)).await;

        assert_eq!(res.status, 409);
    }

    #[tokio::test]
    async fn round_of_another_contest_is_not_found() {
        let app = TestApp::spawn().await;
        let first = app.create_contest(12, 4).await;
        let other = app.create_contest(12, 4).await;
        let r1 = app.create_round1(first).await;

        let res = app.delete(&routes::round(other, r1)).await;

        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn cascades_to_tables_assignments_and_schedules() {
        let app = TestApp::spawn().await;
        let (id, r1, _) = ready_for_round2(&app).await;
        let r2 = app.create_round2(id, &json!({})).await.id();
        let judge = app.create_examiner("Table Judge").await;
        let res = app
            .assign_examiner(id, &json!({ "examiner_id": judge, "role": "ROUND_2", "table_number": 2 }))
            .await;
        assert_eq!(res.status, 201, "{}", res.text);
        app.toggle_off_enforcement(id).await;
        let res = app
            .put(&routes::schedule(id, judge), &json!({ "date": "2030-05-03T09:00:00Z" }))
            .await;
        assert_eq!(res.status, 200, "{}", res.text);

        let res = app.delete(&routes::round(id, r2)).await;
        assert_eq!(res.status, 204, "{}", res.text);

        assert!(judging_table::Entity::find().all(&app.db).await.unwrap().is_empty());
        assert!(table_seat::Entity::find().all(&app.db).await.unwrap().is_empty());
        assert!(examiner_assignment::Entity::find()
            .filter(examiner_assignment::Column::ExaminerId.eq(judge))
            .all(&app.db)
            .await
            .unwrap()
            .is_empty());
        assert!(schedule::Entity::find().all(&app.db).await.unwrap().is_empty());

        let res = app.delete(&routes::round(id, r1)).await;
        assert_eq!(res.status, 204, "{}", res.text);
        assert!(round::Entity::find().all(&app.db).await.unwrap().is_empty());
        assert!(evaluation::Entity::find().all(&app.db).await.unwrap().is_empty());
    }
}
