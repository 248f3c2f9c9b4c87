use ::common::OriginalSubmissionStatus;
use contest_server::entity::original_submission;
use sea_orm::EntityTrait;
use serde_json::{Value, json};

use crate::common::{TestApp, routes};

fn painting_ids(list: &Value) -> Vec<i64> {
    list["qualified"]
        .as_array()
        .unwrap()
        .iter()
        .map(|q| q["painting_id"].as_i64().unwrap())
        .collect()
}

mod ranking {
    use super::*;

    #[tokio::test]
    async fn equal_averages_fall_back_to_submission_time() {
        let app = TestApp::spawn().await;
        let id = app.create_contest(4, 2).await;
        let r1 = app.create_round1(id).await;
        let judge = app.create_examiner("Panel").await;

        let early = app.register_painting(id, "Early", 0).await;
        let late = app.register_painting(id, "Late", 30).await;
        let middle = app.register_painting(id, "Middle", 10).await;
        let best = app.register_painting(id, "Best", 45).await;
        for (entrant, score) in [(early, 80), (late, 80), (middle, 80), (best, 95)] {
            let res = app.evaluate(id, r1, entrant.painting_id, judge, score).await;
            assert_eq!(res.status, 200, "{}", res.text);
        }

        let res = app.get(&routes::qualified(id)).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(
            painting_ids(&res.body),
            vec![
                best.painting_id as i64,
                early.painting_id as i64,
                middle.painting_id as i64,
                late.painting_id as i64,
            ]
        );
        assert_eq!(res.body["qualified"][0]["rank"], 1);
        assert_eq!(res.body["qualified"][3]["rank"], 4);
        assert_eq!(res.body["under_quota"], false);
    }

    #[tokio::test]
    async fn averages_across_examiners() {
        let app = TestApp::spawn().await;
        let id = app.create_contest(2, 1).await;
        let r1 = app.create_round1(id).await;
        let a = app.create_examiner("Panel A").await;
        let b = app.create_examiner("Panel B").await;

        let steady = app.register_painting(id, "Steady", 0).await;
        let split = app.register_painting(id, "Split", 1).await;
        app.evaluate(id, r1, steady.painting_id, a, 70).await;
        app.evaluate(id, r1, steady.painting_id, b, 70).await;
        app.evaluate(id, r1, split.painting_id, a, 100).await;
        app.evaluate(id, r1, split.painting_id, b, 50).await;

        let res = app.get(&routes::scores(id, r1)).await;

        assert_eq!(res.status, 200, "{}", res.text);
        let scores = res.body["scores"].as_array().unwrap();
        assert_eq!(scores[0]["painting_id"], split.painting_id);
        assert_eq!(scores[0]["avg_score"], 75.0);
        assert_eq!(scores[0]["evaluation_count"], 2);
        assert_eq!(scores[1]["avg_score"], 70.0);
    }

    #[tokio::test]
    async fn rescoring_replaces_the_earlier_score() {
        let app = TestApp::spawn().await;
        let id = app.create_contest(2, 1).await;
        let r1 = app.create_round1(id).await;
        let judge = app.create_examiner("Panel").await;
        let entrant = app.register_painting(id, "Solo", 0).await;

        app.evaluate(id, r1, entrant.painting_id, judge, 40).await;
        let res = app.evaluate(id, r1, entrant.painting_id, judge, 90).await;
        assert_eq!(res.status, 200);

        let scores = app.get(&routes::scores(id, r1)).await;
        assert_eq!(scores.body["scores"][0]["avg_score"], 90.0);
        assert_eq!(scores.body["scores"][0]["evaluation_count"], 1);
    }

    #[tokio::test]
    async fn fewer_scored_than_quota_is_flagged() {
        let app = TestApp::spawn().await;
        let id = app.create_contest(12, 4).await;
        let r1 = app.create_round1(id).await;
        app.seed_round1_results(id, r1, 5).await;

        let res = app.get(&routes::qualified(id)).await;

        assert_eq!(res.body["quota"], 12);
        assert_eq!(res.body["under_quota"], true);
        assert_eq!(res.body["qualified"].as_array().unwrap().len(), 5);
        assert_eq!(res.body["summary"]["total_qualified"], 5);
        assert_eq!(res.body["summary"]["not_submitted"], 5);
    }

    #[tokio::test]
    async fn no_round1_yields_an_empty_list() {
        let app = TestApp::spawn().await;
        let id = app.create_contest(12, 4).await;

        let res = app.get(&routes::qualified(id)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["qualified"], json!([]));
    }

    #[tokio::test]
    async fn out_of_range_score_is_rejected() {
        let app = TestApp::spawn().await;
        let id = app.create_contest(2, 1).await;
        let r1 = app.create_round1(id).await;
        let judge = app.create_examiner("Panel").await;
        let entrant = app.register_painting(id, "Solo", 0).await;

        let res = app.evaluate(id, r1, entrant.painting_id, judge, 101).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["fields"][0]["field"], "score");
    }
}

mod originals {
    use super::*;

    #[tokio::test]
    async fn status_is_reported_per_qualifier() {
        let app = TestApp::spawn().await;
        let id = app.create_contest(4, 2).await;
        let r1 = app.create_round1(id).await;
        let entrants = app.seed_round1_results(id, r1, 4).await;

        let res = app.set_original(id, entrants[1].painting_id, true).await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["status"], "ORIGINAL_SUBMITTED");

        let list = app.get(&routes::qualified(id)).await;
        assert_eq!(list.body["qualified"][0]["original_submission_status"], "NOT_SUBMITTED_ORIGINAL");
        assert_eq!(list.body["qualified"][1]["original_submission_status"], "ORIGINAL_SUBMITTED");
        assert_eq!(list.body["summary"]["submitted"], 1);
        assert_eq!(list.body["summary"]["not_submitted"], 3);
    }

    #[tokio::test]
    async fn setting_twice_keeps_one_row() {
        let app = TestApp::spawn().await;
        let id = app.create_contest(2, 1).await;
        let r1 = app.create_round1(id).await;
        let entrants = app.seed_round1_results(id, r1, 2).await;

        app.set_original(id, entrants[0].painting_id, true).await;
        let res = app.set_original(id, entrants[0].painting_id, false).await;

        assert_eq!(res.status, 200);
        let rows = original_submission::Entity::find().all(&app.db).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, OriginalSubmissionStatus::NotSubmittedOriginal);
    }

    #[tokio::test]
    async fn painting_outside_the_qualifiers_is_not_found() {
        let app = TestApp::spawn().await;
        let id = app.create_contest(2, 1).await;
        let r1 = app.create_round1(id).await;
        let entrants = app.seed_round1_results(id, r1, 3).await;

        let res = app.set_original(id, entrants[2].painting_id, true).await;

        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn frozen_once_round2_exists() {
        let app = TestApp::spawn().await;
        let id = app.create_contest(2, 1).await;
        let r1 = app.create_round1(id).await;
        let entrants = app.seed_round1_results(id, r1, 2).await;
        app.confirm_originals(id, &entrants).await;
        let res = app.create_round2(id, &json!({})).await;
        assert_eq!(res.status, 201, "{}", res.text);

        let res = app.set_original(id, entrants[0].painting_id, false).await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "STATE_CONFLICT");
    }
}

mod round2_scoring {
    use super::*;

    #[tokio::test]
    async fn only_seated_paintings_are_scored() {
        let app = TestApp::spawn().await;
        let id = app.create_contest(2, 1).await;
        let r1 = app.create_round1(id).await;
        let entrants = app.seed_round1_results(id, r1, 3).await;
        app.confirm_originals(id, &entrants[..2]).await;
        let r2 = app.create_round2(id, &json!({})).await.id();
        let judge = app.create_examiner("Final Panel").await;

        let seated = app.evaluate(id, r2, entrants[0].painting_id, judge, 88).await;
        let unseated = app.evaluate(id, r2, entrants[2].painting_id, judge, 99).await;

        assert_eq!(seated.status, 200, "{}", seated.text);
        assert_eq!(unseated.status, 409);
        let scores = app.get(&routes::scores(id, r2)).await;
        assert_eq!(scores.body["scores"].as_array().unwrap().len(), 1);
    }
}
