use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One examiner's score for a competitor's painting in a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub competitor_id: i32,
    pub painting_id: i32,
    pub score: i32,
}

/// Aggregated score of a competitor in one round.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ScoreSummary {
    pub competitor_id: i32,
    pub painting_id: i32,
    #[schema(example = 87.5)]
    pub avg_score: f64,
    #[schema(example = 4)]
    pub evaluation_count: u32,
}

#[derive(Default)]
struct Accumulator {
    painting_id: i32,
    total: i64,
    count: u32,
}

/// Averages every evaluation per competitor.
///
/// Competitors without evaluations do not appear in the result. Equal averages
/// stay equal; ordering is left to the qualification step.
pub fn aggregate(evaluations: &[Evaluation]) -> BTreeMap<i32, ScoreSummary> {
    let mut acc: BTreeMap<i32, Accumulator> = BTreeMap::new();
    for e in evaluations {
        let entry = acc.entry(e.competitor_id).or_insert_with(|| Accumulator {
            painting_id: e.painting_id,
            ..Default::default()
        });
        entry.total += i64::from(e.score);
        entry.count += 1;
    }

    acc.into_iter()
        .map(|(competitor_id, a)| {
            (
                competitor_id,
                ScoreSummary {
                    competitor_id,
                    painting_id: a.painting_id,
                    avg_score: a.total as f64 / f64::from(a.count),
                    evaluation_count: a.count,
                },
            )
        })
        .collect()
}
