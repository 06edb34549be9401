//! Candidate Ranker: scores a whole pool, applies the threshold, sorts.
//!
//! Ranking is a single synchronous pass: no state survives between calls.

use tracing::{info, warn};

use crate::matching::models::{
    CandidatePool, CandidateRecord, MatchResult, RankReport, RankedMatchList, SourceStatus,
};
use crate::matching::normalize::{has_skill_tokens, normalize_required};
use crate::matching::scorer::score_candidate;
use crate::sources::CandidateSource;

/// Ranks every scoreable record in `pool` against `required_skills`.
///
/// Records without skills data, including skills text that is only
/// separators, are skipped, not scored at 0%. Results below
/// `min_match_percentage` are dropped. Equal percentages keep source order.
pub fn rank_candidates(
    pool: &CandidatePool,
    required_skills: &[String],
    min_match_percentage: f64,
) -> RankedMatchList {
    let required = normalize_required(required_skills);

    let mut entries: Vec<MatchResult> = pool
        .records
        .iter()
        .filter_map(|record| {
            let skills = scoreable_skills(record)?;
            let score = score_candidate(Some(skills), &required);
            (score.match_percentage >= min_match_percentage).then(|| MatchResult {
                candidate: record.clone(),
                score,
            })
        })
        .collect();

    // sort_by is stable
    entries.sort_by(|a, b| b.match_percentage().total_cmp(&a.match_percentage()));

    RankedMatchList {
        columns: pool.columns.clone(),
        entries,
    }
}

fn scoreable_skills(record: &CandidateRecord) -> Option<&str> {
    record.skills().filter(|skills| has_skill_tokens(skills))
}

/// Loads the pool from `source` and ranks it. A source that cannot be read
/// yields an empty list with `SourceStatus::Unavailable` instead of an error.
pub async fn load_and_rank(
    source: &dyn CandidateSource,
    required_skills: &[String],
    min_match_percentage: f64,
) -> RankReport {
    let pool = match source.load().await {
        Ok(pool) => pool,
        Err(e) => {
            warn!("Candidate source {} unavailable: {e}", source.describe());
            return RankReport::unavailable(e.to_string());
        }
    };

    let scoreable_records = pool
        .records
        .iter()
        .filter(|r| scoreable_skills(r).is_some())
        .count();
    let matches = rank_candidates(&pool, required_skills, min_match_percentage);

    info!(
        "Ranked {} of {} candidates from {} (min {}%): {} matched",
        scoreable_records,
        pool.records.len(),
        source.describe(),
        min_match_percentage,
        matches.len()
    );

    RankReport {
        matches,
        source: SourceStatus::Available {
            total_records: pool.records.len(),
            scoreable_records,
        },
    }
}
