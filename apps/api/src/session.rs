//! Match sessions: the last ranking run per caller, kept in Redis so the
//! results page and the one-shot download can find it again.
//!
//! The matching core never sees this; handlers read and write it around a
//! ranking call.

use chrono::{DateTime, Utc};
use redis::Client as RedisClient;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::models::{CandidateField, MatchResult};

/// Sessions expire with the exports they point at.
const SESSION_TTL_SECS: u64 = 86_400;
/// Only the best matches are kept for display; the export has all of them.
pub const SESSION_MATCH_LIMIT: usize = 50;
const SUMMARY_SKILL_LIMIT: usize = 10;

/// Display-ready view of one match, with absent fields rendered as `N/A`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub name: String,
    pub email: String,
    pub contact: String,
    pub designation: String,
    pub current_company: String,
    pub experience: String,
    pub location: String,
    pub linkedin: String,
    pub cv_link: String,
    pub match_percentage: f64,
    pub matched_skills_count: usize,
    pub total_required_skills: usize,
    pub matched_skills: Vec<String>,
}

impl From<&MatchResult> for MatchSummary {
    fn from(result: &MatchResult) -> Self {
        let field = |f: CandidateField| result.candidate.display(f).to_string();
        Self {
            name: field(CandidateField::Name),
            email: field(CandidateField::Email),
            contact: field(CandidateField::Contact),
            designation: field(CandidateField::Designation),
            current_company: field(CandidateField::CurrentCompany),
            experience: field(CandidateField::Experience),
            location: field(CandidateField::Location),
            linkedin: field(CandidateField::Linkedin),
            cv_link: field(CandidateField::CvLink),
            match_percentage: result.score.match_percentage,
            matched_skills_count: result.score.matched_skills_count,
            total_required_skills: result.score.total_required_skills,
            matched_skills: result
                .score
                .matched_skills
                .iter()
                .take(SUMMARY_SKILL_LIMIT)
                .cloned()
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSession {
    pub job_id: Uuid,
    pub source_name: String,
    pub total_matches: usize,
    pub matches: Vec<MatchSummary>,
    /// Bare file name inside the export directory; cleared once downloaded.
    pub export_file: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl MatchSession {
    pub fn new(
        job_id: Uuid,
        source_name: String,
        results: &[MatchResult],
        export_file: Option<String>,
    ) -> Self {
        Self {
            job_id,
            source_name,
            total_matches: results.len(),
            matches: results
                .iter()
                .take(SESSION_MATCH_LIMIT)
                .map(MatchSummary::from)
                .collect(),
            export_file,
            created_at: Utc::now(),
        }
    }
}

/// Redis-backed store keyed by the caller's session id.
#[derive(Clone)]
pub struct SessionStore {
    client: RedisClient,
}

impl SessionStore {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    pub async fn save(&self, session_id: Uuid, session: &MatchSession) -> Result<(), AppError> {
        let payload = serde_json::to_string(session).map_err(anyhow::Error::from)?;
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        redis::cmd("SET")
            .arg(session_key(session_id))
            .arg(payload)
            .arg("EX")
            .arg(SESSION_TTL_SECS)
            .query_async::<_, ()>(&mut conn)
            .await?;
        Ok(())
    }

    pub async fn load(&self, session_id: Uuid) -> Result<Option<MatchSession>, AppError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let payload: Option<String> = redis::cmd("GET")
            .arg(session_key(session_id))
            .query_async(&mut conn)
            .await?;

        payload.map(|json| decode_session(session_id, &json)).transpose()
    }

    pub async fn clear(&self, session_id: Uuid) -> Result<(), AppError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        redis::cmd("DEL")
            .arg(session_key(session_id))
            .query_async::<_, ()>(&mut conn)
            .await?;
        Ok(())
    }
}

fn decode_session(session_id: Uuid, json: &str) -> Result<MatchSession, AppError> {
    serde_json::from_str(json).map_err(|e| {
        warn!("Match session {session_id} has an unreadable payload: {e}");
        AppError::Internal(anyhow::Error::new(e).context("Corrupt match session"))
    })
}

fn session_key(session_id: Uuid) -> String {
    format!("match_session:{session_id}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::models::{CandidateRecord, SkillMatch};

    fn result(name: &str, matched: usize) -> MatchResult {
        MatchResult {
            candidate: CandidateRecord::default().with(CandidateField::Name, name),
            score: SkillMatch {
                matched_skills: (0..matched).map(|i| format!("skill-{i}")).collect(),
                match_percentage: 50.0,
                matched_skills_count: matched,
                total_required_skills: matched * 2,
            },
        }
    }

    #[test]
    fn test_summary_renders_missing_fields_as_na() {
        let summary = MatchSummary::from(&result("Asha", 2));
        assert_eq!(summary.name, "Asha");
        assert_eq!(summary.email, "N/A");
        assert_eq!(summary.linkedin, "N/A");
    }

    #[test]
    fn test_summary_caps_matched_skills() {
        let summary = MatchSummary::from(&result("Asha", 25));
        assert_eq!(summary.matched_skills.len(), 10);
        assert_eq!(summary.matched_skills_count, 25);
    }

    #[test]
    fn test_session_keeps_top_fifty_but_counts_all() {
        let results: Vec<MatchResult> = (0..120).map(|i| result(&format!("c{i}"), 1)).collect();
        let session = MatchSession::new(Uuid::new_v4(), "Pool".into(), &results, None);
        assert_eq!(session.total_matches, 120);
        assert_eq!(session.matches.len(), SESSION_MATCH_LIMIT);
        assert_eq!(session.matches[0].name, "c0");
    }

    #[test]
    fn test_session_survives_json_round_trip() {
        let session = MatchSession::new(
            Uuid::new_v4(),
            "Pool".into(),
            &[result("Asha", 1)],
            Some("export.csv".into()),
        );
        let json = serde_json::to_string(&session).unwrap();
        let back: MatchSession = serde_json::from_str(&json).unwrap();
        assert_eq!(back, session);
    }

    #[test]
    fn test_corrupt_payload_is_an_error_not_a_missing_session() {
        let err = decode_session(Uuid::nil(), "{not json").unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));

        let session = MatchSession::new(Uuid::nil(), "Pool".into(), &[result("Asha", 1)], None);
        let json = serde_json::to_string(&session).unwrap();
        assert_eq!(decode_session(Uuid::nil(), &json).unwrap(), session);
    }

    #[test]
    fn test_session_key_is_namespaced() {
        assert_eq!(session_key(Uuid::nil()), format!("match_session:{}", Uuid::nil()));
    }
}
