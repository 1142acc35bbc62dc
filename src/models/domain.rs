use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// A stored document that cannot be turned into a scorable profile
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind} record: {reason}")]
pub struct InvalidRecord {
    pub kind: &'static str,
    pub reason: String,
}

impl InvalidRecord {
    pub fn new(kind: &'static str, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
        }
    }
}

/// Mentee profile: the requester a ranking is computed for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenteeProfile {
    pub id: String,
    #[serde(rename = "interestAreas", default)]
    pub interest_areas: Vec<String>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl MenteeProfile {
    pub fn new(id: impl Into<String>, interest_areas: Vec<String>) -> Self {
        Self {
            id: id.into(),
            interest_areas,
            attributes: Map::new(),
        }
    }
}

/// Mentor profile: a candidate offering expertise
///
/// `rating` and `completed_sessions` stay `None` when the store has no value
/// for them. Absent is "no track record yet" and scores as zero; the
/// distinction is kept so it remains visible to callers and tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MentorProfile {
    pub id: String,
    #[serde(rename = "expertiseAreas", default)]
    pub expertise_areas: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(rename = "completedSessions", default, skip_serializing_if = "Option::is_none")]
    pub completed_sessions: Option<u32>,
    /// Every other field of the stored document, passed through untouched
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl MentorProfile {
    pub fn new(id: impl Into<String>, expertise_areas: Vec<String>) -> Self {
        Self {
            id: id.into(),
            expertise_areas,
            rating: None,
            completed_sessions: None,
            attributes: Map::new(),
        }
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_completed_sessions(mut self, completed_sessions: u32) -> Self {
        self.completed_sessions = Some(completed_sessions);
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }
}

/// Ranked mentor returned to callers: the candidate profile plus its score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredMentor {
    #[serde(flatten)]
    pub mentor: MentorProfile,
    #[serde(rename = "matchScore")]
    pub match_score: f64,
}

/// Raw mentee document as returned by the profile store
///
/// Accepts either a plain `id` or the backend's `$id`, and both camelCase and
/// snake_case field names.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MenteeRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "$id", default)]
    pub document_id: Option<String>,
    #[serde(rename = "interestAreas", alias = "interest_areas", default)]
    pub interest_areas: Option<Vec<String>>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl TryFrom<MenteeRecord> for MenteeProfile {
    type Error = InvalidRecord;

    fn try_from(record: MenteeRecord) -> Result<Self, Self::Error> {
        let id = resolve_id(record.id, record.document_id)
            .ok_or_else(|| InvalidRecord::new("mentee", "missing id"))?;

        Ok(Self {
            id,
            interest_areas: record.interest_areas.unwrap_or_default(),
            attributes: strip_system_fields(record.attributes),
        })
    }
}

/// Raw mentor document as returned by the profile store
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MentorRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "$id", default)]
    pub document_id: Option<String>,
    #[serde(rename = "expertiseAreas", alias = "expertise_areas", default)]
    pub expertise_areas: Option<Vec<String>>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(rename = "completedSessions", alias = "completed_sessions", default)]
    pub completed_sessions: Option<u32>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl TryFrom<MentorRecord> for MentorProfile {
    type Error = InvalidRecord;

    fn try_from(record: MentorRecord) -> Result<Self, Self::Error> {
        let id = resolve_id(record.id, record.document_id)
            .ok_or_else(|| InvalidRecord::new("mentor", "missing id"))?;

        if let Some(rating) = record.rating {
            if !rating.is_finite() {
                return Err(InvalidRecord::new(
                    "mentor",
                    format!("rating for {} is not a finite number", id),
                ));
            }
        }

        Ok(Self {
            id,
            expertise_areas: record.expertise_areas.unwrap_or_default(),
            rating: record.rating,
            completed_sessions: record.completed_sessions,
            attributes: strip_system_fields(record.attributes),
        })
    }
}

/// Prefer the profile's own `id`, fall back to the document id
fn resolve_id(id: Option<String>, document_id: Option<String>) -> Option<String> {
    id.into_iter()
        .chain(document_id)
        .find(|candidate| !candidate.trim().is_empty())
}

/// Drop backend bookkeeping (`$createdAt`, `$permissions`, ...) from passthrough fields
fn strip_system_fields(mut attributes: Map<String, Value>) -> Map<String, Value> {
    attributes.retain(|key, _| !key.starts_with('$'));
    attributes
}

/// Scoring weights
///
/// Defaults reproduce the platform's matching formula: two points per
/// overlapping area pair, the mentor's rating as-is, and one point per five
/// completed sessions capped at two.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub overlap_points: f64,
    pub sessions_per_point: f64,
    pub experience_cap: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            overlap_points: 2.0,
            sessions_per_point: 5.0,
            experience_cap: 2.0,
        }
    }
}

/// Matching behaviour switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchOptions {
    /// Collapse repeated area tags (case-insensitively) before counting overlap
    pub dedupe_areas: bool,
}
