use serde::{Deserialize, Serialize};
use crate::models::domain::{MentorProfile, ScoredMentor};
use crate::services::CacheStats;

/// Response for the find matches endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindMatchesResponse {
    pub matches: Vec<ScoredMentor>,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
}

/// Response for the mentor listing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentorListResponse {
    pub mentors: Vec<MentorProfile>,
    pub total: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheStats>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
