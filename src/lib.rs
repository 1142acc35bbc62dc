//! Mentor Match - mentor ranking service for the peer-mentoring platform
//!
//! Ranks the mentors of a subject area for a mentee by topical overlap,
//! rating and experience. Profiles, identities and persistence live in the
//! hosted backend; this crate scores, and serves the result over HTTP.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{calculate_match_score, MatchResult, Matcher, ScoreBreakdown};
pub use models::{
    FindMatchesRequest, FindMatchesResponse, MatchOptions, MenteeProfile, MentorProfile,
    ScoredMentor, ScoringWeights,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let matcher = Matcher::default();
        let ranked = matcher.rank_matches(&MenteeProfile::new("u1", vec![]), &[]);
        assert!(ranked.is_empty());
    }
}
