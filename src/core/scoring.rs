use crate::core::areas::{count_overlap, normalized_areas};
use crate::models::{MatchOptions, MenteeProfile, MentorProfile, ScoringWeights};

/// Per-signal contributions to a mentor's match score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub overlap: f64,
    pub rating: f64,
    pub experience: f64,
    /// Number of matching (interest, expertise) pairs behind `overlap`
    pub matched_areas: usize,
}

impl ScoreBreakdown {
    #[inline]
    pub fn total(&self) -> f64 {
        self.overlap + self.rating + self.experience
    }
}

/// Calculate the match score of a mentor for a mentee
///
/// Scoring formula (default weights):
/// score = (
///     2 * overlapping_pairs +            # interest/expertise pairs, case-insensitive
///     rating +                           # 0 when absent
///     min(completed_sessions / 5, 2)     # 0 when absent
/// )
pub fn calculate_match_score(
    mentee: &MenteeProfile,
    mentor: &MentorProfile,
    weights: &ScoringWeights,
    options: &MatchOptions,
) -> f64 {
    score_breakdown(mentee, mentor, weights, options).total()
}

/// Same as [`calculate_match_score`], keeping each signal separate
pub fn score_breakdown(
    mentee: &MenteeProfile,
    mentor: &MentorProfile,
    weights: &ScoringWeights,
    options: &MatchOptions,
) -> ScoreBreakdown {
    let interests = normalized_areas(&mentee.interest_areas, options.dedupe_areas);
    score_against(&interests, mentor, weights, options)
}

/// Score a mentor against interests that were already normalized
pub(crate) fn score_against(
    interests: &[String],
    mentor: &MentorProfile,
    weights: &ScoringWeights,
    options: &MatchOptions,
) -> ScoreBreakdown {
    let expertise = normalized_areas(&mentor.expertise_areas, options.dedupe_areas);
    let matched_areas = count_overlap(interests, &expertise);

    ScoreBreakdown {
        overlap: matched_areas as f64 * weights.overlap_points,
        rating: mentor.rating.unwrap_or(0.0),
        experience: calculate_experience_score(mentor.completed_sessions, weights),
        matched_areas,
    }
}

/// Experience bonus: one point per `sessions_per_point` sessions, capped
#[inline]
fn calculate_experience_score(completed_sessions: Option<u32>, weights: &ScoringWeights) -> f64 {
    match completed_sessions {
        Some(sessions) => (sessions as f64 / weights.sessions_per_point).min(weights.experience_cap),
        None => 0.0,
    }
}
