// Core algorithm exports
pub mod areas;
pub mod matcher;
pub mod scoring;

pub use areas::{count_overlap, normalized_areas};
pub use matcher::{MatchResult, Matcher};
pub use scoring::{calculate_match_score, score_breakdown, ScoreBreakdown};
