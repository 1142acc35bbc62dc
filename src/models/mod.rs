// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    InvalidRecord, MatchOptions, MenteeProfile, MenteeRecord, MentorProfile, MentorRecord,
    ScoredMentor, ScoringWeights,
};
pub use requests::{FindMatchesRequest, ListMentorsQuery};
pub use responses::{ErrorResponse, FindMatchesResponse, HealthResponse, MentorListResponse};
