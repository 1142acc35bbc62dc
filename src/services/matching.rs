use crate::core::{MatchResult, Matcher};
use crate::services::store::{ProfileStore, StoreError};
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while preparing a ranking
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Profile store failure: {0}")]
    Store(String),
}

/// Fetches a mentee and the mentors of an area, then ranks them
///
/// The mentee is resolved first; when it cannot be found the request stops
/// with [`MatchError::ProfileNotFound`] and nothing is scored.
pub struct MatchingService {
    store: Arc<dyn ProfileStore>,
    matcher: Matcher,
}

impl MatchingService {
    pub fn new(store: Arc<dyn ProfileStore>, matcher: Matcher) -> Self {
        Self { store, matcher }
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Rank the mentors of `area_id` for `mentee_id`, keeping at most `limit`
    pub async fn find_mentors(
        &self,
        mentee_id: &str,
        area_id: &str,
        limit: Option<usize>,
    ) -> Result<MatchResult, MatchError> {
        let mentee = self.store.get_mentee(mentee_id).await.map_err(|e| match e {
            StoreError::NotFound(_) => MatchError::ProfileNotFound(mentee_id.to_string()),
            StoreError::InvalidInput(msg) => MatchError::InvalidInput(msg),
            StoreError::Backend(msg) => MatchError::Store(msg),
        })?;

        let mentors = self.store.list_mentors(area_id).await.map_err(|e| match e {
            StoreError::InvalidInput(msg) => MatchError::InvalidInput(msg),
            other => MatchError::Store(other.to_string()),
        })?;

        tracing::debug!(
            "Ranking {} mentors in area {} for mentee {}",
            mentors.len(),
            area_id,
            mentee_id
        );

        Ok(self.matcher.find_matches(&mentee, &mentors, limit))
    }
}
