use crate::models::{InvalidRecord, MenteeProfile, MentorProfile};
use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

/// Errors surfaced by a profile store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Backend error: {0}")]
    Backend(String),
}

impl From<InvalidRecord> for StoreError {
    fn from(err: InvalidRecord) -> Self {
        StoreError::InvalidInput(err.to_string())
    }
}

/// Source of mentee and mentor profiles
///
/// Implementations hand back validated profile types; raw documents that
/// cannot be converted fail with [`StoreError::InvalidInput`].
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetch a mentee by id
    async fn get_mentee(&self, mentee_id: &str) -> Result<MenteeProfile, StoreError>;

    /// Fetch a mentor by id
    async fn get_mentor(&self, mentor_id: &str) -> Result<MentorProfile, StoreError>;

    /// List the mentors offering a subject area
    async fn list_mentors(&self, area_id: &str) -> Result<Vec<MentorProfile>, StoreError>;
}

/// Profile store held entirely in memory
///
/// Mentors are listed in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProfileStore {
    mentees: HashMap<String, MenteeProfile>,
    mentors: Vec<(Vec<String>, MentorProfile)>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mentee(mut self, mentee: MenteeProfile) -> Self {
        self.mentees.insert(mentee.id.clone(), mentee);
        self
    }

    /// Add a mentor offering the given subject areas
    pub fn with_mentor(mut self, area_ids: &[&str], mentor: MentorProfile) -> Self {
        let area_ids = area_ids.iter().map(|id| id.to_string()).collect();
        self.mentors.push((area_ids, mentor));
        self
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn get_mentee(&self, mentee_id: &str) -> Result<MenteeProfile, StoreError> {
        self.mentees
            .get(mentee_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("Mentee {}", mentee_id)))
    }

    async fn get_mentor(&self, mentor_id: &str) -> Result<MentorProfile, StoreError> {
        self.mentors
            .iter()
            .map(|(_, mentor)| mentor)
            .find(|mentor| mentor.id == mentor_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("Mentor {}", mentor_id)))
    }

    async fn list_mentors(&self, area_id: &str) -> Result<Vec<MentorProfile>, StoreError> {
        Ok(self
            .mentors
            .iter()
            .filter(|(areas, _)| areas.iter().any(|area| area == area_id))
            .map(|(_, mentor)| mentor.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> InMemoryProfileStore {
        InMemoryProfileStore::new()
            .with_mentee(MenteeProfile::new("u1", vec!["rust".into()]))
            .with_mentor(&["backend"], MentorProfile::new("m1", vec!["Rust".into()]))
            .with_mentor(&["frontend", "backend"], MentorProfile::new("m2", vec!["React".into()]))
            .with_mentor(&["frontend"], MentorProfile::new("m3", vec!["CSS".into()]))
    }

    #[tokio::test]
    async fn test_get_mentee() {
        let store = store();
        assert_eq!(store.get_mentee("u1").await.unwrap().id, "u1");
        assert!(matches!(
            store.get_mentee("missing").await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_mentors_by_area() {
        let store = store();

        let backend: Vec<String> = store
            .list_mentors("backend")
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(backend, vec!["m1", "m2"]);

        assert!(store.list_mentors("design").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_mentor() {
        let store = store();
        assert_eq!(store.get_mentor("m3").await.unwrap().expertise_areas, vec!["CSS"]);
        assert!(store.get_mentor("m9").await.is_err());
    }
}
