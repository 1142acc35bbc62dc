use crate::models::{InvalidRecord, MenteeProfile, MenteeRecord, MentorProfile, MentorRecord};
use crate::services::store::{ProfileStore, StoreError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with Appwrite
#[derive(Debug, Error)]
pub enum AppwriteError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: invalid API key or token")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error(transparent)]
    InvalidRecord(#[from] InvalidRecord),
}

impl From<AppwriteError> for StoreError {
    fn from(err: AppwriteError) -> Self {
        match err {
            AppwriteError::NotFound(what) => StoreError::NotFound(what),
            AppwriteError::InvalidRecord(record) => StoreError::InvalidInput(record.to_string()),
            other => StoreError::Backend(other.to_string()),
        }
    }
}

/// Collection IDs in Appwrite
#[derive(Debug, Clone)]
pub struct AppwriteCollections {
    pub mentee_profiles: String,
    pub mentor_profiles: String,
    /// Array attribute on mentor documents holding their subject area ids
    pub mentor_area_attribute: String,
}

/// One page of a document listing
struct DocumentPage {
    /// Matching documents across all pages
    total: u64,
    documents: Vec<Value>,
}

/// Appwrite API client
///
/// Handles all communication with the Appwrite backend:
/// - Fetching mentee profiles
/// - Fetching single mentor profiles
/// - Listing the mentors of a subject area
pub struct AppwriteClient {
    base_url: String,
    api_key: String,
    project_id: String,
    database_id: String,
    client: Client,
    collections: AppwriteCollections,
    page_size: usize,
}

impl AppwriteClient {
    /// Create a new Appwrite client
    pub fn new(
        base_url: String,
        api_key: String,
        project_id: String,
        database_id: String,
        collections: AppwriteCollections,
    ) -> Result<Self, AppwriteError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            base_url,
            api_key,
            project_id,
            database_id,
            client,
            collections,
            page_size: 100,
        })
    }

    /// Number of mentor documents requested per listing page
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    fn documents_url(&self, collection: &str) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.base_url.trim_end_matches('/'),
            self.database_id,
            collection
        )
    }

    /// Fetch a single document by id
    async fn get_document(&self, collection: &str, document_id: &str) -> Result<Value, AppwriteError> {
        let url = format!(
            "{}/{}",
            self.documents_url(collection),
            urlencoding::encode(document_id)
        );

        tracing::debug!("Fetching document {} from {}", document_id, collection);

        let response = self
            .client
            .get(&url)
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                return Err(AppwriteError::NotFound(format!(
                    "Document {} in {}",
                    document_id, collection
                )));
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(AppwriteError::Unauthorized);
            }
            status if !status.is_success() => {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unable to read body".to_string());
                tracing::error!("Failed to fetch {} from {}: {} - {}", document_id, collection, status, body);
                return Err(AppwriteError::ApiError(format!(
                    "Failed to fetch document: {}",
                    status
                )));
            }
            _ => {}
        }

        Ok(response.json().await?)
    }

    /// List one page of documents matching Appwrite query strings
    async fn list_documents(
        &self,
        collection: &str,
        queries: &[String],
    ) -> Result<DocumentPage, AppwriteError> {
        let query_string = queries
            .iter()
            .map(|query| format!("queries[]={}", urlencoding::encode(query)))
            .collect::<Vec<_>>()
            .join("&");

        let url = format!("{}?{}", self.documents_url(collection), query_string);

        let response = self
            .client
            .get(&url)
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(AppwriteError::Unauthorized);
        }
        if !status.is_success() {
            return Err(AppwriteError::ApiError(format!(
                "Failed to list documents in {}: {}",
                collection, status
            )));
        }

        let json: Value = response.json().await?;

        let total = json
            .get("total")
            .and_then(|t| t.as_u64())
            .ok_or_else(|| AppwriteError::InvalidResponse("Missing total count".into()))?;

        let documents = json
            .get("documents")
            .and_then(|d| d.as_array())
            .cloned()
            .ok_or_else(|| AppwriteError::InvalidResponse("Missing documents array".into()))?;

        tracing::debug!("Listed {} documents from {} (total: {})", documents.len(), collection, total);

        Ok(DocumentPage { total, documents })
    }

    /// Fetch a mentee profile
    pub async fn fetch_mentee(&self, mentee_id: &str) -> Result<MenteeProfile, AppwriteError> {
        let doc = self
            .get_document(&self.collections.mentee_profiles, mentee_id)
            .await?;
        let record: MenteeRecord = parse_record("mentee", doc)?;
        Ok(MenteeProfile::try_from(record)?)
    }

    /// Fetch a mentor profile
    pub async fn fetch_mentor(&self, mentor_id: &str) -> Result<MentorProfile, AppwriteError> {
        let doc = self
            .get_document(&self.collections.mentor_profiles, mentor_id)
            .await?;
        let record: MentorRecord = parse_record("mentor", doc)?;
        Ok(MentorProfile::try_from(record)?)
    }

    /// Fetch all mentors offering a subject area, one page at a time
    ///
    /// A single malformed mentor document fails the whole listing, and so
    /// does a listing that ends before the reported total.
    pub async fn fetch_mentors(&self, area_id: &str) -> Result<Vec<MentorProfile>, AppwriteError> {
        let mut documents: Vec<Value> = Vec::new();

        loop {
            let queries = mentor_area_queries(
                &self.collections.mentor_area_attribute,
                area_id,
                self.page_size,
                documents.len(),
            )?;

            let page = self
                .list_documents(&self.collections.mentor_profiles, &queries)
                .await?;
            let received = page.documents.len();
            documents.extend(page.documents);

            if (documents.len() as u64) >= page.total {
                break;
            }
            if received == 0 {
                return Err(AppwriteError::InvalidResponse(format!(
                    "Listing of area {} ended after {} of {} mentors",
                    area_id,
                    documents.len(),
                    page.total
                )));
            }
        }

        documents
            .into_iter()
            .map(|doc| -> Result<MentorProfile, AppwriteError> {
                let record: MentorRecord = parse_record("mentor", doc)?;
                Ok(MentorProfile::try_from(record)?)
            })
            .collect()
    }
}

#[async_trait]
impl ProfileStore for AppwriteClient {
    async fn get_mentee(&self, mentee_id: &str) -> Result<MenteeProfile, StoreError> {
        Ok(self.fetch_mentee(mentee_id).await?)
    }

    async fn get_mentor(&self, mentor_id: &str) -> Result<MentorProfile, StoreError> {
        Ok(self.fetch_mentor(mentor_id).await?)
    }

    async fn list_mentors(&self, area_id: &str) -> Result<Vec<MentorProfile>, StoreError> {
        Ok(self.fetch_mentors(area_id).await?)
    }
}

/// Build the Appwrite queries selecting one page of the mentors of an area
fn mentor_area_queries(
    attribute: &str,
    area_id: &str,
    page_size: usize,
    offset: usize,
) -> Result<Vec<String>, AppwriteError> {
    let values = serde_json::to_string(&[area_id])
        .map_err(|e| AppwriteError::InvalidResponse(format!("Failed to encode query: {}", e)))?;

    Ok(vec![
        format!("equal(\"{}\", {})", attribute, values),
        format!("limit({})", page_size),
        format!("offset({})", offset),
    ])
}

/// Deserialize a raw document
///
/// A nested `data` object is unwrapped only when the document carries no id
/// of its own; otherwise `data` is an ordinary attribute.
fn parse_record<T>(kind: &'static str, doc: Value) -> Result<T, InvalidRecord>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let data = match doc {
        Value::Object(mut map)
            if !map.contains_key("$id")
                && !map.contains_key("id")
                && map.get("data").is_some_and(Value::is_object) =>
        {
            map.remove("data").unwrap_or_default()
        }
        other => other,
    };

    serde_json::from_value(data).map_err(|e| InvalidRecord::new(kind, e.to_string()))
}
