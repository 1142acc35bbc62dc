// Service exports
pub mod appwrite;
pub mod auth;
pub mod cache;
pub mod matching;
pub mod rate_limit;
pub mod store;

pub use appwrite::{AppwriteClient, AppwriteCollections, AppwriteError};
pub use auth::{bearer_token, AuthError, AuthVerifier, Caller, Claims, JwtVerifier};
pub use cache::{CacheError, CacheKey, CacheManager, CacheStats, CachedProfileStore};
pub use matching::{MatchError, MatchingService};
pub use rate_limit::{RateLimited, RateLimiter};
pub use store::{InMemoryProfileStore, ProfileStore, StoreError};
