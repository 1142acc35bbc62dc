use crate::models::{MatchOptions, ScoringWeights};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub appwrite: AppwriteSettings,
    pub collection: CollectionSettings,
    pub auth: AuthSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub rate_limit: RateLimitSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppwriteSettings {
    pub endpoint: String,
    pub api_key: String,
    pub project_id: String,
    pub database_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionSettings {
    pub mentee_profiles: String,
    pub mentor_profiles: String,
    #[serde(default = "default_mentor_area_attribute")]
    pub mentor_area_attribute: String,
}

fn default_mentor_area_attribute() -> String { "areaIds".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub issuer: Option<String>,
    pub audience: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub redis_url: Option<String>,
    pub ttl_secs: Option<u64>,
    pub l1_cache_size: Option<u64>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            redis_url: None,
            ttl_secs: None,
            l1_cache_size: None,
        }
    }
}

fn default_true() -> bool { true }

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitSettings {
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            window_secs: default_window_secs(),
        }
    }
}

fn default_max_requests() -> u32 { 60 }
fn default_window_secs() -> u64 { 60 }

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    /// Limit applied when a request names none; `None` returns every mentor
    pub default_limit: Option<u16>,
    #[serde(default = "default_max_limit")]
    pub max_limit: u16,
    #[serde(default)]
    pub dedupe_areas: bool,
    /// Mentor documents requested per listing page
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            default_limit: None,
            max_limit: default_max_limit(),
            dedupe_areas: false,
            page_size: default_page_size(),
        }
    }
}

fn default_max_limit() -> u16 { 100 }
fn default_page_size() -> usize { 100 }

impl MatchingSettings {
    /// Effective result limit for a request, capped at `max_limit`
    pub fn resolve_limit(&self, requested: Option<u16>) -> Option<usize> {
        requested
            .or(self.default_limit)
            .map(|limit| limit.min(self.max_limit) as usize)
    }

    pub fn options(&self) -> MatchOptions {
        MatchOptions {
            dedupe_areas: self.dedupe_areas,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_overlap_points")]
    pub overlap_points: f64,
    #[serde(default = "default_sessions_per_point")]
    pub sessions_per_point: f64,
    #[serde(default = "default_experience_cap")]
    pub experience_cap: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            overlap_points: default_overlap_points(),
            sessions_per_point: default_sessions_per_point(),
            experience_cap: default_experience_cap(),
        }
    }
}

fn default_overlap_points() -> f64 { 2.0 }
fn default_sessions_per_point() -> f64 { 5.0 }
fn default_experience_cap() -> f64 { 2.0 }

impl From<&WeightsConfig> for ScoringWeights {
    fn from(config: &WeightsConfig) -> Self {
        Self {
            overlap_points: config.overlap_points,
            sessions_per_point: config.sessions_per_point,
            experience_cap: config.experience_cap,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local configuration file (config/local.toml)
    /// 4. Environment variables (prefixed with MENTOR_MATCH)
    /// 5. Bare secret variables (APPWRITE_API_KEY, JWT_SECRET)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., MENTOR_MATCH__SERVER__PORT -> server.port
            .add_source(environment())
            .build()?;

        finish(settings, |name| std::env::var(name).ok())
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?;

        finish(settings, |name| std::env::var(name).ok())
    }

    /// Reject values the service cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Message("auth.jwt_secret must be set".into()));
        }

        let weights = &self.scoring.weights;
        if !(weights.sessions_per_point.is_finite() && weights.sessions_per_point > 0.0) {
            return Err(ConfigError::Message(
                "scoring.weights.sessions_per_point must be a positive number".into(),
            ));
        }
        if !weights.overlap_points.is_finite() || !weights.experience_cap.is_finite() {
            return Err(ConfigError::Message("scoring weights must be finite".into()));
        }

        if self.rate_limit.window_secs == 0 {
            return Err(ConfigError::Message("rate_limit.window_secs must be positive".into()));
        }

        if self.matching.max_limit == 0 || self.matching.default_limit == Some(0) {
            return Err(ConfigError::Message("matching limits must be at least 1".into()));
        }

        Ok(())
    }
}

fn environment() -> Environment {
    Environment::with_prefix("MENTOR_MATCH")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Apply secret overrides, deserialize and validate
fn finish<F>(settings: Config, lookup: F) -> Result<Settings, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let settings: Settings = apply_secret_overrides(settings, lookup)?.try_deserialize()?;
    settings.validate()?;
    Ok(settings)
}

/// Let the usual secret variables override config values
fn apply_secret_overrides<F>(settings: Config, lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut builder = Config::builder().add_source(settings);

    if let Some(api_key) = lookup("APPWRITE_API_KEY") {
        builder = builder.set_override("appwrite.api_key", api_key)?;
    }
    if let Some(secret) = lookup("JWT_SECRET") {
        builder = builder.set_override("auth.jwt_secret", secret)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    const MINIMAL: &str = r#"
        [server]
        host = "127.0.0.1"
        port = 8080

        [appwrite]
        endpoint = "https://appwrite.test/v1"
        api_key = "key"
        project_id = "project"
        database_id = "db"

        [collection]
        mentee_profiles = "mentees"
        mentor_profiles = "mentors"

        [auth]
        jwt_secret = "secret"
    "#;

    fn parse(toml: &str) -> Result<Settings, ConfigError> {
        let settings: Settings = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    #[test]
    fn test_default_weights() {
        let weights = WeightsConfig::default();
        assert_eq!(weights.overlap_points, 2.0);
        assert_eq!(weights.sessions_per_point, 5.0);
        assert_eq!(weights.experience_cap, 2.0);
        assert_eq!(ScoringWeights::from(&weights), ScoringWeights::default());
    }

    #[test]
    fn test_default_logging() {
        let logging = LoggingSettings::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, "json");
    }

    #[test]
    fn test_minimal_config_fills_defaults() {
        let settings = parse(MINIMAL).unwrap();

        assert_eq!(settings.collection.mentor_area_attribute, "areaIds");
        assert!(settings.cache.enabled);
        assert_eq!(settings.cache.redis_url, None);
        assert_eq!(settings.rate_limit.max_requests, 60);
        assert_eq!(settings.matching.max_limit, 100);
        assert!(!settings.matching.dedupe_areas);
        assert_eq!(settings.scoring.weights.overlap_points, 2.0);
    }

    #[test]
    fn test_empty_secret_rejected() {
        let toml = MINIMAL.replace(r#"jwt_secret = "secret""#, r#"jwt_secret = """#);
        assert!(parse(&toml).is_err());
    }

    #[test]
    fn test_non_positive_sessions_per_point_rejected() {
        let toml = format!("{}\n[scoring.weights]\nsessions_per_point = 0.0\n", MINIMAL);
        assert!(parse(&toml).is_err());
    }

    #[test]
    fn test_secret_overrides() {
        let toml = MINIMAL.replace(r#"jwt_secret = "secret""#, r#"jwt_secret = """#);
        let config = Config::builder()
            .add_source(File::from_str(&toml, FileFormat::Toml))
            .build()
            .unwrap();

        let settings = finish(config, |name| match name {
            "APPWRITE_API_KEY" => Some("from-env-key".to_string()),
            "JWT_SECRET" => Some("from-env-secret".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(settings.appwrite.api_key, "from-env-key");
        assert_eq!(settings.auth.jwt_secret, "from-env-secret");
    }

    #[test]
    fn test_file_values_kept_without_overrides() {
        let config = Config::builder()
            .add_source(File::from_str(MINIMAL, FileFormat::Toml))
            .build()
            .unwrap();

        let settings = finish(config, |_| None).unwrap();

        assert_eq!(settings.appwrite.api_key, "key");
        assert_eq!(settings.auth.jwt_secret, "secret");
    }

    #[test]
    fn test_zero_limits_rejected() {
        let toml = format!("{}\n[matching]\nmax_limit = 0\n", MINIMAL);
        assert!(parse(&toml).is_err());

        let toml = format!("{}\n[matching]\ndefault_limit = 0\n", MINIMAL);
        assert!(parse(&toml).is_err());

        let toml = format!("{}\n[matching]\ndefault_limit = 1\nmax_limit = 1\n", MINIMAL);
        assert!(parse(&toml).is_ok());
    }

    #[test]
    fn test_resolve_limit() {
        let mut matching = MatchingSettings::default();

        assert_eq!(matching.resolve_limit(None), None);
        assert_eq!(matching.resolve_limit(Some(10)), Some(10));

        matching.default_limit = Some(20);
        matching.max_limit = 15;
        assert_eq!(matching.resolve_limit(None), Some(15));
        assert_eq!(matching.resolve_limit(Some(5)), Some(5));
        assert_eq!(matching.resolve_limit(Some(50)), Some(15));
    }
}
