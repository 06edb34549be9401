use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    pub data_dir: PathBuf,
    /// Transient match exports land here and are deleted after download.
    pub export_dir: PathBuf,
    /// Append-only CSV log of every analyzed job description.
    pub archive_path: PathBuf,
    pub skills_map_path: PathBuf,
    pub export_max_age_hours: u64,
    pub export_sweep_interval_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let data_dir = PathBuf::from(optional_env("DATA_DIR").unwrap_or_else(|| "data".into()));

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            redis_url: require_env("REDIS_URL")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: parse_env("PORT", 8080)?,
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            export_dir: optional_env("EXPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| data_dir.join("matched_candidates")),
            archive_path: optional_env("ARCHIVE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| data_dir.join("job_descriptions.csv")),
            skills_map_path: optional_env("SKILLS_MAP_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| data_dir.join("skills_map.json")),
            export_max_age_hours: parse_env("EXPORT_MAX_AGE_HOURS", 24)?,
            export_sweep_interval_secs: parse_env("EXPORT_SWEEP_INTERVAL_SECS", 3600)?,
            data_dir,
        })
    }

    /// Creates the data and export directories if they do not exist yet.
    pub fn ensure_data_dirs(&self) -> Result<()> {
        for dir in [&self.data_dir, &self.export_dir] {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        Ok(())
    }

    pub fn export_max_age(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.export_max_age_hours * 3600)
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_data_dirs_creates_nested_directories() {
        let root = tempfile::tempdir().unwrap();
        let data_dir = root.path().join("data");
        let config = Config {
            database_url: String::new(),
            redis_url: String::new(),
            anthropic_api_key: String::new(),
            port: 0,
            rust_log: "info".to_string(),
            export_dir: data_dir.join("matched_candidates"),
            archive_path: data_dir.join("job_descriptions.csv"),
            skills_map_path: data_dir.join("skills_map.json"),
            export_max_age_hours: 24,
            export_sweep_interval_secs: 3600,
            data_dir: data_dir.clone(),
        };

        config.ensure_data_dirs().unwrap();
        assert!(data_dir.is_dir());
        assert!(config.export_dir.is_dir());
        // idempotent
        config.ensure_data_dirs().unwrap();
    }

    #[test]
    fn test_parse_env_falls_back_to_default_when_unset() {
        let value: u64 = parse_env("JD_MATCH_TEST_SURELY_UNSET_VAR", 24).unwrap();
        assert_eq!(value, 24);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("JD_MATCH_TEST_GARBAGE_PORT", "not-a-port");
        let result: Result<u16> = parse_env("JD_MATCH_TEST_GARBAGE_PORT", 8080);
        assert!(result.is_err());
        std::env::remove_var("JD_MATCH_TEST_GARBAGE_PORT");
    }

    #[test]
    fn test_blank_optional_env_is_treated_as_unset() {
        std::env::set_var("JD_MATCH_TEST_BLANK", "   ");
        assert!(optional_env("JD_MATCH_TEST_BLANK").is_none());
        std::env::remove_var("JD_MATCH_TEST_BLANK");
    }
}
