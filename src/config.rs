use std::path::PathBuf;

use anyhow::Result;

use crate::storage::StorageHandle;

pub const APP_IDENTIFIER: &str = "com.budgetforge.app";
pub const DATA_DIR_ENV: &str = "BUDGET_FORGE_DATA_DIR";
pub const LOG_FILTER_ENV: &str = "BUDGET_FORGE_LOG";
pub const DEFAULT_LOG_FILTER: &str = "budget_forge=info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Directory holding the state slot and the `logs/` folder.
    pub data_dir: PathBuf,
    pub log_filter: String,
    pub file_logging: bool,
}

impl AppConfig {
    /// Resolve from the `--data-dir` flag, then the environment, then the
    /// platform data directory.
    pub fn resolve(data_dir_flag: Option<PathBuf>) -> Result<Self> {
        Self::resolve_with(
            data_dir_flag,
            std::env::var(DATA_DIR_ENV).ok(),
            std::env::var(LOG_FILTER_ENV).ok(),
        )
    }

    pub fn resolve_with(
        data_dir_flag: Option<PathBuf>,
        data_dir_env: Option<String>,
        log_filter_env: Option<String>,
    ) -> Result<Self> {
        let data_dir = match (data_dir_flag, data_dir_env.filter(|v| !v.trim().is_empty())) {
            (Some(flag), _) => flag,
            (None, Some(env)) => PathBuf::from(env),
            (None, None) => default_data_dir()?,
        };
        let log_filter = log_filter_env
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
        Ok(Self {
            data_dir,
            log_filter,
            file_logging: true,
        })
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }

    pub fn storage(&self) -> StorageHandle {
        StorageHandle::file(&self.data_dir)
    }
}

fn default_data_dir() -> Result<PathBuf> {
    let base = dirs::data_dir()
        .or_else(|| std::env::current_dir().ok())
        .ok_or_else(|| anyhow::anyhow!("failed to resolve application data directory"))?;
    Ok(base.join(APP_IDENTIFIER))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_wins_over_environment() {
        let config = AppConfig::resolve_with(
            Some(PathBuf::from("/flag")),
            Some("/env".into()),
            None,
        )
        .expect("config");
        assert_eq!(config.data_dir, PathBuf::from("/flag"));
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
        assert_eq!(config.logs_dir(), PathBuf::from("/flag/logs"));
    }

    #[test]
    fn environment_used_without_flag() {
        let config =
            AppConfig::resolve_with(None, Some("/env".into()), Some("budget_forge=debug".into()))
                .expect("config");
        assert_eq!(config.data_dir, PathBuf::from("/env"));
        assert_eq!(config.log_filter, "budget_forge=debug");
    }

    #[test]
    fn blank_environment_falls_back_to_platform_dir() {
        let config = AppConfig::resolve_with(None, Some("  ".into()), Some(String::new()))
            .expect("config");
        assert!(config.data_dir.ends_with(APP_IDENTIFIER));
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
    }
}
