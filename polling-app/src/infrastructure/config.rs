use polling_errors::AppError;
use std::path::PathBuf;
use url::Url;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const DEFAULT_STORAGE_DIR: &str = ".polling";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    pub poll_page_size: u32,
    pub user_page_size: u32,
    /// Directory standing in for the browser's per-origin storage.
    pub storage_dir: PathBuf,
}

impl ClientConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            poll_page_size: DEFAULT_PAGE_SIZE,
            user_page_size: DEFAULT_PAGE_SIZE,
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
        }
    }

    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let raw_url = lookup("POLLING_BASE_URL")
            .ok_or_else(|| AppError::Config("POLLING_BASE_URL must be set".to_string()))?;
        let base_url = Url::parse(raw_url.trim())
            .map_err(|e| AppError::Config(format!("POLLING_BASE_URL is not a valid URL: {e}")))?;

        let mut config = Self::new(base_url);
        if let Some(size) = parse_page_size(&lookup, "POLLING_POLL_PAGE_SIZE")? {
            config.poll_page_size = size;
        }
        if let Some(size) = parse_page_size(&lookup, "POLLING_USER_PAGE_SIZE")? {
            config.user_page_size = size;
        }
        if let Some(dir) = lookup("POLLING_STORAGE_DIR").filter(|d| !d.trim().is_empty()) {
            config.storage_dir = PathBuf::from(dir);
        }
        Ok(config)
    }
}

fn parse_page_size(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<u32>, AppError> {
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    match raw.trim().parse::<u32>() {
        Ok(size) if size > 0 => Ok(Some(size)),
        _ => Err(AppError::Config(format!(
            "{key} must be a positive integer, got {raw:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config =
            ClientConfig::from_lookup(lookup(&[("POLLING_BASE_URL", "http://localhost:3000")]))
                .unwrap();
        assert_eq!(config.poll_page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.user_page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.storage_dir, PathBuf::from(DEFAULT_STORAGE_DIR));
    }

    #[test]
    fn test_overrides() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("POLLING_BASE_URL", "https://polls.example.com/api"),
            ("POLLING_POLL_PAGE_SIZE", "2"),
            ("POLLING_USER_PAGE_SIZE", "25"),
            ("POLLING_STORAGE_DIR", "/tmp/polls"),
        ]))
        .unwrap();
        assert_eq!(config.poll_page_size, 2);
        assert_eq!(config.user_page_size, 25);
        assert_eq!(config.storage_dir, PathBuf::from("/tmp/polls"));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            ClientConfig::from_lookup(lookup(&[])),
            Err(AppError::Config(_))
        ));
        assert!(ClientConfig::from_lookup(lookup(&[("POLLING_BASE_URL", "not a url")])).is_err());
        assert!(ClientConfig::from_lookup(lookup(&[
            ("POLLING_BASE_URL", "http://localhost"),
            ("POLLING_POLL_PAGE_SIZE", "0"),
        ]))
        .is_err());
    }
}
