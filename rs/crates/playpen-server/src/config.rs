use std::path::PathBuf;

use crate::store::BackendKind;

/// Server settings, read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub backend: BackendKind,
    /// Directory for the `fs` backend
    pub snippets_dir: PathBuf,
    /// Database file for the `sqlite` backend
    pub db_path: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let env_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let port = env_or("PORT", "3001")
            .parse::<u16>()
            .map_err(|e| format!("invalid PORT: {}", e))?;
        let backend = env_or("PLAYPEN_BACKEND", "fs").parse::<BackendKind>()?;

        Ok(Self {
            port,
            backend,
            snippets_dir: PathBuf::from(env_or("SNIPPETS_DIR", "snippets")),
            db_path: env_or("DB_PATH", "playpen.db"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.port, 3001);
        assert_eq!(cfg.backend, BackendKind::Fs);
        assert_eq!(cfg.snippets_dir, PathBuf::from("snippets"));
        assert_eq!(cfg.db_path, "playpen.db");
    }

    #[test]
    fn test_overrides() {
        let cfg = config(&[("PORT", "8080"), ("PLAYPEN_BACKEND", "sqlite"), ("DB_PATH", "/tmp/x.db")]).unwrap();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.backend, BackendKind::Sqlite);
        assert_eq!(cfg.db_path, "/tmp/x.db");
    }

    #[test]
    fn test_bad_values() {
        assert!(config(&[("PORT", "http")]).is_err());
        assert!(config(&[("PLAYPEN_BACKEND", "redis")]).is_err());
    }
}
