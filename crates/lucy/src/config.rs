// lucy/src/config.rs
//! 配置模块

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::tokenizer::DEFAULT_PATTERN;

/// Smallest writer heap the engine accepts.
pub const MIN_MEMORY_BUDGET: usize = 15_000_000;

/// Largest writer heap the engine accepts for a single indexing thread.
pub const MAX_MEMORY_BUDGET: usize = u32::MAX as usize - 1_000_000;

/// Indexer configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct IndexerConfig {
    /// Writer heap budget in bytes.
    pub memory_budget: usize,
    /// Pattern used when no tokenizer pattern is given.
    pub default_pattern: String,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            memory_budget: 50_000_000,
            default_pattern: DEFAULT_PATTERN.to_string(),
        }
    }
}

impl IndexerConfig {
    /// 从 TOML 文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::load_str(&content).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// 尝试加载配置，失败则使用默认值
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        Self::load_from_file(path).unwrap_or_default()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config = IndexerConfig::load_str("memory-budget = 20000000").unwrap();
        assert_eq!(config.memory_budget, 20_000_000);
        assert_eq!(config.default_pattern, DEFAULT_PATTERN);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "default-pattern = '\\S+'").unwrap();
        let config = IndexerConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.default_pattern, r"\S+");
    }

    #[test]
    fn test_load_or_default_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = IndexerConfig::load_or_default(dir.path().join("missing.toml"));
        assert_eq!(config, IndexerConfig::default());
    }

    #[test]
    fn test_load_from_file_reports_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "memory-budget = \"lots\"").unwrap();
        let err = IndexerConfig::load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));
        assert!(!err.is_engine());
    }
}
