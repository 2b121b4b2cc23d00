use crate::error::{OptionExt, Result};
use lucy::IndexerConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use config::{cli_config_path, create_strategy};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Config {
    /// Index used when a command is given none
    pub default_index: Option<PathBuf>,
    pub indexer: IndexerConfig,
}

impl Config {
    fn load_str(user_config_str: &str) -> Result<Config> {
        let user_config: Config = toml::from_str(user_config_str)?;
        Ok(user_config)
    }

    pub fn load() -> Result<Config> {
        let config_path = match std::env::var_os("LUCY_CONFIG") {
            Some(path) => PathBuf::from(path),
            None => cli_config_path(&create_strategy()?),
        };

        match std::fs::read_to_string(&config_path) {
            Ok(user_config_str) => Self::load_str(&user_config_str),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // 配置文件不存在，创建示例配置文件
                Self::create_example_config(&config_path)?;
                Self::load_str("")
            }
            Err(e) => Err(e.into()),
        }
    }

    /// The index given on the command line, or the configured default.
    pub fn resolve_index(&self, index: Option<PathBuf>) -> Result<PathBuf> {
        index
            .or_else(|| self.default_index.clone())
            .ok_or_eyre("no index given and no `default-index` configured")
    }

    fn create_example_config(config_path: &Path) -> Result<()> {
        use std::io::Write;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let example_config = r#"# lucy configuration
#
# Created on first run.

# Index used when a command is not given one
# default-index = "/var/lib/lucy/main"

[indexer]
# Writer heap budget in bytes (at least 15000000)
# memory-budget = 50000000

# Tokenizer pattern for `split` and for fulltext fields created without --pattern
# default-pattern = '''\w+(?:[\x{2019}']\w+)*'''
"#;

        let mut file = std::fs::File::create(config_path)?;
        file.write_all(example_config.as_bytes())?;

        tracing::info!(path = %config_path.display(), "created example configuration");
        Ok(())
    }
}
