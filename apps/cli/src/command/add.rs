use super::{Command, blocking};
use crate::config::Config;
use crate::error::{Result, WrapErr};
use lucy::{Doc, OpenIndexerArgs, open_indexer};
use std::path::PathBuf;

pub struct AddCommand {
    config: Config,
    index: Option<PathBuf>,
    docs: Vec<String>,
}

impl AddCommand {
    pub fn new(config: Config, index: Option<PathBuf>, docs: Vec<String>) -> Self {
        Self { config, index, docs }
    }

    fn parse_docs(&self) -> Result<Vec<Doc>> {
        self.docs
            .iter()
            .enumerate()
            .map(|(i, raw)| {
                serde_json::from_str::<Doc>(raw).wrap_err_with(|| format!("Parse document #{} error", i + 1))
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl Command for AddCommand {
    async fn execute(&self) -> Result<()> {
        let index = self.config.resolve_index(self.index.clone())?;
        let docs = self.parse_docs()?;
        let count = docs.len();
        let args = OpenIndexerArgs::from_config(&index, &self.config.indexer);

        let opstamp = blocking(move || {
            let mut indexer = open_indexer(&args)?;
            for doc in docs {
                indexer.add_doc(doc)?;
            }
            indexer.commit()
        })
        .await
        .wrap_err_with(|| format!("Add documents to {} error", index.display()))?;

        tracing::debug!(opstamp, "documents committed");
        println!("Added {count} document(s) to {}", index.display());
        Ok(())
    }
}
