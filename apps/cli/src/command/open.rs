use super::{Command, blocking};
use crate::config::Config;
use crate::error::{Result, eyre};
use lucy::{OpenIndexerArgs, open_indexer};
use std::path::PathBuf;

pub struct OpenCommand {
    config: Config,
    index: Option<PathBuf>,
}

impl OpenCommand {
    pub fn new(config: Config, index: Option<PathBuf>) -> Self {
        Self { config, index }
    }
}

#[async_trait::async_trait]
impl Command for OpenCommand {
    async fn execute(&self) -> Result<()> {
        let index = self.config.resolve_index(self.index.clone())?;
        let args = OpenIndexerArgs::from_config(&index, &self.config.indexer);

        let result = blocking(move || {
            let indexer = open_indexer(&args)?;
            let fields: Vec<(String, &'static str, bool)> = indexer
                .schema()
                .fields()
                .map(|(name, ty)| (name.to_string(), ty.name(), ty.is_stored()))
                .collect();
            Ok((fields, indexer.doc_count()?))
        })
        .await;

        let (fields, doc_count) = match result {
            Ok(described) => described,
            Err(report) => {
                return match report.downcast_ref::<lucy::Error>().and_then(lucy::Error::as_engine) {
                    Some(engine) => Err(eyre!(
                        "{} is not a usable index ({}): {}",
                        index.display(),
                        engine.kind(),
                        engine.message()
                    )),
                    None => Err(report),
                };
            }
        };

        println!("Index {}", index.display());
        println!("  documents: {doc_count}");
        for (name, kind, stored) in fields {
            let stored = if stored { "stored" } else { "unstored" };
            println!("  {name}: {kind} ({stored})");
        }
        Ok(())
    }
}
