use super::{Command, blocking};
use crate::cli::{FieldKind, FieldSpec};
use crate::config::Config;
use crate::error::{Result, WrapErr};
use lucy::{FieldType, OpenIndexerArgs, RegexTokenizer, Schema, open_indexer};
use std::path::PathBuf;

pub struct CreateCommand {
    config: Config,
    index: Option<PathBuf>,
    fields: Vec<FieldSpec>,
    pattern: Option<String>,
    truncate: bool,
}

impl CreateCommand {
    pub fn new(
        config: Config,
        index: Option<PathBuf>,
        fields: Vec<FieldSpec>,
        pattern: Option<String>,
        truncate: bool,
    ) -> Self {
        Self {
            config,
            index,
            fields,
            pattern,
            truncate,
        }
    }

    fn build_schema(&self) -> Result<Schema> {
        let pattern = self
            .pattern
            .as_deref()
            .unwrap_or(&self.config.indexer.default_pattern);
        let tokenizer = RegexTokenizer::new(pattern).context("Build tokenizer error")?;

        let mut schema = Schema::new();
        for spec in &self.fields {
            let field_type = match spec.kind {
                FieldKind::FullText => FieldType::full_text_with(tokenizer.clone()),
                FieldKind::String => FieldType::string(),
                FieldKind::Integer => FieldType::integer(),
            };
            schema.spec_field(spec.name.clone(), field_type.stored(spec.stored))?;
        }
        Ok(schema)
    }
}

#[async_trait::async_trait]
impl Command for CreateCommand {
    async fn execute(&self) -> Result<()> {
        let index = self.config.resolve_index(self.index.clone())?;
        let args = OpenIndexerArgs::from_config(&index, &self.config.indexer)
            .schema(self.build_schema()?)
            .create(true)
            .truncate(self.truncate);

        blocking(move || {
            let mut indexer = open_indexer(&args)?;
            indexer.commit()
        })
        .await
        .wrap_err_with(|| format!("Create index {} error", index.display()))?;

        println!("Created index {}", index.display());
        Ok(())
    }
}
