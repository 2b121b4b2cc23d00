use super::Command;
use crate::config::Config;
use crate::error::{Result, WrapErr};
use lucy::RegexTokenizer;

pub struct SplitCommand {
    config: Config,
    text: String,
    pattern: Option<String>,
    json: bool,
}

impl SplitCommand {
    pub fn new(config: Config, text: String, pattern: Option<String>, json: bool) -> Self {
        Self {
            config,
            text,
            pattern,
            json,
        }
    }

    fn tokens(&self) -> Result<Vec<String>> {
        let pattern = self
            .pattern
            .as_deref()
            .unwrap_or(&self.config.indexer.default_pattern);
        let tokenizer = RegexTokenizer::new(pattern).context("Build tokenizer error")?;
        Ok(tokenizer.split(&self.text))
    }

    fn render(&self, tokens: &[String]) -> Result<String> {
        if self.json {
            Ok(serde_json::to_string(tokens)?)
        } else {
            Ok(tokens.join("\n"))
        }
    }
}

#[async_trait::async_trait]
impl Command for SplitCommand {
    async fn execute(&self) -> Result<()> {
        let tokens = self.tokens()?;
        if !tokens.is_empty() || self.json {
            println!("{}", self.render(&tokens)?);
        }
        Ok(())
    }
}
