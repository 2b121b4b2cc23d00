use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Increase verbosity. Can be used multiple times (e.g., -v, -vv, -vvv).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an index with the given fields
    Create {
        /// Index directory (falls back to `default-index` from the config file)
        index: Option<PathBuf>,
        /// Field definition `name:type[:unstored]`, type is fulltext, string or integer
        #[arg(short, long = "field", value_parser = parse_field_spec, required = true)]
        fields: Vec<FieldSpec>,
        /// Tokenizer pattern for fulltext fields
        #[arg(short, long)]
        pattern: Option<String>,
        /// Drop existing documents
        #[arg(long)]
        truncate: bool,
    },
    /// Open an existing index and describe it
    Open {
        index: Option<PathBuf>,
    },
    /// Add JSON documents to an index and commit
    Add {
        #[arg(short, long)]
        index: Option<PathBuf>,
        /// One JSON object per document, e.g. '{"id": "a", "year": 2001}'
        #[arg(required = true)]
        docs: Vec<String>,
    },
    /// Split text into tokens
    Split {
        text: String,
        /// Tokenizer pattern (defaults to `default-pattern` from the config file)
        #[arg(short, long)]
        pattern: Option<String>,
        /// Print the tokens as a JSON array
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    FullText,
    String,
    Integer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    pub stored: bool,
}

fn parse_field_spec(s: &str) -> Result<FieldSpec, String> {
    let mut parts = s.split(':');
    let name = parts.next().unwrap_or_default();
    if name.is_empty() {
        return Err(format!("missing field name in `{s}`"));
    }
    let kind = match parts.next() {
        Some("fulltext") | Some("text") => FieldKind::FullText,
        Some("string") => FieldKind::String,
        Some("integer") | Some("int") => FieldKind::Integer,
        Some(other) => return Err(format!("unknown field type `{other}`")),
        None => return Err(format!("missing field type in `{s}`")),
    };
    let stored = match parts.next() {
        None => true,
        Some("unstored") => false,
        Some(other) => return Err(format!("unknown field flag `{other}`")),
    };
    if parts.next().is_some() {
        return Err(format!("too many `:` in `{s}`"));
    }
    Ok(FieldSpec {
        name: name.to_string(),
        kind,
        stored,
    })
}
