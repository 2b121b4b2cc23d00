// lucy/src/schema/field_type.rs
//! Field types

use crate::tokenizer::RegexTokenizer;

/// How a field is indexed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// Tokenized text, positions recorded.
    FullText { tokenizer: RegexTokenizer, stored: bool },
    /// A single untokenized term, for identifiers and exact matching.
    String { stored: bool },
    /// Signed 64-bit integer, indexed and fast.
    Integer { stored: bool },
}

impl FieldType {
    /// Stored full-text field using the default word tokenizer.
    pub fn full_text() -> Self {
        FieldType::FullText {
            tokenizer: RegexTokenizer::default(),
            stored: true,
        }
    }

    pub fn full_text_with(tokenizer: RegexTokenizer) -> Self {
        FieldType::FullText {
            tokenizer,
            stored: true,
        }
    }

    pub fn string() -> Self {
        FieldType::String { stored: true }
    }

    pub fn integer() -> Self {
        FieldType::Integer { stored: true }
    }

    pub fn is_stored(&self) -> bool {
        match self {
            FieldType::FullText { stored, .. }
            | FieldType::String { stored }
            | FieldType::Integer { stored } => *stored,
        }
    }

    /// Same type, with stored set to `stored`.
    pub fn stored(mut self, stored: bool) -> Self {
        match &mut self {
            FieldType::FullText { stored: s, .. }
            | FieldType::String { stored: s }
            | FieldType::Integer { stored: s } => *s = stored,
        }
        self
    }

    pub fn is_text(&self) -> bool {
        matches!(self, FieldType::FullText { .. } | FieldType::String { .. })
    }

    /// Short name used in logs and the command line.
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::FullText { .. } => "fulltext",
            FieldType::String { .. } => "string",
            FieldType::Integer { .. } => "integer",
        }
    }
}
