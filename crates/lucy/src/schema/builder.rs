// lucy/src/schema/builder.rs
//! Schema
//!
//! An ordered set of named field definitions. Converted into the engine's
//! schema when an index is created, and recovered from it when an existing
//! index is opened.

use tantivy::Index;
use tantivy::schema::{
    self as engine, IndexRecordOption, NumericOptions, STORED, STRING, TextFieldIndexing,
    TextOptions,
};

use super::field_type::FieldType;
use crate::error::{EngineError, EngineErrorKind, Error, Result};
use crate::tokenizer::RegexTokenizer;

/// Tokenizer name the engine uses for untokenized text.
const RAW_TOKENIZER: &str = "raw";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<(String, FieldType)>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a field.
    ///
    /// Field names must be non-empty and unique within the schema.
    pub fn spec_field(&mut self, name: impl Into<String>, field_type: FieldType) -> Result<()> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::invalid_argument("field name must not be empty"));
        }
        if self.field_type(&name).is_some() {
            return Err(Error::invalid_argument(format!("field `{name}` is already defined")));
        }
        self.fields.push((name, field_type));
        Ok(())
    }

    pub fn field_type(&self, name: &str) -> Option<&FieldType> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, ty)| ty)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldType)> {
        self.fields.iter().map(|(n, ty)| (n.as_str(), ty))
    }

    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Build the engine schema.
    pub(crate) fn to_engine(&self) -> engine::Schema {
        let mut builder = engine::Schema::builder();

        for (name, field_type) in &self.fields {
            match field_type {
                FieldType::FullText { tokenizer, stored } => {
                    let indexing = TextFieldIndexing::default()
                        .set_tokenizer(&tokenizer.engine_name())
                        .set_index_option(IndexRecordOption::WithFreqsAndPositions);
                    let mut options = TextOptions::default().set_indexing_options(indexing);
                    if *stored {
                        options = options.set_stored();
                    }
                    builder.add_text_field(name, options);
                }
                FieldType::String { stored } => {
                    let options = if *stored { STRING | STORED } else { STRING };
                    builder.add_text_field(name, options);
                }
                FieldType::Integer { stored } => {
                    let mut options = NumericOptions::default().set_indexed().set_fast();
                    if *stored {
                        options = options.set_stored();
                    }
                    builder.add_i64_field(name, options);
                }
            }
        }

        builder.build()
    }

    /// Recover a schema from an engine schema.
    ///
    /// Fields whose engine type has no counterpart here are skipped. A stored
    /// tokenizer pattern that no longer compiles is an engine error of kind
    /// [`EngineErrorKind::SchemaMismatch`]: the fault lies with the index, not
    /// with the caller.
    pub(crate) fn from_engine(schema: &engine::Schema) -> Result<Self> {
        let mut fields = Vec::new();

        for (_, entry) in schema.fields() {
            let name = entry.name();
            let field_type = match entry.field_type() {
                engine::FieldType::Str(options) => {
                    let stored = options.is_stored();
                    match options.get_indexing_options().map(|i| i.tokenizer()) {
                        Some(RAW_TOKENIZER) => Some(FieldType::String { stored }),
                        Some(tokenizer_name) => RegexTokenizer::from_engine_name(tokenizer_name)
                            .transpose()
                            .map_err(|e| stored_tokenizer_error(name, e))?
                            .map(|tokenizer| FieldType::FullText { tokenizer, stored }),
                        None => None,
                    }
                }
                engine::FieldType::I64(options) => Some(FieldType::Integer {
                    stored: options.is_stored(),
                }),
                _ => None,
            };

            match field_type {
                Some(field_type) => fields.push((name.to_string(), field_type)),
                None => tracing::warn!(field = name, "skipping field with unsupported engine type"),
            }
        }

        Ok(Self { fields })
    }

    /// Register every regex tokenizer used by this schema with `index`.
    pub(crate) fn register_tokenizers(&self, index: &Index) {
        for (_, field_type) in &self.fields {
            if let FieldType::FullText { tokenizer, .. } = field_type {
                index
                    .tokenizers()
                    .register(&tokenizer.engine_name(), tokenizer.clone());
            }
        }
    }
}

fn stored_tokenizer_error(field: &str, err: Error) -> Error {
    let message = format!("field `{field}` has an unusable stored tokenizer: {err}");
    tracing::warn!(field, "{}", message);
    EngineError::new("read index schema", EngineErrorKind::SchemaMismatch, message)
        .with_source(err)
        .into()
}
