// lucy/src/indexer.rs
//! 索引模块 - indexer lifecycle
//!
//! [`open_indexer`] validates its arguments locally, then hands the location
//! to the engine. Everything the engine rejects comes back as
//! [`Error::Engine`](crate::Error::Engine).

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tantivy::directory::MmapDirectory;
use tantivy::schema::Field;
use tantivy::{Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, Term};

use crate::config::{IndexerConfig, MAX_MEMORY_BUDGET, MIN_MEMORY_BUDGET};
use crate::document::{Doc, Value};
use crate::engine::guard;
use crate::error::{EngineError, EngineErrorKind, Error, Result};
use crate::schema::{FieldType, Schema};

/// Arguments for [`open_indexer`].
#[derive(Debug, Clone)]
pub struct OpenIndexerArgs {
    /// Location of the index. Required.
    pub index: PathBuf,
    /// Required with `create`. For an existing index it must match the
    /// stored schema.
    pub schema: Option<Schema>,
    /// Create the directory and the index if they do not exist.
    pub create: bool,
    /// Drop all existing documents at the next commit.
    pub truncate: bool,
    /// Writer heap budget in bytes.
    pub memory_budget: usize,
}

impl Default for OpenIndexerArgs {
    fn default() -> Self {
        Self::from_config(PathBuf::new(), &IndexerConfig::default())
    }
}

impl OpenIndexerArgs {
    pub fn new(index: impl Into<PathBuf>) -> Self {
        Self {
            index: index.into(),
            ..Self::default()
        }
    }

    pub fn from_config(index: impl Into<PathBuf>, config: &IndexerConfig) -> Self {
        Self {
            index: index.into(),
            schema: None,
            create: false,
            truncate: false,
            memory_budget: config.memory_budget,
        }
    }

    pub fn schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn create(mut self, create: bool) -> Self {
        self.create = create;
        self
    }

    pub fn truncate(mut self, truncate: bool) -> Self {
        self.truncate = truncate;
        self
    }

    pub fn memory_budget(mut self, memory_budget: usize) -> Self {
        self.memory_budget = memory_budget;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.index.as_os_str().is_empty() {
            return Err(Error::invalid_argument("`index` must not be empty"));
        }
        if self.memory_budget < MIN_MEMORY_BUDGET {
            return Err(Error::invalid_argument(format!(
                "memory budget {} is below the minimum of {}",
                self.memory_budget, MIN_MEMORY_BUDGET
            )));
        }
        if self.memory_budget > MAX_MEMORY_BUDGET {
            return Err(Error::invalid_argument(format!(
                "memory budget {} is above the maximum of {}",
                self.memory_budget, MAX_MEMORY_BUDGET
            )));
        }
        if self.create {
            match &self.schema {
                None => return Err(Error::invalid_argument("creating an index requires a schema")),
                Some(schema) if schema.is_empty() => {
                    return Err(Error::invalid_argument("schema has no fields"));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

/// Open an indexer on `args.index`.
pub fn open_indexer(args: &OpenIndexerArgs) -> Result<Indexer> {
    Indexer::open(args)
}

/// A writable handle on an index.
///
/// Holds the engine's writer lock until dropped. Changes become visible and
/// durable only after [`Indexer::commit`]; dropping the handle discards
/// anything uncommitted.
pub struct Indexer {
    index: Index,
    writer: IndexWriter,
    schema: Schema,
    fields: HashMap<String, Field>,
    path: PathBuf,
}

impl Indexer {
    pub fn open(args: &OpenIndexerArgs) -> Result<Self> {
        args.validate()?;
        let path = args.index.as_path();
        tracing::debug!(path = %path.display(), create = args.create, truncate = args.truncate, "opening indexer");

        let index = if args.create {
            // validate() guarantees a schema here
            let schema = args
                .schema
                .as_ref()
                .ok_or_else(|| Error::invalid_argument("creating an index requires a schema"))?;
            guard("create index directory", || fs::create_dir_all(path))?;
            let directory = guard("open index directory", || MmapDirectory::open(path))?;
            let engine_schema = schema.to_engine();
            guard("open or create index", || Index::open_or_create(directory, engine_schema))?
        } else {
            let directory = guard("open index directory", || MmapDirectory::open(path))?;
            if !guard("probe index", || Index::exists(&directory))? {
                let err = EngineError::new(
                    "open index",
                    EngineErrorKind::NotAnIndex,
                    format!("no index found in {}", path.display()),
                );
                tracing::warn!(path = %path.display(), "{}", err.message());
                return Err(err.into());
            }
            guard("open index", || Index::open(directory))?
        };

        let schema = Schema::from_engine(&index.schema())?;
        if let Some(expected) = &args.schema {
            if *expected != schema {
                return Err(EngineError::new(
                    "open index",
                    EngineErrorKind::SchemaMismatch,
                    "the stored schema does not match the supplied schema",
                )
                .into());
            }
        }
        schema.register_tokenizers(&index);

        let engine_schema = index.schema();
        let mut fields = HashMap::with_capacity(schema.num_fields());
        for name in schema.field_names() {
            let field = guard("resolve field", || engine_schema.get_field(name))?;
            fields.insert(name.to_string(), field);
        }

        let writer: IndexWriter = guard("acquire index writer", || index.writer(args.memory_budget))?;
        if args.truncate {
            guard("truncate index", || writer.delete_all_documents())?;
            tracing::debug!(path = %path.display(), "index truncated, pending commit");
        }

        tracing::info!(path = %path.display(), fields = schema.num_fields(), "indexer opened");
        Ok(Self {
            index,
            writer,
            schema,
            fields,
            path: path.to_path_buf(),
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Queue `doc` for indexing.
    ///
    /// Every field of `doc` must be defined in the schema with a matching
    /// type; nothing is queued otherwise.
    pub fn add_doc(&mut self, doc: Doc) -> Result<()> {
        if doc.is_empty() {
            return Err(Error::invalid_argument("document has no fields"));
        }

        let mut engine_doc = TantivyDocument::default();
        for (name, value) in doc.iter() {
            let (field, field_type) = self.lookup(name)?;
            match (field_type, value) {
                (ty, Value::Text(text)) if ty.is_text() => engine_doc.add_text(field, text),
                (FieldType::Integer { .. }, Value::Integer(n)) => engine_doc.add_i64(field, *n),
                (ty, value) => {
                    return Err(Error::invalid_argument(format!(
                        "field `{name}` is {} but got {} value",
                        ty.name(),
                        value.kind()
                    )));
                }
            }
        }

        guard("add document", || self.writer.add_document(engine_doc))?;
        Ok(())
    }

    /// Queue deletion of every document whose `field` holds `term`.
    pub fn delete_by_term(&mut self, field: &str, term: impl Into<Value>) -> Result<()> {
        let (engine_field, field_type) = self.lookup(field)?;
        let term = match (field_type, term.into()) {
            (ty, Value::Text(text)) if ty.is_text() => Term::from_field_text(engine_field, &text),
            (FieldType::Integer { .. }, Value::Integer(n)) => Term::from_field_i64(engine_field, n),
            (ty, value) => {
                return Err(Error::invalid_argument(format!(
                    "field `{field}` is {} but got {} term",
                    ty.name(),
                    value.kind()
                )));
            }
        };
        self.writer.delete_term(term);
        Ok(())
    }

    /// Commit pending changes, returning the engine's opstamp.
    pub fn commit(&mut self) -> Result<u64> {
        let opstamp = guard("commit", || self.writer.commit())?;
        tracing::debug!(path = %self.path.display(), opstamp, "committed");
        Ok(opstamp)
    }

    /// Number of committed documents.
    pub fn doc_count(&self) -> Result<u64> {
        let reader: IndexReader = guard("open reader", || {
            self.index
                .reader_builder()
                .reload_policy(ReloadPolicy::Manual)
                .try_into()
        })?;
        Ok(reader.searcher().num_docs())
    }

    fn lookup(&self, name: &str) -> Result<(Field, &FieldType)> {
        match (self.fields.get(name), self.schema.field_type(name)) {
            (Some(field), Some(field_type)) => Ok((*field, field_type)),
            _ => Err(Error::invalid_argument(format!("unknown field `{name}`"))),
        }
    }
}

impl std::fmt::Debug for Indexer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Indexer")
            .field("path", &self.path)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tokenizer::RegexTokenizer;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn schema() -> Schema {
        let mut schema = Schema::new();
        schema.spec_field("id", FieldType::string()).unwrap();
        schema
            .spec_field("body", FieldType::full_text_with(RegexTokenizer::new(r"\S+").unwrap()))
            .unwrap();
        schema.spec_field("year", FieldType::integer()).unwrap();
        schema
    }

    fn create_args(dir: &TempDir, schema: Schema) -> OpenIndexerArgs {
        OpenIndexerArgs::new(dir.path().join("idx")).schema(schema).create(true)
    }

    fn doc(id: &str, body: &str, year: i64) -> Doc {
        Doc::new().with("id", id).with("body", body).with("year", year)
    }

    #[test]
    fn test_open_not_an_index_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = open_indexer(&OpenIndexerArgs::new(dir.path())).unwrap_err();
        assert!(err.is_engine(), "expected engine error, got {err:?}");
        assert_eq!(err.as_engine().unwrap().kind(), EngineErrorKind::NotAnIndex);
    }

    #[test]
    fn test_open_nonexistent_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = open_indexer(&OpenIndexerArgs::new(dir.path().join("notalucyindex"))).unwrap_err();
        assert!(err.is_engine());
        assert_eq!(err.as_engine().unwrap().kind(), EngineErrorKind::NotAnIndex);
    }

    #[test]
    fn test_open_regular_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = open_indexer(&OpenIndexerArgs::new(file.path())).unwrap_err();
        assert!(err.is_engine());
    }

    #[rstest]
    #[case(OpenIndexerArgs::default())]
    #[case(OpenIndexerArgs::new("somewhere").memory_budget(1_000))]
    #[case(OpenIndexerArgs::new("somewhere").memory_budget(usize::MAX))]
    #[case(OpenIndexerArgs::new("somewhere").memory_budget(MAX_MEMORY_BUDGET + 1))]
    #[case(OpenIndexerArgs::new("somewhere").create(true))]
    #[case(OpenIndexerArgs::new("somewhere").create(true).schema(Schema::new()))]
    fn test_invalid_arguments_are_local(#[case] args: OpenIndexerArgs) {
        let err = open_indexer(&args).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)), "got {err:?}");
        assert!(!err.is_engine());
    }

    #[test]
    fn test_open_with_broken_stored_tokenizer() {
        use tantivy::schema::{Schema as EngineSchema, TextFieldIndexing, TextOptions};

        let dir = tempfile::tempdir().unwrap();
        let indexing = TextFieldIndexing::default().set_tokenizer("lucy_regex:(");
        let mut builder = EngineSchema::builder();
        builder.add_text_field("body", TextOptions::default().set_indexing_options(indexing));
        Index::create_in_dir(dir.path(), builder.build()).unwrap();

        let err = open_indexer(&OpenIndexerArgs::new(dir.path())).unwrap_err();
        assert!(err.is_engine(), "expected engine error, got {err:?}");
        assert_eq!(err.as_engine().unwrap().kind(), EngineErrorKind::SchemaMismatch);
    }

    #[rstest]
    fn test_doc_count_follows_commits(schema: Schema) {
        let dir = tempfile::tempdir().unwrap();
        let mut indexer = open_indexer(&create_args(&dir, schema)).unwrap();
        for (i, id) in ["a", "b", "c"].into_iter().enumerate() {
            indexer.add_doc(doc(id, "foo", i as i64)).unwrap();
            indexer.commit().unwrap();
            assert_eq!(indexer.doc_count().unwrap(), i as u64 + 1);
        }
    }

    #[rstest]
    fn test_create_then_reopen(schema: Schema) {
        let dir = tempfile::tempdir().unwrap();
        let args = create_args(&dir, schema.clone());
        {
            let indexer = open_indexer(&args).unwrap();
            assert_eq!(indexer.schema(), &schema);
            assert_eq!(indexer.doc_count().unwrap(), 0);
        }

        let reopened = open_indexer(&OpenIndexerArgs::new(dir.path().join("idx"))).unwrap();
        assert_eq!(reopened.schema(), &schema);
        assert_eq!(reopened.path(), dir.path().join("idx"));
    }

    #[rstest]
    fn test_add_and_commit(schema: Schema) {
        let dir = tempfile::tempdir().unwrap();
        let mut indexer = open_indexer(&create_args(&dir, schema)).unwrap();
        indexer.add_doc(doc("a", "foo bar baz", 2001)).unwrap();
        indexer.add_doc(doc("b", "qux", 2002)).unwrap();
        assert_eq!(indexer.doc_count().unwrap(), 0);

        indexer.commit().unwrap();
        assert_eq!(indexer.doc_count().unwrap(), 2);
    }

    #[rstest]
    fn test_uncommitted_changes_are_dropped(schema: Schema) {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut indexer = open_indexer(&create_args(&dir, schema)).unwrap();
            indexer.add_doc(doc("a", "foo", 1)).unwrap();
        }
        let indexer = open_indexer(&OpenIndexerArgs::new(dir.path().join("idx"))).unwrap();
        assert_eq!(indexer.doc_count().unwrap(), 0);
    }

    #[rstest]
    fn test_delete_by_term(schema: Schema) {
        let dir = tempfile::tempdir().unwrap();
        let mut indexer = open_indexer(&create_args(&dir, schema)).unwrap();
        indexer.add_doc(doc("a", "foo", 1)).unwrap();
        indexer.add_doc(doc("b", "bar", 2)).unwrap();
        indexer.commit().unwrap();

        indexer.delete_by_term("id", "a").unwrap();
        indexer.commit().unwrap();
        assert_eq!(indexer.doc_count().unwrap(), 1);

        indexer.delete_by_term("year", 2i64).unwrap();
        indexer.commit().unwrap();
        assert_eq!(indexer.doc_count().unwrap(), 0);
    }

    #[rstest]
    fn test_truncate_on_next_commit(schema: Schema) {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut indexer = open_indexer(&create_args(&dir, schema)).unwrap();
            indexer.add_doc(doc("a", "foo", 1)).unwrap();
            indexer.commit().unwrap();
        }

        let args = OpenIndexerArgs::new(dir.path().join("idx")).truncate(true);
        let mut indexer = open_indexer(&args).unwrap();
        assert_eq!(indexer.doc_count().unwrap(), 1);
        indexer.commit().unwrap();
        assert_eq!(indexer.doc_count().unwrap(), 0);
    }

    #[rstest]
    fn test_second_open_is_lock_busy(schema: Schema) {
        let dir = tempfile::tempdir().unwrap();
        let _first = open_indexer(&create_args(&dir, schema)).unwrap();
        let err = open_indexer(&OpenIndexerArgs::new(dir.path().join("idx"))).unwrap_err();
        assert_eq!(err.as_engine().unwrap().kind(), EngineErrorKind::LockBusy);
    }

    #[rstest]
    fn test_schema_mismatch_on_reopen(schema: Schema) {
        let dir = tempfile::tempdir().unwrap();
        drop(open_indexer(&create_args(&dir, schema)).unwrap());

        let mut other = Schema::new();
        other.spec_field("title", FieldType::full_text()).unwrap();
        let args = OpenIndexerArgs::new(dir.path().join("idx")).schema(other);
        let err = open_indexer(&args).unwrap_err();
        assert_eq!(err.as_engine().unwrap().kind(), EngineErrorKind::SchemaMismatch);
    }

    #[rstest]
    fn test_add_doc_rejects_bad_fields(schema: Schema) {
        let dir = tempfile::tempdir().unwrap();
        let mut indexer = open_indexer(&create_args(&dir, schema)).unwrap();

        let err = indexer.add_doc(Doc::new().with("nope", "x")).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));

        let err = indexer.add_doc(Doc::new().with("year", "not a number")).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));

        let err = indexer.add_doc(Doc::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));

        let err = indexer.delete_by_term("id", 3i64).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));

        indexer.commit().unwrap();
        assert_eq!(indexer.doc_count().unwrap(), 0);
    }
}
