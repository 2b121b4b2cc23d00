// lucy/src/lib.rs
//! 全文检索绑定库
//!
//! A narrow surface over the tantivy full-text engine:
//! - schema construction
//! - indexer lifecycle, with engine failures surfaced as a distinct error kind
//! - regex tokenization, usable standalone or as a field analyzer
//!
//! ```no_run
//! use lucy::{open_indexer, OpenIndexerArgs, RegexTokenizer};
//!
//! let tokenizer = RegexTokenizer::new(r"\S+").unwrap();
//! assert_eq!(tokenizer.split("foo bar baz"), vec!["foo", "bar", "baz"]);
//!
//! match open_indexer(&OpenIndexerArgs::new("notalucyindex")) {
//!     Err(e) if e.is_engine() => eprintln!("engine refused: {e}"),
//!     Err(e) => eprintln!("bad arguments: {e}"),
//!     Ok(_indexer) => {}
//! }
//! ```

pub mod config;
pub mod document;
mod engine;
pub mod error;
pub mod indexer;
pub mod schema;
pub mod tokenizer;

// 重导出核心类型
pub use config::IndexerConfig;
pub use document::{Doc, Value};
pub use error::{EngineError, EngineErrorKind, Error, Result};
pub use indexer::{open_indexer, Indexer, OpenIndexerArgs};
pub use schema::{FieldType, Schema};
pub use tokenizer::RegexTokenizer;
