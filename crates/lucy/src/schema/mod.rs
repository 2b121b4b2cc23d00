// lucy/src/schema/mod.rs
//! Schema 模块 - field definitions and their engine mapping

pub mod field_type;
pub mod builder;

pub use field_type::FieldType;
pub use builder::Schema;
