//! Maintenance report engine: classification, schema, form, and rendering

pub mod category;
pub mod document;
pub mod fields;
pub mod form;
pub mod schema;
pub mod viewer;

pub use category::{classify, Category};
pub use document::{CategorySection, Document, Metadata};
pub use form::{FieldError, FormEngine, FormError, Severity, ValidationIssue};
pub use schema::{schema_for, FieldKind, FieldSpec, Section, TableSpec};
pub use viewer::{render, RenderedSection};
