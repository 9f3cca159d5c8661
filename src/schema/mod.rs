//! Schema system - stored-payload validation

pub mod validator;

pub use validator::{PayloadValidator, SchemaError, Violation};
