//! Core module - identity, project layout, configuration, and storage

pub mod blob;
pub mod config;
pub mod identity;
pub mod project;
pub mod store;

pub use blob::{AttachmentError, AttachmentStore, StagedAttachment};
pub use config::Config;
pub use identity::{IdParseError, RecordId, RecordPrefix};
pub use project::{Project, ProjectError};
pub use store::{GroupCount, NewReport, Store, StoreError};
