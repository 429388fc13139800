//! Client-side registry for a file-upload service: talks to the backend and
//! keeps a local copy of its file list in step after every call.

pub mod api;
pub mod backend;
pub mod client;
pub mod config;
pub mod drop_zone;
pub mod error;
pub mod format;
pub mod registry;
pub mod render;

pub use api::{ApiStyle, FileRecord, FileUpload, UploadReceipt};
pub use backend::{FileBackend, HttpBackend};
pub use client::{Feedback, FileRegistryClient, UploadState};
pub use config::ClientConfig;
pub use error::ApiError;
pub use registry::FileRegistry;
