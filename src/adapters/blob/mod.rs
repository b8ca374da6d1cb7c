//! Azure Blob Storage integration

pub mod client;

pub use client::{BlobStorageClient, ObjectStore, CSV_CONTENT_TYPE, STORAGE_API_VERSION};
