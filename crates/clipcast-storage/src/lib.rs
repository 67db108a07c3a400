//! Clipcast Storage Library
//!
//! This crate provides the blob-storage abstraction and the local filesystem
//! implementation used to hold uploaded video files.
//!
//! # Storage key format
//!
//! A key is a flat, collision-free filename: `{uuid}{original extension}`,
//! generated by the `keys` module. Keys must not contain `..`, `/`, or `\`;
//! backends validate this before touching the filesystem.

pub mod keys;
pub mod local;
pub mod traits;

// Re-export commonly used types
pub use keys::generate_storage_key;
pub use local::LocalStorage;
pub use traits::{ByteStream, Storage, StorageError, StorageResult};
