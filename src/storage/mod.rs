//! Storage layer
//!
//! Loads and saves the TOML settings file and resolves it into the immutable
//! [`settings::Settings`] the API client is built from.

use crate::error::StorageError;

pub mod config;
pub mod settings;

type Result<T> = std::result::Result<T, StorageError>;
