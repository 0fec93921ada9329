pub use crate::error::AppError;

/// Main architecture layers (dependency flow: CLI → Core → API → Storage)
pub mod cli; // Command-line interface
pub mod core; // Query cache and resource bindings
pub mod storage; // Settings file and resolved settings

/// Support modules (used across layers)
pub mod api; // HTTP client and endpoints
pub mod display; // Output formatting
pub mod error; // Error handling
pub mod utils; // Shared utilities and helpers

pub use crate::api::{ApiClient, ApiResponse, ConfigId};
pub use crate::core::config_queries::{
    CONFIG_QUERY_KEY, UpdateConfigArgs, use_create_config, use_delete_config, use_fetch_config,
    use_update_config,
};
pub use crate::core::query::{Mutation, MutationStatus, Query, QueryClient, QueryKey};
pub use crate::storage::settings::Settings;

pub type Result<T> = std::result::Result<T, AppError>;
