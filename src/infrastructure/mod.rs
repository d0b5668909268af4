// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod file_store;
pub mod http_client;
pub mod memory_controls;
pub mod snapshot_surface;
pub mod terminal_host;
