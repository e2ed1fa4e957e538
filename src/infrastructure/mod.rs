// Infrastructure layer - External dependencies and adapters
pub mod asset_cache;
pub mod chart_renderer;
pub mod config;
pub mod pegel_repository;
