// Application layer - Use cases and repository contracts
pub mod asset_repository;
pub mod measurement_repository;
pub mod panel_service;
