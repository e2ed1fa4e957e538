// Presentation layer - HTTP surface for panel hosts
pub mod app_state;
pub mod handlers;
