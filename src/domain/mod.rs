// Domain layer - Pure models and chart geometry
pub mod chart;
pub mod measurement;
pub mod panel;
